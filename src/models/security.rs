use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::contract::Contract;

/// Partial security data returned by a chain provider: whatever subset of
/// the chain and underlying price the source knows.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OptionChain {
    /// Underlying price as reported alongside the chain; 0.0 if unknown
    pub price: f64,

    /// Put contracts, in source order
    pub puts: Vec<Contract>,

    /// Call contracts, in source order
    pub calls: Vec<Contract>,
}

/// An underlying ticker plus its current price and full put/call chain.
///
/// A `Security` starts life holding only its ticker and is populated
/// field-by-field: options first, then quote/price, then valuation data.
/// It is owned exclusively by the pipeline run that created it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Security {
    /// Ticker symbol, the immutable key
    pub ticker: String,

    /// Latest trade price; 0.0 means unknown or stale
    pub price: f64,

    /// Price/earnings ratio, when known
    pub pe: Option<f64>,

    /// Next earnings announcement date (`YYYY-MM-DD`), when known
    pub earnings_date: Option<String>,

    /// Week-over-week price change percentage, when known
    pub price_change_pct: Option<f64>,

    /// Put contracts
    pub puts: Vec<Contract>,

    /// Call contracts
    pub calls: Vec<Contract>,
}

impl Security {
    /// Create an empty security for a ticker.
    pub fn new(ticker: &str) -> Self {
        Self {
            ticker: ticker.to_string(),
            price: 0.0,
            pe: None,
            earnings_date: None,
            price_change_pct: None,
            puts: Vec::new(),
            calls: Vec::new(),
        }
    }

    /// Whether the security has a usable chain: both puts and calls present.
    pub fn has_options(&self) -> bool {
        !self.puts.is_empty() && !self.calls.is_empty()
    }

    /// Relative distance to the highest out-of-the-money call strike that
    /// still carries a bid, for the given expiration.
    ///
    /// Returns `100 * (max_strike - price) / price` over calls at that
    /// expiration with `strike >= price` and `bid > 0`, or 0.0 if no such
    /// call exists (or the price is unknown).
    pub fn call_spread(&self, expiration: &str) -> f64 {
        let mut max_strike: f64 = 0.0;

        for call in &self.calls {
            if call.expiration != expiration {
                continue;
            }
            if call.strike >= self.price && call.bid > 0.0 && call.strike > max_strike {
                max_strike = call.strike;
            }
        }

        if max_strike == 0.0 || self.price == 0.0 {
            return 0.0;
        }

        100.0 * (max_strike - self.price) / self.price
    }

    /// Try to determine the spacing, in days, between put expiration dates.
    ///
    /// Looks at the first five distinct expirations and returns the largest
    /// gap between consecutive dates. Five dates reach out at least a month
    /// without straying into LEAPS territory. Returns `None` when there are
    /// too few distinct expirations to judge, or a date fails to parse.
    pub fn expiration_period(&self) -> Option<i64> {
        const MIN_EXPIRATIONS: usize = 5;

        let mut expirations: Vec<&str> = self
            .puts
            .iter()
            .map(|put| put.expiration.as_str())
            .collect();
        expirations.sort_unstable();
        expirations.dedup();

        if expirations.len() < MIN_EXPIRATIONS {
            return None;
        }

        let mut max_gap = 0;
        let mut prev = NaiveDate::parse_from_str(expirations[0], "%Y-%m-%d").ok()?;

        for expiration in &expirations[1..MIN_EXPIRATIONS] {
            let next = NaiveDate::parse_from_str(expiration, "%Y-%m-%d").ok()?;
            let days = (next - prev).num_days();
            if days > max_gap {
                max_gap = days;
            }
            prev = next;
        }

        Some(max_gap)
    }
}
