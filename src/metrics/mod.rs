//! Derived per-contract economics.
//!
//! Pure computation over a fully populated [`Security`]; no I/O. Metrics
//! live on their own type, paired with the received contract, and are
//! recomputed on every run so an updated price immediately invalidates
//! previously derived numbers. Nothing here is cached or persisted.

use chrono::{DateTime, Utc};

use crate::models::{Contract, Security};

/// Derived economics for one contract.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContractMetrics {
    /// Share price minus the effective cost basis (`strike - bid`);
    /// positive means assignment would still leave the basis below price
    pub price_basis_delta: f64,

    /// Whole days since the contract last traded
    pub last_trade_days: i64,

    /// Premium yield relative to strike: `bid / strike * 100`
    pub bid_strike_ratio: f64,

    /// Premium yield relative to share price: `bid / price * 100`
    pub bid_price_ratio: f64,

    /// Percentage buffer between price and cost basis:
    /// `(price - (strike - bid)) / price * 100`
    pub safety_spread: f64,

    /// Percentage room to the furthest covered-call strike that still
    /// carries a bid at this contract's expiration
    pub call_spread: f64,
}

/// A received contract paired with its derived metrics.
#[derive(Clone, Debug)]
pub struct EnrichedContract {
    pub contract: Contract,
    pub metrics: ContractMetrics,
}

/// A fully loaded security with derived metrics on every contract.
#[derive(Clone, Debug)]
pub struct EnrichedSecurity {
    pub ticker: String,
    pub price: f64,
    pub pe: Option<f64>,
    pub earnings_date: Option<String>,
    pub price_change_pct: Option<f64>,
    pub puts: Vec<EnrichedContract>,
    pub calls: Vec<EnrichedContract>,
}

impl EnrichedSecurity {
    /// Whether the security has a usable chain: both puts and calls
    /// present.
    pub fn has_options(&self) -> bool {
        !self.puts.is_empty() && !self.calls.is_empty()
    }
}

/// Compute derived metrics for every contract of a security.
///
/// Contracts of a security with an unknown (zero) price, or with a zero
/// strike, get zeroed metrics; the derived quantities are only meaningful
/// when both sides of the ratio are real.
pub fn enrich(security: Security, now: DateTime<Utc>) -> EnrichedSecurity {
    let puts = security
        .puts
        .iter()
        .map(|contract| EnrichedContract {
            metrics: metrics_for(&security, contract, now),
            contract: contract.clone(),
        })
        .collect();

    let calls = security
        .calls
        .iter()
        .map(|contract| EnrichedContract {
            metrics: metrics_for(&security, contract, now),
            contract: contract.clone(),
        })
        .collect();

    EnrichedSecurity {
        ticker: security.ticker,
        price: security.price,
        pe: security.pe,
        earnings_date: security.earnings_date,
        price_change_pct: security.price_change_pct,
        puts,
        calls,
    }
}

fn metrics_for(security: &Security, contract: &Contract, now: DateTime<Utc>) -> ContractMetrics {
    let price = security.price;

    if price == 0.0 || contract.strike == 0.0 {
        return ContractMetrics::default();
    }

    ContractMetrics {
        price_basis_delta: price - (contract.strike - contract.bid),
        last_trade_days: (now - contract.last_trade_date).num_hours() / 24,
        bid_strike_ratio: contract.bid / contract.strike * 100.0,
        bid_price_ratio: contract.bid / price * 100.0,
        safety_spread: (price - (contract.strike - contract.bid)) / price * 100.0,
        call_spread: security.call_spread(&contract.expiration),
    }
}
