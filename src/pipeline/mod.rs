//! Per-ticker batch loop.
//!
//! Assembles one [`EnrichedSecurity`] per ticker: option chain from the
//! chain provider, share price and fundamentals from the quote path
//! (behind the sticky failover), earnings date merged from the caller's
//! table, then derived metrics. Batch loads never abort on a single bad
//! ticker.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::errors::ChainDataError;
use crate::failover::QuoteFailover;
use crate::metrics::{enrich, EnrichedSecurity};
use crate::models::Security;
use crate::provider::{normalize, ChainProvider};

/// Loads and enriches securities one ticker at a time.
pub struct SecurityLoader {
    chain: Arc<dyn ChainProvider>,
    quotes: QuoteFailover,
    earnings: HashMap<String, String>,
    /// Expirations strictly before this date are dropped by the adapter
    cutoff: NaiveDate,
}

impl SecurityLoader {
    pub fn new(chain: Arc<dyn ChainProvider>, quotes: QuoteFailover, cutoff: NaiveDate) -> Self {
        Self {
            chain,
            quotes,
            earnings: HashMap::new(),
            cutoff,
        }
    }

    /// Attach a ticker-to-earnings-date table merged into each loaded
    /// security.
    pub fn with_earnings(mut self, earnings: HashMap<String, String>) -> Self {
        self.earnings = earnings;
        self
    }

    /// Load one ticker end to end.
    ///
    /// The chain price is the baseline; the quote price replaces it only
    /// when it survives the staleness check. A stale or zeroed quote
    /// leaves the security priced by the chain (possibly 0.0, in which
    /// case every derived metric is zeroed too).
    pub async fn load_security(
        &mut self,
        ticker: &str,
        now: DateTime<Utc>,
    ) -> Result<EnrichedSecurity, ChainDataError> {
        let chain = self.chain.options(ticker, self.cutoff).await?;

        let mut security = Security::new(ticker);
        security.price = chain.price;
        security.puts = chain.puts;
        security.calls = chain.calls;

        let quote = self.quotes.fetch(ticker).await?;
        let price = normalize::fresh_price(ticker, quote.price, quote.timestamp, now);
        if price != 0.0 {
            security.price = price;
        }
        security.pe = quote.pe;
        security.price_change_pct = quote.price_change_pct;
        security.earnings_date = self.earnings.get(ticker).cloned();

        Ok(enrich(security, now))
    }

    /// Load a batch of tickers sequentially, skipping failures.
    ///
    /// A ticker whose load fails is logged and dropped; one without a
    /// two-sided chain is dropped quietly. The returned set is whatever
    /// survived.
    pub async fn load_all(&mut self, tickers: &[String], now: DateTime<Utc>) -> Vec<EnrichedSecurity> {
        let mut loaded = Vec::with_capacity(tickers.len());

        for ticker in tickers {
            match self.load_security(ticker, now).await {
                Ok(security) if security.has_options() => loaded.push(security),
                Ok(_) => {
                    debug!("Skipping {}: no two-sided option chain", ticker);
                }
                Err(e) => {
                    warn!("Skipping {}: {}", ticker, e);
                }
            }
        }

        info!("Loaded {} of {} requested securities", loaded.len(), tickers.len());
        loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration;

    use crate::models::{Contract, OptionChain, StockQuote};
    use crate::provider::QuoteProvider;

    struct FakeChain {
        price: f64,
        fail_tickers: Vec<&'static str>,
        empty_tickers: Vec<&'static str>,
    }

    #[async_trait]
    impl ChainProvider for FakeChain {
        fn id(&self) -> &'static str {
            "fake-chain"
        }

        async fn options(
            &self,
            ticker: &str,
            _cutoff: NaiveDate,
        ) -> Result<OptionChain, ChainDataError> {
            if self.fail_tickers.contains(&ticker) {
                return Err(ChainDataError::MissingField {
                    field: "optionChain".to_string(),
                });
            }
            if self.empty_tickers.contains(&ticker) {
                return Ok(OptionChain::default());
            }
            let contract = Contract {
                strike: 95.0,
                bid: 6.0,
                expiration: "2026-09-04".to_string(),
                last_trade_date: Utc::now(),
                ..Contract::default()
            };
            Ok(OptionChain {
                price: self.price,
                puts: vec![contract.clone()],
                calls: vec![Contract {
                    strike: 105.0,
                    ..contract
                }],
            })
        }
    }

    struct FakeQuotes {
        quote: StockQuote,
    }

    #[async_trait]
    impl QuoteProvider for FakeQuotes {
        fn id(&self) -> &'static str {
            "fake-quotes"
        }

        async fn quote(&self, _ticker: &str) -> Result<StockQuote, ChainDataError> {
            Ok(self.quote.clone())
        }
    }

    fn loader(chain: FakeChain, quote: StockQuote) -> SecurityLoader {
        let quotes = QuoteFailover::new(
            Arc::new(FakeQuotes {
                quote: quote.clone(),
            }),
            Arc::new(FakeQuotes { quote }),
        );
        SecurityLoader::new(
            Arc::new(chain),
            quotes,
            NaiveDate::from_ymd_opt(2026, 8, 28).unwrap(),
        )
    }

    fn chain_with_price(price: f64) -> FakeChain {
        FakeChain {
            price,
            fail_tickers: vec![],
            empty_tickers: vec![],
        }
    }

    #[tokio::test]
    async fn test_quote_price_overrides_chain_price() {
        let now = Utc::now();
        let mut loader = loader(chain_with_price(98.0), StockQuote::new(100.0, now));

        let security = loader.load_security("AAPL", now).await.unwrap();

        assert_eq!(security.price, 100.0);
        assert!((security.puts[0].metrics.price_basis_delta - 11.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_stale_quote_keeps_chain_price() {
        let now = Utc::now();
        let stale = StockQuote::new(100.0, now - Duration::hours(96));
        let mut loader = loader(chain_with_price(98.0), stale);

        let security = loader.load_security("AAPL", now).await.unwrap();

        assert_eq!(security.price, 98.0);
    }

    #[tokio::test]
    async fn test_earnings_date_merged() {
        let now = Utc::now();
        let mut earnings = HashMap::new();
        earnings.insert("AAPL".to_string(), "2026-10-29".to_string());
        let mut loader =
            loader(chain_with_price(98.0), StockQuote::new(100.0, now)).with_earnings(earnings);

        let security = loader.load_security("AAPL", now).await.unwrap();

        assert_eq!(security.earnings_date.as_deref(), Some("2026-10-29"));
    }

    #[tokio::test]
    async fn test_load_all_skips_failures_and_empty_chains() {
        let now = Utc::now();
        let chain = FakeChain {
            price: 98.0,
            fail_tickers: vec!["BAD"],
            empty_tickers: vec!["FLAT"],
        };
        let mut loader = loader(chain, StockQuote::new(100.0, now));

        let tickers: Vec<String> = ["AAPL", "BAD", "FLAT", "MSFT"]
            .iter()
            .map(|t| t.to_string())
            .collect();
        let loaded = loader.load_all(&tickers, now).await;

        let names: Vec<&str> = loaded.iter().map(|s| s.ticker.as_str()).collect();
        assert_eq!(names, vec!["AAPL", "MSFT"]);
    }
}
