//! Adapter trait definitions.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::ChainDataError;
use crate::models::{OptionChain, StockQuote};

/// Source of option-chain data for a ticker.
///
/// There is a single chain source per run, so implementations are used
/// directly by the pipeline (no failover layer). Throttling that cannot be
/// absorbed locally surfaces as [`ChainDataError::Throttled`].
#[async_trait]
pub trait ChainProvider: Send + Sync {
    /// Short identifier used in logs and error messages.
    fn id(&self) -> &'static str;

    /// Fetch every contract expiring on or before `cutoff`.
    ///
    /// The returned chain carries whatever subset of data the source
    /// knows; an unknown underlying price is reported as 0.0.
    async fn options(&self, ticker: &str, cutoff: NaiveDate)
        -> Result<OptionChain, ChainDataError>;
}

/// Source of stock price and valuation data for a ticker.
///
/// Two interchangeable implementations back the quote path; the failover
/// orchestrator switches between them when one starts throttling.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Short identifier used in logs and error messages.
    fn id(&self) -> &'static str;

    /// Fetch the latest quote for a ticker.
    async fn quote(&self, ticker: &str) -> Result<StockQuote, ChainDataError>;
}
