use chrono::{DateTime, Utc};

/// What the stock-quote path hands back: the adapter-normalized subset of
/// a provider quote response.
#[derive(Clone, Debug, PartialEq)]
pub struct StockQuote {
    /// Latest trade price; 0.0 means unknown
    pub price: f64,

    /// When the quote was taken, used for staleness checks
    pub timestamp: DateTime<Utc>,

    /// Price/earnings ratio, when the source reports one
    pub pe: Option<f64>,

    /// Week-over-week price change percentage, when the source reports one
    pub price_change_pct: Option<f64>,
}

impl StockQuote {
    /// Create a quote carrying only price and timestamp.
    pub fn new(price: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            price,
            timestamp,
            pe: None,
            price_change_pct: None,
        }
    }
}
