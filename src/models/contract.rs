use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which side of the chain a contract belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionSide {
    Put,
    Call,
}

/// One option contract (a specific strike and expiration) as received
/// from a provider adapter.
///
/// Only received fields live here. Derived economics are computed fresh
/// every run and carried separately in
/// [`ContractMetrics`](crate::metrics::ContractMetrics) so they can never
/// be mistaken for persisted state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Contract {
    /// Strike price
    pub strike: f64,

    /// Current bid
    pub bid: f64,

    /// Current ask
    pub ask: f64,

    /// Last trade price
    pub last: f64,

    /// Expiration date, `YYYY-MM-DD`
    pub expiration: String,

    /// When the contract last traded
    pub last_trade_date: DateTime<Utc>,

    /// Shares per contract; -1 when the source does not report it
    pub lot_size: i32,

    /// Open interest
    pub open_interest: i64,

    /// Delta, when the source reports greeks
    pub delta: Option<f64>,

    /// Implied volatility, when the source reports it
    pub iv: Option<f64>,
}

impl Default for Contract {
    fn default() -> Self {
        Self {
            strike: 0.0,
            bid: 0.0,
            ask: 0.0,
            last: 0.0,
            expiration: String::new(),
            last_trade_date: DateTime::UNIX_EPOCH,
            lot_size: -1,
            open_interest: 0,
            delta: None,
            iv: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_side_wire_format_is_lowercase() {
        // Providers tag contract arrays with lowercase side strings.
        assert_eq!(
            serde_json::from_str::<Vec<OptionSide>>(r#"["put", "call"]"#).unwrap(),
            vec![OptionSide::Put, OptionSide::Call]
        );
        assert_eq!(serde_json::to_string(&OptionSide::Put).unwrap(), r#""put""#);
    }

    #[test]
    fn test_default_marks_unknowns() {
        let contract = Contract::default();
        assert_eq!(contract.lot_size, -1);
        assert_eq!(contract.last_trade_date, DateTime::UNIX_EPOCH);
        assert!(contract.delta.is_none());
    }
}
