//! Core data types for option-chain aggregation:
//! - `contract` - One option contract as received from a provider adapter
//! - `security` - A ticker plus its price and full put/call chain
//! - `quote` - Adapter output for the stock-quote path

mod contract;
mod quote;
mod security;

pub use contract::{Contract, OptionSide};
pub use quote::StockQuote;
pub use security::{OptionChain, Security};
