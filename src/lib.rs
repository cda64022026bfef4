//! Optionchain Data Crate
//!
//! This crate provides resilient option-chain and equity-quote fetching
//! with derived per-contract risk and yield metrics.
//!
//! # Overview
//!
//! The crate supports:
//! - A day-keyed file cache in front of every HTTP request
//! - Throttle-aware fetching (header-driven backoff, quota pauses)
//! - Sticky two-provider failover on the quote path
//! - Staleness zeroing against a US/Eastern market clock
//! - Pure derived-metrics computation per contract
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |  SecurityLoader  | --> |  ChainProvider   |  (option chain)
//! +------------------+     +------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! |  QuoteFailover   | --> |  QuoteProvider   |  (price, fundamentals)
//! +------------------+     +------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! |  FetchExecutor   | --> |    DayCache      |  (per-day HTTP cache)
//! +------------------+     +------------------+
//!          |
//!          v
//! +------------------+
//! |     enrich       |  (derived metrics)
//! +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Security`] - A ticker with price, fundamentals and its option chain
//! - [`Contract`] - One option contract as received from a provider
//! - [`ContractMetrics`] - Derived economics for one contract
//! - [`StockQuote`] - Adapter-normalized equity quote
//! - [`ChainDataError`] - Error taxonomy with retry classification

pub mod cache;
pub mod clock;
pub mod errors;
pub mod failover;
pub mod fetch;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod provider;

// Re-export the public surface
pub use cache::{CacheConfig, DayCache};
pub use errors::{ChainDataError, RetryClass};
pub use failover::{FailoverState, QuoteFailover};
pub use fetch::{FetchExecutor, RetryPolicy, ThrottleHeader};
pub use metrics::{enrich, ContractMetrics, EnrichedContract, EnrichedSecurity};
pub use models::{Contract, OptionChain, OptionSide, Security, StockQuote};
pub use pipeline::SecurityLoader;
pub use provider::{ChainProvider, QuoteProvider};
