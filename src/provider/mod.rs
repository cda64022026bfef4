//! Provider adapter seams.
//!
//! Provider-specific JSON extraction lives outside this crate; adapters
//! implement the traits here and hand back canonical records. The crate
//! supplies the tolerances every adapter must honor (null-to-zero numeric
//! decoding, quote staleness zeroing) so that "missing or stale" is
//! handled in one place instead of once per provider.

pub mod normalize;
mod traits;

pub use traits::{ChainProvider, QuoteProvider};
