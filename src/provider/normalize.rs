//! Shared adapter tolerances.
//!
//! Providers disagree about how to report "no data": some omit a key,
//! some send `null`, some send a zero. The helpers here pin down the
//! crate-wide answers so every adapter behaves the same way:
//! present-but-null numerics decode to zero, and a stale or zero-valued
//! quote zeroes the price instead of failing the ticker.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::clock;

/// Deserialize a numeric field that may be present-but-null as 0.0.
///
/// For use with `#[serde(deserialize_with = "null_to_zero")]` on fields
/// like PE, delta, or IV where null means "not quoted right now".
pub fn null_to_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.unwrap_or(0.0))
}

/// Grace window past the close-to-close interval before a quote counts
/// as stale. Covers the regular session (6.5 hours) after a close.
fn staleness_grace() -> Duration {
    Duration::minutes(6 * 60 + 30)
}

/// Validate a quote's freshness and return a usable price.
///
/// The quote's age is compared against the time elapsed since the most
/// recent market close plus the grace window; older quotes get their
/// price zeroed (with a diagnostic) so the ticker can still be processed
/// with its other fields intact. A price or timestamp of exactly zero is
/// likewise invalid-but-not-fatal.
pub fn fresh_price(
    ticker: &str,
    price: f64,
    quote_time: DateTime<Utc>,
    now: DateTime<Utc>,
) -> f64 {
    if price == 0.0 || quote_time.timestamp() == 0 {
        warn!(ticker, price, "quote has zero price or timestamp, treating price as unknown");
        return 0.0;
    }

    let age = now - quote_time;
    let limit = clock::time_since_close(now) + staleness_grace();
    if age > limit {
        warn!(
            ticker,
            quote_time = %quote_time,
            age_hours = age.num_hours(),
            "quote is stale, zeroing price"
        );
        return 0.0;
    }

    price
}
