//! Market clock for the US equity session.
//!
//! The quote-freshness check needs to know how long ago the market last
//! closed, given only the wall-clock time. Sessions run 9:30-16:00
//! US/Eastern, Monday through Friday. Market holidays are ignored; a
//! holiday makes the staleness window slightly too strict, which at worst
//! zeroes a price that a refetch restores the next session.

use chrono::{DateTime, Datelike, Duration, Timelike, Utc, Weekday};
use chrono_tz::America::New_York;
use chrono_tz::Tz;

/// Hours between the 16:00 close and midnight.
const CLOSE_TO_MIDNIGHT: i64 = 8;

/// True if the market is open at time `t` (ignoring holidays).
pub fn in_trading_hours(t: DateTime<Utc>) -> bool {
    let et = t.with_timezone(&New_York);

    if matches!(et.weekday(), Weekday::Sat | Weekday::Sun) {
        return false;
    }

    let hour = et.hour();
    let minute = et.minute();
    !(hour < 9 || (hour == 9 && minute < 30) || hour >= 16)
}

/// Duration between the most recent market close and `t` (ignoring
/// holidays).
pub fn time_since_close(t: DateTime<Utc>) -> Duration {
    let et = t.with_timezone(&New_York);
    let hour = et.hour();

    match et.weekday() {
        // Before Monday's close the last close was Friday's.
        Weekday::Mon if hour < 16 => {
            Duration::hours(CLOSE_TO_MIDNIGHT + 48) + since_midnight(&et)
        }
        Weekday::Sun => Duration::hours(CLOSE_TO_MIDNIGHT + 24) + since_midnight(&et),
        Weekday::Sat => Duration::hours(CLOSE_TO_MIDNIGHT) + since_midnight(&et),
        // A weekday before the close uses yesterday's close.
        _ if hour < 16 => Duration::hours(CLOSE_TO_MIDNIGHT) + since_midnight(&et),
        // The market has already closed today.
        _ => since_midnight(&et) - Duration::hours(16),
    }
}

fn since_midnight(et: &DateTime<Tz>) -> Duration {
    Duration::seconds(i64::from(et.num_seconds_from_midnight()))
}
