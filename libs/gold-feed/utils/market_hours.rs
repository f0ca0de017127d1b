//! Trading-window calculation for the Istanbul bazaar.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Weekday};

const OPEN_HOUR: u32 = 9;
const CLOSE_HOUR: u32 = 18;

/// Whether the physical market is open at `now`: Monday through
/// Saturday, 09:00 to 18:00. Pure, no clock access.
pub fn is_market_open<Tz: TimeZone>(now: &DateTime<Tz>) -> bool {
    now.weekday() != Weekday::Sun && (OPEN_HOUR..CLOSE_HOUR).contains(&now.hour())
}
