//! Publish time resolution for listing page dates.
//!
//! The site prints dates like `9/2(水) 8:32` for the current year and
//! `2019/12/3(火) 22:26` for earlier years. The year is filled in from a
//! reference year, which defaults to the current year in Japan. All results
//! carry the fixed Japan Standard Time offset (UTC+9, no DST).

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Offset of Japan Standard Time from UTC, in seconds.
pub const JST_OFFSET_SECS: i32 = 9 * 3600;

static PUBDATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)(?:([0-9]{4})/)?([1-9]|1[012])/([123]?[0-9]).*?([0-9]{1,2}):([0-9]{1,2})")
        .expect("publish date pattern is valid")
});

/// Japan Standard Time.
pub fn jst() -> FixedOffset {
    FixedOffset::east_opt(JST_OFFSET_SECS).expect("UTC+9 is a valid offset")
}

/// Current year in the Asia/Tokyo civil calendar.
pub fn reference_year_now() -> i32 {
    Utc::now().with_timezone(&jst()).year()
}

/// Resolve a listing page date string into an instant at UTC+9.
///
/// Surrounding text is ignored, so `"9/2(水) 8:32 配信"` resolves the same as
/// `"9/2 8:32"`. A string without a date followed by a time yields `None`,
/// as does a date the calendar rejects (`2/31`, `24:60`).
///
/// # Arguments
///
/// * `text` - The raw date text of an entry
/// * `reference_year` - Year used when the text omits it; `None` means the
///   current year in Japan
pub fn resolve(text: &str, reference_year: Option<i32>) -> Option<DateTime<FixedOffset>> {
    let caps = PUBDATE_RE.captures(text)?;
    let field = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

    let year = match caps.get(1) {
        Some(m) => m.as_str().parse::<i32>().ok()?,
        None => reference_year.unwrap_or_else(reference_year_now),
    };
    let (month, day, hour, minute) = (field(2)?, field(3)?, field(4)?, field(5)?);

    let civil = NaiveDate::from_ymd_opt(year, month, day).and_then(|d| d.and_hms_opt(hour, minute, 0));
    match civil {
        Some(civil) => jst().from_local_datetime(&civil).single(),
        None => {
            debug!(%text, year, month, day, hour, minute, "Date text is not a valid calendar time");
            None
        }
    }
}
