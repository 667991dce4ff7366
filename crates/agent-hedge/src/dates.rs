//! Analysis window parsing and defaulting

use crate::error::{HedgeError, Result};
use chrono::{Local, Months, NaiveDate};

/// Wire format of every date the system reads or writes
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date; `field` names it in the error ("Start"/"End")
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| HedgeError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// Format a date as `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Today's date in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Resolve the analysis window
///
/// `end` defaults to `today`; `start` defaults to `lookback_months` before
/// `end`. An explicit start after the end is rejected.
pub fn resolve_window(
    start: Option<&str>,
    end: Option<&str>,
    today: NaiveDate,
    lookback_months: u32,
) -> Result<(NaiveDate, NaiveDate)> {
    let end = end.map(|e| parse_date("End", e)).transpose()?.unwrap_or(today);
    let start = match start {
        Some(s) => parse_date("Start", s)?,
        None => end
            .checked_sub_months(Months::new(lookback_months))
            .unwrap_or(NaiveDate::MIN),
    };

    if start > end {
        return Err(HedgeError::InvertedRange {
            start: format_date(start),
            end: format_date(end),
        });
    }
    Ok((start, end))
}
