//! Game time composition
//!
//! Game tables carry the date in a heading ("Monday 14 July 2025") and each
//! row carries a wall-clock time ("6:30pm"). Together they name one instant
//! in the league's timezone.

use crate::{LeagueError, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;

/// Layout of a table date heading once its weekday is removed
pub const DATE_FORMAT: &str = "%d %B %Y";

/// Layout of a weekday-less heading joined to a row time
pub const DATE_TIME_FORMAT: &str = "%d %B %Y %I:%M%p";

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_full_name(token: &str, names: &[&str]) -> bool {
    names.iter().any(|name| name.eq_ignore_ascii_case(token))
}

/// "Monday 14 July 2025" -> "14 July 2025"
///
/// Weekday and month must be spelled out in full. The weekday is not
/// checked against the date.
fn strip_weekday(heading: &str) -> Result<String> {
    let tokens: Vec<&str> = heading.split_whitespace().collect();
    match tokens.as_slice() {
        [weekday, day, month, year]
            if is_full_name(weekday, &WEEKDAYS) && is_full_name(month, &MONTHS) =>
        {
            Ok(format!("{} {} {}", day, month, year))
        }
        _ => Err(LeagueError::DateLayout {
            input: tokens.join(" "),
        }),
    }
}

/// Parse a table date heading such as "Monday 14 July 2025"
pub fn parse_table_date(heading: &str) -> Result<NaiveDate> {
    let date = strip_weekday(heading)?;
    NaiveDate::parse_from_str(&date, DATE_FORMAT).map_err(|source| LeagueError::Timestamp {
        input: collapse_whitespace(heading),
        source,
    })
}

/// Join a date heading and a row time and resolve them in `timezone`
///
/// The time may have a space before am/pm. Anything else that does not fit
/// "<Weekday> <day> <Month> <year> <h>:<mm><am|pm>" is an error.
pub fn compose_timestamp(date: &str, time: &str, timezone: Tz) -> Result<DateTime<FixedOffset>> {
    let time: String = time.split_whitespace().collect();
    let combined = format!("{} {}", strip_weekday(date)?, time);

    let naive = match NaiveDateTime::parse_from_str(&combined, DATE_TIME_FORMAT) {
        Ok(naive) => naive,
        Err(source) => {
            return Err(LeagueError::Timestamp {
                input: format!("{} {}", collapse_whitespace(date), time),
                source,
            })
        }
    };

    localize(naive, timezone)
}

/// Attach `timezone` to a wall-clock time
///
/// A repeated hour at the end of daylight saving resolves to the earlier
/// instant. A skipped hour is an error.
pub fn localize(naive: NaiveDateTime, timezone: Tz) -> Result<DateTime<FixedOffset>> {
    let local = timezone.from_local_datetime(&naive).earliest().ok_or_else(|| {
        LeagueError::NonexistentLocalTime {
            local: naive.to_string(),
            timezone: timezone.name().to_string(),
        }
    })?;

    Ok(local.with_timezone(&local.offset().fix()))
}
