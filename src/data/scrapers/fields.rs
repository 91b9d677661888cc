//! Field extractors
//!
//! Small stateless readers for single cells or rows. None of them fail:
//! anything unreadable comes back as a sentinel.

use super::{element_text, selector, TEAM_LOGOS};
use crate::{FieldNumber, ShirtColors, TeamLabel, ERROR_INT, UNKNOWN_STR};
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

static SPAN: LazyLock<Selector> = LazyLock::new(|| selector("span"));
static TEAM_SCORES: LazyLock<Selector> = LazyLock::new(|| selector("td.teamScores"));
static FACILITY_LINK: LazyLock<Selector> =
    LazyLock::new(|| selector("a.ui-link.ui-widget.generalLink.facilityLink"));

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());
static SHIRT_COLOUR_1: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"--shirt-colour-1:\s*([^;]+)").unwrap());
static SHIRT_COLOUR_2: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"--shirt-colour-2:\s*([^;]+)").unwrap());
static LOCATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.+)\s+\((\d+)\)$").unwrap());
static TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d{1,2})\s*:\s*(\d{2}\s*(?:am|pm))").unwrap());

/// First run of ASCII digits in `text`
pub fn first_digit_run(text: &str) -> Option<&str> {
    DIGITS.find(text).map(|m| m.as_str())
}

/// Integer value of a whole cell, or `-1`
pub fn parse_int_or_error(text: &str) -> i32 {
    text.trim().parse().unwrap_or(ERROR_INT)
}

/// Score held in a team row's `teamScores` cell, or `-1` when the cell is
/// missing or has no number in it
pub fn extract_score(team_row: ElementRef<'_>) -> i32 {
    team_row
        .select(&TEAM_SCORES)
        .next()
        .map(element_text)
        .and_then(|text| first_digit_run(&text).and_then(|digits| digits.parse().ok()))
        .unwrap_or(ERROR_INT)
}

/// Shirt colours from the first `<span>` inside a logo cell
pub fn extract_colors(logo_cell: Option<ElementRef<'_>>) -> ShirtColors {
    logo_cell
        .and_then(|cell| cell.select(&SPAN).next())
        .and_then(|span| span.value().attr("style"))
        .map(colors_from_style)
        .unwrap_or_default()
}

/// Read `--shirt-colour-1` / `--shirt-colour-2` out of an inline style
pub fn colors_from_style(style: &str) -> ShirtColors {
    let read = |pattern: &Regex| {
        pattern
            .captures(style)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .filter(|value| !value.is_empty())
            .unwrap_or(UNKNOWN_STR)
            .to_string()
    };

    ShirtColors {
        primary: read(&*SHIRT_COLOUR_1),
        secondary: read(&*SHIRT_COLOUR_2),
    }
}

/// Home and away colours from a game row's logo cells
///
/// Both sides stay unknown unless the row has at least two logo cells.
pub fn extract_team_colors(row: ElementRef<'_>) -> (ShirtColors, ShirtColors) {
    let logos: Vec<_> = row.select(&TEAM_LOGOS).collect();
    if logos.len() < 2 {
        return (ShirtColors::default(), ShirtColors::default());
    }
    (extract_colors(Some(logos[0])), extract_colors(Some(logos[1])))
}

/// Team name, plus the slot label when the cell carries one
pub fn extract_team_label(name_cell: ElementRef<'_>) -> TeamLabel {
    let text = element_text(name_cell);
    let labelled = name_cell
        .select(&SPAN)
        .next()
        .map(|span| !element_text(span).is_empty())
        .unwrap_or(false);

    if labelled {
        split_team_label(&text)
    } else {
        TeamLabel {
            name: text,
            info: None,
        }
    }
}

/// Split "Info - Team" on the first hyphen
pub fn split_team_label(text: &str) -> TeamLabel {
    match text.split_once('-') {
        Some((info, name)) => {
            let info = info.trim();
            TeamLabel {
                name: name.trim().to_string(),
                info: (!info.is_empty()).then(|| info.to_string()),
            }
        }
        None => TeamLabel {
            name: text.trim().to_string(),
            info: None,
        },
    }
}

/// Field name and number from the row's facility link
///
/// The link text is only trimmed, so an unmatched location comes back as
/// written on the page.
pub fn extract_location(row: ElementRef<'_>) -> (String, FieldNumber) {
    match row.select(&FACILITY_LINK).next() {
        Some(link) => location_from_text(&link.text().collect::<String>()),
        None => (UNKNOWN_STR.to_string(), FieldNumber::Unknown),
    }
}

/// Split "Central Park (3)" into ("Central Park", 3)
pub fn location_from_text(text: &str) -> (String, FieldNumber) {
    let text = text.trim();
    if let Some(caps) = LOCATION.captures(text) {
        if let Ok(number) = caps[2].parse() {
            return (caps[1].to_string(), FieldNumber::Number(number));
        }
    }
    (text.to_string(), FieldNumber::Unknown)
}

/// First "6:30pm"-style time anywhere in the row, or "Unknown"
pub fn extract_time_text(row: ElementRef<'_>) -> String {
    // Text nodes are joined with a space so a score cell never runs into
    // the hour; the pattern tolerates the space that leaves around the colon.
    let text = row.text().collect::<Vec<_>>().join(" ");
    time_from_text(&text)
}

/// First time in `text`, with any whitespace around the colon removed
pub fn time_from_text(text: &str) -> String {
    TIME.captures(text)
        .map(|caps| format!("{}:{}", &caps[1], &caps[2]))
        .unwrap_or_else(|| UNKNOWN_STR.to_string())
}
