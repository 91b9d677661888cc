//! League table (standings) page
//!
//! One `div.section` per division, each with an `<h3>` heading and a
//! PrimeFaces data table whose rows are:
//! shirt | team | GP | W | L | D | GF | GA | GD | PTS

use super::fields::{extract_colors, first_digit_run, parse_int_or_error};
use super::{element_text, selector, Extraction, LeagueParser, PageKind, Skip};
use crate::{StandingsRow, ERROR_INT};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static SECTION: LazyLock<Selector> = LazyLock::new(|| selector("div.section"));
static HEADING: LazyLock<Selector> = LazyLock::new(|| selector("h3"));
static TABLE_BODY: LazyLock<Selector> = LazyLock::new(|| selector("tbody.ui-datatable-data"));
static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
static CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));

const MIN_CELLS: usize = 10;

impl LeagueParser {
    /// Parse a standings page into one row per team
    pub fn parse_standings_page(&self, html: &str) -> Vec<StandingsRow> {
        self.parse_standings_report(html).into_records()
    }

    /// Parse a standings page, keeping the reasons for every dropped unit
    pub fn parse_standings_report(&self, html: &str) -> Extraction<StandingsRow> {
        let document = Html::parse_document(html);
        let mut out = Extraction::default();

        let sections: Vec<_> = document.select(&SECTION).collect();
        if sections.is_empty() {
            out.skip(Skip::NoStructuralUnits {
                kind: PageKind::Standings,
            });
            return out;
        }

        for section in sections {
            let division = division_number(section);

            let Some(body) = section.select(&TABLE_BODY).next() else {
                out.skip(Skip::DivisionWithoutBody { division });
                continue;
            };

            let rows: Vec<_> = body.select(&ROW).collect();
            if rows.is_empty() {
                out.skip(Skip::DivisionWithoutRows { division });
                continue;
            }

            for row in rows {
                out.record(assemble_standings_row(row, division));
            }
        }

        log::info!("Parsed {} standings rows", out.records.len());
        out
    }
}

/// Division number from the section heading ("Division 2" -> 2)
fn division_number(section: ElementRef<'_>) -> i32 {
    section
        .select(&HEADING)
        .next()
        .map(element_text)
        .and_then(|heading| first_digit_run(&heading).and_then(|digits| digits.parse().ok()))
        .unwrap_or(ERROR_INT)
}

fn assemble_standings_row(row: ElementRef<'_>, division: i32) -> Result<StandingsRow, Skip> {
    let cells: Vec<_> = row.select(&CELL).collect();
    if cells.len() < MIN_CELLS {
        return Err(Skip::ShortStandingsRow {
            division,
            cells: cells.len(),
        });
    }

    let stat = |i: usize| parse_int_or_error(&element_text(cells[i]));
    let colors = extract_colors(Some(cells[0]));

    Ok(StandingsRow {
        name: element_text(cells[1]),
        games_played: stat(2),
        wins: stat(3),
        losses: stat(4),
        draws: stat(5),
        goals_for: stat(6),
        goals_against: stat(7),
        goal_difference: stat(8),
        points: stat(9),
        division,
        primary_color: colors.primary,
        secondary_color: colors.secondary,
    })
}
