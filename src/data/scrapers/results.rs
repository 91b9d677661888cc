//! Results page
//!
//! Finished games are grouped into one data table per game day. Each game
//! row nests a small table with one sub-row per team carrying the name,
//! shirt and final score.

use super::datetime::{compose_timestamp, parse_table_date};
use super::fields::{
    extract_location, extract_score, extract_team_colors, extract_team_label, extract_time_text,
};
use super::{
    selector, table_heading, Extraction, LeagueParser, PageKind, Skip, DATA_TABLE, GAME_ROW,
    TEAM_NAMES,
};
use crate::GameResult;
use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static TEAM_ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));

impl LeagueParser {
    /// Parse a results page, ignoring game days after today
    pub fn parse_results_page(&self, html: &str) -> Vec<GameResult> {
        self.parse_results_page_on(html, self.today())
    }

    /// Parse a results page as seen on `today`
    pub fn parse_results_page_on(&self, html: &str, today: NaiveDate) -> Vec<GameResult> {
        self.parse_results_report(html, today).into_records()
    }

    /// Parse a results page, keeping the reasons for every dropped table and row
    pub fn parse_results_report(&self, html: &str, today: NaiveDate) -> Extraction<GameResult> {
        let document = Html::parse_document(html);
        let mut out = Extraction::default();

        let tables: Vec<_> = document.select(&DATA_TABLE).collect();
        if tables.is_empty() {
            out.skip(Skip::NoStructuralUnits {
                kind: PageKind::Results,
            });
            return out;
        }

        for table in tables {
            let Some(heading) = table_heading(table) else {
                out.skip(Skip::TableWithoutDate);
                continue;
            };

            let date = match parse_table_date(&heading) {
                Ok(date) => date,
                Err(e) => {
                    out.skip(Skip::UnparsableTableDate {
                        heading,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if date > today {
                out.skip(Skip::FutureTable { heading });
                continue;
            }

            let rows: Vec<_> = table.select(&GAME_ROW).collect();
            if rows.is_empty() {
                out.skip(Skip::TableWithoutRows { heading });
                continue;
            }

            for row in rows {
                out.record(self.assemble_result(row, &heading));
            }
        }

        log::info!("Parsed {} results", out.records.len());
        out
    }

    fn assemble_result(&self, row: ElementRef<'_>, heading: &str) -> Result<GameResult, Skip> {
        let team_rows: Vec<_> = row.select(&TEAM_ROW).collect();
        if team_rows.len() < 2 {
            return Err(Skip::MissingTeamRows {
                found: team_rows.len(),
            });
        }
        let (home_row, away_row) = (team_rows[0], team_rows[1]);

        let (Some(home_cell), Some(away_cell)) = (
            home_row.select(&TEAM_NAMES).next(),
            away_row.select(&TEAM_NAMES).next(),
        ) else {
            let found = [home_row, away_row]
                .iter()
                .filter(|r| r.select(&TEAM_NAMES).next().is_some())
                .count();
            return Err(Skip::MissingTeamCells { found });
        };

        let home = extract_team_label(home_cell);
        let away = extract_team_label(away_cell);
        let (home_colors, away_colors) = extract_team_colors(row);

        let scores = (
            u32::try_from(extract_score(home_row)),
            u32::try_from(extract_score(away_row)),
        );
        let (Ok(home_score), Ok(away_score)) = scores else {
            return Err(Skip::Unscored {
                home: home.name,
                away: away.name,
            });
        };

        let (field_name, field_num) = extract_location(row);
        let time_text = extract_time_text(row);

        let game_time = match compose_timestamp(heading, &time_text, self.timezone) {
            Ok(game_time) => game_time,
            Err(e) => {
                return Err(Skip::BadTimestamp {
                    home: home.name,
                    away: away.name,
                    reason: e.to_string(),
                })
            }
        };

        Ok(GameResult {
            info: home.info.clone(),
            home_team: home.name,
            home_info: home.info,
            home_team_primary_color: home_colors.primary,
            home_team_secondary_color: home_colors.secondary,
            home_score,
            away_team: away.name,
            away_info: away.info,
            away_team_primary_color: away_colors.primary,
            away_team_secondary_color: away_colors.secondary,
            away_score,
            field_name,
            field_num,
            game_time,
        })
    }
}
