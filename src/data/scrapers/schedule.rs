//! Schedule page
//!
//! Upcoming games are `tr.ui-widget-content` rows spread over one data
//! table per game day. Rows are collected page-wide and each one looks up
//! the date heading of the table that owns it.

use super::datetime::compose_timestamp;
use super::fields::{
    extract_location, extract_team_colors, extract_team_label, extract_time_text,
};
use super::{
    nearest_ancestor, table_heading, Extraction, LeagueParser, PageKind, Skip, DATA_TABLE,
    GAME_ROW, TEAM_NAMES,
};
use crate::{Fixture, UNKNOWN_STR};
use scraper::{ElementRef, Html};

impl LeagueParser {
    /// Parse a schedule page into fixtures
    pub fn parse_schedule_page(&self, html: &str) -> Vec<Fixture> {
        self.parse_schedule_report(html).into_records()
    }

    /// Parse a schedule page, keeping the reasons for every dropped row
    pub fn parse_schedule_report(&self, html: &str) -> Extraction<Fixture> {
        let document = Html::parse_document(html);
        let mut out = Extraction::default();

        let rows: Vec<_> = document.select(&GAME_ROW).collect();
        if rows.is_empty() {
            out.skip(Skip::NoStructuralUnits {
                kind: PageKind::Schedule,
            });
            return out;
        }

        for row in rows {
            out.record(self.assemble_fixture(row));
        }

        log::info!("Parsed {} fixtures", out.records.len());
        out
    }

    fn assemble_fixture(&self, row: ElementRef<'_>) -> Result<Fixture, Skip> {
        let date_text = owning_date_heading(row).unwrap_or_else(|| UNKNOWN_STR.to_string());

        let name_cells: Vec<_> = row.select(&TEAM_NAMES).collect();
        if name_cells.len() < 2 {
            return Err(Skip::MissingTeamCells {
                found: name_cells.len(),
            });
        }

        let home = extract_team_label(name_cells[0]);
        let away = extract_team_label(name_cells[1]);
        if home.name == self.placeholder_team || away.name == self.placeholder_team {
            return Err(Skip::PlaceholderTeam {
                home: home.name,
                away: away.name,
            });
        }

        let (home_colors, away_colors) = extract_team_colors(row);
        let (field_name, field_num) = extract_location(row);
        let time_text = extract_time_text(row);

        let game_time = match compose_timestamp(&date_text, &time_text, self.timezone) {
            Ok(game_time) => game_time,
            Err(e) => {
                return Err(Skip::BadTimestamp {
                    home: home.name,
                    away: away.name,
                    reason: e.to_string(),
                })
            }
        };

        Ok(Fixture {
            info: home.info.clone(),
            home_team: home.name,
            home_info: home.info,
            home_team_primary_color: home_colors.primary,
            home_team_secondary_color: home_colors.secondary,
            home_score: None,
            away_team: away.name,
            away_info: away.info,
            away_team_primary_color: away_colors.primary,
            away_team_secondary_color: away_colors.secondary,
            away_score: None,
            field_name,
            field_num,
            game_time,
        })
    }
}

/// Date heading of the data table a row sits in
fn owning_date_heading(row: ElementRef<'_>) -> Option<String> {
    nearest_ancestor(row, &DATA_TABLE).and_then(table_heading)
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::SCHEDULE_PAGE;
    use super::*;
    use crate::FieldNumber;

    #[test]
    fn test_parses_fixtures() {
        let fixtures = LeagueParser::new().parse_schedule_page(SCHEDULE_PAGE);
        assert_eq!(fixtures.len(), 2);

        let first = &fixtures[0];
        assert_eq!(first.home_team, "Lions");
        assert_eq!(first.home_info.as_deref(), Some("3rd Place Match"));
        assert_eq!(first.info, first.home_info);
        assert_eq!(first.away_team, "Tigers");
        assert_eq!(first.away_info, None);
        assert_eq!(first.home_team_primary_color, "red");
        assert_eq!(first.home_team_secondary_color, "black");
        assert_eq!(first.away_team_primary_color, "blue");
        assert_eq!(first.away_team_secondary_color, "white");
        assert_eq!(first.field_name, "Central Park");
        assert_eq!(first.field_num, FieldNumber::Number(3));
        assert_eq!(first.game_time.to_rfc3339(), "2025-07-14T18:30:00-04:00");
        assert_eq!(first.home_score, None);
        assert_eq!(first.away_score, None);
    }

    #[test]
    fn test_fixture_without_logos_or_field_number() {
        let fixtures = LeagueParser::new().parse_schedule_page(SCHEDULE_PAGE);
        let second = &fixtures[1];

        assert_eq!(second.home_team, "Bears");
        assert_eq!(second.away_team, "Wolves");
        assert_eq!(second.home_team_primary_color, UNKNOWN_STR);
        assert_eq!(second.away_team_secondary_color, UNKNOWN_STR);
        assert_eq!(second.field_name, "Riverside Fields");
        assert_eq!(second.field_num, FieldNumber::Unknown);
        assert_eq!(second.game_time.to_rfc3339(), "2025-12-06T19:05:00-05:00");
    }

    #[test]
    fn test_fixture_json_carries_info_key() {
        let fixtures = LeagueParser::new().parse_schedule_page(SCHEDULE_PAGE);

        let labelled = serde_json::to_value(&fixtures[0]).unwrap();
        assert_eq!(labelled["info"], "3rd Place Match");
        assert_eq!(labelled["homeInfo"], "3rd Place Match");
        assert!(labelled["awayInfo"].is_null());

        let plain = serde_json::to_value(&fixtures[1]).unwrap();
        assert!(plain.get("info").is_some());
        assert!(plain["info"].is_null());
    }

    #[test]
    fn test_placeholder_team_is_excluded() {
        let report = LeagueParser::new().parse_schedule_report(SCHEDULE_PAGE);
        assert!(report
            .records
            .iter()
            .all(|f| f.home_team != "TBD" && f.away_team != "TBD"));
        assert!(report.skipped.contains(&Skip::PlaceholderTeam {
            home: "TBD".to_string(),
            away: "Bears".to_string(),
        }));
    }

    #[test]
    fn test_skip_reasons_in_page_order() {
        let report = LeagueParser::new().parse_schedule_report(SCHEDULE_PAGE);
        assert_eq!(report.skipped.len(), 4);
        assert!(matches!(report.skipped[0], Skip::PlaceholderTeam { .. }));
        assert_eq!(report.skipped[1], Skip::MissingTeamCells { found: 1 });

        // No time in the row
        match &report.skipped[2] {
            Skip::BadTimestamp { home, away, .. } => {
                assert_eq!((home.as_str(), away.as_str()), ("Lions", "Bears"))
            }
            other => panic!("unexpected skip {:?}", other),
        }
        // No date heading on the table
        match &report.skipped[3] {
            Skip::BadTimestamp { home, reason, .. } => {
                assert_eq!(home, "Tigers");
                assert!(reason.contains("Unknown"));
            }
            other => panic!("unexpected skip {:?}", other),
        }
    }

    #[test]
    fn test_custom_placeholder() {
        let parser = LeagueParser::new().with_placeholder("Bears");
        let fixtures = parser.parse_schedule_page(SCHEDULE_PAGE);

        // Every row naming Bears is dropped
        assert_eq!(fixtures.len(), 1);
        assert_eq!(fixtures[0].home_team, "Lions");
    }

    #[test]
    fn test_row_outside_data_table() {
        let html = r#"<table><tr class="ui-widget-content">
            <td class="teamNames">Lions</td><td class="teamNames">Tigers</td><td>6:30pm</td>
        </tr></table>"#;
        let report = LeagueParser::new().parse_schedule_report(html);
        assert!(report.records.is_empty());
        assert!(matches!(report.skipped[0], Skip::BadTimestamp { .. }));
    }
}
