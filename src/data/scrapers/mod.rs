//! Page extractors for the league website
//!
//! One [`LeagueParser`] handles all three page types. Each page call walks the
//! page's repeating units, assembles one candidate record per unit and keeps
//! only the well-formed ones. Every discarded unit is recorded as a [`Skip`].

pub mod datetime;
pub mod fields;
pub mod results;
pub mod schedule;
pub mod standings;

use crate::{Fixture, GameResult, LeagueError, ParserConfig, Result, StandingsRow};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use scraper::{ElementRef, Selector};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Builds a selector from a literal known to be valid
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static CSS selector must parse")
}

pub(crate) static DATA_TABLE: LazyLock<Selector> =
    LazyLock::new(|| selector("table.generalDataTable"));
pub(crate) static DATE_TITLE: LazyLock<Selector> =
    LazyLock::new(|| selector("span.ui-column-title"));
pub(crate) static GAME_ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr.ui-widget-content"));
pub(crate) static TEAM_NAMES: LazyLock<Selector> = LazyLock::new(|| selector("td.teamNames"));
pub(crate) static TEAM_LOGOS: LazyLock<Selector> = LazyLock::new(|| selector("td.teamLogos"));

/// The three kinds of page the site publishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    Standings,
    Schedule,
    Results,
}

impl PageKind {
    /// Guess the page kind from a saved file's name
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let name = path.as_ref().file_stem()?.to_str()?.to_lowercase();

        if name.contains("result") {
            Some(PageKind::Results)
        } else if name.contains("schedule") || name.contains("fixture") {
            Some(PageKind::Schedule)
        } else if name.contains("standing") || name.contains("league") || name.contains("table") {
            Some(PageKind::Standings)
        } else {
            None
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            PageKind::Standings => "standings",
            PageKind::Schedule => "schedule",
            PageKind::Results => "results",
        })
    }
}

impl std::str::FromStr for PageKind {
    type Err = LeagueError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standings" | "league" | "table" => Ok(PageKind::Standings),
            "schedule" | "fixtures" => Ok(PageKind::Schedule),
            "results" => Ok(PageKind::Results),
            _ => Err(LeagueError::UnknownPageKind(s.to_string())),
        }
    }
}

/// Records extracted from one page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PageRecords {
    Standings(Vec<StandingsRow>),
    Schedule(Vec<Fixture>),
    Results(Vec<GameResult>),
}

impl PageRecords {
    pub fn kind(&self) -> PageKind {
        match self {
            PageRecords::Standings(_) => PageKind::Standings,
            PageRecords::Schedule(_) => PageKind::Schedule,
            PageRecords::Results(_) => PageKind::Results,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PageRecords::Standings(rows) => rows.len(),
            PageRecords::Schedule(fixtures) => fixtures.len(),
            PageRecords::Results(results) => results.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Why a unit of a page was dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Skip {
    NoStructuralUnits { kind: PageKind },
    DivisionWithoutBody { division: i32 },
    DivisionWithoutRows { division: i32 },
    ShortStandingsRow { division: i32, cells: usize },
    TableWithoutDate,
    UnparsableTableDate { heading: String, reason: String },
    FutureTable { heading: String },
    TableWithoutRows { heading: String },
    MissingTeamRows { found: usize },
    MissingTeamCells { found: usize },
    PlaceholderTeam { home: String, away: String },
    Unscored { home: String, away: String },
    BadTimestamp { home: String, away: String, reason: String },
}

impl Skip {
    /// Skips caused by the page layout rather than by game state
    pub fn is_structural(&self) -> bool {
        !matches!(
            self,
            Skip::FutureTable { .. } | Skip::PlaceholderTeam { .. } | Skip::Unscored { .. }
        )
    }
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Skip::NoStructuralUnits { kind } => {
                write!(f, "No {} units found on page", kind)
            }
            Skip::DivisionWithoutBody { division } => {
                write!(f, "Skipping division {}: no table body found", division)
            }
            Skip::DivisionWithoutRows { division } => {
                write!(f, "Skipping division {}: table body has no rows", division)
            }
            Skip::ShortStandingsRow { division, cells } => write!(
                f,
                "Skipping row in division {}: expected 10 cells, found {}",
                division, cells
            ),
            Skip::TableWithoutDate => write!(f, "Skipping table: no date title found"),
            Skip::UnparsableTableDate { heading, reason } => {
                write!(f, "Skipping table: could not parse date '{}': {}", heading, reason)
            }
            Skip::FutureTable { heading } => {
                write!(f, "Skipping table: date '{}' is in the future", heading)
            }
            Skip::TableWithoutRows { heading } => {
                write!(f, "Skipping table for {}: no game rows found", heading)
            }
            Skip::MissingTeamRows { found } => {
                write!(f, "Skipping row: expected 2 team rows, found {}", found)
            }
            Skip::MissingTeamCells { found } => {
                write!(f, "Skipping row: expected 2 team name cells, found {}", found)
            }
            Skip::PlaceholderTeam { home, away } => {
                write!(f, "Skipping row: teams not assigned ({} vs {})", home, away)
            }
            Skip::Unscored { home, away } => {
                write!(f, "Skipping game: final score not posted for {} vs {}", home, away)
            }
            Skip::BadTimestamp { home, away, reason } => {
                write!(f, "Skipping game {} vs {}: {}", home, away, reason)
            }
        }
    }
}

/// Kept records plus every skip decision, in page order
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction<T> {
    pub records: Vec<T>,
    pub skipped: Vec<Skip>,
}

impl<T> Default for Extraction<T> {
    fn default() -> Self {
        Extraction {
            records: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<T> Extraction<T> {
    pub(crate) fn skip(&mut self, reason: Skip) {
        if reason.is_structural() {
            log::warn!("{}", reason);
        } else {
            log::debug!("{}", reason);
        }
        self.skipped.push(reason);
    }

    /// Keep an assembled record or log why the candidate was dropped
    pub(crate) fn record(&mut self, candidate: std::result::Result<T, Skip>) {
        match candidate {
            Ok(record) => self.records.push(record),
            Err(reason) => self.skip(reason),
        }
    }

    pub fn into_records(self) -> Vec<T> {
        self.records
    }
}

/// Whitespace-normalized visible text of an element
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Closest enclosing element matching `selector`
pub fn nearest_ancestor<'a>(
    element: ElementRef<'a>,
    selector: &Selector,
) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| selector.matches(ancestor))
}

/// Text of a data table's date title, e.g. "Monday 14 July 2025"
pub(crate) fn table_heading(table: ElementRef<'_>) -> Option<String> {
    table
        .select(&DATE_TITLE)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

/// Extractor for the league site's standings, schedule and results pages
#[derive(Debug, Clone)]
pub struct LeagueParser {
    timezone: Tz,
    placeholder_team: String,
}

impl Default for LeagueParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LeagueParser {
    pub fn new() -> Self {
        LeagueParser {
            timezone: chrono_tz::America::New_York,
            placeholder_team: "TBD".to_string(),
        }
    }

    pub fn from_config(config: &ParserConfig) -> Result<Self> {
        let timezone: Tz = config
            .timezone
            .parse()
            .map_err(|_| LeagueError::UnknownTimezone(config.timezone.clone()))?;

        Ok(Self::new()
            .with_timezone(timezone)
            .with_placeholder(config.placeholder_team.clone()))
    }

    /// Set the timezone game times are written in
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    /// Set the team name used for unassigned schedule slots
    pub fn with_placeholder<S: Into<String>>(mut self, placeholder: S) -> Self {
        self.placeholder_team = placeholder.into();
        self
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Current date in the parser's timezone
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }

    /// Parse a page of a known kind
    pub fn parse_page(&self, kind: PageKind, html: &str) -> PageRecords {
        match kind {
            PageKind::Standings => PageRecords::Standings(self.parse_standings_page(html)),
            PageKind::Schedule => PageRecords::Schedule(self.parse_schedule_page(html)),
            PageKind::Results => PageRecords::Results(self.parse_results_page(html)),
        }
    }

    /// Parse a saved HTML file, guessing its kind from the name if not given
    pub fn parse_file<P: AsRef<Path>>(
        &self,
        path: P,
        kind: Option<PageKind>,
    ) -> Result<PageRecords> {
        let path = path.as_ref();
        let kind = match kind.or_else(|| PageKind::from_path(path)) {
            Some(kind) => kind,
            None => return Err(LeagueError::UnknownPageKind(path.display().to_string())),
        };

        let html = std::fs::read_to_string(path)?;
        Ok(self.parse_page(kind, &html))
    }

    /// Parse every recognisable HTML file in a directory, in file name order
    pub fn parse_directory<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<(PathBuf, PageRecords)>> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir.as_ref())? {
            let path = entry?.path();
            if path.extension().map(|e| e == "html").unwrap_or(false) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut pages = Vec::new();
        for path in paths {
            let Some(kind) = PageKind::from_path(&path) else {
                log::warn!("Cannot tell page kind of {}, skipping", path.display());
                continue;
            };

            log::info!("Parsing {} as {}", path.display(), kind);
            match self.parse_file(&path, Some(kind)) {
                Ok(records) => {
                    log::info!("  Found {} records", records.len());
                    pages.push((path, records));
                }
                Err(e) => log::warn!("  Failed: {}", e),
            }
        }

        Ok(pages)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Trimmed copies of the three page layouts

    pub const STANDINGS_PAGE: &str = r#"
<html><body>
<div class="section">
  <h3>Division 1</h3>
  <div class="ui-datatable">
    <table>
      <thead><tr><th></th><th>Team</th><th>GP</th><th>W</th><th>L</th><th>D</th><th>GF</th><th>GA</th><th>GD</th><th>PTS</th></tr></thead>
      <tbody class="ui-datatable-data">
        <tr class="ui-widget-content">
          <td class="teamLogos"><span class="shirt" style="--shirt-colour-1: #ff0000; --shirt-colour-2: #000000;"></span></td>
          <td>Lions</td><td>10</td><td>6</td><td>2</td><td>2</td><td>20</td><td>12</td><td>8</td><td>20</td>
        </tr>
        <tr class="ui-widget-content">
          <td class="teamLogos"><span class="shirt" style="--shirt-colour-1: navy;"></span></td>
          <td> Tigers </td><td>10</td><td>5</td><td>3</td><td>2</td><td>15</td><td>15</td><td>1</td><td>-</td>
        </tr>
        <tr class="ui-widget-content"><td colspan="10">No more teams</td></tr>
      </tbody>
    </table>
  </div>
</div>
<div class="section">
  <h3>Premier</h3>
  <table>
    <tbody class="ui-datatable-data">
      <tr>
        <td class="teamLogos"></td>
        <td>Bears</td><td>9</td><td>9</td><td>0</td><td>0</td><td>30</td><td>3</td><td>27</td><td>27</td>
      </tr>
    </tbody>
  </table>
</div>
<div class="section"><h3>Division 3</h3><p>Table coming soon</p></div>
<div class="section">
  <h3>Division 4</h3>
  <table><tbody class="ui-datatable-data"></tbody></table>
</div>
</body></html>
"#;

    pub const SCHEDULE_PAGE: &str = r#"
<html><body>
<table class="generalDataTable">
  <thead><tr><th colspan="6"><span class="ui-column-title">Monday 14 July 2025</span></th></tr></thead>
  <tbody>
    <tr class="ui-widget-content">
      <td class="teamLogos"><span style="--shirt-colour-1: red; --shirt-colour-2: black;"></span></td>
      <td class="teamNames"><span class="extraInfo">3rd Place Match</span> - Lions</td>
      <td>v</td>
      <td class="teamNames">Tigers</td>
      <td class="teamLogos"><span style="--shirt-colour-1: blue; --shirt-colour-2: white;"></span></td>
      <td><div>6:30pm</div><a class="ui-link ui-widget generalLink facilityLink" href="/facility/1">Central Park (3)</a></td>
    </tr>
    <tr class="ui-widget-content">
      <td class="teamLogos"><span></span></td>
      <td class="teamNames">TBD</td>
      <td>v</td>
      <td class="teamNames">Bears</td>
      <td class="teamLogos"><span></span></td>
      <td><div>8:00pm</div><a class="ui-link ui-widget generalLink facilityLink" href="/facility/1">Central Park (1)</a></td>
    </tr>
    <tr class="ui-widget-content">
      <td class="teamNames">Wolves</td>
      <td>8:30pm</td>
    </tr>
  </tbody>
</table>
<table class="generalDataTable">
  <thead><tr><th colspan="4"><span class="ui-column-title">Saturday 6 December 2025</span></th></tr></thead>
  <tbody>
    <tr class="ui-widget-content">
      <td class="teamNames">Bears</td>
      <td>v</td>
      <td class="teamNames">Wolves</td>
      <td><div>7:05 PM</div><a class="ui-link ui-widget generalLink facilityLink" href="/facility/2">Riverside Fields</a></td>
    </tr>
    <tr class="ui-widget-content">
      <td class="teamNames">Lions</td>
      <td>v</td>
      <td class="teamNames">Bears</td>
      <td><div>Time to be confirmed</div></td>
    </tr>
  </tbody>
</table>
<table class="generalDataTable">
  <tbody>
    <tr class="ui-widget-content">
      <td class="teamNames">Tigers</td>
      <td class="teamNames">Wolves</td>
      <td>9:00am</td>
    </tr>
  </tbody>
</table>
</body></html>
"#;

    pub const RESULTS_PAGE: &str = r#"
<html><body>
<table class="generalDataTable">
  <thead><tr><th colspan="2"><span class="ui-column-title">Monday 14 July 2025</span></th></tr></thead>
  <tbody>
    <tr class="ui-widget-content">
      <td>
        <table class="gameTeams">
          <tr>
            <td class="teamLogos"><span style="--shirt-colour-1: red; --shirt-colour-2: black;"></span></td>
            <td class="teamNames"><span class="extraInfo">Final</span> - Lions</td>
            <td class="teamScores">3</td>
          </tr>
          <tr>
            <td class="teamLogos"><span style="--shirt-colour-1: blue; --shirt-colour-2: white;"></span></td>
            <td class="teamNames">Tigers</td>
            <td class="teamScores">1</td>
          </tr>
        </table>
      </td>
      <td><span>6:30 pm</span><a class="ui-link ui-widget generalLink facilityLink" href="/facility/1">Central Park (3)</a></td>
    </tr>
    <tr class="ui-widget-content">
      <td>
        <table class="gameTeams">
          <tr><td class="teamNames">Bears</td><td class="teamScores">2</td></tr>
          <tr><td class="teamNames">Wolves</td><td class="teamScores"></td></tr>
        </table>
      </td>
      <td><span>8:00pm</span><a class="ui-link ui-widget generalLink facilityLink" href="/facility/1">Central Park (1)</a></td>
    </tr>
    <tr class="ui-widget-content">
      <td>
        <table class="gameTeams">
          <tr><td class="teamNames">Eagles</td><td class="teamScores">4</td></tr>
        </table>
      </td>
      <td><span>9:00pm</span></td>
    </tr>
  </tbody>
</table>
<table class="generalDataTable">
  <thead><tr><th colspan="2"><span class="ui-column-title">Monday 21 July 2025</span></th></tr></thead>
  <tbody>
    <tr class="ui-widget-content">
      <td>
        <table class="gameTeams">
          <tr><td class="teamNames">Lions</td><td class="teamScores">0</td></tr>
          <tr><td class="teamNames">Bears</td><td class="teamScores">0</td></tr>
        </table>
      </td>
      <td><span>6:30pm</span></td>
    </tr>
  </tbody>
</table>
<table class="generalDataTable">
  <thead><tr><th><span class="ui-column-title">Someday 99 Smarch 2025</span></th></tr></thead>
  <tbody><tr class="ui-widget-content"><td>ignored</td></tr></tbody>
</table>
<table class="generalDataTable">
  <tbody><tr class="ui-widget-content"><td>no heading</td></tr></tbody>
</table>
<table class="generalDataTable">
  <thead><tr><th><span class="ui-column-title">Monday 13 January 2025</span></th></tr></thead>
  <tbody><tr><td>No records found.</td></tr></tbody>
</table>
</body></html>
"#;
}
