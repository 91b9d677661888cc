//! League page extraction
//!
//! Turns the standings, schedule and results pages of a league website into
//! normalized records. Every extractor is fail-soft: a bad cell becomes a
//! sentinel, a bad row or table is skipped, and a page call never errors.

pub mod data;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

pub use data::scrapers::{Extraction, LeagueParser, PageKind, PageRecords, Skip};

/// Placeholder for any string field that could not be resolved
pub const UNKNOWN_STR: &str = "Unknown";

/// Placeholder for any integer field that could not be resolved
pub const ERROR_INT: i32 = -1;

/// Primary and secondary shirt colours of a team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShirtColors {
    pub primary: String,
    pub secondary: String,
}

impl Default for ShirtColors {
    fn default() -> Self {
        ShirtColors {
            primary: UNKNOWN_STR.to_string(),
            secondary: UNKNOWN_STR.to_string(),
        }
    }
}

/// Team name cell split into the name and an optional slot label
/// such as "3rd Place Match"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamLabel {
    pub name: String,
    pub info: Option<String>,
}

/// Field number from a `"<name> (<number>)"` location link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldNumber {
    Number(u32),
    Unknown,
}

impl FieldNumber {
    pub fn number(&self) -> Option<u32> {
        match self {
            FieldNumber::Number(n) => Some(*n),
            FieldNumber::Unknown => None,
        }
    }
}

impl fmt::Display for FieldNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldNumber::Number(n) => write!(f, "{}", n),
            FieldNumber::Unknown => write!(f, "{}", UNKNOWN_STR),
        }
    }
}

// Serialized as a bare integer, or the "Unknown" sentinel string.
impl Serialize for FieldNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            FieldNumber::Number(n) => serializer.serialize_u32(*n),
            FieldNumber::Unknown => serializer.serialize_str(UNKNOWN_STR),
        }
    }
}

impl<'de> Deserialize<'de> for FieldNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(u32),
            Text(String),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Number(n) => FieldNumber::Number(n),
            Repr::Text(s) => s
                .trim()
                .parse()
                .map(FieldNumber::Number)
                .unwrap_or(FieldNumber::Unknown),
        })
    }
}

/// One team's line in a division table
///
/// Numbers are exactly what the page displays; `-1` marks a cell that
/// was not an integer. Goal difference is never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub name: String,
    #[serde(rename = "gp")]
    pub games_played: i32,
    #[serde(rename = "w")]
    pub wins: i32,
    #[serde(rename = "l")]
    pub losses: i32,
    #[serde(rename = "d")]
    pub draws: i32,
    #[serde(rename = "gf")]
    pub goals_for: i32,
    #[serde(rename = "ga")]
    pub goals_against: i32,
    #[serde(rename = "gd")]
    pub goal_difference: i32,
    #[serde(rename = "pts")]
    pub points: i32,
    #[serde(rename = "div")]
    pub division: i32,
    #[serde(rename = "primaryColor")]
    pub primary_color: String,
    #[serde(rename = "secondaryColor")]
    pub secondary_color: String,
}

/// A scheduled game that has not been played
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    pub home_team: String,
    pub home_info: Option<String>,
    pub home_team_primary_color: String,
    pub home_team_secondary_color: String,
    /// Always `None`; serialized as `null`
    pub home_score: Option<u32>,
    pub away_team: String,
    pub away_info: Option<String>,
    pub away_team_primary_color: String,
    pub away_team_secondary_color: String,
    /// Always `None`; serialized as `null`
    pub away_score: Option<u32>,
    pub field_name: String,
    pub field_num: FieldNumber,
    pub game_time: DateTime<FixedOffset>,
    /// Copy of `home_info` under the key the ingestion API reads
    pub info: Option<String>,
}

/// A completed game with both scores posted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub home_team: String,
    pub home_info: Option<String>,
    pub home_team_primary_color: String,
    pub home_team_secondary_color: String,
    pub home_score: u32,
    pub away_team: String,
    pub away_info: Option<String>,
    pub away_team_primary_color: String,
    pub away_team_secondary_color: String,
    pub away_score: u32,
    pub field_name: String,
    pub field_num: FieldNumber,
    pub game_time: DateTime<FixedOffset>,
    /// Copy of `home_info` under the key the ingestion API reads
    pub info: Option<String>,
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum LeagueError {
    #[error("Cannot parse timestamp '{input}': {source}")]
    Timestamp {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Date '{input}' does not match '<Weekday> <day> <Month> <year>'")]
    DateLayout { input: String },

    #[error("Local time {local} does not exist in {timezone}")]
    NonexistentLocalTime { local: String, timezone: String },

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("Unknown page kind: {0}")]
    UnknownPageKind(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LeagueError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// IANA name of the timezone game times are written in
    pub timezone: String,
    /// Team name the site shows for a slot that is not assigned yet
    pub placeholder_team: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub pretty: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            timezone: "America/New_York".to_string(),
            placeholder_team: "TBD".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig { pretty: true }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LeagueError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| LeagueError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| LeagueError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
