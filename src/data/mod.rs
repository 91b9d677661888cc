//! Data ingestion
//!
//! Page extractors for the league website's standings, schedule and results pages.

pub mod scrapers;

pub use scrapers::LeagueParser;
