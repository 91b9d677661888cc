//! League page extraction CLI
//!
//! Turns saved standings, schedule and results pages into JSON records.

use clap::{Parser, Subcommand};
use league::{Config, LeagueParser, PageKind, Result};

#[derive(Parser)]
#[command(name = "league")]
#[command(about = "Extract standings, fixtures and results from league website pages", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one saved page and print its records
    Parse {
        /// HTML file to parse
        file: String,
        /// Page kind (standings, schedule, results); guessed from the file name if omitted
        #[arg(long)]
        kind: Option<PageKind>,
        /// Output format
        #[arg(long, default_value = "json")]
        format: OutputFormat,
    },
    /// Parse every saved page in a directory into JSON files
    ParseCache {
        /// Directory containing cached HTML files
        dir: String,
        /// Directory to write JSON into (defaults to the cache directory)
        #[arg(long)]
        out: Option<String>,
    },
    /// Write a default config file
    Init,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use table or json.", s)),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    let result = match cli.command {
        Commands::Parse { file, kind, format } => commands::parse(&config, &file, kind, format),
        Commands::ParseCache { dir, out } => commands::parse_cache(&config, &dir, out.as_deref()),
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use league::PageRecords;
    use std::path::Path;

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        println!("\nNext steps:");
        println!("  1. Edit {} to set the league timezone", config_path);
        println!("  2. Run 'league parse <FILE>' on a saved page");
        println!("  3. Run 'league parse-cache <DIR>' to convert a folder of pages");

        Ok(())
    }

    pub fn parse(
        config: &Config,
        file: &str,
        kind: Option<PageKind>,
        format: OutputFormat,
    ) -> Result<()> {
        let parser = LeagueParser::from_config(&config.parser)?;
        let records = parser.parse_file(file, kind)?;

        match format {
            OutputFormat::Json => println!("{}", to_json(config, &records)?),
            OutputFormat::Table => print!("{}", format_table(&records)),
        }

        Ok(())
    }

    pub fn parse_cache(config: &Config, dir: &str, out: Option<&str>) -> Result<()> {
        let parser = LeagueParser::from_config(&config.parser)?;
        let out_dir = Path::new(out.unwrap_or(dir));
        std::fs::create_dir_all(out_dir)?;

        println!("Parsing cached HTML files from {}...", dir);
        let pages = parser.parse_directory(dir)?;

        if pages.is_empty() {
            println!(
                "No league pages found. File names must mention standings, schedule or results."
            );
            return Ok(());
        }

        let mut total = 0;
        for (path, records) in &pages {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| records.kind().to_string());
            let target = out_dir.join(format!("{}.json", stem));

            std::fs::write(&target, to_json(config, records)?)?;
            println!(
                "  {:<30} {:>10} {:>5} -> {}",
                path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default(),
                records.kind(),
                records.len(),
                target.display()
            );
            total += records.len();
        }

        println!("\nWrote {} records from {} pages", total, pages.len());
        Ok(())
    }

    fn to_json(config: &Config, records: &PageRecords) -> Result<String> {
        let json = if config.output.pretty {
            serde_json::to_string_pretty(records)?
        } else {
            serde_json::to_string(records)?
        };
        Ok(json)
    }

    fn format_table(records: &PageRecords) -> String {
        let mut out = String::new();

        match records {
            PageRecords::Standings(rows) => {
                out.push_str(&format!(
                    "{:>3}  {:<24} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>4} {:>4}\n",
                    "Div", "Team", "GP", "W", "L", "D", "GF", "GA", "GD", "Pts"
                ));
                out.push_str(&format!("{}\n", "-".repeat(66)));
                for row in rows {
                    out.push_str(&format!(
                        "{:>3}  {:<24} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>4} {:>4}\n",
                        row.division,
                        row.name,
                        row.games_played,
                        row.wins,
                        row.losses,
                        row.draws,
                        row.goals_for,
                        row.goals_against,
                        row.goal_difference,
                        row.points
                    ));
                }
            }
            PageRecords::Schedule(fixtures) => {
                out.push_str(&format!(
                    "{:<26} {:<20} {:<20} {}\n",
                    "Kick-off", "Home", "Away", "Field"
                ));
                out.push_str(&format!("{}\n", "-".repeat(80)));
                for f in fixtures {
                    out.push_str(&format!(
                        "{:<26} {:<20} {:<20} {} ({})\n",
                        f.game_time.to_rfc3339(),
                        f.home_team,
                        f.away_team,
                        f.field_name,
                        f.field_num
                    ));
                }
            }
            PageRecords::Results(results) => {
                out.push_str(&format!(
                    "{:<26} {:<20} {:>5}  {:<20} {}\n",
                    "Kick-off", "Home", "Score", "Away", "Field"
                ));
                out.push_str(&format!("{}\n", "-".repeat(86)));
                for r in results {
                    out.push_str(&format!(
                        "{:<26} {:<20} {:>2}-{:<2}  {:<20} {} ({})\n",
                        r.game_time.to_rfc3339(),
                        r.home_team,
                        r.home_score,
                        r.away_score,
                        r.away_team,
                        r.field_name,
                        r.field_num
                    ));
                }
            }
        }

        out.push_str(&format!("\n{} {} records\n", records.len(), records.kind()));
        out
    }
}
