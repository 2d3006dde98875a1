//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::domain::{Coordinate, InterestCategory};

/// Trip Planner - walking routes through points of interest
#[derive(Parser)]
#[command(name = "tp", about = "Plan walking trips through points of interest", version)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List interest categories
    Interests,

    /// Fetch points of interest and build a walking route
    Plan {
        /// Interest category; repeat for several
        #[arg(short, long = "interest", value_name = "CATEGORY")]
        interests: Vec<InterestCategory>,

        /// Walking budget in minutes (30-480)
        #[arg(short, long)]
        minutes: Option<u32>,

        /// Start location as lat,lon
        #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true)]
        at: Option<Coordinate>,

        /// Do not start the route at the current location
        #[arg(long, conflicts_with = "at")]
        no_location: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Read lat,lon lines from stdin and print the trimmed path as you walk
        #[arg(long)]
        follow: bool,
    },
}

/// Output format for the plan command
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format '{}'. Use text or json", s)),
        }
    }
}

/// Where the log file is written
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tripplanner")
        .join("logs")
        .join("tripplanner.log")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_plan() {
        let cli = Cli::try_parse_from([
            "tp",
            "plan",
            "-i",
            "history",
            "--interest",
            "COFFEE",
            "--minutes",
            "90",
            "--at",
            "-33.86,151.2",
            "--format",
            "json",
        ])
        .unwrap();

        match cli.command {
            Some(Command::Plan {
                interests,
                minutes,
                at,
                no_location,
                format,
                follow,
            }) => {
                assert_eq!(interests, vec![InterestCategory::History, InterestCategory::Coffee]);
                assert_eq!(minutes, Some(90));
                assert_eq!(at, Some(Coordinate::new(-33.86, 151.2)));
                assert!(!no_location);
                assert_eq!(format, OutputFormat::Json);
                assert!(!follow);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_at_conflicts_with_no_location() {
        assert!(Cli::try_parse_from(["tp", "plan", "--at", "1,2", "--no-location"]).is_err());
    }

    #[test]
    fn test_unknown_interest_rejected() {
        assert!(Cli::try_parse_from(["tp", "plan", "-i", "museums"]).is_err());
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("TEXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
