//! Trip Planner - walking routes through points of interest
//!
//! CLI entry point.

use std::collections::BTreeSet;
use std::fs;
use std::sync::Arc;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use eyre::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use tripplanner::cli::{Cli, Command, OutputFormat, get_log_path};
use tripplanner::config::Config;
use tripplanner::domain::{Coordinate, InterestCategory, TripPhase, TripState};
use tripplanner::location::SharedLocation;
use tripplanner::planner::{PlannerEvent, PlannerServices, TripPlanner};
use tripplanner::poi::HttpPoiClient;
use tripplanner::routing::{OsrmRoutingClient, RouteOptions};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Priority: CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level).map(|s| s.to_uppercase()) {
        Some(s) => match s.as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        None => {
            debug!("main: no command, printing help");
            Cli::command().print_help()?;
            Ok(())
        }
        Some(Command::Interests) => {
            debug!("main: matched Interests command");
            cmd_interests();
            Ok(())
        }
        Some(Command::Plan {
            interests,
            minutes,
            at,
            no_location,
            format,
            follow,
        }) => {
            debug!(?interests, ?minutes, ?at, no_location, ?format, follow, "main: matched Plan command");
            let use_location = if no_location {
                false
            } else {
                at.is_some() || follow || config.planner.use_location
            };
            cmd_plan(&config, interests, minutes, at, use_location, format, follow).await
        }
    }
}

fn cmd_interests() {
    println!("{}", "Interest categories:".bold());
    for category in InterestCategory::ALL {
        println!("  {:<14} {}", category.tag().cyan(), category.display_name());
    }
}

async fn cmd_plan(
    config: &Config,
    interests: Vec<InterestCategory>,
    minutes: Option<u32>,
    at: Option<Coordinate>,
    use_location: bool,
    format: OutputFormat,
    follow: bool,
) -> Result<()> {
    debug!("cmd_plan: called");
    let location = SharedLocation::new(at);

    let services = PlannerServices {
        poi: Arc::new(HttpPoiClient::from_config(&config.poi_service)?),
        routing: Arc::new(OsrmRoutingClient::from_config(&config.routing)?),
        location: Arc::new(location.clone()),
        route_options: RouteOptions {
            avoid_steep: config.routing.avoid_steep,
            avoid_stairs: config.routing.avoid_stairs,
            ..Default::default()
        },
    };
    let planner = TripPlanner::spawn(config.planner.clone(), services);

    planner
        .update_selected_interests(interests.into_iter().collect::<BTreeSet<_>>())
        .await?;
    if let Some(minutes) = minutes {
        planner.update_walking_time(minutes).await?;
    }
    planner.update_use_location(use_location).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    if follow && use_location && at.is_none() {
        println!("{}", "Waiting for a first position on stdin (lat,lon)...".dimmed());
        match lines.next_line().await? {
            Some(line) => location.set(parse_position(&line)?),
            None => warn!("cmd_plan: stdin closed before a position arrived"),
        }
    }

    planner.request_trip().await?;
    let state = planner
        .wait_until(|s| matches!(s.phase, TripPhase::RouteReady | TripPhase::Error))
        .await?;

    if let Some(message) = state.error.as_deref() {
        planner.shutdown().await?;
        return Err(eyre::eyre!("{}", message));
    }

    match format {
        OutputFormat::Text => print_trip(&state),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&state)?),
    }

    if follow {
        follow_path(&planner, &location, &mut lines).await?;
    }

    planner.clear_trip().await?;
    planner.shutdown().await?;
    info!("cmd_plan: done");
    Ok(())
}

fn parse_position(line: &str) -> Result<Coordinate> {
    line.trim()
        .parse::<Coordinate>()
        .with_context(|| format!("Invalid position '{}', expected lat,lon", line.trim()))
}

/// Feed stdin positions to the location source until EOF, printing trimmed paths
async fn follow_path<R>(
    planner: &TripPlanner,
    location: &SharedLocation,
    lines: &mut tokio::io::Lines<R>,
) -> Result<()>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    debug!("follow_path: called");
    let mut events = planner.subscribe_events();
    println!("{}", "Following; enter lat,lon per line, Ctrl-D to stop".dimmed());

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => match parse_position(&line) {
                        Ok(here) => location.set(here),
                        Err(e) => eprintln!("{} {}", "warning:".yellow(), e),
                    },
                    None => {
                        debug!("follow_path: stdin closed");
                        break;
                    }
                }
            }
            event = events.recv() => {
                match event {
                    Ok(PlannerEvent::PathTrimmed { remaining, .. }) => {
                        println!("{} {} points remaining", "path:".green(), remaining);
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(n)) => debug!(n, "follow_path: lagged"),
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }
    Ok(())
}

fn print_trip(state: &TripState) {
    if !state.explanation.is_empty() {
        println!("{}\n", state.explanation.italic());
    }
    for (i, poi) in state.pois.iter().enumerate() {
        let leg = match (&poi.time, &poi.distance) {
            (Some(time), Some(distance)) => format!(" ({}, {} m)", time, distance),
            _ => String::new(),
        };
        println!("{:>2}. {}{}", i + 1, poi.title.bold(), leg.dimmed());
        if !poi.address.is_empty() {
            println!("    {}", poi.address);
        }
    }
    if state.has_route() {
        let points = state.path_geometry.as_ref().map_or(0, Vec::len);
        println!("\n{} {} points", "route:".green(), points);
    } else {
        println!("\n{}", "no route".yellow());
    }
}
