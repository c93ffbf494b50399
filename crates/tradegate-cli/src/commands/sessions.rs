//! Market session commands for CLI.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use serde::Serialize;
use tradegate_core::{Config, Event, Overlap, SessionBoard, SessionClock, SessionId};

#[derive(Subcommand)]
pub enum SessionsAction {
    /// Show which sessions are open and where they overlap
    Status {
        /// Evaluate at a specific instant (RFC 3339, e.g. 2024-03-04T07:30:00Z)
        #[arg(long)]
        at: Option<String>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the configured session windows
    Windows {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Re-evaluate on an interval, printing one tick per line
    Watch {
        /// Seconds between evaluations
        #[arg(long, default_value = "1")]
        interval_secs: u64,
        /// Stop after this many ticks (default: run until interrupted)
        #[arg(long)]
        ticks: Option<u64>,
        /// Print ticks as JSON events
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct StatusReport {
    hour_of_day: f64,
    sessions: Vec<SessionEntry>,
    overlaps: Vec<String>,
}

#[derive(Serialize)]
struct SessionEntry {
    name: &'static str,
    active: bool,
}

fn build_clock(config: &Config) -> Result<SessionClock, Box<dyn std::error::Error>> {
    Ok(SessionClock::new(
        &config.timezone,
        config.sessions.clone(),
    )?)
}

fn parse_instant(at: Option<&str>) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    match at {
        Some(s) => Ok(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}

fn report(board: &SessionBoard, overlaps: &[Overlap]) -> StatusReport {
    StatusReport {
        hour_of_day: board.hour_of_day,
        sessions: board
            .sessions
            .iter()
            .map(|s| SessionEntry {
                name: s.id.name(),
                active: s.active,
            })
            .collect(),
        overlaps: overlaps.iter().map(Overlap::label).collect(),
    }
}

fn print_board(board: &SessionBoard, overlaps: &[Overlap]) {
    for status in &board.sessions {
        let state = if status.active { "Open" } else { "Closed" };
        println!("{:<10} {}", status.id.name(), state);
    }
    if overlaps.is_empty() {
        println!("No session overlap");
    } else {
        let labels: Vec<String> = overlaps.iter().map(Overlap::label).collect();
        println!("{} Overlap - High Volatility", labels.join(" & "));
    }
}

pub fn run(action: SessionsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let clock = build_clock(&config)?;

    match action {
        SessionsAction::Status { at, json } => {
            let instant = parse_instant(at.as_deref())?;
            let board = clock.evaluate(instant);
            let overlaps = SessionClock::overlaps(&board);
            if json {
                println!("{}", serde_json::to_string_pretty(&report(&board, &overlaps))?);
            } else {
                print_board(&board, &overlaps);
            }
        }
        SessionsAction::Windows { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&config.sessions)?);
            } else {
                for id in SessionId::ALL {
                    let window = config.sessions.window(id);
                    let wrap = if window.wraps() { " (wraps midnight)" } else { "" };
                    println!(
                        "{:<10} {:>5.2} - {:>5.2}{}",
                        id.name(),
                        window.start_hour,
                        window.end_hour,
                        wrap
                    );
                }
            }
        }
        SessionsAction::Watch {
            interval_secs,
            ticks,
            json,
        } => {
            let mut tick: u64 = 0;
            loop {
                let at = Utc::now();
                let board = clock.evaluate(at);
                let overlaps = SessionClock::overlaps(&board);
                if json {
                    let event = Event::SessionTick {
                        hour_of_day: board.hour_of_day,
                        sessions: board.sessions.clone(),
                        overlaps: overlaps.clone(),
                        at,
                    };
                    println!("{}", serde_json::to_string(&event)?);
                } else {
                    let open: Vec<&str> = board
                        .sessions
                        .iter()
                        .filter(|s| s.active)
                        .map(|s| s.id.name())
                        .collect();
                    let labels: Vec<String> = overlaps.iter().map(Overlap::label).collect();
                    let heading = config
                        .plan
                        .rule_heading(tick as usize / 4)
                        .unwrap_or_default();
                    println!(
                        "{}  open: [{}]  overlap: [{}]  {}",
                        clock.local_time(at).format("%H:%M:%S"),
                        open.join(", "),
                        labels.join(", "),
                        heading
                    );
                }
                tick += 1;
                if let Some(limit) = ticks {
                    if tick >= limit {
                        break;
                    }
                }
                std::thread::sleep(std::time::Duration::from_secs(interval_secs));
            }
        }
    }
    Ok(())
}
