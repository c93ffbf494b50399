//! Reference-zone clock face for CLI.

use chrono::{Timelike, Utc};
use clap::Subcommand;
use tradegate_core::{Config, SessionClock};

#[derive(Subcommand)]
pub enum ClockAction {
    /// Print the current time and date in the reference zone
    Show,
    /// Print the rotated rule headings
    Rules,
}

pub fn run(action: ClockAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    match action {
        ClockAction::Show => {
            let clock = SessionClock::new(&config.timezone, config.sessions.clone())?;
            let local = clock.local_time(Utc::now());
            // Heading rotates with the minute; the cadence is the
            // host's choice, not the core's.
            let rotation = local.minute() as usize;
            if let Some(heading) = config.plan.rule_heading(rotation) {
                println!("{heading}");
            }
            println!("{}", local.format("%H:%M:%S %Z"));
            println!("{}", local.format("%A, %B %-d, %Y"));
        }
        ClockAction::Rules => {
            for rule in &config.plan.rules {
                println!("{rule}");
            }
        }
    }
    Ok(())
}
