//! Checklist commands for CLI.
//!
//! The CLI is the host: it loads the persisted state into the gate,
//! applies one operation, persists the snapshot after every accepted
//! mutation, and renders the returned events. Persistence failures are
//! warnings, never blockers -- the in-memory result still prints.

use clap::Subcommand;
use tradegate_core::storage::StateStore;
use tradegate_core::{ChecklistError, ChecklistGate, Config, Event, ToggleOutcome};

#[derive(Subcommand)]
pub enum CheckAction {
    /// List tasks with their completion marks
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a task complete (gated on its predecessor)
    Done {
        /// Zero-based task index
        index: usize,
    },
    /// Unmark a task (always permitted, later marks stay)
    Undo {
        /// Zero-based task index
        index: usize,
    },
    /// Print completion progress
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Uncheck every task
    Reset,
    /// Check every task, bypassing the ordering gate
    All,
}

/// Open the state store, degrading to no persistence on failure.
fn open_store() -> Option<StateStore> {
    match StateStore::open() {
        Ok(store) => Some(store),
        Err(e) => {
            eprintln!("warning: state store unavailable, running in-memory: {e}");
            None
        }
    }
}

/// Load the gate from the store, falling back to all-false on a
/// missing, stale or unreadable record.
fn load_gate(store: Option<&StateStore>, len: usize) -> ChecklistGate {
    if let Some(store) = store {
        match store.load_checklist(len) {
            Ok(Some(state)) => return ChecklistGate::from_state(state),
            Ok(None) => {}
            Err(e) => eprintln!("warning: failed to load state: {e}"),
        }
    }
    ChecklistGate::new(len)
}

fn save_gate(store: Option<&StateStore>, gate: &ChecklistGate) {
    if let Some(store) = store {
        if let Err(e) = store.save_checklist(gate.state()) {
            eprintln!("warning: failed to save state: {e}");
        }
    }
}

fn print_outcome(outcome: &ToggleOutcome) {
    let p = &outcome.progress;
    println!(
        "{}/{} tasks complete ({}%) - {}",
        p.completed, p.total, p.percentage, p.status
    );
    for event in &outcome.events {
        match event {
            Event::ChecklistCompleted { .. } => {
                println!("All tasks complete. Stick to the plan.");
            }
            Event::ChecklistReopened { .. } => {
                println!("Checklist reopened.");
            }
            _ => {}
        }
    }
}

pub fn run(action: CheckAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let store = open_store();
    let mut gate = load_gate(store.as_ref(), config.plan.len());

    match action {
        CheckAction::List { json } => {
            let tasks = gate.tasks(&config.plan);
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else {
                for task in &tasks {
                    let mark = if task.done { "x" } else { " " };
                    println!("[{}] {:2}  {}", mark, task.index, task.label);
                }
                let p = gate.progress();
                println!("{}/{} complete ({}%)", p.completed, p.total, p.percentage);
            }
        }
        CheckAction::Done { index } => match gate.toggle(index, true) {
            Ok(outcome) => {
                save_gate(store.as_ref(), &gate);
                print_outcome(&outcome);
            }
            Err(e @ ChecklistError::OutOfOrder { index }) => {
                eprintln!("{e}");
                eprintln!("complete task {} first", index - 1);
                std::process::exit(1);
            }
            Err(e) => return Err(e.into()),
        },
        CheckAction::Undo { index } => {
            let outcome = gate.toggle(index, false)?;
            save_gate(store.as_ref(), &gate);
            print_outcome(&outcome);
        }
        CheckAction::Status { json } => {
            let progress = gate.progress();
            if json {
                println!("{}", serde_json::to_string_pretty(&progress)?);
            } else {
                println!(
                    "{}/{} tasks complete ({}%) - {}",
                    progress.completed, progress.total, progress.percentage, progress.status
                );
            }
        }
        CheckAction::Reset => {
            let outcome = gate.reset_all();
            save_gate(store.as_ref(), &gate);
            print_outcome(&outcome);
        }
        CheckAction::All => {
            let outcome = gate.check_all_force();
            save_gate(store.as_ref(), &gate);
            print_outcome(&outcome);
        }
    }
    Ok(())
}
