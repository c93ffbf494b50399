//! Checklist gate implementation.
//!
//! The gate is a sequential state machine over a fixed-length row of
//! done flags. It enforces strict left-to-right completion: a task can
//! only be checked once its predecessor is checked. Unchecking is
//! always permitted and does not cascade to later tasks -- the
//! procedure gates forward progress only, so a user can correct an
//! earlier mistake without losing later marks. This asymmetry is
//! deliberate and covered by tests.
//!
//! The gate performs no IO. The host persists the returned state after
//! each accepted mutation and renders the returned events.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::plan::{Task, TradingPlan};
use crate::error::ChecklistError;
use crate::events::Event;

/// Derived checklist status, one of three coarse phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistStatus {
    NotStarted,
    InProgress,
    Complete,
}

impl std::fmt::Display for ChecklistStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ChecklistStatus::NotStarted => "Not Started",
            ChecklistStatus::InProgress => "In Progress",
            ChecklistStatus::Complete => "Complete",
        };
        f.write_str(s)
    }
}

/// Completion metrics derived from the current state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    /// 0-100, rounded to the nearest integer.
    pub percentage: u8,
    pub status: ChecklistStatus,
}

/// The persisted record: one done flag per task, in procedure order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistState {
    pub checked: Vec<bool>,
}

impl ChecklistState {
    /// All-false state for a procedure of `len` tasks.
    pub fn new(len: usize) -> Self {
        Self {
            checked: vec![false; len],
        }
    }

    pub fn len(&self) -> usize {
        self.checked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checked.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.checked.iter().filter(|&&c| c).count()
    }
}

/// Result of an accepted mutation: fresh metrics plus the transition
/// events the host should render.
#[derive(Debug, Clone)]
pub struct ToggleOutcome {
    pub progress: Progress,
    pub events: Vec<Event>,
}

/// Sequential task gate.
///
/// Owns the checklist state and the one-shot completion latch. All
/// mutations go through [`toggle`](Self::toggle) or the explicit bulk
/// operations; rejected toggles leave the state untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistGate {
    state: ChecklistState,
    /// Set when the completion event has fired; cleared when the
    /// checklist drops below 100% again.
    #[serde(default)]
    completion_latched: bool,
}

impl ChecklistGate {
    /// Create a gate with every task unchecked.
    pub fn new(len: usize) -> Self {
        Self {
            state: ChecklistState::new(len),
            completion_latched: false,
        }
    }

    /// Resume from a previously persisted state.
    ///
    /// A state loaded already complete arms the latch so the
    /// completion event does not fire again on the next no-op write.
    pub fn from_state(state: ChecklistState) -> Self {
        let latched = !state.is_empty() && state.completed_count() == state.len();
        Self {
            state,
            completion_latched: latched,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &ChecklistState {
        &self.state
    }

    pub fn into_state(self) -> ChecklistState {
        self.state
    }

    pub fn progress(&self) -> Progress {
        let total = self.state.len();
        let completed = self.state.completed_count();
        let percentage = if total == 0 {
            0
        } else {
            ((completed as f64 / total as f64) * 100.0).round() as u8
        };
        let status = if completed == 0 {
            ChecklistStatus::NotStarted
        } else if completed < total {
            ChecklistStatus::InProgress
        } else {
            ChecklistStatus::Complete
        };
        Progress {
            completed,
            total,
            percentage,
            status,
        }
    }

    /// Zip the plan labels with the current done flags.
    ///
    /// The plan length must match the gate length; extra labels or
    /// flags are truncated to the shorter of the two.
    pub fn tasks(&self, plan: &TradingPlan) -> Vec<Task> {
        plan.tasks
            .iter()
            .zip(self.state.checked.iter())
            .enumerate()
            .map(|(index, (label, &done))| Task {
                index,
                label: label.clone(),
                done,
            })
            .collect()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Attempt to set task `index` to `desired`.
    ///
    /// Checking is rejected with [`ChecklistError::OutOfOrder`] while
    /// the predecessor is unchecked. Unchecking always succeeds and
    /// leaves later marks in place. Writing the current value is
    /// accepted and produces no transition events.
    pub fn toggle(
        &mut self,
        index: usize,
        desired: bool,
    ) -> Result<ToggleOutcome, ChecklistError> {
        let len = self.state.len();
        if index >= len {
            return Err(ChecklistError::IndexOutOfRange { index, len });
        }
        if desired && index > 0 && !self.state.checked[index - 1] {
            return Err(ChecklistError::OutOfOrder { index });
        }

        let mut events = Vec::new();
        if self.state.checked[index] != desired {
            self.state.checked[index] = desired;
            let completed = self.state.completed_count();
            let at = Utc::now();
            events.push(if desired {
                Event::TaskChecked {
                    index,
                    completed,
                    at,
                }
            } else {
                Event::TaskUnchecked {
                    index,
                    completed,
                    at,
                }
            });
            self.update_latch(&mut events);
        }

        Ok(ToggleOutcome {
            progress: self.progress(),
            events,
        })
    }

    /// Set every task to unchecked.
    pub fn reset_all(&mut self) -> ToggleOutcome {
        self.state.checked.fill(false);
        let mut events = vec![Event::ChecklistReset { at: Utc::now() }];
        self.update_latch(&mut events);
        ToggleOutcome {
            progress: self.progress(),
            events,
        }
    }

    /// Set every task to checked, bypassing the ordering gate.
    ///
    /// This is a distinct bulk override, not a path through `toggle`.
    pub fn check_all_force(&mut self) -> ToggleOutcome {
        self.state.checked.fill(true);
        let mut events = vec![Event::ChecklistForced {
            total: self.state.len(),
            at: Utc::now(),
        }];
        self.update_latch(&mut events);
        ToggleOutcome {
            progress: self.progress(),
            events,
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Fire the one-shot completion signal on the transition into
    /// 100%, and re-arm it when completion drops below 100% again.
    fn update_latch(&mut self, events: &mut Vec<Event>) {
        let total = self.state.len();
        let completed = self.state.completed_count();
        if total > 0 && completed == total && !self.completion_latched {
            self.completion_latched = true;
            events.push(Event::ChecklistCompleted {
                total,
                at: Utc::now(),
            });
        } else if completed < total && self.completion_latched {
            self.completion_latched = false;
            events.push(Event::ChecklistReopened {
                completed,
                at: Utc::now(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn check_through(gate: &mut ChecklistGate, upto: usize) {
        for i in 0..=upto {
            gate.toggle(i, true).expect("in-order check should succeed");
        }
    }

    fn prefix_complete(state: &ChecklistState) -> bool {
        !state
            .checked
            .windows(2)
            .any(|pair| pair[1] && !pair[0])
    }

    #[test]
    fn first_task_always_checkable() {
        let mut gate = ChecklistGate::new(9);
        let outcome = gate.toggle(0, true).unwrap();
        assert!(gate.state().checked[0]);
        assert_eq!(outcome.progress.completed, 1);
    }

    #[test]
    fn out_of_order_check_rejected_without_mutation() {
        let mut gate = ChecklistGate::new(9);
        let before = gate.state().clone();
        let err = gate.toggle(3, true).unwrap_err();
        assert_eq!(err, ChecklistError::OutOfOrder { index: 3 });
        assert_eq!(gate.state(), &before);
        assert_eq!(gate.progress().percentage, 0);
    }

    #[test]
    fn index_out_of_range_rejected() {
        let mut gate = ChecklistGate::new(9);
        let err = gate.toggle(9, true).unwrap_err();
        assert_eq!(err, ChecklistError::IndexOutOfRange { index: 9, len: 9 });
    }

    #[test]
    fn unchecking_is_always_permitted() {
        let mut gate = ChecklistGate::new(4);
        check_through(&mut gate, 3);
        // Uncheck an early task; later marks stay in place.
        gate.toggle(1, false).unwrap();
        assert_eq!(gate.state().checked, vec![true, false, true, true]);
    }

    #[test]
    fn uncheck_does_not_cascade() {
        let mut gate = ChecklistGate::new(3);
        check_through(&mut gate, 2);
        let outcome = gate.toggle(0, false).unwrap();
        assert_eq!(outcome.progress.completed, 2);
        assert_eq!(gate.state().checked, vec![false, true, true]);
    }

    #[test]
    fn idempotent_writes_produce_no_events() {
        let mut gate = ChecklistGate::new(9);
        check_through(&mut gate, 2);
        let pct_before = gate.progress().percentage;

        let outcome = gate.toggle(1, true).unwrap();
        assert!(outcome.events.is_empty());
        assert_eq!(outcome.progress.percentage, pct_before);

        let outcome = gate.toggle(5, false).unwrap();
        assert!(outcome.events.is_empty());
        assert_eq!(gate.progress().percentage, pct_before);
    }

    #[test]
    fn percentage_rounds_to_nearest() {
        let mut gate = ChecklistGate::new(9);
        check_through(&mut gate, 2);
        assert_eq!(gate.progress().percentage, 33);
        check_through(&mut gate, 5);
        assert_eq!(gate.progress().percentage, 67);
    }

    #[test]
    fn status_phases() {
        let mut gate = ChecklistGate::new(3);
        assert_eq!(gate.progress().status, ChecklistStatus::NotStarted);
        gate.toggle(0, true).unwrap();
        assert_eq!(gate.progress().status, ChecklistStatus::InProgress);
        check_through(&mut gate, 2);
        assert_eq!(gate.progress().status, ChecklistStatus::Complete);
    }

    #[test]
    fn completion_event_fires_once() {
        let mut gate = ChecklistGate::new(2);
        gate.toggle(0, true).unwrap();
        let outcome = gate.toggle(1, true).unwrap();
        assert!(outcome
            .events
            .iter()
            .any(|e| matches!(e, Event::ChecklistCompleted { .. })));

        // Reopen, then complete again: the event fires again.
        let outcome = gate.toggle(1, false).unwrap();
        assert!(outcome
            .events
            .iter()
            .any(|e| matches!(e, Event::ChecklistReopened { .. })));
        let outcome = gate.toggle(1, true).unwrap();
        assert!(outcome
            .events
            .iter()
            .any(|e| matches!(e, Event::ChecklistCompleted { .. })));
    }

    #[test]
    fn loading_a_complete_state_does_not_refire_completion() {
        let state = ChecklistState {
            checked: vec![true, true, true],
        };
        let mut gate = ChecklistGate::from_state(state);
        // An idempotent write must not resurface the completion event.
        let outcome = gate.toggle(2, true).unwrap();
        assert!(outcome.events.is_empty());
    }

    #[test]
    fn check_all_force_completes() {
        let mut gate = ChecklistGate::new(9);
        let outcome = gate.check_all_force();
        assert_eq!(outcome.progress.percentage, 100);
        assert_eq!(outcome.progress.status, ChecklistStatus::Complete);
        assert!(outcome
            .events
            .iter()
            .any(|e| matches!(e, Event::ChecklistCompleted { .. })));
    }

    #[test]
    fn reset_all_clears_everything() {
        let mut gate = ChecklistGate::new(9);
        gate.check_all_force();
        let outcome = gate.reset_all();
        assert_eq!(outcome.progress.percentage, 0);
        assert_eq!(outcome.progress.status, ChecklistStatus::NotStarted);
        assert!(gate.state().checked.iter().all(|&c| !c));
    }

    #[test]
    fn tasks_zip_plan_labels_with_flags() {
        let plan = TradingPlan::default();
        let mut gate = ChecklistGate::new(plan.len());
        gate.toggle(0, true).unwrap();
        let tasks = gate.tasks(&plan);
        assert_eq!(tasks.len(), plan.len());
        assert!(tasks[0].done);
        assert!(!tasks[1].done);
        assert_eq!(tasks[1].label, plan.tasks[1]);
    }

    proptest! {
        /// Any sequence of accepted *check* operations keeps the state
        /// prefix-complete: no checked task ever follows an unchecked
        /// one.
        #[test]
        fn check_sequences_preserve_prefix_completeness(
            indices in proptest::collection::vec(0usize..9, 0..64)
        ) {
            let mut gate = ChecklistGate::new(9);
            for index in indices {
                let _ = gate.toggle(index, true);
                prop_assert!(prefix_complete(gate.state()));
            }
        }

        /// Under arbitrary toggles, a rejected operation never mutates
        /// state, and an accepted check always had its predecessor
        /// complete at the time of the call.
        #[test]
        fn gating_holds_under_arbitrary_toggles(
            ops in proptest::collection::vec((0usize..12, proptest::bool::ANY), 0..64)
        ) {
            let mut gate = ChecklistGate::new(9);
            for (index, desired) in ops {
                let before = gate.state().clone();
                let predecessor_done = index == 0 || before.checked.get(index - 1).copied().unwrap_or(false);
                match gate.toggle(index, desired) {
                    Ok(_) => {
                        prop_assert!(index < 9);
                        if desired {
                            prop_assert!(predecessor_done);
                        }
                    }
                    Err(_) => prop_assert_eq!(gate.state(), &before),
                }
            }
        }
    }
}
