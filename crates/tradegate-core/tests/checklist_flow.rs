//! End-to-end checklist flow against a real on-disk store.
//!
//! Drives the gate the way the CLI host does: load, mutate, persist
//! after every accepted operation, reload.

use tempfile::tempdir;
use tradegate_core::storage::StateStore;
use tradegate_core::{ChecklistGate, ChecklistStatus, TradingPlan};

#[test]
fn full_procedure_survives_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tradegate.db");
    let plan = TradingPlan::default();

    {
        let store = StateStore::open_at(&path).unwrap();
        let mut gate = ChecklistGate::new(plan.len());
        for i in 0..5 {
            gate.toggle(i, true).unwrap();
            store.save_checklist(gate.state()).unwrap();
        }
    }

    let store = StateStore::open_at(&path).unwrap();
    let state = store.load_checklist(plan.len()).unwrap().unwrap();
    let gate = ChecklistGate::from_state(state);
    let progress = gate.progress();
    assert_eq!(progress.completed, 5);
    assert_eq!(progress.percentage, 56);
    assert_eq!(progress.status, ChecklistStatus::InProgress);
}

#[test]
fn shrunken_task_list_discards_stale_record() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tradegate.db");

    {
        let store = StateStore::open_at(&path).unwrap();
        let mut gate = ChecklistGate::new(9);
        gate.check_all_force();
        store.save_checklist(gate.state()).unwrap();
    }

    // The configured procedure changed length; the saved record no
    // longer fits and the gate starts over from all-false.
    let store = StateStore::open_at(&path).unwrap();
    assert!(store.load_checklist(7).unwrap().is_none());
    let gate = ChecklistGate::new(7);
    assert_eq!(gate.progress().status, ChecklistStatus::NotStarted);
    assert_eq!(gate.progress().percentage, 0);
}

#[test]
fn completion_signal_fires_exactly_once_across_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tradegate.db");

    let store = StateStore::open_at(&path).unwrap();
    let mut gate = ChecklistGate::new(3);
    for i in 0..3 {
        gate.toggle(i, true).unwrap();
    }
    store.save_checklist(gate.state()).unwrap();

    // Reloading the complete state must not replay the completion
    // event on the next idempotent write.
    let reloaded_state = store.load_checklist(3).unwrap().unwrap();
    let mut gate = ChecklistGate::from_state(reloaded_state);
    let outcome = gate.toggle(2, true).unwrap();
    assert!(outcome.events.is_empty());
}
