mod gate;
mod plan;

pub use gate::{ChecklistGate, ChecklistState, ChecklistStatus, Progress, ToggleOutcome};
pub use plan::{Task, TradingPlan};
