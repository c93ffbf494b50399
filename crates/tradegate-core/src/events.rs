use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sessions::{Overlap, SessionStatus};

/// Every accepted state change in the system produces an Event.
/// The host consumes events to drive rendering and notifications;
/// rejected operations surface as errors instead, never as events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TaskChecked {
        index: usize,
        completed: usize,
        at: DateTime<Utc>,
    },
    TaskUnchecked {
        index: usize,
        completed: usize,
        at: DateTime<Utc>,
    },
    /// Fired once per transition into a fully complete checklist.
    ChecklistCompleted {
        total: usize,
        at: DateTime<Utc>,
    },
    /// A previously complete checklist dropped below 100% again.
    /// Re-arms the completion signal.
    ChecklistReopened {
        completed: usize,
        at: DateTime<Utc>,
    },
    ChecklistReset {
        at: DateTime<Utc>,
    },
    /// All tasks were force-checked, bypassing the ordering gate.
    ChecklistForced {
        total: usize,
        at: DateTime<Utc>,
    },
    /// Periodic session-clock evaluation produced by the host tick.
    SessionTick {
        hour_of_day: f64,
        sessions: Vec<SessionStatus>,
        overlaps: Vec<Overlap>,
        at: DateTime<Utc>,
    },
}
