//! Market session clock.
//!
//! Classifies an instant against three named daily trading windows in
//! a single fixed reference timezone and reports which sessions are
//! open plus every pairwise overlap. A window whose end hour is
//! numerically below its start hour spans local midnight (the New York
//! window does by default).
//!
//! The clock owns no timer. The host evaluates on whatever cadence it
//! controls and renders the resulting board.

use std::str::FromStr;

use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ClockError;

/// The three configured market sessions, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionId {
    Asia,
    London,
    NewYork,
}

impl SessionId {
    pub const ALL: [SessionId; 3] = [SessionId::Asia, SessionId::London, SessionId::NewYork];

    /// Full display name.
    pub fn name(&self) -> &'static str {
        match self {
            SessionId::Asia => "Asia",
            SessionId::London => "London",
            SessionId::NewYork => "New York",
        }
    }

    /// Short form used in overlap labels.
    pub fn short_name(&self) -> &'static str {
        match self {
            SessionId::Asia => "Asia",
            SessionId::London => "London",
            SessionId::NewYork => "NY",
        }
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A daily time-of-day window, hours in `[0, 24)`.
///
/// Wraps past midnight when `end_hour < start_hour`. Boundary hours
/// are inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionWindow {
    pub start_hour: f64,
    pub end_hour: f64,
}

impl SessionWindow {
    pub fn new(start_hour: f64, end_hour: f64) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    /// Whether the window spans local midnight.
    pub fn wraps(&self) -> bool {
        self.end_hour < self.start_hour
    }

    /// Membership test for a fractional hour of day.
    pub fn contains(&self, hour: f64) -> bool {
        if self.wraps() {
            hour >= self.start_hour || hour <= self.end_hour
        } else {
            hour >= self.start_hour && hour <= self.end_hour
        }
    }
}

/// The fixed session table: one window per session, in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSchedule {
    #[serde(default = "default_asia")]
    pub asia: SessionWindow,
    #[serde(default = "default_london")]
    pub london: SessionWindow,
    #[serde(default = "default_newyork")]
    pub newyork: SessionWindow,
}

fn default_asia() -> SessionWindow {
    SessionWindow::new(5.5, 14.5)
}
fn default_london() -> SessionWindow {
    SessionWindow::new(12.5, 21.5)
}
fn default_newyork() -> SessionWindow {
    SessionWindow::new(17.5, 2.5)
}

impl Default for SessionSchedule {
    fn default() -> Self {
        Self {
            asia: default_asia(),
            london: default_london(),
            newyork: default_newyork(),
        }
    }
}

impl SessionSchedule {
    pub fn window(&self, id: SessionId) -> SessionWindow {
        match id {
            SessionId::Asia => self.asia,
            SessionId::London => self.london,
            SessionId::NewYork => self.newyork,
        }
    }
}

/// Per-session activity flag, derived fresh on each evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub id: SessionId,
    pub active: bool,
}

/// An unordered pair of simultaneously open sessions.
///
/// Stored canonically in [`SessionId::ALL`] order so that equality and
/// labels are stable regardless of construction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overlap {
    pub a: SessionId,
    pub b: SessionId,
}

impl Overlap {
    pub fn new(a: SessionId, b: SessionId) -> Self {
        let pos = |id| SessionId::ALL.iter().position(|&s| s == id).unwrap_or(0);
        if pos(a) <= pos(b) {
            Self { a, b }
        } else {
            Self { a: b, b: a }
        }
    }

    /// Display label, e.g. "Asia-London" or "London-NY".
    pub fn label(&self) -> String {
        format!("{}-{}", self.a.short_name(), self.b.short_name())
    }
}

/// One full evaluation of the session table at a given instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionBoard {
    /// Fractional hour of day in the reference zone (hour + minute/60).
    pub hour_of_day: f64,
    pub sessions: Vec<SessionStatus>,
}

impl SessionBoard {
    pub fn is_active(&self, id: SessionId) -> bool {
        self.sessions
            .iter()
            .any(|status| status.id == id && status.active)
    }
}

/// Session clock bound to a resolved reference timezone.
#[derive(Debug, Clone)]
pub struct SessionClock {
    tz: Tz,
    schedule: SessionSchedule,
}

impl SessionClock {
    /// Resolve the reference timezone by name and bind the schedule.
    ///
    /// An unknown zone name is fatal for the clock: session activity
    /// is timezone-dependent, so no default zone is substituted.
    pub fn new(timezone: &str, schedule: SessionSchedule) -> Result<Self, ClockError> {
        let tz = Tz::from_str(timezone)
            .map_err(|_| ClockError::UnknownTimezone(timezone.to_string()))?;
        Ok(Self { tz, schedule })
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn schedule(&self) -> &SessionSchedule {
        &self.schedule
    }

    /// The instant rendered in the reference zone, for clock-face and
    /// date formatting by the host.
    pub fn local_time(&self, instant: DateTime<Utc>) -> DateTime<Tz> {
        instant.with_timezone(&self.tz)
    }

    /// Fractional hour of day (hour + minute/60) in the reference
    /// zone. Seconds are ignored, matching the minute-resolution
    /// session bounds.
    pub fn hour_of_day(&self, instant: DateTime<Utc>) -> f64 {
        let local = self.local_time(instant);
        f64::from(local.hour()) + f64::from(local.minute()) / 60.0
    }

    /// Evaluate every session window at the same instant.
    pub fn evaluate(&self, instant: DateTime<Utc>) -> SessionBoard {
        let hour = self.hour_of_day(instant);
        self.evaluate_hour(hour)
    }

    /// Evaluate against an explicit fractional hour.
    pub fn evaluate_hour(&self, hour_of_day: f64) -> SessionBoard {
        let sessions = SessionId::ALL
            .iter()
            .map(|&id| SessionStatus {
                id,
                active: self.schedule.window(id).contains(hour_of_day),
            })
            .collect();
        SessionBoard {
            hour_of_day,
            sessions,
        }
    }

    /// Every pair of distinct sessions simultaneously open on the
    /// board. With three sessions this yields up to three pairs; a
    /// triple-open instant reports all three pairs, not a separate
    /// category.
    pub fn overlaps(board: &SessionBoard) -> Vec<Overlap> {
        let mut pairs = Vec::new();
        for (i, a) in board.sessions.iter().enumerate() {
            for b in &board.sessions[i + 1..] {
                if a.active && b.active {
                    pairs.push(Overlap::new(a.id, b.id));
                }
            }
        }
        pairs
    }
}
