//! # Tradegate Core Library
//!
//! Core business logic for Tradegate, a personal trading-discipline
//! aid: an ordered checklist that gates progression through a fixed
//! trading procedure, paired with a clock that reports which global
//! market sessions are currently open and where they overlap.
//!
//! ## Architecture
//!
//! - **Checklist Gate**: A sequential state machine over a fixed row
//!   of done flags; checking a task requires its predecessor to be
//!   checked, unchecking is always free
//! - **Session Clock**: Pure classification of an instant against
//!   three (possibly midnight-wrapping) daily windows in one fixed
//!   reference timezone
//! - **Storage**: SQLite key-value state persistence and TOML-based
//!   configuration
//!
//! Both components complete synchronously and own no timers; the host
//! drives the gate on user interaction and evaluates the clock on a
//! cadence it controls, performing persistence and rendering as side
//! effects around the returned values.
//!
//! ## Key Components
//!
//! - [`ChecklistGate`]: Sequential task gate
//! - [`SessionClock`]: Market session membership and overlaps
//! - [`StateStore`]: Checklist state persistence
//! - [`Config`]: Application configuration management

pub mod checklist;
pub mod error;
pub mod events;
pub mod sessions;
pub mod storage;

pub use checklist::{
    ChecklistGate, ChecklistState, ChecklistStatus, Progress, Task, ToggleOutcome, TradingPlan,
};
pub use error::{ChecklistError, ClockError, ConfigError, CoreError, StorageError};
pub use events::Event;
pub use sessions::{
    Overlap, SessionBoard, SessionClock, SessionId, SessionSchedule, SessionStatus, SessionWindow,
};
pub use storage::{Config, StateStore};
