pub mod check;
pub mod clock;
pub mod config;
pub mod sessions;
