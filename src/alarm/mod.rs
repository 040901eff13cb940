//! Alarm state, configuration and the monitor loop.
//!
//! [`AlarmController`] is the single owner of the armed flag and the output
//! devices. The button interrupt, the [`Monitor`] loop and the web handlers
//! all go through it.

pub mod config;
pub mod controller;
pub mod monitor;
pub mod report;
pub mod state;

// Re-export commonly used items
pub use config::AlarmConfig;
pub use controller::{AlarmController, ArmCommand};
pub use monitor::{CycleReport, Monitor};
pub use report::StatusReport;
pub use state::AlarmState;
