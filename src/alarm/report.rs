//! Data structures describing the alarm at a point in time.

use serde::{Deserialize, Serialize};

/// Message shown when the reading is above the threshold.
pub const ALARM_MESSAGE: &str = "ALARM! GAS LEVEL EXCEEDS THRESHOLD!";

/// Message shown otherwise.
pub const NORMAL_MESSAGE: &str = "System is normal.";

/// A status snapshot taken for the status page and the JSON API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Timestamp when this report was taken (Unix timestamp in milliseconds)
    pub timestamp: u64,
    /// Whether the alarm is armed
    pub armed: bool,
    /// Normalized gas sensor reading (0.0 to 1.0)
    pub gas_level: f32,
    /// Threshold the reading is compared against
    pub threshold: f32,
    /// Whether the reading is above the threshold, regardless of arming
    pub over_threshold: bool,
}

impl StatusReport {
    /// Build a report stamped with the current time.
    pub fn new(armed: bool, gas_level: f32, threshold: f32) -> Self {
        Self {
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis() as u64,
            armed,
            gas_level,
            threshold,
            over_threshold: gas_level > threshold,
        }
    }

    /// `ARMED` or `DISARMED`.
    pub fn armed_label(&self) -> &'static str {
        if self.armed {
            "ARMED"
        } else {
            "DISARMED"
        }
    }

    /// The page's alarm line. Ignores the armed flag.
    pub fn alarm_message(&self) -> &'static str {
        if self.over_threshold {
            ALARM_MESSAGE
        } else {
            NORMAL_MESSAGE
        }
    }
}
