//! Alarm timing and threshold configuration.

use crate::error::{AlarmError, Result};
use crate::hardware::PulseTrain;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the monitor loop and alarm pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmConfig {
    /// Normalized sensor level above which gas is considered dangerous
    pub threshold: f32,
    /// Pause between monitor cycles in milliseconds
    pub poll_interval_ms: u64,
    /// Buzzer duration while the button is held, in milliseconds
    pub button_beep_ms: u64,
    /// Alarm pulse high time in milliseconds
    pub pulse_on_ms: u64,
    /// Alarm pulse low time in milliseconds
    pub pulse_off_ms: u64,
    /// Number of alarm pulses per cycle
    pub pulse_count: u32,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            threshold: crate::DEFAULT_THRESHOLD,
            poll_interval_ms: crate::DEFAULT_POLL_INTERVAL_MS,
            button_beep_ms: 1000,
            pulse_on_ms: 500,
            pulse_off_ms: 500,
            pulse_count: 3,
        }
    }
}

impl AlarmConfig {
    /// Set the alarm threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the pause between monitor cycles.
    pub fn with_poll_interval_ms(mut self, interval_ms: u64) -> Self {
        self.poll_interval_ms = interval_ms;
        self
    }

    /// Set the button beep duration.
    pub fn with_button_beep_ms(mut self, beep_ms: u64) -> Self {
        self.button_beep_ms = beep_ms;
        self
    }

    /// Set the alarm pulse pattern.
    pub fn with_pulses(mut self, on_ms: u64, off_ms: u64, count: u32) -> Self {
        self.pulse_on_ms = on_ms;
        self.pulse_off_ms = off_ms;
        self.pulse_count = count;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn button_beep(&self) -> PulseTrain {
        PulseTrain::single(Duration::from_millis(self.button_beep_ms))
    }

    pub fn alarm_pattern(&self) -> PulseTrain {
        PulseTrain::new(
            Duration::from_millis(self.pulse_on_ms),
            Duration::from_millis(self.pulse_off_ms),
            self.pulse_count,
        )
    }

    /// Reject thresholds outside full scale and silent alarm patterns.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(AlarmError::config_error(format!(
                "Threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        if self.pulse_count == 0 || self.pulse_on_ms == 0 {
            return Err(AlarmError::config_error(
                "Alarm pattern needs at least one pulse with a non-zero on time",
            ));
        }
        Ok(())
    }
}
