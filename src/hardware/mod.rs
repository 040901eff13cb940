//! Hardware capabilities for the alarm: two digital outputs, one button and
//! one analog gas sensor.
//!
//! The alarm logic only ever sees the traits in this module. The Raspberry Pi
//! backend is feature-gated so the crate builds on machines without GPIO; the
//! simulated backend is always available for tests and `--no-gpio` runs.

pub mod pulse;
pub mod simulated;

#[cfg(feature = "gpio")]
pub mod rpi;

pub use pulse::PulseTrain;
pub use simulated::SimulatedHardware;

use crate::error::{AlarmError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A digital output line such as the indicator LED or the buzzer.
pub trait DigitalOutput: Send + Sync {
    /// Drive the line high (`true`) or low (`false`).
    fn set(&self, on: bool) -> Result<()>;

    /// Whether the line is currently driven high.
    fn is_on(&self) -> bool;
}

/// Callback fired on each press edge of a [`Button`].
pub type PressHandler = Box<dyn FnMut() + Send + 'static>;

/// A push button wired to an active-low input with pull-up.
pub trait Button: Send {
    /// Sample the input level. Pressed means the line reads low.
    fn is_pressed(&self) -> Result<bool>;

    /// Register the callback fired on every falling edge.
    ///
    /// Registering again replaces the previous handler.
    fn set_press_handler(&mut self, handler: PressHandler) -> Result<()>;
}

/// An analog gas concentration sensor.
pub trait GasSensor: Send + Sync {
    /// Read the current value normalized to `[0, 1]` of full scale.
    fn read(&self) -> Result<f32>;
}

/// BCM pin numbers and ADC channel used by the alarm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinConfig {
    /// Indicator LED output
    pub indicator_pin: u8,
    /// Push button input (pull-up, active low)
    pub button_pin: u8,
    /// Buzzer output
    pub buzzer_pin: u8,
    /// MCP3008 channel the gas sensor is wired to
    pub sensor_channel: u8,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            indicator_pin: crate::DEFAULT_INDICATOR_PIN,
            button_pin: crate::DEFAULT_BUTTON_PIN,
            buzzer_pin: crate::DEFAULT_BUZZER_PIN,
            sensor_channel: crate::DEFAULT_SENSOR_CHANNEL,
        }
    }
}

impl PinConfig {
    /// Set the indicator LED pin.
    pub fn with_indicator_pin(mut self, pin: u8) -> Self {
        self.indicator_pin = pin;
        self
    }

    /// Set the button pin.
    pub fn with_button_pin(mut self, pin: u8) -> Self {
        self.button_pin = pin;
        self
    }

    /// Set the buzzer pin.
    pub fn with_buzzer_pin(mut self, pin: u8) -> Self {
        self.buzzer_pin = pin;
        self
    }

    /// Set the ADC channel of the gas sensor.
    pub fn with_sensor_channel(mut self, channel: u8) -> Self {
        self.sensor_channel = channel;
        self
    }

    /// Check that pins are distinct and the ADC channel exists.
    pub fn validate(&self) -> Result<()> {
        if self.sensor_channel > 7 {
            return Err(AlarmError::config_error(format!(
                "MCP3008 has channels 0-7, got {}",
                self.sensor_channel
            )));
        }

        let pins = [self.indicator_pin, self.button_pin, self.buzzer_pin];
        if pins[0] == pins[1] || pins[0] == pins[2] || pins[1] == pins[2] {
            return Err(AlarmError::config_error(format!(
                "Indicator, button and buzzer pins must differ, got {:?}",
                pins
            )));
        }

        Ok(())
    }
}

/// The full set of devices the alarm drives, configured once at startup.
pub struct AlarmHardware {
    pub indicator: Arc<dyn DigitalOutput>,
    pub buzzer: Arc<dyn DigitalOutput>,
    pub sensor: Arc<dyn GasSensor>,
    pub button: Box<dyn Button>,
}
