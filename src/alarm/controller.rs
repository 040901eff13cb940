//! Arm/disarm logic shared by the button, the monitor loop and the web
//! handlers.

use crate::alarm::{AlarmConfig, AlarmState, StatusReport};
use crate::error::Result;
use crate::hardware::{AlarmHardware, Button, DigitalOutput, GasSensor};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// An externally requested arm state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArmCommand {
    Arm,
    Disarm,
}

impl ArmCommand {
    /// Interpret the value of the page's `submit` field.
    ///
    /// Only `On` arms; anything else disarms.
    pub fn from_form_value(value: &str) -> Self {
        if value == "On" {
            Self::Arm
        } else {
            Self::Disarm
        }
    }

    pub fn armed(self) -> bool {
        matches!(self, Self::Arm)
    }
}

/// Owns the armed flag and the output devices.
pub struct AlarmController {
    config: AlarmConfig,
    state: AlarmState,
    indicator: Arc<dyn DigitalOutput>,
    buzzer: Arc<dyn DigitalOutput>,
    sensor: Arc<dyn GasSensor>,
}

impl AlarmController {
    /// Create a disarmed controller.
    pub fn new(
        config: AlarmConfig,
        indicator: Arc<dyn DigitalOutput>,
        buzzer: Arc<dyn DigitalOutput>,
        sensor: Arc<dyn GasSensor>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: AlarmState::default(),
            indicator,
            buzzer,
            sensor,
        })
    }

    /// Split a hardware set into a shared controller and the button, which
    /// stays with the monitor loop.
    pub fn from_hardware(
        config: AlarmConfig,
        hardware: AlarmHardware,
    ) -> Result<(Arc<Self>, Box<dyn Button>)> {
        let controller = Self::new(
            config,
            hardware.indicator,
            hardware.buzzer,
            hardware.sensor,
        )?;
        Ok((Arc::new(controller), hardware.button))
    }

    pub fn config(&self) -> &AlarmConfig {
        &self.config
    }

    pub fn threshold(&self) -> f32 {
        self.config.threshold
    }

    pub fn is_armed(&self) -> bool {
        self.state.is_armed()
    }

    pub fn indicator(&self) -> &dyn DigitalOutput {
        self.indicator.as_ref()
    }

    pub fn buzzer(&self) -> &dyn DigitalOutput {
        self.buzzer.as_ref()
    }

    /// Flip the armed flag and mirror it on the indicator.
    ///
    /// This is what a button press does. Returns the new armed state.
    pub fn toggle_armed(&self) -> Result<bool> {
        let armed = self.state.toggle();
        self.indicator.set(armed)?;
        if armed {
            info!("Gas sensor armed");
        } else {
            info!("Gas sensor disarmed");
        }
        Ok(armed)
    }

    /// Apply a remote arm/disarm request.
    ///
    /// The indicator always follows the request. The flag moves to the
    /// requested state in one atomic step, so a concurrent button press can
    /// never invert it. Returns `true` if the flag changed.
    pub fn apply_command(&self, command: ArmCommand) -> Result<bool> {
        let want = command.armed();
        self.indicator.set(want)?;

        let changed = self.state.set(want);
        if changed {
            info!("Gas sensor {}", if want { "armed" } else { "disarmed" });
        }

        info!(
            "Indicator is {} and gas sensor is {}",
            if want { "On" } else { "Off" },
            if want { "ARMED" } else { "DISARMED" }
        );
        Ok(changed)
    }

    /// Read the gas sensor once.
    pub fn read_level(&self) -> Result<f32> {
        self.sensor.read()
    }

    /// Take a fresh status report.
    pub fn status(&self) -> Result<StatusReport> {
        let level = self.read_level()?;
        Ok(StatusReport::new(self.is_armed(), level, self.threshold()))
    }

    /// Drive both outputs low.
    pub fn silence(&self) -> Result<()> {
        self.indicator.set(false)?;
        self.buzzer.set(false)
    }

    /// Route press edges from `button` to [`toggle_armed`](Self::toggle_armed).
    pub fn attach_button(self: &Arc<Self>, button: &mut dyn Button) -> Result<()> {
        let controller = Arc::clone(self);
        button.set_press_handler(Box::new(move || {
            if let Err(e) = controller.toggle_armed() {
                error!("Failed to handle button press: {}", e);
            }
        }))
    }
}
