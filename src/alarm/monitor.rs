//! The sensor polling loop.

use crate::alarm::AlarmController;
use crate::error::Result;
use crate::hardware::Button;
use std::future::Future;
use std::sync::Arc;
use tokio::time;
use tracing::{debug, info, warn};

/// What a single monitor cycle observed and did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    /// Button was held when sampled
    pub button_held: bool,
    /// Gas reading taken this cycle
    pub gas_level: f32,
    /// Alarm pattern was played
    pub alarm: bool,
}

/// Polls the button and gas sensor and drives the outputs.
pub struct Monitor {
    controller: Arc<AlarmController>,
    button: Box<dyn Button>,
}

impl Monitor {
    /// Take ownership of the button and register its press handler.
    pub fn new(controller: Arc<AlarmController>, mut button: Box<dyn Button>) -> Result<Self> {
        controller.attach_button(button.as_mut())?;
        Ok(Self { controller, button })
    }

    pub fn controller(&self) -> &Arc<AlarmController> {
        &self.controller
    }

    /// Run one poll cycle, not including the pause before the next one.
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        let config = self.controller.config();

        let button_held = self.button.is_pressed()?;
        if button_held {
            info!("Button pressed, sounding buzzer");
            config.button_beep().play(self.controller.buzzer()).await?;
        }

        let gas_level = self.controller.read_level()?;
        debug!("Gas sensor value: {:.2}", gas_level);

        let alarm = self.controller.is_armed() && gas_level > config.threshold;
        if alarm {
            warn!(
                "ALARM! Gas level {:.2} exceeds threshold {:.2}",
                gas_level, config.threshold
            );
            self.controller.indicator().set(true)?;
            config.alarm_pattern().play(self.controller.buzzer()).await?;
        } else {
            self.controller.silence()?;
            debug!("System is normal");
        }

        Ok(CycleReport {
            button_held,
            gas_level,
            alarm,
        })
    }

    async fn poll_forever(&self) -> Result<()> {
        let interval = self.controller.config().poll_interval();
        loop {
            self.run_cycle().await?;
            time::sleep(interval).await;
        }
    }

    /// Loop until `shutdown` resolves or a hardware call fails.
    ///
    /// Both outputs are driven low before returning on shutdown.
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        info!(
            "Monitor started, polling every {}ms",
            self.controller.config().poll_interval_ms
        );

        tokio::select! {
            result = self.poll_forever() => result,
            _ = shutdown => {
                info!("Monitor stopping");
                self.controller.silence()
            }
        }
    }
}
