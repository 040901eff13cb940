//! Timed on/off patterns for a digital output.

use super::DigitalOutput;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time;

/// A sequence of `count` pulses, each high for `on` then low for `off`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PulseTrain {
    pub on: Duration,
    pub off: Duration,
    pub count: u32,
}

impl PulseTrain {
    pub fn new(on: Duration, off: Duration, count: u32) -> Self {
        Self { on, off, count }
    }

    /// A single pulse with no trailing gap.
    pub fn single(on: Duration) -> Self {
        Self::new(on, Duration::ZERO, 1)
    }

    /// Total time taken to play the pattern, saturating at `Duration::MAX`.
    pub fn duration(&self) -> Duration {
        self.on.saturating_add(self.off).saturating_mul(self.count)
    }

    /// Play the pattern on `output`, returning once it has finished.
    ///
    /// The output is left low.
    pub async fn play(&self, output: &dyn DigitalOutput) -> Result<()> {
        for _ in 0..self.count {
            output.set(true)?;
            time::sleep(self.on).await;
            output.set(false)?;
            if !self.off.is_zero() {
                time::sleep(self.off).await;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::simulated::SimulatedOutput;

    #[test]
    fn test_duration() {
        let train = PulseTrain::new(Duration::from_millis(500), Duration::from_millis(500), 3);
        assert_eq!(train.duration(), Duration::from_secs(3));
        assert_eq!(PulseTrain::single(Duration::from_secs(1)).duration(), Duration::from_secs(1));
    }

    #[test]
    fn test_duration_saturates() {
        let train = PulseTrain::new(Duration::MAX, Duration::from_secs(1), u32::MAX);
        assert_eq!(train.duration(), Duration::MAX);

        let train = PulseTrain::new(Duration::from_secs(u64::MAX / 2), Duration::ZERO, 3);
        assert_eq!(train.duration(), Duration::MAX);
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_leaves_output_low() {
        let output = SimulatedOutput::new("buzzer");
        let train = PulseTrain::new(Duration::from_millis(200), Duration::from_millis(100), 2);

        let started = time::Instant::now();
        train.play(&output).await.unwrap();

        assert_eq!(started.elapsed(), Duration::from_millis(600));
        assert!(!output.is_on());
        assert_eq!(output.rising_edges(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_count_is_silent() {
        let output = SimulatedOutput::new("buzzer");
        PulseTrain::new(Duration::from_secs(1), Duration::from_secs(1), 0)
            .play(&output)
            .await
            .unwrap();
        assert!(output.transitions().is_empty());
    }
}
