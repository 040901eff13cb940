//! In-process stand-ins for the alarm hardware.
//!
//! Used by the test suite and by `--no-gpio` runs on machines without a
//! Raspberry Pi. Outputs keep a timestamped history of every level change so
//! callers can check pulse patterns.

use super::{AlarmHardware, Button, DigitalOutput, GasSensor, PressHandler};
use crate::error::{AlarmError, Result};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::time::Instant;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A level change recorded by [`SimulatedOutput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub at: Instant,
    pub on: bool,
}

/// Digital output that records its history.
#[derive(Debug)]
pub struct SimulatedOutput {
    name: &'static str,
    level: AtomicBool,
    history: Mutex<Vec<Transition>>,
}

impl SimulatedOutput {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            level: AtomicBool::new(false),
            history: Mutex::new(Vec::new()),
        }
    }

    /// Every write that changed the level, oldest first.
    pub fn transitions(&self) -> Vec<Transition> {
        lock(&self.history).clone()
    }

    /// Number of low-to-high changes seen so far.
    pub fn rising_edges(&self) -> usize {
        lock(&self.history).iter().filter(|t| t.on).count()
    }

    /// Forget recorded history, keeping the current level.
    pub fn clear_history(&self) {
        lock(&self.history).clear();
    }
}

impl DigitalOutput for SimulatedOutput {
    fn set(&self, on: bool) -> Result<()> {
        let previous = self.level.swap(on, Ordering::SeqCst);
        if previous != on {
            tracing::trace!("{} -> {}", self.name, if on { "high" } else { "low" });
            lock(&self.history).push(Transition {
                at: Instant::now(),
                on,
            });
        }
        Ok(())
    }

    fn is_on(&self) -> bool {
        self.level.load(Ordering::SeqCst)
    }
}

/// Gas sensor returning whatever level it was last given.
#[derive(Debug)]
pub struct SimulatedSensor {
    level_bits: AtomicU32,
    faulty: AtomicBool,
}

impl SimulatedSensor {
    pub fn new(level: f32) -> Self {
        let sensor = Self {
            level_bits: AtomicU32::new(0),
            faulty: AtomicBool::new(false),
        };
        sensor.set_level(level);
        sensor
    }

    /// Set the reading, clamped to `[0, 1]`.
    pub fn set_level(&self, level: f32) {
        let level = if level.is_nan() { 0.0 } else { level.clamp(0.0, 1.0) };
        self.level_bits.store(level.to_bits(), Ordering::SeqCst);
    }

    /// Make subsequent reads fail.
    pub fn set_faulty(&self, faulty: bool) {
        self.faulty.store(faulty, Ordering::SeqCst);
    }
}

impl GasSensor for SimulatedSensor {
    fn read(&self) -> Result<f32> {
        if self.faulty.load(Ordering::SeqCst) {
            return Err(AlarmError::sensor_error("simulated sensor fault"));
        }
        Ok(f32::from_bits(self.level_bits.load(Ordering::SeqCst)))
    }
}

#[derive(Default)]
struct ButtonInner {
    held: AtomicBool,
    handler: Mutex<Option<PressHandler>>,
}

/// Button whose level and press edges are driven from code.
///
/// Clones share the same underlying button.
#[derive(Clone, Default)]
pub struct SimulatedButton {
    inner: Arc<ButtonInner>,
}

impl SimulatedButton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver one press edge to the registered handler.
    pub fn press(&self) {
        if let Some(handler) = lock(&self.inner.handler).as_mut() {
            handler();
        }
    }

    /// Hold the button down (or release it) as seen by [`Button::is_pressed`].
    pub fn hold(&self, held: bool) {
        self.inner.held.store(held, Ordering::SeqCst);
    }

    pub fn has_handler(&self) -> bool {
        lock(&self.inner.handler).is_some()
    }
}

impl Button for SimulatedButton {
    fn is_pressed(&self) -> Result<bool> {
        Ok(self.inner.held.load(Ordering::SeqCst))
    }

    fn set_press_handler(&mut self, handler: PressHandler) -> Result<()> {
        *lock(&self.inner.handler) = Some(handler);
        Ok(())
    }
}

/// A complete simulated device set with handles kept for inspection.
#[derive(Clone)]
pub struct SimulatedHardware {
    pub indicator: Arc<SimulatedOutput>,
    pub buzzer: Arc<SimulatedOutput>,
    pub sensor: Arc<SimulatedSensor>,
    pub button: SimulatedButton,
}

impl SimulatedHardware {
    pub fn new() -> Self {
        Self::with_level(0.0)
    }

    pub fn with_level(level: f32) -> Self {
        Self {
            indicator: Arc::new(SimulatedOutput::new("indicator")),
            buzzer: Arc::new(SimulatedOutput::new("buzzer")),
            sensor: Arc::new(SimulatedSensor::new(level)),
            button: SimulatedButton::new(),
        }
    }

    /// Hand out trait-object views sharing state with these handles.
    pub fn hardware(&self) -> AlarmHardware {
        AlarmHardware {
            indicator: self.indicator.clone(),
            buzzer: self.buzzer.clone(),
            sensor: self.sensor.clone(),
            button: Box::new(self.button.clone()),
        }
    }
}

impl Default for SimulatedHardware {
    fn default() -> Self {
        Self::new()
    }
}
