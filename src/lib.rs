//! # Gas Sentinel - Raspberry Pi Gas Alarm
//!
//! Polls an MCP3008-attached gas sensor and a push button, drives an
//! indicator LED and a buzzer, and exposes a small web page for arming and
//! disarming the alarm remotely.
//!
//! ## Features
//!
//! - **Monitor loop**: fixed-interval sensor polling with a pulsed buzzer alarm
//! - **Button arming**: edge-triggered toggle of the armed state
//! - **Web control**: status page, `On`/`Off` form and a JSON status endpoint
//! - **Cross-compilation**: real GPIO behind the `gpio` feature, simulated otherwise
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gas_sentinel::{AlarmConfig, AlarmController, Monitor, SimulatedHardware, WebConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sim = SimulatedHardware::new();
//!     let (controller, button) =
//!         AlarmController::from_hardware(AlarmConfig::default(), sim.hardware())?;
//!
//!     let server = gas_sentinel::start_web_server(
//!         WebConfig::default(),
//!         controller.clone(),
//!         std::future::pending(),
//!     );
//!     tokio::spawn(server);
//!
//!     Monitor::new(controller, button)?
//!         .run(std::future::pending())
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod alarm;
pub mod error;
pub mod hardware;
pub mod web;

// Re-export public API
pub use alarm::{AlarmConfig, AlarmController, ArmCommand, Monitor, StatusReport};
pub use error::{AlarmError, Result};
pub use hardware::{AlarmHardware, PinConfig, SimulatedHardware};
pub use web::{start_web_server, WebConfig};

/// Default alarm threshold as a fraction of full-scale sensor reading
pub const DEFAULT_THRESHOLD: f32 = 0.03;

/// Default pause between monitor cycles in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;

/// Default web server bind address
pub const DEFAULT_WEB_HOST: &str = "0.0.0.0";

/// The default web server port
pub const DEFAULT_WEB_PORT: u16 = 5000;

/// Default BCM pin of the indicator LED
pub const DEFAULT_INDICATOR_PIN: u8 = 17;

/// Default BCM pin of the arming button
pub const DEFAULT_BUTTON_PIN: u8 = 2;

/// Default BCM pin of the buzzer
pub const DEFAULT_BUZZER_PIN: u8 = 27;

/// Default MCP3008 channel of the gas sensor
pub const DEFAULT_SENSOR_CHANNEL: u8 = 1;
