//! Error handling for the gas sentinel crate.

/// A specialized `Result` type for gas sentinel operations.
pub type Result<T> = std::result::Result<T, AlarmError>;

/// The main error type for alarm, hardware and web operations.
#[derive(Debug, thiserror::Error)]
pub enum AlarmError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Digital pin access failed
    #[error("GPIO error: {0}")]
    Gpio(String),

    /// Analog sensor read failed
    #[error("Sensor error: {0}")]
    Sensor(String),

    /// Web server error
    #[error("Web server error: {0}")]
    WebServer(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AlarmError {
    /// Create a new GPIO error
    pub fn gpio_error(msg: impl Into<String>) -> Self {
        Self::Gpio(msg.into())
    }

    /// Create a new sensor error
    pub fn sensor_error(msg: impl Into<String>) -> Self {
        Self::Sensor(msg.into())
    }

    /// Create a new web server error
    pub fn web_server_error(msg: impl Into<String>) -> Self {
        Self::WebServer(msg.into())
    }

    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
