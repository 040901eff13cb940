//! Where the control page listens and where it finds its assets.

use crate::error::{AlarmError, Result};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Listen address and asset location for the control page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Interface address, e.g. `0.0.0.0`
    pub host: String,
    pub port: u16,
    /// Send permissive CORS headers
    pub enable_cors: bool,
    /// Directory holding `styles.css` and `script.js`
    pub static_path: PathBuf,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self::new(crate::DEFAULT_WEB_HOST, crate::DEFAULT_WEB_PORT)
    }
}

impl WebConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            enable_cors: false,
            static_path: PathBuf::from("static"),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_cors(mut self, enable_cors: bool) -> Self {
        self.enable_cors = enable_cors;
        self
    }

    pub fn with_static_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.static_path = path.into();
        self
    }

    /// Socket address to bind. `host` must be a literal IPv4 or IPv6 address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self.host.parse().map_err(|e| {
            AlarmError::config_error(format!("Invalid bind address {:?}: {}", self.host, e))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Location of a page asset such as `styles.css`.
    pub fn asset_path(&self, name: &str) -> PathBuf {
        self.static_path.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr_defaults() {
        let addr = WebConfig::default().socket_addr().unwrap();
        assert_eq!(addr, "0.0.0.0:5000".parse::<SocketAddr>().unwrap());

        let v6 = WebConfig::new("::1", 8080).socket_addr().unwrap();
        assert_eq!(v6, "[::1]:8080".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn test_socket_addr_rejects_hostnames() {
        let result = WebConfig::new("raspberrypi.local", 5000).socket_addr();
        assert!(matches!(result, Err(AlarmError::Config(_))));
    }

    #[test]
    fn test_asset_path() {
        let config = WebConfig::default().with_static_path("/srv/gas");
        assert_eq!(config.asset_path("script.js"), PathBuf::from("/srv/gas/script.js"));
    }
}
