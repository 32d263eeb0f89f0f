//! Server configuration.

use std::net::{IpAddr, SocketAddr};

/// Default bind address.
pub const DEFAULT_BIND: &str = "127.0.0.1";

/// Default port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default allowed CORS origin (the dashboard dev server).
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// HTTP service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind: String,
    /// Port to bind.
    pub port: u16,
    /// Origins allowed by CORS.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
        }
    }
}

impl ServerConfig {
    /// Sets the bind address.
    #[must_use]
    pub fn with_bind(mut self, bind: impl Into<String>) -> Self {
        self.bind = bind.into();
        self
    }

    /// Sets the port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the allowed CORS origins.
    #[must_use]
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    /// Resolves the socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns [`std::io::ErrorKind::InvalidInput`] if `bind` is not an IP address.
    pub fn socket_addr(&self) -> std::io::Result<SocketAddr> {
        let ip: IpAddr = self.bind.parse().map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid bind address: {}", self.bind),
            )
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
