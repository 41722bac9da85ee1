//! Hyper transport configuration.

use std::time::Duration;

/// Configuration for [`HyperTransport`](crate::HyperTransport).
///
/// The request timeout is not here: each request carries its own.
#[derive(Debug, Clone)]
pub struct HyperConfig {
    /// Connection timeout duration.
    pub connect_timeout: Duration,
    /// Maximum idle connections per host.
    pub pool_idle_per_host: usize,
    /// Idle connection timeout.
    pub pool_idle_timeout: Duration,
    /// Whether to negotiate HTTP/2 over TLS.
    pub http2: bool,
}

impl Default for HyperConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            pool_idle_per_host: 32,
            pool_idle_timeout: Duration::from_secs(90),
            http2: true,
        }
    }
}

impl HyperConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> HyperConfigBuilder {
        HyperConfigBuilder::default()
    }
}

/// Builder for [`HyperConfig`].
#[derive(Debug, Clone, Default)]
pub struct HyperConfigBuilder {
    connect_timeout: Option<Duration>,
    pool_idle_per_host: Option<usize>,
    pool_idle_timeout: Option<Duration>,
    http2: Option<bool>,
}

impl HyperConfigBuilder {
    /// Set the connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub const fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.pool_idle_per_host = Some(count);
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub const fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = Some(timeout);
        self
    }

    /// Enable or disable HTTP/2.
    #[must_use]
    pub const fn http2(mut self, enabled: bool) -> Self {
        self.http2 = Some(enabled);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> HyperConfig {
        let defaults = HyperConfig::default();
        HyperConfig {
            connect_timeout: self.connect_timeout.unwrap_or(defaults.connect_timeout),
            pool_idle_per_host: self
                .pool_idle_per_host
                .unwrap_or(defaults.pool_idle_per_host),
            pool_idle_timeout: self.pool_idle_timeout.unwrap_or(defaults.pool_idle_timeout),
            http2: self.http2.unwrap_or(defaults.http2),
        }
    }
}
