///! Session options

use pve_common::{DEFAULT_PORT, DEFAULT_REALM};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Options for establishing a [`Session`](crate::Session).
///
/// Deserializable so callers can embed it in their own config files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    /// Port used when the hostname carries none
    pub port: u16,
    /// Realm appended to user names without `@`
    pub default_realm: String,
    /// Accept any server certificate
    pub tls_skip_verify: bool,
    /// Per-request deadline in milliseconds, unlimited when unset
    pub timeout_ms: Option<u64>,
    pub connect_timeout_ms: Option<u64>,
    /// Idle keep-alive connections kept per host
    pub pool_max_idle_per_host: usize,
    pub user_agent: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            default_realm: DEFAULT_REALM.to_string(),
            // PVE nodes ship self-signed certificates
            tls_skip_verify: true,
            timeout_ms: None,
            connect_timeout_ms: None,
            pool_max_idle_per_host: 100,
            user_agent: concat!("pve-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl SessionOptions {
    pub fn verify_tls(mut self) -> Self {
        self.tls_skip_verify = false;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(millis(timeout));
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = Some(millis(timeout));
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub(crate) fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub(crate) fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }
}

// Sub-millisecond deadlines round up so they never become zero.
fn millis(timeout: Duration) -> u64 {
    let ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
    if ms == 0 && !timeout.is_zero() {
        1
    } else {
        ms
    }
}
