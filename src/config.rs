// src/config.rs
// =============================================================================
// Tunables for probing and fan-out.
//
// Everything here has a Default so library users can wire components
// without thinking about numbers; the CLI overrides fields from flags.
// =============================================================================

use std::time::Duration;

/// Default TCP connect timeout for a probe.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Default time allowed for the response once connected.
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 5;

/// Redirect hops followed before a probe gives up.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Default number of in-flight probes for batch, scan and sweep.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Hard ceiling on in-flight probes, whatever the caller asks for.
pub const MAX_CONCURRENCY: usize = 64;

/// How a single probe talks to the network.
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    pub connect_timeout: Duration,
    /// Budget for the response after the connection is up. The probe's
    /// overall deadline is `connect_timeout + read_timeout`.
    pub read_timeout: Duration,
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(DEFAULT_READ_TIMEOUT_SECS),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: format!("link-vigil/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl CheckerConfig {
    /// Total time a probe may take before it is classified as an error.
    ///
    /// Saturates instead of overflowing when both timeouts are huge.
    pub fn request_deadline(&self) -> Duration {
        self.connect_timeout.saturating_add(self.read_timeout)
    }
}

/// Keeps a requested worker count inside `1..=MAX_CONCURRENCY`.
pub fn clamp_concurrency(requested: usize) -> usize {
    requested.clamp(1, MAX_CONCURRENCY)
}
