//! HTTP-specific constants for the Payfort transport.

use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum number of redirects followed by the default client.
pub const MAX_REDIRECTS: usize = 10;

/// Content type of gateway request bodies.
pub const APPLICATION_JSON: &str = "application/json";
