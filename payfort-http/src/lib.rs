//! HTTP transport for the Payfort client.
//!
//! Provides [`ReqwestTransport`](transport::ReqwestTransport), an
//! implementation of [`payfort::transport::Transport`] backed by `reqwest`.
//!
//! # Modules
//!
//! - [`constants`] - Default timeout and content type
//! - [`error`] - HTTP transport error types
//! - [`transport`] - The reqwest transport and its configuration
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation for debugging and monitoring

pub mod constants;
pub mod error;
pub mod transport;

pub use error::HttpTransportError;
pub use transport::{ReqwestTransport, TransportConfig};
