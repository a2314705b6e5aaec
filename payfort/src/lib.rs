#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Client for the Payfort payment-gateway API.
//!
//! Every request sent to the gateway carries the merchant's access code and
//! identifier plus a signature: a SHA digest over the canonicalized payload,
//! wrapped in a phrase shared with the gateway. Every response is verified
//! the same way with a second phrase before it is handed back.
//!
//! # Overview
//!
//! - [`Credential`] holds the merchant identity and the two SHA phrases.
//! - [`Signature`] canonicalizes payloads and computes or verifies digests.
//! - [`ApiClient`] runs the pipeline: sign, dispatch, parse, verify.
//! - [`Response`] is the read-only result with typed accessors.
//! - [`api`] has typed requests for each gateway operation.
//!
//! The network is reached through the [`Transport`](transport::Transport)
//! trait; the `payfort-http` crate provides a reqwest implementation.
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation for debugging and monitoring

pub mod api;
pub mod config;
pub mod credential;
pub mod environment;
pub mod error;
pub mod merchant;
pub mod operation;
pub mod options;
pub mod payload;
pub mod request;
pub mod response;
pub mod signature;
pub mod status;
pub mod transport;

pub use config::MerchantConfig;
pub use credential::{Credential, PhraseKind, ShaPhrase};
pub use environment::Environment;
pub use error::{Error, Result};
pub use merchant::Merchant;
pub use operation::Operation;
pub use payload::Payload;
pub use request::ApiClient;
pub use response::Response;
pub use signature::{HashAlgorithm, Signature};
pub use status::Status;
