//! Launchpad Adapter
//!
//! Implementation of the LaunchpadPort for the token-launch REST API.

mod client;
mod types;

pub use client::{parse_envelope, BagsClient, BagsConfig, DEFAULT_LAUNCHPAD_API};
pub use types::{ApiEnvelope, ClaimTransaction, CreateConfigResponse, TokenInfoResponse};
