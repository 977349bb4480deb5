//! Application Layer - Use cases
//!
//! Sequences port calls into the operations the HTTP surface exposes:
//! transaction finalization, token launch and fee-claim batches.

pub mod finalizer;
pub mod launch;
pub mod fee_claims;

pub use finalizer::{FinalizeError, TransactionFinalizer};
pub use launch::{LaunchError, LaunchOrchestrator, LaunchRequest, LaunchSettings, LaunchStep};
pub use fee_claims::{ClaimBatch, ClaimFailure, FeeClaimService};
