//! Domain Layer - Core types for the LimeScope proxy
//!
//! Pure types and logic with no network access. All external interactions
//! happen through the ports layer.
//!
//! - `transaction`: unsigned transaction model and wire encoding
//! - `fee_position`: claimable fee positions with revived address fields
//! - `vanity`: vanity mint hints for metadata creation
//! - `launch_ledger`: flat-file list of launched tokens

pub mod transaction;
pub mod fee_position;
pub mod vanity;
pub mod launch_ledger;

pub use transaction::{UnsignedTransaction, TransactionError};
pub use fee_position::{FeePosition, PositionError, ADDRESS_FIELDS};
pub use vanity::VanityHint;
pub use launch_ledger::{LaunchLedger, LaunchRecord, LedgerPage, LedgerError};
