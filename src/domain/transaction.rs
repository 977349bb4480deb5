//! Unsigned Transaction
//!
//! Wire model for transactions handed to a client wallet for signing.
//! Covers both legacy and versioned (v0) messages, decoding from the
//! launchpad's base58 form and encoding to base64 for transport.

use base64::Engine;
use solana_sdk::{
    hash::Hash,
    instruction::{AccountMeta, Instruction},
    message::{Message, VersionedMessage},
    pubkey::Pubkey,
    signature::Signature,
    transaction::{Transaction, VersionedTransaction},
};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransactionError {
    #[error("Failed to decode transaction: {0}")]
    DecodeError(String),

    #[error("Malformed transaction message: {0}")]
    MalformedMessage(String),

    #[error("Failed to serialize transaction: {0}")]
    SerializationError(String),
}

/// A transaction that still lacks the owner's signature
#[derive(Debug, Clone, PartialEq)]
pub enum UnsignedTransaction {
    /// Legacy message format
    Legacy(Transaction),
    /// Versioned message format (v0 with lookup tables)
    Versioned(VersionedTransaction),
}

impl UnsignedTransaction {
    /// Decode from the base58 string the launchpad API returns
    pub fn from_base58(encoded: &str) -> Result<Self, TransactionError> {
        let bytes = bs58::decode(encoded.trim())
            .into_vec()
            .map_err(|e| TransactionError::DecodeError(format!("invalid base58: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// Decode from base64 (the form this service hands out)
    pub fn from_base64(encoded: &str) -> Result<Self, TransactionError> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| TransactionError::DecodeError(format!("invalid base64: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// Decode raw wire bytes. The versioned layout is a superset of the
    /// legacy one, so a single deserialization covers both.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let tx: VersionedTransaction = bincode::deserialize(bytes)
            .map_err(|e| TransactionError::DecodeError(e.to_string()))?;

        Ok(match tx.message {
            VersionedMessage::Legacy(message) => Self::Legacy(Transaction {
                signatures: tx.signatures,
                message,
            }),
            VersionedMessage::V0(_) => Self::Versioned(tx),
        })
    }

    pub fn is_versioned(&self) -> bool {
        matches!(self, Self::Versioned(_))
    }

    /// Fee payer, if the message already designates one
    pub fn fee_payer(&self) -> Option<Pubkey> {
        match self {
            Self::Legacy(tx) => {
                if tx.message.header.num_required_signatures == 0 {
                    return None;
                }
                tx.message.account_keys.first().copied()
            }
            Self::Versioned(tx) => tx.message.static_account_keys().first().copied(),
        }
    }

    /// Recent blockhash, if set (an all-zero hash counts as unset)
    pub fn recent_blockhash(&self) -> Option<Hash> {
        let hash = match self {
            Self::Legacy(tx) => tx.message.recent_blockhash,
            Self::Versioned(tx) => *tx.message.recent_blockhash(),
        };
        (hash != Hash::default()).then_some(hash)
    }

    /// Designate a fee payer on a legacy message that has none.
    ///
    /// The message is recompiled with the payer as first signer. Versioned
    /// messages always carry their payer, so they are left untouched.
    pub fn set_fee_payer(&mut self, payer: &Pubkey) -> Result<(), TransactionError> {
        let Self::Legacy(tx) = self else {
            return Ok(());
        };

        let instructions = decompile_instructions(&tx.message)?;
        let blockhash = tx.message.recent_blockhash;
        let message = Message::new_with_blockhash(&instructions, Some(payer), &blockhash);
        *tx = Transaction::new_unsigned(message);
        Ok(())
    }

    pub fn set_recent_blockhash(&mut self, blockhash: Hash) {
        match self {
            Self::Legacy(tx) => tx.message.recent_blockhash = blockhash,
            Self::Versioned(tx) => tx.message.set_recent_blockhash(blockhash),
        }
    }

    /// Serialize to wire bytes without requiring or verifying signatures
    pub fn to_bytes(&self) -> Result<Vec<u8>, TransactionError> {
        match self {
            Self::Legacy(tx) => {
                let mut tx = tx.clone();
                let required = tx.message.header.num_required_signatures as usize;
                if tx.signatures.len() < required {
                    tx.signatures.resize(required, Signature::default());
                }
                bincode::serialize(&tx)
            }
            Self::Versioned(tx) => bincode::serialize(tx),
        }
        .map_err(|e| TransactionError::SerializationError(e.to_string()))
    }

    /// Transport string handed to the client wallet
    pub fn to_base64(&self) -> Result<String, TransactionError> {
        let bytes = self.to_bytes()?;
        Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
    }
}

impl From<Transaction> for UnsignedTransaction {
    fn from(tx: Transaction) -> Self {
        Self::Legacy(tx)
    }
}

impl From<VersionedTransaction> for UnsignedTransaction {
    fn from(tx: VersionedTransaction) -> Self {
        Self::Versioned(tx)
    }
}

/// Rebuild instructions from a compiled legacy message
fn decompile_instructions(message: &Message) -> Result<Vec<Instruction>, TransactionError> {
    let key_at = |index: usize| {
        message.account_keys.get(index).copied().ok_or_else(|| {
            TransactionError::MalformedMessage(format!("account index {} out of range", index))
        })
    };

    message
        .instructions
        .iter()
        .map(|ix| {
            let program_id = key_at(ix.program_id_index as usize)?;
            let accounts = ix
                .accounts
                .iter()
                .map(|&index| {
                    let index = index as usize;
                    Ok(AccountMeta {
                        pubkey: key_at(index)?,
                        is_signer: index < message.header.num_required_signatures as usize,
                        is_writable: is_writable_index(message, index),
                    })
                })
                .collect::<Result<Vec<_>, TransactionError>>()?;

            Ok(Instruction {
                program_id,
                accounts,
                data: ix.data.clone(),
            })
        })
        .collect()
}

fn is_writable_index(message: &Message, index: usize) -> bool {
    let header = &message.header;
    let signed = header.num_required_signatures as usize;
    if index < signed {
        index < signed.saturating_sub(header.num_readonly_signed_accounts as usize)
    } else {
        index
            < message
                .account_keys
                .len()
                .saturating_sub(header.num_readonly_unsigned_accounts as usize)
    }
}
