//! Transaction Finalizer
//!
//! Makes an unsigned transaction ready for a wallet: fee payer designated
//! and a recent blockhash attached. Already-finalized transactions are left
//! alone and cost no RPC call.

use std::sync::Arc;
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

use crate::domain::{TransactionError, UnsignedTransaction};
use crate::ports::{BlockhashPort, ChainError};

#[derive(Debug, Error)]
pub enum FinalizeError {
    #[error("Failed to fetch recent blockhash: {0}")]
    Chain(#[from] ChainError),
    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

#[derive(Clone)]
pub struct TransactionFinalizer {
    chain: Arc<dyn BlockhashPort>,
}

impl TransactionFinalizer {
    pub fn new(chain: Arc<dyn BlockhashPort>) -> Self {
        Self { chain }
    }

    /// Attach `fee_payer` (when the transaction has none) and a blockhash
    /// (when it has none). Fetch errors propagate unchanged.
    pub async fn finalize(
        &self,
        tx: &mut UnsignedTransaction,
        fee_payer: Option<&Pubkey>,
    ) -> Result<(), FinalizeError> {
        if tx.fee_payer().is_none() {
            if let Some(payer) = fee_payer {
                tx.set_fee_payer(payer)?;
            }
        }

        if tx.recent_blockhash().is_none() {
            let blockhash = self.chain.get_latest_blockhash().await?;
            tracing::debug!("Attached blockhash {} to unsigned transaction", blockhash);
            tx.set_recent_blockhash(blockhash);
        }

        Ok(())
    }

    /// Finalize then encode to the base64 transport form
    pub async fn finalize_to_base64(
        &self,
        mut tx: UnsignedTransaction,
        fee_payer: Option<&Pubkey>,
    ) -> Result<String, FinalizeError> {
        self.finalize(&mut tx, fee_payer).await?;
        Ok(tx.to_base64()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::chain::MockBlockhashPort;
    use crate::ports::mocks::sample_transaction;
    use solana_sdk::hash::Hash;

    #[tokio::test]
    async fn test_attaches_payer_and_blockhash() {
        let hash = Hash::new_unique();
        let mut chain = MockBlockhashPort::new();
        chain
            .expect_get_latest_blockhash()
            .times(1)
            .returning(move || Ok(hash));
        let finalizer = TransactionFinalizer::new(Arc::new(chain));

        let payer = Pubkey::new_unique();
        let mut tx = sample_transaction(None);
        finalizer.finalize(&mut tx, Some(&payer)).await.unwrap();

        assert_eq!(tx.fee_payer(), Some(payer));
        assert_eq!(tx.recent_blockhash(), Some(hash));
    }

    #[tokio::test]
    async fn test_finalized_transaction_untouched_without_fetch() {
        let mut chain = MockBlockhashPort::new();
        chain.expect_get_latest_blockhash().never();
        let finalizer = TransactionFinalizer::new(Arc::new(chain));

        let payer = Pubkey::new_unique();
        let mut tx = sample_transaction(Some(&payer));
        tx.set_recent_blockhash(Hash::new_unique());
        let before = tx.clone();

        finalizer.finalize(&mut tx, Some(&Pubkey::new_unique())).await.unwrap();
        finalizer.finalize(&mut tx, Some(&Pubkey::new_unique())).await.unwrap();
        assert_eq!(tx, before);
    }

    #[tokio::test]
    async fn test_second_finalize_is_noop() {
        let hash = Hash::new_unique();
        let mut chain = MockBlockhashPort::new();
        chain
            .expect_get_latest_blockhash()
            .times(1)
            .returning(move || Ok(hash));
        let finalizer = TransactionFinalizer::new(Arc::new(chain));

        let payer = Pubkey::new_unique();
        let mut tx = sample_transaction(Some(&payer));
        finalizer.finalize(&mut tx, Some(&payer)).await.unwrap();
        let once = tx.clone();
        finalizer.finalize(&mut tx, Some(&payer)).await.unwrap();
        assert_eq!(tx, once);
    }

    #[tokio::test]
    async fn test_missing_payer_left_unset_without_candidate() {
        let mut chain = MockBlockhashPort::new();
        chain
            .expect_get_latest_blockhash()
            .returning(|| Ok(Hash::new_unique()));
        let finalizer = TransactionFinalizer::new(Arc::new(chain));

        let mut tx = sample_transaction(None);
        finalizer.finalize(&mut tx, None).await.unwrap();
        assert!(tx.fee_payer().is_none());
        assert!(tx.recent_blockhash().is_some());
    }

    #[tokio::test]
    async fn test_fetch_error_propagates() {
        let mut chain = MockBlockhashPort::new();
        chain
            .expect_get_latest_blockhash()
            .returning(|| Err(ChainError::RpcError("node unavailable".to_string())));
        let finalizer = TransactionFinalizer::new(Arc::new(chain));

        let mut tx = sample_transaction(None);
        let err = finalizer.finalize(&mut tx, None).await.unwrap_err();
        assert!(matches!(err, FinalizeError::Chain(_)));
        assert!(err.to_string().contains("node unavailable"));
    }
}
