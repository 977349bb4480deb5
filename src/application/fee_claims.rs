//! Fee Claims
//!
//! Lists a wallet's claimable fee positions and turns client-supplied
//! positions into unsigned claim transactions. Batches tolerate partial
//! failure: each bad position is reported by index and the rest proceed.

use std::sync::Arc;
use serde::Serialize;
use serde_json::Value;
use solana_sdk::pubkey::Pubkey;

use super::finalizer::TransactionFinalizer;
use crate::domain::FeePosition;
use crate::ports::{LaunchpadError, LaunchpadPort};

/// A position that could not be turned into claim transactions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaimFailure {
    pub index: usize,
    pub error: String,
}

/// Outcome of a claim batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClaimBatch {
    /// Base64 unsigned transactions in position order
    pub txs: Vec<String>,
    pub errors: Vec<ClaimFailure>,
}

impl ClaimBatch {
    /// Nothing was built and at least one position failed
    pub fn all_failed(&self) -> bool {
        self.txs.is_empty() && !self.errors.is_empty()
    }
}

#[derive(Clone)]
pub struct FeeClaimService {
    launchpad: Arc<dyn LaunchpadPort>,
    finalizer: TransactionFinalizer,
}

impl FeeClaimService {
    pub fn new(launchpad: Arc<dyn LaunchpadPort>, finalizer: TransactionFinalizer) -> Self {
        Self {
            launchpad,
            finalizer,
        }
    }

    /// Claimable positions for `wallet`, optionally narrowed to one base mint
    pub async fn claimable(
        &self,
        wallet: &Pubkey,
        token_mint: Option<&str>,
    ) -> Result<Vec<FeePosition>, LaunchpadError> {
        let positions = self.launchpad.get_all_claimable_positions(wallet).await?;
        tracing::debug!("{} claimable positions for {}", positions.len(), wallet);

        Ok(match token_mint.filter(|m| !m.is_empty()) {
            Some(mint) => positions.into_iter().filter(|p| p.matches_mint(mint)).collect(),
            None => positions,
        })
    }

    /// Build claim transactions for each raw position in order
    pub async fn build_claims(&self, owner: &Pubkey, positions: &[Value]) -> ClaimBatch {
        let mut batch = ClaimBatch::default();

        for (index, raw) in positions.iter().enumerate() {
            if let Err(error) = self.build_one(owner, raw, &mut batch.txs).await {
                tracing::warn!("Claim position {} failed: {}", index, error);
                batch.errors.push(ClaimFailure { index, error });
            }
        }

        tracing::info!(
            "Built {} claim transactions for {} ({} failed positions)",
            batch.txs.len(),
            owner,
            batch.errors.len()
        );
        batch
    }

    /// Transactions built before a failure stay in `out`
    async fn build_one(&self, owner: &Pubkey, raw: &Value, out: &mut Vec<String>) -> Result<(), String> {
        let position = FeePosition::revive(raw).map_err(|e| e.to_string())?;
        let txs = self
            .launchpad
            .get_claim_transactions(owner, &position)
            .await
            .map_err(|e| e.to_string())?;

        for tx in txs {
            let encoded = self
                .finalizer
                .finalize_to_base64(tx, Some(owner))
                .await
                .map_err(|e| e.to_string())?;
            out.push(encoded);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UnsignedTransaction;
    use crate::ports::mocks::{MockBlockhash, MockLaunchpad};
    use serde_json::json;

    fn service(launchpad: MockLaunchpad, chain: Arc<MockBlockhash>) -> FeeClaimService {
        FeeClaimService::new(Arc::new(launchpad), TransactionFinalizer::new(chain))
    }

    #[tokio::test]
    async fn test_claimable_filtered_by_mint() {
        let mint_a = Pubkey::new_unique().to_string();
        let mint_b = Pubkey::new_unique().to_string();
        let launchpad = MockLaunchpad::new().with_positions(vec![
            json!({ "baseMint": mint_a, "claimable": 1 }),
            json!({ "baseMint": mint_b, "claimable": 2 }),
        ]);
        let svc = service(launchpad, Arc::new(MockBlockhash::new()));
        let wallet = Pubkey::new_unique();

        assert_eq!(svc.claimable(&wallet, None).await.unwrap().len(), 2);
        assert_eq!(svc.claimable(&wallet, Some("")).await.unwrap().len(), 2);

        let only_a = svc.claimable(&wallet, Some(&mint_a)).await.unwrap();
        assert_eq!(only_a.len(), 1);
        assert_eq!(only_a[0].field_text("baseMint"), mint_a);
    }

    #[tokio::test]
    async fn test_partial_failure_collected() {
        let chain = Arc::new(MockBlockhash::new());
        let svc = service(MockLaunchpad::new().with_claim_txs_per_position(2), chain.clone());
        let owner = Pubkey::new_unique();

        let positions = vec![
            json!({ "baseMint": Pubkey::new_unique().to_string() }),
            json!({ "baseMint": "not-a-key" }),
            json!({ "baseMint": Pubkey::new_unique().to_string() }),
        ];
        let batch = svc.build_claims(&owner, &positions).await;

        assert_eq!(batch.txs.len(), 4);
        assert_eq!(batch.errors.len(), 1);
        assert_eq!(batch.errors[0].index, 1);
        assert!(!batch.all_failed());

        let tx = UnsignedTransaction::from_base64(&batch.txs[0]).unwrap();
        assert_eq!(tx.fee_payer(), Some(owner));
        assert_eq!(tx.recent_blockhash(), Some(chain.blockhash()));
    }

    #[tokio::test]
    async fn test_non_object_position_reported() {
        let svc = service(MockLaunchpad::new(), Arc::new(MockBlockhash::new()));
        let batch = svc
            .build_claims(&Pubkey::new_unique(), &[json!("just a string")])
            .await;

        assert!(batch.all_failed());
        assert!(batch.errors[0].error.contains("JSON object"));
    }

    #[tokio::test]
    async fn test_no_transactions_is_not_failure() {
        let svc = service(
            MockLaunchpad::new().with_claim_txs_per_position(0),
            Arc::new(MockBlockhash::new()),
        );
        let batch = svc
            .build_claims(&Pubkey::new_unique(), &[json!({ "baseMint": Pubkey::new_unique().to_string() })])
            .await;

        assert!(batch.txs.is_empty());
        assert!(batch.errors.is_empty());
        assert!(!batch.all_failed());
    }

    #[tokio::test]
    async fn test_blockhash_failure_per_position() {
        let svc = service(MockLaunchpad::new(), Arc::new(MockBlockhash::failing()));
        let batch = svc
            .build_claims(&Pubkey::new_unique(), &[json!({ "baseMint": Pubkey::new_unique().to_string() })])
            .await;

        assert!(batch.all_failed());
        assert!(batch.errors[0].error.contains("blockhash"));
    }
}
