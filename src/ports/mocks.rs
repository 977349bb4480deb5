use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use solana_sdk::{
    hash::Hash,
    instruction::{AccountMeta, Instruction},
    message::Message,
    pubkey::Pubkey,
    transaction::Transaction,
};

use crate::domain::{FeePosition, UnsignedTransaction};
use super::assets::{AssetError, AssetPort, FetchedAsset};
use super::chain::{BlockhashPort, ChainError};
use super::launchpad::{
    LaunchTransactionParams, LaunchpadError, LaunchpadPort, TokenInfo, TokenMetadataRequest,
    WalletConfig,
};

/// Legacy transaction with no blockhash, paid by `payer` when given
pub fn sample_transaction(payer: Option<&Pubkey>) -> UnsignedTransaction {
    let account = payer.copied().unwrap_or_else(Pubkey::new_unique);
    let ix = Instruction::new_with_bytes(
        Pubkey::new_unique(),
        &[1, 2, 3],
        vec![AccountMeta::new(account, payer.is_some())],
    );
    UnsignedTransaction::Legacy(Transaction::new_unsigned(Message::new(&[ix], payer)))
}

/// Mock launchpad that records calls and serves canned responses
#[derive(Debug)]
pub struct MockLaunchpad {
    configured: bool,
    calls: Arc<Mutex<Vec<String>>>,
    token_mint: Pubkey,
    config_key: Pubkey,
    pending_config: Arc<Mutex<Option<UnsignedTransaction>>>,
    positions: Vec<serde_json::Value>,
    claim_txs_per_position: usize,
    metadata_requests: Arc<Mutex<Vec<TokenMetadataRequest>>>,
    launch_params: Arc<Mutex<Vec<LaunchTransactionParams>>>,
}

impl Default for MockLaunchpad {
    fn default() -> Self {
        Self {
            configured: true,
            calls: Arc::default(),
            token_mint: Pubkey::new_unique(),
            config_key: Pubkey::new_unique(),
            pending_config: Arc::default(),
            positions: Vec::new(),
            claim_txs_per_position: 1,
            metadata_requests: Arc::default(),
            launch_params: Arc::default(),
        }
    }
}

impl MockLaunchpad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Behave as if no API key was supplied
    pub fn unconfigured(mut self) -> Self {
        self.configured = false;
        self
    }

    /// Next config lookup returns a pending setup transaction; later ones do not
    pub fn with_pending_config(self) -> Self {
        *self.pending_config.lock().unwrap() = Some(sample_transaction(None));
        self
    }

    /// Positions returned by the claimable listing
    pub fn with_positions(mut self, positions: Vec<serde_json::Value>) -> Self {
        self.positions = positions;
        self
    }

    pub fn with_claim_txs_per_position(mut self, count: usize) -> Self {
        self.claim_txs_per_position = count;
        self
    }

    pub fn token_mint(&self) -> Pubkey {
        self.token_mint
    }

    pub fn config_key(&self) -> Pubkey {
        self.config_key
    }

    pub fn metadata_url(&self) -> String {
        format!("https://ipfs.example/{}", self.token_mint)
    }

    /// Get all recorded calls
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn metadata_requests(&self) -> Vec<TokenMetadataRequest> {
        self.metadata_requests.lock().unwrap().clone()
    }

    pub fn launch_params(&self) -> Vec<LaunchTransactionParams> {
        self.launch_params.lock().unwrap().clone()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }
}

#[async_trait]
impl LaunchpadPort for MockLaunchpad {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn create_token_info_and_metadata(
        &self,
        request: TokenMetadataRequest,
    ) -> Result<TokenInfo, LaunchpadError> {
        self.record("create_token_info_and_metadata");
        self.metadata_requests.lock().unwrap().push(request);
        Ok(TokenInfo {
            token_mint: self.token_mint.to_string(),
            token_metadata: self.metadata_url(),
        })
    }

    async fn get_or_create_config(&self, _wallet: &Pubkey) -> Result<WalletConfig, LaunchpadError> {
        self.record("get_or_create_config");
        Ok(WalletConfig {
            config_key: self.config_key,
            transaction: self.pending_config.lock().unwrap().take(),
        })
    }

    async fn create_launch_transaction(
        &self,
        params: LaunchTransactionParams,
    ) -> Result<UnsignedTransaction, LaunchpadError> {
        self.record("create_launch_transaction");
        let tx = sample_transaction(Some(&params.launch_wallet));
        self.launch_params.lock().unwrap().push(params);
        Ok(tx)
    }

    async fn get_all_claimable_positions(
        &self,
        _wallet: &Pubkey,
    ) -> Result<Vec<FeePosition>, LaunchpadError> {
        self.record("get_all_claimable_positions");
        Ok(self
            .positions
            .iter()
            .filter_map(|raw| FeePosition::revive(raw).ok())
            .collect())
    }

    async fn get_claim_transactions(
        &self,
        owner: &Pubkey,
        position: &FeePosition,
    ) -> Result<Vec<UnsignedTransaction>, LaunchpadError> {
        self.record("get_claim_transactions");
        if position.base_mint().is_none() {
            return Err(LaunchpadError::ApiError {
                status: 400,
                message: "baseMint.toBase58 is not a function".to_string(),
            });
        }
        Ok((0..self.claim_txs_per_position)
            .map(|_| sample_transaction(Some(owner)))
            .collect())
    }
}

/// Blockhash source returning a fixed hash and counting fetches
#[derive(Debug)]
pub struct MockBlockhash {
    blockhash: Hash,
    fail: bool,
    calls: AtomicUsize,
}

impl MockBlockhash {
    pub fn new() -> Self {
        Self {
            blockhash: Hash::new_unique(),
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Every fetch fails with an RPC error
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn blockhash(&self) -> Hash {
        self.blockhash
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockBlockhash {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlockhashPort for MockBlockhash {
    async fn get_latest_blockhash(&self) -> Result<Hash, ChainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ChainError::RpcError("connection refused".to_string()));
        }
        Ok(self.blockhash)
    }
}

/// Asset fetcher serving canned responses by URL
#[derive(Debug, Default)]
pub struct MockAssets {
    responses: Arc<Mutex<HashMap<String, FetchedAsset>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set a response for a given URL
    pub fn with_asset(self, url: &str, status: u16, content_type: Option<&str>, bytes: &[u8]) -> Self {
        self.responses.lock().unwrap().insert(
            url.to_string(),
            FetchedAsset {
                status,
                content_type: content_type.map(str::to_string),
                bytes: bytes.to_vec(),
            },
        );
        self
    }

    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssetPort for MockAssets {
    async fn fetch_asset(&self, url: &str) -> Result<FetchedAsset, AssetError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| AssetError::RequestFailed(format!("no route to {}", url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_launchpad_pending_config_consumed_once() {
        let mock = MockLaunchpad::new().with_pending_config();
        let wallet = Pubkey::new_unique();

        let first = mock.get_or_create_config(&wallet).await.unwrap();
        assert!(first.transaction.is_some());

        let second = mock.get_or_create_config(&wallet).await.unwrap();
        assert!(second.transaction.is_none());
        assert_eq!(second.config_key, mock.config_key());
        assert_eq!(mock.get_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_mock_blockhash_counts() {
        let mock = MockBlockhash::new();
        assert_eq!(mock.get_latest_blockhash().await, Ok(mock.blockhash()));
        assert_eq!(mock.call_count(), 1);

        let failing = MockBlockhash::failing();
        assert!(failing.get_latest_blockhash().await.is_err());
    }

    #[tokio::test]
    async fn test_mock_assets() {
        let mock = MockAssets::new().with_asset("https://img", 200, Some("image/png"), b"png");

        let asset = mock.fetch_asset("https://img").await.unwrap();
        assert!(asset.is_success());
        assert!(mock.fetch_asset("https://other").await.is_err());
        assert_eq!(mock.get_calls().len(), 2);
    }
}
