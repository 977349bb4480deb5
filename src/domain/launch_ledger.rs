//! Launch Ledger
//!
//! Local record of tokens launched through this service, kept as a single
//! JSON array on disk (newest first). The file and its directory are
//! created on first access.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default ledger file name inside the data directory
pub const DEFAULT_LEDGER_FILE: &str = "launched.json";

/// Largest page the listing will return
pub const MAX_PAGE_SIZE: usize = 50;

/// Page size used when none (or zero) is requested
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Error, Debug, Clone)]
pub enum LedgerError {
    #[error("Failed to serialize ledger: {0}")]
    SerializationError(String),

    #[error("Failed to write ledger file: {0}")]
    WriteError(String),

    #[error("Failed to create directory: {0}")]
    DirectoryError(String),
}

/// A token launched by a client wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchRecord {
    pub token_mint: String,
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub wallet: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub created_at: String,
}

impl LaunchRecord {
    /// Create a record stamped with the current time
    pub fn new(token_mint: impl Into<String>) -> Self {
        Self {
            token_mint: token_mint.into(),
            signature: String::new(),
            wallet: String::new(),
            name: String::new(),
            symbol: String::new(),
            image_url: String::new(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = signature.into();
        self
    }

    pub fn with_wallet(mut self, wallet: impl Into<String>) -> Self {
        self.wallet = wallet.into();
        self
    }

    pub fn with_token_details(
        mut self,
        name: impl Into<String>,
        symbol: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        self.name = name.into();
        self.symbol = symbol.into();
        self.image_url = image_url.into();
        self
    }
}

/// One page of the ledger listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerPage {
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub items: Vec<LaunchRecord>,
}

/// Clamp a requested page number to >= 1
pub fn clamp_page(page: Option<i64>) -> usize {
    match page {
        Some(p) if p >= 1 => p as usize,
        _ => 1,
    }
}

/// Clamp a requested page size to [1, MAX_PAGE_SIZE]; absent or zero means default
pub fn clamp_page_size(page_size: Option<i64>) -> usize {
    match page_size {
        None | Some(0) => DEFAULT_PAGE_SIZE,
        Some(n) if n < 1 => 1,
        Some(n) => (n as usize).min(MAX_PAGE_SIZE),
    }
}

/// Flat-file store of launch records
#[derive(Debug, Clone)]
pub struct LaunchLedger {
    path: PathBuf,
}

impl LaunchLedger {
    /// Ledger stored at `<data_dir>/launched.json`
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(DEFAULT_LEDGER_FILE),
        }
    }

    /// Ledger stored at an explicit file path
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_data(&self) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| LedgerError::DirectoryError(e.to_string()))?;
        }
        if !self.path.exists() {
            fs::write(&self.path, "[]").map_err(|e| LedgerError::WriteError(e.to_string()))?;
        }
        Ok(())
    }

    /// All records, newest first. Unreadable contents read as empty.
    pub fn read_all(&self) -> Vec<LaunchRecord> {
        if let Err(e) = self.ensure_data() {
            tracing::warn!("Launch ledger unavailable at {}: {}", self.path.display(), e);
            return Vec::new();
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Failed to read launch ledger {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Launch ledger {} is corrupted: {}", self.path.display(), e);
            Vec::new()
        })
    }

    fn write_all(&self, records: &[LaunchRecord]) -> Result<(), LedgerError> {
        self.ensure_data()?;
        let content = serde_json::to_string_pretty(records)
            .map_err(|e| LedgerError::SerializationError(e.to_string()))?;
        fs::write(&self.path, content).map_err(|e| LedgerError::WriteError(e.to_string()))
    }

    /// Insert at the front unless the mint is already recorded.
    /// Returns whether the record was added.
    pub fn append_if_new(&self, record: LaunchRecord) -> Result<bool, LedgerError> {
        let mut records = self.read_all();
        if records.iter().any(|r| r.token_mint == record.token_mint) {
            tracing::debug!("Launch {} already recorded", record.token_mint);
            return Ok(false);
        }

        tracing::info!(
            "Recording launch: {} ({}) by {}",
            record.token_mint,
            record.symbol,
            record.wallet
        );
        records.insert(0, record);
        self.write_all(&records)?;
        Ok(true)
    }

    /// Page through records in stored order (1-indexed pages)
    pub fn list(&self, page: usize, page_size: usize) -> LedgerPage {
        let page = page.max(1);
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        let records = self.read_all();
        let total = records.len();

        let items = records
            .into_iter()
            .skip((page - 1).saturating_mul(page_size))
            .take(page_size)
            .collect();

        LedgerPage {
            total,
            page,
            page_size,
            items,
        }
    }

    pub fn len(&self) -> usize {
        self.read_all().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(mint: &str) -> LaunchRecord {
        LaunchRecord::new(mint)
            .with_signature("5igSig")
            .with_wallet("Wa11et")
            .with_token_details("Lime", "LIME", "https://example.com/lime.png")
    }

    #[test]
    fn test_created_lazily() {
        let dir = tempdir().unwrap();
        let ledger = LaunchLedger::new(dir.path().join("nested").join("data"));
        assert!(!ledger.path().exists());

        assert!(ledger.is_empty());
        assert!(ledger.path().exists());
        assert_eq!(fs::read_to_string(ledger.path()).unwrap(), "[]");
    }

    #[test]
    fn test_append_newest_first() {
        let dir = tempdir().unwrap();
        let ledger = LaunchLedger::new(dir.path());

        assert!(ledger.append_if_new(record("MintA")).unwrap());
        assert!(ledger.append_if_new(record("MintB")).unwrap());

        let all = ledger.read_all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].token_mint, "MintB");
        assert_eq!(all[1].token_mint, "MintA");
    }

    #[test]
    fn test_duplicate_mint_leaves_size_unchanged() {
        let dir = tempdir().unwrap();
        let ledger = LaunchLedger::new(dir.path());

        ledger.append_if_new(record("MintA")).unwrap();
        ledger.append_if_new(record("MintB")).unwrap();
        let before = ledger.len();

        let duplicate = LaunchRecord::new("MintA").with_wallet("SomeoneElse");
        assert!(!ledger.append_if_new(duplicate).unwrap());
        assert_eq!(ledger.len(), before);
        assert_eq!(ledger.read_all()[1].wallet, "Wa11et");
    }

    #[test]
    fn test_corrupted_file_reads_empty() {
        let dir = tempdir().unwrap();
        let ledger = LaunchLedger::new(dir.path());
        fs::write(ledger.path(), "{ not json").unwrap();

        assert!(ledger.read_all().is_empty());
        assert!(ledger.append_if_new(record("MintA")).unwrap());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_persisted_shape_is_camel_case() {
        let dir = tempdir().unwrap();
        let ledger = LaunchLedger::new(dir.path());
        ledger.append_if_new(record("MintA")).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(ledger.path()).unwrap()).unwrap();
        assert_eq!(raw[0]["tokenMint"], "MintA");
        assert_eq!(raw[0]["imageUrl"], "https://example.com/lime.png");
        assert!(raw[0]["createdAt"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_list_slices_contiguously() {
        let dir = tempdir().unwrap();
        let ledger = LaunchLedger::new(dir.path());
        for i in 0..7 {
            ledger.append_if_new(record(&format!("Mint{}", i))).unwrap();
        }
        let all = ledger.read_all();

        let page = ledger.list(2, 3);
        assert_eq!(page.total, 7);
        assert_eq!(page.items, all[3..6].to_vec());

        let last = ledger.list(3, 3);
        assert_eq!(last.items, all[6..].to_vec());

        let beyond = ledger.list(9, 3);
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, 7);
    }

    #[test]
    fn test_list_clamps_inputs() {
        let dir = tempdir().unwrap();
        let ledger = LaunchLedger::new(dir.path());
        let page = ledger.list(0, 500);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_clamp_helpers() {
        assert_eq!(clamp_page(None), 1);
        assert_eq!(clamp_page(Some(0)), 1);
        assert_eq!(clamp_page(Some(-4)), 1);
        assert_eq!(clamp_page(Some(3)), 3);

        assert_eq!(clamp_page_size(None), DEFAULT_PAGE_SIZE);
        assert_eq!(clamp_page_size(Some(0)), DEFAULT_PAGE_SIZE);
        assert_eq!(clamp_page_size(Some(-2)), 1);
        assert_eq!(clamp_page_size(Some(25)), 25);
        assert_eq!(clamp_page_size(Some(51)), 50);
    }
}
