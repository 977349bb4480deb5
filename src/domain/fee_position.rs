//! Fee Positions
//!
//! Claimable fee positions arrive from the launchpad as loosely typed JSON
//! where address fields may be plain base58 strings. They are parsed once
//! here: known address fields become `Pubkey`s, everything else is carried
//! through untouched so the position can be sent back upstream intact.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use solana_sdk::pubkey::Pubkey;
use std::collections::BTreeMap;
use std::str::FromStr;
use thiserror::Error;

/// Field names that carry addresses in launchpad fee positions
pub const ADDRESS_FIELDS: &[&str] = &[
    "customFeeVaultClaimerA",
    "customFeeVaultClaimerB",
    "customFeeVault",
    "feeVault",
    "baseMint",
    "quoteMint",
    "tokenMint",
    "mint",
    "pool",
    "owner",
    "creator",
    "authority",
    "receiver",
    "receiverA",
    "receiverB",
    "receiverC",
    "configKey",
    "wallet",
    "ata",
    "treasury",
    "payer",
];

/// Nested sub-record some positions use for their account set
pub const ACCOUNTS_FIELD: &str = "accounts";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PositionError {
    #[error("position must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// A fee position with its address fields revived
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeePosition {
    addresses: BTreeMap<String, Pubkey>,
    accounts: Option<Box<FeePosition>>,
    other: Map<String, Value>,
}

impl FeePosition {
    /// Revive a raw position. Non-object input cannot be a position.
    pub fn revive(raw: &Value) -> Result<Self, PositionError> {
        let map = raw
            .as_object()
            .ok_or_else(|| PositionError::NotAnObject(json_kind(raw)))?;

        let mut position = Self::revive_fields(map);

        // One level only: the nested record's own `accounts` stays verbatim.
        if let Some(Value::Object(accounts)) = position.other.get(ACCOUNTS_FIELD) {
            let nested = Self::revive_fields(accounts);
            position.other.remove(ACCOUNTS_FIELD);
            position.accounts = Some(Box::new(nested));
        }

        Ok(position)
    }

    fn revive_fields(map: &Map<String, Value>) -> Self {
        let mut addresses = BTreeMap::new();
        let mut other = Map::new();

        for (key, value) in map {
            if ADDRESS_FIELDS.contains(&key.as_str()) && is_truthy(value) {
                if let Some(pubkey) = value.as_str().and_then(|s| Pubkey::from_str(s).ok()) {
                    addresses.insert(key.clone(), pubkey);
                    continue;
                }
            }
            other.insert(key.clone(), value.clone());
        }

        Self {
            addresses,
            accounts: None,
            other,
        }
    }

    /// Typed address for a known field, if it revived
    pub fn address(&self, field: &str) -> Option<&Pubkey> {
        self.addresses.get(field)
    }

    pub fn base_mint(&self) -> Option<&Pubkey> {
        self.address("baseMint")
    }

    /// Revived nested account set
    pub fn accounts(&self) -> Option<&FeePosition> {
        self.accounts.as_deref()
    }

    /// Field kept in its original JSON form
    pub fn raw_field(&self, field: &str) -> Option<&Value> {
        self.other.get(field)
    }

    /// Canonical text of a field: base58 for addresses, the string itself
    /// for unrevived strings, empty when absent or falsy.
    pub fn field_text(&self, field: &str) -> String {
        if let Some(pubkey) = self.addresses.get(field) {
            return pubkey.to_string();
        }
        match self.other.get(field) {
            Some(Value::String(s)) => s.clone(),
            Some(value) if is_truthy(value) => value.to_string(),
            _ => String::new(),
        }
    }

    /// Whether the position belongs to the given mint
    pub fn matches_mint(&self, token_mint: &str) -> bool {
        self.field_text("baseMint") == token_mint
    }

    /// JSON form with addresses rendered as base58
    pub fn to_json(&self) -> Value {
        let mut map = self.other.clone();
        for (key, pubkey) in &self.addresses {
            map.insert(key.clone(), Value::String(pubkey.to_string()));
        }
        if let Some(accounts) = &self.accounts {
            map.insert(ACCOUNTS_FIELD.to_string(), accounts.to_json());
        }
        Value::Object(map)
    }
}

impl Serialize for FeePosition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_base_mint_revives_to_address() {
        let mint = Pubkey::new_unique();
        let position = FeePosition::revive(&json!({ "baseMint": mint.to_string() })).unwrap();

        assert_eq!(position.base_mint(), Some(&mint));
        assert_eq!(position.base_mint().unwrap().to_string(), mint.to_string());
    }

    #[test]
    fn test_unparseable_fields_kept_verbatim() {
        let position = FeePosition::revive(&json!({
            "baseMint": "not-a-key",
            "owner": "",
            "pool": null,
            "claimableDisplayAmount": 1.25,
        }))
        .unwrap();

        assert!(position.base_mint().is_none());
        assert_eq!(position.raw_field("baseMint"), Some(&json!("not-a-key")));
        assert_eq!(position.raw_field("owner"), Some(&json!("")));
        assert_eq!(position.raw_field("pool"), Some(&Value::Null));
        assert_eq!(position.raw_field("claimableDisplayAmount"), Some(&json!(1.25)));
    }

    #[test]
    fn test_unknown_fields_not_revived() {
        let key = Pubkey::new_unique().to_string();
        let position = FeePosition::revive(&json!({ "someOtherKey": key })).unwrap();

        assert!(position.address("someOtherKey").is_none());
        assert_eq!(position.raw_field("someOtherKey"), Some(&json!(key)));
    }

    #[test]
    fn test_accounts_revived_one_level() {
        let vault = Pubkey::new_unique();
        let deep = Pubkey::new_unique();
        let position = FeePosition::revive(&json!({
            "accounts": {
                "feeVault": vault.to_string(),
                "accounts": { "feeVault": deep.to_string() }
            }
        }))
        .unwrap();

        let accounts = position.accounts().unwrap();
        assert_eq!(accounts.address("feeVault"), Some(&vault));
        assert!(accounts.accounts().is_none());
        assert_eq!(
            accounts.raw_field("accounts"),
            Some(&json!({ "feeVault": deep.to_string() }))
        );
    }

    #[test]
    fn test_non_object_rejected() {
        assert_eq!(
            FeePosition::revive(&json!("abc")),
            Err(PositionError::NotAnObject("string"))
        );
        assert!(FeePosition::revive(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_json_round_trip_keeps_shape() {
        let raw = json!({
            "baseMint": Pubkey::new_unique().to_string(),
            "virtualPoolClaimableAmount": 42,
            "accounts": { "owner": Pubkey::new_unique().to_string() }
        });
        let position = FeePosition::revive(&raw).unwrap();

        assert_eq!(position.to_json(), raw);
        assert_eq!(serde_json::to_value(&position).unwrap(), raw);
    }

    #[test]
    fn test_matches_mint() {
        let mint = Pubkey::new_unique();
        let position = FeePosition::revive(&json!({ "baseMint": mint.to_string() })).unwrap();
        assert!(position.matches_mint(&mint.to_string()));
        assert!(!position.matches_mint(&Pubkey::new_unique().to_string()));

        let unrevived = FeePosition::revive(&json!({ "baseMint": "abc" })).unwrap();
        assert!(unrevived.matches_mint("abc"));

        let missing = FeePosition::revive(&json!({})).unwrap();
        assert!(!missing.matches_mint("abc"));
    }
}
