//! Local signing key for contract calls.
//!
//! Loaded from `AUCTION_KEYS_JSON` (near-cli JSON) or the configured key
//! file. No key means a read-only session.

use crate::config::Config;
use near_crypto::{PublicKey, SecretKey};
use near_primitives::hash::CryptoHash;
use near_primitives::transaction::{Action, SignedTransaction, Transaction, TransactionV0};
use near_primitives::types::{AccountId, Nonce};
use std::str::FromStr;
use tracing::info;

pub struct WalletSigner {
    signer: near_crypto::Signer,
}

impl WalletSigner {
    /// `Ok(None)` when no key is configured.
    pub fn load(config: &Config) -> Result<Option<Self>, crate::Error> {
        let json = if let Ok(keys_json) = std::env::var("AUCTION_KEYS_JSON") {
            keys_json
        } else if let Some(path) = &config.keys_path {
            std::fs::read_to_string(path)
                .map_err(|e| crate::Error::Signer(format!("Failed to read {path}: {e}")))?
        } else {
            return Ok(None);
        };

        let signer = parse_keys_json(&json)?;
        info!(account = %signer.account_id(), "Loaded signing key");
        Ok(Some(signer))
    }

    pub fn account_id(&self) -> AccountId {
        self.signer.get_account_id().clone()
    }

    pub fn public_key(&self) -> PublicKey {
        self.signer.public_key()
    }

    pub fn sign_transaction(
        &self,
        nonce: Nonce,
        receiver_id: &AccountId,
        block_hash: CryptoHash,
        actions: Vec<Action>,
    ) -> SignedTransaction {
        Transaction::V0(TransactionV0 {
            signer_id: self.account_id(),
            public_key: self.public_key(),
            nonce,
            receiver_id: receiver_id.clone(),
            block_hash,
            actions,
        })
        .sign(&self.signer)
    }
}

impl std::fmt::Debug for WalletSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WalletSigner({})", self.signer.public_key())
    }
}

/// Parse keys JSON in the near-cli format:
/// `[{"account_id": "...", "public_key": "...", "secret_key": "..."}]` or a
/// single object.
pub(crate) fn parse_keys_json(json: &str) -> Result<WalletSigner, crate::Error> {
    #[derive(serde::Deserialize)]
    struct KeyFile {
        account_id: String,
        #[serde(alias = "private_key")]
        secret_key: String,
    }

    let key: KeyFile = if json.trim().starts_with('[') {
        let keys: Vec<KeyFile> = serde_json::from_str(json)
            .map_err(|e| crate::Error::Signer(format!("Invalid key JSON: {e}")))?;
        keys.into_iter()
            .next()
            .ok_or_else(|| crate::Error::Signer("Empty key array".to_string()))?
    } else {
        serde_json::from_str(json)
            .map_err(|e| crate::Error::Signer(format!("Invalid key JSON: {e}")))?
    };

    let secret_key = SecretKey::from_str(&key.secret_key)
        .map_err(|e| crate::Error::Signer(format!("Invalid secret key: {e}")))?;
    let account_id: AccountId = key
        .account_id
        .parse()
        .map_err(|e| crate::Error::Signer(format!("Invalid account: {e}")))?;

    Ok(WalletSigner {
        signer: near_crypto::InMemorySigner::from_secret_key(account_id, secret_key),
    })
}
