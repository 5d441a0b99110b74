//! Frontend configuration.

use serde::Deserialize;

/// Which auction service backs the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderMode {
    /// NEAR JSON-RPC against a deployed auction contract.
    Rpc,
    /// In-process auction service seeded with demo data.
    Memory,
}

impl ProviderMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderMode::Rpc => "rpc",
            ProviderMode::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "defaults::provider")]
    pub provider: ProviderMode,

    #[serde(default = "defaults::rpc_url")]
    pub rpc_url: String,

    #[serde(default = "defaults::fallback_rpc_url")]
    pub fallback_rpc_url: String,

    #[serde(default = "defaults::contract_id")]
    pub contract_id: String,

    #[serde(default = "defaults::bind_address")]
    pub bind_address: String,

    /// Gas attached to every contract call (TGas).
    #[serde(default = "defaults::gas_tgas")]
    pub gas_tgas: u64,

    /// near-cli key file for signing. Without one the session is read-only.
    #[serde(default)]
    pub keys_path: Option<String>,

    /// Caller account in memory mode.
    #[serde(default = "defaults::demo_account")]
    pub demo_account: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: defaults::provider(),
            rpc_url: defaults::rpc_url(),
            fallback_rpc_url: defaults::fallback_rpc_url(),
            contract_id: defaults::contract_id(),
            bind_address: defaults::bind_address(),
            gas_tgas: defaults::gas_tgas(),
            keys_path: None,
            demo_account: defaults::demo_account(),
        }
    }
}

impl Config {
    /// `frontend.toml` (optional) overridden by `AUCTION_*` env vars.
    /// Falls back to defaults only when nothing is configured.
    pub fn load() -> Result<Self, crate::Error> {
        let built = config::Config::builder()
            .add_source(config::File::with_name("frontend").required(false))
            .add_source(config::Environment::with_prefix("AUCTION"))
            .build()
            .and_then(|c| c.try_deserialize::<Config>());

        match built {
            Ok(c) => Ok(c),
            Err(e) => {
                let err_str = format!("{e}");
                if err_str.contains("not found") {
                    Ok(Config::default())
                } else {
                    Err(crate::Error::Config(err_str))
                }
            }
        }
    }
}

mod defaults {
    use super::ProviderMode;

    fn network() -> String {
        std::env::var("AUCTION_NETWORK")
            .or_else(|_| std::env::var("NEAR_NETWORK"))
            .unwrap_or_else(|_| "testnet".into())
    }

    pub fn provider() -> ProviderMode {
        ProviderMode::Rpc
    }

    pub fn rpc_url() -> String {
        if network().contains("mainnet") {
            "https://rpc.mainnet.near.org".into()
        } else {
            "https://rpc.testnet.near.org".into()
        }
    }

    pub fn fallback_rpc_url() -> String {
        if network().contains("mainnet") {
            "https://free.rpc.fastnear.com".into()
        } else {
            "https://test.rpc.fastnear.com".into()
        }
    }

    pub fn contract_id() -> String {
        "auction.testnet".into()
    }

    pub fn bind_address() -> String {
        "0.0.0.0:3050".into()
    }

    pub fn gas_tgas() -> u64 {
        100
    }

    pub fn demo_account() -> String {
        "guest.testnet".into()
    }
}
