use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use crate::constants::compute_budget::DEFAULT_RPC_ENDPOINT;
use crate::errors::{BotError, BotResult};
use crate::init::wallet_loader::load_keypair;
use crate::utils::math::{slippage_percentage_to_bps, sol_to_lamports};

/// `config.toml` as written by the user. Every key may also come from the
/// environment, which wins over the file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub private_key: Option<String>,
    pub buy_amount_sol: Option<f64>,
    pub slippage_percentage: Option<f64>,
    pub token_mint: Option<String>,
    pub rpc_endpoint: Option<String>,
    pub priority_fee_sol: Option<f64>,
    pub transaction_interval_seconds: Option<i64>,
}

/// Validated settings, immutable after startup.
#[derive(Debug)]
pub struct BotConfig {
    pub keypair: Keypair,
    pub buy_amount_sol: f64,
    pub buy_amount_lamports: u64,
    pub slippage_percentage: f64,
    pub slippage_basis_points: u32,
    pub token_mint: Pubkey,
    pub rpc_endpoint: String,
    pub priority_fee_sol: f64,
    /// 0 runs a single cycle.
    pub transaction_interval_seconds: u64,
}

fn config_err(message: impl Into<String>) -> BotError {
    BotError::Configuration(message.into())
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> BotResult<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| config_err(format!("{} is not a valid number: {}", key, value)))
}

impl Config {
    pub fn from_toml_str(content: &str) -> BotResult<Self> {
        toml::from_str(content).map_err(|e| config_err(format!("config.toml: {}", e)))
    }

    /// Applies `PRIVATE_KEY`, `BUY_AMOUNT_IN_SOL`, `SLIPPAGE_PERCENTAGE`,
    /// `TOKEN_MINT`, `RPC_URL`, `PRIORITY_FEE_SOL` and
    /// `TRANSACTION_INTERVAL_SECONDS` from `lookup`.
    pub fn apply_env_overrides<F>(mut self, lookup: F) -> BotResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("PRIVATE_KEY") {
            self.private_key = Some(v);
        }
        if let Some(v) = lookup("BUY_AMOUNT_IN_SOL") {
            self.buy_amount_sol = Some(parse_env("BUY_AMOUNT_IN_SOL", &v)?);
        }
        if let Some(v) = lookup("SLIPPAGE_PERCENTAGE") {
            self.slippage_percentage = Some(parse_env("SLIPPAGE_PERCENTAGE", &v)?);
        }
        if let Some(v) = lookup("TOKEN_MINT") {
            self.token_mint = Some(v);
        }
        if let Some(v) = lookup("RPC_URL") {
            self.rpc_endpoint = Some(v);
        }
        if let Some(v) = lookup("PRIORITY_FEE_SOL") {
            self.priority_fee_sol = Some(parse_env("PRIORITY_FEE_SOL", &v)?);
        }
        if let Some(v) = lookup("TRANSACTION_INTERVAL_SECONDS") {
            self.transaction_interval_seconds =
                Some(parse_env("TRANSACTION_INTERVAL_SECONDS", &v)?);
        }
        Ok(self)
    }

    pub fn validate(self) -> BotResult<BotConfig> {
        let private_key = self
            .private_key
            .ok_or_else(|| config_err("PRIVATE_KEY (private_key) is required"))?;
        let buy_amount_sol = self
            .buy_amount_sol
            .ok_or_else(|| config_err("BUY_AMOUNT_IN_SOL (buy_amount_sol) is required"))?;
        let slippage_percentage = self
            .slippage_percentage
            .ok_or_else(|| config_err("SLIPPAGE_PERCENTAGE (slippage_percentage) is required"))?;
        let token_mint = self
            .token_mint
            .ok_or_else(|| config_err("TOKEN_MINT (token_mint) is required"))?;

        let keypair = load_keypair(&private_key)?;

        if !buy_amount_sol.is_finite() || buy_amount_sol <= 0.0 {
            return Err(config_err("BUY_AMOUNT_IN_SOL must be a positive number"));
        }
        let buy_amount_lamports = sol_to_lamports(buy_amount_sol)
            .map_err(|e| config_err(format!("BUY_AMOUNT_IN_SOL: {}", e)))?;
        if buy_amount_lamports == 0 {
            return Err(config_err("BUY_AMOUNT_IN_SOL is smaller than one lamport"));
        }

        if !(0.0..=100.0).contains(&slippage_percentage) {
            return Err(config_err(
                "SLIPPAGE_PERCENTAGE must be a number between 0 and 100",
            ));
        }
        let slippage_basis_points = slippage_percentage_to_bps(slippage_percentage)?;

        let token_mint = Pubkey::from_str(token_mint.trim())
            .map_err(|e| config_err(format!("TOKEN_MINT is not a valid address: {}", e)))?;

        let priority_fee_sol = self.priority_fee_sol.unwrap_or(0.0);
        if !priority_fee_sol.is_finite() || priority_fee_sol < 0.0 {
            return Err(config_err("PRIORITY_FEE_SOL must be a non-negative number"));
        }

        let interval = self.transaction_interval_seconds.unwrap_or(0);
        let transaction_interval_seconds = u64::try_from(interval).map_err(|_| {
            config_err("TRANSACTION_INTERVAL_SECONDS must be a non-negative number")
        })?;

        Ok(BotConfig {
            keypair,
            buy_amount_sol,
            buy_amount_lamports,
            slippage_percentage,
            slippage_basis_points,
            token_mint,
            rpc_endpoint: self
                .rpc_endpoint
                .unwrap_or_else(|| DEFAULT_RPC_ENDPOINT.to_string()),
            priority_fee_sol,
            transaction_interval_seconds,
        })
    }
}

/// Reads `path` (optional when the environment supplies every required key),
/// overlays the process environment and validates.
pub fn load_config(path: &Path) -> BotResult<BotConfig> {
    let config = if path.exists() {
        let content = fs::read_to_string(path)
            .map_err(|e| config_err(format!("reading {}: {}", path.display(), e)))?;
        Config::from_toml_str(&content)?
    } else {
        Config::default()
    };

    config
        .apply_env_overrides(|key| std::env::var(key).ok())?
        .validate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::signer::Signer;
    use std::collections::HashMap;

    fn secret() -> (Keypair, String) {
        let keypair = Keypair::new();
        let encoded = bs58::encode(keypair.to_bytes()).into_string();
        (keypair, encoded)
    }

    fn base_toml(private_key: &str) -> String {
        format!(
            r#"
private_key = "{}"
buy_amount_sol = 0.1
slippage_percentage = 5.0
token_mint = "{}"
"#,
            private_key,
            Pubkey::new_unique()
        )
    }

    #[test]
    fn test_defaults_applied() {
        let (keypair, encoded) = secret();
        let config = Config::from_toml_str(&base_toml(&encoded))
            .unwrap()
            .validate()
            .unwrap();
        assert_eq!(config.keypair.pubkey(), keypair.pubkey());
        assert_eq!(config.buy_amount_lamports, 100_000_000);
        assert_eq!(config.slippage_basis_points, 500);
        assert_eq!(config.rpc_endpoint, DEFAULT_RPC_ENDPOINT);
        assert_eq!(config.priority_fee_sol, 0.0);
        assert_eq!(config.transaction_interval_seconds, 0);
    }

    #[test]
    fn test_env_overrides_file() {
        let (_, encoded) = secret();
        let env: HashMap<&str, &str> = [
            ("BUY_AMOUNT_IN_SOL", "0.25"),
            ("TRANSACTION_INTERVAL_SECONDS", "30"),
            ("RPC_URL", "http://localhost:8899"),
        ]
        .into_iter()
        .collect();
        let config = Config::from_toml_str(&base_toml(&encoded))
            .unwrap()
            .apply_env_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap()
            .validate()
            .unwrap();
        assert_eq!(config.buy_amount_sol, 0.25);
        assert_eq!(config.transaction_interval_seconds, 30);
        assert_eq!(config.rpc_endpoint, "http://localhost:8899");
    }

    #[test]
    fn test_env_only_config() {
        let (_, encoded) = secret();
        let mint = Pubkey::new_unique().to_string();
        let env: HashMap<&str, String> = [
            ("PRIVATE_KEY", encoded),
            ("BUY_AMOUNT_IN_SOL", "1".to_string()),
            ("SLIPPAGE_PERCENTAGE", "0".to_string()),
            ("TOKEN_MINT", mint),
        ]
        .into_iter()
        .collect();
        let config = Config::default()
            .apply_env_overrides(|k| env.get(k).cloned())
            .unwrap()
            .validate()
            .unwrap();
        assert_eq!(config.buy_amount_lamports, 1_000_000_000);
        assert_eq!(config.slippage_basis_points, 0);
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let (_, encoded) = secret();
        let cases: [(&str, &str); 5] = [
            ("BUY_AMOUNT_IN_SOL", "0"),
            ("SLIPPAGE_PERCENTAGE", "100.5"),
            ("PRIORITY_FEE_SOL", "-0.01"),
            ("TRANSACTION_INTERVAL_SECONDS", "-5"),
            ("TOKEN_MINT", "not-a-mint"),
        ];
        for (key, value) in cases {
            let result = Config::from_toml_str(&base_toml(&encoded))
                .unwrap()
                .apply_env_overrides(|k| (k == key).then(|| value.to_string()))
                .and_then(Config::validate);
            assert!(
                matches!(result, Err(BotError::Configuration(_))),
                "{} = {} should be rejected",
                key,
                value
            );
        }
    }

    #[test]
    fn test_missing_required_key() {
        let err = Config::default().validate().unwrap_err();
        assert!(err.to_string().contains("PRIVATE_KEY"));
    }

    #[test]
    fn test_unparseable_env_number() {
        let result = Config::default().apply_env_overrides(|k| {
            (k == "BUY_AMOUNT_IN_SOL").then(|| "lots".to_string())
        });
        assert!(matches!(result, Err(BotError::Configuration(_))));
    }
}
