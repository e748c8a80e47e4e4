use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::signature::Signer;
use std::path::Path;
use std::sync::Arc;
use crate::config_load::{load_config, BotConfig};
use crate::errors::BotResult;
use crate::utils::logger::{BotEvent, Reporter};

/// Loads and validates configuration, then opens the RPC connection.
pub fn initialize<R: Reporter>(
    config_path: &Path,
    reporter: &R,
) -> BotResult<(BotConfig, Arc<RpcClient>)> {
    let config = load_config(config_path)?;

    reporter.report(BotEvent::Info(format!(
        "Loaded configuration for token: {}",
        config.token_mint
    )));
    reporter.report(BotEvent::Info(format!(
        "Using wallet: {}",
        config.keypair.pubkey()
    )));
    reporter.report(BotEvent::Info(format!(
        "Buy amount: {} SOL",
        config.buy_amount_sol
    )));
    reporter.report(BotEvent::Info(format!(
        "Slippage percentage: {}%",
        config.slippage_percentage
    )));
    if config.priority_fee_sol > 0.0 {
        reporter.report(BotEvent::Info(format!(
            "Priority fee: {} SOL",
            config.priority_fee_sol
        )));
    }

    let rpc_client = initialize_rpc(&config);
    reporter.report(BotEvent::Info(format!(
        "RPC client initialized with endpoint: {}",
        config.rpc_endpoint
    )));

    Ok((config, rpc_client))
}

pub fn initialize_rpc(config: &BotConfig) -> Arc<RpcClient> {
    Arc::new(RpcClient::new_with_commitment(
        config.rpc_endpoint.clone(),
        CommitmentConfig::confirmed(),
    ))
}
