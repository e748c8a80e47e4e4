use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use crate::build_tx::pump_fun::{
    bonding_curve_pda, decode_bonding_curve, decode_global_account, BondingCurve, GlobalAccount,
};
use crate::constants::pump_fun::GLOBAL_ACCOUNT;
use crate::errors::{BotError, BotResult};

/// Point-in-time reads of pump.fun state.
pub trait CurveReader {
    /// Fails with `CurveNotFound` when the mint has no bonding curve account.
    async fn bonding_curve(&self, mint: &Pubkey) -> BotResult<BondingCurve>;

    /// Protocol fee recipient and fee basis points.
    async fn global_account(&self) -> BotResult<GlobalAccount>;
}

pub struct RpcCurveReader {
    client: Arc<RpcClient>,
}

impl RpcCurveReader {
    pub fn new(client: Arc<RpcClient>) -> Self {
        RpcCurveReader { client }
    }

    async fn account_data(&self, address: &Pubkey) -> BotResult<Option<Vec<u8>>> {
        let response = self
            .client
            .get_account_with_commitment(address, CommitmentConfig::confirmed())
            .await
            .map_err(|e| BotError::Rpc(format!("get_account {}: {}", address, e)))?;
        Ok(response.value.map(|account| account.data))
    }
}

impl CurveReader for RpcCurveReader {
    async fn bonding_curve(&self, mint: &Pubkey) -> BotResult<BondingCurve> {
        let address = bonding_curve_pda(mint);
        match self.account_data(&address).await? {
            Some(data) => decode_bonding_curve(&data),
            None => Err(BotError::CurveNotFound(*mint)),
        }
    }

    async fn global_account(&self) -> BotResult<GlobalAccount> {
        match self.account_data(&GLOBAL_ACCOUNT).await? {
            Some(data) => decode_global_account(&data),
            None => Err(BotError::Rpc(format!(
                "pump.fun global account {} not found",
                GLOBAL_ACCOUNT
            ))),
        }
    }
}
