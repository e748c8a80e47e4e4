use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcSendTransactionConfig;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::signature::{Keypair, Signature};
use std::sync::Arc;
use crate::build_tx::tx_builder::{build_and_sign_transaction, InstructionSet};
use crate::errors::{BotError, BotResult};

/// Signs, sends and confirms an instruction set as one transaction.
pub trait TxSubmitter {
    async fn submit_atomic(&self, instructions: InstructionSet, signer: &Keypair)
        -> BotResult<Signature>;
}

pub struct RpcSubmitter {
    client: Arc<RpcClient>,
}

impl RpcSubmitter {
    pub fn new(client: Arc<RpcClient>) -> Self {
        RpcSubmitter { client }
    }
}

impl TxSubmitter for RpcSubmitter {
    async fn submit_atomic(
        &self,
        instructions: InstructionSet,
        signer: &Keypair,
    ) -> BotResult<Signature> {
        let recent_blockhash = self
            .client
            .get_latest_blockhash()
            .await
            .map_err(|e| BotError::Rpc(format!("get_latest_blockhash: {}", e)))?;

        let tx = build_and_sign_transaction(&instructions, signer, recent_blockhash);

        self.client
            .send_and_confirm_transaction_with_spinner_and_config(
                &tx,
                CommitmentConfig::confirmed(),
                RpcSendTransactionConfig {
                    skip_preflight: true,
                    ..RpcSendTransactionConfig::default()
                },
            )
            .await
            .map_err(|e| BotError::Submission(e.to_string()))
    }
}
