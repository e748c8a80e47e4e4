use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use spl_associated_token_account::instruction::create_associated_token_account_idempotent;

/// Idempotent create of `wallet_address`'s token account for `mint`, paid by `payer`.
pub fn create_ata(payer: &Pubkey, wallet_address: &Pubkey, mint: &Pubkey) -> Instruction {
    create_associated_token_account_idempotent(payer, wallet_address, mint, &spl_token::ID)
}
