use solana_sdk::compute_budget::ComputeBudgetInstruction;
use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::signer::keypair::Keypair;
use solana_sdk::signer::Signer;
use solana_sdk::transaction::Transaction;
use crate::build_tx::pump_fun::{build_pump_fun_instruction, PumpFunAccounts, SwapDirection};
use crate::build_tx::trade_plan::BoundedTradePlan;
use crate::constants::compute_budget::COMPUTE_UNIT_LIMIT;
use crate::errors::{BotError, BotResult};
use crate::utils::ata::create_ata;
use crate::utils::math::priority_fee_to_micro_lamports;

/// One step of the round trip, before it is bound to concrete accounts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TradeInstruction {
    SetComputeUnitPrice { micro_lamports: u64 },
    SetComputeUnitLimit { units: u32 },
    Buy { token_amount: u64, max_sol_cost: u64 },
    Sell { token_amount: u64, min_sol_output: u64 },
}

/// Ordered instructions for a single atomic transaction.
///
/// Order is load-bearing: price, limit, buy, sell. The ledger executes the
/// whole set or none of it, so the sell never runs without the buy.
#[derive(Clone, Debug, PartialEq)]
pub struct InstructionSet {
    steps: Vec<TradeInstruction>,
    accounts: PumpFunAccounts,
}

impl InstructionSet {
    pub fn steps(&self) -> &[TradeInstruction] {
        &self.steps
    }

    pub fn accounts(&self) -> &PumpFunAccounts {
        &self.accounts
    }

    /// Compute budget price and limit, if a priority fee was requested.
    pub fn compute_budget(&self) -> Option<(u64, u32)> {
        let price = self.steps.iter().find_map(|step| match step {
            TradeInstruction::SetComputeUnitPrice { micro_lamports } => Some(*micro_lamports),
            _ => None,
        })?;
        let limit = self.steps.iter().find_map(|step| match step {
            TradeInstruction::SetComputeUnitLimit { units } => Some(*units),
            _ => None,
        })?;
        Some((price, limit))
    }

    /// Lowers the steps to Solana instructions, same order. The buy is
    /// preceded by an idempotent create of the user's token account.
    pub fn to_instructions(&self) -> Vec<Instruction> {
        let accounts = &self.accounts;
        let mut result = Vec::with_capacity(self.steps.len() + 1);
        for step in &self.steps {
            match *step {
                TradeInstruction::SetComputeUnitPrice { micro_lamports } => {
                    result.push(ComputeBudgetInstruction::set_compute_unit_price(micro_lamports));
                }
                TradeInstruction::SetComputeUnitLimit { units } => {
                    result.push(ComputeBudgetInstruction::set_compute_unit_limit(units));
                }
                TradeInstruction::Buy { token_amount, max_sol_cost } => {
                    result.push(create_ata(&accounts.user, &accounts.user, &accounts.mint));
                    result.push(build_pump_fun_instruction(
                        accounts,
                        SwapDirection::Buy,
                        token_amount,
                        max_sol_cost,
                    ));
                }
                TradeInstruction::Sell { token_amount, min_sol_output } => {
                    result.push(build_pump_fun_instruction(
                        accounts,
                        SwapDirection::Sell,
                        token_amount,
                        min_sol_output,
                    ));
                }
            }
        }
        result
    }
}

/// Turns a bounded plan into the buy-then-sell instruction set.
pub fn assemble_instructions(
    plan: &BoundedTradePlan,
    priority_fee_rate: f64,
    accounts: PumpFunAccounts,
) -> BotResult<InstructionSet> {
    let token_amount = u64::try_from(plan.token_amount_out)
        .map_err(|_| BotError::ArithmeticOverflow("token amount for instruction"))?;

    let mut steps = Vec::with_capacity(4);
    if priority_fee_rate > 0.0 {
        steps.push(TradeInstruction::SetComputeUnitPrice {
            micro_lamports: priority_fee_to_micro_lamports(priority_fee_rate)?,
        });
        steps.push(TradeInstruction::SetComputeUnitLimit {
            units: COMPUTE_UNIT_LIMIT,
        });
    }
    steps.push(TradeInstruction::Buy {
        token_amount,
        max_sol_cost: plan.max_base_cost,
    });
    steps.push(TradeInstruction::Sell {
        token_amount,
        min_sol_output: 0,
    });

    Ok(InstructionSet { steps, accounts })
}

/// Build and sign a transaction from an instruction set, paid by `signer`.
pub fn build_and_sign_transaction(
    instructions: &InstructionSet,
    signer: &Keypair,
    recent_blockhash: Hash,
) -> Transaction {
    Transaction::new_signed_with_payer(
        &instructions.to_instructions(),
        Some(&signer.pubkey()),
        &[signer],
        recent_blockhash,
    )
}
