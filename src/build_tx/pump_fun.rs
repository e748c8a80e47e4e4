use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    system_program,
};
use solana_sdk::pubkey::Pubkey;
use crate::constants::pump_fun::{
    ACCOUNT_DISCRIMINATOR_LEN, BASIS_POINTS_DENOMINATOR, BONDING_CURVE_SEED, BUY_DISCRIMINATOR,
    CREATOR_VAULT_SEED, EVENT_AUTHORITY, FEE_RECIPIENT, GLOBAL_ACCOUNT,
    GLOBAL_VOLUME_ACCUMULATOR_SEED, PUMP_FUN_PROGRAM_ID_PUBKEY, SELL_DISCRIMINATOR,
    USER_VOLUME_ACCUMULATOR_SEED,
};
use crate::errors::{BotError, BotResult};

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum SwapDirection {
    Buy,
    Sell,
}

/// Represents the state of a bonding curve on pump.fun.
#[derive(Clone, Copy, BorshSerialize, BorshDeserialize, Debug, Default, PartialEq)]
pub struct BondingCurve {
    pub virtual_token_reserves: u64,
    pub virtual_sol_reserves: u64,
    pub real_token_reserves: u64,
    pub real_sol_reserves: u64,
    pub token_total_supply: u64,
    pub complete: bool,
    pub creator: Pubkey,
}

/// Protocol-wide parameters stored in the pump.fun global account.
#[derive(Clone, Copy, BorshSerialize, BorshDeserialize, Debug, Default, PartialEq)]
pub struct GlobalAccount {
    pub initialized: bool,
    pub authority: Pubkey,
    pub fee_recipient: Pubkey,
    pub initial_virtual_token_reserves: u64,
    pub initial_virtual_sol_reserves: u64,
    pub initial_real_token_reserves: u64,
    pub token_total_supply: u64,
    pub fee_basis_points: u64,
}

fn strip_discriminator<'a>(data: &'a [u8], what: &str) -> BotResult<&'a [u8]> {
    if data.len() <= ACCOUNT_DISCRIMINATOR_LEN {
        return Err(BotError::InvalidCurveState(format!(
            "{} account data too short ({} bytes)",
            what,
            data.len()
        )));
    }
    Ok(&data[ACCOUNT_DISCRIMINATOR_LEN..])
}

/// Decodes raw bonding-curve account data. Trailing fields newer than this
/// layout are ignored.
pub fn decode_bonding_curve(data: &[u8]) -> BotResult<BondingCurve> {
    let mut body = strip_discriminator(data, "bonding curve")?;
    BondingCurve::deserialize(&mut body)
        .map_err(|e| BotError::InvalidCurveState(format!("bonding curve decode: {}", e)))
}

pub fn decode_global_account(data: &[u8]) -> BotResult<GlobalAccount> {
    let mut body = strip_discriminator(data, "global")?;
    GlobalAccount::deserialize(&mut body)
        .map_err(|e| BotError::InvalidCurveState(format!("global account decode: {}", e)))
}

/// Point-in-time pricing view of a bonding curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurveSnapshot {
    virtual_base_reserves: u128,
    virtual_token_reserves: u128,
    fee_basis_points: u32,
}

impl CurveSnapshot {
    pub fn new(
        virtual_base_reserves: u128,
        virtual_token_reserves: u128,
        fee_basis_points: u32,
    ) -> BotResult<Self> {
        if virtual_base_reserves == 0 || virtual_token_reserves == 0 {
            return Err(BotError::InvalidCurveState(format!(
                "virtual reserves must be positive (sol: {}, token: {})",
                virtual_base_reserves, virtual_token_reserves
            )));
        }
        if fee_basis_points as u128 > BASIS_POINTS_DENOMINATOR {
            return Err(BotError::InvalidCurveState(format!(
                "fee basis points {} above 10000",
                fee_basis_points
            )));
        }
        Ok(CurveSnapshot {
            virtual_base_reserves,
            virtual_token_reserves,
            fee_basis_points,
        })
    }

    /// Bundles the curve reserves with the protocol fee from the global account.
    pub fn from_accounts(curve: &BondingCurve, global: &GlobalAccount) -> BotResult<Self> {
        let fee_basis_points = u32::try_from(global.fee_basis_points).map_err(|_| {
            BotError::InvalidCurveState(format!(
                "fee basis points {} out of range",
                global.fee_basis_points
            ))
        })?;
        Self::new(
            curve.virtual_sol_reserves as u128,
            curve.virtual_token_reserves as u128,
            fee_basis_points,
        )
    }

    pub fn virtual_base_reserves(&self) -> u128 {
        self.virtual_base_reserves
    }

    pub fn virtual_token_reserves(&self) -> u128 {
        self.virtual_token_reserves
    }

    pub fn fee_basis_points(&self) -> u32 {
        self.fee_basis_points
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuyQuote {
    /// Tokens received after the protocol fee.
    pub token_amount_out: u128,
    /// Lamports spent, always the requested input.
    pub effective_base_cost: u64,
    pub raw_token_out: u128,
    pub fee: u128,
}

/// Exact constant-product buy quote. Every division truncates toward zero,
/// which rounds in favor of the pool.
pub fn quote_buy(snapshot: &CurveSnapshot, base_amount_in: u64) -> BotResult<BuyQuote> {
    let new_base_reserves = snapshot
        .virtual_base_reserves
        .checked_add(base_amount_in as u128)
        .ok_or(BotError::ArithmeticOverflow("new virtual sol reserves"))?;

    let new_token_reserves = snapshot
        .virtual_token_reserves
        .checked_mul(snapshot.virtual_base_reserves)
        .ok_or(BotError::ArithmeticOverflow("reserve product"))?
        .checked_div(new_base_reserves)
        .ok_or(BotError::ArithmeticOverflow("new virtual token reserves"))?;

    let raw_token_out = snapshot
        .virtual_token_reserves
        .checked_sub(new_token_reserves)
        .ok_or(BotError::ArithmeticOverflow("raw token output"))?;

    let fee = raw_token_out
        .checked_mul(snapshot.fee_basis_points as u128)
        .ok_or(BotError::ArithmeticOverflow("token fee"))?
        / BASIS_POINTS_DENOMINATOR;

    Ok(BuyQuote {
        token_amount_out: raw_token_out - fee,
        effective_base_cost: base_amount_in,
        raw_token_out,
        fee,
    })
}

/// Struct to hold all required accounts for PumpFun operations
#[derive(Clone, Debug, PartialEq)]
pub struct PumpFunAccounts {
    pub global_account: Pubkey,
    pub fee_recipient: Pubkey,
    pub mint: Pubkey,
    pub bonding_curve_pda: Pubkey,
    pub bonding_curve_ata: Pubkey,
    pub user_ata: Pubkey,
    pub user: Pubkey,
    pub system_program: Pubkey,
    pub spl_token_program: Pubkey,
    pub creator_fee_vault: Pubkey,
    pub event_authority: Pubkey,
    pub pump_fun_program: Pubkey,
    pub global_volume_accumulator: Pubkey,
    pub user_volume_accumulator: Pubkey,
}

impl Default for PumpFunAccounts {
    fn default() -> Self {
        PumpFunAccounts {
            global_account: GLOBAL_ACCOUNT,
            fee_recipient: FEE_RECIPIENT,
            mint: Pubkey::default(),
            bonding_curve_pda: Pubkey::default(),
            bonding_curve_ata: Pubkey::default(),
            user_ata: Pubkey::default(),
            user: Pubkey::default(),
            system_program: system_program::ID,
            spl_token_program: spl_token::ID,
            creator_fee_vault: Pubkey::default(),
            event_authority: EVENT_AUTHORITY,
            pump_fun_program: PUMP_FUN_PROGRAM_ID_PUBKEY,
            global_volume_accumulator: global_volume_accumulator_pda(),
            user_volume_accumulator: user_volume_accumulator_pda(&Pubkey::default()),
        }
    }
}

impl PumpFunAccounts {
    /// Resolves every account a buy/sell pair on `mint` touches. Only the
    /// dynamic fields differ from the default.
    pub fn for_trade(mint: Pubkey, user: Pubkey, creator: Pubkey, fee_recipient: Pubkey) -> Self {
        let bonding_curve_pda = bonding_curve_pda(&mint);
        PumpFunAccounts {
            fee_recipient,
            mint,
            bonding_curve_pda,
            bonding_curve_ata: spl_associated_token_account::get_associated_token_address(
                &bonding_curve_pda,
                &mint,
            ),
            user_ata: spl_associated_token_account::get_associated_token_address(&user, &mint),
            user,
            creator_fee_vault: get_creator_fee_vault(&creator),
            user_volume_accumulator: user_volume_accumulator_pda(&user),
            ..PumpFunAccounts::default()
        }
    }
}

fn get_discriminator(direction: SwapDirection) -> [u8; 8] {
    match direction {
        SwapDirection::Buy => BUY_DISCRIMINATOR,
        SwapDirection::Sell => SELL_DISCRIMINATOR,
    }
}

/// Builds a pump.fun buy or sell.
///
/// `sol_limit` is the maximum SOL cost for a buy and the minimum SOL output
/// for a sell.
pub fn build_pump_fun_instruction(
    accounts: &PumpFunAccounts,
    direction: SwapDirection,
    token_amount: u64,
    sol_limit: u64,
) -> Instruction {
    let mut data = Vec::with_capacity(24);
    data.extend_from_slice(&get_discriminator(direction));
    data.extend_from_slice(&token_amount.to_le_bytes());
    data.extend_from_slice(&sol_limit.to_le_bytes());

    let metas = match direction {
        SwapDirection::Buy => vec![
            AccountMeta::new_readonly(accounts.global_account, false),
            AccountMeta::new(accounts.fee_recipient, false),
            AccountMeta::new_readonly(accounts.mint, false),
            AccountMeta::new(accounts.bonding_curve_pda, false),
            AccountMeta::new(accounts.bonding_curve_ata, false),
            AccountMeta::new(accounts.user_ata, false),
            AccountMeta::new(accounts.user, true),
            AccountMeta::new_readonly(accounts.system_program, false),
            AccountMeta::new_readonly(accounts.spl_token_program, false),
            AccountMeta::new(accounts.creator_fee_vault, false),
            AccountMeta::new_readonly(accounts.event_authority, false),
            AccountMeta::new_readonly(accounts.pump_fun_program, false),
            AccountMeta::new(accounts.global_volume_accumulator, false),
            AccountMeta::new(accounts.user_volume_accumulator, false),
        ],
        SwapDirection::Sell => vec![
            AccountMeta::new_readonly(accounts.global_account, false),
            AccountMeta::new(accounts.fee_recipient, false),
            AccountMeta::new_readonly(accounts.mint, false),
            AccountMeta::new(accounts.bonding_curve_pda, false),
            AccountMeta::new(accounts.bonding_curve_ata, false),
            AccountMeta::new(accounts.user_ata, false),
            AccountMeta::new(accounts.user, true),
            AccountMeta::new_readonly(accounts.system_program, false),
            AccountMeta::new(accounts.creator_fee_vault, false),
            AccountMeta::new_readonly(accounts.spl_token_program, false),
            AccountMeta::new_readonly(accounts.event_authority, false),
            AccountMeta::new_readonly(accounts.pump_fun_program, false),
        ],
    };

    Instruction {
        program_id: PUMP_FUN_PROGRAM_ID_PUBKEY,
        accounts: metas,
        data,
    }
}

pub fn bonding_curve_pda(mint: &Pubkey) -> Pubkey {
    let (pda, _bump) = Pubkey::find_program_address(
        &[BONDING_CURVE_SEED, mint.as_ref()],
        &PUMP_FUN_PROGRAM_ID_PUBKEY,
    );
    pda
}

/// Calculate the creator fee vault PDA for a curve creator.
pub fn get_creator_fee_vault(creator: &Pubkey) -> Pubkey {
    let (pda, _bump) = Pubkey::find_program_address(
        &[CREATOR_VAULT_SEED, creator.as_ref()],
        &PUMP_FUN_PROGRAM_ID_PUBKEY,
    );
    pda
}

pub fn global_volume_accumulator_pda() -> Pubkey {
    let (pda, _bump) = Pubkey::find_program_address(
        &[GLOBAL_VOLUME_ACCUMULATOR_SEED],
        &PUMP_FUN_PROGRAM_ID_PUBKEY,
    );
    pda
}

pub fn user_volume_accumulator_pda(user: &Pubkey) -> Pubkey {
    let (pda, _bump) = Pubkey::find_program_address(
        &[USER_VOLUME_ACCUMULATOR_SEED, user.as_ref()],
        &PUMP_FUN_PROGRAM_ID_PUBKEY,
    );
    pda
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launch_curve(fee_basis_points: u32) -> CurveSnapshot {
        CurveSnapshot::new(30_000_000_000, 1_073_000_000_000_000, fee_basis_points).unwrap()
    }

    #[test]
    fn test_quote_buy_golden() {
        let quote = quote_buy(&launch_curve(100), 1_000_000_000).unwrap();
        // new token reserves = 1_038_387_096_774_193
        assert_eq!(quote.raw_token_out, 34_612_903_225_807);
        assert_eq!(quote.fee, 346_129_032_258);
        assert_eq!(quote.token_amount_out, 34_266_774_193_549);
        assert_eq!(quote.effective_base_cost, 1_000_000_000);
    }

    #[test]
    fn test_quote_buy_without_fee_keeps_raw_output() {
        let quote = quote_buy(&launch_curve(0), 1_000_000_000).unwrap();
        assert_eq!(quote.fee, 0);
        assert_eq!(quote.token_amount_out, quote.raw_token_out);
    }

    #[test]
    fn test_quote_buy_output_bounded_by_reserves() {
        let snapshot = launch_curve(100);
        for amount in [1_000_000u64, 1_000_000_000, 500_000_000_000, u64::MAX] {
            let quote = quote_buy(&snapshot, amount).unwrap();
            assert!(quote.raw_token_out <= snapshot.virtual_token_reserves());
            assert!(quote.token_amount_out < quote.raw_token_out);
        }
    }

    #[test]
    fn test_quote_buy_is_pure() {
        let snapshot = launch_curve(100);
        assert_eq!(
            quote_buy(&snapshot, 123_456_789).unwrap(),
            quote_buy(&snapshot, 123_456_789).unwrap()
        );
    }

    #[test]
    fn test_quote_buy_overflowing_reserves() {
        let snapshot = CurveSnapshot::new(u128::MAX - 10, 1, 0).unwrap();
        assert_eq!(
            quote_buy(&snapshot, 1_000),
            Err(BotError::ArithmeticOverflow("new virtual sol reserves"))
        );

        let snapshot = CurveSnapshot::new(u128::MAX / 2, u128::MAX / 2, 0).unwrap();
        assert_eq!(
            quote_buy(&snapshot, 1),
            Err(BotError::ArithmeticOverflow("reserve product"))
        );
    }

    #[test]
    fn test_snapshot_rejects_invalid_state() {
        assert!(CurveSnapshot::new(0, 1, 0).is_err());
        assert!(CurveSnapshot::new(1, 0, 0).is_err());
        assert!(CurveSnapshot::new(1, 1, 10_001).is_err());
        assert!(CurveSnapshot::new(1, 1, 10_000).is_ok());
    }

    #[test]
    fn test_decode_bonding_curve_ignores_trailing_fields() {
        let curve = BondingCurve {
            virtual_token_reserves: 1_073_000_000_000_000,
            virtual_sol_reserves: 30_000_000_000,
            real_token_reserves: 793_100_000_000_000,
            real_sol_reserves: 0,
            token_total_supply: 1_000_000_000_000_000,
            complete: false,
            creator: Pubkey::new_unique(),
        };
        let mut data = vec![0u8; ACCOUNT_DISCRIMINATOR_LEN];
        curve.serialize(&mut data).unwrap();
        data.extend_from_slice(&[0u8; 17]);

        assert_eq!(decode_bonding_curve(&data).unwrap(), curve);
        assert!(decode_bonding_curve(&data[..4]).is_err());
    }

    #[test]
    fn test_decode_global_account_offsets() {
        let global = GlobalAccount {
            initialized: true,
            authority: Pubkey::new_unique(),
            fee_recipient: FEE_RECIPIENT,
            initial_virtual_token_reserves: 1_073_000_000_000_000,
            initial_virtual_sol_reserves: 30_000_000_000,
            initial_real_token_reserves: 793_100_000_000_000,
            token_total_supply: 1_000_000_000_000_000,
            fee_basis_points: 95,
        };
        let mut data = vec![0u8; ACCOUNT_DISCRIMINATOR_LEN];
        global.serialize(&mut data).unwrap();
        // discriminator + bool + two pubkeys + five u64s
        assert_eq!(data.len(), 113);
        assert_eq!(&data[41..73], FEE_RECIPIENT.as_ref());
        assert_eq!(data[105..113], 95u64.to_le_bytes());
        data.extend_from_slice(&[0xff; 64]);

        let decoded = decode_global_account(&data).unwrap();
        assert_eq!(decoded.fee_recipient, FEE_RECIPIENT);
        assert_eq!(decoded.fee_basis_points, 95);
        assert_eq!(decoded, global);
        assert!(decode_global_account(&data[..40]).is_err());
    }

    #[test]
    fn test_snapshot_from_accounts() {
        let curve = BondingCurve {
            virtual_token_reserves: 1_073_000_000_000_000,
            virtual_sol_reserves: 30_000_000_000,
            ..BondingCurve::default()
        };
        let global = GlobalAccount {
            fee_basis_points: 95,
            ..GlobalAccount::default()
        };
        let snapshot = CurveSnapshot::from_accounts(&curve, &global).unwrap();
        assert_eq!(snapshot.fee_basis_points(), 95);
        assert_eq!(snapshot.virtual_base_reserves(), 30_000_000_000);

        let broken = GlobalAccount {
            fee_basis_points: u64::MAX,
            ..GlobalAccount::default()
        };
        assert!(CurveSnapshot::from_accounts(&curve, &broken).is_err());
    }

    #[test]
    fn test_buy_instruction_layout() {
        let accounts = PumpFunAccounts::for_trade(
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            FEE_RECIPIENT,
        );
        let ix = build_pump_fun_instruction(&accounts, SwapDirection::Buy, 7, 9);
        assert_eq!(ix.program_id, PUMP_FUN_PROGRAM_ID_PUBKEY);
        assert_eq!(&ix.data[..8], &BUY_DISCRIMINATOR);
        assert_eq!(ix.data[8..16], 7u64.to_le_bytes());
        assert_eq!(ix.data[16..24], 9u64.to_le_bytes());
        assert!(ix.accounts[6].is_signer);
        assert_eq!(ix.accounts[6].pubkey, accounts.user);
    }

    #[test]
    fn test_sell_instruction_layout() {
        let accounts = PumpFunAccounts::for_trade(
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            FEE_RECIPIENT,
        );
        let ix = build_pump_fun_instruction(&accounts, SwapDirection::Sell, 7, 0);
        assert_eq!(&ix.data[..8], &SELL_DISCRIMINATOR);
        assert_eq!(ix.data[16..24], 0u64.to_le_bytes());
        assert_eq!(ix.accounts[8].pubkey, accounts.creator_fee_vault);
    }
}
