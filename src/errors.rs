use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// Everything that can stop a trade cycle or the process.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Bonding curve not found for token: {0}")]
    CurveNotFound(Pubkey),

    #[error("Bonding curve for token {0} is complete, trading moved off the curve")]
    CurveComplete(Pubkey),

    #[error("Invalid bonding curve state: {0}")]
    InvalidCurveState(String),

    #[error("Invalid trade intent: {0}")]
    InvalidTradeIntent(String),

    #[error("Arithmetic overflow while computing {0}")]
    ArithmeticOverflow(&'static str),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Transaction submission failed: {0}")]
    Submission(String),
}

impl BotError {
    /// Overflow means reserves or slippage were outside anything sane and
    /// gets reported louder than an ordinary failed cycle.
    pub fn is_arithmetic(&self) -> bool {
        matches!(self, BotError::ArithmeticOverflow(_))
    }
}

pub type BotResult<T> = Result<T, BotError>;
