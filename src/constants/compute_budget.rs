pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Fixed compute-unit limit attached whenever a priority fee is paid.
pub const COMPUTE_UNIT_LIMIT: u32 = 200_000;

/// Converts a priority fee in SOL into micro-lamports per compute unit.
pub const PRIORITY_FEE_MICRO_LAMPORTS_PER_SOL: f64 = 5_000_000_000.0;

pub const MIN_COMPUTE_UNIT_PRICE: u64 = 1;

pub const DEFAULT_RPC_ENDPOINT: &str = "https://api.mainnet-beta.solana.com";

pub const EXPLORER_TX_URL: &str = "https://explorer.solana.com/tx/";
