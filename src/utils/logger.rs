//! Async console event logger.
//!
//! Usage:
//!   1. Call `setup_event_logger()` once at startup; it returns the
//!      `ConsoleReporter` handle and the printing task.
//!   2. Pass the reporter into whatever needs to report, and call
//!      `report(BotEvent::...)` on it.
//!   3. Drop every reporter and await the task to flush before exiting.

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use crate::bot::stats::CycleStats;
use crate::constants::compute_budget::EXPLORER_TX_URL;
use crate::utils::math::lamports_to_sol;

#[derive(Debug, Clone, PartialEq)]
pub enum BotEvent {
    Welcome { version: &'static str },
    Info(String),
    Error(String),
    Mode { interval_seconds: u64 },
    CycleStarted { cycle: u64 },
    TokenInfo {
        token_amount: u128,
        sol_amount: u64,
        max_sol_cost: u64,
        slippage_basis_points: u32,
    },
    ComputeBudget { unit_price: u64, unit_limit: u32 },
    Sending,
    Completed { signature: String },
    CycleFailed { cycle: u64, error: String, arithmetic: bool },
    Stats(CycleStats),
    NextCycle { cycle: u64, interval_seconds: u64 },
    Stopped,
}

/// Sink for progress events. Passed explicitly to whoever reports.
pub trait Reporter {
    fn report(&self, event: BotEvent);
}

#[derive(Clone)]
pub struct ConsoleReporter {
    sender: mpsc::Sender<BotEvent>,
}

impl ConsoleReporter {
    /// Hands the event to the printing task, or gives it back when the
    /// channel is full or closed.
    fn try_queue(&self, event: BotEvent) -> Option<BotEvent> {
        match self.sender.try_send(event) {
            Ok(()) => None,
            Err(TrySendError::Full(event)) | Err(TrySendError::Closed(event)) => Some(event),
        }
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, event: BotEvent) {
        // print inline rather than lose the event
        if let Some(event) = self.try_queue(event) {
            print_event(&event);
        }
    }
}

fn print_event(event: &BotEvent) {
    let now_str = Utc::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string();
    for (is_error, line) in render_event(event) {
        if is_error {
            eprintln!("[{}] - {}", now_str, line);
        } else {
            println!("[{}] - {}", now_str, line);
        }
    }
}

pub fn setup_event_logger() -> (ConsoleReporter, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<BotEvent>(1024);
    let handle = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            print_event(&event);
        }
    });
    (ConsoleReporter { sender: tx }, handle)
}

/// Formats one event into output lines; `true` marks lines for stderr.
pub fn render_event(event: &BotEvent) -> Vec<(bool, String)> {
    match event {
        BotEvent::Welcome { version } => vec![
            (false, "================================================".to_string()),
            (false, format!("[main] pump.fun volume bot v{}", version)),
            (false, "================================================".to_string()),
        ],
        BotEvent::Info(message) => vec![(false, format!("[info] {}", message))],
        BotEvent::Error(message) => vec![(true, format!("[error] {}", message))],
        BotEvent::Mode { interval_seconds } => {
            if *interval_seconds == 0 {
                vec![(false, "[mode] Single transaction (no interval)".to_string())]
            } else {
                vec![(
                    false,
                    format!(
                        "[interval] Running with {} seconds interval between transactions",
                        interval_seconds
                    ),
                )]
            }
        }
        BotEvent::CycleStarted { cycle } => {
            vec![(false, format!("[cycle] Starting transaction cycle {}", cycle))]
        }
        BotEvent::TokenInfo {
            token_amount,
            sol_amount,
            max_sol_cost,
            slippage_basis_points,
        } => vec![
            (false, "[tx] Creating buy/sell transaction".to_string()),
            (false, format!("[token] Token amount: {}", token_amount)),
            (
                false,
                format!(
                    "[token] SOL amount: {} lamports ({} SOL)",
                    sol_amount,
                    lamports_to_sol(*sol_amount)
                ),
            ),
            (
                false,
                format!(
                    "[token] Max cost: {} lamports ({} SOL)",
                    max_sol_cost,
                    lamports_to_sol(*max_sol_cost)
                ),
            ),
            (
                false,
                format!("[token] Slippage: {}%", *slippage_basis_points as f64 / 100.0),
            ),
        ],
        BotEvent::ComputeBudget { unit_price, unit_limit } => vec![(
            false,
            format!(
                "[compute] Price per unit: {} micro-lamports | unit limit: {}",
                unit_price, unit_limit
            ),
        )],
        BotEvent::Sending => vec![(false, "[tx] Sending transaction...".to_string())],
        BotEvent::Completed { signature } => vec![
            (false, format!("[tx] Transaction completed | sig: {}", signature)),
            (false, format!("[tx] Explorer URL: {}{}", EXPLORER_TX_URL, signature)),
        ],
        BotEvent::CycleFailed { cycle, error, arithmetic } => {
            let tag = if *arithmetic { "[error][arithmetic]" } else { "[error]" };
            vec![(true, format!("{} Cycle {} failed: {}", tag, cycle, error))]
        }
        BotEvent::Stats(stats) => vec![
            (false, "[stats] ========== BOT STATISTICS ==========".to_string()),
            (false, format!("[stats] Transactions: {}", stats.count)),
            (false, format!("[stats] Total volume: {:.4} SOL", stats.total_volume)),
            (false, format!("[stats] Running time: {}", stats.running_time())),
            (
                false,
                match stats.average_interval_seconds() {
                    Some(avg) => format!("[stats] Avg. interval: {:.2} seconds", avg),
                    None => "[stats] Avg. interval: N/A".to_string(),
                },
            ),
        ],
        BotEvent::NextCycle { cycle, interval_seconds } => vec![(
            false,
            format!(
                "[interval] Transaction {} completed. Next one in {} seconds...",
                cycle, interval_seconds
            ),
        )],
        BotEvent::Stopped => vec![(false, "[main] Bot stopped by user. Exiting...".to_string())],
    }
}
