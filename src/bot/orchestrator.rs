use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::signer::Signer;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::time::sleep;
use crate::bot::stats::CycleStats;
use crate::build_tx::pump_fun::{CurveSnapshot, PumpFunAccounts};
use crate::build_tx::trade_plan::{plan_from_snapshot, TradeIntent};
use crate::build_tx::tx_builder::assemble_instructions;
use crate::config_load::BotConfig;
use crate::errors::{BotError, BotResult};
use crate::init::curve_reader::CurveReader;
use crate::send_tx::rpc::TxSubmitter;
use crate::utils::logger::{BotEvent, Reporter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    SingleShot,
    Repeating { interval: Duration },
}

/// What every cycle trades. Fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotSettings {
    pub token_mint: Pubkey,
    pub buy_amount_sol: f64,
    pub intent: TradeIntent,
    pub transaction_interval_seconds: u64,
}

impl BotSettings {
    pub fn from_config(config: &BotConfig) -> BotResult<Self> {
        Ok(BotSettings {
            token_mint: config.token_mint,
            buy_amount_sol: config.buy_amount_sol,
            intent: TradeIntent::new(
                config.buy_amount_lamports,
                config.slippage_basis_points,
                config.priority_fee_sol,
            )?,
            transaction_interval_seconds: config.transaction_interval_seconds,
        })
    }

    pub fn mode(&self) -> RunMode {
        match self.transaction_interval_seconds {
            0 => RunMode::SingleShot,
            secs => RunMode::Repeating {
                interval: Duration::from_secs(secs),
            },
        }
    }

    /// Volume credited for one successful round trip: twice the configured
    /// buy, not the measured economics of that cycle.
    pub fn cycle_volume_sol(&self) -> f64 {
        self.buy_amount_sol * 2.0
    }
}

/// Drives read -> plan -> assemble -> submit, once or on an interval.
pub struct VolumeBot<C, S, R> {
    pub settings: BotSettings,
    pub signer: Keypair,
    pub reader: C,
    pub submitter: S,
    pub reporter: R,
}

impl<C, S, R> VolumeBot<C, S, R>
where
    C: CurveReader,
    S: TxSubmitter,
    R: Reporter,
{
    pub fn new(settings: BotSettings, signer: Keypair, reader: C, submitter: S, reporter: R) -> Self {
        VolumeBot {
            settings,
            signer,
            reader,
            submitter,
            reporter,
        }
    }

    /// One full round trip from a fresh curve read.
    pub async fn execute_cycle(&self) -> BotResult<Signature> {
        let mint = self.settings.token_mint;
        let intent = &self.settings.intent;

        let curve = self.reader.bonding_curve(&mint).await?;
        if curve.complete {
            return Err(BotError::CurveComplete(mint));
        }
        let global = self.reader.global_account().await?;
        let snapshot = CurveSnapshot::from_accounts(&curve, &global)?;

        let plan = plan_from_snapshot(&snapshot, intent)?;
        self.reporter.report(BotEvent::TokenInfo {
            token_amount: plan.token_amount_out,
            sol_amount: intent.base_amount_in(),
            max_sol_cost: plan.max_base_cost,
            slippage_basis_points: intent.slippage_basis_points(),
        });

        let accounts = PumpFunAccounts::for_trade(
            mint,
            self.signer.pubkey(),
            curve.creator,
            global.fee_recipient,
        );
        let instructions = assemble_instructions(&plan, intent.priority_fee_rate(), accounts)?;
        if let Some((unit_price, unit_limit)) = instructions.compute_budget() {
            self.reporter.report(BotEvent::ComputeBudget {
                unit_price,
                unit_limit,
            });
        }

        self.reporter.report(BotEvent::Sending);
        let signature = self.submitter.submit_atomic(instructions, &self.signer).await?;
        self.reporter.report(BotEvent::Completed {
            signature: signature.to_string(),
        });
        Ok(signature)
    }

    /// Runs until done. Single-shot returns the first error, or abandons its
    /// one cycle when `shutdown` flips to true. Repeating mode reports errors,
    /// counts them as zero volume and only stops once `shutdown` flips to
    /// true, checked between cycles.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> BotResult<CycleStats> {
        let started_at = Instant::now();
        let mut stats = CycleStats::default();
        self.reporter.report(BotEvent::Mode {
            interval_seconds: self.settings.transaction_interval_seconds,
        });

        let interval = match self.settings.mode() {
            RunMode::SingleShot => {
                tokio::select! {
                    result = self.execute_cycle() => {
                        result?;
                        stats.record(self.settings.cycle_volume_sol(), started_at);
                    }
                    _ = wait_for_shutdown(&mut shutdown) => {
                        self.reporter.report(BotEvent::Stopped);
                    }
                }
                return Ok(stats);
            }
            RunMode::Repeating { interval } => interval,
        };

        while !*shutdown.borrow() {
            let cycle = stats.count + 1;
            self.reporter.report(BotEvent::CycleStarted { cycle });

            let volume = match self.execute_cycle().await {
                Ok(_) => self.settings.cycle_volume_sol(),
                Err(e) => {
                    self.reporter.report(BotEvent::CycleFailed {
                        cycle,
                        arithmetic: e.is_arithmetic(),
                        error: e.to_string(),
                    });
                    0.0
                }
            };
            stats.record(volume, started_at);

            self.reporter.report(BotEvent::Stats(stats));
            self.reporter.report(BotEvent::NextCycle {
                cycle,
                interval_seconds: self.settings.transaction_interval_seconds,
            });

            if sleep_or_shutdown(interval, &mut shutdown).await {
                break;
            }
        }

        self.reporter.report(BotEvent::Stopped);
        Ok(stats)
    }
}

/// Resolves once shutdown is requested; never if the sender is gone.
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Sleeps for `interval`, returning early with `true` if shutdown is requested.
async fn sleep_or_shutdown(interval: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    let deadline = sleep(interval);
    tokio::pin!(deadline);
    loop {
        tokio::select! {
            _ = &mut deadline => return *shutdown.borrow(),
            changed = shutdown.changed() => {
                if changed.is_err() {
                    // sender gone, nobody can ask us to stop anymore
                    (&mut deadline).await;
                    return false;
                }
                if *shutdown.borrow() {
                    return true;
                }
            }
        }
    }
}
