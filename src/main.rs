pub mod bot;
pub mod build_tx;
pub mod config_load;
pub mod constants;
pub mod errors;
pub mod init;
pub mod send_tx;
pub mod utils;

use crate::bot::orchestrator::{BotSettings, VolumeBot};
use crate::errors::BotResult;
use crate::init::curve_reader::RpcCurveReader;
use crate::init::initialize::initialize;
use crate::send_tx::rpc::RpcSubmitter;
use crate::utils::logger::{setup_event_logger, BotEvent, ConsoleReporter, Reporter};
use std::path::PathBuf;
use structopt::StructOpt;
use tokio::sync::watch;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "pump_volume_bot",
    about = "Round-trip buy/sell volume bot for a pump.fun bonding curve."
)]
struct Opt {
    #[structopt(
        long,
        default_value = "config.toml",
        parse(from_os_str),
        help = "Path to the TOML config. Environment variables override its values."
    )]
    config: PathBuf,
}

async fn run(opt: &Opt, reporter: ConsoleReporter) -> BotResult<()> {
    let (config, rpc_client) = initialize(&opt.config, &reporter)?;
    let settings = BotSettings::from_config(&config)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let signal_handle = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    let bot = VolumeBot::new(
        settings,
        config.keypair,
        RpcCurveReader::new(rpc_client.clone()),
        RpcSubmitter::new(rpc_client),
        reporter,
    );
    let result = bot.run(shutdown_rx).await;

    signal_handle.abort();
    result.map(|_| ())
}

#[tokio::main]
async fn main() {
    let opt = Opt::from_args();
    let (reporter, logger_handle) = setup_event_logger();
    reporter.report(BotEvent::Welcome {
        version: env!("CARGO_PKG_VERSION"),
    });

    let exit_code = match run(&opt, reporter.clone()).await {
        Ok(()) => 0,
        Err(e) => {
            reporter.report(BotEvent::Error(e.to_string()));
            1
        }
    };

    // flush the event logger before exiting
    drop(reporter);
    let _ = logger_handle.await;
    std::process::exit(exit_code);
}
