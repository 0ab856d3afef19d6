//! main - runs the GTP-U receive-path classifier over live or replayed frames

use anyhow::{Result, bail};
use async_std::channel::Sender;
use async_std::prelude::*;
use clap::Parser;
use signal_hook::consts::signal::*;
use signal_hook_async_std::Signals;
use slog::{Drain, Logger, o, warn};
use std::path::{Path, PathBuf};
use stop_token::prelude::*;
use upf::{Config, FrameSource, Upf, load_config_file};

const DEFAULT_CONFIG_FILE: &str = "upf.toml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML configuration file.  Defaults to upf.toml if that exists, otherwise built in
    /// defaults are used.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Network interface to classify received frames from.  Needs CAP_NET_RAW.
    #[arg(long, conflicts_with = "replay", required_unless_present = "replay")]
    interface: Option<String>,

    /// File of frames to classify instead of a live interface.  One hex encoded Ethernet
    /// frame per line; blank lines and lines starting with '#' are ignored.
    #[arg(long)]
    replay: Option<PathBuf>,
}

#[async_std::main]
async fn main() -> Result<()> {
    exit_on_panic();
    let logger = init_logging();

    let args = Args::parse();
    let config = match &args.config {
        Some(filename) => load_config_file(filename, &logger)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            load_config_file(Path::new(DEFAULT_CONFIG_FILE), &logger)?
        }
        None => Config::default(),
    };
    let source = match (args.interface, args.replay) {
        (Some(interface), _) => FrameSource::Interface(interface),
        (None, Some(replay)) => FrameSource::Replay(replay),
        (None, None) => bail!("One of --interface or --replay is required"),
    };

    let upf = Upf::start(config, source.clone(), logger.clone()).await?;
    let stats = match source {
        FrameSource::Replay(_) => upf.run_to_completion().await,
        FrameSource::Interface(_) => {
            match wait_for_signal().timeout_at(upf.rx_stopped()).await {
                Ok(signal) => {
                    signal?;
                }
                Err(_) => warn!(logger, "Receive pipeline stopped, shutting down"),
            }
            upf.graceful_shutdown().await
        }
    };
    println!("{stats}");

    Ok(())
}

fn init_logging() -> Logger {
    // Use info level logging by default
    if std::env::var("RUST_LOG").is_err() {
        unsafe { std::env::set_var("RUST_LOG", "info") }
    }
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let drain = slog_envlogger::new(drain);
    slog::Logger::root(drain, o!())
}

fn exit_on_panic() {
    let orig_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        orig_hook(panic_info);
        std::process::exit(1);
    }));
}

async fn wait_for_signal() -> Result<i32> {
    let signals = Signals::new([SIGHUP, SIGTERM, SIGINT, SIGQUIT])?;
    let handle = signals.handle();
    let (sig_sender, sig_receiver) = async_std::channel::unbounded();
    let signals_task = async_std::task::spawn(handle_signals(signals, sig_sender));
    let signal = sig_receiver.recv().await;
    handle.close();
    signals_task.await;
    Ok(signal?)
}

async fn handle_signals(signals: Signals, sig_sender: Sender<i32>) {
    let mut signals = signals.fuse();
    while let Some(signal) = signals.next().await {
        match signal {
            SIGHUP => {
                // Nothing to reload.  The config is only read at startup.
            }
            SIGTERM | SIGINT | SIGQUIT => {
                let _ = sig_sender.send(signal).await;
            }
            _ => unreachable!(),
        }
    }
}
