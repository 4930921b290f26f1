use anyhow::Context;
use bridge::server::{RelayBridge, RelayState};
use clap::Parser;
use generator::profile::generate;
use log::info;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use trackcore::GroupBy;
use workflow::config::RelayConfig;
use workflow::runner::{format_board, Runner};

mod bridge;
mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Location relay and ranking driver for the tracking dashboard")]
struct Args {
    /// Rank a saved `/tracks` JSON body and print the board
    #[arg(long)]
    offline: Option<PathBuf>,
    /// Load the relay config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value = "127.0.0.1:1323")]
    bind: SocketAddr,
    /// Grouping mode: team or individual
    #[arg(long, default_value = "team")]
    group_by: GroupBy,
    #[arg(long)]
    destination_lat: Option<f64>,
    #[arg(long)]
    destination_lon: Option<f64>,
    /// Write the offline board as JSON next to the printed table
    #[arg(long)]
    report: Option<PathBuf>,
    /// Seed the store with synthetic participants and serve them
    #[arg(long, default_value_t = false)]
    demo: bool,
    /// Keep the HTTP relay alive for devices and dashboards
    #[arg(long, default_value_t = false)]
    serve: bool,
}

impl Args {
    /// A seeded store is only useful while the relay is serving it.
    fn serves(&self) -> bool {
        self.serve || self.demo
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let relay_config = if let Some(path) = args.config.as_ref() {
        RelayConfig::load(path)?
    } else {
        RelayConfig::from_args(args.bind, args.group_by)
    }
    .with_destination(args.destination_lat, args.destination_lon);

    let runner = Runner::new(relay_config.clone());

    if let Some(path) = args.offline.as_ref() {
        let result = runner.execute_file(path, relay_config.group_by)?;
        print!("{}", format_board(&result.board));
        if result.rejected > 0 {
            println!("({} reports rejected)", result.rejected);
        }

        if let Some(report_path) = args.report.as_ref() {
            if let Some(parent) = report_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let json = serde_json::to_string_pretty(&result.board)
                .context("serialising offline board")?;
            fs::write(report_path, json)
                .with_context(|| format!("writing {}", report_path.display()))?;
        }
    }

    let state = Arc::new(RelayState::new(runner));

    if args.demo {
        let fixes = generate(&relay_config.demo, &relay_config.destination);
        for fix in &fixes {
            state.accept_as(&fix.user, &fix.team, &fix.message);
        }
        info!(
            "demo seeded {} fixes for {} participants",
            state.store.len(),
            relay_config.demo.participants
        );
    }

    if args.serves() {
        let bridge = RelayBridge::new(state);
        bridge.spawn(relay_config.bind);
        info!("relay running on {} (Ctrl+C to stop)", relay_config.bind);
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
