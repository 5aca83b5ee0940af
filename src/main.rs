//! Tally main entry point

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tally_api::start_server;
use tally_config::{Config, ConfigError};
use tally_core::ReportService;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(version = "0.1.0")]
#[command(about = "Generate account, yearly and financial statement reports from CSV ledgers", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Generate all reports once and exit instead of serving the API
    #[arg(long)]
    once: bool,

    /// Print the default configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn load_config(path: &Path) -> anyhow::Result<(Config, bool)> {
    match Config::load(path) {
        Ok(config) => Ok((config, true)),
        Err(ConfigError::FileNotFound { .. }) => Ok((Config::default(), false)),
        Err(e) => {
            for suggestion in e.suggestions() {
                eprintln!("  - {}", suggestion);
            }
            Err(e).with_context(|| format!("Failed to load configuration from {}", path.display()))
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let (config, found) = load_config(&args.config)?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.logging.level))
        .init();

    if !found {
        log::warn!(
            "Config file {} not found, using defaults",
            args.config.display()
        );
    }
    log::info!(
        "Config loaded: input={}, output={}",
        config.data.input_dir.display(),
        config.data.output_dir.display()
    );

    let rt = Runtime::new()?;
    rt.block_on(async {
        let reports = Arc::new(ReportService::with_default_reader(config.clone()));

        if args.once {
            let results = reports.run_all().await;
            let status = reports.status();
            println!("accounts.csv: {}", status.accounts);
            println!("yearly.csv: {}", status.yearly);
            println!("fs.csv: {}", status.fs);

            let failed = results.iter().filter(|(_, r)| r.is_err()).count();
            if failed > 0 {
                anyhow::bail!("{} of {} reports failed", failed, results.len());
            }
            return Ok(());
        }

        start_server(config, reports)
            .await
            .context("Server error")
    })
}
