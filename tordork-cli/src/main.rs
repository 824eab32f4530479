//! tordork CLI
//!
//! Dork-based OSINT search over Tor using Startpage or Yandex.

mod input;
mod output;
mod progress;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tordork_core::Engine;
use tordork_runtime::{DispatchConfig, Dispatcher, RetryPolicy};
use tordork_tor::TorConfig;

use crate::progress::BarProgress;

#[derive(Parser)]
#[command(name = "tordork")]
#[command(author, version, about = "Dork-based OSINT search via Tor using Startpage or Yandex", long_about = None)]
struct Cli {
    /// Path to dorks file (one query per line)
    #[arg(short, long, required_unless_present = "check")]
    dorks: Option<PathBuf>,

    /// Output file path
    #[arg(short, long, default_value = "results.txt")]
    output: PathBuf,

    /// Search engine to use (startpage or yandex)
    #[arg(long, default_value = "startpage")]
    engine: Engine,

    /// Number of concurrent queries
    #[arg(short = 'j', long, default_value = "2")]
    workers: usize,

    /// Tor SOCKS5 proxy URL
    #[arg(long, env = "TORDORK_SOCKS", default_value = "socks5h://127.0.0.1:9050")]
    socks: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,

    /// Attempts per dork before giving up
    #[arg(long, default_value = "5")]
    retries: u32,

    /// Minimum delay between attempts, in seconds
    #[arg(long, default_value = "10")]
    min_delay: u64,

    /// Maximum delay between attempts, in seconds
    #[arg(long, default_value = "15")]
    max_delay: u64,

    /// Only verify the Tor connection and exit
    #[arg(long)]
    check: bool,

    /// Verbosity level (0-3)
    #[arg(short, long, default_value = "1")]
    verbose: u8,
}

impl Cli {
    fn tor_config(&self) -> TorConfig {
        TorConfig {
            socks_addr: self.socks.clone(),
            timeout_secs: self.timeout,
            ..Default::default()
        }
    }

    fn dispatch_config(&self) -> DispatchConfig {
        DispatchConfig {
            engine: self.engine,
            workers: self.workers,
            retry: RetryPolicy {
                max_attempts: self.retries,
                min_delay: Duration::from_secs(self.min_delay),
                max_delay: Duration::from_secs(self.max_delay),
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = match cli.verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(log_level.into()));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    if cli.check {
        return check_status(&cli.tor_config()).await;
    }

    run_search(&cli).await
}

async fn run_search(cli: &Cli) -> Result<ExitCode> {
    let Some(dorks_path) = cli.dorks.as_deref() else {
        println!("❌ A dorks file is required (--dorks)");
        return Ok(ExitCode::FAILURE);
    };

    let queries = match input::load_queries(dorks_path) {
        Ok(queries) => queries,
        Err(e) => {
            println!("❌ {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let tor_config = cli.tor_config();
    let session = match tordork_tor::open_session(&tor_config).await {
        Ok(session) => session,
        Err(e) => {
            println!("❌ {}", e);
            println!("   Expected Tor SOCKS proxy at: {}", tor_config.socks_addr);
            return Ok(ExitCode::FAILURE);
        }
    };
    println!("✔️ Tor connection verified");

    let config = cli.dispatch_config();
    println!(
        "\n🔍 Starting search using {} for {} dorks...\n",
        config.engine,
        queries.len()
    );

    let dispatcher = Dispatcher::new(Arc::new(session), config);
    let progress = BarProgress::new();
    let report = dispatcher.run(queries, &progress).await;

    output::write_links(&cli.output, &report.links)
        .with_context(|| format!("failed to write results to {}", cli.output.display()))?;

    println!(
        "\n✅ Done. {} unique links saved to: {}",
        report.links.len(),
        cli.output.display()
    );
    if report.faulted > 0 {
        println!("⚠️  {} dorks hit unexpected errors", report.faulted);
    }

    Ok(ExitCode::SUCCESS)
}

async fn check_status(config: &TorConfig) -> Result<ExitCode> {
    println!("🔌 Checking Tor connection...\n");

    match tordork_tor::check_tor_connection(config).await {
        Ok(true) => {
            println!("✅ Tor is running and anonymizing traffic");
            println!("   Proxy: {}", config.socks_addr);
            Ok(ExitCode::SUCCESS)
        }
        Ok(false) => {
            println!("❌ Tor is not accessible");
            println!("   Expected proxy at: {}", config.socks_addr);
            println!("\n   To install Tor:");
            println!("   - Linux: sudo apt install tor");
            println!("   - Mac: brew install tor");
            println!("   - Then start: sudo systemctl start tor (or brew services start tor)");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => {
            println!("❌ Error checking Tor: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}
