use std::{path::PathBuf, time::Instant};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use jumptube_core::{
    ApiClient, AppOrchestrator, ClientConfig, ContractVariant, ErrorInfo, OperationState,
    OverlayView,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::render::{
    create_spinner, format_duration, format_failure, print_header, print_overlay, print_rule,
    print_search_state,
};

mod browse;
mod render;

/// CLI wrapper for ContractVariant (needed for clap ValueEnum)
#[derive(Clone, ValueEnum)]
enum CliContract {
    Current,
    Legacy,
}

impl From<CliContract> for ContractVariant {
    fn from(cli: CliContract) -> Self {
        match cli {
            CliContract::Current => ContractVariant::Current,
            CliContract::Legacy => ContractVariant::Legacy,
        }
    }
}

#[derive(Parser)]
#[command(name = "jumptube")]
#[command(about = "Search videos, jump to moments inside them, and read AI summaries")]
struct Cli {
    /// Base URL of the JumpTube service (e.g., "http://localhost:8000")
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Wire contract spoken by the service
    #[arg(long, global = true)]
    contract: Option<CliContract>,

    /// Config file. Defaults to <config dir>/jumptube/config.toml when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search videos by keyword
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Maximum number of results (1-50)
        #[arg(short = 'n', long)]
        limit: Option<u32>,
    },
    /// Find moments inside one video matching a prompt
    Moments {
        /// Video URL or bare video id
        video: String,

        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,

        /// Number of moments to return
        #[arg(short = 'k', long)]
        top_k: Option<u32>,
    },
    /// Request an AI summary of one video
    Summarize {
        /// Video URL or bare video id
        video: String,
    },
    /// Check that the service is reachable
    Health,
    /// Interactive session: search, then open summaries and in-video search
    Browse,
}

fn init_tracing(verbose: u8) {
    let default_directive = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

/// Defaults, config file and environment, then flags on top.
fn resolve_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = ClientConfig::load(cli.config.as_deref())?;
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }
    if let Some(contract) = cli.contract.clone() {
        config.contract = contract.into();
    }
    config.validate()?;
    Ok(config)
}

/// Pump completions under a spinner until nothing is loading.
async fn settle(app: &mut AppOrchestrator, msg: &str) -> Result<()> {
    let spinner = create_spinner(msg);
    let started = Instant::now();

    tokio::select! {
        _ = app.settle() => {
            spinner.finish_and_clear();
            info!(elapsed = %format_duration(started.elapsed()), "settled");
            Ok(())
        }
        _ = tokio::signal::ctrl_c() => {
            spinner.abandon();
            bail!("interrupted")
        }
    }
}

fn fail(error: &ErrorInfo) -> ! {
    eprintln!("{}", format_failure(error));
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };
    info!(
        base_url = %config.base_url,
        contract = config.contract.name(),
        timeout_secs = config.timeout_secs,
        "configuration resolved"
    );

    match cli.command {
        Command::Search { query, limit } => {
            let mut app = AppOrchestrator::from_config(&config)?;
            let query = query.join(" ");
            app.run_search(&query, limit.unwrap_or(config.default_limit))?;
            settle(&mut app, &format!("Searching for \"{query}\"...")).await?;

            if let Some(error) = app.search_state().error() {
                fail(error);
            }
            print_search_state(app.search_state());
        }
        Command::Moments {
            video,
            prompt,
            top_k,
        } => {
            let mut app = AppOrchestrator::from_config(&config)?;
            app.open_in_video_search(&video)?;
            app.submit_in_video_query(&prompt.join(" "), top_k)?;
            settle(&mut app, "Searching inside video...").await?;
            print_overlay_or_fail(&app.overlay_state());
        }
        Command::Summarize { video } => {
            let mut app = AppOrchestrator::from_config(&config)?;
            app.open_summary(&video)?;
            settle(&mut app, "Summarizing...").await?;
            print_overlay_or_fail(&app.overlay_state());
        }
        Command::Health => {
            let client = ApiClient::from_config(&config)?;
            let spinner = create_spinner(&format!("Checking {}...", config.base_url));
            let health = client.health().await;
            spinner.finish_and_clear();

            match health {
                Ok(health) => println!(
                    "{} {} {}",
                    style("✓").green().bold(),
                    config.base_url,
                    style(format!("({})", health.status)).dim()
                ),
                Err(e) => fail(&ErrorInfo::from(e)),
            }
        }
        Command::Browse => {
            let app = AppOrchestrator::from_config(&config)?;
            print_header();
            println!(
                "{} {}",
                style("Service:").dim(),
                style(&config.base_url).cyan()
            );
            print_rule();
            browse::run(app, config.default_limit)
                .await
                .context("browse session ended with an error")?;
        }
    }

    Ok(())
}

fn print_overlay_or_fail(view: &OverlayView<'_>) {
    let failed = match view {
        OverlayView::InVideoSearch {
            state: OperationState::Failed(error),
            ..
        }
        | OverlayView::Summary {
            state: OperationState::Failed(error),
            ..
        } => Some(error),
        _ => None,
    };
    match failed {
        Some(error) => fail(error),
        None => print_overlay(view),
    }
}
