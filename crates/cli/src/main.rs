// CLI modules
mod cli;
mod state;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use cli::op::{Op, OpContext, Overrides};
use cli::{args::Args, Counts, Create, Delete, Get, Init, Links, List, Show, TimeSync, Update};
use state::AppState;

command_enum! {
    (Init, Init),
    (Links, Links),
    (Get, Get),
    (List, List),
    (Show, Show),
    (Create, Create),
    (Update, Update),
    (Delete, Delete),
    (Counts, Counts),
    (TimeSync, TimeSync),
}

fn init_logging(log_level: &str) -> tracing_appender::non_blocking::WorkerGuard {
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    let log_level: tracing::Level = log_level.parse().unwrap_or(tracing::Level::WARN);
    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(non_blocking_writer)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(stderr_layer).init();
    guard
}

fn context(args: &Args) -> anyhow::Result<OpContext> {
    let mut state =
        AppState::load(args.config_path.clone()).context("failed to load configuration")?;
    state.config.apply_env(|name| std::env::var(name).ok());

    Ok(OpContext::new(
        state,
        Overrides {
            base_uri: args.base_uri.clone(),
            api_id: args.api_id.clone(),
            api_secret: args.api_secret.clone(),
            time_sync: args.time_sync,
        },
    ))
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let guard = init_logging(&args.log_level);

    let ctx = match context(&args) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            drop(guard);
            std::process::exit(1);
        }
    };

    let code = match args.command.execute(&ctx).await {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    // Flush buffered log lines before exiting
    drop(guard);
    std::process::exit(code);
}
