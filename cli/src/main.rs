//! CLI entrypoint for channel-relay
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use relay_application::{
    AccountSupervisor, FanoutStatusSink, HookAccess, MessageRouter, StatusBoard, StatusSink,
};
use relay_domain::AccountId;
use relay_infrastructure::{
    ConfigLoader, FileConfig, HttpHookDispatcher, HttpHostPipeline, JsonlStatusLog,
    WebSocketConnector,
};
use relay_presentation::{Cli, ConsoleFormatter, OutputFormat};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// File name prefix of rotated log files
const LOG_FILE_PREFIX: &str = "channel-relay.log";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(&cli)?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let config = match (cli.no_config, cli.config.as_ref()) {
        (true, None) => ConfigLoader::load_defaults(),
        (true, Some(path)) => ConfigLoader::load_file(path)
            .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", path.display(), e))?,
        (false, path) => ConfigLoader::load(path)
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?,
    };

    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            error!("Configuration: {}", issue);
        }
        bail!("Invalid configuration ({} issue(s))", issues.len());
    }

    let account_ids = select_accounts(&cli, &config);
    if account_ids.is_empty() {
        bail!("No enabled accounts configured. Add an [accounts.<id>] table or use --account.");
    }

    info!("Starting channel-relay");

    // === Dependency Injection ===
    let board = Arc::new(StatusBoard::new());
    let mut sinks: Vec<Arc<dyn StatusSink>> = vec![board.clone()];
    if let Some(path) = &config.status.log_file
        && let Some(log) = JsonlStatusLog::new(path)
    {
        info!("Writing status updates to {}", log.path().display());
        sinks.push(Arc::new(log));
    }
    let status: Arc<dyn StatusSink> = Arc::new(FanoutStatusSink::new(sinks));

    let pipeline_url = config
        .pipeline
        .url
        .clone()
        .filter(|url| !url.trim().is_empty())
        .context("pipeline.url is not configured")?;
    let pipeline = HttpHostPipeline::new(
        pipeline_url,
        config.pipeline.token.clone(),
        config.pipeline.timeout(),
    )
    .context("Failed to build host pipeline client")?;
    info!("Forwarding chat messages to {}", pipeline.url());

    let dispatcher = HttpHookDispatcher::new(
        config.hooks.port,
        &config.hooks.base_path,
        config.hooks.token.clone(),
        config.hooks.timeout(),
    )
    .context("Failed to build hook client")?;
    let hooks = HookAccess::new(config.hooks.enabled, &config.hooks.token, Arc::new(dispatcher));
    if let HookAccess::Disabled(reason) = &hooks {
        info!("Wake and agent requests will be rejected: {}", reason);
    }

    let router = MessageRouter::new(Arc::new(pipeline), hooks)
        .with_channel(config.pipeline.channel.clone())
        .with_status(status.clone());
    let connector = WebSocketConnector::new().with_status(status.clone());
    let supervisor =
        AccountSupervisor::new(Arc::new(connector), Arc::new(router)).with_status(status);

    let cancel = CancellationToken::new();
    let mut started = 0;
    for id in &account_ids {
        match supervisor.start_account(config.resolve_account(id), cancel.child_token()) {
            Ok(()) => started += 1,
            Err(e) => warn!("Account {} not started: {}", id, e),
        }
    }
    if started == 0 {
        bail!("No account could be started");
    }

    info!("Relaying for {} account(s), press Ctrl-C to stop", started);
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    info!("Shutting down");
    supervisor.stop_all();
    cancel.cancel();

    let statuses = board.snapshot();
    let output = match cli.output {
        OutputFormat::Table => ConsoleFormatter::format(&statuses),
        OutputFormat::Json => ConsoleFormatter::format_json(&statuses),
    };
    println!("{}", output);

    Ok(())
}

/// Accounts named with `--account`, or every enabled configured account.
fn select_accounts(cli: &Cli, config: &FileConfig) -> Vec<AccountId> {
    if !cli.account.is_empty() {
        return cli.account.iter().map(AccountId::new).collect();
    }
    config
        .account_ids()
        .into_iter()
        .filter(|id| config.resolve_account(id).enabled)
        .collect()
}

/// Console logging filtered by `-v` (or `RUST_LOG`), plus an optional
/// daily-rotated file under `--log-dir`.
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));

    let (file_layer, guard) = match &cli.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(file_layer)
        .init();

    Ok(guard)
}
