//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the final status report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored per-account table
    Table,
    /// JSON array of account statuses
    Json,
}

/// CLI arguments for channel-relay
#[derive(Parser, Debug)]
#[command(name = "channel-relay")]
#[command(author, version, about = "Relay chat between a gateway service and a local agent host")]
#[command(long_about = r#"
channel-relay keeps one WebSocket connection per configured account open to a
remote gateway service and relays traffic in both directions:

1. Chat messages are forwarded to the host pipeline; its replies go back to
   the sender
2. Wake and agent-turn requests are posted to the local hook endpoints and
   acknowledged to the gateway
3. Dropped connections are retried with capped exponential backoff

The relay runs until interrupted (Ctrl-C), then stops every account and
prints a final status report.

Configuration files are loaded from (in priority order):
1. RELAY_* environment variables (RELAY_HOOKS__TOKEN=...)
2. --config <path>     Explicit config file
3. ./relay.toml        Project-level config
4. ~/.config/channel-relay/config.toml   Global config

Example:
  channel-relay
  channel-relay --config relay.toml -a default -vv
  channel-relay --log-dir /var/log/channel-relay
"#)]
pub struct Cli {
    /// Accounts to start (can be specified multiple times; default: all enabled)
    #[arg(short, long, value_name = "ID")]
    pub account: Vec<String>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Also write logs to daily-rotated files in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Format of the status report printed on shutdown
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Skip global, project and environment configuration; only an
    /// explicit --config file is read
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Log filter directive for the requested verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::parse_from(["channel-relay"]);
        assert!(cli.account.is_empty());
        assert_eq!(cli.output, OutputFormat::Table);
        assert_eq!(cli.log_level(), "warn");
        assert!(!cli.no_config);
    }

    #[test]
    fn test_parse_accounts_and_verbosity() {
        let cli = Cli::parse_from([
            "channel-relay",
            "-a",
            "default",
            "--account",
            "backup",
            "-vv",
            "--output",
            "json",
            "--config",
            "relay.toml",
        ]);
        assert_eq!(cli.account, vec!["default", "backup"]);
        assert_eq!(cli.log_level(), "debug");
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.config, Some(PathBuf::from("relay.toml")));
    }
}
