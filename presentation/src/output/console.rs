//! Console output formatter for account status

use chrono::{DateTime, Utc};
use colored::Colorize;
use relay_application::ports::status_board::AccountStatus;

/// Formats account status snapshots for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format every account as one block
    pub fn format(statuses: &[AccountStatus]) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Account Status"));
        output.push('\n');

        if statuses.is_empty() {
            output.push_str(&format!("\n{}\n", "No accounts were started.".dimmed()));
        }

        for status in statuses {
            output.push_str(&Self::format_account(status));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(statuses: &[AccountStatus]) -> String {
        serde_json::to_string_pretty(statuses).unwrap_or_else(|_| "[]".to_string())
    }

    fn format_account(status: &AccountStatus) -> String {
        let state = match (status.running, status.connected) {
            (true, true) => "connected".green().bold(),
            (true, false) => "disconnected".yellow().bold(),
            (false, _) => "stopped".dimmed(),
        };

        let mut output = format!(
            "\n{} {}\n",
            format!("── {} ──", status.account_id).cyan().bold(),
            state
        );
        output.push_str(&Self::field("Last start", status.last_start_at));
        output.push_str(&Self::field("Last connect", status.last_connected_at));
        output.push_str(&Self::field("Last stop", status.last_stop_at));
        if let Some(error) = &status.last_error {
            output.push_str(&format!("  {:<14}{}\n", "Last error:", error.red()));
        }
        output
    }

    fn field(label: &str, at: Option<DateTime<Utc>>) -> String {
        let value = at
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "-".to_string());
        format!("  {:<14}{}\n", format!("{}:", label), value)
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_domain::AccountId;

    fn status(id: &str) -> AccountStatus {
        AccountStatus::new(AccountId::new(id))
    }

    #[test]
    fn test_format_lists_each_account() {
        colored::control::set_override(false);

        let mut a = status("default");
        a.running = true;
        a.connected = true;
        a.last_start_at = Some(Utc::now());
        let mut b = status("backup");
        b.running = true;
        b.last_error = Some("connection refused".into());

        let text = ConsoleFormatter::format(&[a, b]);

        assert!(text.contains("── default ── connected"));
        assert!(text.contains("── backup ── disconnected"));
        assert!(text.contains("Last error:   connection refused"));
        assert!(text.contains("Last stop:    -"));
    }

    #[test]
    fn test_format_without_accounts() {
        colored::control::set_override(false);
        assert!(ConsoleFormatter::format(&[]).contains("No accounts were started."));
    }

    #[test]
    fn test_format_json() {
        let json = ConsoleFormatter::format_json(&[status("default")]);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["account_id"], "default");
        assert_eq!(value[0]["running"], false);
    }
}
