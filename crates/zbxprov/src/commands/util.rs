//! Shared helpers for command handlers.

use url::Url;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::{self, Progress};

/// Progress reporter honoring `--color` and `--quiet`.
pub fn progress(global: &GlobalOpts) -> Progress {
    Progress::new(output::should_color(global.color), global.quiet)
}

/// Frontend URL for humans: the endpoint's directory.
///
/// `http://zabbix:8080/api_jsonrpc.php` becomes `http://zabbix:8080/`.
pub fn frontend_url(endpoint: &Url) -> String {
    endpoint
        .join("./")
        .map_or_else(|_| endpoint.to_string(), |u| u.to_string())
}

/// Summarize per-item failures after the banner. They never change the
/// exit code.
pub fn warn_failures(progress: &Progress, failures: usize) {
    if failures > 0 {
        let noun = if failures == 1 { "item" } else { "items" };
        progress.note(&format!("{failures} {noun} failed; see the report above"));
    }
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn frontend_url_drops_script_name() {
        let endpoint = Url::parse("http://localhost:13080/api_jsonrpc.php").unwrap();
        assert_eq!(frontend_url(&endpoint), "http://localhost:13080/");
    }

    #[test]
    fn frontend_url_keeps_subdirectory() {
        let endpoint = Url::parse("https://mon.lab/zabbix/api_jsonrpc.php").unwrap();
        assert_eq!(frontend_url(&endpoint), "https://mon.lab/zabbix/");
    }
}
