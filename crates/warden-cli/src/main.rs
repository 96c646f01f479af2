//! `assignment-warden` binary: one complete enforcement run per invocation.
//!
//! An external scheduler invokes the binary periodically; it exits 0 on any
//! completed run regardless of how many stale assignees were found, and
//! non-zero only for configuration or setup failures.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use warden_core::run_config::{parse_apply_flag, RepoRef, RunConfig, DEFAULT_THRESHOLD_DAYS};
use warden_runtime::enforcement_runtime::{
    DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_RETRY_BASE_DELAY_MS, DEFAULT_RETRY_MAX_ATTEMPTS,
};
use warden_runtime::{EnforcementRuntime, EnforcementRuntimeConfig};

#[derive(Debug, Parser)]
#[command(
    name = "assignment-warden",
    about = "Releases stale issue assignments and closes abandoned linked pull requests."
)]
struct Cli {
    /// Target repository as owner/name.
    #[arg(long, env = "WARDEN_REPO")]
    repo: String,

    /// Days of inactivity after which an assignment or pull request is
    /// considered abandoned.
    #[arg(long, env = "WARDEN_THRESHOLD_DAYS", default_value_t = DEFAULT_THRESHOLD_DAYS)]
    threshold_days: u64,

    /// Execution mode: true/1 applies mutations, anything else simulates.
    #[arg(long, env = "WARDEN_APPLY")]
    apply: Option<String>,

    /// Tracker API token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    #[arg(long, env = "WARDEN_API_BASE", default_value = "https://api.github.com")]
    api_base: String,

    /// Restrict the run to specific issue numbers (repeatable).
    #[arg(long = "issue", value_name = "NUMBER")]
    issue_numbers: Vec<u64>,

    #[arg(long, env = "WARDEN_REQUEST_TIMEOUT_MS", default_value_t = DEFAULT_REQUEST_TIMEOUT_MS)]
    request_timeout_ms: u64,

    #[arg(long, env = "WARDEN_RETRY_MAX_ATTEMPTS", default_value_t = DEFAULT_RETRY_MAX_ATTEMPTS)]
    retry_max_attempts: usize,

    #[arg(long, env = "WARDEN_RETRY_BASE_DELAY_MS", default_value_t = DEFAULT_RETRY_BASE_DELAY_MS)]
    retry_base_delay_ms: u64,
}

fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let repo = RepoRef::parse(&cli.repo)?;
    let mode = parse_apply_flag(cli.apply.as_deref());
    let token = cli
        .github_token
        .context("tracker authentication unavailable: set --github-token or GITHUB_TOKEN")?;

    let config = EnforcementRuntimeConfig {
        run: RunConfig {
            repo,
            threshold_days: cli.threshold_days,
            mode,
        },
        api_base: cli.api_base,
        token,
        issue_numbers: cli.issue_numbers,
        request_timeout_ms: cli.request_timeout_ms,
        retry_max_attempts: cli.retry_max_attempts,
        retry_base_delay_ms: cli.retry_base_delay_ms,
    };

    let runtime = EnforcementRuntime::new(config)?;
    runtime.run_once().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::Cli;

    #[test]
    fn unit_cli_parses_defaults() {
        let cli = Cli::try_parse_from(["assignment-warden", "--repo", "owner/repo"])
            .expect("minimal args");
        assert_eq!(cli.threshold_days, 21);
        assert_eq!(cli.api_base, "https://api.github.com");
        assert!(cli.apply.is_none());
        assert!(cli.issue_numbers.is_empty());
    }

    #[test]
    fn functional_cli_accepts_repeated_issue_filters_and_mode_flag() {
        let cli = Cli::try_parse_from([
            "assignment-warden",
            "--repo",
            "owner/repo",
            "--apply",
            "TRUE",
            "--issue",
            "42",
            "--issue",
            "7",
            "--threshold-days",
            "14",
        ])
        .expect("full args");
        assert_eq!(cli.apply.as_deref(), Some("TRUE"));
        assert_eq!(cli.issue_numbers, vec![42, 7]);
        assert_eq!(cli.threshold_days, 14);
    }

    #[test]
    fn regression_cli_rejects_malformed_threshold() {
        let error = Cli::try_parse_from([
            "assignment-warden",
            "--repo",
            "owner/repo",
            "--threshold-days",
            "three-weeks",
        ])
        .expect_err("malformed threshold should fail");
        assert!(error.to_string().contains("three-weeks"));
    }
}
