//! Contributor-inactivity enforcement run loop.
//!
//! One invocation is a complete, independent run: list open assigned issues,
//! reconstruct each assignee's activity from the issue timeline, classify it
//! against the staleness threshold, and apply at most one corrective action
//! per (issue, assignee) pair through the mode gate. No state is carried
//! between runs beyond what the tracker itself records.

use std::collections::HashSet;

use anyhow::Result;
use tracing::{info, warn};
use warden_core::run_config::RunConfig;
use warden_core::staleness::{classify_assignee, EnforcementDecision};
use warden_core::timeline::latest_assignment;
use warden_core::timestamp::{current_unix_timestamp, parse_tracker_timestamp};

mod action_executor;
mod event_aggregator;
mod github_api_client;
mod linked_work_resolver;
mod mode_gate;
mod pagination;
mod transport_helpers;

use action_executor::ActionExecutor;
use event_aggregator::aggregate_issue;
use github_api_client::GithubApiClient;
use linked_work_resolver::resolve_linked_work;
use mode_gate::ModeGate;
pub use pagination::Paginated;

pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_RETRY_MAX_ATTEMPTS: usize = 3;
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 500;

#[derive(Debug, Clone)]
/// Runtime configuration for one enforcement run.
pub struct EnforcementRuntimeConfig {
    /// Repository, staleness threshold, and execution mode for this run.
    pub run: RunConfig,
    pub api_base: String,
    pub token: String,
    /// Restrict the run to these issue numbers; empty means all open
    /// assigned issues.
    pub issue_numbers: Vec<u64>,
    pub request_timeout_ms: u64,
    pub retry_max_attempts: usize,
    pub retry_base_delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One classified (issue, assignee) pair, recorded for auditing and tests.
pub struct DecisionRecord {
    pub issue_number: u64,
    pub assignee: String,
    pub decision: EnforcementDecision,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub issues_seen: usize,
    pub assignees_evaluated: usize,
    pub kept: usize,
    /// Removals and closures that went through (or were simulated); a failed
    /// mutation is logged but not counted as applied.
    pub unassigned: usize,
    pub prs_closed: usize,
    pub assignees_skipped: usize,
    pub issues_skipped: usize,
    pub decisions: Vec<DecisionRecord>,
}

pub struct EnforcementRuntime {
    config: EnforcementRuntimeConfig,
    client: GithubApiClient,
    gate: ModeGate,
}

impl EnforcementRuntime {
    pub fn new(config: EnforcementRuntimeConfig) -> Result<Self> {
        let client = GithubApiClient::new(
            config.api_base.clone(),
            config.token.clone(),
            config.run.repo.clone(),
            config.request_timeout_ms,
            config.retry_max_attempts,
            config.retry_base_delay_ms,
        )?;
        let gate = ModeGate::new(config.run.mode);
        Ok(Self {
            config,
            client,
            gate,
        })
    }

    /// Execute one complete run. Per-issue and per-assignee failures are
    /// logged and skipped; only failures before any issue is processed
    /// (listing the open issues) abort the run.
    pub async fn run_once(&self) -> Result<RunSummary> {
        let repo_slug = self.client.repo_slug();
        info!(
            repo = %repo_slug,
            mode = self.gate.mode().label(),
            threshold_days = self.config.run.threshold_days,
            "starting enforcement run"
        );

        let issue_filter: HashSet<u64> = self.config.issue_numbers.iter().copied().collect();
        let issues = self.client.list_open_assigned_issues().await?;
        let executor = ActionExecutor::new(&self.client, &self.gate, self.config.run.threshold_days);
        let now_unix = current_unix_timestamp();

        let mut summary = RunSummary::default();
        for issue_head in issues {
            if !issue_filter.is_empty() && !issue_filter.contains(&issue_head.number) {
                continue;
            }
            summary.issues_seen += 1;
            let aggregated = match aggregate_issue(&self.client, issue_head.number).await {
                Ok(aggregated) => aggregated,
                Err(error) => {
                    warn!(
                        issue = issue_head.number,
                        error = %error,
                        "failed to aggregate issue, skipping"
                    );
                    summary.issues_skipped += 1;
                    continue;
                }
            };
            let issue_created_at =
                match parse_tracker_timestamp(&aggregated.issue.created_at) {
                    Ok(at) => at,
                    Err(error) => {
                        warn!(
                            issue = issue_head.number,
                            error = %error,
                            "unusable issue creation instant, skipping"
                        );
                        summary.issues_skipped += 1;
                        continue;
                    }
                };

            for assignee in &aggregated.issue.assignees {
                summary.assignees_evaluated += 1;
                let assigned_at = match latest_assignment(&aggregated.events, &assignee.login) {
                    Some(at) => at,
                    None => {
                        warn!(
                            issue = issue_head.number,
                            assignee = %assignee.login,
                            "no assignment event in retrieved timeline, approximating with issue creation instant"
                        );
                        issue_created_at
                    }
                };
                let candidates = resolve_linked_work(
                    &self.client,
                    &aggregated.events,
                    &assignee.login,
                    &repo_slug,
                )
                .await;
                let decision = classify_assignee(
                    now_unix,
                    assigned_at,
                    &candidates,
                    self.config.run.threshold_days,
                );
                info!(
                    issue = issue_head.number,
                    assignee = %assignee.login,
                    decision = decision.label(),
                    "classified assignee"
                );
                summary.decisions.push(DecisionRecord {
                    issue_number: issue_head.number,
                    assignee: assignee.login.clone(),
                    decision: decision.clone(),
                });

                let outcome = match decision {
                    EnforcementDecision::Keep => {
                        summary.kept += 1;
                        Ok(())
                    }
                    EnforcementDecision::UnassignNoWork { age_days } => executor
                        .execute_unassign(issue_head.number, &assignee.login, age_days)
                        .await
                        .map(|applied| {
                            if applied {
                                summary.unassigned += 1;
                            }
                        }),
                    EnforcementDecision::CloseStalePr { pr_number, age_days } => executor
                        .execute_close_stale_pr(
                            issue_head.number,
                            &assignee.login,
                            pr_number,
                            age_days,
                        )
                        .await
                        .map(|applied| {
                            if applied {
                                summary.prs_closed += 1;
                            }
                        }),
                };
                if let Err(error) = outcome {
                    warn!(
                        issue = issue_head.number,
                        assignee = %assignee.login,
                        error = %error,
                        "enforcement action failed, skipping assignee"
                    );
                    summary.assignees_skipped += 1;
                }
            }
        }

        info!(
            repo = %repo_slug,
            issues_seen = summary.issues_seen,
            assignees_evaluated = summary.assignees_evaluated,
            kept = summary.kept,
            unassigned = summary.unassigned,
            prs_closed = summary.prs_closed,
            assignees_skipped = summary.assignees_skipped,
            issues_skipped = summary.issues_skipped,
            "enforcement run complete"
        );
        Ok(summary)
    }
}
