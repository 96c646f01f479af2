use anyhow::{Context, Result};
use tracing::{error, info, warn};
use warden_core::enforcement_comment::{
    has_marker_for_login, render_close_pr_comment, render_unassign_comment, CLOSE_PR_MARKER,
    UNASSIGN_MARKER,
};

use super::github_api_client::GithubApiClient;
use super::mode_gate::ModeGate;

/// Applies non-`Keep` decisions through the mode gate.
///
/// The explanatory message always goes out before the mutating call, so the
/// explanation stays visible even when the mutation fails. The duplicate
/// check looks for the action marker plus the assignee's login among the
/// target's existing comments; a hit skips only the post step, because the
/// marker proves a message was sent, not that the mutation happened.
/// Mutation failures are logged and do not abort the run; the returned flag
/// tells the caller whether the primary mutation went through (or was
/// simulated), so summaries count only actions that actually applied.
pub(super) struct ActionExecutor<'a> {
    client: &'a GithubApiClient,
    gate: &'a ModeGate,
    threshold_days: u64,
}

impl<'a> ActionExecutor<'a> {
    pub(super) fn new(client: &'a GithubApiClient, gate: &'a ModeGate, threshold_days: u64) -> Self {
        Self {
            client,
            gate,
            threshold_days,
        }
    }

    pub(super) async fn execute_unassign(
        &self,
        issue_number: u64,
        login: &str,
        age_days: u64,
    ) -> Result<bool> {
        let body = render_unassign_comment(login, age_days, self.threshold_days);
        self.post_unless_marked(issue_number, UNASSIGN_MARKER, login, &body)
            .await?;
        match self.gate.remove_assignee(self.client, issue_number, login).await {
            Ok(()) => Ok(true),
            Err(error) => {
                error!(
                    issue = issue_number,
                    assignee = login,
                    error = %error,
                    "failed to remove assignee, continuing run"
                );
                Ok(false)
            }
        }
    }

    pub(super) async fn execute_close_stale_pr(
        &self,
        issue_number: u64,
        login: &str,
        pr_number: u64,
        age_days: u64,
    ) -> Result<bool> {
        let body = render_close_pr_comment(login, issue_number, age_days, self.threshold_days);
        self.post_unless_marked(pr_number, CLOSE_PR_MARKER, login, &body)
            .await?;
        let closed = match self.gate.close_pull_request(self.client, pr_number).await {
            Ok(()) => true,
            Err(error) => {
                error!(
                    pr_number,
                    assignee = login,
                    error = %error,
                    "failed to close pull request, continuing run"
                );
                false
            }
        };
        if let Err(error) = self.gate.remove_assignee(self.client, issue_number, login).await {
            error!(
                issue = issue_number,
                assignee = login,
                error = %error,
                "failed to remove assignee, continuing run"
            );
        }
        Ok(closed)
    }

    /// Failures on the duplicate-check read propagate: without the comment
    /// list we cannot rule out a double post, so the assignee is skipped for
    /// this run.
    async fn post_unless_marked(
        &self,
        target_number: u64,
        marker: &str,
        login: &str,
        body: &str,
    ) -> Result<()> {
        let comments = self
            .client
            .list_issue_comments(target_number)
            .await
            .with_context(|| format!("duplicate-marker check on #{target_number}"))?;
        if comments.is_truncated() {
            warn!(
                target = target_number,
                comments_seen = comments.items().len(),
                "comment list truncated at page ceiling, duplicate check may miss older markers"
            );
        }
        if has_marker_for_login(comments.items(), marker, login) {
            info!(
                target = target_number,
                assignee = login,
                "explanatory comment already posted, skipping post step only"
            );
            return Ok(());
        }
        self.gate.post_comment(self.client, target_number, body).await
    }
}
