use anyhow::Result;
use tracing::info;
use warden_core::run_config::RunMode;

use super::github_api_client::GithubApiClient;

#[derive(Debug, Clone, Copy)]
/// Gate in front of every mutating tracker call. Both modes log the action
/// identically, including the full message body, so a simulate-mode log
/// matches what an apply-mode run would have done; only apply mode issues
/// the network mutation.
pub(super) struct ModeGate {
    mode: RunMode,
}

impl ModeGate {
    pub(super) fn new(mode: RunMode) -> Self {
        Self { mode }
    }

    pub(super) fn mode(&self) -> RunMode {
        self.mode
    }

    pub(super) async fn post_comment(
        &self,
        client: &GithubApiClient,
        target_number: u64,
        body: &str,
    ) -> Result<()> {
        info!(
            mode = self.mode.label(),
            target = target_number,
            body,
            "post explanatory comment"
        );
        if self.mode.is_apply() {
            client.create_issue_comment(target_number, body).await?;
        }
        Ok(())
    }

    pub(super) async fn remove_assignee(
        &self,
        client: &GithubApiClient,
        issue_number: u64,
        login: &str,
    ) -> Result<()> {
        info!(
            mode = self.mode.label(),
            issue = issue_number,
            assignee = login,
            "remove assignee"
        );
        if self.mode.is_apply() {
            client.remove_assignee(issue_number, login).await?;
        }
        Ok(())
    }

    pub(super) async fn close_pull_request(
        &self,
        client: &GithubApiClient,
        pr_number: u64,
    ) -> Result<()> {
        info!(mode = self.mode.label(), pr_number, "close pull request");
        if self.mode.is_apply() {
            client.close_pull_request(pr_number).await?;
        }
        Ok(())
    }
}
