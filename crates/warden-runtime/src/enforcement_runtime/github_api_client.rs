use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde_json::json;
use warden_core::run_config::RepoRef;
use warden_core::timeline::RawTimelineEvent;
use warden_core::tracker_view::{GithubCommit, GithubIssue, GithubIssueComment, GithubPullRequest};

use super::pagination::Paginated;
use super::transport_helpers::{
    is_retryable_tracker_status, is_retryable_transport_error, parse_retry_after, retry_delay,
    truncate_for_error,
};

const PER_PAGE: usize = 100;

/// Hard ceiling on pages fetched for timeline, comment, and commit listings;
/// issues with longer histories are reported as truncated.
const PAGE_CEILING: u32 = 10;

#[derive(Clone)]
pub(super) struct GithubApiClient {
    http: reqwest::Client,
    api_base: String,
    repo: RepoRef,
    retry_max_attempts: usize,
    retry_base_delay_ms: u64,
}

impl GithubApiClient {
    pub(super) fn new(
        api_base: String,
        token: String,
        repo: RepoRef,
        request_timeout_ms: u64,
        retry_max_attempts: usize,
        retry_base_delay_ms: u64,
    ) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("assignment-warden"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            reqwest::header::HeaderValue::from_static("2022-11-28"),
        );
        let auth_header = format!("Bearer {}", token.trim());
        headers.insert(
            reqwest::header::AUTHORIZATION,
            reqwest::header::HeaderValue::from_str(&auth_header)
                .context("invalid github authorization header")?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(request_timeout_ms.max(1)))
            .build()
            .context("failed to create github api client")?;
        Ok(Self {
            http: client,
            api_base: api_base.trim_end_matches('/').to_string(),
            repo,
            retry_max_attempts: retry_max_attempts.max(1),
            retry_base_delay_ms: retry_base_delay_ms.max(1),
        })
    }

    pub(super) fn repo_slug(&self) -> String {
        self.repo.as_slug()
    }

    /// Open issues that currently carry at least one assignee. Pull requests
    /// share the issues listing and are filtered out here.
    pub(super) async fn list_open_assigned_issues(&self) -> Result<Vec<GithubIssue>> {
        let mut page = 1_u32;
        let mut rows = Vec::new();
        loop {
            let page_value = page.to_string();
            let chunk: Vec<GithubIssue> = self
                .request_json("list open assigned issues", || {
                    self.http
                        .get(format!(
                            "{}/repos/{}/{}/issues",
                            self.api_base, self.repo.owner, self.repo.name
                        ))
                        .query(&[
                            ("state", "open"),
                            ("assignee", "*"),
                            ("per_page", "100"),
                            ("page", page_value.as_str()),
                        ])
                })
                .await?;
            let chunk_len = chunk.len();
            rows.extend(chunk.into_iter().filter(|issue| {
                issue.pull_request.is_none() && !issue.assignees.is_empty()
            }));
            if chunk_len < PER_PAGE {
                break;
            }
            page = page.saturating_add(1);
        }
        Ok(rows)
    }

    pub(super) async fn get_issue(&self, issue_number: u64) -> Result<GithubIssue> {
        self.request_json("fetch issue", || {
            self.http.get(format!(
                "{}/repos/{}/{}/issues/{}",
                self.api_base, self.repo.owner, self.repo.name, issue_number
            ))
        })
        .await
    }

    pub(super) async fn list_issue_timeline(
        &self,
        issue_number: u64,
    ) -> Result<Paginated<RawTimelineEvent>> {
        self.list_bounded("list issue timeline", |page| {
            self.http
                .get(format!(
                    "{}/repos/{}/{}/issues/{}/timeline",
                    self.api_base, self.repo.owner, self.repo.name, issue_number
                ))
                .query(&[("per_page", "100"), ("page", page)])
        })
        .await
    }

    pub(super) async fn list_issue_comments(
        &self,
        issue_number: u64,
    ) -> Result<Paginated<GithubIssueComment>> {
        self.list_bounded("list issue comments", |page| {
            self.http
                .get(format!(
                    "{}/repos/{}/{}/issues/{}/comments",
                    self.api_base, self.repo.owner, self.repo.name, issue_number
                ))
                .query(&[
                    ("sort", "created"),
                    ("direction", "asc"),
                    ("per_page", "100"),
                    ("page", page),
                ])
        })
        .await
    }

    pub(super) async fn get_pull_request(&self, pr_number: u64) -> Result<GithubPullRequest> {
        self.request_json("fetch pull request", || {
            self.http.get(format!(
                "{}/repos/{}/{}/pulls/{}",
                self.api_base, self.repo.owner, self.repo.name, pr_number
            ))
        })
        .await
    }

    pub(super) async fn list_pull_request_commits(
        &self,
        pr_number: u64,
    ) -> Result<Paginated<GithubCommit>> {
        self.list_bounded("list pull request commits", |page| {
            self.http
                .get(format!(
                    "{}/repos/{}/{}/pulls/{}/commits",
                    self.api_base, self.repo.owner, self.repo.name, pr_number
                ))
                .query(&[("per_page", "100"), ("page", page)])
        })
        .await
    }

    pub(super) async fn create_issue_comment(&self, issue_number: u64, body: &str) -> Result<()> {
        let payload = json!({ "body": body });
        let _: serde_json::Value = self
            .request_json("create issue comment", || {
                self.http
                    .post(format!(
                        "{}/repos/{}/{}/issues/{}/comments",
                        self.api_base, self.repo.owner, self.repo.name, issue_number
                    ))
                    .json(&payload)
            })
            .await?;
        Ok(())
    }

    /// Remove one assignee from an issue. The tracker treats removal of an
    /// already-absent assignee as a no-op, which keeps retried runs safe.
    pub(super) async fn remove_assignee(&self, issue_number: u64, login: &str) -> Result<()> {
        let payload = json!({ "assignees": [login] });
        let _: serde_json::Value = self
            .request_json("remove issue assignee", || {
                self.http
                    .delete(format!(
                        "{}/repos/{}/{}/issues/{}/assignees",
                        self.api_base, self.repo.owner, self.repo.name, issue_number
                    ))
                    .json(&payload)
            })
            .await?;
        Ok(())
    }

    pub(super) async fn close_pull_request(&self, pr_number: u64) -> Result<()> {
        let payload = json!({ "state": "closed" });
        let _: serde_json::Value = self
            .request_json("close pull request", || {
                self.http
                    .patch(format!(
                        "{}/repos/{}/{}/pulls/{}",
                        self.api_base, self.repo.owner, self.repo.name, pr_number
                    ))
                    .json(&payload)
            })
            .await?;
        Ok(())
    }

    async fn list_bounded<T, F>(&self, operation: &str, request_for_page: F) -> Result<Paginated<T>>
    where
        T: DeserializeOwned,
        F: Fn(&str) -> reqwest::RequestBuilder,
    {
        let mut page = 1_u32;
        let mut rows = Vec::new();
        loop {
            let page_value = page.to_string();
            let chunk: Vec<T> = self
                .request_json(operation, || request_for_page(page_value.as_str()))
                .await?;
            let chunk_len = chunk.len();
            rows.extend(chunk);
            if chunk_len < PER_PAGE {
                return Ok(Paginated::Complete(rows));
            }
            if page >= PAGE_CEILING {
                return Ok(Paginated::Truncated {
                    items: rows,
                    pages_seen: page,
                });
            }
            page = page.saturating_add(1);
        }
    }

    async fn request_json<T, F>(&self, operation: &str, mut request_builder: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: FnMut() -> reqwest::RequestBuilder,
    {
        let mut attempt = 0_usize;
        loop {
            attempt = attempt.saturating_add(1);
            let response = request_builder().send().await;
            match response {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let parsed = response
                            .json::<T>()
                            .await
                            .with_context(|| format!("failed to decode github {operation}"))?;
                        return Ok(parsed);
                    }

                    let retry_after = parse_retry_after(response.headers());
                    let body = response.text().await.unwrap_or_default();
                    if attempt < self.retry_max_attempts
                        && is_retryable_tracker_status(status.as_u16())
                    {
                        tokio::time::sleep(retry_delay(
                            self.retry_base_delay_ms,
                            attempt,
                            retry_after,
                        ))
                        .await;
                        continue;
                    }

                    bail!(
                        "github api {operation} failed with status {}: {}",
                        status.as_u16(),
                        truncate_for_error(&body, 800)
                    );
                }
                Err(error) => {
                    if attempt < self.retry_max_attempts && is_retryable_transport_error(&error) {
                        tokio::time::sleep(retry_delay(self.retry_base_delay_ms, attempt, None))
                            .await;
                        continue;
                    }
                    return Err(error)
                        .with_context(|| format!("github api {operation} request failed"));
                }
            }
        }
    }
}
