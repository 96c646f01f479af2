use tracing::warn;
use warden_core::linked_work::{linked_candidate_numbers, LinkedPullRequest, PullRequestState};
use warden_core::timeline::TimelineEvent;
use warden_core::timestamp::parse_tracker_timestamp;

use super::github_api_client::GithubApiClient;

/// Resolve the ordered linked-pull-request candidates for one assignee.
///
/// Candidates come from cross-reference events authored by the assignee out
/// of the issue's own repository, in timeline order. Closed and merged
/// candidates stay in the list so the classifier can distinguish "never
/// worked" from "worked but finished"; the last-activity lookup is only paid
/// for open candidates. A candidate whose state cannot be fetched is dropped
/// with a warning; an open candidate whose last activity cannot be resolved
/// keeps `None` and is excluded from threshold checks downstream.
pub(super) async fn resolve_linked_work(
    client: &GithubApiClient,
    events: &[TimelineEvent],
    assignee_login: &str,
    repo_slug: &str,
) -> Vec<LinkedPullRequest> {
    let mut candidates = Vec::new();
    for pr_number in linked_candidate_numbers(events, assignee_login, repo_slug) {
        let pull_request = match client.get_pull_request(pr_number).await {
            Ok(pull_request) => pull_request,
            Err(error) => {
                warn!(
                    pr_number,
                    assignee = assignee_login,
                    error = %error,
                    "failed to fetch linked pull request state, skipping candidate"
                );
                continue;
            }
        };
        let state = PullRequestState::from_payload(
            &pull_request.state,
            pull_request.merged_at.as_deref(),
        );
        let last_activity_at = if state.is_open() {
            resolve_last_activity(client, pr_number, assignee_login).await
        } else {
            None
        };
        candidates.push(LinkedPullRequest {
            number: pr_number,
            state,
            last_activity_at,
        });
    }
    candidates
}

/// Most recent commit instant on the pull request, taken as the maximum
/// parsed signature date so the result is independent of page ordering.
async fn resolve_last_activity(
    client: &GithubApiClient,
    pr_number: u64,
    assignee_login: &str,
) -> Option<i64> {
    let commits = match client.list_pull_request_commits(pr_number).await {
        Ok(commits) => commits,
        Err(error) => {
            warn!(
                pr_number,
                assignee = assignee_login,
                error = %error,
                "failed to list pull request commits, excluding candidate from threshold check"
            );
            return None;
        }
    };
    if commits.is_truncated() {
        warn!(
            pr_number,
            commits_seen = commits.items().len(),
            "pull request commit list truncated at page ceiling"
        );
    }
    let last_activity = commits
        .items()
        .iter()
        .filter_map(|commit| commit.activity_date())
        .filter_map(|date| parse_tracker_timestamp(date).ok())
        .max();
    if last_activity.is_none() {
        warn!(
            pr_number,
            assignee = assignee_login,
            "no resolvable commit activity on pull request, excluding candidate from threshold check"
        );
    }
    last_activity
}
