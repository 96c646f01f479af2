use anyhow::Result;
use tracing::warn;
use warden_core::timeline::{collect_timeline_events, TimelineEvent};
use warden_core::tracker_view::GithubIssue;

use super::github_api_client::GithubApiClient;

pub(super) struct AggregatedIssue {
    pub issue: GithubIssue,
    pub events: Vec<TimelineEvent>,
}

/// Fetch an issue's metadata and its full timeline in one pass. Truncated
/// histories and undecodable entries are surfaced as warnings, never
/// silently under-reported; the run proceeds on partial data.
pub(super) async fn aggregate_issue(
    client: &GithubApiClient,
    issue_number: u64,
) -> Result<AggregatedIssue> {
    let issue = client.get_issue(issue_number).await?;
    let timeline = client.list_issue_timeline(issue_number).await?;
    if let super::pagination::Paginated::Truncated { items, pages_seen } = &timeline {
        warn!(
            issue = issue_number,
            pages_seen = *pages_seen,
            events_seen = items.len(),
            "issue timeline truncated at page ceiling, proceeding on partial history"
        );
    }
    let raw_events = timeline.into_items();
    let raw_len = raw_events.len();
    let events = collect_timeline_events(&raw_events);
    let relevant = raw_events
        .iter()
        .filter(|raw| match raw.event.as_str() {
            "assigned" => true,
            "cross-referenced" => raw
                .source
                .as_ref()
                .and_then(|source| source.issue.as_ref())
                .map(|issue| issue.pull_request.is_some())
                .unwrap_or(false),
            _ => false,
        })
        .count();
    if events.len() < relevant {
        warn!(
            issue = issue_number,
            skipped = relevant - events.len(),
            total = raw_len,
            "skipped undecodable timeline entries"
        );
    }
    Ok(AggregatedIssue { issue, events })
}
