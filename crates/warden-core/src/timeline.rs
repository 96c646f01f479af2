use serde::Deserialize;

use crate::timestamp::parse_tracker_timestamp;
use crate::tracker_view::GithubUser;

#[derive(Debug, Clone, Deserialize)]
pub struct RawTimelineSourceIssue {
    pub number: u64,
    pub user: Option<GithubUser>,
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
    #[serde(default)]
    pub repository: Option<RawTimelineSourceRepository>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTimelineSourceRepository {
    pub full_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTimelineSource {
    #[serde(default)]
    pub issue: Option<RawTimelineSourceIssue>,
}

#[derive(Debug, Clone, Deserialize)]
/// Wire view of one timeline entry; only `assigned` and `cross-referenced`
/// entries carry fields the engine reads.
pub struct RawTimelineEvent {
    pub event: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub assignee: Option<GithubUser>,
    #[serde(default)]
    pub source: Option<RawTimelineSource>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Decoded timeline event, ordered by occurrence as returned by the tracker.
pub enum TimelineEvent {
    Assigned {
        login: String,
        at: i64,
    },
    CrossReferenced {
        source_repo: String,
        source_pr_number: u64,
        source_author: String,
        at: i64,
    },
}

/// Decode the raw timeline into the events the engine consumes, preserving
/// order. Unknown event kinds, non-pull-request cross-references, and
/// entries with missing or unparseable fields are dropped; callers compare
/// input and output lengths to surface how many were skipped.
pub fn collect_timeline_events(raw_events: &[RawTimelineEvent]) -> Vec<TimelineEvent> {
    let mut events = Vec::new();
    for raw in raw_events {
        match raw.event.as_str() {
            "assigned" => {
                let (Some(assignee), Some(created_at)) = (&raw.assignee, &raw.created_at) else {
                    continue;
                };
                let Ok(at) = parse_tracker_timestamp(created_at) else {
                    continue;
                };
                events.push(TimelineEvent::Assigned {
                    login: assignee.login.clone(),
                    at,
                });
            }
            "cross-referenced" => {
                let Some(issue) = raw.source.as_ref().and_then(|source| source.issue.as_ref())
                else {
                    continue;
                };
                if issue.pull_request.is_none() {
                    continue;
                }
                let (Some(author), Some(repository), Some(created_at)) =
                    (&issue.user, &issue.repository, &raw.created_at)
                else {
                    continue;
                };
                let Ok(at) = parse_tracker_timestamp(created_at) else {
                    continue;
                };
                events.push(TimelineEvent::CrossReferenced {
                    source_repo: repository.full_name.clone(),
                    source_pr_number: issue.number,
                    source_author: author.login.clone(),
                    at,
                });
            }
            _ => {}
        }
    }
    events
}

/// Instant of the most recent `assigned` event for `login`, if any was
/// recorded in the retrieved timeline.
pub fn latest_assignment(events: &[TimelineEvent], login: &str) -> Option<i64> {
    events
        .iter()
        .filter_map(|event| match event {
            TimelineEvent::Assigned {
                login: event_login,
                at,
            } if event_login == login => Some(*at),
            _ => None,
        })
        .last()
}
