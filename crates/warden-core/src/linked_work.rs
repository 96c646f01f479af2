use crate::timeline::TimelineEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullRequestState {
    Open,
    Closed,
    Merged,
}

impl PullRequestState {
    /// Derive the state from the tracker payload: a merge timestamp wins
    /// over the literal state field.
    pub fn from_payload(state: &str, merged_at: Option<&str>) -> Self {
        if merged_at.is_some() {
            return Self::Merged;
        }
        if state.eq_ignore_ascii_case("open") {
            Self::Open
        } else {
            Self::Closed
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A pull request linked to an (issue, assignee) pair. `last_activity_at`
/// is resolved lazily and only for open candidates; `None` means the
/// instant could not be determined and the candidate is excluded from
/// threshold checks.
pub struct LinkedPullRequest {
    pub number: u64,
    pub state: PullRequestState,
    pub last_activity_at: Option<i64>,
}

/// Pull request numbers cross-referenced from the timeline by `author_login`
/// out of `repo_slug` itself, in timeline order, first occurrence kept.
pub fn linked_candidate_numbers(
    events: &[TimelineEvent],
    author_login: &str,
    repo_slug: &str,
) -> Vec<u64> {
    let mut numbers = Vec::new();
    for event in events {
        let TimelineEvent::CrossReferenced {
            source_repo,
            source_pr_number,
            source_author,
            ..
        } = event
        else {
            continue;
        };
        if source_author != author_login || source_repo != repo_slug {
            continue;
        }
        if !numbers.contains(source_pr_number) {
            numbers.push(*source_pr_number);
        }
    }
    numbers
}
