use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize, Serialize)]
/// Tracker account reference as returned by the issues API.
pub struct GithubUser {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GithubIssueLabel {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
/// Read-only view of an issue: the engine never mutates issue metadata.
pub struct GithubIssue {
    pub number: u64,
    pub state: String,
    pub created_at: String,
    #[serde(default)]
    pub assignees: Vec<GithubUser>,
    #[serde(default)]
    pub labels: Vec<GithubIssueLabel>,
    #[serde(default)]
    pub pull_request: Option<Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GithubIssueComment {
    pub id: u64,
    pub body: Option<String>,
    pub created_at: String,
    pub user: GithubUser,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GithubPullRequest {
    pub number: u64,
    pub state: String,
    #[serde(default)]
    pub merged_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GithubCommitSignature {
    pub date: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GithubCommitDetail {
    #[serde(default)]
    pub committer: Option<GithubCommitSignature>,
    #[serde(default)]
    pub author: Option<GithubCommitSignature>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
/// One entry of a pull request's commit list; only the signature dates are
/// needed to resolve last activity.
pub struct GithubCommit {
    pub commit: GithubCommitDetail,
}

impl GithubCommit {
    /// Committer date when present, author date otherwise.
    pub fn activity_date(&self) -> Option<&str> {
        self.commit
            .committer
            .as_ref()
            .or(self.commit.author.as_ref())
            .map(|signature| signature.date.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{GithubCommit, GithubIssue};

    #[test]
    fn unit_github_issue_tolerates_missing_optional_fields() {
        let issue: GithubIssue = serde_json::from_value(serde_json::json!({
            "number": 42,
            "state": "open",
            "created_at": "2026-01-01T00:00:00Z"
        }))
        .expect("minimal issue payload");
        assert!(issue.assignees.is_empty());
        assert!(issue.labels.is_empty());
        assert!(issue.pull_request.is_none());
    }

    #[test]
    fn functional_github_commit_activity_date_prefers_committer() {
        let commit: GithubCommit = serde_json::from_value(serde_json::json!({
            "commit": {
                "committer": { "date": "2026-02-01T00:00:00Z" },
                "author": { "date": "2026-01-01T00:00:00Z" }
            }
        }))
        .expect("commit payload");
        assert_eq!(commit.activity_date(), Some("2026-02-01T00:00:00Z"));

        let author_only: GithubCommit = serde_json::from_value(serde_json::json!({
            "commit": { "author": { "date": "2026-01-15T00:00:00Z" } }
        }))
        .expect("author-only payload");
        assert_eq!(author_only.activity_date(), Some("2026-01-15T00:00:00Z"));

        let empty: GithubCommit =
            serde_json::from_value(serde_json::json!({ "commit": {} })).expect("empty payload");
        assert_eq!(empty.activity_date(), None);
    }
}
