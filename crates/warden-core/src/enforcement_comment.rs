use crate::tracker_view::GithubIssueComment;

/// Hidden marker tokens embedded in posted messages so later runs can detect
/// that an equivalent message already exists.
pub const UNASSIGN_MARKER: &str = "<!-- warden:unassign-inactive -->";
pub const CLOSE_PR_MARKER: &str = "<!-- warden:close-stale-pr -->";

pub fn render_unassign_comment(login: &str, age_days: u64, threshold_days: u64) -> String {
    format!(
        "{UNASSIGN_MARKER}\n@{login} this issue was assigned to you {age_days} days ago and no \
         linked pull request is open. Assignments inactive for {threshold_days} days or more are \
         released so others can pick the issue up. Feel free to re-assign yourself when you start \
         working on it."
    )
}

pub fn render_close_pr_comment(
    login: &str,
    issue_number: u64,
    age_days: u64,
    threshold_days: u64,
) -> String {
    format!(
        "{CLOSE_PR_MARKER}\n@{login} this pull request for issue #{issue_number} has had no \
         commit activity for {age_days} days (threshold {threshold_days}). It is being closed and \
         the issue assignment released; reopen it when work resumes."
    )
}

/// True when any fetched comment carries both the marker token and the
/// assignee's login. The marker only proves a message was posted, not that
/// the matching mutation succeeded, so callers skip the post step only.
pub fn has_marker_for_login(comments: &[GithubIssueComment], marker: &str, login: &str) -> bool {
    let mention = format!("@{login}");
    comments.iter().any(|comment| {
        comment
            .body
            .as_deref()
            .map(|body| body.contains(marker) && body.contains(&mention))
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::{
        has_marker_for_login, render_close_pr_comment, render_unassign_comment, CLOSE_PR_MARKER,
        UNASSIGN_MARKER,
    };
    use crate::tracker_view::{GithubIssueComment, GithubUser};

    fn comment(id: u64, body: Option<&str>) -> GithubIssueComment {
        GithubIssueComment {
            id,
            body: body.map(|value| value.to_string()),
            created_at: "2026-01-01T00:00:00Z".to_string(),
            user: GithubUser {
                login: "warden-bot".to_string(),
            },
        }
    }

    #[test]
    fn unit_render_unassign_comment_embeds_marker_and_mention() {
        let body = render_unassign_comment("alice", 25, 21);
        assert!(body.starts_with(UNASSIGN_MARKER));
        assert!(body.contains("@alice"));
        assert!(body.contains("25 days"));
    }

    #[test]
    fn unit_render_close_pr_comment_embeds_marker_and_issue_reference() {
        let body = render_close_pr_comment("alice", 42, 30, 21);
        assert!(body.starts_with(CLOSE_PR_MARKER));
        assert!(body.contains("@alice"));
        assert!(body.contains("#42"));
    }

    #[test]
    fn functional_has_marker_for_login_requires_marker_and_login_together() {
        let comments = vec![
            comment(1, Some("unrelated discussion")),
            comment(2, None),
            comment(3, Some(&render_unassign_comment("alice", 25, 21))),
        ];
        assert!(has_marker_for_login(&comments, UNASSIGN_MARKER, "alice"));
        assert!(!has_marker_for_login(&comments, UNASSIGN_MARKER, "bob"));
        assert!(!has_marker_for_login(&comments, CLOSE_PR_MARKER, "alice"));
    }
}
