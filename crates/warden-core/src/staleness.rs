use crate::linked_work::LinkedPullRequest;
use crate::timestamp::age_days;

#[derive(Debug, Clone, PartialEq, Eq)]
/// The single corrective decision for one (issue, assignee) pair per run.
pub enum EnforcementDecision {
    Keep,
    UnassignNoWork { age_days: u64 },
    CloseStalePr { pr_number: u64, age_days: u64 },
}

impl EnforcementDecision {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Keep => "keep",
            Self::UnassignNoWork { .. } => "unassign_no_work",
            Self::CloseStalePr { .. } => "close_stale_pr",
        }
    }
}

/// Two-phase staleness classification.
///
/// Without open linked work the assignment age decides; with open linked
/// work the first candidate (in resolution order, not the most stale one)
/// whose last-activity age meets the threshold is closed. Ages compare with
/// `>=`, so a pair exactly at the threshold is stale. Candidates without a
/// resolved last-activity instant are excluded from the threshold check.
pub fn classify_assignee(
    now_unix: i64,
    assigned_at_unix: i64,
    candidates: &[LinkedPullRequest],
    threshold_days: u64,
) -> EnforcementDecision {
    let has_open_work = candidates.iter().any(|candidate| candidate.state.is_open());
    if !has_open_work {
        let assignment_age = age_days(now_unix, assigned_at_unix);
        return if assignment_age >= threshold_days {
            EnforcementDecision::UnassignNoWork {
                age_days: assignment_age,
            }
        } else {
            EnforcementDecision::Keep
        };
    }

    for candidate in candidates.iter().filter(|entry| entry.state.is_open()) {
        let Some(last_activity_at) = candidate.last_activity_at else {
            continue;
        };
        let pr_age = age_days(now_unix, last_activity_at);
        if pr_age >= threshold_days {
            return EnforcementDecision::CloseStalePr {
                pr_number: candidate.number,
                age_days: pr_age,
            };
        }
    }
    EnforcementDecision::Keep
}
