use chrono::{DateTime, Utc};
use common::ProgressStatus;
use serde::Serialize;

use crate::entity::{completion, submission};

/// A learner's record of having handed in one assignment.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    #[schema(example = 1)]
    pub assignment_id: i32,
    pub approved: bool,
    pub code: Option<String>,
    pub status: ProgressStatus,
    #[schema(example = "2025-10-01T14:30:00Z")]
    pub submitted_at: DateTime<Utc>,
}

impl From<submission::Model> for SubmissionRecord {
    fn from(m: submission::Model) -> Self {
        Self {
            assignment_id: m.assignment_id,
            approved: m.approved,
            code: m.code,
            status: m.status,
            submitted_at: m.submitted_at,
        }
    }
}

/// One points award.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    #[schema(example = 1)]
    pub assignment_id: i32,
    #[schema(example = 20)]
    pub points: i64,
    #[schema(example = "2025-10-01T14:30:00Z")]
    pub completed_at: DateTime<Utc>,
}

impl From<completion::Model> for LedgerEntry {
    fn from(m: completion::Model) -> Self {
        Self {
            assignment_id: m.assignment_id,
            points: m.points,
            completed_at: m.completed_at,
        }
    }
}

/// Everything a learner has handed in and finished.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProgressResponse {
    #[schema(example = 1)]
    pub user_id: i32,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = 40)]
    pub points: i64,
    pub submitted_assignments: Vec<SubmissionRecord>,
    /// Completed assignment ids, oldest first.
    pub completed_assignments: Vec<i32>,
    pub ledger: Vec<LedgerEntry>,
}
