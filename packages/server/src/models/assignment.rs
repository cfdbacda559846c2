use chrono::{DateTime, Utc};
use common::ProgressStatus;
use serde::{Deserialize, Serialize};

use super::shared::validate_title;
use crate::entity::assignment;
use crate::error::AppError;

/// Request body for creating an assignment.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentRequest {
    #[schema(example = "Write a FizzBuzz")]
    pub title: String,
    /// Markdown description.
    #[schema(example = "Print the numbers 1 to 100...")]
    pub description: Option<String>,
    #[schema(example = 1)]
    pub course_id: i32,
}

/// Request body for handing in an assignment.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAssignmentRequest {
    #[schema(example = 1)]
    pub assignment_id: i32,
    #[schema(example = 1)]
    pub user_id: i32,
    /// Source code. Required later for completion.
    #[schema(example = "fn main() {}")]
    pub code: Option<String>,
}

/// Request body for marking an assignment as completed.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompleteAssignmentRequest {
    #[schema(example = 1)]
    pub assignment_id: i32,
    #[schema(example = 1)]
    pub user_id: i32,
}

/// Full assignment details.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Write a FizzBuzz")]
    pub title: String,
    pub description: Option<String>,
    #[schema(example = 1)]
    pub course_id: i32,
    /// Furthest state reached by any learner.
    pub status: ProgressStatus,
    /// Users who handed the assignment in, oldest first.
    pub submitted_by: Vec<i32>,
    /// Users who completed the assignment, oldest first.
    pub completed_by: Vec<i32>,
    pub submitted_code: Option<String>,
    #[schema(example = "2025-10-01T14:30:00Z")]
    pub created_at: DateTime<Utc>,
    #[schema(example = "2025-10-01T14:30:00Z")]
    pub updated_at: DateTime<Utc>,
}

impl AssignmentResponse {
    pub fn new(m: assignment::Model, submitted_by: Vec<i32>, completed_by: Vec<i32>) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            course_id: m.course_id,
            status: m.status,
            submitted_by,
            completed_by,
            submitted_code: m.submitted_code,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Result of a completion.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CompleteAssignmentResponse {
    #[schema(example = "Assignment marked as completed and points awarded")]
    pub message: String,
    /// The user's point total after the award.
    #[schema(example = 40)]
    pub points: i64,
}

/// Assignment ids belonging to a course.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseAssignmentsResponse {
    #[schema(example = 1)]
    pub course_id: i32,
    #[schema(example = "Intro to Rust")]
    pub title: String,
    /// Ordered by creation.
    pub assignments: Vec<i32>,
}

/// Maximum size of submitted code in bytes.
pub const MAX_CODE_SIZE: usize = 1_048_576; // 1 MB

/// Validate an assignment creation request.
pub fn validate_create_assignment(req: &CreateAssignmentRequest) -> Result<(), AppError> {
    validate_title(&req.title)
}

/// Validate a submission request.
pub fn validate_submit_assignment(req: &SubmitAssignmentRequest) -> Result<(), AppError> {
    if let Some(ref code) = req.code
        && code.len() > MAX_CODE_SIZE
    {
        return Err(AppError::Validation(format!(
            "Code size ({} bytes) exceeds maximum ({} bytes)",
            code.len(),
            MAX_CODE_SIZE
        )));
    }
    Ok(())
}
