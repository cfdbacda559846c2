use axum::Json;
use axum::extract::State;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{completion, submission};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppPath;
use crate::models::progress::*;
use crate::state::AppState;
use crate::workflow::find_user;

#[utoipa::path(
    get,
    path = "/{id}/progress",
    tag = "Users",
    operation_id = "getUserProgress",
    summary = "Get a user's submissions, completions and points",
    description = "The ledger lists one entry per completed assignment; `points` is their running total.",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User progress", body = UserProgressResponse),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_user_progress(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<UserProgressResponse>, AppError> {
    let learner = find_user(&state.db, id).await?;

    let submitted_assignments: Vec<SubmissionRecord> = submission::Entity::find()
        .filter(submission::Column::UserId.eq(id))
        .order_by_asc(submission::Column::SubmittedAt)
        .order_by_asc(submission::Column::AssignmentId)
        .all(&state.db)
        .await?
        .into_iter()
        .map(SubmissionRecord::from)
        .collect();

    let ledger: Vec<LedgerEntry> = completion::Entity::find()
        .filter(completion::Column::UserId.eq(id))
        .order_by_asc(completion::Column::CompletedAt)
        .order_by_asc(completion::Column::AssignmentId)
        .all(&state.db)
        .await?
        .into_iter()
        .map(LedgerEntry::from)
        .collect();

    Ok(Json(UserProgressResponse {
        user_id: learner.id,
        username: learner.username,
        points: learner.points,
        submitted_assignments,
        completed_assignments: ledger.iter().map(|e| e.assignment_id).collect(),
        ledger,
    }))
}
