use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::{AppJson, AppPath};
use crate::models::assignment::*;
use crate::state::AppState;
use crate::workflow;

#[utoipa::path(
    post,
    path = "/create",
    tag = "Assignments",
    operation_id = "createAssignment",
    summary = "Create an assignment",
    description = "Creates a new assignment and attaches it to the given course. The course must exist.",
    request_body = CreateAssignmentRequest,
    responses(
        (status = 201, description = "Assignment created", body = AssignmentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Course not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Storage failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(course_id = payload.course_id))]
pub async fn create_assignment(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateAssignmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_assignment(&payload)?;

    let response = workflow::create_assignment(
        &state.db,
        &payload.title,
        payload.description,
        payload.course_id,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    post,
    path = "/submit",
    tag = "Assignments",
    operation_id = "submitAssignment",
    summary = "Hand in an assignment",
    description = "Records a submission for the user, optionally with code. Code is required before the assignment can be completed. A user can submit a given assignment once; with `workflow.exclusive_submission` enabled only the first user can.",
    request_body = SubmitAssignmentRequest,
    responses(
        (status = 200, description = "Assignment submitted", body = AssignmentResponse),
        (status = 400, description = "Already submitted (INVALID_STATE) or bad payload (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Assignment or user not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Storage failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(assignment_id = payload.assignment_id, user_id = payload.user_id))]
pub async fn submit_assignment(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SubmitAssignmentRequest>,
) -> Result<Json<AssignmentResponse>, AppError> {
    validate_submit_assignment(&payload)?;

    let response = workflow::submit_assignment(
        &state.db,
        &state.config.workflow,
        payload.assignment_id,
        payload.user_id,
        payload.code,
    )
    .await?;

    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/complete",
    tag = "Assignments",
    operation_id = "completeAssignment",
    summary = "Mark an assignment as completed",
    description = "Completes a submitted assignment for the user and awards points. The user's submission must carry code, and each user can complete an assignment once.",
    request_body = CompleteAssignmentRequest,
    responses(
        (status = 200, description = "Assignment completed", body = CompleteAssignmentResponse),
        (status = 400, description = "Not submitted or already completed (INVALID_STATE)", body = ErrorBody),
        (status = 404, description = "Assignment or user not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Storage failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(assignment_id = payload.assignment_id, user_id = payload.user_id))]
pub async fn complete_assignment(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CompleteAssignmentRequest>,
) -> Result<Json<CompleteAssignmentResponse>, AppError> {
    let points = workflow::complete_assignment(
        &state.db,
        &state.config.workflow,
        payload.assignment_id,
        payload.user_id,
    )
    .await?;

    Ok(Json(CompleteAssignmentResponse {
        message: "Assignment marked as completed and points awarded".into(),
        points,
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Assignments",
    operation_id = "getAssignment",
    summary = "Get an assignment by ID",
    params(("id" = i32, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment details", body = AssignmentResponse),
        (status = 404, description = "Assignment not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_assignment(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<AssignmentResponse>, AppError> {
    let model = workflow::find_assignment(&state.db, id).await?;
    Ok(Json(workflow::assignment_response(&state.db, model).await?))
}
