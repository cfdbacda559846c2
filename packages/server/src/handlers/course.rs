use axum::Json;
use axum::extract::State;
use sea_orm::*;
use tracing::instrument;

use crate::entity::assignment;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppPath;
use crate::models::assignment::CourseAssignmentsResponse;
use crate::state::AppState;
use crate::workflow::find_course;

#[utoipa::path(
    get,
    path = "/{id}/assignments",
    tag = "Courses",
    operation_id = "listCourseAssignments",
    summary = "List the assignments of a course",
    params(("id" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Assignment ids in creation order", body = CourseAssignmentsResponse),
        (status = 404, description = "Course not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_course_assignments(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<CourseAssignmentsResponse>, AppError> {
    let course = find_course(&state.db, id).await?;

    let assignments = assignment::Entity::find()
        .filter(assignment::Column::CourseId.eq(id))
        .order_by_asc(assignment::Column::Id)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|a| a.id)
        .collect();

    Ok(Json(CourseAssignmentsResponse {
        course_id: course.id,
        title: course.title,
        assignments,
    }))
}
