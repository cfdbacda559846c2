//! Assignment workflow: create, submit, complete.
//!
//! Every transition runs in a single transaction, and the rows it reads before
//! writing are locked with `FOR UPDATE`. Progress is tracked per
//! (assignment, user) pair in `submission`; points come from `completion`
//! ledger entries, one per pair.

use chrono::Utc;
use common::ProgressStatus;
use common::config::WorkflowConfig;
use sea_orm::sea_query::LockType;
use sea_orm::*;
use tracing::{debug, info, instrument};

use crate::entity::{assignment, completion, course, submission, user};
use crate::error::AppError;
use crate::models::assignment::AssignmentResponse;
use crate::models::shared::{non_blank, validate_title};

pub const ALREADY_SUBMITTED: &str = "Assignment is already submitted";
pub const NOT_SUBMITTED: &str = "Assignment must be submitted before it can be completed";
pub const ALREADY_COMPLETED: &str = "Assignment is already completed by this user";

/// Find a course by ID or return 404.
pub async fn find_course<C: ConnectionTrait>(db: &C, id: i32) -> Result<course::Model, AppError> {
    course::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".into()))
}

/// Find an assignment by ID or return 404.
pub async fn find_assignment<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<assignment::Model, AppError> {
    assignment::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Assignment not found".into()))
}

/// Find a user by ID or return 404.
pub async fn find_user<C: ConnectionTrait>(db: &C, id: i32) -> Result<user::Model, AppError> {
    user::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

async fn find_course_for_update(
    txn: &DatabaseTransaction,
    id: i32,
) -> Result<course::Model, AppError> {
    course::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".into()))
}

async fn find_assignment_for_update(
    txn: &DatabaseTransaction,
    id: i32,
) -> Result<assignment::Model, AppError> {
    assignment::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Assignment not found".into()))
}

async fn find_user_for_update(txn: &DatabaseTransaction, id: i32) -> Result<user::Model, AppError> {
    user::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

/// Build the full response for an assignment, including who submitted and completed it.
pub async fn assignment_response<C: ConnectionTrait>(
    db: &C,
    model: assignment::Model,
) -> Result<AssignmentResponse, AppError> {
    let submitted_by = submission::Entity::find()
        .filter(submission::Column::AssignmentId.eq(model.id))
        .order_by_asc(submission::Column::SubmittedAt)
        .order_by_asc(submission::Column::UserId)
        .all(db)
        .await?
        .into_iter()
        .map(|s| s.user_id)
        .collect();

    let completed_by = completion::Entity::find()
        .filter(completion::Column::AssignmentId.eq(model.id))
        .order_by_asc(completion::Column::CompletedAt)
        .order_by_asc(completion::Column::UserId)
        .all(db)
        .await?
        .into_iter()
        .map(|c| c.user_id)
        .collect();

    Ok(AssignmentResponse::new(model, submitted_by, completed_by))
}

/// Create an assignment under an existing course.
///
/// The title must be 1-256 characters after trimming. The course row is
/// locked for the duration of the insert, so the assignment can never outlive
/// a course that vanished underneath it.
#[instrument(skip(db, title, description))]
pub async fn create_assignment(
    db: &DatabaseConnection,
    title: &str,
    description: Option<String>,
    course_id: i32,
) -> Result<AssignmentResponse, AppError> {
    validate_title(title)?;

    let txn = db.begin().await?;
    let _course = find_course_for_update(&txn, course_id).await?;

    let now = Utc::now();
    let new_assignment = assignment::ActiveModel {
        title: Set(title.trim().to_string()),
        description: Set(non_blank(description)),
        course_id: Set(course_id),
        submitted_code: Set(None),
        status: Set(ProgressStatus::Pending),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_assignment.insert(&txn).await?;
    txn.commit().await?;

    info!(assignment_id = model.id, course_id, "Assignment created");
    Ok(AssignmentResponse::new(model, vec![], vec![]))
}

/// Record that `user_id` handed in `assignment_id`, optionally with code.
///
/// Rejected when the user already has a submission for this assignment, or,
/// with `exclusive_submission`, when anybody has.
#[instrument(skip(db, config, code))]
pub async fn submit_assignment(
    db: &DatabaseConnection,
    config: &WorkflowConfig,
    assignment_id: i32,
    user_id: i32,
    code: Option<String>,
) -> Result<AssignmentResponse, AppError> {
    let txn = db.begin().await?;
    let existing = find_assignment_for_update(&txn, assignment_id).await?;
    let _user = find_user(&txn, user_id).await?;

    if config.exclusive_submission && !existing.status.can_advance_to(ProgressStatus::Submitted) {
        debug!(status = %existing.status, "Exclusive submission already taken");
        return Err(AppError::InvalidState(ALREADY_SUBMITTED.into()));
    }

    if submission::Entity::find_by_id((assignment_id, user_id))
        .one(&txn)
        .await?
        .is_some()
    {
        debug!("Duplicate submission rejected");
        return Err(AppError::InvalidState(ALREADY_SUBMITTED.into()));
    }

    let code = non_blank(code);
    let now = Utc::now();
    let record = submission::ActiveModel {
        assignment_id: Set(assignment_id),
        user_id: Set(user_id),
        approved: Set(false),
        code: Set(code.clone()),
        status: Set(ProgressStatus::Submitted),
        submitted_at: Set(now),
        updated_at: Set(now),
    };
    record.insert(&txn).await?;

    let status = existing.status.later_of(ProgressStatus::Submitted);
    let mut active: assignment::ActiveModel = existing.into();
    if code.is_some() {
        active.submitted_code = Set(code);
    }
    active.status = Set(status);
    active.updated_at = Set(now);

    let model = active.update(&txn).await?;
    let response = assignment_response(&txn, model).await?;
    txn.commit().await?;

    info!(assignment_id, user_id, "Assignment submitted");
    Ok(response)
}

/// Mark `assignment_id` completed for `user_id` and award points.
///
/// Requires a prior submission carrying code. Returns the user's new point total.
#[instrument(skip(db, config))]
pub async fn complete_assignment(
    db: &DatabaseConnection,
    config: &WorkflowConfig,
    assignment_id: i32,
    user_id: i32,
) -> Result<i64, AppError> {
    let txn = db.begin().await?;
    let learner = find_user_for_update(&txn, user_id).await?;
    let existing = find_assignment_for_update(&txn, assignment_id).await?;

    let record = submission::Entity::find_by_id((assignment_id, user_id))
        .one(&txn)
        .await?
        .filter(|s| s.code.is_some())
        .ok_or_else(|| AppError::InvalidState(NOT_SUBMITTED.into()))?;

    if !record.status.can_advance_to(ProgressStatus::Completed) {
        debug!(status = %record.status, "Submission already past completion");
        return Err(AppError::InvalidState(ALREADY_COMPLETED.into()));
    }

    if completion::Entity::find_by_id((assignment_id, user_id))
        .one(&txn)
        .await?
        .is_some()
    {
        debug!("Duplicate completion rejected");
        return Err(AppError::InvalidState(ALREADY_COMPLETED.into()));
    }

    let now = Utc::now();
    let reward = config.reward_points;
    let entry = completion::ActiveModel {
        assignment_id: Set(assignment_id),
        user_id: Set(user_id),
        points: Set(reward),
        completed_at: Set(now),
    };
    entry.insert(&txn).await?;

    let mut record: submission::ActiveModel = record.into();
    record.status = Set(ProgressStatus::Completed);
    record.approved = Set(true);
    record.updated_at = Set(now);
    record.update(&txn).await?;

    let status = existing.status.later_of(ProgressStatus::Completed);
    let mut active: assignment::ActiveModel = existing.into();
    active.status = Set(status);
    active.updated_at = Set(now);
    active.update(&txn).await?;

    let points = learner.points + reward;
    let mut learner: user::ActiveModel = learner.into();
    learner.points = Set(points);
    learner.update(&txn).await?;

    txn.commit().await?;

    info!(assignment_id, user_id, points, reward, "Assignment completed");
    Ok(points)
}
