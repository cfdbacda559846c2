use ::common::ProgressStatus;
use ::common::config::WorkflowConfig;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};

use server::entity::{assignment, completion, submission};
use server::error::AppError;
use server::workflow;

use crate::common::{insert_course, insert_user, per_user, test_db, user_points};

#[tokio::test]
async fn created_assignment_starts_pending() {
    let db = test_db().await;
    let course_id = insert_course(&db, "Intro").await;

    let created = workflow::create_assignment(&db, "Loops", Some("  ".into()), course_id)
        .await
        .unwrap();

    assert_eq!(created.status, ProgressStatus::Pending);
    assert_eq!(created.course_id, course_id);
    assert!(created.description.is_none());
    assert!(created.submitted_by.is_empty());
}

#[tokio::test]
async fn blank_title_is_rejected_without_touching_the_course() {
    let db = test_db().await;
    let course_id = insert_course(&db, "Intro").await;

    let err = workflow::create_assignment(&db, "   ", None, course_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let count = assignment::Entity::find()
        .filter(assignment::Column::CourseId.eq(course_id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn default_config_rejects_a_second_submitter() {
    let db = test_db().await;
    let config = WorkflowConfig::default();
    let course_id = insert_course(&db, "Intro").await;
    let alice = insert_user(&db, "alice").await;
    let bob = insert_user(&db, "bob").await;
    let assignment = workflow::create_assignment(&db, "Loops", None, course_id)
        .await
        .unwrap();

    workflow::submit_assignment(&db, &config, assignment.id, alice, Some("a".into()))
        .await
        .unwrap();
    let err = workflow::submit_assignment(&db, &config, assignment.id, bob, Some("b".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(ref m) if m == workflow::ALREADY_SUBMITTED));

    let model = workflow::find_assignment(&db, assignment.id).await.unwrap();
    let current = workflow::assignment_response(&db, model).await.unwrap();
    assert_eq!(current.submitted_by, vec![alice]);
    assert_eq!(current.submitted_code.as_deref(), Some("a"));
}

#[tokio::test]
async fn submission_record_is_unapproved_until_completion() {
    let db = test_db().await;
    let config = WorkflowConfig::default();
    let course_id = insert_course(&db, "Intro").await;
    let user_id = insert_user(&db, "alice").await;
    let assignment = workflow::create_assignment(&db, "Loops", None, course_id)
        .await
        .unwrap();

    workflow::submit_assignment(&db, &config, assignment.id, user_id, Some("code".into()))
        .await
        .unwrap();

    let record = submission::Entity::find_by_id((assignment.id, user_id))
        .one(&db)
        .await
        .unwrap()
        .expect("submission record should exist");
    assert!(!record.approved);
    assert_eq!(record.status, ProgressStatus::Submitted);
    assert_eq!(record.code.as_deref(), Some("code"));

    workflow::complete_assignment(&db, &config, assignment.id, user_id)
        .await
        .unwrap();

    let record = submission::Entity::find_by_id((assignment.id, user_id))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert!(record.approved);
    assert_eq!(record.status, ProgressStatus::Completed);
}

#[tokio::test]
async fn completion_writes_exactly_one_ledger_entry() {
    let db = test_db().await;
    let config = WorkflowConfig::default();
    let course_id = insert_course(&db, "Intro").await;
    let user_id = insert_user(&db, "alice").await;
    let assignment = workflow::create_assignment(&db, "Loops", None, course_id)
        .await
        .unwrap();

    workflow::submit_assignment(&db, &config, assignment.id, user_id, Some("x".into()))
        .await
        .unwrap();
    let points = workflow::complete_assignment(&db, &config, assignment.id, user_id)
        .await
        .unwrap();
    assert_eq!(points, 20);

    let err = workflow::complete_assignment(&db, &config, assignment.id, user_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(ref m) if m == workflow::ALREADY_COMPLETED));

    let entries = completion::Entity::find()
        .filter(completion::Column::UserId.eq(user_id))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].points, 20);
    assert_eq!(user_points(&db, user_id).await, 20);
}

#[tokio::test]
async fn points_accumulate_across_assignments() {
    let db = test_db().await;
    let config = WorkflowConfig::default();
    let course_id = insert_course(&db, "Intro").await;
    let user_id = insert_user(&db, "alice").await;

    let mut last = 0;
    for title in ["One", "Two", "Three"] {
        let assignment = workflow::create_assignment(&db, title, None, course_id)
            .await
            .unwrap();
        workflow::submit_assignment(&db, &config, assignment.id, user_id, Some("x".into()))
            .await
            .unwrap();
        let points = workflow::complete_assignment(&db, &config, assignment.id, user_id)
            .await
            .unwrap();
        assert_eq!(points, last + 20);
        last = points;
    }

    let ledger_total: i64 = completion::Entity::find()
        .filter(completion::Column::UserId.eq(user_id))
        .all(&db)
        .await
        .unwrap()
        .iter()
        .map(|e| e.points)
        .sum();
    assert_eq!(ledger_total, 60);
    assert_eq!(user_points(&db, user_id).await, 60);
}

#[tokio::test]
async fn reward_amount_comes_from_config() {
    let db = test_db().await;
    let config = WorkflowConfig {
        reward_points: 5,
        ..Default::default()
    };
    let course_id = insert_course(&db, "Intro").await;
    let user_id = insert_user(&db, "alice").await;
    let assignment = workflow::create_assignment(&db, "Loops", None, course_id)
        .await
        .unwrap();

    workflow::submit_assignment(&db, &config, assignment.id, user_id, Some("x".into()))
        .await
        .unwrap();
    let points = workflow::complete_assignment(&db, &config, assignment.id, user_id)
        .await
        .unwrap();

    assert_eq!(points, 5);
}

#[tokio::test]
async fn concurrent_duplicate_submissions_keep_one_record() {
    let db = test_db().await;
    let config = WorkflowConfig::default();
    let course_id = insert_course(&db, "Intro").await;
    let user_id = insert_user(&db, "alice").await;
    let assignment = workflow::create_assignment(&db, "Loops", None, course_id)
        .await
        .unwrap();

    let (first, second) = tokio::join!(
        workflow::submit_assignment(&db, &config, assignment.id, user_id, Some("a".into())),
        workflow::submit_assignment(&db, &config, assignment.id, user_id, Some("b".into())),
    );

    let outcomes = [first.is_ok(), second.is_ok()];
    assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1);
    let err = first.err().or(second.err()).unwrap();
    assert!(matches!(err, AppError::InvalidState(_)));

    let count = submission::Entity::find()
        .filter(submission::Column::AssignmentId.eq(assignment.id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn failed_submission_leaves_no_partial_state() {
    let db = test_db().await;
    let config = WorkflowConfig::default();
    let course_id = insert_course(&db, "Intro").await;
    let assignment = workflow::create_assignment(&db, "Loops", None, course_id)
        .await
        .unwrap();

    let err = workflow::submit_assignment(&db, &config, assignment.id, 777, Some("x".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let current = workflow::find_assignment(&db, assignment.id).await.unwrap();
    assert_eq!(current.status, ProgressStatus::Pending);
    assert!(current.submitted_code.is_none());
}

#[tokio::test]
async fn aggregate_status_never_moves_back() {
    let db = test_db().await;
    let config = per_user();
    let course_id = insert_course(&db, "Intro").await;
    let alice = insert_user(&db, "alice").await;
    let bob = insert_user(&db, "bob").await;
    let assignment = workflow::create_assignment(&db, "Loops", None, course_id)
        .await
        .unwrap();

    workflow::submit_assignment(&db, &config, assignment.id, alice, Some("a".into()))
        .await
        .unwrap();
    workflow::complete_assignment(&db, &config, assignment.id, alice)
        .await
        .unwrap();

    let after_bob = workflow::submit_assignment(&db, &config, assignment.id, bob, Some("b".into()))
        .await
        .unwrap();
    assert_eq!(after_bob.status, ProgressStatus::Completed);
    assert_eq!(after_bob.submitted_by, vec![alice, bob]);
    assert_eq!(after_bob.completed_by, vec![alice]);
}

#[tokio::test]
async fn duplicate_submission_row_maps_to_invalid_state() {
    let db = test_db().await;
    let course_id = insert_course(&db, "Intro").await;
    let user_id = insert_user(&db, "alice").await;
    let assignment = workflow::create_assignment(&db, "Loops", None, course_id)
        .await
        .unwrap();

    let row = || {
        let now = Utc::now();
        submission::ActiveModel {
            assignment_id: Set(assignment.id),
            user_id: Set(user_id),
            approved: Set(false),
            code: Set(Some("x".into())),
            status: Set(ProgressStatus::Submitted),
            submitted_at: Set(now),
            updated_at: Set(now),
        }
    };
    row().insert(&db).await.unwrap();
    let err = row().insert(&db).await.unwrap_err();

    let mapped = AppError::from(err);
    assert!(matches!(mapped, AppError::InvalidState(_)), "{mapped:?}");
}

#[tokio::test]
async fn duplicate_ledger_row_maps_to_invalid_state() {
    let db = test_db().await;
    let course_id = insert_course(&db, "Intro").await;
    let user_id = insert_user(&db, "alice").await;
    let assignment = workflow::create_assignment(&db, "Loops", None, course_id)
        .await
        .unwrap();

    let entry = || completion::ActiveModel {
        assignment_id: Set(assignment.id),
        user_id: Set(user_id),
        points: Set(20),
        completed_at: Set(Utc::now()),
    };
    entry().insert(&db).await.unwrap();
    let err = entry().insert(&db).await.unwrap_err();

    let mapped = AppError::from(err);
    assert!(matches!(mapped, AppError::InvalidState(_)), "{mapped:?}");
}
