use common::ProgressStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One learner's hand-in for one assignment.
///
/// Keyed by (assignment, user), so a learner holds at most one record per assignment.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "submission")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub assignment_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i32,
    #[sea_orm(belongs_to, from = "assignment_id", to = "id")]
    pub assignment: HasOne<super::assignment::Entity>,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    pub approved: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub code: Option<String>,
    /// Either `submitted` or `completed`.
    pub status: ProgressStatus,

    pub submitted_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
