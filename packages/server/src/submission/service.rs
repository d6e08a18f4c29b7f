use std::collections::HashMap;

use chrono::Utc;
use common::{Language, UploadedArtifacts};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use tracing::{info, warn};

use crate::entity::{comment, study_member, submission, user};
use crate::error::AppError;

/// One study member joined against their submission for a problem.
#[derive(Debug, Clone)]
pub struct RosterRow {
    pub user_id: i32,
    pub display_name: String,
    pub submission: Option<submission::Model>,
}

/// Submission Record Manager: the relational side of a submission.
///
/// Called only after the artifacts are in both remote stores, so a failure
/// upstream never leaves a record behind.
pub struct SubmissionService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> SubmissionService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Insert the record for a first submission.
    ///
    /// A concurrent create for the same `(user, problem)` that slipped past
    /// the guard hits the unique key and surfaces as `DuplicateSubmission`.
    pub async fn create(
        &self,
        user_id: i32,
        problem_id: i32,
        language: Language,
        artifacts: &UploadedArtifacts,
    ) -> Result<submission::Model, AppError> {
        let now = Utc::now();
        let model = submission::ActiveModel {
            user_id: Set(user_id),
            problem_id: Set(problem_id),
            language: Set(language),
            code_url: Set(artifacts.code.url.clone()),
            description_url: Set(artifacts.description.url.clone()),
            code_fingerprint: Set(artifacts.code.fingerprint.as_str().to_string()),
            description_fingerprint: Set(artifacts.description.fingerprint.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = match model.insert(self.conn).await {
            Ok(model) => model,
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                warn!(user_id, problem_id, "Concurrent duplicate submission rejected by unique key");
                return Err(AppError::DuplicateSubmission);
            }
            Err(e) => return Err(e.into()),
        };
        info!(submission_id = model.id, user_id, problem_id, "Created submission");
        Ok(model)
    }

    /// Replace the locators of an existing record. The id and `created_at` stay.
    pub async fn update(
        &self,
        existing: submission::Model,
        acting_user_id: i32,
        language: Language,
        artifacts: &UploadedArtifacts,
    ) -> Result<submission::Model, AppError> {
        if existing.user_id != acting_user_id {
            return Err(AppError::NotOwner);
        }

        let mut active: submission::ActiveModel = existing.into();
        active.language = Set(language);
        active.code_url = Set(artifacts.code.url.clone());
        active.description_url = Set(artifacts.description.url.clone());
        active.code_fingerprint = Set(artifacts.code.fingerprint.as_str().to_string());
        active.description_fingerprint =
            Set(artifacts.description.fingerprint.as_str().to_string());
        active.updated_at = Set(Utc::now());

        let model = active.update(self.conn).await?;
        info!(submission_id = model.id, "Updated submission");
        Ok(model)
    }

    /// Delete a record and its comments. Remote artifacts are left in place.
    pub async fn delete(
        &self,
        existing: submission::Model,
        acting_user_id: i32,
    ) -> Result<(), AppError> {
        if existing.user_id != acting_user_id {
            return Err(AppError::NotOwner);
        }

        let id = existing.id;
        comment::Entity::delete_many()
            .filter(comment::Column::SubmissionId.eq(id))
            .exec(self.conn)
            .await?;
        existing.delete(self.conn).await?;
        info!(submission_id = id, "Deleted submission");
        Ok(())
    }

    /// Comments on a submission with their authors, oldest first.
    pub async fn comments(
        &self,
        submission_id: i32,
    ) -> Result<Vec<(comment::Model, Option<user::Model>)>, AppError> {
        Ok(comment::Entity::find()
            .filter(comment::Column::SubmissionId.eq(submission_id))
            .find_also_related(user::Entity)
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(self.conn)
            .await?)
    }

    pub async fn add_comment(
        &self,
        submission_id: i32,
        user_id: i32,
        content: &str,
    ) -> Result<comment::Model, AppError> {
        let model = comment::ActiveModel {
            submission_id: Set(submission_id),
            user_id: Set(user_id),
            content: Set(content.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        Ok(model.insert(self.conn).await?)
    }

    /// Every member of `study_id` with their submission for `problem_id`, if any.
    pub async fn roster(&self, study_id: i32, problem_id: i32) -> Result<Vec<RosterRow>, AppError> {
        let members = study_member::Entity::find()
            .filter(study_member::Column::StudyId.eq(study_id))
            .find_also_related(user::Entity)
            .all(self.conn)
            .await?;

        let mut by_user: HashMap<i32, submission::Model> = submission::Entity::find()
            .filter(submission::Column::ProblemId.eq(problem_id))
            .all(self.conn)
            .await?
            .into_iter()
            .map(|s| (s.user_id, s))
            .collect();

        let mut rows: Vec<RosterRow> = members
            .into_iter()
            .map(|(member, usr)| RosterRow {
                user_id: member.user_id,
                display_name: usr.map(|u| u.display_name).unwrap_or_default(),
                submission: by_user.remove(&member.user_id),
            })
            .collect();
        rows.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Ok(rows)
    }
}
