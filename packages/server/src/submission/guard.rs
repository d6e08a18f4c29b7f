use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};
use tracing::debug;

use crate::entity::submission;
use crate::error::AppError;

/// Cheap checks run before any remote I/O.
///
/// The duplicate check leaves a window between the read and the insert; the
/// `(user_id, problem_id)` unique key on `submission` closes it.
pub struct SubmissionGuard<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> SubmissionGuard<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn exists(&self, user_id: i32, problem_id: i32) -> Result<bool, AppError> {
        let count = submission::Entity::find()
            .filter(submission::Column::UserId.eq(user_id))
            .filter(submission::Column::ProblemId.eq(problem_id))
            .count(self.conn)
            .await?;
        Ok(count > 0)
    }

    /// Fail with `DuplicateSubmission` if the user already submitted for the problem.
    pub async fn ensure_absent(&self, user_id: i32, problem_id: i32) -> Result<(), AppError> {
        if self.exists(user_id, problem_id).await? {
            debug!(user_id, problem_id, "Rejecting duplicate submission");
            return Err(AppError::DuplicateSubmission);
        }
        Ok(())
    }

    /// Load a submission and fail with `NotOwner` unless `user_id` created it.
    pub async fn ensure_owner(
        &self,
        submission_id: i32,
        user_id: i32,
    ) -> Result<submission::Model, AppError> {
        let model = submission::Entity::find_by_id(submission_id)
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Submission not found".into()))?;
        if model.user_id != user_id {
            return Err(AppError::NotOwner);
        }
        Ok(model)
    }
}
