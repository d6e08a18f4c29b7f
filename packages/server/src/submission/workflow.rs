use common::content::AccessToken;
use common::{ArtifactTarget, ArtifactUploader, Language};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};
use tracing::instrument;

use super::guard::SubmissionGuard;
use super::service::SubmissionService;
use crate::entity::{problem, study, study_member, submission, user};
use crate::error::AppError;
use crate::models::submission::SubmitSolutionRequest;

/// Everything a submission flow needs to know about who submits what where.
pub struct SubmissionContext {
    pub author: user::Model,
    pub problem: problem::Model,
    pub study: study::Model,
}

impl SubmissionContext {
    /// Load the problem, its study and the acting user, and check membership.
    pub async fn load<C: ConnectionTrait>(
        conn: &C,
        problem_id: i32,
        user_id: i32,
    ) -> Result<Self, AppError> {
        let problem = problem::Entity::find_by_id(problem_id)
            .one(conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Problem not found".into()))?;
        let study = study::Entity::find_by_id(problem.study_id)
            .one(conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Study not found".into()))?;
        let author = user::Entity::find_by_id(user_id)
            .one(conn)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        if !is_member(conn, study.id, user_id).await? {
            return Err(AppError::PermissionDenied);
        }

        Ok(Self {
            author,
            problem,
            study,
        })
    }

    pub fn target(&self, language: Language) -> ArtifactTarget {
        ArtifactTarget {
            repository_name: self.study.repository_name.clone(),
            problem_number: self.problem.number,
            problem_title: self.problem.title.clone(),
            display_name: self.author.display_name.clone(),
            language,
        }
    }

    pub fn credential(&self) -> AccessToken {
        AccessToken::new(self.author.access_token.clone())
    }
}

pub async fn is_member<C: ConnectionTrait>(
    conn: &C,
    study_id: i32,
    user_id: i32,
) -> Result<bool, AppError> {
    let count = study_member::Entity::find()
        .filter(study_member::Column::StudyId.eq(study_id))
        .filter(study_member::Column::UserId.eq(user_id))
        .count(conn)
        .await?;
    Ok(count > 0)
}

async fn upload(
    uploader: &ArtifactUploader,
    ctx: &SubmissionContext,
    req: &SubmitSolutionRequest,
) -> Result<common::UploadedArtifacts, AppError> {
    Ok(uploader
        .submit(
            &ctx.target(req.language),
            &ctx.credential(),
            req.code.as_bytes(),
            &req.description_header,
            &req.description_body,
        )
        .await?)
}

/// First submission of `ctx.author` for `ctx.problem`.
///
/// The duplicate check runs before any remote call. Remote commits and
/// object uploads then complete before the record is inserted.
#[instrument(skip_all, fields(user_id = ctx.author.id, problem_id = ctx.problem.id))]
pub async fn create_submission<C: ConnectionTrait>(
    conn: &C,
    uploader: &ArtifactUploader,
    ctx: &SubmissionContext,
    req: &SubmitSolutionRequest,
) -> Result<submission::Model, AppError> {
    SubmissionGuard::new(conn)
        .ensure_absent(ctx.author.id, ctx.problem.id)
        .await?;

    let artifacts = upload(uploader, ctx, req).await?;

    SubmissionService::new(conn)
        .create(ctx.author.id, ctx.problem.id, req.language, &artifacts)
        .await
}

/// Resubmission of an existing submission by its owner.
///
/// Targets the same remote paths, so the remote files are updated with their
/// freshly resolved fingerprints. The record keeps its id.
#[instrument(skip_all, fields(submission_id = submission_id, user_id = acting_user_id))]
pub async fn resubmit<C: ConnectionTrait>(
    conn: &C,
    uploader: &ArtifactUploader,
    submission_id: i32,
    acting_user_id: i32,
    req: &SubmitSolutionRequest,
) -> Result<(submission::Model, SubmissionContext), AppError> {
    let existing = SubmissionGuard::new(conn)
        .ensure_owner(submission_id, acting_user_id)
        .await?;
    let ctx = SubmissionContext::load(conn, existing.problem_id, acting_user_id).await?;

    let artifacts = upload(uploader, &ctx, req).await?;

    let model = SubmissionService::new(conn)
        .update(existing, acting_user_id, req.language, &artifacts)
        .await?;
    Ok((model, ctx))
}
