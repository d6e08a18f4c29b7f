use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::{ConnectionTrait, EntityTrait, TransactionTrait};
use tracing::instrument;

use crate::entity::{comment, problem, submission, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::submission::*;
use crate::state::AppState;
use crate::submission::{self as workflow, SubmissionContext, SubmissionGuard, SubmissionService};

/// Find a problem by ID or return 404.
async fn find_problem<C: ConnectionTrait>(db: &C, id: i32) -> Result<problem::Model, AppError> {
    problem::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Problem not found".into()))
}

/// Find a submission by ID or return 404.
async fn find_submission<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<submission::Model, AppError> {
    submission::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Submission not found".into()))
}

/// Require the acting user to be a member of the study owning `problem`.
async fn require_member<C: ConnectionTrait>(
    db: &C,
    auth_user: &AuthUser,
    problem: &problem::Model,
) -> Result<(), AppError> {
    if workflow::is_member(db, problem.study_id, auth_user.user_id).await? {
        Ok(())
    } else {
        Err(AppError::PermissionDenied)
    }
}

fn comment_response(model: comment::Model, author: Option<user::Model>) -> CommentResponse {
    CommentResponse {
        id: model.id,
        user_id: model.user_id,
        display_name: author.map(|u| u.display_name).unwrap_or_default(),
        content: model.content,
        created_at: model.created_at,
    }
}

async fn build_submission_response<C: ConnectionTrait>(
    db: &C,
    model: submission::Model,
    problem: &problem::Model,
    author: &user::Model,
) -> Result<SubmissionResponse, AppError> {
    let comments = SubmissionService::new(db)
        .comments(model.id)
        .await?
        .into_iter()
        .map(|(c, u)| comment_response(c, u))
        .collect();

    Ok(SubmissionResponse {
        id: model.id,
        problem_id: problem.id,
        problem_number: problem.number,
        problem_title: problem.title.clone(),
        user_id: author.id,
        display_name: author.display_name.clone(),
        language: model.language,
        code_url: model.code_url,
        description_url: model.description_url,
        created_at: model.created_at,
        updated_at: model.updated_at,
        comments,
    })
}

#[utoipa::path(
    post,
    path = "/{id}/submissions",
    tag = "Submissions",
    operation_id = "createSubmission",
    summary = "Submit a solution to a problem",
    description = "Commits the code and a generated README to the submitter's copy of the study repository, publishes both to the object store, then records the submission. At most one submission per user and problem; use `PUT /submissions/{id}` to resubmit.",
    params(
        ("id" = i32, Path, description = "Problem ID")
    ),
    request_body = SubmitSolutionRequest,
    responses(
        (status = 201, description = "Submission created", body = SubmissionResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a study member (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Problem not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already submitted (DUPLICATE_SUBMISSION) or remote file changed (CONCURRENT_MODIFICATION)", body = ErrorBody),
        (status = 502, description = "Remote repository rejected the write (REMOTE_REJECTED)", body = ErrorBody),
        (status = 503, description = "Remote repository unreachable (REMOTE_UNAVAILABLE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(problem_id = %problem_id, user_id = auth_user.user_id))]
pub async fn create_submission(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(problem_id): Path<i32>,
    AppJson(payload): AppJson<SubmitSolutionRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_submit_request(&payload, &state.config.submission)?;

    let ctx = SubmissionContext::load(&state.db, problem_id, auth_user.user_id).await?;
    let model =
        workflow::create_submission(&state.db, &state.uploader, &ctx, &payload).await?;

    let response = build_submission_response(&state.db, model, &ctx.problem, &ctx.author).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/{id}/submissions",
    tag = "Submissions",
    operation_id = "listProblemSubmissions",
    summary = "Solved/unsolved roster of a problem",
    description = "Lists every member of the problem's study with whether they have submitted a solution. Only study members may view it.",
    params(
        ("id" = i32, Path, description = "Problem ID")
    ),
    responses(
        (status = 200, description = "Roster", body = ProblemRosterResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a study member (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Problem not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(problem_id = %problem_id))]
pub async fn list_problem_submissions(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(problem_id): Path<i32>,
) -> Result<Json<ProblemRosterResponse>, AppError> {
    let problem = find_problem(&state.db, problem_id).await?;
    require_member(&state.db, &auth_user, &problem).await?;

    let members = SubmissionService::new(&state.db)
        .roster(problem.study_id, problem.id)
        .await?
        .into_iter()
        .map(|row| RosterEntry {
            user_id: row.user_id,
            display_name: row.display_name,
            solved: row.submission.is_some(),
            submission_id: row.submission.as_ref().map(|s| s.id),
            language: row.submission.as_ref().map(|s| s.language),
            updated_at: row.submission.as_ref().map(|s| s.updated_at),
        })
        .collect();

    Ok(Json(ProblemRosterResponse {
        problem_id: problem.id,
        number: problem.number,
        title: problem.title,
        members,
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Submissions",
    operation_id = "getSubmission",
    summary = "Get submission details",
    description = "Returns the artifact URLs, language, timestamps and review comments of a submission. Visible to members of the problem's study.",
    params(
        ("id" = i32, Path, description = "Submission ID")
    ),
    responses(
        (status = 200, description = "Submission details", body = SubmissionResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a study member (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Submission not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(submission_id = %id))]
pub async fn get_submission(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SubmissionResponse>, AppError> {
    let model = find_submission(&state.db, id).await?;
    let problem = find_problem(&state.db, model.problem_id).await?;
    require_member(&state.db, &auth_user, &problem).await?;

    let author = user::Entity::find_by_id(model.user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Internal(format!("author of submission {id} missing")))?;

    let response = build_submission_response(&state.db, model, &problem, &author).await?;
    Ok(Json(response))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Submissions",
    operation_id = "resubmitSolution",
    summary = "Resubmit a solution",
    description = "Overwrites the code and README of an existing submission at the same remote paths and object keys. Only the author may resubmit. The submission keeps its id.",
    params(
        ("id" = i32, Path, description = "Submission ID")
    ),
    request_body = SubmitSolutionRequest,
    responses(
        (status = 200, description = "Submission updated", body = SubmissionResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the author (NOT_OWNER) or not a study member (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Submission not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Remote file changed concurrently (CONCURRENT_MODIFICATION)", body = ErrorBody),
        (status = 502, description = "Remote repository rejected the write (REMOTE_REJECTED)", body = ErrorBody),
        (status = 503, description = "Remote repository unreachable (REMOTE_UNAVAILABLE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(submission_id = %id, user_id = auth_user.user_id))]
pub async fn resubmit_solution(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<SubmitSolutionRequest>,
) -> Result<Json<SubmissionResponse>, AppError> {
    validate_submit_request(&payload, &state.config.submission)?;

    let (model, ctx) =
        workflow::resubmit(&state.db, &state.uploader, id, auth_user.user_id, &payload).await?;

    let response = build_submission_response(&state.db, model, &ctx.problem, &ctx.author).await?;
    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Submissions",
    operation_id = "deleteSubmission",
    summary = "Delete a submission",
    description = "Deletes the submission record and its comments. Files already committed to the remote repository or published to the object store are kept. Only the author may delete.",
    params(
        ("id" = i32, Path, description = "Submission ID")
    ),
    responses(
        (status = 204, description = "Submission deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the author (NOT_OWNER)", body = ErrorBody),
        (status = 404, description = "Submission not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(submission_id = %id, user_id = auth_user.user_id))]
pub async fn delete_submission(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let txn = state.db.begin().await?;

    let existing = SubmissionGuard::new(&txn)
        .ensure_owner(id, auth_user.user_id)
        .await?;
    SubmissionService::new(&txn)
        .delete(existing, auth_user.user_id)
        .await?;

    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/{id}/comments",
    tag = "Submissions",
    operation_id = "addSubmissionComment",
    summary = "Comment on a submission",
    description = "Adds a review comment. Any member of the problem's study may comment.",
    params(
        ("id" = i32, Path, description = "Submission ID")
    ),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment added", body = CommentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a study member (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Submission not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(submission_id = %id, user_id = auth_user.user_id))]
pub async fn add_comment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_comment(&payload)?;

    let model = find_submission(&state.db, id).await?;
    let problem = find_problem(&state.db, model.problem_id).await?;
    require_member(&state.db, &auth_user, &problem).await?;

    let created = SubmissionService::new(&state.db)
        .add_comment(model.id, auth_user.user_id, payload.content.trim())
        .await?;

    let author = user::Entity::find_by_id(auth_user.user_id)
        .one(&state.db)
        .await?;
    Ok((StatusCode::CREATED, Json(comment_response(created, author))))
}
