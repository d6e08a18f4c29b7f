use chrono::{DateTime, Utc};
use common::Language;
use serde::{Deserialize, Serialize};

use crate::config::SubmissionConfig;
use crate::error::AppError;

/// Request body for creating or resubmitting a solution.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SubmitSolutionRequest {
    /// Source code. Committed verbatim.
    #[schema(example = "print(1)")]
    pub code: String,
    pub language: Language,
    /// First line of the generated README.
    #[schema(example = "Day 1")]
    pub description_header: String,
    /// Markdown body of the generated README.
    #[schema(example = "solved via brute force")]
    pub description_body: String,
}

/// Request body for adding a review comment.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateCommentRequest {
    #[schema(example = "Nice use of prefix sums")]
    pub content: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CommentResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = 2)]
    pub user_id: i32,
    #[schema(example = "bob")]
    pub display_name: String,
    pub content: String,
    #[schema(example = "2025-10-01T14:30:00Z")]
    pub created_at: DateTime<Utc>,
}

/// Full submission details.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SubmissionResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = 1)]
    pub problem_id: i32,
    #[schema(example = 42)]
    pub problem_number: i32,
    #[schema(example = "A+B")]
    pub problem_title: String,
    #[schema(example = 1)]
    pub user_id: i32,
    #[schema(example = "alice")]
    pub display_name: String,
    pub language: Language,
    #[schema(example = "https://cdn.example.com/algo-study/42/alice/42.py")]
    pub code_url: String,
    #[schema(example = "https://cdn.example.com/algo-study/42/alice/README.md")]
    pub description_url: String,
    #[schema(example = "2025-10-01T14:30:00Z")]
    pub created_at: DateTime<Utc>,
    #[schema(example = "2025-10-02T09:00:00Z")]
    pub updated_at: DateTime<Utc>,
    /// Review comments, oldest first.
    pub comments: Vec<CommentResponse>,
}

/// One study member's status on a problem.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RosterEntry {
    #[schema(example = 1)]
    pub user_id: i32,
    #[schema(example = "alice")]
    pub display_name: String,
    pub solved: bool,
    /// Null when the member has not submitted.
    #[schema(example = 1)]
    pub submission_id: Option<i32>,
    pub language: Option<Language>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Solved/unsolved view of a problem across its study's members.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ProblemRosterResponse {
    #[schema(example = 1)]
    pub problem_id: i32,
    #[schema(example = 42)]
    pub number: i32,
    #[schema(example = "A+B")]
    pub title: String,
    /// Members ordered by display name.
    pub members: Vec<RosterEntry>,
}

pub fn validate_submit_request(
    req: &SubmitSolutionRequest,
    limits: &SubmissionConfig,
) -> Result<(), AppError> {
    if req.code.trim().is_empty() {
        return Err(AppError::Validation("Code cannot be empty".into()));
    }
    if req.code.len() > limits.max_code_size {
        return Err(AppError::Validation(format!(
            "Code exceeds maximum size of {} bytes",
            limits.max_code_size
        )));
    }

    let header = req.description_header.trim();
    if header.is_empty() || header.chars().count() > 256 {
        return Err(AppError::Validation(
            "Description header must be 1-256 characters".into(),
        ));
    }
    if header.contains(['\r', '\n']) {
        return Err(AppError::Validation(
            "Description header must be a single line".into(),
        ));
    }
    if header.len() + req.description_body.len() > limits.max_description_size {
        return Err(AppError::Validation(format!(
            "Description exceeds maximum size of {} bytes",
            limits.max_description_size
        )));
    }

    Ok(())
}

pub fn validate_comment(req: &CreateCommentRequest) -> Result<(), AppError> {
    let content = req.content.trim();
    if content.is_empty() || content.chars().count() > 2000 {
        return Err(AppError::Validation(
            "Comment must be 1-2000 characters".into(),
        ));
    }
    Ok(())
}
