//! Submission workflow: duplicate/ownership guard, artifact upload and the
//! relational record, in that order.

mod guard;
mod service;
mod workflow;

pub use guard::SubmissionGuard;
pub use service::{RosterRow, SubmissionService};
pub use workflow::{SubmissionContext, create_submission, is_member, resubmit};
