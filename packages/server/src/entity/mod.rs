pub mod comment;
pub mod problem;
pub mod study;
pub mod study_member;
pub mod submission;
pub mod user;
