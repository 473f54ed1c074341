pub mod submission;
pub mod export;

pub use submission::{VoteSubmission, VoteSubmissionRequest, validate_vote};
pub use export::{append_vote_to_csv, VOTE_SHEET_HEADER};
