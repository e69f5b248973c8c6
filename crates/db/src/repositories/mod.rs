//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod comment_repo;
pub mod department_repo;
pub mod issue_note_repo;
pub mod issue_repo;
pub mod user_repo;

pub use comment_repo::CommentRepo;
pub use department_repo::DepartmentRepo;
pub use issue_note_repo::IssueNoteRepo;
pub use issue_repo::IssueRepo;
pub use user_repo::UserRepo;
