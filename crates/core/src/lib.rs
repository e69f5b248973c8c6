//! CommunityFix domain logic.
//!
//! Pure, storage-agnostic rules for the civic issue tracker: role and
//! department modeling, category-to-department routing, the issue status
//! state machine, vote bookkeeping, and the access control policy. The
//! `db` and `api` crates depend on this crate; this crate depends on
//! nothing async or IO-bound so every rule is unit-testable.

pub mod comment;
pub mod department;
pub mod error;
pub mod issue;
pub mod policy;
pub mod roles;
pub mod search;
pub mod types;
