//! Issue status state machine, field validation, and vote bookkeeping.
//!
//! Vote-score recomputation and department auto-assignment were document
//! middleware in the original; here they are explicit functions invoked
//! before persistence so they can be tested without a database.

use std::str::FromStr;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// Initial status of every newly created issue.
pub const STATUS_REPORTED: &str = "reported";
/// Issue is being triaged by its department.
pub const STATUS_UNDER_REVIEW: &str = "under_review";
/// Issue has been assigned to an officer or crew.
pub const STATUS_ASSIGNED: &str = "assigned";
/// Work is underway.
pub const STATUS_IN_PROGRESS: &str = "in_progress";
/// The department considers the issue fixed.
pub const STATUS_RESOLVED: &str = "resolved";
/// Fix evidence submitted, awaiting reporter confirmation.
pub const STATUS_VERIFICATION: &str = "verification";
/// Confirmed fixed (or administratively closed).
pub const STATUS_CLOSED: &str = "closed";

/// All valid issue statuses.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_REPORTED,
    STATUS_UNDER_REVIEW,
    STATUS_ASSIGNED,
    STATUS_IN_PROGRESS,
    STATUS_RESOLVED,
    STATUS_VERIFICATION,
    STATUS_CLOSED,
];

// ---------------------------------------------------------------------------
// Priorities
// ---------------------------------------------------------------------------

/// All valid priorities, lowest first.
pub const VALID_PRIORITIES: &[&str] = &["low", "medium", "high", "critical"];

/// Priority assigned when the reporter does not pick one.
pub const DEFAULT_PRIORITY: &str = "medium";

// ---------------------------------------------------------------------------
// Field limits
// ---------------------------------------------------------------------------

/// Maximum issue title length (characters).
pub const MAX_TITLE_LENGTH: usize = 100;
/// Maximum issue description length (characters).
pub const MAX_DESCRIPTION_LENGTH: usize = 1_000;
/// Maximum department note length (characters).
pub const MAX_NOTE_LENGTH: usize = 1_000;
/// Maximum number of image references per issue or verification.
pub const MAX_IMAGES: usize = 5;

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

/// Returns the set of statuses that `from_status` may transition to.
///
/// Unrecognized statuses (legacy data) have no outgoing transitions: they
/// are treated as terminal rather than rejected outright, so a row with a
/// retired status value never makes the state machine panic.
pub fn valid_transitions(from_status: &str) -> &'static [&'static str] {
    match from_status {
        STATUS_REPORTED => &[STATUS_UNDER_REVIEW, STATUS_ASSIGNED, STATUS_IN_PROGRESS],
        STATUS_UNDER_REVIEW => &[STATUS_ASSIGNED, STATUS_IN_PROGRESS, STATUS_CLOSED],
        STATUS_ASSIGNED => &[STATUS_IN_PROGRESS, STATUS_UNDER_REVIEW],
        STATUS_IN_PROGRESS => &[STATUS_RESOLVED, STATUS_VERIFICATION, STATUS_ASSIGNED],
        STATUS_RESOLVED => &[STATUS_VERIFICATION, STATUS_CLOSED, STATUS_IN_PROGRESS],
        STATUS_VERIFICATION => &[STATUS_CLOSED, STATUS_IN_PROGRESS],
        STATUS_CLOSED => &[STATUS_IN_PROGRESS],
        _ => &[],
    }
}

/// Validate that a status transition from `current` to `next` is allowed.
pub fn validate_transition(current: &str, next: &str) -> Result<(), CoreError> {
    if valid_transitions(current).contains(&next) {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition {
            from: current.to_string(),
            to: next.to_string(),
        })
    }
}

/// Validate that a status string is one of the known statuses.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid issue status '{status}'. Must be one of: {VALID_STATUSES:?}"
        )))
    }
}

/// Whether the reporter may still edit content fields. Editing stops once
/// the department has resolved the issue.
pub fn is_editable_by_reporter(status: &str) -> bool {
    matches!(
        status,
        STATUS_REPORTED | STATUS_UNDER_REVIEW | STATUS_ASSIGNED | STATUS_IN_PROGRESS
    )
}

/// Statuses from which a department may submit verification evidence.
pub fn can_enter_verification(status: &str) -> bool {
    matches!(status, STATUS_IN_PROGRESS | STATUS_RESOLVED)
}

// ---------------------------------------------------------------------------
// Field validation
// ---------------------------------------------------------------------------

pub fn validate_priority(priority: &str) -> Result<(), CoreError> {
    if VALID_PRIORITIES.contains(&priority) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid priority '{priority}'. Must be one of: {VALID_PRIORITIES:?}"
        )))
    }
}

pub fn validate_title(title: &str) -> Result<(), CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Title is required".into()));
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title exceeds maximum length of {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), CoreError> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Description is required".into()));
    }
    if trimmed.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Description exceeds maximum length of {MAX_DESCRIPTION_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a department or status-change note. Whitespace-only notes are
/// rejected: a status change must always carry a meaningful note.
pub fn validate_note(note: &str) -> Result<(), CoreError> {
    let trimmed = note.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "A non-empty note is required".into(),
        ));
    }
    if trimmed.chars().count() > MAX_NOTE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Note exceeds maximum length of {MAX_NOTE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a set of opaque image references attached to an issue.
pub fn validate_images(images: &[String]) -> Result<(), CoreError> {
    if images.len() > MAX_IMAGES {
        return Err(CoreError::Validation(format!(
            "At most {MAX_IMAGES} images are allowed (got {})",
            images.len()
        )));
    }
    if images.iter().any(|i| i.trim().is_empty()) {
        return Err(CoreError::Validation(
            "Image references must not be empty".into(),
        ));
    }
    Ok(())
}

/// Validate verification evidence: at least one image is mandatory.
pub fn validate_verification_images(images: &[String]) -> Result<(), CoreError> {
    if images.is_empty() {
        return Err(CoreError::Validation(
            "At least one verification image is required".into(),
        ));
    }
    validate_images(images)
}

// ---------------------------------------------------------------------------
// Votes
// ---------------------------------------------------------------------------

/// Direction of a community vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteType {
    Upvote,
    Downvote,
}

impl VoteType {
    pub fn as_str(self) -> &'static str {
        match self {
            VoteType::Upvote => "upvote",
            VoteType::Downvote => "downvote",
        }
    }
}

impl FromStr for VoteType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upvote" => Ok(VoteType::Upvote),
            "downvote" => Ok(VoteType::Downvote),
            other => Err(CoreError::Validation(format!(
                "Invalid vote type '{other}'. Must be 'upvote' or 'downvote'"
            ))),
        }
    }
}

/// The storage mutation a vote request resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteAction {
    /// No existing vote: record the requested vote.
    Add(VoteType),
    /// Same vote cast again: retract it.
    Retract,
    /// Opposite vote exists: replace it with the requested vote.
    Switch(VoteType),
}

/// Decide how a vote request changes the actor's existing vote.
///
/// Toggle semantics: casting the same vote twice retracts it; casting the
/// opposite vote replaces the existing one. An actor therefore holds at
/// most one vote per issue at any time.
pub fn plan_vote(existing: Option<VoteType>, requested: VoteType) -> VoteAction {
    match existing {
        None => VoteAction::Add(requested),
        Some(current) if current == requested => VoteAction::Retract,
        Some(_) => VoteAction::Switch(requested),
    }
}

/// Recompute the vote score from the vote sets. The score is never stored
/// independently of the sets.
pub fn vote_score(upvotes: &[DbId], downvotes: &[DbId]) -> i64 {
    upvotes.len() as i64 - downvotes.len() as i64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
