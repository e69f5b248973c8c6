//! Comment validation. Comments are an append-only log per issue, ordered
//! by creation time, immutable once created.

use crate::error::CoreError;

/// Maximum comment length (characters).
pub const MAX_COMMENT_LENGTH: usize = 500;

pub fn validate_text(text: &str) -> Result<(), CoreError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Comment text is required".into()));
    }
    if trimmed.chars().count() > MAX_COMMENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Comment exceeds maximum length of {MAX_COMMENT_LENGTH} characters"
        )));
    }
    Ok(())
}
