//! Pagination and free-text search helpers.
//!
//! This module lives in `core` (zero internal deps) so the repository
//! layer and any future tooling share the same clamping and escaping
//! rules.

/// Default number of issues per page.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Maximum number of issues per page.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Build a case-insensitive substring pattern for SQL `ILIKE`.
///
/// Escapes `\`, `%`, and `_` in the user's input so they match literally,
/// then wraps the term in wildcards. Returns `None` for empty or
/// whitespace-only input.
pub fn like_pattern(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return None;
    }
    let escaped = trimmed
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Some(format!("%{escaped}%"))
}
