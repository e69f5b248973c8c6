//! HTTP request handlers, grouped by resource.

pub mod auth;
pub mod comments;
pub mod departments;
pub mod issues;
