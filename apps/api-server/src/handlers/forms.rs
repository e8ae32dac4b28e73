//! Request validation for the public submission endpoints.
//!
//! Validation failures are collected per field and surfaced together as one
//! 422 response, so a client sees every problem in a single round trip.

use quill_shared::FieldError;
use quill_shared::dto::{SharePostRequest, SubmitCommentRequest};

use crate::middleware::error::AppError;

/// Maximum length of a commenter's name.
pub const COMMENT_NAME_MAX: usize = 80;
/// Maximum length of a sharer's name.
pub const SHARE_NAME_MAX: usize = 25;

pub fn validate_comment(req: &SubmitCommentRequest) -> Result<(), AppError> {
    let mut errors = Vec::new();

    check_name(req.name.trim(), COMMENT_NAME_MAX, &mut errors);
    check_email("email", req.email.trim(), &mut errors);
    if req.body.trim().is_empty() {
        errors.push(FieldError::new("body", "This field is required"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

pub fn validate_share(req: &SharePostRequest) -> Result<(), AppError> {
    let mut errors = Vec::new();

    check_name(req.name.trim(), SHARE_NAME_MAX, &mut errors);
    check_email("email", req.email.trim(), &mut errors);
    check_email("to", req.to.trim(), &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

fn check_name(value: &str, max: usize, errors: &mut Vec<FieldError>) {
    if value.is_empty() {
        errors.push(FieldError::new("name", "This field is required"));
    } else if value.chars().count() > max {
        errors.push(FieldError::new(
            "name",
            format!("Ensure this value has at most {} characters", max),
        ));
    }
}

fn check_email(field: &str, value: &str, errors: &mut Vec<FieldError>) {
    if value.is_empty() {
        errors.push(FieldError::new(field, "This field is required"));
    } else if !is_valid_email(value) {
        errors.push(FieldError::new(field, "Enter a valid email address"));
    }
}

/// Structural check: exactly one `@`, a non-empty local part, and a domain
/// containing an interior dot. Full RFC 5322 parsing is the relay's job.
fn is_valid_email(value: &str) -> bool {
    if value.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.split_once('.') {
        Some((head, tail)) => !head.is_empty() && !tail.is_empty(),
        None => false,
    }
}
