//! Checks that compare values of more than one field.
//!
//! These run after every field has been read on its own and only see values
//! that already passed their field rules.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const PASSWORD_MISMATCH: &str = "Field must be equal to password.";
pub const END_BEFORE_START: &str = "End date must not be before the start date.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossFieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Rules for position forms that go beyond the per-field checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRules {
    pub enforce_date_order: bool,
}

/// Confirmation must match byte for byte.
pub fn password_confirmation(
    confirm_field: &'static str,
    password: &str,
    confirmation: &str,
) -> Vec<CrossFieldError> {
    if password.as_bytes() == confirmation.as_bytes() {
        Vec::new()
    } else {
        vec![CrossFieldError {
            field: confirm_field,
            message: PASSWORD_MISMATCH,
        }]
    }
}

/// A position may end on the day it starts.
pub fn schedule(
    rules: PositionRules,
    end_field: &'static str,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<CrossFieldError> {
    if rules.enforce_date_order && end < start {
        vec![CrossFieldError {
            field: end_field,
            message: END_BEFORE_START,
        }]
    } else {
        Vec::new()
    }
}
