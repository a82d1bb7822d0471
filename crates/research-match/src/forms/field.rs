use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use super::cross_field::CrossFieldError;
use super::input::{FieldErrors, FormInput};
use crate::reference::{ReferenceId, ReferenceOption};

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_EMAIL: &str = "Invalid email address.";
pub const INVALID_FLOAT: &str = "Not a valid float value.";
pub const INVALID_INTEGER: &str = "Not a valid integer value.";
pub const INVALID_DATE: &str = "Not a valid date value.";
pub const INVALID_CHOICE: &str = "Not a valid choice.";
pub const PHONE_NOT_NUMERIC: &str = "Phone number must contain only numbers!";
pub const PHONE_WRONG_LENGTH: &str = "Phone number must be 10 digits long!";

pub const PHONE_NUMBER_LENGTH: usize = 10;
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn too_long(max: usize) -> String {
    format!("Field cannot be longer than {max} characters.")
}

/// Checks applied to a text field once it has data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRule {
    MaxLength(usize),
    Email,
    PhoneNumber,
}

impl TextRule {
    fn check(self, value: &str) -> Result<(), String> {
        match self {
            TextRule::MaxLength(max) => check_max_length(value, max),
            TextRule::Email => {
                if is_email(value) {
                    Ok(())
                } else {
                    Err(INVALID_EMAIL.to_string())
                }
            }
            TextRule::PhoneNumber => check_phone_number(value).map_err(str::to_string),
        }
    }
}

/// Length is counted in characters, not bytes.
pub fn check_max_length(value: &str, max: usize) -> Result<(), String> {
    if value.chars().count() > max {
        Err(too_long(max))
    } else {
        Ok(())
    }
}

/// Digits are checked before length, so only the first failure is reported.
pub fn check_phone_number(value: &str) -> Result<(), &'static str> {
    if value.is_empty() || !value.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(PHONE_NOT_NUMERIC);
    }
    if value.len() != PHONE_NUMBER_LENGTH {
        return Err(PHONE_WRONG_LENGTH);
    }
    Ok(())
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").expect("email pattern compiles")
    })
}

pub fn is_email(value: &str) -> bool {
    email_pattern().is_match(value)
}

fn has_data(value: Option<&str>) -> Option<&str> {
    value.filter(|raw| !raw.trim().is_empty())
}

/// Reads typed values out of a [`FormInput`], recording one entry per failing
/// field and carrying on with the rest.
///
/// Values returned for failing fields are placeholders; callers only use them
/// once [`FieldReader::finish`] has confirmed there were no errors.
pub struct FieldReader<'a> {
    input: &'a FormInput,
    errors: FieldErrors,
}

impl<'a> FieldReader<'a> {
    pub fn new(input: &'a FormInput) -> Self {
        Self {
            input,
            errors: FieldErrors::new(),
        }
    }

    fn raw(&self, field: &str) -> Option<&'a str> {
        let input: &'a FormInput = self.input;
        has_data(input.text(field))
    }

    pub fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(field, message);
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.has(field)
    }

    /// Required text. Every rule runs once the field has data.
    pub fn text(&mut self, field: &str, rules: &[TextRule]) -> String {
        let Some(value) = self.raw(field) else {
            self.reject(field, REQUIRED);
            return String::new();
        };

        for rule in rules {
            if let Err(message) = rule.check(value) {
                self.errors.push(field, message);
            }
        }
        value.to_string()
    }

    /// Optional free text, trimmed. Blank input reads as absent.
    pub fn optional_text(&self, field: &str) -> Option<String> {
        self.raw(field).map(|value| value.trim().to_string())
    }

    /// Required float. Zero counts as missing data.
    pub fn float(&mut self, field: &str) -> f64 {
        let Some(raw) = self.raw(field) else {
            self.reject(field, REQUIRED);
            return 0.0;
        };

        match raw.trim().parse::<f64>() {
            Ok(value) if !value.is_finite() => {
                self.reject(field, INVALID_FLOAT);
                0.0
            }
            Ok(value) if value == 0.0 => {
                self.reject(field, REQUIRED);
                0.0
            }
            Ok(value) => value,
            Err(_) => {
                self.reject(field, INVALID_FLOAT);
                0.0
            }
        }
    }

    /// Required integer. Zero counts as missing data.
    pub fn integer(&mut self, field: &str) -> i64 {
        let Some(raw) = self.raw(field) else {
            self.reject(field, REQUIRED);
            return 0;
        };

        match raw.trim().parse::<i64>() {
            Ok(0) => {
                self.reject(field, REQUIRED);
                0
            }
            Ok(value) => value,
            Err(_) => {
                self.reject(field, INVALID_INTEGER);
                0
            }
        }
    }

    pub fn date(&mut self, field: &str) -> NaiveDate {
        let Some(raw) = self.raw(field) else {
            self.reject(field, REQUIRED);
            return NaiveDate::MIN;
        };

        NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).unwrap_or_else(|_| {
            self.reject(field, INVALID_DATE);
            NaiveDate::MIN
        })
    }

    /// Resolves selected ids against the options the form was built with.
    /// Selections come back in option order, without duplicates.
    pub fn select_many(
        &mut self,
        field: &str,
        options: &[ReferenceOption],
        required: bool,
    ) -> Vec<ReferenceOption> {
        let input: &'a FormInput = self.input;
        let submitted = input.list(field);
        if submitted.is_empty() {
            if required {
                self.reject(field, REQUIRED);
            }
            return Vec::new();
        }

        let mut selected_ids = Vec::with_capacity(submitted.len());
        for raw in submitted {
            let id = raw.trim().parse::<i64>().ok().map(ReferenceId);
            match id.filter(|id| options.iter().any(|option| option.id == *id)) {
                Some(id) => selected_ids.push(id),
                None => {
                    self.reject(field, INVALID_CHOICE);
                    return Vec::new();
                }
            }
        }

        options
            .iter()
            .filter(|option| selected_ids.contains(&option.id))
            .cloned()
            .collect()
    }

    pub fn apply(&mut self, cross_field: Vec<CrossFieldError>) {
        for error in cross_field {
            self.reject(error.field, error.message);
        }
    }

    pub fn finish(self) -> Result<(), FieldErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Splits a comma separated free-text entry, dropping blanks.
pub fn split_entries(value: Option<&str>) -> Vec<String> {
    value
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
