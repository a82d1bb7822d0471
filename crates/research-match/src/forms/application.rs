use serde::{Deserialize, Serialize};

use super::field::{FieldReader, TextRule};
use super::input::{FieldErrors, FormInput};
use super::{Form, LONG_TEXT_MAX};

pub const FIRST_NAME: &str = "first_name";
pub const LAST_NAME: &str = "last_name";
pub const STATEMENT_OF_INTEREST: &str = "statement_of_interest";
pub const REFERENCE_FIRST_NAME: &str = "reference_faculty_first_name";
pub const REFERENCE_LAST_NAME: &str = "reference_faculty_last_name";
pub const REFERENCE_EMAIL: &str = "reference_faculty_email";

/// A student's application to a posted position, naming the faculty member
/// who will recommend them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionApplication {
    pub first_name: String,
    pub last_name: String,
    pub statement_of_interest: String,
    pub reference_faculty_first_name: String,
    pub reference_faculty_last_name: String,
    pub reference_faculty_email: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ApplicationForm;

impl ApplicationForm {
    pub fn new() -> Self {
        Self
    }
}

impl Form for ApplicationForm {
    type Output = PositionApplication;

    fn validate(&self, input: &FormInput) -> Result<PositionApplication, FieldErrors> {
        let mut reader = FieldReader::new(input);

        let application = PositionApplication {
            first_name: reader.text(FIRST_NAME, &[]),
            last_name: reader.text(LAST_NAME, &[]),
            statement_of_interest: reader
                .text(STATEMENT_OF_INTEREST, &[TextRule::MaxLength(LONG_TEXT_MAX)]),
            reference_faculty_first_name: reader.text(REFERENCE_FIRST_NAME, &[]),
            reference_faculty_last_name: reader.text(REFERENCE_LAST_NAME, &[]),
            reference_faculty_email: reader.text(REFERENCE_EMAIL, &[TextRule::Email]),
        };

        reader.finish()?;
        Ok(application)
    }

    fn submit_label(&self) -> &'static str {
        "Submit"
    }
}
