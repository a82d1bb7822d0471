use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::cross_field;
use super::field::{split_entries, FieldReader, TextRule};
use super::input::{FieldErrors, FormInput};
use super::{FieldOptions, Form};
use crate::reference::{ReferenceCatalog, ReferenceError, ReferenceOption};

pub const FIRST_NAME: &str = "first_name";
pub const LAST_NAME: &str = "last_name";
pub const PHONE_NUMBER: &str = "phone_number";
pub const EMAIL: &str = "email";
pub const MAJOR: &str = "major";
pub const GPA: &str = "gpa";
pub const GRADUATION_DATE: &str = "graduation_date";
pub const TOPICS_OF_INTEREST: &str = "topics_of_interest";
pub const OTHER_TOPICS: &str = "other_topics";
pub const LANGUAGES: &str = "languages";
pub const OTHER_LANGUAGES: &str = "other_languages";
pub const DEPARTMENT: &str = "department";
pub const RESEARCH_AREAS: &str = "research_areas";
pub const OTHER_AREAS: &str = "other_areas";
pub const PASSWORD: &str = "password";
pub const PASSWORD_CONFIRM: &str = "password_confirm";

/// Validated changes to a student's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
    pub major: String,
    pub gpa: f64,
    pub graduation_date: NaiveDate,
    pub topics_of_interest: Vec<ReferenceOption>,
    pub other_topics: Vec<String>,
    pub languages: Vec<ReferenceOption>,
    pub other_languages: Vec<String>,
    #[serde(skip_serializing, default)]
    pub password: String,
}

/// Validated changes to a faculty member's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
    pub department: String,
    pub research_areas: Vec<ReferenceOption>,
    pub other_areas: Vec<String>,
    #[serde(skip_serializing, default)]
    pub password: String,
}

/// Reads the password pair, comparing them only when both passed their own checks.
fn read_credentials(reader: &mut FieldReader<'_>) -> String {
    let password = reader.text(PASSWORD, &[]);
    let confirmation = reader.text(PASSWORD_CONFIRM, &[]);
    if !reader.has_error(PASSWORD) && !reader.has_error(PASSWORD_CONFIRM) {
        reader.apply(cross_field::password_confirmation(
            PASSWORD_CONFIRM,
            &password,
            &confirmation,
        ));
    }
    password
}

#[derive(Debug, Clone)]
pub struct StudentProfileForm {
    topics: Vec<ReferenceOption>,
    languages: Vec<ReferenceOption>,
}

impl StudentProfileForm {
    pub fn new<C>(catalog: &C) -> Result<Self, ReferenceError>
    where
        C: ReferenceCatalog + ?Sized,
    {
        Ok(Self {
            topics: catalog.research_fields()?,
            languages: catalog.programming_languages()?,
        })
    }
}

impl Form for StudentProfileForm {
    type Output = StudentProfileUpdate;

    fn validate(&self, input: &FormInput) -> Result<StudentProfileUpdate, FieldErrors> {
        let mut reader = FieldReader::new(input);

        let update = StudentProfileUpdate {
            first_name: reader.text(FIRST_NAME, &[]),
            last_name: reader.text(LAST_NAME, &[]),
            phone_number: reader.text(PHONE_NUMBER, &[TextRule::PhoneNumber]),
            email: reader.text(EMAIL, &[TextRule::Email]),
            major: reader.text(MAJOR, &[]),
            gpa: reader.float(GPA),
            graduation_date: reader.date(GRADUATION_DATE),
            topics_of_interest: reader.select_many(TOPICS_OF_INTEREST, &self.topics, false),
            other_topics: split_entries(reader.optional_text(OTHER_TOPICS).as_deref()),
            languages: reader.select_many(LANGUAGES, &self.languages, false),
            other_languages: split_entries(reader.optional_text(OTHER_LANGUAGES).as_deref()),
            password: read_credentials(&mut reader),
        };

        reader.finish()?;
        Ok(update)
    }

    fn options(&self) -> Vec<FieldOptions> {
        vec![
            FieldOptions {
                field: TOPICS_OF_INTEREST,
                options: self.topics.clone(),
            },
            FieldOptions {
                field: LANGUAGES,
                options: self.languages.clone(),
            },
        ]
    }

    fn submit_label(&self) -> &'static str {
        "Save Changes"
    }
}

#[derive(Debug, Clone)]
pub struct FacultyProfileForm {
    research_areas: Vec<ReferenceOption>,
}

impl FacultyProfileForm {
    pub fn new<C>(catalog: &C) -> Result<Self, ReferenceError>
    where
        C: ReferenceCatalog + ?Sized,
    {
        Ok(Self {
            research_areas: catalog.research_fields()?,
        })
    }
}

impl Form for FacultyProfileForm {
    type Output = FacultyProfileUpdate;

    fn validate(&self, input: &FormInput) -> Result<FacultyProfileUpdate, FieldErrors> {
        let mut reader = FieldReader::new(input);

        let update = FacultyProfileUpdate {
            first_name: reader.text(FIRST_NAME, &[]),
            last_name: reader.text(LAST_NAME, &[]),
            phone_number: reader.text(PHONE_NUMBER, &[TextRule::PhoneNumber]),
            // required only, no shape check
            email: reader.text(EMAIL, &[]),
            department: reader.text(DEPARTMENT, &[]),
            research_areas: reader.select_many(RESEARCH_AREAS, &self.research_areas, false),
            other_areas: split_entries(reader.optional_text(OTHER_AREAS).as_deref()),
            password: read_credentials(&mut reader),
        };

        reader.finish()?;
        Ok(update)
    }

    fn options(&self) -> Vec<FieldOptions> {
        vec![FieldOptions {
            field: RESEARCH_AREAS,
            options: self.research_areas.clone(),
        }]
    }

    fn submit_label(&self) -> &'static str {
        "Save Changes"
    }
}
