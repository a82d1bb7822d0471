use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::cross_field::{self, PositionRules};
use super::field::{split_entries, FieldReader, TextRule};
use super::input::{FieldErrors, FormInput};
use super::{FieldOptions, Form, LONG_TEXT_MAX};
use crate::reference::{ReferenceCatalog, ReferenceError, ReferenceOption};

pub const TITLE: &str = "title";
pub const DESCRIPTION: &str = "description";
pub const RESEARCH_AREAS: &str = "research_areas";
pub const OTHER_AREAS: &str = "other_areas";
pub const WANTED_GPA: &str = "wanted_gpa";
pub const LANGUAGES: &str = "languages";
pub const OTHER_LANGUAGES: &str = "other_languages";
pub const TIME_COMMITMENT: &str = "time_commitment";
pub const START_DATE: &str = "start_date";
pub const END_DATE: &str = "end_date";

/// Posting a new position and editing an existing one share every field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PositionFormMode {
    Create,
    Edit,
}

/// Validated position posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionDetails {
    pub title: String,
    pub description: String,
    pub research_areas: Vec<ReferenceOption>,
    pub other_areas: Vec<String>,
    pub wanted_gpa: f64,
    pub languages: Vec<ReferenceOption>,
    pub other_languages: Vec<String>,
    /// Hours per week.
    pub time_commitment: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct PositionForm {
    mode: PositionFormMode,
    rules: PositionRules,
    research_areas: Vec<ReferenceOption>,
    languages: Vec<ReferenceOption>,
}

impl PositionForm {
    pub fn create<C>(catalog: &C) -> Result<Self, ReferenceError>
    where
        C: ReferenceCatalog + ?Sized,
    {
        Self::build(PositionFormMode::Create, catalog)
    }

    pub fn edit<C>(catalog: &C) -> Result<Self, ReferenceError>
    where
        C: ReferenceCatalog + ?Sized,
    {
        Self::build(PositionFormMode::Edit, catalog)
    }

    fn build<C>(mode: PositionFormMode, catalog: &C) -> Result<Self, ReferenceError>
    where
        C: ReferenceCatalog + ?Sized,
    {
        Ok(Self {
            mode,
            rules: PositionRules::default(),
            research_areas: catalog.research_fields()?,
            languages: catalog.programming_languages()?,
        })
    }

    pub fn with_rules(mut self, rules: PositionRules) -> Self {
        self.rules = rules;
        self
    }
}

impl Form for PositionForm {
    type Output = PositionDetails;

    fn validate(&self, input: &FormInput) -> Result<PositionDetails, FieldErrors> {
        let mut reader = FieldReader::new(input);

        let details = PositionDetails {
            title: reader.text(TITLE, &[]),
            description: reader.text(DESCRIPTION, &[TextRule::MaxLength(LONG_TEXT_MAX)]),
            research_areas: reader.select_many(RESEARCH_AREAS, &self.research_areas, true),
            other_areas: split_entries(reader.optional_text(OTHER_AREAS).as_deref()),
            wanted_gpa: reader.float(WANTED_GPA),
            languages: reader.select_many(LANGUAGES, &self.languages, true),
            other_languages: split_entries(reader.optional_text(OTHER_LANGUAGES).as_deref()),
            time_commitment: reader.integer(TIME_COMMITMENT),
            start_date: reader.date(START_DATE),
            end_date: reader.date(END_DATE),
        };

        if !reader.has_error(START_DATE) && !reader.has_error(END_DATE) {
            reader.apply(cross_field::schedule(
                self.rules,
                END_DATE,
                details.start_date,
                details.end_date,
            ));
        }

        reader.finish()?;
        Ok(details)
    }

    fn options(&self) -> Vec<FieldOptions> {
        vec![
            FieldOptions {
                field: RESEARCH_AREAS,
                options: self.research_areas.clone(),
            },
            FieldOptions {
                field: LANGUAGES,
                options: self.languages.clone(),
            },
        ]
    }

    fn submit_label(&self) -> &'static str {
        match self.mode {
            PositionFormMode::Create => "Post",
            PositionFormMode::Edit => "Update Position",
        }
    }
}
