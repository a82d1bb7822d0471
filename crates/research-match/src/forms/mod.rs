//! Server-side forms for applying to, posting, searching, and profile editing.
//!
//! Each form reads a [`FormInput`] and either produces its typed output or a
//! [`FieldErrors`] map with a message for every failing field. Forms with
//! multi-select fields are built from a [`ReferenceCatalog`](crate::reference::ReferenceCatalog)
//! and fetch their options on every construction.

pub mod application;
pub mod cross_field;
pub mod field;
pub mod input;
pub mod position;
pub mod profile;
pub mod router;
pub mod search;

#[cfg(test)]
mod tests;

use serde::Serialize;

use crate::reference::ReferenceOption;

pub use application::{ApplicationForm, PositionApplication};
pub use cross_field::{CrossFieldError, PositionRules};
pub use field::{FieldReader, TextRule};
pub use input::{FieldErrors, FieldValue, FormInput};
pub use position::{PositionDetails, PositionForm};
pub use profile::{
    FacultyProfileForm, FacultyProfileUpdate, StudentProfileForm, StudentProfileUpdate,
};
pub use router::{form_router, FormDescription, FormOutcome, FormService, FormServiceError};
pub use search::{SearchChoice, SearchForm, SearchRequest, SortOrder};

/// Maximum length of long free-text answers (statement of interest, position description).
pub const LONG_TEXT_MAX: usize = 1500;

/// A form that accepts or rejects one submission.
pub trait Form {
    type Output: Serialize;

    /// Every field is checked even when an earlier one fails.
    fn validate(&self, input: &FormInput) -> Result<Self::Output, FieldErrors>;

    /// Options for multi-select fields, as fetched when the form was built.
    fn options(&self) -> Vec<FieldOptions> {
        Vec::new()
    }

    fn submit_label(&self) -> &'static str;
}

/// Selectable rows for one multi-select field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldOptions {
    pub field: &'static str,
    pub options: Vec<ReferenceOption>,
}

/// The forms exposed by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormKind {
    Application,
    Position,
    PositionEdit,
    Search,
    StudentProfile,
    FacultyProfile,
}

impl FormKind {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Application,
            Self::Position,
            Self::PositionEdit,
            Self::Search,
            Self::StudentProfile,
            Self::FacultyProfile,
        ]
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::Position => "position",
            Self::PositionEdit => "position-edit",
            Self::Search => "search",
            Self::StudentProfile => "student-profile",
            Self::FacultyProfile => "faculty-profile",
        }
    }

    pub fn from_slug(value: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|kind| kind.slug().eq_ignore_ascii_case(value.trim()))
    }
}

impl std::fmt::Display for FormKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}
