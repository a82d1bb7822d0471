//! Reference tables backing the multi-select form fields.
//!
//! Forms never reach into persistence directly. They receive a
//! [`ReferenceCatalog`] at construction time and ask it for the full current
//! contents of each table.

pub mod seed;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use seed::{load_reference_seed, ReferenceSeed, SeedError};

/// Primary key of a reference row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceId(pub i64);

impl fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One selectable row of a reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceOption {
    pub id: ReferenceId,
    pub label: String,
}

impl ReferenceOption {
    pub fn new(id: i64, label: impl Into<String>) -> Self {
        Self {
            id: ReferenceId(id),
            label: label.into(),
        }
    }
}

/// The two reference tables forms draw their options from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceCollection {
    ResearchFields,
    ProgrammingLanguages,
}

impl ReferenceCollection {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ResearchFields => "research areas",
            Self::ProgrammingLanguages => "programming languages",
        }
    }

    /// Parses the slug used in URLs and seed files.
    pub fn from_slug(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "research_field" | "research_fields" | "research-fields" => {
                Some(Self::ResearchFields)
            }
            "programming_language" | "programming_languages" | "programming-languages" => {
                Some(Self::ProgrammingLanguages)
            }
            _ => None,
        }
    }
}

/// Read access to the reference tables.
///
/// Implementations must return the table contents as of the call; callers
/// rely on every form construction observing rows added since the last one.
pub trait ReferenceCatalog: Send + Sync {
    fn research_fields(&self) -> Result<Vec<ReferenceOption>, ReferenceError>;
    fn programming_languages(&self) -> Result<Vec<ReferenceOption>, ReferenceError>;

    fn options(
        &self,
        collection: ReferenceCollection,
    ) -> Result<Vec<ReferenceOption>, ReferenceError> {
        match collection {
            ReferenceCollection::ResearchFields => self.research_fields(),
            ReferenceCollection::ProgrammingLanguages => self.programming_languages(),
        }
    }
}

impl<C> ReferenceCatalog for std::sync::Arc<C>
where
    C: ReferenceCatalog + ?Sized,
{
    fn research_fields(&self) -> Result<Vec<ReferenceOption>, ReferenceError> {
        (**self).research_fields()
    }

    fn programming_languages(&self) -> Result<Vec<ReferenceOption>, ReferenceError> {
        (**self).programming_languages()
    }
}

/// Failure while reading a reference table.
#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    #[error("reference catalog unavailable: {0}")]
    Unavailable(String),
    #[error("{collection} already contain '{label}'")]
    DuplicateLabel {
        collection: &'static str,
        label: String,
    },
}
