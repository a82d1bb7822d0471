use serde::{Deserialize, Serialize};

use super::field::INVALID_CHOICE;
use super::input::{FieldErrors, FormInput};
use super::Form;

pub const SORT_ORDER: &str = "sort_order";

/// How the position index is ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "Date")]
    StartDate,
    #[serde(rename = "GPA")]
    RequiredGpa,
    #[serde(rename = "Recommended")]
    Recommended,
}

impl SortOrder {
    pub const fn ordered() -> [Self; 3] {
        [Self::StartDate, Self::RequiredGpa, Self::Recommended]
    }

    /// Submitted value.
    pub const fn value(self) -> &'static str {
        match self {
            Self::StartDate => "Date",
            Self::RequiredGpa => "GPA",
            Self::Recommended => "Recommended",
        }
    }

    /// Text shown in the dropdown.
    pub const fn label(self) -> &'static str {
        match self {
            Self::StartDate => "Start Date",
            Self::RequiredGpa => "Required GPA",
            Self::Recommended => "Recommended",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|order| order.value() == value)
    }
}

/// One `(value, label)` pair of the sort dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchChoice {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub sort_order: SortOrder,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchForm;

impl SearchForm {
    pub fn new() -> Self {
        Self
    }

    pub fn choices(&self) -> Vec<SearchChoice> {
        SortOrder::ordered()
            .into_iter()
            .map(|order| SearchChoice {
                value: order.value(),
                label: order.label(),
            })
            .collect()
    }

    pub fn default_choice(&self) -> SortOrder {
        SortOrder::default()
    }
}

impl Form for SearchForm {
    type Output = SearchRequest;

    /// A missing selection falls back to the default; anything outside the
    /// three choices is rejected.
    fn validate(&self, input: &FormInput) -> Result<SearchRequest, FieldErrors> {
        let sort_order = match input.text(SORT_ORDER) {
            None => self.default_choice(),
            Some(value) => match SortOrder::from_value(value) {
                Some(order) => order,
                None => {
                    let mut errors = FieldErrors::new();
                    errors.push(SORT_ORDER, INVALID_CHOICE);
                    return Err(errors);
                }
            },
        };

        Ok(SearchRequest { sort_order })
    }

    fn submit_label(&self) -> &'static str {
        "Search"
    }
}
