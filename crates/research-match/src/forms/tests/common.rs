use std::sync::{Arc, Mutex};

use axum::response::Response;
use axum::Router;
use serde_json::Value;

use crate::forms::{form_router, FormInput, FormService, PositionRules};
use crate::reference::{ReferenceCatalog, ReferenceError, ReferenceOption};

#[derive(Default)]
pub(super) struct MemoryCatalog {
    research_fields: Mutex<Vec<ReferenceOption>>,
    languages: Mutex<Vec<ReferenceOption>>,
}

impl MemoryCatalog {
    pub(super) fn seeded() -> Self {
        Self {
            research_fields: Mutex::new(vec![
                ReferenceOption::new(1, "Machine Learning"),
                ReferenceOption::new(2, "Databases"),
                ReferenceOption::new(3, "Computer Security"),
            ]),
            languages: Mutex::new(vec![
                ReferenceOption::new(1, "Python"),
                ReferenceOption::new(2, "Rust"),
                ReferenceOption::new(3, "C++"),
            ]),
        }
    }

    pub(super) fn add_research_field(&self, id: i64, label: &str) {
        self.research_fields
            .lock()
            .expect("mutex poisoned")
            .push(ReferenceOption::new(id, label));
    }
}

impl ReferenceCatalog for MemoryCatalog {
    fn research_fields(&self) -> Result<Vec<ReferenceOption>, ReferenceError> {
        Ok(self.research_fields.lock().expect("mutex poisoned").clone())
    }

    fn programming_languages(&self) -> Result<Vec<ReferenceOption>, ReferenceError> {
        Ok(self.languages.lock().expect("mutex poisoned").clone())
    }
}

pub(super) struct UnavailableCatalog;

impl ReferenceCatalog for UnavailableCatalog {
    fn research_fields(&self) -> Result<Vec<ReferenceOption>, ReferenceError> {
        Err(ReferenceError::Unavailable("connection refused".to_string()))
    }

    fn programming_languages(&self) -> Result<Vec<ReferenceOption>, ReferenceError> {
        Err(ReferenceError::Unavailable("connection refused".to_string()))
    }
}

pub(super) fn service(catalog: Arc<MemoryCatalog>) -> Arc<FormService<MemoryCatalog>> {
    Arc::new(FormService::new(catalog))
}

pub(super) fn router_with(catalog: Arc<MemoryCatalog>) -> Router {
    form_router(service(catalog))
}

pub(super) fn ordered_service(catalog: Arc<MemoryCatalog>) -> FormService<MemoryCatalog> {
    FormService::new(catalog).with_position_rules(PositionRules {
        enforce_date_order: true,
    })
}

pub(super) fn application_input() -> FormInput {
    FormInput::new()
        .with("first_name", "Ada")
        .with("last_name", "Lovelace")
        .with("statement_of_interest", "I would like to work on compilers.")
        .with("reference_faculty_first_name", "Charles")
        .with("reference_faculty_last_name", "Babbage")
        .with("reference_faculty_email", "babbage@wsu.edu")
}

pub(super) fn position_input() -> FormInput {
    FormInput::new()
        .with("title", "Undergraduate Research Assistant")
        .with("description", "Help build a query optimizer.")
        .with_many("research_areas", ["2"])
        .with("other_areas", "Compilers, Query Planning")
        .with("wanted_gpa", "3.2")
        .with_many("languages", ["2", "1"])
        .with("time_commitment", "10")
        .with("start_date", "2026-01-12")
        .with("end_date", "2026-05-08")
}

pub(super) fn student_profile_input() -> FormInput {
    FormInput::new()
        .with("first_name", "Ada")
        .with("last_name", "Lovelace")
        .with("phone_number", "5095551234")
        .with("email", "ada@wsu.edu")
        .with("major", "Computer Science")
        .with("gpa", "3.8")
        .with("graduation_date", "2027-05-01")
        .with("password", "Abc123")
        .with("password_confirm", "Abc123")
}

pub(super) fn faculty_profile_input() -> FormInput {
    FormInput::new()
        .with("first_name", "Charles")
        .with("last_name", "Babbage")
        .with("phone_number", "5095550000")
        .with("email", "babbage@wsu.edu")
        .with("department", "EECS")
        .with_many("research_areas", ["1", "3"])
        .with("password", "engine")
        .with("password_confirm", "engine")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}
