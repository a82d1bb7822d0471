use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::search::SearchChoice;
use super::{
    ApplicationForm, FacultyProfileForm, FieldErrors, FieldOptions, Form, FormInput, FormKind,
    PositionForm, PositionRules, SearchForm, StudentProfileForm,
};
use crate::error::AppError;
use crate::reference::{ReferenceCatalog, ReferenceError};
use crate::responder;

/// Result of one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FormOutcome {
    Accepted { values: Value },
    Rejected { errors: FieldErrors },
}

impl FormOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, FormOutcome::Accepted { .. })
    }
}

/// What a page needs to render a form.
#[derive(Debug, Clone, Serialize)]
pub struct FormDescription {
    pub form: FormKind,
    pub submit_label: &'static str,
    pub options: Vec<FieldOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<SearchChoice>>,
}

#[derive(Debug, thiserror::Error)]
pub enum FormServiceError {
    #[error(transparent)]
    Reference(#[from] ReferenceError),
    #[error("failed to encode accepted values: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Builds forms against the reference catalog and runs submissions through them.
///
/// Forms are constructed on every call so option lists always reflect the
/// catalog's current rows.
pub struct FormService<C: ?Sized> {
    position_rules: PositionRules,
    catalog: Arc<C>,
}

impl<C> FormService<C>
where
    C: ReferenceCatalog + ?Sized + 'static,
{
    pub fn new(catalog: Arc<C>) -> Self {
        Self {
            position_rules: PositionRules::default(),
            catalog,
        }
    }

    pub fn with_position_rules(mut self, rules: PositionRules) -> Self {
        self.position_rules = rules;
        self
    }

    pub fn submit(
        &self,
        kind: FormKind,
        input: &FormInput,
    ) -> Result<FormOutcome, FormServiceError> {
        let catalog = self.catalog.as_ref();
        let outcome = match kind {
            FormKind::Application => run(&ApplicationForm::new(), input)?,
            FormKind::Position => run(
                &PositionForm::create(catalog)?.with_rules(self.position_rules),
                input,
            )?,
            FormKind::PositionEdit => run(
                &PositionForm::edit(catalog)?.with_rules(self.position_rules),
                input,
            )?,
            FormKind::Search => run(&SearchForm::new(), input)?,
            FormKind::StudentProfile => run(&StudentProfileForm::new(catalog)?, input)?,
            FormKind::FacultyProfile => run(&FacultyProfileForm::new(catalog)?, input)?,
        };

        match &outcome {
            FormOutcome::Accepted { .. } => info!(form = %kind, "form submission accepted"),
            FormOutcome::Rejected { errors } => debug!(
                form = %kind,
                fields = ?errors.fields().collect::<Vec<_>>(),
                "form submission rejected"
            ),
        }
        Ok(outcome)
    }

    pub fn describe(&self, kind: FormKind) -> Result<FormDescription, FormServiceError> {
        let catalog = self.catalog.as_ref();
        let description = match kind {
            FormKind::Application => describe(kind, &ApplicationForm::new()),
            FormKind::Position => describe(kind, &PositionForm::create(catalog)?),
            FormKind::PositionEdit => describe(kind, &PositionForm::edit(catalog)?),
            FormKind::Search => {
                let form = SearchForm::new();
                FormDescription {
                    choices: Some(form.choices()),
                    ..describe(kind, &form)
                }
            }
            FormKind::StudentProfile => describe(kind, &StudentProfileForm::new(catalog)?),
            FormKind::FacultyProfile => describe(kind, &FacultyProfileForm::new(catalog)?),
        };
        Ok(description)
    }
}

fn run<F: Form>(form: &F, input: &FormInput) -> Result<FormOutcome, FormServiceError> {
    match form.validate(input) {
        Ok(output) => Ok(FormOutcome::Accepted {
            values: serde_json::to_value(output)?,
        }),
        Err(errors) => Ok(FormOutcome::Rejected { errors }),
    }
}

fn describe<F: Form>(kind: FormKind, form: &F) -> FormDescription {
    FormDescription {
        form: kind,
        submit_label: form.submit_label(),
        options: form.options(),
        choices: None,
    }
}

/// Router exposing form descriptions and submissions.
pub fn form_router<C>(service: Arc<FormService<C>>) -> Router
where
    C: ReferenceCatalog + ?Sized + 'static,
{
    Router::new()
        .route(
            "/forms/:form",
            get(describe_handler::<C>).post(submit_handler::<C>),
        )
        .route("/forms/:form/options", get(options_handler::<C>))
        .with_state(service)
}

pub(crate) async fn describe_handler<C>(
    State(service): State<Arc<FormService<C>>>,
    Path(form): Path<String>,
) -> Response
where
    C: ReferenceCatalog + ?Sized + 'static,
{
    let Some(kind) = FormKind::from_slug(&form) else {
        return responder::not_found();
    };
    match service.describe(kind) {
        Ok(description) => (StatusCode::OK, Json(description)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn options_handler<C>(
    State(service): State<Arc<FormService<C>>>,
    Path(form): Path<String>,
) -> Response
where
    C: ReferenceCatalog + ?Sized + 'static,
{
    let Some(kind) = FormKind::from_slug(&form) else {
        return responder::not_found();
    };
    match service.describe(kind) {
        Ok(description) => (StatusCode::OK, Json(description.options)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn submit_handler<C>(
    State(service): State<Arc<FormService<C>>>,
    Path(form): Path<String>,
    Json(input): Json<FormInput>,
) -> Response
where
    C: ReferenceCatalog + ?Sized + 'static,
{
    let Some(kind) = FormKind::from_slug(&form) else {
        return responder::not_found();
    };
    match service.submit(kind, &input) {
        Ok(FormOutcome::Accepted { values }) => {
            let payload = json!({
                "form": kind,
                "accepted": true,
                "values": values,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Ok(FormOutcome::Rejected { errors }) => {
            let payload = json!({
                "form": kind,
                "accepted": false,
                "errors": errors,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(err) => AppError::from(err).into_response(),
    }
}
