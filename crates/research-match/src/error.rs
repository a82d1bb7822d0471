use crate::config::ConfigError;
use crate::forms::FormServiceError;
use crate::reference::{ReferenceError, SeedError};
use crate::responder::{ErrorPage, FailureDetail};
use crate::telemetry::TelemetryError;
use axum::response::{IntoResponse, Response};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Reference(ReferenceError),
    Forms(FormServiceError),
    Seed(SeedError),
    Encode(serde_json::Error),
    NotFound,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Reference(err) => write!(f, "reference data error: {}", err),
            AppError::Forms(err) => write!(f, "form error: {}", err),
            AppError::Seed(err) => write!(f, "reference seed error: {}", err),
            AppError::Encode(err) => write!(f, "encoding error: {}", err),
            AppError::NotFound => write!(f, "resource not found"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Reference(err) => Some(err),
            AppError::Forms(err) => Some(err),
            AppError::Seed(err) => Some(err),
            AppError::Encode(err) => Some(err),
            AppError::NotFound => None,
        }
    }
}

/// Only the page reaches the client. For server errors the description
/// travels as a [`FailureDetail`] extension for the request scope to log.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => ErrorPage::NotFound.into_response(),
            other => {
                let mut response = ErrorPage::Internal.into_response();
                response
                    .extensions_mut()
                    .insert(FailureDetail(other.to_string()));
                response
            }
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ReferenceError> for AppError {
    fn from(value: ReferenceError) -> Self {
        Self::Reference(value)
    }
}

impl From<FormServiceError> for AppError {
    fn from(value: FormServiceError) -> Self {
        Self::Forms(value)
    }
}

impl From<SeedError> for AppError {
    fn from(value: SeedError) -> Self {
        Self::Seed(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn not_found_maps_to_404_page() {
        let response = AppError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.extensions().get::<FailureDetail>().is_none());
    }

    #[test]
    fn server_errors_carry_detail_outside_the_body() {
        let err = AppError::from(ReferenceError::Unavailable("pool exhausted".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = response
            .extensions()
            .get::<FailureDetail>()
            .expect("detail attached");
        assert!(detail.0.contains("pool exhausted"));
    }
}
