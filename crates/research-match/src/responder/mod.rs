//! Turns request failures into pages, and scopes a unit of work around each request.

pub mod pages;
pub mod transaction;

use std::fmt;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{debug, error, warn};

pub use pages::ErrorPage;
pub use transaction::{
    RequestTransaction, SharedUnitOfWork, TransactionError, TransactionManager, TransactionState,
    UnitOfWork,
};

/// Failure description attached to 500 responses so the scope can log it
/// without it reaching the body.
#[derive(Debug, Clone)]
pub struct FailureDetail(pub String);

/// Not-found page. Touches no state.
pub fn not_found() -> Response {
    ErrorPage::NotFound.into_response()
}

/// Router fallback.
pub async fn not_found_handler() -> Response {
    not_found()
}

/// Rolls back the request's pending work, then renders the failure page.
///
/// The rollback happens before the response exists and is never retried. A
/// failing rollback is logged and the page is returned regardless.
pub fn internal_error(transaction: &mut RequestTransaction, cause: &dyn fmt::Display) -> Response {
    error!(%cause, "request failed with an internal error");
    match transaction.rollback() {
        Ok(()) => debug!("rolled back pending work after internal error"),
        Err(err) => warn!(error = %err, "rollback after internal error failed"),
    }
    ErrorPage::Internal.into_response()
}

/// Middleware opening a unit of work per request.
///
/// Handlers reach the unit through `Extension<Arc<M::Unit>>`. Successful
/// and redirect responses commit, 500 responses go through
/// [`internal_error`], everything else rolls back quietly.
pub async fn scope_unit_of_work<M>(
    State(manager): State<Arc<M>>,
    mut request: Request,
    next: Next,
) -> Response
where
    M: TransactionManager + 'static,
{
    let unit = manager.begin();
    request.extensions_mut().insert(Arc::clone(&unit));
    let mut transaction = RequestTransaction::new(unit);

    let response = next.run(request).await;
    let status = response.status();

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        let cause = response
            .extensions()
            .get::<FailureDetail>()
            .map(|detail| detail.0.clone())
            .unwrap_or_else(|| "handler returned 500".to_string());
        return internal_error(&mut transaction, &cause);
    }

    if status.is_success() || status.is_redirection() {
        if let Err(err) = transaction.commit() {
            return internal_error(&mut transaction, &err);
        }
        return response;
    }

    if let Err(err) = transaction.rollback() {
        warn!(error = %err, %status, "rollback after client error failed");
    }
    response
}
