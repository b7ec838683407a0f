// Error responses - every failed render pass becomes a visible error
use crate::domain::error::ReportError;
use crate::infrastructure::http_response::html_response;
use crate::presentation::page::{render_error_block, render_error_page};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

const ERROR_PAGE_TITLE: &str = "Revenue Dashboard";

pub fn status_for(error: &ReportError) -> StatusCode {
    match error {
        ReportError::UnknownYear(_) => StatusCode::BAD_REQUEST,
        ReportError::Warehouse(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn log_failure(error: &ReportError, status: StatusCode) {
    if status.is_server_error() {
        tracing::error!("Render pass failed: {}", error);
    } else {
        tracing::warn!("Rejected request: {}", error);
    }
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        log_failure(&self, status);
        html_response(status, render_error_page(ERROR_PAGE_TITLE, &self.to_string()))
    }
}

/// Error for the year fragment: the same message without the page shell.
/// The page drops it into the year detail and keeps the selector above it.
pub struct FragmentError(pub ReportError);

impl From<ReportError> for FragmentError {
    fn from(error: ReportError) -> Self {
        Self(error)
    }
}

impl IntoResponse for FragmentError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        log_failure(&self.0, status);
        html_response(status, render_error_block(&self.0.to_string()))
    }
}
