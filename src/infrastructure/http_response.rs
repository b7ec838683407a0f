// HTTP response utilities for HTML pages and CSV downloads
use axum::{
    body::Body,
    http::{header, HeaderValue, Response, StatusCode},
    response::{Html, IntoResponse},
};

/// HTML body with the given status, never cached.
pub fn html_response(status: StatusCode, html: String) -> axum::response::Response {
    let mut response = (status, Html(html)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

/// CSV body delivered as a named download.
pub fn csv_attachment(
    file_name: &str,
    content_type: &str,
    csv: String,
) -> Result<Response<Body>, StatusCode> {
    let content_length = csv.len();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, format!("{content_type}; charset=utf-8"))
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        )
        .header(header::CONTENT_LENGTH, content_length)
        .body(Body::from(csv))
        .map_err(|e| {
            tracing::error!("Response build error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}
