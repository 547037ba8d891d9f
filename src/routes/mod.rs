//! HTTP routes for Intercede

pub mod health;
pub mod prayers;

pub use health::{health_check, readiness_check};
pub use prayers::handle_prayers_request;

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::types::{ErrorKind, IntercedeError};

pub type FullBody = Full<Bytes>;

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

/// Message-only response body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<FullBody> {
    let json = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());
    let mut response = Response::new(Full::new(Bytes::from(json)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

pub fn empty_response(status: StatusCode) -> Response<FullBody> {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = status;
    response
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Render an engine error with the status its kind maps to
pub fn error_response(err: &IntercedeError) -> Response<FullBody> {
    let kind = err.kind();
    json_response(
        status_for(kind),
        &ErrorResponse {
            error: err.to_string(),
            code: kind.code(),
        },
    )
}

pub fn bad_request_response(message: impl Into<String>) -> Response<FullBody> {
    error_response(&IntercedeError::InvalidArgument(message.into()))
}

pub fn not_found_response(path: &str) -> Response<FullBody> {
    error_response(&IntercedeError::NotFound(format!("no route for {}", path)))
}
