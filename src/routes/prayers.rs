//! Prayer request API endpoints
//!
//! ## Endpoints
//!
//! - `GET /api/v1/prayers` - All requests
//! - `POST /api/v1/prayers` - Create a request
//! - `GET /api/v1/prayers/search?q=` - Text search over title, description and tags
//! - `GET /api/v1/prayers/stats` - Collection roll-up
//! - `GET /api/v1/prayers/recent?limit=` - Newest first
//! - `GET /api/v1/prayers/category/{category}` - Exact category match
//! - `GET|PUT|DELETE /api/v1/prayers/{id}` - Read, partial update, delete
//! - `POST /api/v1/prayers/{id}/pray` - Bump the pray count
//! - `GET|POST /api/v1/prayers/{id}/comments` - List or add comments
//! - `GET|POST /api/v1/prayers/{id}/prayers` - List or record prayers

use http_body_util::BodyExt;
use hyper::body::Body;
use hyper::{Method, Request, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{error, warn};

use super::{
    bad_request_response, empty_response, error_response, json_response, not_found_response,
    FullBody, MessageResponse,
};
use crate::model::{
    CreateCommentInput, CreatePrayerRequestInput, PrayerRequestPatch, RecordPrayerInput,
};
use crate::server::AppState;
use crate::types::{ErrorKind, Result};

/// Path prefix served by [`handle_prayers_request`]
pub const PRAYERS_PREFIX: &str = "/api/v1/prayers";

/// Route a request under `/api/v1/prayers`
pub async fn handle_prayers_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    path: &str,
) -> Response<FullBody>
where
    B: Body,
    B::Error: Display,
{
    let method = req.method().clone();
    let query = req.uri().query().map(str::to_string);
    let query = query.as_deref();

    let subpath = path.strip_prefix(PRAYERS_PREFIX).unwrap_or("");
    let segments: Vec<&str> = subpath.split('/').filter(|s| !s.is_empty()).collect();

    match (method, segments.as_slice()) {
        (Method::GET, []) => respond(StatusCode::OK, state.query.list_all().await),

        (Method::POST, []) => match read_json::<_, CreatePrayerRequestInput>(req).await {
            Ok(input) => respond(StatusCode::CREATED, state.mutation.create(input).await),
            Err(response) => response,
        },

        (Method::GET, ["search"]) => match query_param(query, "q") {
            Some(q) if !q.trim().is_empty() => {
                respond(StatusCode::OK, state.query.search(&q).await)
            }
            _ => bad_request_response("query parameter 'q' is required"),
        },

        (Method::GET, ["stats"]) => respond(StatusCode::OK, state.query.compute_stats().await),

        (Method::GET, ["recent"]) => {
            // Unparseable limits fall back to the default like absent ones
            let limit = query_param(query, "limit").and_then(|l| l.parse::<i64>().ok());
            respond(StatusCode::OK, state.query.list_recent(limit).await)
        }

        (Method::GET, ["category", category]) => match urlencoding::decode(category) {
            Ok(category) => respond(
                StatusCode::OK,
                state.query.list_by_category(&category).await,
            ),
            Err(_) => bad_request_response("category is not valid UTF-8"),
        },

        (Method::GET, [id]) => respond(StatusCode::OK, state.query.get_by_id(id).await),

        (Method::PUT, [id]) => match read_json::<_, PrayerRequestPatch>(req).await {
            Ok(patch) => respond(StatusCode::OK, state.mutation.update(id, patch).await),
            Err(response) => response,
        },

        (Method::DELETE, [id]) => match state.mutation.delete(id).await {
            Ok(()) => empty_response(StatusCode::NO_CONTENT),
            Err(e) => failure(&e),
        },

        (Method::POST, [id, "pray"]) => match state.mutation.increment_pray_count(id).await {
            Ok(()) => json_response(
                StatusCode::OK,
                &MessageResponse {
                    message: "Prayer count incremented",
                },
            ),
            Err(e) => failure(&e),
        },

        (Method::GET, [id, "comments"]) => respond(
            StatusCode::OK,
            state.query.list_comments_by_prayer_id(id).await,
        ),

        (Method::POST, [id, "comments"]) => match read_json::<_, CreateCommentInput>(req).await {
            Ok(input) => respond(
                StatusCode::CREATED,
                state.mutation.add_comment(id, input).await,
            ),
            Err(response) => response,
        },

        (Method::GET, [id, "prayers"]) => respond(
            StatusCode::OK,
            state.query.list_prayers_by_request_id(id).await,
        ),

        (Method::POST, [id, "prayers"]) => {
            match read_json_or_default::<_, RecordPrayerInput>(req).await {
                Ok(input) => respond(
                    StatusCode::CREATED,
                    state.mutation.record_prayer(id, input).await,
                ),
                Err(response) => response,
            }
        }

        _ => not_found_response(path),
    }
}

fn respond<T: Serialize>(status: StatusCode, result: Result<T>) -> Response<FullBody> {
    match result {
        Ok(body) => json_response(status, &body),
        Err(e) => failure(&e),
    }
}

fn failure(err: &crate::types::IntercedeError) -> Response<FullBody> {
    match err.kind() {
        ErrorKind::Internal => error!("Request failed: {}", err),
        ErrorKind::Unavailable => warn!("Request failed: {}", err),
        ErrorKind::InvalidArgument | ErrorKind::NotFound => {}
    }
    error_response(err)
}

#[allow(clippy::result_large_err)]
async fn read_body<B>(req: Request<B>) -> std::result::Result<bytes::Bytes, Response<FullBody>>
where
    B: Body,
    B::Error: Display,
{
    match req.into_body().collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) => Err(bad_request_response(format!(
            "Failed to read request body: {}",
            e
        ))),
    }
}

#[allow(clippy::result_large_err)]
async fn read_json<B, T>(req: Request<B>) -> std::result::Result<T, Response<FullBody>>
where
    B: Body,
    B::Error: Display,
    T: DeserializeOwned,
{
    let body = read_body(req).await?;
    serde_json::from_slice(&body).map_err(|e| bad_request_response(format!("Invalid JSON: {}", e)))
}

/// Like [`read_json`], but an empty body yields `T::default()`
#[allow(clippy::result_large_err)]
async fn read_json_or_default<B, T>(req: Request<B>) -> std::result::Result<T, Response<FullBody>>
where
    B: Body,
    B::Error: Display,
    T: DeserializeOwned + Default,
{
    let body = read_body(req).await?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(&body).map_err(|e| bad_request_response(format!("Invalid JSON: {}", e)))
}

/// First value of `key` in a query string, percent-decoded
fn query_param(query: Option<&str>, key: &str) -> Option<String> {
    query?
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, value)| {
            let value = value.replace('+', " ");
            urlencoding::decode(&value)
                .map(|v| v.into_owned())
                .unwrap_or_default()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_param_decoding() {
        assert_eq!(
            query_param(Some("q=please%20pray&limit=3"), "q").as_deref(),
            Some("please pray")
        );
        assert_eq!(query_param(Some("q=a+b"), "q").as_deref(), Some("a b"));
        assert_eq!(query_param(Some("limit=3"), "q"), None);
        assert_eq!(query_param(Some("q="), "q").as_deref(), Some(""));
        assert_eq!(query_param(None, "q"), None);
    }
}
