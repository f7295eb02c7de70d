// HTTP response utilities for JSON encoding
use axum::{
    body::Body,
    http::{header, HeaderValue, Response, StatusCode},
};
use serde::Serialize;

/// Serialize a value to a JSON response. Compression is left to the
/// router's `CompressionLayer`.
pub fn json_response<T: Serialize>(status: StatusCode, data: &T) -> Response<Body> {
    let bytes = match serde_json::to_vec(data) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!("JSON serialization error: {}", e);
            return empty_response(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let response = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, HeaderValue::from(bytes.len()))
        .body(Body::from(bytes));

    match response {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Response build error: {}", e);
            empty_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// JSON error body `{"error": message}`
pub fn error_response(status: StatusCode, message: &str) -> Response<Body> {
    json_response(status, &serde_json::json!({ "error": message }))
}

fn empty_response(status: StatusCode) -> Response<Body> {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    response
}
