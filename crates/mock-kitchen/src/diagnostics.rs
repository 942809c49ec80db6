//! Endpoints that exist only to observe client behaviour.

use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};

use crate::error::MockError;
use crate::MockKitchen;

fn header_text(headers: &HeaderMap, name: &str) -> Value {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map_or(Value::Null, |v| Value::String(v.to_string()))
}

/// `/__mock/echo/`: authenticated; reflects the headers the client sent.
pub async fn echo(
    State(mock): State<MockKitchen>,
    method: Method,
    headers: HeaderMap,
) -> Result<Json<Value>, MockError> {
    mock.authenticate(&headers)?;
    Ok(Json(json!({
        "method": method.as_str(),
        "authorization": header_text(&headers, header::AUTHORIZATION.as_str()),
        "content_type": header_text(&headers, header::CONTENT_TYPE.as_str()),
        "restaurant_id": header_text(&headers, "x-restaurant-id"),
        "restaurant_slug": header_text(&headers, "x-restaurant-slug"),
    })))
}

/// `/__mock/empty/`: `200` with no body.
pub async fn empty() -> StatusCode {
    StatusCode::OK
}

/// `/__mock/not-json/`: `200` with an HTML body.
pub async fn not_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/html")],
        "<html><body>maintenance</body></html>",
    )
}

/// `/__mock/always-401/`: rejects every request, valid token or not.
pub async fn always_unauthorized() -> MockError {
    MockError::Unauthorized("Authentication credentials were not provided.".into())
}
