//! Response body handling.
//!
//! Bodies are parsed leniently: an empty or malformed body becomes `{}`
//! instead of a parse error, so callers always get the same shape. A
//! non-success status turns into [`SdkError::Http`] with a message taken
//! from the body.

use reqwest::{Response, StatusCode};
use serde_json::{Map, Value};

use crate::error::SdkError;

/// Parse a body as JSON, substituting `{}` when it is empty or malformed.
pub fn parse_lenient(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Object(Map::new());
    }
    serde_json::from_slice(bytes).unwrap_or_else(|_| Value::Object(Map::new()))
}

/// Message for a failed request: `detail`, then `message`, then the first
/// of `non_field_errors`, then a generic text with the status code.
pub fn error_message(status: StatusCode, body: &Value) -> String {
    let text = |value: Option<&Value>| {
        value
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(String::from)
    };

    text(body.get("detail"))
        .or_else(|| text(body.get("message")))
        .or_else(|| text(body.get("non_field_errors").and_then(|v| v.get(0))))
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()))
}

/// Read a JSON body, failing with [`SdkError::Http`] on a non-success
/// status.
pub async fn read_json(response: Response) -> Result<Value, SdkError> {
    let status = response.status();
    let url = response.url().to_string();
    let bytes = response
        .bytes()
        .await
        .map_err(|source| SdkError::Network { url, source })?;
    let body = parse_lenient(&bytes);

    if !status.is_success() {
        return Err(SdkError::Http {
            status: status.as_u16(),
            message: error_message(status, &body),
            body,
        });
    }
    Ok(body)
}

/// Read a binary body (CSV exports). On a non-success status the raw text
/// becomes the error message.
pub async fn read_bytes(response: Response) -> Result<Vec<u8>, SdkError> {
    let status = response.status();
    let url = response.url().to_string();
    let bytes = response
        .bytes()
        .await
        .map_err(|source| SdkError::Network { url, source })?;

    if !status.is_success() {
        let body = parse_lenient(&bytes);
        let text = String::from_utf8_lossy(&bytes);
        let message = if body.get("detail").is_some() || body.get("message").is_some() {
            error_message(status, &body)
        } else if text.trim().is_empty() {
            "Export failed".to_string()
        } else {
            text.trim().to_string()
        };
        return Err(SdkError::Http {
            status: status.as_u16(),
            message,
            body,
        });
    }
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_and_malformed_bodies_become_empty_object() {
        assert_eq!(parse_lenient(b""), json!({}));
        assert_eq!(parse_lenient(b"  \n"), json!({}));
        assert_eq!(parse_lenient(b"<html>oops</html>"), json!({}));
        assert_eq!(parse_lenient(b"[1,2]"), json!([1, 2]));
    }

    #[test]
    fn message_precedence() {
        let status = StatusCode::BAD_REQUEST;
        let all = json!({
            "detail": "detail wins",
            "message": "message",
            "non_field_errors": ["nfe"]
        });
        assert_eq!(error_message(status, &all), "detail wins");
        assert_eq!(
            error_message(status, &json!({"message": "m", "non_field_errors": ["nfe"]})),
            "m"
        );
        assert_eq!(
            error_message(status, &json!({"non_field_errors": ["Passwords do not match."]})),
            "Passwords do not match."
        );
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, &json!({})),
            "Request failed with status 500"
        );
    }

    #[test]
    fn non_string_fields_are_skipped() {
        let body = json!({"detail": {"code": 1}, "non_field_errors": []});
        assert_eq!(
            error_message(StatusCode::CONFLICT, &body),
            "Request failed with status 409"
        );
    }
}
