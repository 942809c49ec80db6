//! List responses.
//!
//! List endpoints return a bare array when pagination is disabled on the
//! backend and `{count, next, previous, results}` when it is enabled.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Extract the items of a list response regardless of pagination.
///
/// Any other shape (an object without `results`, an empty body normalised to
/// `{}`) yields an empty list.
///
/// # Examples
///
/// ```
/// use kitchen_models::unwrap_list;
/// use serde_json::json;
///
/// let plain: Vec<i32> = unwrap_list(json!([1, 2])).unwrap();
/// let paged: Vec<i32> = unwrap_list(json!({"count": 2, "results": [1, 2]})).unwrap();
/// assert_eq!(plain, paged);
/// ```
pub fn unwrap_list<T: DeserializeOwned>(data: Value) -> Result<Vec<T>, serde_json::Error> {
    match data {
        Value::Array(_) => serde_json::from_value(data),
        Value::Object(mut map) => match map.remove("results") {
            Some(results @ Value::Array(_)) => serde_json::from_value(results),
            _ => Ok(Vec::new()),
        },
        _ => Ok(Vec::new()),
    }
}
