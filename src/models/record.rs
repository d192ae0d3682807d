//! Attribute maps exchanged with adapters.

use crate::{Error, Result};
use serde_json::{Map, Value};

/// A single record returned by a read: attribute name to value.
pub type Record = Map<String, Value>;

/// Bound query parameters: parameter name to value.
pub type Parameters = Map<String, Value>;

/// Converts a JSON value into [`Parameters`].
///
/// `null` yields an empty map; anything other than an object is rejected.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] when `value` is not an object or `null`.
pub fn parameters_from_json(value: Value) -> Result<Parameters> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Parameters::new()),
        other => Err(Error::InvalidInput(format!(
            "query parameters must be a JSON object, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parameters_from_object() {
        let params = parameters_from_json(json!({"episode_id": "ep-1", "limit": 3}))
            .expect("object parameters");
        assert_eq!(params.len(), 2);
        assert_eq!(params["episode_id"], json!("ep-1"));
    }

    #[test]
    fn test_parameters_from_null_is_empty() {
        let params = parameters_from_json(Value::Null).expect("null parameters");
        assert!(params.is_empty());
    }

    #[test]
    fn test_parameters_reject_non_objects() {
        let err = parameters_from_json(json!(["ep-1"])).expect_err("array rejected");
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
