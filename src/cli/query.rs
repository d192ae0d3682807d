//! Raw query command.

use super::{to_json, write_line};
use crate::models::Parameters;
use crate::storage::GraphBackend;
use crate::{Error, Result};
use serde_json::Value;
use std::io::Write;

/// Parses a `key=value` parameter.
///
/// The value is read as JSON when it parses, otherwise as a plain string, so
/// `limit=3` binds a number and `id=ep-1` binds a string.
pub fn parse_param(raw: &str) -> Result<(String, Value)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| Error::InvalidInput(format!("parameter must be key=value: {raw}")))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(Error::InvalidInput(format!("parameter name is empty: {raw}")));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Runs a native query and prints each returned record as a JSON line.
///
/// Returns the number of records printed.
pub async fn cmd_query(
    backend: &dyn GraphBackend,
    text: &str,
    params: &[String],
    out: &mut impl Write,
) -> Result<usize> {
    let mut parameters = Parameters::new();
    for raw in params {
        let (key, value) = parse_param(raw)?;
        parameters.insert(key, value);
    }

    let records = backend.execute_query(text, parameters).await?;
    for record in &records {
        write_line(out, to_json(record)?)?;
    }
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::ConnectOptions;
    use crate::storage::testing::StubAdapter;
    use serde_json::json;
    use test_case::test_case;

    #[test_case("limit=3", "limit", json!(3) ; "number")]
    #[test_case("id=ep-1", "id", json!("ep-1") ; "bare string")]
    #[test_case("id=\"ep-1\"", "id", json!("ep-1") ; "quoted string")]
    #[test_case("tags=[\"a\",\"b\"]", "tags", json!(["a", "b"]) ; "array")]
    #[test_case("expr=a=b", "expr", json!("a=b") ; "value with equals")]
    #[test_case("empty=", "empty", json!("") ; "empty value")]
    fn test_parse_param(raw: &str, key: &str, value: Value) {
        assert_eq!(parse_param(raw).expect("param"), (key.to_string(), value));
    }

    #[test_case("novalue" ; "missing equals")]
    #[test_case("=3" ; "missing key")]
    fn test_parse_param_rejects(raw: &str) {
        assert!(matches!(parse_param(raw), Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_query_binds_parameters() {
        let backend: Box<dyn GraphBackend> = Box::new(StubAdapter::default());
        backend
            .connect(&ConnectOptions::new("stub://", "", ""))
            .await
            .expect("connect");

        let mut out = Vec::new();
        let count = cmd_query(
            backend.as_ref(),
            "CREATE",
            &["id=ep-9".to_string(), "n=2".to_string()],
            &mut out,
        )
        .await
        .expect("query");
        assert_eq!(count, 1);

        let line: Value =
            serde_json::from_str(String::from_utf8(out).expect("utf8").trim()).expect("json");
        assert_eq!(line, json!({"id": "ep-9", "n": 2}));
    }
}
