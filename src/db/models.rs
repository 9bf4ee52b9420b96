use serde_json::Value;

/// One row of the session table, with `sessionData` already decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub session_id: String,
    pub session_data: Option<Value>,
}

impl SessionRecord {
    pub fn new(session_id: impl Into<String>, session_data: Value) -> Self {
        Self {
            session_id: session_id.into(),
            session_data: Some(session_data),
        }
    }

    /// A record counts as loaded only when it carries data.
    pub fn is_loaded(&self) -> bool {
        self.session_data.is_some()
    }
}

/// Encode a payload for the `sessionData` column. JSON `null` is stored as SQL NULL.
pub fn encode_session_data(data: Option<&Value>) -> Result<Option<String>, serde_json::Error> {
    match data {
        None | Some(Value::Null) => Ok(None),
        Some(v) => serde_json::to_string(v).map(Some),
    }
}

/// Decode a `sessionData` column. Empty, NULL or unparseable text reads as absent.
pub fn decode_session_data(raw: Option<&str>) -> Option<Value> {
    let raw = raw.filter(|s| !s.is_empty())?;
    serde_json::from_str::<Value>(raw)
        .ok()
        .filter(|v| !v.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_degrades_to_none() {
        assert_eq!(decode_session_data(None), None);
        assert_eq!(decode_session_data(Some("")), None);
        assert_eq!(decode_session_data(Some("{not json")), None);
        assert_eq!(decode_session_data(Some("null")), None);
        assert_eq!(decode_session_data(Some(r#"{"a":1}"#)), Some(json!({"a": 1})));
    }

    #[test]
    fn encode_maps_null_to_sql_null() {
        assert_eq!(encode_session_data(None).unwrap(), None);
        assert_eq!(encode_session_data(Some(&Value::Null)).unwrap(), None);
        assert_eq!(
            encode_session_data(Some(&json!({"a": [1, 2]}))).unwrap(),
            Some(r#"{"a":[1,2]}"#.to_string())
        );
    }
}
