use serde_json::Value;

/// Response body of `GET /api/session/{id}` on the session generator.
#[derive(Debug, Default)]
pub struct SessionEnvelope {
    pub data: Option<Value>,
}

impl SessionEnvelope {
    /// Lenient body parse: anything that is not a JSON object yields an empty envelope.
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(mut map)) => Self {
                data: map.remove("data"),
            },
            _ => Self::default(),
        }
    }

    /// Extract the credential payload.
    ///
    /// `data` may be a JSON-encoded string or an already structured value.
    /// Falsy `data` (null, `false`, `0`, empty string) and strings encoding
    /// `null` count as no payload.
    pub fn into_payload(self) -> Result<Option<Value>, serde_json::Error> {
        let payload = match self.data {
            None | Some(Value::Null) | Some(Value::Bool(false)) => return Ok(None),
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => return Ok(None),
            Some(Value::String(s)) if s.is_empty() => return Ok(None),
            Some(Value::String(s)) => serde_json::from_str::<Value>(&s)?,
            Some(other) => other,
        };
        Ok((!payload.is_null()).then_some(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_data_is_parsed() {
        let env = SessionEnvelope::from_body(br#"{"data":"{\"noiseKey\":{\"id\":1}}"}"#);
        assert_eq!(
            env.into_payload().unwrap(),
            Some(json!({"noiseKey": {"id": 1}}))
        );
    }

    #[test]
    fn structured_data_is_used_directly() {
        let env = SessionEnvelope::from_body(br#"{"data":{"me":"123@s.whatsapp.net"}}"#);
        assert_eq!(
            env.into_payload().unwrap(),
            Some(json!({"me": "123@s.whatsapp.net"}))
        );
    }

    #[test]
    fn missing_or_empty_data_is_no_payload() {
        let bodies: [&[u8]; 9] = [
            br#"{}"#,
            br#"{"data":null}"#,
            br#"{"data":false}"#,
            br#"{"data":0}"#,
            br#"{"data":0.0}"#,
            br#"{"data":""}"#,
            br#"{"data":"null"}"#,
            br#"not json"#,
            br#"[1,2]"#,
        ];
        for body in bodies {
            let env = SessionEnvelope::from_body(body);
            assert_eq!(env.into_payload().unwrap(), None, "body: {:?}", body);
        }
    }

    #[test]
    fn truthy_scalars_are_kept() {
        let env = SessionEnvelope::from_body(br#"{"data":true}"#);
        assert_eq!(env.into_payload().unwrap(), Some(json!(true)));
        let env = SessionEnvelope::from_body(br#"{"data":"false"}"#);
        assert_eq!(env.into_payload().unwrap(), Some(json!(false)));
    }

    #[test]
    fn malformed_string_data_is_an_error() {
        let env = SessionEnvelope::from_body(br#"{"data":"{broken"}"#);
        assert!(env.into_payload().is_err());
    }
}
