//! Decoding of gateway responses into domain types.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::ClientError;

/// Decode a response body that must be present.
pub(crate) fn decode<T: DeserializeOwned>(path: &str, body: Option<Value>) -> Result<T, ClientError> {
    let value = body.ok_or_else(|| ClientError::unexpected(path, "empty response body"))?;
    decode_value(path, value)
}

pub(crate) fn decode_value<T: DeserializeOwned>(path: &str, value: Value) -> Result<T, ClientError> {
    serde_json::from_value(value).map_err(|e| {
        tracing::warn!(path, error = %e, "Could not decode response body");
        ClientError::unexpected(path, e)
    })
}

/// Serialize a request body. Domain request types are plain data, so this
/// only fails on a broken `Serialize` impl.
pub(crate) fn encode<T: serde::Serialize>(path: &str, body: &T) -> Result<Value, ClientError> {
    serde_json::to_value(body).map_err(|e| ClientError::unexpected(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_body_is_unexpected_response() {
        let err = decode::<u32>("/api/x/", None).unwrap_err();
        assert!(matches!(err, ClientError::UnexpectedResponse { ref path, .. } if path == "/api/x/"));
    }

    #[test]
    fn wrong_shape_is_unexpected_response() {
        let err = decode::<u32>("/api/x/", Some(json!("nope"))).unwrap_err();
        assert!(matches!(err, ClientError::UnexpectedResponse { .. }));
    }

    #[test]
    fn decodes_present_body() {
        assert_eq!(decode::<u32>("/api/x/", Some(json!(7))).unwrap(), 7);
    }
}
