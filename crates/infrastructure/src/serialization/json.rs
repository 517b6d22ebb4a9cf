//! JSON serialization helpers.

use restcheck_domain::{Payload, RequestBody};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

/// Error type for serialization operations.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// JSON deserialization failed.
    #[error("JSON deserialization failed: {0}")]
    Deserialize(serde_json::Error),
}

/// Serializes a value to compact JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_compact<T: Serialize>(value: &T) -> Result<String, SerializationError> {
    Ok(serde_json::to_string(value)?)
}

/// Deserializes JSON from a string.
///
/// # Errors
///
/// Returns an error if the JSON is invalid or doesn't match the expected type.
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, SerializationError> {
    serde_json::from_str(json).map_err(SerializationError::Deserialize)
}

/// Validates that JSON can be parsed without deserializing to a specific type.
///
/// # Errors
///
/// Returns an error if the JSON is invalid.
pub fn validate_json(json: &str) -> Result<serde_json::Value, SerializationError> {
    serde_json::from_str(json).map_err(SerializationError::Deserialize)
}

/// Encodes a payload as a request body with the given content type.
///
/// The content type is never corrected. A value that is not a MIME type, or
/// that does not declare JSON, is logged and sent as given.
///
/// # Errors
///
/// Returns an error if the payload cannot be serialized.
pub fn encode_payload(
    payload: &Payload,
    content_type: &str,
) -> Result<RequestBody, SerializationError> {
    inspect_content_type(content_type);
    let content = to_json_compact(payload)?;
    Ok(RequestBody::with_content_type(content_type, content))
}

/// Returns true if `content_type` parses as a MIME type declaring JSON
/// (`application/json` or a `+json` suffix).
#[must_use]
pub fn declares_json(content_type: &str) -> bool {
    content_type.parse::<mime::Mime>().is_ok_and(|m| {
        m.subtype() == mime::JSON || m.suffix() == Some(mime::JSON)
    })
}

fn inspect_content_type(content_type: &str) {
    match content_type.parse::<mime::Mime>() {
        Err(e) => warn!(content_type, error = %e, "malformed content type, sending verbatim"),
        Ok(_) if !declares_json(content_type) => {
            warn!(content_type, "content type does not declare JSON, sending verbatim");
        }
        Ok(_) => {}
    }
}
