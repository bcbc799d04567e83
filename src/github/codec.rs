//! Content encoding for the contents API.
//!
//! Bodies travel as standard padded base64 of the document's UTF-8 bytes, so
//! any Unicode text survives the trip.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::ApiError;

/// Encode document text for a create/update payload.
pub fn encode_content(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}

/// Decode a `content` field returned by the API.
///
/// The API wraps base64 at 60 columns, so ASCII whitespace is ignored.
pub fn decode_content(encoded: &str) -> Result<String, ApiError> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| ApiError::Decode(format!("invalid base64 content: {e}")))?;
    String::from_utf8(bytes).map_err(|e| ApiError::Decode(format!("content is not UTF-8: {e}")))
}
