//! Opaque cursor encoding.
//!
//! Relay clients treat cursors as opaque strings. The raw cursor value of a row
//! (whatever the cursor expression evaluates to) is serialized as JSON and
//! wrapped in URL-safe base64 so it round-trips through query strings.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::Value as JsonValue;

use crate::{Error, Result};

/// Encode a raw cursor value as an opaque string.
pub fn encode_cursor(value: &JsonValue) -> String {
   URL_SAFE_NO_PAD.encode(value.to_string())
}

/// Decode an opaque string produced by [`encode_cursor`].
pub fn decode_cursor(cursor: &str) -> Result<JsonValue> {
   let bytes = URL_SAFE_NO_PAD
      .decode(cursor.trim())
      .map_err(|e| Error::MalformedCursor(e.to_string()))?;

   serde_json::from_slice(&bytes).map_err(|e| Error::MalformedCursor(e.to_string()))
}
