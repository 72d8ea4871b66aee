//! Cursor encoding and decoding

use crate::error::{Error, Result};
use crate::types::Record;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Envelope version written into every token
pub const CURSOR_VERSION: u8 = 1;

/// A point in a partition's sort order: "resume after this record"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Partition key
    pub pk: String,
    /// Sort key
    pub sk: String,
}

impl Position {
    /// Create a position
    pub fn new(pk: impl Into<String>, sk: impl Into<String>) -> Self {
        Self {
            pk: pk.into(),
            sk: sk.into(),
        }
    }
}

impl From<&Record> for Position {
    fn from(record: &Record) -> Self {
        Self {
            pk: record.pk.clone(),
            sk: record.sk.clone(),
        }
    }
}

/// Decoded form of a token. Unknown fields are rejected.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Envelope {
    v: u8,
    pk: String,
    sk: String,
}

/// Stateless codec between [`Position`] and opaque tokens.
///
/// Tokens are encoded, not encrypted: anyone holding one can read or forge a
/// scan position. A deployment exposed to untrusted clients should encrypt
/// or sign them.
#[derive(Debug, Clone, Copy, Default)]
pub struct CursorCodec;

impl CursorCodec {
    /// Encode a position into a URL-safe token
    pub fn encode(position: &Position) -> String {
        let envelope = json!({
            "v": CURSOR_VERSION,
            "pk": position.pk,
            "sk": position.sk,
        });
        URL_SAFE_NO_PAD.encode(envelope.to_string())
    }

    /// Decode a token back into a position
    pub fn decode(token: &str) -> Result<Position> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|e| Error::malformed_cursor(format!("invalid base64: {e}")))?;

        let envelope: Envelope = serde_json::from_slice(&bytes)
            .map_err(|e| Error::malformed_cursor(format!("invalid envelope: {e}")))?;

        if envelope.v != CURSOR_VERSION {
            return Err(Error::malformed_cursor(format!(
                "unsupported version {}",
                envelope.v
            )));
        }
        if envelope.pk.is_empty() || envelope.sk.is_empty() {
            return Err(Error::malformed_cursor("empty key component"));
        }

        Ok(Position {
            pk: envelope.pk,
            sk: envelope.sk,
        })
    }

    /// Decode a token and check that it points into `partition`
    pub fn decode_for(token: &str, partition: &str) -> Result<Position> {
        let position = Self::decode(token)?;
        if position.pk != partition {
            return Err(Error::malformed_cursor(format!(
                "cursor belongs to partition '{}', not '{partition}'",
                position.pk
            )));
        }
        Ok(position)
    }
}
