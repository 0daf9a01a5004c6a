//! Wire types for broker messages.
//!
//! The envelope and the records inside `data` are produced by a Go service;
//! byte fields arrive as standard base64 strings and record keys keep their
//! Go casing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SIGNATURE_RECONSTRUCTED_EVENT: &str = "signature_reconstructed";

/// Top-level broker message. Only `event` and `data` drive control flow; the
/// rest is metadata carried for logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEnvelope {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub dkg_round_id: String,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub event: String,
    #[serde(default, with = "serde_base64")]
    pub data: Vec<u8>,
    #[serde(default, with = "serde_base64")]
    pub signature: Vec<u8>,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub recipient: String,
    #[serde(default)]
    pub validator_id: u64,
}

/// One candidate record inside a `signature_reconstructed` batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconstructedSignature {
    #[serde(default, rename = "File")]
    pub file: String,
    #[serde(default, rename = "BatchID")]
    pub batch_id: String,
    #[serde(default, rename = "MessageID")]
    pub message_id: String,
    /// Claimed signing root of the change; must be exactly 32 bytes.
    #[serde(default, rename = "SrcPayload", with = "serde_base64")]
    pub src_payload: Vec<u8>,
    #[serde(default, rename = "Signature", with = "serde_base64")]
    pub signature: Vec<u8>,
    #[serde(default, rename = "Username")]
    pub username: String,
    #[serde(default, rename = "DKGRoundID")]
    pub dkg_round_id: String,
    #[serde(rename = "ValIdx")]
    pub validator_index: i64,
}

/// Top-level decode failure. The message is acknowledged and skipped, never
/// retried.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("malformed message envelope: {0}")]
    Envelope(#[source] serde_json::Error),
    #[error("malformed batch payload: {0}")]
    Batch(#[source] serde_json::Error),
}

pub(crate) mod serde_base64 {
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(Vec::new()),
            Some(encoded) => BASE64.decode(encoded).map_err(serde::de::Error::custom),
        }
    }
}
