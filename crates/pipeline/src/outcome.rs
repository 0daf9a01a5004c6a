use alloy_primitives::B256;
use thiserror::Error;

/// Audit record for a first-time, fully verified acceptance. Immutable once
/// produced.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedOutcome {
    pub validator_index: u64,
    pub signature: Vec<u8>,
    pub signing_root: B256,
    pub source_offset: u64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignatureError {
    #[error("malformed signature encoding: {0}")]
    Malformed(String),
    #[error("signature does not verify against the signing root")]
    Mismatch,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RejectReason {
    #[error("malformed record: {0}")]
    Decode(String),
    /// Expected on replay; the index was already accepted in this run.
    #[error("validator index already seen in this run")]
    Duplicate,
    /// The claimed root does not match recomputation. Evidence of tampering
    /// or a protocol/config mismatch.
    #[error("claimed signing root {claimed} does not match recomputed {expected}")]
    RootMismatch { expected: B256, claimed: B256 },
    #[error(transparent)]
    Signature(#[from] SignatureError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    Accepted(AcceptedOutcome),
    Rejected {
        validator_index: Option<u64>,
        reason: RejectReason,
    },
}

impl RecordOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, RecordOutcome::Accepted(_))
    }
}
