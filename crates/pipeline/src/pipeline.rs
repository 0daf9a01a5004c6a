use alloy_primitives::{aliases::B32, B256};
use blst::min_pk::PublicKey;
use serde_json::Value;
use tracing::{debug, error, info, warn};
use wcsig_consensus::{
    bls,
    bls_to_execution_change::BLSToExecutionChange,
    constants::DOMAIN_BLS_TO_EXECUTION_CHANGE,
    misc::{compute_domain, compute_signing_root},
    pubkey::PubKey,
};

use crate::{
    envelope::{
        EnvelopeError, MessageEnvelope, ReconstructedSignature, SIGNATURE_RECONSTRUCTED_EVENT,
    },
    ledger::DedupLedger,
    outcome::{AcceptedOutcome, RecordOutcome, RejectReason, SignatureError},
};

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub from_bls_pubkey: PubKey,
    pub to_execution_address: B256,
    pub fork_version: B32,
    pub genesis_validators_root: B256,
    pub check_signature: bool,
    /// Expected number of distinct validators; drives progress reporting
    /// only.
    pub expected_total: u64,
}

/// Runs each candidate record through decode → dedup → signing-root
/// recomputation → root comparison → signature verification, and classifies
/// it as accepted, duplicate, or invalid. A single instance owns the dedup
/// ledger for the whole run.
pub struct Pipeline {
    from_bls_pubkey: PubKey,
    public_key: PublicKey,
    to_execution_address: B256,
    domain: B256,
    check_signature: bool,
    expected_total: u64,
    ledger: DedupLedger,
    accepted: u64,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> anyhow::Result<Self> {
        let public_key = bls::parse_public_key(&config.from_bls_pubkey)?;
        // The domain only depends on static configuration; fix it up front.
        let domain = compute_domain(
            DOMAIN_BLS_TO_EXECUTION_CHANGE,
            Some(config.fork_version),
            Some(config.genesis_validators_root),
        );
        Ok(Self {
            from_bls_pubkey: config.from_bls_pubkey,
            public_key,
            to_execution_address: config.to_execution_address,
            domain,
            check_signature: config.check_signature,
            expected_total: config.expected_total,
            ledger: DedupLedger::new(),
            accepted: 0,
        })
    }

    /// Number of records accepted so far in this run.
    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Processes one broker message. Messages with an unrelated event decode
    /// to an empty batch; per-record faults are reported as outcomes and
    /// never abort the batch.
    pub fn process_message(
        &mut self,
        payload: &[u8],
        offset: u64,
    ) -> Result<Vec<RecordOutcome>, EnvelopeError> {
        let envelope: MessageEnvelope =
            serde_json::from_slice(payload).map_err(EnvelopeError::Envelope)?;

        if envelope.event != SIGNATURE_RECONSTRUCTED_EVENT {
            debug!(id = %envelope.id, event = %envelope.event, "skipping unrelated event");
            return Ok(Vec::new());
        }

        let records: Vec<Value> =
            serde_json::from_slice(&envelope.data).map_err(EnvelopeError::Batch)?;

        Ok(records
            .into_iter()
            .map(|record| self.process_record(record, offset))
            .collect())
    }

    fn process_record(&mut self, record: Value, offset: u64) -> RecordOutcome {
        let candidate = match serde_json::from_value::<ReconstructedSignature>(record.clone()) {
            Ok(candidate) => candidate,
            Err(err) => {
                let validator_index = record.get("ValIdx").and_then(Value::as_u64);
                warn!(validator_index, error = %err, "rejecting undecodable record");
                return RecordOutcome::Rejected {
                    validator_index,
                    reason: RejectReason::Decode(err.to_string()),
                };
            }
        };

        let Ok(validator_index) = u64::try_from(candidate.validator_index) else {
            warn!(
                validator_index = candidate.validator_index,
                "rejecting record with negative validator index"
            );
            return RecordOutcome::Rejected {
                validator_index: None,
                reason: RejectReason::Decode(format!(
                    "negative validator index {}",
                    candidate.validator_index
                )),
            };
        };

        let claimed_root = match <[u8; 32]>::try_from(candidate.src_payload.as_slice()) {
            Ok(bytes) => B256::from(bytes),
            Err(_) => {
                warn!(
                    validator_index,
                    length = candidate.src_payload.len(),
                    "rejecting record with malformed claimed signing root"
                );
                return RecordOutcome::Rejected {
                    validator_index: Some(validator_index),
                    reason: RejectReason::Decode(format!(
                        "claimed signing root must be 32 bytes, got {}",
                        candidate.src_payload.len()
                    )),
                };
            }
        };

        if !self.ledger.accept_if_new(validator_index) {
            debug!(validator_index, "skipping duplicate record");
            return RecordOutcome::Rejected {
                validator_index: Some(validator_index),
                reason: RejectReason::Duplicate,
            };
        }

        let change = BLSToExecutionChange {
            validator_index,
            from_bls_pubkey: self.from_bls_pubkey.clone(),
            to_execution_address: self.to_execution_address,
        };
        let expected_root = compute_signing_root(&change, self.domain);

        if expected_root != claimed_root {
            error!(
                validator_index,
                expected = %expected_root,
                claimed = %claimed_root,
                "claimed signing root does not match recomputation"
            );
            debug!(validator_index, change = %change, "recomputed change");
            return RecordOutcome::Rejected {
                validator_index: Some(validator_index),
                reason: RejectReason::RootMismatch {
                    expected: expected_root,
                    claimed: claimed_root,
                },
            };
        }

        let signature = match bls::parse_signature(&candidate.signature) {
            Ok(signature) => signature,
            Err(err) => {
                error!(validator_index, error = %err, "rejecting malformed signature");
                return RecordOutcome::Rejected {
                    validator_index: Some(validator_index),
                    reason: SignatureError::Malformed(err.to_string()).into(),
                };
            }
        };

        if self.check_signature && !bls::verify(&signature, expected_root, &self.public_key) {
            error!(validator_index, "signature does not verify against the signing root");
            return RecordOutcome::Rejected {
                validator_index: Some(validator_index),
                reason: SignatureError::Mismatch.into(),
            };
        }

        self.accepted += 1;
        let percentage = if self.expected_total > 0 {
            self.accepted as f64 * 100.0 / self.expected_total as f64
        } else {
            0.0
        };
        info!(
            offset,
            validator_index,
            signature = %hex::encode(&candidate.signature),
            accepted = self.accepted,
            expected_total = self.expected_total,
            "accepted, {percentage:.2}% done"
        );

        RecordOutcome::Accepted(AcceptedOutcome {
            validator_index,
            signature: candidate.signature,
            signing_root: expected_root,
            source_offset: offset,
        })
    }
}
