use alloy_primitives::B256;
use anyhow::anyhow;
use blst::{
    min_pk::{PublicKey, Signature},
    BLST_ERROR,
};

use crate::{constants::DST, pubkey::PubKey};

/// Decodes a compressed public key, rejecting wrong lengths and encodings
/// that are not a point on the curve.
pub fn parse_public_key(pubkey: &PubKey) -> anyhow::Result<PublicKey> {
    PublicKey::from_bytes(&pubkey.inner)
        .map_err(|err| anyhow!("failed to parse BLS public key: {err:?}"))
}

/// Decodes a compressed signature. Decode failures are distinct from a
/// signature that parses but does not verify.
pub fn parse_signature(bytes: &[u8]) -> anyhow::Result<Signature> {
    Signature::from_bytes(bytes).map_err(|err| anyhow!("failed to parse BLS signature: {err:?}"))
}

pub fn verify(signature: &Signature, signing_root: B256, public_key: &PublicKey) -> bool {
    signature.fast_aggregate_verify(true, signing_root.as_slice(), DST, &[public_key])
        == BLST_ERROR::BLST_SUCCESS
}
