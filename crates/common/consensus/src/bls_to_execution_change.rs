use std::fmt;

use alloy_primitives::{aliases::B32, B256};
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

use crate::{
    constants::DOMAIN_BLS_TO_EXECUTION_CHANGE,
    misc::{compute_domain, compute_signing_root},
    pubkey::PubKey,
};

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct BLSToExecutionChange {
    pub validator_index: u64,
    pub from_bls_pubkey: PubKey,
    /// 32 bytes on the wire; a 20-byte execution address arrives zero-padded.
    pub to_execution_address: B256,
}

impl BLSToExecutionChange {
    /// Signing root of this change under the withdrawal-credential-change
    /// domain: hash tree root combined with
    /// `compute_domain(DOMAIN_BLS_TO_EXECUTION_CHANGE, fork_version, genesis_validators_root)`.
    pub fn signing_root(&self, fork_version: B32, genesis_validators_root: B256) -> B256 {
        let domain = compute_domain(
            DOMAIN_BLS_TO_EXECUTION_CHANGE,
            Some(fork_version),
            Some(genesis_validators_root),
        );
        compute_signing_root(self, domain)
    }
}

impl fmt::Display for BLSToExecutionChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = serde_json::json!({
            "validator_index": self.validator_index,
            "from_bls_pubkey": hex::encode(&self.from_bls_pubkey.inner[..]),
            "to_execution_address": hex::encode(self.to_execution_address),
        });
        match serde_json::to_string_pretty(&view) {
            Ok(rendered) => f.write_str(&rendered),
            Err(_) => write!(f, "BLSToExecutionChange({})", self.validator_index),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use alloy_primitives::hex::{self, FromHex};
    use rstest::rstest;
    use ssz::{Decode, Encode};
    use tree_hash::TreeHash;

    use super::*;

    fn change(validator_index: u64, pubkey: &str, address: &str) -> BLSToExecutionChange {
        BLSToExecutionChange {
            validator_index,
            from_bls_pubkey: PubKey::from_bytes(&hex::decode(pubkey).unwrap()).unwrap(),
            to_execution_address: B256::from_str(address).unwrap(),
        }
    }

    #[rstest]
    #[case(
        "0xcc2551df58aaecfcaf489ba0ff958199e2783f7169e7685e950b418dd239508d",
        "0100000000000000b39a7cd619b29b7e2fcc7a9d4401dce4acbd7b35a6ad6737a5c5be5a8ae45a7c24a8a26a74d53522b1215a3b0d350d39000000000000000000000000b9d7934878b5fb9610b3fe8a5e441e8fad7e293f",
        1,
        "b39a7cd619b29b7e2fcc7a9d4401dce4acbd7b35a6ad6737a5c5be5a8ae45a7c24a8a26a74d53522b1215a3b0d350d39",
        "0x000000000000000000000000b9d7934878b5fb9610b3fe8a5e441e8fad7e293f"
    )]
    #[case(
        "0x88f75d96453b7f24db88981f5e6f4067d7080472a0fee95b0639a9cc12f3510c",
        "c848000000000000a5e8702533f8a989cf5b53264905f06c1e60d5c1292a7fb89b4d2fed3e2fb6c5f1f4b2b24b59a1a28f574a3ae1f05c9ae6b2c3f98d0d64e1c72d9f6dd25cbd2ef30c0da2000000000000000000000000",
        18632,
        "a5e8702533f8a989cf5b53264905f06c1e60d5c1292a7fb89b4d2fed3e2fb6c5f1f4b2b24b59a1a28f574a3ae1f05c9a",
        "0xe6b2c3f98d0d64e1c72d9f6dd25cbd2ef30c0da2000000000000000000000000"
    )]
    fn test_bls_to_execution_change(
        #[case] hash_root: &str,
        #[case] ssz_hex: &str,
        #[case] validator_index: u64,
        #[case] pubkey: &str,
        #[case] address: &str,
    ) {
        let hash_root = B256::from_str(hash_root).unwrap();
        let change = change(validator_index, pubkey, address);

        let ssz = hex::decode(ssz_hex).unwrap();

        assert_eq!(ssz, change.as_ssz_bytes());
        assert_eq!(change, BLSToExecutionChange::from_ssz_bytes(&ssz).unwrap());
        assert_eq!(hash_root, change.tree_hash_root());
    }

    #[rstest]
    #[case(
        "0x00000000",
        "0x490a9b1bfda9575c437313365d145dbc9ab314c599c31d51595027c0cda0a0ed"
    )]
    #[case(
        "0x03000000",
        "0x163541bc283d9b8f8aaeee05c6bcaca6b6a0f5c6a3af215f3b7097c000ee43b2"
    )]
    fn test_signing_root(#[case] fork_version: &str, #[case] expected: &str) {
        let change = change(
            1,
            "b39a7cd619b29b7e2fcc7a9d4401dce4acbd7b35a6ad6737a5c5be5a8ae45a7c24a8a26a74d53522b1215a3b0d350d39",
            "0x000000000000000000000000b9d7934878b5fb9610b3fe8a5e441e8fad7e293f",
        );
        let fork_version = B32::from_hex(fork_version).unwrap();

        let signing_root = change.signing_root(fork_version, B256::default());

        assert_eq!(signing_root, B256::from_str(expected).unwrap());
        // Pure function of the input bytes.
        assert_eq!(
            signing_root,
            change.signing_root(fork_version, B256::default())
        );
    }

    #[rstest]
    #[case("0x01000000")]
    #[case("0x00010000")]
    #[case("0x00000100")]
    #[case("0x00000001")]
    fn test_signing_root_fork_version_sensitivity(#[case] flipped: &str) {
        let change = change(
            18632,
            "a5e8702533f8a989cf5b53264905f06c1e60d5c1292a7fb89b4d2fed3e2fb6c5f1f4b2b24b59a1a28f574a3ae1f05c9a",
            "0xe6b2c3f98d0d64e1c72d9f6dd25cbd2ef30c0da2000000000000000000000000",
        );
        let base = change.signing_root(B32::default(), B256::default());
        let flipped = change.signing_root(B32::from_hex(flipped).unwrap(), B256::default());
        assert_ne!(base, flipped);
    }

    #[test]
    fn test_display_renders_hex_fields() {
        let change = change(
            1,
            "b39a7cd619b29b7e2fcc7a9d4401dce4acbd7b35a6ad6737a5c5be5a8ae45a7c24a8a26a74d53522b1215a3b0d350d39",
            "0x000000000000000000000000b9d7934878b5fb9610b3fe8a5e441e8fad7e293f",
        );
        let rendered = change.to_string();
        assert!(rendered.contains("\"validator_index\": 1"));
        assert!(rendered.contains("b39a7cd619b29b7e"));
    }
}
