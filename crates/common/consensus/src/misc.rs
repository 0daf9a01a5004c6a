use alloy_primitives::{aliases::B32, B256};
use tree_hash::TreeHash;

use crate::{fork_data::ForkData, signing_data::SigningData};

/// Builds the 32-byte domain: the 4-byte domain type followed by the first
/// 28 bytes of the fork-data root. `None` stands for the zero version/root.
pub fn compute_domain(
    domain_type: B32,
    fork_version: Option<B32>,
    genesis_validators_root: Option<B256>,
) -> B256 {
    let fork_data_root = ForkData {
        current_version: fork_version.unwrap_or_default(),
        genesis_validators_root: genesis_validators_root.unwrap_or_default(),
    }
    .tree_hash_root();

    let mut domain = [0u8; 32];
    domain[..4].copy_from_slice(domain_type.as_slice());
    domain[4..].copy_from_slice(&fork_data_root[..28]);
    B256::from(domain)
}

pub fn compute_signing_root<SSZObject: TreeHash>(ssz_object: &SSZObject, domain: B256) -> B256 {
    SigningData {
        object_root: ssz_object.tree_hash_root(),
        domain,
    }
    .tree_hash_root()
}
