use alloy_primitives::aliases::B32;

pub const DOMAIN_BLS_TO_EXECUTION_CHANGE: B32 = B32::new([0x0a, 0x00, 0x00, 0x00]);

pub const DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";
