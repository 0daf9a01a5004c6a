pub mod bls;
pub mod bls_to_execution_change;
pub mod constants;
pub mod fork_data;
pub mod misc;
pub mod pubkey;
pub mod signature;
pub mod signing_data;
