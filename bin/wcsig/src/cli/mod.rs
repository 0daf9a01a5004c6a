use std::path::PathBuf;

use alloy_primitives::{aliases::B32, B256};
use anyhow::{ensure, Context};
use clap::Parser;
use wcsig_consensus::pubkey::PubKey;
use wcsig_pipeline::PipelineConfig;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Aggregated BLS public key of the signer set (48 bytes of hex)
    #[arg(long, env = "AGGREGATED_BLS_PUB_KEY")]
    pub aggregated_pubkey: String,

    /// Destination execution-address field (32 bytes of hex)
    #[arg(long, env = "EXECUTION_ADDRESS")]
    pub execution_address: String,

    /// Fork version the changes were signed against (4 bytes of hex)
    #[arg(long, env = "FORK_VERSION")]
    pub fork_version: String,

    /// Genesis validators root for domain separation (32 bytes of hex)
    #[arg(
        long,
        env = "GENESIS_VALIDATORS_ROOT",
        default_value = "0x0000000000000000000000000000000000000000000000000000000000000000"
    )]
    pub genesis_validators_root: String,

    /// Verify the BLS signature of every record
    #[arg(
        long,
        env = "CHECK_SIGNATURE",
        action = clap::ArgAction::Set,
        default_value_t = true
    )]
    pub check_signature: bool,

    /// Expected number of distinct validators, used for progress reporting
    #[arg(long, env = "EXPECTED_TOTAL", default_value_t = 18632)]
    pub expected_total: u64,

    /// Newline-delimited JSON file of broker messages to replay
    #[arg(long, env = "REPLAY_FILE")]
    pub replay_file: PathBuf,

    /// Append-only CSV audit trail destination
    #[arg(long, env = "OUTPUT_FILE", default_value = "output.csv")]
    pub output_file: PathBuf,
}

impl Cli {
    pub fn pipeline_config(&self) -> anyhow::Result<PipelineConfig> {
        let pubkey = decode_hex(&self.aggregated_pubkey, 48, "aggregated BLS public key")?;
        let address = decode_hex(&self.execution_address, 32, "execution address")?;
        let fork_version = decode_hex(&self.fork_version, 4, "fork version")?;
        let genesis_validators_root =
            decode_hex(&self.genesis_validators_root, 32, "genesis validators root")?;

        Ok(PipelineConfig {
            from_bls_pubkey: PubKey::from_bytes(&pubkey)?,
            to_execution_address: B256::from_slice(&address),
            fork_version: B32::from_slice(&fork_version),
            genesis_validators_root: B256::from_slice(&genesis_validators_root),
            check_signature: self.check_signature,
            expected_total: self.expected_total,
        })
    }
}

/// Exact-length hex decoding; a short value is an error, never padded.
fn decode_hex(value: &str, expected_len: usize, what: &str) -> anyhow::Result<Vec<u8>> {
    let bytes = hex::decode(value.trim_start_matches("0x"))
        .with_context(|| format!("could not decode {what}"))?;
    ensure!(
        bytes.len() == expected_len,
        "{what} must be {expected_len} bytes, got {}",
        bytes.len()
    );
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUBKEY: &str = "b39a7cd619b29b7e2fcc7a9d4401dce4acbd7b35a6ad6737a5c5be5a8ae45a7c24a8a26a74d53522b1215a3b0d350d39";
    const ADDRESS: &str = "000000000000000000000000b9d7934878b5fb9610b3fe8a5e441e8fad7e293f";

    #[test]
    fn test_cli_parses_pipeline_config() {
        let cli = Cli::parse_from([
            "wcsig",
            "--aggregated-pubkey",
            PUBKEY,
            "--execution-address",
            ADDRESS,
            "--fork-version",
            "0x03000000",
            "--replay-file",
            "messages.ndjson",
            "--check-signature",
            "false",
        ]);

        let config = cli.pipeline_config().unwrap();
        assert!(!config.check_signature);
        assert_eq!(config.fork_version, B32::new([3, 0, 0, 0]));
        assert_eq!(config.genesis_validators_root, B256::ZERO);
        assert_eq!(config.expected_total, 18632);
        assert_eq!(cli.output_file, PathBuf::from("output.csv"));
    }

    #[test]
    fn test_cli_rejects_unpadded_execution_address() {
        let cli = Cli::parse_from([
            "wcsig",
            "--aggregated-pubkey",
            PUBKEY,
            "--execution-address",
            // 20 bytes; callers must zero-pad to the 32-byte wire width.
            "b9d7934878b5fb9610b3fe8a5e441e8fad7e293f",
            "--fork-version",
            "03000000",
            "--replay-file",
            "messages.ndjson",
        ]);

        assert!(cli.pipeline_config().is_err());
    }

    #[test]
    fn test_cli_rejects_truncated_pubkey() {
        let cli = Cli::parse_from([
            "wcsig",
            "--aggregated-pubkey",
            &PUBKEY[..94],
            "--execution-address",
            ADDRESS,
            "--fork-version",
            "03000000",
            "--replay-file",
            "messages.ndjson",
        ]);

        assert!(cli.pipeline_config().is_err());
    }
}
