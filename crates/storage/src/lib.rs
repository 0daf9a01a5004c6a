//! Append-only audit trail.
//!
//! Every accepted record is written as one CSV line,
//! `validator_index,signature_hex,signing_root_hex`. Lines are only ever
//! appended; reopening an existing trail continues after its last line.

use std::path::Path;

use anyhow::Context;
use tokio::{
    fs::{File, OpenOptions},
    io::AsyncWriteExt,
};

pub struct AuditTrail {
    file: File,
}

impl AuditTrail {
    pub async fn open(path: &Path) -> anyhow::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .with_context(|| format!("could not open audit trail at {}", path.display()))?;
        Ok(Self { file })
    }

    pub async fn append(
        &mut self,
        validator_index: u64,
        signature: &[u8],
        signing_root: &[u8],
    ) -> anyhow::Result<()> {
        let line = format!(
            "{validator_index},{},{}\n",
            hex::encode(signature),
            hex::encode(signing_root)
        );
        self.file
            .write_all(line.as_bytes())
            .await
            .context("could not append to audit trail")?;
        self.file
            .flush()
            .await
            .context("could not flush audit trail")?;
        Ok(())
    }
}
