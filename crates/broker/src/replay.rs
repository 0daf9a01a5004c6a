use std::path::Path;

use tokio::{
    fs::File,
    io::{AsyncBufReadExt, BufReader, Lines},
};

use crate::{BatchSource, SourceError, SourceMessage};

/// Replays broker messages from a file, one JSON envelope per line. Line
/// numbers stand in for broker offsets; blank lines consume an offset but
/// deliver nothing.
pub struct ReplaySource {
    lines: Lines<BufReader<File>>,
    offset: u64,
}

impl ReplaySource {
    pub async fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path).await?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
            offset: 0,
        })
    }
}

impl BatchSource for ReplaySource {
    async fn next_message(&mut self) -> Result<Option<SourceMessage>, SourceError> {
        while let Some(line) = self.lines.next_line().await? {
            let offset = self.offset;
            self.offset += 1;
            if line.trim().is_empty() {
                continue;
            }
            return Ok(Some(SourceMessage {
                payload: line.into_bytes(),
                offset,
            }));
        }
        Ok(None)
    }

    async fn commit(&mut self, _offset: u64) -> Result<(), SourceError> {
        // A file has no broker to acknowledge against.
        Ok(())
    }
}
