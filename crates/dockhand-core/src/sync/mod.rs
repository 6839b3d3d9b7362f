//! File synchronization engine
//!
//! Compares caller-supplied file content with what is on disk and replaces
//! the file when it differs. Each call works on whole files addressed by a
//! path, one-shot or as an ordered stream of records where every inbound
//! record produces exactly one result, in arrival order.

mod buffer;
pub mod file_ops;
mod types;

pub use buffer::ResponseBuffer;
pub use types::{ComparisonResult, FileRecord, ProcessedResult, RecordOutcome};

use crate::{CoreError, Result};
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use std::path::Path;
use tokio::sync::mpsc;

/// Default permission bits for files created by a send
pub const DEFAULT_FILE_MODE: u32 = 0o600;

/// Outbound half of a streaming call
#[async_trait]
pub trait ResultSink<T: Send + 'static>: Send {
    /// Deliver one result; an error aborts the stream
    async fn send(&mut self, item: T) -> Result<()>;
}

#[async_trait]
impl<T: Send + 'static> ResultSink<T> for mpsc::Sender<T> {
    async fn send(&mut self, item: T) -> Result<()> {
        mpsc::Sender::send(self, item)
            .await
            .map_err(|_| CoreError::Stream("result receiver closed".to_string()))
    }
}

/// Whole-file compare and replace
#[derive(Debug, Clone)]
pub struct FileSync {
    mode: u32,
}

impl Default for FileSync {
    fn default() -> Self {
        Self::new(DEFAULT_FILE_MODE)
    }
}

impl FileSync {
    /// Create an engine writing new files with permission bits `mode`
    pub fn new(mode: u32) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> u32 {
        self.mode
    }

    /// Replace the file when its content differs from the record
    ///
    /// Invalid base64 fails before the filesystem is touched. A failed
    /// write is reported in the result rather than as an error.
    pub async fn send_file(&self, record: &FileRecord) -> Result<ProcessedResult> {
        let content = file_ops::decode(&record.encoded_content)?;
        let outcome = self.apply(Path::new(&record.file_name), &content).await?;
        tracing::debug!("send {}: {:?}", record.file_name, outcome);
        Ok(outcome.into_result(&record.file_name))
    }

    /// Compare the record with the file on disk without writing
    pub async fn compare_file(&self, record: &FileRecord) -> Result<ComparisonResult> {
        let content = file_ops::decode(&record.encoded_content)?;
        let is_same = file_ops::is_same_file(Path::new(&record.file_name), &content).await?;
        tracing::debug!("compare {}: same={}", record.file_name, is_same);
        Ok(ComparisonResult { is_same })
    }

    /// Streaming `send_file`, returning the number of records handled
    pub async fn send_files<S, O>(&self, mut inbound: S, outbound: &mut O) -> Result<usize>
    where
        S: Stream<Item = Result<FileRecord>> + Unpin + Send,
        O: ResultSink<ProcessedResult> + ?Sized,
    {
        let buffer = ResponseBuffer::new();
        let mut count = 0;

        while let Some(record) = inbound.next().await {
            let result = self.send_file(&record?).await?;
            count += 1;
            for item in buffer.push_and_drain(result) {
                outbound.send(item).await?;
            }
        }

        tracing::info!("Send stream finished after {} file(s)", count);
        Ok(count)
    }

    /// Streaming `compare_file`, returning the number of records handled
    pub async fn compare_files<S, O>(&self, mut inbound: S, outbound: &mut O) -> Result<usize>
    where
        S: Stream<Item = Result<FileRecord>> + Unpin + Send,
        O: ResultSink<ComparisonResult> + ?Sized,
    {
        let buffer = ResponseBuffer::new();
        let mut count = 0;

        while let Some(record) = inbound.next().await {
            let result = self.compare_file(&record?).await?;
            count += 1;
            for item in buffer.push_and_drain(result) {
                outbound.send(item).await?;
            }
        }

        tracing::info!("Compare stream finished after {} file(s)", count);
        Ok(count)
    }

    async fn apply(&self, path: &Path, content: &[u8]) -> Result<RecordOutcome> {
        if file_ops::file_exists(path).await && file_ops::is_same_file(path, content).await? {
            return Ok(RecordOutcome::Skipped);
        }

        match file_ops::replace_file(path, content, self.mode).await {
            Ok(()) => Ok(RecordOutcome::Written),
            Err(e) => {
                tracing::warn!("Failed to write {}: {}", path.display(), e);
                Ok(RecordOutcome::WriteFailed(e.to_string()))
            }
        }
    }
}
