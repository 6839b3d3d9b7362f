//! Wire records exchanged by the file sync calls

use serde::{Deserialize, Serialize};

/// A whole file addressed by path, with base64 content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Target path, used verbatim
    pub file_name: String,
    /// Standard base64 (with padding)
    pub encoded_content: String,
}

impl FileRecord {
    pub fn new(file_name: impl Into<String>, encoded_content: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            encoded_content: encoded_content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub is_same: bool,
}

/// Result of a send; `file_name` is set only when the file was written
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedResult {
    pub processed: bool,
    pub file_name: String,
    pub error: String,
}

/// Terminal state of one send after the equality check succeeded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Content already matched, nothing written
    Skipped,
    Written,
    WriteFailed(String),
}

impl RecordOutcome {
    /// Wire result for this outcome on `file_name`
    pub fn into_result(self, file_name: &str) -> ProcessedResult {
        match self {
            Self::Skipped => ProcessedResult::default(),
            Self::Written => ProcessedResult {
                processed: true,
                file_name: file_name.to_string(),
                error: String::new(),
            },
            Self::WriteFailed(error) => ProcessedResult {
                processed: false,
                file_name: String::new(),
                error,
            },
        }
    }
}
