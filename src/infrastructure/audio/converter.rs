use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Container and sample layout of an audio file as the converter sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioSpec {
    pub file_type: String,
    pub encoding: Option<String>,
    pub rate: u32,
    pub bits: u8,
    pub channels: u8,
}

impl AudioSpec {
    /// Layout of the canonical artifact: headerless 24 kHz, 16-bit, mono signed PCM
    pub fn canonical() -> Self {
        Self {
            file_type: "raw".to_string(),
            encoding: Some("signed-integer".to_string()),
            rate: 24_000,
            bits: 16,
            channels: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConversionJob {
    pub input: PathBuf,
    pub input_spec: AudioSpec,
    pub output: PathBuf,
    pub output_spec: AudioSpec,
}

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("failed to launch converter: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("converter exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
}

/// Re-encodes an audio artifact into another format.
///
/// Implementations block the calling thread; callers are expected to run
/// them on the blocking pool.
pub trait AudioConverter: Send + Sync {
    fn convert(&self, job: &ConversionJob) -> Result<(), ConversionError>;
}
