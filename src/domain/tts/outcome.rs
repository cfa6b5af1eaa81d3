use serde::{Serialize, Serializer};
use std::fmt;

/// Result of one synthesis request as reported in the `result` field.
///
/// Provider and conversion failures are ordinary outcomes, not errors: the
/// HTTP layer always answers with the normal response shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisOutcome {
    /// Derived artifact was produced by this request
    Success,
    /// Derived artifact already existed
    Cached,
    /// Converter failed on an available canonical artifact
    ConversionError,
    /// Canonical artifact could not be obtained from the named provider
    ProviderError(String),
}

impl SynthesisOutcome {
    pub fn as_result(&self) -> String {
        match self {
            Self::Success => "success".to_string(),
            Self::Cached => "cached".to_string(),
            Self::ConversionError => "error".to_string(),
            Self::ProviderError(provider) => format!("{}_error", provider),
        }
    }
}

impl fmt::Display for SynthesisOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_result())
    }
}

impl Serialize for SynthesisOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_result())
    }
}
