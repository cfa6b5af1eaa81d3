use super::converter::{AudioConverter, AudioSpec, ConversionError, ConversionJob};
use std::process::Command;

/// Effects applied to every conversion: trim leading silence, trim trailing
/// silence (by reversing around the same effect), then pad 50 ms both ends.
const EFFECTS: &[&str] = &[
    "silence", "1", "0.1", "0.1%", "reverse", "silence", "1", "0.1", "0.1%", "reverse", "pad",
    "0.05", "0.05",
];

/// Format conversion backed by the `sox` command line tool
pub struct SoxConverter {
    binary: String,
}

impl SoxConverter {
    pub fn new(binary: String) -> Self {
        Self { binary }
    }

    /// Returns the first line of `sox --version`, or None when the binary can't be run
    pub fn version(&self) -> Option<String> {
        let output = Command::new(&self.binary).arg("--version").output().ok()?;
        if !output.status.success() {
            return None;
        }
        let version = String::from_utf8_lossy(&output.stdout);
        Some(version.lines().next().unwrap_or_default().trim().to_string())
    }

    fn format_args(spec: &AudioSpec) -> Vec<String> {
        let mut args = vec!["-t".to_string(), spec.file_type.clone()];
        if let Some(encoding) = &spec.encoding {
            args.push("-e".to_string());
            args.push(encoding.clone());
        }
        args.extend([
            "-r".to_string(),
            spec.rate.to_string(),
            "-b".to_string(),
            spec.bits.to_string(),
            "-c".to_string(),
            spec.channels.to_string(),
        ]);
        args
    }

    fn build_args(job: &ConversionJob) -> Vec<String> {
        let mut args = Self::format_args(&job.input_spec);
        args.push(job.input.to_string_lossy().into_owned());
        args.extend(Self::format_args(&job.output_spec));
        args.push(job.output.to_string_lossy().into_owned());
        args.extend(EFFECTS.iter().map(|effect| effect.to_string()));
        args
    }
}

impl AudioConverter for SoxConverter {
    fn convert(&self, job: &ConversionJob) -> Result<(), ConversionError> {
        let args = Self::build_args(job);
        tracing::debug!(
            binary = %self.binary,
            args = ?args,
            "Running sox conversion"
        );

        let output = Command::new(&self.binary).args(&args).output()?;

        if !output.status.success() {
            return Err(ConversionError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}
