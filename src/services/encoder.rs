//! External video encoder.
//!
//! Frame sequences are handed to `ffmpeg` as a black box. Encoding failures
//! leave the PNG sequence on disk so the render is not lost.

use crate::error::ExportError;
use crate::services::frame_pipeline::FRAME_PATTERN;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Environment variable overriding the encoder binary
pub const FFMPEG_ENV: &str = "RETICULATE_FFMPEG";

/// Lines of encoder stderr kept in error reports
const STDERR_TAIL_LINES: usize = 8;

/// Wraps the `ffmpeg` command line
#[derive(Debug, Clone)]
pub struct VideoEncoder {
    program: PathBuf,
}

impl Default for VideoEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoEncoder {
    /// Use `RETICULATE_FFMPEG` if set, else `ffmpeg` from `PATH`
    pub fn new() -> Self {
        let program = std::env::var_os(FFMPEG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("ffmpeg"));
        Self { program }
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments for encoding `frames_dir/frame_%05d.png` at `fps` to H.264
    pub fn args(&self, frames_dir: &Path, fps: u32, output: &Path) -> Vec<OsString> {
        vec![
            "-y".into(),
            "-framerate".into(),
            fps.to_string().into(),
            "-i".into(),
            frames_dir.join(FRAME_PATTERN).into_os_string(),
            "-c:v".into(),
            "libx264".into(),
            "-preset".into(),
            "ultrafast".into(),
            "-pix_fmt".into(),
            "yuv420p".into(),
            output.as_os_str().to_os_string(),
        ]
    }

    /// Encode a rendered frame sequence into `output`
    pub async fn encode(&self, frames_dir: &Path, fps: u32, output: &Path) -> Result<(), ExportError> {
        let args = self.args(frames_dir, fps, output);
        tracing::info!(
            program = %self.program.display(),
            frames = %frames_dir.display(),
            output = %output.display(),
            fps,
            "Encoding video"
        );

        let result = Command::new(&self.program).args(&args).output().await;
        let out = match result {
            Ok(out) => out,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ExportError::EncoderUnavailable(
                    self.program.display().to_string(),
                ))
            }
            Err(e) => return Err(ExportError::Io(e)),
        };

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(ExportError::EncoderFailed {
                status: out.status.to_string(),
                stderr: tail(&stderr, STDERR_TAIL_LINES),
            });
        }

        tracing::info!(output = %output.display(), "Video encoded");
        Ok(())
    }
}

/// The last `n` non-empty lines of `text`
fn tail(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    lines[lines.len().saturating_sub(n)..].join("\n")
}
