//! Frame sequence rendering.
//!
//! A video arrives here as a directory of decoded PNG frames at a known
//! source rate. [`FramePlan`] decides which frames to render and
//! [`FrameExporter`] renders them into a numbered PNG sequence that the
//! [`VideoEncoder`](super::VideoEncoder) can pick up.

use crate::error::{ExportError, ImageError};
use crate::services::RenderService;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// Display refresh rate that preview frame skipping is measured against
pub const DISPLAY_RATE: u32 = 30;

/// Frame cadence at a target rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePlan {
    fps: u32,
}

impl FramePlan {
    /// A zero rate is treated as 1 fps
    pub fn new(fps: u32) -> Self {
        Self { fps: fps.max(1) }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Display ticks between rendered preview frames: `max(1, round(30 / fps))`
    pub fn preview_skip(&self) -> u32 {
        ((DISPLAY_RATE as f64 / self.fps as f64).round() as u32).max(1)
    }

    /// Whether the preview loop renders on this display tick
    pub fn renders_on_tick(&self, tick: u64) -> bool {
        tick % self.preview_skip() as u64 == 0
    }

    /// Number of export frames for `source_count` frames at `source_fps`:
    /// `floor(duration * fps)`, computed without rounding the duration first.
    pub fn export_frame_count(&self, source_count: usize, source_fps: f64) -> usize {
        if source_count == 0 || !source_fps.is_finite() || source_fps <= 0.0 {
            return 0;
        }
        floor_ratio(source_count as f64 * self.fps as f64, source_fps)
    }

    /// Pick source frames for export: frame `i` samples the source at
    /// `t = i / fps`.
    pub fn select_source_frames(&self, source_count: usize, source_fps: f64) -> Vec<usize> {
        let fps = self.fps as f64;
        (0..self.export_frame_count(source_count, source_fps))
            .map(|i| floor_ratio(i as f64 * source_fps, fps).min(source_count - 1))
            .collect()
    }
}

/// Preview frame skip applied to a stream of render requests
///
/// Requests only mark a render pending; it runs on the next display tick the
/// plan admits, so any number of requests between two admitted ticks costs
/// one render.
#[derive(Debug, Clone)]
pub struct PreviewCadence {
    plan: FramePlan,
    tick: u64,
    pending: bool,
}

impl PreviewCadence {
    pub fn new(plan: FramePlan) -> Self {
        Self {
            plan,
            tick: 0,
            pending: false,
        }
    }

    /// Time between display ticks
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / DISPLAY_RATE as f64)
    }

    pub fn request(&mut self) {
        self.pending = true;
    }

    /// Advance one display tick; true when a pending render is due now
    pub fn tick(&mut self) -> bool {
        let due = self.pending && self.plan.renders_on_tick(self.tick);
        self.tick += 1;
        if due {
            self.pending = false;
        }
        due
    }
}

/// Slack for products like `n * fps / source_fps` that are whole numbers
/// mathematically but land just below one in floating point
const FRAME_EPSILON: f64 = 1e-9;

/// `floor(numerator / denominator)`, tolerant of representation error
fn floor_ratio(numerator: f64, denominator: f64) -> usize {
    (numerator / denominator + FRAME_EPSILON).floor() as usize
}

/// Output file name of export frame `index`
pub fn frame_file_name(index: usize) -> String {
    format!("frame_{index:05}.png")
}

/// Pattern matching [`frame_file_name`], for the encoder
pub const FRAME_PATTERN: &str = "frame_%05d.png";

/// Whether `name` is one of ours: `frame_` then at least five digits, `.png`
pub fn is_frame_file_name(name: &str) -> bool {
    name.strip_prefix("frame_")
        .and_then(|rest| rest.strip_suffix(".png"))
        .map(|digits| digits.len() >= 5 && digits.bytes().all(|b| b.is_ascii_digit()))
        .unwrap_or(false)
}

/// Delete numbered frames left in `dir` by an earlier export, so the encoder
/// only sees the current sequence. Other files are left alone.
pub fn clear_frames(dir: &Path) -> Result<usize, std::io::Error> {
    let mut removed = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let is_frame = entry.file_name().to_str().map(is_frame_file_name).unwrap_or(false);
        if is_frame && entry.file_type()?.is_file() {
            std::fs::remove_file(entry.path())?;
            removed += 1;
        }
    }
    Ok(removed)
}

/// Summary of a finished export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub source_frames: usize,
    pub frames: usize,
    pub fps: u32,
    pub output_dir: PathBuf,
}

/// Renders a directory of source frames into a numbered PNG sequence
pub struct FrameExporter {
    service: Arc<RenderService>,
    concurrency: usize,
}

impl FrameExporter {
    pub fn new(service: RenderService) -> Self {
        let concurrency = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        Self {
            service: Arc::new(service),
            concurrency,
        }
    }

    /// Maximum number of frames rendered at once
    #[inline]
    pub fn concurrency(mut self, limit: usize) -> Self {
        self.concurrency = limit.max(1);
        self
    }

    /// Render the frames in `input_dir` (sorted by name, `source_fps`) at
    /// `plan`'s rate into `output_dir`.
    pub async fn export(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        source_fps: f64,
        plan: FramePlan,
    ) -> Result<ExportSummary, ExportError> {
        let sources = list_frames(input_dir)?;
        if sources.is_empty() {
            return Err(ExportError::NoFrames(input_dir.display().to_string()));
        }

        let selected = plan.select_source_frames(sources.len(), source_fps);
        if selected.is_empty() {
            return Err(ExportError::NoFrames(input_dir.display().to_string()));
        }

        std::fs::create_dir_all(output_dir)?;
        if input_dir.canonicalize()? == output_dir.canonicalize()? {
            return Err(ExportError::SameDirectory(output_dir.display().to_string()));
        }
        let stale = clear_frames(output_dir)?;
        if stale > 0 {
            tracing::debug!(removed = stale, "Removed frames from a previous export");
        }
        tracing::info!(
            input = %input_dir.display(),
            output = %output_dir.display(),
            source_frames = sources.len(),
            frames = selected.len(),
            fps = plan.fps(),
            "Exporting frames"
        );

        let mut tasks: JoinSet<Result<(), ImageError>> = JoinSet::new();
        let mut done = 0usize;

        for (index, &source_index) in selected.iter().enumerate() {
            if tasks.len() >= self.concurrency {
                if let Some(result) = tasks.join_next().await {
                    result??;
                    done += 1;
                    log_progress(done, selected.len());
                }
            }

            let service = self.service.clone();
            let input = sources[source_index].clone();
            let output = output_dir.join(frame_file_name(index));
            tasks.spawn_blocking(move || {
                let source = service.load_image(&input)?;
                let png = service.render_to_png(&source)?;
                std::fs::write(&output, png)?;
                Ok(())
            });
        }

        while let Some(result) = tasks.join_next().await {
            result??;
            done += 1;
            log_progress(done, selected.len());
        }

        tracing::info!(frames = done, "Frame export finished");
        Ok(ExportSummary {
            source_frames: sources.len(),
            frames: done,
            fps: plan.fps(),
            output_dir: output_dir.to_path_buf(),
        })
    }
}

fn log_progress(done: usize, total: usize) {
    if done % 30 == 0 {
        tracing::debug!(done, total, "Export progress");
    }
}

/// PNG files in `dir`, sorted by file name
pub fn list_frames(dir: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut frames: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("png"))
                    .unwrap_or(false)
        })
        .collect();
    frames.sort();
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_skip() {
        assert_eq!(FramePlan::new(15).preview_skip(), 2);
        assert_eq!(FramePlan::new(30).preview_skip(), 1);
        assert_eq!(FramePlan::new(60).preview_skip(), 1);
        assert_eq!(FramePlan::new(12).preview_skip(), 3); // 2.5 rounds up
        assert_eq!(FramePlan::new(1).preview_skip(), 30);
    }

    #[test]
    fn test_zero_fps_is_clamped() {
        let plan = FramePlan::new(0);
        assert_eq!(plan.fps(), 1);
        assert_eq!(plan.preview_skip(), 30);
    }

    #[test]
    fn test_renders_on_tick() {
        let plan = FramePlan::new(10);
        let ticks: Vec<u64> = (0..10).filter(|&t| plan.renders_on_tick(t)).collect();
        assert_eq!(ticks, vec![0, 3, 6, 9]);
    }

    #[test]
    fn test_cadence_waits_for_admitted_tick() {
        // 10 fps admits every third display tick
        let mut cadence = PreviewCadence::new(FramePlan::new(10));
        assert!(!cadence.tick()); // tick 0, nothing pending
        cadence.request();
        assert!(!cadence.tick()); // 1
        assert!(!cadence.tick()); // 2
        assert!(cadence.tick()); // 3
        assert!((0..6).all(|_| !cadence.tick()));
    }

    #[test]
    fn test_cadence_coalesces_requests() {
        let mut cadence = PreviewCadence::new(FramePlan::new(15));
        for _ in 0..5 {
            cadence.request();
        }
        let renders = (0..4).filter(|_| cadence.tick()).count();
        assert_eq!(renders, 1);
    }

    #[test]
    fn test_cadence_at_display_rate_renders_next_tick() {
        let mut cadence = PreviewCadence::new(FramePlan::new(30));
        cadence.tick();
        cadence.request();
        assert!(cadence.tick());
        assert_eq!(cadence.tick_interval(), Duration::from_secs_f64(1.0 / 30.0));
    }

    #[test]
    fn test_export_frame_count_floors() {
        let plan = FramePlan::new(24);
        assert_eq!(plan.export_frame_count(60, 30.0), 48);
        assert_eq!(plan.export_frame_count(59, 30.0), 47);
        assert_eq!(plan.export_frame_count(0, 30.0), 0);
        assert_eq!(plan.export_frame_count(10, f64::NAN), 0);
        assert_eq!(plan.export_frame_count(10, -1.0), 0);
    }

    #[test]
    fn test_same_rate_keeps_every_frame() {
        for fps in [24u32, 25, 29, 30, 49, 50, 60] {
            let plan = FramePlan::new(fps);
            for count in 1..=200 {
                let selected = plan.select_source_frames(count, fps as f64);
                assert_eq!(selected.len(), count, "{count} frames at {fps} fps");
                assert!(
                    selected.iter().enumerate().all(|(i, &s)| i == s),
                    "{count} frames at {fps} fps not mapped one to one"
                );
            }
        }
    }

    #[test]
    fn test_mixed_rates_cover_whole_clip() {
        // 50 frames at 25 fps is 2 seconds
        let up = FramePlan::new(30).select_source_frames(50, 25.0);
        assert_eq!(up.len(), 60);
        assert_eq!(up.last(), Some(&49));

        let down = FramePlan::new(25).select_source_frames(60, 30.0);
        assert_eq!(down.len(), 50);
        assert_eq!(&down[..6], &[0, 1, 2, 3, 4, 6]);
        assert_eq!(down.last(), Some(&58));

        // NTSC source: 2997 frames at 29.97 fps is exactly 100 seconds
        let ntsc = FramePlan::new(30).select_source_frames(2997, 29.97);
        assert_eq!(ntsc.len(), 3000);
    }

    #[test]
    fn test_select_source_frames_downsamples() {
        // 60 frames at 30 fps is 2 seconds; 10 fps export takes every third
        let selected = FramePlan::new(10).select_source_frames(60, 30.0);
        assert_eq!(selected.len(), 20);
        assert_eq!(&selected[..4], &[0, 3, 6, 9]);
    }

    #[test]
    fn test_select_source_frames_upsamples_by_repeating() {
        let selected = FramePlan::new(4).select_source_frames(2, 2.0);
        assert_eq!(selected, vec![0, 0, 1, 1]);
    }

    #[test]
    fn test_select_source_frames_degenerate() {
        assert!(FramePlan::new(15).select_source_frames(0, 30.0).is_empty());
        assert!(FramePlan::new(15).select_source_frames(10, 0.0).is_empty());
    }

    #[test]
    fn test_frame_file_name() {
        assert_eq!(frame_file_name(0), "frame_00000.png");
        assert_eq!(frame_file_name(123), "frame_00123.png");
    }

    #[test]
    fn test_is_frame_file_name() {
        assert!(is_frame_file_name("frame_00000.png"));
        assert!(is_frame_file_name("frame_123456.png"));
        assert!(!is_frame_file_name("frame_0001.png"));
        assert!(!is_frame_file_name("frame_0000a.png"));
        assert!(!is_frame_file_name("frame_00001.PNG"));
        assert!(!is_frame_file_name("src_00001.png"));
    }

    #[test]
    fn test_clear_frames_keeps_other_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["frame_00000.png", "frame_00001.png", "cover.png", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        assert_eq!(clear_frames(dir.path()).unwrap(), 2);
        let mut left: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        left.sort();
        assert_eq!(left, vec!["cover.png", "notes.txt"]);
    }

    #[test]
    fn test_list_frames_sorted_png_only() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.PNG", "notes.txt", "c.png"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        let names: Vec<String> = list_frames(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.PNG", "b.png", "c.png"]);
    }
}
