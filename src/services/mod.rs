pub mod encoder;
pub mod file_watcher;
pub mod frame_pipeline;
pub mod render_service;

pub use encoder::VideoEncoder;
pub use file_watcher::{FileChangeEvent, FileWatcher};
pub use frame_pipeline::{ExportSummary, FrameExporter, FramePlan, PreviewCadence};
pub use render_service::{RenderOutcome, RenderService};
