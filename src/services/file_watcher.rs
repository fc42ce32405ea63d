//! File watcher service for watch mode.
//!
//! Monitors the input image and style config, broadcasting debounced change
//! events so the caller can re-render.

use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, Mutex};

/// Quiet period before pending changes are flushed
pub const DEBOUNCE: Duration = Duration::from_millis(200);

/// Event sent when watched files change
#[derive(Debug, Clone)]
pub struct FileChangeEvent {
    /// Paths that changed
    pub paths: Vec<PathBuf>,
}

/// File watcher for a fixed set of files
pub struct FileWatcher {
    sender: broadcast::Sender<FileChangeEvent>,
    /// Handle to the watcher (kept alive)
    _watcher: Option<RecommendedWatcher>,
    active: bool,
}

impl FileWatcher {
    /// Watch the given files.
    ///
    /// Editors often save by writing a new file and renaming it over the old
    /// one, so the parent directories are watched and events are filtered by
    /// full path. Must be called inside a tokio runtime.
    pub fn new(files: &[PathBuf]) -> Self {
        let (sender, _) = broadcast::channel(16);

        let watched: HashSet<PathBuf> = files.iter().filter_map(|f| watch_key(f)).collect();
        let dirs: HashSet<PathBuf> = watched.iter().map(|f| parent_dir(f)).collect();

        let (watcher, active) = if watched.is_empty() {
            tracing::debug!("No files to watch, file watching disabled");
            (None, false)
        } else {
            match Self::start_watcher(&dirs, watched, sender.clone()) {
                Ok(watcher) => {
                    tracing::info!(files = ?files, "File watcher started");
                    (Some(watcher), true)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to start file watcher");
                    (None, false)
                }
            }
        };

        Self {
            sender,
            _watcher: watcher,
            active,
        }
    }

    fn start_watcher(
        dirs: &HashSet<PathBuf>,
        watched: HashSet<PathBuf>,
        sender: broadcast::Sender<FileChangeEvent>,
    ) -> Result<RecommendedWatcher, notify::Error> {
        let (tx, mut rx) = mpsc::channel::<PathBuf>(100);

        tokio::spawn(async move {
            let pending: Arc<Mutex<HashSet<PathBuf>>> = Arc::new(Mutex::new(HashSet::new()));
            let pending_clone = pending.clone();

            let flush_sender = sender.clone();
            tokio::spawn(async move {
                loop {
                    tokio::time::sleep(DEBOUNCE).await;
                    let mut guard = pending_clone.lock().await;
                    if !guard.is_empty() {
                        let paths: Vec<PathBuf> = guard.drain().collect();
                        tracing::debug!(paths = ?paths, "Files changed (debounced)");
                        let _ = flush_sender.send(FileChangeEvent { paths });
                    }
                }
            });

            while let Some(path) = rx.recv().await {
                pending.lock().await.insert(path);
            }
        });

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<notify::Event, notify::Error>| {
                if let Ok(event) = res {
                    if event.kind.is_access() {
                        return;
                    }
                    for path in event.paths {
                        let matches = watched.contains(&path)
                            || watch_key(&path).is_some_and(|key| watched.contains(&key));
                        if matches {
                            let _ = tx.blocking_send(path);
                        }
                    }
                }
            },
            Config::default(),
        )?;

        for dir in dirs {
            watcher.watch(dir, RecursiveMode::NonRecursive)?;
        }

        Ok(watcher)
    }

    /// Subscribe to file change events
    pub fn subscribe(&self) -> broadcast::Receiver<FileChangeEvent> {
        self.sender.subscribe()
    }

    /// Check if the watcher is active
    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Canonical form of a watched file: its canonicalized parent directory
/// joined with its name. The file itself need not exist.
fn watch_key(file: &Path) -> Option<PathBuf> {
    let name = file.file_name()?;
    let dir = parent_dir(file);
    let dir = dir.canonicalize().unwrap_or(dir);
    Some(dir.join(name))
}

fn parent_dir(file: &Path) -> PathBuf {
    match file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
