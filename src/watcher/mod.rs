//! Reload triggers for a markdown file or post list being edited elsewhere.
//!
//! Watches the parent directory (editors often save by rename) and reports a
//! change once events have been quiet for the debounce window.
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};

/// Debounced change notifications for one file.
pub struct SourceWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    dir: PathBuf,
    path: PathBuf,
    name: Option<OsString>,
    debounce: Duration,
    last_event: Option<Instant>,
}

impl std::fmt::Debug for SourceWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceWatcher")
            .field("path", &self.path)
            .field("debounce", &self.debounce)
            .field("pending", &self.last_event.is_some())
            .finish_non_exhaustive()
    }
}

impl SourceWatcher {
    /// Start watching `path`.
    ///
    /// # Errors
    /// Returns an error if the platform watcher cannot be created or the
    /// parent directory cannot be watched.
    pub fn new(path: impl AsRef<Path>, debounce: Duration) -> notify::Result<Self> {
        // OS events carry canonical paths.
        let path = path
            .as_ref()
            .canonicalize()
            .unwrap_or_else(|_| path.as_ref().to_path_buf());
        let name = path.file_name().map(std::ffi::OsStr::to_os_string);
        let dir = parent_dir(&path);

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::debug!(path = %path.display(), dir = %dir.display(), "watching");

        Ok(Self {
            _watcher: watcher,
            rx,
            dir,
            path,
            name,
            debounce,
            last_event: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drain pending events. Returns true once a change has settled.
    pub fn poll_changed(&mut self) -> bool {
        let mut touched = false;
        while let Ok(event) = self.rx.try_recv() {
            match event {
                Ok(ev) if self.concerns_target(&ev) => touched = true,
                Ok(ev) => tracing::trace!(kind = ?ev.kind, paths = ?ev.paths, "unrelated fs event"),
                Err(err) => tracing::warn!(%err, "watch error"),
            }
        }
        if touched {
            self.last_event = Some(Instant::now());
        }

        match self.last_event {
            Some(at) if at.elapsed() >= self.debounce => {
                self.last_event = None;
                tracing::debug!(path = %self.path.display(), "source changed");
                true
            }
            _ => false,
        }
    }

    fn concerns_target(&self, event: &Event) -> bool {
        event.paths.iter().any(|p| {
            p == &self.dir
                || p == &self.path
                || self
                    .name
                    .as_ref()
                    .is_some_and(|name| p.file_name().is_some_and(|f| f == name))
        })
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}
