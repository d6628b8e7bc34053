//! Reload the catalog whenever content changes

use anyhow::{Context, Result};
use notify::Watcher;
use std::path::Path;
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::time::{Duration, Instant};

use super::check;
use crate::content::{Catalog, ContentIndexer};
use crate::Site;

/// Quiet time after the last event before a reload runs
const DEBOUNCE: Duration = Duration::from_millis(500);

/// How often the loop wakes up to see whether a reload is due
const POLL: Duration = Duration::from_millis(100);

/// Trailing-edge debounce: a burst of events yields one reload, once the
/// burst has been quiet for `window`.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    last_event: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_event: None,
        }
    }

    /// Record a change seen at `now`
    pub fn event(&mut self, now: Instant) {
        self.last_event = Some(now);
    }

    /// Whether a reload should run at `now`; consumes the pending change
    pub fn due(&mut self, now: Instant) -> bool {
        match self.last_event {
            Some(at) if now.saturating_duration_since(at) >= self.window => {
                self.last_event = None;
                true
            }
            _ => false,
        }
    }
}

/// Load once, then rebuild the whole catalog on every change under `dir`.
///
/// Blocks the calling thread until the watcher goes away.
pub fn run(site: &Site, dir: &Path) -> Result<()> {
    let content_dir = site.content_dir(dir);
    let indexer = site.indexer()?;

    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    let mode = if indexer.config().recursive {
        notify::RecursiveMode::Recursive
    } else {
        notify::RecursiveMode::NonRecursive
    };
    watcher
        .watch(&content_dir, mode)
        .with_context(|| format!("Failed to watch {:?}", content_dir))?;

    // Watch before the first load so nothing written meanwhile is missed
    reload(&indexer, &content_dir);

    tracing::info!("Watching {:?} for changes. Press Ctrl+C to stop.", content_dir);

    let mut debouncer = Debouncer::new(DEBOUNCE);

    loop {
        match rx.recv_timeout(POLL) {
            Ok(_event) => debouncer.event(Instant::now()),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if debouncer.due(Instant::now()) {
            tracing::info!("Content changed, reloading...");
            reload(&indexer, &content_dir);
        }
    }

    Ok(())
}

/// Build a fresh catalog; a failed load is logged and the watch goes on
fn reload(indexer: &ContentIndexer, dir: &Path) -> Option<Catalog> {
    match indexer.load(dir) {
        Ok(catalog) => {
            print!("{}", check::render(&catalog, dir));
            Some(catalog)
        }
        Err(e) => {
            tracing::error!("Load failed: {}", e);
            None
        }
    }
}
