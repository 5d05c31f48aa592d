//! Poll-based watching of the panel's source files
//!
//! Uses the `notify` crate's `PollWatcher` so behaviour is the same on every
//! platform. Raw events are forwarded to a worker thread that keeps only
//! write events and flushes them once per poll interval, so a burst of
//! writes to one file produces a single change notification.

use notify::event::{MetadataKind, ModifyKind};
use notify::{Config, EventKind, PollWatcher, RecursiveMode, Watcher as _};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::util::expand_home;

/// Poll interval used when none is configured
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Shortest poll interval accepted
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("watch backend error: {0}")]
    Notify(#[from] notify::Error),
    #[error("failed to spawn watcher thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("watcher already running")]
    AlreadyRunning,
    #[error("watcher is closed")]
    Stopped,
}

/// Events emitted to the change callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A watched file was written during the last poll interval
    Changed(PathBuf),
    /// The backend reported an error; watching continues for the other paths
    Failed(String),
    /// A write was seen again after a failure
    Recovered,
}

/// Callback invoked from the watcher thread
pub type ChangeCallback = Arc<dyn Fn(WatchEvent) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatcherState {
    Idle,
    Running,
    Degraded { reason: String },
    Closed,
}

/// Resolved, deduplicated set of watch paths
///
/// Derived from the configured source list and rebuilt on every rebind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchTargets {
    paths: Vec<PathBuf>,
}

impl WatchTargets {
    /// Expand home shorthand for each path, skipping entries that fail
    pub fn resolve<S: AsRef<str>>(paths: &[S]) -> Self {
        let mut resolved: Vec<PathBuf> = Vec::with_capacity(paths.len());
        for path in paths {
            match expand_home(path.as_ref()) {
                Ok(p) if !resolved.contains(&p) => resolved.push(p),
                Ok(_) => {}
                Err(e) => tracing::warn!("Skipping watch path: {}", e),
            }
        }
        Self { paths: resolved }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// True for content or modification-time changes; creates, removes,
/// renames and permission changes are not writes
pub fn is_write_event(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Modify(
            ModifyKind::Data(_) | ModifyKind::Metadata(MetadataKind::WriteTime) | ModifyKind::Any
        )
    )
}

/// Collapse one interval's events into at most one change per watched
/// path, in watch order
pub fn coalesce(events: &[notify::Event], targets: &WatchTargets) -> Vec<PathBuf> {
    targets
        .paths()
        .iter()
        .filter(|target| {
            events
                .iter()
                .filter(|event| is_write_event(&event.kind))
                .any(|event| event.paths.iter().any(|p| p == *target))
        })
        .cloned()
        .collect()
}

/// Messages to the worker thread
enum Control {
    Event(notify::Result<notify::Event>),
    Shutdown,
}

struct Running {
    poller: PollWatcher,
    control: Sender<Control>,
    handle: JoinHandle<()>,
}

/// Watches a set of files and reports writes through a callback
pub struct Watcher {
    interval: Duration,
    on_change: ChangeCallback,
    targets: WatchTargets,
    state: Arc<Mutex<WatcherState>>,
    running: Option<Running>,
}

impl Watcher {
    /// Create an idle watcher; nothing is watched until [`Watcher::start`]
    pub fn new(interval: Duration, on_change: impl Fn(WatchEvent) + Send + Sync + 'static) -> Self {
        Self {
            interval: interval.max(MIN_POLL_INTERVAL),
            on_change: Arc::new(on_change),
            targets: WatchTargets::default(),
            state: Arc::new(Mutex::new(WatcherState::Idle)),
            running: None,
        }
    }

    /// Register `paths` and start the poll loop
    ///
    /// Paths that cannot be resolved or registered are logged and skipped.
    pub fn start<S: AsRef<str>>(&mut self, paths: &[S]) -> Result<(), WatchError> {
        match self.state() {
            WatcherState::Idle => {}
            WatcherState::Closed => return Err(WatchError::Stopped),
            WatcherState::Running | WatcherState::Degraded { .. } => {
                return Err(WatchError::AlreadyRunning)
            }
        }
        self.spawn(WatchTargets::resolve(paths))
    }

    /// Tear down every registration and watch `paths` instead
    pub fn rebind<S: AsRef<str>>(&mut self, paths: &[S]) -> Result<(), WatchError> {
        if self.state() == WatcherState::Closed {
            return Err(WatchError::Stopped);
        }
        self.shutdown();
        self.set_state(WatcherState::Idle);
        tracing::info!("Rebinding watcher to {} path(s)", paths.len());
        self.spawn(WatchTargets::resolve(paths))
    }

    /// Stop the poll loop and release all registrations. Safe to call
    /// more than once.
    pub fn close(&mut self) {
        if self.shutdown() {
            tracing::info!("File watcher closed");
        }
        self.set_state(WatcherState::Closed);
    }

    pub fn state(&self) -> WatcherState {
        match self.state.lock() {
            Ok(state) => state.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Paths currently registered with the backend
    pub fn targets(&self) -> &WatchTargets {
        &self.targets
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    fn set_state(&self, next: WatcherState) {
        set_shared_state(&self.state, next);
    }

    fn spawn(&mut self, targets: WatchTargets) -> Result<(), WatchError> {
        let (tx, rx) = mpsc::channel();
        let event_tx = tx.clone();
        let config = Config::default()
            .with_poll_interval(self.interval)
            .with_compare_contents(true);
        let mut poller = PollWatcher::new(
            move |res: notify::Result<notify::Event>| {
                let _ = event_tx.send(Control::Event(res));
            },
            config,
        )?;

        let mut registered = Vec::with_capacity(targets.len());
        for path in targets.paths() {
            if !path.exists() {
                tracing::warn!("Not watching {}: file does not exist", path.display());
                continue;
            }
            match poller.watch(path, RecursiveMode::NonRecursive) {
                Ok(()) => registered.push(path.clone()),
                Err(e) => tracing::warn!("Failed to watch {}: {}", path.display(), e),
            }
        }
        let targets = WatchTargets { paths: registered };

        let worker_targets = targets.clone();
        let interval = self.interval;
        let on_change = Arc::clone(&self.on_change);
        let state = Arc::clone(&self.state);
        let handle = thread::Builder::new()
            .name("textpane-watcher".to_string())
            .spawn(move || watch_loop(rx, worker_targets, interval, on_change, state))
            .map_err(WatchError::Spawn)?;

        tracing::info!(
            "Watching {} file(s), polling every {:?}",
            targets.len(),
            self.interval
        );
        self.targets = targets;
        self.running = Some(Running {
            poller,
            control: tx,
            handle,
        });
        self.set_state(WatcherState::Running);
        Ok(())
    }

    /// Stop the worker if one is running; returns whether it was
    fn shutdown(&mut self) -> bool {
        let Some(Running {
            poller,
            control,
            handle,
        }) = self.running.take()
        else {
            return false;
        };

        drop(poller);
        let _ = control.send(Control::Shutdown);
        if handle.join().is_err() {
            tracing::error!("Watcher thread panicked");
        }
        self.targets = WatchTargets::default();
        true
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn set_shared_state(state: &Mutex<WatcherState>, next: WatcherState) {
    match state.lock() {
        Ok(mut state) => *state = next,
        Err(poisoned) => *poisoned.into_inner() = next,
    }
}

/// Move a degraded watcher back to running; returns whether it was degraded
fn recover(state: &Mutex<WatcherState>) -> bool {
    let mut state = match state.lock() {
        Ok(state) => state,
        Err(poisoned) => poisoned.into_inner(),
    };
    if matches!(*state, WatcherState::Degraded { .. }) {
        *state = WatcherState::Running;
        true
    } else {
        false
    }
}

/// Worker loop: collect events until the interval elapses, then flush
fn watch_loop(
    rx: Receiver<Control>,
    targets: WatchTargets,
    interval: Duration,
    on_change: ChangeCallback,
    state: Arc<Mutex<WatcherState>>,
) {
    let mut batch: Vec<notify::Event> = Vec::new();
    let mut deadline = Instant::now() + interval;

    loop {
        let timeout = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(timeout) {
            Ok(Control::Event(Ok(event))) => {
                tracing::trace!("Watch event {:?} for {:?}", event.kind, event.paths);
                batch.push(event);
            }
            Ok(Control::Event(Err(e))) => {
                let reason = e.to_string();
                let already_degraded = matches!(
                    state.lock().as_deref(),
                    Ok(WatcherState::Degraded { reason: r }) if *r == reason
                );
                if already_degraded {
                    tracing::debug!("Repeated watch error: {}", reason);
                } else {
                    tracing::warn!("File watcher degraded: {}", reason);
                    set_shared_state(&state, WatcherState::Degraded {
                        reason: reason.clone(),
                    });
                    on_change(WatchEvent::Failed(reason));
                }
            }
            Ok(Control::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }

        if Instant::now() >= deadline {
            let changed = coalesce(&batch, &targets);
            if !changed.is_empty() {
                tracing::debug!(
                    "{} raw event(s) coalesced into {} change(s)",
                    batch.len(),
                    changed.len()
                );
            }
            batch.clear();
            if !changed.is_empty() && recover(&state) {
                tracing::info!("File watcher recovered");
                on_change(WatchEvent::Recovered);
            }
            for path in changed {
                on_change(WatchEvent::Changed(path));
            }
            deadline = Instant::now() + interval;
        }
    }

    tracing::debug!("Watcher loop exited");
}
