use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::time::Duration;

use crate::config::PanelConfig;
use crate::fs_watcher::{WatchError, Watcher, WatcherState};
use crate::highlight::Renderer;
use crate::messages::{Cmd, Msg};
use crate::panel::{Host, Panel};
use crate::sources::SourceSet;

/// Queue a message without blocking; a full queue already has work pending
pub fn post(tx: &SyncSender<Msg>, msg: Msg) {
    match tx.try_send(msg) {
        Ok(()) => {}
        Err(TrySendError::Full(msg)) => tracing::trace!("Message queue full, dropping {:?}", msg),
        Err(TrySendError::Disconnected(msg)) => {
            tracing::debug!("Message queue closed, dropping {:?}", msg)
        }
    }
}

/// A panel wired to its file watcher through a bounded message queue
///
/// The watcher thread only ever posts messages; all panel state is touched
/// on the thread that calls [`PanelRuntime::process_messages`] or
/// [`PanelRuntime::run`].
pub struct PanelRuntime<H: Host> {
    panel: Panel<H>,
    watcher: Watcher,
    msg_tx: SyncSender<Msg>,
    msg_rx: Receiver<Msg>,
    quit: bool,
}

impl<H: Host> PanelRuntime<H> {
    pub fn new(panel: Panel<H>, poll_interval: Duration, queue_capacity: usize) -> Self {
        let (msg_tx, msg_rx) = mpsc::sync_channel(queue_capacity.max(1));
        let watch_tx = msg_tx.clone();
        let watcher = Watcher::new(poll_interval, move |event| post(&watch_tx, Msg::from(event)));

        Self {
            panel,
            watcher,
            msg_tx,
            msg_rx,
            quit: false,
        }
    }

    /// Build the panel and runtime described by `config`
    pub fn from_config(config: &PanelConfig, host: H) -> Self {
        let panel = Panel::new(
            SourceSet::new(config.sources()),
            config.render_settings(),
            host,
        )
        .with_renderer(Renderer::new())
        .with_indicator(config.position_indicator());

        Self::new(panel, config.poll_interval(), config.queue_capacity())
    }

    /// Start watching every source and paint the first frame
    ///
    /// The first frame is painted even when the watcher cannot start; the
    /// panel is then marked degraded.
    pub fn start(&mut self) -> Result<(), WatchError> {
        let result = self.watcher.start(self.panel.sources().paths());
        if let Err(e) = &result {
            tracing::error!("Failed to start file watcher: {}", e);
            self.panel.update(Msg::WatcherFailed(e.to_string()));
        }
        self.panel.display();
        result
    }

    /// Sender for other producers, e.g. a keyboard thread
    pub fn sender(&self) -> SyncSender<Msg> {
        self.msg_tx.clone()
    }

    /// Apply every queued message, drawing at most once
    ///
    /// Returns false once a quit has been requested.
    pub fn process_messages(&mut self) -> bool {
        let mut pending = Cmd::None;
        while let Ok(msg) = self.msg_rx.try_recv() {
            pending = merge(pending, self.panel.update(msg));
        }
        self.finish(pending)
    }

    /// Block on the queue until a quit message arrives, then close the watcher
    pub fn run(&mut self) {
        while !self.quit {
            let Ok(msg) = self.msg_rx.recv() else {
                break;
            };
            let mut pending = self.panel.update(msg);
            while let Ok(msg) = self.msg_rx.try_recv() {
                pending = merge(pending, self.panel.update(msg));
            }
            self.finish(pending);
        }
        self.close();
    }

    /// Swap in a new source list and re-register the watches for it
    pub fn rebind(&mut self, paths: Vec<String>) -> Result<(), WatchError> {
        self.panel.replace_sources(paths.clone());
        match self.watcher.rebind(&paths) {
            Ok(()) => {
                self.panel.mark_healthy();
                self.panel.display();
                Ok(())
            }
            Err(e) => {
                tracing::error!("Rebind failed: {}", e);
                let cmd = self.panel.update(Msg::WatcherFailed(e.to_string()));
                self.panel.apply(cmd);
                self.panel.display();
                Err(e)
            }
        }
    }

    pub fn close(&mut self) {
        self.watcher.close();
    }

    pub fn is_running(&self) -> bool {
        !self.quit
    }

    pub fn watcher_state(&self) -> WatcherState {
        self.watcher.state()
    }

    pub fn watcher(&self) -> &Watcher {
        &self.watcher
    }

    pub fn panel(&self) -> &Panel<H> {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut Panel<H> {
        &mut self.panel
    }

    fn finish(&mut self, cmd: Cmd) -> bool {
        if cmd == Cmd::Quit {
            self.quit = true;
        } else if cmd.needs_redraw() {
            self.panel.apply(cmd);
        }
        !self.quit
    }
}

/// Combine two commands from one drain; quit wins, then a full redraw
fn merge(a: Cmd, b: Cmd) -> Cmd {
    match (a, b) {
        (Cmd::Quit, _) | (_, Cmd::Quit) => Cmd::Quit,
        (Cmd::Redraw, _) | (_, Cmd::Redraw) => Cmd::Redraw,
        (Cmd::Repaint, _) | (_, Cmd::Repaint) => Cmd::Repaint,
        _ => Cmd::None,
    }
}

impl<H: Host> Drop for PanelRuntime<H> {
    fn drop(&mut self) {
        self.watcher.close();
    }
}
