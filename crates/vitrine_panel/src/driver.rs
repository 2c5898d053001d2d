//! Async panel driver
//!
//! Runs a [`SourcePanel`] on a tokio runtime: requests the panel emits are
//! spawned against a [`SourceFetch`], completions flow back over a channel, and
//! the copy confirmation is cleared by a timer. Completions may arrive in any
//! order; the panel's staleness guard decides which ones land.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use vitrine_core::SourceId;

use crate::clipboard::Clipboard;
use crate::fetch::{FetchResult, SourceFetch};
use crate::panel::{Completion, CopyOutcome, SourcePanel, SourceRequest};

/// Something the driver observed while waiting
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PanelEvent {
    /// A result was applied to the panel
    Applied(SourceId),
    /// A result arrived for an identifier the panel no longer shows
    Discarded(SourceId),
    /// The copy confirmation cleared
    CopyExpired,
}

type CompletionMsg = (SourceRequest, FetchResult);

pub struct PanelDriver<F, C> {
    panel: SourcePanel,
    fetcher: Arc<F>,
    clipboard: C,
    tx: mpsc::UnboundedSender<CompletionMsg>,
    rx: mpsc::UnboundedReceiver<CompletionMsg>,
    pending: usize,
}

impl<F: SourceFetch, C: Clipboard> PanelDriver<F, C> {
    pub fn new(source: SourceId, fetcher: F, clipboard: C) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            panel: SourcePanel::mount(source),
            fetcher: Arc::new(fetcher),
            clipboard,
            tx,
            rx,
            pending: 0,
        }
    }

    pub fn panel(&self) -> &SourcePanel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut SourcePanel {
        &mut self.panel
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// Number of spawned fetches whose completion has not been consumed yet
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn toggle(&mut self) {
        if let Some(request) = self.panel.toggle() {
            self.dispatch(request);
        }
    }

    pub fn open(&mut self) {
        if let Some(request) = self.panel.open() {
            self.dispatch(request);
        }
    }

    pub fn close(&mut self) {
        self.panel.close();
    }

    pub fn set_source(&mut self, source: SourceId) {
        if let Some(request) = self.panel.set_source(source) {
            self.dispatch(request);
        }
    }

    pub fn copy(&mut self) -> CopyOutcome {
        self.panel
            .copy(&mut self.clipboard, Instant::now().into_std())
    }

    pub fn unmount(&mut self) {
        self.panel.unmount();
    }

    /// Wait for the next completion or timer.
    ///
    /// Returns `None` once nothing is pending and no timer is armed.
    pub async fn next_event(&mut self) -> Option<PanelEvent> {
        let deadline = self.panel.copy_deadline().map(Instant::from_std);
        if self.pending == 0 && deadline.is_none() {
            return None;
        }

        tokio::select! {
            Some((request, result)) = self.rx.recv(), if self.pending > 0 => {
                self.pending -= 1;
                Some(self.apply(request, result))
            }
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                self.panel.tick(Instant::now().into_std());
                Some(PanelEvent::CopyExpired)
            }
            else => None,
        }
    }

    /// Drain every outstanding fetch, ignoring timers.
    pub async fn settle(&mut self) {
        while self.pending > 0 {
            match self.rx.recv().await {
                Some((request, result)) => {
                    self.pending -= 1;
                    self.apply(request, result);
                }
                None => break,
            }
        }
        self.panel.tick(Instant::now().into_std());
    }

    fn apply(&mut self, request: SourceRequest, result: FetchResult) -> PanelEvent {
        match self.panel.complete(&request, result) {
            Completion::Applied => PanelEvent::Applied(request.id),
            Completion::Stale => PanelEvent::Discarded(request.id),
        }
    }

    fn dispatch(&mut self, request: SourceRequest) {
        tracing::debug!(
            "Fetching source {} (generation {})",
            request.id,
            request.generation
        );
        let fetch = self.fetcher.fetch(request.id.clone());
        let tx = self.tx.clone();
        self.pending += 1;
        tokio::spawn(async move {
            let result = fetch.await;
            // Receiver gone means the driver was dropped; nothing to apply.
            let _ = tx.send((request, result));
        });
    }
}
