//! Source panel state machine
//!
//! ```text
//!            toggle on                 Ok(text)
//!   Closed ───────────▶ Open/Loading ───────────▶ Open/Ready
//!     ▲                      │                        │
//!     │ toggle off           │ Err(e)                 │ copy
//!     └──────────────────────┴──▶ Open/Failed         ▼
//!                                                copied (2 s)
//! ```
//!
//! The panel itself performs no I/O. Transitions that need source text return
//! a [`SourceRequest`]; whoever drives the panel resolves it and hands the
//! result back through [`SourcePanel::complete`]. A result is applied only if
//! its identifier still matches the panel's current identifier, so a slow
//! answer for a previous demo can never overwrite the current one.

use std::time::{Duration, Instant};

use vitrine_core::SourceId;

use crate::clipboard::Clipboard;
use crate::fetch::FetchResult;
use crate::layout::{LayoutFrame, PanelLayout};
use crate::state::{PanelContent, PanelPhase, PanelState};

/// How long the copy confirmation stays visible
pub const COPY_FEEDBACK: Duration = Duration::from_millis(2000);

/// A request the panel wants resolved
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceRequest {
    pub id: SourceId,
    /// Increases with every request this panel issues
    pub generation: u64,
}

/// What happened to a completed request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// Identifier changed or the panel unmounted; result dropped
    Stale,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    /// Panel is not open with ready content
    Unavailable,
    /// Clipboard refused the write
    Failed,
}

pub struct SourcePanel {
    source: SourceId,
    state: PanelState,
    layout: PanelLayout,
    in_flight: Option<SourceRequest>,
    generation: u64,
    copied_at: Option<Instant>,
    mounted: bool,
}

impl SourcePanel {
    /// Mount a closed panel for `source`.
    pub fn mount(source: SourceId) -> Self {
        tracing::debug!("Mounted source panel for {}", source);
        Self {
            source,
            state: PanelState::default(),
            layout: PanelLayout::at_rest(false),
            in_flight: None,
            generation: 0,
            copied_at: None,
            mounted: true,
        }
    }

    pub fn source(&self) -> &SourceId {
        &self.source
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn phase(&self) -> PanelPhase {
        self.state.phase()
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open
    }

    pub fn content(&self) -> &PanelContent {
        &self.state.content
    }

    pub fn is_copied(&self) -> bool {
        self.state.copied
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// The request whose answer the panel is currently waiting for
    pub fn in_flight(&self) -> Option<&SourceRequest> {
        self.in_flight.as_ref()
    }

    pub fn layout(&self) -> &PanelLayout {
        &self.layout
    }

    /// Advance the layout springs by `dt` seconds and report the frame
    pub fn animate(&mut self, dt: f32, viewport_width: f32) -> LayoutFrame {
        self.layout.step(dt);
        self.layout.frame(viewport_width)
    }

    pub fn toggle(&mut self) -> Option<SourceRequest> {
        if self.state.is_open {
            self.close();
            None
        } else {
            self.open()
        }
    }

    /// Open the panel and request fresh text. No-op if already open.
    pub fn open(&mut self) -> Option<SourceRequest> {
        if !self.mounted || self.state.is_open {
            return None;
        }
        self.state.is_open = true;
        self.layout.retarget(true);
        Some(self.begin_request())
    }

    /// Close the panel. A pending request keeps running; its result still
    /// lands if the identifier has not changed by then.
    pub fn close(&mut self) {
        if !self.state.is_open {
            return;
        }
        self.state.is_open = false;
        self.layout.retarget(false);
        tracing::debug!("Closed source panel for {}", self.source);
    }

    /// Point the panel at a different source.
    ///
    /// Content resets to `Loading`. An open panel immediately requests the new
    /// text; a closed one waits until it is opened.
    pub fn set_source(&mut self, source: SourceId) -> Option<SourceRequest> {
        if !self.mounted || source == self.source {
            return None;
        }
        tracing::debug!("Source panel switched from {} to {}", self.source, source);
        self.source = source;
        self.state.content = PanelContent::Loading;
        self.in_flight = None;
        if self.state.is_open {
            Some(self.begin_request())
        } else {
            None
        }
    }

    /// Feed a resolved request back into the panel.
    pub fn complete(&mut self, request: &SourceRequest, result: FetchResult) -> Completion {
        if !self.mounted || request.id != self.source {
            tracing::debug!(
                "Discarded stale result for {} (generation {})",
                request.id,
                request.generation
            );
            return Completion::Stale;
        }

        if self
            .in_flight
            .as_ref()
            .is_some_and(|pending| pending.generation == request.generation)
        {
            self.in_flight = None;
        }

        self.state.content = match result {
            Ok(text) => PanelContent::Ready(text),
            Err(err) => {
                tracing::warn!("Failed to load source {}: {}", request.id, err);
                PanelContent::Failed(format!("Error loading source: {}", err))
            }
        };
        Completion::Applied
    }

    /// Copy the displayed text. Only valid in `Open/Ready`.
    pub fn copy(&mut self, clipboard: &mut dyn Clipboard, now: Instant) -> CopyOutcome {
        let text = match (&self.state.content, self.state.is_open) {
            (PanelContent::Ready(text), true) => text.clone(),
            _ => return CopyOutcome::Unavailable,
        };

        match clipboard.set_text(&text) {
            Ok(()) => {
                self.state.copied = true;
                self.copied_at = Some(now);
                CopyOutcome::Copied
            }
            Err(err) => {
                tracing::error!("Failed to copy source {}: {}", self.source, err);
                CopyOutcome::Failed
            }
        }
    }

    /// When the copy confirmation should clear, if it is showing
    pub fn copy_deadline(&self) -> Option<Instant> {
        self.copied_at.map(|at| at + COPY_FEEDBACK)
    }

    /// Advance timers. Returns true if the copy confirmation cleared.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.copy_deadline() {
            Some(deadline) if now >= deadline => {
                self.state.copied = false;
                self.copied_at = None;
                true
            }
            _ => false,
        }
    }

    /// Tear the panel down. Any result arriving afterwards is discarded.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.in_flight = None;
        self.copied_at = None;
        self.state = PanelState::default();
        tracing::debug!("Unmounted source panel for {}", self.source);
    }

    fn begin_request(&mut self) -> SourceRequest {
        self.generation += 1;
        let request = SourceRequest {
            id: self.source.clone(),
            generation: self.generation,
        };
        if let Some(previous) = self.in_flight.replace(request.clone()) {
            tracing::trace!(
                "Request {} superseded by {}",
                previous.generation,
                request.generation
            );
        }
        self.state.content = PanelContent::Loading;
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::fetch::FetchError;
    use std::sync::Arc;
    use vitrine_core::ErrorKind;

    fn id(s: &str) -> SourceId {
        SourceId::new(s).unwrap()
    }

    fn ready(text: &str) -> FetchResult {
        Ok(Arc::from(text))
    }

    #[test]
    fn test_mount_is_closed_and_loading() {
        let panel = SourcePanel::mount(id("a.ts"));
        assert_eq!(panel.phase(), PanelPhase::Closed);
        assert_eq!(panel.content(), &PanelContent::Loading);
        assert!(panel.in_flight().is_none());
    }

    #[test]
    fn test_open_issues_request_and_applies_result() {
        let mut panel = SourcePanel::mount(id("a.ts"));
        let request = panel.toggle().unwrap();
        assert_eq!(request.id, id("a.ts"));
        assert_eq!(panel.phase(), PanelPhase::Loading);

        assert_eq!(panel.complete(&request, ready("console.log(1)")), Completion::Applied);
        assert_eq!(panel.phase(), PanelPhase::Ready);
        assert_eq!(panel.content().display_text(), "console.log(1)");
        assert!(panel.in_flight().is_none());
    }

    #[test]
    fn test_failure_message_names_kind_and_detail() {
        let mut panel = SourcePanel::mount(id("b.ts"));
        let request = panel.open().unwrap();
        panel.complete(
            &request,
            Err(FetchError::Source {
                kind: ErrorKind::NotFound,
                detail: "source not found: b.ts".into(),
            }),
        );

        assert_eq!(panel.phase(), PanelPhase::Failed);
        assert_eq!(
            panel.content().display_text(),
            "Error loading source: not found: source not found: b.ts"
        );
    }

    #[test]
    fn test_late_result_for_previous_identifier_is_discarded() {
        let mut panel = SourcePanel::mount(id("a.ts"));
        let request_a = panel.open().unwrap();
        let request_b = panel.set_source(id("b.ts")).unwrap();
        assert_eq!(panel.in_flight(), Some(&request_b));

        assert_eq!(panel.complete(&request_b, ready("b")), Completion::Applied);
        assert_eq!(panel.complete(&request_a, ready("a")), Completion::Stale);
        assert_eq!(panel.content(), &PanelContent::Ready(Arc::from("b")));
    }

    #[test]
    fn test_source_change_while_closed_waits_for_open() {
        let mut panel = SourcePanel::mount(id("a.ts"));
        let request_a = panel.open().unwrap();
        panel.complete(&request_a, ready("a"));
        panel.close();

        assert!(panel.set_source(id("b.ts")).is_none());
        assert_eq!(panel.content(), &PanelContent::Loading);

        let request_b = panel.open().unwrap();
        assert_eq!(request_b.id, id("b.ts"));
    }

    #[test]
    fn test_setting_same_source_is_noop() {
        let mut panel = SourcePanel::mount(id("a.ts"));
        let request = panel.open().unwrap();
        panel.complete(&request, ready("a"));
        assert!(panel.set_source(id("a.ts")).is_none());
        assert_eq!(panel.phase(), PanelPhase::Ready);
    }

    #[test]
    fn test_close_keeps_pending_result_for_same_identifier() {
        let mut panel = SourcePanel::mount(id("a.ts"));
        let request = panel.open().unwrap();
        panel.close();

        assert_eq!(panel.complete(&request, ready("a")), Completion::Applied);
        assert_eq!(panel.phase(), PanelPhase::Closed);
        assert_eq!(panel.content(), &PanelContent::Ready(Arc::from("a")));
    }

    #[test]
    fn test_reopen_reissues_request() {
        let mut panel = SourcePanel::mount(id("a.ts"));
        let first = panel.toggle().unwrap();
        panel.complete(&first, ready("a"));
        assert!(panel.toggle().is_none());

        let second = panel.toggle().unwrap();
        assert!(second.generation > first.generation);
        assert_eq!(panel.phase(), PanelPhase::Loading);

        panel.complete(&second, ready("a"));
        assert_eq!(panel.phase(), PanelPhase::Ready);
    }

    #[test]
    fn test_failure_then_retoggle_recovers() {
        let mut panel = SourcePanel::mount(id("a.ts"));
        let first = panel.open().unwrap();
        panel.complete(&first, Err(FetchError::Transport("refused".into())));
        assert_eq!(panel.phase(), PanelPhase::Failed);

        panel.close();
        let second = panel.open().unwrap();
        panel.complete(&second, ready("a"));
        assert_eq!(panel.phase(), PanelPhase::Ready);
    }

    #[test]
    fn test_unmount_discards_results() {
        let mut panel = SourcePanel::mount(id("a.ts"));
        let request = panel.open().unwrap();
        panel.unmount();

        assert_eq!(panel.complete(&request, ready("a")), Completion::Stale);
        assert!(panel.open().is_none());
    }

    #[test]
    fn test_copy_requires_open_ready() {
        let mut panel = SourcePanel::mount(id("a.ts"));
        let mut clipboard = MemoryClipboard::new();
        let now = Instant::now();

        assert_eq!(panel.copy(&mut clipboard, now), CopyOutcome::Unavailable);
        let request = panel.open().unwrap();
        assert_eq!(panel.copy(&mut clipboard, now), CopyOutcome::Unavailable);

        panel.complete(&request, ready("console.log(1)"));
        assert_eq!(panel.copy(&mut clipboard, now), CopyOutcome::Copied);
        assert_eq!(clipboard.contents(), Some("console.log(1)"));
        assert!(panel.is_copied());
    }

    #[test]
    fn test_copied_flag_clears_after_exactly_two_seconds() {
        let mut panel = SourcePanel::mount(id("a.ts"));
        let request = panel.open().unwrap();
        panel.complete(&request, ready("x"));

        let start = Instant::now();
        panel.copy(&mut MemoryClipboard::new(), start);

        assert!(!panel.tick(start + Duration::from_millis(1999)));
        assert!(panel.is_copied());

        assert!(panel.tick(start + COPY_FEEDBACK));
        assert!(!panel.is_copied());
        assert!(panel.copy_deadline().is_none());
    }

    #[test]
    fn test_failed_copy_changes_nothing() {
        let mut panel = SourcePanel::mount(id("a.ts"));
        let request = panel.open().unwrap();
        panel.complete(&request, ready("x"));

        let before = panel.state().clone();
        let outcome = panel.copy(&mut MemoryClipboard::refusing(), Instant::now());
        assert_eq!(outcome, CopyOutcome::Failed);
        assert_eq!(panel.state(), &before);
        assert!(panel.copy_deadline().is_none());
    }

    #[test]
    fn test_open_and_close_retarget_layout() {
        let mut panel = SourcePanel::mount(id("a.ts"));
        assert_eq!(panel.layout().target().offset, 0.0);
        panel.open();
        assert_eq!(panel.layout().target().offset, -344.0);
        panel.close();
        assert_eq!(panel.layout().target().offset, 0.0);
    }

    #[test]
    fn test_content_and_toggle_shift_together_while_animating() {
        let mut panel = SourcePanel::mount(id("a.ts"));
        assert_eq!(panel.animate(1.0 / 60.0, 1440.0).content_offset, 0.0);

        panel.open();
        let mut frame = panel.animate(1.0 / 60.0, 1440.0);
        assert!(frame.content_offset < 0.0 && frame.content_offset > -344.0);
        for _ in 0..600 {
            frame = panel.animate(1.0 / 60.0, 1440.0);
            assert_eq!(frame.content_offset, frame.toggle_offset);
        }
        assert!(panel.layout().is_settled());
        assert!((frame.content_offset + 344.0).abs() < 0.5);
    }
}
