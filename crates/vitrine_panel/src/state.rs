//! Panel state

use std::sync::Arc;

/// What the panel body shows
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PanelContent {
    #[default]
    Loading,
    Ready(Arc<str>),
    Failed(String),
}

impl PanelContent {
    /// Text to render in the panel body
    pub fn display_text(&self) -> &str {
        match self {
            PanelContent::Loading => "Loading source...",
            PanelContent::Ready(text) => text,
            PanelContent::Failed(message) => message,
        }
    }
}

/// Transient state owned by one panel instance
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PanelState {
    pub is_open: bool,
    pub content: PanelContent,
    pub copied: bool,
}

/// Coarse state-machine position
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelPhase {
    Closed,
    Loading,
    Ready,
    Failed,
}

impl PanelState {
    pub fn phase(&self) -> PanelPhase {
        if !self.is_open {
            return PanelPhase::Closed;
        }
        match self.content {
            PanelContent::Loading => PanelPhase::Loading,
            PanelContent::Ready(_) => PanelPhase::Ready,
            PanelContent::Failed(_) => PanelPhase::Failed,
        }
    }
}
