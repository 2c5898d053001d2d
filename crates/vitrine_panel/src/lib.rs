//! Vitrine Panel
//!
//! The slide-in code panel shown next to every gallery demo.
//!
//! # Features
//!
//! - **State machine**: `Closed`, `Open/Loading`, `Open/Ready`, `Open/Failed`
//! - **Staleness guard**: Late results for a previous identifier are discarded
//! - **Layout shift**: One spring-driven offset shared by content and toggle
//! - **Copy feedback**: A `copied` flag that clears exactly 2 s after a copy
//! - **Driver**: A tokio event loop that dispatches fetches and timers
//!
//! Clipboard and fetch access are capabilities handed to the panel explicitly;
//! nothing here reaches for process-wide handles.

pub mod clipboard;
pub mod driver;
pub mod fetch;
pub mod layout;
pub mod motion;
pub mod panel;
pub mod state;

pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard, Osc52Clipboard};
pub use driver::{PanelDriver, PanelEvent};
pub use fetch::{FetchError, FetchResult, ProviderFetch, SourceFetch};
pub use layout::{LayoutFrame, PanelLayout, ShiftTarget, PANEL_MARGIN, PANEL_WIDTH};
pub use motion::{Spring, SpringConfig};
pub use panel::{Completion, CopyOutcome, SourcePanel, SourceRequest, COPY_FEEDBACK};
pub use state::{PanelContent, PanelPhase, PanelState};
