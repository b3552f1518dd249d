//! Render state - data structure sent from App layer to UI for rendering

use crate::app::state::{Queries, Screens, Toast};
use crate::messages::ui_events::{AppMode, AppTab, InputMode};

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    // Shell
    pub mode: AppMode,
    pub active_tab: AppTab,
    pub input_mode: InputMode,
    pub base_url: String,

    // Server snapshots and per-screen local state
    pub queries: Queries,
    pub screens: Screens,

    // Status line
    pub toasts: Vec<Toast>,
    /// Broadcast history is being polled after a send
    pub polling: bool,

    // Popups
    pub show_help: bool,
}

impl Default for RenderState {
    fn default() -> Self {
        let mode = AppMode::default();
        RenderState {
            mode,
            active_tab: mode.tabs()[0],
            input_mode: InputMode::Normal,
            base_url: String::new(),
            queries: Queries::default(),
            screens: Screens::default(),
            toasts: Vec::new(),
            polling: false,
            show_help: false,
        }
    }
}

impl RenderState {
    pub fn tabs(&self) -> &'static [AppTab] {
        self.mode.tabs()
    }
}
