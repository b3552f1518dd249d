//! App actor - message loop processing UI events and network responses

use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::ui_events::AppMode;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// Housekeeping period: toast expiry, history refresh and polling
const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        mode: AppMode,
        base_url: impl Into<String>,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state: AppState::new(mode, base_url),
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        self.state.mount();
        self.flush();

        let mut ticker = tokio::time::interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        self.state.unmount();
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    self.flush();
                }
                Some(response) = net_rx.recv() => {
                    self.state.handle_response(response);
                    self.flush();
                }
                _ = ticker.tick() => {
                    if self.state.tick(Instant::now()) {
                        self.flush();
                    }
                }
                else => break,
            }
        }
    }

    /// Send queued commands, open pending links and publish a new frame
    fn flush(&mut self) {
        for cmd in self.state.take_commands() {
            let _ = self.network_tx.send(cmd);
        }
        if let Some(url) = self.state.take_open_url() {
            open_url(&url);
        }
        let _ = self.render_tx.send(self.state.to_render_state());
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Navigation
            UiEvent::NextTab => self.state.next_tab(),
            UiEvent::PrevTab => self.state.prev_tab(),
            UiEvent::SelectTab(index) => self.state.select_tab(index),
            UiEvent::CursorUp => self.state.cursor_up(),
            UiEvent::CursorDown => self.state.cursor_down(),
            UiEvent::Activate => self.state.activate(),
            UiEvent::Back => self.state.back(),
            UiEvent::Refresh => self.state.refresh(),

            // Input editing
            UiEvent::StartEditing(field) => self.state.start_editing(field),
            UiEvent::StopEditing => self.state.stop_editing(),
            UiEvent::SubmitInput => self.state.submit_input(),
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Backspace => self.state.delete_char(),

            // Customer actions
            UiEvent::CompleteModule => self.state.complete_module(),
            UiEvent::CycleProvider => self.state.cycle_provider(),
            UiEvent::Pay => self.state.pay(),
            UiEvent::CopyLink => self.state.copy_link(),

            // Admin actions
            UiEvent::CycleScoreFilter => self.state.cycle_score_filter(),
            UiEvent::NextAudience => self.state.next_audience(),
            UiEvent::PrevAudience => self.state.prev_audience(),
            UiEvent::RemoveMedia => self.state.remove_media(),
            UiEvent::ClearButtons => self.state.clear_buttons(),
            UiEvent::SendBroadcast => self.state.send_broadcast(),

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}

/// Hand a URL to the desktop's default opener
fn open_url(url: &str) {
    let mut cmd = if cfg!(target_os = "macos") {
        std::process::Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut cmd = std::process::Command::new("cmd");
        cmd.args(["/C", "start", ""]);
        cmd
    } else {
        std::process::Command::new("xdg-open")
    };
    cmd.arg(url)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null());

    match cmd.spawn() {
        Ok(child) => {
            tracing::info!(url, "Opened payment page");
            reap(child);
        }
        Err(e) => tracing::warn!(url, error = %e, "Could not open payment page"),
    }
}

/// Wait for a detached opener so it does not linger as a zombie
fn reap(mut child: std::process::Child) {
    std::thread::spawn(move || match child.wait() {
        Ok(status) if !status.success() => {
            tracing::warn!(%status, "URL opener exited with an error");
        }
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "Could not wait for URL opener"),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(target_os = "linux")]
    #[test]
    fn test_opener_child_is_reaped() {
        let child = std::process::Command::new("true").spawn().unwrap();
        let pid = child.id();
        reap(child);

        // Once waited on, the pid no longer has a /proc entry
        let proc_path = format!("/proc/{}", pid);
        let mut gone = false;
        for _ in 0..100 {
            if !std::path::Path::new(&proc_path).exists() {
                gone = true;
                break;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        assert!(gone, "opener process {} was left behind", pid);
    }
}
