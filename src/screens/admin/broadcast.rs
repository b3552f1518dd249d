//! Broadcast - message composer and delivery history.
//!
//! Media is uploaded first and only its reference travels with the send call,
//! so sending stays disabled while an upload is in flight. Delivery happens
//! asynchronously server-side; after a send the history is polled until every
//! broadcast reports a terminal status.

use std::path::PathBuf;

use crate::models::{Audience, AudienceCounts, BroadcastButton, BroadcastRequest, PastBroadcast};
use crate::screens::{cursor_down, cursor_up};

/// Reference to an uploaded media file
#[derive(Clone, Debug, PartialEq)]
pub struct MediaRef {
    pub media_id: String,
    pub file_name: String,
}

/// Parse `Label | https://link` into a link button
pub fn parse_button(spec: &str) -> Option<BroadcastButton> {
    let (text, url) = spec.split_once('|')?;
    let text = text.trim();
    let url = url.trim();
    if text.is_empty() || !(url.starts_with("https://") || url.starts_with("http://")) {
        return None;
    }
    Some(BroadcastButton {
        text: text.to_string(),
        url: url.to_string(),
    })
}

/// True when every broadcast in the history has finished delivering
pub fn history_settled(history: &[PastBroadcast]) -> bool {
    history.iter().all(PastBroadcast::is_terminal)
}

/// Audience label with its count, or `...` while counts are loading
pub fn audience_label(audience: Audience, counts: Option<&AudienceCounts>) -> String {
    match counts {
        Some(counts) => format!("{} ({})", audience.label(), audience.count(counts)),
        None => format!("{} (...)", audience.label()),
    }
}

#[derive(Clone, Debug, Default)]
pub struct BroadcastScreen {
    pub audience: Audience,
    pub message: String,
    pub media: Option<MediaRef>,
    pub media_path: String,
    pub buttons: Vec<BroadcastButton>,
    pub button_spec: String,
    pub uploading: bool,
    pub sending: bool,
    pub history_cursor: usize,
    /// History row with delivery counters unfolded
    pub expanded: Option<i64>,
}

impl BroadcastScreen {
    /// Send is possible with text or media, and nothing in flight
    pub fn can_send(&self) -> bool {
        let has_content = !self.message.trim().is_empty() || self.media.is_some();
        has_content && !self.sending && !self.uploading
    }

    pub fn next_audience(&mut self) {
        self.audience = self.audience.next();
    }

    pub fn prev_audience(&mut self) {
        self.audience = self.audience.prev();
    }

    /// Payload for the send call; marks the composer busy
    pub fn begin_send(&mut self) -> Option<BroadcastRequest> {
        if !self.can_send() {
            return None;
        }
        self.sending = true;
        Some(BroadcastRequest {
            audience: self.audience.index(),
            message: self.message.trim().to_string(),
            media_id: self.media.as_ref().map(|m| m.media_id.clone()),
            buttons: self.buttons.clone(),
        })
    }

    pub fn on_sent(&mut self) {
        self.sending = false;
        self.message.clear();
        self.media = None;
        self.buttons.clear();
    }

    pub fn on_send_failed(&mut self) {
        self.sending = false;
    }

    /// File to upload from the typed path; marks the upload in flight
    pub fn begin_upload(&mut self) -> Option<PathBuf> {
        let path = self.media_path.trim();
        if path.is_empty() || self.uploading || self.sending {
            return None;
        }
        self.uploading = true;
        Some(PathBuf::from(path))
    }

    pub fn on_uploaded(&mut self, media: MediaRef) {
        self.uploading = false;
        self.media_path.clear();
        self.media = Some(media);
    }

    pub fn on_upload_failed(&mut self) {
        self.uploading = false;
    }

    pub fn remove_media(&mut self) {
        if !self.sending {
            self.media = None;
        }
    }

    /// Add the typed button; returns false when the spec is malformed
    pub fn add_button(&mut self) -> bool {
        match parse_button(&self.button_spec) {
            Some(button) => {
                self.buttons.push(button);
                self.button_spec.clear();
                true
            }
            None => false,
        }
    }

    pub fn clear_buttons(&mut self) {
        self.buttons.clear();
    }

    pub fn cursor_up(&mut self, history: &[PastBroadcast]) {
        self.history_cursor = cursor_up(self.history_cursor, history.len());
    }

    pub fn cursor_down(&mut self, history: &[PastBroadcast]) {
        self.history_cursor = cursor_down(self.history_cursor, history.len());
    }

    /// Fold/unfold the history row under the cursor
    pub fn toggle_expanded(&mut self, history: &[PastBroadcast]) {
        let Some(item) = history.get(self.history_cursor) else {
            return;
        };
        self.expanded = if self.expanded == Some(item.id) {
            None
        } else {
            Some(item.id)
        };
    }
}
