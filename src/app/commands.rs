//! Command handlers - business logic for processing UI events and network responses

use std::time::Instant;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::app::state::{AppState, Pending};
use crate::messages::ui_events::{AppTab, InputField, InputMode};
use crate::messages::{Mutation, MutationKind, MutationOutcome, NetworkCommand, NetworkResponse};
use crate::query::{Resource, ResourceData};
use crate::screens::admin::broadcast::{history_settled, MediaRef};

impl AppState {
    // ========================
    // Requests
    // ========================

    /// Queue a fetch bound to the current screen
    pub fn fetch(&mut self, resource: Resource) {
        let id = self.next_id();
        self.pending.insert(id, Pending::Fetch(resource));
        self.queries.begin(resource);
        tracing::debug!(id, key = resource.key(), "Queue fetch");
        self.outbox.push(NetworkCommand::Fetch {
            id,
            resource,
            cancel: self.screen_token.clone(),
        });
    }

    fn mutate(&mut self, mutation: Mutation) {
        let id = self.next_id();
        self.pending.insert(id, Pending::Mutation(mutation.kind()));
        tracing::debug!(id, kind = ?mutation.kind(), "Queue mutation");
        self.outbox.push(NetworkCommand::Mutate {
            id,
            mutation,
            cancel: self.screen_token.clone(),
        });
    }

    // ========================
    // Navigation
    // ========================

    /// Issue the active screen's fetches
    pub fn mount(&mut self) {
        tracing::info!(tab = ?self.active_tab, "Mount screen");
        for resource in self.active_tab.resources() {
            self.fetch(*resource);
        }
    }

    /// Cancel everything the active screen has in flight
    pub fn unmount(&mut self) {
        self.screen_token.cancel();
        self.screen_token = CancellationToken::new();
        for (_, pending) in self.pending.drain() {
            match pending {
                Pending::Fetch(resource) => self.queries.abandon(resource),
                Pending::Mutation(kind) => self.screens.release(kind),
            }
        }
        self.poller.stop();
        self.input_mode = InputMode::Normal;
    }

    pub fn switch_tab(&mut self, tab: AppTab) {
        if tab == self.active_tab || !self.mode.tabs().contains(&tab) {
            return;
        }
        self.unmount();
        self.active_tab = tab;
        self.mount();
    }

    pub fn select_tab(&mut self, index: usize) {
        if let Some(tab) = self.mode.tabs().get(index) {
            self.switch_tab(*tab);
        }
    }

    pub fn next_tab(&mut self) {
        let tabs = self.mode.tabs();
        let i = tabs.iter().position(|t| *t == self.active_tab).unwrap_or(0);
        self.switch_tab(tabs[(i + 1) % tabs.len()]);
    }

    pub fn prev_tab(&mut self) {
        let tabs = self.mode.tabs();
        let i = tabs.iter().position(|t| *t == self.active_tab).unwrap_or(0);
        self.switch_tab(tabs[(i + tabs.len() - 1) % tabs.len()]);
    }

    /// Refetch whatever the active screen shows
    pub fn refresh(&mut self) {
        for resource in self.active_tab.resources() {
            if !self.is_fetching(*resource) {
                self.fetch(*resource);
            }
        }
    }

    pub fn cursor_up(&mut self) {
        let screens = &mut self.screens;
        match self.active_tab {
            AppTab::Course => screens.course.cursor_up(self.queries.course_modules()),
            AppTab::Users => screens.crm.cursor_up(self.queries.users()),
            AppTab::Broadcast => screens.broadcast.cursor_up(self.queries.broadcasts()),
            _ => {}
        }
    }

    pub fn cursor_down(&mut self) {
        let screens = &mut self.screens;
        match self.active_tab {
            AppTab::Course => screens.course.cursor_down(self.queries.course_modules()),
            AppTab::Users => screens.crm.cursor_down(self.queries.users()),
            AppTab::Broadcast => screens.broadcast.cursor_down(self.queries.broadcasts()),
            _ => {}
        }
    }

    pub fn activate(&mut self) {
        match self.active_tab {
            AppTab::Course => {
                let modules = self.queries.course_modules();
                if !self.screens.course.open(modules) && !modules.is_empty() {
                    self.toast_error("This module is locked");
                }
            }
            AppTab::Users => {
                self.screens.crm.open(self.queries.users());
            }
            AppTab::Broadcast => {
                self.screens.broadcast.toggle_expanded(self.queries.broadcasts());
            }
            _ => {}
        }
    }

    pub fn back(&mut self) {
        match self.active_tab {
            AppTab::Course => self.screens.course.close(),
            AppTab::Users => self.screens.crm.close(),
            AppTab::Broadcast => self.screens.broadcast.expanded = None,
            _ => {}
        }
    }

    // ========================
    // Input editing
    // ========================

    pub fn start_editing(&mut self, field: InputField) {
        self.input_mode = InputMode::Editing(field);
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    fn editing_buffer(&mut self) -> Option<&mut String> {
        let InputMode::Editing(field) = self.input_mode else {
            return None;
        };
        let broadcast = &mut self.screens.broadcast;
        Some(match field {
            InputField::CrmSearch => return None,
            InputField::BroadcastMessage => &mut broadcast.message,
            InputField::MediaPath => &mut broadcast.media_path,
            InputField::ButtonSpec => &mut broadcast.button_spec,
        })
    }

    pub fn enter_char(&mut self, c: char) {
        if self.input_mode == InputMode::Editing(InputField::CrmSearch) {
            self.screens.crm.search_char(c);
        } else if let Some(buffer) = self.editing_buffer() {
            buffer.push(c);
        }
    }

    pub fn delete_char(&mut self) {
        if self.input_mode == InputMode::Editing(InputField::CrmSearch) {
            self.screens.crm.search_backspace();
        } else if let Some(buffer) = self.editing_buffer() {
            buffer.pop();
        }
    }

    /// Enter pressed inside a text field
    pub fn submit_input(&mut self) {
        let InputMode::Editing(field) = self.input_mode else {
            return;
        };
        self.input_mode = InputMode::Normal;
        match field {
            InputField::CrmSearch | InputField::BroadcastMessage => {}
            InputField::MediaPath => self.upload_media(),
            InputField::ButtonSpec => {
                if !self.screens.broadcast.add_button() {
                    self.toast_error("Button format: Label | https://link");
                }
            }
        }
    }

    // ========================
    // Customer actions
    // ========================

    pub fn complete_module(&mut self) {
        let modules = self.queries.course_modules();
        if let Some(update) = self.screens.course.begin_complete(modules) {
            self.mutate(Mutation::UpdateProgress(update));
        }
    }

    pub fn cycle_provider(&mut self) {
        self.screens.payment.cycle_provider();
    }

    pub fn pay(&mut self) {
        let active = self
            .queries
            .profile
            .data()
            .map(|p| p.has_active_subscription())
            .unwrap_or(false);
        if active {
            self.toast_success("Your subscription is already active");
            return;
        }
        if let Some(provider) = self.screens.payment.begin_payment() {
            self.mutate(Mutation::InitPayment(provider));
        }
    }

    pub fn copy_link(&mut self) {
        let stats = self.queries.referral_stats.data();
        match self.screens.referral.copy_link(stats) {
            Some(link) => self.toast_success(format!("Link: {}", link)),
            None => self.toast_error("Referral link is not loaded yet"),
        }
    }

    // ========================
    // Admin actions
    // ========================

    pub fn cycle_score_filter(&mut self) {
        self.screens.crm.cycle_filter();
    }

    pub fn next_audience(&mut self) {
        self.screens.broadcast.next_audience();
    }

    pub fn prev_audience(&mut self) {
        self.screens.broadcast.prev_audience();
    }

    pub fn remove_media(&mut self) {
        self.screens.broadcast.remove_media();
    }

    pub fn clear_buttons(&mut self) {
        self.screens.broadcast.clear_buttons();
    }

    pub fn upload_media(&mut self) {
        if let Some(path) = self.screens.broadcast.begin_upload() {
            self.mutate(Mutation::UploadMedia(path));
        }
    }

    pub fn send_broadcast(&mut self) {
        let broadcast = &self.screens.broadcast;
        if broadcast.sending || broadcast.uploading {
            return;
        }
        match self.screens.broadcast.begin_send() {
            Some(request) => self.mutate(Mutation::SendBroadcast(request)),
            None => self.toast_error("Write a message or attach media first"),
        }
    }

    // ========================
    // Popups
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Timers
    // ========================

    /// Periodic housekeeping; returns true if the screen should re-render
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = self.prune_toasts(Utc::now());

        if self.poller.fire(now) {
            self.fetch(Resource::Broadcasts);
            changed = true;
        } else if !self.poller.is_active() {
            for resource in self.active_tab.resources() {
                let Some(interval) = resource.refresh_interval() else {
                    continue;
                };
                // Never attempted counts as due
                let stale = self
                    .last_attempt
                    .get(resource)
                    .map(|at| now.saturating_duration_since(*at) >= interval)
                    .unwrap_or(true);
                if stale && !self.is_fetching(*resource) {
                    self.fetch(*resource);
                    changed = true;
                }
            }
        }
        changed
    }

    // ========================
    // Network responses
    // ========================

    pub fn handle_response(&mut self, response: NetworkResponse) {
        let Some(pending) = self.pending.remove(&response.id()) else {
            tracing::debug!(id = response.id(), "Dropping response for an unmounted screen");
            return;
        };

        match response {
            NetworkResponse::Fetched { data, .. } => self.on_fetched(data),
            NetworkResponse::FetchFailed {
                resource, message, ..
            } => {
                let now = Instant::now();
                self.last_attempt.insert(resource, now);
                if resource == Resource::Broadcasts {
                    self.poller.observe(false, now);
                }
                if let Some(message) = self.queries.fail(resource, message) {
                    self.toast_error(message);
                }
            }
            NetworkResponse::Mutated { outcome, .. } => self.on_mutated(outcome),
            NetworkResponse::MutationFailed { kind, message, .. } => {
                self.screens.release(kind);
                self.toast_error(message);
            }
            NetworkResponse::Cancelled { .. } => match pending {
                Pending::Fetch(resource) => self.queries.abandon(resource),
                Pending::Mutation(kind) => self.screens.release(kind),
            },
        }
    }

    fn on_fetched(&mut self, data: ResourceData) {
        let now = Instant::now();
        let resource = data.resource();
        self.last_attempt.insert(resource, now);
        if let ResourceData::Broadcasts(history) = &data {
            self.poller.observe(history_settled(history), now);
        }
        self.queries.resolve(data);
    }

    fn on_mutated(&mut self, outcome: MutationOutcome) {
        match outcome {
            MutationOutcome::PaymentStarted(payment) => {
                let url = self.screens.payment.on_payment_started(payment);
                self.toast_success("Opening payment page");
                self.pending_open = Some(url);
            }
            MutationOutcome::ProgressSaved { module_id } => {
                tracing::info!(module_id, "Module completed");
                self.screens.course.on_progress_saved();
                self.toast_success("Module completed");
                self.fetch(Resource::CourseModules);
            }
            MutationOutcome::MediaUploaded { upload, file_name } => {
                self.toast_success(format!("Uploaded {}", file_name));
                self.screens.broadcast.on_uploaded(MediaRef {
                    media_id: upload.media_id,
                    file_name,
                });
            }
            MutationOutcome::BroadcastAccepted(accepted) => {
                tracing::info!(status = %accepted.status, "Broadcast accepted");
                self.screens.broadcast.on_sent();
                let text = accepted
                    .message
                    .unwrap_or_else(|| String::from("Broadcast queued for delivery"));
                self.toast_success(text);
                let now = Instant::now();
                self.poller.start(now);
                if self.poller.fire(now) {
                    self.fetch(Resource::Broadcasts);
                }
            }
        }
    }

    /// Mutation kinds currently in flight
    pub fn busy(&self) -> Vec<MutationKind> {
        self.pending
            .values()
            .filter_map(|p| match p {
                Pending::Mutation(kind) => Some(*kind),
                Pending::Fetch(_) => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::ui_events::AppMode;
    use crate::models::{
        Audience, AudienceCounts, BroadcastAccepted, CourseModule, MediaUpload, PastBroadcast,
        PaymentInit, PaymentProvider, ReferralStats,
    };
    use crate::query::QueryState;

    fn fetch_ids(commands: &[NetworkCommand]) -> Vec<(u64, Resource)> {
        commands
            .iter()
            .filter_map(|c| match c {
                NetworkCommand::Fetch { id, resource, .. } => Some((*id, *resource)),
                _ => None,
            })
            .collect()
    }

    fn mutation(commands: &[NetworkCommand]) -> Option<(u64, Mutation)> {
        commands.iter().find_map(|c| match c {
            NetworkCommand::Mutate { id, mutation, .. } => Some((*id, mutation.clone())),
            _ => None,
        })
    }

    fn admin_on_broadcast() -> AppState {
        let mut state = AppState::new(AppMode::Admin, "http://api");
        state.mount();
        state.switch_tab(AppTab::Broadcast);
        state
    }

    #[test]
    fn test_mount_fetches_screen_resources() {
        let mut state = AppState::new(AppMode::Customer, "");
        state.mount();
        let fetches = fetch_ids(&state.take_commands());
        assert_eq!(fetches, vec![(1, Resource::Profile)]);
        assert_eq!(state.queries.profile, QueryState::Loading);
    }

    #[test]
    fn test_tab_switch_cancels_previous_screen() {
        let mut state = AppState::new(AppMode::Customer, "");
        state.mount();
        let first = state.take_commands();
        let NetworkCommand::Fetch { cancel, .. } = &first[0] else {
            panic!("expected fetch");
        };
        let old_token = cancel.clone();

        state.select_tab(1);
        assert!(old_token.is_cancelled());
        assert_eq!(state.active_tab, AppTab::Course);
        assert_eq!(state.queries.profile, QueryState::Idle);

        let next = state.take_commands();
        assert_eq!(fetch_ids(&next), vec![(2, Resource::CourseModules)]);
        let NetworkCommand::Fetch { cancel, .. } = &next[0] else {
            panic!("expected fetch");
        };
        assert!(!cancel.is_cancelled());

        // The late answer for the unmounted dashboard is dropped
        state.handle_response(NetworkResponse::Cancelled { id: 1 });
        assert_eq!(state.queries.profile, QueryState::Idle);
    }

    #[test]
    fn test_admin_tabs_are_not_reachable_from_customer() {
        let mut state = AppState::new(AppMode::Customer, "");
        state.switch_tab(AppTab::Broadcast);
        assert_eq!(state.active_tab, AppTab::Dashboard);
        state.select_tab(7);
        assert_eq!(state.active_tab, AppTab::Dashboard);
        state.prev_tab();
        assert_eq!(state.active_tab, AppTab::Referral);
    }

    #[test]
    fn test_broadcast_send_flow() {
        let mut state = admin_on_broadcast();
        let fetches = fetch_ids(&state.take_commands());
        let counts_id = fetches
            .iter()
            .find(|(_, r)| *r == Resource::AudienceCounts)
            .map(|(id, _)| *id)
            .unwrap();
        state.handle_response(NetworkResponse::Fetched {
            id: counts_id,
            data: ResourceData::AudienceCounts(AudienceCounts {
                all: 500,
                hot: 40,
                ..Default::default()
            }),
        });

        state.next_audience();
        state.next_audience();
        assert_eq!(state.screens.broadcast.audience, Audience::Hot);
        state.start_editing(InputField::BroadcastMessage);
        for c in "Salom".chars() {
            state.enter_char(c);
        }
        state.submit_input();
        state.send_broadcast();

        let (send_id, sent) = mutation(&state.take_commands()).unwrap();
        let Mutation::SendBroadcast(request) = sent else {
            panic!("expected broadcast");
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"audience": 2, "message": "Salom"})
        );
        assert!(!state.screens.broadcast.can_send());

        state.handle_response(NetworkResponse::Mutated {
            id: send_id,
            outcome: MutationOutcome::BroadcastAccepted(BroadcastAccepted {
                status: "queued".into(),
                message: Some("Broadcast started for 40 users".into()),
            }),
        });
        assert!(state.screens.broadcast.message.is_empty());
        assert_eq!(
            state.toasts.last().map(|t| t.text.as_str()),
            Some("Broadcast started for 40 users")
        );
        assert!(state.poller.is_active());
        // Immediate history refetch
        let refetch = fetch_ids(&state.take_commands());
        assert_eq!(refetch.len(), 1);
        assert_eq!(refetch[0].1, Resource::Broadcasts);

        // Terminal history stops the poller
        state.handle_response(NetworkResponse::Fetched {
            id: refetch[0].0,
            data: ResourceData::Broadcasts(vec![PastBroadcast {
                id: 1,
                title: "Salom".into(),
                sent: 40,
                delivered: 39,
                failed: 1,
                status: "completed".into(),
                date: "2026-10-18".into(),
            }]),
        });
        assert!(!state.poller.is_active());
    }

    #[test]
    fn test_empty_composer_does_not_send() {
        let mut state = admin_on_broadcast();
        state.take_commands();
        state.send_broadcast();
        assert!(mutation(&state.take_commands()).is_none());
        assert_eq!(state.toasts.len(), 1);
    }

    #[test]
    fn test_upload_then_send_with_media() {
        let mut state = admin_on_broadcast();
        state.take_commands();
        state.start_editing(InputField::MediaPath);
        for c in "/tmp/promo.jpg".chars() {
            state.enter_char(c);
        }
        state.submit_input();
        let (upload_id, upload) = mutation(&state.take_commands()).unwrap();
        assert_eq!(upload, Mutation::UploadMedia("/tmp/promo.jpg".into()));

        // Sending is blocked while the upload runs
        state.send_broadcast();
        assert!(state.take_commands().is_empty());

        state.handle_response(NetworkResponse::Mutated {
            id: upload_id,
            outcome: MutationOutcome::MediaUploaded {
                upload: MediaUpload {
                    media_id: "77".into(),
                },
                file_name: "promo.jpg".into(),
            },
        });
        state.send_broadcast();
        let (_, sent) = mutation(&state.take_commands()).unwrap();
        let Mutation::SendBroadcast(request) = sent else {
            panic!("expected broadcast");
        };
        assert_eq!(request.media_id.as_deref(), Some("77"));
    }

    #[test]
    fn test_unmount_releases_busy_flags() {
        let mut state = admin_on_broadcast();
        state.screens.broadcast.message = "Hi".into();
        state.send_broadcast();
        assert_eq!(state.busy(), vec![MutationKind::Broadcast]);
        state.select_tab(0);
        assert!(!state.screens.broadcast.sending);
        assert!(state.busy().is_empty());
    }

    #[test]
    fn test_locked_module_shows_toast() {
        let mut state = AppState::new(AppMode::Customer, "");
        state.switch_tab(AppTab::Course);
        let (id, _) = fetch_ids(&state.take_commands())[0];
        let module = |id: i64, locked: bool| CourseModule {
            id,
            title: format!("Module {}", id),
            description: None,
            video_url: None,
            order: id as u32,
            is_locked: locked,
            completion_pct: 0.0,
            is_completed: false,
        };
        state.handle_response(NetworkResponse::Fetched {
            id,
            data: ResourceData::CourseModules(vec![module(1, false), module(2, true)]),
        });
        state.cursor_down();
        state.activate();
        assert_eq!(state.screens.course.active, None);
        assert_eq!(state.toasts.len(), 1);

        state.cursor_up();
        state.activate();
        assert_eq!(state.screens.course.active, Some(1));
        state.complete_module();
        let (progress_id, _) = mutation(&state.take_commands()).unwrap();
        state.handle_response(NetworkResponse::Mutated {
            id: progress_id,
            outcome: MutationOutcome::ProgressSaved { module_id: 1 },
        });
        assert_eq!(state.screens.course.active, None);
        assert_eq!(fetch_ids(&state.take_commands())[0].1, Resource::CourseModules);
    }

    #[test]
    fn test_payment_opens_url() {
        let mut state = AppState::new(AppMode::Customer, "");
        state.switch_tab(AppTab::Payment);
        state.take_commands();
        state.cycle_provider();
        state.pay();
        let (id, sent) = mutation(&state.take_commands()).unwrap();
        assert_eq!(sent, Mutation::InitPayment(PaymentProvider::Payme));
        state.handle_response(NetworkResponse::Mutated {
            id,
            outcome: MutationOutcome::PaymentStarted(PaymentInit {
                payment_id: 1,
                base_price: 97_000,
                referral_discount: 0,
                final_price: 97_000,
                payment_url: "https://pay.example/1".into(),
            }),
        });
        assert_eq!(state.take_open_url().as_deref(), Some("https://pay.example/1"));
        assert_eq!(state.take_open_url(), None);
    }

    #[test]
    fn test_failed_mutation_toasts_detail() {
        let mut state = AppState::new(AppMode::Customer, "");
        state.switch_tab(AppTab::Payment);
        state.take_commands();
        state.pay();
        let (id, _) = mutation(&state.take_commands()).unwrap();
        state.handle_response(NetworkResponse::MutationFailed {
            id,
            kind: MutationKind::Payment,
            message: "Payment provider unavailable".into(),
        });
        assert!(!state.screens.payment.processing);
        assert_eq!(state.toasts[0].text, "Payment provider unavailable");
    }

    #[test]
    fn test_copy_link() {
        let mut state = AppState::new(AppMode::Customer, "");
        state.switch_tab(AppTab::Referral);
        state.copy_link();
        assert_eq!(state.toasts[0].text, "Referral link is not loaded yet");

        let (id, _) = fetch_ids(&state.take_commands())[0];
        state.handle_response(NetworkResponse::Fetched {
            id,
            data: ResourceData::ReferralStats(ReferralStats {
                referral_link: "https://t.me/bot?start=ref_1".into(),
                total_invited: 0,
                valid_referrals: 0,
                paid_referrals: 0,
                balance: 0,
                club_price: 97_000,
                amount_for_free: 97_000,
            }),
        });
        state.copy_link();
        assert!(state.toasts[1].text.ends_with("ref_1"));
        assert!(state.screens.referral.copied);
    }

    #[test]
    fn test_history_refreshes_on_interval() {
        let mut state = admin_on_broadcast();
        let fetches = fetch_ids(&state.take_commands());
        let history_id = fetches
            .iter()
            .find(|(_, r)| *r == Resource::Broadcasts)
            .map(|(id, _)| *id)
            .unwrap();
        state.handle_response(NetworkResponse::Fetched {
            id: history_id,
            data: ResourceData::Broadcasts(Vec::new()),
        });

        let fetched_at = state.last_attempt[&Resource::Broadcasts];
        state.tick(fetched_at);
        assert!(state.take_commands().is_empty());
        state.tick(fetched_at + std::time::Duration::from_secs(5));
        assert_eq!(
            fetch_ids(&state.take_commands())
                .iter()
                .map(|(_, r)| *r)
                .collect::<Vec<_>>(),
            vec![Resource::Broadcasts]
        );
    }
    fn history_fetches(state: &mut AppState) -> Vec<u64> {
        fetch_ids(&state.take_commands())
            .into_iter()
            .filter(|(_, r)| *r == Resource::Broadcasts)
            .map(|(id, _)| id)
            .collect()
    }

    #[test]
    fn test_failed_history_refetch_waits_for_interval() {
        let mut state = admin_on_broadcast();
        let first = history_fetches(&mut state)[0];
        state.handle_response(NetworkResponse::Fetched {
            id: first,
            data: ResourceData::Broadcasts(Vec::new()),
        });
        let loaded_at = state.last_attempt[&Resource::Broadcasts];

        state.tick(loaded_at + std::time::Duration::from_secs(5));
        let refetch = history_fetches(&mut state);
        assert_eq!(refetch.len(), 1);
        state.handle_response(NetworkResponse::FetchFailed {
            id: refetch[0],
            resource: Resource::Broadcasts,
            message: "HTTP 502".into(),
        });
        let failed_at = state.last_attempt[&Resource::Broadcasts];
        assert_eq!(state.toasts.len(), 1);

        // Ticks inside the interval after a failure stay quiet
        let mut issued = 0;
        for step in 1..=8u64 {
            state.tick(failed_at + std::time::Duration::from_millis(250 * step));
            issued += history_fetches(&mut state).len();
        }
        assert_eq!(issued, 0);
        assert_eq!(state.toasts.len(), 1);
        assert!(state.queries.broadcasts.data().is_some());

        state.tick(failed_at + std::time::Duration::from_secs(5));
        assert_eq!(history_fetches(&mut state).len(), 1);
    }

    #[test]
    fn test_failed_first_history_load_is_retried_on_interval() {
        let mut state = admin_on_broadcast();
        let first = history_fetches(&mut state)[0];
        state.handle_response(NetworkResponse::FetchFailed {
            id: first,
            resource: Resource::Broadcasts,
            message: "HTTP 500".into(),
        });
        assert_eq!(state.queries.broadcasts.error(), Some("HTTP 500"));
        let failed_at = state.last_attempt[&Resource::Broadcasts];

        state.tick(failed_at + std::time::Duration::from_secs(1));
        assert!(history_fetches(&mut state).is_empty());
        state.tick(failed_at + std::time::Duration::from_secs(5));
        assert_eq!(history_fetches(&mut state).len(), 1);
    }

    #[test]
    fn test_broadcast_default_toast_without_server_message() {
        let mut state = admin_on_broadcast();
        state.take_commands();
        state.screens.broadcast.message = "Hi".into();
        state.send_broadcast();
        let (id, _) = mutation(&state.take_commands()).unwrap();
        state.handle_response(NetworkResponse::Mutated {
            id,
            outcome: MutationOutcome::BroadcastAccepted(BroadcastAccepted {
                status: "accepted".into(),
                message: None,
            }),
        });
        assert_eq!(
            state.toasts.last().map(|t| t.text.as_str()),
            Some("Broadcast queued for delivery")
        );
    }
}
