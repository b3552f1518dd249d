//! App state - pure data structure with no I/O logic

use std::collections::HashMap;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::constants::TOAST_TTL;
use crate::messages::ui_events::{AppMode, AppTab, InputMode};
use crate::messages::{MutationKind, NetworkCommand, RenderState};
use crate::models::{
    AdminStats, AudienceCounts, CourseModule, CrmUser, EventStats, FunnelStep, PastBroadcast,
    ReferralStats, UserProfile,
};
use crate::query::{Poller, QueryState, Resource, ResourceData};
use crate::screens::admin::{BroadcastScreen, CrmScreen};
use crate::screens::customer::{CourseScreen, PaymentScreen, ReferralScreen};

/// Shared cache of server snapshots, one slot per resource.
///
/// Screens that read the same resource (dashboard and payment both show the
/// profile) see the same slot.
#[derive(Clone, Debug, Default)]
pub struct Queries {
    pub profile: QueryState<UserProfile>,
    pub referral_stats: QueryState<ReferralStats>,
    pub course_modules: QueryState<Vec<CourseModule>>,
    pub admin_stats: QueryState<AdminStats>,
    pub funnel: QueryState<Vec<FunnelStep>>,
    pub events: QueryState<EventStats>,
    pub users: QueryState<Vec<CrmUser>>,
    pub audience_counts: QueryState<AudienceCounts>,
    pub broadcasts: QueryState<Vec<PastBroadcast>>,
}

/// Type-erased view of one cache slot
trait Slot {
    fn begin(&mut self);
    fn fail(&mut self, message: String) -> Option<String>;
    fn abandon(&mut self);
}

impl<T> Slot for QueryState<T> {
    fn begin(&mut self) {
        QueryState::begin(self)
    }

    fn fail(&mut self, message: String) -> Option<String> {
        self.resolve(Err(message))
    }

    fn abandon(&mut self) {
        QueryState::abandon(self)
    }
}

impl Queries {
    fn slot(&mut self, resource: Resource) -> &mut dyn Slot {
        match resource {
            Resource::Profile => &mut self.profile,
            Resource::ReferralStats => &mut self.referral_stats,
            Resource::CourseModules => &mut self.course_modules,
            Resource::AdminStats => &mut self.admin_stats,
            Resource::Funnel => &mut self.funnel,
            Resource::Events => &mut self.events,
            Resource::Users => &mut self.users,
            Resource::AudienceCounts => &mut self.audience_counts,
            Resource::Broadcasts => &mut self.broadcasts,
        }
    }

    pub fn begin(&mut self, resource: Resource) {
        self.slot(resource).begin();
    }

    /// Store fetched data
    pub fn resolve(&mut self, data: ResourceData) {
        match data {
            ResourceData::Profile(v) => self.profile.resolve(Ok(v)),
            ResourceData::ReferralStats(v) => self.referral_stats.resolve(Ok(v)),
            ResourceData::CourseModules(v) => self.course_modules.resolve(Ok(v)),
            ResourceData::AdminStats(v) => self.admin_stats.resolve(Ok(v)),
            ResourceData::Funnel(v) => self.funnel.resolve(Ok(v)),
            ResourceData::Events(v) => self.events.resolve(Ok(v)),
            ResourceData::Users(v) => self.users.resolve(Ok(v)),
            ResourceData::AudienceCounts(v) => self.audience_counts.resolve(Ok(v)),
            ResourceData::Broadcasts(v) => self.broadcasts.resolve(Ok(v)),
        };
    }

    /// Record a failed fetch; returns a toast message when stale data stays visible
    pub fn fail(&mut self, resource: Resource, message: String) -> Option<String> {
        self.slot(resource).fail(message)
    }

    pub fn abandon(&mut self, resource: Resource) {
        self.slot(resource).abandon();
    }

    pub fn course_modules(&self) -> &[CourseModule] {
        self.course_modules.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn users(&self) -> &[CrmUser] {
        self.users.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn broadcasts(&self) -> &[PastBroadcast] {
        self.broadcasts.data().map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Local state of every screen; survives tab switches
#[derive(Clone, Debug, Default)]
pub struct Screens {
    pub course: CourseScreen,
    pub payment: PaymentScreen,
    pub referral: ReferralScreen,
    pub crm: CrmScreen,
    pub broadcast: BroadcastScreen,
}

impl Screens {
    /// Clear the busy flag of an aborted mutation
    pub fn release(&mut self, kind: MutationKind) {
        match kind {
            MutationKind::Payment => self.payment.on_payment_failed(),
            MutationKind::Progress => self.course.on_progress_failed(),
            MutationKind::Upload => self.broadcast.on_upload_failed(),
            MutationKind::Broadcast => self.broadcast.on_send_failed(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// A short-lived notification on the status line
#[derive(Clone, Debug)]
pub struct Toast {
    pub kind: ToastKind,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Toast {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match (now - self.created_at).to_std() {
            Ok(age) => age >= TOAST_TTL,
            // Clock went backwards
            Err(_) => false,
        }
    }
}

/// What an in-flight request id belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pending {
    Fetch(Resource),
    Mutation(MutationKind),
}

/// Main application state - pure data, no I/O
pub struct AppState {
    // Shell
    pub mode: AppMode,
    pub active_tab: AppTab,
    pub input_mode: InputMode,
    pub base_url: String,

    // Data
    pub queries: Queries,
    pub screens: Screens,
    pub poller: Poller,
    /// When each resource's last fetch finished, successfully or not
    pub(crate) last_attempt: HashMap<Resource, Instant>,

    // Requests
    pub(crate) screen_token: CancellationToken,
    pub(crate) next_request_id: u64,
    pub(crate) pending: HashMap<u64, Pending>,
    pub(crate) outbox: Vec<NetworkCommand>,
    pub(crate) pending_open: Option<String>,

    // Status line and popups
    pub toasts: Vec<Toast>,
    pub show_help: bool,
}

impl AppState {
    pub fn new(mode: AppMode, base_url: impl Into<String>) -> Self {
        AppState {
            mode,
            active_tab: mode.tabs()[0],
            input_mode: InputMode::Normal,
            base_url: base_url.into(),
            queries: Queries::default(),
            screens: Screens::default(),
            poller: Poller::for_broadcasts(),
            last_attempt: HashMap::new(),
            screen_token: CancellationToken::new(),
            next_request_id: 1,
            pending: HashMap::new(),
            outbox: Vec::new(),
            pending_open: None,
            toasts: Vec::new(),
            show_help: false,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Commands produced since the last call, in issue order
    pub fn take_commands(&mut self) -> Vec<NetworkCommand> {
        std::mem::take(&mut self.outbox)
    }

    /// A payment page waiting to be opened
    pub fn take_open_url(&mut self) -> Option<String> {
        self.pending_open.take()
    }

    pub fn is_fetching(&self, resource: Resource) -> bool {
        self.pending.values().any(|p| *p == Pending::Fetch(resource))
    }

    pub fn toast_success(&mut self, text: impl Into<String>) {
        self.push_toast(ToastKind::Success, text.into());
    }

    pub fn toast_error(&mut self, text: impl Into<String>) {
        self.push_toast(ToastKind::Error, text.into());
    }

    fn push_toast(&mut self, kind: ToastKind, text: String) {
        self.toasts.push(Toast {
            kind,
            text,
            created_at: Utc::now(),
        });
    }

    /// Drop expired toasts; returns true if any were removed
    pub fn prune_toasts(&mut self, now: DateTime<Utc>) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| !t.is_expired(now));
        self.toasts.len() != before
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            mode: self.mode,
            active_tab: self.active_tab,
            input_mode: self.input_mode,
            base_url: self.base_url.clone(),
            queries: self.queries.clone(),
            screens: self.screens.clone(),
            toasts: self.toasts.clone(),
            polling: self.poller.is_active(),
            show_help: self.show_help,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_expiry() {
        let mut state = AppState::new(AppMode::Customer, "");
        state.toast_success("saved");
        let created = state.toasts[0].created_at;
        assert!(!state.prune_toasts(created));
        let later = created + chrono::Duration::seconds(5);
        assert!(state.prune_toasts(later));
        assert!(state.toasts.is_empty());
    }

    #[test]
    fn test_failed_refetch_keeps_shared_profile() {
        let mut queries = Queries::default();
        queries.begin(Resource::Profile);
        queries.resolve(ResourceData::Profile(UserProfile {
            telegram_id: 1,
            name: None,
            age: None,
            goal_tag: None,
            level_tag: None,
            lead_score: 0,
            lead_segment: "hot".into(),
            subscription_status: "active".into(),
            registered_at: None,
        }));
        queries.begin(Resource::Profile);
        assert_eq!(
            queries.fail(Resource::Profile, "HTTP 500".into()),
            Some("HTTP 500".into())
        );
        assert!(queries.profile.data().is_some());

        queries.begin(Resource::Users);
        queries.abandon(Resource::Users);
        assert_eq!(queries.users, QueryState::Idle);
        assert!(queries.users().is_empty());
    }

    #[test]
    fn test_initial_tab_follows_mode() {
        assert_eq!(AppState::new(AppMode::Customer, "").active_tab, AppTab::Dashboard);
        assert_eq!(AppState::new(AppMode::Admin, "").active_tab, AppTab::Home);
    }
}
