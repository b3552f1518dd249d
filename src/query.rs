//! Data-fetching layer: cacheable resources, per-screen query state, the
//! single-retry policy and the broadcast history poller.

use std::future::Future;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::constants::*;
use crate::models::{
    AdminStats, AudienceCounts, CourseModule, CrmUser, EventStats, FunnelStep, PastBroadcast,
    ReferralStats, UserProfile,
};
use crate::network::client::ApiClient;
use crate::network::error::ApiError;

/// A readable server resource, one per GET endpoint
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    Profile,
    ReferralStats,
    CourseModules,
    AdminStats,
    Funnel,
    Events,
    Users,
    AudienceCounts,
    Broadcasts,
}

impl Resource {
    /// Unique cache key
    pub fn key(&self) -> &'static str {
        match self {
            Resource::Profile => "profile",
            Resource::ReferralStats => "referral_stats",
            Resource::CourseModules => "course_modules",
            Resource::AdminStats => "admin_stats",
            Resource::Funnel => "admin_funnel",
            Resource::Events => "admin_events",
            Resource::Users => "admin_users",
            Resource::AudienceCounts => "audience_counts",
            Resource::Broadcasts => "broadcast_history",
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            Resource::Profile => EP_PROFILE,
            Resource::ReferralStats => EP_REFERRAL_STATS,
            Resource::CourseModules => EP_COURSE_MODULES,
            Resource::AdminStats => EP_ADMIN_STATS,
            Resource::Funnel => EP_ADMIN_FUNNEL,
            Resource::Events => EP_ADMIN_EVENTS,
            Resource::Users => EP_ADMIN_USERS,
            Resource::AudienceCounts => EP_ADMIN_AUDIENCE_COUNTS,
            Resource::Broadcasts => EP_ADMIN_BROADCASTS,
        }
    }

    /// Background refresh period, if the resource keeps changing server-side
    pub fn refresh_interval(&self) -> Option<Duration> {
        match self {
            Resource::Broadcasts => Some(BROADCAST_REFRESH_INTERVAL),
            _ => None,
        }
    }
}

/// Typed payload of a fetched [`Resource`]
#[derive(Clone, Debug, PartialEq)]
pub enum ResourceData {
    Profile(UserProfile),
    ReferralStats(ReferralStats),
    CourseModules(Vec<CourseModule>),
    AdminStats(AdminStats),
    Funnel(Vec<FunnelStep>),
    Events(EventStats),
    Users(Vec<CrmUser>),
    AudienceCounts(AudienceCounts),
    Broadcasts(Vec<PastBroadcast>),
}

impl ResourceData {
    pub fn resource(&self) -> Resource {
        match self {
            ResourceData::Profile(_) => Resource::Profile,
            ResourceData::ReferralStats(_) => Resource::ReferralStats,
            ResourceData::CourseModules(_) => Resource::CourseModules,
            ResourceData::AdminStats(_) => Resource::AdminStats,
            ResourceData::Funnel(_) => Resource::Funnel,
            ResourceData::Events(_) => Resource::Events,
            ResourceData::Users(_) => Resource::Users,
            ResourceData::AudienceCounts(_) => Resource::AudienceCounts,
            ResourceData::Broadcasts(_) => Resource::Broadcasts,
        }
    }
}

/// Fetch one resource through the API client
pub async fn fetch(
    client: &ApiClient,
    resource: Resource,
    cancel: &CancellationToken,
) -> Result<ResourceData, ApiError> {
    Ok(match resource {
        Resource::Profile => ResourceData::Profile(client.profile(cancel).await?),
        Resource::ReferralStats => ResourceData::ReferralStats(client.referral_stats(cancel).await?),
        Resource::CourseModules => ResourceData::CourseModules(client.course_modules(cancel).await?),
        Resource::AdminStats => ResourceData::AdminStats(client.admin_stats(cancel).await?),
        Resource::Funnel => ResourceData::Funnel(client.funnel(cancel).await?),
        Resource::Events => ResourceData::Events(client.events(cancel).await?),
        Resource::Users => ResourceData::Users(client.users(cancel).await?),
        Resource::AudienceCounts => {
            ResourceData::AudienceCounts(client.audience_counts(cancel).await?)
        }
        Resource::Broadcasts => ResourceData::Broadcasts(client.broadcasts(cancel).await?),
    })
}

/// Run `op` up to `attempts` times; cancellation is never retried
pub async fn with_retry<T, F, Fut>(attempts: u32, mut op: F) -> Result<T, ApiError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_cancelled() || attempt >= attempts => return Err(e),
            Err(e) => {
                tracing::warn!(attempt, error = %e, "Fetch failed, retrying");
                attempt += 1;
            }
        }
    }
}

/// Fetch with the single automatic retry
pub async fn fetch_with_retry(
    client: &ApiClient,
    resource: Resource,
    cancel: &CancellationToken,
) -> Result<ResourceData, ApiError> {
    with_retry(MAX_FETCH_ATTEMPTS, move |attempt| {
        tracing::debug!(key = resource.key(), attempt, "Fetching resource");
        fetch(client, resource, cancel)
    })
    .await
}

/// What a screen sees of one resource
#[derive(Clone, Debug, PartialEq)]
pub enum QueryState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        QueryState::Idle
    }
}

impl<T> QueryState<T> {
    /// A fetch was issued; data already on screen stays visible
    pub fn begin(&mut self) {
        if !matches!(self, QueryState::Ready(_)) {
            *self = QueryState::Loading;
        }
    }

    /// Apply a fetch result.
    ///
    /// A failed refetch keeps previously loaded data; the error is returned so
    /// the caller can surface it as a toast.
    pub fn resolve(&mut self, result: Result<T, String>) -> Option<String> {
        match result {
            Ok(data) => {
                *self = QueryState::Ready(data);
                None
            }
            Err(message) if matches!(self, QueryState::Ready(_)) => Some(message),
            Err(message) => {
                *self = QueryState::Failed(message);
                None
            }
        }
    }

    /// The fetch was cancelled before it finished
    pub fn abandon(&mut self) {
        if matches!(self, QueryState::Loading) {
            *self = QueryState::Idle;
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Idle | QueryState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            QueryState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Staggered refresher for asynchronous server-side work.
///
/// The first poll is immediate, later delays double from the initial delay
/// up to `max_delay`. Polling stops once the observed state is terminal or
/// the attempt budget is spent.
#[derive(Clone, Debug)]
pub struct Poller {
    initial_delay: Duration,
    max_delay: Duration,
    max_attempts: u32,
    next_delay: Duration,
    attempts: u32,
    due: Option<Instant>,
    active: bool,
}

impl Poller {
    pub fn new(initial_delay: Duration, max_delay: Duration, max_attempts: u32) -> Self {
        Poller {
            initial_delay,
            max_delay,
            max_attempts,
            next_delay: initial_delay,
            attempts: 0,
            due: None,
            active: false,
        }
    }

    /// Poller for the broadcast history
    pub fn for_broadcasts() -> Self {
        Self::new(
            POLL_INITIAL_DELAY,
            Resource::Broadcasts
                .refresh_interval()
                .unwrap_or(BROADCAST_REFRESH_INTERVAL),
            POLL_MAX_ATTEMPTS,
        )
    }

    /// (Re)start with an immediate poll
    pub fn start(&mut self, now: Instant) {
        self.next_delay = self.initial_delay;
        self.attempts = 0;
        self.due = Some(now);
        self.active = true;
    }

    pub fn stop(&mut self) {
        self.due = None;
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// When the next poll should fire
    pub fn due(&self) -> Option<Instant> {
        self.due
    }

    /// Consume the pending deadline if it has passed; the caller then fetches
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if self.active && due <= now => {
                self.due = None;
                self.attempts += 1;
                true
            }
            _ => false,
        }
    }

    /// Record the outcome of a poll and schedule the next one
    pub fn observe(&mut self, terminal: bool, now: Instant) {
        if !self.active || self.due.is_some() {
            return;
        }
        if terminal || self.attempts >= self.max_attempts {
            tracing::debug!(attempts = self.attempts, terminal, "Poller stopped");
            self.stop();
            return;
        }
        self.due = Some(now + self.next_delay);
        self.next_delay = (self.next_delay * 2).min(self.max_delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_cache_keys_are_unique() {
        let all = [
            Resource::Profile,
            Resource::ReferralStats,
            Resource::CourseModules,
            Resource::AdminStats,
            Resource::Funnel,
            Resource::Events,
            Resource::Users,
            Resource::AudienceCounts,
            Resource::Broadcasts,
        ];
        let keys: std::collections::HashSet<_> = all.iter().map(|r| r.key()).collect();
        assert_eq!(keys.len(), all.len());
        assert_eq!(Resource::Broadcasts.refresh_interval(), Some(Duration::from_secs(5)));
        assert_eq!(Resource::Profile.refresh_interval(), None);
    }

    #[tokio::test]
    async fn test_retries_once_then_fails() {
        let calls = AtomicU32::new(0);
        let result: Result<(), ApiError> = with_retry(MAX_FETCH_ATTEMPTS, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ApiError::Transport("down".into())) }
        })
        .await;
        assert_eq!(result, Err(ApiError::Transport("down".into())));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_retry_recovers() {
        let result = with_retry(MAX_FETCH_ATTEMPTS, |attempt| async move {
            if attempt == 1 {
                Err(ApiError::Transport("flaky".into()))
            } else {
                Ok(attempt)
            }
        })
        .await;
        assert_eq!(result, Ok(2));
    }

    #[tokio::test]
    async fn test_cancelled_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), ApiError> = with_retry(MAX_FETCH_ATTEMPTS, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ApiError::Cancelled) }
        })
        .await;
        assert!(result.unwrap_err().is_cancelled());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_query_state_transitions() {
        let mut q: QueryState<u32> = QueryState::default();
        assert!(q.is_loading());
        q.begin();
        assert_eq!(q, QueryState::Loading);
        assert_eq!(q.resolve(Err("HTTP 500".into())), None);
        assert_eq!(q.error(), Some("HTTP 500"));

        q.begin();
        q.resolve(Ok(7));
        assert_eq!(q.data(), Some(&7));

        // Refetch keeps data on screen and reports the failure
        q.begin();
        assert_eq!(q.data(), Some(&7));
        assert_eq!(q.resolve(Err("HTTP 502".into())), Some("HTTP 502".into()));
        assert_eq!(q.data(), Some(&7));
    }

    #[test]
    fn test_poller_staggers_and_stops_on_terminal() {
        let t0 = Instant::now();
        let mut poller = Poller::new(Duration::from_secs(1), Duration::from_secs(5), 10);
        poller.start(t0);
        assert_eq!(poller.due(), Some(t0));
        assert!(poller.fire(t0));

        poller.observe(false, t0);
        assert_eq!(poller.due(), Some(t0 + Duration::from_secs(1)));
        assert!(!poller.fire(t0));
        let t1 = t0 + Duration::from_secs(1);
        assert!(poller.fire(t1));

        poller.observe(false, t1);
        assert_eq!(poller.due(), Some(t1 + Duration::from_secs(2)));
        let t2 = t1 + Duration::from_secs(2);
        assert!(poller.fire(t2));
        poller.observe(false, t2);
        let t3 = t2 + Duration::from_secs(4);
        assert!(poller.fire(t3));
        poller.observe(false, t3);
        assert_eq!(poller.due(), Some(t3 + Duration::from_secs(5)));
        assert!(poller.fire(t3 + Duration::from_secs(5)));

        poller.observe(true, t3);
        assert!(!poller.is_active());
        assert_eq!(poller.due(), None);
    }

    #[test]
    fn test_poller_attempt_budget() {
        let t0 = Instant::now();
        let mut poller = Poller::new(Duration::from_millis(10), Duration::from_millis(10), 2);
        poller.start(t0);
        assert!(poller.fire(t0));
        poller.observe(false, t0);
        let t1 = t0 + Duration::from_millis(10);
        assert!(poller.fire(t1));
        poller.observe(false, t1);
        assert!(!poller.is_active());
    }
}
