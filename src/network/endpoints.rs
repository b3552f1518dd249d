//! Typed bindings for every endpoint the two front-ends consume

use tokio_util::sync::CancellationToken;

use crate::constants::*;
use crate::models::{
    AdminStats, AudienceCounts, BroadcastAccepted, BroadcastRequest, CourseModule, CrmUser,
    EventStats, FunnelStep, PastBroadcast, PaymentInit, PaymentInitRequest,
    PaymentProvider, ProgressUpdate, ReferralStats, UserProfile,
};
use crate::network::client::{ApiClient, ApiPayload};
use crate::network::error::ApiError;

impl ApiClient {
    // ========================
    // Customer app
    // ========================

    pub async fn profile(&self, cancel: &CancellationToken) -> Result<UserProfile, ApiError> {
        self.get(EP_PROFILE, cancel).await
    }

    pub async fn referral_stats(
        &self,
        cancel: &CancellationToken,
    ) -> Result<ReferralStats, ApiError> {
        self.get(EP_REFERRAL_STATS, cancel).await
    }

    pub async fn init_payment(
        &self,
        provider: PaymentProvider,
        cancel: &CancellationToken,
    ) -> Result<PaymentInit, ApiError> {
        self.post(EP_PAYMENT_INIT, &PaymentInitRequest { provider }, cancel)
            .await
    }

    pub async fn course_modules(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<CourseModule>, ApiError> {
        self.get(EP_COURSE_MODULES, cancel).await
    }

    /// The response body carries nothing the client needs
    pub async fn update_progress(
        &self,
        update: &ProgressUpdate,
        cancel: &CancellationToken,
    ) -> Result<ApiPayload, ApiError> {
        self.post_raw(EP_COURSE_PROGRESS, update, cancel).await
    }

    // ========================
    // Admin dashboard
    // ========================

    pub async fn admin_stats(&self, cancel: &CancellationToken) -> Result<AdminStats, ApiError> {
        self.get(EP_ADMIN_STATS, cancel).await
    }

    pub async fn funnel(&self, cancel: &CancellationToken) -> Result<Vec<FunnelStep>, ApiError> {
        self.get(EP_ADMIN_FUNNEL, cancel).await
    }

    pub async fn events(&self, cancel: &CancellationToken) -> Result<EventStats, ApiError> {
        self.get(EP_ADMIN_EVENTS, cancel).await
    }

    pub async fn users(&self, cancel: &CancellationToken) -> Result<Vec<CrmUser>, ApiError> {
        self.get(EP_ADMIN_USERS, cancel).await
    }

    pub async fn audience_counts(
        &self,
        cancel: &CancellationToken,
    ) -> Result<AudienceCounts, ApiError> {
        self.get(EP_ADMIN_AUDIENCE_COUNTS, cancel).await
    }

    pub async fn broadcasts(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<PastBroadcast>, ApiError> {
        self.get(EP_ADMIN_BROADCASTS, cancel).await
    }

    pub async fn send_broadcast(
        &self,
        request: &BroadcastRequest,
        cancel: &CancellationToken,
    ) -> Result<BroadcastAccepted, ApiError> {
        let payload = self.post_raw(EP_ADMIN_BROADCAST, request, cancel).await?;
        // A plain-text acknowledgement is still an acceptance
        match payload {
            ApiPayload::Text(text) => Ok(BroadcastAccepted {
                status: String::from("accepted"),
                message: Some(text).filter(|t| !t.is_empty()),
            }),
            json => json.decode(EP_ADMIN_BROADCAST),
        }
    }
}
