//! Wire schemas for every endpoint the Mini-App consumes.
//!
//! All of these are snapshots received from the server. The client never
//! mutates them locally; changes go through the matching POST endpoint and
//! a refetch.

use serde::{Deserialize, Serialize};

// ========================
// Customer app
// ========================

/// `GET /user/profile`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub telegram_id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub goal_tag: Option<String>,
    #[serde(default)]
    pub level_tag: Option<String>,
    #[serde(default)]
    pub lead_score: i64,
    #[serde(default = "default_lead_segment")]
    pub lead_segment: String,
    #[serde(default = "default_subscription_status")]
    pub subscription_status: String,
    #[serde(default)]
    pub registered_at: Option<String>,
}

fn default_lead_segment() -> String {
    String::from("content_only")
}

fn default_subscription_status() -> String {
    String::from("inactive")
}

impl UserProfile {
    pub fn has_active_subscription(&self) -> bool {
        self.subscription_status == "active"
    }
}

/// `GET /referral/stats`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferralStats {
    pub referral_link: String,
    #[serde(default)]
    pub total_invited: u64,
    #[serde(default)]
    pub valid_referrals: u64,
    #[serde(default)]
    pub paid_referrals: u64,
    #[serde(default)]
    pub balance: u64,
    #[serde(default = "default_club_price")]
    pub club_price: u64,
    /// How much more balance is needed for a free subscription
    #[serde(default)]
    pub amount_for_free: u64,
}

fn default_club_price() -> u64 {
    crate::constants::BASE_CLUB_PRICE
}

/// Payment provider accepted by `POST /payment/init`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentProvider {
    #[default]
    Click,
    Payme,
}

impl PaymentProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentProvider::Click => "click",
            PaymentProvider::Payme => "payme",
        }
    }

    pub fn next(&self) -> PaymentProvider {
        match self {
            PaymentProvider::Click => PaymentProvider::Payme,
            PaymentProvider::Payme => PaymentProvider::Click,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaymentInitRequest {
    pub provider: PaymentProvider,
}

/// Response of `POST /payment/init`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaymentInit {
    pub payment_id: i64,
    pub base_price: u64,
    #[serde(default)]
    pub referral_discount: u64,
    pub final_price: u64,
    pub payment_url: String,
}

/// Element of `GET /course/modules`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CourseModule {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    pub order: u32,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub completion_pct: f64,
    #[serde(default)]
    pub is_completed: bool,
}

/// Body of `POST /course/progress`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub module_id: i64,
    /// Seconds watched
    pub watch_time: u64,
    pub completion_pct: f64,
}

// ========================
// Admin dashboard
// ========================

/// `GET /api/admin/stats`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminStats {
    pub kpis: Kpis,
    #[serde(rename = "revenueChart7d", default)]
    pub revenue_chart_7d: Vec<RevenuePoint>,
    #[serde(rename = "recentActivity", default)]
    pub recent_activity: Vec<Activity>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    pub total_users: u64,
    pub active_subs: u64,
    pub total_revenue: u64,
    /// Percent, one decimal
    pub conversion: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevenuePoint {
    pub day: String,
    pub revenue: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default)]
    pub id: Option<i64>,
    pub text: String,
    #[serde(default)]
    pub time: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Element of `GET /api/admin/funnel`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FunnelStep {
    pub label: String,
    pub users: u64,
    pub rate: f64,
}

/// `GET /api/admin/events`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStats {
    #[serde(default)]
    pub top_buttons: Vec<ButtonClicks>,
    #[serde(default)]
    pub traffic_sources: Vec<TrafficSource>,
    #[serde(default)]
    pub segment_goal: Vec<SegmentCount>,
    #[serde(default)]
    pub segment_level: Vec<SegmentCount>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ButtonClicks {
    pub name: String,
    pub clicks: u64,
    #[serde(default)]
    pub trend: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrafficSource {
    pub name: String,
    /// Share in percent
    pub value: f64,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentCount {
    pub name: String,
    pub count: u64,
}

/// Lead classification shown in the CRM
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadScore {
    Hot,
    Nurture,
    Cold,
}

impl LeadScore {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadScore::Hot => "hot",
            LeadScore::Nurture => "nurture",
            LeadScore::Cold => "cold",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrmStatus {
    Paid,
    Free,
    Dropped,
}

impl CrmStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CrmStatus::Paid => "paid",
            CrmStatus::Free => "free",
            CrmStatus::Dropped => "dropped",
        }
    }
}

/// Element of `GET /api/admin/users`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrmUser {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    pub score: LeadScore,
    pub status: CrmStatus,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub events: Vec<CrmEvent>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrmEvent {
    pub action: String,
    pub time: String,
}

/// `GET /api/admin/audience-counts`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AudienceCounts {
    #[serde(default)]
    pub all: u64,
    #[serde(default)]
    pub video_not_paid: u64,
    #[serde(default)]
    pub hot: u64,
    #[serde(default)]
    pub paid: u64,
}

/// Broadcast audience segments, in the order the server indexes them
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Audience {
    #[default]
    All,
    VideoNotPaid,
    Hot,
    Paid,
}

impl Audience {
    /// Declared order; the broadcast payload carries the position in this table
    pub const ALL: [Audience; 4] = [
        Audience::All,
        Audience::VideoNotPaid,
        Audience::Hot,
        Audience::Paid,
    ];

    pub fn index(&self) -> u8 {
        match self {
            Audience::All => 0,
            Audience::VideoNotPaid => 1,
            Audience::Hot => 2,
            Audience::Paid => 3,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Audience::All => "all",
            Audience::VideoNotPaid => "video_not_paid",
            Audience::Hot => "hot",
            Audience::Paid => "paid",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Audience::All => "All users",
            Audience::VideoNotPaid => "Watched video, not paid",
            Audience::Hot => "Hot leads only",
            Audience::Paid => "Paid customers",
        }
    }

    pub fn count(&self, counts: &AudienceCounts) -> u64 {
        match self {
            Audience::All => counts.all,
            Audience::VideoNotPaid => counts.video_not_paid,
            Audience::Hot => counts.hot,
            Audience::Paid => counts.paid,
        }
    }

    pub fn next(&self) -> Audience {
        let i = (self.index() as usize + 1) % Self::ALL.len();
        Self::ALL[i]
    }

    pub fn prev(&self) -> Audience {
        let i = (self.index() as usize + Self::ALL.len() - 1) % Self::ALL.len();
        Self::ALL[i]
    }
}

/// Element of `GET /api/admin/broadcasts`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PastBroadcast {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub sent: u64,
    #[serde(default)]
    pub delivered: u64,
    #[serde(default)]
    pub failed: u64,
    pub status: String,
    #[serde(default)]
    pub date: String,
}

impl PastBroadcast {
    /// Delivery is finished server-side; further polling won't change it
    pub fn is_terminal(&self) -> bool {
        matches!(self.status.as_str(), "completed" | "cancelled" | "failed")
    }
}

/// Inline link button attached to a broadcast
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BroadcastButton {
    pub text: String,
    pub url: String,
}

/// Body of `POST /api/admin/broadcast`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BroadcastRequest {
    pub audience: u8,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub media_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub buttons: Vec<BroadcastButton>,
}

/// Response of `POST /api/admin/broadcast`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BroadcastAccepted {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of `POST /api/admin/upload-media-form`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MediaUpload {
    pub media_id: String,
}

/// Formats an amount with space thousands separators, e.g. `97 000`
pub fn format_price(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_defaults() {
        let profile: UserProfile = serde_json::from_str(r#"{"telegram_id": 42}"#).unwrap();
        assert_eq!(profile.lead_segment, "content_only");
        assert_eq!(profile.subscription_status, "inactive");
        assert!(!profile.has_active_subscription());
    }

    #[test]
    fn test_audience_order_matches_server_index() {
        let keys: Vec<_> = Audience::ALL.iter().map(|a| a.key()).collect();
        assert_eq!(keys, ["all", "video_not_paid", "hot", "paid"]);
        assert_eq!(Audience::Hot.index(), 2);
        assert_eq!(Audience::Paid.next(), Audience::All);
        assert_eq!(Audience::All.prev(), Audience::Paid);
    }

    #[test]
    fn test_broadcast_request_omits_empty_extras() {
        let req = BroadcastRequest {
            audience: 2,
            message: "Salom".into(),
            media_id: None,
            buttons: Vec::new(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"audience": 2, "message": "Salom"}));
    }

    #[test]
    fn test_admin_stats_camel_case() {
        let stats: AdminStats = serde_json::from_str(
            r#"{"kpis":{"totalUsers":10,"activeSubs":2,"totalRevenue":194000,"conversion":20.0},
                "revenueChart7d":[{"day":"Dush","revenue":0}],"recentActivity":[]}"#,
        )
        .unwrap();
        assert_eq!(stats.kpis.total_users, 10);
        assert_eq!(stats.revenue_chart_7d.len(), 1);
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0), "0");
        assert_eq!(format_price(970), "970");
        assert_eq!(format_price(97_000), "97 000");
        assert_eq!(format_price(1_234_567), "1 234 567");
    }
}
