//! Referral - invite link, counters and progress towards a free subscription

use crate::models::ReferralStats;

/// Which balance message to show
#[derive(Clone, Debug, PartialEq)]
pub enum BalanceBranch {
    /// Balance already covers a subscription
    Sufficient,
    /// This much more is needed
    NeedMore(u64),
}

pub fn balance_branch(stats: &ReferralStats) -> BalanceBranch {
    if stats.amount_for_free == 0 {
        BalanceBranch::Sufficient
    } else {
        BalanceBranch::NeedMore(stats.amount_for_free)
    }
}

/// Percent of the club price already covered, capped at 100
pub fn progress_to_free(stats: &ReferralStats) -> f64 {
    if stats.club_price == 0 {
        return 0.0;
    }
    let covered = stats.club_price.saturating_sub(stats.amount_for_free) as f64;
    (covered / stats.club_price as f64 * 100.0).min(100.0)
}

#[derive(Clone, Debug, Default)]
pub struct ReferralScreen {
    /// The link was copied since the screen was mounted
    pub copied: bool,
}

impl ReferralScreen {
    /// Link to hand to the user, if stats are loaded
    pub fn copy_link(&mut self, stats: Option<&ReferralStats>) -> Option<String> {
        let link = stats?.referral_link.clone();
        self.copied = true;
        Some(link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(amount_for_free: u64) -> ReferralStats {
        ReferralStats {
            referral_link: "https://t.me/club_bot?start=ref_42".into(),
            total_invited: 5,
            valid_referrals: 3,
            paid_referrals: 1,
            balance: 30_000,
            club_price: 97_000,
            amount_for_free,
        }
    }

    #[test]
    fn test_zero_amount_is_sufficient() {
        assert_eq!(balance_branch(&stats(0)), BalanceBranch::Sufficient);
        assert_eq!(progress_to_free(&stats(0)), 100.0);
    }

    #[test]
    fn test_need_more_branch() {
        let s = stats(67_000);
        assert_eq!(balance_branch(&s), BalanceBranch::NeedMore(67_000));
        let pct = progress_to_free(&s);
        assert!((pct - 30.927).abs() < 0.01, "{pct}");
    }

    #[test]
    fn test_free_club_has_no_progress() {
        let mut s = stats(0);
        s.club_price = 0;
        assert_eq!(progress_to_free(&s), 0.0);
    }

    #[test]
    fn test_copy_requires_stats() {
        let mut screen = ReferralScreen::default();
        assert_eq!(screen.copy_link(None), None);
        assert!(!screen.copied);
        let s = stats(0);
        assert_eq!(screen.copy_link(Some(&s)).as_deref(), Some(s.referral_link.as_str()));
        assert!(screen.copied);
    }
}
