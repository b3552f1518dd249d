//! Payment - provider selection and payment initialisation.
//!
//! Completion is tracked server-side (provider webhook); the client only opens
//! the redirect URL and shows the latest quote.

use crate::constants::BASE_CLUB_PRICE;
use crate::models::{PaymentInit, PaymentProvider};

pub const BENEFITS: [&str; 5] = [
    "Strategies for earning with AI",
    "Personal mentor support",
    "Weekly live lessons",
    "Ready-made templates and prompts",
    "Exclusive community",
];

#[derive(Clone, Debug, Default)]
pub struct PaymentScreen {
    pub provider: PaymentProvider,
    /// A payment init call is in flight
    pub processing: bool,
    pub last_payment: Option<PaymentInit>,
}

impl PaymentScreen {
    pub fn cycle_provider(&mut self) {
        if !self.processing {
            self.provider = self.provider.next();
        }
    }

    /// Provider to post, unless a payment is already being initialised
    pub fn begin_payment(&mut self) -> Option<PaymentProvider> {
        if self.processing {
            return None;
        }
        self.processing = true;
        Some(self.provider)
    }

    /// Returns the URL to open
    pub fn on_payment_started(&mut self, payment: PaymentInit) -> String {
        self.processing = false;
        let url = payment.payment_url.clone();
        self.last_payment = Some(payment);
        url
    }

    pub fn on_payment_failed(&mut self) {
        self.processing = false;
    }

    pub fn display_price(&self) -> u64 {
        self.last_payment
            .as_ref()
            .map(|p| p.final_price)
            .filter(|p| *p > 0)
            .unwrap_or(BASE_CLUB_PRICE)
    }

    /// Referral discount of the latest quote, when there is one
    pub fn discount(&self) -> Option<u64> {
        self.last_payment
            .as_ref()
            .map(|p| p.referral_discount)
            .filter(|d| *d > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(discount: u64) -> PaymentInit {
        PaymentInit {
            payment_id: 9,
            base_price: 97_000,
            referral_discount: discount,
            final_price: 97_000 - discount,
            payment_url: "https://my.click.uz/services/pay?id=9".into(),
        }
    }

    #[test]
    fn test_single_payment_in_flight() {
        let mut screen = PaymentScreen::default();
        screen.cycle_provider();
        assert_eq!(screen.begin_payment(), Some(PaymentProvider::Payme));
        assert_eq!(screen.begin_payment(), None);
        screen.cycle_provider();
        assert_eq!(screen.provider, PaymentProvider::Payme);
        screen.on_payment_failed();
        assert!(screen.begin_payment().is_some());
    }

    #[test]
    fn test_quote_display() {
        let mut screen = PaymentScreen::default();
        assert_eq!(screen.display_price(), 97_000);
        assert_eq!(screen.discount(), None);

        screen.begin_payment();
        let url = screen.on_payment_started(quote(20_000));
        assert_eq!(url, "https://my.click.uz/services/pay?id=9");
        assert_eq!(screen.display_price(), 77_000);
        assert_eq!(screen.discount(), Some(20_000));
        assert!(!screen.processing);
    }
}
