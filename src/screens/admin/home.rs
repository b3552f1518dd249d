//! Admin home - KPI cards and recent activity

use crate::models::{format_price, AdminStats};

/// One KPI card: label and display value
#[derive(Clone, Debug, PartialEq)]
pub struct KpiCard {
    pub label: &'static str,
    pub value: String,
}

/// Revenue in millions with one decimal, e.g. `4.2M so'm`
pub fn format_revenue(amount: u64) -> String {
    format!("{:.1}M so'm", amount as f64 / 1_000_000.0)
}

pub fn kpi_cards(stats: &AdminStats) -> Vec<KpiCard> {
    let kpis = &stats.kpis;
    vec![
        KpiCard {
            label: "Total users",
            value: format_price(kpis.total_users),
        },
        KpiCard {
            label: "Club members",
            value: format_price(kpis.active_subs),
        },
        KpiCard {
            label: "Revenue",
            value: format_revenue(kpis.total_revenue),
        },
        KpiCard {
            label: "Conversion",
            value: format!("{}%", kpis.conversion),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Kpis;

    #[test]
    fn test_kpi_formatting() {
        let stats = AdminStats {
            kpis: Kpis {
                total_users: 12_847,
                active_subs: 1_234,
                total_revenue: 4_200_000,
                conversion: 9.6,
            },
            ..Default::default()
        };
        let cards = kpi_cards(&stats);
        assert_eq!(cards[0].value, "12 847");
        assert_eq!(cards[2].value, "4.2M so'm");
        assert_eq!(cards[3].value, "9.6%");
    }
}
