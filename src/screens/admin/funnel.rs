//! Funnel analytics - step bars with drop-off between consecutive steps

use crate::models::FunnelStep;

#[derive(Clone, Debug, PartialEq)]
pub struct FunnelRow {
    pub label: String,
    pub users: u64,
    pub rate: f64,
    /// Bar width relative to the first step, percent
    pub width_pct: f64,
    /// Loss from the previous step, percent
    pub dropoff: Option<f64>,
}

pub fn funnel_rows(steps: &[FunnelStep]) -> Vec<FunnelRow> {
    let max_users = steps.first().map(|s| s.users).unwrap_or(0);
    steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let width_pct = if max_users > 0 {
                step.users as f64 / max_users as f64 * 100.0
            } else {
                0.0
            };
            let dropoff = i
                .checked_sub(1)
                .and_then(|prev| steps.get(prev))
                .filter(|prev| prev.users > 0)
                .map(|prev| {
                    (prev.users as f64 - step.users as f64) / prev.users as f64 * 100.0
                });
            FunnelRow {
                label: step.label.clone(),
                users: step.users,
                rate: step.rate,
                width_pct,
                dropoff,
            }
        })
        .collect()
}

/// Last step over first step, percent
pub fn overall_conversion(steps: &[FunnelStep]) -> Option<f64> {
    let first = steps.first()?;
    let last = steps.last()?;
    if first.users == 0 {
        return None;
    }
    Some(last.users as f64 / first.users as f64 * 100.0)
}

/// Step with the largest drop-off
pub fn biggest_loss(rows: &[FunnelRow]) -> Option<&FunnelRow> {
    rows.iter()
        .filter(|r| r.dropoff.is_some())
        .max_by(|a, b| {
            a.dropoff
                .unwrap_or(0.0)
                .partial_cmp(&b.dropoff.unwrap_or(0.0))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(label: &str, users: u64, rate: f64) -> FunnelStep {
        FunnelStep {
            label: label.into(),
            users,
            rate,
        }
    }

    #[test]
    fn test_rows() {
        let steps = vec![
            step("/start", 1000, 100.0),
            step("Registered", 750, 75.0),
            step("Paid", 75, 10.0),
        ];
        let rows = funnel_rows(&steps);
        assert_eq!(rows[0].dropoff, None);
        assert_eq!(rows[0].width_pct, 100.0);
        assert_eq!(rows[1].dropoff, Some(25.0));
        assert!((rows[2].width_pct - 7.5).abs() < 1e-9);
        assert!((overall_conversion(&steps).unwrap() - 7.5).abs() < 1e-9);
        assert_eq!(biggest_loss(&rows).map(|r| r.label.as_str()), Some("Paid"));
    }

    #[test]
    fn test_empty_funnel() {
        let steps = vec![step("/start", 0, 100.0), step("Registered", 0, 0.0)];
        let rows = funnel_rows(&steps);
        assert_eq!(rows[1].dropoff, None);
        assert_eq!(rows[1].width_pct, 0.0);
        assert_eq!(overall_conversion(&steps), None);
        assert!(funnel_rows(&[]).is_empty());
    }
}
