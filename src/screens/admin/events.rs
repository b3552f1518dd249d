//! Event tracking - button clicks, traffic sources and segment counts

use crate::models::{ButtonClicks, EventStats, SegmentCount};

/// Buttons ordered by clicks, most clicked first
pub fn top_buttons(stats: &EventStats) -> Vec<&ButtonClicks> {
    let mut buttons: Vec<_> = stats.top_buttons.iter().collect();
    buttons.sort_by(|a, b| b.clicks.cmp(&a.clicks));
    buttons
}

/// Share of a segment within its group, percent
pub fn segment_shares(segments: &[SegmentCount]) -> Vec<(&str, u64, f64)> {
    let total: u64 = segments.iter().map(|s| s.count).sum();
    segments
        .iter()
        .map(|s| {
            let share = if total > 0 {
                s.count as f64 / total as f64 * 100.0
            } else {
                0.0
            };
            (s.name.as_str(), s.count, share)
        })
        .collect()
}
