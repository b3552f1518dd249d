//! Users CRM - searchable, filterable user list with a detail overlay.
//!
//! Filtering is local: search text and score filter only recompute a view of
//! the already fetched list.

use crate::models::{CrmUser, LeadScore};
use crate::screens::{cursor_down, cursor_up};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScoreFilter {
    #[default]
    All,
    Only(LeadScore),
}

impl ScoreFilter {
    pub fn next(&self) -> ScoreFilter {
        match self {
            ScoreFilter::All => ScoreFilter::Only(LeadScore::Hot),
            ScoreFilter::Only(LeadScore::Hot) => ScoreFilter::Only(LeadScore::Nurture),
            ScoreFilter::Only(LeadScore::Nurture) => ScoreFilter::Only(LeadScore::Cold),
            ScoreFilter::Only(LeadScore::Cold) => ScoreFilter::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreFilter::All => "all",
            ScoreFilter::Only(score) => score.as_str(),
        }
    }

    fn accepts(&self, score: LeadScore) -> bool {
        match self {
            ScoreFilter::All => true,
            ScoreFilter::Only(wanted) => *wanted == score,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct CrmScreen {
    pub search: String,
    pub filter: ScoreFilter,
    pub cursor: usize,
    /// User shown in the detail overlay
    pub selected: Option<i64>,
}

impl CrmScreen {
    /// Users matching the name (case-insensitive) or id search and the score filter
    pub fn filtered<'a>(&self, users: &'a [CrmUser]) -> Vec<&'a CrmUser> {
        let needle = self.search.trim().to_lowercase();
        users
            .iter()
            .filter(|u| {
                needle.is_empty()
                    || u.name.to_lowercase().contains(&needle)
                    || u.id.to_string().contains(&needle)
            })
            .filter(|u| self.filter.accepts(u.score))
            .collect()
    }

    pub fn search_char(&mut self, c: char) {
        self.search.push(c);
        self.cursor = 0;
    }

    pub fn search_backspace(&mut self) {
        self.search.pop();
        self.cursor = 0;
    }

    pub fn cycle_filter(&mut self) {
        self.filter = self.filter.next();
        self.cursor = 0;
    }

    pub fn cursor_up(&mut self, users: &[CrmUser]) {
        self.cursor = cursor_up(self.cursor, self.filtered(users).len());
    }

    pub fn cursor_down(&mut self, users: &[CrmUser]) {
        self.cursor = cursor_down(self.cursor, self.filtered(users).len());
    }

    /// Open the overlay for the user under the cursor
    pub fn open(&mut self, users: &[CrmUser]) -> bool {
        match self.filtered(users).get(self.cursor) {
            Some(user) => {
                self.selected = Some(user.id);
                true
            }
            None => false,
        }
    }

    pub fn close(&mut self) {
        self.selected = None;
    }

    pub fn selected_user<'a>(&self, users: &'a [CrmUser]) -> Option<&'a CrmUser> {
        let id = self.selected?;
        users.iter().find(|u| u.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CrmEvent, CrmStatus};

    fn user(id: i64, name: &str, score: LeadScore) -> CrmUser {
        CrmUser {
            id,
            name: name.into(),
            phone: String::new(),
            score,
            status: CrmStatus::Free,
            source: "Instagram".into(),
            events: vec![CrmEvent {
                action: "/start".into(),
                time: "Jan 15, 10:00".into(),
            }],
        }
    }

    fn users() -> Vec<CrmUser> {
        vec![
            user(4821, "Jasur Karimov", LeadScore::Hot),
            user(3192, "Dilnoza Rahimova", LeadScore::Nurture),
            user(7655, "Sardor Tursunov", LeadScore::Cold),
        ]
    }

    #[test]
    fn test_search_by_name_or_id() {
        let list = users();
        let mut screen = CrmScreen::default();
        for c in "JASUR".chars() {
            screen.search_char(c);
        }
        assert_eq!(screen.filtered(&list).len(), 1);

        screen.search = "31".into();
        let ids: Vec<_> = screen.filtered(&list).iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![3192]);
    }

    #[test]
    fn test_score_filter_cycles() {
        let list = users();
        let mut screen = CrmScreen::default();
        assert_eq!(screen.filtered(&list).len(), 3);
        screen.cycle_filter();
        assert_eq!(screen.filter, ScoreFilter::Only(LeadScore::Hot));
        assert_eq!(screen.filtered(&list)[0].id, 4821);
        screen.cycle_filter();
        screen.cycle_filter();
        screen.cycle_filter();
        assert_eq!(screen.filter, ScoreFilter::All);
    }

    #[test]
    fn test_overlay_does_not_touch_data() {
        let list = users();
        let mut screen = CrmScreen::default();
        screen.cursor_down(&list);
        assert!(screen.open(&list));
        assert_eq!(screen.selected_user(&list).map(|u| u.id), Some(3192));
        screen.close();
        assert_eq!(screen.selected, None);
        assert_eq!(list.len(), 3);

        screen.search = "nobody".into();
        assert!(!screen.open(&list));
    }
}
