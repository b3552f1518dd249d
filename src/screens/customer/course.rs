//! Course - module list with a detail view for the opened module.
//!
//! Lock and completion state are computed by the server; the client only
//! refuses to open a locked module and refetches after a progress update.

use crate::constants::COMPLETE_WATCH_TIME_SECS;
use crate::models::{CourseModule, ProgressUpdate};
use crate::screens::{cursor_down, cursor_up};

/// Status line shown next to a module
#[derive(Clone, Debug, PartialEq)]
pub enum ModuleBadge {
    Completed,
    Locked,
    InProgress(u32),
    Start,
}

impl ModuleBadge {
    pub fn of(module: &CourseModule) -> Self {
        if module.is_completed {
            ModuleBadge::Completed
        } else if module.is_locked {
            ModuleBadge::Locked
        } else if module.completion_pct > 0.0 {
            ModuleBadge::InProgress(module.completion_pct.round() as u32)
        } else {
            ModuleBadge::Start
        }
    }

    pub fn text(&self) -> String {
        match self {
            ModuleBadge::Completed => String::from("Completed"),
            ModuleBadge::Locked => String::from("Locked"),
            ModuleBadge::InProgress(pct) => format!("{}% watched", pct),
            ModuleBadge::Start => String::from("Start"),
        }
    }
}

/// Completed modules, total modules, percent
pub fn overall_progress(modules: &[CourseModule]) -> (usize, usize, f64) {
    let total = modules.len();
    let done = modules.iter().filter(|m| m.is_completed).count();
    let pct = if total > 0 {
        done as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    (done, total, pct)
}

pub fn all_completed(modules: &[CourseModule]) -> bool {
    !modules.is_empty() && modules.iter().all(|m| m.is_completed)
}

#[derive(Clone, Debug, Default)]
pub struct CourseScreen {
    pub cursor: usize,
    /// Id of the module in the detail view
    pub active: Option<i64>,
    /// A progress update is in flight
    pub completing: bool,
}

impl CourseScreen {
    pub fn cursor_up(&mut self, modules: &[CourseModule]) {
        self.cursor = cursor_up(self.cursor, modules.len());
    }

    pub fn cursor_down(&mut self, modules: &[CourseModule]) {
        self.cursor = cursor_down(self.cursor, modules.len());
    }

    /// Open the module under the cursor; locked modules stay closed
    pub fn open(&mut self, modules: &[CourseModule]) -> bool {
        match modules.get(self.cursor) {
            Some(module) if !module.is_locked => {
                self.active = Some(module.id);
                true
            }
            _ => false,
        }
    }

    pub fn close(&mut self) {
        self.active = None;
    }

    pub fn active_module<'a>(&self, modules: &'a [CourseModule]) -> Option<&'a CourseModule> {
        let id = self.active?;
        modules.iter().find(|m| m.id == id)
    }

    /// Progress update for "complete module" on the open module
    pub fn begin_complete(&mut self, modules: &[CourseModule]) -> Option<ProgressUpdate> {
        if self.completing {
            return None;
        }
        let module = self.active_module(modules)?;
        if module.is_completed {
            return None;
        }
        let update = ProgressUpdate {
            module_id: module.id,
            watch_time: COMPLETE_WATCH_TIME_SECS,
            completion_pct: 100.0,
        };
        self.completing = true;
        Some(update)
    }

    /// Progress saved; the caller refetches the module list
    pub fn on_progress_saved(&mut self) {
        self.completing = false;
        self.active = None;
    }

    pub fn on_progress_failed(&mut self) {
        self.completing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(id: i64, order: u32, locked: bool, pct: f64, done: bool) -> CourseModule {
        CourseModule {
            id,
            title: format!("Module {}", order),
            description: None,
            video_url: None,
            order,
            is_locked: locked,
            completion_pct: pct,
            is_completed: done,
        }
    }

    fn modules() -> Vec<CourseModule> {
        vec![
            module(1, 1, false, 40.0, false),
            module(2, 2, true, 0.0, false),
        ]
    }

    #[test]
    fn test_locked_module_does_not_open() {
        let mods = modules();
        let mut screen = CourseScreen::default();
        screen.cursor_down(&mods);
        assert!(!screen.open(&mods));
        assert_eq!(screen.active, None);
    }

    #[test]
    fn test_unlocked_module_opens() {
        let mods = modules();
        let mut screen = CourseScreen::default();
        assert!(screen.open(&mods));
        assert_eq!(screen.active_module(&mods).map(|m| m.id), Some(1));
    }

    #[test]
    fn test_complete_builds_full_progress() {
        let mods = modules();
        let mut screen = CourseScreen::default();
        screen.open(&mods);
        let update = screen.begin_complete(&mods).unwrap();
        assert_eq!(update.module_id, 1);
        assert_eq!(update.watch_time, 300);
        assert_eq!(update.completion_pct, 100.0);
        // Already in flight
        assert!(screen.begin_complete(&mods).is_none());
        screen.on_progress_saved();
        assert_eq!(screen.active, None);
        assert!(!screen.completing);
    }

    #[test]
    fn test_badges_and_progress() {
        let mut mods = modules();
        assert_eq!(ModuleBadge::of(&mods[0]), ModuleBadge::InProgress(40));
        assert_eq!(ModuleBadge::of(&mods[1]), ModuleBadge::Locked);
        assert_eq!(overall_progress(&mods), (0, 2, 0.0));
        assert!(!all_completed(&mods));

        for m in &mut mods {
            m.is_completed = true;
        }
        assert_eq!(overall_progress(&mods), (2, 2, 100.0));
        assert!(all_completed(&mods));
        assert!(!all_completed(&[]));
    }
}
