//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};

use crate::query::Resource;

/// Which front-end the shell composes
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppMode {
    #[default]
    Customer,
    Admin,
}

impl AppMode {
    pub fn tabs(&self) -> &'static [AppTab] {
        match self {
            AppMode::Customer => &[
                AppTab::Dashboard,
                AppTab::Course,
                AppTab::Payment,
                AppTab::Referral,
            ],
            AppMode::Admin => &[
                AppTab::Home,
                AppTab::Funnel,
                AppTab::Events,
                AppTab::Users,
                AppTab::Broadcast,
            ],
        }
    }
}

/// Screens reachable from the tab bar
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppTab {
    // Customer app
    Dashboard,
    Course,
    Payment,
    Referral,
    // Admin dashboard
    Home,
    Funnel,
    Events,
    Users,
    Broadcast,
}

impl AppTab {
    pub fn title(&self) -> &'static str {
        match self {
            AppTab::Dashboard => "Dashboard",
            AppTab::Course => "Course",
            AppTab::Payment => "Subscription",
            AppTab::Referral => "Invite",
            AppTab::Home => "Home",
            AppTab::Funnel => "Funnel",
            AppTab::Events => "Events",
            AppTab::Users => "Users",
            AppTab::Broadcast => "Broadcast",
        }
    }

    /// Resources the screen fetches when it mounts
    pub fn resources(&self) -> &'static [Resource] {
        match self {
            AppTab::Dashboard => &[Resource::Profile],
            AppTab::Course => &[Resource::CourseModules],
            AppTab::Payment => &[Resource::Profile],
            AppTab::Referral => &[Resource::ReferralStats],
            AppTab::Home => &[Resource::AdminStats],
            AppTab::Funnel => &[Resource::Funnel],
            AppTab::Events => &[Resource::Events],
            AppTab::Users => &[Resource::Users],
            AppTab::Broadcast => &[Resource::AudienceCounts, Resource::Broadcasts],
        }
    }
}

/// Text inputs that can take keyboard focus
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputField {
    CrmSearch,
    BroadcastMessage,
    MediaPath,
    ButtonSpec,
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing(InputField),
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Navigation
    NextTab,
    PrevTab,
    SelectTab(usize),
    CursorUp,
    CursorDown,
    /// Open / toggle the item under the cursor
    Activate,
    /// Leave a detail view or overlay
    Back,
    Refresh,

    // Input editing
    StartEditing(InputField),
    StopEditing,
    SubmitInput,
    CharInput(char),
    Backspace,

    // Customer actions
    CompleteModule,
    CycleProvider,
    Pay,
    CopyLink,

    // Admin actions
    CycleScoreFilter,
    NextAudience,
    PrevAudience,
    RemoveMedia,
    ClearButtons,
    SendBroadcast,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    active_tab: AppTab,
    input_mode: InputMode,
    show_help: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char('c') = key.code {
            return Some(UiEvent::Quit);
        }
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    if let InputMode::Editing(_) = input_mode {
        return match key.code {
            KeyCode::Esc => Some(UiEvent::StopEditing),
            KeyCode::Enter => Some(UiEvent::SubmitInput),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        };
    }

    // Global keys in normal mode
    match key.code {
        KeyCode::Char('q') => return Some(UiEvent::Quit),
        KeyCode::Char('?') => return Some(UiEvent::ToggleHelp),
        KeyCode::Tab | KeyCode::Right => return Some(UiEvent::NextTab),
        KeyCode::BackTab | KeyCode::Left => return Some(UiEvent::PrevTab),
        KeyCode::Char(c @ '1'..='9') => {
            return Some(UiEvent::SelectTab(c as usize - '1' as usize));
        }
        KeyCode::Char('r') => return Some(UiEvent::Refresh),
        KeyCode::Up | KeyCode::Char('k') => return Some(UiEvent::CursorUp),
        KeyCode::Down | KeyCode::Char('j') => return Some(UiEvent::CursorDown),
        KeyCode::Enter => return Some(UiEvent::Activate),
        KeyCode::Esc => return Some(UiEvent::Back),
        _ => {}
    }

    match active_tab {
        AppTab::Course => match key.code {
            KeyCode::Char('c') => Some(UiEvent::CompleteModule),
            _ => None,
        },
        AppTab::Payment => match key.code {
            KeyCode::Char('p') => Some(UiEvent::CycleProvider),
            KeyCode::Char('s') => Some(UiEvent::Pay),
            _ => None,
        },
        AppTab::Referral => match key.code {
            KeyCode::Char('y') => Some(UiEvent::CopyLink),
            _ => None,
        },
        AppTab::Users => match key.code {
            KeyCode::Char('/') => Some(UiEvent::StartEditing(InputField::CrmSearch)),
            KeyCode::Char('f') => Some(UiEvent::CycleScoreFilter),
            _ => None,
        },
        AppTab::Broadcast => match key.code {
            KeyCode::Char('a') => Some(UiEvent::NextAudience),
            KeyCode::Char('A') => Some(UiEvent::PrevAudience),
            KeyCode::Char('e') => Some(UiEvent::StartEditing(InputField::BroadcastMessage)),
            KeyCode::Char('m') => Some(UiEvent::StartEditing(InputField::MediaPath)),
            KeyCode::Char('x') => Some(UiEvent::RemoveMedia),
            KeyCode::Char('b') => Some(UiEvent::StartEditing(InputField::ButtonSpec)),
            KeyCode::Char('B') => Some(UiEvent::ClearButtons),
            KeyCode::Char('s') => Some(UiEvent::SendBroadcast),
            _ => None,
        },
        AppTab::Dashboard | AppTab::Home | AppTab::Funnel | AppTab::Events => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_editing_captures_chars() {
        let mode = InputMode::Editing(InputField::BroadcastMessage);
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('q')), AppTab::Broadcast, mode, false),
            Some(UiEvent::CharInput('q'))
        );
        assert_eq!(
            key_to_ui_event(press(KeyCode::Enter), AppTab::Broadcast, mode, false),
            Some(UiEvent::SubmitInput)
        );
    }

    #[test]
    fn test_tab_specific_keys() {
        let normal = InputMode::Normal;
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('s')), AppTab::Broadcast, normal, false),
            Some(UiEvent::SendBroadcast)
        );
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('s')), AppTab::Payment, normal, false),
            Some(UiEvent::Pay)
        );
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('s')), AppTab::Dashboard, normal, false),
            None
        );
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('2')), AppTab::Dashboard, normal, false),
            Some(UiEvent::SelectTab(1))
        );
    }

    #[test]
    fn test_help_swallows_keys() {
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('q')), AppTab::Home, InputMode::Normal, true),
            Some(UiEvent::CloseHelp)
        );
    }

    #[test]
    fn test_each_mode_has_its_tabs() {
        assert_eq!(AppMode::Customer.tabs().len(), 4);
        assert_eq!(AppMode::Admin.tabs()[4], AppTab::Broadcast);
        assert_eq!(
            AppTab::Broadcast.resources(),
            &[Resource::AudienceCounts, Resource::Broadcasts]
        );
    }
}
