//! Key event handlers for different UI modes

use crate::input_key::InputKey;
use crate::message::Message;
use crate::request_editor::RowWidget;
use crate::state::{AppState, NavSection, Pane, UiMode};
use crate::text_buffer::TextEdit;

/// Convert key events to messages based on current UI mode
pub fn handle_key(state: &AppState, key: InputKey) -> Option<Message> {
    // Ctrl+C always quits
    if key == InputKey::CharCtrl('c') {
        return Some(Message::Quit);
    }
    match state.ui_mode {
        UiMode::Normal => handle_key_normal(state, key),
        UiMode::FieldInput => handle_key_field_input(key),
        UiMode::TextEditor => handle_key_text_editor(key),
        UiMode::Search => handle_key_search(key),
        UiMode::Login => handle_key_login(key),
        UiMode::Notifications => handle_key_notifications(key),
    }
}

/// Keys shared by every single-line or multi-line text input
fn text_edit(key: &InputKey) -> Option<TextEdit> {
    match key {
        InputKey::Char(c) if key.is_printable() => Some(TextEdit::Insert(*c)),
        InputKey::Backspace => Some(TextEdit::Backspace),
        InputKey::Delete => Some(TextEdit::Delete),
        InputKey::Left => Some(TextEdit::Left),
        InputKey::Right => Some(TextEdit::Right),
        InputKey::Up => Some(TextEdit::Up),
        InputKey::Down => Some(TextEdit::Down),
        InputKey::Home | InputKey::CharCtrl('a') => Some(TextEdit::Home),
        InputKey::End | InputKey::CharCtrl('e') => Some(TextEdit::End),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────
// Normal mode
// ─────────────────────────────────────────────────────────

fn handle_key_normal(state: &AppState, key: InputKey) -> Option<Message> {
    let global = match key {
        InputKey::Char('q') => Some(Message::Quit),
        InputKey::Tab => Some(Message::FocusNextPane),
        InputKey::BackTab => Some(Message::FocusPane(previous_pane(state.focus))),
        InputKey::Char(']') => Some(Message::NextTab),
        InputKey::Char('[') => Some(Message::PreviousTab),
        InputKey::Char(c @ '1'..='9') => Some(Message::SelectTab(c as usize - '1' as usize)),
        InputKey::Char('w') => Some(Message::CloseTab),
        InputKey::Char('W') => Some(Message::CloseOtherTabs),
        InputKey::CharCtrl('w') => Some(Message::CloseAllTabs),
        InputKey::Char('n') => Some(Message::FocusNotifications),
        InputKey::Char('i') | InputKey::CharCtrl('r') => Some(Message::Invoke),
        InputKey::Char('S') => Some(Message::SaveQuery),
        InputKey::Char('/') => Some(Message::StartSearch),
        _ => None,
    };
    if global.is_some() {
        return global;
    }

    match state.focus {
        Pane::Navigator => handle_key_navigator(state, key),
        Pane::Methods => handle_key_methods(state, key),
        Pane::Request => handle_key_request(state, key),
        Pane::Response => handle_key_response(key),
    }
}

fn previous_pane(pane: Pane) -> Pane {
    match pane {
        Pane::Navigator => Pane::Response,
        Pane::Methods => Pane::Navigator,
        Pane::Request => Pane::Methods,
        Pane::Response => Pane::Request,
    }
}

fn handle_key_navigator(state: &AppState, key: InputKey) -> Option<Message> {
    match key {
        InputKey::Up | InputKey::Char('k') => Some(Message::NavigatorUp),
        InputKey::Down | InputKey::Char('j') => Some(Message::NavigatorDown),
        InputKey::Enter => Some(Message::OpenNavigatorEntry),
        InputKey::Left | InputKey::Char('h') => Some(Message::ShowNavSection(
            match state.navigator.section {
                NavSection::Services => NavSection::Saved,
                NavSection::History => NavSection::Services,
                NavSection::Saved => NavSection::History,
            },
        )),
        InputKey::Right | InputKey::Char('l') => Some(Message::ShowNavSection(
            match state.navigator.section {
                NavSection::Services => NavSection::History,
                NavSection::History => NavSection::Saved,
                NavSection::Saved => NavSection::Services,
            },
        )),
        InputKey::Char('r') => Some(Message::RefreshCatalog),
        InputKey::Char('D') if state.navigator.section == NavSection::History => {
            Some(Message::ClearHistory)
        }
        InputKey::Esc if !state.navigator.filter.is_empty() => Some(Message::ClearSearch),
        _ => None,
    }
}

fn handle_key_methods(state: &AppState, key: InputKey) -> Option<Message> {
    let cursor = state.tabs.selected().map_or(0, |s| s.method_cursor);
    match key {
        InputKey::Up | InputKey::Char('k') => Some(Message::MethodCursorUp),
        InputKey::Down | InputKey::Char('j') => Some(Message::MethodCursorDown),
        InputKey::Enter => Some(Message::ActivateMethodRow),
        InputKey::Left | InputKey::Char('h') => match cursor {
            0 => Some(Message::CycleService(-1)),
            1 => Some(Message::CycleInstance(-1)),
            _ => None,
        },
        InputKey::Right | InputKey::Char('l') => match cursor {
            0 => Some(Message::CycleService(1)),
            1 => Some(Message::CycleInstance(1)),
            _ => None,
        },
        InputKey::Char('r') => Some(Message::ReloadTab),
        _ => None,
    }
}

fn handle_key_request(state: &AppState, key: InputKey) -> Option<Message> {
    let editor = state.tabs.selected().and_then(|s| s.editor())?;

    // The text view only takes view-level keys until editing starts
    if editor.dual().is_text() {
        return match key {
            InputKey::Char('t') => Some(Message::ToggleRequestView),
            InputKey::Char('e') | InputKey::Enter => Some(Message::StartTextEdit),
            InputKey::Char('u') => Some(Message::Undo),
            _ => None,
        };
    }

    let row = editor.selected_row();
    let is_choice = matches!(
        row.as_ref().map(|r| &r.widget),
        Some(RowWidget::Choice { .. })
    );
    match key {
        InputKey::Up | InputKey::Char('k') => Some(Message::EditorUp),
        InputKey::Down | InputKey::Char('j') => Some(Message::EditorDown),
        InputKey::Char(' ') => Some(Message::TogglePresence),
        InputKey::Enter => Some(Message::ActivateField),
        InputKey::Left | InputKey::Char('h') if is_choice => Some(Message::CycleEnum(-1)),
        InputKey::Right | InputKey::Char('l') if is_choice => Some(Message::CycleEnum(1)),
        InputKey::Char('a') => Some(Message::AppendElement),
        InputKey::Char('d') | InputKey::Delete => Some(Message::RemoveElement),
        InputKey::Char('u') => Some(Message::Undo),
        InputKey::Char('t') => Some(Message::ToggleRequestView),
        InputKey::Char('e') => Some(Message::StartTextEdit),
        _ => None,
    }
}

fn handle_key_response(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Up | InputKey::Char('k') => Some(Message::ScrollResultUp),
        InputKey::Down | InputKey::Char('j') => Some(Message::ScrollResultDown),
        InputKey::PageUp => Some(Message::PageResultUp),
        InputKey::PageDown => Some(Message::PageResultDown),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────
// Input modes
// ─────────────────────────────────────────────────────────

fn handle_key_field_input(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Enter => Some(Message::CommitFieldInput),
        InputKey::Esc => Some(Message::CancelFieldInput),
        InputKey::CharCtrl('z') => Some(Message::Undo),
        _ => text_edit(&key).map(Message::FieldInputEdit),
    }
}

fn handle_key_text_editor(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Enter => Some(Message::TextViewEdit(TextEdit::Newline)),
        InputKey::Tab => Some(Message::TextViewEdit(TextEdit::Insert(' '))),
        InputKey::CharCtrl('s') => Some(Message::CommitTextView),
        InputKey::Esc => Some(Message::CancelTextEdit),
        _ => text_edit(&key).map(Message::TextViewEdit),
    }
}

fn handle_key_search(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Enter => Some(Message::EndSearch),
        InputKey::Esc => Some(Message::ClearSearch),
        _ => text_edit(&key).map(Message::SearchEdit),
    }
}

fn handle_key_login(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Tab | InputKey::BackTab => Some(Message::LoginSwitchField),
        InputKey::Enter => Some(Message::LoginSubmit),
        InputKey::Esc => Some(Message::LoginCancel),
        _ => text_edit(&key).map(Message::LoginEdit),
    }
}

fn handle_key_notifications(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Up | InputKey::Char('k') => Some(Message::NotificationFocusPrevious),
        InputKey::Down | InputKey::Char('j') => Some(Message::NotificationFocusNext),
        InputKey::Char('d') | InputKey::Delete | InputKey::Enter => {
            Some(Message::DismissNotification)
        }
        InputKey::Esc | InputKey::Char('n') | InputKey::Char('q') => {
            Some(Message::LeaveNotifications)
        }
        _ => None,
    }
}
