//! Catalog navigator handlers: module listing, filter, history and saved entries

use svcdbg_core::prelude::*;
use svcdbg_core::NetworkFailure;

use crate::message::Message;
use crate::notifications::NotificationPayload;
use crate::state::{AppState, NavEntry, NavSection, Pane, UiMode};
use crate::text_buffer::{TextBuffer, TextEdit};

use super::{notifications, UpdateAction, UpdateResult};

/// Re-list modules unless a listing is in flight or the login prompt is up.
pub fn handle_refresh(state: &mut AppState) -> UpdateResult {
    if state.catalog.loading || state.ui_mode == UiMode::Login {
        return UpdateResult::none();
    }
    state.catalog.loading = true;
    UpdateResult::action(UpdateAction::ListServices)
}

pub fn handle_loaded(state: &mut AppState, modules: Vec<String>) -> UpdateResult {
    debug!("Catalog lists {} modules", modules.len());
    state.catalog.loading = false;
    state.catalog.loaded = true;
    state.catalog.modules = modules;
    state.clamp_navigator_cursor();
    UpdateResult::none()
}

pub fn handle_failed(state: &mut AppState, failure: NetworkFailure) -> UpdateResult {
    state.catalog.loading = false;
    if failure.is_auth_required() {
        return UpdateResult::message(Message::LoginRequired);
    }
    warn!("Module listing failed: {}", failure.summary());
    notifications::push(state, NotificationPayload::Network(failure))
}

pub fn handle_show_section(state: &mut AppState, section: NavSection) -> UpdateResult {
    state.navigator.section = section;
    state.navigator.cursor = 0;
    state.focus = Pane::Navigator;
    UpdateResult::none()
}

pub fn handle_move(state: &mut AppState, delta: isize) -> UpdateResult {
    let len = state.navigator_entries().len();
    if len == 0 {
        state.navigator.cursor = 0;
        return UpdateResult::none();
    }
    let next = state.navigator.cursor as isize + delta;
    state.navigator.cursor = next.clamp(0, len as isize - 1) as usize;
    UpdateResult::none()
}

pub fn handle_open_entry(state: &mut AppState) -> UpdateResult {
    match state.selected_nav_entry() {
        Some(NavEntry::Module(module)) => UpdateResult::message(Message::OpenModule { module }),
        Some(NavEntry::Query(record)) => UpdateResult::message(Message::OpenQuery { record }),
        None => UpdateResult::none(),
    }
}

pub fn handle_start_search(state: &mut AppState) -> UpdateResult {
    state.ui_mode = UiMode::Search;
    state.focus = Pane::Navigator;
    UpdateResult::none()
}

pub fn handle_search_edit(state: &mut AppState, edit: TextEdit) -> UpdateResult {
    if state.navigator.filter.apply(edit) {
        state.navigator.cursor = 0;
    }
    UpdateResult::none()
}

pub fn handle_end_search(state: &mut AppState, clear: bool) -> UpdateResult {
    if clear {
        state.navigator.filter = TextBuffer::default();
        state.navigator.cursor = 0;
    }
    state.ui_mode = UiMode::Normal;
    UpdateResult::none()
}

pub fn handle_clear_history(state: &mut AppState) -> UpdateResult {
    if let Err(e) = state.history.clear() {
        warn!("Failed to clear history: {}", e);
    }
    state.clamp_navigator_cursor();
    UpdateResult::none()
}
