//! Notification queue and login prompt handlers

use svcdbg_core::prelude::*;

use crate::notifications::{NotificationId, NotificationPayload, TimerToken};
use crate::state::{AppState, LoginState, UiMode};

use super::{UpdateAction, UpdateResult};

// ─────────────────────────────────────────────────────────
// Notification queue
// ─────────────────────────────────────────────────────────

/// Append a notification and start its expiry timer
pub fn push(state: &mut AppState, payload: NotificationPayload) -> UpdateResult {
    let (id, start) = state.notifications.push(payload);
    trace!("Notification {:?} pushed", id);
    UpdateResult::action(UpdateAction::Timer(start))
}

pub fn handle_timer_fired(state: &mut AppState, id: NotificationId, token: TimerToken) -> UpdateResult {
    if state.notifications.timer_fired(id, token) {
        trace!("Notification {:?} expired", id);
    }
    UpdateResult::none()
}

/// Enter the list on the newest item and keep it
pub fn handle_focus(state: &mut AppState) -> UpdateResult {
    let Some(id) = state
        .notifications
        .len()
        .checked_sub(1)
        .and_then(|last| state.notifications.id_at(last))
    else {
        return UpdateResult::none();
    };
    state.ui_mode = UiMode::Notifications;
    state.notification_focus = Some(id);
    UpdateResult::timer(state.notifications.keep(id))
}

fn focused_index(state: &AppState) -> Option<usize> {
    let focus = state.notification_focus?;
    state.notifications.iter().position(|item| item.id == focus)
}

/// Releases the old item and keeps the new one
pub fn handle_move_focus(state: &mut AppState, delta: isize) -> UpdateResult {
    let Some(current) = focused_index(state) else {
        return handle_leave(state);
    };
    let last = state.notifications.len() as isize - 1;
    let next = (current as isize + delta).clamp(0, last) as usize;
    if next == current {
        return UpdateResult::none();
    }
    let (Some(old), Some(new)) = (
        state.notifications.id_at(current),
        state.notifications.id_at(next),
    ) else {
        return UpdateResult::none();
    };

    let commands = [state.notifications.release(old), state.notifications.keep(new)];
    state.notification_focus = Some(new);
    UpdateResult::actions(commands.into_iter().flatten().map(UpdateAction::Timer).collect())
}

pub fn handle_leave(state: &mut AppState) -> UpdateResult {
    if state.ui_mode == UiMode::Notifications {
        state.ui_mode = UiMode::Normal;
    }
    match state.notification_focus.take() {
        Some(id) => UpdateResult::timer(state.notifications.release(id)),
        None => UpdateResult::none(),
    }
}

/// Remove the focused item; focus moves to a neighbour, or leaves the list when
/// it becomes empty
pub fn handle_dismiss(state: &mut AppState) -> UpdateResult {
    let Some(index) = focused_index(state) else {
        return handle_leave(state);
    };
    let Some(id) = state.notifications.id_at(index) else {
        return UpdateResult::none();
    };
    let mut actions: Vec<UpdateAction> = state
        .notifications
        .expire(id)
        .map(UpdateAction::Timer)
        .into_iter()
        .collect();

    if state.notifications.is_empty() {
        state.notification_focus = None;
        state.ui_mode = UiMode::Normal;
        return UpdateResult::actions(actions);
    }

    let neighbour = index.min(state.notifications.len() - 1);
    if let Some(next) = state.notifications.id_at(neighbour) {
        state.notification_focus = Some(next);
        actions.extend(state.notifications.keep(next).map(UpdateAction::Timer));
    }
    UpdateResult::actions(actions)
}

// ─────────────────────────────────────────────────────────
// Login prompt
// ─────────────────────────────────────────────────────────

pub fn handle_login_required(state: &mut AppState) -> UpdateResult {
    if state.ui_mode == UiMode::Login {
        return UpdateResult::none();
    }
    info!("Gateway requires login");
    // A focused notification would otherwise stay kept forever
    let release = handle_leave(state);
    state.ui_mode = UiMode::Login;
    state.field_input = None;
    state.login.error = None;
    state.login.submitting = false;
    release
}

pub fn handle_login_submit(state: &mut AppState) -> UpdateResult {
    if state.login.submitting {
        return UpdateResult::none();
    }
    let username = state.login.username.text();
    if username.is_empty() {
        state.login.error = Some("Username is required".to_string());
        return UpdateResult::none();
    }
    state.login.submitting = true;
    state.login.error = None;
    UpdateResult::action(UpdateAction::Login {
        username,
        password: state.login.password.text(),
    })
}

/// Re-issue the listings that were cut short by the 401
pub fn handle_login_succeeded(state: &mut AppState) -> UpdateResult {
    info!("Logged in to gateway");
    state.ui_mode = UiMode::Normal;
    state.login = LoginState::default();
    state.catalog.loading = true;

    let mut actions = vec![UpdateAction::ListServices];
    for id in state.tabs.ids() {
        if let Some(session) = state.tabs.get_mut(id) {
            actions.push(UpdateAction::ListMethods {
                tab_id: id,
                request: session.open(),
            });
        }
    }
    UpdateResult::actions(actions)
}

pub fn handle_login_failed(state: &mut AppState, message: String) -> UpdateResult {
    warn!("Login failed: {}", message);
    state.login.submitting = false;
    state.login.error = Some(message);
    UpdateResult::none()
}

pub fn handle_login_cancel(state: &mut AppState) -> UpdateResult {
    state.ui_mode = UiMode::Normal;
    state.login.submitting = false;
    state.login.error = None;
    UpdateResult::none()
}
