//! Tab and invocation session handlers

use svcdbg_core::prelude::*;
use svcdbg_core::{MethodCatalog, NetworkFailure, RpcInfo};
use svcdbg_gateway::InvokeResponse;

use crate::history::QueryRecord;
use crate::message::Message;
use crate::notifications::NotificationPayload;
use crate::session::{InitialRequest, InvocationSession, NetworkStep, TabId, Ticket};
use crate::state::{AppState, Pane, UiMode};

use super::{notifications, UpdateAction, UpdateResult};

/// Rows above the method list in the methods pane (service, instance)
pub const METHOD_HEADER_ROWS: usize = 2;

/// Result lines moved by PageUp/PageDown
pub const RESULT_PAGE: isize = 10;

// ─────────────────────────────────────────────────────────
// Tabs
// ─────────────────────────────────────────────────────────

pub fn handle_open_module(
    state: &mut AppState,
    module: String,
    initial: Option<InitialRequest>,
) -> UpdateResult {
    let mut session = InvocationSession::new(module);
    if let Some(initial) = initial {
        session = session.with_initial(initial);
    }
    let request = session.open();
    let tab_id = state.tabs.open(session);
    state.focus = Pane::Methods;
    UpdateResult::action(UpdateAction::ListMethods { tab_id, request })
}

/// Modes tied to the selected tab end when it goes away
fn leave_tab_modes(state: &mut AppState) {
    if matches!(state.ui_mode, UiMode::FieldInput | UiMode::TextEditor) {
        state.ui_mode = UiMode::Normal;
    }
    state.field_input = None;
}

pub fn handle_close_tab(state: &mut AppState) -> UpdateResult {
    if let Some(id) = state.tabs.selected_id() {
        state.tabs.close(id);
        leave_tab_modes(state);
    }
    if state.tabs.is_empty() {
        state.focus = Pane::Navigator;
    }
    UpdateResult::none()
}

pub fn handle_close_all(state: &mut AppState) -> UpdateResult {
    state.tabs.close_all();
    leave_tab_modes(state);
    state.focus = Pane::Navigator;
    UpdateResult::none()
}

pub fn handle_close_others(state: &mut AppState) -> UpdateResult {
    if let Some(id) = state.tabs.selected_id() {
        state.tabs.close_others(id);
    }
    UpdateResult::none()
}

// ─────────────────────────────────────────────────────────
// Selection
// ─────────────────────────────────────────────────────────

pub fn handle_method_cursor(state: &mut AppState, delta: isize) -> UpdateResult {
    if let Some(session) = state.tabs.selected_mut() {
        let rows = METHOD_HEADER_ROWS + session.methods.len();
        let next = session.method_cursor as isize + delta;
        session.method_cursor = next.clamp(0, rows as isize - 1) as usize;
    }
    UpdateResult::none()
}

pub fn handle_activate_method_row(state: &mut AppState) -> UpdateResult {
    let Some(session) = state.tabs.selected() else {
        return UpdateResult::none();
    };
    match session.method_cursor {
        0 => UpdateResult::message(Message::CycleService(1)),
        1 => UpdateResult::message(Message::CycleInstance(1)),
        n => match session.methods.get(n - METHOD_HEADER_ROWS) {
            Some(method) => UpdateResult::message(Message::SelectMethod {
                method: method.clone(),
            }),
            None => UpdateResult::none(),
        },
    }
}

/// Entry `delta` steps from `current` in `choices`, wrapping
fn step_choice(choices: &[String], current: Option<&String>, delta: isize) -> Option<String> {
    if choices.is_empty() {
        return None;
    }
    let len = choices.len() as isize;
    let index = current
        .and_then(|c| choices.iter().position(|x| x == c))
        .map_or(0, |i| (i as isize + delta).rem_euclid(len));
    Some(choices[index as usize].clone())
}

pub fn handle_cycle_service(state: &mut AppState, delta: isize) -> UpdateResult {
    let Some(session) = state.tabs.selected() else {
        return UpdateResult::none();
    };
    match step_choice(&session.services, session.service.as_ref(), delta) {
        Some(service) if Some(&service) != session.service.as_ref() => {
            UpdateResult::message(Message::SelectService { service })
        }
        _ => UpdateResult::none(),
    }
}

pub fn handle_cycle_instance(state: &mut AppState, delta: isize) -> UpdateResult {
    let Some(session) = state.tabs.selected() else {
        return UpdateResult::none();
    };
    match step_choice(&session.instances, session.instance.as_ref(), delta) {
        Some(instance) if Some(&instance) != session.instance.as_ref() => {
            UpdateResult::message(Message::SelectInstance { instance })
        }
        _ => UpdateResult::none(),
    }
}

pub fn handle_select_service(state: &mut AppState, service: String) -> UpdateResult {
    let Some(session) = state.tabs.selected_mut() else {
        return UpdateResult::none();
    };
    let tab_id = session.id;
    let request = session.select_service(service);
    if state.ui_mode == UiMode::FieldInput || state.ui_mode == UiMode::TextEditor {
        state.ui_mode = UiMode::Normal;
        state.field_input = None;
    }
    UpdateResult::action(UpdateAction::ListMethods { tab_id, request })
}

pub fn handle_select_instance(state: &mut AppState, instance: String) -> UpdateResult {
    let Some(session) = state.tabs.selected_mut() else {
        return UpdateResult::none();
    };
    let tab_id = session.id;
    let request = session.select_instance(instance);
    UpdateResult::action(UpdateAction::ListMethods { tab_id, request })
}

fn describe(session: &mut InvocationSession, method: String) -> UpdateResult {
    let tab_id = session.id;
    match session.select_method(method) {
        Some((ticket, target)) => UpdateResult::action(UpdateAction::DescribeMethod {
            tab_id,
            ticket,
            target,
        }),
        None => {
            debug!("Tab {} has no service/instance to describe against", tab_id);
            UpdateResult::none()
        }
    }
}

pub fn handle_select_method(state: &mut AppState, method: String) -> UpdateResult {
    if state.ui_mode == UiMode::FieldInput || state.ui_mode == UiMode::TextEditor {
        state.ui_mode = UiMode::Normal;
        state.field_input = None;
    }
    match state.tabs.selected_mut() {
        Some(session) => describe(session, method),
        None => UpdateResult::none(),
    }
}

pub fn handle_reload_tab(state: &mut AppState) -> UpdateResult {
    let Some(session) = state.tabs.selected_mut() else {
        return UpdateResult::none();
    };
    let tab_id = session.id;
    let request = session.open();
    UpdateResult::action(UpdateAction::ListMethods { tab_id, request })
}

pub fn handle_invoke(state: &mut AppState) -> UpdateResult {
    let Some(session) = state.tabs.selected_mut() else {
        return UpdateResult::none();
    };
    let tab_id = session.id;
    let Some((ticket, target, body)) = session.begin_invoke() else {
        debug!("Tab {} is not ready to invoke", tab_id);
        return UpdateResult::none();
    };
    info!("Invoking {} on {}/{}", target.caption(), target.module, target.instance);

    if state.settings.history.record {
        if let Err(e) = state.history.add(QueryRecord::new(&target, body.clone())) {
            warn!("Failed to record history: {}", e);
        }
    }

    UpdateResult::action(UpdateAction::Invoke {
        tab_id,
        ticket,
        target,
        body,
    })
}

pub fn handle_scroll_result(state: &mut AppState, delta: isize) -> UpdateResult {
    if let Some(session) = state.tabs.selected_mut() {
        session.result_scroll = session.result_scroll.saturating_add_signed(delta);
    }
    UpdateResult::none()
}

// ─────────────────────────────────────────────────────────
// Gateway responses
// ─────────────────────────────────────────────────────────

pub fn handle_methods_listed(
    state: &mut AppState,
    tab_id: TabId,
    ticket: Ticket,
    catalog: MethodCatalog,
) -> UpdateResult {
    let Some(session) = state.tabs.get_mut(tab_id) else {
        debug!("Catalog for closed tab {}", tab_id);
        return UpdateResult::none();
    };
    if !session.apply_catalog(ticket, catalog) {
        return UpdateResult::none();
    }
    let rows = METHOD_HEADER_ROWS + session.methods.len();
    session.method_cursor = session.method_cursor.min(rows - 1);

    let describe_next = session
        .initial_method()
        .or_else(|| session.undescribed_method())
        .map(str::to_string);
    match describe_next {
        Some(method) => describe(session, method),
        None => UpdateResult::none(),
    }
}

pub fn handle_method_described(
    state: &mut AppState,
    tab_id: TabId,
    ticket: Ticket,
    info: RpcInfo,
) -> UpdateResult {
    let selected = state.tabs.selected_id() == Some(tab_id);
    let Some(session) = state.tabs.get_mut(tab_id) else {
        return UpdateResult::none();
    };
    if session.apply_rpc_info(ticket, info) && selected && state.focus == Pane::Methods {
        state.focus = Pane::Request;
    }
    UpdateResult::none()
}

pub fn handle_invoke_completed(
    state: &mut AppState,
    tab_id: TabId,
    ticket: Ticket,
    response: InvokeResponse,
    client_ms: u64,
) -> UpdateResult {
    if let Some(session) = state.tabs.get_mut(tab_id) {
        if session.apply_invoke(ticket, response, client_ms) {
            debug!("Tab {} invocation took {} ms", tab_id, client_ms);
        }
    }
    UpdateResult::none()
}

/// A failed step clears its pending state. 401 raises the login prompt instead of
/// a notification; failures of stale steps are dropped.
pub fn handle_request_failed(
    state: &mut AppState,
    tab_id: TabId,
    step: NetworkStep,
    ticket: Ticket,
    failure: NetworkFailure,
) -> UpdateResult {
    let matched = match state.tabs.get_mut(tab_id) {
        Some(session) => session.fail(step, ticket, failure.summary()),
        None => false,
    };
    if failure.is_auth_required() {
        return UpdateResult::message(Message::LoginRequired);
    }
    if !matched {
        return UpdateResult::none();
    }
    warn!("{:?} failed for tab {}: {}", step, tab_id, failure.summary());
    notifications::push(state, NotificationPayload::Network(failure))
}
