//! Tests for handler module

use super::*;
use crate::input_key::InputKey;
use crate::message::Message;
use crate::notifications::NotificationPayload;
use crate::session::{NetworkStep, SessionPhase, TabId};
use crate::state::{AppState, Pane, UiMode};
use serde_json::json;
use svcdbg_core::{NetworkFailure, Value};
use svcdbg_gateway::test_utils::{test_catalog, test_rpc_info};
use svcdbg_gateway::InvokeResponse;

/// Run a message and every follow-up message, collecting the actions
fn run(state: &mut AppState, msg: Message) -> Vec<UpdateAction> {
    let mut actions = Vec::new();
    let mut next = Some(msg);
    while let Some(msg) = next {
        let result = update(state, msg);
        actions.extend(result.action);
        next = result.message;
    }
    actions
}

fn failure(status: u16, text: &str) -> NetworkFailure {
    NetworkFailure {
        url: "http://gateway/api".to_string(),
        status: Some(status),
        status_text: text.to_string(),
        body: String::new(),
    }
}

/// Open `users`, answer the listing, returning the tab id
fn open_listed_tab(state: &mut AppState) -> TabId {
    let actions = run(state, Message::OpenModule {
        module: "users".into(),
    });
    let Some(UpdateAction::ListMethods { tab_id, request }) = actions.into_iter().next() else {
        panic!("expected ListMethods");
    };
    run(state, Message::MethodsListed {
        tab_id,
        ticket: request.ticket,
        catalog: test_catalog("Svc", "a", &["Get", "Put"]),
    });
    tab_id
}

/// Open a tab and describe `Get`
fn open_editing_tab(state: &mut AppState) -> TabId {
    let tab_id = open_listed_tab(state);
    let actions = run(state, Message::SelectMethod {
        method: "Get".into(),
    });
    let Some(UpdateAction::DescribeMethod { ticket, .. }) = actions.into_iter().next() else {
        panic!("expected DescribeMethod");
    };
    run(state, Message::MethodDescribed {
        tab_id,
        ticket,
        info: Box::new(test_rpc_info("Get")),
    });
    tab_id
}

fn press(state: &mut AppState, key: InputKey) -> Vec<UpdateAction> {
    run(state, Message::Key(key))
}

fn type_text(state: &mut AppState, text: &str) {
    for c in text.chars() {
        press(state, InputKey::Char(c));
    }
}

// ─────────────────────────────────────────────────────────
// Lifecycle and keys
// ─────────────────────────────────────────────────────────

#[test]
fn test_quit_message_sets_quitting_phase() {
    let mut state = AppState::new();
    update(&mut state, Message::Quit);
    assert!(state.should_quit());
}

#[test]
fn test_q_key_quits_in_normal_mode() {
    let state = AppState::new();
    assert!(matches!(handle_key(&state, InputKey::Char('q')), Some(Message::Quit)));
}

#[test]
fn test_ctrl_c_quits_from_any_mode() {
    let mut state = AppState::new();
    state.ui_mode = UiMode::Login;
    assert!(matches!(
        handle_key(&state, InputKey::CharCtrl('c')),
        Some(Message::Quit)
    ));
}

#[test]
fn test_q_types_into_search_filter() {
    let mut state = AppState::new();
    press(&mut state, InputKey::Char('/'));
    assert_eq!(state.ui_mode, UiMode::Search);
    type_text(&mut state, "qa");
    assert_eq!(state.navigator.filter_text(), "qa");
    assert!(!state.should_quit());

    press(&mut state, InputKey::Esc);
    assert_eq!(state.ui_mode, UiMode::Normal);
    assert_eq!(state.navigator.filter_text(), "");
}

// ─────────────────────────────────────────────────────────
// Catalog
// ─────────────────────────────────────────────────────────

#[test]
fn test_refresh_is_skipped_while_loading() {
    let mut state = AppState::new();
    assert_eq!(run(&mut state, Message::RefreshCatalog), vec![UpdateAction::ListServices]);
    assert!(run(&mut state, Message::RefreshCatalog).is_empty());

    run(&mut state, Message::CatalogLoaded {
        modules: vec!["users".into()],
    });
    assert!(state.catalog.loaded);
    assert!(!state.catalog.loading);
}

#[test]
fn test_navigator_enter_opens_module_tab() {
    let mut state = AppState::new();
    state.catalog.modules = vec!["orders".into(), "users".into()];
    press(&mut state, InputKey::Down);
    let actions = press(&mut state, InputKey::Enter);

    assert!(matches!(
        actions.as_slice(),
        [UpdateAction::ListMethods { request, .. }] if request.module == "users"
    ));
    assert_eq!(state.tabs.len(), 1);
    assert_eq!(state.focus, Pane::Methods);
}

#[test]
fn test_catalog_401_prompts_login_without_notification() {
    let mut state = AppState::new();
    run(&mut state, Message::RefreshCatalog);
    run(&mut state, Message::CatalogFailed {
        failure: failure(401, "Unauthorized"),
    });
    assert_eq!(state.ui_mode, UiMode::Login);
    assert!(state.notifications.is_empty());
}

// ─────────────────────────────────────────────────────────
// Sessions
// ─────────────────────────────────────────────────────────

#[test]
fn test_describe_moves_focus_to_request() {
    let mut state = AppState::new();
    open_editing_tab(&mut state);
    let session = state.tabs.selected().unwrap();
    assert_eq!(session.phase(), SessionPhase::Editing);
    assert_eq!(state.focus, Pane::Request);
}

#[test]
fn test_invoke_records_history_and_applies_result() {
    let mut state = AppState::new();
    let tab_id = open_editing_tab(&mut state);

    let actions = run(&mut state, Message::Invoke);
    let [UpdateAction::Invoke { ticket, target, body, .. }] = actions.as_slice() else {
        panic!("expected Invoke, got {actions:?}");
    };
    assert_eq!(target.method, "Get");
    assert_eq!(body, &Value::empty_map());
    assert_eq!(state.history.len(), 1);

    run(&mut state, Message::InvokeCompleted {
        tab_id,
        ticket: *ticket,
        response: InvokeResponse {
            data: Value::from(json!({"ok": true})),
            server_cost_ms: 3,
        },
        client_ms: 10,
    });
    let session = state.tabs.selected().unwrap();
    assert_eq!(session.phase(), SessionPhase::Result);
    assert_eq!(session.cost().map(|c| c.client_ms), Some(10));
}

#[test]
fn test_history_recording_can_be_disabled() {
    let mut state = AppState::new();
    state.settings.history.record = false;
    open_editing_tab(&mut state);
    run(&mut state, Message::Invoke);
    assert!(state.history.is_empty());
}

#[test]
fn test_invoke_failure_pushes_notification() {
    let mut state = AppState::new();
    let tab_id = open_editing_tab(&mut state);
    let actions = run(&mut state, Message::Invoke);
    let [UpdateAction::Invoke { ticket, .. }] = actions.as_slice() else {
        panic!("expected Invoke");
    };

    let actions = run(&mut state, Message::RequestFailed {
        tab_id,
        step: NetworkStep::Invoke,
        ticket: *ticket,
        failure: failure(500, "Internal Server Error"),
    });
    assert!(matches!(
        actions.as_slice(),
        [UpdateAction::Timer(crate::notifications::TimerCommand::Start { .. })]
    ));
    assert_eq!(state.notifications.len(), 1);
    assert_eq!(state.tabs.selected().unwrap().phase(), SessionPhase::Editing);
}

#[test]
fn test_request_401_prompts_login() {
    let mut state = AppState::new();
    let tab_id = open_editing_tab(&mut state);
    let actions = run(&mut state, Message::Invoke);
    let [UpdateAction::Invoke { ticket, .. }] = actions.as_slice() else {
        panic!("expected Invoke");
    };

    run(&mut state, Message::RequestFailed {
        tab_id,
        step: NetworkStep::Invoke,
        ticket: *ticket,
        failure: failure(401, "Unauthorized"),
    });
    assert_eq!(state.ui_mode, UiMode::Login);
    assert!(state.notifications.is_empty());
}

#[test]
fn test_stale_failure_is_dropped() {
    let mut state = AppState::new();
    let tab_id = open_listed_tab(&mut state);
    let actions = run(&mut state, Message::SelectService {
        service: "Other".into(),
    });
    let [UpdateAction::ListMethods { request: stale, .. }] = actions.as_slice() else {
        panic!("expected ListMethods");
    };
    let stale = stale.ticket;
    run(&mut state, Message::SelectService {
        service: "Third".into(),
    });

    run(&mut state, Message::RequestFailed {
        tab_id,
        step: NetworkStep::ListMethods,
        ticket: stale,
        failure: failure(500, "Internal Server Error"),
    });
    assert!(state.notifications.is_empty());
    assert!(state.tabs.selected().unwrap().is_loading());
}

#[test]
fn test_response_for_closed_tab_is_ignored() {
    let mut state = AppState::new();
    let actions = run(&mut state, Message::OpenModule {
        module: "users".into(),
    });
    let [UpdateAction::ListMethods { tab_id, request }] = actions.as_slice() else {
        panic!("expected ListMethods");
    };
    run(&mut state, Message::CloseTab);
    assert!(state.tabs.is_empty());
    assert_eq!(state.focus, Pane::Navigator);

    let actions = run(&mut state, Message::MethodsListed {
        tab_id: *tab_id,
        ticket: request.ticket,
        catalog: test_catalog("Svc", "a", &["Get"]),
    });
    assert!(actions.is_empty());
}

#[test]
fn test_query_restores_method_and_body() {
    let mut state = AppState::new();
    open_editing_tab(&mut state);
    run(&mut state, Message::Invoke);
    let record = state.history.records()[0].clone();

    let actions = run(&mut state, Message::OpenQuery { record });
    let [UpdateAction::ListMethods { tab_id, request }] = actions.as_slice() else {
        panic!("expected ListMethods");
    };
    let tab_id = *tab_id;
    let actions = run(&mut state, Message::MethodsListed {
        tab_id,
        ticket: request.ticket,
        catalog: test_catalog("Svc", "a", &["Get", "Put"]),
    });
    assert!(matches!(
        actions.as_slice(),
        [UpdateAction::DescribeMethod { target, .. }] if target.method == "Get"
    ));
}

#[test]
fn test_method_row_enter_selects_method() {
    let mut state = AppState::new();
    open_listed_tab(&mut state);
    state.focus = Pane::Methods;
    press(&mut state, InputKey::Down);
    press(&mut state, InputKey::Down);
    let actions = press(&mut state, InputKey::Enter);
    assert!(matches!(
        actions.as_slice(),
        [UpdateAction::DescribeMethod { target, .. }] if target.method == "Get"
    ));
}

// ─────────────────────────────────────────────────────────
// Request editor
// ─────────────────────────────────────────────────────────

#[test]
fn test_field_input_keeps_rejected_text_as_draft() {
    let mut state = AppState::new();
    open_editing_tab(&mut state);

    // Absent `age` becomes null, then opens the inline input
    press(&mut state, InputKey::Enter);
    press(&mut state, InputKey::Enter);
    assert_eq!(state.ui_mode, UiMode::FieldInput);

    type_text(&mut state, "abc");
    press(&mut state, InputKey::Enter);
    assert_eq!(state.ui_mode, UiMode::Normal);
    let editor = state.tabs.selected().unwrap().editor().unwrap();
    assert!(editor.has_drafts());
    assert_eq!(editor.value(), &Value::from(json!({"age": null})));

    // Reopening starts from the draft
    press(&mut state, InputKey::Enter);
    assert_eq!(state.field_input.as_ref().unwrap().buffer.text(), "abc");
    for _ in 0..3 {
        press(&mut state, InputKey::Backspace);
    }
    type_text(&mut state, "42");
    press(&mut state, InputKey::Enter);
    let editor = state.tabs.selected().unwrap().editor().unwrap();
    assert!(!editor.has_drafts());
    assert_eq!(editor.value(), &Value::from(json!({"age": 42})));
}

#[test]
fn test_text_view_rejects_bad_json_and_stays_open() {
    let mut state = AppState::new();
    open_editing_tab(&mut state);

    press(&mut state, InputKey::Char('e'));
    assert_eq!(state.ui_mode, UiMode::TextEditor);
    type_text(&mut state, "x");
    press(&mut state, InputKey::CharCtrl('s'));
    assert_eq!(state.ui_mode, UiMode::TextEditor);

    press(&mut state, InputKey::Esc);
    assert_eq!(state.ui_mode, UiMode::Normal);
    let editor = state.tabs.selected().unwrap().editor().unwrap();
    assert_eq!(editor.value(), &Value::empty_map());
}

#[test]
fn test_save_query_notifies() {
    let mut state = AppState::new();
    open_editing_tab(&mut state);
    let actions = press(&mut state, InputKey::Char('S'));
    assert_eq!(state.saved.len(), 1);
    assert_eq!(actions.len(), 1);
    assert!(matches!(
        state.notifications.iter().next().map(|n| &n.payload),
        Some(NotificationPayload::Info(_))
    ));
}

// ─────────────────────────────────────────────────────────
// Notifications and login
// ─────────────────────────────────────────────────────────

fn info(text: &str) -> Message {
    Message::PushNotification {
        payload: NotificationPayload::Info(text.to_string()),
    }
}

#[test]
fn test_focused_notification_is_kept_until_left() {
    let mut state = AppState::new();
    run(&mut state, info("a"));
    run(&mut state, info("b"));
    assert_eq!(state.notifications.live_timers(), 2);

    let actions = press(&mut state, InputKey::Char('n'));
    assert_eq!(state.ui_mode, UiMode::Notifications);
    assert_eq!(state.notifications.live_timers(), 1);
    assert!(matches!(actions.as_slice(), [UpdateAction::Timer(_)]));

    // Moving releases the old item and keeps the new one
    let actions = press(&mut state, InputKey::Up);
    assert!(matches!(actions.as_slice(), [UpdateAction::Batch(batch)] if batch.len() == 2));
    assert_eq!(state.notifications.live_timers(), 1);

    press(&mut state, InputKey::Esc);
    assert_eq!(state.ui_mode, UiMode::Normal);
    assert_eq!(state.notifications.live_timers(), 2);
}

#[test]
fn test_dismiss_last_notification_leaves_list() {
    let mut state = AppState::new();
    run(&mut state, info("only"));
    press(&mut state, InputKey::Char('n'));
    press(&mut state, InputKey::Char('d'));
    assert!(state.notifications.is_empty());
    assert_eq!(state.ui_mode, UiMode::Normal);
    assert!(state.notification_focus.is_none());
}

#[test]
fn test_stale_timer_does_not_remove_kept_notification() {
    let mut state = AppState::new();
    let actions = run(&mut state, info("a"));
    let [UpdateAction::Timer(crate::notifications::TimerCommand::Start { id, token, .. })] =
        actions.as_slice()
    else {
        panic!("expected timer start");
    };
    press(&mut state, InputKey::Char('n'));
    run(&mut state, Message::NotificationTimerFired {
        id: *id,
        token: *token,
    });
    assert_eq!(state.notifications.len(), 1);
}

#[test]
fn test_login_submit_and_success_relists_tabs() {
    let mut state = AppState::new();
    let tab_id = open_listed_tab(&mut state);
    run(&mut state, Message::LoginRequired);
    assert_eq!(state.ui_mode, UiMode::Login);

    type_text(&mut state, "alice");
    press(&mut state, InputKey::Tab);
    type_text(&mut state, "pw");
    let actions = press(&mut state, InputKey::Enter);
    assert_eq!(
        actions,
        vec![UpdateAction::Login {
            username: "alice".into(),
            password: "pw".into(),
        }]
    );
    // A second submit while in flight does nothing
    assert!(press(&mut state, InputKey::Enter).is_empty());

    let actions = run(&mut state, Message::LoginSucceeded);
    assert_eq!(state.ui_mode, UiMode::Normal);
    let [UpdateAction::Batch(batch)] = actions.as_slice() else {
        panic!("expected Batch");
    };
    assert_eq!(batch[0], UpdateAction::ListServices);
    assert!(matches!(&batch[1], UpdateAction::ListMethods { tab_id: id, .. } if *id == tab_id));
}

#[test]
fn test_login_failure_shows_error() {
    let mut state = AppState::new();
    run(&mut state, Message::LoginRequired);
    type_text(&mut state, "bob");
    press(&mut state, InputKey::Enter);
    run(&mut state, Message::LoginFailed {
        message: "401 Unauthorized".into(),
    });
    assert_eq!(state.ui_mode, UiMode::Login);
    assert!(!state.login.submitting);
    assert_eq!(state.login.error.as_deref(), Some("401 Unauthorized"));
}

#[test]
fn test_login_requires_username() {
    let mut state = AppState::new();
    run(&mut state, Message::LoginRequired);
    assert!(press(&mut state, InputKey::Enter).is_empty());
    assert!(state.login.error.is_some());
}

#[test]
fn test_page_keys_scroll_result_by_page() {
    let mut state = AppState::new();
    open_editing_tab(&mut state);
    run(&mut state, Message::FocusPane(Pane::Response));

    press(&mut state, InputKey::PageDown);
    press(&mut state, InputKey::Down);
    assert_eq!(state.tabs.selected().map(|s| s.result_scroll), Some(11));

    press(&mut state, InputKey::PageUp);
    press(&mut state, InputKey::PageUp);
    assert_eq!(state.tabs.selected().map(|s| s.result_scroll), Some(0));
}

#[test]
fn test_instance_change_while_describing_redescribes_after_listing() {
    let mut state = AppState::new();
    let tab_id = open_listed_tab(&mut state);
    run(&mut state, Message::SelectMethod {
        method: "Get".into(),
    });

    let actions = run(&mut state, Message::SelectInstance {
        instance: "b".into(),
    });
    let [UpdateAction::ListMethods { request, .. }] = actions.as_slice() else {
        panic!("expected ListMethods");
    };
    let actions = run(&mut state, Message::MethodsListed {
        tab_id,
        ticket: request.ticket,
        catalog: test_catalog("Svc", "b", &["Get", "Put"]),
    });

    let [UpdateAction::DescribeMethod { target, .. }] = actions.as_slice() else {
        panic!("expected DescribeMethod, got {actions:?}");
    };
    assert_eq!(target.method, "Get");
    assert_eq!(target.instance, "b");
    let session = state.tabs.get(tab_id).unwrap();
    assert_eq!(session.phase(), SessionPhase::DescribingMethod);
}
