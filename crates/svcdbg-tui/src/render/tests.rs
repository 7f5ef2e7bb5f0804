//! Full-frame rendering tests

use super::*;
use crate::test_utils::{complete_invoke, open_editing_tab, run, state_with_modules, TestTerminal};
use serde_json::json;
use svcdbg_app::notifications::NotificationPayload;
use svcdbg_app::Message;
use svcdbg_core::NetworkFailure;

fn draw(state: &AppState) -> TestTerminal {
    let mut term = TestTerminal::new();
    term.draw_with(|frame| view(frame, state));
    term
}

#[test]
fn test_startup_frame() {
    let state = state_with_modules(&["users", "orders"]);
    let term = draw(&state);

    assert!(term.buffer_contains("Service Debugger"));
    assert!(term.buffer_contains("Navigator"));
    assert!(term.buffer_contains("users"));
    assert!(term.buffer_contains("Open a module"));
    assert!(term.buffer_contains("○ No tab"));
}

#[test]
fn test_editing_frame_shows_all_panes() {
    let mut state = state_with_modules(&["users"]);
    open_editing_tab(&mut state, "users");
    let term = draw(&state);

    assert!(term.buffer_contains("Methods · users"));
    assert!(term.buffer_contains("UserService"));
    assert!(term.buffer_contains("○ age"));
    assert!(term.buffer_contains("Press i to invoke"));
    assert!(term.buffer_contains("● Editing"));
}

#[test]
fn test_result_frame() {
    let mut state = AppState::new();
    open_editing_tab(&mut state, "users");
    complete_invoke(&mut state, json!({"name": "ada"}), 4);
    let term = draw(&state);

    assert!(term.buffer_contains("server 4 ms"));
    assert!(term.buffer_contains("name: \"ada\""));
    assert!(term.buffer_contains("● Result"));
}

#[test]
fn test_notification_overlay() {
    let mut state = AppState::new();
    run(
        &mut state,
        Message::PushNotification {
            payload: NotificationPayload::Network(NetworkFailure {
                url: "http://gw/api/service/list".to_string(),
                status: Some(502),
                status_text: "Bad Gateway".to_string(),
                body: String::new(),
            }),
        },
    );
    let term = draw(&state);
    assert!(term.buffer_contains("✗ 502 Bad Gateway"));
    assert!(term.buffer_contains("Notifications (n)"));
}

#[test]
fn test_login_dialog_over_frame() {
    let mut state = AppState::new();
    run(&mut state, Message::LoginRequired);
    let term = draw(&state);
    assert!(term.buffer_contains("Login required"));
    assert!(term.buffer_contains("Enter submit"));
}

#[test]
fn test_compact_terminal_does_not_panic() {
    let mut state = state_with_modules(&["users"]);
    open_editing_tab(&mut state, "users");
    let mut term = TestTerminal::with_size(20, 6);
    term.draw_with(|frame| view(frame, &state));
}
