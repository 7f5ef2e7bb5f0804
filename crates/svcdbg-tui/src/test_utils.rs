//! Test utilities for TUI rendering verification
//!
//! Widgets and full frames are rendered into ratatui's `TestBackend` and
//! inspected as text. State fixtures are built by driving the real update
//! function, so rendering tests see the same states the app produces.

use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;
use ratatui::Frame;
use ratatui::Terminal;

use svcdbg_app::handler::{update, UpdateAction};
use svcdbg_app::{AppState, Message, TabId};
use svcdbg_core::Value;
use svcdbg_gateway::test_utils::{test_catalog, test_rpc_info};
use svcdbg_gateway::InvokeResponse;

/// Standard test terminal width
pub const TEST_WIDTH: u16 = 120;
/// Standard test terminal height
pub const TEST_HEIGHT: u16 = 32;

pub const COMPACT_WIDTH: u16 = 60;
pub const COMPACT_HEIGHT: u16 = 16;

/// Wrapper around `Terminal<TestBackend>`
pub struct TestTerminal {
    pub terminal: Terminal<TestBackend>,
}

impl TestTerminal {
    pub fn new() -> Self {
        Self::with_size(TEST_WIDTH, TEST_HEIGHT)
    }

    pub fn compact() -> Self {
        Self::with_size(COMPACT_WIDTH, COMPACT_HEIGHT)
    }

    pub fn with_size(width: u16, height: u16) -> Self {
        let backend = TestBackend::new(width, height);
        let terminal = Terminal::new(backend).expect("Failed to create test terminal");
        Self { terminal }
    }

    pub fn area(&self) -> Rect {
        let size = self.terminal.size().expect("Failed to get terminal size");
        Rect::new(0, 0, size.width, size.height)
    }

    pub fn render_widget<W: Widget>(&mut self, widget: W, area: Rect) {
        self.terminal
            .draw(|frame| frame.render_widget(widget, area))
            .expect("Failed to render widget");
    }

    pub fn draw_with<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(f).expect("Failed to draw frame");
    }

    pub fn buffer(&self) -> &Buffer {
        self.terminal.backend().buffer()
    }

    pub fn buffer_contains(&self, text: &str) -> bool {
        buffer_to_string(self.buffer()).contains(text)
    }

    pub fn line_contains(&self, line: u16, text: &str) -> bool {
        get_line_content(self.buffer(), line).contains(text)
    }

    /// Row index of the first line containing `text`
    pub fn find_line(&self, text: &str) -> Option<u16> {
        let buffer = self.buffer();
        (0..buffer.area.height).find(|&y| get_line_content(buffer, y).contains(text))
    }

    pub fn content(&self) -> String {
        buffer_to_string(self.buffer())
    }
}

impl Default for TestTerminal {
    fn default() -> Self {
        Self::new()
    }
}

fn buffer_to_string(buffer: &Buffer) -> String {
    (0..buffer.area.height)
        .map(|y| get_line_content(buffer, y))
        .collect::<Vec<_>>()
        .join("\n")
}

fn get_line_content(buffer: &Buffer, y: u16) -> String {
    if y >= buffer.area.height {
        return String::new();
    }
    (0..buffer.area.width)
        .map(|x| buffer[(x, y)].symbol())
        .collect()
}

// ─────────────────────────────────────────────────────────
// State fixtures
// ─────────────────────────────────────────────────────────

/// Run `msg` and every follow-up message, collecting the actions
pub fn run(state: &mut AppState, msg: Message) -> Vec<UpdateAction> {
    let mut actions = Vec::new();
    let mut next = Some(msg);
    while let Some(msg) = next {
        let result = update(state, msg);
        actions.extend(result.action);
        next = result.message;
    }
    actions
}

/// State whose navigator lists `modules`
pub fn state_with_modules(modules: &[&str]) -> AppState {
    let mut state = AppState::new();
    run(
        &mut state,
        Message::CatalogLoaded {
            modules: modules.iter().map(|m| m.to_string()).collect(),
        },
    );
    state
}

/// Open `module` and answer its listing with methods `Get` and `Put`
pub fn open_listed_tab(state: &mut AppState, module: &str) -> TabId {
    let actions = run(
        state,
        Message::OpenModule {
            module: module.to_string(),
        },
    );
    let Some(UpdateAction::ListMethods { tab_id, request }) = actions.into_iter().next() else {
        panic!("expected ListMethods");
    };
    run(
        state,
        Message::MethodsListed {
            tab_id,
            ticket: request.ticket,
            catalog: test_catalog("UserService", "prod-1", &["Get", "Put"]),
        },
    );
    tab_id
}

/// Open a tab and describe `Get`; its request has one optional Int32 `age`
pub fn open_editing_tab(state: &mut AppState, module: &str) -> TabId {
    let tab_id = open_listed_tab(state, module);
    let actions = run(
        state,
        Message::SelectMethod {
            method: "Get".to_string(),
        },
    );
    let Some(UpdateAction::DescribeMethod { ticket, .. }) = actions.into_iter().next() else {
        panic!("expected DescribeMethod");
    };
    run(
        state,
        Message::MethodDescribed {
            tab_id,
            ticket,
            info: Box::new(test_rpc_info("Get")),
        },
    );
    tab_id
}

/// Invoke the selected tab and answer with `data`
pub fn complete_invoke(state: &mut AppState, data: serde_json::Value, server_ms: u64) {
    let actions = run(state, Message::Invoke);
    let Some(UpdateAction::Invoke { tab_id, ticket, .. }) = actions
        .into_iter()
        .find(|a| matches!(a, UpdateAction::Invoke { .. }))
    else {
        panic!("expected Invoke");
    };
    run(
        state,
        Message::InvokeCompleted {
            tab_id,
            ticket,
            response: InvokeResponse {
                data: Value::from(data),
                server_cost_ms: server_ms,
            },
            client_ms: 12,
        },
    );
}
