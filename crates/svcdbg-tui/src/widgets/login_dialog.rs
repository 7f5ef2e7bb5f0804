//! Login prompt shown after the gateway answers 401

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use svcdbg_app::state::{LoginField, LoginState};

use crate::theme::styles;

use super::{cursor_spans, modal_overlay};

const DIALOG_WIDTH: u16 = 48;
const DIALOG_HEIGHT: u16 = 9;

pub struct LoginDialog<'a> {
    login: &'a LoginState,
}

impl<'a> LoginDialog<'a> {
    pub fn new(login: &'a LoginState) -> Self {
        Self { login }
    }

    fn field_line(&self, label: &str, field: LoginField, text: String, col: usize) -> Line<'static> {
        let active = self.login.field == field;
        let mut spans = vec![Span::styled(
            format!("{label:<10}"),
            if active {
                styles::accent_bold()
            } else {
                styles::text_secondary()
            },
        )];
        if active {
            spans.extend(cursor_spans(&text, col, styles::input_field()));
        } else {
            spans.push(Span::styled(text, styles::input_field()));
        }
        Line::from(spans)
    }
}

impl Widget for LoginDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let modal = modal_overlay::open_modal(buf, area, DIALOG_WIDTH, DIALOG_HEIGHT);
        let block = styles::modal_block(" Login required ");
        let inner = block.inner(modal);
        block.render(modal, buf);

        let username = self.login.username.text();
        let password_len = self.login.password.text().chars().count();
        let masked = "•".repeat(password_len);

        let status = if self.login.submitting {
            Line::styled("Logging in…", styles::status_yellow())
        } else if let Some(error) = &self.login.error {
            Line::styled(format!("✗ {error}"), styles::status_red())
        } else {
            Line::default()
        };

        let lines = vec![
            Line::styled("The gateway asked for credentials.", styles::text_muted()),
            Line::default(),
            self.field_line(
                "Username",
                LoginField::Username,
                username,
                self.login.username.cursor().1,
            ),
            self.field_line(
                "Password",
                LoginField::Password,
                masked,
                self.login.password.cursor().1,
            ),
            Line::default(),
            status,
            Line::from(vec![
                Span::styled("Enter", styles::keybinding()),
                Span::styled(" submit  ", styles::text_muted()),
                Span::styled("Tab", styles::keybinding()),
                Span::styled(" switch  ", styles::text_muted()),
                Span::styled("Esc", styles::keybinding()),
                Span::styled(" cancel", styles::text_muted()),
            ]),
        ];
        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use svcdbg_app::text_buffer::TextEdit;

    fn typed(login: &mut LoginState, text: &str) {
        for c in text.chars() {
            login.active_buffer().apply(TextEdit::Insert(c));
        }
    }

    #[test]
    fn test_password_is_masked() {
        let mut login = LoginState::default();
        typed(&mut login, "ada");
        login.switch_field();
        typed(&mut login, "secret");

        let mut term = TestTerminal::new();
        let area = term.area();
        term.render_widget(LoginDialog::new(&login), area);

        assert!(term.buffer_contains("Login required"));
        assert!(term.buffer_contains("ada"));
        assert!(term.buffer_contains("••••••"));
        assert!(!term.buffer_contains("secret"));
    }

    #[test]
    fn test_error_line() {
        let login = LoginState {
            error: Some("401 Unauthorized".to_string()),
            ..Default::default()
        };
        let mut term = TestTerminal::new();
        let area = term.area();
        term.render_widget(LoginDialog::new(&login), area);
        assert!(term.buffer_contains("✗ 401 Unauthorized"));
    }

    #[test]
    fn test_submitting_line() {
        let login = LoginState {
            submitting: true,
            ..Default::default()
        };
        let mut term = TestTerminal::compact();
        let area = term.area();
        term.render_widget(LoginDialog::new(&login), area);
        assert!(term.buffer_contains("Logging in…"));
    }
}
