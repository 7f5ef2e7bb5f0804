//! Main render/view function (View in TEA pattern)

#[cfg(test)]
mod tests;

use ratatui::Frame;

use svcdbg_app::state::{Pane, UiMode};
use svcdbg_app::AppState;

use crate::layout;
use crate::widgets::{
    LoginDialog, MainHeader, MethodsPane, Navigator, NotificationList, RequestPane, ResponsePane,
    StatusBar,
};

/// Render the complete UI (View function in TEA)
///
/// Pure: reads state, draws one frame.
pub fn view(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    let has_tabs = !state.tabs.is_empty();
    let areas = layout::create(area, has_tabs);

    let mut header = MainHeader::new(&state.settings.gateway.base_url, &state.catalog);
    if has_tabs {
        header = header.with_tabs(&state.tabs);
    }
    frame.render_widget(header, areas.header);

    // Panes lose their focus border while a modal list or dialog owns the keys
    let pane_focus = match state.ui_mode {
        UiMode::Login | UiMode::Notifications => None,
        _ => Some(state.focus),
    };
    let focused = |pane: Pane| pane_focus == Some(pane);

    let session = state.tabs.selected();

    frame.render_widget(
        Navigator::new(state, focused(Pane::Navigator)),
        areas.navigator,
    );
    frame.render_widget(
        MethodsPane::new(session, focused(Pane::Methods)),
        areas.methods,
    );
    frame.render_widget(
        RequestPane::new(session.and_then(|s| s.editor()), focused(Pane::Request))
            .with_field_input(state.field_input.as_ref())
            .text_editing(state.ui_mode == UiMode::TextEditor),
        areas.request,
    );
    frame.render_widget(
        ResponsePane::new(session, focused(Pane::Response)),
        areas.response,
    );
    frame.render_widget(StatusBar::new(state), areas.status);

    if !state.notifications.is_empty() {
        let list = NotificationList::new(&state.notifications, state.notification_focus);
        let body = areas.navigator.union(areas.response);
        let list_area = layout::notifications_area(body, list.lines().len());
        frame.render_widget(list, list_area);
    }

    if state.ui_mode == UiMode::Login {
        frame.render_widget(LoginDialog::new(&state.login), area);
    }
}
