//! Main update function - handles state transitions (TEA pattern)
//!
//! Handler implementations live in the sibling modules; this file only dispatches.

use crate::message::Message;
use crate::state::{AppPhase, AppState};

use super::{editor, keys::handle_key, navigator, notifications, session, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Quit => {
            state.phase = AppPhase::Quitting;
            UpdateResult::none()
        }

        Message::Key(key) => match handle_key(state, key) {
            Some(msg) => UpdateResult::message(msg),
            None => UpdateResult::none(),
        },

        // Rendering picks up spinner frames on its own
        Message::Tick => UpdateResult::none(),

        Message::FocusPane(pane) => {
            state.focus = pane;
            UpdateResult::none()
        }

        Message::FocusNextPane => {
            state.focus = state.focus.next();
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Catalog Navigator
        // ─────────────────────────────────────────────────────────
        Message::RefreshCatalog => navigator::handle_refresh(state),
        Message::CatalogLoaded { modules } => navigator::handle_loaded(state, modules),
        Message::CatalogFailed { failure } => navigator::handle_failed(state, failure),
        Message::ShowNavSection(section) => navigator::handle_show_section(state, section),
        Message::NavigatorUp => navigator::handle_move(state, -1),
        Message::NavigatorDown => navigator::handle_move(state, 1),
        Message::OpenNavigatorEntry => navigator::handle_open_entry(state),
        Message::StartSearch => navigator::handle_start_search(state),
        Message::SearchEdit(edit) => navigator::handle_search_edit(state, edit),
        Message::EndSearch => navigator::handle_end_search(state, false),
        Message::ClearSearch => navigator::handle_end_search(state, true),
        Message::ClearHistory => navigator::handle_clear_history(state),

        // ─────────────────────────────────────────────────────────
        // Tabs
        // ─────────────────────────────────────────────────────────
        Message::OpenModule { module } => session::handle_open_module(state, module, None),
        Message::OpenQuery { record } => session::handle_open_module(
            state,
            record.module.clone(),
            Some(record.to_initial_request()),
        ),
        Message::NextTab => {
            state.tabs.select_next();
            UpdateResult::none()
        }
        Message::PreviousTab => {
            state.tabs.select_previous();
            UpdateResult::none()
        }
        Message::SelectTab(index) => {
            state.tabs.select_by_index(index);
            UpdateResult::none()
        }
        Message::CloseTab => session::handle_close_tab(state),
        Message::CloseAllTabs => session::handle_close_all(state),
        Message::CloseOtherTabs => session::handle_close_others(state),

        // ─────────────────────────────────────────────────────────
        // Invocation Session
        // ─────────────────────────────────────────────────────────
        Message::MethodCursorUp => session::handle_method_cursor(state, -1),
        Message::MethodCursorDown => session::handle_method_cursor(state, 1),
        Message::ActivateMethodRow => session::handle_activate_method_row(state),
        Message::CycleService(delta) => session::handle_cycle_service(state, delta),
        Message::CycleInstance(delta) => session::handle_cycle_instance(state, delta),
        Message::SelectService { service } => session::handle_select_service(state, service),
        Message::SelectInstance { instance } => session::handle_select_instance(state, instance),
        Message::SelectMethod { method } => session::handle_select_method(state, method),
        Message::ReloadTab => session::handle_reload_tab(state),
        Message::Invoke => session::handle_invoke(state),
        Message::ScrollResultUp => session::handle_scroll_result(state, -1),
        Message::ScrollResultDown => session::handle_scroll_result(state, 1),
        Message::PageResultUp => session::handle_scroll_result(state, -session::RESULT_PAGE),
        Message::PageResultDown => session::handle_scroll_result(state, session::RESULT_PAGE),

        Message::MethodsListed {
            tab_id,
            ticket,
            catalog,
        } => session::handle_methods_listed(state, tab_id, ticket, catalog),
        Message::MethodDescribed {
            tab_id,
            ticket,
            info,
        } => session::handle_method_described(state, tab_id, ticket, *info),
        Message::InvokeCompleted {
            tab_id,
            ticket,
            response,
            client_ms,
        } => session::handle_invoke_completed(state, tab_id, ticket, response, client_ms),
        Message::RequestFailed {
            tab_id,
            step,
            ticket,
            failure,
        } => session::handle_request_failed(state, tab_id, step, ticket, failure),

        // ─────────────────────────────────────────────────────────
        // Request Editor
        // ─────────────────────────────────────────────────────────
        Message::EditorUp => editor::handle_move_cursor(state, -1),
        Message::EditorDown => editor::handle_move_cursor(state, 1),
        Message::TogglePresence => editor::handle_toggle_presence(state),
        Message::ActivateField => editor::handle_activate_field(state),
        Message::CycleEnum(delta) => editor::handle_cycle_enum(state, delta),
        Message::AppendElement => editor::handle_append(state),
        Message::RemoveElement => editor::handle_remove(state),
        Message::FieldInputEdit(edit) => editor::handle_field_input_edit(state, edit),
        Message::CommitFieldInput => editor::handle_commit_field_input(state),
        Message::CancelFieldInput => editor::handle_cancel_field_input(state),
        Message::Undo => editor::handle_undo(state),
        Message::ToggleRequestView => editor::handle_toggle_view(state),
        Message::StartTextEdit => editor::handle_start_text_edit(state),
        Message::TextViewEdit(edit) => editor::handle_text_view_edit(state, edit),
        Message::CommitTextView => editor::handle_commit_text_view(state),
        Message::CancelTextEdit => editor::handle_cancel_text_edit(state),
        Message::SaveQuery => editor::handle_save_query(state),

        // ─────────────────────────────────────────────────────────
        // Notifications
        // ─────────────────────────────────────────────────────────
        Message::PushNotification { payload } => notifications::push(state, payload),
        Message::NotificationTimerFired { id, token } => {
            notifications::handle_timer_fired(state, id, token)
        }
        Message::FocusNotifications => notifications::handle_focus(state),
        Message::NotificationFocusNext => notifications::handle_move_focus(state, 1),
        Message::NotificationFocusPrevious => notifications::handle_move_focus(state, -1),
        Message::LeaveNotifications => notifications::handle_leave(state),
        Message::DismissNotification => notifications::handle_dismiss(state),

        // ─────────────────────────────────────────────────────────
        // Login Prompt
        // ─────────────────────────────────────────────────────────
        Message::LoginRequired => notifications::handle_login_required(state),
        Message::LoginEdit(edit) => {
            state.login.active_buffer().apply(edit);
            UpdateResult::none()
        }
        Message::LoginSwitchField => {
            state.login.switch_field();
            UpdateResult::none()
        }
        Message::LoginSubmit => notifications::handle_login_submit(state),
        Message::LoginSucceeded => notifications::handle_login_succeeded(state),
        Message::LoginFailed { message } => notifications::handle_login_failed(state, message),
        Message::LoginCancel => notifications::handle_login_cancel(state),
    }
}
