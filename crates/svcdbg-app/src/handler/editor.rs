//! Request editor handlers for the selected tab

use svcdbg_core::prelude::*;
use svcdbg_core::FieldParseError;

use crate::history::QueryRecord;
use crate::notifications::NotificationPayload;
use crate::request_editor::{EditorRow, RequestEditor, RowWidget};
use crate::state::{AppState, FieldInput, UiMode};
use crate::text_buffer::{TextBuffer, TextEdit};

use super::{notifications, UpdateResult};

fn editor_mut(state: &mut AppState) -> Option<&mut RequestEditor> {
    state.tabs.selected_mut().and_then(|s| s.editor_mut())
}

fn selected_row(state: &mut AppState) -> Option<EditorRow> {
    editor_mut(state).and_then(|e| e.selected_row())
}

/// Run `f` on the editor and the row under its cursor
fn with_row(state: &mut AppState, f: impl FnOnce(&mut RequestEditor, &EditorRow)) -> UpdateResult {
    if let Some(editor) = editor_mut(state) {
        if let Some(row) = editor.selected_row() {
            f(editor, &row);
        }
    }
    UpdateResult::none()
}

pub fn handle_move_cursor(state: &mut AppState, delta: isize) -> UpdateResult {
    if let Some(editor) = editor_mut(state) {
        editor.move_cursor(delta);
    }
    UpdateResult::none()
}

pub fn handle_toggle_presence(state: &mut AppState) -> UpdateResult {
    with_row(state, |editor, row| {
        editor.toggle_presence(&row.path);
    })
}

pub fn handle_activate_field(state: &mut AppState) -> UpdateResult {
    let Some(row) = selected_row(state) else {
        return UpdateResult::none();
    };
    match row.widget {
        RowWidget::Absent => handle_toggle_presence(state),
        RowWidget::Text { .. } => {
            let text = editor_mut(state)
                .map(|e| e.edit_text(&row.path))
                .unwrap_or_default();
            state.field_input = Some(FieldInput {
                path: row.path,
                buffer: TextBuffer::single_line(&text),
            });
            state.ui_mode = UiMode::FieldInput;
            UpdateResult::none()
        }
        RowWidget::Toggle(_) => with_row(state, |editor, row| {
            editor.toggle_bool(&row.path);
        }),
        RowWidget::Choice { .. } => handle_cycle_enum(state, 1),
        RowWidget::Repeated { .. } => handle_append(state),
        RowWidget::Message { .. } | RowWidget::Unknown => UpdateResult::none(),
    }
}

pub fn handle_cycle_enum(state: &mut AppState, delta: isize) -> UpdateResult {
    with_row(state, |editor, row| {
        editor.cycle_enum(&row.path, delta);
    })
}

/// On an element row, appends to the enclosing repeated field
pub fn handle_append(state: &mut AppState) -> UpdateResult {
    with_row(state, |editor, row| {
        let target = if row.is_element() {
            row.path.parent()
        } else {
            Some(row.path.clone())
        };
        if let Some(path) = target {
            editor.append(&path);
        }
    })
}

pub fn handle_remove(state: &mut AppState) -> UpdateResult {
    with_row(state, |editor, row| {
        if row.is_element() {
            editor.remove(&row.path);
        }
    })
}

pub fn handle_undo(state: &mut AppState) -> UpdateResult {
    if let Some(editor) = editor_mut(state) {
        if !editor.undo() {
            debug!("Nothing to undo");
        }
    }
    UpdateResult::none()
}

// ─────────────────────────────────────────────────────────
// Field input
// ─────────────────────────────────────────────────────────

pub fn handle_field_input_edit(state: &mut AppState, edit: TextEdit) -> UpdateResult {
    if let Some(input) = state.field_input.as_mut() {
        input.buffer.apply(edit);
    }
    UpdateResult::none()
}

/// Rejected text stays behind as a draft next to its error.
pub fn handle_commit_field_input(state: &mut AppState) -> UpdateResult {
    state.ui_mode = UiMode::Normal;
    let Some(input) = state.field_input.take() else {
        return UpdateResult::none();
    };
    if let Some(editor) = editor_mut(state) {
        match editor.set_text(&input.path, &input.buffer.text()) {
            Ok(()) => {}
            Err(e @ FieldParseError::NoSuchField { .. }) => {
                warn!("Dropped field input: {}", e);
            }
            Err(e) => debug!("Field {} kept as draft: {}", input.path, e),
        }
    }
    UpdateResult::none()
}

pub fn handle_cancel_field_input(state: &mut AppState) -> UpdateResult {
    state.ui_mode = UiMode::Normal;
    state.field_input = None;
    UpdateResult::none()
}

// ─────────────────────────────────────────────────────────
// Text view
// ─────────────────────────────────────────────────────────

pub fn handle_toggle_view(state: &mut AppState) -> UpdateResult {
    if let Some(editor) = editor_mut(state) {
        editor.toggle_view();
    }
    UpdateResult::none()
}

pub fn handle_start_text_edit(state: &mut AppState) -> UpdateResult {
    let Some(editor) = editor_mut(state) else {
        return UpdateResult::none();
    };
    if !editor.dual().is_text() {
        editor.toggle_view();
    }
    state.ui_mode = UiMode::TextEditor;
    UpdateResult::none()
}

pub fn handle_text_view_edit(state: &mut AppState, edit: TextEdit) -> UpdateResult {
    if let Some(editor) = editor_mut(state) {
        editor.edit_text_view(edit);
    }
    UpdateResult::none()
}

/// A parse error keeps the editor open with the error shown.
pub fn handle_commit_text_view(state: &mut AppState) -> UpdateResult {
    let Some(editor) = editor_mut(state) else {
        state.ui_mode = UiMode::Normal;
        return UpdateResult::none();
    };
    match editor.commit_text() {
        Ok(()) => state.ui_mode = UiMode::Normal,
        Err(e) => debug!("Text view rejected: {}", e),
    }
    UpdateResult::none()
}

pub fn handle_cancel_text_edit(state: &mut AppState) -> UpdateResult {
    if let Some(editor) = editor_mut(state) {
        editor.show_structured();
    }
    state.ui_mode = UiMode::Normal;
    UpdateResult::none()
}

// ─────────────────────────────────────────────────────────
// Saved queries
// ─────────────────────────────────────────────────────────

pub fn handle_save_query(state: &mut AppState) -> UpdateResult {
    let Some(session) = state.tabs.selected() else {
        return UpdateResult::none();
    };
    let (Some(target), Some(editor)) = (session.call_target(), session.editor()) else {
        return UpdateResult::none();
    };
    let record = QueryRecord::new(&target, editor.value().clone());
    let label = record.label();

    let payload = match state.saved.add(record) {
        Ok(()) => {
            info!("Saved query {}", label);
            NotificationPayload::Info(format!("Saved {label}"))
        }
        Err(e) => {
            warn!("Failed to save query {}: {}", label, e);
            NotificationPayload::Info(format!("Could not save {label}: {e}"))
        }
    };
    notifications::push(state, payload)
}
