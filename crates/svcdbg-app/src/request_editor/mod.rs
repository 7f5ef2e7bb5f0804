//! Schema-driven request editor
//!
//! Walks the request schema and the value tree in lock-step. Every accepted edit
//! produces a new root through [`Value::with_set`]; the previous root is kept on
//! the undo stack untouched.
//!
//! Per-field dispatch, keyed by label and type:
//! - required/optional scalar: presence toggle plus the scalar widget
//! - required/optional message: presence toggle, nested fields when present
//! - required/optional enum: presence toggle plus a closed choice by name
//! - repeated: header with append, then one addressable row per element
//!
//! Required-ness is not enforced: a required field can be toggled off like any
//! optional one.

mod rows;


use std::collections::BTreeMap;
use std::sync::Arc;

use svcdbg_core::codec::{self, scalar_kind, FieldParseError, ScalarKind};
use svcdbg_core::prelude::*;
use svcdbg_core::{
    FieldSchema, PathSegment, SchemaRegistry, SyncParseError, Value, ValuePath,
};

use crate::dual_view::DualView;
use crate::text_buffer::TextEdit;

pub use rows::{EditorRow, RowWidget};

/// Snapshots kept for undo
pub const UNDO_LIMIT: usize = 100;

/// Rejected field text, shown in place of the committed value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDraft {
    pub text: String,
    pub error: FieldParseError,
}

/// Field schema at a path, and whether the path names one element of it
struct FieldSlot<'a> {
    field: &'a FieldSchema,
    element: bool,
}

#[derive(Debug, Clone)]
pub struct RequestEditor {
    registry: Arc<SchemaRegistry>,
    root_type: String,
    value: Value,
    undo: Vec<Value>,
    drafts: BTreeMap<ValuePath, FieldDraft>,
    cursor: usize,
    dual: DualView,
}

impl RequestEditor {
    /// Editor for `root_type` starting from `{}`.
    pub fn new(registry: Arc<SchemaRegistry>, root_type: impl Into<String>) -> Self {
        Self {
            registry,
            root_type: root_type.into(),
            value: Value::empty_map(),
            undo: Vec::new(),
            drafts: BTreeMap::new(),
            cursor: 0,
            dual: DualView::default(),
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn root_type(&self) -> &str {
        &self.root_type
    }

    pub fn dual(&self) -> &DualView {
        &self.dual
    }

    pub fn draft(&self, path: &ValuePath) -> Option<&FieldDraft> {
        self.drafts.get(path)
    }

    pub fn has_drafts(&self) -> bool {
        !self.drafts.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    // ─────────────────────────────────────────────────────────
    // Rows and cursor
    // ─────────────────────────────────────────────────────────

    pub fn rows(&self) -> Vec<EditorRow> {
        let Some(schema) = self.registry.get(&self.root_type) else {
            return Vec::new();
        };
        let mut builder = rows::RowBuilder {
            registry: &self.registry,
            drafts: &self.drafts,
            rows: Vec::new(),
        };
        builder.message(schema, Some(&self.value), &ValuePath::root(), 0);
        builder.rows
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected_row(&self) -> Option<EditorRow> {
        self.rows().into_iter().nth(self.cursor)
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.rows().len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let next = self.cursor as isize + delta;
        self.cursor = next.clamp(0, len as isize - 1) as usize;
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        let len = self.rows().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    // ─────────────────────────────────────────────────────────
    // Edits
    // ─────────────────────────────────────────────────────────

    fn slot(&self, path: &ValuePath) -> Option<FieldSlot<'_>> {
        let mut schema = self.registry.get(&self.root_type)?;
        let mut segments = path.segments().iter().peekable();
        loop {
            let PathSegment::Field(name) = segments.next()? else {
                return None;
            };
            let field = schema.field(name)?;
            let element = matches!(segments.peek(), Some(PathSegment::Index(_)));
            if element {
                if !field.label.is_repeated() {
                    return None;
                }
                segments.next();
            }
            if segments.peek().is_none() {
                return Some(FieldSlot { field, element });
            }
            schema = self.registry.get(field.ktype.relate()?)?;
        }
    }

    /// Install a new root for `path`. Returns false when the path does not fit.
    fn apply(&mut self, path: &ValuePath, new: Option<Value>) -> bool {
        if self.slot(path).is_none() {
            debug!("Ignoring edit at unknown path {}", path);
            return false;
        }
        let next = self.value.with_set(path, new);
        self.push_root(next);
        true
    }

    fn push_root(&mut self, next: Value) {
        let previous = std::mem::replace(&mut self.value, next);
        self.undo.push(previous);
        if self.undo.len() > UNDO_LIMIT {
            self.undo.remove(0);
        }
        self.dual.invalidate(&self.value);
        self.clamp_cursor();
    }

    fn drop_drafts_under(&mut self, path: &ValuePath) {
        self.drafts.retain(|p, _| !p.starts_with(path));
    }

    /// Present fields become absent; absent ones become `null`.
    pub fn toggle_presence(&mut self, path: &ValuePath) -> bool {
        match self.slot(path) {
            Some(FieldSlot { element: false, .. }) => {}
            _ => return false,
        }
        if self.value.get(path).is_some() {
            self.drop_drafts_under(path);
            self.apply(path, None)
        } else {
            self.apply(path, Some(Value::Null))
        }
    }

    /// Commit typed text into a scalar or enum field.
    ///
    /// A parse failure keeps the text as a draft next to its error and leaves the
    /// tree unchanged. A path with no field in the schema is refused without a draft.
    pub fn set_text(&mut self, path: &ValuePath, text: &str) -> std::result::Result<(), FieldParseError> {
        let Some(slot) = self.slot(path) else {
            return Err(FieldParseError::NoSuchField {
                path: path.to_string(),
            });
        };
        let parsed = match scalar_kind(&slot.field.ktype) {
            ScalarKind::Enum if !text.is_empty() => {
                let relate = slot.field.ktype.relate().unwrap_or_default();
                codec::resolve_enum(self.registry.enum_members(relate), text)
            }
            _ => codec::parse(&slot.field.ktype, text),
        };
        match parsed {
            Ok(value) => {
                self.drafts.remove(path);
                self.apply(path, Some(value));
                Ok(())
            }
            Err(error) => {
                debug!("Rejected text for {}: {}", path, error);
                self.drafts.insert(
                    path.clone(),
                    FieldDraft {
                        text: text.to_string(),
                        error: error.clone(),
                    },
                );
                Err(error)
            }
        }
    }

    /// Text to start inline editing with: the draft if there is one.
    pub fn edit_text(&self, path: &ValuePath) -> String {
        if let Some(draft) = self.drafts.get(path) {
            return draft.text.clone();
        }
        match (self.slot(path), self.value.get(path)) {
            (Some(slot), Some(value)) => codec::format(&slot.field.ktype, value),
            _ => String::new(),
        }
    }

    pub fn toggle_bool(&mut self, path: &ValuePath) -> bool {
        match self.slot(path) {
            Some(slot) if scalar_kind(&slot.field.ktype) == ScalarKind::Bool => {}
            _ => return false,
        }
        let next = !self.value.get(path).and_then(Value::as_bool).unwrap_or(false);
        self.apply(path, Some(Value::Bool(next)))
    }

    /// Move an enum field `delta` members along, wrapping. A `null` field starts
    /// from the first member (or the last when going backwards).
    pub fn cycle_enum(&mut self, path: &ValuePath, delta: isize) -> bool {
        let members = match self.slot(path) {
            Some(slot) if scalar_kind(&slot.field.ktype) == ScalarKind::Enum => slot
                .field
                .ktype
                .relate()
                .map(|relate| self.registry.enum_members(relate).to_vec())
                .unwrap_or_default(),
            _ => return false,
        };
        if members.is_empty() {
            return false;
        }
        let len = members.len() as isize;
        let current = self
            .value
            .get(path)
            .and_then(Value::as_str)
            .and_then(|name| members.iter().position(|m| m.name == name));
        let next = match current {
            Some(i) => (i as isize + delta).rem_euclid(len),
            None if delta < 0 => len - 1,
            None => 0,
        };
        self.apply(path, Some(Value::String(members[next as usize].name.clone())))
    }

    /// Append `null` to a repeated field, creating the list if needed.
    pub fn append(&mut self, path: &ValuePath) -> bool {
        match self.slot(path) {
            Some(FieldSlot { field, element: false }) if field.label.is_repeated() => {}
            _ => return false,
        }
        let len = self
            .value
            .get(path)
            .and_then(Value::as_list)
            .map_or(0, <[Value]>::len);
        self.apply(&path.index(len), Some(Value::Null))
    }

    /// Splice one element out of a repeated field.
    pub fn remove(&mut self, element: &ValuePath) -> bool {
        let (Some(list), Some(PathSegment::Index(index))) = (element.parent(), element.last())
        else {
            return false;
        };
        let index = *index;
        if self.value.get(element).is_none() {
            return false;
        }
        self.drafts = std::mem::take(&mut self.drafts)
            .into_iter()
            .filter_map(|(p, d)| p.after_removal(&list, index).map(|p| (p, d)))
            .collect();
        self.apply(element, None)
    }

    /// Replace whatever is at `path`, `None` meaning absent.
    pub fn replace(&mut self, path: &ValuePath, value: Option<Value>) -> bool {
        self.drop_drafts_under(path);
        self.apply(path, value)
    }

    /// Install a whole new tree, e.g. a committed text view or a saved query.
    pub fn set_value(&mut self, value: Value) {
        self.drafts.clear();
        self.push_root(value);
    }

    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo.pop() else {
            return false;
        };
        self.value = previous;
        self.drafts.clear();
        self.dual.invalidate(&self.value);
        self.clamp_cursor();
        true
    }

    // ─────────────────────────────────────────────────────────
    // Text view
    // ─────────────────────────────────────────────────────────

    pub fn toggle_view(&mut self) {
        self.dual.toggle(&self.value);
    }

    pub fn show_structured(&mut self) {
        self.dual.show_structured();
    }

    pub fn edit_text_view(&mut self, edit: TextEdit) {
        self.dual.edit(edit);
    }

    /// Commit the text view. The tree is replaced only on success.
    pub fn commit_text(&mut self) -> std::result::Result<(), SyncParseError> {
        let value = self.dual.commit(&self.registry, &self.root_type)?;
        let previous = std::mem::replace(&mut self.value, value);
        self.undo.push(previous);
        if self.undo.len() > UNDO_LIMIT {
            self.undo.remove(0);
        }
        self.drafts.clear();
        self.clamp_cursor();
        Ok(())
    }
}
