//! Flattening of a schema/value pair into editor rows
//!
//! The walk follows the value: a field only recurses when it is present, so
//! self-referencing message types stay finite.

use std::collections::BTreeMap;

use svcdbg_core::codec::{self, scalar_kind, ScalarKind};
use svcdbg_core::{FieldLabel, FieldSchema, FieldType, MessageSchema, SchemaRegistry, Value, ValuePath};

use super::FieldDraft;

/// What the row edits
#[derive(Debug, Clone, PartialEq)]
pub enum RowWidget {
    /// Field not present; only the presence toggle applies
    Absent,
    /// Numeric, string or bytes text
    Text {
        text: String,
        error: Option<String>,
    },
    /// `None` while the value is `null`
    Toggle(Option<bool>),
    Choice {
        selected: Option<String>,
        /// `name (pos)` labels in declaration order
        options: Vec<String>,
    },
    /// Nested message header; its fields follow at `depth + 1`
    Message { null: bool },
    /// Repeated field header; its elements follow at `depth + 1`
    Repeated { len: usize },
    /// Type tag the editor cannot edit
    Unknown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditorRow {
    pub path: ValuePath,
    pub depth: usize,
    /// `json_name (Type relate)` for fields, `[i]` for elements
    pub label: String,
    /// `None` for repeated elements
    pub field_label: Option<FieldLabel>,
    pub widget: RowWidget,
}

impl EditorRow {
    pub fn is_element(&self) -> bool {
        self.field_label.is_none()
    }

    pub fn is_present(&self) -> bool {
        !matches!(self.widget, RowWidget::Absent)
    }
}

pub(super) struct RowBuilder<'a> {
    pub registry: &'a SchemaRegistry,
    pub drafts: &'a BTreeMap<ValuePath, FieldDraft>,
    pub rows: Vec<EditorRow>,
}

impl RowBuilder<'_> {
    pub fn message(
        &mut self,
        schema: &MessageSchema,
        value: Option<&Value>,
        path: &ValuePath,
        depth: usize,
    ) {
        let map = value.and_then(Value::as_map);
        for field in &schema.fields {
            let field_path = path.field(&field.json_name);
            match map.and_then(|m| m.get(&field.json_name)) {
                None => self.rows.push(EditorRow {
                    path: field_path,
                    depth,
                    label: field.display_label(),
                    field_label: Some(field.label),
                    widget: RowWidget::Absent,
                }),
                Some(child) if field.label.is_repeated() => {
                    self.repeated(field, child, &field_path, depth)
                }
                Some(child) => self.value(
                    &field.ktype,
                    child,
                    field_path,
                    depth,
                    field.display_label(),
                    Some(field.label),
                ),
            }
        }
    }

    fn repeated(&mut self, field: &FieldSchema, value: &Value, path: &ValuePath, depth: usize) {
        let items = value.as_list().unwrap_or(&[]);
        self.rows.push(EditorRow {
            path: path.clone(),
            depth,
            label: field.display_label(),
            field_label: Some(FieldLabel::Repeated),
            widget: RowWidget::Repeated { len: items.len() },
        });
        for (i, item) in items.iter().enumerate() {
            self.value(
                &field.ktype,
                item,
                path.index(i),
                depth + 1,
                format!("[{i}]"),
                None,
            );
        }
    }

    fn value(
        &mut self,
        ktype: &FieldType,
        value: &Value,
        path: ValuePath,
        depth: usize,
        label: String,
        field_label: Option<FieldLabel>,
    ) {
        let widget = match scalar_kind(ktype) {
            ScalarKind::Numeric(_) | ScalarKind::Text | ScalarKind::Bytes => {
                match self.drafts.get(&path) {
                    Some(draft) => RowWidget::Text {
                        text: draft.text.clone(),
                        error: Some(draft.error.to_string()),
                    },
                    None => RowWidget::Text {
                        text: codec::format(ktype, value),
                        error: None,
                    },
                }
            }
            ScalarKind::Bool => RowWidget::Toggle(value.as_bool()),
            ScalarKind::Enum => {
                let members = ktype
                    .relate()
                    .map(|relate| self.registry.enum_members(relate))
                    .unwrap_or(&[]);
                RowWidget::Choice {
                    selected: value.as_str().map(str::to_string),
                    options: members.iter().map(|m| m.display_label()).collect(),
                }
            }
            ScalarKind::Message => {
                let schema = ktype.relate().and_then(|relate| self.registry.get(relate));
                match schema {
                    Some(schema) => {
                        self.rows.push(EditorRow {
                            path: path.clone(),
                            depth,
                            label,
                            field_label,
                            widget: RowWidget::Message {
                                null: value.is_null(),
                            },
                        });
                        self.message(schema, Some(value), &path, depth + 1);
                        return;
                    }
                    None => RowWidget::Unknown,
                }
            }
            ScalarKind::Unknown => RowWidget::Unknown,
        };
        self.rows.push(EditorRow {
            path,
            depth,
            label,
            field_label,
            widget,
        });
    }
}
