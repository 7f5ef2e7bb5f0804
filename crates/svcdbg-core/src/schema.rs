//! Reflected method schemas
//!
//! A [`SchemaRegistry`] is the closed set of message and enum types reachable from one
//! RPC method, as returned by the gateway's describe call. It is immutable once
//! installed and replaced wholesale when the selected method changes.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The reflected type of a field.
///
/// Only `Message` and `Enum` carry a payload: the name of the related schema entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "relate")]
pub enum FieldType {
    String,
    Bytes,
    Bool,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sfixed32,
    Sfixed64,
    Fixed32,
    Fixed64,
    Sint32,
    Sint64,
    Float,
    Double,
    Message(String),
    Enum(String),
    /// Any tag the editor does not support (`Group`, `Invalid`, or something newer).
    #[serde(other)]
    Unknown,
}

impl FieldType {
    /// The tag name as it appears on the wire.
    pub fn tag(&self) -> &'static str {
        match self {
            FieldType::String => "String",
            FieldType::Bytes => "Bytes",
            FieldType::Bool => "Bool",
            FieldType::Int32 => "Int32",
            FieldType::Int64 => "Int64",
            FieldType::Uint32 => "Uint32",
            FieldType::Uint64 => "Uint64",
            FieldType::Sfixed32 => "Sfixed32",
            FieldType::Sfixed64 => "Sfixed64",
            FieldType::Fixed32 => "Fixed32",
            FieldType::Fixed64 => "Fixed64",
            FieldType::Sint32 => "Sint32",
            FieldType::Sint64 => "Sint64",
            FieldType::Float => "Float",
            FieldType::Double => "Double",
            FieldType::Message(_) => "Message",
            FieldType::Enum(_) => "Enum",
            FieldType::Unknown => "Unknown",
        }
    }

    /// The related schema name for `Message` and `Enum` fields.
    pub fn relate(&self) -> Option<&str> {
        match self {
            FieldType::Message(name) | FieldType::Enum(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_message(&self) -> bool {
        matches!(self, FieldType::Message(_))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.relate() {
            Some(relate) => write!(f, "{} {}", self.tag(), relate),
            None => f.write_str(self.tag()),
        }
    }
}

/// Presence label of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FieldLabel {
    Required,
    #[default]
    Optional,
    Repeated,
}

impl FieldLabel {
    pub fn is_repeated(self) -> bool {
        self == FieldLabel::Repeated
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    #[serde(alias = "name")]
    pub json_name: String,
    #[serde(default)]
    pub label: FieldLabel,
    pub ktype: FieldType,
}

impl FieldSchema {
    pub fn new(json_name: impl Into<String>, label: FieldLabel, ktype: FieldType) -> Self {
        Self {
            json_name: json_name.into(),
            label,
            ktype,
        }
    }

    /// Label shown next to the field, e.g. `user (Message .pkg.User)`.
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.json_name, self.ktype)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    pub pos: i32,
}

impl EnumMember {
    pub fn new(name: impl Into<String>, pos: i32) -> Self {
        Self {
            name: name.into(),
            pos,
        }
    }

    /// Choice label, e.g. `ACTIVE (1)`.
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.pos)
    }
}

/// One schema entry: a message (with `fields`) or an enum (with `enums`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSchema {
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enums: Vec<EnumMember>,
}

impl MessageSchema {
    pub fn with_fields(fields: Vec<FieldSchema>) -> Self {
        Self {
            fields,
            enums: Vec::new(),
        }
    }

    pub fn with_enums(enums: Vec<EnumMember>) -> Self {
        Self {
            fields: Vec::new(),
            enums,
        }
    }

    pub fn field(&self, json_name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.json_name == json_name)
    }

    pub fn member(&self, name: &str) -> Option<&EnumMember> {
        self.enums.iter().find(|m| m.name == name)
    }
}

/// Lookup from type name to its schema entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaRegistry {
    types: HashMap<String, MessageSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, schema: MessageSchema) {
        self.types.insert(name.into(), schema);
    }

    pub fn get(&self, name: &str) -> Option<&MessageSchema> {
        self.types.get(name)
    }

    /// Enum members of `name`, empty when the entry is missing.
    pub fn enum_members(&self, name: &str) -> &[EnumMember] {
        self.get(name).map(|s| s.enums.as_slice()).unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl FromIterator<(String, MessageSchema)> for SchemaRegistry {
    fn from_iter<I: IntoIterator<Item = (String, MessageSchema)>>(iter: I) -> Self {
        Self {
            types: iter.into_iter().collect(),
        }
    }
}

/// Result of describing one method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    pub request_typename: String,
    #[serde(default)]
    pub request_stream: bool,
    #[serde(default)]
    pub response_typename: String,
    #[serde(default)]
    pub response_stream: bool,
    pub relate_schema: SchemaRegistry,
}

impl RpcInfo {
    pub fn request_schema(&self) -> Option<&MessageSchema> {
        self.relate_schema.get(&self.request_typename)
    }
}

/// Result of listing the methods of one module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodCatalog {
    #[serde(default)]
    pub rpcs: Vec<String>,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub instances: Vec<String>,
    #[serde(default)]
    pub instance: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_wire_form() {
        let t: FieldType = serde_json::from_str(r#"{"type":"Int32"}"#).unwrap();
        assert_eq!(t, FieldType::Int32);

        let t: FieldType =
            serde_json::from_str(r#"{"type":"Message","relate":".pkg.User"}"#).unwrap();
        assert_eq!(t, FieldType::Message(".pkg.User".to_string()));

        let json = serde_json::to_value(FieldType::Enum(".pkg.Kind".into())).unwrap();
        assert_eq!(json, serde_json::json!({"type": "Enum", "relate": ".pkg.Kind"}));
    }

    #[test]
    fn test_unsupported_type_tag_is_unknown() {
        let t: FieldType = serde_json::from_str(r#"{"type":"Group"}"#).unwrap();
        assert_eq!(t, FieldType::Unknown);
    }

    #[test]
    fn test_display_label() {
        let f = FieldSchema::new(
            "user",
            FieldLabel::Optional,
            FieldType::Message(".pkg.User".into()),
        );
        assert_eq!(f.display_label(), "user (Message .pkg.User)");

        let f = FieldSchema::new("age", FieldLabel::Required, FieldType::Int32);
        assert_eq!(f.display_label(), "age (Int32)");

        assert_eq!(EnumMember::new("ACTIVE", 1).display_label(), "ACTIVE (1)");
    }

    #[test]
    fn test_rpc_info_deserialize() {
        let json = r#"{
            "request_typename": ".pkg.GetUser",
            "relate_schema": {
                ".pkg.GetUser": {
                    "fields": [
                        {"json_name": "id", "label": "Required", "ktype": {"type": "Uint64"}},
                        {"json_name": "kind", "label": "Optional", "ktype": {"type": "Enum", "relate": ".pkg.Kind"}}
                    ]
                },
                ".pkg.Kind": {"enums": [{"name": "A", "pos": 0}, {"name": "B", "pos": 1}]}
            }
        }"#;
        let info: RpcInfo = serde_json::from_str(json).unwrap();
        let request = info.request_schema().unwrap();
        assert_eq!(request.fields.len(), 2);
        assert_eq!(request.field("id").unwrap().label, FieldLabel::Required);
        assert_eq!(info.relate_schema.enum_members(".pkg.Kind").len(), 2);
        assert!(info.relate_schema.enum_members(".pkg.Missing").is_empty());
    }

    #[test]
    fn test_field_name_alias() {
        let f: FieldSchema =
            serde_json::from_str(r#"{"name": "age", "ktype": {"type": "Int32"}}"#).unwrap();
        assert_eq!(f.json_name, "age");
        assert_eq!(f.label, FieldLabel::Optional);
    }
}
