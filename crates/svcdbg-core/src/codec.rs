//! Scalar codec: text ⇄ value conversion for leaf fields
//!
//! Numeric text is validated against a strict whole-value pattern for its family
//! before conversion. Empty text parses to `null`, which is distinct from the field
//! being absent.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::schema::{EnumMember, FieldType};
use crate::value::Value;

// `\d` would also admit non-ASCII digits, which the std parsers reject.

/// Optional sign, ASCII digits only
static SIGNED_INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?[0-9]+$").expect("Invalid signed integer regex"));

/// Optional plus, ASCII digits only
static UNSIGNED_INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]+$").expect("Invalid unsigned integer regex"));

/// Optional sign, digits, optional single dot, optional trailing digits
static FLOAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?[0-9]*\.?[0-9]*$").expect("Invalid float regex"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldParseError {
    #[error("not a number")]
    NotANumber { text: String },

    #[error("out of range for {family}")]
    OutOfRange { text: String, family: NumericFamily },

    #[error("expected true or false")]
    NotABool { text: String },

    #[error("unknown enum member: {name}")]
    UnknownEnumMember { name: String },

    #[error("{type_tag} fields have no text form")]
    NotAScalar { type_tag: String },

    #[error("no field at {path}")]
    NoSuchField { path: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericFamily {
    I32,
    I64,
    U32,
    U64,
    F32,
    F64,
}

impl std::fmt::Display for NumericFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NumericFamily::I32 => "i32",
            NumericFamily::I64 => "i64",
            NumericFamily::U32 => "u32",
            NumericFamily::U64 => "u64",
            NumericFamily::F32 => "f32",
            NumericFamily::F64 => "f64",
        };
        f.write_str(name)
    }
}

impl NumericFamily {
    fn pattern(self) -> &'static Regex {
        match self {
            NumericFamily::I32 | NumericFamily::I64 => &SIGNED_INT,
            NumericFamily::U32 | NumericFamily::U64 => &UNSIGNED_INT,
            NumericFamily::F32 | NumericFamily::F64 => &FLOAT,
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, NumericFamily::F32 | NumericFamily::F64)
    }

    pub fn is_unsigned(self) -> bool {
        matches!(self, NumericFamily::U32 | NumericFamily::U64)
    }
}

/// How a field's value is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Numeric(NumericFamily),
    Text,
    /// Opaque encoded string, not validated here.
    Bytes,
    Bool,
    Enum,
    Message,
    Unknown,
}

pub fn scalar_kind(ktype: &FieldType) -> ScalarKind {
    match ktype {
        FieldType::Int32 | FieldType::Sfixed32 | FieldType::Sint32 => {
            ScalarKind::Numeric(NumericFamily::I32)
        }
        FieldType::Int64 | FieldType::Sfixed64 | FieldType::Sint64 => {
            ScalarKind::Numeric(NumericFamily::I64)
        }
        FieldType::Uint32 | FieldType::Fixed32 => ScalarKind::Numeric(NumericFamily::U32),
        FieldType::Uint64 | FieldType::Fixed64 => ScalarKind::Numeric(NumericFamily::U64),
        FieldType::Float => ScalarKind::Numeric(NumericFamily::F32),
        FieldType::Double => ScalarKind::Numeric(NumericFamily::F64),
        FieldType::String => ScalarKind::Text,
        FieldType::Bytes => ScalarKind::Bytes,
        FieldType::Bool => ScalarKind::Bool,
        FieldType::Enum(_) => ScalarKind::Enum,
        FieldType::Message(_) => ScalarKind::Message,
        FieldType::Unknown => ScalarKind::Unknown,
    }
}

/// Parse user text for a field of type `ktype`.
///
/// Enum text is taken as a member name without checking membership; use
/// [`resolve_enum`] when the members are known.
pub fn parse(ktype: &FieldType, text: &str) -> Result<Value, FieldParseError> {
    match scalar_kind(ktype) {
        ScalarKind::Numeric(family) => parse_numeric(family, text),
        ScalarKind::Text | ScalarKind::Bytes => Ok(Value::String(text.to_string())),
        ScalarKind::Bool => match text.trim() {
            "" => Ok(Value::Null),
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(FieldParseError::NotABool {
                text: text.to_string(),
            }),
        },
        ScalarKind::Enum if text.is_empty() => Ok(Value::Null),
        ScalarKind::Enum => Ok(Value::String(text.to_string())),
        ScalarKind::Message | ScalarKind::Unknown => Err(FieldParseError::NotAScalar {
            type_tag: ktype.tag().to_string(),
        }),
    }
}

pub fn parse_numeric(family: NumericFamily, text: &str) -> Result<Value, FieldParseError> {
    if text.is_empty() {
        return Ok(Value::Null);
    }
    let not_a_number = || FieldParseError::NotANumber {
        text: text.to_string(),
    };
    if !family.pattern().is_match(text) {
        return Err(not_a_number());
    }
    let out_of_range = || FieldParseError::OutOfRange {
        text: text.to_string(),
        family,
    };

    // The pattern has already been checked, so any integer parse failure is overflow.
    match family {
        NumericFamily::I32 => text
            .parse::<i32>()
            .map(|v| Value::Int(i64::from(v)))
            .map_err(|_| out_of_range()),
        NumericFamily::I64 => text.parse::<i64>().map(Value::Int).map_err(|_| out_of_range()),
        NumericFamily::U32 => text
            .parse::<u32>()
            .map(|v| Value::Int(i64::from(v)))
            .map_err(|_| out_of_range()),
        NumericFamily::U64 => text
            .parse::<u64>()
            .map(Value::from_u64)
            .map_err(|_| out_of_range()),
        NumericFamily::F32 | NumericFamily::F64 => {
            if !text.bytes().any(|b| b.is_ascii_digit()) {
                return Err(not_a_number());
            }
            let v: f64 = text.parse().map_err(|_| not_a_number())?;
            // F32 values are stored at f32 precision so they format and re-parse unchanged
            let stored = match family {
                NumericFamily::F32 => f64::from(v as f32),
                _ => v,
            };
            if stored.is_finite() {
                Ok(Value::Float(stored))
            } else {
                Err(out_of_range())
            }
        }
    }
}

/// Resolve an enum choice to the stored value: the member's name, never its ordinal.
pub fn resolve_enum(members: &[EnumMember], name: &str) -> Result<Value, FieldParseError> {
    members
        .iter()
        .find(|m| m.name == name)
        .map(|m| Value::String(m.name.clone()))
        .ok_or_else(|| FieldParseError::UnknownEnumMember {
            name: name.to_string(),
        })
}

/// Text shown in a field's widget. `null` formats as the empty string.
pub fn format(ktype: &FieldType, value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Uint(u) => u.to_string(),
        Value::Float(f) => match scalar_kind(ktype) {
            ScalarKind::Numeric(NumericFamily::F32) => (*f as f32).to_string(),
            _ => f.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::List(_) | Value::Map(_) => serde_json::Value::from(value).to_string(),
    }
}
