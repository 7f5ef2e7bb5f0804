//! Structural check of a value tree against a schema registry
//!
//! Used when text typed by the user is committed back into the tree: only
//! schema-declared keys may appear and every value must fit its field's type.

use crate::codec::{scalar_kind, NumericFamily, ScalarKind};
use crate::error::SyncParseError;
use crate::schema::{FieldSchema, FieldType, MessageSchema, SchemaRegistry};
use crate::value::{Value, ValuePath};

/// Check that `value` is a valid instance of message `type_name`.
pub fn conform(
    registry: &SchemaRegistry,
    type_name: &str,
    value: &Value,
) -> Result<(), SyncParseError> {
    let root = ValuePath::root();
    let schema = registry
        .get(type_name)
        .ok_or_else(|| SyncParseError::at(root.to_string(), format!("unknown type {type_name}")))?;
    match value {
        Value::Map(_) => check_message(registry, schema, value, &root),
        _ => Err(SyncParseError::at(root.to_string(), "expected an object")),
    }
}

fn check_message(
    registry: &SchemaRegistry,
    schema: &MessageSchema,
    value: &Value,
    path: &ValuePath,
) -> Result<(), SyncParseError> {
    let map = match value {
        Value::Null => return Ok(()),
        Value::Map(map) => map,
        _ => return Err(SyncParseError::at(path.to_string(), "expected an object")),
    };
    for (key, child) in map.iter() {
        let field_path = path.field(key);
        let field = schema
            .field(key)
            .ok_or_else(|| SyncParseError::at(field_path.to_string(), "unknown field"))?;
        check_field(registry, field, child, &field_path)?;
    }
    Ok(())
}

fn check_field(
    registry: &SchemaRegistry,
    field: &FieldSchema,
    value: &Value,
    path: &ValuePath,
) -> Result<(), SyncParseError> {
    if !field.label.is_repeated() {
        return check_element(registry, &field.ktype, value, path);
    }
    match value {
        Value::Null => Ok(()),
        Value::List(items) => items
            .iter()
            .enumerate()
            .try_for_each(|(i, item)| check_element(registry, &field.ktype, item, &path.index(i))),
        _ => Err(SyncParseError::at(path.to_string(), "expected an array")),
    }
}

fn check_element(
    registry: &SchemaRegistry,
    ktype: &FieldType,
    value: &Value,
    path: &ValuePath,
) -> Result<(), SyncParseError> {
    if value.is_null() {
        return Ok(());
    }
    let mismatch = |what: &str| Err(SyncParseError::at(path.to_string(), format!("expected {what}")));

    match scalar_kind(ktype) {
        ScalarKind::Numeric(family) => check_number(family, value, path),
        ScalarKind::Text | ScalarKind::Bytes => match value {
            Value::String(_) => Ok(()),
            _ => mismatch("a string"),
        },
        ScalarKind::Bool => match value {
            Value::Bool(_) => Ok(()),
            _ => mismatch("true or false"),
        },
        ScalarKind::Enum => {
            let Value::String(name) = value else {
                return mismatch("an enum member name");
            };
            let members = ktype
                .relate()
                .map(|relate| registry.enum_members(relate))
                .unwrap_or(&[]);
            if members.is_empty() || members.iter().any(|m| &m.name == name) {
                Ok(())
            } else {
                Err(SyncParseError::at(
                    path.to_string(),
                    format!("unknown enum member {name}"),
                ))
            }
        }
        ScalarKind::Message => {
            let relate = ktype.relate().unwrap_or_default();
            let schema = registry.get(relate).ok_or_else(|| {
                SyncParseError::at(path.to_string(), format!("unknown type {relate}"))
            })?;
            check_message(registry, schema, value, path)
        }
        ScalarKind::Unknown => Ok(()),
    }
}

fn check_number(
    family: NumericFamily,
    value: &Value,
    path: &ValuePath,
) -> Result<(), SyncParseError> {
    let fits = match (family, value) {
        (NumericFamily::F32 | NumericFamily::F64, Value::Int(_) | Value::Uint(_)) => true,
        (NumericFamily::F32, Value::Float(f)) => (*f as f32).is_finite(),
        (NumericFamily::F64, Value::Float(f)) => f.is_finite(),
        (NumericFamily::I32, Value::Int(i)) => i32::try_from(*i).is_ok(),
        (NumericFamily::I64, Value::Int(_)) => true,
        (NumericFamily::U32, Value::Int(i)) => u32::try_from(*i).is_ok(),
        (NumericFamily::U64, Value::Int(i)) => *i >= 0,
        (NumericFamily::U64, Value::Uint(_)) => true,
        _ => false,
    };
    if fits {
        Ok(())
    } else {
        Err(SyncParseError::at(
            path.to_string(),
            format!("expected a {family} number"),
        ))
    }
}
