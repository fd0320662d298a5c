/*
 * member.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Member reading for dotted key paths.
//!
//! The traversal in [`crate::traversal`] never inspects values itself; it
//! asks a [`MemberReader`] to read one named member at a time. Callers can
//! swap in their own reader to expose members of values differently.

use crate::value::FormatValue;

/// Reads named members off a value.
pub trait MemberReader {
    /// Read a property-style member, or `None` if there is none.
    fn read_property(&self, value: &FormatValue, name: &str) -> Option<FormatValue>;

    /// Read a field-style member, or `None` if there is none.
    fn read_field(&self, value: &FormatValue, name: &str) -> Option<FormatValue>;

    /// Read a member, trying property access first and field access second.
    fn read_member(&self, value: &FormatValue, name: &str) -> Option<FormatValue> {
        self.read_property(value, name)
            .or_else(|| self.read_field(value, name))
    }
}

/// The default reader.
///
/// Properties:
/// - map entries by key
/// - `len` of strings (in characters) and lists
/// - [`Reflect::property`](crate::value::Reflect::property) of objects
///
/// Fields:
/// - list elements by decimal index
/// - [`Reflect::field`](crate::value::Reflect::field) of objects
#[derive(Debug, Clone, Copy, Default)]
pub struct ReflectMemberReader;

impl MemberReader for ReflectMemberReader {
    fn read_property(&self, value: &FormatValue, name: &str) -> Option<FormatValue> {
        match value {
            FormatValue::Map(entries) => entries.get(name).cloned(),
            FormatValue::Object(obj) => obj.property(name),
            FormatValue::String(s) if name == "len" => Some(FormatValue::from(s.chars().count())),
            FormatValue::List(items) if name == "len" => Some(FormatValue::from(items.len())),
            _ => None,
        }
    }

    fn read_field(&self, value: &FormatValue, name: &str) -> Option<FormatValue> {
        match value {
            FormatValue::List(items) => {
                let index: usize = name.parse().ok()?;
                items.get(index).cloned()
            }
            FormatValue::Object(obj) => obj.field(name),
            _ => None,
        }
    }
}
