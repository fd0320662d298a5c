/*
 * value.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Values substituted into named templates.
//!
//! [`FormatValue`] is the argument type handed from the rewriter to the
//! positional formatter. Host types that want dotted-path access to their
//! members implement [`Reflect`] and are carried as [`FormatValue::Object`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::error::{FormatError, FormatResult};

/// Member access for host values.
///
/// This is the introspection seam used by dotted key paths such as
/// `{order.customer.name}`. Properties are consulted before fields.
pub trait Reflect: fmt::Debug + Send + Sync {
    /// Name reported in error messages and used as the default rendering.
    fn type_name(&self) -> &str;

    /// Read a property-style member.
    fn property(&self, _name: &str) -> Option<FormatValue> {
        None
    }

    /// Read a field-style member.
    fn field(&self, _name: &str) -> Option<FormatValue> {
        None
    }

    /// Render this value for output, honoring the format specifier if the
    /// type understands it. An empty specifier means default rendering.
    fn render(&self, _spec: &str) -> FormatResult<String> {
        Ok(self.type_name().to_string())
    }
}

/// A value that can be used as a positional argument.
#[derive(Debug, Clone, Default)]
pub enum FormatValue {
    /// An absent value. Renders as empty text.
    #[default]
    Null,

    /// A boolean value.
    Bool(bool),

    /// A signed integer.
    Int(i64),

    /// A floating point number.
    Float(f64),

    /// A string value.
    String(String),

    /// A list of values.
    List(Vec<FormatValue>),

    /// A map of string keys to values.
    Map(BTreeMap<String, FormatValue>),

    /// A host object exposing members through [`Reflect`].
    Object(Arc<dyn Reflect>),
}

impl FormatValue {
    /// Wrap a host object.
    pub fn object(value: impl Reflect + 'static) -> Self {
        FormatValue::Object(Arc::new(value))
    }

    /// Whether this is [`FormatValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, FormatValue::Null)
    }

    /// Borrow the string content, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FormatValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short description of the value kind for error messages.
    pub fn kind_name(&self) -> String {
        match self {
            FormatValue::Null => "null".to_string(),
            FormatValue::Bool(_) => "bool".to_string(),
            FormatValue::Int(_) => "integer".to_string(),
            FormatValue::Float(_) => "float".to_string(),
            FormatValue::String(_) => "string".to_string(),
            FormatValue::List(_) => "list".to_string(),
            FormatValue::Map(_) => "map".to_string(),
            FormatValue::Object(obj) => obj.type_name().to_string(),
        }
    }

    /// Render with default formatting.
    pub fn render(&self) -> String {
        // The empty specifier never fails for any built-in kind; objects fall
        // back to their type name.
        self.render_with("").unwrap_or_else(|_| self.kind_name())
    }

    /// Render with a format specifier (the text after `:` in a placeholder).
    ///
    /// - Null renders as empty text
    /// - Strings and bools ignore the specifier
    /// - Numbers accept `D`, `X`, `x`, `N`, `F`, `E`, `P` with optional precision
    /// - Lists and maps render their elements, each with the same specifier
    /// - Objects receive the specifier through [`Reflect::render`]
    pub fn render_with(&self, spec: &str) -> FormatResult<String> {
        match self {
            FormatValue::Null => Ok(String::new()),
            FormatValue::Bool(b) => Ok(b.to_string()),
            FormatValue::String(s) => Ok(s.clone()),
            FormatValue::Int(i) => render_int(*i, spec),
            FormatValue::Float(f) => render_float(*f, spec),
            FormatValue::List(items) => {
                let rendered: FormatResult<Vec<String>> =
                    items.iter().map(|v| v.render_with(spec)).collect();
                Ok(rendered?.join(", "))
            }
            FormatValue::Map(entries) => {
                let mut parts = Vec::with_capacity(entries.len());
                for (key, value) in entries {
                    parts.push(format!("{}={}", key, value.render_with(spec)?));
                }
                Ok(parts.join(", "))
            }
            FormatValue::Object(obj) => obj.render(spec),
        }
    }
}

impl PartialEq for FormatValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FormatValue::Null, FormatValue::Null) => true,
            (FormatValue::Bool(a), FormatValue::Bool(b)) => a == b,
            (FormatValue::Int(a), FormatValue::Int(b)) => a == b,
            (FormatValue::Float(a), FormatValue::Float(b)) => a == b,
            (FormatValue::String(a), FormatValue::String(b)) => a == b,
            (FormatValue::List(a), FormatValue::List(b)) => a == b,
            (FormatValue::Map(a), FormatValue::Map(b)) => a == b,
            // Objects have identity semantics
            (FormatValue::Object(a), FormatValue::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for FormatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Largest precision accepted in a numeric specifier.
const MAX_PRECISION: usize = 99;

/// Split a specifier like `N2` into its letter and optional precision.
fn parse_numeric_spec(spec: &str) -> Option<(char, Option<usize>)> {
    let mut chars = spec.chars();
    let letter = chars.next()?;
    let rest = chars.as_str();
    if rest.is_empty() {
        return Some((letter, None));
    }
    rest.parse::<usize>()
        .ok()
        .filter(|p| *p <= MAX_PRECISION)
        .map(|p| (letter, Some(p)))
}

fn invalid_spec(spec: &str, value: &str) -> FormatError {
    FormatError::InvalidFormatSpecifier {
        specifier: spec.to_string(),
        value: value.to_string(),
    }
}

fn render_int(value: i64, spec: &str) -> FormatResult<String> {
    if spec.is_empty() {
        return Ok(value.to_string());
    }
    let (letter, precision) =
        parse_numeric_spec(spec).ok_or_else(|| invalid_spec(spec, "integer"))?;

    match letter {
        'D' | 'd' => {
            let width = precision.unwrap_or(0);
            let digits = format!("{:0width$}", value.unsigned_abs(), width = width);
            Ok(if value < 0 { format!("-{}", digits) } else { digits })
        }
        'X' => Ok(format!("{:0width$X}", value, width = precision.unwrap_or(0))),
        'x' => Ok(format!("{:0width$x}", value, width = precision.unwrap_or(0))),
        'N' | 'n' => {
            let grouped = group_thousands(&value.unsigned_abs().to_string());
            let sign = if value < 0 { "-" } else { "" };
            Ok(format!("{}{}{}", sign, grouped, zero_fraction(precision.unwrap_or(2))))
        }
        'F' | 'f' => Ok(format!("{}{}", value, zero_fraction(precision.unwrap_or(2)))),
        'E' | 'e' | 'P' | 'p' => render_float(value as f64, spec),
        _ => Err(invalid_spec(spec, "integer")),
    }
}

fn render_float(value: f64, spec: &str) -> FormatResult<String> {
    if spec.is_empty() {
        return Ok(value.to_string());
    }
    let (letter, precision) = parse_numeric_spec(spec).ok_or_else(|| invalid_spec(spec, "float"))?;

    match letter {
        'F' | 'f' => Ok(format!("{:.prec$}", value, prec = precision.unwrap_or(2))),
        'N' | 'n' => {
            let fixed = format!("{:.prec$}", value.abs(), prec = precision.unwrap_or(2));
            let (int_part, frac_part) = match fixed.split_once('.') {
                Some((i, f)) => (i.to_string(), format!(".{}", f)),
                None => (fixed.clone(), String::new()),
            };
            let sign = if value.is_sign_negative() && value != 0.0 { "-" } else { "" };
            Ok(format!("{}{}{}", sign, group_thousands(&int_part), frac_part))
        }
        'E' | 'e' => {
            let raw = format!("{:.prec$e}", value, prec = precision.unwrap_or(6));
            // Rust renders `1.5e3`; normalize to a signed three-digit exponent.
            let (mantissa, exponent) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            let marker = if letter == 'E' { 'E' } else { 'e' };
            Ok(format!("{}{}{}{:03}", mantissa, marker, sign, exponent.abs()))
        }
        'P' | 'p' => Ok(format!(
            "{:.prec$} %",
            value * 100.0,
            prec = precision.unwrap_or(2)
        )),
        _ => Err(invalid_spec(spec, "float")),
    }
}

fn zero_fraction(precision: usize) -> String {
    if precision == 0 {
        String::new()
    } else {
        format!(".{}", "0".repeat(precision))
    }
}

/// Insert `,` between groups of three digits.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

impl From<bool> for FormatValue {
    fn from(value: bool) -> Self {
        FormatValue::Bool(value)
    }
}

macro_rules! from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for FormatValue {
                fn from(value: $t) -> Self {
                    FormatValue::Int(i64::from(value))
                }
            }
        )*
    };
}

from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for FormatValue {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => FormatValue::Int(i),
            Err(_) => FormatValue::Float(value as f64),
        }
    }
}

impl From<usize> for FormatValue {
    fn from(value: usize) -> Self {
        FormatValue::from(value as u64)
    }
}

impl From<f32> for FormatValue {
    fn from(value: f32) -> Self {
        FormatValue::Float(f64::from(value))
    }
}

impl From<f64> for FormatValue {
    fn from(value: f64) -> Self {
        FormatValue::Float(value)
    }
}

impl From<&str> for FormatValue {
    fn from(value: &str) -> Self {
        FormatValue::String(value.to_string())
    }
}

impl From<String> for FormatValue {
    fn from(value: String) -> Self {
        FormatValue::String(value)
    }
}

impl<T: Into<FormatValue>> From<Option<T>> for FormatValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FormatValue::Null, Into::into)
    }
}

impl<T: Into<FormatValue>> From<Vec<T>> for FormatValue {
    fn from(value: Vec<T>) -> Self {
        FormatValue::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FormatValue>> From<BTreeMap<String, T>> for FormatValue {
    fn from(value: BTreeMap<String, T>) -> Self {
        FormatValue::Map(value.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<FormatValue>, S> From<HashMap<String, T, S>> for FormatValue {
    fn from(value: HashMap<String, T, S>) -> Self {
        FormatValue::Map(value.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl From<Arc<dyn Reflect>> for FormatValue {
    fn from(value: Arc<dyn Reflect>) -> Self {
        FormatValue::Object(value)
    }
}

impl From<serde_json::Value> for FormatValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FormatValue::Null,
            serde_json::Value::Bool(b) => FormatValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => FormatValue::Int(i),
                None => FormatValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => FormatValue::String(s),
            serde_json::Value::Array(items) => {
                FormatValue::List(items.into_iter().map(FormatValue::from).collect())
            }
            serde_json::Value::Object(entries) => FormatValue::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, FormatValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for FormatValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FormatValue::Null => serializer.serialize_unit(),
            FormatValue::Bool(b) => serializer.serialize_bool(*b),
            FormatValue::Int(i) => serializer.serialize_i64(*i),
            FormatValue::Float(f) => serializer.serialize_f64(*f),
            FormatValue::String(s) => serializer.serialize_str(s),
            FormatValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            FormatValue::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            FormatValue::Object(_) => serializer.serialize_str(&self.render()),
        }
    }
}
