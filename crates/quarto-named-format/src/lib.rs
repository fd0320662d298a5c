/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Named-placeholder string formatting.
//!
//! Templates address their values by name instead of position:
//!
//! - Plain keys: `{name}`
//! - Dotted paths into nested values: `{order.customer.name}`
//! - Format specifiers and alignment: `{total:N2}`, `{name,-10}`
//! - Literal braces: `{{` and `}}`
//! - Custom markers such as `${name}` or `<%name%>`
//!
//! # Architecture
//!
//! Formatting happens in two passes. [`rewrite`] scans the template once and
//! turns every named placeholder into a positional one, resolving each key
//! path to a [`FormatValue`] through a [`KeyResolver`]. The result is then
//! rendered by [`format_positional`]. Every input shape (closures, maps,
//! single values, positional arguments) is adapted to [`KeyResolver`], so the
//! scanner exists exactly once.
//!
//! Dotted paths are walked by a [`MemberReader`]. Whether a walk that hits a
//! null value or a missing member yields empty text or an error is controlled
//! by [`TraversalPolicy`]; the default is lenient.
//!
//! # Example
//!
//! ```
//! use quarto_named_format::{FormatValue, MapResolver, format};
//!
//! let resolver = MapResolver::from_pairs([
//!     ("name", FormatValue::from("Ada")),
//!     ("total", FormatValue::Float(1234.5)),
//! ]);
//! let output = format("{name} owes {total:N2}", &resolver)?;
//! assert_eq!(output, "Ada owes 1,234.50");
//! # Ok::<(), quarto_named_format::FormatError>(())
//! ```

pub mod error;
pub mod format;
pub mod member;
pub mod options;
pub mod positional;
pub mod resolver;
pub mod tokenizer;
pub mod traversal;
pub mod value;
pub mod writer;

// Re-export main types at crate root
pub use error::{FormatError, FormatResult};
pub use format::{NamedFormatter, format, format_map, format_value, format_with};
pub use member::{MemberReader, ReflectMemberReader};
pub use options::{FormatOptions, Markers};
pub use positional::format_positional;
pub use resolver::{
    ArgsResolver, CaseInsensitiveResolver, ChainResolver, KeyResolver, MapResolver, ValueResolver,
};
pub use tokenizer::{Rewritten, rewrite};
pub use traversal::{Traversal, TraversalPolicy, traverse};
pub use value::{FormatValue, Reflect};
pub use writer::{write_to, write_to_async};
