/*
 * traversal.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Dotted-path member traversal.
//!
//! A key path such as `order.customer.name` resolves its first segment
//! through the key resolver and then walks the remaining segments here, one
//! member read per step, stopping at the first failure.

use crate::error::{FormatError, FormatResult};
use crate::member::MemberReader;
use crate::value::FormatValue;

/// Outcome of walking a member path.
#[derive(Debug, Clone, PartialEq)]
pub enum Traversal {
    /// The path was exhausted. The value may be null.
    Got(FormatValue),

    /// A null value was reached while members remained.
    Terminated { member: String },

    /// A member could not be read as a property or a field.
    InvalidPropertyPath { member: String },
}

/// Walk `members` starting from `root`.
pub fn traverse<S: AsRef<str>>(
    root: FormatValue,
    members: &[S],
    reader: &(impl MemberReader + ?Sized),
) -> Traversal {
    let mut current = root;
    for member in members {
        let member = member.as_ref();
        if current.is_null() {
            return Traversal::Terminated {
                member: member.to_string(),
            };
        }
        match reader.read_member(&current, member) {
            Some(next) => current = next,
            None => {
                return Traversal::InvalidPropertyPath {
                    member: member.to_string(),
                };
            }
        }
    }
    Traversal::Got(current)
}

/// How traversal failures are reported.
///
/// The default ignores both failure kinds, so dotted paths into missing
/// members render as empty text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalPolicy {
    /// Yield null instead of failing when a null is reached mid-path.
    pub ignore_if_terminated: bool,

    /// Yield null instead of failing when a member does not exist.
    pub ignore_invalid_property_path: bool,
}

impl Default for TraversalPolicy {
    fn default() -> Self {
        Self::lenient()
    }
}

impl TraversalPolicy {
    /// Ignore both failure kinds.
    pub fn lenient() -> Self {
        Self {
            ignore_if_terminated: true,
            ignore_invalid_property_path: true,
        }
    }

    /// Report both failure kinds as errors.
    pub fn strict() -> Self {
        Self {
            ignore_if_terminated: false,
            ignore_invalid_property_path: false,
        }
    }

    /// Turn a traversal outcome into a value or an error.
    ///
    /// `path` is the full key path, used in error messages.
    pub fn apply(&self, outcome: Traversal, path: &str) -> FormatResult<FormatValue> {
        match outcome {
            Traversal::Got(value) => Ok(value),
            Traversal::Terminated { .. } if self.ignore_if_terminated => Ok(FormatValue::Null),
            Traversal::Terminated { member } => Err(FormatError::TraversalTerminated {
                path: path.to_string(),
                member,
            }),
            Traversal::InvalidPropertyPath { .. } if self.ignore_invalid_property_path => {
                Ok(FormatValue::Null)
            }
            Traversal::InvalidPropertyPath { member } => Err(FormatError::InvalidPropertyPath {
                path: path.to_string(),
                member,
            }),
        }
    }
}
