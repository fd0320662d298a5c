/*
 * options.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Options for a formatting call.

use std::fmt;

use crate::error::{FormatError, FormatResult};
use crate::member::{MemberReader, ReflectMemberReader};
use crate::resolver::KeyResolver;
use crate::traversal::TraversalPolicy;

/// Opening and closing placeholder markers.
///
/// The default pair is `{` / `}`, which also enables the `{{` escape. Any
/// other pair switches the rewriter to substring matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    open: String,
    close: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            open: "{".to_string(),
            close: "}".to_string(),
        }
    }
}

impl Markers {
    /// Create a custom marker pair. Both markers must be non-empty.
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> FormatResult<Self> {
        let open = open.into();
        let close = close.into();
        if open.is_empty() || close.is_empty() {
            return Err(FormatError::InvalidMarkers {
                message: "markers must not be empty".to_string(),
            });
        }
        Ok(Self { open, close })
    }

    /// The opening marker.
    pub fn open(&self) -> &str {
        &self.open
    }

    /// The closing marker.
    pub fn close(&self) -> &str {
        &self.close
    }

    /// Whether this is the `{` / `}` pair.
    pub fn is_default(&self) -> bool {
        self.open == "{" && self.close == "}"
    }
}

/// Configuration for one rewrite or format call.
///
/// Holds only borrowed collaborators and plain settings, so a single value
/// can be shared by any number of calls.
#[derive(Clone)]
pub struct FormatOptions<'a> {
    /// Placeholder markers.
    pub markers: Markers,

    /// What to do when a dotted path cannot be walked.
    pub policy: TraversalPolicy,

    /// Consulted with the first key segment when the primary resolver misses.
    pub fallback: Option<&'a (dyn KeyResolver + Sync)>,

    /// Reads members for dotted key paths.
    pub member_reader: &'a (dyn MemberReader + Sync),
}

impl Default for FormatOptions<'_> {
    fn default() -> Self {
        Self {
            markers: Markers::default(),
            policy: TraversalPolicy::default(),
            fallback: None,
            member_reader: &ReflectMemberReader,
        }
    }
}

impl fmt::Debug for FormatOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatOptions")
            .field("markers", &self.markers)
            .field("policy", &self.policy)
            .field("fallback", &self.fallback.is_some())
            .finish_non_exhaustive()
    }
}

impl<'a> FormatOptions<'a> {
    /// Create options with the defaults: `{`/`}` markers, lenient traversal,
    /// no fallback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use custom placeholder markers.
    pub fn with_markers(mut self, markers: Markers) -> Self {
        self.markers = markers;
        self
    }

    /// Replace the traversal policy.
    pub fn with_policy(mut self, policy: TraversalPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Report every traversal failure as an error.
    pub fn strict(self) -> Self {
        self.with_policy(TraversalPolicy::strict())
    }

    /// Set the ignore-if-terminated flag.
    pub fn with_ignore_if_terminated(mut self, ignore: bool) -> Self {
        self.policy.ignore_if_terminated = ignore;
        self
    }

    /// Set the ignore-invalid-property-path flag.
    pub fn with_ignore_invalid_property_path(mut self, ignore: bool) -> Self {
        self.policy.ignore_invalid_property_path = ignore;
        self
    }

    /// Use a fallback resolver for keys the primary resolver cannot find.
    pub fn with_fallback(mut self, fallback: &'a (dyn KeyResolver + Sync)) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Use a custom member reader for dotted paths.
    pub fn with_member_reader(mut self, reader: &'a (dyn MemberReader + Sync)) -> Self {
        self.member_reader = reader;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_markers() {
        let markers = Markers::default();
        assert!(markers.is_default());
        assert_eq!(markers.open(), "{");
        assert_eq!(markers.close(), "}");
        assert!(Markers::new("{", "}").unwrap().is_default());
    }

    #[test]
    fn test_custom_markers() {
        let markers = Markers::new("<%", "%>").unwrap();
        assert!(!markers.is_default());
        assert!(Markers::new("", "}").is_err());
        assert!(Markers::new("{", "").is_err());
    }

    #[test]
    fn test_option_builders() {
        let options = FormatOptions::new();
        assert_eq!(options.policy, TraversalPolicy::lenient());
        assert!(options.fallback.is_none());

        let options = FormatOptions::new().strict();
        assert_eq!(options.policy, TraversalPolicy::strict());

        let options = FormatOptions::new().with_ignore_invalid_property_path(false);
        assert!(options.policy.ignore_if_terminated);
        assert!(!options.policy.ignore_invalid_property_path);
    }
}
