/*
 * format.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Formatting entry points.
//!
//! Every entry point funnels into [`rewrite`] followed by
//! [`format_positional`](crate::format_positional); the variants only differ
//! in how the caller's values are adapted into a [`KeyResolver`].

use std::collections::HashMap;
use std::hash::BuildHasher;

use crate::error::FormatResult;
use crate::options::FormatOptions;
use crate::resolver::{KeyResolver, ValueResolver};
use crate::tokenizer::{Rewritten, rewrite};
use crate::value::FormatValue;

/// Format a template with default options.
pub fn format<R: KeyResolver + ?Sized>(template: &str, resolver: &R) -> FormatResult<String> {
    format_with(template, resolver, &FormatOptions::default())
}

/// Format a template with explicit options.
pub fn format_with<R: KeyResolver + ?Sized>(
    template: &str,
    resolver: &R,
    options: &FormatOptions<'_>,
) -> FormatResult<String> {
    rewrite(template, resolver, options)?.render()
}

/// Format a template against a map of values.
pub fn format_map<V, S>(template: &str, values: &HashMap<String, V, S>) -> FormatResult<String>
where
    V: Clone + Into<FormatValue>,
    S: BuildHasher,
{
    let resolver = |key: &str| -> Option<FormatValue> { values.get(key).cloned().map(Into::into) };
    format(template, &resolver)
}

/// Format a template against a single value.
///
/// `{}` is the value itself and `{name}` reads member `name` of it.
pub fn format_value(template: &str, value: impl Into<FormatValue>) -> FormatResult<String> {
    format(template, &ValueResolver::new(value))
}

/// Reusable formatter carrying a fixed set of options.
///
/// Holds no per-call state, so one formatter can serve many calls, including
/// concurrent ones.
#[derive(Debug, Clone, Default)]
pub struct NamedFormatter<'a> {
    options: FormatOptions<'a>,
}

impl<'a> NamedFormatter<'a> {
    /// Create a formatter with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a formatter with the given options.
    pub fn with_options(options: FormatOptions<'a>) -> Self {
        Self { options }
    }

    /// The options used by this formatter.
    pub fn options(&self) -> &FormatOptions<'a> {
        &self.options
    }

    /// Rewrite a template into positional form.
    pub fn rewrite<R: KeyResolver + ?Sized>(
        &self,
        template: &str,
        resolver: &R,
    ) -> FormatResult<Rewritten> {
        rewrite(template, resolver, &self.options)
    }

    /// Format a template to a string.
    pub fn format<R: KeyResolver + ?Sized>(
        &self,
        template: &str,
        resolver: &R,
    ) -> FormatResult<String> {
        format_with(template, resolver, &self.options)
    }

    /// Write a formatted template to a sink.
    pub fn write_to<W, R>(&self, sink: &mut W, template: &str, resolver: &R) -> FormatResult<usize>
    where
        W: std::io::Write + ?Sized,
        R: KeyResolver + ?Sized,
    {
        crate::writer::write_to(sink, template, resolver, &self.options)
    }

    /// Write a formatted template to an async sink.
    pub async fn write_to_async<W, R>(
        &self,
        sink: &mut W,
        template: &str,
        resolver: &R,
    ) -> FormatResult<usize>
    where
        W: tokio::io::AsyncWrite + Unpin + ?Sized,
        R: KeyResolver + ?Sized,
    {
        crate::writer::write_to_async(sink, template, resolver, &self.options).await
    }
}
