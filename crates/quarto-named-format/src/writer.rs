/*
 * writer.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Writing formatted output to sinks.

use std::io;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::FormatResult;
use crate::format::format_with;
use crate::options::FormatOptions;
use crate::resolver::KeyResolver;

/// Format a template and write the result to `sink`.
///
/// Nothing is written when formatting fails. Returns the number of bytes
/// written.
pub fn write_to<W, R>(
    sink: &mut W,
    template: &str,
    resolver: &R,
    options: &FormatOptions<'_>,
) -> FormatResult<usize>
where
    W: io::Write + ?Sized,
    R: KeyResolver + ?Sized,
{
    let text = format_with(template, resolver, options)?;
    sink.write_all(text.as_bytes())?;
    sink.flush()?;
    tracing::debug!(bytes = text.len(), "Wrote formatted template");
    Ok(text.len())
}

/// Async variant of [`write_to`].
pub async fn write_to_async<W, R>(
    sink: &mut W,
    template: &str,
    resolver: &R,
    options: &FormatOptions<'_>,
) -> FormatResult<usize>
where
    W: AsyncWrite + Unpin + ?Sized,
    R: KeyResolver + ?Sized,
{
    // Format before the first await so the resolver is never held across it.
    let text = format_with(template, resolver, options)?;
    sink.write_all(text.as_bytes()).await?;
    sink.flush().await?;
    tracing::debug!(bytes = text.len(), "Wrote formatted template");
    Ok(text.len())
}
