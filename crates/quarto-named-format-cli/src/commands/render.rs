/*
 * render.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Render command implementation
 */

//! Render command implementation.
//!
//! Formats the template and writes the result to the output file or, by
//! default, to stdout.

use std::fs::File;
use std::io::BufWriter;

use anyhow::{Context, Result};
use tracing::info;

use quarto_named_format::NamedFormatter;

use super::TemplateArgs;

/// Execute the render command
pub fn execute(args: TemplateArgs) -> Result<()> {
    let template = args.load_template()?;
    let resolver = args.load_resolver()?;
    let formatter = NamedFormatter::with_options(args.options()?);

    if let Some(path) = args.output_path() {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        let mut sink = BufWriter::new(file);
        let bytes = formatter
            .write_to(&mut sink, &template, resolver.as_ref())
            .context("Failed to render template")?;
        info!(bytes, output = %path.display(), "Rendered template");
        return Ok(());
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let mut stdout = tokio::io::stdout();
        formatter
            .write_to_async(&mut stdout, &template, resolver.as_ref())
            .await
            .context("Failed to render template")
    })?;
    Ok(())
}
