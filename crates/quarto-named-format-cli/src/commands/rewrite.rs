/*
 * rewrite.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Rewrite command implementation.
//!
//! Prints the positional template and its resolved arguments as JSON:
//!
//! ```text
//! {"template": "Hello {0}", "args": ["Ada"]}
//! ```

use anyhow::{Context, Result};
use tracing::info;

use quarto_named_format::rewrite;

use super::{TemplateArgs, write_stdout};

/// Execute the rewrite command
pub fn execute(args: TemplateArgs) -> Result<()> {
    let json = rewrite_to_json(&args)?;

    match args.output_path() {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            info!(output = %path.display(), "Wrote rewritten template");
        }
        None => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(write_stdout(&format!("{}\n", json)))?;
        }
    }
    Ok(())
}

fn rewrite_to_json(args: &TemplateArgs) -> Result<String> {
    let template = args.load_template()?;
    let resolver = args.load_resolver()?;
    let options = args.options()?;

    let rewritten =
        rewrite(&template, resolver.as_ref(), &options).context("Failed to rewrite template")?;
    serde_json::to_string_pretty(&rewritten).context("Failed to serialize rewritten template")
}
