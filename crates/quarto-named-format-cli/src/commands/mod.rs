/*
 * mod.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Command implementations for the named-format CLI
//!
//! Both commands share the same inputs: a template, a JSON values file and
//! the formatting options. Loading those lives here.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use quarto_named_format::{
    FormatOptions, FormatValue, KeyResolver, MapResolver, Markers, ValueResolver,
};

pub mod render;
pub mod rewrite;

/// Inputs shared by every command.
#[derive(Debug, Clone, Args)]
pub struct TemplateArgs {
    /// Template text (use --template-file to read it from a file)
    pub template: Option<String>,

    /// Read the template from FILE
    #[arg(short = 'f', long, conflicts_with = "template")]
    pub template_file: Option<PathBuf>,

    /// JSON file with the values to substitute
    #[arg(short = 'v', long)]
    pub values: Option<PathBuf>,

    /// Opening placeholder marker
    #[arg(long, default_value = "{")]
    pub open: String,

    /// Closing placeholder marker
    #[arg(long, default_value = "}")]
    pub close: String,

    /// Fail on null values and missing members in dotted paths
    #[arg(long)]
    pub strict: bool,

    /// Write output to FILE (use '--output -' for stdout)
    #[arg(short = 'o', long)]
    pub output: Option<String>,
}

impl TemplateArgs {
    /// Load the template text.
    pub fn load_template(&self) -> Result<String> {
        match (&self.template, &self.template_file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read template: {}", path.display())),
            (None, None) => anyhow::bail!("No template given. Pass TEMPLATE or --template-file"),
        }
    }

    /// Build the key resolver from the values file.
    ///
    /// A top-level JSON object binds its keys; any other JSON value is bound
    /// to the empty key. Without a values file every key is missing.
    pub fn load_resolver(&self) -> Result<Box<dyn KeyResolver>> {
        let Some(path) = &self.values else {
            return Ok(Box::new(MapResolver::new()));
        };
        let value = load_values(path)?;
        Ok(match value {
            FormatValue::Map(entries) => {
                debug!(keys = entries.len(), "Loaded values object");
                Box::new(MapResolver::from(entries))
            }
            other => Box::new(ValueResolver::new(other)),
        })
    }

    /// Build the formatting options.
    pub fn options(&self) -> Result<FormatOptions<'static>> {
        let markers = Markers::new(self.open.as_str(), self.close.as_str())
            .context("Invalid placeholder markers")?;
        let options = FormatOptions::new().with_markers(markers);
        Ok(if self.strict { options.strict() } else { options })
    }

    /// The output file, if output should not go to stdout.
    pub fn output_path(&self) -> Option<&Path> {
        self.output
            .as_deref()
            .filter(|output| *output != "-")
            .map(Path::new)
    }
}

fn load_values(path: &Path) -> Result<FormatValue> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read values: {}", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse values as JSON: {}", path.display()))?;
    Ok(FormatValue::from(json))
}

/// Write text to stdout through the async writer.
pub async fn write_stdout(text: &str) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}
