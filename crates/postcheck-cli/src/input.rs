//! Where the posting text comes from.

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Resolve posting text from an inline argument, a file, or stdin, in that order.
pub fn read_posting(text: Option<&str>, file: Option<&Path>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text.to_string());
    }

    if let Some(path) = file {
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read posting from {}", path.display()));
    }

    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read posting from stdin")?;
    Ok(buf)
}
