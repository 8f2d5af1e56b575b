//! Frontend: the syntax tree the transform consumes and produces
//!
//! Lexing and parsing happen outside this crate; trees arrive already built (usually as JSON).

pub mod ast;

use anyhow::Context;
use std::fs;
use std::path::Path;

/// Read a JSON-serialized compilation unit
pub fn read_tree(path: &Path) -> anyhow::Result<ast::File> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read tree: {}", path.display()))?;
    parse_tree(&text).with_context(|| format!("Invalid syntax tree: {}", path.display()))
}

/// Deserialize a compilation unit from JSON text
pub fn parse_tree(text: &str) -> anyhow::Result<ast::File> {
    Ok(serde_json::from_str(text)?)
}

/// Serialize a compilation unit to JSON text
pub fn write_tree(
    file: &ast::File,
    pretty: bool,
) -> anyhow::Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(file)?
    } else {
        serde_json::to_string(file)?
    };
    Ok(text)
}
