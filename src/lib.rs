//! monomorph - monomorphization for a Go-shaped language with generics
//!
//! Expands generic functions and generic struct types into one concrete declaration per
//! distinct type-argument list used in the compilation unit, and rewrites every reference to
//! name the concrete declaration.
//!
//! # Example
//!
//! ```text
//! type Box struct::(T) { val T }          type Box__int struct { val int }
//! var b Box::(int)                   =>   var b Box__int
//! ```
//!
//! Generated names follow `Name__arg1__arg2...`, with `.` in qualified arguments replaced
//! by `_` (`Box::(pkg.Type)` becomes `Box__pkg_Type`).

#![warn(rust_2018_idioms)]

pub mod frontend;
pub mod middle;
pub mod util;

// Re-exports
pub use anyhow::{Context, Result};
pub use frontend::ast;
pub use middle::passes::mono::{
    mangle_name, monomorphize, InstantiationPlan, MonoError, MonoStats, Monomorphizer,
};

use std::path::Path;
use tracing::debug;

use crate::util::config::MonoConfig;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tool name
pub const NAME: &str = "monomorph";

/// Monomorphize a JSON-serialized tree file and return the output JSON
///
/// # Example
///
/// ```no_run
/// use monomorph::{expand_file, Result};
/// use monomorph::util::config::MonoConfig;
///
/// fn main() -> Result<()> {
///     let json = expand_file("main.json".as_ref(), &MonoConfig::default())?;
///     println!("{}", json);
///     Ok(())
/// }
/// ```
pub fn expand_file(
    path: &Path,
    config: &MonoConfig,
) -> Result<String> {
    debug!("expanding {}", path.display());
    let file = frontend::read_tree(path)?;
    let (file, stats) = Monomorphizer::with_config(config.transform.clone()).run(file)?;
    debug!(?stats, "transform finished");
    frontend::write_tree(&file, config.output.pretty)
}
