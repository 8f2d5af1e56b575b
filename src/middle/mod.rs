//! Middle layer: tree-to-tree passes run between parsing and type checking

pub mod passes;

pub use passes::mono::{monomorphize, MonoError, MonoStats, Monomorphizer};
