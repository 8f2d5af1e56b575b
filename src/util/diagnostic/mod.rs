//! 统一诊断系统
//!
//! - [`error`] - 诊断数据结构
//! - [`emitter`] - 文本渲染
//!
//! # 示例
//!
//! ```ignore
//! use monomorph::util::diagnostic::TextEmitter;
//!
//! let output = TextEmitter::new().render_with_source(&err.to_diagnostic(), Some(&source_file));
//! eprint!("{}", output);
//! ```

pub mod emitter;
pub mod error;

pub use emitter::{EmitterConfig, TextEmitter};
pub use error::Diagnostic;
