//! 编译器各个阶段
//!
//! 包含中间层的各个编译阶段。

pub mod mono;
