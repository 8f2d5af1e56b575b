//! 诊断数据结构
//!
//! `message` 与 `help` 在构造时即已渲染完成。单态化没有警告级别：检测到的问题都是致命错误。

use crate::util::span::Span;

/// 诊断信息
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// 错误码
    pub code: String,
    /// 完整消息
    pub message: String,
    /// 帮助信息（可为空）
    pub help: String,
    /// 位置信息
    pub span: Option<Span>,
}

impl Diagnostic {
    /// 创建错误诊断
    pub fn error(
        code: String,
        message: String,
        help: String,
        span: Option<Span>,
    ) -> Self {
        Self {
            code,
            message,
            help,
            span,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "error[{}]: {}", self.code, self.message)
    }
}
