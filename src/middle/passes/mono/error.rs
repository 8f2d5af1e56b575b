//! 单态化错误
//!
//! 所有错误都是致命的：任一阶段出错即中止整个编译单元，不产生部分输出。

use crate::util::diagnostic::Diagnostic;
use crate::util::span::Span;
use thiserror::Error;

/// 单态化错误
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MonoError {
    /// 类型实参个数与形参个数不一致
    #[error("wrong number of type parameters for `{name}` (expected {expected} but got {found})")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
        span: Span,
    },

    /// 类型实参既不是简单名也不是 `pkg.Name`
    #[error("unsupported type argument expression: {found}")]
    UnsupportedTypeArg { found: String, span: Span },

    /// 泛型声明出现在非顶层位置
    #[error("generic declaration `{name}` is not allowed here: generic declarations must be top-level")]
    NestedGeneric { name: String, span: Span },

    /// 同名泛型声明重复
    #[error("generic declaration `{name}` is declared more than once")]
    DuplicateDeclaration { name: String, span: Span },

    /// `::()` 形参列表为空
    #[error("generic declaration `{name}` has an empty type parameter list")]
    EmptyTypeParams { name: String, span: Span },

    /// `::()` 实参列表为空
    #[error("reference to `{name}` has an empty type argument list")]
    EmptyTypeArgs { name: String, span: Span },

    /// 实例化数量超出上限
    #[error("instantiation limit of {limit} exceeded")]
    InstantiationLimit { limit: usize, span: Span },

    /// 内部不变量被破坏
    #[error("internal error: {message}")]
    Invariant { message: String, span: Span },
}

impl MonoError {
    /// 错误码
    pub fn code(&self) -> &'static str {
        match self {
            MonoError::Arity { .. } => "M0001",
            MonoError::UnsupportedTypeArg { .. } => "M0002",
            MonoError::NestedGeneric { .. } => "M0003",
            MonoError::DuplicateDeclaration { .. } => "M0004",
            MonoError::EmptyTypeParams { .. } => "M0005",
            MonoError::EmptyTypeArgs { .. } => "M0006",
            MonoError::InstantiationLimit { .. } => "M0007",
            MonoError::Invariant { .. } => "M0900",
        }
    }

    /// 出错位置
    pub fn span(&self) -> Span {
        match self {
            MonoError::Arity { span, .. }
            | MonoError::UnsupportedTypeArg { span, .. }
            | MonoError::NestedGeneric { span, .. }
            | MonoError::DuplicateDeclaration { span, .. }
            | MonoError::EmptyTypeParams { span, .. }
            | MonoError::EmptyTypeArgs { span, .. }
            | MonoError::InstantiationLimit { span, .. }
            | MonoError::Invariant { span, .. } => *span,
        }
    }

    /// 修复建议
    pub fn help(&self) -> String {
        match self {
            MonoError::Arity { expected, .. } => {
                format!("supply exactly {} concrete type argument(s)", expected)
            }
            MonoError::UnsupportedTypeArg { .. } => {
                "type arguments must be a type name such as `int` or `pkg.Type`".to_string()
            }
            MonoError::NestedGeneric { .. } => {
                "move the generic declaration to the top level of the file".to_string()
            }
            MonoError::DuplicateDeclaration { .. } => {
                "rename one of the declarations".to_string()
            }
            MonoError::EmptyTypeParams { .. } | MonoError::EmptyTypeArgs { .. } => {
                "drop the empty `::()` list".to_string()
            }
            MonoError::InstantiationLimit { .. } => {
                "raise `transform.max_instantiations` in monomorph.toml".to_string()
            }
            MonoError::Invariant { .. } => String::new(),
        }
    }

    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        MonoError::Invariant {
            message: message.into(),
            span: Span::dummy(),
        }
    }

    /// 转换为可渲染的诊断
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(
            self.code().to_string(),
            self.to_string(),
            self.help(),
            Some(self.span()),
        )
    }
}

/// 单态化结果
pub type MonoResult<T> = Result<T, MonoError>;
