//! 泛型声明、实例化点与去重登记表
//!
//! 单态化过程中的数据模型

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::fmt;

use super::error::{MonoError, MonoResult};
use crate::frontend::ast::{Expr, Ident, TypeParamList};
use crate::util::span::Span;

/// 具体类型实参：简单名 `int` 或限定名 `pkg.Type`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeArg {
    Name(String),
    Qualified { pkg: String, name: String },
}

impl TypeArg {
    /// 从实参表达式解析
    pub fn from_expr(expr: &Expr) -> MonoResult<TypeArg> {
        match expr {
            Expr::Ident(ident) if ident.type_args.is_none() => Ok(TypeArg::Name(ident.name.clone())),
            Expr::Selector { x, sel, .. } if sel.type_args.is_none() => match x.as_ref() {
                Expr::Ident(pkg) if pkg.type_args.is_none() => Ok(TypeArg::Qualified {
                    pkg: pkg.name.clone(),
                    name: sel.name.clone(),
                }),
                other => Err(unsupported(other)),
            },
            other => Err(unsupported(other)),
        }
    }

    /// 名称修饰片段：`.` 替换为 `_`
    pub fn mangled(&self) -> String {
        match self {
            TypeArg::Name(n) => n.replace('.', "_"),
            TypeArg::Qualified { pkg, name } => format!("{}_{}", pkg, name),
        }
    }

    /// 还原成表达式（替换形参时使用）
    pub fn to_expr(
        &self,
        span: Span,
    ) -> Expr {
        match self {
            TypeArg::Name(n) => Expr::ident(n.clone(), span),
            TypeArg::Qualified { pkg, name } => Expr::Selector {
                x: Box::new(Expr::ident(pkg.clone(), span)),
                sel: Ident::new(name.clone(), span),
                span,
            },
        }
    }

    /// 简单名（限定名返回 None）
    pub fn simple_name(&self) -> Option<&str> {
        match self {
            TypeArg::Name(n) => Some(n),
            TypeArg::Qualified { .. } => None,
        }
    }
}

impl fmt::Display for TypeArg {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            TypeArg::Name(n) => write!(f, "{}", n),
            TypeArg::Qualified { pkg, name } => write!(f, "{}.{}", pkg, name),
        }
    }
}

fn unsupported(expr: &Expr) -> MonoError {
    MonoError::UnsupportedTypeArg {
        found: describe(expr),
        span: expr.span(),
    }
}

fn describe(expr: &Expr) -> String {
    match expr {
        Expr::Ident(i) if i.type_args.is_some() => format!("instantiated type `{}::(...)`", i.name),
        Expr::Ident(i) => format!("`{}`", i.name),
        Expr::Selector { sel, .. } => format!("selector `....{}`", sel.name),
        Expr::BasicLit { value, .. } => format!("literal `{}`", value),
        Expr::Star { .. } => "pointer type".to_string(),
        Expr::ArrayType { .. } => "array or slice type".to_string(),
        Expr::MapType { .. } => "map type".to_string(),
        Expr::ChanType { .. } => "channel type".to_string(),
        Expr::InterfaceType(_) => "interface type".to_string(),
        Expr::FuncType(_) => "function type".to_string(),
        Expr::StructType(_) => "struct type".to_string(),
        _ => "expression".to_string(),
    }
}

/// 生成修饰名：`name__a1__a2...`
///
/// 下游按此名匹配生成的声明，格式不可更改。
pub fn mangle_name(
    name: &str,
    args: &[TypeArg],
) -> String {
    let mut out = String::from(name);
    for arg in args {
        out.push_str("__");
        out.push_str(&arg.mangled());
    }
    out
}

/// 泛型声明种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeclKind {
    Func,
    Struct,
}

/// 泛型声明
#[derive(Debug, Clone)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclKind,
    /// 形参（顺序决定按位替换）
    pub formal_params: Vec<String>,
    /// 形参列表位置
    pub span: Span,
    /// 子实例化：依赖本声明形参的内部引用，按被引用声明名分组
    pub children: IndexMap<String, Vec<ChildUsage>>,
}

impl Declaration {
    pub fn new(
        name: String,
        kind: DeclKind,
        params: &TypeParamList,
    ) -> Self {
        Declaration {
            name,
            kind,
            formal_params: params.names(),
            span: params.span,
            children: IndexMap::new(),
        }
    }

    pub fn add_child(
        &mut self,
        child: ChildUsage,
    ) {
        self.children
            .entry(child.usage.name.clone())
            .or_default()
            .push(child);
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// 逐个实参判断是否指向本声明的形参；`shadowed` 报告在引用处被内层绑定遮蔽的名字
    pub fn inherited_args(
        &self,
        usage: &Usage,
        shadowed: impl Fn(&str) -> bool,
    ) -> Vec<bool> {
        usage
            .concrete_args
            .iter()
            .map(|arg| {
                arg.simple_name()
                    .is_some_and(|n| self.formal_params.iter().any(|p| p == n) && !shadowed(n))
            })
            .collect()
    }

    /// 形参到实参的按位映射
    pub fn substitution(
        &self,
        args: &[TypeArg],
        span: Span,
    ) -> MonoResult<IndexMap<String, TypeArg>> {
        if args.len() != self.formal_params.len() {
            return Err(MonoError::Arity {
                name: self.name.clone(),
                expected: self.formal_params.len(),
                found: args.len(),
                span,
            });
        }
        Ok(self
            .formal_params
            .iter()
            .cloned()
            .zip(args.iter().cloned())
            .collect())
    }
}

/// 实例化点
#[derive(Debug, Clone, PartialEq)]
pub struct Usage {
    pub name: String,
    pub concrete_args: Vec<TypeArg>,
    pub span: Span,
}

impl Usage {
    /// 从带类型实参的标识符构造；无实参列表返回 None
    pub fn from_ident(ident: &Ident) -> MonoResult<Option<Usage>> {
        let Some(args) = &ident.type_args else {
            return Ok(None);
        };
        if args.list.is_empty() {
            return Err(MonoError::EmptyTypeArgs {
                name: ident.name.clone(),
                span: args.span,
            });
        }
        let concrete_args = args
            .list
            .iter()
            .map(TypeArg::from_expr)
            .collect::<MonoResult<Vec<_>>>()?;
        Ok(Some(Usage {
            name: ident.name.clone(),
            concrete_args,
            span: ident.span,
        }))
    }

    /// 去重键，同时也是生成声明的名字
    pub fn signature(&self) -> String {
        mangle_name(&self.name, &self.concrete_args)
    }
}

impl fmt::Display for Usage {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let args: Vec<String> = self.concrete_args.iter().map(|a| a.to_string()).collect();
        write!(f, "{}::({})", self.name, args.join(", "))
    }
}

/// 子实例化：泛型声明内部依赖其形参的引用
#[derive(Debug, Clone, PartialEq)]
pub struct ChildUsage {
    pub usage: Usage,
    /// 与实参一一对应；被内层绑定遮蔽的同名实参为 false，不参与替换
    pub inherited: Vec<bool>,
}

impl ChildUsage {
    pub fn signature(&self) -> String {
        self.usage.signature()
    }

    /// 用父实例化的映射替换继承来的实参
    pub fn resolve(
        &self,
        mapping: &IndexMap<String, TypeArg>,
    ) -> Usage {
        let concrete_args = self
            .usage
            .concrete_args
            .iter()
            .zip(&self.inherited)
            .map(|(arg, &inherited)| {
                let replaced = if inherited {
                    arg.simple_name().and_then(|n| mapping.get(n))
                } else {
                    None
                };
                replaced.unwrap_or(arg).clone()
            })
            .collect();
        Usage {
            name: self.usage.name.clone(),
            concrete_args,
            span: self.usage.span,
        }
    }
}

impl fmt::Display for ChildUsage {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        fmt::Display::fmt(&self.usage, f)
    }
}

/// 实例化登记表：声明名 -> 去重后的实例化列表（保持插入顺序）
#[derive(Debug, Default, Clone)]
pub struct UsageRegistry {
    usages: IndexMap<String, Vec<Usage>>,
    seen: IndexMap<String, IndexSet<String>>,
}

impl UsageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记实例化；签名重复时忽略。返回是否为新条目
    pub fn insert(
        &mut self,
        usage: Usage,
    ) -> bool {
        let seen = self.seen.entry(usage.name.clone()).or_default();
        if !seen.insert(usage.signature()) {
            return false;
        }
        self.usages
            .entry(usage.name.clone())
            .or_default()
            .push(usage);
        true
    }

    /// 某声明的全部实例化
    pub fn get(
        &self,
        name: &str,
    ) -> &[Usage] {
        self.usages.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(
        &self,
        name: &str,
    ) -> bool {
        self.usages.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<Usage>)> {
        self.usages.iter()
    }

    /// 实例化总数
    pub fn len(&self) -> usize {
        self.usages.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.usages.is_empty()
    }
}
