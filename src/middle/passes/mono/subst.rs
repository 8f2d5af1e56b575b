//! 作用域感知的形参替换
//!
//! 在克隆出的声明上把形参名替换成具体实参。遍历时维护词法作用域栈，只有最近绑定
//! 就是形参本身的标识符才会被替换；内层作用域重新声明的同名变量、类型或参数保持原样。
//! 字段名、选择子与结构体字面量的键不是引用，不参与替换。

use indexmap::IndexMap;
use std::collections::HashSet;

use super::error::MonoError;
use super::instance::TypeArg;
use crate::frontend::ast::fold::Fold;
use crate::frontend::ast::{Expr, Ident};

/// 形参替换器
pub struct ScopedSubst<'m> {
    mapping: &'m IndexMap<String, TypeArg>,
    /// 局部作用域栈；形参所在的声明作用域不入栈
    scopes: Vec<HashSet<String>>,
    /// 已替换的标识符数量
    replaced: usize,
}

impl<'m> ScopedSubst<'m> {
    pub fn new(mapping: &'m IndexMap<String, TypeArg>) -> Self {
        ScopedSubst {
            mapping,
            scopes: Vec::new(),
            replaced: 0,
        }
    }

    pub fn replaced(&self) -> usize {
        self.replaced
    }

    fn is_shadowed(
        &self,
        name: &str,
    ) -> bool {
        self.scopes.iter().rev().any(|s| s.contains(name))
    }
}

impl Fold for ScopedSubst<'_> {
    type Error = MonoError;

    fn push_scope(&mut self) {
        self.scopes.push(HashSet::new());
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    fn bind(
        &mut self,
        name: &str,
    ) {
        // 只关心与形参同名的绑定
        if !self.mapping.contains_key(name) {
            return;
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string());
        }
    }

    fn fold_ref(
        &mut self,
        ident: Ident,
    ) -> Result<Expr, MonoError> {
        if ident.type_args.is_none() && !self.is_shadowed(&ident.name) {
            if let Some(arg) = self.mapping.get(&ident.name) {
                self.replaced += 1;
                return Ok(arg.to_expr(ident.span));
            }
        }
        Ok(Expr::Ident(self.fold_ident(ident)?))
    }
}
