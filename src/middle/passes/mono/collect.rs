//! 收集阶段
//!
//! 单次遍历语法树，登记全部泛型声明与实例化点。泛型声明内部的引用若依赖该声明的形参，
//! 记为其子实例化，留待继承解析阶段按父实例化展开；其余引用已经是具体的，直接登记。
//! 是否依赖形参按词法作用域判断：被内层绑定遮蔽的同名实参不算，与替换阶段的判断一致。
//! 本阶段不修改语法树。

use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::{debug, trace};

use super::error::{MonoError, MonoResult};
use super::instance::{ChildUsage, DeclKind, Declaration, Usage, UsageRegistry};
use crate::frontend::ast::visit::{self, Visitor};
use crate::frontend::ast::{Decl, File, FuncDecl, Ident, StructType, TypeParamList, TypeSpec};
use crate::util::span::Span;

/// 收集器
pub struct Collector<'a> {
    decls: &'a mut IndexMap<String, Declaration>,
    registry: &'a mut UsageRegistry,
    /// 当前所在的泛型声明
    parent: Option<String>,
    /// 局部作用域栈
    scopes: Vec<HashSet<String>>,
}

impl<'a> Collector<'a> {
    pub fn new(
        decls: &'a mut IndexMap<String, Declaration>,
        registry: &'a mut UsageRegistry,
    ) -> Self {
        Collector {
            decls,
            registry,
            parent: None,
            scopes: Vec::new(),
        }
    }

    /// 收集整个编译单元，结束后校验实参个数
    pub fn collect(
        mut self,
        file: &File,
    ) -> MonoResult<()> {
        self.visit_file(file)?;
        self.check_arity()?;
        debug!(
            declarations = self.decls.len(),
            usages = self.registry.len(),
            "collected generic declarations and usages"
        );
        Ok(())
    }

    fn register(
        &mut self,
        decl: Declaration,
        name_span: Span,
    ) -> MonoResult<()> {
        if self.decls.contains_key(&decl.name) {
            return Err(MonoError::DuplicateDeclaration {
                name: decl.name,
                span: name_span,
            });
        }
        trace!(name = %decl.name, params = ?decl.formal_params, "generic declaration");
        self.decls.insert(decl.name.clone(), decl);
        Ok(())
    }

    fn check_params(
        name: &Ident,
        params: &TypeParamList,
    ) -> MonoResult<()> {
        if params.names.is_empty() {
            return Err(MonoError::EmptyTypeParams {
                name: name.name.clone(),
                span: params.span,
            });
        }
        Ok(())
    }

    fn collect_func(
        &mut self,
        func: &FuncDecl,
        params: &TypeParamList,
    ) -> MonoResult<()> {
        Self::check_params(&func.name, params)?;
        let decl = Declaration::new(func.name.name.clone(), DeclKind::Func, params);
        self.register(decl, func.name.span)?;

        // 接收者、签名与函数体中的引用可能依赖本声明的形参，例如：
        //
        //   func::(T) (b Box::(T)) Get() T { return b.val }
        let outer = self.parent.replace(func.name.name.clone());
        visit::walk_func_decl(self, func)?;
        self.parent = outer;
        Ok(())
    }

    fn collect_struct(
        &mut self,
        spec: &TypeSpec,
        st: &StructType,
        params: &TypeParamList,
    ) -> MonoResult<()> {
        Self::check_params(&spec.name, params)?;
        let decl = Declaration::new(spec.name.name.clone(), DeclKind::Struct, params);
        self.register(decl, spec.name.span)?;

        let outer = self.parent.replace(spec.name.name.clone());
        self.visit_type_params(params)?;
        self.visit_field_list(&st.fields)?;
        self.parent = outer;
        Ok(())
    }

    fn record(
        &mut self,
        usage: Usage,
    ) {
        let scopes = &self.scopes;
        if let Some(parent) = self.parent.as_ref().and_then(|p| self.decls.get_mut(p)) {
            let inherited = parent.inherited_args(&usage, |n| scopes.iter().any(|s| s.contains(n)));
            if inherited.contains(&true) {
                trace!(parent = %parent.name, usage = %usage, "child usage");
                parent.add_child(ChildUsage { usage, inherited });
                return;
            }
        }
        trace!(usage = %usage, "usage");
        self.registry.insert(usage);
    }

    /// 所有已知声明的实例化都必须与形参个数一致
    fn check_arity(&self) -> MonoResult<()> {
        let children = self
            .decls
            .values()
            .flat_map(|d| d.children.values().flatten())
            .map(|c| &c.usage);
        let top_level = self.registry.iter().flat_map(|(_, usages)| usages.iter());
        for usage in top_level.chain(children) {
            if let Some(decl) = self.decls.get(&usage.name) {
                decl.substitution(&usage.concrete_args, usage.span)?;
            }
        }
        Ok(())
    }
}

impl Visitor for Collector<'_> {
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
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string());
        }
    }

    fn visit_decl(
        &mut self,
        decl: &Decl,
    ) -> MonoResult<()> {
        match decl {
            Decl::Func(func) => match &func.type_params {
                Some(params) => self.collect_func(func, params),
                None => visit::walk_func_decl(self, func),
            },
            Decl::Type(spec) => match spec.generic_struct() {
                Some(st) => {
                    let params = st
                        .type_params
                        .as_ref()
                        .ok_or_else(|| MonoError::invariant("generic struct without type parameters"))?;
                    self.collect_struct(spec, st, params)
                }
                None => visit::walk_type_spec(self, spec),
            },
            other => visit::walk_decl(self, other),
        }
    }

    fn visit_type_spec(
        &mut self,
        spec: &TypeSpec,
    ) -> MonoResult<()> {
        // 顶层泛型结构体已在 visit_decl 中处理，能走到这里的都是嵌套声明
        if spec.generic_struct().is_some() {
            return Err(MonoError::NestedGeneric {
                name: spec.name.name.clone(),
                span: spec.name.span,
            });
        }
        visit::walk_type_spec(self, spec)
    }

    fn visit_struct_type(
        &mut self,
        ty: &StructType,
    ) -> MonoResult<()> {
        if ty.type_params.is_some() {
            return Err(MonoError::NestedGeneric {
                name: "struct".to_string(),
                span: ty.span,
            });
        }
        visit::walk_struct_type(self, ty)
    }

    fn visit_ident(
        &mut self,
        ident: &Ident,
    ) -> MonoResult<()> {
        if let Some(usage) = Usage::from_ident(ident)? {
            self.record(usage);
        }
        visit::walk_ident(self, ident)
    }
}
