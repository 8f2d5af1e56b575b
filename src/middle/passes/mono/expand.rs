//! 声明展开阶段
//!
//! 每个泛型声明按登记表中的实例化逐一克隆、替换形参、去掉形参列表并改名为修饰名，
//! 克隆按实例化顺序放在原声明的位置上，原泛型声明本身被移除。没有任何实例化的
//! 泛型声明直接丢弃。

use indexmap::IndexMap;
use tracing::{debug, trace};

use super::error::{MonoError, MonoResult};
use super::instance::{Declaration, Usage, UsageRegistry};
use super::subst::ScopedSubst;
use crate::frontend::ast::fold::Fold;
use crate::frontend::ast::{Decl, Expr, File, FuncDecl, Ident, TypeSpec};

/// 展开统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExpandStats {
    /// 生成的具体声明数
    pub generated: usize,
    /// 因无实例化而被丢弃的泛型声明
    pub dropped: Vec<String>,
    /// 被替换的形参引用数
    pub substituted: usize,
}

/// 声明展开器
pub struct Expander<'a> {
    decls: &'a IndexMap<String, Declaration>,
    registry: &'a UsageRegistry,
}

impl<'a> Expander<'a> {
    pub fn new(
        decls: &'a IndexMap<String, Declaration>,
        registry: &'a UsageRegistry,
    ) -> Self {
        Expander { decls, registry }
    }

    /// 重建顶层声明列表
    pub fn expand(
        &self,
        file: File,
    ) -> MonoResult<(File, ExpandStats)> {
        let mut stats = ExpandStats::default();
        let mut out = Vec::with_capacity(file.decls.len());

        for decl in file.decls {
            match decl {
                Decl::Func(func) if func.is_generic() => {
                    let generic = self.declaration(&func.name)?;
                    let usages = self.registry.get(&generic.name);
                    if usages.is_empty() {
                        stats.dropped.push(generic.name.clone());
                    }
                    for usage in usages {
                        out.push(Decl::Func(self.instantiate_func(generic, &func, usage, &mut stats)?));
                    }
                }
                Decl::Type(spec) if spec.generic_struct().is_some() => {
                    let generic = self.declaration(&spec.name)?;
                    let usages = self.registry.get(&generic.name);
                    if usages.is_empty() {
                        stats.dropped.push(generic.name.clone());
                    }
                    for usage in usages {
                        out.push(Decl::Type(self.instantiate_struct(generic, &spec, usage, &mut stats)?));
                    }
                }
                other => out.push(other),
            }
        }

        debug!(
            generated = stats.generated,
            dropped = stats.dropped.len(),
            substituted = stats.substituted,
            "expanded generic declarations"
        );
        Ok((
            File {
                decls: out,
                ..file
            },
            stats,
        ))
    }

    fn declaration(
        &self,
        name: &Ident,
    ) -> MonoResult<&'a Declaration> {
        self.decls.get(&name.name).ok_or_else(|| MonoError::Invariant {
            message: format!("generic declaration `{}` was not collected", name.name),
            span: name.span,
        })
    }

    fn instantiate_func(
        &self,
        generic: &Declaration,
        func: &FuncDecl,
        usage: &Usage,
        stats: &mut ExpandStats,
    ) -> MonoResult<FuncDecl> {
        let mapping = generic.substitution(&usage.concrete_args, usage.span)?;
        let mut subst = ScopedSubst::new(&mapping);
        let mut concrete = subst.fold_func_decl(func.clone())?;
        concrete.type_params = None;
        concrete.name = Ident::new(usage.signature(), func.name.span);

        trace!(generic = %generic.name, concrete = %concrete.name.name, "instantiate func");
        stats.generated += 1;
        stats.substituted += subst.replaced();
        Ok(concrete)
    }

    fn instantiate_struct(
        &self,
        generic: &Declaration,
        spec: &TypeSpec,
        usage: &Usage,
        stats: &mut ExpandStats,
    ) -> MonoResult<TypeSpec> {
        let mapping = generic.substitution(&usage.concrete_args, usage.span)?;
        let mut subst = ScopedSubst::new(&mapping);
        let mut concrete = subst.fold_type_spec(spec.clone())?;
        match &mut concrete.ty {
            Expr::StructType(st) => st.type_params = None,
            _ => {
                return Err(MonoError::Invariant {
                    message: format!("`{}` is no longer a struct type after substitution", generic.name),
                    span: spec.span,
                })
            }
        }
        concrete.name = Ident::new(usage.signature(), spec.name.span);

        trace!(generic = %generic.name, concrete = %concrete.name.name, "instantiate struct");
        stats.generated += 1;
        stats.substituted += subst.replaced();
        Ok(concrete)
    }
}
