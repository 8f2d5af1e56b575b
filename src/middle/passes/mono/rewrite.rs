//! 引用改写阶段
//!
//! 展开之后再遍历一次整棵树，把仍带类型实参的标识符改写为以修饰名命名的普通标识符，
//! 生成的具体声明内部也不例外。修饰名找不到对应声明的情况留给后续编译阶段报告。

use tracing::debug;

use super::error::{MonoError, MonoResult};
use super::instance::Usage;
use crate::frontend::ast::fold::{self, Fold};
use crate::frontend::ast::visit::{self, Visitor};
use crate::frontend::ast::{File, FuncDecl, Ident, StructType};

/// 引用改写器
#[derive(Debug, Default)]
pub struct ReferenceRewriter {
    rewritten: usize,
}

impl ReferenceRewriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 改写整个编译单元，返回新树与改写次数
    pub fn rewrite(
        mut self,
        file: File,
    ) -> MonoResult<(File, usize)> {
        let file = self.fold_file(file)?;
        debug!(rewritten = self.rewritten, "rewrote generic references");
        Ok((file, self.rewritten))
    }
}

impl Fold for ReferenceRewriter {
    type Error = MonoError;

    fn fold_ident(
        &mut self,
        ident: Ident,
    ) -> MonoResult<Ident> {
        match Usage::from_ident(&ident)? {
            Some(usage) => {
                self.rewritten += 1;
                Ok(Ident::new(usage.signature(), ident.span))
            }
            None => fold::walk_ident(self, ident),
        }
    }
}

/// 校验输出中不再有任何形参列表或实参列表
pub fn verify_concrete(file: &File) -> MonoResult<()> {
    ConcreteCheck.visit_file(file)
}

struct ConcreteCheck;

impl Visitor for ConcreteCheck {
    type Error = MonoError;

    fn visit_func_decl(
        &mut self,
        func: &FuncDecl,
    ) -> MonoResult<()> {
        if let Some(params) = &func.type_params {
            return Err(MonoError::Invariant {
                message: format!("function `{}` is still generic after expansion", func.name.name),
                span: params.span,
            });
        }
        visit::walk_func_decl(self, func)
    }

    fn visit_struct_type(
        &mut self,
        ty: &StructType,
    ) -> MonoResult<()> {
        if let Some(params) = &ty.type_params {
            return Err(MonoError::Invariant {
                message: "struct type is still generic after expansion".to_string(),
                span: params.span,
            });
        }
        visit::walk_struct_type(self, ty)
    }

    fn visit_ident(
        &mut self,
        ident: &Ident,
    ) -> MonoResult<()> {
        if let Some(args) = &ident.type_args {
            return Err(MonoError::Invariant {
                message: format!("reference `{}` still carries type arguments", ident.name),
                span: args.span,
            });
        }
        Ok(())
    }
}
