//! Read-only tree walk
//!
//! Every `visit_*` method defaults to the matching `walk_*` function, so an implementor only
//! overrides the nodes it cares about and calls `walk_*` itself when it still wants the
//! children visited.
//!
//! Scopes are reported through `push_scope` / `bind` / `pop_scope` in the same order as the
//! owned walk in [`super::fold`], so a read-only pass resolves a name to the same binding that
//! a later rebuild will.

use super::*;

pub trait Visitor {
    type Error;

    fn push_scope(&mut self) {}

    fn pop_scope(&mut self) {}

    fn bind(
        &mut self,
        _name: &str,
    ) {
    }

    fn visit_file(
        &mut self,
        file: &File,
    ) -> Result<(), Self::Error> {
        walk_file(self, file)
    }

    fn visit_decl(
        &mut self,
        decl: &Decl,
    ) -> Result<(), Self::Error> {
        walk_decl(self, decl)
    }

    fn visit_func_decl(
        &mut self,
        func: &FuncDecl,
    ) -> Result<(), Self::Error> {
        walk_func_decl(self, func)
    }

    fn visit_type_spec(
        &mut self,
        spec: &TypeSpec,
    ) -> Result<(), Self::Error> {
        walk_type_spec(self, spec)
    }

    fn visit_value_spec(
        &mut self,
        spec: &ValueSpec,
    ) -> Result<(), Self::Error> {
        walk_value_spec(self, spec)
    }

    fn visit_type_params(
        &mut self,
        params: &TypeParamList,
    ) -> Result<(), Self::Error> {
        for name in &params.names {
            self.visit_ident(name)?;
        }
        Ok(())
    }

    fn visit_field_list(
        &mut self,
        list: &FieldList,
    ) -> Result<(), Self::Error> {
        walk_field_list(self, list)
    }

    fn visit_func_type(
        &mut self,
        ty: &FuncType,
    ) -> Result<(), Self::Error> {
        walk_func_type(self, ty)
    }

    fn visit_struct_type(
        &mut self,
        ty: &StructType,
    ) -> Result<(), Self::Error> {
        walk_struct_type(self, ty)
    }

    fn visit_block(
        &mut self,
        block: &Block,
    ) -> Result<(), Self::Error> {
        self.push_scope();
        for stmt in &block.stmts {
            self.visit_stmt(stmt)?;
        }
        self.pop_scope();
        Ok(())
    }

    fn visit_stmt(
        &mut self,
        stmt: &Stmt,
    ) -> Result<(), Self::Error> {
        walk_stmt(self, stmt)
    }

    fn visit_expr(
        &mut self,
        expr: &Expr,
    ) -> Result<(), Self::Error> {
        walk_expr(self, expr)
    }

    fn visit_ident(
        &mut self,
        ident: &Ident,
    ) -> Result<(), Self::Error> {
        walk_ident(self, ident)
    }
}

pub fn walk_file<V: Visitor + ?Sized>(
    v: &mut V,
    file: &File,
) -> Result<(), V::Error> {
    v.visit_ident(&file.package)?;
    for decl in &file.decls {
        v.visit_decl(decl)?;
    }
    Ok(())
}

pub fn walk_decl<V: Visitor + ?Sized>(
    v: &mut V,
    decl: &Decl,
) -> Result<(), V::Error> {
    match decl {
        Decl::Func(func) => v.visit_func_decl(func),
        Decl::Type(spec) => v.visit_type_spec(spec),
        Decl::Var(spec) | Decl::Const(spec) => v.visit_value_spec(spec),
    }
}

pub fn walk_func_decl<V: Visitor + ?Sized>(
    v: &mut V,
    func: &FuncDecl,
) -> Result<(), V::Error> {
    v.push_scope();
    if let Some(tp) = &func.type_params {
        v.visit_type_params(tp)?;
    }
    if let Some(recv) = &func.recv {
        v.visit_field_list(recv)?;
    }
    v.visit_ident(&func.name)?;
    v.visit_func_type(&func.ty)?;
    bind_fields(v, func.recv.as_ref());
    bind_fields(v, Some(&func.ty.params));
    bind_fields(v, func.ty.results.as_ref());
    if let Some(body) = &func.body {
        v.visit_block(body)?;
    }
    v.pop_scope();
    Ok(())
}

fn bind_fields<V: Visitor + ?Sized>(
    v: &mut V,
    list: Option<&FieldList>,
) {
    if let Some(list) = list {
        for name in list.bound_names() {
            v.bind(&name.name);
        }
    }
}

fn bind_defined<V: Visitor + ?Sized>(
    v: &mut V,
    lhs: &[Expr],
) {
    for e in lhs {
        if let Expr::Ident(ident) = e {
            v.bind(&ident.name);
        }
    }
}

pub fn walk_type_spec<V: Visitor + ?Sized>(
    v: &mut V,
    spec: &TypeSpec,
) -> Result<(), V::Error> {
    v.visit_ident(&spec.name)?;
    v.visit_expr(&spec.ty)
}

pub fn walk_value_spec<V: Visitor + ?Sized>(
    v: &mut V,
    spec: &ValueSpec,
) -> Result<(), V::Error> {
    for name in &spec.names {
        v.visit_ident(name)?;
    }
    if let Some(ty) = &spec.ty {
        v.visit_expr(ty)?;
    }
    for value in &spec.values {
        v.visit_expr(value)?;
    }
    Ok(())
}

pub fn walk_field_list<V: Visitor + ?Sized>(
    v: &mut V,
    list: &FieldList,
) -> Result<(), V::Error> {
    for field in &list.list {
        for name in &field.names {
            v.visit_ident(name)?;
        }
        v.visit_expr(&field.ty)?;
    }
    Ok(())
}

pub fn walk_func_type<V: Visitor + ?Sized>(
    v: &mut V,
    ty: &FuncType,
) -> Result<(), V::Error> {
    v.visit_field_list(&ty.params)?;
    if let Some(results) = &ty.results {
        v.visit_field_list(results)?;
    }
    Ok(())
}

pub fn walk_struct_type<V: Visitor + ?Sized>(
    v: &mut V,
    ty: &StructType,
) -> Result<(), V::Error> {
    if let Some(tp) = &ty.type_params {
        v.visit_type_params(tp)?;
    }
    v.visit_field_list(&ty.fields)
}

pub fn walk_ident<V: Visitor + ?Sized>(
    v: &mut V,
    ident: &Ident,
) -> Result<(), V::Error> {
    if let Some(args) = &ident.type_args {
        for arg in &args.list {
            v.visit_expr(arg)?;
        }
    }
    Ok(())
}

fn walk_opt_stmt<V: Visitor + ?Sized>(
    v: &mut V,
    stmt: Option<&Stmt>,
) -> Result<(), V::Error> {
    match stmt {
        Some(stmt) => v.visit_stmt(stmt),
        None => Ok(()),
    }
}

fn walk_opt_expr<V: Visitor + ?Sized>(
    v: &mut V,
    expr: Option<&Expr>,
) -> Result<(), V::Error> {
    match expr {
        Some(expr) => v.visit_expr(expr),
        None => Ok(()),
    }
}

fn walk_stmts<V: Visitor + ?Sized>(
    v: &mut V,
    stmts: &[Stmt],
) -> Result<(), V::Error> {
    for s in stmts {
        v.visit_stmt(s)?;
    }
    Ok(())
}

pub fn walk_stmt<V: Visitor + ?Sized>(
    v: &mut V,
    stmt: &Stmt,
) -> Result<(), V::Error> {
    match stmt {
        Stmt::Decl(LocalDecl::Type(spec)) => {
            v.bind(&spec.name.name);
            v.visit_type_spec(spec)
        }
        Stmt::Decl(LocalDecl::Var(spec)) | Stmt::Decl(LocalDecl::Const(spec)) => {
            v.visit_value_spec(spec)?;
            for name in &spec.names {
                v.bind(&name.name);
            }
            Ok(())
        }
        Stmt::Expr(expr) => v.visit_expr(expr),
        Stmt::Assign { lhs, op, rhs, .. } => {
            for e in rhs {
                v.visit_expr(e)?;
            }
            if *op == AssignOp::Define {
                bind_defined(v, lhs);
            }
            for e in lhs {
                v.visit_expr(e)?;
            }
            Ok(())
        }
        Stmt::Send { chan, value, .. } => {
            v.visit_expr(chan)?;
            v.visit_expr(value)
        }
        Stmt::Go { call, .. } | Stmt::Defer { call, .. } => v.visit_expr(call),
        Stmt::Labeled { label, stmt, .. } => {
            v.visit_ident(label)?;
            v.visit_stmt(stmt)
        }
        Stmt::IncDec { x, .. } => v.visit_expr(x),
        Stmt::Return { results, .. } => {
            for e in results {
                v.visit_expr(e)?;
            }
            Ok(())
        }
        Stmt::Branch { label, .. } => match label {
            Some(label) => v.visit_ident(label),
            None => Ok(()),
        },
        Stmt::Block(block) => v.visit_block(block),
        Stmt::If {
            init,
            cond,
            then,
            els,
            ..
        } => {
            v.push_scope();
            walk_opt_stmt(v, init.as_deref())?;
            v.visit_expr(cond)?;
            v.visit_block(then)?;
            walk_opt_stmt(v, els.as_deref())?;
            v.pop_scope();
            Ok(())
        }
        Stmt::For {
            init,
            cond,
            post,
            body,
            ..
        } => {
            v.push_scope();
            walk_opt_stmt(v, init.as_deref())?;
            walk_opt_expr(v, cond.as_ref())?;
            walk_opt_stmt(v, post.as_deref())?;
            v.visit_block(body)?;
            v.pop_scope();
            Ok(())
        }
        Stmt::Range {
            key,
            value,
            define,
            x,
            body,
            ..
        } => {
            v.visit_expr(x)?;
            v.push_scope();
            if *define {
                for e in key.iter().chain(value.iter()) {
                    if let Expr::Ident(ident) = e {
                        v.bind(&ident.name);
                    }
                }
            }
            walk_opt_expr(v, key.as_ref())?;
            walk_opt_expr(v, value.as_ref())?;
            v.visit_block(body)?;
            v.pop_scope();
            Ok(())
        }
        Stmt::Switch {
            init, tag, cases, ..
        } => {
            v.push_scope();
            walk_opt_stmt(v, init.as_deref())?;
            walk_opt_expr(v, tag.as_ref())?;
            for case in cases {
                for e in &case.exprs {
                    v.visit_expr(e)?;
                }
                v.push_scope();
                walk_stmts(v, &case.body)?;
                v.pop_scope();
            }
            v.pop_scope();
            Ok(())
        }
        Stmt::TypeSwitch {
            init,
            bind,
            x,
            cases,
            ..
        } => {
            v.push_scope();
            walk_opt_stmt(v, init.as_deref())?;
            v.visit_expr(x)?;
            if let Some(bind) = bind {
                v.visit_ident(bind)?;
            }
            for case in cases {
                for e in &case.exprs {
                    v.visit_expr(e)?;
                }
                v.push_scope();
                if let Some(bind) = bind {
                    v.bind(&bind.name);
                }
                walk_stmts(v, &case.body)?;
                v.pop_scope();
            }
            v.pop_scope();
            Ok(())
        }
        Stmt::Select { cases, .. } => {
            for case in cases {
                v.push_scope();
                walk_opt_stmt(v, case.comm.as_deref())?;
                walk_stmts(v, &case.body)?;
                v.pop_scope();
            }
            Ok(())
        }
    }
}

pub fn walk_expr<V: Visitor + ?Sized>(
    v: &mut V,
    expr: &Expr,
) -> Result<(), V::Error> {
    match expr {
        Expr::Ident(ident) => v.visit_ident(ident),
        Expr::BasicLit { .. } => Ok(()),
        Expr::CompositeLit { ty, elts, .. } => {
            walk_opt_expr(v, ty.as_deref())?;
            for e in elts {
                v.visit_expr(e)?;
            }
            Ok(())
        }
        Expr::FuncLit { ty, body, .. } => {
            v.push_scope();
            v.visit_func_type(ty)?;
            bind_fields(v, Some(&ty.params));
            bind_fields(v, ty.results.as_ref());
            v.visit_block(body)?;
            v.pop_scope();
            Ok(())
        }
        Expr::Paren { expr, .. } => v.visit_expr(expr),
        Expr::Selector { x, sel, .. } => {
            v.visit_expr(x)?;
            v.visit_ident(sel)
        }
        Expr::Index { x, index, .. } => {
            v.visit_expr(x)?;
            v.visit_expr(index)
        }
        Expr::Slice {
            x, low, high, max, ..
        } => {
            v.visit_expr(x)?;
            walk_opt_expr(v, low.as_deref())?;
            walk_opt_expr(v, high.as_deref())?;
            walk_opt_expr(v, max.as_deref())
        }
        Expr::TypeAssert { x, ty, .. } => {
            v.visit_expr(x)?;
            walk_opt_expr(v, ty.as_deref())
        }
        Expr::Star { x, .. } | Expr::Unary { x, .. } => v.visit_expr(x),
        Expr::Binary { x, y, .. } => {
            v.visit_expr(x)?;
            v.visit_expr(y)
        }
        Expr::Call { func, args, .. } => {
            v.visit_expr(func)?;
            for a in args {
                v.visit_expr(a)?;
            }
            Ok(())
        }
        Expr::KeyValue { key, value, .. } => {
            v.visit_expr(key)?;
            v.visit_expr(value)
        }
        Expr::ArrayType { len, elt, .. } => {
            walk_opt_expr(v, len.as_deref())?;
            v.visit_expr(elt)
        }
        Expr::MapType { key, value, .. } => {
            v.visit_expr(key)?;
            v.visit_expr(value)
        }
        Expr::ChanType { value, .. } => v.visit_expr(value),
        Expr::Ellipsis { elt, .. } => walk_opt_expr(v, elt.as_deref()),
        Expr::FuncType(ft) => v.visit_func_type(ft),
        Expr::StructType(st) => v.visit_struct_type(st),
        Expr::InterfaceType(it) => v.visit_field_list(&it.methods),
    }
}
