//! Owned tree rebuild
//!
//! A `Fold` consumes a subtree and returns its replacement, so passes rebuild the tree instead
//! of editing it behind a cursor. The default walkers also report lexical scopes through
//! `push_scope` / `bind` / `pop_scope`; folds that do not track names simply ignore them.
//!
//! Binding order follows Go's scoping rules:
//! - parameter, result and receiver names are bound after the signature, before the body;
//! - a local `type` name is bound before its type expression;
//! - local `var`/`const` and `:=` names are bound after their initializers;
//! - `if`, `for`, `switch`, `select`, `range`, case clauses and blocks open a scope;
//! - a type switch binding is declared in each clause, after the clause's case list.

use super::*;

pub trait Fold {
    type Error;

    fn push_scope(&mut self) {}

    fn pop_scope(&mut self) {}

    fn bind(
        &mut self,
        _name: &str,
    ) {
    }

    fn fold_file(
        &mut self,
        file: File,
    ) -> Result<File, Self::Error> {
        walk_file(self, file)
    }

    fn fold_decl(
        &mut self,
        decl: Decl,
    ) -> Result<Decl, Self::Error> {
        walk_decl(self, decl)
    }

    fn fold_func_decl(
        &mut self,
        func: FuncDecl,
    ) -> Result<FuncDecl, Self::Error> {
        walk_func_decl(self, func)
    }

    fn fold_type_spec(
        &mut self,
        spec: TypeSpec,
    ) -> Result<TypeSpec, Self::Error> {
        Ok(TypeSpec {
            name: self.fold_ident(spec.name)?,
            ty: self.fold_expr(spec.ty)?,
            span: spec.span,
        })
    }

    fn fold_value_spec(
        &mut self,
        spec: ValueSpec,
    ) -> Result<ValueSpec, Self::Error> {
        walk_value_spec(self, spec)
    }

    fn fold_type_params(
        &mut self,
        params: TypeParamList,
    ) -> Result<TypeParamList, Self::Error> {
        let names = params
            .names
            .into_iter()
            .map(|n| self.fold_ident(n))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TypeParamList {
            names,
            span: params.span,
        })
    }

    fn fold_field_list(
        &mut self,
        list: FieldList,
    ) -> Result<FieldList, Self::Error> {
        walk_field_list(self, list)
    }

    fn fold_func_type(
        &mut self,
        ty: FuncType,
    ) -> Result<FuncType, Self::Error> {
        Ok(FuncType {
            params: self.fold_field_list(ty.params)?,
            results: ty.results.map(|r| self.fold_field_list(r)).transpose()?,
            span: ty.span,
        })
    }

    fn fold_struct_type(
        &mut self,
        ty: StructType,
    ) -> Result<StructType, Self::Error> {
        Ok(StructType {
            type_params: ty
                .type_params
                .map(|tp| self.fold_type_params(tp))
                .transpose()?,
            fields: self.fold_field_list(ty.fields)?,
            span: ty.span,
        })
    }

    fn fold_block(
        &mut self,
        block: Block,
    ) -> Result<Block, Self::Error> {
        self.push_scope();
        let stmts = fold_stmts(self, block.stmts)?;
        self.pop_scope();
        Ok(Block {
            stmts,
            span: block.span,
        })
    }

    fn fold_stmt(
        &mut self,
        stmt: Stmt,
    ) -> Result<Stmt, Self::Error> {
        walk_stmt(self, stmt)
    }

    fn fold_expr(
        &mut self,
        expr: Expr,
    ) -> Result<Expr, Self::Error> {
        walk_expr(self, expr)
    }

    /// Identifier in reference position (`Expr::Ident`)
    fn fold_ref(
        &mut self,
        ident: Ident,
    ) -> Result<Expr, Self::Error> {
        Ok(Expr::Ident(self.fold_ident(ident)?))
    }

    /// Any identifier, including declared names, field names and selectors
    fn fold_ident(
        &mut self,
        ident: Ident,
    ) -> Result<Ident, Self::Error> {
        walk_ident(self, ident)
    }
}

pub fn walk_file<F: Fold + ?Sized>(
    f: &mut F,
    file: File,
) -> Result<File, F::Error> {
    let decls = file
        .decls
        .into_iter()
        .map(|d| f.fold_decl(d))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(File {
        package: file.package,
        imports: file.imports,
        decls,
        span: file.span,
    })
}

pub fn walk_decl<F: Fold + ?Sized>(
    f: &mut F,
    decl: Decl,
) -> Result<Decl, F::Error> {
    Ok(match decl {
        Decl::Func(func) => Decl::Func(f.fold_func_decl(func)?),
        Decl::Type(spec) => Decl::Type(f.fold_type_spec(spec)?),
        Decl::Var(spec) => Decl::Var(f.fold_value_spec(spec)?),
        Decl::Const(spec) => Decl::Const(f.fold_value_spec(spec)?),
    })
}

fn bind_fields<F: Fold + ?Sized>(
    f: &mut F,
    list: Option<&FieldList>,
) {
    if let Some(list) = list {
        for name in list.bound_names() {
            f.bind(&name.name);
        }
    }
}

pub fn walk_func_decl<F: Fold + ?Sized>(
    f: &mut F,
    func: FuncDecl,
) -> Result<FuncDecl, F::Error> {
    f.push_scope();
    let type_params = func
        .type_params
        .map(|tp| f.fold_type_params(tp))
        .transpose()?;
    let recv = func.recv.map(|r| f.fold_field_list(r)).transpose()?;
    let name = f.fold_ident(func.name)?;
    let ty = f.fold_func_type(func.ty)?;
    bind_fields(f, recv.as_ref());
    bind_fields(f, Some(&ty.params));
    bind_fields(f, ty.results.as_ref());
    let body = func.body.map(|b| f.fold_block(b)).transpose()?;
    f.pop_scope();
    Ok(FuncDecl {
        recv,
        name,
        type_params,
        ty,
        body,
        span: func.span,
    })
}

pub fn walk_value_spec<F: Fold + ?Sized>(
    f: &mut F,
    spec: ValueSpec,
) -> Result<ValueSpec, F::Error> {
    let ty = spec.ty.map(|t| f.fold_expr(t)).transpose()?;
    let values = fold_exprs(f, spec.values)?;
    let names = spec
        .names
        .into_iter()
        .map(|n| f.fold_ident(n))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ValueSpec {
        names,
        ty,
        values,
        span: spec.span,
    })
}

pub fn walk_field_list<F: Fold + ?Sized>(
    f: &mut F,
    list: FieldList,
) -> Result<FieldList, F::Error> {
    let mut out = Vec::with_capacity(list.list.len());
    for field in list.list {
        let names = field
            .names
            .into_iter()
            .map(|n| f.fold_ident(n))
            .collect::<Result<Vec<_>, _>>()?;
        out.push(Field {
            names,
            ty: f.fold_expr(field.ty)?,
            span: field.span,
        });
    }
    Ok(FieldList {
        list: out,
        span: list.span,
    })
}

pub fn walk_ident<F: Fold + ?Sized>(
    f: &mut F,
    ident: Ident,
) -> Result<Ident, F::Error> {
    let type_args = match ident.type_args {
        Some(args) => Some(TypeArgList {
            list: fold_exprs(f, args.list)?,
            span: args.span,
        }),
        None => None,
    };
    Ok(Ident {
        name: ident.name,
        type_args,
        span: ident.span,
    })
}

fn fold_exprs<F: Fold + ?Sized>(
    f: &mut F,
    exprs: Vec<Expr>,
) -> Result<Vec<Expr>, F::Error> {
    exprs.into_iter().map(|e| f.fold_expr(e)).collect()
}

fn fold_stmts<F: Fold + ?Sized>(
    f: &mut F,
    stmts: Vec<Stmt>,
) -> Result<Vec<Stmt>, F::Error> {
    stmts.into_iter().map(|s| f.fold_stmt(s)).collect()
}

fn fold_boxed_stmt<F: Fold + ?Sized>(
    f: &mut F,
    stmt: Option<Box<Stmt>>,
) -> Result<Option<Box<Stmt>>, F::Error> {
    match stmt {
        Some(s) => Ok(Some(Box::new(f.fold_stmt(*s)?))),
        None => Ok(None),
    }
}

fn bind_defined<F: Fold + ?Sized>(
    f: &mut F,
    lhs: &[Expr],
) {
    for e in lhs {
        if let Expr::Ident(ident) = e {
            f.bind(&ident.name);
        }
    }
}

pub fn walk_stmt<F: Fold + ?Sized>(
    f: &mut F,
    stmt: Stmt,
) -> Result<Stmt, F::Error> {
    Ok(match stmt {
        Stmt::Decl(LocalDecl::Type(spec)) => {
            f.bind(&spec.name.name);
            Stmt::Decl(LocalDecl::Type(f.fold_type_spec(spec)?))
        }
        Stmt::Decl(LocalDecl::Var(spec)) => {
            let spec = f.fold_value_spec(spec)?;
            for name in &spec.names {
                f.bind(&name.name);
            }
            Stmt::Decl(LocalDecl::Var(spec))
        }
        Stmt::Decl(LocalDecl::Const(spec)) => {
            let spec = f.fold_value_spec(spec)?;
            for name in &spec.names {
                f.bind(&name.name);
            }
            Stmt::Decl(LocalDecl::Const(spec))
        }
        Stmt::Expr(e) => Stmt::Expr(f.fold_expr(e)?),
        Stmt::Assign { lhs, op, rhs, span } => {
            let rhs = fold_exprs(f, rhs)?;
            if op == AssignOp::Define {
                bind_defined(f, &lhs);
            }
            Stmt::Assign {
                lhs: fold_exprs(f, lhs)?,
                op,
                rhs,
                span,
            }
        }
        Stmt::Send { chan, value, span } => Stmt::Send {
            chan: f.fold_expr(chan)?,
            value: f.fold_expr(value)?,
            span,
        },
        Stmt::Go { call, span } => Stmt::Go {
            call: f.fold_expr(call)?,
            span,
        },
        Stmt::Defer { call, span } => Stmt::Defer {
            call: f.fold_expr(call)?,
            span,
        },
        Stmt::Labeled { label, stmt, span } => Stmt::Labeled {
            label: f.fold_ident(label)?,
            stmt: Box::new(f.fold_stmt(*stmt)?),
            span,
        },
        Stmt::IncDec { x, inc, span } => Stmt::IncDec {
            x: f.fold_expr(x)?,
            inc,
            span,
        },
        Stmt::Return { results, span } => Stmt::Return {
            results: fold_exprs(f, results)?,
            span,
        },
        Stmt::Branch { kind, label, span } => Stmt::Branch {
            kind,
            label: label.map(|l| f.fold_ident(l)).transpose()?,
            span,
        },
        Stmt::Block(block) => Stmt::Block(f.fold_block(block)?),
        Stmt::If {
            init,
            cond,
            then,
            els,
            span,
        } => {
            f.push_scope();
            let init = fold_boxed_stmt(f, init)?;
            let cond = f.fold_expr(cond)?;
            let then = f.fold_block(then)?;
            let els = fold_boxed_stmt(f, els)?;
            f.pop_scope();
            Stmt::If {
                init,
                cond,
                then,
                els,
                span,
            }
        }
        Stmt::For {
            init,
            cond,
            post,
            body,
            span,
        } => {
            f.push_scope();
            let init = fold_boxed_stmt(f, init)?;
            let cond = cond.map(|c| f.fold_expr(c)).transpose()?;
            let post = fold_boxed_stmt(f, post)?;
            let body = f.fold_block(body)?;
            f.pop_scope();
            Stmt::For {
                init,
                cond,
                post,
                body,
                span,
            }
        }
        Stmt::Range {
            key,
            value,
            define,
            x,
            body,
            span,
        } => {
            let x = f.fold_expr(x)?;
            f.push_scope();
            if define {
                for e in key.iter().chain(value.iter()) {
                    if let Expr::Ident(ident) = e {
                        f.bind(&ident.name);
                    }
                }
            }
            let key = key.map(|k| f.fold_expr(k)).transpose()?;
            let value = value.map(|v| f.fold_expr(v)).transpose()?;
            let body = f.fold_block(body)?;
            f.pop_scope();
            Stmt::Range {
                key,
                value,
                define,
                x,
                body,
                span,
            }
        }
        Stmt::Switch {
            init,
            tag,
            cases,
            span,
        } => {
            f.push_scope();
            let init = fold_boxed_stmt(f, init)?;
            let tag = tag.map(|t| f.fold_expr(t)).transpose()?;
            let mut folded = Vec::with_capacity(cases.len());
            for case in cases {
                let exprs = fold_exprs(f, case.exprs)?;
                f.push_scope();
                let body = fold_stmts(f, case.body)?;
                f.pop_scope();
                folded.push(CaseClause {
                    exprs,
                    body,
                    span: case.span,
                });
            }
            f.pop_scope();
            Stmt::Switch {
                init,
                tag,
                cases: folded,
                span,
            }
        }
        Stmt::TypeSwitch {
            init,
            bind,
            x,
            cases,
            span,
        } => {
            f.push_scope();
            let init = fold_boxed_stmt(f, init)?;
            let x = f.fold_expr(x)?;
            let bind = bind.map(|b| f.fold_ident(b)).transpose()?;
            let mut folded = Vec::with_capacity(cases.len());
            for case in cases {
                let exprs = fold_exprs(f, case.exprs)?;
                f.push_scope();
                if let Some(bind) = &bind {
                    f.bind(&bind.name);
                }
                let body = fold_stmts(f, case.body)?;
                f.pop_scope();
                folded.push(CaseClause {
                    exprs,
                    body,
                    span: case.span,
                });
            }
            f.pop_scope();
            Stmt::TypeSwitch {
                init,
                bind,
                x,
                cases: folded,
                span,
            }
        }
        Stmt::Select { cases, span } => {
            let mut folded = Vec::with_capacity(cases.len());
            for case in cases {
                f.push_scope();
                let comm = fold_boxed_stmt(f, case.comm)?;
                let body = fold_stmts(f, case.body)?;
                f.pop_scope();
                folded.push(CommClause {
                    comm,
                    body,
                    span: case.span,
                });
            }
            Stmt::Select {
                cases: folded,
                span,
            }
        }
    })
}

fn fold_box<F: Fold + ?Sized>(
    f: &mut F,
    expr: Box<Expr>,
) -> Result<Box<Expr>, F::Error> {
    Ok(Box::new(f.fold_expr(*expr)?))
}

pub fn walk_expr<F: Fold + ?Sized>(
    f: &mut F,
    expr: Expr,
) -> Result<Expr, F::Error> {
    Ok(match expr {
        Expr::Ident(ident) => return f.fold_ref(ident),
        lit @ Expr::BasicLit { .. } => lit,
        Expr::CompositeLit { ty, elts, span } => Expr::CompositeLit {
            ty: ty.map(|t| fold_box(f, t)).transpose()?,
            elts: fold_exprs(f, elts)?,
            span,
        },
        Expr::FuncLit { ty, body, span } => {
            f.push_scope();
            let ty = f.fold_func_type(ty)?;
            bind_fields(f, Some(&ty.params));
            bind_fields(f, ty.results.as_ref());
            let body = f.fold_block(body)?;
            f.pop_scope();
            Expr::FuncLit { ty, body, span }
        }
        Expr::Paren { expr, span } => Expr::Paren {
            expr: fold_box(f, expr)?,
            span,
        },
        Expr::Selector { x, sel, span } => Expr::Selector {
            x: fold_box(f, x)?,
            sel: f.fold_ident(sel)?,
            span,
        },
        Expr::Index { x, index, span } => Expr::Index {
            x: fold_box(f, x)?,
            index: fold_box(f, index)?,
            span,
        },
        Expr::Slice {
            x,
            low,
            high,
            max,
            span,
        } => Expr::Slice {
            x: fold_box(f, x)?,
            low: low.map(|e| fold_box(f, e)).transpose()?,
            high: high.map(|e| fold_box(f, e)).transpose()?,
            max: max.map(|e| fold_box(f, e)).transpose()?,
            span,
        },
        Expr::TypeAssert { x, ty, span } => Expr::TypeAssert {
            x: fold_box(f, x)?,
            ty: ty.map(|t| fold_box(f, t)).transpose()?,
            span,
        },
        Expr::Star { x, span } => Expr::Star {
            x: fold_box(f, x)?,
            span,
        },
        Expr::Unary { op, x, span } => Expr::Unary {
            op,
            x: fold_box(f, x)?,
            span,
        },
        Expr::Binary { op, x, y, span } => Expr::Binary {
            op,
            x: fold_box(f, x)?,
            y: fold_box(f, y)?,
            span,
        },
        Expr::Call { func, args, span } => Expr::Call {
            func: fold_box(f, func)?,
            args: fold_exprs(f, args)?,
            span,
        },
        Expr::KeyValue { key, value, span } => {
            // an identifier key names a struct field, not a binding
            let key = match *key {
                Expr::Ident(ident) => Box::new(Expr::Ident(f.fold_ident(ident)?)),
                other => fold_box(f, Box::new(other))?,
            };
            Expr::KeyValue {
                key,
                value: fold_box(f, value)?,
                span,
            }
        }
        Expr::ArrayType { len, elt, span } => Expr::ArrayType {
            len: len.map(|l| fold_box(f, l)).transpose()?,
            elt: fold_box(f, elt)?,
            span,
        },
        Expr::MapType { key, value, span } => Expr::MapType {
            key: fold_box(f, key)?,
            value: fold_box(f, value)?,
            span,
        },
        Expr::ChanType { dir, value, span } => Expr::ChanType {
            dir,
            value: fold_box(f, value)?,
            span,
        },
        Expr::Ellipsis { elt, span } => Expr::Ellipsis {
            elt: elt.map(|e| fold_box(f, e)).transpose()?,
            span,
        },
        Expr::FuncType(ft) => Expr::FuncType(f.fold_func_type(ft)?),
        Expr::StructType(st) => Expr::StructType(f.fold_struct_type(st)?),
        Expr::InterfaceType(it) => Expr::InterfaceType(InterfaceType {
            methods: f.fold_field_list(it.methods)?,
            span: it.span,
        }),
    })
}
