//! 引用改写测试

use super::*;
use crate::frontend::ast::{Expr, File};
use crate::middle::passes::mono::rewrite::{verify_concrete, ReferenceRewriter};
use crate::middle::passes::mono::MonoError;

fn rewrite(f: File) -> (File, usize) {
    ReferenceRewriter::new().rewrite(f).unwrap()
}

/// 测试：带实参的类型引用改写为修饰名
#[test]
fn test_type_reference_rewritten() {
    let (out, count) = rewrite(file(vec![var_decl("b", inst("Box", &["int"]))]));

    let spec = find_var(&out, "b");
    let Some(Expr::Ident(ty)) = &spec.ty else {
        panic!("expected an identifier type");
    };
    assert_eq!(ty.name, "Box__int");
    assert!(ty.type_args.is_none());
    assert_eq!(count, 1);
}

/// 测试：函数调用与复合字面量中的引用
#[test]
fn test_call_and_literal_rewritten() {
    let literal = Expr::CompositeLit {
        ty: Some(Box::new(inst("Pair", &["string", "pkg.Key"]))),
        elts: vec![],
        span: sp(),
    };
    let (out, count) = rewrite(file(vec![Decl::Func(func(
        "main",
        vec![],
        vec![],
        vec![
            define("x", call(inst("Identity", &["int"]), vec![id("one")])),
            define("p", literal),
        ],
    ))]));

    let stmts = body(find_func(&out, "main"));
    let Stmt::Assign { rhs, .. } = &stmts[0] else {
        panic!("expected an assignment");
    };
    assert_eq!(type_text(&rhs[0]), "Identity__int(one)");
    let Stmt::Assign { rhs, .. } = &stmts[1] else {
        panic!("expected an assignment");
    };
    let Expr::CompositeLit { ty: Some(ty), .. } = &rhs[0] else {
        panic!("expected a composite literal");
    };
    assert_eq!(type_text(ty), "Pair__string__pkg_Key");
    assert_eq!(count, 2);
}

/// 测试：选择子上的实例化保留包名，只改写选择子
#[test]
fn test_selector_instance_rewritten() {
    let external = Expr::Selector {
        x: Box::new(id("ext")),
        sel: inst_ident("Vec", &["int"]),
        span: sp(),
    };
    let (out, _) = rewrite(file(vec![var_decl("v", external)]));

    assert_eq!(type_text(find_var(&out, "v").ty.as_ref().unwrap()), "ext.Vec__int");
}

/// 测试：没有实参的引用保持不变
#[test]
fn test_plain_references_untouched() {
    let f = file(vec![
        plain_struct("Point", vec![field(&["x"], id("int"))]),
        var_decl("p", id("Point")),
    ]);
    let (out, count) = rewrite(f.clone());

    assert_eq!(out, f);
    assert_eq!(count, 0);
}

/// 测试：校验能发现残留的泛型构造
#[test]
fn test_verify_concrete() {
    let clean = file(vec![var_decl("b", id("Box__int"))]);
    assert!(verify_concrete(&clean).is_ok());

    let leftover_args = file(vec![var_decl("b", inst("Box", &["int"]))]);
    let err = verify_concrete(&leftover_args).unwrap_err();
    assert!(matches!(err, MonoError::Invariant { .. }));
    assert_eq!(err.code(), "M0900");

    let leftover_struct = file(vec![generic_struct("Box", &["T"], vec![field(&["val"], id("T"))])]);
    assert!(verify_concrete(&leftover_struct).is_err());

    let leftover_func = file(vec![generic_func("F", &["T"], vec![], vec![], vec![])]);
    assert!(verify_concrete(&leftover_func).is_err());
}
