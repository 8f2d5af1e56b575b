//! 完整流程测试

use super::*;
use crate::frontend::ast::{Expr, File};
use crate::middle::passes::mono::rewrite::verify_concrete;
use crate::middle::passes::mono::{monomorphize, DeclKind, MonoError, MonoStats, Monomorphizer};
use crate::util::config::TransformConfig;

fn run(f: File) -> (File, MonoStats) {
    Monomorphizer::new().run(f).unwrap()
}

/// 测试：Box 内嵌 Inner，两个实例化共生成四个具体声明
#[test]
fn test_box_inner_generates_four_declarations() {
    let (out, stats) = run(box_inner_file());

    assert_eq!(
        decl_names(&out),
        vec!["Box__int", "Box__string", "Inner__int", "Inner__string", "a", "b"]
    );
    assert_eq!(
        struct_fields(find_type(&out, "Box__int")),
        vec![("inner".to_string(), "Inner__int".to_string())]
    );
    assert_eq!(
        struct_fields(find_type(&out, "Inner__string")),
        vec![("v".to_string(), "string".to_string())]
    );
    assert_eq!(type_text(find_var(&out, "b").ty.as_ref().unwrap()), "Box__string");

    assert_eq!(stats.declarations, 2);
    assert_eq!(stats.collected, 2);
    assert_eq!(stats.propagated, 2);
    assert_eq!(stats.generated, 4);
    // 两个 var 引用加两个展开后的 Inner 引用
    assert_eq!(stats.rewritten, 4);
}

/// 测试：输出中不残留任何泛型构造，形参名也不再出现
#[test]
fn test_no_generic_constructs_remain() {
    let (out, _) = run(box_inner_file());

    assert!(verify_concrete(&out).is_ok());
    assert!(!ident_names(&out).iter().any(|n| n == "T"));
}

/// 测试：相同输入得到完全相同的输出
#[test]
fn test_deterministic_output() {
    let (first, _) = run(box_inner_file());
    let (second, _) = run(box_inner_file());

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

/// 测试：对输出再运行一次不产生变化
#[test]
fn test_idempotent_on_output() {
    let (once, _) = run(box_inner_file());
    let (twice, stats) = run(once.clone());

    assert_eq!(once, twice);
    assert_eq!(stats.declarations, 0);
    assert_eq!(stats.generated, 0);
}

/// 测试：泛型方法按接收者类型实例化
#[test]
fn test_generic_method_on_generic_struct() {
    let f = file(vec![
        generic_struct("Box", &["T"], vec![field(&["val"], id("T"))]),
        generic_method(
            "Get",
            &["T"],
            field(&["b"], inst("Box", &["T"])),
            vec![field(&[], id("T"))],
            vec![ret(sel(id("b"), "val"))],
        ),
        Decl::Func(func(
            "main",
            vec![],
            vec![],
            vec![
                local_var("b", inst("Box", &["int"])),
                Stmt::Expr(call(sel(id("b"), "Get"), vec![])),
                Stmt::Expr(call(inst("Get", &["int"]), vec![id("b")])),
            ],
        )),
    ]);
    let (out, _) = run(f);

    assert_eq!(decl_names(&out), vec!["Box__int", "Get__int", "main"]);
    let get = find_func(&out, "Get__int");
    assert_eq!(field_types(get.recv.as_ref().unwrap()), vec!["Box__int"]);
    assert_eq!(field_types(get.ty.results.as_ref().unwrap()), vec!["int"]);
}

/// 测试：多条路径汇聚到同一个 Helper 实例时只生成一份
#[test]
fn test_helper_generated_once() {
    let calls_helper = |name: &str| {
        generic_func(
            name,
            &["T"],
            vec![field(&["x"], id("T"))],
            vec![],
            vec![Stmt::Expr(call(inst("Helper", &["T"]), vec![id("x")]))],
        )
    };
    let f = file(vec![
        generic_func("Helper", &["T"], vec![field(&["x"], id("T"))], vec![], vec![]),
        calls_helper("First"),
        calls_helper("Second"),
        var_init("a", call(inst("First", &["bool"]), vec![id("true")])),
        var_init("b", call(inst("Second", &["bool"]), vec![id("true")])),
    ]);
    let (out, _) = run(f);

    let names = decl_names(&out);
    assert_eq!(names.iter().filter(|n| *n == "Helper__bool").count(), 1);
    assert_eq!(names, vec!["Helper__bool", "First__bool", "Second__bool", "a", "b"]);

    let first = find_func(&out, "First__bool");
    let Stmt::Expr(helper_call) = &body(first)[0] else {
        panic!("expected an expression statement");
    };
    assert_eq!(type_text(helper_call), "Helper__bool(x)");
}

/// 测试：限定名实参的修饰名
#[test]
fn test_qualified_argument_mangling() {
    let f = file(vec![
        generic_struct("Box", &["T"], vec![field(&["val"], id("T"))]),
        var_decl("b", inst("Box", &["pkg.Type"])),
    ]);
    let (out, _) = run(f);

    assert_eq!(decl_names(&out), vec!["Box__pkg_Type", "b"]);
    assert_eq!(type_text(find_var(&out, "b").ty.as_ref().unwrap()), "Box__pkg_Type");
}

/// 测试：没有实例化的泛型声明不出现在输出中
#[test]
fn test_dead_generics_eliminated() {
    let f = file(vec![
        generic_struct("Unused", &["T"], vec![field(&["val"], inst("Inner", &["T"]))]),
        generic_struct("Inner", &["T"], vec![field(&["v"], id("T"))]),
        var_decl("n", id("int")),
    ]);
    let (out, stats) = run(f);

    assert_eq!(decl_names(&out), vec!["n"]);
    assert_eq!(stats.dropped, vec!["Unused", "Inner"]);
}

/// 测试：引用外部泛型声明时只改写名字
#[test]
fn test_external_instance_rewritten_only() {
    let external = Expr::Selector {
        x: Box::new(id("ext")),
        sel: inst_ident("Vec", &["int"]),
        span: sp(),
    };
    let (out, stats) = run(file(vec![var_decl("v", external)]));

    assert_eq!(decl_names(&out), vec!["v"]);
    assert_eq!(type_text(find_var(&out, "v").ty.as_ref().unwrap()), "ext.Vec__int");
    assert_eq!(stats.generated, 0);
}

/// 测试：出错时整个编译单元失败
#[test]
fn test_error_aborts_run() {
    let f = file(vec![
        generic_struct("Box", &["T"], vec![field(&["val"], id("T"))]),
        var_decl("ok", inst("Box", &["int"])),
        var_decl("bad", inst("Box", &["int", "bool"])),
    ]);
    assert!(matches!(monomorphize(f), Err(MonoError::Arity { .. })));
}

/// 测试：实例化上限来自配置
#[test]
fn test_limit_from_config() {
    let config = TransformConfig {
        max_instantiations: 1,
        ..TransformConfig::default()
    };
    let result = Monomorphizer::with_config(config).run(box_inner_file());
    assert!(matches!(result, Err(MonoError::InstantiationLimit { limit: 1, .. })));
}

/// 测试：实例化计划
#[test]
fn test_plan() {
    let mut f = box_inner_file();
    f.decls.push(generic_func("Unused", &["T"], vec![], vec![], vec![]));
    f.decls.push(var_decl(
        "v",
        Expr::Selector {
            x: Box::new(id("ext")),
            sel: inst_ident("Vec", &["int"]),
            span: sp(),
        },
    ));
    let plan = Monomorphizer::new().plan(&f).unwrap();

    let summary: Vec<_> = plan
        .declarations
        .iter()
        .map(|e| (e.name.as_str(), e.kind, e.instances.clone()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Box", DeclKind::Struct, vec!["Box__int".to_string(), "Box__string".to_string()]),
            ("Inner", DeclKind::Struct, vec!["Inner__int".to_string(), "Inner__string".to_string()]),
            ("Unused", DeclKind::Func, vec![]),
        ]
    );
    assert_eq!(plan.external, vec!["Vec__int"]);
}

/// 测试：便捷函数与默认配置一致
#[test]
fn test_monomorphize_matches_run() {
    let out = monomorphize(box_inner_file()).unwrap();
    let (expected, _) = run(box_inner_file());
    assert_eq!(out, expected);
}
