//! 形参遮蔽测试
//!
//! 内层作用域中与形参同名的绑定必须保持原样，只有真正指向形参的标识符才会被替换。

use super::*;
use crate::frontend::ast::{CaseClause, Expr, File, FuncDecl, LitKind};
use crate::middle::passes::mono::Monomorphizer;

/// 以 int 实例化 `func::(T) Shadow(params) results { body }`，返回生成的函数
fn instantiate(
    params: Vec<Field>,
    results: Vec<Field>,
    body: Vec<Stmt>,
) -> FuncDecl {
    let f = file(vec![
        generic_func("Shadow", &["T"], params, results, body),
        var_init("use", call(inst("Shadow", &["int"]), vec![])),
    ]);
    let (out, _) = Monomorphizer::new().run(f).unwrap();
    find_func(&out, "Shadow__int").clone()
}

fn int_lit(value: &str) -> Expr {
    Expr::BasicLit {
        kind: LitKind::Int,
        value: value.to_string(),
        span: sp(),
    }
}

fn assert_ident(
    expr: &Expr,
    name: &str,
) {
    assert!(matches!(expr, Expr::Ident(i) if i.name == name), "expected `{}`, got {:?}", name, expr);
}

fn local_var_type(stmt: &Stmt) -> String {
    let Stmt::Decl(LocalDecl::Var(spec)) = stmt else {
        panic!("expected a local var, got {:?}", stmt);
    };
    type_text(spec.ty.as_ref().unwrap())
}

fn returned(stmt: &Stmt) -> &Expr {
    let Stmt::Return { results, .. } = stmt else {
        panic!("expected a return, got {:?}", stmt);
    };
    &results[0]
}

/// 测试：`:=` 定义的同名变量遮蔽形参，初始化表达式仍看到形参
#[test]
fn test_define_shadows_after_initializer() {
    let func = instantiate(
        vec![field(&["x"], id("T"))],
        vec![field(&[], id("T"))],
        vec![define("T", call(id("T"), vec![id("x")])), ret(id("T"))],
    );

    assert_eq!(field_types(&func.ty.params), vec!["int"]);
    assert_eq!(field_types(func.ty.results.as_ref().unwrap()), vec!["int"]);
    let stmts = body(&func);
    let Stmt::Assign { lhs, rhs, .. } = &stmts[0] else {
        panic!("expected an assignment");
    };
    assert_ident(&lhs[0], "T");
    assert_eq!(type_text(&rhs[0]), "int(x)");
    assert_ident(returned(&stmts[1]), "T");
}

/// 测试：局部 var 遮蔽形参
#[test]
fn test_local_var_shadows() {
    let func = instantiate(
        vec![],
        vec![],
        vec![local_var("T", id("bool")), local_var("y", id("T"))],
    );

    let stmts = body(&func);
    assert_eq!(local_var_type(&stmts[0]), "bool");
    assert_eq!(local_var_type(&stmts[1]), "T");
}

/// 测试：参数与形参同名时，签名中的类型被替换，函数体中的引用不变
#[test]
fn test_parameter_named_like_type_param() {
    let func = instantiate(
        vec![field(&["T"], id("T"))],
        vec![field(&[], id("T"))],
        vec![ret(id("T"))],
    );

    assert_eq!(func.ty.params.list[0].names[0].name, "T");
    assert_eq!(field_types(&func.ty.params), vec!["int"]);
    assert_eq!(field_types(func.ty.results.as_ref().unwrap()), vec!["int"]);
    assert_ident(returned(&body(&func)[0]), "T");
}

/// 测试：块作用域结束后形参重新可见
#[test]
fn test_block_scope_ends() {
    let func = instantiate(
        vec![],
        vec![],
        vec![
            Stmt::Block(block(vec![local_var("T", id("bool")), local_var("inner", id("T"))])),
            local_var("outer", id("T")),
        ],
    );

    let stmts = body(&func);
    let Stmt::Block(inner) = &stmts[0] else {
        panic!("expected a block");
    };
    assert_eq!(local_var_type(&inner.stmts[1]), "T");
    assert_eq!(local_var_type(&stmts[1]), "int");
}

/// 测试：局部 type 声明遮蔽形参
#[test]
fn test_local_type_shadows() {
    let empty_struct = Expr::StructType(StructType {
        type_params: None,
        fields: fields(vec![]),
        span: sp(),
    });
    let func = instantiate(
        vec![],
        vec![],
        vec![local_type("T", empty_struct), local_var("z", id("T"))],
    );

    assert_eq!(local_var_type(&body(&func)[1]), "T");
}

/// 测试：函数字面量的参数遮蔽形参
#[test]
fn test_func_literal_parameter_shadows() {
    let literal = Expr::FuncLit {
        ty: func_type(vec![field(&["T"], id("string"))], vec![]),
        body: block(vec![Stmt::Expr(call(id("print"), vec![id("T")]))]),
        span: sp(),
    };
    let func = instantiate(
        vec![],
        vec![],
        vec![define("f", literal), local_var("z", id("T"))],
    );

    let stmts = body(&func);
    let Stmt::Assign { rhs, .. } = &stmts[0] else {
        panic!("expected an assignment");
    };
    let Expr::FuncLit { body: lit_body, .. } = &rhs[0] else {
        panic!("expected a function literal");
    };
    let Stmt::Expr(print) = &lit_body.stmts[0] else {
        panic!("expected an expression statement");
    };
    assert_eq!(type_text(print), "print(T)");
    assert_eq!(local_var_type(&stmts[1]), "int");
}

/// 测试：range 定义的变量只在循环内遮蔽
#[test]
fn test_range_variables_scoped_to_loop() {
    let range = Stmt::Range {
        key: Some(id("_")),
        value: Some(id("T")),
        define: true,
        x: id("xs"),
        body: block(vec![Stmt::Expr(call(id("use"), vec![id("T")]))]),
        span: sp(),
    };
    let func = instantiate(vec![], vec![], vec![range, local_var("y", id("T"))]);

    let stmts = body(&func);
    let Stmt::Range { value, body: loop_body, .. } = &stmts[0] else {
        panic!("expected a range loop");
    };
    assert_ident(value.as_ref().unwrap(), "T");
    let Stmt::Expr(use_call) = &loop_body.stmts[0] else {
        panic!("expected an expression statement");
    };
    assert_eq!(type_text(use_call), "use(T)");
    assert_eq!(local_var_type(&stmts[1]), "int");
}

/// 测试：for 初始化语句中的 `:=` 只在循环内遮蔽形参
#[test]
fn test_for_init_define_scoped_to_loop() {
    let for_loop = Stmt::For {
        init: Some(Box::new(define("T", int_lit("0")))),
        cond: None,
        post: None,
        body: block(vec![local_var("a", id("T"))]),
        span: sp(),
    };
    let func = instantiate(vec![], vec![], vec![for_loop, local_var("b", id("T"))]);

    let stmts = body(&func);
    let Stmt::For { init, body: loop_body, .. } = &stmts[0] else {
        panic!("expected a for loop");
    };
    let Some(Stmt::Assign { lhs, .. }) = init.as_deref() else {
        panic!("expected a short variable declaration");
    };
    assert_ident(&lhs[0], "T");
    assert_eq!(local_var_type(&loop_body.stmts[0]), "T");
    assert_eq!(local_var_type(&stmts[1]), "int");
}

/// 测试：if 初始化语句中的 `:=` 覆盖条件、两个分支，之后形参重新可见
#[test]
fn test_if_init_define_scoped_to_statement() {
    let if_stmt = Stmt::If {
        init: Some(Box::new(define("T", call(id("lookup"), vec![])))),
        cond: id("T"),
        then: block(vec![local_var("a", id("T"))]),
        els: Some(Box::new(Stmt::Block(block(vec![local_var("b", id("T"))])))),
        span: sp(),
    };
    let func = instantiate(vec![], vec![], vec![if_stmt, local_var("c", id("T"))]);

    let stmts = body(&func);
    let Stmt::If { cond, then, els, .. } = &stmts[0] else {
        panic!("expected an if statement");
    };
    assert_ident(cond, "T");
    assert_eq!(local_var_type(&then.stmts[0]), "T");
    let Some(Stmt::Block(els)) = els.as_deref() else {
        panic!("expected an else block");
    };
    assert_eq!(local_var_type(&els.stmts[0]), "T");
    assert_eq!(local_var_type(&stmts[1]), "int");
}

/// 测试：类型 switch 的绑定在每个子句的 case 列表之后才生效
#[test]
fn test_type_switch_binding_per_clause() {
    let switch = Stmt::TypeSwitch {
        init: None,
        bind: Some(Ident::new("T", sp())),
        x: Expr::TypeAssert {
            x: Box::new(id("v")),
            ty: None,
            span: sp(),
        },
        cases: vec![CaseClause {
            exprs: vec![id("T")],
            body: vec![local_var("a", id("T"))],
            span: sp(),
        }],
        span: sp(),
    };
    let func = instantiate(
        vec![field(&["v"], id("any"))],
        vec![],
        vec![switch, local_var("b", id("T"))],
    );

    let stmts = body(&func);
    let Stmt::TypeSwitch { cases, .. } = &stmts[0] else {
        panic!("expected a type switch");
    };
    assert_eq!(type_text(&cases[0].exprs[0]), "int");
    assert_eq!(local_var_type(&cases[0].body[0]), "T");
    assert_eq!(local_var_type(&stmts[1]), "int");
}

/// 泛型结构体 Inner、Pair，以及按 `args` 实例化一次的泛型函数 Shadow
fn shadow_with_inner(
    type_params: &[&str],
    args: &[&str],
    stmts: Vec<Stmt>,
) -> File {
    file(vec![
        generic_struct("Inner", &["T"], vec![field(&["v"], id("T"))]),
        generic_struct("Pair", &["A", "B"], vec![field(&["a"], id("A")), field(&["b"], id("B"))]),
        generic_func("Shadow", type_params, vec![], vec![], stmts),
        var_init("use", call(inst("Shadow", args), vec![])),
    ])
}

/// 测试：被局部类型遮蔽的形参作实参时，实例化按原样登记，不继承父实例化
#[test]
fn test_shadowed_argument_is_not_inherited() {
    let empty_struct = Expr::StructType(StructType {
        type_params: None,
        fields: fields(vec![]),
        span: sp(),
    });
    let f = shadow_with_inner(
        &["T"],
        &["int"],
        vec![local_type("T", empty_struct), local_var("z", inst("Inner", &["T"]))],
    );

    let (decls, registry) = collect_file(&f).unwrap();
    assert!(!decls["Shadow"].has_children());
    assert_eq!(signatures(&registry, "Inner"), vec!["Inner__T"]);

    let (out, _) = Monomorphizer::new().run(f).unwrap();
    assert_eq!(decl_names(&out), vec!["Inner__T", "Shadow__int", "use"]);
    assert_eq!(local_var_type(&body(find_func(&out, "Shadow__int"))[1]), "Inner__T");
}

/// 测试：只有未被遮蔽的实参继承父实例化
#[test]
fn test_partially_shadowed_arguments() {
    let f = shadow_with_inner(
        &["T", "U"],
        &["int", "bool"],
        vec![local_var("T", id("string")), local_var("p", inst("Pair", &["T", "U"]))],
    );
    let (out, _) = Monomorphizer::new().run(f).unwrap();

    assert_eq!(decl_names(&out), vec!["Pair__T__bool", "Shadow__int__bool", "use"]);
    assert_eq!(local_var_type(&body(find_func(&out, "Shadow__int__bool"))[1]), "Pair__T__bool");
}

/// 测试：每个 case 子句是独立的作用域
#[test]
fn test_case_clause_scopes() {
    let switch = Stmt::Switch {
        init: None,
        tag: Some(id("n")),
        cases: vec![
            CaseClause {
                exprs: vec![int_lit("1")],
                body: vec![define("T", int_lit("2")), local_var("a", id("T"))],
                span: sp(),
            },
            CaseClause {
                exprs: vec![],
                body: vec![local_var("b", id("T"))],
                span: sp(),
            },
        ],
        span: sp(),
    };
    let func = instantiate(vec![field(&["n"], id("int"))], vec![], vec![switch]);

    let Stmt::Switch { cases, .. } = &body(&func)[0] else {
        panic!("expected a switch");
    };
    assert_eq!(local_var_type(&cases[0].body[1]), "T");
    assert_eq!(local_var_type(&cases[1].body[0]), "int");
}

/// 测试：字段名、选择子与字面量键不是引用
#[test]
fn test_field_names_selectors_and_keys_untouched() {
    let literal = Expr::CompositeLit {
        ty: Some(Box::new(inst("Box", &["T"]))),
        elts: vec![Expr::KeyValue {
            key: Box::new(id("T")),
            value: Box::new(id("v")),
            span: sp(),
        }],
        span: sp(),
    };
    let f = file(vec![
        generic_struct("Box", &["T"], vec![field(&["T"], id("T"))]),
        generic_func(
            "Make",
            &["T"],
            vec![field(&["v"], id("T"))],
            vec![field(&[], inst("Box", &["T"]))],
            vec![define("w", sel(id("v"), "T")), ret(literal)],
        ),
        var_init("b", call(inst("Make", &["int"]), vec![int_lit("1")])),
    ]);
    let (out, _) = Monomorphizer::new().run(f).unwrap();

    assert_eq!(struct_fields(find_type(&out, "Box__int")), vec![("T".to_string(), "int".to_string())]);

    let make = find_func(&out, "Make__int");
    assert_eq!(field_types(make.ty.results.as_ref().unwrap()), vec!["Box__int"]);
    let stmts = body(make);
    let Stmt::Assign { rhs, .. } = &stmts[0] else {
        panic!("expected an assignment");
    };
    assert_eq!(type_text(&rhs[0]), "v.T");
    let Expr::CompositeLit { ty: Some(ty), elts, .. } = returned(&stmts[1]) else {
        panic!("expected a composite literal");
    };
    assert_eq!(type_text(ty), "Box__int");
    let Expr::KeyValue { key, .. } = &elts[0] else {
        panic!("expected a key-value element");
    };
    assert_ident(key, "T");
}
