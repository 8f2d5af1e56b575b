//! Abstract Syntax Tree types
//!
//! A Go-shaped tree for one compilation unit. Generic constructs use the `::(...)` notation:
//!
//! ```text
//! type Box struct::(T) { val T }
//! func::(T) (b Box::(T)) Get() T { return b.val }
//! var b Box::(int)
//! ```
//!
//! The whole tree is `serde` (de)serializable; JSON is how it travels between the parser,
//! this transform and the printer.

pub mod fold;
pub mod visit;

use crate::util::span::Span;
use serde::{Deserialize, Serialize};

/// Identifier, optionally carrying a concrete type-argument list (`Box::(int)`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ident {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_args: Option<TypeArgList>,
    #[serde(default)]
    pub span: Span,
}

impl Ident {
    /// Plain identifier without type arguments
    pub fn new(
        name: impl Into<String>,
        span: Span,
    ) -> Self {
        Ident {
            name: name.into(),
            type_args: None,
            span,
        }
    }

    /// Identifier with a concrete type-argument list
    pub fn with_args(
        name: impl Into<String>,
        args: Vec<Expr>,
        span: Span,
    ) -> Self {
        Ident {
            name: name.into(),
            type_args: Some(TypeArgList { list: args, span }),
            span,
        }
    }
}

/// Concrete type-argument list at a use site: `::(int, pkg.Type)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeArgList {
    pub list: Vec<Expr>,
    #[serde(default)]
    pub span: Span,
}

/// Formal type-parameter list at a declaration: `::(K, V)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeParamList {
    pub names: Vec<Ident>,
    #[serde(default)]
    pub span: Span,
}

impl TypeParamList {
    /// Parameter names in declaration order
    pub fn names(&self) -> Vec<String> {
        self.names.iter().map(|i| i.name.clone()).collect()
    }
}

/// Compilation unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    pub package: Ident,
    #[serde(default)]
    pub imports: Vec<ImportSpec>,
    #[serde(default)]
    pub decls: Vec<Decl>,
    #[serde(default)]
    pub span: Span,
}

/// `import name "path"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Ident>,
    pub path: String,
    #[serde(default)]
    pub span: Span,
}

/// Top-level declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Decl {
    Func(FuncDecl),
    Type(TypeSpec),
    Var(ValueSpec),
    Const(ValueSpec),
}

/// Function or method declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncDecl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recv: Option<FieldList>,
    pub name: Ident,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_params: Option<TypeParamList>,
    pub ty: FuncType,
    /// `None` for external (body-less) functions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Block>,
    #[serde(default)]
    pub span: Span,
}

impl FuncDecl {
    pub fn is_generic(&self) -> bool {
        self.type_params.is_some()
    }
}

/// `Name Type` inside a `type` declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSpec {
    pub name: Ident,
    pub ty: Expr,
    #[serde(default)]
    pub span: Span,
}

impl TypeSpec {
    /// The struct type of a generic struct declaration, if this is one
    pub fn generic_struct(&self) -> Option<&StructType> {
        match &self.ty {
            Expr::StructType(st) if st.type_params.is_some() => Some(st),
            _ => None,
        }
    }
}

/// `a, b T = x, y` inside a `var`/`const` declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSpec {
    pub names: Vec<Ident>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<Expr>,
    #[serde(default)]
    pub values: Vec<Expr>,
    #[serde(default)]
    pub span: Span,
}

/// Parameter, result, receiver or struct field group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    #[serde(default)]
    pub names: Vec<Ident>,
    pub ty: Expr,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldList {
    #[serde(default)]
    pub list: Vec<Field>,
    #[serde(default)]
    pub span: Span,
}

impl FieldList {
    /// All names bound by this list
    pub fn bound_names(&self) -> impl Iterator<Item = &Ident> {
        self.list.iter().flat_map(|f| f.names.iter())
    }
}

/// Function signature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncType {
    #[serde(default)]
    pub params: FieldList,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<FieldList>,
    #[serde(default)]
    pub span: Span,
}

/// `struct::(T) { ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_params: Option<TypeParamList>,
    #[serde(default)]
    pub fields: FieldList,
    #[serde(default)]
    pub span: Span,
}

/// `interface { Method(x T) T; Embedded }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceType {
    /// Methods (named, `FuncType`) and embedded types (unnamed)
    #[serde(default)]
    pub methods: FieldList,
    #[serde(default)]
    pub span: Span,
}

/// Channel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChanDir {
    /// `chan T`
    #[default]
    Both,
    /// `chan<- T`
    Send,
    /// `<-chan T`
    Recv,
}

/// Literal kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LitKind {
    Int,
    Float,
    Char,
    String,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnOp {
    Neg,
    Not,
    Addr,
    BitNot,
    Recv,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

/// Expression (also used for type expressions)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Ident(Ident),
    BasicLit {
        kind: LitKind,
        value: String,
        #[serde(default)]
        span: Span,
    },
    CompositeLit {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ty: Option<Box<Expr>>,
        #[serde(default)]
        elts: Vec<Expr>,
        #[serde(default)]
        span: Span,
    },
    FuncLit {
        ty: FuncType,
        body: Block,
        #[serde(default)]
        span: Span,
    },
    Paren {
        expr: Box<Expr>,
        #[serde(default)]
        span: Span,
    },
    Selector {
        x: Box<Expr>,
        sel: Ident,
        #[serde(default)]
        span: Span,
    },
    Index {
        x: Box<Expr>,
        index: Box<Expr>,
        #[serde(default)]
        span: Span,
    },
    /// `x[low:high]` or `x[low:high:max]`
    Slice {
        x: Box<Expr>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        low: Option<Box<Expr>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        high: Option<Box<Expr>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<Box<Expr>>,
        #[serde(default)]
        span: Span,
    },
    /// `x.(T)`; `ty` is `None` for the `x.(type)` guard of a type switch
    TypeAssert {
        x: Box<Expr>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ty: Option<Box<Expr>>,
        #[serde(default)]
        span: Span,
    },
    /// `*x`: pointer type or dereference
    Star {
        x: Box<Expr>,
        #[serde(default)]
        span: Span,
    },
    Unary {
        op: UnOp,
        x: Box<Expr>,
        #[serde(default)]
        span: Span,
    },
    Binary {
        op: BinOp,
        x: Box<Expr>,
        y: Box<Expr>,
        #[serde(default)]
        span: Span,
    },
    Call {
        func: Box<Expr>,
        #[serde(default)]
        args: Vec<Expr>,
        #[serde(default)]
        span: Span,
    },
    /// `key: value` inside a composite literal
    KeyValue {
        key: Box<Expr>,
        value: Box<Expr>,
        #[serde(default)]
        span: Span,
    },
    /// `[len]elt` or `[]elt`
    ArrayType {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        len: Option<Box<Expr>>,
        elt: Box<Expr>,
        #[serde(default)]
        span: Span,
    },
    MapType {
        key: Box<Expr>,
        value: Box<Expr>,
        #[serde(default)]
        span: Span,
    },
    ChanType {
        #[serde(default)]
        dir: ChanDir,
        value: Box<Expr>,
        #[serde(default)]
        span: Span,
    },
    /// `...T` in a variadic parameter list, `[...]T` array length
    Ellipsis {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        elt: Option<Box<Expr>>,
        #[serde(default)]
        span: Span,
    },
    FuncType(FuncType),
    StructType(StructType),
    InterfaceType(InterfaceType),
}

impl Expr {
    /// Plain identifier expression
    pub fn ident(
        name: impl Into<String>,
        span: Span,
    ) -> Self {
        Expr::Ident(Ident::new(name, span))
    }

    pub fn span(&self) -> Span {
        match self {
            Expr::Ident(i) => i.span,
            Expr::BasicLit { span, .. }
            | Expr::CompositeLit { span, .. }
            | Expr::FuncLit { span, .. }
            | Expr::Paren { span, .. }
            | Expr::Selector { span, .. }
            | Expr::Index { span, .. }
            | Expr::Slice { span, .. }
            | Expr::TypeAssert { span, .. }
            | Expr::Star { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Call { span, .. }
            | Expr::KeyValue { span, .. }
            | Expr::ArrayType { span, .. }
            | Expr::MapType { span, .. }
            | Expr::ChanType { span, .. }
            | Expr::Ellipsis { span, .. } => *span,
            Expr::FuncType(ft) => ft.span,
            Expr::StructType(st) => st.span,
            Expr::InterfaceType(it) => it.span,
        }
    }
}

/// Assignment token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignOp {
    /// `=`
    Assign,
    /// `:=`
    Define,
    /// `+=`, `-=`, ...
    Compound(BinOp),
}

/// Branch keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BranchKind {
    Break,
    Continue,
    Goto,
    Fallthrough,
}

/// Declaration inside a function body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LocalDecl {
    Var(ValueSpec),
    Const(ValueSpec),
    Type(TypeSpec),
}

/// `case a, b: ...` (empty `exprs` is `default:`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseClause {
    #[serde(default)]
    pub exprs: Vec<Expr>,
    #[serde(default)]
    pub body: Vec<Stmt>,
    #[serde(default)]
    pub span: Span,
}

/// `case x := <-ch: ...` inside a `select` (`comm` is `None` for `default:`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommClause {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comm: Option<Box<Stmt>>,
    #[serde(default)]
    pub body: Vec<Stmt>,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub stmts: Vec<Stmt>,
    #[serde(default)]
    pub span: Span,
}

/// Statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Decl(LocalDecl),
    Expr(Expr),
    Assign {
        lhs: Vec<Expr>,
        op: AssignOp,
        rhs: Vec<Expr>,
        #[serde(default)]
        span: Span,
    },
    /// `ch <- value`
    Send {
        chan: Expr,
        value: Expr,
        #[serde(default)]
        span: Span,
    },
    Go {
        call: Expr,
        #[serde(default)]
        span: Span,
    },
    Defer {
        call: Expr,
        #[serde(default)]
        span: Span,
    },
    Labeled {
        label: Ident,
        stmt: Box<Stmt>,
        #[serde(default)]
        span: Span,
    },
    IncDec {
        x: Expr,
        inc: bool,
        #[serde(default)]
        span: Span,
    },
    Return {
        #[serde(default)]
        results: Vec<Expr>,
        #[serde(default)]
        span: Span,
    },
    Branch {
        kind: BranchKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<Ident>,
        #[serde(default)]
        span: Span,
    },
    Block(Block),
    If {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        init: Option<Box<Stmt>>,
        cond: Expr,
        then: Block,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        els: Option<Box<Stmt>>,
        #[serde(default)]
        span: Span,
    },
    For {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        init: Option<Box<Stmt>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cond: Option<Expr>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        post: Option<Box<Stmt>>,
        body: Block,
        #[serde(default)]
        span: Span,
    },
    Range {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key: Option<Expr>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<Expr>,
        /// `for k, v := range x`
        #[serde(default)]
        define: bool,
        x: Expr,
        body: Block,
        #[serde(default)]
        span: Span,
    },
    Switch {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        init: Option<Box<Stmt>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tag: Option<Expr>,
        #[serde(default)]
        cases: Vec<CaseClause>,
        #[serde(default)]
        span: Span,
    },
    /// `switch [init;] [bind :=] x.(type) { ... }`
    TypeSwitch {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        init: Option<Box<Stmt>>,
        /// Declared again in every clause, after its case list
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bind: Option<Ident>,
        x: Expr,
        #[serde(default)]
        cases: Vec<CaseClause>,
        #[serde(default)]
        span: Span,
    },
    Select {
        #[serde(default)]
        cases: Vec<CommClause>,
        #[serde(default)]
        span: Span,
    },
}
