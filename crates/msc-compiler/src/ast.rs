//! Syntax tree consumed by the compiler.
//!
//! The tree is produced by an external C-subset parser and handed over as
//! JSON. Every node kind is a closed enum variant, so a tree naming a kind
//! the compiler has no lowering for is rejected at deserialization.
//!
//! JSON shape: nodes are objects tagged by `"kind"` in snake_case, operators
//! are spelled as in C, and every statement/expression may carry an optional
//! `"coord": { "line", "column" }`.

use std::fmt;

use serde::Deserialize;

/// Source position of a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
pub struct Coord {
    pub line: u32,
    pub column: u32,
}

impl Coord {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Declared type of a variable or function.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Type {
    Int,
    Float,
    Bool,
    Void,
}

impl Type {
    pub fn is_float(self) -> bool {
        self == Type::Float
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct TranslationUnit {
    pub items: Vec<Item>,
}

impl TranslationUnit {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionDef> {
        self.items.iter().filter_map(|item| match item {
            Item::Function(f) => Some(f),
            Item::Global(_) => None,
        })
    }
}

/// Top-level declaration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Item {
    Global(GlobalDecl),
    Function(FunctionDef),
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GlobalDecl {
    pub name: String,
    pub ty: Type,
    /// Globals cannot be initialized; a present initializer is a compile error.
    #[serde(default)]
    pub init: Option<Expr>,
    #[serde(default)]
    pub coord: Coord,
}

impl GlobalDecl {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            init: None,
            coord: Coord::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: Type,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FunctionDef {
    pub name: String,
    pub ret: Type,
    #[serde(default)]
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    #[serde(default)]
    pub coord: Coord,
}

impl FunctionDef {
    pub fn new(name: impl Into<String>, ret: Type, body: Vec<Stmt>) -> Self {
        Self {
            name: name.into(),
            ret,
            params: Vec::new(),
            body,
            coord: Coord::default(),
        }
    }

    pub fn with_params(mut self, params: &[(&str, Type)]) -> Self {
        self.params = params
            .iter()
            .map(|&(name, ty)| Param {
                name: name.to_string(),
                ty,
            })
            .collect();
        self
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Stmt {
    #[serde(flatten)]
    pub kind: StmtKind,
    #[serde(default)]
    pub coord: Coord,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StmtKind {
    Decl {
        name: String,
        ty: Type,
        #[serde(default)]
        init: Option<Expr>,
    },
    Expr {
        expr: Expr,
    },
    Block {
        body: Vec<Stmt>,
    },
    If {
        cond: Expr,
        then: Box<Stmt>,
        #[serde(default)]
        otherwise: Option<Box<Stmt>>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    DoWhile {
        body: Box<Stmt>,
        cond: Expr,
    },
    For {
        #[serde(default)]
        init: Vec<Stmt>,
        #[serde(default)]
        cond: Option<Expr>,
        #[serde(default)]
        step: Option<Expr>,
        body: Box<Stmt>,
    },
    Break,
    Continue,
    Return {
        #[serde(default)]
        value: Option<Expr>,
    },
    Switch {
        discriminant: Expr,
        arms: Vec<SwitchArm>,
    },
    Goto {
        label: String,
    },
    Labeled {
        label: String,
        body: Box<Stmt>,
    },
    Empty,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SwitchArm {
    Case { value: Expr, body: Vec<Stmt> },
    Default { body: Vec<Stmt> },
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Expr {
    #[serde(flatten)]
    pub kind: ExprKind,
    #[serde(default)]
    pub coord: Coord,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExprKind {
    Int {
        value: i64,
    },
    Float {
        value: f64,
    },
    /// String literal, escapes still encoded.
    Str {
        value: String,
    },
    Ident {
        name: String,
    },
    Assign {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Ternary {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    Cast {
        ty: Type,
        operand: Box<Expr>,
    },
    Call {
        callee: Callee,
        #[serde(default)]
        args: Vec<Expr>,
    },
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Callee {
    /// `name(...)`: intrinsic, syscall or user function.
    Named { name: String },
    /// `(*expr)(...)`: call through a function pointer.
    Deref { target: Box<Expr> },
    /// `object.method(...)`: syscall method from the metadata table.
    Method { object: String, method: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub enum UnaryOp {
    #[serde(rename = "!")]
    Not,
    #[serde(rename = "~")]
    BitNot,
    #[serde(rename = "-")]
    Neg,
    #[serde(rename = "++x")]
    PreInc,
    #[serde(rename = "--x")]
    PreDec,
    #[serde(rename = "x++")]
    PostInc,
    #[serde(rename = "x--")]
    PostDec,
    #[serde(rename = "&")]
    AddressOf,
    #[serde(rename = "*")]
    Deref,
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "sizeof")]
    SizeOf,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::Neg => "-",
            UnaryOp::PreInc => "++x",
            UnaryOp::PreDec => "--x",
            UnaryOp::PostInc => "x++",
            UnaryOp::PostDec => "x--",
            UnaryOp::AddressOf => "&",
            UnaryOp::Deref => "*",
            UnaryOp::Plus => "+",
            UnaryOp::SizeOf => "sizeof",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub enum BinaryOp {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "%")]
    Mod,
    #[serde(rename = "&")]
    BitAnd,
    #[serde(rename = "|")]
    BitOr,
    #[serde(rename = "^")]
    BitXor,
    #[serde(rename = "<<")]
    Shl,
    #[serde(rename = ">>")]
    Shr,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "&&")]
    And,
    #[serde(rename = "||")]
    Or,
}

impl BinaryOp {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub enum AssignOp {
    #[serde(rename = "=")]
    Set,
    #[serde(rename = "+=")]
    Add,
    #[serde(rename = "-=")]
    Sub,
    #[serde(rename = "*=")]
    Mul,
    #[serde(rename = "/=")]
    Div,
    #[serde(rename = "%=")]
    Mod,
    #[serde(rename = "&=")]
    And,
    #[serde(rename = "|=")]
    Or,
    #[serde(rename = "^=")]
    Xor,
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Self {
            kind,
            coord: Coord::default(),
        }
    }

    pub fn at(mut self, coord: Coord) -> Self {
        self.coord = coord;
        self
    }

    pub fn int(value: i64) -> Self {
        Self::new(ExprKind::Int { value })
    }

    pub fn float(value: f64) -> Self {
        Self::new(ExprKind::Float { value })
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(ExprKind::Str {
            value: value.into(),
        })
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Self::new(ExprKind::Ident { name: name.into() })
    }

    pub fn assign(op: AssignOp, target: Expr, value: Expr) -> Self {
        Self::new(ExprKind::Assign {
            op,
            target: Box::new(target),
            value: Box::new(value),
        })
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Self::new(ExprKind::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Self::new(ExprKind::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    pub fn ternary(cond: Expr, then: Expr, otherwise: Expr) -> Self {
        Self::new(ExprKind::Ternary {
            cond: Box::new(cond),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    pub fn cast(ty: Type, operand: Expr) -> Self {
        Self::new(ExprKind::Cast {
            ty,
            operand: Box::new(operand),
        })
    }

    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::new(ExprKind::Call {
            callee: Callee::Named { name: name.into() },
            args,
        })
    }

    pub fn call_ptr(target: Expr, args: Vec<Expr>) -> Self {
        Self::new(ExprKind::Call {
            callee: Callee::Deref {
                target: Box::new(target),
            },
            args,
        })
    }

    pub fn method(object: impl Into<String>, method: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::new(ExprKind::Call {
            callee: Callee::Method {
                object: object.into(),
                method: method.into(),
            },
            args,
        })
    }

    pub fn as_ident(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Ident { name } => Some(name),
            _ => None,
        }
    }
}

impl Stmt {
    pub fn new(kind: StmtKind) -> Self {
        Self {
            kind,
            coord: Coord::default(),
        }
    }

    pub fn at(mut self, coord: Coord) -> Self {
        self.coord = coord;
        self
    }

    pub fn expr(expr: Expr) -> Self {
        Self::new(StmtKind::Expr { expr })
    }

    pub fn decl(name: impl Into<String>, ty: Type, init: Option<Expr>) -> Self {
        Self::new(StmtKind::Decl {
            name: name.into(),
            ty,
            init,
        })
    }

    pub fn block(body: Vec<Stmt>) -> Self {
        Self::new(StmtKind::Block { body })
    }

    pub fn if_else(cond: Expr, then: Stmt, otherwise: Option<Stmt>) -> Self {
        Self::new(StmtKind::If {
            cond,
            then: Box::new(then),
            otherwise: otherwise.map(Box::new),
        })
    }

    pub fn while_loop(cond: Expr, body: Stmt) -> Self {
        Self::new(StmtKind::While {
            cond,
            body: Box::new(body),
        })
    }

    pub fn ret(value: Option<Expr>) -> Self {
        Self::new(StmtKind::Return { value })
    }
}
