//=====================================================
// File: ast.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Civet Abstract Syntax Tree definitions
// Objective: Define the typed AST of one C translation unit: declarations,
//            statements, expressions, and static type classifiers
//=====================================================

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

pub type NodeId = u32;

static NODE_COUNTER: AtomicU32 = AtomicU32::new(1);

pub fn next_node_id() -> NodeId {
    NODE_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Source location of a token, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Static type classifier attached to every expression by the resolver.
/// The evaluator never inspects runtime tags where this disambiguates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ty {
    Int,
    Ptr,
    Array,
    Func,
    Void,
    #[default]
    Unknown,
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Int => f.write_str("int"),
            Ty::Ptr => f.write_str("pointer"),
            Ty::Array => f.write_str("array"),
            Ty::Func => f.write_str("function"),
            Ty::Void => f.write_str("void"),
            Ty::Unknown => f.write_str("unknown"),
        }
    }
}

/// Declared type at a variable or parameter declaration site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSpec {
    Int,
    /// `int *` or `void *`; the dialect has single-level pointers only.
    Ptr,
    /// `int name[len]` with a constant positive length.
    Array(i64),
}

impl TypeSpec {
    pub fn classifier(self) -> Ty {
        match self {
            TypeSpec::Int => Ty::Int,
            TypeSpec::Ptr => Ty::Ptr,
            TypeSpec::Array(_) => Ty::Array,
        }
    }
}

/// Declared return type of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetSpec {
    Void,
    Int,
    Ptr,
}

impl RetSpec {
    pub fn classifier(self) -> Ty {
        match self {
            RetSpec::Void => Ty::Void,
            RetSpec::Int => Ty::Int,
            RetSpec::Ptr => Ty::Ptr,
        }
    }
}

#[derive(Debug)]
pub struct TranslationUnit {
    pub decls: Vec<TopDecl>,
}

#[derive(Debug)]
pub enum TopDecl {
    Function(FunctionDecl),
    Var(VarDecl),
}

#[derive(Debug)]
pub struct FunctionDecl {
    pub id: NodeId,
    pub name: String,
    pub ret: RetSpec,
    pub params: Vec<ParamDecl>,
    /// `None` for prototype-only declarations (`extern int GET();`).
    pub body: Option<Vec<Stmt>>,
    pub pos: Position,
}

#[derive(Debug)]
pub struct ParamDecl {
    pub id: NodeId,
    /// Prototype parameters may be unnamed.
    pub name: Option<String>,
    pub spec: TypeSpec,
    pub pos: Position,
}

#[derive(Debug)]
pub struct VarDecl {
    pub id: NodeId,
    pub name: String,
    pub spec: TypeSpec,
    pub init: Option<Expr>,
    pub pos: Position,
}

#[derive(Debug)]
pub enum Stmt {
    /// One declaration statement may introduce several variables.
    Decl(Vec<VarDecl>),
    Expr(Expr),
    Compound(Vec<Stmt>),
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    For {
        init: Option<ForInit>,
        /// Grammatically optional; the evaluator rejects its absence.
        cond: Option<Expr>,
        step: Option<Expr>,
        body: Box<Stmt>,
    },
    Return {
        value: Option<Expr>,
    },
}

#[derive(Debug)]
pub enum ForInit {
    Decl(Vec<VarDecl>),
    Expr(Expr),
}

#[derive(Debug)]
pub struct Expr {
    pub id: NodeId,
    pub ty: Ty,
    pub pos: Position,
    pub kind: ExprKind,
}

impl Expr {
    pub fn new(kind: ExprKind, pos: Position) -> Self {
        Self {
            id: next_node_id(),
            ty: Ty::Unknown,
            pos,
            kind,
        }
    }

    /// The expression with any grouping parentheses removed. Assignment
    /// dispatches on the shape of its target through this.
    pub fn strip_parens(&self) -> &Expr {
        match &self.kind {
            ExprKind::Paren(inner) => inner.strip_parens(),
            _ => self,
        }
    }
}

#[derive(Debug)]
pub enum ExprKind {
    IntLiteral(i64),
    DeclRef {
        name: String,
        /// Filled by the resolver with the declaration's node id.
        target: Option<NodeId>,
    },
    Paren(Box<Expr>),
    /// Implicit casts inserted by the resolver; none are written in source.
    Cast {
        kind: CastKind,
        operand: Box<Expr>,
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
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    SizeOf(SizeOfArg),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastKind {
    /// Reading an l-value (variable, array element, or `*p`) as a value.
    LValueToRValue,
    /// An array used where a pointer value is expected.
    ArrayToPointerDecay,
}

/// The operand of `sizeof` is never evaluated.
#[derive(Debug)]
pub enum SizeOfArg {
    Type(TypeSpec),
    Expr(Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Minus,
    Deref,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Minus => f.write_str("-"),
            UnaryOp::Deref => f.write_str("*"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOp {
    pub fn is_assignment(self) -> bool {
        self == BinaryOp::Assign
    }

    pub fn is_additive(self) -> bool {
        matches!(self, BinaryOp::Add | BinaryOp::Sub)
    }

    pub fn is_multiplicative(self) -> bool {
        matches!(self, BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem)
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            BinaryOp::Assign => "=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
        };
        f.write_str(text)
    }
}
