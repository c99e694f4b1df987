//=====================================================
// File: resolver.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Name resolution and typing for the Civet AST
// Objective: Map identifier usages to their declarations with a scope
//            stack, classify every expression, and insert the implicit
//            value casts the evaluator dispatches on
//=====================================================

use std::collections::HashMap;

use thiserror::Error;

use crate::ast::{
    CastKind, Expr, ExprKind, ForInit, FunctionDecl, NodeId, Position, RetSpec, SizeOfArg, Stmt,
    TopDecl, TranslationUnit, Ty, UnaryOp, VarDecl,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error("unresolved identifier `{name}` at {position}")]
    Unresolved { name: String, position: Position },
    #[error("duplicate definition of `{name}` at {position}")]
    Duplicate { name: String, position: Position },
    #[error("call target is not a function at {position}")]
    NotCallable { position: Position },
    #[error("cannot assign to this expression at {position}")]
    InvalidAssignTarget { position: Position },
    #[error("void function `{function}` returns a value at {position}")]
    VoidReturn {
        function: String,
        position: Position,
    },
    #[error("expected a {expected} operand at {position}")]
    TypeMismatch {
        expected: &'static str,
        position: Position,
    },
}

/// Run name resolution and typing over a parsed unit. On success every
/// `DeclRef` carries its declaration's node id, every expression carries a
/// type classifier, and l-values read as values sit under implicit casts.
pub fn resolve_unit(unit: &mut TranslationUnit) -> Result<(), ResolveError> {
    let mut resolver = Resolver::new();
    resolver.collect_top_level(unit)?;
    resolver.resolve(unit)
}

struct Resolver {
    scopes: Vec<HashMap<String, NodeId>>,
    /// Declaration id to its classifier, for typing `DeclRef`s.
    classifiers: HashMap<NodeId, Ty>,
    /// Function declaration id to its return classifier, for typing calls.
    returns: HashMap<NodeId, Ty>,
    /// Name and return kind of the function whose body is being resolved,
    /// for checking `return` statements against the declared return type.
    enclosing: Option<(String, RetSpec)>,
}

impl Resolver {
    fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
            classifiers: HashMap::new(),
            returns: HashMap::new(),
            enclosing: None,
        }
    }

    /// Top-level names are visible in every function body regardless of
    /// textual order, so collect them before resolving anything.
    fn collect_top_level(&mut self, unit: &TranslationUnit) -> Result<(), ResolveError> {
        for decl in &unit.decls {
            match decl {
                TopDecl::Function(func) => {
                    // Redeclaration is legal; the later declaration wins, so
                    // a prototype followed by the definition resolves to the
                    // body.
                    self.scopes[0].insert(func.name.clone(), func.id);
                    self.classifiers.insert(func.id, Ty::Func);
                    self.returns.insert(func.id, func.ret.classifier());
                }
                TopDecl::Var(var) => {
                    self.classifiers.insert(var.id, var.spec.classifier());
                    self.define(var.name.clone(), var.id, var.pos)?;
                }
            }
        }
        Ok(())
    }

    fn resolve(&mut self, unit: &mut TranslationUnit) -> Result<(), ResolveError> {
        for decl in &mut unit.decls {
            match decl {
                TopDecl::Var(var) => {
                    // Already collected; only the initialiser needs a walk.
                    if let Some(init) = &mut var.init {
                        self.resolve_expr(init)?;
                        coerce_rvalue(init);
                    }
                }
                TopDecl::Function(func) => self.resolve_function(func)?,
            }
        }
        Ok(())
    }

    fn resolve_function(&mut self, func: &mut FunctionDecl) -> Result<(), ResolveError> {
        let Some(body) = func.body.as_mut() else {
            return Ok(());
        };
        self.enclosing = Some((func.name.clone(), func.ret));
        self.push_scope();
        for param in &func.params {
            self.classifiers.insert(param.id, param.spec.classifier());
            if let Some(name) = &param.name {
                self.define(name.clone(), param.id, param.pos)?;
            }
        }
        for stmt in body {
            self.resolve_stmt(stmt)?;
        }
        self.pop_scope();
        self.enclosing = None;
        Ok(())
    }

    fn resolve_stmt(&mut self, stmt: &mut Stmt) -> Result<(), ResolveError> {
        match stmt {
            Stmt::Decl(vars) => {
                for var in vars {
                    self.resolve_var_decl(var)?;
                }
                Ok(())
            }
            Stmt::Expr(expr) => self.resolve_expr(expr),
            Stmt::Compound(stmts) => {
                self.push_scope();
                for stmt in stmts {
                    self.resolve_stmt(stmt)?;
                }
                self.pop_scope();
                Ok(())
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(cond)?;
                coerce_rvalue(cond);
                self.resolve_stmt(then_branch)?;
                if let Some(els) = else_branch {
                    self.resolve_stmt(els)?;
                }
                Ok(())
            }
            Stmt::While { cond, body } => {
                self.resolve_expr(cond)?;
                coerce_rvalue(cond);
                self.resolve_stmt(body)
            }
            Stmt::For {
                init,
                cond,
                step,
                body,
            } => {
                self.push_scope();
                match init {
                    Some(ForInit::Decl(vars)) => {
                        for var in vars {
                            self.resolve_var_decl(var)?;
                        }
                    }
                    Some(ForInit::Expr(expr)) => self.resolve_expr(expr)?,
                    None => {}
                }
                if let Some(cond) = cond {
                    self.resolve_expr(cond)?;
                    coerce_rvalue(cond);
                }
                if let Some(step) = step {
                    self.resolve_expr(step)?;
                }
                self.resolve_stmt(body)?;
                self.pop_scope();
                Ok(())
            }
            Stmt::Return { value } => {
                if let Some(value) = value {
                    if let Some((function, RetSpec::Void)) = &self.enclosing {
                        return Err(ResolveError::VoidReturn {
                            function: function.clone(),
                            position: value.pos,
                        });
                    }
                    self.resolve_expr(value)?;
                    coerce_rvalue(value);
                }
                Ok(())
            }
        }
    }

    fn resolve_var_decl(&mut self, var: &mut VarDecl) -> Result<(), ResolveError> {
        if let Some(init) = &mut var.init {
            self.resolve_expr(init)?;
            coerce_rvalue(init);
        }
        self.classifiers.insert(var.id, var.spec.classifier());
        self.define(var.name.clone(), var.id, var.pos)
    }

    fn resolve_expr(&mut self, expr: &mut Expr) -> Result<(), ResolveError> {
        match &mut expr.kind {
            ExprKind::IntLiteral(_) => {
                expr.ty = Ty::Int;
                Ok(())
            }
            ExprKind::DeclRef { name, target } => {
                let id = self.lookup(name).ok_or_else(|| ResolveError::Unresolved {
                    name: name.clone(),
                    position: expr.pos,
                })?;
                *target = Some(id);
                expr.ty = self.classifiers.get(&id).copied().unwrap_or_default();
                Ok(())
            }
            ExprKind::Paren(inner) => {
                self.resolve_expr(inner)?;
                expr.ty = inner.ty;
                Ok(())
            }
            // The parser never produces casts; nothing to do on a re-run.
            ExprKind::Cast { operand, .. } => self.resolve_expr(operand),
            ExprKind::Unary { op, operand } => {
                self.resolve_expr(operand)?;
                coerce_rvalue(operand);
                match op {
                    UnaryOp::Minus => {
                        if operand.ty != Ty::Int {
                            return Err(ResolveError::TypeMismatch {
                                expected: "integer",
                                position: operand.pos,
                            });
                        }
                    }
                    UnaryOp::Deref => {
                        if operand.ty != Ty::Ptr {
                            return Err(ResolveError::TypeMismatch {
                                expected: "pointer",
                                position: operand.pos,
                            });
                        }
                    }
                }
                expr.ty = Ty::Int;
                Ok(())
            }
            ExprKind::Binary { op, lhs, rhs } => {
                let op = *op;
                if op.is_assignment() {
                    self.resolve_expr(lhs)?;
                    if !is_lvalue(lhs) || !matches!(lhs.ty, Ty::Int | Ty::Ptr) {
                        return Err(ResolveError::InvalidAssignTarget { position: lhs.pos });
                    }
                    self.resolve_expr(rhs)?;
                    coerce_rvalue(rhs);
                    expr.ty = lhs.ty;
                } else {
                    self.resolve_expr(lhs)?;
                    coerce_rvalue(lhs);
                    self.resolve_expr(rhs)?;
                    coerce_rvalue(rhs);
                    expr.ty = if op.is_comparison() {
                        Ty::Int
                    } else if op.is_additive() && (lhs.ty == Ty::Ptr || rhs.ty == Ty::Ptr) {
                        Ty::Ptr
                    } else {
                        Ty::Int
                    };
                }
                Ok(())
            }
            ExprKind::Call { callee, args } => {
                self.resolve_expr(callee)?;
                let ExprKind::DeclRef { target, .. } = &callee.kind else {
                    return Err(ResolveError::NotCallable {
                        position: callee.pos,
                    });
                };
                if callee.ty != Ty::Func {
                    return Err(ResolveError::NotCallable {
                        position: callee.pos,
                    });
                }
                let ret = target
                    .and_then(|id| self.returns.get(&id).copied())
                    .unwrap_or_default();
                for arg in args {
                    self.resolve_expr(arg)?;
                    coerce_rvalue(arg);
                }
                expr.ty = ret;
                Ok(())
            }
            ExprKind::Index { base, index } => {
                self.resolve_expr(base)?;
                coerce_rvalue(base);
                if base.ty != Ty::Ptr {
                    return Err(ResolveError::TypeMismatch {
                        expected: "pointer",
                        position: base.pos,
                    });
                }
                self.resolve_expr(index)?;
                coerce_rvalue(index);
                if index.ty != Ty::Int {
                    return Err(ResolveError::TypeMismatch {
                        expected: "integer",
                        position: index.pos,
                    });
                }
                expr.ty = Ty::Int;
                Ok(())
            }
            ExprKind::SizeOf(arg) => {
                // The operand is unevaluated; names in it must still resolve.
                if let SizeOfArg::Expr(operand) = arg {
                    self.resolve_expr(operand)?;
                }
                expr.ty = Ty::Int;
                Ok(())
            }
        }
    }

    fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    fn define(&mut self, name: String, id: NodeId, pos: Position) -> Result<(), ResolveError> {
        let scope = self
            .scopes
            .last_mut()
            .expect("scope stack is never empty");
        if scope.contains_key(&name) {
            return Err(ResolveError::Duplicate {
                name,
                position: pos,
            });
        }
        scope.insert(name, id);
        Ok(())
    }

    fn lookup(&self, name: &str) -> Option<NodeId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .copied()
    }
}

/// Wrap an expression used as a value: arrays decay to pointers, other
/// l-values get an l-value-to-r-value read.
fn coerce_rvalue(expr: &mut Expr) {
    if expr.ty == Ty::Array {
        wrap_cast(expr, CastKind::ArrayToPointerDecay, Ty::Ptr);
    } else if is_lvalue(expr) {
        let ty = expr.ty;
        wrap_cast(expr, CastKind::LValueToRValue, ty);
    }
}

fn is_lvalue(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::DeclRef { .. } => matches!(expr.ty, Ty::Int | Ty::Ptr),
        ExprKind::Index { .. } => true,
        ExprKind::Unary {
            op: UnaryOp::Deref, ..
        } => true,
        ExprKind::Paren(inner) => is_lvalue(inner),
        _ => false,
    }
}

fn wrap_cast(expr: &mut Expr, kind: CastKind, ty: Ty) {
    let pos = expr.pos;
    let inner = std::mem::replace(expr, Expr::new(ExprKind::IntLiteral(0), pos));
    let mut cast = Expr::new(
        ExprKind::Cast {
            kind,
            operand: Box::new(inner),
        },
        pos,
    );
    cast.ty = ty;
    *expr = cast;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::tokenizer::Tokenizer;

    fn resolve(source: &str) -> TranslationUnit {
        let mut unit = parse(source);
        resolve_unit(&mut unit).expect("resolve");
        unit
    }

    fn resolve_err(source: &str) -> ResolveError {
        let mut unit = parse(source);
        resolve_unit(&mut unit).unwrap_err()
    }

    fn parse(source: &str) -> TranslationUnit {
        let tokens = Tokenizer::new(source).tokenize().expect("tokenize");
        Parser::new(tokens).parse().expect("parse")
    }

    fn main_body(unit: &TranslationUnit) -> &[Stmt] {
        for decl in &unit.decls {
            if let TopDecl::Function(func) = decl {
                if func.name == "main" {
                    return func.body.as_deref().expect("main body");
                }
            }
        }
        panic!("no main in unit");
    }

    #[test]
    fn reads_are_wrapped_in_lvalue_casts() {
        let unit = resolve("int main() { int x; int y; x = y; }");
        let Stmt::Expr(assign) = &main_body(&unit)[2] else {
            panic!("expected expression statement");
        };
        let ExprKind::Binary { lhs, rhs, .. } = &assign.kind else {
            panic!("expected assignment");
        };
        // The target stays a bare reference; the source becomes a read.
        assert!(matches!(lhs.kind, ExprKind::DeclRef { .. }));
        let ExprKind::Cast { kind, operand } = &rhs.kind else {
            panic!("expected cast around the read, found {:?}", rhs.kind);
        };
        assert_eq!(*kind, CastKind::LValueToRValue);
        assert!(matches!(operand.kind, ExprKind::DeclRef { .. }));
        assert_eq!(rhs.ty, Ty::Int);
    }

    #[test]
    fn arrays_decay_to_pointers_when_read() {
        let unit = resolve("int main() { int a[3]; int * p; p = a; }");
        let Stmt::Expr(assign) = &main_body(&unit)[2] else {
            panic!("expected expression statement");
        };
        let ExprKind::Binary { rhs, .. } = &assign.kind else {
            panic!("expected assignment");
        };
        let ExprKind::Cast { kind, .. } = &rhs.kind else {
            panic!("expected decay cast, found {:?}", rhs.kind);
        };
        assert_eq!(*kind, CastKind::ArrayToPointerDecay);
        assert_eq!(rhs.ty, Ty::Ptr);
    }

    #[test]
    fn inner_declaration_shadows_outer() {
        let unit = resolve("int main() { int x; { int x; x = 1; } x = 2; }");
        let body = main_body(&unit);
        let Stmt::Decl(outer) = &body[0] else {
            panic!("expected declaration");
        };
        let Stmt::Compound(block) = &body[1] else {
            panic!("expected block");
        };
        let Stmt::Decl(inner) = &block[0] else {
            panic!("expected inner declaration");
        };
        let Stmt::Expr(inner_assign) = &block[1] else {
            panic!("expected inner assignment");
        };
        let ExprKind::Binary { lhs, .. } = &inner_assign.kind else {
            panic!("expected assignment");
        };
        let ExprKind::DeclRef { target, .. } = &lhs.kind else {
            panic!("expected declref");
        };
        assert_eq!(*target, Some(inner[0].id));
        assert_ne!(*target, Some(outer[0].id));
    }

    #[test]
    fn parameters_resolve_inside_the_body() {
        let unit = resolve("int add(int a, int b) { return a + b; } int main() { return 0; }");
        let TopDecl::Function(func) = &unit.decls[0] else {
            panic!("expected function");
        };
        let Stmt::Return { value: Some(value) } = &func.body.as_deref().expect("body")[0] else {
            panic!("expected return");
        };
        let ExprKind::Binary { lhs, .. } = &value.kind else {
            panic!("expected addition");
        };
        let ExprKind::Cast { operand, .. } = &lhs.kind else {
            panic!("expected read cast");
        };
        let ExprKind::DeclRef { target, .. } = &operand.kind else {
            panic!("expected declref");
        };
        assert_eq!(*target, Some(func.params[0].id));
    }

    #[test]
    fn unresolved_name_is_an_error() {
        let err = resolve_err("int main() { x = 1; }");
        assert!(matches!(err, ResolveError::Unresolved { .. }));
    }

    #[test]
    fn duplicate_local_is_an_error() {
        let err = resolve_err("int main() { int x; int x; }");
        assert!(matches!(err, ResolveError::Duplicate { .. }));
    }

    #[test]
    fn assigning_to_a_literal_is_an_error() {
        let err = resolve_err("int main() { 3 = 4; }");
        assert!(matches!(err, ResolveError::InvalidAssignTarget { .. }));
    }

    #[test]
    fn calling_a_variable_is_an_error() {
        let err = resolve_err("int main() { int x; x(); }");
        assert!(matches!(err, ResolveError::NotCallable { .. }));
    }

    #[test]
    fn dereferencing_an_integer_is_an_error() {
        let err = resolve_err("int main() { int x; int y; y = *x; }");
        assert!(matches!(err, ResolveError::TypeMismatch { .. }));
    }

    #[test]
    fn void_functions_cannot_return_values() {
        let err = resolve_err("void f() { return 3; }\nint main() { f(); return 0; }");
        let ResolveError::VoidReturn { function, .. } = err else {
            panic!("expected a void-return error, found {err:?}");
        };
        assert_eq!(function, "f");
    }

    #[test]
    fn void_return_inside_a_nested_call_blames_the_void_function() {
        let err = resolve_err(
            "void bad() { return 1; }\nint add(int a, int b) { bad(); return a + b; }\nint main() { int x; x = add(2, 3); return 0; }",
        );
        let ResolveError::VoidReturn { function, .. } = err else {
            panic!("expected a void-return error, found {err:?}");
        };
        assert_eq!(function, "bad");
    }

    #[test]
    fn comparisons_classify_as_integer() {
        let unit = resolve("int main() { int x; x = 1 < 2; }");
        let Stmt::Expr(assign) = &main_body(&unit)[1] else {
            panic!("expected expression statement");
        };
        let ExprKind::Binary { rhs, .. } = &assign.kind else {
            panic!("expected assignment");
        };
        assert_eq!(rhs.ty, Ty::Int);
    }

    #[test]
    fn pointer_arithmetic_classifies_as_pointer() {
        let unit = resolve("int main() { int a[4]; int * p; p = a + 2; }");
        let Stmt::Expr(assign) = &main_body(&unit)[2] else {
            panic!("expected expression statement");
        };
        let ExprKind::Binary { rhs, .. } = &assign.kind else {
            panic!("expected assignment");
        };
        assert_eq!(rhs.ty, Ty::Ptr);
    }
}
