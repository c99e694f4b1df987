//! The evaluator: an environment holding frames, heap, and globals, plus a
//! visitor that drives post-order recursion over the typed AST.
//!
//! Every visited expression installs its value in the current frame's
//! expression map; parents read their children's values back out of that
//! map. A `return` unwinds the in-progress visitors up to the enclosing
//! call through the `Flow` result of every visit.

mod errors;
mod value;

pub use errors::{eval_error_code, CivetError, ErrorCode, EvalError};
pub use value::{Frame, Heap, HeapBlock, HeapId, Value, CELL_SIZE};

use std::collections::HashMap;
use std::io::{BufRead, Write};

use tracing::debug;

use crate::ast::{
    BinaryOp, CastKind, Expr, ExprKind, ForInit, FunctionDecl, NodeId, RetSpec, Stmt, TopDecl,
    TranslationUnit, Ty, TypeSpec, UnaryOp, VarDecl,
};

/// Outcome of a single visit: evaluation either continues with the next
/// sibling or a `return` is unwinding to the enclosing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Returned,
}

/// What the environment decided about a call expression: intrinsics are
/// handled in place, user calls require the visitor to walk the callee body.
pub enum CallOutcome<'ast> {
    Intrinsic,
    Descend(&'ast FunctionDecl),
}

/// A call expression awaiting a non-void result, tagged with the depth of
/// the frame whose `return` must deliver it.
#[derive(Debug, Clone, Copy)]
struct PendingCall {
    call: NodeId,
    depth: usize,
}

/// Owns all evaluation state and hosts one operation per AST node kind.
pub struct Environment<'ast, R, W> {
    frames: Vec<Frame>,
    heap: Heap,
    /// Global variable values; for a non-intrinsic function the stored
    /// value is its parameter count, checked at call time.
    globals: HashMap<NodeId, Value>,
    functions: HashMap<NodeId, &'ast FunctionDecl>,
    free_decl: Option<NodeId>,
    malloc_decl: Option<NodeId>,
    get_decl: Option<NodeId>,
    print_decl: Option<NodeId>,
    /// The currently executing function, rewritten at each user-call
    /// descent; the driver enters `main` through it.
    entry: Option<&'ast FunctionDecl>,
    /// Call expressions still awaiting a non-void result, one per active
    /// non-void user call.
    ret_stack: Vec<PendingCall>,
    input: R,
    output: W,
}

impl<'ast, R: BufRead, W: Write> Environment<'ast, R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            frames: Vec::new(),
            heap: Heap::new(),
            globals: HashMap::new(),
            functions: HashMap::new(),
            free_decl: None,
            malloc_decl: None,
            get_decl: None,
            print_decl: None,
            entry: None,
            ret_stack: Vec::new(),
            input,
            output,
        }
    }

    /// Walk the unit's top-level declarations once: record intrinsics and
    /// `main`, store user function arities, and materialise globals.
    pub fn init(&mut self, unit: &'ast TranslationUnit) -> Result<(), EvalError> {
        for decl in &unit.decls {
            match decl {
                TopDecl::Function(func) => {
                    self.functions.insert(func.id, func);
                    match func.name.as_str() {
                        "FREE" => self.free_decl = Some(func.id),
                        "MALLOC" => self.malloc_decl = Some(func.id),
                        "GET" => self.get_decl = Some(func.id),
                        "PRINT" => self.print_decl = Some(func.id),
                        "main" => self.entry = Some(func),
                        _ => {
                            self.globals
                                .insert(func.id, Value::Int(func.params.len() as i64));
                        }
                    }
                }
                TopDecl::Var(var) => {
                    let value = match var.spec {
                        TypeSpec::Int => Value::Int(literal_init(var)),
                        TypeSpec::Array(len) => Value::Array(self.alloc_block(len as usize)),
                        TypeSpec::Ptr => {
                            return Err(EvalError::UnsupportedType(format!(
                                "global `{}` of pointer type",
                                var.name
                            )))
                        }
                    };
                    self.globals.insert(var.id, value);
                }
            }
        }
        // One frame exists before `main` is entered, for scratch state.
        self.frames.push(Frame::new());
        debug!(
            functions = self.functions.len(),
            globals = self.globals.len(),
            heap_blocks = self.heap.len(),
            "environment initialised"
        );
        Ok(())
    }

    pub fn entry(&self) -> Option<&'ast FunctionDecl> {
        self.entry
    }

    pub fn stack_depth(&self) -> usize {
        self.frames.len()
    }

    pub fn pop_frame(&mut self) {
        self.frames.pop();
    }

    //=============================================
    // Expression operations
    //=============================================

    pub fn integer(&mut self, expr: &Expr, value: i64) {
        self.frame_mut().bind_expr(expr.id, Value::Int(value));
    }

    pub fn paren(&mut self, expr: &Expr, inner: &Expr) -> Result<(), EvalError> {
        let value = self.expr_val(inner)?;
        self.frame_mut().bind_expr(expr.id, value);
        Ok(())
    }

    /// Every admissible type is one 8-byte cell wide.
    pub fn size_of(&mut self, expr: &Expr) {
        self.frame_mut().bind_expr(expr.id, Value::Int(CELL_SIZE));
    }

    pub fn decl_ref(
        &mut self,
        expr: &Expr,
        name: &str,
        target: Option<NodeId>,
    ) -> Result<(), EvalError> {
        self.frame_mut().set_pc(expr.id);
        match expr.ty {
            // Call targets bind no value of their own.
            Ty::Func => Ok(()),
            Ty::Int | Ty::Ptr | Ty::Array => {
                let decl = target.ok_or_else(|| EvalError::UnboundDecl(name.to_string()))?;
                let value = self
                    .lookup_decl(decl)
                    .ok_or_else(|| EvalError::UnboundDecl(name.to_string()))?;
                self.frame_mut().bind_expr(expr.id, value);
                Ok(())
            }
            Ty::Void | Ty::Unknown => Err(EvalError::UnsupportedType(format!(
                "reference to `{}` of {} type",
                name, expr.ty
            ))),
        }
    }

    pub fn cast(&mut self, expr: &Expr, kind: CastKind, operand: &Expr) -> Result<(), EvalError> {
        self.frame_mut().set_pc(expr.id);
        // Reading through `*p`: the operand bound the raw pointer, the cast
        // performs the load.
        if kind == CastKind::LValueToRValue
            && matches!(
                operand.strip_parens().kind,
                ExprKind::Unary {
                    op: UnaryOp::Deref,
                    ..
                }
            )
        {
            let pointer = self.expr_val(operand)?;
            let (block, offset) = pointer.location().ok_or_else(|| {
                EvalError::UnsupportedOp("dereference of a non-pointer value".to_string())
            })?;
            let value = self.heap.read(block, offset);
            self.frame_mut().bind_expr(expr.id, value);
            return Ok(());
        }
        match expr.ty {
            Ty::Int | Ty::Ptr => {
                let value = self.expr_val(operand)?;
                self.frame_mut().bind_expr(expr.id, value);
                Ok(())
            }
            other => Err(EvalError::UnsupportedType(format!("cast to {other} type"))),
        }
    }

    pub fn unary_op(&mut self, expr: &Expr, op: UnaryOp, operand: &Expr) -> Result<(), EvalError> {
        match op {
            UnaryOp::Minus => {
                let value = self.expr_int(operand)?;
                self.frame_mut()
                    .bind_expr(expr.id, Value::Int(value.wrapping_neg()));
            }
            // `*p` binds its operand's pointer unchanged; reads happen in
            // the enclosing cast, writes in assignment.
            UnaryOp::Deref => {
                let value = self.expr_val(operand)?;
                self.frame_mut().bind_expr(expr.id, value);
            }
        }
        Ok(())
    }

    /// `a[i]` read as a value.
    pub fn index_value(&mut self, expr: &Expr, base: &Expr, index: &Expr) -> Result<(), EvalError> {
        let (block, start) = self.expr_val(base)?.location().ok_or_else(|| {
            EvalError::UnsupportedOp("subscript of a non-pointer value".to_string())
        })?;
        let idx = self.expr_int(index)?;
        let value = self.heap.read(block, start + idx);
        self.frame_mut().bind_expr(expr.id, value);
        Ok(())
    }

    pub fn binary_op(
        &mut self,
        expr: &Expr,
        op: BinaryOp,
        lhs: &Expr,
        rhs: &Expr,
    ) -> Result<(), EvalError> {
        if op.is_assignment() {
            return self.assign(expr, lhs, rhs);
        }
        let left = self.expr_val(lhs)?;
        let right = self.expr_val(rhs)?;
        let result = if op.is_additive() && lhs.ty == Ty::Ptr {
            self.pointer_offset(op, left, right)?
        } else if op.is_additive() && rhs.ty == Ty::Ptr {
            self.pointer_offset(op, right, left)?
        } else if op.is_comparison() {
            Value::Int(compare(op, left, right)?)
        } else if op.is_additive() || op.is_multiplicative() {
            let l = int_operand(left)?;
            let r = int_operand(right)?;
            let value = match op {
                BinaryOp::Add => l.wrapping_add(r),
                BinaryOp::Sub => l.wrapping_sub(r),
                BinaryOp::Mul => l.wrapping_mul(r),
                // Division by zero is undefined in the dialect; let it
                // fault.
                BinaryOp::Div => l / r,
                BinaryOp::Rem => l % r,
                other => {
                    return Err(EvalError::UnsupportedOp(format!(
                        "binary operator `{other}`"
                    )))
                }
            };
            Value::Int(value)
        } else {
            return Err(EvalError::UnsupportedOp(format!("binary operator `{op}`")));
        };
        self.frame_mut().bind_expr(expr.id, result);
        Ok(())
    }

    /// Pointer arithmetic adjusts the element offset by the integer side.
    fn pointer_offset(
        &self,
        op: BinaryOp,
        pointer: Value,
        delta: Value,
    ) -> Result<Value, EvalError> {
        let (block, offset) = pointer.location().ok_or_else(|| {
            EvalError::UnsupportedOp("pointer arithmetic on a non-pointer value".to_string())
        })?;
        let delta = int_operand(delta)?;
        let offset = match op {
            BinaryOp::Add => offset.wrapping_add(delta),
            BinaryOp::Sub => offset.wrapping_sub(delta),
            other => {
                return Err(EvalError::UnsupportedOp(format!(
                    "pointer operator `{other}`"
                )))
            }
        };
        Ok(Value::Ptr { block, offset })
    }

    fn assign(&mut self, expr: &Expr, lhs: &Expr, rhs: &Expr) -> Result<(), EvalError> {
        let value = self.expr_val(rhs)?;
        let target = lhs.strip_parens();
        match &target.kind {
            ExprKind::Index { base, index } => {
                let (block, start) = self.expr_val(base)?.location().ok_or_else(|| {
                    EvalError::UnsupportedOp("subscript of a non-pointer value".to_string())
                })?;
                let idx = self.expr_int(index)?;
                self.heap.write(block, start + idx, value);
            }
            ExprKind::Unary {
                op: UnaryOp::Deref,
                operand,
            } => {
                let (block, offset) = self.expr_val(operand)?.location().ok_or_else(|| {
                    EvalError::UnsupportedOp("dereference of a non-pointer value".to_string())
                })?;
                self.heap.write(block, offset, value);
            }
            ExprKind::DeclRef { name, target: decl } => {
                let decl = decl.ok_or_else(|| EvalError::UnboundDecl(name.clone()))?;
                if self.frame().has_decl(decl) {
                    self.frame_mut().bind_decl(decl, value);
                } else if self.globals.contains_key(&decl) {
                    self.globals.insert(decl, value);
                } else {
                    return Err(EvalError::UnboundDecl(name.clone()));
                }
                self.frame_mut().bind_expr(target.id, value);
            }
            _ => {
                return Err(EvalError::UnsupportedOp(
                    "invalid assignment target".to_string(),
                ))
            }
        }
        self.frame_mut().bind_expr(expr.id, value);
        Ok(())
    }

    //=============================================
    // Statement operations
    //=============================================

    pub fn decl_stmt(&mut self, vars: &'ast [VarDecl]) {
        for var in vars {
            let value = match var.spec {
                // Only a plain literal initialiser carries over; any other
                // initialiser binds zero in this dialect.
                TypeSpec::Int => Value::Int(literal_init(var)),
                TypeSpec::Array(len) => Value::Array(self.alloc_block(len as usize)),
                // Null-equivalent.
                TypeSpec::Ptr => Value::Int(0),
            };
            self.frame_mut().bind_decl(var.id, value);
        }
    }

    /// Deliver a `return` value to the call awaiting it. Returning from
    /// `main` and value-less returns perform no frame manipulation; the
    /// visitor's flow signal does the unwinding.
    pub fn return_stmt(&mut self, value: Option<&Expr>) -> Result<(), EvalError> {
        let Some(value) = value else {
            return Ok(());
        };
        if self.frames.len() <= 1 {
            return Ok(());
        }
        let result = self.expr_val(value)?;
        // The pending slot must belong to this frame; a stray value-bearing
        // return in a void callee must not steal an enclosing call's slot.
        // The resolver rejects such programs, so this guards the invariant.
        match self.ret_stack.last() {
            Some(pending) if pending.depth == self.frames.len() => {
                let call = pending.call;
                self.ret_stack.pop();
                self.frames.pop();
                self.frame_mut().bind_expr(call, result);
                Ok(())
            }
            _ => Err(EvalError::UnsupportedForm(
                "return with a value from a void function".to_string(),
            )),
        }
    }

    //=============================================
    // Calling convention
    //=============================================

    pub fn call(
        &mut self,
        expr: &Expr,
        callee: &Expr,
        args: &'ast [Expr],
    ) -> Result<CallOutcome<'ast>, EvalError> {
        self.frame_mut().set_pc(expr.id);
        let ExprKind::DeclRef { name, target } = &callee.strip_parens().kind else {
            return Err(EvalError::UnsupportedForm(
                "call target is not a direct function reference".to_string(),
            ));
        };
        let decl = target.ok_or_else(|| EvalError::UnboundDecl(name.clone()))?;

        if Some(decl) == self.get_decl {
            self.check_arity(name, 0, args.len())?;
            write!(self.output, "Please Input an Integer Value : ")?;
            self.output.flush()?;
            let value = self.read_int()?;
            self.frame_mut().bind_expr(expr.id, Value::Int(value));
            return Ok(CallOutcome::Intrinsic);
        }
        if Some(decl) == self.print_decl {
            self.check_arity(name, 1, args.len())?;
            let value = self.expr_int(&args[0])?;
            write!(self.output, "{value}")?;
            self.output.flush()?;
            return Ok(CallOutcome::Intrinsic);
        }
        if Some(decl) == self.malloc_decl {
            self.check_arity(name, 1, args.len())?;
            let requested = self.expr_int(&args[0])?;
            // Dialect quirk: a literal argument is a byte count and is
            // scaled by the cell size; a computed argument is taken
            // verbatim as a cell count.
            let cells = if matches!(args[0].kind, ExprKind::IntLiteral(_)) {
                requested.wrapping_mul(CELL_SIZE)
            } else {
                requested
            };
            let cells = usize::try_from(cells).map_err(|_| {
                EvalError::UnsupportedForm("MALLOC size must be non-negative".to_string())
            })?;
            let handle = self.alloc_block(cells);
            self.frame_mut().bind_expr(
                expr.id,
                Value::Ptr {
                    block: handle,
                    offset: 0,
                },
            );
            return Ok(CallOutcome::Intrinsic);
        }
        if Some(decl) == self.free_decl {
            self.check_arity(name, 1, args.len())?;
            // Blocks stay live until exit; handles are never invalidated.
            debug!("FREE is a no-op");
            return Ok(CallOutcome::Intrinsic);
        }

        let arity = self
            .globals
            .get(&decl)
            .and_then(|value| value.as_int())
            .ok_or_else(|| EvalError::UnboundDecl(name.clone()))?;
        self.check_arity(name, arity as usize, args.len())?;
        let func = self
            .functions
            .get(&decl)
            .copied()
            .filter(|func| func.body.is_some())
            .ok_or_else(|| EvalError::UnboundDecl(name.clone()))?;

        let mut frame = Frame::new();
        for (param, arg) in func.params.iter().zip(args) {
            let value = self.expr_val(arg)?;
            frame.bind_decl(param.id, value);
        }
        if func.ret != RetSpec::Void {
            self.ret_stack.push(PendingCall {
                call: expr.id,
                depth: self.frames.len() + 1,
            });
        }
        self.frames.push(frame);
        self.entry = Some(func);
        debug!(callee = %func.name, depth = self.frames.len(), "descending into user call");
        Ok(CallOutcome::Descend(func))
    }

    fn check_arity(&self, name: &str, expected: usize, found: usize) -> Result<(), EvalError> {
        if expected != found {
            return Err(EvalError::ArityMismatch {
                name: name.to_string(),
                expected,
                found,
            });
        }
        Ok(())
    }

    /// scanf-style `%d`: skip whitespace, then an optional sign and digits.
    /// A failed or exhausted read yields zero.
    fn read_int(&mut self) -> Result<i64, EvalError> {
        let mut byte = [0u8; 1];
        let mut next = loop {
            if self.input.read(&mut byte)? == 0 {
                return Ok(0);
            }
            if !byte[0].is_ascii_whitespace() {
                break byte[0];
            }
        };
        let mut text = String::new();
        if next == b'-' || next == b'+' {
            text.push(next as char);
            if self.input.read(&mut byte)? == 0 {
                return Ok(0);
            }
            next = byte[0];
        }
        while next.is_ascii_digit() {
            text.push(next as char);
            if self.input.read(&mut byte)? == 0 {
                break;
            }
            next = byte[0];
        }
        Ok(text.parse().unwrap_or(0))
    }

    //=============================================
    // Shared lookups
    //=============================================

    pub fn expr_val(&self, expr: &Expr) -> Result<Value, EvalError> {
        self.frame().expr_val(expr.id).ok_or_else(|| {
            debug!(pc = ?self.frame().pc(), node = expr.id, "expression has no bound value");
            EvalError::MissingExprValue
        })
    }

    pub fn expr_int(&self, expr: &Expr) -> Result<i64, EvalError> {
        int_operand(self.expr_val(expr)?)
    }

    fn lookup_decl(&self, decl: NodeId) -> Option<Value> {
        if let Some(value) = self.frame().decl_val(decl) {
            return Some(value);
        }
        self.globals.get(&decl).copied()
    }

    fn alloc_block(&mut self, cells: usize) -> HeapId {
        let handle = self.heap.alloc(cells);
        debug!(
            handle,
            cells,
            bytes = self.heap.block_bytes(handle),
            "allocated heap block"
        );
        handle
    }

    fn frame(&self) -> &Frame {
        self.frames
            .last()
            .expect("frame stack is never empty during evaluation")
    }

    fn frame_mut(&mut self) -> &mut Frame {
        self.frames
            .last_mut()
            .expect("frame stack is never empty during evaluation")
    }
}

fn literal_init(var: &VarDecl) -> i64 {
    match &var.init {
        Some(Expr {
            kind: ExprKind::IntLiteral(value),
            ..
        }) => *value,
        _ => 0,
    }
}

fn int_operand(value: Value) -> Result<i64, EvalError> {
    value
        .as_int()
        .ok_or_else(|| EvalError::UnsupportedType("expected an integer value".to_string()))
}

/// Comparisons yield 0 or 1. Integers compare numerically; addresses into
/// the same block compare by offset; unrelated values only support
/// (in)equality.
fn compare(op: BinaryOp, left: Value, right: Value) -> Result<i64, EvalError> {
    use std::cmp::Ordering;

    let ordering = match (left, right) {
        (Value::Int(l), Value::Int(r)) => l.cmp(&r),
        _ => match (left.location(), right.location()) {
            (Some((lb, lo)), Some((rb, ro))) if lb == rb => lo.cmp(&ro),
            _ => {
                return match op {
                    BinaryOp::Eq => Ok(i64::from(left == right)),
                    BinaryOp::Ne => Ok(i64::from(left != right)),
                    _ => Err(EvalError::UnsupportedOp(
                        "ordering of unrelated values".to_string(),
                    )),
                }
            }
        },
    };
    let result = match op {
        BinaryOp::Eq => ordering == Ordering::Equal,
        BinaryOp::Ne => ordering != Ordering::Equal,
        BinaryOp::Lt => ordering == Ordering::Less,
        BinaryOp::Le => ordering != Ordering::Greater,
        BinaryOp::Gt => ordering == Ordering::Greater,
        BinaryOp::Ge => ordering != Ordering::Less,
        other => {
            return Err(EvalError::UnsupportedOp(format!(
                "comparison operator `{other}`"
            )))
        }
    };
    Ok(i64::from(result))
}

/// Drives recursion over the AST and realises the control-flow semantics
/// of `if`/`while`/`for` and early-return unwinding.
pub struct Interpreter<'ast, R, W> {
    env: Environment<'ast, R, W>,
}

impl<'ast, R: BufRead, W: Write> Interpreter<'ast, R, W> {
    pub fn new(unit: &'ast TranslationUnit, input: R, output: W) -> Result<Self, EvalError> {
        let mut env = Environment::new(input, output);
        env.init(unit)?;
        Ok(Self { env })
    }

    /// Evaluate `main()` to completion.
    pub fn run(&mut self) -> Result<(), EvalError> {
        let entry = self
            .env
            .entry()
            .ok_or_else(|| EvalError::UnboundDecl("main".to_string()))?;
        let body = entry
            .body
            .as_deref()
            .ok_or_else(|| EvalError::UnsupportedForm("main has no body".to_string()))?;
        for stmt in body {
            if self.visit_stmt(stmt)? == Flow::Returned {
                break;
            }
        }
        Ok(())
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) -> Result<Flow, EvalError> {
        match stmt {
            Stmt::Decl(vars) => {
                self.env.decl_stmt(vars);
                Ok(Flow::Continue)
            }
            Stmt::Expr(expr) => self.visit_expr(expr),
            Stmt::Compound(stmts) => {
                for stmt in stmts {
                    if self.visit_stmt(stmt)? == Flow::Returned {
                        return Ok(Flow::Returned);
                    }
                }
                Ok(Flow::Continue)
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.visit_expr(cond)? == Flow::Returned {
                    return Ok(Flow::Returned);
                }
                if self.env.expr_int(cond)? != 0 {
                    self.visit_stmt(then_branch)
                } else if let Some(els) = else_branch {
                    self.visit_stmt(els)
                } else {
                    Ok(Flow::Continue)
                }
            }
            Stmt::While { cond, body } => loop {
                if self.visit_expr(cond)? == Flow::Returned {
                    return Ok(Flow::Returned);
                }
                if self.env.expr_int(cond)? == 0 {
                    return Ok(Flow::Continue);
                }
                if self.visit_stmt(body)? == Flow::Returned {
                    return Ok(Flow::Returned);
                }
            },
            Stmt::For {
                init,
                cond,
                step,
                body,
            } => {
                match init {
                    Some(ForInit::Decl(vars)) => self.env.decl_stmt(vars),
                    Some(ForInit::Expr(expr)) => {
                        if self.visit_expr(expr)? == Flow::Returned {
                            return Ok(Flow::Returned);
                        }
                    }
                    None => {}
                }
                let Some(cond) = cond else {
                    return Err(EvalError::UnsupportedForm(
                        "for statement without a condition".to_string(),
                    ));
                };
                loop {
                    if self.visit_expr(cond)? == Flow::Returned {
                        return Ok(Flow::Returned);
                    }
                    if self.env.expr_int(cond)? == 0 {
                        return Ok(Flow::Continue);
                    }
                    if self.visit_stmt(body)? == Flow::Returned {
                        return Ok(Flow::Returned);
                    }
                    if let Some(step) = step {
                        if self.visit_expr(step)? == Flow::Returned {
                            return Ok(Flow::Returned);
                        }
                    }
                }
            }
            Stmt::Return { value } => {
                if let Some(value) = value {
                    if self.visit_expr(value)? == Flow::Returned {
                        return Ok(Flow::Returned);
                    }
                }
                self.env.return_stmt(value.as_ref())?;
                Ok(Flow::Returned)
            }
        }
    }

    fn visit_expr(&mut self, expr: &'ast Expr) -> Result<Flow, EvalError> {
        match &expr.kind {
            ExprKind::IntLiteral(value) => {
                self.env.integer(expr, *value);
                Ok(Flow::Continue)
            }
            ExprKind::DeclRef { name, target } => {
                self.env.decl_ref(expr, name, *target)?;
                Ok(Flow::Continue)
            }
            ExprKind::Paren(inner) => {
                if self.visit_expr(inner)? == Flow::Returned {
                    return Ok(Flow::Returned);
                }
                self.env.paren(expr, inner)?;
                Ok(Flow::Continue)
            }
            ExprKind::Cast { kind, operand } => {
                if self.visit_expr(operand)? == Flow::Returned {
                    return Ok(Flow::Returned);
                }
                self.env.cast(expr, *kind, operand)?;
                Ok(Flow::Continue)
            }
            ExprKind::Unary { op, operand } => {
                if self.visit_expr(operand)? == Flow::Returned {
                    return Ok(Flow::Returned);
                }
                self.env.unary_op(expr, *op, operand)?;
                Ok(Flow::Continue)
            }
            ExprKind::Binary { op, lhs, rhs } => {
                if self.visit_expr(lhs)? == Flow::Returned {
                    return Ok(Flow::Returned);
                }
                if self.visit_expr(rhs)? == Flow::Returned {
                    return Ok(Flow::Returned);
                }
                self.env.binary_op(expr, *op, lhs, rhs)?;
                Ok(Flow::Continue)
            }
            ExprKind::Index { base, index } => {
                if self.visit_expr(base)? == Flow::Returned {
                    return Ok(Flow::Returned);
                }
                if self.visit_expr(index)? == Flow::Returned {
                    return Ok(Flow::Returned);
                }
                self.env.index_value(expr, base, index)?;
                Ok(Flow::Continue)
            }
            // The operand of sizeof is never evaluated.
            ExprKind::SizeOf(_) => {
                self.env.size_of(expr);
                Ok(Flow::Continue)
            }
            ExprKind::Call { callee, args } => self.visit_call(expr, callee, args),
        }
    }

    fn visit_call(
        &mut self,
        expr: &'ast Expr,
        callee: &'ast Expr,
        args: &'ast [Expr],
    ) -> Result<Flow, EvalError> {
        if self.visit_expr(callee)? == Flow::Returned {
            return Ok(Flow::Returned);
        }
        for arg in args {
            // An in-flight return aborts the call.
            if self.visit_expr(arg)? == Flow::Returned {
                return Ok(Flow::Returned);
            }
        }
        match self.env.call(expr, callee, args)? {
            CallOutcome::Intrinsic => Ok(Flow::Continue),
            CallOutcome::Descend(func) => {
                let Some(body) = func.body.as_deref() else {
                    return Err(EvalError::UnboundDecl(func.name.clone()));
                };
                let depth = self.env.stack_depth();
                for stmt in body {
                    if self.visit_stmt(stmt)? == Flow::Returned {
                        break;
                    }
                }
                // A value-bearing return already popped the callee frame; a
                // void return or a fall-through leaves it for us.
                if self.env.stack_depth() == depth {
                    self.env.pop_frame();
                    if func.ret != RetSpec::Void {
                        return Err(EvalError::MissingExprValue);
                    }
                }
                Ok(Flow::Continue)
            }
        }
    }
}
