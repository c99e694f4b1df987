//=====================================================
// File: parser.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Civet recursive descent parser
// Objective: Transform the token stream into the untyped AST consumed by
//            the resolver and interpreter
//=====================================================

use thiserror::Error;

use crate::ast::{
    next_node_id, BinaryOp, Expr, ExprKind, ForInit, FunctionDecl, ParamDecl, Position, RetSpec,
    SizeOfArg, Stmt, TopDecl, TranslationUnit, TypeSpec, UnaryOp, VarDecl,
};
use crate::tokenizer::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("expected {expected} but found `{found}` at {position}")]
    UnexpectedToken {
        expected: String,
        found: TokenKind,
        position: Position,
    },
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEndOfInput { expected: String },
    #[error("invalid syntax: {message} at {position}")]
    InvalidSyntax { message: String, position: Position },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BaseType {
    Int,
    Void,
}

/// Recursive descent parser over the C subset.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0 }
    }

    /// Parse a whole translation unit: function definitions, prototypes,
    /// and global variable declarations.
    pub fn parse(&mut self) -> Result<TranslationUnit, ParseError> {
        let mut decls = Vec::new();
        while !self.at_end() {
            decls.extend(self.parse_top_decl()?);
        }
        Ok(TranslationUnit { decls })
    }

    fn parse_top_decl(&mut self) -> Result<Vec<TopDecl>, ParseError> {
        // `extern` is accepted and carries no meaning in this dialect.
        self.eat(&TokenKind::Extern);
        let base = self.parse_base_type()?;
        let stars = self.parse_stars()?;
        let (name, name_pos) = self.expect_identifier()?;
        if self.check(&TokenKind::LeftParen) {
            let func = self.finish_function(base, stars, name, name_pos)?;
            Ok(vec![TopDecl::Function(func)])
        } else {
            let vars = self.finish_var_decls(base, stars, name, name_pos)?;
            Ok(vars.into_iter().map(TopDecl::Var).collect())
        }
    }

    fn finish_function(
        &mut self,
        base: BaseType,
        stars: usize,
        name: String,
        pos: Position,
    ) -> Result<FunctionDecl, ParseError> {
        let ret = if stars > 0 {
            RetSpec::Ptr
        } else {
            match base {
                BaseType::Int => RetSpec::Int,
                BaseType::Void => RetSpec::Void,
            }
        };
        let params = self.parse_params()?;
        let body = if self.check(&TokenKind::LeftBrace) {
            Some(self.parse_compound()?)
        } else {
            self.expect(&TokenKind::Semicolon, ";")?;
            None
        };
        Ok(FunctionDecl {
            id: next_node_id(),
            name,
            ret,
            params,
            body,
            pos,
        })
    }

    fn parse_params(&mut self) -> Result<Vec<ParamDecl>, ParseError> {
        self.expect(&TokenKind::LeftParen, "(")?;
        let mut params = Vec::new();
        if self.eat(&TokenKind::RightParen) {
            return Ok(params);
        }
        // `f(void)` declares no parameters.
        if self.check(&TokenKind::Void) && self.check_at(1, &TokenKind::RightParen) {
            self.advance();
            self.advance();
            return Ok(params);
        }
        loop {
            let pos = self.position();
            let base = self.parse_base_type()?;
            let stars = self.parse_stars()?;
            let name = if matches!(self.peek_kind(), TokenKind::Identifier(_)) {
                Some(self.expect_identifier()?.0)
            } else {
                None
            };
            if base == BaseType::Void && stars == 0 {
                return Err(ParseError::InvalidSyntax {
                    message: "parameter cannot have type void".to_string(),
                    position: pos,
                });
            }
            let spec = if stars > 0 { TypeSpec::Ptr } else { TypeSpec::Int };
            params.push(ParamDecl {
                id: next_node_id(),
                name,
                spec,
                pos,
            });
            if self.eat(&TokenKind::Comma) {
                continue;
            }
            self.expect(&TokenKind::RightParen, ")")?;
            return Ok(params);
        }
    }

    /// Parse the declarators of one declaration, the first declarator's
    /// leading stars and name already consumed.
    fn finish_var_decls(
        &mut self,
        base: BaseType,
        stars: usize,
        name: String,
        pos: Position,
    ) -> Result<Vec<VarDecl>, ParseError> {
        let mut vars = Vec::new();
        let mut stars = stars;
        let mut name = name;
        let mut pos = pos;
        loop {
            vars.push(self.finish_declarator(base, stars, name, pos)?);
            if self.eat(&TokenKind::Comma) {
                stars = self.parse_stars()?;
                let (next_name, next_pos) = self.expect_identifier()?;
                name = next_name;
                pos = next_pos;
                continue;
            }
            self.expect(&TokenKind::Semicolon, ";")?;
            return Ok(vars);
        }
    }

    fn finish_declarator(
        &mut self,
        base: BaseType,
        stars: usize,
        name: String,
        pos: Position,
    ) -> Result<VarDecl, ParseError> {
        if base == BaseType::Void && stars == 0 {
            return Err(ParseError::InvalidSyntax {
                message: format!("cannot declare `{name}` with type void"),
                position: pos,
            });
        }
        let spec = if self.eat(&TokenKind::LeftBracket) {
            if stars > 0 {
                return Err(ParseError::InvalidSyntax {
                    message: "arrays of pointers are not supported".to_string(),
                    position: pos,
                });
            }
            let len_pos = self.position();
            let len = match self.advance().kind {
                TokenKind::Integer(len) => len,
                found => {
                    return Err(ParseError::UnexpectedToken {
                        expected: "array length".to_string(),
                        found,
                        position: len_pos,
                    })
                }
            };
            if len <= 0 {
                return Err(ParseError::InvalidSyntax {
                    message: "array length must be positive".to_string(),
                    position: len_pos,
                });
            }
            self.expect(&TokenKind::RightBracket, "]")?;
            TypeSpec::Array(len)
        } else if stars > 0 {
            TypeSpec::Ptr
        } else {
            TypeSpec::Int
        };
        let init = if self.eat(&TokenKind::Equal) {
            Some(self.parse_assignment()?)
        } else {
            None
        };
        Ok(VarDecl {
            id: next_node_id(),
            name,
            spec,
            init,
            pos,
        })
    }

    fn parse_compound(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.expect(&TokenKind::LeftBrace, "{")?;
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RightBrace) {
            if self.at_end() {
                return Err(ParseError::UnexpectedEndOfInput {
                    expected: "}".to_string(),
                });
            }
            stmts.push(self.parse_stmt()?);
        }
        self.expect(&TokenKind::RightBrace, "}")?;
        Ok(stmts)
    }

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        match self.peek_kind() {
            TokenKind::LeftBrace => Ok(Stmt::Compound(self.parse_compound()?)),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Int | TokenKind::Void => Ok(Stmt::Decl(self.parse_decl_stmt()?)),
            _ => {
                let expr = self.parse_expr()?;
                self.expect(&TokenKind::Semicolon, ";")?;
                Ok(Stmt::Expr(expr))
            }
        }
    }

    fn parse_decl_stmt(&mut self) -> Result<Vec<VarDecl>, ParseError> {
        let base = self.parse_base_type()?;
        let stars = self.parse_stars()?;
        let (name, pos) = self.expect_identifier()?;
        self.finish_var_decls(base, stars, name, pos)
    }

    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        self.advance();
        self.expect(&TokenKind::LeftParen, "(")?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::RightParen, ")")?;
        let then_branch = Box::new(self.parse_stmt()?);
        let else_branch = if self.eat(&TokenKind::Else) {
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };
        Ok(Stmt::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        self.advance();
        self.expect(&TokenKind::LeftParen, "(")?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::RightParen, ")")?;
        let body = Box::new(self.parse_stmt()?);
        Ok(Stmt::While { cond, body })
    }

    fn parse_for(&mut self) -> Result<Stmt, ParseError> {
        self.advance();
        self.expect(&TokenKind::LeftParen, "(")?;
        let init = if self.eat(&TokenKind::Semicolon) {
            None
        } else if matches!(self.peek_kind(), TokenKind::Int | TokenKind::Void) {
            // The declaration statement consumes its own semicolon.
            Some(ForInit::Decl(self.parse_decl_stmt()?))
        } else {
            let expr = self.parse_expr()?;
            self.expect(&TokenKind::Semicolon, ";")?;
            Some(ForInit::Expr(expr))
        };
        let cond = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(&TokenKind::Semicolon, ";")?;
        let step = if self.check(&TokenKind::RightParen) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(&TokenKind::RightParen, ")")?;
        let body = Box::new(self.parse_stmt()?);
        Ok(Stmt::For {
            init,
            cond,
            step,
            body,
        })
    }

    fn parse_return(&mut self) -> Result<Stmt, ParseError> {
        self.advance();
        let value = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(&TokenKind::Semicolon, ";")?;
        Ok(Stmt::Return { value })
    }

    //=============================================
    // Expression parsing, lowest precedence first
    //=============================================

    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        let lhs = self.parse_equality()?;
        if self.check(&TokenKind::Equal) {
            let pos = self.position();
            self.advance();
            // Right associative: `a = b = c` assigns c to both.
            let rhs = self.parse_assignment()?;
            return Ok(Expr::new(
                ExprKind::Binary {
                    op: BinaryOp::Assign,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                pos,
            ));
        }
        Ok(lhs)
    }

    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_relational()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::EqualEqual => BinaryOp::Eq,
                TokenKind::NotEqual => BinaryOp::Ne,
                _ => return Ok(expr),
            };
            let pos = self.position();
            self.advance();
            let rhs = self.parse_relational()?;
            expr = Expr::new(
                ExprKind::Binary {
                    op,
                    lhs: Box::new(expr),
                    rhs: Box::new(rhs),
                },
                pos,
            );
        }
    }

    fn parse_relational(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_additive()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Less => BinaryOp::Lt,
                TokenKind::LessEqual => BinaryOp::Le,
                TokenKind::Greater => BinaryOp::Gt,
                TokenKind::GreaterEqual => BinaryOp::Ge,
                _ => return Ok(expr),
            };
            let pos = self.position();
            self.advance();
            let rhs = self.parse_additive()?;
            expr = Expr::new(
                ExprKind::Binary {
                    op,
                    lhs: Box::new(expr),
                    rhs: Box::new(rhs),
                },
                pos,
            );
        }
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_multiplicative()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(expr),
            };
            let pos = self.position();
            self.advance();
            let rhs = self.parse_multiplicative()?;
            expr = Expr::new(
                ExprKind::Binary {
                    op,
                    lhs: Box::new(expr),
                    rhs: Box::new(rhs),
                },
                pos,
            );
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Rem,
                _ => return Ok(expr),
            };
            let pos = self.position();
            self.advance();
            let rhs = self.parse_unary()?;
            expr = Expr::new(
                ExprKind::Binary {
                    op,
                    lhs: Box::new(expr),
                    rhs: Box::new(rhs),
                },
                pos,
            );
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let pos = self.position();
        if self.eat(&TokenKind::Minus) {
            let operand = self.parse_unary()?;
            return Ok(Expr::new(
                ExprKind::Unary {
                    op: UnaryOp::Minus,
                    operand: Box::new(operand),
                },
                pos,
            ));
        }
        if self.eat(&TokenKind::Star) {
            let operand = self.parse_unary()?;
            return Ok(Expr::new(
                ExprKind::Unary {
                    op: UnaryOp::Deref,
                    operand: Box::new(operand),
                },
                pos,
            ));
        }
        if self.check(&TokenKind::Sizeof) {
            return self.parse_sizeof();
        }
        self.parse_postfix()
    }

    fn parse_sizeof(&mut self) -> Result<Expr, ParseError> {
        let pos = self.position();
        self.advance();
        // `sizeof(type)` vs `sizeof expr` - a parenthesised type wins.
        if self.check(&TokenKind::LeftParen)
            && matches!(
                self.peek_kind_at(1),
                Some(TokenKind::Int) | Some(TokenKind::Void)
            )
        {
            self.advance();
            let base = self.parse_base_type()?;
            let stars = self.parse_stars()?;
            self.expect(&TokenKind::RightParen, ")")?;
            let spec = if stars > 0 {
                TypeSpec::Ptr
            } else if base == BaseType::Int {
                TypeSpec::Int
            } else {
                return Err(ParseError::InvalidSyntax {
                    message: "sizeof(void) is not supported".to_string(),
                    position: pos,
                });
            };
            return Ok(Expr::new(ExprKind::SizeOf(SizeOfArg::Type(spec)), pos));
        }
        let operand = self.parse_unary()?;
        Ok(Expr::new(
            ExprKind::SizeOf(SizeOfArg::Expr(Box::new(operand))),
            pos,
        ))
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            let pos = self.position();
            if self.eat(&TokenKind::LeftParen) {
                let mut args = Vec::new();
                if !self.check(&TokenKind::RightParen) {
                    loop {
                        args.push(self.parse_assignment()?);
                        if !self.eat(&TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.expect(&TokenKind::RightParen, ")")?;
                expr = Expr::new(
                    ExprKind::Call {
                        callee: Box::new(expr),
                        args,
                    },
                    pos,
                );
            } else if self.eat(&TokenKind::LeftBracket) {
                let index = self.parse_expr()?;
                self.expect(&TokenKind::RightBracket, "]")?;
                expr = Expr::new(
                    ExprKind::Index {
                        base: Box::new(expr),
                        index: Box::new(index),
                    },
                    pos,
                );
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let pos = self.position();
        match self.peek_kind().clone() {
            TokenKind::Integer(value) => {
                self.advance();
                Ok(Expr::new(ExprKind::IntLiteral(value), pos))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(Expr::new(ExprKind::DeclRef { name, target: None }, pos))
            }
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RightParen, ")")?;
                Ok(Expr::new(ExprKind::Paren(Box::new(inner)), pos))
            }
            found => Err(ParseError::UnexpectedToken {
                expected: "expression".to_string(),
                found,
                position: pos,
            }),
        }
    }

    //=============================================
    // Token navigation
    //=============================================

    fn parse_base_type(&mut self) -> Result<BaseType, ParseError> {
        if self.eat(&TokenKind::Int) {
            Ok(BaseType::Int)
        } else if self.eat(&TokenKind::Void) {
            Ok(BaseType::Void)
        } else {
            Err(ParseError::UnexpectedToken {
                expected: "type specifier".to_string(),
                found: self.peek_kind().clone(),
                position: self.position(),
            })
        }
    }

    fn parse_stars(&mut self) -> Result<usize, ParseError> {
        let pos = self.position();
        let mut stars = 0;
        while self.eat(&TokenKind::Star) {
            stars += 1;
        }
        if stars > 1 {
            return Err(ParseError::InvalidSyntax {
                message: "multi-level pointers are not supported".to_string(),
                position: pos,
            });
        }
        Ok(stars)
    }

    fn expect_identifier(&mut self) -> Result<(String, Position), ParseError> {
        let position = self.position();
        match self.advance().kind {
            TokenKind::Identifier(name) => Ok((name, position)),
            found => Err(ParseError::UnexpectedToken {
                expected: "identifier".to_string(),
                found,
                position,
            }),
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    fn peek_kind_at(&self, ahead: usize) -> Option<&TokenKind> {
        self.tokens.get(self.current + ahead).map(|token| &token.kind)
    }

    fn position(&self) -> Position {
        self.peek().position
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn check_at(&self, ahead: usize, kind: &TokenKind) -> bool {
        self.peek_kind_at(ahead) == Some(kind)
    }

    fn at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.at_end() {
            self.current += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, expected: &str) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else if self.at_end() {
            Err(ParseError::UnexpectedEndOfInput {
                expected: expected.to_string(),
            })
        } else {
            Err(ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: self.peek_kind().clone(),
                position: self.position(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::Tokenizer;

    fn parse(source: &str) -> TranslationUnit {
        let tokens = Tokenizer::new(source).tokenize().expect("tokenize");
        Parser::new(tokens).parse().expect("parse")
    }

    fn parse_err(source: &str) -> ParseError {
        let tokens = Tokenizer::new(source).tokenize().expect("tokenize");
        Parser::new(tokens).parse().unwrap_err()
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
    fn parses_function_and_globals() {
        let unit = parse("extern int GET();\nint seed = 3;\nint main() { return 0; }");
        assert_eq!(unit.decls.len(), 3);
        match &unit.decls[0] {
            TopDecl::Function(func) => {
                assert_eq!(func.name, "GET");
                assert_eq!(func.ret, RetSpec::Int);
                assert!(func.body.is_none());
            }
            other => panic!("expected prototype, found {other:?}"),
        }
        match &unit.decls[1] {
            TopDecl::Var(var) => {
                assert_eq!(var.name, "seed");
                assert_eq!(var.spec, TypeSpec::Int);
                assert!(var.init.is_some());
            }
            other => panic!("expected global, found {other:?}"),
        }
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let unit = parse("int main() { int a; a = 1 + 2 * 3; }");
        let Stmt::Expr(assign) = &main_body(&unit)[1] else {
            panic!("expected expression statement");
        };
        let ExprKind::Binary { op, rhs, .. } = &assign.kind else {
            panic!("expected assignment");
        };
        assert_eq!(*op, BinaryOp::Assign);
        let ExprKind::Binary { op: add, rhs: mul, .. } = &rhs.kind else {
            panic!("expected addition on the right");
        };
        assert_eq!(*add, BinaryOp::Add);
        assert!(matches!(
            mul.kind,
            ExprKind::Binary {
                op: BinaryOp::Mul,
                ..
            }
        ));
    }

    #[test]
    fn declarators_carry_their_own_stars_and_brackets() {
        let unit = parse("int main() { int a, b[4]; int * p; }");
        let body = main_body(&unit);
        let Stmt::Decl(vars) = &body[0] else {
            panic!("expected declaration");
        };
        assert_eq!(vars[0].spec, TypeSpec::Int);
        assert_eq!(vars[1].spec, TypeSpec::Array(4));
        let Stmt::Decl(ptr) = &body[1] else {
            panic!("expected declaration");
        };
        assert_eq!(ptr[0].spec, TypeSpec::Ptr);
    }

    #[test]
    fn for_condition_is_grammatically_optional() {
        let unit = parse("int main() { for (i = 0; ; i = i + 1) PRINT(i); }");
        let Stmt::For { init, cond, step, .. } = &main_body(&unit)[0] else {
            panic!("expected for");
        };
        assert!(init.is_some());
        assert!(cond.is_none());
        assert!(step.is_some());
    }

    #[test]
    fn sizeof_accepts_types_and_expressions() {
        let unit = parse("int main() { int x; x = sizeof(int) + sizeof(x); }");
        let Stmt::Expr(assign) = &main_body(&unit)[1] else {
            panic!("expected expression statement");
        };
        let ExprKind::Binary { rhs, .. } = &assign.kind else {
            panic!("expected assignment");
        };
        let ExprKind::Binary { lhs, rhs, .. } = &rhs.kind else {
            panic!("expected addition");
        };
        assert!(matches!(
            lhs.kind,
            ExprKind::SizeOf(SizeOfArg::Type(TypeSpec::Int))
        ));
        assert!(matches!(rhs.kind, ExprKind::SizeOf(SizeOfArg::Expr(_))));
    }

    #[test]
    fn dereference_targets_parse_on_the_left_of_assignment() {
        let unit = parse("int main() { *(p + 2) = 7; }");
        let Stmt::Expr(assign) = &main_body(&unit)[0] else {
            panic!("expected expression statement");
        };
        let ExprKind::Binary { op, lhs, .. } = &assign.kind else {
            panic!("expected assignment");
        };
        assert_eq!(*op, BinaryOp::Assign);
        assert!(matches!(
            lhs.kind,
            ExprKind::Unary {
                op: UnaryOp::Deref,
                ..
            }
        ));
    }

    #[test]
    fn missing_semicolon_is_a_syntax_error() {
        let err = parse_err("int main() { int a a = 1; }");
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn array_length_must_be_positive() {
        let err = parse_err("int main() { int a[0]; }");
        assert!(matches!(err, ParseError::InvalidSyntax { .. }));
    }
}
