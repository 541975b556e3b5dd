//! Precedence-climbing parser.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := power (('*' | '/') power)*
//! power   := unary ('^' power)?
//! unary   := '-' unary | primary
//! primary := number | '(' expr ')' | ident '(' args? ')'
//! args    := expr (',' expr)*
//! ```
//!
//! Unary minus binds tighter than `^`, so `-2^2` is `(-2)^2` and `2^-1` is
//! accepted. Implicit multiplication such as `2(3)` is rejected.

use super::ast::{Expr, UnaryOp};
use super::error::EvalError;
use super::registry::Function;
use super::token::{Op, Spanned, Token, Tokenizer};
use std::iter::Peekable;

/// Deepest nesting of parentheses, calls and operators the parser accepts.
pub const MAX_DEPTH: usize = 200;

pub struct Parser<'a> {
    tokens: Peekable<Tokenizer<'a>>,
    end: usize,
    depth: usize,
}

fn describe(token: &Token) -> String {
    match token {
        Token::Number(n) => format!("number {}", n),
        Token::Ident(name) => format!("'{}'", name),
        Token::Op(op) => format!("operator '{}'", op.symbol()),
        Token::LParen => "'('".to_string(),
        Token::RParen => "')'".to_string(),
        Token::Comma => "','".to_string(),
    }
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Parser {
            tokens: Tokenizer::new(input).peekable(),
            end: input.chars().count(),
            depth: 0,
        }
    }

    /// Parses the whole input into one tree.
    pub fn parse(mut self) -> Result<Expr, EvalError> {
        if self.peek()?.is_none() {
            return Err(EvalError::syntax("empty expression", 0));
        }
        let expr = self.expr()?;
        match self.next()? {
            None => Ok(expr),
            Some(Spanned { token: Token::RParen, position }) => {
                Err(EvalError::syntax("unmatched ')'", position))
            }
            Some(Spanned { token, position }) => Err(EvalError::syntax(
                format!("unexpected {}", describe(&token)),
                position,
            )),
        }
    }

    fn peek(&mut self) -> Result<Option<&Spanned>, EvalError> {
        match self.tokens.peek() {
            Some(Err(e)) => Err(e.clone()),
            Some(Ok(spanned)) => Ok(Some(spanned)),
            None => Ok(None),
        }
    }

    fn peek_token(&mut self) -> Result<Option<&Token>, EvalError> {
        Ok(self.peek()?.map(|s| &s.token))
    }

    fn next(&mut self) -> Result<Option<Spanned>, EvalError> {
        self.tokens.next().transpose()
    }

    /// Consumes the next token if it is one of `ops`.
    fn eat_op(&mut self, ops: &[Op]) -> Result<Option<Op>, EvalError> {
        let op = match self.peek_token()? {
            Some(Token::Op(op)) if ops.contains(op) => *op,
            _ => return Ok(None),
        };
        self.next()?;
        Ok(Some(op))
    }

    /// Runs `f` one nesting level deeper, refusing input nested beyond
    /// `MAX_DEPTH` so that recursion stays bounded.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, EvalError>) -> Result<T, EvalError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            let end = self.end;
            let position = self.peek()?.map_or(end, |s| s.position);
            return Err(EvalError::syntax("expression nested too deeply", position));
        }
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn expect_rparen(&mut self, open: usize) -> Result<(), EvalError> {
        match self.next()? {
            Some(Spanned { token: Token::RParen, .. }) => Ok(()),
            Some(Spanned { token, position }) => Err(EvalError::syntax(
                format!("expected ')' but found {}", describe(&token)),
                position,
            )),
            None => Err(EvalError::syntax(
                "'(' is never closed",
                open,
            )),
        }
    }

    fn expr(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.term()?;
        while let Some(op) = self.eat_op(&[Op::Plus, Op::Minus])? {
            let right = self.term()?;
            left = Expr::binary(op, left, right);
        }
        Ok(left)
    }

    fn term(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.power()?;
        while let Some(op) = self.eat_op(&[Op::Mult, Op::Div])? {
            let right = self.power()?;
            left = Expr::binary(op, left, right);
        }
        Ok(left)
    }

    fn power(&mut self) -> Result<Expr, EvalError> {
        self.nested(|p| {
            let base = p.unary()?;
            if p.eat_op(&[Op::Pow])?.is_some() {
                let exponent = p.power()?;
                return Ok(Expr::binary(Op::Pow, base, exponent));
            }
            Ok(base)
        })
    }

    fn unary(&mut self) -> Result<Expr, EvalError> {
        if self.eat_op(&[Op::Minus])?.is_some() {
            let operand = self.nested(|p| p.unary())?;
            return Ok(Expr::unary(UnaryOp::Neg, operand));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, EvalError> {
        let Some(Spanned { token, position }) = self.next()? else {
            return Err(EvalError::syntax("unexpected end of expression", self.end));
        };

        match token {
            Token::Number(n) => Ok(Expr::Literal(n)),
            Token::LParen => {
                let inner = self.expr()?;
                self.expect_rparen(position)?;
                Ok(inner)
            }
            Token::Ident(name) => self.call(name, position),
            Token::Op(op) => Err(EvalError::syntax(
                format!("missing operand before '{}'", op.symbol()),
                position,
            )),
            other => Err(EvalError::syntax(
                format!("unexpected {}", describe(&other)),
                position,
            )),
        }
    }

    fn call(&mut self, name: String, position: usize) -> Result<Expr, EvalError> {
        let open = match self.next()? {
            Some(Spanned { token: Token::LParen, position }) => position,
            _ => {
                return Err(EvalError::syntax(
                    format!("'{}' must be called with parentheses", name),
                    position,
                ))
            }
        };

        let Some(function) = Function::lookup(&name) else {
            return Err(EvalError::UnknownFunction { name, position });
        };

        let mut args = Vec::new();
        let no_args = matches!(self.peek_token()?, Some(Token::RParen));
        if no_args {
            self.next()?;
        } else {
            loop {
                args.push(self.expr()?);
                match self.next()? {
                    Some(Spanned { token: Token::Comma, .. }) => continue,
                    Some(Spanned { token: Token::RParen, .. }) => break,
                    Some(Spanned { token, position }) => {
                        return Err(EvalError::syntax(
                            format!("expected ',' or ')' but found {}", describe(&token)),
                            position,
                        ))
                    }
                    None => {
                        return Err(EvalError::syntax(
                            "'(' is never closed",
                            open,
                        ))
                    }
                }
            }
        }

        if args.len() != function.arity() {
            return Err(EvalError::syntax(
                format!(
                    "'{}' takes {} argument(s) but {} were given",
                    function.name(),
                    function.arity(),
                    args.len()
                ),
                position,
            ));
        }

        Ok(Expr::Call { function, args })
    }
}

/// Parses a normalized expression (see [`rewrite`](super::rewrite::rewrite)).
pub fn parse(input: &str) -> Result<Expr, EvalError> {
    Parser::new(input).parse()
}
