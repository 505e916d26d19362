use std::iter::Peekable;

use crate::{
    ast::{BinaryOp, Expr, Program, UnaryOp},
    error::ParseError,
    interpreter::{
        lexer::{Pos, Token},
        parser::{binary::parse_logical_or, decl::parse_program, utils::expect},
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a complete token stream into a program.
///
/// This is the entry point used by the engine after lexing.
///
/// # Parameters
/// - `tokens`: The full token sequence with positions.
///
/// # Returns
/// The parsed [`Program`].
///
/// # Errors
/// Returns the first `ParseError` encountered; there is no error recovery
/// beyond the statement-level declaration/expression backtrack.
pub fn parse(tokens: &[(Token, Pos)]) -> ParseResult<Program> {
    let mut iter = tokens.iter().peekable();
    parse_program(&mut iter)
}

/// Parses a full expression.
///
/// This is the lowest-precedence level: assignment. Assignment is
/// right-associative, and a plain `=` whose target is a unary `@`
/// expression becomes a handle assignment — `@h = rhs` rebinds the handle
/// rather than copying a value.
///
/// Grammar:
/// ```text
///     expression := ternary (assign_op expression)?
/// ```
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, Pos)` pairs.
///
/// # Returns
/// The parsed expression node.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let expr = parse_ternary(tokens)?;

    let Some((token, pos)) = tokens.peek() else {
        return Ok(expr);
    };
    let line = pos.line;
    let compound = match token {
        Token::Assign => None,
        Token::PlusAssign => Some(BinaryOp::Add),
        Token::MinusAssign => Some(BinaryOp::Sub),
        Token::StarAssign => Some(BinaryOp::Mul),
        Token::SlashAssign => Some(BinaryOp::Div),
        Token::PercentAssign => Some(BinaryOp::Mod),
        Token::AmpAssign => Some(BinaryOp::BitAnd),
        Token::PipeAssign => Some(BinaryOp::BitOr),
        Token::CaretAssign => Some(BinaryOp::BitXor),
        _ => return Ok(expr),
    };
    tokens.next();
    let value = parse_expression(tokens)?;

    match (compound, expr) {
        (None,
         Expr::Unary { op: UnaryOp::HandleOf,
                       operand,
                       prefix: true,
                       .. }) => Ok(Expr::HandleAssign { target: operand,
                                                        value: Box::new(value),
                                                        line }),
        (op, target) => Ok(Expr::Assign { target: Box::new(target),
                                          op,
                                          value: Box::new(value),
                                          line }),
    }
}

/// Parses a conditional `cond ? a : b` expression.
///
/// The branches sit at assignment level, so `c ? x = 1 : x = 2` parses.
pub(in crate::interpreter::parser) fn parse_ternary<'a, I>(tokens: &mut Peekable<I>)
                                                           -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let condition = parse_logical_or(tokens)?;

    if let Some((Token::Question, pos)) = tokens.peek() {
        let line = pos.line;
        tokens.next();
        let then_expr = parse_expression(tokens)?;
        expect(tokens, &Token::Colon)?;
        let else_expr = parse_expression(tokens)?;
        return Ok(Expr::Ternary { condition: Box::new(condition),
                                  then_expr: Box::new(then_expr),
                                  else_expr: Box::new(else_expr),
                                  line });
    }

    Ok(condition)
}
