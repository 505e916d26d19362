use std::iter::Peekable;

use crate::{
    ast::{Expr, TypeRef, UnaryOp},
    error::ParseError,
    interpreter::{
        lexer::{Pos, Token},
        parser::{
            core::{ParseResult, parse_expression},
            utils::{expect, parse_comma_separated, parse_identifier},
        },
    },
};

/// Parses a unary expression.
///
/// Supports the prefix operators `-`, `!`, `~`, `++`, `--` and the handle
/// sigil `@`. Prefix operators are right-associative. If no prefix
/// operator is present, a primary expression is parsed and any postfix
/// operators are applied.
///
/// Grammar:
/// ```text
///     unary := ("-" | "!" | "~" | "++" | "--" | "@") unary
///            | primary postfix*
/// ```
pub(crate) fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let Some((token, pos)) = tokens.peek() else {
        return Err(ParseError::UnexpectedEndOfInput { line: 0 });
    };
    let line = pos.line;
    let op = match token {
        Token::Minus => Some(UnaryOp::Neg),
        Token::Bang => Some(UnaryOp::Not),
        Token::Tilde => Some(UnaryOp::BitNot),
        Token::PlusPlus => Some(UnaryOp::Inc),
        Token::MinusMinus => Some(UnaryOp::Dec),
        Token::At => Some(UnaryOp::HandleOf),
        _ => None,
    };
    if let Some(op) = op {
        tokens.next();
        let operand = parse_unary(tokens)?;
        return Ok(Expr::Unary { op,
                                operand: Box::new(operand),
                                prefix: true,
                                line });
    }

    let primary = parse_primary(tokens)?;
    parse_postfix(tokens, primary)
}

/// Parses postfix operators applied to an expression.
///
/// The postfix chain combines member access, calls, indexing and postfix
/// increment/decrement left-to-right, so `a.b(1)[2]++` folds in source
/// order.
///
/// Grammar:
/// ```text
///     postfix := "." IDENT | "(" args ")" | "[" expression "]" | "++" | "--"
/// ```
fn parse_postfix<'a, I>(tokens: &mut Peekable<I>, mut node: Expr) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    loop {
        match tokens.peek() {
            Some((Token::Dot, pos)) => {
                let line = pos.line;
                tokens.next();
                let member = parse_identifier(tokens)?;
                node = Expr::Member { object: Box::new(node),
                                      member,
                                      line };
            },
            Some((Token::LParen, pos)) => {
                let line = pos.line;
                tokens.next();
                let args = parse_comma_separated(tokens, parse_expression, &Token::RParen)?;
                node = Expr::Call { callee: Box::new(node),
                                    args,
                                    line };
            },
            Some((Token::LBracket, pos)) => {
                let line = pos.line;
                tokens.next();
                let index = parse_expression(tokens)?;
                expect(tokens, &Token::RBracket)?;
                node = Expr::Index { object: Box::new(node),
                                     index: Box::new(index),
                                     line };
            },
            Some((Token::PlusPlus, pos)) => {
                let line = pos.line;
                tokens.next();
                node = Expr::Unary { op:      UnaryOp::Inc,
                                     operand: Box::new(node),
                                     prefix:  false,
                                     line };
            },
            Some((Token::MinusMinus, pos)) => {
                let line = pos.line;
                tokens.next();
                node = Expr::Unary { op:      UnaryOp::Dec,
                                     operand: Box::new(node),
                                     prefix:  false,
                                     line };
            },
            _ => break,
        }
    }
    Ok(node)
}

/// Parses a primary (atomic) expression.
///
/// Primary expressions include literals, `null`, `this`, identifiers,
/// `A::B` scoped access (used for enum members), `new Name(args)`,
/// `TypeName(expr)` casts and parenthesized groupings.
///
/// Grammar (simplified):
/// ```text
///     primary := literal | "null" | "this"
///              | IDENT ("::" IDENT)?
///              | "new" IDENT "(" args ")"
///              | TYPE "(" expression ")"
///              | "(" expression ")"
/// ```
pub(in crate::interpreter::parser) fn parse_primary<'a, I>(tokens: &mut Peekable<I>)
                                                           -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let Some((token, pos)) = tokens.peek() else {
        return Err(ParseError::UnexpectedEndOfInput { line: 0 });
    };
    let line = pos.line;

    match token {
        Token::IntLiteral(value) => {
            let value = *value;
            tokens.next();
            Ok(Expr::IntLiteral { value, line })
        },
        Token::FloatLiteral(value) => {
            let value = *value;
            tokens.next();
            Ok(Expr::FloatLiteral { value, line })
        },
        Token::StringLiteral(value) => {
            let value = value.clone();
            tokens.next();
            Ok(Expr::StringLiteral { value, line })
        },
        Token::BoolLiteral(value) => {
            let value = *value;
            tokens.next();
            Ok(Expr::BoolLiteral { value, line })
        },
        Token::Null => {
            tokens.next();
            Ok(Expr::NullLiteral { line })
        },
        Token::This => {
            tokens.next();
            Ok(Expr::Identifier { name: "this".to_owned(),
                                  line })
        },
        Token::New => {
            tokens.next();
            let class = parse_identifier(tokens)?;
            expect(tokens, &Token::LParen)?;
            let args = parse_comma_separated(tokens, parse_expression, &Token::RParen)?;
            Ok(Expr::New { class, args, line })
        },
        Token::TypeName(name) => {
            let name = name.clone();
            tokens.next();
            expect(tokens, &Token::LParen)?;
            let inner = parse_expression(tokens)?;
            expect(tokens, &Token::RParen)?;
            Ok(Expr::Cast { target_type: TypeRef::plain(name),
                            expr: Box::new(inner),
                            line })
        },
        Token::Identifier(name) => {
            let name = name.clone();
            tokens.next();
            if let Some((Token::ColonColon, _)) = tokens.peek() {
                tokens.next();
                let member = parse_identifier(tokens)?;
                return Ok(Expr::Member { object: Box::new(Expr::Identifier { name, line }),
                                         member,
                                         line });
            }
            Ok(Expr::Identifier { name, line })
        },
        Token::LParen => {
            tokens.next();
            let inner = parse_expression(tokens)?;
            expect(tokens, &Token::RParen)?;
            Ok(inner)
        },
        other => Err(ParseError::UnexpectedToken { token: format!("{other:?}"),
                                                   line }),
    }
}
