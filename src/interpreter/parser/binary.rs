use std::iter::Peekable;

use crate::{
    ast::{BinaryOp, Expr},
    interpreter::{
        lexer::{Pos, Token},
        parser::{core::ParseResult, unary::parse_unary},
    },
};

/// Parses logical OR expressions.
///
/// The rule is: `logical_or := logical_and ("||" logical_and)*`
///
/// All binary levels are left-associative and feed the next-higher
/// precedence level; the full chain is
/// `|| → && → | → ^ → & → equality → relational → shift → additive →
/// multiplicative → unary`.
pub fn parse_logical_or<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut left = parse_logical_and(tokens)?;
    loop {
        if let Some((token, pos)) = tokens.peek()
           && let Some(op) = binary_op_for(token)
           && matches!(op, BinaryOp::Or)
        {
            let line = pos.line;
            tokens.next();
            let right = parse_logical_and(tokens)?;
            left = Expr::Binary { left: Box::new(left),
                                  op,
                                  right: Box::new(right),
                                  line };
            continue;
        }
        break;
    }
    Ok(left)
}

/// Parses logical AND expressions: `logical_and := bit_or ("&&" bit_or)*`
pub fn parse_logical_and<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut left = parse_bit_or(tokens)?;
    loop {
        if let Some((token, pos)) = tokens.peek()
           && let Some(op) = binary_op_for(token)
           && matches!(op, BinaryOp::And)
        {
            let line = pos.line;
            tokens.next();
            let right = parse_bit_or(tokens)?;
            left = Expr::Binary { left: Box::new(left),
                                  op,
                                  right: Box::new(right),
                                  line };
            continue;
        }
        break;
    }
    Ok(left)
}

/// Parses bitwise OR expressions: `bit_or := bit_xor ("|" bit_xor)*`
pub fn parse_bit_or<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut left = parse_bit_xor(tokens)?;
    loop {
        if let Some((token, pos)) = tokens.peek()
           && let Some(op) = binary_op_for(token)
           && matches!(op, BinaryOp::BitOr)
        {
            let line = pos.line;
            tokens.next();
            let right = parse_bit_xor(tokens)?;
            left = Expr::Binary { left: Box::new(left),
                                  op,
                                  right: Box::new(right),
                                  line };
            continue;
        }
        break;
    }
    Ok(left)
}

/// Parses bitwise XOR expressions: `bit_xor := bit_and ("^" bit_and)*`
pub fn parse_bit_xor<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut left = parse_bit_and(tokens)?;
    loop {
        if let Some((token, pos)) = tokens.peek()
           && let Some(op) = binary_op_for(token)
           && matches!(op, BinaryOp::BitXor)
        {
            let line = pos.line;
            tokens.next();
            let right = parse_bit_and(tokens)?;
            left = Expr::Binary { left: Box::new(left),
                                  op,
                                  right: Box::new(right),
                                  line };
            continue;
        }
        break;
    }
    Ok(left)
}

/// Parses bitwise AND expressions: `bit_and := equality ("&" equality)*`
pub fn parse_bit_and<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut left = parse_equality(tokens)?;
    loop {
        if let Some((token, pos)) = tokens.peek()
           && let Some(op) = binary_op_for(token)
           && matches!(op, BinaryOp::BitAnd)
        {
            let line = pos.line;
            tokens.next();
            let right = parse_equality(tokens)?;
            left = Expr::Binary { left: Box::new(left),
                                  op,
                                  right: Box::new(right),
                                  line };
            continue;
        }
        break;
    }
    Ok(left)
}

/// Parses equality expressions: `equality := relational (("==" | "!=") relational)*`
pub fn parse_equality<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut left = parse_relational(tokens)?;
    loop {
        if let Some((token, pos)) = tokens.peek()
           && let Some(op) = binary_op_for(token)
           && matches!(op, BinaryOp::Equal | BinaryOp::NotEqual)
        {
            let line = pos.line;
            tokens.next();
            let right = parse_relational(tokens)?;
            left = Expr::Binary { left: Box::new(left),
                                  op,
                                  right: Box::new(right),
                                  line };
            continue;
        }
        break;
    }
    Ok(left)
}

/// Parses relational expressions:
/// `relational := shift (("<" | ">" | "<=" | ">=") shift)*`
pub fn parse_relational<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut left = parse_shift(tokens)?;
    loop {
        if let Some((token, pos)) = tokens.peek()
           && let Some(op) = binary_op_for(token)
           && matches!(op,
                       BinaryOp::Less
                       | BinaryOp::Greater
                       | BinaryOp::LessEqual
                       | BinaryOp::GreaterEqual)
        {
            let line = pos.line;
            tokens.next();
            let right = parse_shift(tokens)?;
            left = Expr::Binary { left: Box::new(left),
                                  op,
                                  right: Box::new(right),
                                  line };
            continue;
        }
        break;
    }
    Ok(left)
}

/// Parses shift expressions: `shift := additive (("<<" | ">>") additive)*`
pub fn parse_shift<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut left = parse_additive(tokens)?;
    loop {
        if let Some((token, pos)) = tokens.peek()
           && let Some(op) = binary_op_for(token)
           && matches!(op, BinaryOp::Shl | BinaryOp::Shr)
        {
            let line = pos.line;
            tokens.next();
            let right = parse_additive(tokens)?;
            left = Expr::Binary { left: Box::new(left),
                                  op,
                                  right: Box::new(right),
                                  line };
            continue;
        }
        break;
    }
    Ok(left)
}

/// Parses addition and subtraction:
/// `additive := multiplicative (("+" | "-") multiplicative)*`
pub fn parse_additive<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut left = parse_multiplicative(tokens)?;
    loop {
        if let Some((token, pos)) = tokens.peek()
           && let Some(op) = binary_op_for(token)
           && matches!(op, BinaryOp::Add | BinaryOp::Sub)
        {
            let line = pos.line;
            tokens.next();
            let right = parse_multiplicative(tokens)?;
            left = Expr::Binary { left: Box::new(left),
                                  op,
                                  right: Box::new(right),
                                  line };
            continue;
        }
        break;
    }
    Ok(left)
}

/// Parses multiplication-level expressions:
/// `multiplicative := unary (("*" | "/" | "%") unary)*`
pub fn parse_multiplicative<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut left = parse_unary(tokens)?;
    loop {
        if let Some((token, pos)) = tokens.peek()
           && let Some(op) = binary_op_for(token)
           && matches!(op, BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod)
        {
            let line = pos.line;
            tokens.next();
            let right = parse_unary(tokens)?;
            left = Expr::Binary { left: Box::new(left),
                                  op,
                                  right: Box::new(right),
                                  line };
            continue;
        }
        break;
    }
    Ok(left)
}

/// Maps a token to its corresponding binary operator.
const fn binary_op_for(token: &Token) -> Option<BinaryOp> {
    Some(match token {
        Token::Plus => BinaryOp::Add,
        Token::Minus => BinaryOp::Sub,
        Token::Star => BinaryOp::Mul,
        Token::Slash => BinaryOp::Div,
        Token::Percent => BinaryOp::Mod,
        Token::EqualEqual => BinaryOp::Equal,
        Token::BangEqual => BinaryOp::NotEqual,
        Token::Less => BinaryOp::Less,
        Token::Greater => BinaryOp::Greater,
        Token::LessEqual => BinaryOp::LessEqual,
        Token::GreaterEqual => BinaryOp::GreaterEqual,
        Token::AmpAmp => BinaryOp::And,
        Token::PipePipe => BinaryOp::Or,
        Token::Amp => BinaryOp::BitAnd,
        Token::Pipe => BinaryOp::BitOr,
        Token::Caret => BinaryOp::BitXor,
        Token::Shl => BinaryOp::Shl,
        Token::Shr => BinaryOp::Shr,
        _ => return None,
    })
}
