use std::iter::Peekable;

use crate::{
    ast::{Stmt, SwitchCase},
    error::ParseError,
    interpreter::{
        lexer::{Pos, Token},
        parser::{
            core::{ParseResult, parse_expression},
            decl::parse_var_decl,
            utils::{expect, peek_line},
        },
    },
};

/// Parses a single statement.
///
/// Control-flow statements are recognized by their leading keyword. For
/// everything else the parser decides between a local variable declaration
/// and an expression statement: if the lookahead "looks like a type", a
/// declaration is attempted first, and on any parse error the cursor is
/// restored and the input is re-parsed as an expression statement. This
/// one-shot backtrack resolves genuine ambiguities such as `Name x(expr);`
/// versus a call expression.
///
/// # Parameters
/// - `tokens`: Token iterator containing `(Token, Pos)` pairs.
///
/// # Returns
/// A parsed [`Stmt`] node.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    match tokens.peek() {
        Some((Token::LBrace, pos)) => {
            let line = pos.line;
            let body = parse_block(tokens)?;
            Ok(Stmt::Block { body, line })
        },
        Some((Token::If, _)) => parse_if(tokens),
        Some((Token::For, _)) => parse_for(tokens),
        Some((Token::While, _)) => parse_while(tokens),
        Some((Token::Do, _)) => parse_do_while(tokens),
        Some((Token::Switch, _)) => parse_switch(tokens),
        Some((Token::Return, _)) => parse_return(tokens),
        Some((Token::Break, _)) => {
            let line = expect(tokens, &Token::Break)?;
            expect(tokens, &Token::Semicolon)?;
            Ok(Stmt::Break { line })
        },
        Some((Token::Continue, _)) => {
            let line = expect(tokens, &Token::Continue)?;
            expect(tokens, &Token::Semicolon)?;
            Ok(Stmt::Continue { line })
        },
        _ => parse_declaration_or_expression(tokens),
    }
}

/// Parses a braced statement list and returns its body.
///
/// Shared with function and class parsing.
pub(in crate::interpreter::parser) fn parse_block<'a, I>(tokens: &mut Peekable<I>)
                                                         -> ParseResult<Vec<Stmt>>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    expect(tokens, &Token::LBrace)?;
    let mut body = Vec::new();
    loop {
        match tokens.peek() {
            Some((Token::RBrace, _)) => {
                tokens.next();
                break;
            },
            Some(_) => body.push(parse_statement(tokens)?),
            None => return Err(ParseError::UnexpectedEndOfInput { line: 0 }),
        }
    }
    Ok(body)
}

/// Attempts a local variable declaration, falling back to an expression
/// statement on failure.
pub(in crate::interpreter::parser) fn parse_declaration_or_expression<'a, I>(
    tokens: &mut Peekable<I>)
    -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    if looks_like_declaration(tokens) {
        let saved = tokens.clone();
        match parse_var_decl(tokens) {
            Ok(decl) => return Ok(Stmt::Var(decl)),
            Err(_) => *tokens = saved,
        }
    }

    let line = peek_line(tokens);
    let expr = parse_expression(tokens)?;
    expect(tokens, &Token::Semicolon)?;
    Ok(Stmt::Expr { expr, line })
}

/// Lookahead for the declaration/expression split: `const`, a primitive
/// type name, or an identifier followed by something only a type position
/// allows.
fn looks_like_declaration<'a, I>(tokens: &mut Peekable<I>) -> bool
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    match tokens.peek() {
        Some((Token::Const | Token::TypeName(_), _)) => true,
        Some((Token::Identifier(_), _)) => {
            let mut lookahead = tokens.clone();
            lookahead.next();
            matches!(lookahead.peek(),
                     Some((Token::Identifier(_) | Token::At | Token::LBracket | Token::Less, _)))
        },
        _ => false,
    }
}

fn parse_if<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let line = expect(tokens, &Token::If)?;
    expect(tokens, &Token::LParen)?;
    let condition = parse_expression(tokens)?;
    expect(tokens, &Token::RParen)?;
    let then_branch = Box::new(parse_statement(tokens)?);
    let else_branch = if let Some((Token::Else, _)) = tokens.peek() {
        tokens.next();
        Some(Box::new(parse_statement(tokens)?))
    } else {
        None
    };
    Ok(Stmt::If { condition,
                  then_branch,
                  else_branch,
                  line })
}

fn parse_while<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let line = expect(tokens, &Token::While)?;
    expect(tokens, &Token::LParen)?;
    let condition = parse_expression(tokens)?;
    expect(tokens, &Token::RParen)?;
    let body = Box::new(parse_statement(tokens)?);
    Ok(Stmt::While { condition, body, line })
}

fn parse_do_while<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let line = expect(tokens, &Token::Do)?;
    let body = Box::new(parse_statement(tokens)?);
    expect(tokens, &Token::While)?;
    expect(tokens, &Token::LParen)?;
    let condition = parse_expression(tokens)?;
    expect(tokens, &Token::RParen)?;
    expect(tokens, &Token::Semicolon)?;
    Ok(Stmt::DoWhile { body, condition, line })
}

/// Parses a C-style `for`. Every clause is optional; the init clause may
/// itself be a declaration or an expression statement.
fn parse_for<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let line = expect(tokens, &Token::For)?;
    expect(tokens, &Token::LParen)?;

    let init = if let Some((Token::Semicolon, _)) = tokens.peek() {
        tokens.next();
        None
    } else {
        Some(Box::new(parse_declaration_or_expression(tokens)?))
    };

    let condition = if let Some((Token::Semicolon, _)) = tokens.peek() {
        None
    } else {
        Some(parse_expression(tokens)?)
    };
    expect(tokens, &Token::Semicolon)?;

    let update = if let Some((Token::RParen, _)) = tokens.peek() {
        None
    } else {
        Some(parse_expression(tokens)?)
    };
    expect(tokens, &Token::RParen)?;

    let body = Box::new(parse_statement(tokens)?);
    Ok(Stmt::For { init,
                   condition,
                   update,
                   body,
                   line })
}

fn parse_return<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let line = expect(tokens, &Token::Return)?;
    if let Some((Token::Semicolon, _)) = tokens.peek() {
        tokens.next();
        return Ok(Stmt::Return { value: None, line });
    }
    let value = parse_expression(tokens)?;
    expect(tokens, &Token::Semicolon)?;
    Ok(Stmt::Return { value: Some(value),
                      line })
}

/// Parses a `switch` statement with C-style fall-through arms.
fn parse_switch<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let line = expect(tokens, &Token::Switch)?;
    expect(tokens, &Token::LParen)?;
    let discriminant = parse_expression(tokens)?;
    expect(tokens, &Token::RParen)?;
    expect(tokens, &Token::LBrace)?;

    let mut cases = Vec::new();
    loop {
        match tokens.peek() {
            Some((Token::Case, pos)) => {
                let case_line = pos.line;
                tokens.next();
                let value = parse_expression(tokens)?;
                expect(tokens, &Token::Colon)?;
                let body = parse_case_body(tokens)?;
                cases.push(SwitchCase { value: Some(value),
                                        body,
                                        line: case_line });
            },
            Some((Token::Default, pos)) => {
                let case_line = pos.line;
                tokens.next();
                expect(tokens, &Token::Colon)?;
                let body = parse_case_body(tokens)?;
                cases.push(SwitchCase { value: None,
                                        body,
                                        line: case_line });
            },
            Some((Token::RBrace, _)) => {
                tokens.next();
                break;
            },
            Some((token, pos)) => {
                return Err(ParseError::UnexpectedToken { token: format!("{token:?}"),
                                                         line:  pos.line, });
            },
            None => return Err(ParseError::UnexpectedEndOfInput { line }),
        }
    }

    Ok(Stmt::Switch { discriminant,
                      cases,
                      line })
}

/// Statements of one arm, up to the next `case`, `default` or `}`.
fn parse_case_body<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Vec<Stmt>>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut body = Vec::new();
    loop {
        match tokens.peek() {
            Some((Token::Case | Token::Default | Token::RBrace, _)) | None => break,
            Some(_) => body.push(parse_statement(tokens)?),
        }
    }
    Ok(body)
}
