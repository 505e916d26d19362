use std::iter::Peekable;

use crate::{
    error::ParseError,
    interpreter::{
        lexer::{Pos, Token},
        parser::core::ParseResult,
    },
};

/// Gets the line of the next token, or `0` at the end of input.
pub(in crate::interpreter::parser) fn peek_line<'a, I>(tokens: &mut Peekable<I>) -> usize
    where I: Iterator<Item = &'a (Token, Pos)>
{
    tokens.peek().map_or(0, |(_, pos)| pos.line)
}

/// Consumes the next token, requiring it to equal `expected`.
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the token to check.
/// - `expected`: The exact token that must come next.
///
/// # Returns
/// The line the consumed token was on.
///
/// # Errors
/// Returns a `ParseError` if the next token differs or input ends.
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                   expected: &Token)
                                                   -> ParseResult<usize>
    where I: Iterator<Item = &'a (Token, Pos)>
{
    match tokens.next() {
        Some((token, pos)) if token == expected => Ok(pos.line),
        Some((token, pos)) => Err(ParseError::ExpectedToken { expected: format!("{expected:?}"),
                                                              found:    format!("{token:?}"),
                                                              line:     pos.line, }),
        None => Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    }
}

/// Parses a plain identifier and returns its name.
///
/// # Errors
/// Returns a `ParseError` if the next token is not an identifier or the
/// input ends unexpectedly.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>)
                                                              -> ParseResult<String>
    where I: Iterator<Item = &'a (Token, Pos)>
{
    match tokens.next() {
        Some((Token::Identifier(name), _)) => Ok(name.clone()),
        Some((token, pos)) => {
            Err(ParseError::ExpectedToken { expected: "identifier".to_owned(),
                                            found:    format!("{token:?}"),
                                            line:     pos.line, })
        },
        None => Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    }
}

/// Parses a comma-separated list of items until a closing token.
///
/// Shared by call argument lists and similar constructs. The closing token
/// is consumed. An immediately encountered closing token produces an empty
/// list.
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first item or the closer.
/// - `parse_item`: Function used to parse one element.
/// - `closing`: The token that terminates the list.
///
/// # Errors
/// Returns a `ParseError` if an item fails to parse, an unexpected token
/// appears between items, or the stream ends before the closing token.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    closing: &Token)
    -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut items = Vec::new();
    if let Some((token, _)) = tokens.peek()
       && token == closing
    {
        tokens.next();
        return Ok(items);
    }
    loop {
        items.push(parse_item(tokens)?);
        match tokens.next() {
            Some((Token::Comma, _)) => {},
            Some((token, _)) if token == closing => break,
            Some((token, pos)) => {
                return Err(ParseError::ExpectedToken { expected: format!("',' or {closing:?}"),
                                                       found:    format!("{token:?}"),
                                                       line:     pos.line, });
            },
            None => return Err(ParseError::UnexpectedEndOfInput { line: 0 }),
        }
    }
    Ok(items)
}
