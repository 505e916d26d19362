use std::{iter::Peekable, rc::Rc};

use crate::{
    ast::{
        ClassDecl, ClassMember, Decl, EnumDecl, EnumValue, FuncDecl, Param, ParamQualifier,
        Program, TypeRef, VarDecl,
    },
    error::ParseError,
    interpreter::{
        lexer::{Pos, Token},
        parser::{
            core::{ParseResult, parse_expression},
            statement::parse_block,
            utils::{expect, parse_identifier, peek_line},
        },
    },
};

/// Parses the whole token stream as a sequence of top-level declarations.
pub fn parse_program<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Program>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut decls = Vec::new();
    while tokens.peek().is_some() {
        decls.push(parse_top_level(tokens)?);
    }
    Ok(Program { decls })
}

/// Parses one top-level declaration.
///
/// `class` and `enum` are recognized first (`enum` arrives as an ordinary
/// identifier spelled `"enum"`); everything else starts with a type and is
/// either a function or a variable.
fn parse_top_level<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Decl>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    match tokens.peek() {
        Some((Token::Class, _)) => Ok(Decl::Class(Rc::new(parse_class(tokens)?))),
        Some((Token::Identifier(name), _)) if name == "enum" => {
            Ok(Decl::Enum(parse_enum(tokens)?))
        },
        _ => parse_func_or_var(tokens),
    }
}

/// Parses a declaration that starts with a type: a function if the name is
/// followed by a parameter list and a body, a variable otherwise.
///
/// The decision uses the paren-matching lookahead: after `Type name (` the
/// cursor is cloned and scanned to the matching `)`; a `{` after it means
/// a function, anything else means an array-sized variable such as
/// `int xs(10);`.
pub(in crate::interpreter::parser) fn parse_func_or_var<'a, I>(tokens: &mut Peekable<I>)
                                                               -> ParseResult<Decl>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    if is_function_ahead(tokens) {
        let line = peek_line(tokens);
        let return_type = parse_type_ref(tokens)?;
        let name = parse_identifier(tokens)?;
        let params = parse_params(tokens)?;
        let body = parse_block(tokens)?;
        return Ok(Decl::Func(Rc::new(FuncDecl { return_type,
                                                name,
                                                params,
                                                body,
                                                line })));
    }
    Ok(Decl::Var(parse_var_decl(tokens)?))
}

fn is_function_ahead<'a, I>(tokens: &Peekable<I>) -> bool
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut lookahead = tokens.clone();
    if parse_type_ref(&mut lookahead).is_err() {
        return false;
    }
    if !matches!(lookahead.next(), Some((Token::Identifier(_), _))) {
        return false;
    }
    if !matches!(lookahead.next(), Some((Token::LParen, _))) {
        return false;
    }
    let mut parens = 1;
    while parens > 0 {
        match lookahead.next() {
            Some((Token::LParen, _)) => parens += 1,
            Some((Token::RParen, _)) => parens -= 1,
            Some(_) => {},
            None => return false,
        }
    }
    matches!(lookahead.peek(), Some((Token::LBrace, _)))
}

/// Parses a variable declaration including the trailing `;`.
///
/// Forms: `Type name;`, `Type name = expr;` and `Type name(sizeExpr);`.
pub(in crate::interpreter::parser) fn parse_var_decl<'a, I>(tokens: &mut Peekable<I>)
                                                            -> ParseResult<VarDecl>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let line = peek_line(tokens);
    let type_ref = parse_type_ref(tokens)?;
    let name = parse_identifier(tokens)?;

    let mut initializer = None;
    let mut array_size = None;
    match tokens.peek() {
        Some((Token::Assign, _)) => {
            tokens.next();
            initializer = Some(parse_expression(tokens)?);
        },
        Some((Token::LParen, _)) => {
            tokens.next();
            array_size = Some(parse_expression(tokens)?);
            expect(tokens, &Token::RParen)?;
        },
        _ => {},
    }
    expect(tokens, &Token::Semicolon)?;

    let is_const = type_ref.is_const;
    Ok(VarDecl { type_ref,
                 name,
                 initializer,
                 array_size,
                 is_const,
                 line })
}

/// Parses a type reference.
///
/// Grammar:
/// ```text
///     type := "const"? (TYPE | IDENT ("::" IDENT)?) ("<" type ">")? ("[" "]")? "@"?
/// ```
/// A `[]` suffix normalizes the reference to `array` with the written name
/// as the template argument; the `@` suffix then applies to the array
/// itself.
pub(in crate::interpreter::parser) fn parse_type_ref<'a, I>(tokens: &mut Peekable<I>)
                                                            -> ParseResult<TypeRef>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let is_const = if let Some((Token::Const, _)) = tokens.peek() {
        tokens.next();
        true
    } else {
        false
    };

    let mut name = match tokens.next() {
        Some((Token::TypeName(name), _)) => name.clone(),
        Some((Token::Identifier(name), _)) => {
            let mut name = name.clone();
            if let Some((Token::ColonColon, _)) = tokens.peek() {
                tokens.next();
                let rest = parse_identifier(tokens)?;
                name = format!("{name}::{rest}");
            }
            name
        },
        Some((token, pos)) => {
            return Err(ParseError::ExpectedToken { expected: "type name".to_owned(),
                                                   found:    format!("{token:?}"),
                                                   line:     pos.line, });
        },
        None => return Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    };

    let mut template_arg = None;
    if let Some((Token::Less, _)) = tokens.peek() {
        tokens.next();
        template_arg = Some(Box::new(parse_type_ref(tokens)?));
        expect(tokens, &Token::Greater)?;
    }

    if let Some((Token::LBracket, _)) = tokens.peek() {
        tokens.next();
        expect(tokens, &Token::RBracket)?;
        let element = TypeRef { name:         std::mem::take(&mut name),
                                is_handle:    false,
                                is_const:     false,
                                template_arg: template_arg.take(), };
        template_arg = Some(Box::new(element));
        name = "array".to_owned();
    }

    let is_handle = if let Some((Token::At, _)) = tokens.peek() {
        tokens.next();
        true
    } else {
        false
    };

    Ok(TypeRef { name,
                 is_handle,
                 is_const,
                 template_arg })
}

/// Parses a parenthesized parameter list.
///
/// Each parameter is a type, an optional `&`-reference marker, an optional
/// `in`/`out`/`inout` qualifier, and a name. Qualifiers are contextual
/// words, not keywords: `int in` stays a valid parameter named `in`.
fn parse_params<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Vec<Param>>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    expect(tokens, &Token::LParen)?;
    let mut params = Vec::new();
    if let Some((Token::RParen, _)) = tokens.peek() {
        tokens.next();
        return Ok(params);
    }
    loop {
        let type_ref = parse_type_ref(tokens)?;
        if let Some((Token::Amp, _)) = tokens.peek() {
            tokens.next();
        }
        let qualifier = parse_qualifier(tokens);
        let name = parse_identifier(tokens)?;
        params.push(Param { type_ref,
                            name,
                            qualifier });
        match tokens.next() {
            Some((Token::Comma, _)) => {},
            Some((Token::RParen, _)) => break,
            Some((token, pos)) => {
                return Err(ParseError::ExpectedToken { expected: "',' or ')'".to_owned(),
                                                       found:    format!("{token:?}"),
                                                       line:     pos.line, });
            },
            None => return Err(ParseError::UnexpectedEndOfInput { line: 0 }),
        }
    }
    Ok(params)
}

fn parse_qualifier<'a, I>(tokens: &mut Peekable<I>) -> Option<ParamQualifier>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let Some((Token::Identifier(word), _)) = tokens.peek() else {
        return None;
    };
    let qualifier = match word.as_str() {
        "in" => ParamQualifier::In,
        "out" => ParamQualifier::Out,
        "inout" => ParamQualifier::InOut,
        _ => return None,
    };
    // only a qualifier when a parameter name still follows
    let mut lookahead = tokens.clone();
    lookahead.next();
    if matches!(lookahead.peek(), Some((Token::Identifier(_), _))) {
        tokens.next();
        Some(qualifier)
    } else {
        None
    }
}

/// Parses a class declaration.
///
/// Members share the top-level declaration grammar, with two special
/// cases resolved by context: `~Name()` is a destructor and `Name(...)`
/// where the identifier equals the class name is a constructor with an
/// implied `void` return.
fn parse_class<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ClassDecl>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let line = expect(tokens, &Token::Class)?;
    let name = parse_identifier(tokens)?;
    expect(tokens, &Token::LBrace)?;

    let mut members = Vec::new();
    loop {
        let is_ctor = matches!(tokens.peek(), Some((Token::Identifier(id), _)) if *id == name)
            && lparen_follows(tokens);
        match tokens.peek() {
            Some((Token::RBrace, _)) => {
                tokens.next();
                break;
            },
            Some((Token::Semicolon, _)) => {
                tokens.next();
            },
            Some((Token::Tilde, pos)) => {
                let dtor_line = pos.line;
                tokens.next();
                let dtor_name = parse_identifier(tokens)?;
                expect(tokens, &Token::LParen)?;
                expect(tokens, &Token::RParen)?;
                let body = parse_block(tokens)?;
                members.push(ClassMember::Method(Rc::new(FuncDecl {
                    return_type: TypeRef::plain("void"),
                    name: format!("~{dtor_name}"),
                    params: Vec::new(),
                    body,
                    line: dtor_line,
                })));
            },
            Some((Token::Identifier(_), pos)) if is_ctor => {
                let ctor_line = pos.line;
                let ctor_name = parse_identifier(tokens)?;
                let params = parse_params(tokens)?;
                let body = parse_block(tokens)?;
                members.push(ClassMember::Method(Rc::new(FuncDecl {
                    return_type: TypeRef::plain("void"),
                    name: ctor_name,
                    params,
                    body,
                    line: ctor_line,
                })));
            },
            Some(_) => match parse_func_or_var(tokens)? {
                Decl::Func(func) => members.push(ClassMember::Method(func)),
                Decl::Var(field) => members.push(ClassMember::Field(field)),
                Decl::Class(_) | Decl::Enum(_) => unreachable!(),
            },
            None => return Err(ParseError::UnexpectedEndOfInput { line }),
        }
    }

    Ok(ClassDecl { name, members, line })
}

fn lparen_follows<'a, I>(tokens: &Peekable<I>) -> bool
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let mut lookahead = tokens.clone();
    lookahead.next();
    matches!(lookahead.peek(), Some((Token::LParen, _)))
}

/// Parses an enum declaration: `enum Name { A, B = expr, ... }`.
///
/// The leading `enum` arrives as an identifier token. A trailing `;` after
/// the closing brace is tolerated.
fn parse_enum<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<EnumDecl>
    where I: Iterator<Item = &'a (Token, Pos)> + Clone
{
    let line = peek_line(tokens);
    tokens.next(); // the `enum` identifier
    let name = parse_identifier(tokens)?;
    expect(tokens, &Token::LBrace)?;

    let mut values = Vec::new();
    loop {
        match tokens.peek() {
            Some((Token::RBrace, _)) => {
                tokens.next();
                break;
            },
            Some((Token::Identifier(_), _)) => {
                let value_name = parse_identifier(tokens)?;
                let value = if let Some((Token::Assign, _)) = tokens.peek() {
                    tokens.next();
                    Some(parse_expression(tokens)?)
                } else {
                    None
                };
                values.push(EnumValue { name: value_name,
                                        value });
                if let Some((Token::Comma, _)) = tokens.peek() {
                    tokens.next();
                }
            },
            Some((token, pos)) => {
                return Err(ParseError::UnexpectedToken { token: format!("{token:?}"),
                                                         line:  pos.line, });
            },
            None => return Err(ParseError::UnexpectedEndOfInput { line }),
        }
    }
    if let Some((Token::Semicolon, _)) = tokens.peek() {
        tokens.next();
    }

    Ok(EnumDecl { name, values, line })
}
