use logos::Logos;

use crate::error::LexError;

/// Represents a lexical token in the source input.
///
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// Keywords override identifiers; `enum` is deliberately *not* a keyword
/// and reaches the parser as an ordinary identifier, matching the
/// language's original surface. Primitive type names collapse into a
/// single [`Token::TypeName`] kind carrying the spelling.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
pub enum Token {
    /// Integer literal tokens, such as `42`.
    #[regex(r"[0-9]+", parse_int)]
    IntLiteral(i64),
    /// Float literal tokens: `3.25`, `3.25f` or `42f`.
    #[regex(r"[0-9]+\.[0-9]+f?", parse_float)]
    #[regex(r"[0-9]+f", parse_float)]
    FloatLiteral(f64),
    /// String literal tokens, delimited by `"` or `'`.
    #[regex(r#""([^"\\\n]|\\[^\n])*""#, parse_string)]
    #[regex(r#"'([^'\\\n]|\\[^\n])*'"#, parse_string)]
    StringLiteral(String),
    /// Boolean literal tokens, `true` or `false`.
    #[token("true", |_| true)]
    #[token("false", |_| false)]
    BoolLiteral(bool),

    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `for`
    #[token("for")]
    For,
    /// `while`
    #[token("while")]
    While,
    /// `do`
    #[token("do")]
    Do,
    /// `return`
    #[token("return")]
    Return,
    /// `break`
    #[token("break")]
    Break,
    /// `continue`
    #[token("continue")]
    Continue,
    /// `switch`
    #[token("switch")]
    Switch,
    /// `case`
    #[token("case")]
    Case,
    /// `default`
    #[token("default")]
    Default,
    /// `class`
    #[token("class")]
    Class,
    /// `new`
    #[token("new")]
    New,
    /// `null`
    #[token("null")]
    Null,
    /// `this`
    #[token("this")]
    This,
    /// `const`
    #[token("const")]
    Const,

    /// Primitive type name tokens; the spelling is preserved.
    #[token("void", type_name)]
    #[token("bool", type_name)]
    #[token("string", type_name)]
    #[token("float", type_name)]
    #[token("double", type_name)]
    #[token("int", type_name)]
    #[token("int8", type_name)]
    #[token("int16", type_name)]
    #[token("int32", type_name)]
    #[token("int64", type_name)]
    #[token("uint", type_name)]
    #[token("uint8", type_name)]
    #[token("uint16", type_name)]
    #[token("uint32", type_name)]
    #[token("uint64", type_name)]
    TypeName(String),

    /// Identifier tokens; variable, function, class or enum names.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_owned())]
    Identifier(String),

    /// `++`
    #[token("++")]
    PlusPlus,
    /// `--`
    #[token("--")]
    MinusMinus,
    /// `+=`
    #[token("+=")]
    PlusAssign,
    /// `-=`
    #[token("-=")]
    MinusAssign,
    /// `*=`
    #[token("*=")]
    StarAssign,
    /// `/=`
    #[token("/=")]
    SlashAssign,
    /// `%=`
    #[token("%=")]
    PercentAssign,
    /// `&=`
    #[token("&=")]
    AmpAssign,
    /// `|=`
    #[token("|=")]
    PipeAssign,
    /// `^=`
    #[token("^=")]
    CaretAssign,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `&&`
    #[token("&&")]
    AmpAmp,
    /// `||`
    #[token("||")]
    PipePipe,
    /// `<<`
    #[token("<<")]
    Shl,
    /// `>>`
    #[token(">>")]
    Shr,
    /// `::`
    #[token("::")]
    ColonColon,
    /// `@@`
    #[token("@@")]
    AtAt,

    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `=`
    #[token("=")]
    Assign,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `!`
    #[token("!")]
    Bang,
    /// `~`, bitwise-not and the destructor marker (context-resolved).
    #[token("~")]
    Tilde,
    /// `&`
    #[token("&")]
    Amp,
    /// `|`
    #[token("|")]
    Pipe,
    /// `^`
    #[token("^")]
    Caret,
    /// `@`, the handle sigil.
    #[token("@")]
    At,
    /// `.`
    #[token(".")]
    Dot,
    /// `,`
    #[token(",")]
    Comma,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `:`
    #[token(":")]
    Colon,
    /// `?`
    #[token("?")]
    Question,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,

    /// `// comments` run to the end of the line.
    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,
    /// `/* block comments */`; newlines inside keep the line count right.
    #[regex(r"/\*[^*]*\*+([^/*][^*]*\*+)*/", block_comment)]
    BlockComment,
    /// Newlines advance the line counter and are otherwise skipped.
    #[token("\n", newline)]
    Newline,
    /// Spaces, tabs and carriage returns.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,
}

/// Additional state carried by the lexer during tokenization.
///
/// Tracks the current line number and the byte offset where that line
/// begins, so that every token can be stamped with a line and column.
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line:       usize,
    /// Byte offset of the first character of the current line.
    pub line_start: usize,
}

impl Default for LexerExtras {
    fn default() -> Self {
        Self { line:       1,
               line_start: 0, }
    }
}

/// A line/column pair attached to each produced token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    /// 1-based source line.
    pub line:   usize,
    /// 1-based source column; a tab advances one column.
    pub column: usize,
}

fn newline(lex: &mut logos::Lexer<'_, Token>) -> logos::Skip {
    lex.extras.line += 1;
    lex.extras.line_start = lex.span().end;
    logos::Skip
}

fn block_comment(lex: &mut logos::Lexer<'_, Token>) -> logos::Skip {
    let slice = lex.slice();
    let newlines = slice.bytes().filter(|&b| b == b'\n').count();
    if newlines > 0 {
        lex.extras.line += newlines;
        let last = slice.rfind('\n').unwrap_or(0);
        lex.extras.line_start = lex.span().start + last + 1;
    }
    logos::Skip
}

fn parse_int(lex: &mut logos::Lexer<'_, Token>) -> Option<i64> {
    lex.slice().parse().ok()
}

fn parse_float(lex: &mut logos::Lexer<'_, Token>) -> Option<f64> {
    lex.slice().trim_end_matches('f').parse().ok()
}

fn type_name(lex: &mut logos::Lexer<'_, Token>) -> String {
    lex.slice().to_owned()
}

/// Strips the delimiters and decodes escape sequences.
///
/// `\n`, `\t` and `\r` decode to their control characters; any other
/// escaped character stands for itself.
fn parse_string(lex: &mut logos::Lexer<'_, Token>) -> String {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some(other) => out.push(other),
                None => {},
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Tokenizes a full source string.
///
/// Produces the token sequence paired with the position each token starts
/// at. Lexing stops at the first invalid input.
///
/// # Parameters
/// - `source`: UTF-8 source text.
///
/// # Returns
/// The tokens in source order; the end of the vector is the end of input.
///
/// # Errors
/// Returns a [`LexError`] for an unexpected character, an unterminated
/// string literal (reported at the opening quote) or an unrepresentable
/// numeric literal.
pub fn tokenize(source: &str) -> Result<Vec<(Token, Pos)>, LexError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer_with_extras(source, LexerExtras::default());

    while let Some(item) = lexer.next() {
        let span = lexer.span();
        let pos = Pos { line:   lexer.extras.line,
                        column: span.start.saturating_sub(lexer.extras.line_start) + 1, };
        match item {
            Ok(token) => tokens.push((token, pos)),
            Err(()) => {
                let slice = lexer.slice();
                let first = slice.chars().next().unwrap_or('\0');
                return Err(match first {
                    '"' | '\'' => LexError::UnterminatedString { line:   pos.line,
                                                                 column: pos.column, },
                    '0'..='9' => LexError::InvalidNumber { line:   pos.line,
                                                           column: pos.column, },
                    other => LexError::UnexpectedCharacter { character: other,
                                                             line:      pos.line,
                                                             column:    pos.column, },
                });
            },
        }
    }

    Ok(tokens)
}
