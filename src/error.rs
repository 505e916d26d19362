/// Lexical errors.
///
/// Defines the error type raised while turning source text into tokens:
/// unexpected characters, unterminated strings and unrepresentable numeric
/// literals, each carrying the line and column where lexing stopped.
pub mod lex_error;
/// Parsing errors.
///
/// Defines all error types that can occur while building the AST from the
/// token stream. Parse errors include unexpected tokens, premature end of
/// input and expected-token mismatches, each with a source line.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation, such as
/// unknown identifiers, null handle access, out-of-bounds indexing and
/// unknown members.
pub mod runtime_error;
/// The combined load-time error.
///
/// [`script_error::ScriptError`] sums the three phase errors so that
/// loading a script has a single error type for the host to handle.
pub mod script_error;

pub use lex_error::LexError;
pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
pub use script_error::ScriptError;
