use crate::error::{LexError, ParseError, RuntimeError};

#[derive(Debug)]
/// The error type surfaced to the host by [`Engine::load`].
///
/// Loading runs all three phases, so any of the phase errors can come out
/// of it. [`Engine::call`] only evaluates and returns [`RuntimeError`]
/// directly.
///
/// [`Engine::load`]: crate::Engine::load
/// [`Engine::call`]: crate::Engine::call
pub enum ScriptError {
    /// Tokenizing the source failed.
    Lex(LexError),
    /// Parsing the token stream failed.
    Parse(ParseError),
    /// Executing the top-level declarations failed.
    Runtime(RuntimeError),
}

impl std::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lex(e) => write!(f, "{e}"),
            Self::Parse(e) => write!(f, "{e}"),
            Self::Runtime(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ScriptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Lex(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Runtime(e) => Some(e),
        }
    }
}

impl From<LexError> for ScriptError {
    fn from(e: LexError) -> Self {
        Self::Lex(e)
    }
}

impl From<ParseError> for ScriptError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<RuntimeError> for ScriptError {
    fn from(e: RuntimeError) -> Self {
        Self::Runtime(e)
    }
}
