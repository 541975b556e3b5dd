use thiserror::Error;

/// Broad classification of an [`EvalError`], used by callers that only care
/// about which stage rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Syntax,
    UnknownFunction,
    DivisionByZero,
    Domain,
}

/// Everything that can go wrong while evaluating an expression.
///
/// Positions are character offsets. Errors returned by
/// [`evaluate`](super::evaluate) point into the expression as the user typed
/// it; the lower-level [`parse`](super::parse) reports offsets into the text
/// it was given.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("unexpected character '{ch}' at position {position}")]
    Lexical { ch: char, position: usize },

    #[error("{message} at position {position}")]
    Syntax { message: String, position: usize },

    #[error("unknown function '{name}' at position {position}")]
    UnknownFunction { name: String, position: usize },

    #[error("division by zero")]
    DivisionByZero,

    #[error("domain error: {0}")]
    Domain(String),
}

impl EvalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EvalError::Lexical { .. } => ErrorKind::Lexical,
            EvalError::Syntax { .. } => ErrorKind::Syntax,
            EvalError::UnknownFunction { .. } => ErrorKind::UnknownFunction,
            EvalError::DivisionByZero => ErrorKind::DivisionByZero,
            EvalError::Domain(_) => ErrorKind::Domain,
        }
    }

    /// Moves the position, if any, through `origin`.
    pub(crate) fn relocate(self, origin: impl Fn(usize) -> usize) -> Self {
        match self {
            EvalError::Lexical { ch, position } => EvalError::Lexical {
                ch,
                position: origin(position),
            },
            EvalError::Syntax { message, position } => EvalError::Syntax {
                message,
                position: origin(position),
            },
            EvalError::UnknownFunction { name, position } => EvalError::UnknownFunction {
                name,
                position: origin(position),
            },
            other => other,
        }
    }

    pub(crate) fn syntax(message: impl Into<String>, position: usize) -> Self {
        EvalError::Syntax {
            message: message.into(),
            position,
        }
    }

    pub(crate) fn domain(message: impl Into<String>) -> Self {
        EvalError::Domain(message.into())
    }
}
