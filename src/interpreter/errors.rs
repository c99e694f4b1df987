use thiserror::Error;

use crate::parser::ParseError;
use crate::resolver::ResolveError;
use crate::tokenizer::TokenizeError;

/// Fatal evaluation failures. None of these are recoverable or retried;
/// they unwind to the top-level driver, which reports and exits non-zero.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("unsupported type: {0}")]
    UnsupportedType(String),
    #[error("unsupported operation: {0}")]
    UnsupportedOp(String),
    #[error("unsupported form: {0}")]
    UnsupportedForm(String),
    #[error("`{name}` expects {expected} arguments, found {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("unbound declaration `{0}`")]
    UnboundDecl(String),
    #[error("missing expression value")]
    MissingExprValue,
    #[error("i/o error: {0}")]
    Io(String),
}

impl From<std::io::Error> for EvalError {
    fn from(err: std::io::Error) -> Self {
        EvalError::Io(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Syntax,
    Resolution,
    Unsupported,
    Arity,
    RuntimePanic,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Syntax => "E001",
            ErrorCode::Resolution => "E002",
            ErrorCode::Unsupported => "E003",
            ErrorCode::Arity => "E004",
            ErrorCode::RuntimePanic => "E005",
        }
    }
}

/// Front-door error carrying a stable code, reported by the CLI as
/// `error[Exxx]: message`.
#[derive(Debug, Clone)]
pub struct CivetError {
    pub code: ErrorCode,
    pub message: String,
}

impl CivetError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl std::fmt::Display for CivetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "error[{}]: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for CivetError {}

impl From<TokenizeError> for CivetError {
    fn from(value: TokenizeError) -> Self {
        CivetError::new(ErrorCode::Syntax, value.to_string())
    }
}

impl From<ParseError> for CivetError {
    fn from(value: ParseError) -> Self {
        CivetError::new(ErrorCode::Syntax, value.to_string())
    }
}

impl From<ResolveError> for CivetError {
    fn from(value: ResolveError) -> Self {
        CivetError::new(ErrorCode::Resolution, value.to_string())
    }
}

impl From<EvalError> for CivetError {
    fn from(value: EvalError) -> Self {
        CivetError::new(eval_error_code(&value), value.to_string())
    }
}

pub fn eval_error_code(error: &EvalError) -> ErrorCode {
    match error {
        EvalError::UnsupportedType(_)
        | EvalError::UnsupportedOp(_)
        | EvalError::UnsupportedForm(_) => ErrorCode::Unsupported,
        EvalError::ArityMismatch { .. } => ErrorCode::Arity,
        EvalError::UnboundDecl(_) | EvalError::MissingExprValue | EvalError::Io(_) => {
            ErrorCode::RuntimePanic
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eval_errors_map_to_stable_codes() {
        assert_eq!(
            eval_error_code(&EvalError::UnsupportedForm("for".into())).as_str(),
            "E003"
        );
        assert_eq!(
            eval_error_code(&EvalError::ArityMismatch {
                name: "f".into(),
                expected: 2,
                found: 1,
            })
            .as_str(),
            "E004"
        );
        assert_eq!(
            eval_error_code(&EvalError::MissingExprValue).as_str(),
            "E005"
        );
    }

    #[test]
    fn front_door_error_renders_its_code() {
        let err = CivetError::from(EvalError::UnboundDecl("main".into()));
        assert_eq!(err.to_string(), "error[E005]: unbound declaration `main`");
    }
}
