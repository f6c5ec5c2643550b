//! Error types.
//!
//! - `ModelError`: failures raised by the fitting core (term algebra, normal
//!   equations, selection). These are deterministic and never retried.
//! - `AppError`: what the `rgr` binary reports, carrying a process exit code.

use thiserror::Error;

/// Errors raised by the term algebra and equation fitting code.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// Vectors with mismatched lengths, non-finite values, or an empty term.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A term name is already registered in the equation.
    #[error("Duplicate term '{0}'")]
    DuplicateTerm(String),

    /// A normal system was requested for an equation without terms.
    #[error("Equation has no active terms")]
    EmptyModel,

    /// The pseudo-inverse produced no finite coefficients.
    #[error("Normal system could not be solved")]
    SingularSystem,

    #[error("Too many base variables: {count} (max {max})")]
    TooManyVariables { count: usize, max: usize },
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        let exit_code = match err {
            ModelError::MalformedInput(_)
            | ModelError::DuplicateTerm(_)
            | ModelError::TooManyVariables { .. } => 2,
            ModelError::EmptyModel => 3,
            ModelError::SingularSystem => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_errors_map_to_exit_codes() {
        assert_eq!(AppError::from(ModelError::DuplicateTerm("T".into())).exit_code(), 2);
        assert_eq!(AppError::from(ModelError::EmptyModel).exit_code(), 3);
        assert_eq!(AppError::from(ModelError::SingularSystem).exit_code(), 4);

        let err = AppError::from(ModelError::TooManyVariables { count: 20, max: 16 });
        assert_eq!(err.to_string(), "Too many base variables: 20 (max 16)");
    }
}
