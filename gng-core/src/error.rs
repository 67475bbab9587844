use thiserror::Error;

/// Errors raised by model operations that combine two models.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
	#[error("n-gram order mismatch: expected {expected}, got {found}")]
	OrderMismatch { expected: usize, found: usize },
}
