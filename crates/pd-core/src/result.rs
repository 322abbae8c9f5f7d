//! Result type aliases

use crate::error::PdError;

/// Standard Result type for dashboard operations
pub type PdResult<T> = Result<T, PdError>;
