//! Error types produced by the configuration engine.
//!
//! Two families live here. [`PolyError`] and [`SetupError`] are ordinary Rust
//! errors for I/O, engine setup defects and rejected reloads. Decode-time
//! problems are instead [`ValidationError`] values carried alongside partial
//! results in a [`DecodeResult`], so one pass can diagnose a whole document.

mod aggregate;
mod outcome;
mod types;
mod validation;

pub use aggregate::ErrorReport;
pub use outcome::DecodeResult;
pub use types::{PolyError, SetupError};
pub use validation::{ErrorKind, ValidationError, ValidationLevel};

/// Result type for fallible engine operations.
pub type PolyResult<T> = Result<T, PolyError>;

#[cfg(test)]
mod tests;
