// Public modules
pub mod changelog;
pub mod defaults;
pub mod deploy;
pub mod error;
pub mod git;
pub mod release;
pub mod version;

// Internal modules - not part of public API
pub(crate) mod paths;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
