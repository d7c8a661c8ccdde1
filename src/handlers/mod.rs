// Handler modules
pub mod validate;

pub use validate::{EXIT_CLEAN, EXIT_FAILURE, EXIT_FINDINGS, ValidateOptions, handle_validate};
