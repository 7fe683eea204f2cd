pub mod matcher;
pub mod store;

pub use matcher::*;
pub use store::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuleStoreError {
    #[error("Failed to read rule file {0}: {1}")]
    Io(String, String),

    #[error("Failed to parse rule table: {0}")]
    Parse(String),

    #[error("Duplicate rule id: {0}")]
    DuplicateId(String),

    #[error("Invalid rule {id}: {reason}")]
    InvalidRule { id: String, reason: String },
}
