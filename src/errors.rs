use thiserror::Error;

/// Failures raised while reading or writing persisted snapshots.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// Outcome of a rejected or failed ledger operation.
///
/// Every variant except [`LedgerError::Persistence`] is an ordinary business
/// outcome: the operation was refused and the inventory is unchanged.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
    #[error("Material `{material}` not found in category `{category}`")]
    MaterialNotFound { category: String, material: String },
    #[error("Insufficient stock for `{material}`: available {available}, requested {requested}")]
    InsufficientStock {
        material: String,
        available: f64,
        requested: f64,
    },
    #[error("Material `{material}` already exists in category `{category}`")]
    DuplicateMaterial { category: String, material: String },
    #[error("Category `{0}` already exists")]
    DuplicateCategory(String),
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error(transparent)]
    Persistence(#[from] StoreError),
}

impl LedgerError {
    /// True when the error is a business-rule refusal rather than an I/O failure.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, LedgerError::Persistence(_))
    }
}
