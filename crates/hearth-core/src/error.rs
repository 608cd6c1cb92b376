use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("full rebuild of {requested} entities exceeds the limit of {limit}")]
    CapacityExceeded { limit: usize, requested: usize },

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// Shorthand for a missing property.
    pub fn property_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "property",
            id: id.into(),
        }
    }

    /// Returns `true` when the error indicates the entity was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
