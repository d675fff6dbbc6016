use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoveredBondsError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Unknown country: {0} is not present in the issuer catalog")]
    UnknownCountry(String),

    #[error("Empty catalog: {0}")]
    EmptyCatalog(String),

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Upstream unavailable: {source_name} — {reason}")]
    Upstream { source_name: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CoveredBondsError {
    fn from(e: serde_json::Error) -> Self {
        CoveredBondsError::SerializationError(e.to_string())
    }
}
