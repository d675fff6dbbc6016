pub mod error;
pub mod record;
pub mod reference;
pub mod types;

#[cfg(feature = "synthesis")]
pub mod synthesis;

#[cfg(feature = "legacy")]
pub mod legacy;

#[cfg(feature = "feeds")]
pub mod feeds;

pub use error::CoveredBondsError;
pub use types::*;

/// Standard result type for all covered-bonds operations
pub type CoveredBondsResult<T> = Result<T, CoveredBondsError>;
