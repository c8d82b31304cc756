pub mod error;
pub mod types;

#[cfg(feature = "finance")]
pub mod finance;

#[cfg(feature = "catalog")]
pub mod catalog;

#[cfg(feature = "locale")]
pub mod locale;

#[cfg(feature = "preferences")]
pub mod preferences;

pub use error::ShowroomError;
pub use types::*;

/// Standard result type for all showroom operations
pub type ShowroomResult<T> = Result<T, ShowroomError>;
