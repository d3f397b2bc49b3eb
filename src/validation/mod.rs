pub mod date_mask;
pub mod expiry;

pub use date_mask::{commit_date, format_date, DateConstraints, DateMaskValidator, MaskOutcome};
pub use expiry::ExpiryValidator;
