pub mod error;

pub use error::TravelError;
