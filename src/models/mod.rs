pub mod countries;
pub mod data;

pub use countries::{CountryDirectory, CountryNameResolver};
pub use data::*;
