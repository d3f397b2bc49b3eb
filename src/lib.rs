pub mod config;
pub mod models;
pub mod processing;
pub mod validation;
pub mod utils;
pub mod travel_advisor;

pub use config::Config;
pub use travel_advisor::TravelAdvisor;
