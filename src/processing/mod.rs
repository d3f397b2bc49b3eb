pub mod classifier;
pub mod dataset;

pub use classifier::{classify, lookup_requirement, CategorizedDestinations, VisaRequirementClassifier};
pub use dataset::RequirementDataset;
