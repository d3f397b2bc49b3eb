use chrono::NaiveDate;
use log::{debug, info};

use crate::config::Config;
use crate::models::*;
use crate::processing::*;
use crate::utils::TravelError;
use crate::validation::*;

/// Everything a destination screen needs: the requirement dataset, country
/// names and the user's travel documents.
pub struct TravelAdvisor {
    dataset: RequirementDataset,
    directory: CountryDirectory,
    expiry: ExpiryValidator,
}

impl TravelAdvisor {
    pub fn new(dataset: RequirementDataset, directory: CountryDirectory) -> Self {
        TravelAdvisor {
            dataset,
            directory,
            expiry: ExpiryValidator::new(),
        }
    }

    /// Build from the caches named by `config`; missing caches start empty.
    pub fn from_config(config: &Config) -> Result<Self, TravelError> {
        let dataset = RequirementDataset::load_cache(config.dataset_cache_path())?.unwrap_or_default();
        let codes_path = config.codes_cache_path();
        let directory = if codes_path.exists() {
            CountryDirectory::from_codes_file(&codes_path)?
        } else {
            CountryDirectory::default()
        };

        Ok(TravelAdvisor {
            dataset,
            directory,
            expiry: ExpiryValidator::from_config(config),
        })
    }

    pub fn dataset(&self) -> &RequirementDataset {
        &self.dataset
    }

    pub fn directory(&self) -> &CountryDirectory {
        &self.directory
    }

    pub fn expiry(&self) -> &ExpiryValidator {
        &self.expiry
    }

    /// Destinations for the passport, grouped by visa category.
    pub fn destinations_for(&self, passport: Option<&Passport>) -> CategorizedDestinations {
        let Some(passport) = passport else {
            return CategorizedDestinations::default();
        };

        let classifier = VisaRequirementClassifier::new(&self.directory);
        let destinations = classifier.categorize(&passport.issuing_country, self.dataset.entries());
        debug!(
            "{} destinations categorized for {}",
            destinations.total(),
            passport.issuing_country
        );
        destinations
    }

    pub fn requirement_for(
        &self,
        passport: &Passport,
        destination_code: &str,
    ) -> Option<&VisaRequirementEntry> {
        lookup_requirement(&passport.issuing_country, destination_code, self.dataset.entries())
    }

    pub fn visa_for_destination<'v>(
        &self,
        passport: &Passport,
        visas: &'v [Visa],
        destination_code: &str,
        today: NaiveDate,
    ) -> Option<&'v Visa> {
        self.expiry
            .valid_visa_for_country(visas, destination_code, passport, today)
    }

    /// Swap in a freshly fetched dataset. Returns whether anything changed.
    pub fn replace_dataset(&mut self, dataset: RequirementDataset) -> bool {
        if !self.dataset.differs_from(&dataset) {
            debug!("Dataset unchanged ({} rows)", dataset.len());
            return false;
        }
        info!(
            "Dataset updated: {} -> {} rows",
            self.dataset.len(),
            dataset.len()
        );
        self.dataset = dataset;
        true
    }

    pub fn replace_directory(&mut self, directory: CountryDirectory) {
        self.directory = directory;
    }
}
