use csv::{ReaderBuilder, Trim};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::models::VisaRequirementEntry;
use crate::utils::TravelError;

/// In-memory copy of the passport index dataset.
///
/// The CSV is the tidy ISO-2 export: a `Passport,Destination,Requirement`
/// header followed by one row per passport and destination pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequirementDataset {
    entries: Vec<VisaRequirementEntry>,
}

impl RequirementDataset {
    pub fn new(entries: Vec<VisaRequirementEntry>) -> Self {
        RequirementDataset { entries }
    }

    pub fn from_csv_str(text: &str) -> Result<Self, TravelError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(text.as_bytes());

        let mut entries = Vec::new();
        let mut skipped = 0usize;
        for (index, record) in reader.records().enumerate() {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    warn!("Skipping unreadable dataset row {}: {}", index + 1, e);
                    skipped += 1;
                    continue;
                }
            };
            if record.len() < 3 {
                skipped += 1;
                continue;
            }
            entries.push(VisaRequirementEntry::new(&record[0], &record[1], &record[2]));
        }

        if skipped > 0 {
            warn!("Skipped {} malformed dataset rows", skipped);
        }
        debug!("Parsed {} visa requirement rows", entries.len());
        Ok(RequirementDataset { entries })
    }

    pub fn from_csv_file<P: AsRef<Path>>(path: P) -> Result<Self, TravelError> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_csv_str(&text)
    }

    /// Parse a CSV export and try to refresh the cache at `cache_path`.
    ///
    /// A cache that cannot be written is logged and skipped; only an
    /// unreadable CSV is an error.
    pub fn import_csv<P: AsRef<Path>, C: AsRef<Path>>(
        path: P,
        cache_path: C,
    ) -> Result<Self, TravelError> {
        let dataset = Self::from_csv_file(path)?;
        if let Err(e) = dataset.save_cache(cache_path.as_ref()) {
            warn!(
                "Could not cache dataset at {}: {}",
                cache_path.as_ref().display(),
                e
            );
        }
        Ok(dataset)
    }

    /// Read a JSON cache written by `save_cache`. A missing file is not an error.
    pub fn load_cache<P: AsRef<Path>>(path: P) -> Result<Option<Self>, TravelError> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No cached dataset at {}", path.display());
            return Ok(None);
        }

        let text = fs::read_to_string(path)?;
        let dataset: RequirementDataset = serde_json::from_str(&text)?;
        info!("Loaded {} cached rows from {}", dataset.len(), path.display());
        Ok(Some(dataset))
    }

    pub fn save_cache<P: AsRef<Path>>(&self, path: P) -> Result<(), TravelError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        info!("Saved {} rows to {}", self.len(), path.display());
        Ok(())
    }

    /// Entries grouped by upper-case passport code, in dataset order.
    pub fn by_passport(&self) -> HashMap<String, Vec<VisaRequirementEntry>> {
        let mut grouped: HashMap<String, Vec<VisaRequirementEntry>> = HashMap::new();
        for entry in &self.entries {
            grouped
                .entry(entry.passport_country_code.to_uppercase())
                .or_default()
                .push(entry.clone());
        }
        grouped
    }

    pub fn differs_from(&self, other: &RequirementDataset) -> bool {
        self.entries != other.entries
    }

    pub fn entries(&self) -> &[VisaRequirementEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
