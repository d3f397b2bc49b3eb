use lazy_static::lazy_static;
use log::{info, warn};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use crate::utils::TravelError;

/// Resolves a country code to the name shown to the user.
pub trait CountryNameResolver {
    /// Unknown codes resolve to the code itself.
    fn resolve_name(&self, code: &str) -> String;
}

impl CountryNameResolver for HashMap<String, String> {
    fn resolve_name(&self, code: &str) -> String {
        self.get(code)
            .or_else(|| self.get(&code.to_uppercase()))
            .cloned()
            .unwrap_or_else(|| code.to_string())
    }
}

lazy_static! {
    // The flag CDN also lists territories and subdivisions; only these are kept.
    static ref SOVEREIGN_CODES: HashSet<&'static str> = [
        "AF", "AL", "DZ", "AD", "AO", "AG", "AR", "AM", "AU", "AT", "AZ", "BS", "BH", "BD", "BB",
        "BY", "BE", "BZ", "BJ", "BT", "BO", "BA", "BW", "BR", "BN", "BG", "BF", "BI", "KH", "CM",
        "CA", "CV", "CF", "TD", "CL", "CN", "CO", "KM", "CG", "CD", "CR", "CI", "HR", "CU", "CY",
        "CZ", "DK", "DJ", "DM", "DO", "EC", "EG", "SV", "GQ", "ER", "EE", "SZ", "ET", "FJ", "FI",
        "FR", "GA", "GM", "GE", "DE", "GH", "GR", "GD", "GT", "GN", "GW", "GY", "HT", "HN", "HU",
        "IS", "IN", "ID", "IR", "IQ", "IE", "IL", "IT", "JM", "JP", "JO", "KZ", "KE", "KI", "KP",
        "KR", "KW", "KG", "LA", "LV", "LB", "LS", "LR", "LY", "LI", "LT", "LU", "MG", "MW", "MY",
        "MV", "ML", "MT", "MH", "MR", "MU", "MX", "FM", "MD", "MC", "MN", "ME", "MA", "MZ", "MM",
        "NA", "NR", "NP", "NL", "NZ", "NI", "NE", "NG", "NO", "OM", "PK", "PW", "PA", "PG", "PY",
        "PE", "PH", "PL", "PT", "QA", "RO", "RU", "RW", "KN", "LC", "VC", "WS", "SM", "ST", "SA",
        "SN", "RS", "SC", "SL", "SG", "SK", "SI", "SB", "SO", "ZA", "SS", "ES", "LK", "SD", "SR",
        "SE", "CH", "SY", "TJ", "TH", "TL", "TG", "TO", "TT", "TN", "TR", "TM", "TV", "UG", "UA",
        "AE", "GB", "US", "UY", "UZ", "VU", "VE", "VN", "YE", "ZM", "ZW", "TZ", "HK", "MO", "MK",
        "TW", "PS", "XK",
    ]
    .into_iter()
    .collect();
}

/// Country code to display name map, keyed by upper-case ISO-2 code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryDirectory {
    names: HashMap<String, String>,
}

impl CountryDirectory {
    pub fn new(names: HashMap<String, String>) -> Self {
        let names = names
            .into_iter()
            .map(|(code, name)| (code.trim().to_uppercase(), name))
            .collect();
        CountryDirectory { names }
    }

    /// Build from the flag CDN `codes.json` document.
    pub fn from_codes_json(text: &str) -> Result<Self, TravelError> {
        let decoded: HashMap<String, String> = serde_json::from_str(text)?;
        let total = decoded.len();
        let names: HashMap<String, String> = decoded
            .into_iter()
            .filter(|(code, _)| !code.contains('-'))
            .map(|(code, name)| (code.to_uppercase(), name))
            .filter(|(code, _)| SOVEREIGN_CODES.contains(code.as_str()))
            .collect();

        info!("Loaded {} sovereign countries out of {} codes", names.len(), total);
        Ok(CountryDirectory { names })
    }

    pub fn from_codes_file<P: AsRef<Path>>(path: P) -> Result<Self, TravelError> {
        let text = fs::read_to_string(path)?;
        Self::from_codes_json(&text)
    }

    pub fn code_for(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        let code = self
            .names
            .iter()
            .find(|(_, candidate)| candidate.as_str() == name)
            .map(|(code, _)| code.as_str());
        if code.is_none() {
            warn!("No country code found for {:?}", name);
        }
        code
    }

    /// All display names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.values().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl CountryNameResolver for CountryDirectory {
    fn resolve_name(&self, code: &str) -> String {
        self.names
            .get(&code.trim().to_uppercase())
            .cloned()
            .unwrap_or_else(|| code.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CODES: &str = r#"{
        "de": "Germany",
        "us": "United States",
        "us-ca": "California",
        "gb-sct": "Scotland",
        "aq": "Antarctica",
        "fr": "France"
    }"#;

    #[test]
    fn test_codes_json_keeps_sovereign_countries() {
        let directory = CountryDirectory::from_codes_json(CODES).unwrap();
        assert_eq!(directory.len(), 3);
        assert_eq!(directory.names(), vec!["France", "Germany", "United States"]);
    }

    #[test]
    fn test_resolve_name_falls_back_to_code() {
        let directory = CountryDirectory::from_codes_json(CODES).unwrap();
        assert_eq!(directory.resolve_name("de"), "Germany");
        assert_eq!(directory.resolve_name("DE"), "Germany");
        assert_eq!(directory.resolve_name("AQ"), "AQ");
    }

    #[test]
    fn test_code_for_name() {
        let directory = CountryDirectory::from_codes_json(CODES).unwrap();
        assert_eq!(directory.code_for(" France "), Some("FR"));
        assert_eq!(directory.code_for("Atlantis"), None);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(matches!(
            CountryDirectory::from_codes_json("[1, 2]"),
            Err(TravelError::Json(_))
        ));
    }

    #[test]
    fn test_hash_map_resolver() {
        let mut names = HashMap::new();
        names.insert("JP".to_string(), "Japan".to_string());
        assert_eq!(names.resolve_name("jp"), "Japan");
        assert_eq!(names.resolve_name("KR"), "KR");
    }
}
