use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::validation::date_mask::{commit_date, format_date, DateMaskValidator};

/// Text and parsed value of one `DD.MM.YYYY` form field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateInputState {
    pub raw_text: String,
    pub parsed_date: Option<NaiveDate>,
}

impl DateInputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the field from a stored date, e.g. when an edit form opens.
    pub fn from_date(date: NaiveDate) -> Self {
        DateInputState {
            raw_text: format_date(date),
            parsed_date: Some(date),
        }
    }

    /// Run one edit through the mask and return its validity flag.
    ///
    /// `parsed_date` is refreshed from the corrected text, so it is only set
    /// once the mask holds a complete, strictly parseable date.
    pub fn apply_edit(&mut self, input: &str, validator: &DateMaskValidator) -> bool {
        let outcome = validator.format_and_validate(&self.raw_text, input);
        self.raw_text = outcome.text;
        self.parsed_date = commit_date(&self.raw_text);
        outcome.is_valid
    }

    pub fn clear(&mut self) {
        self.raw_text.clear();
        self.parsed_date = None;
    }

    pub fn is_complete(&self) -> bool {
        self.parsed_date.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisaRequirementEntry {
    pub passport_country_code: String,
    pub destination_country_code: String,
    pub requirement_code: String,
}

impl VisaRequirementEntry {
    pub fn new(passport: &str, destination: &str, requirement: &str) -> Self {
        VisaRequirementEntry {
            passport_country_code: passport.to_string(),
            destination_country_code: destination.to_string(),
            requirement_code: requirement.to_string(),
        }
    }

    pub fn category(&self) -> VisaCategory {
        VisaCategory::classify(&self.requirement_code)
    }

    /// Days of visa-free stay for numeric requirement codes.
    pub fn allowed_stay_days(&self) -> Option<u32> {
        let code = self.requirement_code.trim();
        if !is_stay_length(code) {
            return None;
        }
        code.parse::<u32>().ok()
    }
}

// Day counts: plain digits that fit a u32.
fn is_stay_length(code: &str) -> bool {
    !code.is_empty() && code.chars().all(|c| c.is_ascii_digit()) && code.parse::<u32>().is_ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VisaCategory {
    VisaFree,
    VisaOnArrival,
    EVisa,
    VisaRequired,
    NoAdmission,
    Unknown,
}

impl VisaCategory {
    /// Categories shown to the user, in display order. `Unknown` is never shown.
    pub const ALL: [VisaCategory; 5] = [
        VisaCategory::VisaFree,
        VisaCategory::VisaOnArrival,
        VisaCategory::EVisa,
        VisaCategory::VisaRequired,
        VisaCategory::NoAdmission,
    ];

    /// Map a dataset requirement code to its category.
    ///
    /// Integer codes are visa-free stay lengths in days; `-1` is reserved and
    /// falls through to `Unknown` together with every unrecognised code.
    pub fn classify(requirement_code: &str) -> VisaCategory {
        let code = requirement_code.trim().to_lowercase();
        match code.as_str() {
            "visa free" => VisaCategory::VisaFree,
            "visa on arrival" => VisaCategory::VisaOnArrival,
            "e-visa" | "eta" => VisaCategory::EVisa,
            "visa required" => VisaCategory::VisaRequired,
            "no admission" => VisaCategory::NoAdmission,
            "-1" => VisaCategory::Unknown,
            _ if is_stay_length(&code) => VisaCategory::VisaFree,
            _ => VisaCategory::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VisaCategory::VisaFree => "visa free",
            VisaCategory::VisaOnArrival => "visa on arrival",
            VisaCategory::EVisa => "e-visa",
            VisaCategory::VisaRequired => "visa required",
            VisaCategory::NoAdmission => "no admission",
            VisaCategory::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for VisaCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passport {
    pub custom_name: String,
    pub issuing_country: String,
    /// `None` for passports without an expiry date.
    pub expiry_date: Option<NaiveDate>,
    pub passport_type: String,
}

impl Passport {
    pub fn new(custom_name: &str, issuing_country: &str, expiry_date: Option<NaiveDate>) -> Self {
        Passport {
            custom_name: custom_name.to_string(),
            issuing_country: issuing_country.to_string(),
            expiry_date,
            passport_type: "ordinary".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visa {
    pub custom_name: String,
    /// Custom name of the passport the visa is attached to.
    pub passport: Option<String>,
    pub issuing_country: String,
    /// 0 means multiple entries.
    pub entries_count: u32,
    pub issue_date: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Days of stay; negative means unlimited.
    pub validity_period: i32,
}

impl Visa {
    pub fn is_multiple_entry(&self) -> bool {
        self.entries_count == 0
    }

    pub fn has_unlimited_stay(&self) -> bool {
        self.validity_period < 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpiryStatus {
    Valid,
    ExpiringSoon,
    Expired,
    Indefinite,
}

impl ExpiryStatus {
    /// Documents that need attention are listed first.
    pub fn needs_attention(&self) -> bool {
        matches!(self, ExpiryStatus::ExpiringSoon | ExpiryStatus::Expired)
    }
}
