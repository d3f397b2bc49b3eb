use chrono::{Datelike, Months, NaiveDate};
use std::cmp::Ordering;

use crate::config::Config;
use crate::models::{ExpiryStatus, Passport, Visa};

/// Expiry bookkeeping for passports and visas.
///
/// Every check takes `today` explicitly so results never depend on the clock.
#[derive(Debug, Clone)]
pub struct ExpiryValidator {
    pub passport_warning_months: u32,
    pub visa_warning_months: u32,
    pub visa_warning_days: i64,
}

impl Default for ExpiryValidator {
    fn default() -> Self {
        ExpiryValidator {
            passport_warning_months: 6,
            visa_warning_months: 3,
            visa_warning_days: 90,
        }
    }
}

impl ExpiryValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        ExpiryValidator {
            passport_warning_months: config.passport_warning_months,
            visa_warning_months: config.visa_warning_months,
            visa_warning_days: config.visa_warning_days,
        }
    }

    pub fn passport_status(&self, passport: &Passport, today: NaiveDate) -> ExpiryStatus {
        let Some(expiry) = passport.expiry_date else {
            return ExpiryStatus::Indefinite;
        };

        if expiry < today {
            ExpiryStatus::Expired
        } else if whole_months_between(today, expiry) < self.passport_warning_months {
            ExpiryStatus::ExpiringSoon
        } else {
            ExpiryStatus::Valid
        }
    }

    // A visa is already unusable on its end date.
    pub fn visa_status(&self, visa: &Visa, today: NaiveDate) -> ExpiryStatus {
        if visa.end_date <= today {
            ExpiryStatus::Expired
        } else if whole_months_between(today, visa.end_date) < self.visa_warning_months {
            ExpiryStatus::ExpiringSoon
        } else {
            ExpiryStatus::Valid
        }
    }

    /// Remaining `(months, days)` for a passport inside the warning window.
    pub fn passport_countdown(&self, passport: &Passport, today: NaiveDate) -> Option<(u32, u32)> {
        let expiry = passport.expiry_date?;
        if expiry < today {
            return None;
        }

        let months = whole_months_between(today, expiry);
        if months >= self.passport_warning_months {
            return None;
        }

        let anchor = today.checked_add_months(Months::new(months))?;
        let days = (expiry - anchor).num_days();
        Some((months, u32::try_from(days).ok()?))
    }

    /// Days left on a visa that ends within the warning window.
    pub fn visa_warning_days(&self, visa: &Visa, today: NaiveDate) -> Option<i64> {
        let days = (visa.end_date - today).num_days();
        (days > 0 && days < self.visa_warning_days).then_some(days)
    }

    /// Expired and expiring passports first, then by expiry date.
    pub fn sort_passports(&self, passports: &mut [Passport], today: NaiveDate) {
        passports.sort_by(|a, b| {
            let attention_a = self.passport_status(a, today).needs_attention();
            let attention_b = self.passport_status(b, today).needs_attention();
            attention_b
                .cmp(&attention_a)
                .then_with(|| compare_expiry(a.expiry_date, b.expiry_date))
        });
    }

    pub fn sort_visas(&self, visas: &mut [Visa], today: NaiveDate) {
        visas.sort_by(|a, b| {
            let attention_a = self.visa_status(a, today).needs_attention();
            let attention_b = self.visa_status(b, today).needs_attention();
            attention_b
                .cmp(&attention_a)
                .then_with(|| a.end_date.cmp(&b.end_date))
        });
    }

    /// The visa that currently lets the passport holder enter `country_code`.
    pub fn valid_visa_for_country<'a>(
        &self,
        visas: &'a [Visa],
        country_code: &str,
        passport: &Passport,
        today: NaiveDate,
    ) -> Option<&'a Visa> {
        let country_code = country_code.trim();
        visas.iter().find(|visa| {
            visa.issuing_country.trim().eq_ignore_ascii_case(country_code)
                && visa.passport.as_deref() == Some(passport.custom_name.as_str())
                && visa.start_date <= today
                && today <= visa.end_date
        })
    }
}

// Passports without an expiry date sort after every dated one.
fn compare_expiry(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Number of whole calendar months from `from` to `to` (0 when `to` is earlier).
///
/// Month ends clamp, so 31 Jan to 28 Feb counts as one month.
pub fn whole_months_between(from: NaiveDate, to: NaiveDate) -> u32 {
    if to <= from {
        return 0;
    }

    let span = (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    let mut months = u32::try_from(span).unwrap_or(0);
    while months > 0 {
        match from.checked_add_months(Months::new(months)) {
            Some(candidate) if candidate <= to => break,
            _ => months -= 1,
        }
    }
    months
}
