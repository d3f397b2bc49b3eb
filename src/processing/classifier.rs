use std::collections::BTreeMap;

use crate::models::{CountryNameResolver, VisaCategory, VisaRequirementEntry};

/// Destinations of one passport grouped into displayable visa categories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorizedDestinations {
    buckets: BTreeMap<VisaCategory, Vec<VisaRequirementEntry>>,
}

impl CategorizedDestinations {
    /// Entries of one category, empty when the category has none.
    pub fn get(&self, category: VisaCategory) -> &[VisaRequirementEntry] {
        self.buckets
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn count(&self, category: VisaCategory) -> usize {
        self.get(category).len()
    }

    pub fn total(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VisaCategory, &[VisaRequirementEntry])> {
        self.buckets
            .iter()
            .map(|(category, entries)| (*category, entries.as_slice()))
    }
}

/// Sorts a passport's destinations into visa categories.
pub struct VisaRequirementClassifier<'a, R: CountryNameResolver + ?Sized> {
    names: &'a R,
}

impl<'a, R: CountryNameResolver + ?Sized> VisaRequirementClassifier<'a, R> {
    pub fn new(names: &'a R) -> Self {
        VisaRequirementClassifier { names }
    }

    /// Group the destinations reachable with `passport_code`.
    ///
    /// Each bucket is ordered by display name, then by destination code.
    /// Unknown requirement codes are left out entirely.
    pub fn categorize(
        &self,
        passport_code: &str,
        entries: &[VisaRequirementEntry],
    ) -> CategorizedDestinations {
        let passport_code = passport_code.trim();
        if passport_code.is_empty() {
            return CategorizedDestinations::default();
        }

        let mut buckets: BTreeMap<VisaCategory, Vec<(String, VisaRequirementEntry)>> =
            BTreeMap::new();
        for entry in entries
            .iter()
            .filter(|entry| codes_match(&entry.passport_country_code, passport_code))
        {
            let category = entry.category();
            if category == VisaCategory::Unknown {
                continue;
            }
            let name = self.names.resolve_name(&entry.destination_country_code);
            buckets
                .entry(category)
                .or_default()
                .push((name, entry.clone()));
        }

        let buckets = buckets
            .into_iter()
            .map(|(category, mut named)| {
                named.sort_by(|(name_a, a), (name_b, b)| {
                    name_a
                        .cmp(name_b)
                        .then_with(|| a.destination_country_code.cmp(&b.destination_country_code))
                });
                let entries = named.into_iter().map(|(_, entry)| entry).collect();
                (category, entries)
            })
            .collect();

        CategorizedDestinations { buckets }
    }

    pub fn lookup_requirement<'e>(
        &self,
        passport_code: &str,
        destination_code: &str,
        entries: &'e [VisaRequirementEntry],
    ) -> Option<&'e VisaRequirementEntry> {
        lookup_requirement(passport_code, destination_code, entries)
    }
}

pub fn classify(requirement_code: &str) -> VisaCategory {
    VisaCategory::classify(requirement_code)
}

/// First entry for the passport and destination pair, codes compared
/// case-insensitively.
pub fn lookup_requirement<'e>(
    passport_code: &str,
    destination_code: &str,
    entries: &'e [VisaRequirementEntry],
) -> Option<&'e VisaRequirementEntry> {
    entries.iter().find(|entry| {
        codes_match(&entry.passport_country_code, passport_code)
            && codes_match(&entry.destination_country_code, destination_code)
    })
}

fn codes_match(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
