use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

// DDMMYYYY
const MAX_DIGITS: usize = 8;
const MASK_LEN: usize = 10;
const MAX_YEAR: i32 = 2100;

lazy_static! {
    static ref NON_DIGIT: Regex = Regex::new(r"[^0-9]").unwrap();
}

/// Bounds applied to a completed date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateConstraints {
    /// Completed dates strictly before this day are rejected.
    pub minimum_date: Option<NaiveDate>,
    /// The other end of a date range (visa start/end).
    pub opposite_date: Option<NaiveDate>,
    /// When true the field is the range start and must not pass `opposite_date`.
    pub is_start_boundary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskOutcome {
    pub text: String,
    pub is_valid: bool,
}

/// Incremental mask for `DD.MM.YYYY` fields.
///
/// The validator is fed one edit at a time: the text shown before the edit and
/// the raw text the control reports afterwards. It rebuilds the display string
/// from the typed digits, zero-pads unambiguous leading digits, inserts the
/// separators and drops characters that cannot start or finish a valid date.
/// A rejected character clears `is_valid`, which the UI turns into a shake.
#[derive(Debug, Clone, Default)]
pub struct DateMaskValidator {
    constraints: DateConstraints,
}

impl DateMaskValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_constraints(constraints: DateConstraints) -> Self {
        DateMaskValidator { constraints }
    }

    pub fn minimum_date(mut self, date: NaiveDate) -> Self {
        self.constraints.minimum_date = Some(date);
        self
    }

    pub fn opposite_date(mut self, date: NaiveDate, is_start_boundary: bool) -> Self {
        self.constraints.opposite_date = Some(date);
        self.constraints.is_start_boundary = is_start_boundary;
        self
    }

    pub fn constraints(&self) -> &DateConstraints {
        &self.constraints
    }

    pub fn format_and_validate(&self, previous: &str, input: &str) -> MaskOutcome {
        let is_deleting = input.chars().count() < previous.chars().count();
        let has_separator = input.contains('.');

        let mut digits = NON_DIGIT.replace_all(input, "").into_owned();
        if !is_deleting && digits.len() > MAX_DIGITS {
            digits.truncate(MAX_DIGITS);
        }
        let digits = digits.as_bytes();

        let mut result = String::with_capacity(MASK_LEN);
        let mut is_valid = true;

        // Day
        match &digits[..digits.len().min(2)] {
            [first] => {
                if (b'4'..=b'9').contains(first) {
                    result.push('0');
                }
                result.push(*first as char);
            }
            [first, second] => {
                let day = two_digit_value(*first, *second);
                result.push(*first as char);
                if (1..=31).contains(&day) {
                    result.push(*second as char);
                } else {
                    is_valid = false;
                }
            }
            _ => {}
        }

        let keep_day_separator = is_deleting && has_separator && result.len() == 2;
        if (digits.len() > 2 || keep_day_separator) && result.len() == 2 && !result.contains('.') {
            result.push('.');
        }

        // A rejected day or month digit ends the rebuild; later digits are dropped.
        // Month
        if is_valid && digits.len() > 2 {
            match &digits[2..digits.len().min(4)] {
                [first] => {
                    if (b'2'..=b'9').contains(first) {
                        result.push('0');
                    }
                    result.push(*first as char);
                }
                [first, second] => {
                    let month = two_digit_value(*first, *second);
                    if (1..=12).contains(&month) {
                        result.push(*first as char);
                        result.push(*second as char);
                        // February can never hold day 30 or 31
                        if month == 2 && segment_value(&result, 0..2).map_or(false, |day| day > 29) {
                            result.pop();
                            is_valid = false;
                        }
                    } else {
                        result.push(*first as char);
                        is_valid = false;
                    }
                }
                _ => {}
            }
        }

        let keep_month_separator = is_deleting && has_separator && result.len() == 5;
        if (digits.len() > 4 || keep_month_separator)
            && result.len() == 5
            && result.as_bytes()[4] != b'.'
        {
            result.push('.');
        }

        // Year
        if is_valid && digits.len() > 4 {
            let year_part = &digits[4..];
            if year_part[0] != b'2' {
                is_valid = false;
                result.pop();
            } else {
                let limited = &year_part[..year_part.len().min(4)];
                result.extend(limited.iter().map(|b| *b as char));

                if limited.len() == 4 {
                    let year = limited
                        .iter()
                        .fold(0i32, |acc, b| acc * 10 + i32::from(b - b'0'));

                    if year > MAX_YEAR {
                        is_valid = false;
                        result.pop();
                    } else if let Some(minimum) = self.constraints.minimum_date {
                        if let (Some(day), Some(month)) =
                            (segment_value(&result, 0..2), segment_value(&result, 3..5))
                        {
                            if (year, month, day) < (minimum.year(), minimum.month(), minimum.day()) {
                                is_valid = false;
                                result.pop();
                            }
                        }
                    }

                    if result.len() == MASK_LEN {
                        let day = segment_value(&result, 0..2).unwrap_or(0);
                        let month = segment_value(&result, 3..5).unwrap_or(0);
                        if month == 2 {
                            let leap = is_leap_year(year);
                            let max_days = if leap { 29 } else { 28 };
                            if day > max_days {
                                is_valid = false;
                                if day == 29 && !leap {
                                    result.pop();
                                }
                            }
                        }
                    }
                }
            }

            if let Some(opposite) = self.constraints.opposite_date {
                if let Some(current) = commit_date(&result) {
                    let out_of_order = if self.constraints.is_start_boundary {
                        current > opposite
                    } else {
                        current < opposite
                    };
                    if out_of_order {
                        is_valid = false;
                        result.pop();
                    }
                }
            }
        }

        if is_deleting && result.chars().count() < input.chars().count() {
            result = input.to_string();
        }

        if !is_valid {
            debug!("Date input {:?} corrected to {:?}", input, result);
        }

        MaskOutcome {
            text: result,
            is_valid,
        }
    }
}

/// Strict `DD.MM.YYYY` parse; no rollover of out-of-range days.
pub fn commit_date(raw: &str) -> Option<NaiveDate> {
    let bytes = raw.as_bytes();
    if bytes.len() != MASK_LEN || bytes[2] != b'.' || bytes[5] != b'.' {
        return None;
    }
    let digits_only = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 2 || i == 5 || b.is_ascii_digit());
    if !digits_only {
        return None;
    }

    let day = raw[0..2].parse::<u32>().ok()?;
    let month = raw[3..5].parse::<u32>().ok()?;
    let year = raw[6..10].parse::<i32>().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn two_digit_value(first: u8, second: u8) -> u32 {
    u32::from(first - b'0') * 10 + u32::from(second - b'0')
}

fn segment_value(text: &str, range: std::ops::Range<usize>) -> Option<u32> {
    text.get(range)?.parse::<u32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn check(validator: &DateMaskValidator, previous: &str, input: &str) -> (String, bool) {
        let outcome = validator.format_and_validate(previous, input);
        (outcome.text, outcome.is_valid)
    }

    /// Feed a string one character at a time, the way a keyboard would.
    fn type_out(validator: &DateMaskValidator, keys: &str) -> (String, bool) {
        let mut text = String::new();
        let mut all_valid = true;
        for key in keys.chars() {
            let input = format!("{}{}", text, key);
            let outcome = validator.format_and_validate(&text, &input);
            all_valid &= outcome.is_valid;
            text = outcome.text;
        }
        (text, all_valid)
    }

    #[test]
    fn test_leading_day_digit() {
        let validator = DateMaskValidator::new();
        assert_eq!(check(&validator, "", "3"), ("3".to_string(), true));
        assert_eq!(check(&validator, "", "0"), ("0".to_string(), true));
        assert_eq!(check(&validator, "", "5"), ("05".to_string(), true));
        assert_eq!(check(&validator, "", "9"), ("09".to_string(), true));
    }

    #[test]
    fn test_day_out_of_range() {
        let validator = DateMaskValidator::new();
        assert_eq!(check(&validator, "3", "32"), ("3".to_string(), false));
        assert_eq!(check(&validator, "0", "00"), ("0".to_string(), false));
        assert_eq!(check(&validator, "3", "31"), ("31".to_string(), true));
    }

    #[test]
    fn test_separators_inserted() {
        let validator = DateMaskValidator::new();
        assert_eq!(check(&validator, "12", "121"), ("12.1".to_string(), true));
        assert_eq!(check(&validator, "12.1", "12.11"), ("12.11".to_string(), true));
        assert_eq!(check(&validator, "12.11", "12.112"), ("12.11.2".to_string(), true));
    }

    #[test]
    fn test_month_padding_and_range() {
        let validator = DateMaskValidator::new();
        assert_eq!(check(&validator, "12.", "12.3"), ("12.03".to_string(), true));
        assert_eq!(check(&validator, "12.1", "12.13"), ("12.1".to_string(), false));
        assert_eq!(check(&validator, "12.0", "12.00"), ("12.0".to_string(), false));
    }

    #[test]
    fn test_february_rejects_day_30_and_31() {
        let validator = DateMaskValidator::new();
        assert_eq!(check(&validator, "31.0", "31.02"), ("31.0".to_string(), false));
        assert_eq!(check(&validator, "30.0", "30.02"), ("30.0".to_string(), false));
        assert_eq!(check(&validator, "29.0", "29.02"), ("29.02".to_string(), true));
    }

    #[test]
    fn test_year_must_start_with_two() {
        let validator = DateMaskValidator::new();
        assert_eq!(check(&validator, "12.03.", "12.03.1"), ("12.03".to_string(), false));
        assert_eq!(check(&validator, "12.03.", "12.03.2"), ("12.03.2".to_string(), true));
    }

    #[test]
    fn test_year_upper_bound() {
        let validator = DateMaskValidator::new();
        assert_eq!(
            check(&validator, "12.03.210", "12.03.2101"),
            ("12.03.210".to_string(), false)
        );
        assert_eq!(
            check(&validator, "12.03.210", "12.03.2100"),
            ("12.03.2100".to_string(), true)
        );
    }

    #[test]
    fn test_minimum_date() {
        let validator = DateMaskValidator::new().minimum_date(date(2025, 1, 1));
        assert_eq!(
            check(&validator, "31.12.202", "31.12.2024"),
            ("31.12.202".to_string(), false)
        );
        assert_eq!(
            check(&validator, "01.01.202", "01.01.2025"),
            ("01.01.2025".to_string(), true)
        );
    }

    #[test]
    fn test_leap_year_february() {
        let validator = DateMaskValidator::new();
        assert_eq!(
            check(&validator, "29.02.202", "29.02.2023"),
            ("29.02.202".to_string(), false)
        );
        assert_eq!(
            check(&validator, "29.02.202", "29.02.2024"),
            ("29.02.2024".to_string(), true)
        );
        assert_eq!(
            check(&validator, "29.02.200", "29.02.2000"),
            ("29.02.2000".to_string(), true)
        );
        assert_eq!(
            check(&validator, "29.02.210", "29.02.2100"),
            ("29.02.210".to_string(), false)
        );
    }

    #[test]
    fn test_start_boundary_must_not_pass_end() {
        let validator = DateMaskValidator::new().opposite_date(date(2025, 6, 10), true);
        assert_eq!(
            check(&validator, "11.06.202", "11.06.2025"),
            ("11.06.202".to_string(), false)
        );
        assert_eq!(
            check(&validator, "10.06.202", "10.06.2025"),
            ("10.06.2025".to_string(), true)
        );
    }

    #[test]
    fn test_end_boundary_must_not_precede_start() {
        let validator = DateMaskValidator::new().opposite_date(date(2025, 6, 10), false);
        assert_eq!(
            check(&validator, "09.06.202", "09.06.2025"),
            ("09.06.202".to_string(), false)
        );
        assert_eq!(
            check(&validator, "10.06.202", "10.06.2025"),
            ("10.06.2025".to_string(), true)
        );
    }

    #[test]
    fn test_paste_strips_and_truncates() {
        let validator = DateMaskValidator::new();
        assert_eq!(
            check(&validator, "", "15/03/2026"),
            ("15.03.2026".to_string(), true)
        );
        assert_eq!(
            check(&validator, "", "150320269999"),
            ("15.03.2026".to_string(), true)
        );
    }

    #[test]
    fn test_paste_of_invalid_date_stops_at_rejection() {
        let validator = DateMaskValidator::new();
        assert_eq!(check(&validator, "", "31.02.2024"), ("31.0".to_string(), false));
        assert_eq!(check(&validator, "", "31022024"), ("31.0".to_string(), false));
        assert_eq!(check(&validator, "", "32122024"), ("3".to_string(), false));
        assert_eq!(check(&validator, "", "12.13.2024"), ("12.1".to_string(), false));
    }

    #[test]
    fn test_paste_matches_typing() {
        let validator = DateMaskValidator::new();
        for keys in ["31022024", "29022023", "15032026"] {
            let (typed, _) = type_out(&validator, keys);
            let pasted = validator.format_and_validate("", keys).text;
            assert_eq!(pasted, typed, "{}", keys);
        }
    }

    #[test]
    fn test_constraints_accessor() {
        let minimum = date(2025, 1, 1);
        let opposite = date(2025, 6, 10);
        let validator = DateMaskValidator::new()
            .minimum_date(minimum)
            .opposite_date(opposite, true);
        assert_eq!(
            *validator.constraints(),
            DateConstraints {
                minimum_date: Some(minimum),
                opposite_date: Some(opposite),
                is_start_boundary: true,
            }
        );
        assert_eq!(*DateMaskValidator::new().constraints(), DateConstraints::default());
    }

    #[test]
    fn test_deleting_keeps_user_text() {
        let validator = DateMaskValidator::new();
        assert_eq!(check(&validator, "12.03", "12.0"), ("12.0".to_string(), true));
        assert_eq!(check(&validator, "12.0", "12."), ("12.".to_string(), true));
        assert_eq!(check(&validator, "12.", "12"), ("12".to_string(), true));
        assert_eq!(check(&validator, "12.03.2", "12.03."), ("12.03.".to_string(), true));
        assert_eq!(check(&validator, "04", "0"), ("0".to_string(), true));
    }

    #[test]
    fn test_typed_dates_commit_to_same_value() {
        let validator = DateMaskValidator::new();
        for (keys, expected) in [
            ("15032026", date(2026, 3, 15)),
            ("29022024", date(2024, 2, 29)),
            ("01012000", date(2000, 1, 1)),
            ("5122030", date(2030, 12, 5)),
        ] {
            let (text, all_valid) = type_out(&validator, keys);
            assert!(all_valid, "{} rejected", keys);
            assert_eq!(text.len(), 10);
            assert_eq!(commit_date(&text), Some(expected));
        }
    }

    #[test]
    fn test_commit_date_is_strict() {
        assert_eq!(commit_date("29.02.2023"), None);
        assert_eq!(commit_date("29.02.2024"), Some(date(2024, 2, 29)));
        assert_eq!(commit_date("31.02.2024"), None);
        assert_eq!(commit_date("31.04.2024"), None);
        assert_eq!(commit_date("1.02.2024"), None);
        assert_eq!(commit_date("01-02-2024"), None);
        assert_eq!(commit_date("01.02.20245"), None);
        assert_eq!(commit_date("a1.02.2024"), None);
        assert_eq!(commit_date(""), None);
    }

    #[test]
    fn test_format_date_round_trips_through_mask() {
        let formatted = format_date(date(2027, 7, 4));
        assert_eq!(formatted, "04.07.2027");
        assert_eq!(commit_date(&formatted), Some(date(2027, 7, 4)));
    }

    #[test]
    fn test_leap_year_rule() {
        assert!(is_leap_year(2024));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(2100));
        assert!(!is_leap_year(2023));
    }
}
