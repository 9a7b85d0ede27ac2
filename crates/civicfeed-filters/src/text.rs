//! Display text helpers.

use chrono::{Datelike, NaiveDate};

/// Capitalize the first letter of every word and lowercase the rest; any
/// non-letter starts a new word (`"jan. 15"` → `"Jan. 15"`, `"1st"` → `"1St"`).
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_letter = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_letter = true;
        } else {
            out.push(ch);
            prev_letter = false;
        }
    }
    out
}

/// Capitalize only the first character.
pub fn capfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

const AP_MONTHS: [&str; 12] = [
    "Jan.", "Feb.", "March", "April", "May", "June", "July", "Aug.", "Sept.", "Oct.", "Nov.",
    "Dec.",
];

/// AP-style date: `Jan. 15, 2020`, `March 3, 2021`.
pub fn ap_date(date: NaiveDate) -> String {
    let month = AP_MONTHS[date.month0() as usize];
    format!("{month} {}, {}", date.day(), date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case_matches_word_boundaries() {
        assert_eq!(title_case("crime reports"), "Crime Reports");
        assert_eq!(title_case("jan. 15, 2020"), "Jan. 15, 2020");
        assert_eq!(title_case("8 blocks around 100-199 MAIN ST."), "8 Blocks Around 100-199 Main St.");
        assert_eq!(title_case("1st"), "1St");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_capfirst_leaves_rest_alone() {
        assert_eq!(capfirst("arrested"), "Arrested");
        assert_eq!(capfirst("dUI"), "DUI");
    }

    #[test]
    fn test_ap_months() {
        let d = |m, day| NaiveDate::from_ymd_opt(2020, m, day).unwrap();
        assert_eq!(ap_date(d(1, 15)), "Jan. 15, 2020");
        assert_eq!(ap_date(d(3, 1)), "March 1, 2020");
        assert_eq!(ap_date(d(9, 30)), "Sept. 30, 2020");
    }
}
