use chrono::NaiveDate;

/// Inclusive upper bound of a child's age in years.
pub const DEFAULT_MAX_CHILD_AGE: u32 = 18;

const US_FORMAT: &str = "%m/%d/%Y";
const ISO_FORMAT: &str = "%Y-%m-%d";

/// Parse a birthdate in `MM/DD/YYYY` (the data file format) or `YYYY-MM-DD`.
/// Returns `None` on any other shape or an impossible date.
pub fn parse_birthdate(date_str: &str) -> Option<NaiveDate> {
    let s = date_str.trim();
    if s.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(s, US_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(s, ISO_FORMAT))
        .ok()
}

pub fn format_birthdate(date: NaiveDate) -> String {
    date.format(US_FORMAT).to_string()
}

/// Whole calendar years between `birthdate` and `today`.
/// An absent birthdate, or one after `today`, yields 0.
pub fn age_on(birthdate: Option<NaiveDate>, today: NaiveDate) -> u32 {
    birthdate
        .and_then(|b| today.years_since(b))
        .unwrap_or(0)
}

#[inline]
pub fn is_child(age: u32, max_child_age: u32) -> bool {
    age <= max_child_age
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parses_both_formats() {
        assert_eq!(parse_birthdate("03/06/1984"), Some(d(1984, 3, 6)));
        assert_eq!(parse_birthdate(" 1984-03-06 "), Some(d(1984, 3, 6)));
    }

    #[test]
    fn rejects_bad_dates() {
        assert_eq!(parse_birthdate("3/6/1984"), None);
        assert_eq!(parse_birthdate("02/30/2020"), None);
        assert_eq!(parse_birthdate("1984/03/06"), None);
        assert_eq!(parse_birthdate(""), None);
    }

    #[test]
    fn exact_anniversary_counts() {
        let today = d(2024, 3, 6);
        assert_eq!(age_on(Some(d(1984, 3, 6)), today), 40);
        assert_eq!(age_on(Some(d(1984, 3, 7)), today), 39);
    }

    #[test]
    fn absent_or_future_is_zero() {
        let today = d(2024, 1, 1);
        assert_eq!(age_on(None, today), 0);
        assert_eq!(age_on(Some(d(2030, 1, 1)), today), 0);
        assert_eq!(age_on(Some(today), today), 0);
    }

    #[test]
    fn leap_day_birthdays() {
        let born = d(2000, 2, 29);
        assert_eq!(age_on(Some(born), d(2021, 2, 28)), 20);
        assert_eq!(age_on(Some(born), d(2021, 3, 1)), 21);
        assert_eq!(age_on(Some(born), d(2024, 2, 29)), 24);
    }

    #[test]
    fn child_boundary_is_inclusive() {
        assert!(is_child(18, DEFAULT_MAX_CHILD_AGE));
        assert!(!is_child(19, DEFAULT_MAX_CHILD_AGE));
        assert!(is_child(0, DEFAULT_MAX_CHILD_AGE));
    }
}
