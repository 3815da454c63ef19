use regex::Regex;
use std::sync::OnceLock;

/// Normalizes `D/M/Y` dates to `DD/MM/Y`, padding day and month to two digits.
///
/// Anything that is not literally one or two digits, a slash, one or two digits, a
/// slash and one to four digits is returned trimmed but otherwise unchanged. This is
/// a cosmetic pass: no calendar validation is done.
pub fn normalize_date(raw: &str) -> String {
    static DATE_RE: OnceLock<Regex> = OnceLock::new();
    let re = DATE_RE.get_or_init(|| Regex::new(r"^([0-9]{1,2})/([0-9]{1,2})/([0-9]{1,4})$").unwrap());

    let trimmed = raw.trim();
    match re.captures(trimmed) {
        Some(caps) => format!("{:0>2}/{:0>2}/{}", &caps[1], &caps[2], &caps[3]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pads_day_and_month() {
        assert_eq!(normalize_date("1/2/2024"), "01/02/2024");
        assert_eq!(normalize_date(" 12/11/24 "), "12/11/24");
        assert_eq!(normalize_date("31/12/2024"), "31/12/2024");
    }

    #[test]
    fn test_non_matching_input_is_returned_trimmed() {
        assert_eq!(normalize_date("not-a-date"), "not-a-date");
        assert_eq!(normalize_date("  2024-01-02 "), "2024-01-02");
        assert_eq!(normalize_date("1/2/20245"), "1/2/20245");
        assert_eq!(normalize_date(""), "");
    }

    #[test]
    fn test_no_calendar_validation() {
        assert_eq!(normalize_date("99/99/0"), "99/99/0");
    }
}
