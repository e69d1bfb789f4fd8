use regex::Regex;
use std::sync::LazyLock;
use weekly_film_models::ReleaseDate;

/// Year assumed for feed dates that only carry month and day.
pub const ASSUMED_YEAR: u32 = 2025;

const FALLBACK_FULL: &str = "2025年01月01日";
const FALLBACK_SHORT: &str = "01月01日";

static RE_MONTH_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})月(\d{1,2})日").unwrap()
});

pub fn fallback_release_date() -> ReleaseDate {
    ReleaseDate::new(FALLBACK_FULL, FALLBACK_SHORT)
}

/// Normalize a feed release date such as `"10月18日  本周六"`.
///
/// Only the first whitespace-separated token is considered. A token that
/// already names a year is returned as-is for both forms; otherwise a
/// `M月D日` pattern is zero-padded and placed in [`ASSUMED_YEAR`]. Anything
/// else gets the fixed fallback date.
pub fn parse_release_date(raw: &str) -> ReleaseDate {
    let Some(date_part) = raw.split_whitespace().next() else {
        return fallback_release_date();
    };

    if date_part.contains('年') {
        return ReleaseDate::new(date_part, date_part);
    }

    match RE_MONTH_DAY.captures(date_part) {
        Some(caps) => {
            let month = format!("{:0>2}", &caps[1]);
            let day = format!("{:0>2}", &caps[2]);
            ReleaseDate::new(
                format!("{}年{}月{}日", ASSUMED_YEAR, month, day),
                format!("{}月{}日", month, day),
            )
        }
        None => fallback_release_date(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(raw: &str) -> (String, String) {
        let date = parse_release_date(raw);
        (date.full, date.short)
    }

    fn pair(full: &str, short: &str) -> (String, String) {
        (full.to_string(), short.to_string())
    }

    #[test]
    fn test_empty_is_fallback() {
        assert_eq!(parsed(""), pair("2025年01月01日", "01月01日"));
    }

    #[test]
    fn test_whitespace_only_is_fallback() {
        assert_eq!(parsed("   \t"), pair("2025年01月01日", "01月01日"));
    }

    #[test]
    fn test_relative_day_suffix_is_dropped() {
        assert_eq!(parsed("10月18日  本周六"), pair("2025年10月18日", "10月18日"));
        assert_eq!(parsed("10月17日  后天"), pair("2025年10月17日", "10月17日"));
        assert_eq!(parsed("10月24日"), pair("2025年10月24日", "10月24日"));
    }

    #[test]
    fn test_single_digits_are_padded() {
        assert_eq!(parsed("1月5日 周日"), pair("2025年01月05日", "01月05日"));
    }

    #[test]
    fn test_year_is_passed_through() {
        assert_eq!(parsed("2024年12月25日"), pair("2024年12月25日", "2024年12月25日"));
        assert_eq!(parsed("2026年3月 待定"), pair("2026年3月", "2026年3月"));
    }

    #[test]
    fn test_unmatched_text_is_fallback() {
        assert_eq!(parsed("随时待定"), pair("2025年01月01日", "01月01日"));
        assert_eq!(parsed("12月"), pair("2025年01月01日", "01月01日"));
    }

    #[test]
    fn test_pattern_found_inside_token() {
        assert_eq!(parsed("定档10月1日上映"), pair("2025年10月01日", "10月01日"));
    }

    #[test]
    fn test_only_first_token_is_considered() {
        assert_eq!(parsed("待定 10月18日"), pair("2025年01月01日", "01月01日"));
    }
}
