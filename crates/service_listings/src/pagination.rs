use serde::Deserialize;

use crate::types::PageInfo;

/// Raw query parameters accepted when browsing listings
#[derive(Debug, Default, Deserialize)]
pub struct ListServicesQuery {
    /// Requested page (1-based)
    pub page: Option<String>,
    /// Requested page size
    pub limit: Option<String>,
}

/// Normalized pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub limit: u32,
}

impl Pagination {
    /// Page size used when none (or zero) is requested
    pub const DEFAULT_LIMIT: u32 = 20;
    /// Largest page size served
    pub const MAX_LIMIT: u32 = 100;

    /// Builds pagination from raw query values.
    ///
    /// Values are read as leading integers (`"12abc"` is 12). Missing, unparsable, or
    /// zero values fall back to the defaults; the page is then floored at 1 and the
    /// limit clamped to `1..=100`.
    pub fn from_query(query: &ListServicesQuery) -> Self {
        let page = parse_leading_int(query.page.as_deref())
            .unwrap_or(1)
            .clamp(1, i64::from(u32::MAX));
        let limit = parse_leading_int(query.limit.as_deref())
            .unwrap_or(i64::from(Self::DEFAULT_LIMIT))
            .clamp(1, i64::from(Self::MAX_LIMIT));

        Self {
            page: u32::try_from(page).unwrap_or(u32::MAX),
            limit: u32::try_from(limit).unwrap_or(Self::MAX_LIMIT),
        }
    }

    /// Number of records to skip
    pub fn offset(self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// Computes page metadata for `total` matching records.
    pub fn page_info(self, total: u64) -> PageInfo {
        let total_pages = total.div_ceil(u64::from(self.limit));
        PageInfo {
            page: self.page,
            limit: self.limit,
            total,
            total_pages,
            has_next: u64::from(self.page) < total_pages,
            has_prev: self.page > 1,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// Parses an optional leading integer, treating zero as absent.
fn parse_leading_int(raw: Option<&str>) -> Option<i64> {
    let trimmed = raw?.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for c in digits.chars() {
        let Some(digit) = c.to_digit(10) else { break };
        seen_digit = true;
        value = value.saturating_mul(10).saturating_add(i64::from(digit));
    }

    match (seen_digit, value) {
        (false, _) | (true, 0) => None,
        (true, v) if negative => Some(-v),
        (true, v) => Some(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>, limit: Option<&str>) -> ListServicesQuery {
        ListServicesQuery {
            page: page.map(str::to_string),
            limit: limit.map(str::to_string),
        }
    }

    #[test]
    fn defaults_when_absent() {
        let p = Pagination::from_query(&query(None, None));
        assert_eq!(p, Pagination::default());
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 20);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn clamps_limit_upper_bound() {
        let p = Pagination::from_query(&query(Some("2"), Some("500")));
        assert_eq!(p.limit, 100);
        assert_eq!(p.offset(), 100);
    }

    #[test]
    fn floors_page_at_one() {
        assert_eq!(Pagination::from_query(&query(Some("0"), None)).page, 1);
        assert_eq!(Pagination::from_query(&query(Some("-4"), None)).page, 1);
    }

    #[test]
    fn zero_limit_means_default_but_negative_clamps_to_one() {
        assert_eq!(Pagination::from_query(&query(None, Some("0"))).limit, 20);
        assert_eq!(Pagination::from_query(&query(None, Some("-5"))).limit, 1);
    }

    #[test]
    fn parses_leading_integers() {
        let p = Pagination::from_query(&query(Some(" 3rd"), Some("15.9")));
        assert_eq!(p.page, 3);
        assert_eq!(p.limit, 15);

        let p = Pagination::from_query(&query(Some("abc"), Some("")));
        assert_eq!(p, Pagination::default());
    }

    #[test]
    fn page_info_on_first_page() {
        let info = Pagination::default().page_info(45);
        assert_eq!(info.total_pages, 3);
        assert!(info.has_next);
        assert!(!info.has_prev);

        let info = Pagination::default().page_info(20);
        assert_eq!(info.total_pages, 1);
        assert!(!info.has_next);
    }

    #[test]
    fn page_info_on_last_and_empty_pages() {
        let info = Pagination { page: 3, limit: 20 }.page_info(45);
        assert!(!info.has_next);
        assert!(info.has_prev);

        let info = Pagination::default().page_info(0);
        assert_eq!(info.total_pages, 0);
        assert!(!info.has_next);
        assert!(!info.has_prev);
    }
}
