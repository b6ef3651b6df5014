//! Pagination bounds for repository scans

/// Skip/limit bounds for a scan
///
/// Both bounds are optional: `None` means "no limit" and "no skip"
/// respectively. A limit of `0` is treated as unbounded by stores.
///
/// # Example
///
/// ```rust
/// use characters_service::repository::Pagination;
///
/// let page = Pagination::new(Some(10), Some(20)); // take 10, skip 20
/// assert_eq!(page.limit, Some(10));
/// assert!(Pagination::unbounded().is_unbounded());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pagination {
    /// Maximum number of results to return
    pub limit: Option<u64>,
    /// Number of results to skip
    pub offset: Option<u64>,
}

impl Pagination {
    /// Create pagination bounds
    #[must_use]
    pub const fn new(limit: Option<u64>, offset: Option<u64>) -> Self {
        Self { limit, offset }
    }

    /// No limit and no skip
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            limit: None,
            offset: None,
        }
    }

    /// Limit that should actually be applied, with `0` treated as unbounded
    #[must_use]
    pub fn effective_limit(&self) -> Option<u64> {
        self.limit.filter(|limit| *limit > 0)
    }

    /// Offset that should actually be applied, with `0` treated as no skip
    #[must_use]
    pub fn effective_offset(&self) -> Option<u64> {
        self.offset.filter(|offset| *offset > 0)
    }

    /// True when neither bound restricts the scan
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.effective_limit().is_none() && self.effective_offset().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unbounded() {
        assert_eq!(Pagination::default(), Pagination::unbounded());
        assert!(Pagination::default().is_unbounded());
    }

    #[test]
    fn test_zero_limit_is_unbounded() {
        let page = Pagination::new(Some(0), Some(0));
        assert_eq!(page.effective_limit(), None);
        assert_eq!(page.effective_offset(), None);
        assert!(page.is_unbounded());
    }

    #[test]
    fn test_bounds_are_kept() {
        let page = Pagination::new(Some(10), Some(5));
        assert_eq!(page.effective_limit(), Some(10));
        assert_eq!(page.effective_offset(), Some(5));
        assert!(!page.is_unbounded());
    }
}
