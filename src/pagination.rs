//! Pagination engine: which slice of the (filtered) user set is visible.
//!
//! Everything here is a pure function of its inputs. The UI calls
//! [`visible_page`] again whenever the set, the search term or the page
//! changes; nothing is cached between calls.

use std::fmt;

use crate::error::PageError;
use crate::model::User;
use crate::search::filter_by_name;

/// Number of cards per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// A validated, strictly positive page size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageSize(usize);

impl PageSize {
    /// Fail fast on zero or negative sizes.
    pub fn new(size: i64) -> Result<Self, PageError> {
        if size <= 0 {
            return Err(PageError::InvalidConfiguration(size));
        }
        usize::try_from(size)
            .map(Self)
            .map_err(|_| PageError::InvalidConfiguration(size))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(DEFAULT_PAGE_SIZE)
    }
}

impl TryFrom<usize> for PageSize {
    type Error = PageError;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        if size == 0 {
            Err(PageError::InvalidConfiguration(0))
        } else {
            Ok(Self(size))
        }
    }
}

/// The visible slice plus what the pager needs to render.
#[derive(Clone, Debug)]
pub struct Page<'a> {
    pub items: Vec<&'a User>,
    /// 1-based page these items belong to.
    pub page: usize,
    /// Always at least 1.
    pub total_pages: usize,
    /// Size of the filtered set.
    pub filtered_len: usize,
}

impl Page<'_> {
    /// True when the search matched nothing at all.
    pub fn no_results(&self) -> bool {
        self.filtered_len == 0
    }

    /// Page count as shown to the user: 0 when nothing matched.
    pub fn display_total_pages(&self) -> usize {
        if self.no_results() { 0 } else { self.total_pages }
    }
}

/// `max(1, ceil(len / page_size))`.
pub fn total_pages(len: usize, page_size: PageSize) -> usize {
    len.div_ceil(page_size.get()).max(1)
}

/// Filter `all` by `term`, then cut out page `page` (1-based).
///
/// Pages past the end give an empty item list; page 0 is read as page 1.
/// Only the page size can make this fail.
pub fn visible_page<'a>(
    all: &'a [User],
    term: &str,
    page: usize,
    page_size: usize,
) -> Result<Page<'a>, PageError> {
    let size = PageSize::try_from(page_size)?;
    Ok(paginate(filter_by_name(all, term), page, size))
}

/// Slice an already filtered sequence.
pub fn paginate(filtered: Vec<&User>, page: usize, page_size: PageSize) -> Page<'_> {
    let page = page.max(1);
    let filtered_len = filtered.len();
    let size = page_size.get();
    let start = (page - 1).saturating_mul(size).min(filtered_len);
    let end = start.saturating_add(size).min(filtered_len);
    let items = filtered[start..end].to_vec();
    Page {
        items,
        page,
        total_pages: total_pages(filtered_len, page_size),
        filtered_len,
    }
}

/// One entry of the compact pager.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageMarker {
    Page(usize),
    Ellipsis,
}

impl fmt::Display for PageMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageMarker::Page(n) => write!(f, "{n}"),
            PageMarker::Ellipsis => f.write_str("..."),
        }
    }
}

/// Page numbers for a compact pager: first, last, and the neighbours of
/// `current`, with an ellipsis wherever numbers are skipped.
///
/// `(5, 10)` gives `1 ... 4 5 6 ... 10`. `total == 0` gives nothing and
/// `total == 1` gives just `[1]`; callers hide the pager in both cases.
pub fn page_numbers_with_ellipsis(current: usize, total: usize) -> Vec<PageMarker> {
    if total == 0 {
        return Vec::new();
    }

    let mut pages = vec![1usize];
    let lo = current.saturating_sub(1).max(2);
    let hi = current.saturating_add(1).min(total - 1);
    for n in lo..=hi {
        if !pages.contains(&n) {
            pages.push(n);
        }
    }
    if total > 1 && !pages.contains(&total) {
        pages.push(total);
    }

    let mut out = Vec::with_capacity(pages.len() + 2);
    let mut prev = 0usize;
    for n in pages {
        if n - prev > 1 {
            out.push(PageMarker::Ellipsis);
        }
        out.push(PageMarker::Page(n));
        prev = n;
    }
    out
}

/// The pager is only shown when there is somewhere to go.
pub fn pager_visible(total: usize) -> bool {
    total > 1
}

pub fn has_previous(current: usize) -> bool {
    current > 1
}

pub fn has_next(current: usize, total: usize) -> bool {
    current < total
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::PageMarker::{Ellipsis, Page as P};

    fn users(n: u64) -> Vec<User> {
        (1..=n)
            .map(|id| User { id, name: format!("User {id}"), ..User::default() })
            .collect()
    }

    fn ids(page: &Page<'_>) -> Vec<u64> {
        page.items.iter().map(|u| u.id).collect()
    }

    #[test]
    fn middle_page_has_ellipses_on_both_sides() {
        assert_eq!(
            page_numbers_with_ellipsis(5, 10),
            vec![P(1), Ellipsis, P(4), P(5), P(6), Ellipsis, P(10)]
        );
    }

    #[test]
    fn single_page_is_just_one() {
        assert_eq!(page_numbers_with_ellipsis(1, 1), vec![P(1)]);
        assert!(!pager_visible(1));
        assert!(!has_previous(1));
        assert!(!has_next(1, 1));
    }

    #[test]
    fn zero_pages_is_empty() {
        assert!(page_numbers_with_ellipsis(1, 0).is_empty());
        assert!(!pager_visible(0));
    }

    #[test]
    fn small_totals_never_need_an_ellipsis() {
        assert_eq!(page_numbers_with_ellipsis(1, 2), vec![P(1), P(2)]);
        assert_eq!(page_numbers_with_ellipsis(2, 3), vec![P(1), P(2), P(3)]);
        assert_eq!(page_numbers_with_ellipsis(3, 4), vec![P(1), P(2), P(3), P(4)]);
    }

    #[test]
    fn edges_show_one_ellipsis() {
        assert_eq!(page_numbers_with_ellipsis(1, 10), vec![P(1), P(2), Ellipsis, P(10)]);
        assert_eq!(page_numbers_with_ellipsis(10, 10), vec![P(1), Ellipsis, P(9), P(10)]);
        assert_eq!(page_numbers_with_ellipsis(3, 10), vec![P(1), P(2), P(3), P(4), Ellipsis, P(10)]);
    }

    #[test]
    fn markers_render_as_text() {
        let s: Vec<String> = page_numbers_with_ellipsis(5, 10).iter().map(ToString::to_string).collect();
        assert_eq!(s.join(" "), "1 ... 4 5 6 ... 10");
    }

    #[test]
    fn slices_pages_in_order() {
        let all = users(12);
        let p1 = visible_page(&all, "", 1, 5).unwrap();
        assert_eq!(ids(&p1), vec![1, 2, 3, 4, 5]);
        assert_eq!(p1.total_pages, 3);
        let p3 = visible_page(&all, "", 3, 5).unwrap();
        assert_eq!(ids(&p3), vec![11, 12]);
    }

    #[test]
    fn out_of_range_page_is_empty_not_an_error() {
        let all = users(4);
        let p = visible_page(&all, "", 9, 5).unwrap();
        assert!(p.items.is_empty());
        assert_eq!(p.total_pages, 1);
        let p = visible_page(&all, "", usize::MAX, 5).unwrap();
        assert!(p.items.is_empty());
    }

    #[test]
    fn page_zero_reads_as_first_page() {
        let all = users(3);
        let p = visible_page(&all, "", 0, 2).unwrap();
        assert_eq!(p.page, 1);
        assert_eq!(ids(&p), vec![1, 2]);
    }

    #[test]
    fn no_results_report_zero_pages() {
        let all = users(3);
        let p = visible_page(&all, "nobody", 1, 5).unwrap();
        assert!(p.no_results());
        assert_eq!(p.total_pages, 1);
        assert_eq!(p.display_total_pages(), 0);
    }

    #[test]
    fn search_applies_before_slicing() {
        let mut all = users(6);
        all[4].name = "Bob Smith".into();
        let p = visible_page(&all, "bob", 1, 2).unwrap();
        assert_eq!(ids(&p), vec![5]);
        assert_eq!(p.filtered_len, 1);
    }

    #[test]
    fn zero_page_size_is_invalid_configuration() {
        let all = users(3);
        assert_eq!(
            visible_page(&all, "", 1, 0).unwrap_err(),
            PageError::InvalidConfiguration(0)
        );
        assert!(PageSize::new(-3).is_err());
        assert_eq!(PageSize::new(7).unwrap().get(), 7);
    }
}
