//! Fixed-size pages over the ordered report list.

use crate::model::{Report, ReportId, SearchResult};

/// Reports per page unless configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page window over one result's reports.
#[derive(Clone, Debug, PartialEq)]
pub struct Pagination {
	ids: Vec<ReportId>,
	page_size: usize,
	current: usize,
}

impl Pagination {
	/// A zero page size is treated as one report per page.
	pub fn new(result: &SearchResult, page_size: usize) -> Self {
		Self {
			ids: result.reports.iter().map(|r| r.id).collect(),
			page_size: page_size.max(1),
			current: 0,
		}
	}

	/// Reports per page.
	pub fn page_size(&self) -> usize {
		self.page_size
	}

	/// Zero-based active page.
	pub fn current_page(&self) -> usize {
		self.current
	}

	/// Number of pages; an empty list still has one (empty) page.
	pub fn page_count(&self) -> usize {
		self.ids.len().div_ceil(self.page_size).max(1)
	}

	/// Whether the report is in the list.
	pub fn contains(&self, id: ReportId) -> bool {
		self.ids.contains(&id)
	}

	/// Page holding `id`. Unknown ids land on page 0.
	pub fn page_containing(&self, id: ReportId) -> usize {
		self.ids
			.iter()
			.position(|&r| r == id)
			.map_or(0, |index| index / self.page_size)
	}

	/// Reports on `page`, in list order. Pages past the end are empty.
	pub fn view<'a>(&self, result: &'a SearchResult, page: usize) -> &'a [Report] {
		let start = page.saturating_mul(self.page_size).min(result.reports.len());
		let end = start.saturating_add(self.page_size).min(result.reports.len());
		&result.reports[start..end]
	}

	/// Reports on the active page.
	pub fn current_view<'a>(&self, result: &'a SearchResult) -> &'a [Report] {
		self.view(result, self.current)
	}

	/// Switch pages, clamping to the last page. Returns whether the page changed.
	pub fn set_page(&mut self, page: usize) -> bool {
		let page = page.min(self.page_count() - 1);
		let changed = page != self.current;
		self.current = page;
		changed
	}

	/// Advance one page. Returns whether the page changed.
	pub fn next(&mut self) -> bool {
		self.set_page(self.current + 1)
	}

	/// Go back one page. Returns whether the page changed.
	pub fn previous(&mut self) -> bool {
		self.set_page(self.current.saturating_sub(1))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;

	fn result(n: u64) -> SearchResult {
		let date = NaiveDate::from_ymd_opt(2019, 9, 9)
			.unwrap()
			.and_hms_opt(0, 0, 0)
			.unwrap();
		SearchResult {
			reports: (0..n)
				.map(|i| Report {
					id: 1000 + i,
					title: format!("r{i}"),
					date,
					authors: vec![],
					body: String::new(),
					referenced: vec![],
				})
				.collect(),
			..Default::default()
		}
	}

	#[test]
	fn page_of_every_index() {
		let r = result(25);
		for size in [1, 3, 10, 25, 40] {
			let p = Pagination::new(&r, size);
			for (i, report) in r.reports.iter().enumerate() {
				assert_eq!(p.page_containing(report.id), i / size);
			}
			for page in 0..p.page_count() + 1 {
				assert!(p.view(&r, page).len() <= size);
			}
		}
	}

	#[test]
	fn views_partition_the_list() {
		let r = result(25);
		let p = Pagination::new(&r, 10);
		assert_eq!(p.page_count(), 3);
		assert_eq!(p.view(&r, 0).len(), 10);
		assert_eq!(p.view(&r, 2).len(), 5);
		assert_eq!(p.view(&r, 2)[0].id, 1020);
		assert!(p.view(&r, 3).is_empty());
		assert!(p.view(&r, usize::MAX).is_empty());
	}

	#[test]
	fn unknown_id_is_page_zero() {
		let p = Pagination::new(&result(25), 10);
		assert_eq!(p.page_containing(42), 0);
	}

	#[test]
	fn navigation_clamps() {
		let r = result(25);
		let mut p = Pagination::new(&r, 10);
		assert!(!p.previous());
		assert!(p.next());
		assert!(p.next());
		assert!(!p.next());
		assert_eq!(p.current_page(), 2);
		assert!(p.set_page(0));
		assert!(p.set_page(99));
		assert_eq!(p.current_page(), 2);
		assert_eq!(p.current_view(&r).len(), 5);
	}

	#[test]
	fn empty_list() {
		let r = result(0);
		let mut p = Pagination::new(&r, 10);
		assert_eq!(p.page_count(), 1);
		assert!(p.current_view(&r).is_empty());
		assert!(!p.set_page(4));
	}

	#[test]
	fn zero_page_size_is_clamped() {
		let p = Pagination::new(&result(3), 0);
		assert_eq!(p.page_size(), 1);
		assert_eq!(p.page_count(), 3);
	}
}
