//! Chronological projection of a result for the timeline view.

use std::collections::HashSet;

use chrono::NaiveDateTime;

use super::color::color_of;
use super::report::{Report, ReportId};

/// One report placed on the timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineEntry {
	/// Report id.
	pub id: ReportId,
	/// Report title.
	pub title: String,
	/// Authors joined for display.
	pub authors: String,
	/// Submission date.
	pub date: NaiveDateTime,
	/// Title color, as in the graph.
	pub color: String,
	/// Horizontal position across the result's date span, in `[0, 1]`.
	pub offset: f64,
}

impl TimelineEntry {
	/// Title, authors and date on separate lines.
	pub fn tooltip(&self) -> String {
		format!("{}\n{}\n{}", self.title, self.authors, self.date.format("%Y-%m-%d"))
	}
}

/// Entries sorted by date; reports sharing a date keep list order. A
/// repeated report id keeps only its first occurrence.
pub fn entries(reports: &[Report]) -> Vec<TimelineEntry> {
	let mut seen = HashSet::with_capacity(reports.len());
	let mut sorted: Vec<&Report> = reports.iter().filter(|r| seen.insert(r.id)).collect();
	sorted.sort_by_key(|r| r.date);

	let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
		return Vec::new();
	};
	let start = first.date;
	let span = (last.date - start).num_seconds() as f64;

	sorted
		.iter()
		.map(|report| {
			let offset = if span > 0.0 {
				(report.date - start).num_seconds() as f64 / span
			} else {
				0.5
			};
			TimelineEntry {
				id: report.id,
				title: report.title.clone(),
				authors: report.author_line(),
				date: report.date,
				color: color_of(&report.title),
				offset,
			}
		})
		.collect()
}
