//! One search result and the view state derived from it.

use std::sync::Arc;

use super::pagination::Pagination;
use super::selection::{Origin, ScrollTicket, Selection, SelectionCoordinator, ViewCommand};
use crate::model::graph::build;
use crate::model::timeline::{self, TimelineEntry};
use crate::model::{Graph, Report, ReportId, SearchResult};

/// Owns the active result, its graph and pagination, and the long-lived
/// selection coordinator.
///
/// Loading a result replaces everything derived from the previous one and
/// bumps [`Explorer::generation`], which views use to tear down their own
/// per-result state (the graph layout in particular).
#[derive(Debug)]
pub struct Explorer {
	result: Arc<SearchResult>,
	graph: Arc<Graph>,
	pagination: Pagination,
	coordinator: SelectionCoordinator,
	page_size: usize,
	generation: u64,
}

impl Explorer {
	/// Explorer over an empty result.
	pub fn new(page_size: usize) -> Self {
		let result = SearchResult::default();
		Self {
			pagination: Pagination::new(&result, page_size),
			result: Arc::new(result),
			graph: Arc::new(Graph::default()),
			coordinator: SelectionCoordinator::new(),
			page_size,
			generation: 0,
		}
	}

	/// Replace the active result. Clears the selection and cancels any
	/// pending scroll.
	pub fn load(&mut self, mut result: SearchResult) {
		let duplicates = result.dedup_reports();
		if duplicates > 0 {
			log::warn!("explorer: dropped {duplicates} reports with repeated ids");
		}
		let graph = build(&result.reports, &result.node_ids, &result.edges);
		log::info!(
			"explorer: loaded {} reports, graph of {} nodes and {} edges",
			result.reports.len(),
			graph.nodes.len(),
			graph.edges.len()
		);
		self.pagination = Pagination::new(&result, self.page_size);
		self.result = Arc::new(result);
		self.graph = Arc::new(graph);
		self.coordinator.reset();
		self.generation += 1;
	}

	/// Number of results loaded so far.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Active result.
	pub fn result(&self) -> &Arc<SearchResult> {
		&self.result
	}

	/// Graph built from the active result.
	pub fn graph(&self) -> &Arc<Graph> {
		&self.graph
	}

	/// List pagination.
	pub fn pagination(&self) -> &Pagination {
		&self.pagination
	}

	/// Current selection.
	pub fn selection(&self) -> Selection {
		self.coordinator.selection()
	}

	/// Selection coordinator, for inspecting scroll history.
	pub fn coordinator(&self) -> &SelectionCoordinator {
		&self.coordinator
	}

	/// Reports on the active page.
	pub fn current_view(&self) -> &[Report] {
		self.pagination.current_view(&self.result)
	}

	/// Timeline entries for the active result.
	pub fn timeline(&self) -> Vec<TimelineEntry> {
		timeline::entries(&self.result.reports)
	}

	/// Select a report from any view.
	pub fn select(&mut self, id: ReportId, origin: Origin) {
		self.coordinator
			.select(id, origin, &mut self.pagination, &self.graph);
	}

	/// Manual page navigation; cancels a pending scroll.
	pub fn set_page(&mut self, page: usize) {
		self.coordinator.change_page(page, &mut self.pagination);
	}

	/// Next page, if any.
	pub fn next_page(&mut self) {
		self.set_page(self.pagination.current_page() + 1);
	}

	/// Previous page, if any.
	pub fn previous_page(&mut self) {
		self.set_page(self.pagination.current_page().saturating_sub(1));
	}

	/// Resolve a deferred scroll; see [`SelectionCoordinator::fire_deferred`].
	pub fn fire_deferred(&mut self, ticket: ScrollTicket) -> Option<ReportId> {
		self.coordinator.fire_deferred(ticket, &self.pagination)
	}

	/// Queued view commands, oldest first.
	pub fn drain_commands(&mut self) -> Vec<ViewCommand> {
		self.coordinator.drain_commands()
	}
}

impl Default for Explorer {
	fn default() -> Self {
		Self::new(super::pagination::DEFAULT_PAGE_SIZE)
	}
}
