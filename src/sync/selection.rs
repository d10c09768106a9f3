//! Cross-view selection state machine.
//!
//! The coordinator owns the single selected report id and turns selection
//! events into [`ViewCommand`]s for the views to apply. It never touches a
//! view directly. Scrolling a list card into view has to wait until the card's
//! page has rendered, so it is issued as a deferred continuation identified by
//! a [`ScrollTicket`]; a newer selection, a manual page change or a new
//! result makes older tickets stale.

use std::collections::VecDeque;

use super::pagination::Pagination;
use crate::model::{Graph, ReportId};

/// The single selected report, shared by all views.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
	#[default]
	Idle,
	Selected(ReportId),
}

impl Selection {
	/// Selected report, if any.
	pub fn id(self) -> Option<ReportId> {
		match self {
			Selection::Idle => None,
			Selection::Selected(id) => Some(id),
		}
	}
}

/// Which view a selection came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
	Graph,
	Timeline,
	/// A referenced-report link on a list card.
	Reference,
}

/// Handle for one deferred scroll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScrollTicket {
	epoch: u64,
	seq: u64,
}

/// Instructions for the views, in the order they must be applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewCommand {
	/// Show this page of the list.
	SetPage(usize),
	/// After the current page has rendered, call
	/// [`SelectionCoordinator::fire_deferred`] with the ticket and scroll the
	/// returned card into view.
	ScheduleScroll { id: ReportId, ticket: ScrollTicket },
	/// Bring the top of the list into view after a manual page change.
	ScrollToListTop,
	/// Highlight this report in the graph and timeline.
	Focus(ReportId),
	/// The selected report is not in the graph.
	ClearFocus,
}

/// A scroll that was allowed to happen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollAttempt {
	/// Report scrolled to.
	pub id: ReportId,
	/// Active page when the scroll fired.
	pub page: usize,
}

/// Owns the selection and the deferred scroll, and queues view commands.
#[derive(Debug, Default)]
pub struct SelectionCoordinator {
	state: Selection,
	epoch: u64,
	seq: u64,
	pending: Option<(ScrollTicket, ReportId)>,
	outbox: VecDeque<ViewCommand>,
	scrolls: Vec<ScrollAttempt>,
}

impl SelectionCoordinator {
	/// Idle coordinator.
	pub fn new() -> Self {
		Self::default()
	}

	/// Current selection.
	pub fn selection(&self) -> Selection {
		self.state
	}

	/// Scrolls fired since the last reset, oldest first.
	pub fn scroll_log(&self) -> &[ScrollAttempt] {
		&self.scrolls
	}

	/// Whether a deferred scroll is still waiting to fire.
	pub fn has_pending_scroll(&self) -> bool {
		self.pending.is_some()
	}

	/// Forget everything tied to the previous result.
	pub fn reset(&mut self) {
		self.state = Selection::Idle;
		self.epoch += 1;
		self.pending = None;
		self.outbox.clear();
		self.scrolls.clear();
	}

	/// Select `id` and queue the commands that bring it into view.
	///
	/// Re-selecting the current report is not deduplicated: it scrolls again.
	/// The page switch is queued, and applied to `pagination`, before the
	/// deferred scroll so the card exists by the time the scroll fires.
	pub fn select(&mut self, id: ReportId, origin: Origin, pagination: &mut Pagination, graph: &Graph) {
		log::debug!("selection: {id} from {origin:?}");
		self.state = Selection::Selected(id);
		self.pending = None;

		let page = pagination.page_containing(id);
		if pagination.set_page(page) {
			self.outbox.push_back(ViewCommand::SetPage(page));
		}

		if pagination.contains(id) {
			self.seq += 1;
			let ticket = ScrollTicket {
				epoch: self.epoch,
				seq: self.seq,
			};
			self.pending = Some((ticket, id));
			self.outbox.push_back(ViewCommand::ScheduleScroll { id, ticket });
		} else {
			log::debug!("selection: {id} is not in the current result, not scrolling");
		}

		self.outbox.push_back(if graph.contains(id) {
			ViewCommand::Focus(id)
		} else {
			ViewCommand::ClearFocus
		});
	}

	/// Manual page navigation. Cancels any pending scroll so it cannot yank
	/// the list back to an older selection.
	pub fn change_page(&mut self, page: usize, pagination: &mut Pagination) {
		self.pending = None;
		if pagination.set_page(page) {
			let page = pagination.current_page();
			log::debug!("selection: page changed to {page}");
			self.outbox.push_back(ViewCommand::SetPage(page));
			self.outbox.push_back(ViewCommand::ScrollToListTop);
		}
	}

	/// Resolve a deferred scroll. Returns the card to scroll to, or `None` if
	/// the ticket was superseded or its page is not the active one.
	pub fn fire_deferred(&mut self, ticket: ScrollTicket, pagination: &Pagination) -> Option<ReportId> {
		let Some((pending, id)) = self.pending else {
			log::debug!("selection: dropping stale scroll {ticket:?}");
			return None;
		};
		if pending != ticket {
			log::debug!("selection: dropping stale scroll {ticket:?}");
			return None;
		}
		self.pending = None;

		let page = pagination.current_page();
		if pagination.page_containing(id) != page {
			log::warn!("selection: page {page} does not hold {id}, skipping scroll");
			return None;
		}
		self.scrolls.push(ScrollAttempt { id, page });
		Some(id)
	}

	/// Take queued commands in application order.
	pub fn drain_commands(&mut self) -> Vec<ViewCommand> {
		self.outbox.drain(..).collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::graph::build;
	use crate::model::{Report, SearchResult};
	use chrono::NaiveDate;

	fn fixture(n: u64, node_ids: &[ReportId]) -> (SearchResult, Graph, Pagination) {
		let date = NaiveDate::from_ymd_opt(2023, 2, 2)
			.unwrap()
			.and_hms_opt(0, 0, 0)
			.unwrap();
		let result = SearchResult {
			reports: (1..=n)
				.map(|id| Report {
					id,
					title: format!("report {id}"),
					date,
					authors: vec![],
					body: String::new(),
					referenced: vec![],
				})
				.collect(),
			node_ids: node_ids.to_vec(),
			edges: vec![],
		};
		let graph = build(&result.reports, &result.node_ids, &result.edges);
		let pagination = Pagination::new(&result, 10);
		(result, graph, pagination)
	}

	#[test]
	fn page_switch_precedes_scroll() {
		let (_, graph, mut pagination) = fixture(25, &[18]);
		let mut c = SelectionCoordinator::new();
		c.select(18, Origin::Graph, &mut pagination, &graph);

		assert_eq!(c.selection(), Selection::Selected(18));
		assert_eq!(pagination.current_page(), 1);
		let commands = c.drain_commands();
		assert_eq!(commands[0], ViewCommand::SetPage(1));
		let ViewCommand::ScheduleScroll { id, ticket } = commands[1] else {
			panic!("expected a scroll, got {commands:?}");
		};
		assert_eq!(id, 18);
		assert_eq!(commands[2], ViewCommand::Focus(18));

		assert_eq!(c.fire_deferred(ticket, &pagination), Some(18));
		assert_eq!(c.scroll_log(), &[ScrollAttempt { id: 18, page: 1 }]);
		// A ticket fires once.
		assert_eq!(c.fire_deferred(ticket, &pagination), None);
	}

	#[test]
	fn same_page_selection_only_scrolls() {
		let (_, graph, mut pagination) = fixture(25, &[]);
		let mut c = SelectionCoordinator::new();
		c.select(3, Origin::Timeline, &mut pagination, &graph);
		let commands = c.drain_commands();
		assert!(matches!(commands[0], ViewCommand::ScheduleScroll { id: 3, .. }));
		assert_eq!(commands[1], ViewCommand::ClearFocus);
	}

	#[test]
	fn reselecting_scrolls_again() {
		let (_, graph, mut pagination) = fixture(25, &[]);
		let mut c = SelectionCoordinator::new();
		for _ in 0..2 {
			c.select(5, Origin::Timeline, &mut pagination, &graph);
			let ticket = c
				.drain_commands()
				.into_iter()
				.find_map(|cmd| match cmd {
					ViewCommand::ScheduleScroll { ticket, .. } => Some(ticket),
					_ => None,
				})
				.unwrap();
			assert_eq!(c.fire_deferred(ticket, &pagination), Some(5));
		}
		assert_eq!(c.scroll_log().len(), 2);
	}

	#[test]
	fn newer_selection_supersedes_pending_scroll() {
		let (_, graph, mut pagination) = fixture(25, &[]);
		let mut c = SelectionCoordinator::new();
		c.select(2, Origin::Graph, &mut pagination, &graph);
		let first = c.drain_commands();
		c.select(22, Origin::Graph, &mut pagination, &graph);
		let second = c.drain_commands();

		let ticket_of = |cmds: &[ViewCommand]| {
			cmds.iter()
				.find_map(|cmd| match cmd {
					ViewCommand::ScheduleScroll { ticket, .. } => Some(*ticket),
					_ => None,
				})
				.unwrap()
		};
		assert_eq!(c.fire_deferred(ticket_of(&first), &pagination), None);
		assert_eq!(c.fire_deferred(ticket_of(&second), &pagination), Some(22));
	}

	#[test]
	fn missing_id_goes_to_first_page_without_scrolling() {
		let (_, graph, mut pagination) = fixture(25, &[]);
		pagination.set_page(2);
		let mut c = SelectionCoordinator::new();
		c.select(999, Origin::Reference, &mut pagination, &graph);
		assert_eq!(pagination.current_page(), 0);
		assert_eq!(
			c.drain_commands(),
			vec![ViewCommand::SetPage(0), ViewCommand::ClearFocus]
		);
		assert!(!c.has_pending_scroll());
	}

	#[test]
	fn manual_page_change_cancels_scroll() {
		let (_, graph, mut pagination) = fixture(25, &[]);
		let mut c = SelectionCoordinator::new();
		c.select(15, Origin::Graph, &mut pagination, &graph);
		let ticket = c
			.drain_commands()
			.into_iter()
			.find_map(|cmd| match cmd {
				ViewCommand::ScheduleScroll { ticket, .. } => Some(ticket),
				_ => None,
			})
			.unwrap();

		c.change_page(2, &mut pagination);
		assert_eq!(
			c.drain_commands(),
			vec![ViewCommand::SetPage(2), ViewCommand::ScrollToListTop]
		);
		assert_eq!(c.fire_deferred(ticket, &pagination), None);
		assert_eq!(c.selection(), Selection::Selected(15));
	}

	#[test]
	fn reset_returns_to_idle() {
		let (_, graph, mut pagination) = fixture(5, &[1]);
		let mut c = SelectionCoordinator::new();
		c.select(1, Origin::Graph, &mut pagination, &graph);
		c.reset();
		assert_eq!(c.selection(), Selection::Idle);
		assert!(c.drain_commands().is_empty());
		assert!(!c.has_pending_scroll());
	}
}
