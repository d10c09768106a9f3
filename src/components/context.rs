//! Reactive wrapper around [`Explorer`] shared by all views.
//!
//! Views report events here (`select`, page navigation); the resulting
//! [`ViewCommand`]s are applied to a handful of signals the views read. The
//! explorer itself lives in a [`StoredValue`] and is only touched through
//! this type.

use leptos::prelude::*;
use web_sys::{ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};

use super::force_graph::PinRequest;
use crate::config::ExplorerConfig;
use crate::model::{ReportId, SearchResult};
use crate::sync::{Explorer, Origin, ViewCommand};

/// DOM id of the element wrapping the report list.
pub const LIST_TOP_ID: &str = "report-list";

/// DOM id of the list card for a report.
pub fn card_dom_id(id: ReportId) -> String {
	format!("report-{id}")
}

/// Shared handle to the explorer and the signals views render from.
#[derive(Clone, Copy)]
pub struct ExplorerContext {
	explorer: StoredValue<Explorer>,
	config: StoredValue<ExplorerConfig>,
	/// Host pin requests, applied by the graph on its next frame.
	pins: StoredValue<Vec<PinRequest>>,
	/// Bumped whenever a new result replaces the old one.
	pub generation: RwSignal<u64>,
	/// Active list page.
	pub page: RwSignal<usize>,
	/// Currently selected report.
	pub selected: RwSignal<Option<ReportId>>,
	/// Report the graph and timeline should highlight.
	pub focus: RwSignal<Option<ReportId>>,
}

impl ExplorerContext {
	/// Empty explorer using `config`.
	pub fn new(config: ExplorerConfig) -> Self {
		Self {
			explorer: StoredValue::new(Explorer::new(config.page_size)),
			config: StoredValue::new(config),
			pins: StoredValue::new(Vec::new()),
			generation: RwSignal::new(0),
			page: RwSignal::new(0),
			selected: RwSignal::new(None),
			focus: RwSignal::new(None),
		}
	}

	/// Active configuration.
	pub fn config(&self) -> ExplorerConfig {
		self.config.get_value()
	}

	/// Read the explorer without subscribing to anything.
	pub fn with<R>(&self, f: impl FnOnce(&Explorer) -> R) -> R {
		self.explorer.with_value(f)
	}

	/// Swap in a new result. Pending scrolls from the old one become stale.
	pub fn load(&self, result: SearchResult) {
		let generation = self
			.explorer
			.try_update_value(|e| {
				e.load(result);
				e.generation()
			})
			.unwrap_or_default();
		self.pins.update_value(Vec::clear);
		self.selected.set(None);
		self.focus.set(None);
		self.page.set(0);
		self.generation.set(generation);
	}

	/// Hold a report's graph node at `(x, y)` in graph coordinates.
	pub fn pin(&self, id: ReportId, x: f64, y: f64) {
		self.pins.update_value(|pins| pins.push(PinRequest::Pin { id, x, y }));
	}

	/// Release a host pin.
	pub fn unpin(&self, id: ReportId) {
		self.pins.update_value(|pins| pins.push(PinRequest::Unpin(id)));
	}

	/// Pin requests queued since the last call, oldest first.
	pub fn take_pin_requests(&self) -> Vec<PinRequest> {
		self.pins
			.try_update_value(std::mem::take)
			.unwrap_or_default()
	}

	/// Select a report and bring it into view everywhere.
	pub fn select(&self, id: ReportId, origin: Origin) {
		self.explorer.update_value(|e| e.select(id, origin));
		self.flush();
	}

	/// Manual page navigation.
	pub fn set_page(&self, page: usize) {
		self.explorer.update_value(|e| e.set_page(page));
		self.flush();
	}

	/// Next list page, if any.
	pub fn next_page(&self) {
		self.explorer.update_value(Explorer::next_page);
		self.flush();
	}

	/// Previous list page, if any.
	pub fn previous_page(&self) {
		self.explorer.update_value(Explorer::previous_page);
		self.flush();
	}

	/// Apply queued commands in order.
	fn flush(&self) {
		let Some((commands, selection)) = self
			.explorer
			.try_update_value(|e| (e.drain_commands(), e.selection()))
		else {
			return;
		};
		self.selected.set(selection.id());

		for command in commands {
			match command {
				ViewCommand::SetPage(page) => self.page.set(page),
				ViewCommand::ScheduleScroll { ticket, .. } => {
					// Signal writes re-render on a microtask; the next frame
					// sees the new page's cards.
					let explorer = self.explorer;
					request_animation_frame(move || {
						let target = explorer
							.try_update_value(|e| e.fire_deferred(ticket))
							.flatten();
						if let Some(id) = target {
							scroll_into_view(&card_dom_id(id));
						}
					});
				}
				ViewCommand::ScrollToListTop => {
					request_animation_frame(|| scroll_into_view(LIST_TOP_ID));
				}
				ViewCommand::Focus(id) => self.focus.set(Some(id)),
				ViewCommand::ClearFocus => self.focus.set(None),
			}
		}
	}
}

/// Smoothly scroll the element with `element_id` into view, if it is rendered.
pub fn scroll_into_view(element_id: &str) {
	let element = web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.get_element_by_id(element_id));
	let Some(element) = element else {
		log::warn!("scroll target #{element_id} is not rendered");
		return;
	};
	let options = ScrollIntoViewOptions::new();
	options.set_behavior(ScrollBehavior::Smooth);
	options.set_block(ScrollLogicalPosition::Start);
	element.scroll_into_view_with_scroll_into_view_options(&options);
}
