//! atel-graph: correlation explorer for astronomical bulletin search results.
//!
//! Given one search result (reports, graph members and correlation edges),
//! this crate builds the correlation graph, lays it out with a cooling force
//! simulation on a canvas, and keeps the paginated report list, the graph and
//! the timeline pointed at the same selected report. The engine under
//! [`model`] and [`sync`] is plain Rust and runs natively; [`components`]
//! holds the WASM views.

use std::cell::Cell;

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlScriptElement, Window};

/// Leptos views.
pub mod components;
/// Runtime configuration.
pub mod config;
/// Payload decoding errors.
pub mod error;
/// Result data and its projections.
pub mod model;
/// Cross-view selection and pagination.
pub mod sync;

use components::{ExplorerContext, ForceGraphCanvas, ReportList, Timeline};
pub use config::ExplorerConfig;
pub use error::PayloadError;
pub use model::{SearchResult, color_of, decode_result};

thread_local! {
	static EXPLORER: Cell<Option<ExplorerContext>> = const { Cell::new(None) };
}

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("atel-graph: logging initialized");
}

/// Text of the `<script>` element with `id`, if the page has one.
fn script_text(id: &str) -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Load configuration from a script element with id="explorer-config".
fn load_config() -> ExplorerConfig {
	let Some(json_text) = script_text("explorer-config") else {
		return ExplorerConfig::default();
	};
	match serde_json::from_str::<ExplorerConfig>(&json_text) {
		Ok(config) => config,
		Err(e) => {
			warn!("atel-graph: ignoring malformed config: {}", e);
			ExplorerConfig::default()
		}
	}
}

/// Load the initial result from a script element with id="search-result".
/// Accepts the backend envelope or `{ reports, nodeIds, edges }`.
fn load_result() -> SearchResult {
	let Some(json_text) = script_text("search-result") else {
		return SearchResult::default();
	};
	match decode_result(&json_text) {
		Ok(result) => result,
		Err(e) => {
			warn!("atel-graph: failed to load search result: {}", e);
			SearchResult::default()
		}
	}
}

/// Replace the displayed result with a new search payload.
///
/// Called by the host page after each search. Decode failures are returned
/// as the error message for the host to show; the current result stays.
#[wasm_bindgen(js_name = loadSearchResult)]
pub fn load_search_result(json: &str) -> Result<(), JsValue> {
	let explorer = mounted_explorer()?;
	let result = decode_result(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
	explorer.load(result);
	Ok(())
}

/// Hold a report's graph node at `(x, y)` in graph coordinates until
/// `unpinReport` releases it. Dragging the node moves the pin.
#[wasm_bindgen(js_name = pinReport)]
pub fn pin_report(id: u64, x: f64, y: f64) -> Result<(), JsValue> {
	mounted_explorer()?.pin(id, x, y);
	Ok(())
}

/// Release a pin set by `pinReport`.
#[wasm_bindgen(js_name = unpinReport)]
pub fn unpin_report(id: u64) -> Result<(), JsValue> {
	mounted_explorer()?.unpin(id);
	Ok(())
}

fn mounted_explorer() -> Result<ExplorerContext, JsValue> {
	EXPLORER
		.with(Cell::get)
		.ok_or_else(|| JsValue::from_str("explorer is not mounted"))
}

/// Main application component.
/// Loads configuration and the initial result from the DOM and lays out the
/// graph, timeline and report list around one shared explorer.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let explorer = ExplorerContext::new(load_config());
	explorer.load(load_result());
	provide_context(explorer);
	EXPLORER.with(|cell| cell.set(Some(explorer)));

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="ATel Correlation Explorer" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<main class="explorer">
			<div class="explorer-graph">
				<ForceGraphCanvas />
				<div class="graph-overlay">
					<p class="subtitle">"Click a node to open its report. Drag nodes to reposition. Scroll to zoom."</p>
				</div>
			</div>
			<Timeline />
			<ReportList />
		</main>
	}
}
