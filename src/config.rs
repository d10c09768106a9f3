//! Runtime configuration, read from a JSON `<script id="explorer-config">`
//! element when the page provides one.

use serde::Deserialize;

use crate::components::force_graph::SimulationConfig;
use crate::sync::DEFAULT_PAGE_SIZE;

/// Settings for one explorer page.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
	/// Reports per list page.
	pub page_size: usize,
	/// Base URL of the bulletin site; cards link to `{report_url}/?read={id}`.
	pub report_url: String,
	/// Graph theme preset name (`default`, `midnight`, `paper`).
	pub theme: String,
	/// Layout constants.
	pub simulation: SimulationConfig,
}

impl Default for ExplorerConfig {
	fn default() -> Self {
		Self {
			page_size: DEFAULT_PAGE_SIZE,
			report_url: "https://www.astronomerstelegram.org".into(),
			theme: "default".into(),
			simulation: SimulationConfig::default(),
		}
	}
}

impl ExplorerConfig {
	/// Link to the bulletin page for `id`.
	pub fn report_link(&self, id: u64) -> String {
		format!("{}/?read={}", self.report_url.trim_end_matches('/'), id)
	}
}
