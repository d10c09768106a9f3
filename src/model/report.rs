//! Report and search-result data as received from the search backend.
//!
//! Two payload shapes are accepted: the backend's response envelope
//! (`report_list` / `node_list` / `edge_list` with a status `flag`) and the
//! already-normalized `{ reports, nodeIds, edges }` shape.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

use crate::error::PayloadError;

/// Stable bulletin number identifying a report.
pub type ReportId = u64;

/// One ingested bulletin.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Report {
	/// Bulletin number.
	pub id: ReportId,
	/// Bulletin title.
	pub title: String,
	/// Submission date.
	#[serde(deserialize_with = "de_date")]
	pub date: NaiveDateTime,
	/// Author names, in bulletin order.
	#[serde(default, deserialize_with = "de_authors")]
	pub authors: Vec<String>,
	/// Bulletin text.
	#[serde(default)]
	pub body: String,
	/// Bulletins this one cites.
	#[serde(default)]
	pub referenced: Vec<ReportId>,
}

impl Report {
	/// Authors joined for display.
	pub fn author_line(&self) -> String {
		self.authors.join(", ")
	}
}

/// The output of one search: ordered reports plus graph membership and edges.
///
/// Edge endpoints are not validated here; [`super::graph::build`] drops any
/// edge that does not connect two graph members.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
	/// Matches in list order.
	#[serde(default)]
	pub reports: Vec<Report>,
	/// Reports that belong in the graph.
	#[serde(default)]
	pub node_ids: Vec<ReportId>,
	/// Correlations as `(citing, cited)` pairs.
	#[serde(default)]
	pub edges: Vec<(ReportId, ReportId)>,
}

impl SearchResult {
	/// Position of a report in list order.
	pub fn index_of(&self, id: ReportId) -> Option<usize> {
		self.reports.iter().position(|r| r.id == id)
	}

	/// Report by id.
	pub fn get(&self, id: ReportId) -> Option<&Report> {
		self.reports.iter().find(|r| r.id == id)
	}

	/// True when the search matched nothing.
	pub fn is_empty(&self) -> bool {
		self.reports.is_empty()
	}

	/// Drop repeated report ids, keeping the first occurrence. Returns how
	/// many reports were removed.
	pub fn dedup_reports(&mut self) -> usize {
		let before = self.reports.len();
		let mut seen = HashSet::with_capacity(before);
		self.reports.retain(|r| seen.insert(r.id));
		before - self.reports.len()
	}
}

/// Report record as serialized by the search backend.
#[derive(Debug, Deserialize)]
struct ApiReport {
	atel_num: ReportId,
	title: String,
	#[serde(deserialize_with = "de_date")]
	submission_date: NaiveDateTime,
	#[serde(default, deserialize_with = "de_authors")]
	authors: Vec<String>,
	#[serde(default)]
	body: String,
	#[serde(default)]
	referenced_reports: Vec<ReportId>,
}

impl From<ApiReport> for Report {
	fn from(api: ApiReport) -> Self {
		Self {
			id: api.atel_num,
			title: api.title,
			date: api.submission_date,
			authors: api.authors,
			body: api.body,
			referenced: api.referenced_reports,
		}
	}
}

/// Search response envelope. `flag` is 0 for a system error, 1 for success
/// and 2 for a user error whose `msg` is meant to be shown as is.
#[derive(Debug, Deserialize)]
struct SearchResponse {
	flag: u8,
	#[serde(default)]
	msg: String,
	#[serde(default)]
	report_list: Vec<ApiReport>,
	#[serde(default)]
	node_list: Vec<ReportId>,
	#[serde(default)]
	edge_list: Vec<Vec<ReportId>>,
}

impl SearchResponse {
	fn into_result(self) -> Result<SearchResult, PayloadError> {
		match self.flag {
			1 => {}
			0 => return Err(PayloadError::System),
			2 => return Err(PayloadError::User(self.msg)),
			other => return Err(PayloadError::UnexpectedFlag(other)),
		}

		// Edges must be exact pairs; anything else is dropped like a dangling edge.
		let edges = self
			.edge_list
			.into_iter()
			.filter_map(|pair| match pair.as_slice() {
				[source, target] => Some((*source, *target)),
				_ => None,
			})
			.collect();

		Ok(SearchResult {
			reports: self.report_list.into_iter().map(Report::from).collect(),
			node_ids: self.node_list,
			edges,
		})
	}
}

/// Decode a search payload from JSON.
///
/// Objects carrying a `flag` field are treated as backend response envelopes;
/// anything else must be a normalized [`SearchResult`].
pub fn decode_result(json: &str) -> Result<SearchResult, PayloadError> {
	let value: serde_json::Value = serde_json::from_str(json)?;
	if value.get("flag").is_some() {
		let response: SearchResponse = serde_json::from_value(value)?;
		response.into_result()
	} else {
		Ok(serde_json::from_value(value)?)
	}
}

/// Parse the date formats the backend has been seen to emit.
pub fn parse_date(raw: &str) -> Result<NaiveDateTime, PayloadError> {
	let raw = raw.trim();
	if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
		return Ok(dt.naive_utc());
	}
	if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
		return Ok(dt.naive_utc());
	}
	// Flask renders naive datetimes with a literal GMT suffix.
	if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%a, %d %b %Y %H:%M:%S GMT") {
		return Ok(dt);
	}
	for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
		if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
			return Ok(dt);
		}
	}
	NaiveDate::parse_from_str(raw, "%Y-%m-%d")
		.ok()
		.and_then(|d| d.and_hms_opt(0, 0, 0))
		.ok_or_else(|| PayloadError::Date(raw.to_string()))
}

fn de_date<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = String::deserialize(deserializer)?;
	parse_date(&raw).map_err(serde::de::Error::custom)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Authors {
	Joined(String),
	List(Vec<String>),
}

fn de_authors<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Authors::deserialize(deserializer)? {
		Authors::Joined(joined) => joined
			.split(',')
			.map(str::trim)
			.filter(|a| !a.is_empty())
			.map(String::from)
			.collect(),
		Authors::List(list) => list,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decodes_backend_envelope() {
		let json = r#"{
			"flag": 1,
			"msg": "",
			"report_list": [
				{
					"atel_num": 14000,
					"title": "Optical flare in SN 2020abc",
					"submission_date": "Fri, 30 Jul 2021 00:00:00 GMT",
					"authors": "A. Author, B. Builder",
					"body": "We report...",
					"referenced_reports": [13990]
				}
			],
			"node_list": [14000],
			"edge_list": [[14000, 13990], [1, 2, 3]]
		}"#;

		let result = decode_result(json).unwrap();
		assert_eq!(result.reports.len(), 1);
		let report = &result.reports[0];
		assert_eq!(report.id, 14000);
		assert_eq!(report.authors, vec!["A. Author", "B. Builder"]);
		assert_eq!(report.referenced, vec![13990]);
		assert_eq!(
			report.date.date(),
			NaiveDate::from_ymd_opt(2021, 7, 30).unwrap()
		);
		assert_eq!(result.node_ids, vec![14000]);
		assert_eq!(result.edges, vec![(14000, 13990)]);
	}

	#[test]
	fn envelope_flags_map_to_errors() {
		assert!(matches!(
			decode_result(r#"{"flag": 0, "msg": "boom"}"#),
			Err(PayloadError::System)
		));
		match decode_result(r#"{"flag": 2, "msg": "Unknown object name"}"#) {
			Err(PayloadError::User(msg)) => assert_eq!(msg, "Unknown object name"),
			other => panic!("unexpected {other:?}"),
		}
		assert!(matches!(
			decode_result(r#"{"flag": 7}"#),
			Err(PayloadError::UnexpectedFlag(7))
		));
	}

	#[test]
	fn decodes_normalized_shape() {
		let json = r#"{
			"reports": [
				{"id": 1, "title": "a", "date": "2021-07-30", "authors": ["X"]},
				{"id": 2, "title": "b", "date": "2021-07-31T12:00:00Z"}
			],
			"nodeIds": [1, 2],
			"edges": [[1, 2]]
		}"#;
		let result = decode_result(json).unwrap();
		assert_eq!(result.reports[1].authors, Vec::<String>::new());
		assert_eq!(result.edges, vec![(1, 2)]);
		assert_eq!(result.index_of(2), Some(1));
		assert_eq!(result.index_of(3), None);
	}

	#[test]
	fn rejects_unparseable_dates() {
		assert!(matches!(parse_date("last tuesday"), Err(PayloadError::Date(_))));
		assert!(parse_date("2021-07-30 10:11:12").is_ok());
	}

	#[test]
	fn repeated_ids_keep_first_report() {
		let json = r#"{
			"reports": [
				{"id": 1, "title": "first", "date": "2020-01-01"},
				{"id": 2, "title": "other", "date": "2020-01-02"},
				{"id": 1, "title": "repeat", "date": "2020-01-03"}
			]
		}"#;
		let mut result = decode_result(json).unwrap();
		assert_eq!(result.dedup_reports(), 1);
		let titles: Vec<_> = result.reports.iter().map(|r| r.title.as_str()).collect();
		assert_eq!(titles, vec!["first", "other"]);
		assert_eq!(result.dedup_reports(), 0);
	}

	#[test]
	fn malformed_json_is_an_error() {
		assert!(matches!(decode_result("{"), Err(PayloadError::Json(_))));
	}
}
