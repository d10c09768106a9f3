//! End-to-end behavior of one explorer session without a browser.

#![allow(unused_crate_dependencies)]

use atel_graph::components::force_graph::{Simulation, SimulationConfig, Viewport};
use atel_graph::model::graph::build;
use atel_graph::model::{Report, ReportId, SearchResult, decode_result};
use atel_graph::sync::{Explorer, Origin, ScrollTicket, Selection, ViewCommand};
use chrono::NaiveDate;

fn report(id: ReportId) -> Report {
	Report {
		id,
		title: format!("Swift detection of transient {id}"),
		date: NaiveDate::from_ymd_opt(2021, 1, 1)
			.unwrap()
			.and_hms_opt(0, 0, 0)
			.unwrap()
			+ chrono::Duration::days(id as i64),
		authors: vec!["A. Observer".into()],
		body: String::new(),
		referenced: vec![],
	}
}

fn result(ids: impl IntoIterator<Item = ReportId>, node_ids: &[ReportId], edges: &[(ReportId, ReportId)]) -> SearchResult {
	SearchResult {
		reports: ids.into_iter().map(report).collect(),
		node_ids: node_ids.to_vec(),
		edges: edges.to_vec(),
	}
}

fn scroll_ticket(commands: &[ViewCommand]) -> Option<ScrollTicket> {
	commands.iter().find_map(|cmd| match cmd {
		ViewCommand::ScheduleScroll { ticket, .. } => Some(*ticket),
		_ => None,
	})
}

#[test]
fn dangling_edges_are_dropped() {
	let mut explorer = Explorer::new(10);
	explorer.load(result([1, 2, 3], &[1, 2, 3], &[(1, 2), (2, 3), (1, 4)]));

	let graph = explorer.graph();
	assert_eq!(graph.nodes.len(), 3);
	assert_eq!(graph.edges.len(), 2);
	for edge in &graph.edges {
		assert!(edge.source < graph.nodes.len());
		assert!(edge.target < graph.nodes.len());
	}
}

#[test]
fn selecting_a_later_report_switches_page_first() {
	let mut explorer = Explorer::new(10);
	explorer.load(result(1..=25, &[], &[]));
	let id = explorer.result().reports[17].id;

	explorer.select(id, Origin::Timeline);
	assert_eq!(explorer.pagination().current_page(), 1);
	let commands = explorer.drain_commands();
	assert_eq!(commands.first(), Some(&ViewCommand::SetPage(1)));

	let ticket = scroll_ticket(&commands).unwrap();
	assert!(explorer.current_view().iter().any(|r| r.id == id));
	assert_eq!(explorer.fire_deferred(ticket), Some(id));
}

#[test]
fn empty_result_is_quiet() {
	let mut explorer = Explorer::default();
	explorer.load(SearchResult::default());

	assert!(explorer.graph().is_empty());
	assert!(explorer.graph().edges.is_empty());
	assert!(explorer.current_view().is_empty());
	assert!(explorer.timeline().is_empty());
	assert_eq!(explorer.pagination().page_count(), 1);

	explorer.next_page();
	assert_eq!(explorer.pagination().current_page(), 0);

	let mut simulation = Simulation::new(explorer.graph(), Viewport::new(800.0, 600.0), SimulationConfig::default());
	assert!(!simulation.tick(1.0 / 60.0));
}

#[test]
fn new_result_cancels_pending_scroll() {
	let mut explorer = Explorer::new(10);
	explorer.load(result(1..=25, &[12], &[]));
	explorer.select(12, Origin::Graph);
	let ticket = scroll_ticket(&explorer.drain_commands()).unwrap();

	explorer.load(result(100..=130, &[], &[]));
	assert_eq!(explorer.selection(), Selection::Idle);
	assert_eq!(explorer.fire_deferred(ticket), None);
	assert!(explorer.coordinator().scroll_log().is_empty());
	assert_eq!(explorer.pagination().current_page(), 0);
}

#[test]
fn only_the_latest_selection_scrolls() {
	let mut explorer = Explorer::new(10);
	explorer.load(result(1..=40, &[], &[]));

	explorer.select(5, Origin::Graph);
	let first = scroll_ticket(&explorer.drain_commands()).unwrap();
	explorer.select(35, Origin::Reference);
	let second = scroll_ticket(&explorer.drain_commands()).unwrap();

	assert_eq!(explorer.fire_deferred(first), None);
	assert_eq!(explorer.fire_deferred(second), Some(35));
	let log = explorer.coordinator().scroll_log();
	assert_eq!(log.len(), 1);
	assert_eq!(log[0].page, 3);
}

#[test]
fn focus_follows_graph_membership() {
	let mut explorer = Explorer::new(10);
	explorer.load(result(1..=5, &[2, 3], &[(2, 3)]));

	explorer.select(2, Origin::Timeline);
	assert!(explorer.drain_commands().contains(&ViewCommand::Focus(2)));
	explorer.select(4, Origin::Timeline);
	assert!(explorer.drain_commands().contains(&ViewCommand::ClearFocus));
	assert_eq!(explorer.selection(), Selection::Selected(4));
}

#[test]
fn envelope_payload_drives_a_session() {
	let json = r#"{
		"flag": 1,
		"msg": "",
		"report_list": [
			{"atel_num": 16001, "title": "Optical flare", "submission_date": "2023-04-02 10:00:00", "authors": "A, B", "body": "", "referenced_reports": [16000]},
			{"atel_num": 16000, "title": "X-ray outburst", "submission_date": "2023-04-01 08:30:00", "authors": ["C"], "body": "", "referenced_reports": []}
		],
		"node_list": [16000, 16001],
		"edge_list": [[16001, 16000], [16001, 99999]]
	}"#;
	let mut explorer = Explorer::new(1);
	explorer.load(decode_result(json).unwrap());

	assert_eq!(explorer.graph().edges.len(), 1);
	let timeline = explorer.timeline();
	assert_eq!(timeline[0].id, 16000);
	assert_eq!(timeline[1].offset, 1.0);

	// The referenced report sits on the second page.
	let referenced = explorer.result().reports[0].referenced[0];
	explorer.select(referenced, Origin::Reference);
	assert_eq!(explorer.pagination().current_page(), 1);
}

#[test]
fn layout_settles_around_the_viewport_center() {
	let data = result(1..=6, &[1, 2, 3, 4, 5, 6], &[(1, 2), (2, 3), (3, 1), (4, 5), (5, 6)]);
	let graph = build(&data.reports, &data.node_ids, &data.edges);
	let mut simulation = Simulation::new(&graph, Viewport::new(800.0, 600.0), SimulationConfig::default());

	let mut ticks = 0;
	while simulation.tick(1.0 / 60.0) {
		ticks += 1;
		assert!(ticks < 1000, "layout never cooled");
	}
	assert!(simulation.is_settled());

	let n = simulation.nodes().len() as f64;
	let cx = simulation.nodes().iter().map(|node| node.x).sum::<f64>() / n;
	let cy = simulation.nodes().iter().map(|node| node.y).sum::<f64>() / n;
	assert!((cx - 400.0).abs() < 2.0, "mean x {cx}");
	assert!((cy - 300.0).abs() < 2.0, "mean y {cy}");
	assert!(simulation.nodes().iter().all(|node| node.x.is_finite() && node.y.is_finite()));
}

#[test]
fn repeated_report_ids_are_listed_once() {
	let mut data = result([1, 2, 3], &[1, 2, 3], &[(1, 2)]);
	data.reports.push(report(2));
	let mut explorer = Explorer::new(10);
	explorer.load(data);

	let ids: Vec<_> = explorer.current_view().iter().map(|r| r.id).collect();
	assert_eq!(ids, vec![1, 2, 3]);
	assert_eq!(explorer.timeline().len(), 3);
	assert_eq!(explorer.graph().nodes.len(), 3);
}
