//! Validated correlation graph built from a search result.

use std::collections::HashMap;

use super::report::{Report, ReportId};

/// A graph member: the report it projects plus the display data every view
/// needs to draw it.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	/// Report this node stands for.
	pub id: ReportId,
	/// Report title.
	pub title: String,
}

/// A validated edge between two node indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphEdge {
	/// Index of the citing node.
	pub source: usize,
	/// Index of the cited node.
	pub target: usize,
}

/// Nodes in report order plus the edges that survived validation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
	/// Graph members, in report order.
	pub nodes: Vec<GraphNode>,
	/// Edges between members, in payload order.
	pub edges: Vec<GraphEdge>,
	index: HashMap<ReportId, usize>,
}

impl Graph {
	/// Node index of a report.
	pub fn index_of(&self, id: ReportId) -> Option<usize> {
		self.index.get(&id).copied()
	}

	/// Whether the report is a graph member.
	pub fn contains(&self, id: ReportId) -> bool {
		self.index.contains_key(&id)
	}

	/// True when no report is a graph member.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Number of edges touching a node, counting self-loops once.
	pub fn degree(&self, idx: usize) -> usize {
		self.edges
			.iter()
			.filter(|e| e.source == idx || e.target == idx)
			.count()
	}

	/// Indices of nodes sharing an edge with `idx`.
	pub fn neighbors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
		self.edges.iter().filter_map(move |e| {
			if e.source == idx && e.target != idx {
				Some(e.target)
			} else if e.target == idx && e.source != idx {
				Some(e.source)
			} else {
				None
			}
		})
	}
}

/// Build the renderable graph.
///
/// Nodes are the reports listed in `node_ids`, in report order. An edge
/// survives only if both endpoints are nodes; everything else is dropped
/// without complaint.
pub fn build(reports: &[Report], node_ids: &[ReportId], edge_pairs: &[(ReportId, ReportId)]) -> Graph {
	let members: std::collections::HashSet<ReportId> = node_ids.iter().copied().collect();
	let mut graph = Graph::default();

	for report in reports {
		if !members.contains(&report.id) || graph.index.contains_key(&report.id) {
			continue;
		}
		graph.index.insert(report.id, graph.nodes.len());
		graph.nodes.push(GraphNode {
			id: report.id,
			title: report.title.clone(),
		});
	}

	graph.edges = edge_pairs
		.iter()
		.filter_map(|&(source, target)| {
			Some(GraphEdge {
				source: graph.index_of(source)?,
				target: graph.index_of(target)?,
			})
		})
		.collect();

	log::debug!(
		"graph: {} nodes, {} of {} edges kept",
		graph.nodes.len(),
		graph.edges.len(),
		edge_pairs.len()
	);
	graph
}
