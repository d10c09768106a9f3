//! Graph view state and interaction tracking.
//!
//! Wraps the layout [`Simulation`] with per-node display metadata, the
//! pan/zoom transform, pointer gestures, and highlight state. Hover
//! highlights and the externally focused report both fade smoothly.

use std::collections::{HashMap, HashSet};

use super::simulation::{Simulation, SimulationConfig, Viewport};
use crate::model::{Graph, ReportId, color_of};

/// Pointer travel (screen px) below which a press-release counts as a click.
pub const CLICK_TOLERANCE: f64 = 4.0;
/// Rate at which the view pans toward a newly focused node.
const FOLLOW_SPEED: f64 = 6.0;
/// Screen distance at which following stops.
const FOLLOW_DONE: f64 = 0.5;

/// Host request to hold or release a report's node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PinRequest {
	/// Hold the report's node at a graph-space position.
	Pin { id: ReportId, x: f64, y: f64 },
	/// Release a host pin on the report's node.
	Unpin(ReportId),
}

/// Per-node display metadata, indexed like the simulation arena.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	/// Report the node stands for.
	pub id: ReportId,
	/// Short label drawn beside the node.
	pub label: String,
	/// Report title, shown while the node is hovered.
	pub title: String,
	/// Fill color from the title.
	pub color: String,
	/// Size multiplier (1.0 = normal); better-connected reports draw larger.
	pub size: f64,
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	/// Horizontal offset, screen px.
	pub x: f64,
	/// Vertical offset, screen px.
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to 0.1..10.0).
	pub k: f64,
}

/// Tracks an in-progress press on a node, which becomes a drag or a click.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	/// Gesture in progress.
	pub active: bool,
	/// Pressed node.
	pub node_idx: Option<usize>,
	/// Pointer x at press, screen px.
	pub start_x: f64,
	/// Pointer y at press, screen px.
	pub start_y: f64,
	/// Node x at press, graph units.
	pub node_start_x: f64,
	/// Node y at press, graph units.
	pub node_start_y: f64,
	/// Largest pointer distance from the press point so far.
	pub travel: f64,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	/// Gesture in progress.
	pub active: bool,
	/// Pointer x at press, screen px.
	pub start_x: f64,
	/// Pointer y at press, screen px.
	pub start_y: f64,
	/// Transform x at press.
	pub transform_start_x: f64,
	/// Transform y at press.
	pub transform_start_y: f64,
}

/// Smoothed highlight intensities.
///
/// Hovering a node lights it and its neighbors; the focused report (the
/// current selection, pushed in from outside) gets a persistent ring. Every
/// intensity eases toward its target with exponential smoothing, and a short
/// hold time keeps a highlight from flickering when the pointer grazes a node.
#[derive(Clone, Debug, Default)]
pub struct HighlightState {
	/// Node under the pointer.
	pub hovered_node: Option<usize>,
	/// Node of the selected report.
	pub focused_node: Option<usize>,
	target_set: HashSet<usize>,
	node_intensity: HashMap<usize, f64>,
	hover_ring_intensity: HashMap<usize, f64>,
	focus_ring_intensity: HashMap<usize, f64>,
	hold_timer: HashMap<usize, f64>,
	cached_max: f64,
}

/// Seconds a highlight is held before it may fade.
const MIN_HOLD_TIME: f64 = 0.12;
const FADE_IN_SPEED: f64 = 6.0;
const FADE_OUT_SPEED: f64 = 4.0;
const VISIBLE_INTENSITY: f64 = 0.005;

impl HighlightState {
	/// Light a node and its neighbors.
	pub fn set_hover(&mut self, node: Option<usize>, graph: &Graph) {
		if self.hovered_node == node {
			return;
		}
		self.hovered_node = node;
		self.target_set.clear();

		if let Some(idx) = node {
			self.target_set.insert(idx);
			self.target_set.extend(graph.neighbors(idx));
			for &idx in &self.target_set {
				self.hold_timer.insert(idx, MIN_HOLD_TIME);
			}
		}
	}

	/// Ring a node persistently.
	pub fn set_focus(&mut self, node: Option<usize>) {
		self.focused_node = node;
	}

	/// Advance by `dt` seconds.
	pub fn tick(&mut self, dt: f64) {
		let fade_in = 1.0 - (-FADE_IN_SPEED * dt).exp();
		let fade_out = (-FADE_OUT_SPEED * dt).exp();

		for &idx in &self.target_set {
			let intensity = self.node_intensity.entry(idx).or_insert(0.0);
			*intensity += (1.0 - *intensity) * fade_in;
		}
		if let Some(idx) = self.hovered_node {
			let intensity = self.hover_ring_intensity.entry(idx).or_insert(0.0);
			*intensity += (1.0 - *intensity) * fade_in;
		}
		if let Some(idx) = self.focused_node {
			let intensity = self.focus_ring_intensity.entry(idx).or_insert(0.0);
			*intensity += (1.0 - *intensity) * fade_in;
		}

		let target_set = &self.target_set;
		self.hold_timer.retain(|idx, timer| {
			if target_set.contains(idx) {
				true
			} else {
				*timer -= dt;
				*timer > 0.0
			}
		});

		let holding = |timers: &HashMap<usize, f64>, idx: &usize| {
			timers.get(idx).copied().unwrap_or(0.0) > 0.0
		};

		let mut new_max: f64 = 0.0;
		let hold_timer = &self.hold_timer;
		self.node_intensity.retain(|idx, intensity| {
			if !target_set.contains(idx) && !holding(hold_timer, idx) {
				*intensity *= fade_out;
			}
			new_max = new_max.max(*intensity);
			target_set.contains(idx) || *intensity > VISIBLE_INTENSITY
		});

		let hovered = self.hovered_node;
		self.hover_ring_intensity.retain(|idx, intensity| {
			if hovered != Some(*idx) && !holding(hold_timer, idx) {
				*intensity *= fade_out;
			}
			hovered == Some(*idx) || *intensity > VISIBLE_INTENSITY
		});

		let focused = self.focused_node;
		self.focus_ring_intensity.retain(|idx, intensity| {
			if focused != Some(*idx) {
				*intensity *= fade_out;
			}
			focused == Some(*idx) || *intensity > VISIBLE_INTENSITY
		});

		self.cached_max = new_max;
	}

	/// Hover highlight of a node, 0..1.
	pub fn node_intensity(&self, idx: usize) -> f64 {
		self.node_intensity.get(&idx).copied().unwrap_or(0.0)
	}

	/// Hover ring of a node, 0..1.
	pub fn hover_ring_intensity(&self, idx: usize) -> f64 {
		self.hover_ring_intensity.get(&idx).copied().unwrap_or(0.0)
	}

	/// Focus ring of a node, 0..1.
	pub fn focus_ring_intensity(&self, idx: usize) -> f64 {
		self.focus_ring_intensity.get(&idx).copied().unwrap_or(0.0)
	}

	/// Geometric mean of the endpoint intensities.
	pub fn edge_intensity(&self, idx1: usize, idx2: usize) -> f64 {
		(self.node_intensity(idx1) * self.node_intensity(idx2)).sqrt()
	}

	/// Strongest node highlight this frame.
	pub fn max_intensity(&self) -> f64 {
		self.cached_max
	}
}

/// Everything the graph canvas needs for one result.
///
/// Built when a result arrives and dropped when the next one replaces it;
/// nothing carries over between results.
pub struct ForceGraphState {
	/// Graph being drawn.
	pub graph: Graph,
	/// Layout.
	pub simulation: Simulation,
	/// Display data per node.
	pub info: Vec<NodeInfo>,
	/// Pan and zoom.
	pub transform: ViewTransform,
	/// Node press or drag.
	pub drag: DragState,
	/// Background pan.
	pub pan: PanState,
	/// Hover and focus highlights.
	pub highlight: HighlightState,
	/// Canvas width, px.
	pub width: f64,
	/// Canvas height, px.
	pub height: f64,
	/// Seconds elapsed, drives edge dash animation.
	pub flow_time: f64,
	/// Node the view is panning toward after a focus change.
	follow: Option<usize>,
}

impl ForceGraphState {
	/// Fresh view of `graph` on a `width`x`height` canvas.
	pub fn new(graph: Graph, width: f64, height: f64, config: SimulationConfig) -> Self {
		let max_degree = (0..graph.nodes.len())
			.map(|idx| graph.degree(idx))
			.max()
			.unwrap_or(0)
			.max(1);

		let info = graph
			.nodes
			.iter()
			.enumerate()
			.map(|(idx, node)| {
				let degree_factor = (graph.degree(idx) as f64 / max_degree as f64).sqrt();
				NodeInfo {
					id: node.id,
					label: format!("#{}", node.id),
					title: node.title.clone(),
					color: color_of(&node.title),
					size: 0.8 + 0.8 * degree_factor,
				}
			})
			.collect();

		let simulation = Simulation::new(&graph, Viewport::new(width, height), config);
		log::info!(
			"graph view: laying out {} nodes, {} edges",
			graph.nodes.len(),
			graph.edges.len()
		);

		Self {
			graph,
			simulation,
			info,
			transform: ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			highlight: HighlightState::default(),
			width,
			height,
			flow_time: 0.0,
			follow: None,
		}
	}

	/// Canvas px to graph units.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node whose hit circle contains the screen point.
	pub fn node_at_position(&self, sx: f64, sy: f64, hit_radius: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		self.simulation
			.nodes()
			.iter()
			.enumerate()
			.rev()
			.find(|(idx, node)| {
				let radius = hit_radius * self.info[*idx].size;
				(node.x - gx).powi(2) + (node.y - gy).powi(2) < radius * radius
			})
			.map(|(idx, _)| idx)
	}

	/// Update the hovered node.
	pub fn set_hover(&mut self, node: Option<usize>) {
		self.highlight.set_hover(node, &self.graph);
	}

	/// Ring the node for `id` and pan it to the middle of the view, or clear
	/// the ring when it is not in the graph.
	pub fn set_focus(&mut self, id: Option<ReportId>) {
		let idx = id.and_then(|id| self.graph.index_of(id));
		self.highlight.set_focus(idx);
		self.follow = idx;
	}

	/// Title of the hovered node, if any.
	pub fn hovered_title(&self) -> Option<&str> {
		let idx = self.highlight.hovered_node?;
		self.info.get(idx).map(|info| info.title.as_str())
	}

	/// Begin panning the view. Stops any focus follow in progress.
	pub fn start_pan(&mut self, sx: f64, sy: f64) {
		self.follow = None;
		self.pan = PanState {
			active: true,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	/// Apply a host pin request. Unknown reports are ignored.
	pub fn apply_pin(&mut self, request: PinRequest) {
		match request {
			PinRequest::Pin { id, x, y } => {
				if let Some(idx) = self.graph.index_of(id) {
					self.simulation.pin(idx, x, y);
				}
			}
			PinRequest::Unpin(id) => {
				if let Some(idx) = self.graph.index_of(id) {
					self.simulation.unpin(idx);
				}
			}
		}
	}

	/// Ease the transform so the followed node drifts to the view center.
	fn follow_focus(&mut self, dt: f64) {
		let Some(idx) = self.follow else {
			return;
		};
		let (Some((nx, ny)), Some((cx, cy))) = (
			self.simulation.position(idx),
			Viewport::new(self.width, self.height).center(),
		) else {
			return;
		};
		let target_x = cx - nx * self.transform.k;
		let target_y = cy - ny * self.transform.k;
		let (dx, dy) = (target_x - self.transform.x, target_y - self.transform.y);
		if dx.hypot(dy) < FOLLOW_DONE {
			self.transform.x = target_x;
			self.transform.y = target_y;
			self.follow = None;
			return;
		}
		let step = 1.0 - (-FOLLOW_SPEED * dt).exp();
		self.transform.x += dx * step;
		self.transform.y += dy * step;
	}

	/// Begin a press on a node. Pinning waits until the pointer actually moves.
	pub fn press_node(&mut self, idx: usize, sx: f64, sy: f64) {
		let Some((nx, ny)) = self.simulation.position(idx) else {
			return;
		};
		self.drag = DragState {
			active: true,
			node_idx: Some(idx),
			start_x: sx,
			start_y: sy,
			node_start_x: nx,
			node_start_y: ny,
			travel: 0.0,
		};
	}

	/// Follow the pointer. Crossing the click tolerance turns the press into a drag.
	pub fn move_pointer(&mut self, sx: f64, sy: f64) {
		let Some(idx) = self.drag.node_idx.filter(|_| self.drag.active) else {
			return;
		};
		let (dx, dy) = (sx - self.drag.start_x, sy - self.drag.start_y);
		let was_dragging = self.drag.travel >= CLICK_TOLERANCE;
		self.drag.travel = self.drag.travel.max((dx * dx + dy * dy).sqrt());
		if self.drag.travel < CLICK_TOLERANCE {
			return;
		}
		if !was_dragging {
			self.simulation.drag_start(idx);
		}
		let k = self.transform.k;
		self.simulation.drag_move(
			idx,
			self.drag.node_start_x + dx / k,
			self.drag.node_start_y + dy / k,
		);
	}

	/// End a press. Returns the clicked report when the pointer stayed put.
	pub fn release(&mut self) -> Option<ReportId> {
		let drag = std::mem::take(&mut self.drag);
		self.pan.active = false;
		let idx = drag.node_idx.filter(|_| drag.active)?;
		if drag.travel >= CLICK_TOLERANCE {
			self.simulation.drag_end(idx);
			None
		} else {
			self.info.get(idx).map(|info| info.id)
		}
	}

	/// Advance by `dt` seconds.
	pub fn tick(&mut self, dt: f64) {
		self.simulation.tick(dt);
		self.flow_time += dt;
		self.highlight.tick(dt);
		self.follow_focus(dt);
	}

	/// Track a new canvas size; an unusable size keeps the previous layout center.
	pub fn resize(&mut self, width: f64, height: f64) {
		if Viewport::new(width, height).center().is_none() {
			return;
		}
		self.width = width;
		self.height = height;
		self.simulation.resize(Viewport::new(width, height));
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::simulation::PinMode;
	use crate::model::graph::build;
	use crate::model::Report;
	use chrono::NaiveDate;

	fn state(ids: &[ReportId], edges: &[(ReportId, ReportId)]) -> ForceGraphState {
		let date = NaiveDate::from_ymd_opt(2020, 5, 1)
			.unwrap()
			.and_hms_opt(0, 0, 0)
			.unwrap();
		let reports: Vec<Report> = ids
			.iter()
			.map(|&id| Report {
				id,
				title: format!("title {id}"),
				date,
				authors: vec![],
				body: String::new(),
				referenced: vec![],
			})
			.collect();
		ForceGraphState::new(build(&reports, ids, edges), 800.0, 600.0, Default::default())
	}

	#[test]
	fn click_without_travel_selects() {
		let mut s = state(&[10, 20], &[(10, 20)]);
		s.press_node(1, 100.0, 100.0);
		s.move_pointer(101.0, 101.0);
		assert_eq!(s.release(), Some(20));
		assert_eq!(s.simulation.node(1).unwrap().mode, PinMode::Free);
	}

	#[test]
	fn drag_pins_then_releases() {
		let mut s = state(&[10, 20], &[(10, 20)]);
		let (x0, y0) = s.simulation.position(0).unwrap();
		s.press_node(0, 100.0, 100.0);
		s.move_pointer(130.0, 100.0);
		assert!(matches!(
			s.simulation.node(0).unwrap().mode,
			PinMode::Dragged { .. }
		));
		assert_eq!(s.simulation.position(0), Some((x0 + 30.0, y0)));

		// Coming back near the press point is still a drag, not a click.
		s.move_pointer(100.0, 100.0);
		assert_eq!(s.release(), None);
		assert_eq!(s.simulation.node(0).unwrap().mode, PinMode::Free);
	}

	#[test]
	fn hit_testing_respects_transform() {
		let mut s = state(&[1], &[]);
		let (x, y) = s.simulation.position(0).unwrap();
		assert_eq!(s.node_at_position(x, y, 12.0), Some(0));
		s.transform = ViewTransform {
			x: 50.0,
			y: 0.0,
			k: 2.0,
		};
		assert_eq!(s.node_at_position(x * 2.0 + 50.0, y * 2.0, 12.0), Some(0));
		assert_eq!(s.node_at_position(x, y + 500.0, 12.0), None);
	}

	#[test]
	fn hover_lights_neighbors_then_fades() {
		let mut s = state(&[1, 2, 3], &[(1, 2)]);
		s.set_hover(Some(0));
		for _ in 0..30 {
			s.highlight.tick(1.0 / 60.0);
		}
		assert!(s.highlight.node_intensity(0) > 0.9);
		assert!(s.highlight.node_intensity(1) > 0.9);
		assert_eq!(s.highlight.node_intensity(2), 0.0);

		s.set_hover(None);
		for _ in 0..240 {
			s.highlight.tick(1.0 / 60.0);
		}
		assert_eq!(s.highlight.node_intensity(0), 0.0);
		assert_eq!(s.highlight.max_intensity(), 0.0);
	}

	#[test]
	fn focus_ignores_reports_outside_graph() {
		let mut s = state(&[1, 2], &[]);
		s.set_focus(Some(2));
		assert_eq!(s.highlight.focused_node, Some(1));
		s.set_focus(Some(99));
		assert_eq!(s.highlight.focused_node, None);
	}

	#[test]
	fn colors_come_from_titles() {
		let s = state(&[5], &[]);
		assert_eq!(s.info[0].color, color_of("title 5"));
		assert_eq!(s.info[0].label, "#5");
	}

	#[test]
	fn focus_pans_node_into_view() {
		let mut s = state(&[10, 20, 30], &[(10, 20)]);
		s.start_pan(0.0, 0.0);
		s.release();
		s.transform.x = 5000.0;
		s.transform.y = -3000.0;
		s.set_focus(Some(30));
		for _ in 0..180 {
			s.tick(1.0 / 60.0);
		}
		let (x, y) = s.simulation.position(2).unwrap();
		let (sx, sy) = (x * s.transform.k + s.transform.x, y * s.transform.k + s.transform.y);
		assert!((0.0..=s.width).contains(&sx), "screen x {sx}");
		assert!((0.0..=s.height).contains(&sy), "screen y {sy}");
	}

	#[test]
	fn panning_stops_following_focus() {
		let mut s = state(&[1, 2], &[]);
		s.set_focus(Some(2));
		s.start_pan(10.0, 10.0);
		s.transform.x = 900.0;
		s.tick(1.0 / 60.0);
		assert_eq!(s.transform.x, 900.0);
	}

	#[test]
	fn unready_size_recovers_after_resize() {
		let date = NaiveDate::from_ymd_opt(2020, 5, 1)
			.unwrap()
			.and_hms_opt(0, 0, 0)
			.unwrap();
		let reports: Vec<Report> = [1, 2]
			.iter()
			.map(|&id| Report {
				id,
				title: format!("title {id}"),
				date,
				authors: vec![],
				body: String::new(),
				referenced: vec![],
			})
			.collect();
		let graph = build(&reports, &[1, 2], &[(1, 2)]);
		let mut s = ForceGraphState::new(graph, 0.0, 0.0, Default::default());

		let before = s.simulation.position(0);
		s.tick(1.0 / 60.0);
		assert_eq!(s.simulation.position(0), before);

		s.resize(800.0, 600.0);
		assert_eq!((s.width, s.height), (800.0, 600.0));
		s.tick(1.0 / 60.0);
		assert_ne!(s.simulation.position(0), before);
	}

	#[test]
	fn pin_requests_address_reports() {
		let mut s = state(&[10, 20], &[(10, 20)]);
		s.apply_pin(PinRequest::Pin { id: 20, x: 1.0, y: 2.0 });
		assert_eq!(s.simulation.node(1).unwrap().mode, PinMode::External { x: 1.0, y: 2.0 });
		s.apply_pin(PinRequest::Pin { id: 99, x: 0.0, y: 0.0 });
		s.apply_pin(PinRequest::Unpin(20));
		assert_eq!(s.simulation.node(1).unwrap().mode, PinMode::Free);
		assert_eq!(s.simulation.node(0).unwrap().mode, PinMode::Free);
	}

	#[test]
	fn hover_exposes_title() {
		let mut s = state(&[7], &[]);
		assert_eq!(s.hovered_title(), None);
		s.set_hover(Some(0));
		assert_eq!(s.hovered_title(), Some("title 7"));
	}
}
