//! Force-directed layout over an arena of node records.
//!
//! Each step is a pure function of the previous arena: [`advance`] takes the
//! current layout and returns the next one, so any scheduler (animation
//! frames, a test loop) can drive it through [`Simulation::tick`].
//!
//! Activity is governed by `alpha`, a temperature that decays toward
//! `alpha_target` every frame. Once both drop below `alpha_min` the layout is
//! quiescent and ticks stop moving nodes until something reheats it, such as
//! a drag.

use std::f64::consts::PI;

use serde::Deserialize;

use super::forces::{apply_center, apply_charge, apply_links};
use crate::model::{Graph, ReportId};

/// Tunable physics constants.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
	/// Rest length of edge springs, in world units.
	pub link_distance: f64,
	/// Many-body strength; negative repels.
	pub charge_strength: f64,
	/// Distances below this are softened in the charge force.
	pub distance_min: f64,
	/// Fraction of the centroid offset removed per frame (0..=1).
	pub center_strength: f64,
	/// Alpha below which the layout counts as settled.
	pub alpha_min: f64,
	/// Per-frame fraction of the gap to `alpha_target` closed.
	pub alpha_decay: f64,
	/// Per-frame velocity loss (0 = frictionless, 1 = frozen).
	pub velocity_decay: f64,
	/// Temperature the layout is raised to while a node is dragged.
	pub reheat_alpha: f64,
	/// Radius of the ring new layouts start from.
	pub initial_radius: f64,
	/// Nominal frame duration in seconds; `tick(dt)` scales by `dt / frame_seconds`.
	pub frame_seconds: f64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		let alpha_min: f64 = 0.001;
		Self {
			link_distance: 30.0,
			charge_strength: -30.0,
			distance_min: 1.0,
			center_strength: 1.0,
			alpha_min,
			// Cools from 1 to alpha_min in ~300 frames.
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			reheat_alpha: 0.3,
			initial_radius: 100.0,
			frame_seconds: 1.0 / 60.0,
		}
	}
}

/// How a node's position is controlled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PinMode {
	/// Moved by forces.
	Free,
	/// Held under the pointer. `resume_external` restores an external pin on release.
	Dragged {
		/// Pointer position, graph units.
		x: f64,
		/// Pointer position, graph units.
		y: f64,
		/// Return to an external pin at the drop position on release.
		resume_external: bool,
	},
	/// Held by the host, independent of pointer interaction.
	External {
		/// Pin position, graph units.
		x: f64,
		/// Pin position, graph units.
		y: f64,
	},
}

impl PinMode {
	/// Position the node is held at, if pinned.
	pub fn pinned_at(&self) -> Option<(f64, f64)> {
		match *self {
			PinMode::Free => None,
			PinMode::Dragged { x, y, .. } | PinMode::External { x, y } => Some((x, y)),
		}
	}
}

/// One arena record.
#[derive(Clone, Debug, PartialEq)]
pub struct SimNode {
	/// Report the node stands for.
	pub id: ReportId,
	/// Position, graph units.
	pub x: f64,
	/// Position, graph units.
	pub y: f64,
	/// Velocity per nominal frame.
	pub vx: f64,
	/// Velocity per nominal frame.
	pub vy: f64,
	/// Who controls the position.
	pub mode: PinMode,
}

/// An edge with its precomputed spring strength and degree bias.
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
	/// Source node index.
	pub source: usize,
	/// Target node index.
	pub target: usize,
	/// Spring strength, `1 / min(degree)`.
	pub strength: f64,
	/// Share of the correction applied to the target.
	pub bias: f64,
}

/// Edge structure the link force needs. Self-loops are left out.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Topology {
	/// Springs, one per non-loop edge.
	pub links: Vec<Link>,
}

impl Topology {
	/// Springs for every edge except self-loops.
	pub fn from_graph(graph: &Graph) -> Self {
		let mut degree = vec![0usize; graph.nodes.len()];
		let pairs: Vec<(usize, usize)> = graph
			.edges
			.iter()
			.filter(|e| e.source != e.target)
			.map(|e| (e.source, e.target))
			.collect();
		for &(s, t) in &pairs {
			degree[s] += 1;
			degree[t] += 1;
		}

		let links = pairs
			.into_iter()
			.map(|(source, target)| {
				let (ds, dt) = (degree[source] as f64, degree[target] as f64);
				Link {
					source,
					target,
					strength: 1.0 / ds.min(dt),
					bias: ds / (ds + dt),
				}
			})
			.collect();
		Self { links }
	}
}

/// Size of the drawing surface the layout centers itself in.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
	/// Width in px.
	pub width: f64,
	/// Height in px.
	pub height: f64,
}

impl Viewport {
	/// Viewport of the given size.
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// Center point, or `None` while the container has no usable size.
	pub fn center(&self) -> Option<(f64, f64)> {
		let usable = |v: f64| v.is_finite() && v > 0.0;
		(usable(self.width) && usable(self.height)).then(|| (self.width / 2.0, self.height / 2.0))
	}
}

/// Inputs to one pure step besides the arena itself.
#[derive(Clone, Copy, Debug)]
pub struct Step {
	/// Current cooling level.
	pub alpha: f64,
	/// Elapsed time in nominal frames.
	pub frames: f64,
	/// Point the center force pulls toward.
	pub center: (f64, f64),
}

/// Compute the next arena from the previous one.
pub fn advance(
	layout: &[SimNode],
	topology: &Topology,
	config: &SimulationConfig,
	step: Step,
) -> Vec<SimNode> {
	let mut next = layout.to_vec();
	let impulse = step.alpha * step.frames;

	apply_links(&mut next, topology, config, impulse);
	apply_charge(&mut next, config, impulse);
	apply_center(
		&mut next,
		step.center,
		config.center_strength * step.frames,
	);

	let friction = (1.0 - config.velocity_decay).clamp(0.0, 1.0).powf(step.frames);
	for node in &mut next {
		match node.mode.pinned_at() {
			Some((x, y)) => {
				node.x = x;
				node.y = y;
				node.vx = 0.0;
				node.vy = 0.0;
			}
			None => {
				node.vx *= friction;
				node.vy *= friction;
				node.x += node.vx;
				node.y += node.vy;
			}
		}
	}
	next
}

/// A running layout for one graph.
///
/// Owned by the graph view and replaced wholesale when a new result arrives.
#[derive(Clone, Debug)]
pub struct Simulation {
	layout: Vec<SimNode>,
	topology: Topology,
	config: SimulationConfig,
	viewport: Viewport,
	alpha: f64,
	alpha_target: f64,
}

impl Simulation {
	/// Start a fresh layout with nodes on a ring around the viewport center.
	pub fn new(graph: &Graph, viewport: Viewport, config: SimulationConfig) -> Self {
		let (cx, cy) = viewport.center().unwrap_or((0.0, 0.0));
		let count = graph.nodes.len().max(1) as f64;
		let layout = graph
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| {
				let angle = (i as f64) * 2.0 * PI / count;
				SimNode {
					id: node.id,
					x: cx + config.initial_radius * angle.cos(),
					y: cy + config.initial_radius * angle.sin(),
					vx: 0.0,
					vy: 0.0,
					mode: PinMode::Free,
				}
			})
			.collect();

		Self {
			layout,
			topology: Topology::from_graph(graph),
			config,
			viewport,
			alpha: 1.0,
			alpha_target: 0.0,
		}
	}

	/// All nodes, indexed like the graph.
	pub fn nodes(&self) -> &[SimNode] {
		&self.layout
	}

	/// Node by index.
	pub fn node(&self, idx: usize) -> Option<&SimNode> {
		self.layout.get(idx)
	}

	/// Node position by index.
	pub fn position(&self, idx: usize) -> Option<(f64, f64)> {
		self.layout.get(idx).map(|n| (n.x, n.y))
	}

	/// Current cooling level.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Last usable viewport.
	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	/// True once cooling has finished and nothing holds the layout warm.
	pub fn is_settled(&self) -> bool {
		self.alpha < self.config.alpha_min && self.alpha_target < self.config.alpha_min
	}

	/// Record a new container size. Unusable sizes are ignored so the last
	/// good center stays in effect.
	pub fn resize(&mut self, viewport: Viewport) {
		if viewport.center().is_none() {
			log::debug!("simulation: ignoring unusable viewport {viewport:?}");
			return;
		}
		self.viewport = viewport;
	}

	/// Advance by `dt` seconds. Returns whether positions were updated.
	pub fn tick(&mut self, dt: f64) -> bool {
		if self.layout.is_empty() || self.is_settled() {
			return false;
		}
		let Some(center) = self.viewport.center() else {
			return false;
		};

		let frames = (dt / self.config.frame_seconds).clamp(0.25, 3.0);
		let decay = 1.0 - (1.0 - self.config.alpha_decay).powf(frames);
		self.alpha += (self.alpha_target - self.alpha) * decay;

		self.layout = advance(
			&self.layout,
			&self.topology,
			&self.config,
			Step {
				alpha: self.alpha,
				frames,
				center,
			},
		);
		true
	}

	/// Wake the layout without disturbing any pins.
	pub fn reheat(&mut self) {
		self.alpha = self.alpha.max(self.config.reheat_alpha);
	}

	/// Pin a node under the pointer and warm the layout so neighbors react.
	pub fn drag_start(&mut self, idx: usize) {
		let reheat = self.config.reheat_alpha;
		let Some(node) = self.layout.get_mut(idx) else {
			return;
		};
		let resume_external = matches!(node.mode, PinMode::External { .. });
		node.mode = PinMode::Dragged {
			x: node.x,
			y: node.y,
			resume_external,
		};
		self.alpha_target = reheat;
		self.alpha = self.alpha.max(reheat);
	}

	/// Move the drag pin. The node follows immediately, even between ticks.
	pub fn drag_move(&mut self, idx: usize, x: f64, y: f64) {
		let Some(node) = self.layout.get_mut(idx) else {
			return;
		};
		if let PinMode::Dragged {
			resume_external, ..
		} = node.mode
		{
			node.mode = PinMode::Dragged {
				x,
				y,
				resume_external,
			};
			node.x = x;
			node.y = y;
		}
	}

	/// Release the drag pin and let the layout cool again.
	pub fn drag_end(&mut self, idx: usize) {
		let Some(node) = self.layout.get_mut(idx) else {
			return;
		};
		if let PinMode::Dragged {
			x,
			y,
			resume_external,
		} = node.mode
		{
			node.mode = if resume_external {
				PinMode::External { x, y }
			} else {
				PinMode::Free
			};
		}
		if !self.layout.iter().any(|n| matches!(n.mode, PinMode::Dragged { .. })) {
			self.alpha_target = 0.0;
		}
	}

	/// Hold a node at a host-chosen position.
	pub fn pin(&mut self, idx: usize, x: f64, y: f64) {
		if let Some(node) = self.layout.get_mut(idx) {
			node.mode = PinMode::External { x, y };
			node.x = x;
			node.y = y;
			self.reheat();
		}
	}

	/// Drop an external pin. Drag pins are left to `drag_end`.
	pub fn unpin(&mut self, idx: usize) {
		if let Some(node) = self.layout.get_mut(idx) {
			match node.mode {
				PinMode::External { .. } => node.mode = PinMode::Free,
				PinMode::Dragged { x, y, .. } => {
					node.mode = PinMode::Dragged {
						x,
						y,
						resume_external: false,
					}
				}
				PinMode::Free => {}
			}
		}
	}
}
