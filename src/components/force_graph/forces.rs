//! Force terms for one simulation step.
//!
//! Link and charge forces accumulate into velocities; the centering force
//! translates positions directly so the node set's mean sits on the viewport
//! center. All three read positions from the start of the step.

use std::f64::consts::TAU;

use super::simulation::{SimNode, SimulationConfig, Topology};

/// Tiny deterministic offset for coincident nodes so they can separate.
fn jiggle(a: usize, b: usize) -> (f64, f64) {
	let (lo, hi) = if a < b { (a, b) } else { (b, a) };
	let angle = ((lo as f64) * 0.618_034 + (hi as f64) * 0.414_214 + 0.37) * TAU;
	let sign = if a < b { 1.0 } else { -1.0 };
	(angle.cos() * 1e-6 * sign, angle.sin() * 1e-6 * sign)
}

/// Springs along edges, pulling endpoints toward `link_distance`.
///
/// Uses predicted positions (`x + vx`) and splits the correction between the
/// endpoints by degree, so hubs move less than leaves.
pub(super) fn apply_links(
	nodes: &mut [SimNode],
	topology: &Topology,
	config: &SimulationConfig,
	alpha: f64,
) {
	for link in &topology.links {
		let (s, t) = (link.source, link.target);
		let mut dx = nodes[t].x + nodes[t].vx - nodes[s].x - nodes[s].vx;
		let mut dy = nodes[t].y + nodes[t].vy - nodes[s].y - nodes[s].vy;
		if dx == 0.0 && dy == 0.0 {
			(dx, dy) = jiggle(s, t);
		}
		let distance = (dx * dx + dy * dy).sqrt();
		let pull = (distance - config.link_distance) / distance * alpha * link.strength;
		let (fx, fy) = (dx * pull, dy * pull);

		nodes[t].vx -= fx * link.bias;
		nodes[t].vy -= fy * link.bias;
		nodes[s].vx += fx * (1.0 - link.bias);
		nodes[s].vy += fy * (1.0 - link.bias);
	}
}

/// Pairwise repulsion, inversely proportional to distance.
///
/// `charge_strength` is negative for repulsion. Distances below
/// `distance_min` are softened so overlapping nodes do not explode.
pub(super) fn apply_charge(nodes: &mut [SimNode], config: &SimulationConfig, alpha: f64) {
	let count = nodes.len();
	if count < 2 {
		return;
	}
	let positions: Vec<(f64, f64)> = nodes.iter().map(|n| (n.x, n.y)).collect();
	let min_sq = config.distance_min * config.distance_min;

	for (i, node) in nodes.iter_mut().enumerate() {
		let (xi, yi) = positions[i];
		for (j, &(xj, yj)) in positions.iter().enumerate() {
			if i == j {
				continue;
			}
			let (mut dx, mut dy) = (xj - xi, yj - yi);
			if dx == 0.0 && dy == 0.0 {
				(dx, dy) = jiggle(i, j);
			}
			let mut dist_sq = dx * dx + dy * dy;
			if dist_sq < min_sq {
				dist_sq = (min_sq * dist_sq).sqrt();
			}
			let scale = config.charge_strength * alpha / dist_sq;
			node.vx += dx * scale;
			node.vy += dy * scale;
		}
	}
}

/// Translate every node so the mean position moves toward `center`.
pub(super) fn apply_center(nodes: &mut [SimNode], center: (f64, f64), strength: f64) {
	if nodes.is_empty() {
		return;
	}
	let n = nodes.len() as f64;
	let (sx, sy) = nodes
		.iter()
		.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
	let strength = strength.clamp(0.0, 1.0);
	let (shift_x, shift_y) = ((sx / n - center.0) * strength, (sy / n - center.1) * strength);
	for node in nodes {
		node.x -= shift_x;
		node.y -= shift_y;
	}
}
