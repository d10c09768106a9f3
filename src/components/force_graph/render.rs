//! Canvas rendering for the correlation graph.
//!
//! Drawing passes, back to front:
//! 1. Background (screen space)
//! 2. Edges with direction arrows (world space)
//! 3. Dimmed nodes, then highlighted and focused nodes on top

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::ForceGraphState;
use super::theme::{Color, Theme};

/// Base node radius in world units.
pub const NODE_RADIUS: f64 = 5.0;
/// Base hit radius in world units.
pub const HIT_RADIUS: f64 = 12.0;
const LABEL_SIZE: f64 = 10.0;
const DASH: (f64, f64) = (8.0, 4.0);
const FLOW_SPEED: f64 = 12.0;

fn smooth_step(t: f64) -> f64 {
	t * t * (3.0 - 2.0 * t)
}

/// Zoom-dependent sizes, computed once per frame.
struct Scaled {
	k: f64,
	/// Node radius keeps at least 5 screen px when zoomed out.
	node_radius: f64,
	line_width: f64,
	arrow_size: f64,
	arrow_alpha: f64,
	label_font: String,
}

impl Scaled {
	fn new(k: f64) -> Self {
		Self {
			k,
			node_radius: NODE_RADIUS.max(5.0 / k),
			line_width: 1.5 / k,
			arrow_size: NODE_RADIUS.min(18.0 / k),
			arrow_alpha: k.clamp(0.0, 1.0),
			label_font: format!("{}px sans-serif", LABEL_SIZE / k.max(0.5)),
		}
	}
}

/// Renders the complete graph to the canvas.
pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let scale = Scaled::new(state.transform.k);

	draw_background(state, ctx, theme);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_edges(state, ctx, &scale, theme);
	draw_nodes(state, ctx, &scale, theme);

	ctx.restore();
}

fn draw_background(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let (w, h) = (state.width, state.height);
	let gradient = theme
		.background
		.use_gradient
		.then(|| ctx.create_radial_gradient(w / 2.0, h / 2.0, 0.0, w / 2.0, h / 2.0, w.max(h) * 0.8))
		.and_then(Result::ok);

	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &theme.background.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &theme.background.color.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&theme.background.color.to_css()),
	}
	ctx.fill_rect(0.0, 0.0, w, h);
}

fn draw_edges(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &Scaled,
	theme: &Theme,
) {
	let max_t = smooth_step(state.highlight.max_intensity());
	let color = theme.edge.color;

	if theme.edge.animated {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(DASH.0),
			&JsValue::from_f64(DASH.1),
		));
		ctx.set_line_dash_offset(-state.flow_time * FLOW_SPEED);
	}

	for edge in &state.graph.edges {
		let (Some(from), Some(to)) = (
			state.simulation.position(edge.source),
			state.simulation.position(edge.target),
		) else {
			continue;
		};
		let (dx, dy) = (to.0 - from.0, to.1 - from.1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		let edge_t = smooth_step(state.highlight.edge_intensity(edge.source, edge.target));
		let (alpha, width) = if edge_t > 0.01 {
			(0.7 + 0.3 * edge_t, scale.line_width * (1.0 + 0.4 * edge_t))
		} else {
			(0.7 - 0.5 * max_t, scale.line_width * (1.0 - 0.3 * max_t))
		};

		let (ux, uy) = (dx / dist, dy / dist);
		let r_from = scale.node_radius * state.info[edge.source].size;
		let r_to = scale.node_radius * state.info[edge.target].size;

		ctx.set_stroke_style_str(&color.with_alpha(alpha * color.a).to_css());
		ctx.set_line_width(width);
		ctx.begin_path();
		ctx.move_to(from.0 + ux * r_from, from.1 + uy * r_from);
		ctx.line_to(
			to.0 - ux * (r_to + scale.arrow_size),
			to.1 - uy * (r_to + scale.arrow_size),
		);
		ctx.stroke();

		let arrow_alpha = alpha * scale.arrow_alpha;
		if arrow_alpha > 0.05 {
			let (tip_x, tip_y) = (to.0 - ux * r_to, to.1 - uy * r_to);
			let (back_x, back_y) = (tip_x - ux * scale.arrow_size, tip_y - uy * scale.arrow_size);
			let (px, py) = (-uy * scale.arrow_size * 0.5, ux * scale.arrow_size * 0.5);
			ctx.set_fill_style_str(&color.with_alpha(arrow_alpha * color.a).to_css());
			ctx.begin_path();
			ctx.move_to(tip_x, tip_y);
			ctx.line_to(back_x + px, back_y + py);
			ctx.line_to(back_x - px, back_y - py);
			ctx.close_path();
			ctx.fill();
		}
	}

	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_nodes(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &Scaled,
	theme: &Theme,
) {
	let max_t = smooth_step(state.highlight.max_intensity());
	let dim_alpha = 1.0 - 0.7 * max_t;
	let dim_radius = 1.0 - 0.15 * max_t;
	let is_raised = |idx: usize| {
		state.highlight.node_intensity(idx) > 0.001 || state.highlight.focus_ring_intensity(idx) > 0.001
	};

	// Pass 1: everything not highlighted, dimmed while a highlight is active.
	for idx in (0..state.info.len()).filter(|&idx| !is_raised(idx)) {
		draw_node(state, ctx, scale, theme, idx, dim_alpha, dim_radius);
	}

	// Pass 2: highlighted and focused nodes on top.
	for idx in (0..state.info.len()).filter(|&idx| is_raised(idx)) {
		let node_t = smooth_step(state.highlight.node_intensity(idx));
		let hover_t = smooth_step(state.highlight.hover_ring_intensity(idx));
		let focus_t = smooth_step(state.highlight.focus_ring_intensity(idx));
		let lift = node_t.max(focus_t);

		let target_radius = 1.0 + 0.25 * lift + 0.15 * hover_t;
		let alpha = dim_alpha + (1.0 - dim_alpha) * lift;
		let radius_mult = dim_radius + (target_radius - dim_radius) * lift;
		draw_node(state, ctx, scale, theme, idx, alpha, radius_mult);

		let Some((x, y)) = state.simulation.position(idx) else {
			continue;
		};
		let radius = scale.node_radius * radius_mult * state.info[idx].size;
		if hover_t > 0.01 {
			ring(ctx, x, y, radius + 2.0 / scale.k, Color::rgba(255, 255, 255, 0.8 * hover_t), 1.5 / scale.k);
		}
		if focus_t > 0.01 {
			let color = theme.node.focus_color;
			ring(ctx, x, y, radius + 3.0 / scale.k, color.with_alpha(color.a * focus_t), 2.5 / scale.k);
		}
	}
}

fn ring(ctx: &CanvasRenderingContext2d, x: f64, y: f64, radius: f64, color: Color, width: f64) {
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_stroke_style_str(&color.to_css());
	ctx.set_line_width(width);
	ctx.stroke();
}

fn draw_node(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &Scaled,
	theme: &Theme,
	idx: usize,
	alpha: f64,
	radius_mult: f64,
) {
	let (Some((x, y)), Some(info)) = (state.simulation.position(idx), state.info.get(idx)) else {
		return;
	};
	let radius = scale.node_radius * radius_mult * info.size;
	let base = Color::from_hex(&info.color);

	ctx.set_global_alpha(alpha);
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);

	let gradient = theme
		.node
		.use_gradient
		.then(|| ctx.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius))
		.and_then(Result::ok);
	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &base.lighten(0.4).to_css());
			let _ = gradient.add_color_stop(0.7, &base.to_css());
			let _ = gradient.add_color_stop(1.0, &base.darken(0.2).to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&base.to_css()),
	}
	ctx.fill();

	if alpha > 0.5 {
		ctx.set_global_alpha(alpha * 0.9);
		ctx.set_fill_style_str(&theme.node.label_color.to_css());
		ctx.set_font(&scale.label_font);
		let _ = ctx.fill_text(&info.label, x + radius + 4.0, y + 3.0);
	}
	ctx.set_global_alpha(1.0);
}
