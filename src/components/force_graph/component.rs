//! Leptos component wrapping the correlation graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel event
//! handlers for node dragging, clicking, panning, and zooming. An animation
//! loop runs via `requestAnimationFrame`, advancing the layout simulation and
//! rendering each frame. The layout state is rebuilt from scratch whenever the
//! explorer loads a new result.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render::{self, HIT_RADIUS};
use super::state::ForceGraphState;
use super::theme::Theme;
use crate::components::context::ExplorerContext;
use crate::sync::Origin;

/// Largest frame gap fed to the simulation, in seconds. Longer gaps (a
/// backgrounded tab) are treated as a single slow frame.
const MAX_FRAME_GAP: f64 = 0.25;

/// Graph state plus the theme it is drawn with.
struct GraphContext {
	state: ForceGraphState,
	theme: Theme,
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Renders the report correlation graph on a canvas element.
///
/// Reads the active graph, focus, and configuration from the surrounding
/// [`ExplorerContext`]. Clicking a node selects its report. The component
/// sizes itself to its parent container by default; set `fullscreen = true`
/// to fill the viewport. Explicit `width`/`height` override automatic sizing.
#[component]
pub fn ForceGraphCanvas(
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let explorer = expect_context::<ExplorerContext>();
	let config = explorer.config();

	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let hover_title = RwSignal::new(String::new());
	let context: Rc<RefCell<Option<GraphContext>>> = Rc::new(RefCell::new(None));
	let size = Rc::new(Cell::new((0.0, 0.0)));
	let animate: FrameCallback = Rc::new(RefCell::new(None));
	let resize_cb: FrameCallback = Rc::new(RefCell::new(None));

	// Canvas setup and the animation loop, once the element is mounted.
	let (context_init, size_init) = (context.clone(), size.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if animate.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = measure(&canvas, fullscreen, width, height);
		apply_size(&canvas, &context_init, &size_init, w, h);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => {
					log::error!("graph view: 2d context has an unexpected type");
					return;
				}
			},
			_ => {
				log::error!("graph view: canvas has no 2d context");
				return;
			}
		};

		let (context_resize, size_resize, canvas_resize) =
			(context_init.clone(), size_init.clone(), canvas.clone());
		*resize_cb.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = measure(&canvas_resize, fullscreen, width, height);
			apply_size(&canvas_resize, &context_resize, &size_resize, nw, nh);
		}));
		if let Some(ref cb) = *resize_cb.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (context_anim, size_anim, animate_inner) =
			(context_init.clone(), size_init.clone(), animate.clone());
		let last_frame = Cell::new(js_sys::Date::now());
		*animate.borrow_mut() = Some(Closure::new(move || {
			let now = js_sys::Date::now();
			let dt = ((now - last_frame.replace(now)) / 1000.0).clamp(0.0, MAX_FRAME_GAP);
			// A container that was hidden at mount gets measured again until it shows.
			if size_anim.get() == (0.0, 0.0) {
				let (nw, nh) = measure(&canvas, fullscreen, width, height);
				apply_size(&canvas, &context_anim, &size_anim, nw, nh);
			}
			let pins = explorer.take_pin_requests();
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				for request in pins {
					c.state.apply_pin(request);
				}
				c.state.tick(dt);
				render::render(&c.state, &ctx, &c.theme);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// A new result replaces the layout entirely.
	let (context_load, size_load) = (context.clone(), size.clone());
	let simulation = config.simulation.clone();
	let theme_name = config.theme.clone();
	Effect::new(move |_| {
		explorer.generation.track();
		let graph = explorer.with(|e| e.graph().as_ref().clone());
		let focus = explorer.focus.get_untracked();
		if let Some(canvas) = canvas_ref.get_untracked() {
			let canvas: HtmlCanvasElement = canvas.into();
			let (nw, nh) = measure(&canvas, fullscreen, width, height);
			apply_size(&canvas, &context_load, &size_load, nw, nh);
		}
		let (w, h) = size_load.get();

		let mut state = ForceGraphState::new(graph, w, h, simulation.clone());
		state.set_focus(focus);
		*context_load.borrow_mut() = Some(GraphContext {
			state,
			theme: Theme::named(&theme_name),
		});
	});

	let context_focus = context.clone();
	Effect::new(move |_| {
		let focus = explorer.focus.get();
		if let Some(ref mut c) = *context_focus.borrow_mut() {
			c.state.set_focus(focus);
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_md.borrow_mut() {
			let hit_radius = HIT_RADIUS.max(5.0 / c.state.transform.k);
			if let Some(idx) = c.state.node_at_position(x, y, hit_radius) {
				c.state.press_node(idx, x, y);
			} else {
				c.state.start_pan(x, y);
			}
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			if c.state.drag.active {
				c.state.move_pointer(x, y);
			} else {
				let hit_radius = HIT_RADIUS.max(5.0 / c.state.transform.k);
				let hovered = c.state.node_at_position(x, y, hit_radius);
				c.state.set_hover(hovered);
				let title = c.state.hovered_title().unwrap_or_default().to_owned();
				if hover_title.get_untracked() != title {
					hover_title.set(title);
				}
				if c.state.pan.active {
					c.state.transform.x = c.state.pan.transform_start_x + (x - c.state.pan.start_x);
					c.state.transform.y = c.state.pan.transform_start_y + (y - c.state.pan.start_y);
				}
			}
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		let clicked = context_mu
			.borrow_mut()
			.as_mut()
			.and_then(|c| c.state.release());
		// The borrow is gone before selection feeds back into the focus effect.
		if let Some(id) = clicked {
			explorer.select(id, Origin::Graph);
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			// Leaving mid-press never counts as a click.
			let _ = c.state.release();
			c.state.set_hover(None);
			hover_title.set(String::new());
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (c.state.transform.k * factor).clamp(0.1, 10.0);
			let ratio = new_k / c.state.transform.k;
			c.state.transform.x = x - (x - c.state.transform.x) * ratio;
			c.state.transform.y = y - (y - c.state.transform.y) * ratio;
			c.state.transform.k = new_k;
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			title=move || hover_title.get()
			style="display: block; cursor: grab;"
		/>
	}
}

/// Pointer position relative to the canvas' top-left corner.
fn pointer_position(
	canvas_ref: NodeRef<leptos::html::Canvas>,
	ev: &MouseEvent,
) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Current drawing size. May be zero while the container is still hidden.
fn measure(
	canvas: &HtmlCanvasElement,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	if fullscreen {
		let inner = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
		return web_sys::window()
			.map(|w| (inner(w.inner_width()), inner(w.inner_height())))
			.unwrap_or((0.0, 0.0));
	}
	let parent = canvas.parent_element();
	(
		width.unwrap_or_else(|| parent.as_ref().map_or(0.0, |p| p.client_width() as f64)),
		height.unwrap_or_else(|| parent.as_ref().map_or(0.0, |p| p.client_height() as f64)),
	)
}

fn apply_size(
	canvas: &HtmlCanvasElement,
	context: &Rc<RefCell<Option<GraphContext>>>,
	size: &Cell<(f64, f64)>,
	w: f64,
	h: f64,
) {
	if w <= 0.0 || h <= 0.0 {
		log::debug!("graph view: container is {w}x{h}, waiting for a usable size");
		return;
	}
	size.set((w, h));
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);
	if let Some(ref mut c) = *context.borrow_mut() {
		c.state.resize(w, h);
	}
}
