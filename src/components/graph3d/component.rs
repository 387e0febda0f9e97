use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use leptos::prelude::*;
use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::Graph3dState;
use super::types::GraphData;

const TOOLTIP_OFFSET_X: f64 = 15.0;
const TOOLTIP_OFFSET_Y: f64 = -10.0;

thread_local! {
	// Window listeners cannot live in component state: leptos cleanup
	// closures must be Send + Sync, and Closure handles are neither.
	// Cleanup carries the Copy id instead and resolves it here.
	static RESIZE_LISTENERS: RefCell<HashMap<u64, Closure<dyn FnMut()>>> =
		RefCell::new(HashMap::new());
}

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(0);

fn attach_resize_listener(cb: Closure<dyn FnMut()>) -> u64 {
	let id = NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed);
	if let Some(window) = web_sys::window() {
		let f: &js_sys::Function = cb.as_ref().unchecked_ref();
		let _ = window.add_event_listener_with_callback("resize", f);
	}
	RESIZE_LISTENERS.with(|listeners| listeners.borrow_mut().insert(id, cb));
	id
}

fn detach_resize_listener(id: u64) {
	RESIZE_LISTENERS.with(|listeners| {
		if let Some(cb) = listeners.borrow_mut().remove(&id) {
			if let Some(window) = web_sys::window() {
				let f: &js_sys::Function = cb.as_ref().unchecked_ref();
				let _ = window.remove_event_listener_with_callback("resize", f);
			}
		}
	});
}

#[derive(Clone, Debug)]
struct HoverInfo {
	label: String,
	x: f64,
	y: f64,
	z: f64,
	index: usize,
	left: f64,
	top: f64,
}

fn hover_info(state: &Graph3dState, idx: usize, x: f64, y: f64) -> Option<HoverInfo> {
	let node = state.graph.as_ref()?.nodes.get(idx)?;
	Some(HoverInfo {
		label: node.label.clone(),
		x: node.x,
		y: node.y,
		z: node.z,
		index: idx,
		left: x + TOOLTIP_OFFSET_X,
		top: y + TOOLTIP_OFFSET_Y,
	})
}

/// Interactive 3D graph on a 2D canvas: drag orbits, wheel and the
/// overlay buttons dolly, double-click resets, hovering a node shows its
/// label and world coordinates.
#[component]
pub fn Graph3dCanvas(
	#[prop(into)] data: Signal<Option<GraphData>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<Graph3dState>>> = Rc::new(RefCell::new(None));
	let context: Rc<RefCell<Option<CanvasRenderingContext2d>>> = Rc::new(RefCell::new(None));
	let resize_listener: Arc<Mutex<Option<u64>>> = Arc::new(Mutex::new(None));
	let tooltip = RwSignal::new(None::<HoverInfo>);
	let dragging = RwSignal::new(false);

	let (state_init, context_init, resize_init) =
		(state.clone(), context.clone(), resize_listener.clone());
	Effect::new(move |_| {
		let graph = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		if state_init.borrow().is_none() {
			let window: Window = web_sys::window().unwrap();
			let (w, h) = if fullscreen {
				(
					window.inner_width().unwrap().as_f64().unwrap(),
					window.inner_height().unwrap().as_f64().unwrap(),
				)
			} else {
				(
					width.unwrap_or_else(|| {
						canvas
							.parent_element()
							.map(|p| p.client_width() as f64)
							.unwrap_or(800.0)
					}),
					height.unwrap_or_else(|| {
						canvas
							.parent_element()
							.map(|p| p.client_height() as f64)
							.unwrap_or(600.0)
					}),
				)
			};
			canvas.set_width(w as u32);
			canvas.set_height(h as u32);

			let ctx: CanvasRenderingContext2d = canvas
				.get_context("2d")
				.unwrap()
				.unwrap()
				.dyn_into()
				.unwrap();
			*context_init.borrow_mut() = Some(ctx);
			*state_init.borrow_mut() = Some(Graph3dState::new(w, h));
			debug!("graph3d canvas initialized at {}x{}", w, h);

			let (state_resize, context_resize, canvas_resize) =
				(state_init.clone(), context_init.clone(), canvas.clone());
			let cb: Closure<dyn FnMut()> = Closure::new(move || {
				let (nw, nh) = if fullscreen {
					let win: Window = web_sys::window().unwrap();
					(
						win.inner_width().unwrap().as_f64().unwrap(),
						win.inner_height().unwrap().as_f64().unwrap(),
					)
				} else {
					(
						width.unwrap_or_else(|| {
							canvas_resize
								.parent_element()
								.map(|p| p.client_width() as f64)
								.unwrap_or(800.0)
						}),
						height.unwrap_or_else(|| {
							canvas_resize
								.parent_element()
								.map(|p| p.client_height() as f64)
								.unwrap_or(600.0)
						}),
					)
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
					if let Some(ref ctx) = *context_resize.borrow() {
						render::render(s, ctx);
					}
				}
			});
			if let Ok(mut slot) = resize_init.lock() {
				*slot = Some(attach_resize_listener(cb));
			}
		}

		if let Some(ref mut s) = *state_init.borrow_mut() {
			match graph {
				Some(g) => {
					debug!("graph loaded: {} nodes, {} edges", g.nodes.len(), g.edges.len());
					s.load_graph(g);
				}
				None => s.clear(),
			}
			if let Some(ref ctx) = *context_init.borrow() {
				render::render(s, ctx);
			}
		}
	});

	let resize_cleanup = resize_listener.clone();
	on_cleanup(move || {
		if let Ok(mut slot) = resize_cleanup.lock() {
			if let Some(id) = slot.take() {
				detach_resize_listener(id);
			}
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.drag.active = true;
			s.drag.last_x = ev.client_x() as f64;
			s.drag.last_y = ev.client_y() as f64;
			dragging.set(true);
		}
	};

	let (state_mm, context_mm) = (state.clone(), context.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.drag.active {
				let (dx, dy) = (
					ev.client_x() as f64 - s.drag.last_x,
					ev.client_y() as f64 - s.drag.last_y,
				);
				s.drag.last_x = ev.client_x() as f64;
				s.drag.last_y = ev.client_y() as f64;
				s.drag_rotate(dx, dy);
				if let Some(ref ctx) = *context_mm.borrow() {
					render::render(s, ctx);
				}
			} else {
				let hovered = s.node_at_position(x, y);
				if s.set_hover(hovered) {
					tooltip.set(hovered.and_then(|idx| hover_info(s, idx, x, y)));
					if let Some(ref ctx) = *context_mm.borrow() {
						render::render(s, ctx);
					}
				} else if hovered.is_some() {
					// same node, keep the card tracking the pointer
					tooltip.update(|tip| {
						if let Some(tip) = tip {
							tip.left = x + TOOLTIP_OFFSET_X;
							tip.top = y + TOOLTIP_OFFSET_Y;
						}
					});
				}
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.drag.active = false;
		}
		dragging.set(false);
	};

	let (state_ml, context_ml) = (state.clone(), context.clone());
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.drag.active = false;
			if s.set_hover(None) {
				if let Some(ref ctx) = *context_ml.borrow() {
					render::render(s, ctx);
				}
			}
		}
		dragging.set(false);
		tooltip.set(None);
	};

	let (state_wh, context_wh) = (state.clone(), context.clone());
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.wheel_zoom(ev.delta_y());
			if let Some(ref ctx) = *context_wh.borrow() {
				render::render(s, ctx);
			}
		}
	};

	let (state_dc, context_dc) = (state.clone(), context.clone());
	let on_dblclick = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_dc.borrow_mut() {
			s.reset_view();
			tooltip.set(None);
			if let Some(ref ctx) = *context_dc.borrow() {
				render::render(s, ctx);
			}
		}
	};

	let (state_zi, context_zi) = (state.clone(), context.clone());
	let on_zoom_in = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_zi.borrow_mut() {
			s.zoom_in();
			if let Some(ref ctx) = *context_zi.borrow() {
				render::render(s, ctx);
			}
		}
	};

	let (state_zo, context_zo) = (state.clone(), context.clone());
	let on_zoom_out = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_zo.borrow_mut() {
			s.zoom_out();
			if let Some(ref ctx) = *context_zo.borrow() {
				render::render(s, ctx);
			}
		}
	};

	let (state_rv, context_rv) = (state.clone(), context.clone());
	let on_reset = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_rv.borrow_mut() {
			s.reset_view();
			tooltip.set(None);
			if let Some(ref ctx) = *context_rv.borrow() {
				render::render(s, ctx);
			}
		}
	};

	view! {
		<div class="graph3d-container" style="position: relative;">
			<canvas
				node_ref=canvas_ref
				class="graph3d-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				on:dblclick=on_dblclick
				style=move || {
					format!(
						"display: block; cursor: {};",
						if dragging.get() { "grabbing" } else { "grab" },
					)
				}
			/>
			<div class="graph3d-controls">
				<button on:click=on_zoom_in title="Zoom in">"+"</button>
				<button on:click=on_zoom_out title="Zoom out">"\u{2212}"</button>
				<button on:click=on_reset title="Reset view">"\u{27f2}"</button>
			</div>
			{move || {
				tooltip
					.get()
					.map(|tip| {
						view! {
							<div
								class="graph3d-tooltip"
								style=format!(
									"position: absolute; left: {}px; top: {}px; pointer-events: none;",
									tip.left,
									tip.top,
								)
							>
								<div class="tooltip-label">{tip.label.clone()}</div>
								<div>{format!("x: {:.2}", tip.x)}</div>
								<div>{format!("y: {:.2}", tip.y)}</div>
								<div>{format!("z: {:.2}", tip.z)}</div>
								<div class="tooltip-index">{format!("Node #{}", tip.index)}</div>
							</div>
						}
					})
			}}
		</div>
	}
}
