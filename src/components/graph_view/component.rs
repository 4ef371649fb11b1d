use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent, Window,
};

use crate::config::{ViewerOptions, search};
use crate::error::describe_js;

use super::render;
use super::search::{HighlightToken, ResetSlot};
use super::state::{SearchOutcome, ViewState};
use super::types::GraphDataset;

const NO_MATCH_MESSAGE: &str = "No matching node found.";

type SharedState = Rc<RefCell<Option<ViewState>>>;

/// Timer that will clear the current search highlight.
struct PendingReset {
	handle: i32,
	_callback: Closure<dyn FnMut()>,
}

fn window_size(window: &Window) -> (f64, f64) {
	let dim = |v: Result<JsValue, JsValue>, fallback| v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback);
	(
		dim(window.inner_width(), 800.0),
		dim(window.inner_height(), 600.0),
	)
}

fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Replace any pending highlight reset with one for `token`.
fn schedule_reset(
	state: &SharedState,
	pending: &Rc<RefCell<ResetSlot<PendingReset>>>,
	token: HighlightToken,
) {
	let Some(window) = web_sys::window() else {
		return;
	};

	let state_reset = state.clone();
	let callback = Closure::<dyn FnMut()>::new(move || {
		if let Some(ref mut s) = *state_reset.borrow_mut() {
			if s.revert_highlight(token) {
				debug!("search highlight cleared");
			}
		}
	});
	match window.set_timeout_with_callback_and_timeout_and_arguments_0(
		callback.as_ref().unchecked_ref(),
		search::RESET_DELAY_MS,
	) {
		Ok(handle) => pending.borrow_mut().schedule(
			PendingReset {
				handle,
				_callback: callback,
			},
			|prev| window.clear_timeout_with_handle(prev.handle),
		),
		Err(e) => warn!("could not schedule highlight reset: {}", describe_js(&e)),
	}
}

/// Interactive graph view with a search box.
///
/// Renders into the `#graph` container once `data` holds a dataset. Until
/// then searches are ignored.
#[component]
pub fn GraphViewer(
	#[prop(into)] data: Signal<Option<GraphDataset>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(optional)] options: Option<ViewerOptions>,
) -> impl IntoView {
	let options = options.unwrap_or_default();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let search_ref = NodeRef::<leptos::html::Input>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let pending_reset: Rc<RefCell<ResetSlot<PendingReset>>> = Rc::default();
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(dataset) = data.get() else {
			return;
		};
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if state_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			error!("no window to render into");
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window)
		} else {
			canvas
				.parent_element()
				.map(|p| (p.client_width() as f64, p.client_height() as f64))
				.filter(|&(w, h)| w > 0.0 && h > 0.0)
				.unwrap_or((800.0, 600.0))
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => {
					error!("2d context has an unexpected type");
					return;
				}
			},
			_ => {
				error!("canvas has no 2d context");
				return;
			}
		};
		info!(
			"rendering {} nodes, {} edges",
			dataset.nodes.len(),
			dataset.edges.len()
		);
		*state_init.borrow_mut() = Some(ViewState::new(dataset, options.clone(), w, h));

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = window_size(&win);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let last_frame = Rc::new(Cell::new(js_sys::Date::now()));
		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let now = js_sys::Date::now();
			let dt = ((now - last_frame.replace(now)) / 1000.0).clamp(0.0, 0.1);
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(dt);
				render::render(s, &ctx);
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let (state_search, pending_search) = (state.clone(), pending_reset.clone());
	let run_search = move || {
		let query = search_ref
			.get_untracked()
			.map(|input| input.value())
			.unwrap_or_default();
		let outcome = match state_search.borrow_mut().as_mut() {
			Some(s) => s.search(&query),
			None => {
				debug!("search ignored: graph not loaded");
				return;
			}
		};
		match outcome {
			SearchOutcome::Ignored => {}
			SearchOutcome::NoMatch => {
				if let Some(win) = web_sys::window() {
					let _ = win.alert_with_message(NO_MATCH_MESSAGE);
				}
			}
			SearchOutcome::Focused { node, token } => {
				info!("search {:?} focused node {}", query, node);
				schedule_reset(&state_search, &pending_search, token);
			}
		}
	};
	let search_click = run_search.clone();
	let on_search_click = move |_: MouseEvent| search_click();
	let on_search_key = move |ev: KeyboardEvent| {
		if ev.key() == "Enter" {
			run_search();
		}
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_move(x, y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.pointer_up();
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_leave();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.zoom_at(x, y, ev.delta_y());
		}
	};

	view! {
		<div class="graph-viewer">
			<div class="search-panel">
				<input
					id="search-bar"
					type="text"
					placeholder="Search nodes..."
					node_ref=search_ref
					on:keydown=on_search_key
				/>
				<button id="search-button" on:click=on_search_click>
					"Search"
				</button>
			</div>
			<div id="graph" class="graph-container">
				<canvas
					node_ref=canvas_ref
					class="graph-canvas"
					on:mousedown=on_mousedown
					on:mousemove=on_mousemove
					on:mouseup=on_mouseup
					on:mouseleave=on_mouseleave
					on:wheel=on_wheel
					style="display: block; cursor: grab;"
				/>
			</div>
		</div>
	}
}
