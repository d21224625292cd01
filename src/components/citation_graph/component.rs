use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, info};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, MouseEvent};

use super::config::{LayoutConfig, SizeConfig};
use super::error::CanvasError;
use super::graph::GraphBuilder;
use super::legend::CitationLegend;
use super::render;
use super::state::GraphView;
use super::tooltip::Tooltip;
use super::types::{CitationPayload, DocumentId};

const FRAME_SECONDS: f64 = 1.0 / 60.0;

/// State shared by the effect, the frame loop and the pointer handlers.
#[derive(Default)]
struct Runtime {
	view: RefCell<Option<GraphView>>,
	tooltip: RefCell<Option<Tooltip>>,
	animate: RefCell<Option<Closure<dyn FnMut()>>>,
	resize_cb: RefCell<Option<Closure<dyn FnMut()>>>,
	frame: Cell<Option<i32>>,
	started: Cell<bool>,
	alive: Cell<bool>,
}

impl Runtime {
	/// Stops the frame loop and detaches everything added outside the
	/// component: the tooltip element and the window resize listener.
	fn teardown(&self) {
		self.alive.set(false);
		if let Some(window) = web_sys::window() {
			if let Some(handle) = self.frame.take() {
				let _ = window.cancel_animation_frame(handle);
			}
			if let Some(cb) = self.resize_cb.borrow_mut().take() {
				let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
		if let Some(view) = self.view.borrow_mut().as_mut() {
			view.stop();
		}
		self.tooltip.borrow_mut().take();
		// Breaks the closure -> runtime reference cycle.
		self.animate.borrow_mut().take();
		info!("citation graph torn down");
	}

	fn request_frame(&self) {
		let Some(window) = web_sys::window() else {
			return;
		};
		if let Some(cb) = self.animate.borrow().as_ref() {
			match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				Ok(handle) => self.frame.set(Some(handle)),
				Err(err) => error!("requestAnimationFrame failed: {err:?}"),
			}
		}
	}
}

fn measure(container: &Element) -> (f64, f64) {
	(
		f64::from(container.client_width()),
		f64::from(container.client_height()),
	)
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?;
	let rect = canvas.get_bounding_client_rect();
	Some((
		f64::from(ev.client_x()) - rect.left(),
		f64::from(ev.client_y()) - rect.top(),
	))
}

/// Attaches the tooltip, the resize listener and the frame loop.
fn start(runtime: &Rc<Runtime>, canvas: &HtmlCanvasElement, container: Element) -> Result<(), CanvasError> {
	let window = web_sys::window().ok_or(CanvasError::NoWindow)?;
	let document = window.document().ok_or(CanvasError::NoDocument)?;
	let ctx: CanvasRenderingContext2d = canvas
		.get_context("2d")?
		.ok_or(CanvasError::NoContext)?
		.dyn_into()
		.map_err(|_| CanvasError::NoContext)?;

	*runtime.tooltip.borrow_mut() = Some(Tooltip::attach(&document)?);

	let (rt, canvas_resize) = (runtime.clone(), canvas.clone());
	let resize_cb = Closure::<dyn FnMut()>::new(move || {
		let (w, h) = measure(&container);
		if w <= 0.0 || h <= 0.0 {
			return;
		}
		canvas_resize.set_width(w as u32);
		canvas_resize.set_height(h as u32);
		if let Some(view) = rt.view.borrow_mut().as_mut() {
			view.resize(w, h);
		}
	});
	window.add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref())?;
	*runtime.resize_cb.borrow_mut() = Some(resize_cb);

	let rt = runtime.clone();
	*runtime.animate.borrow_mut() = Some(Closure::new(move || {
		if !rt.alive.get() {
			return;
		}
		if let Some(view) = rt.view.borrow_mut().as_mut() {
			view.tick(FRAME_SECONDS);
			render::render(view, &ctx);
		}
		rt.request_frame();
	}));

	runtime.alive.set(true);
	runtime.request_frame();
	info!("citation graph mounted");
	Ok(())
}

/// Year-anchored citation network drawn on a canvas that fills its
/// container.
///
/// Every new `data` value rebuilds the graph from scratch. Clicking a node
/// (pressing without dragging it) reports its document id through
/// `on_node_click`.
#[component]
pub fn CitationGraphCanvas(
	/// Citation payload in either upstream shape.
	#[prop(into)]
	data: Signal<CitationPayload>,
	/// Called with the document id of a clicked node.
	#[prop(optional)]
	on_node_click: Option<Callback<DocumentId>>,
	/// Layout tunables; defaults when omitted.
	#[prop(optional)]
	config: Option<LayoutConfig>,
	/// Degree-to-radius mapping; defaults when omitted.
	#[prop(optional)]
	sizing: Option<SizeConfig>,
) -> impl IntoView {
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let runtime = Rc::new(Runtime::default());
	let config = config.unwrap_or_default();
	let builder = GraphBuilder::new().with_sizing(sizing.unwrap_or_default());

	let runtime_init = runtime.clone();
	Effect::new(move |_| {
		let payload = data.get();
		let (Some(container), Some(canvas)) = (container_ref.get(), canvas_ref.get()) else {
			return;
		};
		let container: Element = container.into();

		if !runtime_init.started.get() {
			runtime_init.started.set(true);
			if let Err(err) = start(&runtime_init, &canvas, container.clone()) {
				error!("citation graph setup failed: {err}");
				return;
			}
		}

		let (w, h) = measure(&container);
		if w > 0.0 && h > 0.0 {
			canvas.set_width(w as u32);
			canvas.set_height(h as u32);
		}

		let mut slot = runtime_init.view.borrow_mut();
		match slot.as_mut() {
			Some(view) => {
				if w > 0.0 && h > 0.0 {
					view.width = w;
					view.height = h;
				}
				view.rebuild(&payload);
			}
			None => {
				*slot = Some(GraphView::with_builder(
					&payload,
					w,
					h,
					config.clone(),
					builder.clone(),
				))
			}
		}
	});

	let teardown = StoredValue::new_local(runtime.clone());
	on_cleanup(move || {
		let _ = teardown.try_with_value(|rt| rt.teardown());
	});

	let rt_md = runtime.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(view) = rt_md.view.borrow_mut().as_mut() {
			view.begin_drag(x, y);
		}
	};

	let rt_mm = runtime.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		let mut slot = rt_mm.view.borrow_mut();
		let Some(view) = slot.as_mut() else {
			return;
		};

		let hovered = if view.drag.active {
			view.drag_to(x, y);
			view.hover.node
		} else {
			view.node_at_position(x, y)
		};
		let changed = hovered != view.hover.node;
		view.set_hover(hovered);

		let (page_x, page_y) = (f64::from(ev.page_x()), f64::from(ev.page_y()));
		if let Some(tooltip) = rt_mm.tooltip.borrow().as_ref() {
			let result = match hovered.and_then(|idx| view.tooltip_for(idx)) {
				Some(content) if changed => tooltip.show(&content, page_x, page_y),
				Some(_) => tooltip.move_to(page_x, page_y),
				None => tooltip.hide(),
			};
			if let Err(err) = result {
				error!("tooltip update failed: {err}");
			}
		}
		if changed && let Some(canvas) = canvas_ref.get() {
			let cursor = if hovered.is_some() { "pointer" } else { "default" };
			let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", cursor);
		}
	};

	let rt_mu = runtime.clone();
	let on_mouseup = move |_: MouseEvent| {
		let clicked = rt_mu.view.borrow_mut().as_mut().and_then(GraphView::end_drag);
		if let (Some(id), Some(callback)) = (clicked, on_node_click) {
			info!("citation node {id} clicked");
			callback.run(id);
		}
	};

	let rt_ml = runtime.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(view) = rt_ml.view.borrow_mut().as_mut() {
			view.cancel_drag();
			view.set_hover(None);
		}
		if let Some(tooltip) = rt_ml.tooltip.borrow().as_ref() {
			let _ = tooltip.hide();
		}
	};

	view! {
		<div
			node_ref=container_ref
			class="citation-graph"
			style="position: relative; width: 100%; height: 100%;"
		>
			<canvas
				node_ref=canvas_ref
				class="citation-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				style="display: block; position: absolute; top: 0; left: 0;"
			/>
		</div>
		<CitationLegend />
	}
}
