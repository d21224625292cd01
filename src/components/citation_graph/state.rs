//! View state shared by the renderer and the pointer handlers.

use std::collections::HashSet;

use log::{debug, info};

use super::adapt::adapt;
use super::config::{LayoutConfig, Margins};
use super::graph::{CitationGraph, Edge, GraphBuilder, NodeIndex};
use super::scale::YearScale;
use super::simulation::Simulation;
use super::tooltip::TooltipContent;
use super::types::{CitationPayload, DocumentId};

/// Smallest pointer hit radius, so minimum-size nodes stay clickable.
pub const MIN_HIT_RADIUS: f64 = 8.0;
/// Pointer travel beyond which a press counts as a drag rather than a click.
pub const CLICK_TOLERANCE: f64 = 3.0;
/// Duration of the hover highlight transition, in seconds.
pub const HIGHLIGHT_SECONDS: f64 = 0.2;

/// Pointer drag in progress, if any.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	/// Whether a node is held.
	pub active: bool,
	/// Node being dragged.
	pub node_idx: Option<NodeIndex>,
	/// Pointer x at press.
	pub start_x: f64,
	/// Pointer y at press.
	pub start_y: f64,
	/// Node x at press.
	pub node_start_x: f64,
	/// Node y at press.
	pub node_start_y: f64,
	/// Set once the pointer leaves the click tolerance.
	pub moved: bool,
}

/// Hover focus and the ego-set it lights up. `prev_*` keep the last focus
/// around while the highlight fades out.
#[derive(Clone, Debug, Default)]
pub struct HoverState {
	/// Hovered node.
	pub node: Option<NodeIndex>,
	/// Its ego-set, itself excluded.
	pub neighbors: HashSet<NodeIndex>,
	/// Highlight progress, 0 to 1.
	pub highlight_t: f64,
	/// Last hovered node, kept while the highlight fades out.
	pub prev_node: Option<NodeIndex>,
	/// Ego-set of the previous node.
	pub prev_neighbors: HashSet<NodeIndex>,
}

/// Simulation plus the scale it was laid out against.
struct Layout {
	simulation: Simulation,
	scale: YearScale,
}

/// Everything the canvas draws and the pointer handlers mutate.
///
/// The graph is rebuilt from scratch by [`GraphView::rebuild`]; the layout
/// is recreated by [`GraphView::resize`]. A layout only exists for a
/// non-empty graph in a non-zero viewport.
pub struct GraphView {
	graph: CitationGraph,
	layout: Option<Layout>,
	builder: GraphBuilder,
	config: LayoutConfig,
	/// Pointer drag.
	pub drag: DragState,
	/// Hover highlight.
	pub hover: HoverState,
	/// Viewport width in CSS pixels.
	pub width: f64,
	/// Viewport height.
	pub height: f64,
	stopped: bool,
}

impl GraphView {
	/// Builds and lays out `payload` in a `width` x `height` viewport.
	pub fn new(payload: &CitationPayload, width: f64, height: f64, config: LayoutConfig) -> Self {
		Self::with_builder(payload, width, height, config, GraphBuilder::new())
	}

	/// Like [`GraphView::new`] with a custom graph builder.
	pub fn with_builder(
		payload: &CitationPayload,
		width: f64,
		height: f64,
		config: LayoutConfig,
		builder: GraphBuilder,
	) -> Self {
		let mut view = Self {
			graph: CitationGraph::default(),
			layout: None,
			builder,
			config,
			drag: DragState::default(),
			hover: HoverState::default(),
			width,
			height,
			stopped: false,
		};
		view.rebuild(payload);
		view
	}

	/// Replaces the whole graph with one built from `payload` and lays it
	/// out again. Hover and drag state are discarded with the old graph.
	pub fn rebuild(&mut self, payload: &CitationPayload) {
		let response = adapt(payload);
		self.graph = self.builder.build(&response.relevant_documents);
		self.drag = DragState::default();
		self.hover = HoverState::default();
		self.relayout();
	}

	/// New viewport size; triggers a full re-layout. A zero-area viewport
	/// keeps the previous layout until a real measurement arrives.
	pub fn resize(&mut self, width: f64, height: f64) {
		if width <= 0.0 || height <= 0.0 {
			debug!("ignoring zero-area resize to {width}x{height}");
			return;
		}
		self.width = width;
		self.height = height;
		self.drag = DragState::default();
		self.relayout();
	}

	fn relayout(&mut self) {
		self.layout = None;
		if self.graph.is_empty() || self.width <= 0.0 || self.height <= 0.0 {
			return;
		}
		let margins = self.config.margins;
		let range = (margins.left, self.width - margins.right);
		let Some(scale) = YearScale::from_years(self.graph.nodes().iter().map(|n| n.year), range) else {
			return;
		};
		let mut simulation = Simulation::new(&self.graph, &scale, self.width, self.height, self.config.clone());
		simulation.pre_tick();
		if self.stopped {
			simulation.stop();
		}
		let (first, last) = self.graph.year_extent().unwrap_or_default();
		info!(
			"laid out {} documents from {first} to {last} in {}x{}",
			self.graph.nodes().len(),
			self.width,
			self.height
		);
		self.layout = Some(Layout { simulation, scale });
	}

	/// Graph built from the last payload.
	pub fn graph(&self) -> &CitationGraph {
		&self.graph
	}

	/// Year axis of the current layout.
	pub fn scale(&self) -> Option<&YearScale> {
		self.layout.as_ref().map(|l| &l.scale)
	}

	/// Simulation of the current layout.
	pub fn simulation(&self) -> Option<&Simulation> {
		self.layout.as_ref().map(|l| &l.simulation)
	}

	/// Plot margins.
	pub fn margins(&self) -> Margins {
		self.config.margins
	}

	/// False for an empty graph or a zero-area viewport.
	pub fn has_layout(&self) -> bool {
		self.layout.is_some()
	}

	/// Simulation position clamped into the plot area, as drawn.
	pub fn screen_position(&self, idx: NodeIndex) -> Option<(f64, f64)> {
		let (x, y) = self.simulation()?.position(idx)?;
		let r = self.graph.node(idx)?.size;
		let bottom = self.height - self.config.margins.bottom;
		Some((clamp(x, r, self.width), clamp(y, r, bottom)))
	}

	/// Topmost node under a canvas point, with a minimum hit radius for small nodes.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<NodeIndex> {
		let mut found = None;
		for (idx, node) in self.graph.nodes().iter().enumerate() {
			let Some((x, y)) = self.screen_position(idx) else {
				continue;
			};
			let (dx, dy) = (x - sx, y - sy);
			// Later nodes are drawn on top, so the last hit wins.
			if (dx * dx + dy * dy).sqrt() < node.size.max(MIN_HIT_RADIUS) {
				found = Some(idx);
			}
		}
		found
	}

	/// Moves the hover highlight; a change restarts the transition.
	pub fn set_hover(&mut self, node: Option<NodeIndex>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// Save previous state for fade-out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			self.hover.neighbors = self.graph.ego_set(idx);
			self.hover.neighbors.remove(&idx);
		}
	}

	/// Whether `idx` is in the focused ego-set.
	pub fn is_highlighted(&self, idx: NodeIndex) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	/// Whether `idx` is the focused node itself.
	pub fn is_hovered(&self, idx: NodeIndex) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	/// True while a highlight is shown or still fading.
	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	/// Whether an edge touches the focused node.
	pub fn touches_focus(&self, edge: &Edge) -> bool {
		let focus = self.hover.node.or(self.hover.prev_node);
		focus.is_some_and(|f| edge.source == f || edge.target == f)
	}

	/// Tooltip content for a node.
	pub fn tooltip_for(&self, idx: NodeIndex) -> Option<TooltipContent> {
		self.graph.node(idx).map(TooltipContent::from_node)
	}

	/// Advances the simulation by one clock tick and the highlight
	/// transition by `dt` seconds.
	pub fn tick(&mut self, dt: f64) {
		if self.stopped {
			return;
		}
		if let Some(layout) = self.layout.as_mut() {
			layout.simulation.step();
		}

		let rate = dt / HIGHLIGHT_SECONDS;
		if self.hover.node.is_some() {
			self.hover.highlight_t = (self.hover.highlight_t + rate).min(1.0);
		} else {
			self.hover.highlight_t = (self.hover.highlight_t - rate).max(0.0);
			if self.hover.highlight_t == 0.0 {
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	/// Picks up the node under the pointer, pinning it where it is and
	/// reheating the simulation.
	pub fn begin_drag(&mut self, x: f64, y: f64) -> Option<NodeIndex> {
		let idx = self.node_at_position(x, y)?;
		let reheat = self.config.drag_alpha_target;
		let layout = self.layout.as_mut()?;
		let (nx, ny) = layout.simulation.position(idx)?;
		layout.simulation.pin(idx, nx, ny);
		layout.simulation.set_alpha_target(reheat);
		if !self.stopped {
			layout.simulation.restart();
		}
		self.drag = DragState {
			active: true,
			node_idx: Some(idx),
			start_x: x,
			start_y: y,
			node_start_x: nx,
			node_start_y: ny,
			moved: false,
		};
		Some(idx)
	}

	/// Moves the pinned node with the pointer.
	pub fn drag_to(&mut self, x: f64, y: f64) {
		if !self.drag.active {
			return;
		}
		let Some(idx) = self.drag.node_idx else {
			return;
		};
		let (dx, dy) = (x - self.drag.start_x, y - self.drag.start_y);
		if (dx * dx + dy * dy).sqrt() > CLICK_TOLERANCE {
			self.drag.moved = true;
		}
		if let Some(layout) = self.layout.as_mut() {
			layout
				.simulation
				.pin(idx, self.drag.node_start_x + dx, self.drag.node_start_y + dy);
		}
	}

	/// Releases the dragged node back to the simulation. Returns the
	/// document id when the press never moved, i.e. it was a click.
	pub fn end_drag(&mut self) -> Option<DocumentId> {
		let drag = std::mem::take(&mut self.drag);
		let idx = drag.node_idx.filter(|_| drag.active)?;
		if let Some(layout) = self.layout.as_mut() {
			layout.simulation.unpin(idx);
			layout.simulation.set_alpha_target(0.0);
		}
		if drag.moved {
			None
		} else {
			self.graph.node(idx).map(|n| n.id)
		}
	}

	/// Abandons any drag without reporting a click.
	pub fn cancel_drag(&mut self) {
		if self.drag.active {
			self.drag.moved = true;
			self.end_drag();
		}
	}

	/// Halts the simulation for good; later ticks do nothing.
	pub fn stop(&mut self) {
		self.stopped = true;
		if let Some(layout) = self.layout.as_mut() {
			layout.simulation.stop();
		}
		self.hover = HoverState::default();
	}

	/// Whether ticks still move anything.
	pub fn is_running(&self) -> bool {
		!self.stopped && self.simulation().is_some_and(Simulation::is_active)
	}
}

fn clamp(value: f64, r: f64, max: f64) -> f64 {
	r.max((max - r).min(value))
}
