use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::graph::EdgeKind;
use super::state::GraphView;

const EDGE_COLOR: &str = "#aaa";
const OVERRULED_COLOR: &str = "red";
const HIGHLIGHT_COLOR: &str = "#ff3e00";
const NODE_STROKE: &str = "#333";
const AXIS_COLOR: &str = "#333";
const ARROW_SIZE: f64 = 6.0;
const AXIS_TICKS: usize = 10;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(view: &GraphView, ctx: &CanvasRenderingContext2d) {
	ctx.clear_rect(0.0, 0.0, view.width, view.height);
	if !view.has_layout() {
		return;
	}
	draw_axis(view, ctx);
	draw_edges(view, ctx);
	draw_nodes(view, ctx);
	ctx.set_global_alpha(1.0);
}

fn draw_axis(view: &GraphView, ctx: &CanvasRenderingContext2d) {
	let Some(scale) = view.scale() else {
		return;
	};
	let y = view.height - view.margins().bottom;
	let (r0, r1) = scale.range();

	ctx.set_global_alpha(1.0);
	ctx.set_stroke_style_str(AXIS_COLOR);
	ctx.set_fill_style_str(AXIS_COLOR);
	ctx.set_line_width(2.0);
	ctx.begin_path();
	ctx.move_to(r0, y);
	ctx.line_to(r1, y);
	ctx.stroke();

	ctx.set_line_width(1.0);
	ctx.set_font("bold 12px sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("top");
	for year in scale.ticks(AXIS_TICKS) {
		let x = scale.scale(f64::from(year));
		ctx.begin_path();
		ctx.move_to(x, y);
		ctx.line_to(x, y + 6.0);
		ctx.stroke();
		let _ = ctx.fill_text(&year.to_string(), x, y + 9.0);
	}

	ctx.set_font("bold 14px sans-serif");
	ctx.set_text_baseline("alphabetic");
	let _ = ctx.fill_text("Year", view.width / 2.0, view.height - 15.0);
}

fn draw_edges(view: &GraphView, ctx: &CanvasRenderingContext2d) {
	let (active, t) = (
		view.has_active_highlight(),
		ease_out_cubic(view.hover.highlight_t),
	);
	let nodes = view.graph().nodes();

	for edge in view.graph().edges() {
		let (Some((x1, y1)), Some((x2, y2))) = (
			view.screen_position(edge.source),
			view.screen_position(edge.target),
		) else {
			continue;
		};
		let (rs, rt) = (nodes[edge.source].size, nodes[edge.target].size);
		let Some(geometry) = edge_geometry((x1, y1), (x2, y2), rs, rt) else {
			continue;
		};

		let touches = active && view.touches_focus(edge);
		// t=0: every edge at 0.6; t=1: focus edges at 1.0, the rest at 0.1
		let (alpha, width) = if touches {
			(0.6 + 0.4 * t, 0.5 + 1.5 * t)
		} else if active {
			(0.6 - 0.5 * t, 0.5)
		} else {
			(0.6, 0.5)
		};
		let color = match edge.kind {
			EdgeKind::OverruledBy => OVERRULED_COLOR,
			_ if touches => HIGHLIGHT_COLOR,
			_ => EDGE_COLOR,
		};

		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(color);
		ctx.set_fill_style_str(color);
		ctx.set_line_width(width);

		let ((sx, sy), (ex, ey)) = geometry.line;
		ctx.begin_path();
		ctx.move_to(sx, sy);
		ctx.line_to(ex, ey);
		ctx.stroke();

		if let Some([tip, left, right]) = geometry.head {
			ctx.begin_path();
			ctx.move_to(tip.0, tip.1);
			ctx.line_to(left.0, left.1);
			ctx.line_to(right.0, right.1);
			ctx.close_path();
			ctx.fill();
		}
	}
	ctx.set_global_alpha(1.0);
}

/// Screen-space segment of an edge plus its arrowhead triangle.
#[derive(Clone, Copy, Debug, PartialEq)]
struct EdgeGeometry {
	line: ((f64, f64), (f64, f64)),
	head: Option<[(f64, f64); 3]>,
}

/// Trims the segment to the node rims and leaves room for the arrowhead.
/// When the nodes are too close for a head, the plain center-to-center line
/// is kept and the head is dropped. Coincident endpoints draw nothing.
fn edge_geometry(from: (f64, f64), to: (f64, f64), rs: f64, rt: f64) -> Option<EdgeGeometry> {
	let (dx, dy) = (to.0 - from.0, to.1 - from.1);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 1e-9 {
		return None;
	}
	if dist <= rs + rt + ARROW_SIZE {
		return Some(EdgeGeometry {
			line: (from, to),
			head: None,
		});
	}

	let (ux, uy) = (dx / dist, dy / dist);
	let tip = (to.0 - ux * rt, to.1 - uy * rt);
	let back = (tip.0 - ux * ARROW_SIZE, tip.1 - uy * ARROW_SIZE);
	let (px, py) = (-uy * ARROW_SIZE * 0.5, ux * ARROW_SIZE * 0.5);
	Some(EdgeGeometry {
		line: ((from.0 + ux * rs, from.1 + uy * rs), back),
		head: Some([tip, (back.0 + px, back.1 + py), (back.0 - px, back.1 - py)]),
	})
}

fn draw_nodes(view: &GraphView, ctx: &CanvasRenderingContext2d) {
	let (active, t) = (
		view.has_active_highlight(),
		ease_out_cubic(view.hover.highlight_t),
	);

	for (idx, node) in view.graph().nodes().iter().enumerate() {
		if active && view.is_highlighted(idx) {
			continue;
		}
		let Some((x, y)) = view.screen_position(idx) else {
			continue;
		};
		let alpha = if active { 1.0 - 0.8 * t } else { 1.0 };
		draw_circle(ctx, x, y, node.size, node.court.color(), (NODE_STROKE, 1.0), alpha);
	}

	if !active {
		return;
	}

	// Ego-set on top of the dimmed rest.
	for (idx, node) in view.graph().nodes().iter().enumerate() {
		if !view.is_highlighted(idx) {
			continue;
		}
		let Some((x, y)) = view.screen_position(idx) else {
			continue;
		};
		let stroke_width = if view.is_hovered(idx) {
			1.0 + 2.0 * t
		} else {
			1.0 + t
		};
		draw_circle(
			ctx,
			x,
			y,
			node.size,
			node.court.color(),
			(HIGHLIGHT_COLOR, stroke_width),
			1.0,
		);
	}
}

fn draw_circle(
	ctx: &CanvasRenderingContext2d,
	x: f64,
	y: f64,
	radius: f64,
	fill: &str,
	(stroke, stroke_width): (&str, f64),
	alpha: f64,
) {
	ctx.set_global_alpha(alpha);
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(fill);
	ctx.fill();
	ctx.set_stroke_style_str(stroke);
	ctx.set_line_width(stroke_width);
	ctx.stroke();
	ctx.set_global_alpha(1.0);
}
