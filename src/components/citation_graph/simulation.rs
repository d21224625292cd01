//! Year-anchored force simulation.
//!
//! Velocity-Verlet integration with a cooling `alpha`: every tick the link,
//! charge, center, x, y and collision forces adjust node velocities, then
//! velocities decay and move the nodes. The x force pulls each node toward
//! its year on a [`YearScale`], which is what turns the layout into a
//! timeline; y is left free for the other forces to resolve overlaps.
//!
//! Positions have a single writer at a time. The simulation owns a node's
//! position unless it is pinned (`fx`/`fy`), in which case the pin wins and
//! the simulation only reads it.

use std::f64::consts::PI;

use log::debug;

use super::config::LayoutConfig;
use super::graph::{CitationGraph, NodeIndex};
use super::scale::YearScale;

const MAX_SETTLE_SWEEPS: usize = 1000;
const SETTLE_SLACK: f64 = 1e-6;

/// Position, velocity and optional pin of one node.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Body {
	/// Horizontal position.
	pub x: f64,
	/// Vertical position.
	pub y: f64,
	/// Horizontal velocity, decayed each tick.
	pub vx: f64,
	/// Vertical velocity.
	pub vy: f64,
	/// Pinned x; wins over the forces while set.
	pub fx: Option<f64>,
	/// Pinned y.
	pub fy: Option<f64>,
}

struct Link {
	source: NodeIndex,
	target: NodeIndex,
	strength: f64,
	bias: f64,
}

/// Deterministic generator for the tiny offsets that separate coincident
/// nodes.
struct Lcg(u64);

impl Lcg {
	fn next(&mut self) -> f64 {
		self.0 = (1_664_525 * self.0 + 1_013_904_223) % 4_294_967_296;
		self.0 as f64 / 4_294_967_296.0
	}

	fn jiggle(&mut self) -> f64 {
		(self.next() - 0.5) * 1e-6
	}
}

/// Force layout over the nodes of one [`CitationGraph`], in graph index order.
pub struct Simulation {
	bodies: Vec<Body>,
	links: Vec<Link>,
	target_x: Vec<f64>,
	radii: Vec<f64>,
	center: (f64, f64),
	alpha: f64,
	alpha_target: f64,
	stopped: bool,
	config: LayoutConfig,
	random: Lcg,
}

impl Simulation {
	/// Seeds node positions on a phyllotaxis spiral around the viewport
	/// center; nothing moves until the first tick.
	pub fn new(graph: &CitationGraph, scale: &YearScale, width: f64, height: f64, config: LayoutConfig) -> Self {
		let center = (width / 2.0, height / 2.0);
		let golden_angle = PI * (3.0 - 5f64.sqrt());
		let bodies = (0..graph.nodes().len())
			.map(|i| {
				let radius = 10.0 * (0.5 + i as f64).sqrt();
				let angle = i as f64 * golden_angle;
				Body {
					x: center.0 + radius * angle.cos(),
					y: center.1 + radius * angle.sin(),
					..Body::default()
				}
			})
			.collect();

		let mut degree = vec![0usize; graph.nodes().len()];
		for edge in graph.edges() {
			if edge.source != edge.target {
				degree[edge.source] += 1;
				degree[edge.target] += 1;
			}
		}
		let links = graph
			.edges()
			.iter()
			.filter(|e| e.source != e.target)
			.map(|e| {
				let (ds, dt) = (degree[e.source] as f64, degree[e.target] as f64);
				Link {
					source: e.source,
					target: e.target,
					strength: 1.0 / ds.min(dt),
					bias: ds / (ds + dt),
				}
			})
			.collect();

		Self {
			bodies,
			links,
			target_x: graph
				.nodes()
				.iter()
				.map(|n| scale.scale(f64::from(n.year)))
				.collect(),
			radii: graph
				.nodes()
				.iter()
				.map(|n| n.size + config.collision_padding)
				.collect(),
			center,
			alpha: 1.0,
			alpha_target: 0.0,
			stopped: false,
			config,
			random: Lcg(1),
		}
	}

	/// Bodies in node index order.
	pub fn bodies(&self) -> &[Body] {
		&self.bodies
	}

	/// Current simulated position of a node.
	pub fn position(&self, idx: NodeIndex) -> Option<(f64, f64)> {
		self.bodies.get(idx).map(|b| (b.x, b.y))
	}

	/// Current temperature.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Whether the animation clock should keep ticking.
	pub fn is_active(&self) -> bool {
		!self.stopped
	}

	/// Runs the configured number of synchronous ticks, then separates any
	/// circles still overlapping so the first paint is already settled.
	pub fn pre_tick(&mut self) {
		for _ in 0..self.config.pre_ticks {
			self.tick();
		}
		let sweeps = self.settle_overlaps();
		debug!(
			"pre-ticked {} nodes: alpha {:.4}, {} overlap sweeps",
			self.bodies.len(),
			self.alpha,
			sweeps
		);
	}

	/// One clock-driven step. Stops the clock once alpha cools below
	/// `alpha_min`; returns whether a tick ran.
	pub fn step(&mut self) -> bool {
		if self.stopped {
			return false;
		}
		self.tick();
		if self.alpha < self.config.alpha_min {
			self.stopped = true;
		}
		true
	}

	/// One force pass and integration step, ignoring the clock.
	pub fn tick(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;

		self.apply_links();
		self.apply_charge();
		self.apply_center();
		self.apply_x();
		self.apply_y();
		self.apply_collision();

		let keep = 1.0 - self.config.velocity_decay;
		for body in &mut self.bodies {
			match body.fx {
				Some(fx) => {
					body.x = fx;
					body.vx = 0.0;
				}
				None => {
					body.vx *= keep;
					body.x += body.vx;
				}
			}
			match body.fy {
				Some(fy) => {
					body.y = fy;
					body.vy = 0.0;
				}
				None => {
					body.vy *= keep;
					body.y += body.vy;
				}
			}
		}
	}

	/// Temperature the clock eases toward; non-zero keeps it warm while dragging.
	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
	}

	/// Resumes the clock after [`Simulation::stop`] or cooling down.
	pub fn restart(&mut self) {
		self.stopped = false;
	}

	/// Stops the clock; `step` does nothing afterwards.
	pub fn stop(&mut self) {
		self.stopped = true;
	}

	/// Holds a node at `(x, y)` until [`Simulation::unpin`].
	pub fn pin(&mut self, idx: NodeIndex, x: f64, y: f64) {
		if let Some(body) = self.bodies.get_mut(idx) {
			body.fx = Some(x);
			body.fy = Some(y);
		}
	}

	/// Hands the node back to the forces.
	pub fn unpin(&mut self, idx: NodeIndex) {
		if let Some(body) = self.bodies.get_mut(idx) {
			body.fx = None;
			body.fy = None;
		}
	}

	fn apply_links(&mut self) {
		let (distance, alpha) = (self.config.link_distance, self.alpha);
		for link in &self.links {
			let (s, t) = (self.bodies[link.source], self.bodies[link.target]);
			let mut x = t.x + t.vx - s.x - s.vx;
			let mut y = t.y + t.vy - s.y - s.vy;
			if x == 0.0 {
				x = self.random.jiggle();
			}
			if y == 0.0 {
				y = self.random.jiggle();
			}
			let l = (x * x + y * y).sqrt();
			let l = (l - distance) / l * alpha * link.strength;
			let (x, y) = (x * l, y * l);

			let target = &mut self.bodies[link.target];
			target.vx -= x * link.bias;
			target.vy -= y * link.bias;
			let source = &mut self.bodies[link.source];
			source.vx += x * (1.0 - link.bias);
			source.vy += y * (1.0 - link.bias);
		}
	}

	fn apply_charge(&mut self) {
		let strength = self.config.charge_strength * self.alpha;
		let n = self.bodies.len();
		for i in 0..n {
			let (mut dvx, mut dvy) = (0.0, 0.0);
			for j in 0..n {
				if i == j {
					continue;
				}
				let mut dx = self.bodies[j].x - self.bodies[i].x;
				let mut dy = self.bodies[j].y - self.bodies[i].y;
				if dx == 0.0 {
					dx = self.random.jiggle();
				}
				if dy == 0.0 {
					dy = self.random.jiggle();
				}
				let mut l = dx * dx + dy * dy;
				if l < 1.0 {
					l = l.sqrt();
				}
				dvx += dx * strength / l;
				dvy += dy * strength / l;
			}
			self.bodies[i].vx += dvx;
			self.bodies[i].vy += dvy;
		}
	}

	fn apply_center(&mut self) {
		let n = self.bodies.len();
		if n == 0 {
			return;
		}
		let (sx, sy) = self
			.bodies
			.iter()
			.fold((0.0, 0.0), |(sx, sy), b| (sx + b.x, sy + b.y));
		let (dx, dy) = (sx / n as f64 - self.center.0, sy / n as f64 - self.center.1);
		for body in &mut self.bodies {
			body.x -= dx;
			body.y -= dy;
		}
	}

	fn apply_x(&mut self) {
		let k = self.config.x_strength * self.alpha;
		for (body, target) in self.bodies.iter_mut().zip(&self.target_x) {
			body.vx += (target - body.x) * k;
		}
	}

	fn apply_y(&mut self) {
		let k = self.config.y_strength * self.alpha;
		let target = self.center.1;
		for body in &mut self.bodies {
			body.vy += (target - body.y) * k;
		}
	}

	fn apply_collision(&mut self) {
		let n = self.bodies.len();
		for i in 0..n {
			let ri = self.radii[i];
			let ri2 = ri * ri;
			let xi = self.bodies[i].x + self.bodies[i].vx;
			let yi = self.bodies[i].y + self.bodies[i].vy;
			for j in (i + 1)..n {
				let rj = self.radii[j];
				let r = ri + rj;
				let other = self.bodies[j];
				let mut x = xi - other.x - other.vx;
				let mut y = yi - other.y - other.vy;
				let mut l = x * x + y * y;
				if l >= r * r {
					continue;
				}
				if x == 0.0 {
					x = self.random.jiggle();
					l += x * x;
				}
				if y == 0.0 {
					y = self.random.jiggle();
					l += y * y;
				}
				let d = l.sqrt();
				let k = (r - d) / d;
				let (x, y) = (x * k, y * k);
				let share = rj * rj / (ri2 + rj * rj);
				self.bodies[i].vx += x * share;
				self.bodies[i].vy += y * share;
				self.bodies[j].vx -= x * (1.0 - share);
				self.bodies[j].vy -= y * (1.0 - share);
			}
		}
	}

	/// Pushes overlapping pairs apart along their center line until every
	/// pair is at least its combined collision radius apart. Pinned nodes
	/// stay put. Returns the number of sweeps used.
	fn settle_overlaps(&mut self) -> usize {
		let n = self.bodies.len();
		for sweep in 0..MAX_SETTLE_SWEEPS {
			let mut moved = false;
			for i in 0..n {
				for j in (i + 1)..n {
					let (a, b) = (self.bodies[i], self.bodies[j]);
					let wa = if a.fx.is_some() { 0.0 } else { 1.0 };
					let wb = if b.fx.is_some() { 0.0 } else { 1.0 };
					if wa + wb == 0.0 {
						continue;
					}
					let required = self.radii[i] + self.radii[j];
					let (dx, dy) = (b.x - a.x, b.y - a.y);
					let dist = (dx * dx + dy * dy).sqrt();
					if dist >= required {
						continue;
					}
					let (ux, uy) = if dist < 1e-9 {
						let angle = (i as f64 * 0.618_034 + j as f64 * 0.414_214) * 2.0 * PI;
						(angle.cos(), angle.sin())
					} else {
						(dx / dist, dy / dist)
					};
					let push = required - dist + SETTLE_SLACK;
					let (pa, pb) = (push * wa / (wa + wb), push * wb / (wa + wb));
					self.bodies[i].x -= ux * pa;
					self.bodies[i].y -= uy * pa;
					self.bodies[j].x += ux * pb;
					self.bodies[j].y += uy * pb;
					moved = true;
				}
			}
			if !moved {
				return sweep;
			}
		}
		MAX_SETTLE_SWEEPS
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::citation_graph::graph::GraphBuilder;
	use crate::components::citation_graph::types::{CitationDetails, Document, DocumentId, Year};

	fn doc(id: DocumentId, year: i32, cites: &[&str]) -> Document {
		Document {
			document_name: format!("Case {id}"),
			year: Some(Year::Number(f64::from(year))),
			citation_details: CitationDetails {
				cites: cites.iter().map(|s| s.to_string()).collect(),
				..CitationDetails::default()
			},
			..Document::stub(id)
		}
	}

	fn simulate(docs: &[Document]) -> (CitationGraph, Simulation) {
		let config = LayoutConfig::default();
		let graph = GraphBuilder::new().with_fallback_year(2024).build(docs);
		let (w, h) = (800.0, 600.0);
		let range = (config.margins.left, w - config.margins.right);
		let scale = YearScale::from_years(graph.nodes().iter().map(|n| n.year), range).unwrap();
		let mut sim = Simulation::new(&graph, &scale, w, h, config);
		sim.pre_tick();
		(graph, sim)
	}

	#[test]
	fn test_no_overlap_after_pre_tick() {
		// Same year for everyone: the x force alone would stack them.
		let docs: Vec<Document> = (1..=12)
			.map(|i| doc(i, 1990, &["Case 1", "Case 2", "Case 3"]))
			.collect();
		let (graph, sim) = simulate(&docs);
		let padding = LayoutConfig::default().collision_padding;
		for i in 0..graph.nodes().len() {
			for j in (i + 1)..graph.nodes().len() {
				let (a, b) = (sim.bodies()[i], sim.bodies()[j]);
				let dist = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
				let min = graph.nodes()[i].size + graph.nodes()[j].size + padding;
				assert!(dist >= min, "nodes {i} and {j} overlap: {dist} < {min}");
			}
		}
	}

	#[test]
	fn test_years_order_left_to_right() {
		let (graph, sim) = simulate(&[doc(1, 1950, &[]), doc(2, 1985, &[]), doc(3, 2020, &[])]);
		let x = |id| sim.position(graph.index_of(id).unwrap()).unwrap().0;
		assert!(x(1) < x(2));
		assert!(x(2) < x(3));
	}

	#[test]
	fn test_positions_are_finite() {
		let (_, sim) = simulate(&[doc(1, 2000, &["Case 1", "Case 2"]), doc(2, 2000, &["Case 1"])]);
		assert!(sim.bodies().iter().all(|b| b.x.is_finite() && b.y.is_finite()));
	}

	#[test]
	fn test_pinned_body_holds_position() {
		let (_, mut sim) = simulate(&[doc(1, 1990, &["Case 2"]), doc(2, 2000, &[])]);
		sim.pin(0, 123.0, 45.0);
		for _ in 0..20 {
			sim.tick();
		}
		assert_eq!(sim.position(0), Some((123.0, 45.0)));
		assert_eq!(sim.bodies()[0].vx, 0.0);
		sim.unpin(0);
		sim.tick();
		assert_eq!(sim.bodies()[0].fx, None);
	}

	#[test]
	fn test_clock_stops_when_cool() {
		let (_, mut sim) = simulate(&[doc(1, 1990, &[])]);
		let mut ticks = 0;
		while sim.step() {
			ticks += 1;
			assert!(ticks < 1000);
		}
		assert!(!sim.is_active());
		assert!(sim.alpha() < LayoutConfig::default().alpha_min);
	}

	#[test]
	fn test_reheat_keeps_clock_running() {
		let (_, mut sim) = simulate(&[doc(1, 1990, &[])]);
		while sim.step() {}
		sim.set_alpha_target(0.3);
		sim.restart();
		for _ in 0..500 {
			assert!(sim.step());
		}
		assert!(sim.alpha() > 0.2);
	}

	#[test]
	fn test_stop_halts_ticks() {
		let (_, mut sim) = simulate(&[doc(1, 1990, &["Case 2"]), doc(2, 2000, &[])]);
		sim.stop();
		let before = sim.bodies().to_vec();
		assert!(!sim.step());
		assert_eq!(sim.bodies(), &before[..]);
	}
}
