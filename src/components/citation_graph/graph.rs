//! Citation multigraph: a flat node arena plus an edge list of indices.

use std::collections::{HashMap, HashSet};

use chrono::Datelike;
use log::{debug, warn};

use super::config::SizeConfig;
use super::resolve::Resolver;
use super::types::{CourtType, Document, DocumentId};

/// Position of a node in [`CitationGraph::nodes`].
pub type NodeIndex = usize;

/// Which citation list produced an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeKind {
	/// Source cites target.
	Cites,
	/// Target lists source among the documents citing it.
	CitedBy,
	/// Target was overruled by source; drawn in red.
	OverruledBy,
}

/// A document as laid out in the graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	/// Document id.
	pub id: DocumentId,
	/// Display name, also what citations are resolved against.
	pub name: String,
	/// Court, for fill color and tooltip.
	pub court: CourtType,
	/// Parsed year, or the builder's fallback year.
	pub year: i32,
	/// Visual radius, from the raw (pre-resolution) citation degree.
	pub size: f64,
	/// Resolved ids, one per edge produced by the matching list.
	pub cites: Vec<DocumentId>,
	/// Ids resolved from the `cited_by` list.
	pub cited_by: Vec<DocumentId>,
	/// Ids resolved from the `overruled_by` list.
	pub overruled_by: Vec<DocumentId>,
}

/// Directed edge between two node indices. Parallel edges are kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
	/// Arrow tail.
	pub source: NodeIndex,
	/// Arrow head.
	pub target: NodeIndex,
	/// Relation the edge came from.
	pub kind: EdgeKind,
}

/// Nodes in input order, edges in discovery order, and an id index.
#[derive(Clone, Debug, Default)]
pub struct CitationGraph {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
	index: HashMap<DocumentId, NodeIndex>,
}

impl CitationGraph {
	/// Nodes in input order, duplicates removed.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Every edge, parallel ones included.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Node at `idx`.
	pub fn node(&self, idx: NodeIndex) -> Option<&Node> {
		self.nodes.get(idx)
	}

	/// Index of the node for document `id`.
	pub fn index_of(&self, id: DocumentId) -> Option<NodeIndex> {
		self.index.get(&id).copied()
	}

	/// True when there is nothing to lay out.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Edges as `(source id, target id, kind)` triples.
	pub fn edge_ids(&self) -> Vec<(DocumentId, DocumentId, EdgeKind)> {
		self.edges
			.iter()
			.map(|e| (self.nodes[e.source].id, self.nodes[e.target].id, e.kind))
			.collect()
	}

	/// The node itself plus every node named in its resolved citation lists.
	pub fn ego_set(&self, idx: NodeIndex) -> HashSet<NodeIndex> {
		let Some(node) = self.nodes.get(idx) else {
			return HashSet::new();
		};
		let mut set: HashSet<NodeIndex> = node
			.cites
			.iter()
			.chain(&node.cited_by)
			.chain(&node.overruled_by)
			.filter_map(|id| self.index_of(*id))
			.collect();
		set.insert(idx);
		set
	}

	/// Earliest and latest year over all nodes.
	pub fn year_extent(&self) -> Option<(i32, i32)> {
		let min = self.nodes.iter().map(|n| n.year).min()?;
		let max = self.nodes.iter().map(|n| n.year).max()?;
		Some((min, max))
	}
}

/// Turns a normalized document list into a [`CitationGraph`].
#[derive(Clone, Debug)]
pub struct GraphBuilder {
	sizing: SizeConfig,
	fallback_year: i32,
}

impl Default for GraphBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl GraphBuilder {
	/// Builder whose unparseable years fall back to the current year.
	pub fn new() -> Self {
		Self {
			sizing: SizeConfig::default(),
			fallback_year: chrono::Local::now().year(),
		}
	}

	/// Year used for documents whose year does not parse.
	pub fn with_fallback_year(mut self, year: i32) -> Self {
		self.fallback_year = year;
		self
	}

	/// Degree-to-size mapping for the nodes.
	pub fn with_sizing(mut self, sizing: SizeConfig) -> Self {
		self.sizing = sizing;
		self
	}

	/// Builds nodes in input order, then resolves every citation list into
	/// edges. Unresolved citations are dropped but still count toward size.
	pub fn build(&self, documents: &[Document]) -> CitationGraph {
		let resolver = Resolver::new(documents);
		let mut graph = CitationGraph::default();
		let mut accepted = Vec::with_capacity(documents.len());

		for doc in documents {
			if graph.index.contains_key(&doc.document_id) {
				warn!(
					"skipping duplicate document id {} ({:?})",
					doc.document_id, doc.document_name
				);
				continue;
			}
			graph.index.insert(doc.document_id, graph.nodes.len());
			graph.nodes.push(self.node_for(doc));
			accepted.push(doc);
		}

		for (idx, doc) in accepted.into_iter().enumerate() {
			let details = &doc.citation_details;

			for citation in &details.cites {
				if let Some(target) = resolve_index(&resolver, &graph, citation) {
					graph.edges.push(Edge {
						source: idx,
						target,
						kind: EdgeKind::Cites,
					});
					let id = graph.nodes[target].id;
					graph.nodes[idx].cites.push(id);
				}
			}

			// The other document points at this one.
			for citation in &details.cited_by {
				if let Some(source) = resolve_index(&resolver, &graph, citation) {
					graph.edges.push(Edge {
						source,
						target: idx,
						kind: EdgeKind::CitedBy,
					});
					let id = graph.nodes[source].id;
					graph.nodes[idx].cited_by.push(id);
				}
			}

			for citation in &details.overruled_by {
				if let Some(source) = resolve_index(&resolver, &graph, citation) {
					graph.edges.push(Edge {
						source,
						target: idx,
						kind: EdgeKind::OverruledBy,
					});
					let id = graph.nodes[source].id;
					graph.nodes[idx].overruled_by.push(id);
				}
			}
		}

		debug!(
			"built citation graph: {} nodes, {} edges",
			graph.nodes.len(),
			graph.edges.len()
		);
		graph
	}

	fn node_for(&self, doc: &Document) -> Node {
		Node {
			id: doc.document_id,
			name: doc.document_name.clone(),
			court: doc.court_type,
			year: doc
				.year
				.as_ref()
				.and_then(|y| y.parse())
				.unwrap_or(self.fallback_year),
			size: self.sizing.size_for(doc.citation_details.degree()),
			cites: Vec::new(),
			cited_by: Vec::new(),
			overruled_by: Vec::new(),
		}
	}
}

fn resolve_index(resolver: &Resolver, graph: &CitationGraph, citation: &str) -> Option<NodeIndex> {
	resolver.resolve(citation).and_then(|id| graph.index_of(id))
}
