//! Bundled payloads through the adapter, the builder and the view.

use citation_network::citation_graph::{
	CitationPayload, CourtType, EdgeKind, GraphBuilder, GraphView, LayoutConfig, SizeConfig, adapt,
};
use pretty_assertions::assert_eq;

const CANONICAL_SAMPLE: &str = include_str!("../assets/canonical_sample.json");
const FLAT_SAMPLE: &str = include_str!("../assets/flat_sample.json");

fn builder() -> GraphBuilder {
	GraphBuilder::new().with_fallback_year(2024)
}

#[test]
fn test_canonical_sample_edges() {
	let payload = CitationPayload::from_json(CANONICAL_SAMPLE).unwrap();
	let response = adapt(&payload);
	assert_eq!(response.status, "ok");
	assert_eq!(response.relevant_documents.len(), 9);

	let graph = builder().build(&response.relevant_documents);
	assert_eq!(graph.nodes().len(), 9);
	assert_eq!(graph.edges().len(), 17);

	// Cited as "Golak Nath v. State of Punjab", a substring of 102's name.
	let edges = graph.edge_ids();
	assert!(edges.contains(&(101, 102, EdgeKind::Cites)));
	assert!(edges.contains(&(101, 103, EdgeKind::Cites)));
	assert!(edges.contains(&(104, 105, EdgeKind::Cites)));
	assert!(edges.contains(&(103, 107, EdgeKind::CitedBy)));
	assert!(edges.contains(&(101, 109, EdgeKind::CitedBy)));
}

#[test]
fn test_canonical_sample_keeps_parallel_edges() {
	let payload = CitationPayload::from_json(CANONICAL_SAMPLE).unwrap();
	let graph = builder().build(&adapt(&payload).relevant_documents);
	let between: Vec<EdgeKind> = graph
		.edge_ids()
		.into_iter()
		.filter(|&(s, t, _)| (s, t) == (101, 102))
		.map(|(_, _, kind)| kind)
		.collect();
	// 101 cites 102, 102 lists 101 as citing it, and 101 overruled 102.
	assert_eq!(between, vec![EdgeKind::Cites, EdgeKind::CitedBy, EdgeKind::OverruledBy]);
}

#[test]
fn test_canonical_sample_nodes() {
	let payload = CitationPayload::from_json(CANONICAL_SAMPLE).unwrap();
	let graph = builder().build(&adapt(&payload).relevant_documents);
	let node = |id| graph.node(graph.index_of(id).unwrap()).unwrap();

	assert_eq!(node(101).cites, vec![102, 103]);
	assert_eq!(node(101).cited_by, vec![104, 105]);
	assert_eq!(node(102).overruled_by, vec![101]);
	assert_eq!(node(103).overruled_by, vec![102]);

	// Unresolved citations still count toward size.
	let sizing = SizeConfig::default();
	assert_eq!(node(107).cited_by, vec![103]);
	assert_eq!(node(107).size, sizing.size_for(2));
	assert_eq!(node(101).size, 20.0);
	assert_eq!(node(106).size, 4.0);

	assert_eq!(node(102).year, 1967);
	assert_eq!(node(107).year, 1951);
	assert_eq!(node(108).year, 2024);
	assert_eq!(node(109).year, 2024);
	assert_eq!(node(109).court, CourtType::External);
	assert_eq!(node(108).court, CourtType::Tribunals);
}

#[test]
fn test_flat_sample_is_folded() {
	let payload = CitationPayload::from_json(FLAT_SAMPLE).unwrap();
	let response = adapt(&payload);
	assert_eq!(response.status, "ok");
	assert_eq!(response.document_id, Some(201));

	let ids: Vec<u64> = response.relevant_documents.iter().map(|d| d.document_id).collect();
	assert_eq!(ids, vec![201, 202, 203, 204, 205, 206]);

	let stub = &response.relevant_documents[4];
	assert_eq!(stub.document_name, "Doc 205");
	assert_eq!(stub.court_type, CourtType::Tribunals);
	assert_eq!(
		stub.citation_details.overruled_by,
		vec!["Medha Kotwal Lele v. Union of India".to_string()]
	);

	let vishaka = &response.relevant_documents[0];
	assert_eq!(
		vishaka.citation_details.cited_by,
		vec![
			"Apparel Export Promotion Council v. A.K. Chopra".to_string(),
			"Medha Kotwal Lele v. Union of India".to_string(),
			"Internal Complaints Committee Order".to_string(),
		]
	);
}

#[test]
fn test_flat_sample_graph() {
	let payload = CitationPayload::from_json(FLAT_SAMPLE).unwrap();
	let graph = builder().build(&adapt(&payload).relevant_documents);
	assert_eq!(graph.nodes().len(), 6);
	assert_eq!(graph.edges().len(), 7);

	let edges = graph.edge_ids();
	assert!(edges.contains(&(202, 205, EdgeKind::OverruledBy)));
	assert!(edges.contains(&(204, 201, EdgeKind::Cites)));
	assert!(edges.contains(&(204, 201, EdgeKind::CitedBy)));
	assert!(!edges.iter().any(|&(s, t, _)| s == 206 || t == 206));
}

#[test]
fn test_view_lays_out_sample_inside_viewport() {
	let payload = CitationPayload::from_json(CANONICAL_SAMPLE).unwrap();
	let (width, height) = (960.0, 600.0);
	let view = GraphView::with_builder(&payload, width, height, LayoutConfig::default(), builder());
	assert!(view.has_layout());

	let bottom = height - view.margins().bottom;
	for (idx, node) in view.graph().nodes().iter().enumerate() {
		let (x, y) = view.screen_position(idx).unwrap();
		assert!(x >= node.size && x <= width - node.size, "{} x={x}", node.name);
		assert!(y >= node.size && y <= bottom - node.size, "{} y={y}", node.name);
	}

	let x = |id| view.screen_position(view.graph().index_of(id).unwrap()).unwrap().0;
	assert!(x(107) < x(101));
	assert!(x(101) < x(109));
}

#[test]
fn test_view_switches_between_samples() {
	let canonical = CitationPayload::from_json(CANONICAL_SAMPLE).unwrap();
	let flat = CitationPayload::from_json(FLAT_SAMPLE).unwrap();
	let mut view = GraphView::with_builder(&canonical, 960.0, 600.0, LayoutConfig::default(), builder());
	view.set_hover(Some(0));

	view.rebuild(&flat);
	assert_eq!(view.graph().nodes().len(), 6);
	assert_eq!(view.hover.node, None);
	assert!(view.graph().index_of(101).is_none());
	assert!(view.has_layout());
}
