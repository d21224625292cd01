#![cfg(not(target_arch = "wasm32"))]

use std::collections::BTreeSet;

use citation_network::citation_graph::types::{
	CitationDetails, Document, LinkEntry, Relation, Year,
};
use citation_network::citation_graph::{
	CitationPayload, GraphBuilder, LayoutConfig, SizeConfig, Simulation, YearScale, adapt,
};
use proptest::prelude::*;

fn documents(years: &[i32], cites: &[(usize, usize)]) -> Vec<Document> {
	let mut docs: Vec<Document> = years
		.iter()
		.enumerate()
		.map(|(i, &year)| Document {
			document_name: format!("Case {i:03}"),
			year: Some(Year::Number(f64::from(year))),
			..Document::stub(i as u64)
		})
		.collect();
	for &(from, to) in cites {
		if from < docs.len() && to < docs.len() {
			docs[from].citation_details.cites.push(format!("Case {to:03}"));
		}
	}
	docs
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(48))]

	#[test]
	fn prop_size_grows_with_degree(a in 0..500usize, b in 0..500usize) {
		let sizing = SizeConfig::default();
		let (lo, hi) = (a.min(b), a.max(b));
		if hi <= 1 {
			prop_assert_eq!(sizing.size_for(lo), sizing.min_size);
			prop_assert_eq!(sizing.size_for(hi), sizing.min_size);
		} else if lo > 1 && lo < hi {
			prop_assert!(sizing.size_for(lo) < sizing.size_for(hi));
		} else {
			prop_assert!(sizing.size_for(lo) <= sizing.size_for(hi));
		}
		prop_assert!(sizing.size_for(lo) >= sizing.min_size);
	}

	#[test]
	fn prop_pre_tick_leaves_no_overlap(
		years in proptest::collection::vec(1950..2020i32, 1..24),
		cites in proptest::collection::vec((0..24usize, 0..24usize), 0..40),
	) {
		let config = LayoutConfig::default();
		let graph = GraphBuilder::new().with_fallback_year(2024).build(&documents(&years, &cites));
		let (width, height) = (900.0, 600.0);
		let range = (config.margins.left, width - config.margins.right);
		let scale = YearScale::from_years(graph.nodes().iter().map(|n| n.year), range).unwrap();
		let mut sim = Simulation::new(&graph, &scale, width, height, config.clone());
		sim.pre_tick();

		let bodies = sim.bodies();
		for i in 0..bodies.len() {
			prop_assert!(bodies[i].x.is_finite() && bodies[i].y.is_finite());
			for j in (i + 1)..bodies.len() {
				let dist = ((bodies[i].x - bodies[j].x).powi(2) + (bodies[i].y - bodies[j].y).powi(2)).sqrt();
				let min = graph.nodes()[i].size + graph.nodes()[j].size + config.collision_padding;
				prop_assert!(dist + 1e-6 >= min, "nodes {} and {} overlap: {} < {}", i, j, dist, min);
			}
		}
	}

	#[test]
	fn prop_flat_relations_materialize_endpoints(
		relations in proptest::collection::vec((0..3u8, 1..30u64, 1..30u64), 0..40),
	) {
		let links: Vec<LinkEntry> = relations
			.iter()
			.map(|&(tag, source, target)| LinkEntry {
				relation: Some(match tag {
					0 => Relation::Cites,
					1 => Relation::CitedBy,
					_ => Relation::OverruledBy,
				}),
				source: Some(source),
				target: Some(target),
				..LinkEntry::default()
			})
			.collect();
		let payload = CitationPayload { links, ..CitationPayload::default() };
		let response = adapt(&payload);

		let ids: Vec<u64> = response.relevant_documents.iter().map(|d| d.document_id).collect();
		let expected: BTreeSet<u64> = relations.iter().flat_map(|&(_, s, t)| [s, t]).collect();
		prop_assert_eq!(ids, expected.into_iter().collect::<Vec<_>>());

		// Every citation lands in the cites list of one side and the cited_by
		// list of the other.
		let count = |f: fn(&CitationDetails) -> usize| -> usize {
			response.relevant_documents.iter().map(|d| f(&d.citation_details)).sum()
		};
		let citations = relations.iter().filter(|&&(tag, _, _)| tag < 2).count();
		let overrulings = relations.len() - citations;
		prop_assert_eq!(count(|c| c.cites.len()), citations);
		prop_assert_eq!(count(|c| c.cited_by.len()), citations);
		prop_assert_eq!(count(|c| c.overruled_by.len()), overrulings);
	}
}
