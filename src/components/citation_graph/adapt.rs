//! Folds the flat relation shape into the canonical document list.

use std::collections::BTreeMap;

use log::debug;

use super::types::{
	CitationDetails, CitationPayload, CitationResponse, Document, DocumentId, LinkEntry, Relation,
};

/// Normalizes a payload of either shape into a [`CitationResponse`].
///
/// Canonical payloads pass through untouched. For the flat shape, node
/// descriptions come from `nodes` when present and otherwise from the
/// `links` entries carrying an `id`; every relation guarantees both of its
/// endpoints exist, synthesizing [`Document::stub`]s as needed. Documents
/// come out in ascending identifier order.
pub fn adapt(payload: &CitationPayload) -> CitationResponse {
	let status = payload.status.clone().unwrap_or_else(|| "ok".to_string());

	if let Some(documents) = &payload.relevant_documents {
		return CitationResponse {
			document_id: payload.document_id,
			relevant_documents: documents.clone(),
			citation_legend: payload.citation_legend.clone(),
			status,
		};
	}

	let descriptions: Vec<&LinkEntry> = match &payload.nodes {
		Some(nodes) => nodes.iter().collect(),
		None => payload.links.iter().filter(|l| l.id.is_some()).collect(),
	};

	let mut documents: BTreeMap<DocumentId, Document> = BTreeMap::new();
	for entry in descriptions {
		if let Some(id) = entry.id {
			documents.insert(id, entry.to_document(id));
		}
	}

	for link in &payload.links {
		let Some(relation) = link.relation else {
			continue;
		};
		let (Some(source), Some(target)) = (link.source, link.target) else {
			debug!("skipping {relation:?} relation without both endpoints");
			continue;
		};
		apply_relation(&mut documents, relation, source, target);
	}

	CitationResponse {
		document_id: payload.document_id,
		relevant_documents: documents.into_values().collect(),
		citation_legend: payload.citation_legend.clone(),
		status,
	}
}

fn apply_relation(
	documents: &mut BTreeMap<DocumentId, Document>,
	relation: Relation,
	source: DocumentId,
	target: DocumentId,
) {
	let source_name = ensure(documents, source).document_name.clone();
	let target_name = ensure(documents, target).document_name.clone();

	match relation {
		Relation::Cites => {
			details(documents, source).cites.push(target_name);
			details(documents, target).cited_by.push(source_name);
		}
		Relation::CitedBy => {
			details(documents, source).cited_by.push(target_name);
			details(documents, target).cites.push(source_name);
		}
		// An overruling is not an ordinary citation: no reciprocal entry.
		Relation::OverruledBy => {
			details(documents, target).overruled_by.push(source_name);
		}
		Relation::Unknown => {}
	}
}

fn ensure(documents: &mut BTreeMap<DocumentId, Document>, id: DocumentId) -> &mut Document {
	documents.entry(id).or_insert_with(|| Document::stub(id))
}

fn details(documents: &mut BTreeMap<DocumentId, Document>, id: DocumentId) -> &mut CitationDetails {
	&mut ensure(documents, id).citation_details
}
