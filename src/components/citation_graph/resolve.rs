//! Citation string to document id resolution.

use indexmap::IndexMap;

use super::types::{Document, DocumentId};

/// Maps free-text citation strings onto known document identifiers.
///
/// Lookup is an exact name match first, then a substring match in either
/// direction against every known name in first-seen order. The first
/// candidate wins; candidates are never ranked, so a short name contained in
/// an unrelated longer one can produce a false match.
#[derive(Clone, Debug, Default)]
pub struct Resolver {
	by_name: IndexMap<String, DocumentId>,
}

impl Resolver {
	/// Builds the lookup table. A repeated name keeps its first position and
	/// takes the later identifier.
	pub fn new(documents: &[Document]) -> Self {
		let mut by_name = IndexMap::with_capacity(documents.len());
		for doc in documents {
			by_name.insert(doc.document_name.clone(), doc.document_id);
		}
		Self { by_name }
	}

	/// Identifier the citation refers to, if any name matches.
	pub fn resolve(&self, citation: &str) -> Option<DocumentId> {
		if let Some(&id) = self.by_name.get(citation) {
			return Some(id);
		}
		self.by_name
			.iter()
			.find(|(name, _)| citation.contains(name.as_str()) || name.contains(citation))
			.map(|(_, &id)| id)
	}

	/// Number of distinct names.
	pub fn len(&self) -> usize {
		self.by_name.len()
	}

	/// True when no document had a name.
	pub fn is_empty(&self) -> bool {
		self.by_name.is_empty()
	}
}
