//! Wire types for the citation payload.
//!
//! Two upstream shapes are accepted: the canonical `relevant_documents` list
//! and a flat `nodes`/`links` list where relations are tagged explicitly.
//! Both decode into [`CitationPayload`]; [`super::adapt`] folds the flat
//! shape into a [`CitationResponse`].

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::error::PayloadError;

/// Canonical identifier of a legal document.
pub type DocumentId = u64;

/// Court category of a document. Anything unrecognised is `External`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CourtType {
	/// Supreme Court judgment.
	#[serde(rename = "Supreme Court")]
	SupremeCourt,
	/// High Court judgment.
	#[serde(rename = "High Court")]
	HighCourt,
	/// Tribunal order; also the category given to synthesized stubs.
	Tribunals,
	/// Unknown or external source.
	#[default]
	#[serde(other)]
	External,
}

impl CourtType {
	/// Courts shown in the legend, in display order.
	pub const LEGEND: [CourtType; 3] = [Self::SupremeCourt, Self::HighCourt, Self::Tribunals];

	/// Display label, matching the wire spelling.
	pub fn label(self) -> &'static str {
		match self {
			Self::SupremeCourt => "Supreme Court",
			Self::HighCourt => "High Court",
			Self::Tribunals => "Tribunals",
			Self::External => "External",
		}
	}

	/// Fill color used for nodes of this court.
	pub fn color(self) -> &'static str {
		match self {
			Self::SupremeCourt => "#FFD700",
			Self::HighCourt => "#ADFF2F",
			Self::Tribunals => "#90EE90",
			Self::External => "#ccc",
		}
	}
}

/// Publication year as delivered upstream: a number or free text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Year {
	/// Numeric year.
	Number(f64),
	/// Textual year such as `"1978"` or `"Unknown"`.
	Text(String),
}

impl Year {
	/// Year marker used for stub documents.
	pub fn unknown() -> Self {
		Self::Text("Unknown".to_string())
	}

	/// Interprets the year, reading the leading integer of textual values
	/// (`"1978 AIR 597"` is 1978). Returns `None` when nothing parses.
	pub fn parse(&self) -> Option<i32> {
		match self {
			Self::Number(n) if n.is_finite() => Some(n.trunc() as i32),
			Self::Number(_) => None,
			Self::Text(text) => leading_int(text),
		}
	}
}

fn leading_int(text: &str) -> Option<i32> {
	let text = text.trim_start();
	let (sign, rest) = match text.as_bytes().first() {
		Some(b'-') => (-1, &text[1..]),
		Some(b'+') => (1, &text[1..]),
		_ => (1, text),
	};
	let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
	if digits == 0 {
		return None;
	}
	rest[..digits].parse::<i32>().ok().map(|n| sign * n)
}

/// Free-text citation lists attached to a document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CitationDetails {
	/// Documents this one cites.
	#[serde(default, deserialize_with = "null_as_default")]
	pub cites: Vec<String>,
	/// Documents citing this one.
	#[serde(default, deserialize_with = "null_as_default")]
	pub cited_by: Vec<String>,
	/// Documents that overruled this one.
	#[serde(default, deserialize_with = "null_as_default")]
	pub overruled_by: Vec<String>,
}

impl CitationDetails {
	/// Raw citation count, unresolved entries included.
	pub fn degree(&self) -> usize {
		self.cites.len() + self.cited_by.len() + self.overruled_by.len()
	}
}

/// A document in the canonical shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
	/// Unique id; duplicates after the first are dropped by the builder.
	pub document_id: DocumentId,
	/// Name that citations in other documents refer to.
	#[serde(default, deserialize_with = "null_as_default")]
	pub document_name: String,
	/// Court category.
	#[serde(default, deserialize_with = "null_as_default")]
	pub court_type: CourtType,
	/// Year as sent upstream; parsed leniently when building.
	#[serde(default)]
	pub year: Option<Year>,
	/// Passed through, not drawn.
	#[serde(default, deserialize_with = "null_as_default")]
	pub explanation: String,
	/// Passed through, not drawn.
	#[serde(default, deserialize_with = "null_as_default")]
	pub similarity_score: f64,
	/// Passed through, not drawn.
	#[serde(default, deserialize_with = "null_as_default")]
	pub snippet: String,
	/// Free-text citation lists, resolved by name.
	#[serde(default, deserialize_with = "null_as_default")]
	pub citation_details: CitationDetails,
}

impl Document {
	/// Minimal placeholder for a document only known through a relation.
	pub fn stub(id: DocumentId) -> Self {
		Self {
			document_id: id,
			document_name: format!("Doc {id}"),
			court_type: CourtType::Tribunals,
			year: Some(Year::unknown()),
			explanation: String::new(),
			similarity_score: 0.0,
			snippet: String::new(),
			citation_details: CitationDetails::default(),
		}
	}
}

/// Normalized response consumed by the graph builder.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CitationResponse {
	/// Document the query was about, carried through unchanged.
	#[serde(default)]
	pub document_id: Option<DocumentId>,
	/// Every document to draw.
	#[serde(default, deserialize_with = "null_as_default")]
	pub relevant_documents: Vec<Document>,
	/// Upstream legend text, carried through unchanged.
	#[serde(default, deserialize_with = "null_as_default")]
	pub citation_legend: BTreeMap<String, String>,
	/// Upstream status; `"ok"` when the payload had none.
	#[serde(default, deserialize_with = "null_as_default")]
	pub status: String,
}

/// Relation tag of a flat-shape link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
	/// `source` cites `target`.
	Cites,
	/// `source` is cited by `target`.
	CitedBy,
	/// `target` was overruled by `source`.
	OverruledBy,
	/// Any other tag; endpoints are still materialized.
	#[serde(other)]
	Unknown,
}

/// One entry of the flat shape: a node description when `id` is set, a
/// relation when `relation` is set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkEntry {
	/// Set on node descriptions.
	#[serde(default)]
	pub id: Option<DocumentId>,
	/// Display name of a described node.
	#[serde(default)]
	pub name: Option<String>,
	/// Court of a described node.
	#[serde(default, deserialize_with = "null_as_default")]
	pub court_type: CourtType,
	/// Year of a described node.
	#[serde(default)]
	pub year: Option<Year>,
	/// Passed through to the document.
	#[serde(default)]
	pub explanation: Option<String>,
	/// Passed through to the document.
	#[serde(default)]
	pub similarity_score: Option<f64>,
	/// Passed through to the document.
	#[serde(default)]
	pub snippet: Option<String>,
	/// Set on relation entries.
	#[serde(default)]
	pub relation: Option<Relation>,
	/// Relation tail.
	#[serde(default)]
	pub source: Option<DocumentId>,
	/// Relation head.
	#[serde(default)]
	pub target: Option<DocumentId>,
}

impl LinkEntry {
	/// Node description as a document with empty citation lists.
	pub fn to_document(&self, id: DocumentId) -> Document {
		Document {
			document_id: id,
			document_name: self.name.clone().unwrap_or_default(),
			court_type: self.court_type,
			year: self.year.clone(),
			explanation: self.explanation.clone().unwrap_or_default(),
			similarity_score: self.similarity_score.unwrap_or_default(),
			snippet: self.snippet.clone().unwrap_or_default(),
			citation_details: CitationDetails::default(),
		}
	}
}

/// Raw payload in either upstream shape.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CitationPayload {
	/// Document the query was about.
	#[serde(default)]
	pub document_id: Option<DocumentId>,
	/// Present for the canonical shape.
	#[serde(default)]
	pub relevant_documents: Option<Vec<Document>>,
	/// Optional node list of the flat shape.
	#[serde(default)]
	pub nodes: Option<Vec<LinkEntry>>,
	/// Relations of the flat shape, possibly mixed with node descriptions.
	#[serde(default, deserialize_with = "null_as_default")]
	pub links: Vec<LinkEntry>,
	/// Upstream legend text.
	#[serde(default, deserialize_with = "null_as_default")]
	pub citation_legend: BTreeMap<String, String>,
	/// Upstream status, if any.
	#[serde(default)]
	pub status: Option<String>,
}

impl CitationPayload {
	/// Decodes a payload from JSON text.
	pub fn from_json(text: &str) -> Result<Self, PayloadError> {
		Ok(serde_json::from_str(text)?)
	}
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de> + Default,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn test_year_parse() {
		assert_eq!(Year::Number(1978.0).parse(), Some(1978));
		assert_eq!(Year::Text("1950".into()).parse(), Some(1950));
		assert_eq!(Year::Text("  1978 AIR 597".into()).parse(), Some(1978));
		assert_eq!(Year::Text("Unknown".into()).parse(), None);
		assert_eq!(Year::Text(String::new()).parse(), None);
		assert_eq!(Year::Number(f64::NAN).parse(), None);
	}

	#[test]
	fn test_unknown_court_is_external() {
		let court: CourtType = serde_json::from_str("\"District Court\"").unwrap();
		assert_eq!(court, CourtType::External);
		let court: CourtType = serde_json::from_str("\"High Court\"").unwrap();
		assert_eq!(court, CourtType::HighCourt);
	}

	#[test]
	fn test_decode_canonical_document() {
		let payload = CitationPayload::from_json(
			r#"{
				"document_id": 7,
				"status": "success",
				"citation_legend": {"cites": "outgoing"},
				"relevant_documents": [{
					"document_id": 1,
					"document_name": "Maneka Gandhi v. Union of India",
					"court_type": "Supreme Court",
					"year": "1978",
					"similarity_score": 0.91,
					"explanation": null,
					"citation_details": {"cites": ["A. K. Gopalan v. State of Madras"], "cited_by": null}
				}]
			}"#,
		)
		.unwrap();

		let docs = payload.relevant_documents.unwrap();
		assert_eq!(docs.len(), 1);
		assert_eq!(docs[0].court_type, CourtType::SupremeCourt);
		assert_eq!(docs[0].year, Some(Year::Text("1978".into())));
		assert_eq!(docs[0].explanation, "");
		assert_eq!(docs[0].citation_details.degree(), 1);
		assert_eq!(payload.status.as_deref(), Some("success"));
	}

	#[test]
	fn test_decode_flat_links() {
		let payload = CitationPayload::from_json(
			r#"{"links": [
				{"id": 3, "name": "C", "year": 2001},
				{"relation": "overruled_by", "source": 3, "target": 4},
				{"relation": "mentions", "source": 3, "target": 5}
			]}"#,
		)
		.unwrap();

		assert!(payload.relevant_documents.is_none());
		assert_eq!(payload.links.len(), 3);
		assert_eq!(payload.links[0].year, Some(Year::Number(2001.0)));
		assert_eq!(payload.links[1].relation, Some(Relation::OverruledBy));
		assert_eq!(payload.links[2].relation, Some(Relation::Unknown));
	}

	#[test]
	fn test_malformed_json_is_an_error() {
		assert!(CitationPayload::from_json("{\"links\": 4").is_err());
	}
}
