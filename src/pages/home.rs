use leptos::prelude::*;
use log::{error, info};

use crate::components::citation_graph::{
	CitationGraphCanvas, CitationPayload, DocumentId, PayloadError, adapt,
};

const CANONICAL_SAMPLE: &str = include_str!("../../assets/canonical_sample.json");
const FLAT_SAMPLE: &str = include_str!("../../assets/flat_sample.json");

/// Bundled payloads, one per upstream shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Sample {
	Canonical,
	Flat,
}

impl Sample {
	const ALL: [Sample; 2] = [Sample::Canonical, Sample::Flat];

	fn label(self) -> &'static str {
		match self {
			Sample::Canonical => "Document list",
			Sample::Flat => "Flat links",
		}
	}

	fn load(self) -> Result<CitationPayload, PayloadError> {
		let text = match self {
			Sample::Canonical => CANONICAL_SAMPLE,
			Sample::Flat => FLAT_SAMPLE,
		};
		CitationPayload::from_json(text)
	}
}

/// Brings the list entry of a clicked node into view.
fn scroll_to_document(id: DocumentId) {
	match document().get_element_by_id(&format!("doc-{id}")) {
		Some(element) => element.scroll_into_view(),
		None => info!("document {id} has no list entry"),
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let sample = RwSignal::new(Sample::Canonical);
	let selected = RwSignal::new(None::<DocumentId>);

	let graph_data = Signal::derive(move || match sample.get().load() {
		Ok(payload) => payload,
		Err(err) => {
			error!("failed to decode {:?} sample: {err}", sample.get_untracked());
			CitationPayload::default()
		}
	});

	let on_node_click = Callback::new(move |id: DocumentId| {
		selected.set(Some(id));
		scroll_to_document(id);
	});

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			<div class="citation-page">
				<header class="graph-overlay">
					<h1>"Citation Network"</h1>
					<p class="subtitle">
						"Hover a case to trace its citations. Drag to rearrange, click to jump to it."
					</p>
					<div class="sample-toggle">
						{Sample::ALL
							.into_iter()
							.map(|option| {
								view! {
									<button
										class:active=move || sample.get() == option
										on:click=move |_| {
											selected.set(None);
											sample.set(option);
										}
									>
										{option.label()}
									</button>
								}
							})
							.collect_view()}
					</div>
				</header>

				<div class="graph-frame" style="width: 100%; height: 600px;">
					<CitationGraphCanvas data=graph_data on_node_click=on_node_click />
				</div>

				<ul class="document-list">
					{move || {
						sample
							.get()
							.load()
							.map(|payload| {
								adapt(&payload)
									.relevant_documents
									.into_iter()
									.map(|doc| {
										let id = doc.document_id;
										view! {
											<li
												id=format!("doc-{id}")
												class:selected=move || selected.get() == Some(id)
											>
												<strong>{doc.document_name}</strong>
												<span class="court">{doc.court_type.label()}</span>
											</li>
										}
									})
									.collect_view()
							})
					}}
				</ul>
			</div>
		</ErrorBoundary>
	}
}
