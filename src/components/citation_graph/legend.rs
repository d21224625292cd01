use leptos::prelude::*;

use super::types::CourtType;

/// Arrow sample for the legend; `reverse` points it right-to-left.
#[component]
fn LegendArrow(color: &'static str, #[prop(default = false)] reverse: bool) -> impl IntoView {
	let (x1, x2, head) = if reverse {
		("20", "4", "M4,0 L0,4 L4,8 Z")
	} else {
		("0", "16", "M16,0 L20,4 L16,8 Z")
	};
	view! {
		<svg width="20" height="8">
			<line x1=x1 y1="4" x2=x2 y2="4" stroke=color stroke-width="1" />
			<path d=head fill=color />
		</svg>
	}
}

/// Court colors and edge semantics, shown under the canvas.
#[component]
pub fn CitationLegend() -> impl IntoView {
	view! {
		<div class="citation-legend" style="display: flex; flex-wrap: wrap; align-items: center; gap: 1rem; margin-top: 1rem;">
			<span style="color: #60a5fa;">"Legend"</span>
			{CourtType::LEGEND
				.into_iter()
				.map(|court| {
					view! {
						<div style="display: flex; align-items: center; gap: 0.5rem;">
							<span style=format!(
								"width: 1rem; height: 1rem; border-radius: 9999px; background-color: {};",
								court.color(),
							)></span>
							<span class="text-sm">{court.label()}</span>
						</div>
					}
				})
				.collect_view()}
			<div style="display: flex; align-items: center; gap: 0.5rem;">
				<LegendArrow color="#333" />
				<span class="text-sm">"Cites (outgoing)"</span>
			</div>
			<div style="display: flex; align-items: center; gap: 0.5rem;">
				<LegendArrow color="#333" reverse=true />
				<span class="text-sm">"Cited by (incoming)"</span>
			</div>
			<div style="display: flex; align-items: center; gap: 0.5rem;">
				<LegendArrow color="red" />
				<span class="text-sm">"Overruled By"</span>
			</div>
		</div>
	}
}
