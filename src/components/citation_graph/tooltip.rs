//! Hover tooltip living outside the canvas, on the document body.

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use super::error::CanvasError;
use super::graph::Node;

/// What the tooltip says about a node.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipContent {
	/// Document name, shown in bold.
	pub name: String,
	/// Effective year.
	pub year: i32,
	/// Court label.
	pub court: &'static str,
	/// Resolved citation counts.
	pub cites: usize,
	/// Resolved cited-by count.
	pub cited_by: usize,
	/// Resolved overruled-by count.
	pub overruled_by: usize,
}

impl TooltipContent {
	/// Content for a graph node.
	pub fn from_node(node: &Node) -> Self {
		Self {
			name: node.name.clone(),
			year: node.year,
			court: node.court.label(),
			cites: node.cites.len(),
			cited_by: node.cited_by.len(),
			overruled_by: node.overruled_by.len(),
		}
	}

	/// Detail lines shown under the bold name.
	pub fn lines(&self) -> [String; 5] {
		[
			format!("Year: {}", self.year),
			format!("Court: {}", self.court),
			format!("Cites: {}", self.cites),
			format!("Cited By: {}", self.cited_by),
			format!("Overruled By: {}", self.overruled_by),
		]
	}
}

/// Floating tooltip attached to the document body. The element is removed
/// when the tooltip is dropped.
pub struct Tooltip {
	element: HtmlElement,
}

impl Tooltip {
	/// Class of the tooltip element.
	pub const CLASS: &'static str = "tooltip-container";

	/// Creates the hidden tooltip element and appends it to the body.
	pub fn attach(document: &Document) -> Result<Self, CanvasError> {
		let body = document.body().ok_or(CanvasError::NoBody)?;
		let element: HtmlElement = document
			.create_element("div")?
			.dyn_into()
			.map_err(|_| CanvasError::Js("tooltip is not an HtmlElement".into()))?;
		element.set_class_name(Self::CLASS);
		let style = element.style();
		for (name, value) in [
			("position", "absolute"),
			("visibility", "hidden"),
			("background", "#fff"),
			("border", "1px solid #ddd"),
			("padding", "8px"),
			("border-radius", "4px"),
			("box-shadow", "0 2px 10px rgba(0,0,0,0.1)"),
			("pointer-events", "none"),
			("z-index", "1000"),
			("font", "12px sans-serif"),
		] {
			style.set_property(name, value)?;
		}
		body.append_child(&element)?;
		Ok(Self { element })
	}

	/// Replaces the content and shows the tooltip at a page position.
	pub fn show(&self, content: &TooltipContent, page_x: f64, page_y: f64) -> Result<(), CanvasError> {
		self.element.set_inner_html("");
		let document = self.element.owner_document().ok_or(CanvasError::NoDocument)?;

		let name = document.create_element("strong")?;
		name.set_text_content(Some(&content.name));
		self.element.append_child(&name)?;
		for line in content.lines() {
			let row = document.create_element("div")?;
			row.set_text_content(Some(&line));
			self.element.append_child(&row)?;
		}

		self.move_to(page_x, page_y)?;
		self.element.style().set_property("visibility", "visible")?;
		Ok(())
	}

	/// Keeps the tooltip just right of and above the pointer.
	pub fn move_to(&self, page_x: f64, page_y: f64) -> Result<(), CanvasError> {
		let style = self.element.style();
		style.set_property("left", &format!("{}px", page_x + 15.0))?;
		style.set_property("top", &format!("{}px", page_y - 28.0))?;
		Ok(())
	}

	/// Hides the tooltip without removing it.
	pub fn hide(&self) -> Result<(), CanvasError> {
		self.element.style().set_property("visibility", "hidden")?;
		Ok(())
	}
}

impl Drop for Tooltip {
	fn drop(&mut self) {
		self.element.remove();
	}
}
