//! Errors at the payload and DOM boundaries.

use wasm_bindgen::JsValue;

/// Failure to decode an upstream citation payload.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
	/// The payload was not valid JSON or did not match either shape.
	#[error("malformed citation payload: {0}")]
	Json(#[from] serde_json::Error),
}

/// Failure while wiring the graph into the DOM.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
	/// Not running in a browser window.
	#[error("no global window")]
	NoWindow,
	/// The window has no document.
	#[error("window has no document")]
	NoDocument,
	/// The document has no body to hang the tooltip on.
	#[error("document has no body")]
	NoBody,
	/// The canvas refused a 2d context.
	#[error("canvas has no 2d context")]
	NoContext,
	/// A web-sys call threw; the JS error as text.
	#[error("DOM call failed: {0}")]
	Js(String),
}

impl From<JsValue> for CanvasError {
	fn from(value: JsValue) -> Self {
		Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}
