use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures of the graph load pipeline.
#[derive(Debug, Error)]
pub enum LoadError {
	#[error("no browser window available")]
	NoWindow,

	#[error("request for {path} failed: {reason}")]
	Network { path: String, reason: String },

	#[error("request for {path} returned HTTP {status}")]
	Status { path: String, status: u16 },

	#[error("could not read response body: {0}")]
	Body(String),

	#[error("graph document is not valid JSON: {0}")]
	Parse(#[from] serde_json::Error),
}

impl LoadError {
	pub(crate) fn network(path: &str, err: JsValue) -> Self {
		Self::Network {
			path: path.to_string(),
			reason: describe_js(&err),
		}
	}
}

/// Best-effort text for a thrown JS value.
pub(crate) fn describe_js(value: &JsValue) -> String {
	value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
