use log::{error, info};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use crate::error::{LoadError, describe_js};

use super::style::style_dataset;
use super::types::GraphDataset;

/// Fetch, parse and style the graph document at `path`.
pub async fn load_graph(path: &str) -> Result<GraphDataset, LoadError> {
	let text = fetch_text(path).await?;
	let data = parse_graph(&text)?;
	info!(
		"loaded {} nodes, {} edges from {}",
		data.nodes.len(),
		data.edges.len(),
		path
	);
	Ok(data)
}

async fn fetch_text(path: &str) -> Result<String, LoadError> {
	let window = web_sys::window().ok_or(LoadError::NoWindow)?;
	let resp_value = JsFuture::from(window.fetch_with_str(path))
		.await
		.map_err(|e| LoadError::network(path, e))?;
	let resp: Response = resp_value
		.dyn_into()
		.map_err(|e| LoadError::network(path, e))?;

	check_status(path, resp.ok(), resp.status())?;

	let body = resp.text().map_err(|e| LoadError::Body(describe_js(&e)))?;
	let text = JsFuture::from(body)
		.await
		.map_err(|e| LoadError::Body(describe_js(&e)))?;
	text.as_string()
		.ok_or_else(|| LoadError::Body("response body is not text".into()))
}

fn check_status(path: &str, ok: bool, status: u16) -> Result<(), LoadError> {
	if ok {
		Ok(())
	} else {
		Err(LoadError::Status {
			path: path.to_string(),
			status,
		})
	}
}

/// Log a failed load and keep only a usable dataset.
pub fn settle_load(path: &str, result: Result<GraphDataset, LoadError>) -> Option<GraphDataset> {
	match result {
		Ok(data) => Some(data),
		Err(err) => {
			error!("failed to load graph from {}: {}", path, err);
			None
		}
	}
}

/// Parse a graph document and apply the styling rules.
pub fn parse_graph(text: &str) -> Result<GraphDataset, LoadError> {
	let mut data: GraphDataset = serde_json::from_str(text)?;
	data.dedupe_nodes();
	style_dataset(&mut data);
	Ok(data)
}
