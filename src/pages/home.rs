use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_query_map;

use crate::components::graph_view::{GraphDataset, GraphViewer, load_graph, settle_load};
use crate::config::{DATA_QUERY_PARAM, GRAPH_DATA_PATH};

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let path = use_query_map()
		.with_untracked(|q| q.get(DATA_QUERY_PARAM))
		.unwrap_or_else(|| GRAPH_DATA_PATH.to_string());
	let (dataset, set_dataset) = signal(None::<GraphDataset>);

	spawn_local(async move {
		if let Some(data) = settle_load(&path, load_graph(&path).await) {
			set_dataset.set(Some(data));
		}
	});

	view! {
		<div class="fullscreen-graph">
			<GraphViewer data=dataset fullscreen=true />
			<div class="graph-overlay">
				<h1>"Memory Graph"</h1>
				<p class="subtitle">"Drag nodes to reposition. Scroll to zoom. Drag background to pan."</p>
			</div>
		</div>
	}
}
