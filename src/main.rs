//! Browser entry point: sets up logging and mounts the app.

use memory_graph_viewer::{App, init_logging};

fn main() {
	init_logging();
	leptos::mount::mount_to_body(App);
}
