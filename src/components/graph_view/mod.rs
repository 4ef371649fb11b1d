//! Canvas graph view for memory graphs.
//!
//! Loads a `graph_data.json` document, colours nodes by shape and edges by
//! relation, and renders the result on an HTML canvas with:
//! - Pan, zoom and node dragging
//! - Hover emphasis with title tooltips
//! - Directed, labelled edges
//! - Search that highlights and centres the first matching node

mod component;
mod loader;
mod render;
mod search;
mod state;
mod style;
mod types;

pub use component::GraphViewer;
pub use loader::{load_graph, settle_load};
pub use types::GraphDataset;
