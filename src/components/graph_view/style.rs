use crate::config::palette;

use super::types::{Edge, EdgeLabel, GraphDataset, Node, NodeCategory, NodeColor};

/// Width assigned to every styled edge.
pub const STYLED_EDGE_WIDTH: f64 = 2.0;

fn node_color(category: NodeCategory) -> Option<&'static str> {
	match category {
		NodeCategory::Message => Some(palette::MESSAGE_NODE),
		NodeCategory::Keyword => Some(palette::KEYWORD_NODE),
		NodeCategory::Unstyled => None,
	}
}

fn edge_color(label: &EdgeLabel) -> Option<&'static str> {
	match label {
		EdgeLabel::Describes => Some(palette::DESCRIBES_EDGE),
		EdgeLabel::Follows => Some(palette::FOLLOWS_EDGE),
		EdgeLabel::Refers => Some(palette::REFERS_EDGE),
		EdgeLabel::Unlabeled | EdgeLabel::Other(_) => None,
	}
}

pub fn style_node(node: &mut Node) {
	if let Some(color) = node_color(node.shape.category()) {
		node.color = Some(NodeColor::Solid(color.to_string()));
	}
}

pub fn style_edge(edge: &mut Edge) {
	if let Some(color) = edge_color(&edge.label) {
		edge.color = Some(color.to_string());
		edge.width = Some(STYLED_EDGE_WIDTH);
	}
}

/// Apply the shape and relation colour rules in place.
pub fn style_dataset(data: &mut GraphDataset) {
	data.nodes.iter_mut().for_each(style_node);
	data.edges.iter_mut().for_each(style_edge);
}
