//! Graph document types as read from `graph_data.json`.

use std::collections::HashSet;
use std::fmt;

use log::warn;
use serde::Deserialize;

/// Node identifier. Numbers and strings are both accepted in the document.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "RawId")]
pub struct NodeId(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
	Text(String),
	Number(serde_json::Number),
}

impl From<RawId> for NodeId {
	fn from(raw: RawId) -> Self {
		match raw {
			RawId::Text(s) => NodeId(s),
			RawId::Number(n) => NodeId(number_key(&n)),
		}
	}
}

/// `1` and `1.0` are the same key in the browser, so integral floats print as integers.
fn number_key(n: &serde_json::Number) -> String {
	if n.is_f64() {
		if let Some(f) = n.as_f64() {
			if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
				return (f as i64).to_string();
			}
		}
	}
	n.to_string()
}

impl From<&str> for NodeId {
	fn from(s: &str) -> Self {
		NodeId(s.to_string())
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Visual shape of a node. The shape also carries its semantic category.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum NodeShape {
	#[default]
	Dot,
	Ellipse,
	Box,
	Other(String),
}

impl From<String> for NodeShape {
	fn from(s: String) -> Self {
		match s.as_str() {
			"dot" => NodeShape::Dot,
			"ellipse" => NodeShape::Ellipse,
			"box" => NodeShape::Box,
			_ => NodeShape::Other(s),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeCategory {
	Message,
	Keyword,
	Unstyled,
}

impl NodeShape {
	pub fn category(&self) -> NodeCategory {
		match self {
			NodeShape::Ellipse => NodeCategory::Message,
			NodeShape::Box => NodeCategory::Keyword,
			NodeShape::Dot | NodeShape::Other(_) => NodeCategory::Unstyled,
		}
	}
}

/// Colour override: either one colour for fill and border, or both spelled out.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum NodeColor {
	Solid(String),
	Split { background: String, border: String },
}

impl NodeColor {
	pub fn background(&self) -> &str {
		match self {
			NodeColor::Solid(c) => c,
			NodeColor::Split { background, .. } => background,
		}
	}

	pub fn border(&self) -> &str {
		match self {
			NodeColor::Solid(c) => c,
			NodeColor::Split { border, .. } => border,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Node {
	pub id: NodeId,
	#[serde(default)]
	pub label: String,
	/// Tooltip text.
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub shape: NodeShape,
	/// `None` renders with the default palette.
	#[serde(default)]
	pub color: Option<NodeColor>,
	/// `None` renders at the configured default size.
	#[serde(default)]
	pub size: Option<f64>,
}

/// Relation type carried in the edge label.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum EdgeLabel {
	Describes,
	Follows,
	Refers,
	#[default]
	Unlabeled,
	Other(String),
}

impl From<String> for EdgeLabel {
	fn from(s: String) -> Self {
		match s.as_str() {
			"describes" => EdgeLabel::Describes,
			"follows" => EdgeLabel::Follows,
			"refers" => EdgeLabel::Refers,
			"" => EdgeLabel::Unlabeled,
			_ => EdgeLabel::Other(s),
		}
	}
}

impl EdgeLabel {
	pub fn as_str(&self) -> &str {
		match self {
			EdgeLabel::Describes => "describes",
			EdgeLabel::Follows => "follows",
			EdgeLabel::Refers => "refers",
			EdgeLabel::Unlabeled => "",
			EdgeLabel::Other(s) => s,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Edge {
	#[serde(default)]
	pub id: Option<NodeId>,
	pub from: NodeId,
	pub to: NodeId,
	#[serde(default)]
	pub label: EdgeLabel,
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	pub color: Option<String>,
	#[serde(default)]
	pub width: Option<f64>,
}

/// Nodes in document order plus edges in the order received.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphDataset {
	#[serde(default)]
	pub nodes: Vec<Node>,
	#[serde(default)]
	pub edges: Vec<Edge>,
}

impl GraphDataset {
	pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
		self.nodes.iter_mut().find(|n| &n.id == id)
	}

	/// Drop nodes whose id was already seen. The first occurrence wins.
	pub fn dedupe_nodes(&mut self) {
		let mut seen = HashSet::new();
		self.nodes.retain(|node| {
			let fresh = seen.insert(node.id.clone());
			if !fresh {
				warn!("dropping duplicate node id {}", node.id);
			}
			fresh
		});
	}
}
