use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData};
use log::{debug, warn};

use crate::config::{ViewerOptions, palette, search as search_cfg};

use super::search::{HighlightToken, HighlightTracker, first_match, normalize_query};
use super::types::{GraphDataset, Node, NodeColor, NodeId, NodeShape};

/// Horizontal space reserved per node on the initial ring.
const RING_SPACING: f64 = 60.0;
const MIN_RING_RADIUS: f64 = 100.0;
const MIN_LOOP_RADIUS: f64 = 10.0;
const LABEL_MARGIN: f64 = 5.0;
const MIN_ZOOM: f64 = 0.1;
const MAX_ZOOM: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	/// Index into `data.edges`; only set while no node is hovered.
	pub edge: Option<usize>,
	/// Last pointer position in screen space.
	pub pointer: (f64, f64),
	/// Eases from 0 to 1 while something is hovered.
	pub highlight_t: f64,
}

/// Animated camera move towards a node.
#[derive(Clone, Debug)]
pub struct FocusAnimation {
	from: ViewTransform,
	to: ViewTransform,
	elapsed_ms: f64,
	duration_ms: f64,
}

impl FocusAnimation {
	fn step(&mut self, dt_ms: f64) -> ViewTransform {
		self.elapsed_ms = (self.elapsed_ms + dt_ms).min(self.duration_ms);
		let t = ease_in_out_quad(if self.duration_ms > 0.0 {
			self.elapsed_ms / self.duration_ms
		} else {
			1.0
		});
		ViewTransform {
			x: self.from.x + (self.to.x - self.from.x) * t,
			y: self.from.y + (self.to.y - self.from.y) * t,
			k: self.from.k + (self.to.k - self.from.k) * t,
		}
	}

	fn finished(&self) -> bool {
		self.elapsed_ms >= self.duration_ms
	}
}

fn ease_in_out_quad(t: f64) -> f64 {
	if t < 0.5 {
		2.0 * t * t
	} else {
		-1.0 + (4.0 - 2.0 * t) * t
	}
}

/// Outline of a drawn node, centred on its position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Extent {
	Circle { r: f64 },
	Ellipse { rx: f64, ry: f64 },
	Rect { hw: f64, hh: f64 },
}

impl Extent {
	pub fn contains(&self, dx: f64, dy: f64) -> bool {
		match *self {
			Extent::Circle { r } => dx * dx + dy * dy <= r * r,
			Extent::Ellipse { rx, ry } => (dx / rx).powi(2) + (dy / ry).powi(2) <= 1.0,
			Extent::Rect { hw, hh } => dx.abs() <= hw && dy.abs() <= hh,
		}
	}

	/// Distance from the centre to the outline along unit direction `(ux, uy)`.
	pub fn boundary_distance(&self, ux: f64, uy: f64) -> f64 {
		match *self {
			Extent::Circle { r } => r,
			Extent::Ellipse { rx, ry } => 1.0 / ((ux / rx).powi(2) + (uy / ry).powi(2)).sqrt(),
			Extent::Rect { hw, hh } => {
				let tx = if ux.abs() > f64::EPSILON { hw / ux.abs() } else { f64::INFINITY };
				let ty = if uy.abs() > f64::EPSILON { hh / uy.abs() } else { f64::INFINITY };
				tx.min(ty)
			}
		}
	}
}

/// Distance from `(px, py)` to the segment `a`-`b`.
fn segment_distance(px: f64, py: f64, (ax, ay): (f64, f64), (bx, by): (f64, f64)) -> f64 {
	let (dx, dy) = (bx - ax, by - ay);
	let len2 = dx * dx + dy * dy;
	let t = if len2 > 0.0 {
		(((px - ax) * dx + (py - ay) * dy) / len2).clamp(0.0, 1.0)
	} else {
		0.0
	};
	let (cx, cy) = (ax + t * dx, ay + t * dy);
	((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

/// Circle `(cx, cy, r)` for an edge that starts and ends at the node at `(x, y)`.
/// It sits on top of the node and overlaps the outline slightly.
pub fn self_loop_circle(extent: Extent, x: f64, y: f64) -> (f64, f64, f64) {
	let top = extent.boundary_distance(0.0, -1.0);
	let r = (top * 0.75).max(MIN_LOOP_RADIUS);
	(x, y - top - r * 0.5, r)
}

/// Rough rendered width of `text`; shared by layout and drawing so hit tests agree.
pub fn text_width(text: &str, font_size: f64) -> f64 {
	text.chars().count() as f64 * font_size * 0.6
}

pub fn node_extent(node: &Node, options: &ViewerOptions) -> Extent {
	let size = node.size.unwrap_or(options.nodes.size);
	let scale = size / options.nodes.size;
	let font = options.nodes.font_size;
	let shape = match &node.shape {
		NodeShape::Other(_) => NodeShape::from(options.nodes.shape.to_string()),
		known => known.clone(),
	};
	match shape {
		NodeShape::Ellipse => {
			let w = text_width(&node.label, font) + 2.0 * LABEL_MARGIN;
			let h = font + 2.0 * LABEL_MARGIN;
			Extent::Ellipse {
				rx: w.max(h) / 2.0 * scale,
				ry: h / 2.0 * scale,
			}
		}
		NodeShape::Box => Extent::Rect {
			hw: (text_width(&node.label, font) / 2.0 + LABEL_MARGIN) * scale,
			hh: (font / 2.0 + LABEL_MARGIN) * scale,
		},
		NodeShape::Dot | NodeShape::Other(_) => Extent::Circle { r: size },
	}
}

/// What a search did to the view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
	/// Empty query, nothing changed.
	Ignored,
	/// No node matched; nothing changed.
	NoMatch,
	/// The node was highlighted and focused. Pass `token` back to
	/// [`ViewState::revert_highlight`] once the highlight should end.
	Focused { node: NodeId, token: HighlightToken },
}

/// Layout and interaction state for one rendered graph.
pub struct ViewState {
	pub data: GraphDataset,
	pub options: ViewerOptions,
	/// Node user data indexes `data.nodes`; edge user data indexes `data.edges`.
	pub graph: ForceGraph<usize, usize>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub focus: Option<FocusAnimation>,
	pub width: f64,
	pub height: f64,
	highlight: HighlightTracker,
	id_to_idx: HashMap<NodeId, DefaultNodeIdx>,
	edges: Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
}

impl ViewState {
	pub fn new(data: GraphDataset, options: ViewerOptions, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(options.physics.simulation_parameters());
		let mut id_to_idx = HashMap::new();
		let mut edges = Vec::new();

		let count = data.nodes.len().max(1) as f64;
		let radius = (count * RING_SPACING / (2.0 * PI)).max(MIN_RING_RADIUS);
		for (i, node) in data.nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / count;
			let idx = graph.add_node(NodeData {
				x: (radius * angle.cos()) as f32,
				y: (radius * angle.sin()) as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: i,
			});
			id_to_idx.insert(node.id.clone(), idx);
		}

		for (i, edge) in data.edges.iter().enumerate() {
			match (id_to_idx.get(&edge.from), id_to_idx.get(&edge.to)) {
				(Some(&src), Some(&tgt)) => {
					graph.add_edge(src, tgt, EdgeData { user_data: i });
					edges.push((src, tgt));
				}
				_ => warn!(
					"skipping edge {:?} ({} -> {}): unknown endpoint",
					edge.id, edge.from, edge.to
				),
			}
		}

		let k = (width.min(height) / (2.0 * radius + 100.0)).clamp(MIN_ZOOM, 1.0);

		Self {
			data,
			options,
			graph,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			focus: None,
			width,
			height,
			highlight: HighlightTracker::default(),
			id_to_idx,
			edges,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let extent = node_extent(&self.data.nodes[node.data.user_data], &self.options);
			if extent.contains(gx - node.x() as f64, gy - node.y() as f64) {
				found = Some(node.index());
			}
		});
		found
	}

	/// Edge under the pointer, as an index into `data.edges`.
	pub fn edge_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let tolerance = 4.0 / self.transform.k;
		let mut found = None;
		self.graph.visit_edges(|n1, n2, data| {
			let width = self.data.edges[data.user_data]
				.width
				.unwrap_or(self.options.edges.width);
			let d = if n1.index() == n2.index() {
				let extent = node_extent(&self.data.nodes[n1.data.user_data], &self.options);
				let (cx, cy, r) = self_loop_circle(extent, n1.x() as f64, n1.y() as f64);
				(((gx - cx).powi(2) + (gy - cy).powi(2)).sqrt() - r).abs()
			} else {
				segment_distance(
					gx,
					gy,
					(n1.x() as f64, n1.y() as f64),
					(n2.x() as f64, n2.y() as f64),
				)
			};
			if d <= width / 2.0 + tolerance {
				found = Some(data.user_data);
			}
		});
		found
	}

	pub fn node_position(&self, idx: DefaultNodeIdx) -> Option<(f64, f64)> {
		let mut pos = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				pos = Some((node.x() as f64, node.y() as f64));
			}
		});
		pos
	}

	/// Dataset node behind a graph index.
	pub fn node_data(&self, idx: DefaultNodeIdx) -> Option<&Node> {
		let mut slot = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				slot = Some(node.data.user_data);
			}
		});
		slot.and_then(|i| self.data.nodes.get(i))
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if !self.options.interaction.hover || self.hover.node == node {
			return;
		}
		if self.hover.node.is_none() && self.hover.edge.is_none() {
			self.hover.highlight_t = 0.0;
		}
		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			for &(src, tgt) in &self.edges {
				if src == idx {
					self.hover.neighbors.insert(tgt);
				} else if tgt == idx {
					self.hover.neighbors.insert(src);
				}
			}
		}
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
	}

	/// Hovered node or one of its neighbours.
	pub fn is_emphasized(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.neighbors.contains(&idx)
	}

	pub fn pointer_down(&mut self, x: f64, y: f64) {
		self.focus = None;
		let hit = self.node_at_position(x, y);
		match hit {
			Some(idx) if self.options.interaction.drag_nodes => {
				let (nx, ny) = self.node_position(idx).unwrap_or_default();
				self.drag = DragState {
					active: true,
					node_idx: Some(idx),
					start_x: x,
					start_y: y,
					node_start_x: nx as f32,
					node_start_y: ny as f32,
				};
			}
			_ if self.options.interaction.drag_view => {
				self.pan = PanState {
					active: true,
					start_x: x,
					start_y: y,
					transform_start_x: self.transform.x,
					transform_start_y: self.transform.y,
				};
			}
			_ => {}
		}
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		self.hover.pointer = (x, y);
		if !self.drag.active {
			let hovered = self.node_at_position(x, y);
			self.set_hover(hovered);
			self.hover.edge = match hovered {
				None if self.options.interaction.hover => self.edge_at_position(x, y),
				_ => None,
			};
		}

		if self.drag.active {
			if let Some(idx) = self.drag.node_idx {
				let (dx, dy) = (
					(x - self.drag.start_x) / self.transform.k,
					(y - self.drag.start_y) / self.transform.k,
				);
				let (nx, ny) = (
					self.drag.node_start_x + dx as f32,
					self.drag.node_start_y + dy as f32,
				);
				self.graph.visit_nodes_mut(|node| {
					if node.index() == idx {
						node.data.x = nx;
						node.data.y = ny;
						node.data.is_anchor = true;
					}
				});
			}
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
		}
	}

	pub fn pointer_up(&mut self) {
		self.drag.active = false;
		self.drag.node_idx = None;
		self.pan.active = false;
	}

	pub fn pointer_leave(&mut self) {
		self.pointer_up();
		self.set_hover(None);
		self.hover.edge = None;
	}

	/// Zoom by one wheel notch around the screen point `(x, y)`.
	pub fn zoom_at(&mut self, x: f64, y: f64, delta_y: f64) {
		if !self.options.interaction.zoom_view {
			return;
		}
		self.focus = None;
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Start animating the view so `id` ends up centred at `scale`.
	pub fn focus_on(&mut self, id: &NodeId, scale: f64, duration_ms: f64) {
		let Some((nx, ny)) = self
			.id_to_idx
			.get(id)
			.and_then(|&idx| self.node_position(idx))
		else {
			return;
		};
		self.focus = Some(FocusAnimation {
			from: self.transform,
			to: ViewTransform {
				x: self.width / 2.0 - nx * scale,
				y: self.height / 2.0 - ny * scale,
				k: scale,
			},
			elapsed_ms: 0.0,
			duration_ms,
		});
	}

	/// Highlight and focus the first node matching `raw_query`.
	pub fn search(&mut self, raw_query: &str) -> SearchOutcome {
		let Some(query) = normalize_query(raw_query) else {
			return SearchOutcome::Ignored;
		};
		let Some(pos) = first_match(&self.data.nodes, &query) else {
			debug!("search {:?}: no match", query);
			return SearchOutcome::NoMatch;
		};

		let id = self.data.nodes[pos].id.clone();
		let (token, previous) = self.highlight.begin(id.clone());
		if let Some(prev) = previous {
			self.clear_override(&prev);
		}

		let node = &mut self.data.nodes[pos];
		node.color = Some(NodeColor::Split {
			background: palette::HIGHLIGHT_BACKGROUND.to_string(),
			border: palette::HIGHLIGHT_BORDER.to_string(),
		});
		node.size = Some(search_cfg::HIGHLIGHT_SIZE);

		self.focus_on(&id, search_cfg::FOCUS_SCALE, search_cfg::FOCUS_DURATION_MS);
		debug!("search {:?}: focused {}", query, id);
		SearchOutcome::Focused { node: id, token }
	}

	/// End the highlight started by the search that produced `token`.
	/// Clears the node back to default colour and size. Returns false for a
	/// stale token.
	pub fn revert_highlight(&mut self, token: HighlightToken) -> bool {
		match self.highlight.finish(token) {
			Some(id) => {
				self.clear_override(&id);
				true
			}
			None => false,
		}
	}

	pub fn highlighted(&self) -> Option<&NodeId> {
		self.highlight.current()
	}

	fn clear_override(&mut self, id: &NodeId) {
		if let Some(node) = self.data.node_mut(id) {
			node.color = None;
			node.size = None;
		}
	}

	/// Advance animations by `dt` seconds.
	pub fn tick(&mut self, dt: f64) {
		if self.options.physics.enabled {
			self.graph.update(dt as f32);
		}

		if let Some(anim) = self.focus.as_mut() {
			self.transform = anim.step(dt * 1000.0);
			if anim.finished() {
				self.focus = None;
			}
		}

		let target = if self.hover.node.is_some() || self.hover.edge.is_some() {
			1.0
		} else {
			0.0
		};
		self.hover.highlight_t += (target - self.hover.highlight_t) * (6.0 * dt).min(1.0);
		if self.hover.highlight_t < 0.01 {
			self.hover.highlight_t = 0.0;
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_view::loader::parse_graph;
	use crate::components::graph_view::search::ResetSlot;

	fn state(json: &str) -> ViewState {
		ViewState::new(
			parse_graph(json).unwrap(),
			ViewerOptions::default(),
			800.0,
			600.0,
		)
	}

	fn sample() -> ViewState {
		state(
			r#"{
			"nodes": [
				{"id":"k1","label":"Cats","title":"Content: cats purr","shape":"ellipse"},
				{"id":"m1","label":"hello there","title":"Timestamp: t1","shape":"box"},
				{"id":"m2","label":"Cat food","title":"Timestamp: t2","shape":"box"}
			],
			"edges": [
				{"from":"k1","to":"m1","label":"describes"},
				{"from":"m1","to":"m2","label":"follows"},
				{"from":"m2","to":"ghost","label":"refers"}
			]
		}"#,
		)
	}

	fn run_for(s: &mut ViewState, ms: f64) {
		let steps = (ms / 16.0).ceil() as usize;
		for _ in 0..steps {
			s.tick(0.016);
		}
	}

	#[test]
	fn hello_scenario_highlights_then_reverts() {
		let mut s = state(
			r#"{"nodes":[{"id":1,"label":"Hello","title":"x","shape":"ellipse"}],"edges":[]}"#,
		);
		let SearchOutcome::Focused { node, token } = s.search("hel") else {
			panic!("expected a match");
		};
		assert_eq!(node, NodeId::from("1"));

		let n = &s.data.nodes[0];
		assert_eq!(n.color.as_ref().map(NodeColor::background), Some("yellow"));
		assert_eq!(n.color.as_ref().map(NodeColor::border), Some("orange"));
		assert_eq!(n.size, Some(20.0));

		assert!(s.revert_highlight(token));
		let n = &s.data.nodes[0];
		assert_eq!(n.color, None);
		assert_eq!(n.size, None);
	}

	#[test]
	fn empty_query_changes_nothing() {
		let mut s = sample();
		let before = s.data.clone();
		assert_eq!(s.search(""), SearchOutcome::Ignored);
		assert_eq!(s.data, before);
		assert!(s.focus.is_none());
	}

	#[test]
	fn no_match_changes_nothing() {
		let mut s = sample();
		let before = s.data.clone();
		assert_eq!(s.search("pizza"), SearchOutcome::NoMatch);
		assert_eq!(s.data, before);
		assert!(s.focus.is_none());
		assert_eq!(s.highlighted(), None);
	}

	#[test]
	fn first_match_in_node_order_wins() {
		let mut s = sample();
		let outcome = s.search("CAT");
		assert!(matches!(outcome, SearchOutcome::Focused { ref node, .. } if node.0 == "k1"));
		assert_eq!(s.data.nodes[2].size, None);
	}

	#[test]
	fn title_text_is_searched() {
		let mut s = sample();
		let outcome = s.search("t2");
		assert!(matches!(outcome, SearchOutcome::Focused { ref node, .. } if node.0 == "m2"));
	}

	#[test]
	fn focus_centres_node_at_search_scale() {
		let mut s = sample();
		s.search("hello");
		let idx = s.id_to_idx[&NodeId::from("m1")];
		let (nx, ny) = s.node_position(idx).unwrap();

		run_for(&mut s, 1100.0);
		assert!(s.focus.is_none());
		assert!((s.transform.k - 1.5).abs() < 1e-9);
		let sx = nx * s.transform.k + s.transform.x;
		let sy = ny * s.transform.k + s.transform.y;
		assert!((sx - 400.0).abs() < 1e-6);
		assert!((sy - 300.0).abs() < 1e-6);
	}

	#[test]
	fn focus_is_still_moving_halfway() {
		let mut s = sample();
		let start = s.transform;
		s.search("hello");
		run_for(&mut s, 496.0);
		assert!(s.focus.is_some());
		assert_ne!(s.transform, start);
		assert!(s.transform.k > start.k && s.transform.k < 1.5);
	}

	#[test]
	fn revert_clears_to_defaults_not_previous_style() {
		let mut s = sample();
		assert_eq!(
			s.data.nodes[1].color.as_ref().map(NodeColor::background),
			Some("#4682B4")
		);
		let SearchOutcome::Focused { token, .. } = s.search("hello") else {
			panic!("expected a match");
		};
		s.revert_highlight(token);
		assert_eq!(s.data.nodes[1].color, None);
	}

	#[test]
	fn stale_reset_leaves_newer_highlight() {
		let mut s = sample();
		let SearchOutcome::Focused { token: first, .. } = s.search("hello") else {
			panic!("expected a match");
		};
		let SearchOutcome::Focused { token: second, .. } = s.search("cats") else {
			panic!("expected a match");
		};

		// The newer search already cleared the older node.
		assert_eq!(s.data.nodes[1].color, None);
		assert!(!s.revert_highlight(first));
		assert_eq!(s.data.nodes[0].size, Some(20.0));
		assert_eq!(s.highlighted(), Some(&NodeId::from("k1")));

		assert!(s.revert_highlight(second));
		assert_eq!(s.data.nodes[0].size, None);
	}

	#[test]
	fn dangling_edges_are_skipped() {
		let s = sample();
		let mut count = 0;
		s.graph.visit_edges(|_, _, _| count += 1);
		assert_eq!(count, 2);
		assert_eq!(s.edges.len(), 2);
	}

	#[test]
	fn positions_hold_still_without_physics() {
		let mut s = sample();
		let idx = s.id_to_idx[&NodeId::from("k1")];
		let before = s.node_position(idx).unwrap();
		run_for(&mut s, 500.0);
		assert_eq!(s.node_position(idx).unwrap(), before);
	}

	#[test]
	fn hover_collects_neighbors() {
		let mut s = sample();
		let m1 = s.id_to_idx[&NodeId::from("m1")];
		s.set_hover(Some(m1));
		assert!(s.is_hovered(m1));
		assert_eq!(s.hover.neighbors.len(), 2);
		s.set_hover(None);
		assert!(s.hover.neighbors.is_empty());
	}

	#[test]
	fn node_under_pointer_is_found() {
		let s = sample();
		let idx = s.id_to_idx[&NodeId::from("m1")];
		let (nx, ny) = s.node_position(idx).unwrap();
		let sx = nx * s.transform.k + s.transform.x;
		let sy = ny * s.transform.k + s.transform.y;
		assert_eq!(s.node_at_position(sx, sy), Some(idx));
		assert_eq!(s.node_data(idx).map(|n| n.label.as_str()), Some("hello there"));
	}

	#[test]
	fn dragging_moves_only_the_grabbed_node() {
		let mut s = sample();
		let idx = s.id_to_idx[&NodeId::from("m1")];
		let (nx, ny) = s.node_position(idx).unwrap();
		let (sx, sy) = (nx * s.transform.k + s.transform.x, ny * s.transform.k + s.transform.y);

		s.pointer_down(sx, sy);
		s.pointer_move(sx + 10.0, sy);
		s.pointer_up();

		let (mx, my) = s.node_position(idx).unwrap();
		assert!((mx - (nx + 10.0 / s.transform.k)).abs() < 1e-3);
		assert!((my - ny).abs() < 1e-3);
	}

	#[test]
	fn edge_under_pointer_is_found_between_nodes() {
		let mut s = sample();
		let (a, b) = (s.id_to_idx[&NodeId::from("k1")], s.id_to_idx[&NodeId::from("m1")]);
		let (ax, ay) = s.node_position(a).unwrap();
		let (bx, by) = s.node_position(b).unwrap();
		let (mx, my) = ((ax + bx) / 2.0, (ay + by) / 2.0);
		let (sx, sy) = (mx * s.transform.k + s.transform.x, my * s.transform.k + s.transform.y);

		assert_eq!(s.edge_at_position(sx, sy), Some(0));
		s.pointer_move(sx, sy);
		assert_eq!(s.hover.edge, Some(0));
		assert_eq!(s.hover.node, None);
		s.pointer_leave();
		assert_eq!(s.hover.edge, None);
	}

	#[test]
	fn self_loop_sits_above_its_node() {
		let (cx, cy, r) = self_loop_circle(Extent::Circle { r: 15.0 }, 10.0, 20.0);
		assert_eq!(cx, 10.0);
		assert!((r - 11.25).abs() < 1e-9);
		assert!(cy + r > 20.0 - 15.0);
		assert!(cy < 20.0 - 15.0);

		let (_, _, r) = self_loop_circle(Extent::Rect { hw: 30.0, hh: 4.0 }, 0.0, 0.0);
		assert_eq!(r, MIN_LOOP_RADIUS);
	}

	#[test]
	fn self_loop_is_kept_and_hoverable() {
		let s = state(
			r#"{
			"nodes": [{"id":"m1","label":"again","shape":"box"}],
			"edges": [{"from":"m1","to":"m1","label":"follows","title":"loop"}]
		}"#,
		);
		assert_eq!(s.edges.len(), 1);

		let idx = s.id_to_idx[&NodeId::from("m1")];
		let (nx, ny) = s.node_position(idx).unwrap();
		let extent = node_extent(&s.data.nodes[0], &s.options);
		let (cx, cy, r) = self_loop_circle(extent, nx, ny);
		let to_screen = |x: f64, y: f64| (x * s.transform.k + s.transform.x, y * s.transform.k + s.transform.y);

		let (tx, ty) = to_screen(cx, cy - r);
		assert_eq!(s.edge_at_position(tx, ty), Some(0));
		let (ix, iy) = to_screen(cx, cy);
		assert_eq!(s.edge_at_position(ix, iy), None);
	}

	#[test]
	fn second_search_cancels_pending_reset() {
		let mut s = sample();
		let mut pending = ResetSlot::default();
		let mut cancelled = Vec::new();

		let SearchOutcome::Focused { token: first, .. } = s.search("hello") else {
			panic!("expected a match");
		};
		pending.schedule(first, |t| cancelled.push(t));
		let SearchOutcome::Focused { token: second, .. } = s.search("cats") else {
			panic!("expected a match");
		};
		pending.schedule(second, |t| cancelled.push(t));

		assert_eq!(cancelled, vec![first]);
		// Even if the cancelled timer had fired, it would not clear the newer highlight.
		assert!(!s.revert_highlight(first));
		assert_eq!(s.highlighted(), Some(&NodeId::from("k1")));
	}

	#[test]
	fn segment_distance_clamps_to_endpoints() {
		assert!((segment_distance(5.0, 3.0, (0.0, 0.0), (10.0, 0.0)) - 3.0).abs() < 1e-9);
		assert!((segment_distance(13.0, 4.0, (0.0, 0.0), (10.0, 0.0)) - 5.0).abs() < 1e-9);
	}

	#[test]
	fn wheel_zoom_keeps_point_fixed() {
		let mut s = sample();
		let before = s.screen_to_graph(100.0, 100.0);
		s.zoom_at(100.0, 100.0, -1.0);
		let after = s.screen_to_graph(100.0, 100.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn extents_follow_shape() {
		let opts = ViewerOptions::default();
		let mut node = Node {
			id: NodeId::from("n"),
			label: "abc".into(),
			title: String::new(),
			shape: NodeShape::Dot,
			color: None,
			size: None,
		};
		assert_eq!(node_extent(&node, &opts), Extent::Circle { r: 15.0 });
		node.size = Some(20.0);
		assert_eq!(node_extent(&node, &opts), Extent::Circle { r: 20.0 });
		node.shape = NodeShape::Other("star".into());
		assert_eq!(node_extent(&node, &opts), Extent::Circle { r: 20.0 });

		node.size = None;
		node.shape = NodeShape::Box;
		let Extent::Rect { hw, hh } = node_extent(&node, &opts) else {
			panic!("box should be a rect");
		};
		assert!(hw > hh);
		assert!(Extent::Rect { hw, hh }.contains(hw - 0.1, 0.0));
		assert!((Extent::Rect { hw, hh }.boundary_distance(0.0, 1.0) - hh).abs() < 1e-9);

		let e = Extent::Ellipse { rx: 4.0, ry: 2.0 };
		assert!((e.boundary_distance(1.0, 0.0) - 4.0).abs() < 1e-9);
		assert!((e.boundary_distance(0.0, 1.0) - 2.0).abs() < 1e-9);
	}
}
