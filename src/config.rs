//! Viewer configuration: data location, rendering defaults and palette.

use force_graph::SimulationParameters;

/// Relative path the graph document is fetched from.
pub const GRAPH_DATA_PATH: &str = "graph_data.json";

/// Query parameter that overrides [`GRAPH_DATA_PATH`].
pub const DATA_QUERY_PARAM: &str = "data";

/// Colours used by the styling rules and the search highlight.
pub mod palette {
	/// Ellipse (message-type) nodes.
	pub const MESSAGE_NODE: &str = "#FF6347";
	/// Box (keyword-type) nodes.
	pub const KEYWORD_NODE: &str = "#4682B4";
	/// `describes` edges.
	pub const DESCRIBES_EDGE: &str = "#32CD32";
	/// `follows` edges.
	pub const FOLLOWS_EDGE: &str = "#FFD700";
	/// `refers` edges.
	pub const REFERS_EDGE: &str = "#8A2BE2";
	/// Background of a search-highlighted node.
	pub const HIGHLIGHT_BACKGROUND: &str = "yellow";
	/// Border of a search-highlighted node.
	pub const HIGHLIGHT_BORDER: &str = "orange";

	/// Fill for nodes without a colour override.
	pub const DEFAULT_NODE_BACKGROUND: &str = "#97C2FC";
	/// Border for nodes without a colour override.
	pub const DEFAULT_NODE_BORDER: &str = "#2B7CE9";
	/// Stroke for edges without a colour override.
	pub const DEFAULT_EDGE: &str = "#848484";
	/// Canvas clear colour.
	pub const CANVAS_BACKGROUND: &str = "#1a1a2e";
}

/// Size and duration of the search highlight and focus.
pub mod search {
	/// Node size while highlighted.
	pub const HIGHLIGHT_SIZE: f64 = 20.0;
	/// Zoom level the view animates to.
	pub const FOCUS_SCALE: f64 = 1.5;
	/// Focus animation length in milliseconds.
	pub const FOCUS_DURATION_MS: f64 = 1000.0;
	/// Delay before the highlight is cleared, in milliseconds.
	pub const RESET_DELAY_MS: i32 = 3000;
}

/// Label alignment for edge labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelAlign {
	/// Drawn above the edge, unrotated.
	Horizontal,
	/// Drawn on the edge, rotated along it.
	Middle,
}

/// Defaults applied to every node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeOptions {
	/// Shape drawn for nodes whose own shape is not recognised.
	pub shape: &'static str,
	/// Dot radius; other shapes scale relative to it.
	pub size: f64,
	/// Label size in pixels.
	pub font_size: f64,
	/// Label colour.
	pub font_color: &'static str,
}

/// Defaults applied to every edge.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeOptions {
	/// Stroke width for edges without their own.
	pub width: f64,
	/// Edge label size in pixels.
	pub font_size: f64,
	/// Placement of edge labels.
	pub font_align: LabelAlign,
	/// Curved edges when set, straight segments otherwise.
	pub smooth: bool,
	/// Arrow head at the target end.
	pub arrow_to: bool,
	/// Multiplier on the arrow head length.
	pub arrow_scale_factor: f64,
}

/// Pointer interactions.
#[derive(Clone, Debug, PartialEq)]
pub struct InteractionOptions {
	/// Emphasise the hovered node and show its title.
	pub hover: bool,
	/// Move nodes by dragging them.
	pub drag_nodes: bool,
	/// Pan by dragging the background.
	pub drag_view: bool,
	/// Zoom with the mouse wheel.
	pub zoom_view: bool,
}

/// Barnes-Hut solver tuning.
#[derive(Clone, Debug, PartialEq)]
pub struct BarnesHut {
	/// Negative values repel.
	pub gravitational_constant: f64,
	/// Pull towards the origin.
	pub central_gravity: f64,
	/// Rest length of edge springs.
	pub spring_length: f64,
	/// Edge spring stiffness.
	pub spring_constant: f64,
}

/// Physics block. Tuning only takes effect when `enabled` is set.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsOptions {
	/// Run the simulation every frame.
	pub enabled: bool,
	/// Solver tuning.
	pub barnes_hut: BarnesHut,
}

impl PhysicsOptions {
	/// Map the Barnes-Hut tuning onto the force simulation.
	pub fn simulation_parameters(&self) -> SimulationParameters {
		let bh = &self.barnes_hut;
		SimulationParameters {
			force_charge: (-bh.gravitational_constant / 50.0) as f32,
			force_spring: bh.spring_constant as f32,
			force_max: bh.spring_length as f32 / 2.0,
			node_speed: 3000.0,
			damping_factor: (1.0 - bh.central_gravity) as f32,
		}
	}
}

/// Full rendering configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewerOptions {
	/// Node defaults.
	pub nodes: NodeOptions,
	/// Edge defaults.
	pub edges: EdgeOptions,
	/// Pointer interactions.
	pub interaction: InteractionOptions,
	/// Layout simulation.
	pub physics: PhysicsOptions,
}

impl Default for ViewerOptions {
	fn default() -> Self {
		Self {
			nodes: NodeOptions {
				shape: "dot",
				size: 15.0,
				font_size: 12.0,
				font_color: "#ffffff",
			},
			edges: EdgeOptions {
				width: 2.0,
				font_size: 10.0,
				font_align: LabelAlign::Middle,
				smooth: false,
				arrow_to: true,
				arrow_scale_factor: 1.0,
			},
			interaction: InteractionOptions {
				hover: true,
				drag_nodes: true,
				drag_view: true,
				zoom_view: true,
			},
			physics: PhysicsOptions {
				enabled: false,
				barnes_hut: BarnesHut {
					gravitational_constant: -8000.0,
					central_gravity: 0.1,
					spring_length: 200.0,
					spring_constant: 0.04,
				},
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_documented_values() {
		let opts = ViewerOptions::default();
		assert_eq!(opts.nodes.shape, "dot");
		assert_eq!(opts.nodes.size, 15.0);
		assert_eq!(opts.nodes.font_size, 12.0);
		assert_eq!(opts.nodes.font_color, "#ffffff");

		assert_eq!(opts.edges.width, 2.0);
		assert_eq!(opts.edges.font_size, 10.0);
		assert_eq!(opts.edges.font_align, LabelAlign::Middle);
		assert!(!opts.edges.smooth);
		assert!(opts.edges.arrow_to);
		assert_eq!(opts.edges.arrow_scale_factor, 1.0);

		assert!(opts.interaction.hover);
	}

	#[test]
	fn search_timing_matches_documented_values() {
		assert_eq!(search::HIGHLIGHT_SIZE, 20.0);
		assert_eq!(search::FOCUS_SCALE, 1.5);
		assert_eq!(search::FOCUS_DURATION_MS, 1000.0);
		assert_eq!(search::RESET_DELAY_MS, 3000);
		assert_eq!(palette::HIGHLIGHT_BACKGROUND, "yellow");
		assert_eq!(palette::HIGHLIGHT_BORDER, "orange");
	}

	#[test]
	fn physics_is_off_but_tuning_is_kept() {
		let physics = ViewerOptions::default().physics;
		assert!(!physics.enabled);
		assert_eq!(physics.barnes_hut.gravitational_constant, -8000.0);
		assert_eq!(physics.barnes_hut.central_gravity, 0.1);
		assert_eq!(physics.barnes_hut.spring_length, 200.0);
		assert_eq!(physics.barnes_hut.spring_constant, 0.04);
	}

	#[test]
	fn barnes_hut_maps_to_repulsive_simulation() {
		let params = ViewerOptions::default().physics.simulation_parameters();
		assert!(params.force_charge > 0.0);
		assert!((params.force_spring - 0.04).abs() < 1e-6);
		assert!(params.damping_factor > 0.0 && params.damping_factor < 1.0);
	}
}
