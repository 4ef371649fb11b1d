use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use crate::config::{LabelAlign, palette};

use super::state::{Extent, ViewState, node_extent, self_loop_circle, text_width};

const TOOLTIP_FONT: f64 = 12.0;
const TOOLTIP_PADDING: f64 = 6.0;
const TOOLTIP_MAX_CHARS: usize = 80;
const TOOLTIP_MAX_LINES: usize = 12;

pub fn render(state: &ViewState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(palette::CANVAS_BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
	draw_tooltip(state, ctx);
}

fn draw_edges(state: &ViewState, ctx: &CanvasRenderingContext2d) {
	let opts = &state.options.edges;
	let t = state.hover.highlight_t;
	let hovering = state.hover.node.is_some() || state.hover.edge.is_some();

	state.graph.visit_edges(|n1, n2, data| {
		let edge = &state.data.edges[data.user_data];
		let (x1, y1, x2, y2) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
		let from_extent = node_extent(&state.data.nodes[n1.data.user_data], &state.options);
		let to_extent = node_extent(&state.data.nodes[n2.data.user_data], &state.options);

		let incident = state.hover.edge == Some(data.user_data)
			|| state.is_hovered(n1.index())
			|| state.is_hovered(n2.index());
		let alpha = if hovering && !incident {
			1.0 - 0.6 * t
		} else {
			1.0
		};
		let width = edge.width.unwrap_or(opts.width) * if incident { 1.0 + 0.5 * t } else { 1.0 };
		let color = edge.color.as_deref().unwrap_or(palette::DEFAULT_EDGE);

		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(color);
		ctx.set_fill_style_str(color);
		ctx.set_line_width(width);

		if n1.index() == n2.index() {
			let (cx, cy, r) = self_loop_circle(from_extent, x1, y1);
			ctx.begin_path();
			let _ = ctx.arc(cx, cy, r, 0.0, 2.0 * PI);
			ctx.stroke();
			let label = edge.label.as_str();
			if !label.is_empty() {
				draw_edge_label(ctx, label, cx, cy - r, 0.0, opts.font_size, opts.font_align);
			}
			return;
		}

		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			return;
		}
		let (ux, uy) = (dx / dist, dy / dist);
		let (sx, sy) = (
			x1 + ux * from_extent.boundary_distance(ux, uy),
			y1 + uy * from_extent.boundary_distance(ux, uy),
		);
		let (tip_x, tip_y) = (
			x2 - ux * to_extent.boundary_distance(-ux, -uy),
			y2 - uy * to_extent.boundary_distance(-ux, -uy),
		);

		let arrow_len = if opts.arrow_to {
			(10.0 + 3.0 * width) * opts.arrow_scale_factor
		} else {
			0.0
		};
		let (end_x, end_y) = (tip_x - ux * arrow_len, tip_y - uy * arrow_len);

		ctx.begin_path();
		ctx.move_to(sx, sy);
		if opts.smooth {
			let (mx, my) = ((sx + end_x) / 2.0, (sy + end_y) / 2.0);
			let bend = 0.2 * dist;
			ctx.quadratic_curve_to(mx - uy * bend, my + ux * bend, end_x, end_y);
		} else {
			ctx.line_to(end_x, end_y);
		}
		ctx.stroke();

		if opts.arrow_to {
			let (px, py) = (-uy * arrow_len * 0.5, ux * arrow_len * 0.5);
			ctx.begin_path();
			ctx.move_to(tip_x, tip_y);
			ctx.line_to(end_x + px, end_y + py);
			ctx.line_to(end_x - px, end_y - py);
			ctx.close_path();
			ctx.fill();
		}

		let label = edge.label.as_str();
		if !label.is_empty() {
			let (mx, my) = ((sx + tip_x) / 2.0, (sy + tip_y) / 2.0);
			draw_edge_label(ctx, label, mx, my, uy.atan2(ux), opts.font_size, opts.font_align);
		}
	});
	ctx.set_global_alpha(1.0);
}

/// Keep rotated labels reading left to right.
fn upright_angle(angle: f64) -> f64 {
	if angle > PI / 2.0 {
		angle - PI
	} else if angle < -PI / 2.0 {
		angle + PI
	} else {
		angle
	}
}

fn draw_edge_label(
	ctx: &CanvasRenderingContext2d,
	label: &str,
	x: f64,
	y: f64,
	angle: f64,
	font_size: f64,
	align: LabelAlign,
) {
	ctx.save();
	let _ = ctx.translate(x, y);
	match align {
		LabelAlign::Middle => {
			let _ = ctx.rotate(upright_angle(angle));
			ctx.set_text_baseline("middle");
		}
		LabelAlign::Horizontal => ctx.set_text_baseline("bottom"),
	}
	ctx.set_text_align("center");
	ctx.set_font(&format!("{}px sans-serif", font_size));
	ctx.set_line_width(3.0);
	ctx.set_stroke_style_str(palette::CANVAS_BACKGROUND);
	let _ = ctx.stroke_text(label, 0.0, 0.0);
	ctx.set_fill_style_str("#dddddd");
	let _ = ctx.fill_text(label, 0.0, 0.0);
	ctx.restore();
}

fn draw_nodes(state: &ViewState, ctx: &CanvasRenderingContext2d) {
	let hovering = state.hover.node.is_some();
	let t = state.hover.highlight_t;

	// Dimmed nodes first, then the hovered neighbourhood on top.
	for emphasized_pass in [false, true] {
		state.graph.visit_nodes(|node| {
			let idx = node.index();
			let emphasized = hovering && state.is_emphasized(idx);
			if emphasized != emphasized_pass {
				return;
			}
			let alpha = if hovering && !emphasized {
				1.0 - 0.6 * t
			} else {
				1.0
			};
			ctx.set_global_alpha(alpha);
			draw_node(
				state,
				ctx,
				node.data.user_data,
				(node.x() as f64, node.y() as f64),
				state.is_hovered(idx),
			);
		});
	}
	ctx.set_global_alpha(1.0);
}

fn draw_node(
	state: &ViewState,
	ctx: &CanvasRenderingContext2d,
	slot: usize,
	(x, y): (f64, f64),
	hovered: bool,
) {
	let node = &state.data.nodes[slot];
	let opts = &state.options.nodes;
	let (fill, border) = match &node.color {
		Some(c) => (c.background(), c.border()),
		None => (palette::DEFAULT_NODE_BACKGROUND, palette::DEFAULT_NODE_BORDER),
	};
	let extent = node_extent(node, &state.options);

	ctx.begin_path();
	match extent {
		Extent::Circle { r } => {
			let _ = ctx.arc(x, y, r, 0.0, 2.0 * PI);
		}
		Extent::Ellipse { rx, ry } => {
			let _ = ctx.ellipse(x, y, rx, ry, 0.0, 0.0, 2.0 * PI);
		}
		Extent::Rect { hw, hh } => ctx.rect(x - hw, y - hh, 2.0 * hw, 2.0 * hh),
	}
	ctx.set_fill_style_str(fill);
	ctx.fill();
	ctx.set_stroke_style_str(border);
	ctx.set_line_width(if hovered { 2.0 } else { 1.0 });
	ctx.stroke();

	if node.label.is_empty() {
		return;
	}
	ctx.set_fill_style_str(opts.font_color);
	ctx.set_font(&format!("{}px sans-serif", opts.font_size));
	ctx.set_text_align("center");
	match extent {
		Extent::Circle { r } => {
			ctx.set_text_baseline("top");
			let _ = ctx.fill_text(&node.label, x, y + r + 2.0);
		}
		Extent::Ellipse { .. } | Extent::Rect { .. } => {
			ctx.set_text_baseline("middle");
			let _ = ctx.fill_text(&node.label, x, y);
		}
	}
}

/// Split a tooltip into display lines, clipping long lines and long texts.
pub fn tooltip_lines(title: &str) -> Vec<String> {
	let mut lines: Vec<String> = title
		.lines()
		.take(TOOLTIP_MAX_LINES)
		.map(|line| {
			if line.chars().count() > TOOLTIP_MAX_CHARS {
				let mut clipped: String = line.chars().take(TOOLTIP_MAX_CHARS - 1).collect();
				clipped.push('…');
				clipped
			} else {
				line.to_string()
			}
		})
		.collect();
	if title.lines().count() > TOOLTIP_MAX_LINES {
		lines.push("…".into());
	}
	lines
}

/// Title of whatever is hovered, with the screen point to anchor it at.
fn hovered_title(state: &ViewState) -> Option<(&str, f64, f64)> {
	if let Some(idx) = state.hover.node {
		let node = state.node_data(idx)?;
		let (nx, ny) = state.node_position(idx)?;
		return Some((
			&node.title,
			nx * state.transform.k + state.transform.x,
			ny * state.transform.k + state.transform.y,
		));
	}
	let edge = state.data.edges.get(state.hover.edge?)?;
	let (px, py) = state.hover.pointer;
	Some((edge.title.as_deref()?, px, py))
}

fn draw_tooltip(state: &ViewState, ctx: &CanvasRenderingContext2d) {
	if state.hover.highlight_t < 0.5 {
		return;
	}
	let Some((title, ax, ay)) = hovered_title(state) else {
		return;
	};
	let lines = tooltip_lines(title);
	if lines.is_empty() {
		return;
	}

	let line_h = TOOLTIP_FONT * 1.3;
	let w = lines
		.iter()
		.map(|l| text_width(l, TOOLTIP_FONT))
		.fold(0.0, f64::max)
		+ 2.0 * TOOLTIP_PADDING;
	let h = lines.len() as f64 * line_h + 2.0 * TOOLTIP_PADDING;
	let sx = (ax + 12.0).min(state.width - w).max(0.0);
	let sy = (ay + 12.0).min(state.height - h).max(0.0);

	ctx.set_global_alpha(state.hover.highlight_t);
	ctx.set_fill_style_str("rgba(0, 0, 0, 0.85)");
	ctx.fill_rect(sx, sy, w, h);
	ctx.set_stroke_style_str("rgba(255, 255, 255, 0.3)");
	ctx.set_line_width(1.0);
	ctx.stroke_rect(sx, sy, w, h);

	ctx.set_fill_style_str("white");
	ctx.set_font(&format!("{}px sans-serif", TOOLTIP_FONT));
	ctx.set_text_align("left");
	ctx.set_text_baseline("top");
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(
			line,
			sx + TOOLTIP_PADDING,
			sy + TOOLTIP_PADDING + i as f64 * line_h,
		);
	}
	ctx.set_global_alpha(1.0);
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn labels_never_render_upside_down() {
		assert_eq!(upright_angle(0.3), 0.3);
		assert!((upright_angle(PI) - 0.0).abs() < 1e-9);
		assert!((upright_angle(-3.0 * PI / 4.0) - PI / 4.0).abs() < 1e-9);
	}

	#[test]
	fn tooltip_keeps_short_titles() {
		assert_eq!(
			tooltip_lines("Timestamp: 2024-01-01T10:00:00\nhi"),
			vec!["Timestamp: 2024-01-01T10:00:00", "hi"]
		);
		assert!(tooltip_lines("").is_empty());
	}

	#[test]
	fn tooltip_clips_long_content() {
		let long = "x".repeat(200);
		let lines = tooltip_lines(&long);
		assert_eq!(lines[0].chars().count(), TOOLTIP_MAX_CHARS);
		assert!(lines[0].ends_with('…'));

		let many = vec!["line"; 20].join("\n");
		let lines = tooltip_lines(&many);
		assert_eq!(lines.len(), TOOLTIP_MAX_LINES + 1);
		assert_eq!(lines.last().map(String::as_str), Some("…"));
	}
}
