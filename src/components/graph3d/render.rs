use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::Graph3dState;

const GRID_STEP: f64 = 50.0;
const HOVER_SIZE_BOOST: f64 = 1.5;

/// Full redraw: background, depth-sorted edges, depth-sorted nodes, info
/// panel. Rebuilds the projection cache first so hit-testing stays in
/// sync with what is on screen.
pub fn render(state: &mut Graph3dState, ctx: &CanvasRenderingContext2d) {
	ctx.clear_rect(0.0, 0.0, state.width, state.height);
	if state.graph.is_none() {
		return;
	}
	state.reproject();
	draw_background(state, ctx);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	draw_info_panel(state, ctx);
}

fn draw_background(state: &Graph3dState, ctx: &CanvasRenderingContext2d) {
	let (w, h) = (state.width, state.height);
	let gradient = ctx
		.create_radial_gradient(w / 2.0, h / 2.0, 0.0, w / 2.0, h / 2.0, w / 1.5)
		.unwrap();
	gradient.add_color_stop(0.0, "#1e1e2e").unwrap();
	gradient.add_color_stop(0.5, "#181825").unwrap();
	gradient.add_color_stop(1.0, "#0f0f1a").unwrap();
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, w, h);

	ctx.set_stroke_style_str("rgba(255, 255, 255, 0.02)");
	ctx.set_line_width(1.0);
	let mut x = 0.0;
	while x < w {
		ctx.begin_path();
		ctx.move_to(x, 0.0);
		ctx.line_to(x, h);
		ctx.stroke();
		x += GRID_STEP;
	}
	let mut y = 0.0;
	while y < h {
		ctx.begin_path();
		ctx.move_to(0.0, y);
		ctx.line_to(w, y);
		ctx.stroke();
		y += GRID_STEP;
	}
}

fn draw_edges(state: &Graph3dState, ctx: &CanvasRenderingContext2d) {
	ctx.set_line_cap("round");
	ctx.set_line_join("round");
	for (a, b, depth) in state.edge_draw_order() {
		let (p1, p2) = (&state.projected[a], &state.projected[b]);
		let f = depth_factor(depth);
		ctx.set_stroke_style_str(&format!("rgba(99, 179, 237, {})", 0.5 + 0.3 * f));
		ctx.set_line_width(2.0 + 0.8 * f);
		ctx.begin_path();
		ctx.move_to(p1.x, p1.y);
		ctx.line_to(p2.x, p2.y);
		ctx.stroke();
	}
}

fn draw_nodes(state: &Graph3dState, ctx: &CanvasRenderingContext2d) {
	let zoom = state.camera.zoom;
	for idx in state.node_draw_order() {
		let p = &state.projected[idx];
		let hovered = state.hovered == Some(idx);
		let size = node_radius(p.size_scale(zoom), hovered);
		let f = depth_factor(p.depth);

		// offset inner stop fakes a light source up-left of the sphere
		let gradient = ctx
			.create_radial_gradient(p.x - size * 0.3, p.y - size * 0.3, 0.0, p.x, p.y, size)
			.unwrap();
		if hovered {
			gradient.add_color_stop(0.0, "rgba(255, 220, 100, 1)").unwrap();
			gradient
				.add_color_stop(0.6, "rgba(255, 180, 50, 0.95)")
				.unwrap();
			gradient
				.add_color_stop(1.0, "rgba(230, 140, 30, 0.8)")
				.unwrap();
		} else {
			let (r, g, b) = node_color(f);
			gradient
				.add_color_stop(0.0, &format!("rgba({}, {}, {}, 0.95)", r, g, b))
				.unwrap();
			gradient
				.add_color_stop(0.7, &format!("rgba({}, {}, {}, 0.9)", r - 30, g - 20, b - 30))
				.unwrap();
			gradient
				.add_color_stop(
					1.0,
					&format!("rgba({}, {}, {}, 0.75)", r - 60, g - 40, b - 60),
				)
				.unwrap();
		}
		ctx.begin_path();
		let _ = ctx.arc(p.x, p.y, size, 0.0, 2.0 * PI);
		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
		ctx.fill();

		ctx.begin_path();
		let _ = ctx.arc(p.x, p.y, size, 0.0, 2.0 * PI);
		if hovered {
			ctx.set_stroke_style_str("rgba(255, 255, 255, 1)");
			ctx.set_line_width(2.5);
		} else {
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.5 + 0.3 * f));
			ctx.set_line_width(1.5);
		}
		ctx.stroke();

		if !hovered {
			ctx.begin_path();
			let _ = ctx.arc(p.x, p.y, size * 0.5, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(255, 200, 255, {})", 0.3 + 0.2 * f));
			ctx.set_line_width(1.0);
			ctx.stroke();
		}
	}
}

fn draw_info_panel(state: &Graph3dState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("rgba(20, 20, 40, 0.85)");
	ctx.fill_rect(10.0, 10.0, 240.0, 70.0);
	ctx.set_stroke_style_str("rgba(99, 179, 237, 0.4)");
	ctx.set_line_width(1.0);
	ctx.stroke_rect(10.0, 10.0, 240.0, 70.0);

	ctx.set_fill_style_str("#cdd6f4");
	ctx.set_font("bold 13px sans-serif");
	let _ = ctx.fill_text(
		&format!(
			"Nodes: {}   Edges: {}",
			state.node_count(),
			state.edge_count()
		),
		20.0,
		32.0,
	);
	ctx.set_fill_style_str("#a6adc8");
	ctx.set_font("12px sans-serif");
	let _ = ctx.fill_text(&format!("Zoom: {:.0}%", state.zoom_percent()), 20.0, 52.0);
	ctx.set_fill_style_str("#6c7086");
	ctx.set_font("11px sans-serif");
	let _ = ctx.fill_text("Drag to rotate | Hover for details", 20.0, 70.0);
}

/// Depth shading shared by edges and node rings; clamped so styling stays
/// bounded at extreme depths.
fn depth_factor(depth: f64) -> f64 {
	((depth + 150.0) / 300.0).clamp(0.3, 1.0)
}

/// Node radius in pixels, floored so distant nodes stay visible.
fn node_radius(size_scale: f64, hovered: bool) -> f64 {
	let size = (9.0 * size_scale).max(4.0);
	if hovered { size * HOVER_SIZE_BOOST } else { size }
}

fn node_color(f: f64) -> (i32, i32, i32) {
	(
		(200.0 + 55.0 * f) as i32,
		(100.0 + 80.0 * f) as i32,
		(200.0 + 55.0 * f) as i32,
	)
}
