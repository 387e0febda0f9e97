use super::camera::{Camera, MAX_DISTANCE, MIN_DISTANCE, Projected, Rotation};
use super::types::GraphData;

/// Rotation applied whenever a graph loads, replacing any prior orbit.
pub const FRAMED_ROTATION: Rotation = Rotation { x: 0.2, y: 0.2 };

// Camera framing derived from the graph bounds at load time.
const FRAME_DISTANCE_FACTOR: f64 = 1.8;
const FRAME_ZOOM_FACTOR: f64 = 1.5;
const MIN_FRAME_EXTENT: f64 = 1e-6;

// Multiplicative distance steps.
pub const WHEEL_STEP_OUT: f64 = 1.15;
pub const WHEEL_STEP_IN: f64 = 0.87;
pub const BUTTON_STEP_IN: f64 = 0.8;
pub const BUTTON_STEP_OUT: f64 = 1.2;

/// Extra pixels of hit-test tolerance around a node's drawn radius.
const HIT_SLOP: f64 = 5.0;

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub last_x: f64,
	pub last_y: f64,
}

/// Everything the renderer owns between events: the held graph, the
/// camera, the per-frame projection cache and the interaction state.
/// Deliberately free of browser types so it runs headless.
pub struct Graph3dState {
	pub graph: Option<GraphData>,
	pub camera: Camera,
	pub projected: Vec<Projected>,
	pub hovered: Option<usize>,
	pub drag: DragState,
	pub width: f64,
	pub height: f64,
	initial_distance: f64,
	initial_zoom: f64,
}

impl Graph3dState {
	pub fn new(width: f64, height: f64) -> Self {
		let camera = Camera::default();
		Self {
			graph: None,
			initial_distance: camera.distance,
			initial_zoom: camera.zoom,
			camera,
			projected: Vec::new(),
			hovered: None,
			drag: DragState::default(),
			width,
			height,
		}
	}

	/// Replace the held graph. When bounds are present the camera reframes
	/// around them and the framing becomes the new reset point; otherwise
	/// the previous framing is kept and only the data changes.
	pub fn load_graph(&mut self, data: GraphData) {
		if let Some(bbox) = &data.metadata.bbox {
			let extent = bbox.max_extent().max(MIN_FRAME_EXTENT);
			self.camera.target = bbox.center;
			self.camera.distance =
				(extent * FRAME_DISTANCE_FACTOR).clamp(MIN_DISTANCE, MAX_DISTANCE);
			self.camera.zoom = self.width.min(self.height) / (extent * FRAME_ZOOM_FACTOR);
			self.initial_distance = self.camera.distance;
			self.initial_zoom = self.camera.zoom;
		}
		self.camera.rotation = FRAMED_ROTATION;
		// stale indices must not outlive the graph they pointed into
		self.hovered = None;
		self.graph = Some(data);
		self.reproject();
	}

	/// Drop the graph and its projection cache; camera framing stays.
	pub fn clear(&mut self) {
		self.graph = None;
		self.projected.clear();
		self.hovered = None;
	}

	pub fn zoom_in(&mut self) {
		self.camera.dolly(BUTTON_STEP_IN);
	}

	pub fn zoom_out(&mut self) {
		self.camera.dolly(BUTTON_STEP_OUT);
	}

	/// Wheel dolly; positive delta moves the camera away.
	pub fn wheel_zoom(&mut self, delta_y: f64) {
		let factor = if delta_y > 0.0 {
			WHEEL_STEP_OUT
		} else {
			WHEEL_STEP_IN
		};
		self.camera.dolly(factor);
	}

	pub fn drag_rotate(&mut self, dx: f64, dy: f64) {
		self.camera.orbit(dx, dy);
	}

	/// Restore the framing captured by the last load.
	pub fn reset_view(&mut self) {
		self.camera.rotation = FRAMED_ROTATION;
		self.camera.distance = self.initial_distance;
		self.camera.zoom = self.initial_zoom;
		self.hovered = None;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.reproject();
	}

	/// Rebuild the projection cache, one entry per node in index order.
	pub fn reproject(&mut self) {
		let (width, height) = (self.width, self.height);
		let Some(graph) = &self.graph else {
			self.projected.clear();
			return;
		};
		let cam = &self.camera;
		self.projected = graph
			.nodes
			.iter()
			.map(|n| cam.project(width, height, n.x, n.y, n.z))
			.collect();
	}

	/// Topmost node under a surface position, if any. Tested in reverse
	/// index order so the last-drawn node wins ties.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let zoom = self.camera.zoom;
		for (idx, p) in self.projected.iter().enumerate().rev() {
			if !p.is_visible() {
				continue;
			}
			let radius = (8.0 * p.size_scale(zoom)).max(3.0) + HIT_SLOP;
			let (dx, dy) = (p.x - sx, p.y - sy);
			if (dx * dx + dy * dy).sqrt() <= radius {
				return Some(idx);
			}
		}
		None
	}

	/// Returns true when the hover target actually changed.
	pub fn set_hover(&mut self, node: Option<usize>) -> bool {
		if self.hovered == node {
			return false;
		}
		self.hovered = node;
		true
	}

	pub fn node_count(&self) -> usize {
		self.graph.as_ref().map_or(0, |g| g.nodes.len())
	}

	pub fn edge_count(&self) -> usize {
		self.graph.as_ref().map_or(0, |g| g.edges.len())
	}

	/// Zoom readout relative to the last load's framing.
	pub fn zoom_percent(&self) -> f64 {
		self.initial_distance / self.camera.distance * 100.0
	}

	/// Node indices ordered for back-to-front drawing.
	pub fn node_draw_order(&self) -> Vec<usize> {
		let mut order: Vec<usize> = (0..self.projected.len())
			.filter(|&i| self.projected[i].is_visible())
			.collect();
		order.sort_by(|&a, &b| self.projected[a].depth.total_cmp(&self.projected[b].depth));
		order
	}

	/// Edge endpoints with their mean depth, ordered like the nodes.
	/// Edges without a usable projection on both ends are skipped.
	pub fn edge_draw_order(&self) -> Vec<(usize, usize, f64)> {
		let Some(graph) = &self.graph else {
			return Vec::new();
		};
		let mut order: Vec<(usize, usize, f64)> = graph
			.edges
			.iter()
			.filter_map(|&(a, b)| {
				let pa = self.projected.get(a)?;
				let pb = self.projected.get(b)?;
				if !pa.is_visible() || !pb.is_visible() {
					return None;
				}
				Some((a, b, (pa.depth + pb.depth) / 2.0))
			})
			.collect();
		order.sort_by(|a, b| a.2.total_cmp(&b.2));
		order
	}
}

#[cfg(test)]
mod tests {
	use super::super::types::{BoundingBox, GraphMetadata, GraphNode};
	use super::*;

	fn assert_close(a: f64, b: f64) {
		assert!((a - b).abs() < 1e-9, "{} vs {}", a, b);
	}

	fn node(x: f64, y: f64, z: f64) -> GraphNode {
		GraphNode {
			x,
			y,
			z,
			label: String::new(),
		}
	}

	fn tri_graph() -> GraphData {
		GraphData {
			nodes: vec![
				node(0.0, 0.0, 0.0),
				node(10.0, 0.0, 0.0),
				node(0.0, 10.0, 0.0),
			],
			edges: vec![(0, 1), (1, 2)],
			metadata: GraphMetadata {
				bbox: Some(BoundingBox {
					min: [0.0, 0.0, 0.0],
					max: [10.0, 10.0, 0.0],
					center: [5.0, 5.0, 0.0],
				}),
			},
		}
	}

	fn loaded_state() -> Graph3dState {
		let mut state = Graph3dState::new(800.0, 600.0);
		state.load_graph(tri_graph());
		state
	}

	#[test]
	fn load_frames_camera_from_bbox() {
		let state = loaded_state();
		assert_eq!(state.camera.target, [5.0, 5.0, 0.0]);
		// 1.8 x 10 = 18, clamped up to the distance floor
		assert_close(state.camera.distance, 20.0);
		assert_close(state.camera.zoom, 600.0 / 15.0);
		assert_eq!(state.camera.rotation, FRAMED_ROTATION);
		assert_eq!(state.projected.len(), 3);
	}

	#[test]
	fn load_without_bbox_keeps_framing() {
		let mut state = loaded_state();
		state.zoom_out();
		let distance = state.camera.distance;
		let zoom = state.camera.zoom;
		state.drag_rotate(50.0, 50.0);

		state.load_graph(GraphData {
			nodes: vec![node(1.0, 2.0, 3.0)],
			edges: Vec::new(),
			metadata: GraphMetadata::default(),
		});
		assert_close(state.camera.distance, distance);
		assert_close(state.camera.zoom, zoom);
		assert_eq!(state.camera.target, [5.0, 5.0, 0.0]);
		assert_eq!(state.camera.rotation, FRAMED_ROTATION);
		assert_eq!(state.projected.len(), 1);
	}

	#[test]
	fn distance_stays_clamped_through_any_sequence() {
		let mut state = loaded_state();
		for i in 0..200 {
			match i % 4 {
				0 => state.zoom_in(),
				1 => state.wheel_zoom(3.0),
				2 => state.zoom_out(),
				_ => state.wheel_zoom(-3.0),
			}
			assert!(state.camera.distance >= MIN_DISTANCE);
			assert!(state.camera.distance <= MAX_DISTANCE);
		}
		for _ in 0..100 {
			state.zoom_in();
		}
		assert_close(state.camera.distance, MIN_DISTANCE);
		for _ in 0..100 {
			state.zoom_out();
		}
		assert_close(state.camera.distance, MAX_DISTANCE);
	}

	#[test]
	fn five_zoom_in_steps_from_default() {
		let mut state = Graph3dState::new(800.0, 600.0);
		for _ in 0..5 {
			state.zoom_in();
		}
		assert_close(state.camera.distance, 150.0 * 0.8_f64.powi(5));
		assert!((state.camera.distance - 49.152).abs() < 1e-3);
	}

	#[test]
	fn wheel_direction_selects_step() {
		let mut state = Graph3dState::new(800.0, 600.0);
		state.wheel_zoom(120.0);
		assert_close(state.camera.distance, 150.0 * WHEEL_STEP_OUT);
		let mut state = Graph3dState::new(800.0, 600.0);
		state.wheel_zoom(-120.0);
		assert_close(state.camera.distance, 150.0 * WHEEL_STEP_IN);
	}

	#[test]
	fn reset_restores_load_framing() {
		let mut state = loaded_state();
		state.drag_rotate(30.0, -12.0);
		for _ in 0..3 {
			state.zoom_out();
		}
		state.wheel_zoom(5.0);
		state.set_hover(Some(1));

		state.reset_view();
		assert_eq!(state.camera.rotation, FRAMED_ROTATION);
		assert_close(state.camera.distance, 20.0);
		assert_close(state.camera.zoom, 600.0 / 15.0);
		assert_eq!(state.hovered, None);

		// idempotent: a second reset changes nothing
		state.reset_view();
		assert_close(state.camera.distance, 20.0);
		assert_close(state.camera.zoom, 600.0 / 15.0);
	}

	#[test]
	fn reset_before_any_load_restores_defaults() {
		let mut state = Graph3dState::new(800.0, 600.0);
		state.zoom_out();
		state.zoom_out();
		state.reset_view();
		assert_close(state.camera.distance, 150.0);
		assert_close(state.camera.zoom, 1.0);
	}

	#[test]
	fn projection_cache_matches_node_count() {
		let mut state = loaded_state();
		assert_eq!(state.projected.len(), 3);
		state.drag_rotate(100.0, -40.0);
		state.zoom_in();
		state.reproject();
		assert_eq!(state.projected.len(), 3);
	}

	#[test]
	fn hover_at_projected_position() {
		let mut state = loaded_state();
		let p = state.projected[2];
		assert_eq!(state.node_at_position(p.x, p.y), Some(2));
		assert!(state.set_hover(state.node_at_position(p.x, p.y)));
		assert_eq!(state.hovered, Some(2));

		assert_eq!(state.node_at_position(p.x + 500.0, p.y + 500.0), None);
		assert!(state.set_hover(None));
		assert_eq!(state.hovered, None);
	}

	#[test]
	fn hover_is_deterministic() {
		let state = loaded_state();
		let p = state.projected[1];
		let first = state.node_at_position(p.x + 1.0, p.y - 1.0);
		let second = state.node_at_position(p.x + 1.0, p.y - 1.0);
		assert_eq!(first, second);
	}

	#[test]
	fn hover_prefers_highest_index_on_tie() {
		let mut state = Graph3dState::new(800.0, 600.0);
		state.load_graph(GraphData {
			nodes: vec![node(0.0, 0.0, 0.0), node(0.0, 0.0, 0.0)],
			edges: Vec::new(),
			metadata: GraphMetadata::default(),
		});
		let p = state.projected[0];
		assert_eq!(state.node_at_position(p.x, p.y), Some(1));
	}

	#[test]
	fn set_hover_reports_changes_only() {
		let mut state = loaded_state();
		assert!(state.set_hover(Some(2)));
		assert!(!state.set_hover(Some(2)));
		assert!(state.set_hover(None));
		assert!(!state.set_hover(None));
	}

	#[test]
	fn edges_with_bad_indices_are_skipped() {
		let mut state = Graph3dState::new(800.0, 600.0);
		state.load_graph(GraphData {
			nodes: vec![node(0.0, 0.0, 0.0), node(5.0, 0.0, 0.0)],
			edges: vec![(0, 1), (5, 1), (1, 9)],
			metadata: GraphMetadata::default(),
		});
		let order = state.edge_draw_order();
		assert_eq!(order.len(), 1);
		assert_eq!((order[0].0, order[0].1), (0, 1));
		assert_eq!(state.edge_count(), 3);
	}

	#[test]
	fn draw_orders_are_back_to_front() {
		let mut state = Graph3dState::new(800.0, 600.0);
		state.load_graph(GraphData {
			nodes: vec![
				node(0.0, 0.0, -30.0),
				node(1.0, 2.0, 40.0),
				node(-2.0, 1.0, 5.0),
				node(3.0, -1.0, 90.0),
			],
			edges: vec![(0, 1), (1, 2), (2, 3), (0, 3), (0, 2)],
			metadata: GraphMetadata::default(),
		});

		let nodes = state.node_draw_order();
		let mut sorted = nodes.clone();
		sorted.sort_unstable();
		assert_eq!(sorted, vec![0, 1, 2, 3]);
		assert!(
			nodes
				.windows(2)
				.all(|w| state.projected[w[0]].depth <= state.projected[w[1]].depth)
		);

		let edges = state.edge_draw_order();
		assert_eq!(edges.len(), 5);
		assert!(edges.windows(2).all(|w| w[0].2 <= w[1].2));
	}

	#[test]
	fn nonfinite_nodes_are_skipped_everywhere() {
		let mut state = Graph3dState::new(800.0, 600.0);
		state.load_graph(GraphData {
			nodes: vec![node(f64::NAN, 0.0, 0.0), node(0.0, 0.0, 0.0)],
			edges: vec![(0, 1)],
			metadata: GraphMetadata::default(),
		});
		assert_eq!(state.projected.len(), 2);
		assert_eq!(state.node_draw_order(), vec![1]);
		assert!(state.edge_draw_order().is_empty());
		let p = state.projected[1];
		assert_eq!(state.node_at_position(p.x, p.y), Some(1));
	}

	#[test]
	fn clear_drops_graph_keeps_camera() {
		let mut state = loaded_state();
		state.set_hover(Some(0));
		state.clear();
		assert!(state.graph.is_none());
		assert!(state.projected.is_empty());
		assert_eq!(state.hovered, None);
		assert_eq!(state.node_count(), 0);
		assert_eq!(state.edge_count(), 0);
		assert_close(state.camera.distance, 20.0);
		assert_eq!(state.camera.target, [5.0, 5.0, 0.0]);
		assert_eq!(state.node_at_position(400.0, 300.0), None);
	}

	#[test]
	fn zoom_percent_tracks_distance() {
		let mut state = loaded_state();
		assert_close(state.zoom_percent(), 100.0);
		state.zoom_out();
		assert_close(state.zoom_percent(), 20.0 / 24.0 * 100.0);
		state.reset_view();
		assert_close(state.zoom_percent(), 100.0);
	}

	#[test]
	fn resize_keeps_camera_and_cache_length() {
		let mut state = loaded_state();
		state.resize(400.0, 300.0);
		assert_close(state.width, 400.0);
		assert_close(state.height, 300.0);
		assert_close(state.camera.distance, 20.0);
		assert_eq!(state.projected.len(), 3);
	}

	#[test]
	fn single_point_bbox_still_frames() {
		let mut state = Graph3dState::new(800.0, 600.0);
		state.load_graph(GraphData {
			nodes: vec![node(7.0, 7.0, 7.0)],
			edges: Vec::new(),
			metadata: GraphMetadata {
				bbox: Some(BoundingBox {
					min: [7.0, 7.0, 7.0],
					max: [7.0, 7.0, 7.0],
					center: [7.0, 7.0, 7.0],
				}),
			},
		});
		assert_close(state.camera.distance, MIN_DISTANCE);
		assert!(state.camera.zoom.is_finite());
		assert!(state.projected[0].is_visible());
	}
}
