pub const MIN_DISTANCE: f64 = 20.0;
pub const MAX_DISTANCE: f64 = 1000.0;

/// Radians of orbit per pixel of drag.
pub const DRAG_SENSITIVITY: f64 = 0.01;

// Floor for the perspective denominator magnitude so a point sitting on
// the camera plane cannot divide the projection to infinity.
const PERSPECTIVE_EPSILON: f64 = 1e-3;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rotation {
	pub x: f64,
	pub y: f64,
}

/// Orbit camera: rotates around a fixed look-at target, dollies along the
/// view axis. No roll, no pan.
#[derive(Clone, Debug)]
pub struct Camera {
	/// Pitch (`x`) and yaw (`y`) in radians.
	pub rotation: Rotation,
	/// Camera-to-target distance, kept inside `[MIN_DISTANCE, MAX_DISTANCE]`.
	pub distance: f64,
	/// Projection scale multiplier, set when a graph is framed.
	pub zoom: f64,
	/// Look-at point in world coordinates.
	pub target: [f64; 3],
}

/// One node's projection: surface position, camera-space depth and the
/// perspective scale shared by hit-testing and node sizing.
#[derive(Clone, Copy, Debug)]
pub struct Projected {
	pub x: f64,
	pub y: f64,
	pub depth: f64,
	pub scale: f64,
}

impl Default for Camera {
	fn default() -> Self {
		Self {
			rotation: Rotation { x: 0.3, y: 0.3 },
			distance: 150.0,
			zoom: 1.0,
			target: [0.0; 3],
		}
	}
}

impl Camera {
	/// Accumulate an orbit from a pointer drag delta.
	pub fn orbit(&mut self, dx: f64, dy: f64) {
		self.rotation.y += dx * DRAG_SENSITIVITY;
		self.rotation.x += dy * DRAG_SENSITIVITY;
	}

	/// Scale the target distance, reclamping to the hard limits.
	pub fn dolly(&mut self, factor: f64) {
		self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
	}

	/// Project a world point onto a `width` x `height` surface.
	///
	/// Yaw is applied before pitch; swapping the order changes every
	/// off-axis frame. Surface y grows downward, world y upward.
	pub fn project(&self, width: f64, height: f64, x: f64, y: f64, z: f64) -> Projected {
		let px = x - self.target[0];
		let py = y - self.target[1];
		let pz = z - self.target[2];

		let (sin_y, cos_y) = self.rotation.y.sin_cos();
		let rx = px * cos_y - pz * sin_y;
		let yz = px * sin_y + pz * cos_y;

		let (sin_x, cos_x) = self.rotation.x.sin_cos();
		let ry = py * cos_x - yz * sin_x;
		let depth = py * sin_x + yz * cos_x;

		let mut denom = self.distance + depth;
		if denom.abs() < PERSPECTIVE_EPSILON {
			denom = PERSPECTIVE_EPSILON.copysign(denom);
		}
		let scale = self.zoom * self.distance / denom;

		Projected {
			x: width / 2.0 + rx * scale,
			y: height / 2.0 - ry * scale,
			depth,
			scale,
		}
	}
}

impl Projected {
	/// False when the source point produced a non-finite projection.
	pub fn is_visible(&self) -> bool {
		self.x.is_finite() && self.y.is_finite() && self.scale.is_finite()
	}

	/// Screen-size factor shared by hit-testing and node sizing.
	pub fn size_scale(&self, zoom: f64) -> f64 {
		self.scale / zoom * 0.015
	}
}
