#[derive(Clone, Debug)]
pub struct GraphNode {
	pub x: f64,
	pub y: f64,
	pub z: f64,
	pub label: String,
}

#[derive(Clone, Debug, Default)]
pub struct BoundingBox {
	pub min: [f64; 3],
	pub max: [f64; 3],
	pub center: [f64; 3],
}

#[derive(Clone, Debug, Default)]
pub struct GraphMetadata {
	pub bbox: Option<BoundingBox>,
}

#[derive(Clone, Debug, Default)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<(usize, usize)>,
	pub metadata: GraphMetadata,
}

impl BoundingBox {
	/// Axis-aligned bounds of a node set; `None` when there are no nodes.
	pub fn enclosing(nodes: &[GraphNode]) -> Option<Self> {
		let first = nodes.first()?;
		let mut min = [first.x, first.y, first.z];
		let mut max = min;
		for node in nodes {
			let p = [node.x, node.y, node.z];
			for axis in 0..3 {
				min[axis] = min[axis].min(p[axis]);
				max[axis] = max[axis].max(p[axis]);
			}
		}
		let center = [
			(min[0] + max[0]) / 2.0,
			(min[1] + max[1]) / 2.0,
			(min[2] + max[2]) / 2.0,
		];
		Some(Self { min, max, center })
	}

	/// Largest side of the box, used to frame the camera at load.
	pub fn max_extent(&self) -> f64 {
		(self.max[0] - self.min[0])
			.max(self.max[1] - self.min[1])
			.max(self.max[2] - self.min[2])
	}
}
