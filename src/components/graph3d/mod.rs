mod camera;
mod component;
mod render;
mod state;
mod types;

pub use component::Graph3dCanvas;
pub use state::Graph3dState;
pub use types::{BoundingBox, GraphData, GraphMetadata, GraphNode};
