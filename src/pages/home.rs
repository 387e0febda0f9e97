use leptos::prelude::*;

use crate::components::graph3d::{BoundingBox, Graph3dCanvas, GraphData, GraphMetadata, GraphNode};

const RESIDUE_NAMES: &[&str] = &[
	"ALA", "GLY", "LEU", "SER", "VAL", "THR", "LYS", "ASP", "PHE", "ARG",
];

/// Sample data: an idealized alpha-helix CA trace (about 1.5 units of
/// rise and a 100 degree turn per residue), with backbone bonds plus the
/// i to i+4 contacts that give a helix its ladder.
fn sample_backbone_graph(residues: usize) -> GraphData {
	const RISE: f64 = 1.5;
	const TURN_DEG: f64 = 100.0;
	const HELIX_RADIUS: f64 = 2.3;

	let nodes: Vec<GraphNode> = (0..residues)
		.map(|i| {
			let angle = (i as f64) * TURN_DEG.to_radians();
			GraphNode {
				x: HELIX_RADIUS * angle.cos(),
				y: (i as f64) * RISE,
				z: HELIX_RADIUS * angle.sin(),
				label: format!("A:{}:{}", RESIDUE_NAMES[i % RESIDUE_NAMES.len()], i + 1),
			}
		})
		.collect();

	let mut edges: Vec<(usize, usize)> = (1..residues).map(|i| (i - 1, i)).collect();
	edges.extend((4..residues).map(|i| (i - 4, i)));

	let bbox = BoundingBox::enclosing(&nodes);
	GraphData {
		nodes,
		edges,
		metadata: GraphMetadata { bbox },
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let graph_data = RwSignal::new(Some(sample_backbone_graph(64)));

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<Graph3dCanvas data=graph_data fullscreen=true />
				<div class="graph-overlay">
					<h1>"Residue Interaction Graph"</h1>
					<p class="subtitle">"Drag to orbit. Scroll to zoom. Double-click to reset."</p>
					<div class="graph-actions">
						<button on:click=move |_| {
							graph_data.set(Some(sample_backbone_graph(64)))
						}>"Load sample"</button>
						<button on:click=move |_| graph_data.set(None)>"Clear"</button>
					</div>
				</div>
			</div>
		</ErrorBoundary>
	}
}
