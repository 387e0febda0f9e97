//! Binary entry for the Trunk-built client-side app.

// The bin target shares the package dependency set with the lib.
#![allow(unused_crate_dependencies)]

use protein_graph_canvas::{App, init_logging};

fn main() {
	init_logging();
	leptos::mount::mount_to_body(App);
}
