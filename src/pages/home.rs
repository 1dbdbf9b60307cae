use leptos::prelude::*;

use crate::components::node_editor::NodeEditorCanvas;

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
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

			<div class="fullscreen-editor">
				<NodeEditorCanvas fullscreen=true />
				<div class="editor-overlay">
					<h1>"Event Node Editor"</h1>
					<p class="subtitle">
						"Read a CSV of subject-action-object events, drag nodes to arrange them, drag from a Next pin to a Previous pin to connect, then save the result."
					</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}
