use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlInputElement, MouseEvent, WheelEvent, Window};

use super::render::{self, CanvasMeasure};
use super::state::EditorSession;

#[component]
pub fn NodeEditorCanvas(
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let file_ref = NodeRef::<leptos::html::Input>::new();
	let session: Rc<RefCell<Option<EditorSession>>> = Rc::new(RefCell::new(None));
	let context: Rc<RefCell<Option<CanvasRenderingContext2d>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (session_init, context_init, animate_init, resize_cb_init) = (
		session.clone(),
		context.clone(),
		animate.clone(),
		resize_cb.clone(),
	);

	let (import_error, set_import_error) = signal(Option::<String>::None);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = if fullscreen {
			(
				window.inner_width().unwrap().as_f64().unwrap(),
				window.inner_height().unwrap().as_f64().unwrap(),
			)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();
		*session_init.borrow_mut() = Some(EditorSession::new(w, h));
		*context_init.borrow_mut() = Some(ctx.clone());

		if fullscreen {
			let (session_resize, canvas_resize) = (session_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let win: Window = web_sys::window().unwrap();
				let (nw, nh) = (
					win.inner_width().unwrap().as_f64().unwrap(),
					win.inner_height().unwrap().as_f64().unwrap(),
				);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *session_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (session_anim, animate_inner) = (session_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref s) = *session_anim.borrow() {
				render::render(s, &ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// Pointer position relative to the canvas, in CSS pixels.
	let canvas_position = move |ev: &MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		(
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		)
	};

	let session_md = session.clone();
	let on_mousedown = move |ev: MouseEvent| {
		ev.prevent_default();
		let (x, y) = canvas_position(&ev);
		if let Some(ref mut s) = *session_md.borrow_mut() {
			s.pointer_down(x, y);
		}
	};

	let session_mm = session.clone();
	let on_mousemove = move |ev: MouseEvent| {
		ev.prevent_default();
		let (x, y) = canvas_position(&ev);
		if let Some(ref mut s) = *session_mm.borrow_mut() {
			s.pointer_move(x, y);
		}
	};

	let session_mu = session.clone();
	let on_mouseup = move |ev: MouseEvent| {
		ev.prevent_default();
		let (x, y) = canvas_position(&ev);
		if let Some(ref mut s) = *session_mu.borrow_mut() {
			s.pointer_up(x, y);
		}
	};

	let session_ml = session.clone();
	let on_mouseleave = move |ev: MouseEvent| {
		let (x, y) = canvas_position(&ev);
		if let Some(ref mut s) = *session_ml.borrow_mut() {
			s.pointer_leave(x, y);
		}
	};

	let session_wh = session.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(ref mut s) = *session_wh.borrow_mut() {
			// Wheel up grows the viewport (zoom out), matching the original
			// editor's wheelDelta convention.
			s.wheel(if ev.delta_y() < 0.0 { 1 } else { -1 });
		}
	};

	let (session_file, context_file) = (session.clone(), context.clone());
	let on_file_selected = move |_| {
		let Some(input) = file_ref.get() else {
			return;
		};
		let input: HtmlInputElement = input.into();
		let Some(file) = input.files().and_then(|files| files.get(0)) else {
			return;
		};

		let reader = web_sys::FileReader::new().unwrap();
		let (session_load, context_load, reader_load) =
			(session_file.clone(), context_file.clone(), reader.clone());
		let onload = Closure::once_into_js(move || {
			let Some(text) = reader_load.result().ok().and_then(|v| v.as_string()) else {
				return;
			};
			let (mut session, context) = (session_load.borrow_mut(), context_load.borrow());
			let (Some(s), Some(ctx)) = (session.as_mut(), context.as_ref()) else {
				return;
			};
			match s.load_csv(&text, &CanvasMeasure::new(ctx)) {
				Ok(()) => set_import_error.set(None),
				Err(err) => {
					log::error!("CSV import failed: {err}");
					set_import_error.set(Some(err.to_string()));
				}
			}
		});
		reader.set_onload(Some(onload.unchecked_ref()));
		let _ = reader.read_as_text(&file);
	};

	let session_save = session.clone();
	let on_export = move |_| {
		let Some(ref s) = *session_save.borrow() else {
			return;
		};
		let csv = s.export_csv();
		download_csv(&csv);
	};

	view! {
		<div class="node-editor">
			<canvas
				node_ref=canvas_ref
				class="node-editor-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			<div class="node-editor-toolbar">
				<input
					node_ref=file_ref
					type="file"
					accept=".csv"
					style="display: none;"
					on:change=on_file_selected
				/>
				<button on:click=move |_| {
					if let Some(input) = file_ref.get() {
						let input: HtmlInputElement = input.into();
						input.click();
					}
				}>"Read CSV"</button>
				<button on:click=on_export>"Save CSV"</button>
				{move || {
					import_error
						.get()
						.map(|message| view! { <span class="import-error">{message}</span> })
				}}
			</div>
		</div>
	}
}

/// Trigger a browser download of the export, original-style: a data URI on a
/// transient anchor element.
fn download_csv(csv: &str) {
	let document = web_sys::window().unwrap().document().unwrap();
	let anchor: web_sys::HtmlElement = document
		.create_element("a")
		.unwrap()
		.dyn_into()
		.unwrap();
	let href = format!(
		"data:text/csv;charset=utf-8,{}",
		js_sys::encode_uri(csv).as_string().unwrap_or_default()
	);
	let _ = anchor.set_attribute("href", &href);
	let _ = anchor.set_attribute("download", "result.csv");
	anchor.click();
}
