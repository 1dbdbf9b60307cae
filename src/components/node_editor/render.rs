use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::geometry::CubicBezier;
use super::model::{LABEL_X, LABEL_YS, PIN_RADIUS, TextMeasure, VisualNode};
use super::state::{EditorSession, Gesture};

const NODE_FONT: &str = "16px sans-serif";
const CAPTION_FONT: &str = "11px sans-serif";

/// Text metrics from the live canvas, so node widths match what the canvas
/// actually draws.
pub struct CanvasMeasure<'a> {
	ctx: &'a CanvasRenderingContext2d,
}

impl<'a> CanvasMeasure<'a> {
	pub fn new(ctx: &'a CanvasRenderingContext2d) -> Self {
		ctx.set_font(NODE_FONT);
		Self { ctx }
	}
}

impl TextMeasure for CanvasMeasure<'_> {
	fn text_width(&self, text: &str) -> f64 {
		self.ctx
			.measure_text(text)
			.map(|metrics| metrics.width())
			.unwrap_or(0.0)
	}
}

pub fn render(session: &EditorSession, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, session.canvas_width, session.canvas_height);

	// World transform: screen = (world - viewport.origin) * canvas/viewport.
	let viewport = session.viewport;
	let (kx, ky) = (
		session.canvas_width / viewport.width,
		session.canvas_height / viewport.height,
	);
	ctx.save();
	let _ = ctx.scale(kx, ky);
	let _ = ctx.translate(-viewport.x, -viewport.y);

	for link in &session.model.links {
		draw_curve(ctx, &link.curve, "rgba(100, 180, 255, 0.8)", 2.0 / kx, false);
	}
	if let Gesture::DraggingNewLink { curve, .. } = session.gesture() {
		draw_curve(ctx, curve, "rgba(100, 180, 255, 0.5)", 2.0 / kx, true);
	}
	for node in &session.model.nodes {
		draw_node(session, node, ctx, kx);
	}

	ctx.restore();
}

fn draw_curve(
	ctx: &CanvasRenderingContext2d,
	curve: &CubicBezier,
	style: &str,
	line_width: f64,
	dashed: bool,
) {
	ctx.set_stroke_style_str(style);
	ctx.set_line_width(line_width);
	if dashed {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(6.0),
			&JsValue::from_f64(4.0),
		));
	}
	ctx.begin_path();
	ctx.move_to(curve.start.x, curve.start.y);
	ctx.bezier_curve_to(
		curve.control1.x,
		curve.control1.y,
		curve.control2.x,
		curve.control2.y,
		curve.end.x,
		curve.end.y,
	);
	ctx.stroke();
	if dashed {
		let _ = ctx.set_line_dash(&js_sys::Array::new());
	}
}

fn draw_node(session: &EditorSession, node: &VisualNode, ctx: &CanvasRenderingContext2d, k: f64) {
	let (x, y) = (node.position.x, node.position.y);

	ctx.set_fill_style_str("#23233f");
	ctx.fill_rect(x, y, node.width, node.height);
	ctx.set_stroke_style_str("#4a4a7a");
	ctx.set_line_width(1.5 / k);
	ctx.stroke_rect(x, y, node.width, node.height);

	let vertex = &session.graph.vertices()[node.id];
	ctx.set_fill_style_str("#e8e8f0");
	ctx.set_font(NODE_FONT);
	for (label, dy) in [&vertex.subject, &vertex.action, &vertex.object]
		.into_iter()
		.zip(LABEL_YS)
	{
		let _ = ctx.fill_text(label, x + LABEL_X, y + dy);
	}

	ctx.set_fill_style_str("#9a9ac0");
	ctx.set_font(CAPTION_FONT);
	let _ = ctx.fill_text("Previous", x + 10.0, y + 25.0);
	let _ = ctx.fill_text("Next", x + node.width - 45.0, y + 25.0);

	for (anchor, style) in [
		(node.incoming_anchor(), "#7fd17f"),
		(node.outgoing_anchor(), "#d1a57f"),
	] {
		ctx.begin_path();
		let _ = ctx.arc(anchor.x, anchor.y, PIN_RADIUS, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(style);
		ctx.fill();
	}
}
