//! Pure viewBox / transform / curve arithmetic shared by the editor.

/// A point in either world (document) or screen (pixel) space; which one is
/// determined by context.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn offset(self, dx: f64, dy: f64) -> Self {
		Self {
			x: self.x + dx,
			y: self.y + dy,
		}
	}

	pub fn add(self, other: Point) -> Self {
		self.offset(other.x, other.y)
	}

	pub fn distance_to(self, other: Point) -> f64 {
		let (dx, dy) = (other.x - self.x, other.y - self.y);
		(dx * dx + dy * dy).sqrt()
	}
}

/// Decomposed 2D affine transform. Components stack in the fixed order
/// scale -> rotate -> translate; nodes only ever use the translate part.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform2D {
	pub translate_x: f64,
	pub translate_y: f64,
	pub rotation_deg: f64,
	pub scale_x: f64,
	pub scale_y: f64,
}

impl Default for Transform2D {
	fn default() -> Self {
		Self {
			translate_x: 0.0,
			translate_y: 0.0,
			rotation_deg: 0.0,
			scale_x: 1.0,
			scale_y: 1.0,
		}
	}
}

impl Transform2D {
	pub fn translation(x: f64, y: f64) -> Self {
		Self {
			translate_x: x,
			translate_y: y,
			..Self::default()
		}
	}

	/// Serialize for an SVG `transform` attribute.
	pub fn to_attribute(&self) -> String {
		format!(
			"scale({},{}) rotate({}) translate({},{})",
			self.scale_x, self.scale_y, self.rotation_deg, self.translate_x, self.translate_y
		)
	}

	/// Parse a string previously produced by [`Transform2D::to_attribute`].
	///
	/// Transform strings are only ever written by this module, so a malformed
	/// one is a programmer error and panics rather than returning a `Result`.
	pub fn parse(attribute: &str) -> Self {
		fn component<'a>(attribute: &'a str, name: &str) -> &'a str {
			let start = attribute
				.find(name)
				.unwrap_or_else(|| panic!("malformed transform {attribute:?}: missing {name}"))
				+ name.len()
				+ 1;
			let end = attribute[start..]
				.find(')')
				.unwrap_or_else(|| panic!("malformed transform {attribute:?}: unclosed {name}"))
				+ start;
			&attribute[start..end]
		}

		fn number(text: &str, attribute: &str) -> f64 {
			text.trim()
				.parse()
				.unwrap_or_else(|_| panic!("malformed transform {attribute:?}: bad number {text:?}"))
		}

		fn pair(text: &str, attribute: &str) -> (f64, f64) {
			let (a, b) = text
				.split_once(',')
				.unwrap_or_else(|| panic!("malformed transform {attribute:?}: expected pair {text:?}"));
			(number(a, attribute), number(b, attribute))
		}

		let (scale_x, scale_y) = pair(component(attribute, "scale"), attribute);
		let rotation_deg = number(component(attribute, "rotate"), attribute);
		let (translate_x, translate_y) = pair(component(attribute, "translate"), attribute);

		Self {
			translate_x,
			translate_y,
			rotation_deg,
			scale_x,
			scale_y,
		}
	}
}

/// The world-space rectangle currently mapped onto the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

/// World units added to (or removed from) the viewport height per wheel notch.
pub const ZOOM_STEP: f64 = 100.0;

impl Viewport {
	pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
		Self {
			x,
			y,
			width,
			height,
		}
	}

	pub fn screen_to_world(&self, screen: Point, canvas_width: f64, canvas_height: f64) -> Point {
		Point {
			x: screen.x * self.width / canvas_width + self.x,
			y: screen.y * self.height / canvas_height + self.y,
		}
	}

	pub fn world_to_screen(&self, world: Point, canvas_width: f64, canvas_height: f64) -> Point {
		Point {
			x: (world.x - self.x) * canvas_width / self.width,
			y: (world.y - self.y) * canvas_height / self.height,
		}
	}

	/// Pan by a screen-pixel delta. The content follows the pointer, so the
	/// origin moves the opposite way; deltas are applied 1:1 regardless of
	/// zoom level.
	pub fn pan(&mut self, dx: f64, dy: f64) {
		self.x -= dx;
		self.y -= dy;
	}

	/// Step the zoom in the given wheel direction (+1 widens the viewport,
	/// -1 narrows it). The width step is scaled by the aspect ratio so the
	/// viewport keeps its shape, and both axes are floor-clamped so repeated
	/// zoom-in can never invert the rectangle.
	pub fn zoom(&mut self, direction: i32) {
		let direction = direction.signum() as f64;
		let aspect_ratio = self.width / self.height;

		self.width += ZOOM_STEP * aspect_ratio * direction;
		self.height += ZOOM_STEP * direction;

		self.width = self.width.max(aspect_ratio);
		self.height = self.height.max(1.0);
	}
}

/// A cubic Bezier curve between two link anchors.
///
/// The control points are the opposite corners of the start/end bounding box,
/// giving the editor's signature S-curve. This is deliberately not a smooth
/// tangent-continuous fit; renders must match prior output exactly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
	pub start: Point,
	pub end: Point,
	pub control1: Point,
	pub control2: Point,
}

impl CubicBezier {
	pub fn between(start: Point, end: Point) -> Self {
		Self {
			start,
			end,
			control1: Point::new(end.x, start.y),
			control2: Point::new(start.x, end.y),
		}
	}
}
