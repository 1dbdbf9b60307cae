//! Visual node/link model layered over the event graph.

use super::geometry::{CubicBezier, Point};
use super::graph::{EventGraph, EventVertex};

pub const NODE_HEIGHT: f64 = 110.0;
pub const NODE_MIN_WIDTH: f64 = 100.0;
pub const LABEL_PADDING: f64 = 40.0;
/// Local x of the three text labels inside a node.
pub const LABEL_X: f64 = 20.0;
/// Local y of the subject/action/object labels, top to bottom.
pub const LABEL_YS: [f64; 3] = [50.0, 70.0, 90.0];
pub const PIN_OFFSET_Y: f64 = 20.0;
pub const PIN_RADIUS: f64 = 5.0;
/// World-space grab radius around a pin; larger than the drawn circle so the
/// pins are comfortable to hit, like the node hit radius in canvas pickers.
pub const PIN_HIT_RADIUS: f64 = 12.0;

/// Text measurement collaborator. Node widths depend on rendered glyph
/// metrics, which only the drawing surface knows.
pub trait TextMeasure {
	fn text_width(&self, text: &str) -> f64;
}

/// A fixed local anchor on a node where link curves attach.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkPoint {
	pub offset: Point,
}

/// One positioned node per event vertex. `id` matches the vertex id; the
/// position is the node's top-left in world coordinates.
#[derive(Clone, Debug)]
pub struct VisualNode {
	pub id: usize,
	pub position: Point,
	pub width: f64,
	pub height: f64,
	pub incoming: LinkPoint,
	pub outgoing: LinkPoint,
}

impl VisualNode {
	pub fn incoming_anchor(&self) -> Point {
		self.position.add(self.incoming.offset)
	}

	pub fn outgoing_anchor(&self) -> Point {
		self.position.add(self.outgoing.offset)
	}

	pub fn contains(&self, world: Point) -> bool {
		world.x >= self.position.x
			&& world.x <= self.position.x + self.width
			&& world.y >= self.position.y
			&& world.y <= self.position.y + self.height
	}

	pub fn hits_incoming_pin(&self, world: Point) -> bool {
		self.incoming_anchor().distance_to(world) < PIN_HIT_RADIUS
	}

	pub fn hits_outgoing_pin(&self, world: Point) -> bool {
		self.outgoing_anchor().distance_to(world) < PIN_HIT_RADIUS
	}
}

/// A committed link between two nodes, mirroring one event edge. The curve is
/// cached and refreshed whenever either endpoint node moves.
#[derive(Clone, Debug)]
pub struct VisualLink {
	pub source: usize,
	pub dest: usize,
	pub curve: CubicBezier,
}

/// All visual state derived from the graph: one node per vertex plus the
/// committed links. Nodes are created in vertex-id order, so `nodes[id]` is
/// the node for vertex `id`.
#[derive(Clone, Debug, Default)]
pub struct EditorModel {
	pub nodes: Vec<VisualNode>,
	pub links: Vec<VisualLink>,
}

impl EditorModel {
	/// Build the node for a vertex, sized to fit its labels, positioned at the
	/// world origin. The caller repositions it.
	pub fn create_node(&mut self, vertex: &EventVertex, measure: &impl TextMeasure) -> usize {
		debug_assert_eq!(vertex.id, self.nodes.len(), "nodes must be created in vertex order");

		let widest_label = [&vertex.subject, &vertex.action, &vertex.object]
			.into_iter()
			.map(|label| measure.text_width(label))
			.fold(0.0, f64::max);
		let width = widest_label.max(NODE_MIN_WIDTH) + LABEL_PADDING;

		self.nodes.push(VisualNode {
			id: vertex.id,
			position: Point::default(),
			width,
			height: NODE_HEIGHT,
			incoming: LinkPoint {
				offset: Point::new(0.0, PIN_OFFSET_Y),
			},
			outgoing: LinkPoint {
				offset: Point::new(width, PIN_OFFSET_Y),
			},
		});
		vertex.id
	}

	/// Commit a link from `source`'s outgoing pin to `dest`'s incoming pin and
	/// register the matching edge. The curve is built from the nodes' current
	/// anchors, so it is consistent with their positions at this instant.
	pub fn connect(&mut self, source: usize, dest: usize, graph: &mut EventGraph) {
		debug_assert!(source < self.nodes.len(), "link references unknown node {source}");
		debug_assert!(dest < self.nodes.len(), "link references unknown node {dest}");

		let curve = CubicBezier::between(
			self.nodes[source].outgoing_anchor(),
			self.nodes[dest].incoming_anchor(),
		);
		self.links.push(VisualLink {
			source,
			dest,
			curve,
		});
		graph.add_edge(source, dest);
	}

	/// Refresh the cached curve of every link attached to `node_id` from the
	/// current anchor positions of both its endpoints.
	pub fn update_links_for(&mut self, node_id: usize) {
		for link in &mut self.links {
			if link.source == node_id || link.dest == node_id {
				link.curve = CubicBezier::between(
					self.nodes[link.source].outgoing_anchor(),
					self.nodes[link.dest].incoming_anchor(),
				);
			}
		}
	}
}

#[cfg(test)]
pub(super) mod tests {
	use super::*;

	/// Deterministic stand-in for canvas text metrics: 8px per character.
	pub struct FixedMeasure;

	impl TextMeasure for FixedMeasure {
		fn text_width(&self, text: &str) -> f64 {
			8.0 * text.chars().count() as f64
		}
	}

	fn vertex(id: usize, subject: &str, action: &str, object: &str) -> EventVertex {
		EventVertex {
			id,
			subject: subject.into(),
			action: action.into(),
			object: object.into(),
		}
	}

	/// Text width to feed [`FixedMeasure`] so a label measures `width` px.
	pub fn label_of_width(width: usize) -> String {
		assert_eq!(width % 8, 0);
		"x".repeat(width / 8)
	}

	#[test]
	fn node_width_fits_longest_label() {
		let mut model = EditorModel::default();
		let id = model.create_node(
			&vertex(0, "s", &label_of_width(152), "o"),
			&FixedMeasure,
		);
		assert_eq!(model.nodes[id].width, 192.0);
		assert_eq!(model.nodes[id].height, NODE_HEIGHT);
	}

	#[test]
	fn node_width_never_below_minimum() {
		let mut model = EditorModel::default();
		let id = model.create_node(&vertex(0, "a", "b", "c"), &FixedMeasure);
		assert_eq!(model.nodes[id].width, 140.0);
	}

	#[test]
	fn pins_sit_on_left_and_right_edges() {
		let mut model = EditorModel::default();
		let id = model.create_node(&vertex(0, "a", "b", "c"), &FixedMeasure);
		let node = &model.nodes[id];
		assert_eq!(node.incoming.offset, Point::new(0.0, 20.0));
		assert_eq!(node.outgoing.offset, Point::new(node.width, 20.0));
	}

	#[test]
	fn connect_builds_curve_from_current_anchors() {
		let mut graph = EventGraph::new();
		graph.add_vertex("a".into(), "b".into(), "c".into());
		graph.add_vertex("d".into(), "e".into(), "f".into());

		let mut model = EditorModel::default();
		model.create_node(&graph.vertices()[0].clone(), &FixedMeasure);
		model.create_node(&graph.vertices()[1].clone(), &FixedMeasure);
		model.nodes[1].position = Point::new(300.0, 50.0);

		model.connect(0, 1, &mut graph);

		let link = &model.links[0];
		assert_eq!(link.curve.start, Point::new(140.0, 20.0));
		assert_eq!(link.curve.end, Point::new(300.0, 70.0));
		assert_eq!(graph.edges().len(), 1);
	}

	#[test]
	fn moving_a_node_keeps_curves_exact() {
		let mut graph = EventGraph::new();
		graph.add_vertex("a".into(), "b".into(), "c".into());
		graph.add_vertex("d".into(), "e".into(), "f".into());

		let mut model = EditorModel::default();
		model.create_node(&graph.vertices()[0].clone(), &FixedMeasure);
		model.create_node(&graph.vertices()[1].clone(), &FixedMeasure);
		model.connect(0, 1, &mut graph);

		// A few integer-pixel moves of each endpoint node in turn.
		for (id, dx, dy) in [(0, 17.0, -4.0), (1, -30.0, 12.0), (0, 5.0, 5.0)] {
			model.nodes[id].position = model.nodes[id].position.offset(dx, dy);
			model.update_links_for(id);

			let link = &model.links[0];
			assert_eq!(link.curve.start, model.nodes[0].outgoing_anchor());
			assert_eq!(link.curve.end, model.nodes[1].incoming_anchor());
		}
	}
}
