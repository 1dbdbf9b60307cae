//! Pointer-driven interaction state machine for the node editor.
//!
//! One [`EditorSession`] owns the event graph, the visual model and the
//! viewport, and is the only thing that mutates them. Every handler runs to
//! completion on the UI thread, so link curves are fixed up synchronously in
//! the same event that moved a node.

use log::info;

use super::geometry::{CubicBezier, Point, Viewport};
use super::graph::{EventGraph, MalformedInput};
use super::model::{EditorModel, TextMeasure};

/// Horizontal gap between nodes laid out at import time.
const NODE_GAP: f64 = 20.0;

/// What a pointer position lands on, topmost node first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitTarget {
	Background,
	Node(usize),
	IncomingPin(usize),
	OutgoingPin(usize),
}

/// The active gesture. Exactly one gesture runs at a time; pointer-down while
/// one is active is ignored until pointer-up returns to `Idle`.
#[derive(Clone, Debug, PartialEq)]
pub enum Gesture {
	Idle,
	PanningViewport,
	DraggingNode(usize),
	/// A link under construction: the start is pinned to the source node's
	/// outgoing anchor, the free end tracks the pointer in world space.
	DraggingNewLink { source: usize, curve: CubicBezier },
}

pub struct EditorSession {
	pub graph: EventGraph,
	pub model: EditorModel,
	pub viewport: Viewport,
	pub canvas_width: f64,
	pub canvas_height: f64,
	gesture: Gesture,
	last_pointer: Point,
}

impl EditorSession {
	pub fn new(canvas_width: f64, canvas_height: f64) -> Self {
		Self {
			graph: EventGraph::new(),
			model: EditorModel::default(),
			viewport: Viewport::new(0.0, 0.0, canvas_width, canvas_height),
			canvas_width,
			canvas_height,
			gesture: Gesture::Idle,
			last_pointer: Point::default(),
		}
	}

	pub fn gesture(&self) -> &Gesture {
		&self.gesture
	}

	/// Replace the session contents with the graph parsed from `text`. Nodes
	/// are laid out left to right in import order; any edges already in the
	/// graph (none for the plain 3-column format) are replayed into links.
	/// On a parse error the session is left untouched.
	pub fn load_csv(&mut self, text: &str, measure: &impl TextMeasure) -> Result<(), MalformedInput> {
		let graph = EventGraph::from_csv(text)?;
		info!("imported {} event(s) from CSV", graph.vertices().len());
		self.set_graph(graph, measure);
		Ok(())
	}

	/// Rebuild the visual model from `graph`: one sized node per vertex in a
	/// left-to-right row, one link per edge.
	pub fn set_graph(&mut self, graph: EventGraph, measure: &impl TextMeasure) {
		self.graph = graph;
		self.model = EditorModel::default();
		self.gesture = Gesture::Idle;

		let mut cursor_x = 0.0;
		for vertex in self.graph.vertices().to_vec() {
			let id = self.model.create_node(&vertex, measure);
			self.model.nodes[id].position = Point::new(cursor_x, 0.0);
			cursor_x += self.model.nodes[id].width + NODE_GAP;
		}

		for edge in self.graph.edges().to_vec() {
			let curve = CubicBezier::between(
				self.model.nodes[edge.previous].outgoing_anchor(),
				self.model.nodes[edge.next].incoming_anchor(),
			);
			self.model.links.push(super::model::VisualLink {
				source: edge.previous,
				dest: edge.next,
				curve,
			});
		}
	}

	pub fn export_csv(&self) -> String {
		self.graph.export_csv()
	}

	/// Geometric hit test in world space. Later-created nodes draw on top, so
	/// they are tested first; pins win over the node body they sit on.
	pub fn hit_test(&self, world: Point) -> HitTarget {
		for node in self.model.nodes.iter().rev() {
			if node.hits_outgoing_pin(world) {
				return HitTarget::OutgoingPin(node.id);
			}
			if node.hits_incoming_pin(world) {
				return HitTarget::IncomingPin(node.id);
			}
			if node.contains(world) {
				return HitTarget::Node(node.id);
			}
		}
		HitTarget::Background
	}

	pub fn pointer_down(&mut self, screen_x: f64, screen_y: f64) {
		if self.gesture != Gesture::Idle {
			return;
		}
		let screen = Point::new(screen_x, screen_y);
		self.last_pointer = screen;
		let world = self
			.viewport
			.screen_to_world(screen, self.canvas_width, self.canvas_height);

		self.gesture = match self.hit_test(world) {
			HitTarget::Background => Gesture::PanningViewport,
			HitTarget::OutgoingPin(id) => Gesture::DraggingNewLink {
				source: id,
				curve: CubicBezier::between(self.model.nodes[id].outgoing_anchor(), world),
			},
			// Grabbing the incoming pin drags the node, same as the body.
			HitTarget::Node(id) | HitTarget::IncomingPin(id) => Gesture::DraggingNode(id),
		};
	}

	pub fn pointer_move(&mut self, screen_x: f64, screen_y: f64) {
		let screen = Point::new(screen_x, screen_y);
		let (dx, dy) = (screen.x - self.last_pointer.x, screen.y - self.last_pointer.y);
		self.last_pointer = screen;

		match self.gesture {
			Gesture::Idle => {}
			Gesture::PanningViewport => self.viewport.pan(dx, dy),
			Gesture::DraggingNode(id) => {
				// Raw screen delta, unscaled by zoom, matching the historical
				// feel of the editor.
				self.model.nodes[id].position = self.model.nodes[id].position.offset(dx, dy);
				self.model.update_links_for(id);
			}
			Gesture::DraggingNewLink { source, ref mut curve } => {
				let free_end = self
					.viewport
					.screen_to_world(screen, self.canvas_width, self.canvas_height);
				*curve = CubicBezier::between(self.model.nodes[source].outgoing_anchor(), free_end);
			}
		}
	}

	/// End the current gesture. A link drag commits only when released on an
	/// incoming pin; anywhere else the pending link is discarded silently.
	pub fn pointer_up(&mut self, screen_x: f64, screen_y: f64) {
		let screen = Point::new(screen_x, screen_y);
		self.last_pointer = screen;

		if let Gesture::DraggingNewLink { source, .. } = self.gesture {
			let world = self
				.viewport
				.screen_to_world(screen, self.canvas_width, self.canvas_height);
			if let HitTarget::IncomingPin(dest) = self.hit_test(world) {
				self.model.connect(source, dest, &mut self.graph);
			}
		}

		self.gesture = Gesture::Idle;
	}

	/// The pointer leaving the canvas ends the gesture exactly like a release.
	pub fn pointer_leave(&mut self, screen_x: f64, screen_y: f64) {
		self.pointer_up(screen_x, screen_y);
	}

	/// Wheel zoom: +1 widens the viewport (zoom out), -1 narrows it.
	pub fn wheel(&mut self, direction: i32) {
		self.viewport.zoom(direction);
	}

	/// Track a canvas resize: the viewport adopts the new canvas extent so
	/// one screen pixel is one world unit again, keeping its origin.
	pub fn resize(&mut self, canvas_width: f64, canvas_height: f64) {
		self.canvas_width = canvas_width;
		self.canvas_height = canvas_height;
		self.viewport.width = canvas_width;
		self.viewport.height = canvas_height;
	}
}

#[cfg(test)]
mod tests {
	use super::super::model::tests::FixedMeasure;
	use super::*;

	// Canvas matching the initial viewport, so screen == world until the
	// viewport moves.
	const W: f64 = 800.0;
	const H: f64 = 600.0;

	fn session_with_two_nodes() -> EditorSession {
		let mut session = EditorSession::new(W, H);
		session
			.load_csv("subject,action,object\nA,does,B\nB,does,C", &FixedMeasure)
			.unwrap();
		session
	}

	#[test]
	fn import_lays_nodes_out_in_a_row() {
		let session = session_with_two_nodes();
		// Both nodes have only short labels: width 140 each, 20 apart.
		assert_eq!(session.model.nodes[0].position, Point::new(0.0, 0.0));
		assert_eq!(session.model.nodes[1].position, Point::new(160.0, 0.0));
	}

	#[test]
	fn failed_import_leaves_session_untouched() {
		let mut session = session_with_two_nodes();
		session
			.load_csv("subject,action,object\nonly-one-column", &FixedMeasure)
			.unwrap_err();
		assert_eq!(session.model.nodes.len(), 2);
		assert_eq!(session.graph.vertices().len(), 2);
	}

	#[test]
	fn background_drag_pans_viewport() {
		let mut session = session_with_two_nodes();
		session.pointer_down(400.0, 400.0);
		assert_eq!(*session.gesture(), Gesture::PanningViewport);
		session.pointer_move(415.0, 393.0);
		assert_eq!((session.viewport.x, session.viewport.y), (-15.0, 7.0));
		assert_eq!((session.viewport.width, session.viewport.height), (W, H));
		session.pointer_up(415.0, 393.0);
		assert_eq!(*session.gesture(), Gesture::Idle);
	}

	#[test]
	fn node_drag_moves_node_and_curves_together() {
		let mut session = session_with_two_nodes();
		session.model.connect(0, 1, &mut session.graph);

		// Grab node 0 in the middle of its body.
		session.pointer_down(70.0, 60.0);
		assert_eq!(*session.gesture(), Gesture::DraggingNode(0));
		session.pointer_move(80.0, 90.0);
		session.pointer_move(60.0, 85.0);

		assert_eq!(session.model.nodes[0].position, Point::new(-10.0, 25.0));
		let link = &session.model.links[0];
		assert_eq!(link.curve.start, session.model.nodes[0].outgoing_anchor());
		assert_eq!(link.curve.end, session.model.nodes[1].incoming_anchor());
	}

	#[test]
	fn grabbing_incoming_pin_drags_the_node() {
		let mut session = session_with_two_nodes();
		session.pointer_down(160.0, 20.0);
		assert_eq!(*session.gesture(), Gesture::DraggingNode(1));
	}

	#[test]
	fn pointer_down_during_gesture_is_ignored() {
		let mut session = session_with_two_nodes();
		session.pointer_down(400.0, 400.0);
		session.pointer_down(70.0, 60.0);
		assert_eq!(*session.gesture(), Gesture::PanningViewport);
	}

	#[test]
	fn connect_gesture_appends_edge_and_exports() {
		let mut session = session_with_two_nodes();

		// Node 0 is 140 wide: outgoing pin at (140, 20); node 1's incoming
		// pin at (160, 20).
		session.pointer_down(140.0, 20.0);
		assert!(matches!(*session.gesture(), Gesture::DraggingNewLink { source: 0, .. }));
		session.pointer_move(150.0, 21.0);
		session.pointer_up(160.0, 20.0);

		assert_eq!(session.model.links.len(), 1);
		assert_eq!(session.graph.edges().len(), 1);
		assert_eq!(
			session.export_csv(),
			"id,subject,action,object,previous,next\n\
			 0,A,does,B,null,1\n\
			 1,B,does,C,0,null"
		);
	}

	#[test]
	fn released_link_over_background_is_discarded() {
		let mut session = session_with_two_nodes();
		session.pointer_down(140.0, 20.0);
		session.pointer_move(400.0, 400.0);
		session.pointer_up(400.0, 400.0);

		assert!(session.model.links.is_empty());
		assert!(session.graph.edges().is_empty());
		assert_eq!(*session.gesture(), Gesture::Idle);
	}

	#[test]
	fn pending_link_tracks_pointer_through_viewport() {
		let mut session = session_with_two_nodes();
		// Zoom out once so screen and world no longer coincide.
		session.wheel(1);

		let start = session.model.nodes[0].outgoing_anchor();
		let screen = session
			.viewport
			.world_to_screen(start, W, H);
		session.pointer_down(screen.x, screen.y);
		session.pointer_move(300.0, 200.0);

		let expected_end = session
			.viewport
			.screen_to_world(Point::new(300.0, 200.0), W, H);
		match session.gesture() {
			Gesture::DraggingNewLink { curve, .. } => {
				assert_eq!(curve.start, start);
				assert_eq!(curve.end, expected_end);
			}
			other => panic!("expected link drag, got {other:?}"),
		}
	}

	#[test]
	fn pointer_leave_ends_drag_like_release() {
		let mut session = session_with_two_nodes();
		session.pointer_down(70.0, 60.0);
		session.pointer_leave(70.0, 60.0);
		assert_eq!(*session.gesture(), Gesture::Idle);
	}

	#[test]
	fn resize_resets_viewport_extent_only() {
		let mut session = session_with_two_nodes();
		session.pointer_down(400.0, 400.0);
		session.pointer_move(410.0, 400.0);
		session.pointer_up(410.0, 400.0);
		session.resize(1024.0, 768.0);
		assert_eq!(session.viewport.x, -10.0);
		assert_eq!((session.viewport.width, session.viewport.height), (1024.0, 768.0));
	}
}
