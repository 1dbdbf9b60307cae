mod component;
mod geometry;
mod graph;
mod model;
mod render;
mod state;

pub use component::NodeEditorCanvas;
pub use geometry::{CubicBezier, Point, Transform2D, Viewport};
pub use graph::{EventEdge, EventGraph, EventVertex, MalformedInput};
pub use model::{EditorModel, LinkPoint, TextMeasure, VisualLink, VisualNode};
pub use state::{EditorSession, Gesture, HitTarget};
