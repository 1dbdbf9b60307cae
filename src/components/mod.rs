pub mod node_editor;
