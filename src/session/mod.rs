//! Editing session: state, render engine, and the controller tying them
//! together.

pub mod editor;
pub mod engine;
pub mod state;

pub use editor::EditorSession;
pub use engine::RenderEngine;
pub use state::{FilterState, SelectionCallback};
