//! Placard Scene - the creative scene model
//!
//! Scenes are ordered lists of tagged elements (backgrounds, images, copy and
//! compliance tiles) positioned in canvas percentages. This crate loads and
//! saves them as JSON or TOML and provides the editor commands that derive
//! one snapshot from the previous one.

mod command;
mod element;
mod format;
mod loader;
mod saver;

pub use command::{drag_snap, SceneCommand};
pub use element::{
    BackgroundElement, Element, ElementKind, Frame, ImageElement, Positioned, TextElement,
};
pub use format::{Scene, SuggestionList};
pub use loader::{load_scene, load_scene_string, load_suggestions_string, SceneFormat};
pub use saver::{save_scene, save_scene_string};
