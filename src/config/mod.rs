pub mod editor;

pub use editor::EditorConfig;
