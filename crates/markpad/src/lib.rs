// Markpad library exports

pub mod app;
pub mod config;
pub mod editor;
pub mod formats;
pub mod highlight;
pub mod status;
pub mod text_width;
pub mod ui;

pub use app::App;
pub use config::Config;
pub use editor::{
    EditorAccess, EditorOptions, EditorState, MarkdownEditor, PreviewStyle, Selection, StatePatch,
    PREVIEW_PLACEHOLDER,
};
pub use formats::{apply_format, default_formats, Format, FormatKind};
