pub mod html;
pub mod render;
pub mod styles;

pub use html::to_html;
pub use render::render;
pub use styles::MarkdownStyles;
