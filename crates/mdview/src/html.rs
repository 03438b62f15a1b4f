use ammonia::Builder;
use comrak::markdown_to_html;

use crate::render::comrak_options;

/// Markdown to sanitized HTML, for the export path.
pub fn to_html(src: &str) -> String {
    let html = markdown_to_html(src, &comrak_options());
    sanitize(&html)
}

pub fn sanitize(html: &str) -> String {
    // ammonia's defaults already strip scripts and event handlers
    Builder::new().clean(html).to_string()
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_basic_markdown() {
        let html = to_html("# Hello\n\nThis is **bold** and *italic*.");
        assert!(html.contains("<h1>"));
        assert!(html.contains("<strong>"));
        assert!(html.contains("<em>"));
    }

    #[test]
    fn test_gfm_table() {
        let html = to_html("| Header 1 | Header 2 |\n|----------|----------|\n| Cell 1   | Cell 2   |");
        assert!(html.contains("<table>"));
        assert!(html.contains("<th>"));
        assert!(html.contains("<td>"));
    }

    #[test]
    fn test_scripts_are_stripped() {
        let html = to_html("<script>alert('XSS')</script>");
        assert!(!html.contains("<script"));
    }

    #[test]
    fn test_sanitize_removes_dangerous_hrefs() {
        let sanitized = sanitize(r#"<a href="javascript:alert('XSS')">Click me</a>"#);
        assert!(!sanitized.contains("javascript:"));
        assert!(sanitized.contains("Click me"));
    }
}
