use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style as SynStyle, Theme, ThemeSet};
use syntect::parsing::SyntaxSet;

/// Highlights raw markdown source for the input surface.
pub struct SourceHighlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl SourceHighlighter {
    pub fn new(theme_name: &str) -> Self {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let theme_set = ThemeSet::load_defaults();

        let fallback = "base16-ocean.dark";
        let theme = theme_set
            .themes
            .get(theme_name)
            .or_else(|| theme_set.themes.get(fallback))
            .or_else(|| theme_set.themes.values().next())
            .cloned()
            .unwrap_or_default();

        Self { syntax_set, theme }
    }

    pub fn highlight(&self, lines: &[String]) -> Vec<Line<'static>> {
        let syntax = self
            .syntax_set
            .find_syntax_by_name("Markdown")
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
        let mut highlighter = HighlightLines::new(syntax, &self.theme);

        lines
            .iter()
            .map(|line| {
                let line = line.trim_end_matches('\n');
                let regions = highlighter
                    .highlight_line(line, &self.syntax_set)
                    .unwrap_or_else(|_| vec![(SynStyle::default(), line)]);

                let spans: Vec<Span> = regions
                    .into_iter()
                    .map(|(style, text)| {
                        Span::styled(text.to_string(), syn_style_to_ratatui(style))
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

fn syn_style_to_ratatui(style: SynStyle) -> Style {
    let fg = style.foreground;
    Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_keeps_line_content() {
        let highlighter = SourceHighlighter::new("base16-ocean.dark");
        let lines = vec!["# Heading".to_string(), "plain text".to_string()];
        let highlighted = highlighter.highlight(&lines);

        assert_eq!(highlighted.len(), 2);
        let first: String = highlighted[0]
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect();
        assert_eq!(first, "# Heading");
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let highlighter = SourceHighlighter::new("no-such-theme");
        let highlighted = highlighter.highlight(&["text".to_string()]);
        assert_eq!(highlighted.len(), 1);
    }
}
