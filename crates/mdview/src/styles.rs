use ratatui::style::{Color, Modifier, Style};

/// Color configuration for rendered markdown. One field per element
/// class the preview distinguishes: headings, links, mailto links and
/// body text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownStyles {
    pub heading: Color,
    pub link: Color,
    pub mail_to: Color,
    pub text: Color,
}

impl Default for MarkdownStyles {
    fn default() -> Self {
        Self {
            heading: Color::Rgb(128, 0, 128),
            link: Color::Rgb(255, 192, 203),
            mail_to: Color::Rgb(255, 165, 0),
            text: Color::Rgb(85, 85, 85),
        }
    }
}

impl MarkdownStyles {
    /// Heading style for a given level. Terminal cells have no font
    /// size, so level 1 is additionally underlined.
    pub fn heading_style(&self, level: u8) -> Style {
        let style = Style::default().fg(self.heading).add_modifier(Modifier::BOLD);
        if level == 1 {
            style.add_modifier(Modifier::UNDERLINED)
        } else {
            style
        }
    }

    /// Link style; `mailto:` targets get their own color.
    pub fn link_style(&self, url: &str) -> Style {
        let color = if url.starts_with("mailto:") {
            self.mail_to
        } else {
            self.link
        };
        Style::default().fg(color).add_modifier(Modifier::UNDERLINED)
    }

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn code_style(&self) -> Style {
        Style::default().fg(self.text).add_modifier(Modifier::DIM)
    }

    pub fn quote_style(&self) -> Style {
        Style::default().fg(self.text).add_modifier(Modifier::ITALIC)
    }

    pub fn rule_style(&self) -> Style {
        Style::default().fg(self.text).add_modifier(Modifier::DIM)
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_default_colors() {
        let styles = MarkdownStyles::default();
        assert_eq!(styles.heading, Color::Rgb(128, 0, 128));
        assert_eq!(styles.link, Color::Rgb(255, 192, 203));
        assert_eq!(styles.mail_to, Color::Rgb(255, 165, 0));
        assert_eq!(styles.text, Color::Rgb(85, 85, 85));
    }

    #[test]
    fn test_heading_level_one_is_underlined() {
        let styles = MarkdownStyles::default();
        let h1 = styles.heading_style(1);
        let h2 = styles.heading_style(2);
        assert!(h1.add_modifier.contains(Modifier::UNDERLINED));
        assert!(h1.add_modifier.contains(Modifier::BOLD));
        assert!(!h2.add_modifier.contains(Modifier::UNDERLINED));
        assert!(h2.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_mailto_links_use_mail_color() {
        let styles = MarkdownStyles::default();
        let web = styles.link_style("https://example.com");
        let mail = styles.link_style("mailto:user@example.com");
        assert_eq!(web.fg, Some(styles.link));
        assert_eq!(mail.fg, Some(styles.mail_to));
    }
}
