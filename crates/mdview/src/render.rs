use comrak::nodes::{AstNode, ListType, NodeList, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};

use crate::styles::MarkdownStyles;

/// Render markdown source into styled terminal text.
///
/// Block elements become one or more lines, separated by a blank line
/// between top-level blocks. Inline emphasis maps to terminal
/// modifiers, links and mailto targets to the configured colors.
pub fn render(source: &str, styles: &MarkdownStyles) -> Text<'static> {
    let arena = Arena::new();
    let root = parse_document(&arena, source, &comrak_options());

    let mut renderer = Renderer::new(styles);
    for (i, child) in root.children().enumerate() {
        if i > 0 {
            renderer.blank();
        }
        renderer.block(child);
    }
    renderer.finish()
}

pub(crate) fn comrak_options() -> ComrakOptions<'static> {
    let mut opt = ComrakOptions::default();

    // Extension options
    opt.extension.strikethrough = true;
    opt.extension.table = true;
    opt.extension.autolink = true;
    opt.extension.tasklist = true;

    // Parse options
    opt.parse.smart = true;

    // Render options only matter for the HTML path; keep escaping on
    // so raw HTML in the source never reaches the export verbatim.
    opt.render.unsafe_ = false;
    opt.render.escape = true;

    opt
}

struct Renderer<'s> {
    styles: &'s MarkdownStyles,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    // Prepended to every flushed line; grows inside quotes and nested lists.
    prefix: String,
}

impl<'s> Renderer<'s> {
    fn new(styles: &'s MarkdownStyles) -> Self {
        Self {
            styles,
            lines: Vec::new(),
            current: Vec::new(),
            prefix: String::new(),
        }
    }

    fn finish(mut self) -> Text<'static> {
        if !self.current.is_empty() {
            self.flush();
        }
        Text::from(self.lines)
    }

    fn blank(&mut self) {
        self.lines.push(Line::default());
    }

    fn flush(&mut self) {
        let mut spans = Vec::new();
        if !self.prefix.is_empty() {
            spans.push(Span::styled(self.prefix.clone(), self.styles.quote_style()));
        }
        spans.append(&mut self.current);
        self.lines.push(Line::from(spans));
    }

    fn block<'a>(&mut self, node: &'a AstNode<'a>) {
        match &node.data.borrow().value {
            NodeValue::Heading(heading) => {
                let style = self.styles.heading_style(heading.level);
                let marker = format!("{} ", "#".repeat(heading.level as usize));
                self.current.push(Span::styled(marker, style));
                self.inline_children(node, style);
                self.flush();
            }
            NodeValue::Paragraph => {
                self.inline_children(node, self.styles.text_style());
                self.flush();
            }
            NodeValue::CodeBlock(code_block) => {
                for line in code_block.literal.lines() {
                    self.current
                        .push(Span::styled(line.to_string(), self.styles.code_style()));
                    self.flush();
                }
            }
            NodeValue::BlockQuote => {
                let saved = self.prefix.len();
                self.prefix.push_str("> ");
                for (i, child) in node.children().enumerate() {
                    if i > 0 {
                        self.blank();
                    }
                    self.block(child);
                }
                self.prefix.truncate(saved);
            }
            NodeValue::List(list) => {
                let list = *list;
                self.list(node, &list);
            }
            NodeValue::Table(_) => {
                for row in node.children() {
                    let mut first_cell = true;
                    for cell in row.children() {
                        if !first_cell {
                            self.current
                                .push(Span::styled(" | ".to_string(), self.styles.text_style()));
                        }
                        self.inline_children(cell, self.styles.text_style());
                        first_cell = false;
                    }
                    self.flush();
                }
            }
            NodeValue::ThematicBreak => {
                self.current.push(Span::styled(
                    "\u{2500}".repeat(8),
                    self.styles.rule_style(),
                ));
                self.flush();
            }
            _ => {
                for child in node.children() {
                    self.block(child);
                }
            }
        }
    }

    fn list<'a>(&mut self, node: &'a AstNode<'a>, list: &NodeList) {
        for (index, item) in node.children().enumerate() {
            let marker = match list.list_type {
                ListType::Bullet => "\u{2022} ".to_string(),
                ListType::Ordered => format!("{}. ", list.start + index),
            };
            let check = match &item.data.borrow().value {
                NodeValue::TaskItem(symbol) => Some(if symbol.is_some() { "[x] " } else { "[ ] " }),
                _ => None,
            };

            let mut first = true;
            for child in item.children() {
                match &child.data.borrow().value {
                    NodeValue::Paragraph => {
                        if first {
                            self.current
                                .push(Span::styled(marker.clone(), self.styles.text_style()));
                            if let Some(check) = check {
                                self.current.push(Span::styled(
                                    check.to_string(),
                                    self.styles.text_style(),
                                ));
                            }
                        } else {
                            self.current
                                .push(Span::styled("  ".to_string(), self.styles.text_style()));
                        }
                        self.inline_children(child, self.styles.text_style());
                        self.flush();
                        first = false;
                    }
                    NodeValue::List(inner) => {
                        let inner = *inner;
                        let saved = self.prefix.len();
                        self.prefix.push_str("  ");
                        self.list(child, &inner);
                        self.prefix.truncate(saved);
                    }
                    _ => {
                        self.block(child);
                        first = false;
                    }
                }
            }

            if first {
                self.current
                    .push(Span::styled(marker, self.styles.text_style()));
                self.flush();
            }
        }
    }

    fn inline_children<'a>(&mut self, node: &'a AstNode<'a>, style: Style) {
        for child in node.children() {
            self.inline(child, style);
        }
    }

    fn inline<'a>(&mut self, node: &'a AstNode<'a>, style: Style) {
        match &node.data.borrow().value {
            NodeValue::Text(text) => {
                self.current.push(Span::styled(text.clone(), style));
            }
            NodeValue::Code(code) => {
                self.current
                    .push(Span::styled(code.literal.clone(), self.styles.code_style()));
            }
            NodeValue::Emph => {
                self.inline_children(node, style.add_modifier(Modifier::ITALIC));
            }
            NodeValue::Strong => {
                self.inline_children(node, style.add_modifier(Modifier::BOLD));
            }
            NodeValue::Strikethrough => {
                self.inline_children(node, style.add_modifier(Modifier::CROSSED_OUT));
            }
            NodeValue::Link(link) => {
                self.inline_children(node, self.styles.link_style(&link.url));
            }
            NodeValue::Image(image) => {
                self.current.push(Span::styled(
                    format!("[image: {}]", image.url),
                    self.styles.quote_style(),
                ));
            }
            NodeValue::SoftBreak | NodeValue::LineBreak => {
                self.flush();
            }
            _ => {
                self.inline_children(node, style);
            }
        }
    }
}
