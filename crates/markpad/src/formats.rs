use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

use crate::editor::{EditorAccess, Selection, StatePatch};

/// Stand-in glyph for the preview-toggle icon.
pub const PREVIEW_TOGGLE_LABEL: &str = " \u{1f441} ";

/// What pressing a format button does to the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    /// Surround the selection with a marker pair (`**`, `_`, ...).
    Wrap(&'static str),
    /// Insert a prefix at the start of the selection's line (`# `, `- `, ...).
    LinePrefix(&'static str),
    /// Turn the selection into a `[text](url)` link template.
    Link,
}

/// One formatting shortcut button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Format {
    pub name: &'static str,
    pub label: &'static str,
    /// Activated with Alt+<key>.
    pub key: char,
    pub kind: FormatKind,
}

/// Renders one action-bar button for a format.
pub type ButtonRenderer = Box<dyn Fn(&Format) -> Span<'static>>;

pub fn default_formats() -> Vec<Format> {
    vec![
        Format {
            name: "bold",
            label: "B",
            key: 'b',
            kind: FormatKind::Wrap("**"),
        },
        Format {
            name: "italic",
            label: "I",
            key: 'i',
            kind: FormatKind::Wrap("_"),
        },
        Format {
            name: "strikethrough",
            label: "S",
            key: 's',
            kind: FormatKind::Wrap("~~"),
        },
        Format {
            name: "code",
            label: "`",
            key: 'c',
            kind: FormatKind::Wrap("`"),
        },
        Format {
            name: "heading",
            label: "H",
            key: 'h',
            kind: FormatKind::LinePrefix("# "),
        },
        Format {
            name: "quote",
            label: ">",
            key: 'q',
            kind: FormatKind::LinePrefix("> "),
        },
        Format {
            name: "bullet-list",
            label: "\u{2022}",
            key: 'u',
            kind: FormatKind::LinePrefix("- "),
        },
        Format {
            name: "ordered-list",
            label: "1.",
            key: 'o',
            kind: FormatKind::LinePrefix("1. "),
        },
        Format {
            name: "link",
            label: "[]",
            key: 'l',
            kind: FormatKind::Link,
        },
    ]
}

/// Applies a format through the capability interface.
///
/// `selection` is the press-time selection, captured by the host before
/// the call: the snapshot from `read_state` deliberately carries the
/// reset `1..1` range, so it cannot be used to locate the edit.
pub fn apply_format<A: EditorAccess>(access: &mut A, selection: Selection, format: &Format) {
    let state = access.read_state();
    let text = state.text;
    let len = text.chars().count();
    let (lo, hi) = {
        let (lo, hi) = selection.ordered();
        (lo.min(len), hi.min(len))
    };

    let (new_text, caret) = match format.kind {
        FormatKind::Wrap(marker) => wrap(&text, lo, hi, marker),
        FormatKind::LinePrefix(prefix) => line_prefix(&text, lo, hi, prefix),
        FormatKind::Link => link(&text, lo, hi),
    };

    let name = format.name;
    access.apply_patch(
        StatePatch {
            text: Some(new_text),
            selection: Some(Selection::caret(caret)),
            ..Default::default()
        },
        |committed| {
            log::debug!(
                "applied {} format, document is now {} chars",
                name,
                committed.text.chars().count()
            );
        },
    );
}

/// The action bar buttons: one span per format, rendered by the caller's
/// `markdown_button` renderer when supplied.
pub fn render_format_buttons(
    formats: &[Format],
    markdown_button: Option<&ButtonRenderer>,
    accent: Color,
) -> Vec<Span<'static>> {
    formats
        .iter()
        .map(|format| match markdown_button {
            Some(render) => render(format),
            None => Span::styled(
                format!(" {} ", format.label),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ),
        })
        .collect()
}

fn wrap(text: &str, lo: usize, hi: usize, marker: &str) -> (String, usize) {
    let marker_len = marker.chars().count();
    let selected = slice(text, lo, hi);
    let wrapped = format!("{marker}{selected}{marker}");
    let caret = if lo == hi {
        lo + marker_len
    } else {
        hi + 2 * marker_len
    };
    (splice(text, lo, hi, &wrapped), caret)
}

fn line_prefix(text: &str, lo: usize, _hi: usize, prefix: &str) -> (String, usize) {
    let line_start = text
        .chars()
        .take(lo)
        .enumerate()
        .filter(|(_, c)| *c == '\n')
        .map(|(i, _)| i + 1)
        .last()
        .unwrap_or(0);
    let caret = lo + prefix.chars().count();
    (splice(text, line_start, line_start, prefix), caret)
}

fn link(text: &str, lo: usize, hi: usize) -> (String, usize) {
    let selected = slice(text, lo, hi);
    let selected_len = selected.chars().count();
    let template = format!("[{selected}](https://)");
    // caret lands inside the parentheses, after the scheme
    let caret = lo + selected_len + "[](https://".chars().count();
    (splice(text, lo, hi, &template), caret)
}

fn byte_at(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(b, _)| b)
        .unwrap_or(text.len())
}

fn slice(text: &str, start: usize, end: usize) -> &str {
    &text[byte_at(text, start)..byte_at(text, end)]
}

fn splice(text: &str, start: usize, end: usize, insert: &str) -> String {
    let (b0, b1) = (byte_at(text, start), byte_at(text, end));
    format!("{}{}{}", &text[..b0], insert, &text[b1..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{EditorOptions, MarkdownEditor};

    fn editor_with(text: &str) -> MarkdownEditor {
        MarkdownEditor::new(EditorOptions {
            default_value: Some(text.to_string()),
            ..Default::default()
        })
    }

    fn format_named(name: &str) -> Format {
        default_formats()
            .into_iter()
            .find(|f| f.name == name)
            .unwrap_or_else(|| panic!("no format named {name}"))
    }

    #[test]
    fn test_wrap_selection_bold() {
        let mut editor = editor_with("make this bold");
        let selection = Selection { start: 5, end: 9 };
        editor.on_selection_change(selection);

        apply_format(&mut editor, selection, &format_named("bold"));
        assert_eq!(editor.text(), "make **this** bold");
        // caret after the closing marker
        assert_eq!(editor.selection(), Selection::caret(13));
    }

    #[test]
    fn test_wrap_collapsed_caret_leaves_caret_inside() {
        let mut editor = editor_with("ab");
        let selection = Selection::caret(1);
        editor.on_selection_change(selection);

        apply_format(&mut editor, selection, &format_named("italic"));
        assert_eq!(editor.text(), "a__b");
        assert_eq!(editor.selection(), Selection::caret(2));
    }

    #[test]
    fn test_line_prefix_heading_mid_line() {
        let mut editor = editor_with("first\nsecond line");
        let selection = Selection::caret(9); // inside "second"
        editor.on_selection_change(selection);

        apply_format(&mut editor, selection, &format_named("heading"));
        assert_eq!(editor.text(), "first\n# second line");
        assert_eq!(editor.selection(), Selection::caret(11));
    }

    #[test]
    fn test_line_prefix_on_first_line() {
        let mut editor = editor_with("top");
        let selection = Selection::caret(2);
        editor.on_selection_change(selection);

        apply_format(&mut editor, selection, &format_named("quote"));
        assert_eq!(editor.text(), "> top");
    }

    #[test]
    fn test_link_wraps_selection() {
        let mut editor = editor_with("see docs here");
        let selection = Selection { start: 4, end: 8 };
        editor.on_selection_change(selection);

        apply_format(&mut editor, selection, &format_named("link"));
        assert_eq!(editor.text(), "see [docs](https://) here");
        // caret inside the parentheses, ready for the address
        assert_eq!(editor.selection(), Selection::caret(19));
    }

    #[test]
    fn test_link_from_collapsed_caret() {
        let mut editor = editor_with("");
        apply_format(&mut editor, Selection::caret(0), &format_named("link"));
        assert_eq!(editor.text(), "[](https://)");
        assert_eq!(editor.selection(), Selection::caret(11));
    }

    #[test]
    fn test_wrap_with_multibyte_text() {
        let mut editor = editor_with("強い words");
        let selection = Selection { start: 0, end: 2 };
        editor.on_selection_change(selection);

        apply_format(&mut editor, selection, &format_named("bold"));
        assert_eq!(editor.text(), "**強い** words");
    }

    #[test]
    fn test_apply_format_refocuses_input() {
        let mut editor = editor_with("text");
        assert!(!editor.is_input_focused());
        apply_format(&mut editor, Selection::caret(0), &format_named("bold"));
        assert!(editor.is_input_focused());
    }

    #[test]
    fn test_apply_format_clamps_stale_selection() {
        let mut editor = editor_with("ab");
        apply_format(
            &mut editor,
            Selection { start: 10, end: 90 },
            &format_named("bold"),
        );
        assert_eq!(editor.text(), "ab****");
    }

    #[test]
    fn test_default_buttons_use_accent() {
        let formats = default_formats();
        let spans = render_format_buttons(&formats, None, Color::Cyan);
        assert_eq!(spans.len(), formats.len());
        assert_eq!(spans[0].content.as_ref(), " B ");
        assert_eq!(spans[0].style.fg, Some(Color::Cyan));
    }

    #[test]
    fn test_custom_button_renderer_wins() {
        let renderer: ButtonRenderer =
            Box::new(|format| Span::raw(format!("<{}>", format.name)));
        let formats = default_formats();
        let spans = render_format_buttons(&formats, Some(&renderer), Color::Cyan);
        assert_eq!(spans[0].content.as_ref(), "<bold>");
    }

    #[test]
    fn test_format_keys_are_unique() {
        let formats = default_formats();
        for (i, a) in formats.iter().enumerate() {
            for b in &formats[i + 1..] {
                assert_ne!(a.key, b.key, "{} and {} share a key", a.name, b.name);
            }
        }
    }
}
