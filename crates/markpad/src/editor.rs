use ratatui::style::Color;
use ratatui::text::Text;
use ropey::Rope;

use mdview::MarkdownStyles;

use crate::formats::{default_formats, ButtonRenderer, Format};

/// Rendered by the default preview when the document is empty.
pub const PREVIEW_PLACEHOLDER: &str = "Markdown preview here";

/// Cursor or selection range, in char indices into the text.
///
/// `start == end` is a caret. The component stores whatever range it is
/// handed; keeping `start <= end <= len` is the host's responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn caret(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }

    pub fn ordered(&self) -> (usize, usize) {
        if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }
}

/// Style overrides for the preview container. Fields left `None` fall
/// back to the value in the base style (shallow merge).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreviewStyle {
    pub border_color: Option<Color>,
    pub background: Option<Color>,
}

impl PreviewStyle {
    pub fn merged_over(self, base: Self) -> Self {
        Self {
            border_color: self.border_color.or(base.border_color),
            background: self.background.or(base.background),
        }
    }
}

/// Snapshot of the editor state, as returned by [`EditorAccess::read_state`].
#[derive(Clone)]
pub struct EditorState {
    pub text: String,
    pub selection: Selection,
    pub show_preview: bool,
    pub text_color: Option<Color>,
    pub custom_preview: Option<Text<'static>>,
    pub preview_style: Option<PreviewStyle>,
}

/// Partial state for [`EditorAccess::apply_patch`]; `None` fields keep
/// their current value.
#[derive(Debug, Clone, Default)]
pub struct StatePatch {
    pub text: Option<String>,
    pub selection: Option<Selection>,
    pub show_preview: Option<bool>,
}

pub type ChangeCallback = Box<dyn FnMut(&str)>;

/// The capability interface handed to the formatting button
/// collaborator: a read and a patch, nothing else.
pub trait EditorAccess {
    /// Side-effecting read: the stored selection is forced to `1..1`
    /// *before* the snapshot is taken, so the returned state always
    /// carries `Selection { start: 1, end: 1 }`. Callers that need the
    /// press-time selection must capture it through
    /// [`MarkdownEditor::selection`] beforehand.
    fn read_state(&mut self) -> EditorState;

    /// Refocuses the input surface, merges `patch` into the state,
    /// then invokes `on_applied` with the committed state. Does not
    /// fire the markdown-change callback.
    fn apply_patch(&mut self, patch: StatePatch, on_applied: impl FnOnce(&EditorState));
}

/// Construction options. All fields are optional; absent means "use the
/// default", which is distinct from an explicitly supplied empty value.
#[derive(Default)]
pub struct EditorOptions {
    pub default_value: Option<String>,
    pub show_preview: Option<bool>,
    pub text_color: Option<Color>,
    pub custom_preview: Option<Text<'static>>,
    pub preview_style: Option<PreviewStyle>,
    pub on_markdown_change: Option<ChangeCallback>,
    /// Passed through to the button collaborator.
    pub formats: Option<Vec<Format>>,
    /// Passed through to the button collaborator.
    pub markdown_button: Option<ButtonRenderer>,
}

/// A text editor over markdown source that can toggle a rendered
/// preview on and off and exposes itself to a row of formatting
/// buttons through [`EditorAccess`].
pub struct MarkdownEditor {
    content: Rope,
    selection: Selection,
    show_preview: bool,
    text_color: Option<Color>,
    custom_preview: Option<Text<'static>>,
    preview_style: Option<PreviewStyle>,
    on_markdown_change: Option<ChangeCallback>,
    formats: Vec<Format>,
    markdown_button: Option<ButtonRenderer>,
    input_focused: bool,
}

impl MarkdownEditor {
    pub fn new(options: EditorOptions) -> Self {
        let text = options.default_value.unwrap_or_default();
        Self {
            content: Rope::from_str(&text),
            selection: Selection::default(),
            show_preview: options.show_preview.unwrap_or(false),
            text_color: options.text_color,
            custom_preview: options.custom_preview,
            preview_style: options.preview_style,
            on_markdown_change: options.on_markdown_change,
            formats: options.formats.unwrap_or_else(default_formats),
            markdown_button: options.markdown_button,
            input_focused: false,
        }
    }

    /// Invoked once by the host after attach; requests input focus.
    pub fn mount(&mut self) {
        self.request_input_focus();
    }

    pub fn request_input_focus(&mut self) {
        self.input_focused = true;
    }

    pub fn is_input_focused(&self) -> bool {
        self.input_focused
    }

    pub fn text(&self) -> String {
        self.content.to_string()
    }

    pub fn len_chars(&self) -> usize {
        self.content.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.content.len_chars() == 0
    }

    /// The stored selection, exactly as last reported.
    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn show_preview(&self) -> bool {
        self.show_preview
    }

    pub fn text_color(&self) -> Option<Color> {
        self.text_color
    }

    pub fn preview_style(&self) -> Option<PreviewStyle> {
        self.preview_style
    }

    pub fn formats(&self) -> &[Format] {
        &self.formats
    }

    pub fn markdown_button(&self) -> Option<&ButtonRenderer> {
        self.markdown_button.as_ref()
    }

    /// Replaces the text and notifies the change callback, if any,
    /// exactly once with the new text.
    pub fn change_text(&mut self, input: impl Into<String>) {
        let input = input.into();
        self.content = Rope::from_str(&input);
        if let Some(callback) = self.on_markdown_change.as_mut() {
            callback(&input);
        }
    }

    /// Stores the range reported by the input surface, verbatim.
    pub fn on_selection_change(&mut self, selection: Selection) {
        self.selection = selection;
    }

    /// Flips the preview on or off.
    pub fn toggle_preview(&mut self) {
        self.show_preview = !self.show_preview;
    }

    /// Content for the preview surface: the custom preview verbatim
    /// when one was supplied, otherwise the default renderer over the
    /// text (or over [`PREVIEW_PLACEHOLDER`] for an empty document).
    pub fn preview_content(&self, styles: &MarkdownStyles) -> Text<'static> {
        if let Some(custom) = &self.custom_preview {
            return custom.clone();
        }
        let text = self.text();
        if text.is_empty() {
            mdview::render(PREVIEW_PLACEHOLDER, styles)
        } else {
            mdview::render(&text, styles)
        }
    }

    fn snapshot(&self) -> EditorState {
        EditorState {
            text: self.text(),
            selection: self.selection,
            show_preview: self.show_preview,
            text_color: self.text_color,
            custom_preview: self.custom_preview.clone(),
            preview_style: self.preview_style,
        }
    }

    // ----- input surface -------------------------------------------------

    /// Replaces the current selection with `s` and leaves a caret after
    /// the inserted text. Routed through [`Self::change_text`], so the
    /// change callback fires.
    pub fn insert_str(&mut self, s: &str) {
        let (lo, hi) = self.clamped_range();
        self.replace_range(lo, hi, s);
    }

    pub fn insert_char(&mut self, c: char) {
        let mut buffer = [0u8; 4];
        self.insert_str(c.encode_utf8(&mut buffer));
    }

    pub fn insert_newline(&mut self) {
        self.insert_str("\n");
    }

    pub fn delete_backward(&mut self) {
        let (lo, hi) = self.clamped_range();
        if lo != hi {
            self.replace_range(lo, hi, "");
        } else if lo > 0 {
            self.replace_range(lo - 1, lo, "");
        }
    }

    pub fn delete_forward(&mut self) {
        let (lo, hi) = self.clamped_range();
        if lo != hi {
            self.replace_range(lo, hi, "");
        } else if hi < self.content.len_chars() {
            self.replace_range(hi, hi + 1, "");
        }
    }

    fn replace_range(&mut self, start: usize, end: usize, insert: &str) {
        let mut rope = self.content.clone();
        rope.remove(start..end);
        rope.insert(start, insert);
        let caret = start + insert.chars().count();
        self.change_text(rope.to_string());
        self.on_selection_change(Selection::caret(caret));
    }

    pub fn move_left(&mut self, extend: bool) {
        let sel = self.clamped_selection();
        if extend {
            self.on_selection_change(Selection {
                start: sel.start,
                end: sel.end.saturating_sub(1),
            });
        } else if sel.is_caret() {
            self.on_selection_change(Selection::caret(sel.end.saturating_sub(1)));
        } else {
            self.on_selection_change(Selection::caret(sel.ordered().0));
        }
    }

    pub fn move_right(&mut self, extend: bool) {
        let sel = self.clamped_selection();
        let len = self.content.len_chars();
        if extend {
            self.on_selection_change(Selection {
                start: sel.start,
                end: (sel.end + 1).min(len),
            });
        } else if sel.is_caret() {
            self.on_selection_change(Selection::caret((sel.end + 1).min(len)));
        } else {
            self.on_selection_change(Selection::caret(sel.ordered().1));
        }
    }

    pub fn move_up(&mut self, extend: bool) {
        self.move_vertically(-1, extend);
    }

    pub fn move_down(&mut self, extend: bool) {
        self.move_vertically(1, extend);
    }

    pub fn page_up(&mut self, height: usize) {
        self.move_vertically(-(height as isize), false);
    }

    pub fn page_down(&mut self, height: usize) {
        self.move_vertically(height as isize, false);
    }

    fn move_vertically(&mut self, lines: isize, extend: bool) {
        let sel = self.clamped_selection();
        let (line, col) = self.line_col(sel.end);
        let target = line.saturating_add_signed(lines);
        let end = self.index_at(target, col);
        if extend {
            self.on_selection_change(Selection {
                start: sel.start,
                end,
            });
        } else {
            self.on_selection_change(Selection::caret(end));
        }
    }

    pub fn move_line_start(&mut self, extend: bool) {
        let sel = self.clamped_selection();
        let (line, _) = self.line_col(sel.end);
        let end = self.content.line_to_char(line);
        self.set_caret_or_extend(sel, end, extend);
    }

    pub fn move_line_end(&mut self, extend: bool) {
        let sel = self.clamped_selection();
        let (line, _) = self.line_col(sel.end);
        let end = self.content.line_to_char(line) + self.line_len(line);
        self.set_caret_or_extend(sel, end, extend);
    }

    fn set_caret_or_extend(&mut self, sel: Selection, end: usize, extend: bool) {
        if extend {
            self.on_selection_change(Selection {
                start: sel.start,
                end,
            });
        } else {
            self.on_selection_change(Selection::caret(end));
        }
    }

    // ----- content geometry ----------------------------------------------

    /// Line and column of a char index, both zero-based.
    pub fn line_col(&self, char_idx: usize) -> (usize, usize) {
        let idx = char_idx.min(self.content.len_chars());
        let line = self.content.char_to_line(idx);
        (line, idx - self.content.line_to_char(line))
    }

    /// Char index closest to the given line and column.
    pub fn index_at(&self, line: usize, col: usize) -> usize {
        let line = line.min(self.content.len_lines().saturating_sub(1));
        self.content.line_to_char(line) + col.min(self.line_len(line))
    }

    pub fn line_count(&self) -> usize {
        self.content.len_lines()
    }

    /// The lines of the document as displayed, without trailing newlines.
    pub fn display_lines(&self) -> Vec<String> {
        (0..self.content.len_lines())
            .map(|i| {
                let line = self.content.line(i).to_string();
                line.trim_end_matches('\n').to_string()
            })
            .collect()
    }

    /// Chars in a line, excluding its trailing newline.
    fn line_len(&self, line: usize) -> usize {
        let slice = self.content.line(line);
        let len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    fn clamped_selection(&self) -> Selection {
        let len = self.content.len_chars();
        Selection {
            start: self.selection.start.min(len),
            end: self.selection.end.min(len),
        }
    }

    fn clamped_range(&self) -> (usize, usize) {
        self.clamped_selection().ordered()
    }
}

impl EditorAccess for MarkdownEditor {
    fn read_state(&mut self) -> EditorState {
        self.selection = Selection { start: 1, end: 1 };
        self.snapshot()
    }

    fn apply_patch(&mut self, patch: StatePatch, on_applied: impl FnOnce(&EditorState)) {
        self.request_input_focus();
        if let Some(text) = patch.text {
            self.content = Rope::from_str(&text);
        }
        if let Some(selection) = patch.selection {
            self.selection = selection;
        }
        if let Some(show_preview) = patch.show_preview {
            self.show_preview = show_preview;
        }
        on_applied(&self.snapshot());
    }
}
