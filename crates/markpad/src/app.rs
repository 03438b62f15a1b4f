use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use mdview::MarkdownStyles;

use crate::config::Config;
use crate::editor::{EditorOptions, MarkdownEditor, Selection};
use crate::formats::apply_format;
use crate::highlight::SourceHighlighter;
use crate::status::StatusLine;

/// What a click on the action bar does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarAction {
    TogglePreview,
    Format(usize),
}

/// Column range of one action-bar button, recorded during draw.
#[derive(Debug, Clone, Copy)]
pub struct ButtonHit {
    pub from: u16,
    pub to: u16,
    pub action: BarAction,
}

/// Hosts the editor widget: owns configuration, dispatches terminal
/// events into the component and tracks view-level state (scroll
/// offsets, action-bar hit regions, status line).
pub struct App {
    pub editor: MarkdownEditor,
    pub config: Config,
    pub markdown_styles: MarkdownStyles,
    pub status: StatusLine,
    pub highlighter: SourceHighlighter,
    pub file_path: Option<PathBuf>,
    pub preview_scroll: u16,
    pub input_scroll: usize,
    pub button_hits: Vec<ButtonHit>,
    pub action_bar_y: Option<u16>,
    input_height: usize,
    should_quit: bool,
}

impl App {
    pub async fn new(initial_text: Option<String>, file_path: Option<PathBuf>) -> Result<Self> {
        let config = Config::load().await?;
        let markdown_styles = config.markdown_styles();
        let highlighter = SourceHighlighter::new(&config.theme.syntax_theme);

        let mut editor = MarkdownEditor::new(EditorOptions {
            default_value: initial_text,
            show_preview: Some(config.preview.show_on_start),
            text_color: config.input_text_color(),
            on_markdown_change: Some(Box::new(|text| {
                log::trace!("markdown changed, {} chars", text.chars().count());
            })),
            ..Default::default()
        });
        editor.mount();

        Ok(Self {
            editor,
            config,
            markdown_styles,
            status: StatusLine::new(),
            highlighter,
            file_path,
            preview_scroll: 0,
            input_scroll: 0,
            button_hits: Vec::new(),
            action_bar_y: None,
            input_height: 0,
            should_quit: false,
        })
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn update_status(&mut self) {
        self.status.update();
    }

    pub async fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('q') => self.quit(),
                KeyCode::Char('p') => self.toggle_preview(),
                KeyCode::Char('e') => self.export_html().await?,
                _ => {}
            }
            return Ok(());
        }

        if key.modifiers.contains(KeyModifiers::ALT) {
            if let KeyCode::Char(c) = key.code {
                if let Some(index) = self.editor.formats().iter().position(|f| f.key == c) {
                    self.press_format(index);
                }
            }
            return Ok(());
        }

        let extend = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Char(c) => self.editor.insert_char(c),
            KeyCode::Enter => self.editor.insert_newline(),
            KeyCode::Tab => {
                let spaces = " ".repeat(self.config.editor.tab_size);
                self.editor.insert_str(&spaces);
            }
            KeyCode::Backspace => self.editor.delete_backward(),
            KeyCode::Delete => self.editor.delete_forward(),
            KeyCode::Left => self.editor.move_left(extend),
            KeyCode::Right => self.editor.move_right(extend),
            KeyCode::Up => self.editor.move_up(extend),
            KeyCode::Down => self.editor.move_down(extend),
            KeyCode::Home => self.editor.move_line_start(extend),
            KeyCode::End => self.editor.move_line_end(extend),
            KeyCode::PageUp => {
                if self.editor.show_preview() {
                    self.preview_scroll =
                        self.preview_scroll.saturating_sub(self.page_height() as u16);
                } else {
                    self.editor.page_up(self.page_height());
                }
            }
            KeyCode::PageDown => {
                if self.editor.show_preview() {
                    self.preview_scroll =
                        self.preview_scroll.saturating_add(self.page_height() as u16);
                } else {
                    self.editor.page_down(self.page_height());
                }
            }
            KeyCode::Esc => {
                // collapse any selection to a caret
                let caret = self.editor.selection().end;
                self.editor.on_selection_change(Selection::caret(caret));
            }
            _ => {}
        }
        Ok(())
    }

    pub fn handle_mouse_event(&mut self, event: MouseEvent) {
        if let MouseEventKind::Down(MouseButton::Left) = event.kind {
            if Some(event.row) == self.action_bar_y {
                let action = self
                    .button_hits
                    .iter()
                    .find(|hit| event.column >= hit.from && event.column < hit.to)
                    .map(|hit| hit.action);
                match action {
                    Some(BarAction::TogglePreview) => self.toggle_preview(),
                    Some(BarAction::Format(index)) => self.press_format(index),
                    None => {}
                }
            }
        }
    }

    pub fn toggle_preview(&mut self) {
        self.editor.toggle_preview();
        self.preview_scroll = 0;
        if self.editor.show_preview() {
            self.status.info("Preview shown");
        } else {
            self.status.info("Preview hidden");
        }
    }

    pub fn press_format(&mut self, index: usize) {
        let Some(format) = self.editor.formats().get(index).copied() else {
            return;
        };
        // capture the press-time selection; read_state resets it
        let selection = self.editor.selection();
        apply_format(&mut self.editor, selection, &format);
        self.status.success(format!("Applied {}", format.name));
    }

    async fn export_html(&mut self) -> Result<()> {
        let target = match &self.file_path {
            Some(path) => path.with_extension("html"),
            None => PathBuf::from("untitled.html"),
        };
        let html = mdview::to_html(&self.editor.text());
        match tokio::fs::write(&target, html).await {
            Ok(()) => {
                log::info!("Exported preview HTML to {}", target.display());
                self.status.success(format!("Exported {}", target.display()));
            }
            Err(e) => {
                log::error!("Failed to export {}: {}", target.display(), e);
                self.status.error(format!("Export failed: {}", e));
            }
        }
        Ok(())
    }

    /// Called by the draw layer with the input surface height; keeps
    /// the caret line inside the visible window.
    pub fn sync_input_viewport(&mut self, height: usize) {
        self.input_height = height.max(1);
        let (line, _) = self.editor.line_col(self.editor.selection().end);
        if line < self.input_scroll {
            self.input_scroll = line;
        } else if line >= self.input_scroll + self.input_height {
            self.input_scroll = line + 1 - self.input_height;
        }
    }

    fn page_height(&self) -> usize {
        self.input_height.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn key_with(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[tokio::test]
    async fn test_app_creation() {
        let app = App::new(None, None).await.unwrap();
        assert_eq!(app.editor.text(), "");
        assert!(!app.should_quit());
        // the widget is mounted, so the input already holds focus
        assert!(app.editor.is_input_focused());
    }

    #[tokio::test]
    async fn test_app_seeds_initial_text() {
        let app = App::new(Some("# seeded".to_string()), None).await.unwrap();
        assert_eq!(app.editor.text(), "# seeded");
    }

    #[tokio::test]
    async fn test_typing_flows_into_the_editor() {
        let mut app = App::new(None, None).await.unwrap();
        app.handle_key_event(key(KeyCode::Char('h'))).await.unwrap();
        app.handle_key_event(key(KeyCode::Char('i'))).await.unwrap();
        app.handle_key_event(key(KeyCode::Enter)).await.unwrap();
        assert_eq!(app.editor.text(), "hi\n");

        app.handle_key_event(key(KeyCode::Backspace)).await.unwrap();
        assert_eq!(app.editor.text(), "hi");
    }

    #[tokio::test]
    async fn test_ctrl_q_quits() {
        let mut app = App::new(None, None).await.unwrap();
        app.handle_key_event(key_with(KeyCode::Char('q'), KeyModifiers::CONTROL))
            .await
            .unwrap();
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn test_ctrl_p_toggles_preview() {
        let mut app = App::new(None, None).await.unwrap();
        let toggle = key_with(KeyCode::Char('p'), KeyModifiers::CONTROL);

        assert!(!app.editor.show_preview());
        app.handle_key_event(toggle).await.unwrap();
        assert!(app.editor.show_preview());
        app.handle_key_event(toggle).await.unwrap();
        assert!(!app.editor.show_preview());
    }

    #[tokio::test]
    async fn test_alt_key_presses_format_button() {
        let mut app = App::new(Some("pick me".to_string()), None).await.unwrap();
        app.editor
            .on_selection_change(Selection { start: 0, end: 4 });

        app.handle_key_event(key_with(KeyCode::Char('b'), KeyModifiers::ALT))
            .await
            .unwrap();
        assert_eq!(app.editor.text(), "**pick** me");
        assert!(app.status.current().is_some());
    }

    #[tokio::test]
    async fn test_unknown_alt_key_is_ignored() {
        let mut app = App::new(Some("text".to_string()), None).await.unwrap();
        app.handle_key_event(key_with(KeyCode::Char('z'), KeyModifiers::ALT))
            .await
            .unwrap();
        assert_eq!(app.editor.text(), "text");
    }

    #[tokio::test]
    async fn test_escape_collapses_selection() {
        let mut app = App::new(Some("abcdef".to_string()), None).await.unwrap();
        app.editor
            .on_selection_change(Selection { start: 1, end: 4 });

        app.handle_key_event(key(KeyCode::Esc)).await.unwrap();
        assert_eq!(app.editor.selection(), Selection::caret(4));
    }

    #[tokio::test]
    async fn test_shift_arrow_selects() {
        let mut app = App::new(Some("abc".to_string()), None).await.unwrap();
        app.editor.on_selection_change(Selection::caret(0));

        let shift_right = key_with(KeyCode::Right, KeyModifiers::SHIFT);
        app.handle_key_event(shift_right).await.unwrap();
        app.handle_key_event(shift_right).await.unwrap();
        assert_eq!(app.editor.selection(), Selection { start: 0, end: 2 });
    }

    #[tokio::test]
    async fn test_mouse_click_on_action_bar() {
        let mut app = App::new(None, None).await.unwrap();
        app.action_bar_y = Some(10);
        app.button_hits = vec![
            ButtonHit {
                from: 0,
                to: 3,
                action: BarAction::TogglePreview,
            },
            ButtonHit {
                from: 4,
                to: 7,
                action: BarAction::Format(0),
            },
        ];

        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 1,
            row: 10,
            modifiers: KeyModifiers::NONE,
        };
        app.handle_mouse_event(click);
        assert!(app.editor.show_preview());

        // a click outside every button changes nothing
        let miss = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 40,
            row: 10,
            modifiers: KeyModifiers::NONE,
        };
        app.handle_mouse_event(miss);
        assert!(app.editor.show_preview());
    }

    #[tokio::test]
    async fn test_viewport_follows_caret() {
        let text = (0..50).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let mut app = App::new(Some(text), None).await.unwrap();

        let end = app.editor.len_chars();
        app.editor.on_selection_change(Selection::caret(end));
        app.sync_input_viewport(10);
        assert_eq!(app.input_scroll, 40);

        app.editor.on_selection_change(Selection::caret(0));
        app.sync_input_viewport(10);
        assert_eq!(app.input_scroll, 0);
    }

    #[tokio::test]
    async fn test_page_keys_scroll_preview_when_shown() {
        let mut app = App::new(Some("body".to_string()), None).await.unwrap();
        app.sync_input_viewport(10);
        app.toggle_preview();

        app.handle_key_event(key(KeyCode::PageDown)).await.unwrap();
        assert_eq!(app.preview_scroll, 10);
        app.handle_key_event(key(KeyCode::PageUp)).await.unwrap();
        assert_eq!(app.preview_scroll, 0);

        // toggling resets the scroll offset
        app.handle_key_event(key(KeyCode::PageDown)).await.unwrap();
        app.toggle_preview();
        app.toggle_preview();
        assert_eq!(app.preview_scroll, 0);
    }
}
