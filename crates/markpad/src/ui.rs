use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, BarAction, ButtonHit};
use crate::editor::PreviewStyle;
use crate::formats::{render_format_buttons, PREVIEW_TOGGLE_LABEL};
use crate::status::Severity;
use crate::text_width;

pub fn draw(f: &mut Frame, app: &mut App) {
    let mut constraints = vec![
        Constraint::Length(1), // Title bar
        Constraint::Min(0),    // Input surface
    ];
    if app.editor.show_preview() {
        // Preview below the input, a third of the screen
        constraints.push(Constraint::Percentage(33));
    }
    constraints.push(Constraint::Length(1)); // Action bar
    constraints.push(Constraint::Length(2)); // Status bar

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.size());

    draw_title_bar(f, app, chunks[0]);
    draw_input(f, app, chunks[1]);

    let mut next = 2;
    if app.editor.show_preview() {
        draw_preview(f, app, chunks[2]);
        next = 3;
    }
    draw_action_bar(f, app, chunks[next]);
    draw_status_bar(f, app, chunks[next + 1]);
}

fn draw_title_bar(f: &mut Frame, app: &App, area: Rect) {
    let title = match &app.file_path {
        Some(path) => format!("  Markpad -- {}", path.display()),
        None => String::from("  Markpad -- [Scratch]"),
    };

    let title_bar = Paragraph::new(title)
        .style(Style::default().bg(Color::Blue).fg(Color::White))
        .alignment(Alignment::Left);

    f.render_widget(title_bar, area);
}

fn draw_input(f: &mut Frame, app: &mut App, area: Rect) {
    let accent = app.config.accent();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent));
    let inner = block.inner(area);
    f.render_widget(block, area);

    app.sync_input_viewport(inner.height as usize);

    if app.editor.is_empty() {
        let placeholder = Paragraph::new(app.config.editor.placeholder.clone()).style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        );
        f.render_widget(placeholder, inner);
        if app.editor.is_input_focused() {
            f.set_cursor(inner.x, inner.y);
        }
        return;
    }

    let display = app.editor.display_lines();
    let text_color = app.editor.text_color();
    let lines: Vec<Line> = if app.config.editor.highlight_source && text_color.is_none() {
        app.highlighter.highlight(&display)
    } else {
        let style = match text_color {
            Some(color) => Style::default().fg(color),
            None => Style::default(),
        };
        display
            .iter()
            .map(|line| Line::from(Span::styled(line.clone(), style)))
            .collect()
    };

    let content = Paragraph::new(lines).scroll((app.input_scroll as u16, 0));
    f.render_widget(content, inner);

    if app.editor.is_input_focused() {
        let caret = app.editor.selection().end;
        let (line, col) = app.editor.line_col(caret);
        if line >= app.input_scroll && line < app.input_scroll + inner.height as usize {
            let empty = String::new();
            let line_text = display.get(line).unwrap_or(&empty);
            let x = inner.x + (text_width::col_at_char(line_text, col) as u16).min(
                inner.width.saturating_sub(1),
            );
            let y = inner.y + (line - app.input_scroll) as u16;
            f.set_cursor(x, y);
        }
    }
}

fn draw_preview(f: &mut Frame, app: &App, area: Rect) {
    let base = PreviewStyle {
        border_color: Some(app.config.accent()),
        background: None,
    };
    let effective = app
        .editor
        .preview_style()
        .unwrap_or_default()
        .merged_over(base);

    let border_color = effective.border_color.unwrap_or_else(|| app.config.accent());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Preview ");

    let mut paragraph = Paragraph::new(app.editor.preview_content(&app.markdown_styles))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.preview_scroll, 0));
    if let Some(background) = effective.background {
        paragraph = paragraph.style(Style::default().bg(background));
    }

    f.render_widget(paragraph, area);
}

fn draw_action_bar(f: &mut Frame, app: &mut App, area: Rect) {
    let accent = app.config.accent();

    let mut toggle_style = Style::default().fg(accent).add_modifier(Modifier::BOLD);
    if app.editor.show_preview() {
        toggle_style = toggle_style.add_modifier(Modifier::REVERSED);
    }

    let buttons = render_format_buttons(
        app.editor.formats(),
        app.editor.markdown_button(),
        accent,
    );

    let mut spans: Vec<Span> = Vec::new();
    let mut hits: Vec<ButtonHit> = Vec::new();
    let mut x = area.x;

    let toggle_width = text_width::str_width(PREVIEW_TOGGLE_LABEL) as u16;
    hits.push(ButtonHit {
        from: x,
        to: x + toggle_width,
        action: BarAction::TogglePreview,
    });
    spans.push(Span::styled(PREVIEW_TOGGLE_LABEL, toggle_style));
    x += toggle_width;

    spans.push(Span::styled("\u{2502}", Style::default().fg(Color::DarkGray)));
    x += 1;

    for (index, button) in buttons.into_iter().enumerate() {
        let width = text_width::str_width(button.content.as_ref()) as u16;
        hits.push(ButtonHit {
            from: x,
            to: x + width,
            action: BarAction::Format(index),
        });
        spans.push(button);
        x += width;
        spans.push(Span::raw(" "));
        x += 1;
    }

    app.button_hits = hits;
    app.action_bar_y = Some(area.y);

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Shortcuts
            Constraint::Length(1), // Status message
        ])
        .split(area);

    let key = |text: &'static str| {
        Span::styled(
            text,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )
    };
    let shortcuts = vec![
        key("^P"),
        Span::raw(" Preview  "),
        key("^E"),
        Span::raw(" Export  "),
        key("^Q"),
        Span::raw(" Quit  "),
        key("Alt+key"),
        Span::raw(" Format  "),
        key("Shift+arrows"),
        Span::raw(" Select"),
    ];
    let shortcut_bar =
        Paragraph::new(Line::from(shortcuts)).style(Style::default().bg(Color::DarkGray));
    f.render_widget(shortcut_bar, chunks[0]);

    if let Some((message, severity)) = app.status.current() {
        let color = match severity {
            Severity::Info => Color::Cyan,
            Severity::Success => Color::Green,
            Severity::Warning => Color::Yellow,
            Severity::Error => Color::Red,
        };
        let status =
            Paragraph::new(message.to_string()).style(Style::default().fg(color));
        f.render_widget(status, chunks[1]);
    }
}
