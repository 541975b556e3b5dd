use super::app::App;
use super::helpers::{button_colors, highlight_functions, wrap_text};
use crate::render_help::render_help;
use anyhow::Result;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use scicalc::format::{format_number, format_with_spaces};
use scicalc::keypad::{button_kind, BUTTON_LABELS, COLUMNS};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

const MIN_TERMINAL_WIDTH: u16 = 60;
const MIN_TERMINAL_HEIGHT: u16 = 24;

pub fn run_ui_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| {
            if app.show_help {
                render_help(f, app.help_scroll);
            } else {
                ui(f, app);
            }
        })?;

        if app.should_quit {
            break;
        }

        if crossterm::event::poll(Duration::from_millis(50))? {
            match crossterm::event::read()? {
                Event::Key(KeyEvent { code, modifiers, kind, .. }) if kind == KeyEventKind::Press => {
                    handle_key_event(app, code, modifiers);
                }
                Event::Mouse(event) => {
                    handle_mouse_event(app, event);
                }
                _ => {}
            }
        }
    }
    Ok(())
}

fn handle_key_event(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    if modifiers.contains(KeyModifiers::CONTROL) {
        match code {
            KeyCode::Char('c') | KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Char('l') => app.clear_history(),
            _ => {}
        }
        return;
    }

    if app.show_help {
        match code {
            KeyCode::Down => app.help_scroll = app.help_scroll.saturating_add(1),
            KeyCode::Up => app.help_scroll = app.help_scroll.saturating_sub(1),
            KeyCode::PageDown => app.help_scroll = app.help_scroll.saturating_add(10),
            KeyCode::PageUp => app.help_scroll = app.help_scroll.saturating_sub(10),
            KeyCode::Esc | KeyCode::F(1) => {
                app.show_help = false;
                app.help_scroll = 0;
            }
            _ => {}
        }
        return;
    }

    match code {
        KeyCode::Enter | KeyCode::Char('=') => app.press("="),
        KeyCode::Esc => app.press("AC"),
        KeyCode::Char(c) if !c.is_whitespace() => app.keypad.append(c.encode_utf8(&mut [0; 4])),
        KeyCode::Backspace => app.keypad.backspace(),
        KeyCode::Up => app.navigate_history(-1),
        KeyCode::Down => app.navigate_history(1),
        KeyCode::F(1) => {
            app.show_help = true;
            app.help_scroll = 0;
        }
        KeyCode::F(2) => app.toggle_details(),
        _ => {}
    }
}

fn handle_mouse_event(app: &mut App, event: MouseEvent) {
    if app.show_help {
        match event.kind {
            MouseEventKind::ScrollDown => app.help_scroll = app.help_scroll.saturating_add(3),
            MouseEventKind::ScrollUp => app.help_scroll = app.help_scroll.saturating_sub(3),
            _ => {}
        }
        return;
    }

    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            app.pressed = app.button_at(event.column, event.row);
            if let Some(index) = app.pressed {
                app.press_button(index);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => app.pressed = None,
        MouseEventKind::Moved | MouseEventKind::Drag(MouseButton::Left) => {
            app.hovered = app.button_at(event.column, event.row);
        }
        MouseEventKind::ScrollDown => app.history_scroll = app.history_scroll.saturating_add(3),
        MouseEventKind::ScrollUp => app.history_scroll = app.history_scroll.saturating_sub(3),
        _ => {}
    }
}

fn ui(frame: &mut Frame, app: &mut App) {
    let terminal_size = frame.size();

    app.terminal_too_small = terminal_size.width < MIN_TERMINAL_WIDTH
        || terminal_size.height < MIN_TERMINAL_HEIGHT;

    if app.terminal_too_small {
        app.button_areas.clear();
        render_resize_message(frame, terminal_size);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Min(3), Constraint::Length(1)])
        .split(terminal_size);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[0]);

    let calculator = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(5), Constraint::Min(6)])
        .split(columns[0]);

    render_display(frame, app, calculator[0]);
    render_keypad(frame, app, calculator[1]);
    render_history(frame, app, columns[1]);
    render_status(frame, app, rows[1]);
}

fn render_resize_message(frame: &mut Frame, area: Rect) {
    let message = format!(
        "Terminal too small! Min size: {}x{}. Current: {}x{}",
        MIN_TERMINAL_WIDTH, MIN_TERMINAL_HEIGHT, area.width, area.height
    );

    let text = vec![
        Line::from(Span::styled(
            message,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Please resize your terminal window",
            Style::default().fg(Color::Yellow),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Resize Required ")
        .title_alignment(Alignment::Center);

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn render_display(frame: &mut Frame, app: &App, area: Rect) {
    let title = if app.detailed_mode { " Display (details) " } else { " Display " };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title)
        .title_alignment(Alignment::Center)
        .style(Style::default().bg(Color::Rgb(80, 80, 80)));

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let text = app.keypad.display();
    let text_style = if app.keypad.is_error() {
        Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };

    // Keep the end of a long expression in view.
    let visible_width = inner_area.width.saturating_sub(1) as usize;
    let mut visible = text;
    while visible.width() > visible_width {
        let mut chars = visible.chars();
        chars.next();
        visible = chars.as_str();
    }

    let detail = match app.keypad.last_error() {
        Some(e) => Line::from(Span::styled(e.to_string(), Style::default().fg(Color::Gray))),
        None => Line::from(""),
    };

    let paragraph = Paragraph::new(vec![Line::from(Span::styled(visible, text_style)), detail])
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, inner_area);

    if !app.keypad.is_error() && inner_area.width > 0 {
        let text_width = visible.width() as u16;
        let start = inner_area.x + inner_area.width.saturating_sub(text_width) / 2;
        frame.set_cursor((start + text_width).min(inner_area.right().saturating_sub(1)), inner_area.y);
    }
}

fn render_keypad(frame: &mut Frame, app: &mut App, area: Rect) {
    let row_count = (BUTTON_LABELS.len() / COLUMNS) as u32;
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, row_count); row_count as usize])
        .split(area);

    app.button_areas.clear();
    for row_area in row_areas.iter() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, COLUMNS as u32); COLUMNS])
            .split(*row_area);
        app.button_areas.extend(cells.iter().copied());
    }

    for (index, (label, cell)) in BUTTON_LABELS.iter().zip(app.button_areas.iter()).enumerate() {
        let (normal, hovered, pressed) = button_colors(button_kind(label));
        let background = if app.pressed == Some(index) {
            pressed
        } else if app.hovered == Some(index) {
            hovered
        } else {
            normal
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Black))
            .style(Style::default().bg(background));

        let inner_height = cell.height.saturating_sub(2);
        let mut lines = vec![Line::from(""); (inner_height.saturating_sub(1) / 2) as usize];
        lines.push(Line::from(Span::styled(
            *label,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )));

        let paragraph = Paragraph::new(lines).block(block).alignment(Alignment::Center);
        frame.render_widget(paragraph, *cell);
    }
}

fn render_history(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" History ")
        .title_alignment(Alignment::Center);

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    if app.history.is_empty() {
        let empty_msg = Paragraph::new("No calculations yet. Press = to see results here.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(empty_msg, inner_area);
        return;
    }

    let mut items = Vec::new();
    let mut item_start_indices = Vec::with_capacity(app.history.len());
    let wrap_width = inner_area.width.saturating_sub(4) as usize;

    for (i, entry) in app.history.iter().enumerate() {
        item_start_indices.push(items.len());

        let is_selected = i == app.cursor_history;
        let base_style = Style::default().fg(if is_selected { Color::Yellow } else { Color::Cyan });

        let input = format_with_spaces(&entry.input);
        let input_lines = wrap_text(&input, wrap_width);

        for (line_idx, line) in input_lines.into_iter().enumerate() {
            let prefix = if line_idx == 0 { "> " } else { "  " };
            let mut spans = vec![Span::styled(prefix, Style::default().fg(Color::Green))];
            spans.extend(highlight_functions(&line, base_style));
            items.push(ListItem::new(Line::from(spans)));
        }

        let result_span = match &entry.result {
            Ok(val) => Span::styled(
                format_number(*val),
                Style::default().fg(Color::LightMagenta).add_modifier(Modifier::BOLD),
            ),
            Err(e) => Span::styled(
                format!("Error: {}", e),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
        };
        items.push(ListItem::new(Line::from(vec![
            Span::styled("  = ", Style::default().fg(Color::Gray)),
            result_span,
        ])));

        if entry.detailed_mode {
            for (j, step) in entry.detailed_steps.iter().enumerate() {
                let step_text = format!(
                    "Step {}: {} = {}",
                    j + 1,
                    format_with_spaces(&step.operation),
                    format_number(step.result)
                );
                for (step_idx, line) in wrap_text(&step_text, wrap_width).into_iter().enumerate() {
                    let prefix = if step_idx == 0 { "    - " } else { "      " };
                    items.push(ListItem::new(Line::from(Span::styled(
                        format!("{}{}", prefix, line),
                        Style::default().fg(Color::DarkGray),
                    ))));
                }
            }

            items.push(ListItem::new(Line::from(Span::styled(
                format!("    - Time: {:.6} ms", entry.duration.as_secs_f64() * 1000.0),
                Style::default().fg(Color::Magenta),
            ))));
        }

        if i < app.history.len() - 1 {
            items.push(ListItem::new(Line::from(Span::styled(
                "-".repeat(inner_area.width as usize),
                Style::default().fg(Color::DarkGray),
            ))));
        }
    }

    if app.scroll_to_bottom {
        app.history_scroll = items.len().saturating_sub(inner_area.height as usize);
        app.scroll_to_bottom = false;
    }
    app.history_scroll = app.history_scroll.min(items.len().saturating_sub(1));

    let selected_index = item_start_indices.get(app.cursor_history).copied();

    let list = List::new(items)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    let mut state = ListState::default()
        .with_selected(selected_index)
        .with_offset(app.history_scroll);

    frame.render_stateful_widget(list, inner_area, &mut state);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let details = if app.detailed_mode { "Details on" } else { "Details off" };
    let keys = [
        ("Enter/=", "Calculate"),
        ("Esc", "AC"),
        ("Up/Down", "History"),
        ("F1", "Help"),
        ("F2", details),
        ("Ctrl+Q", "Quit"),
    ];

    let spans: Vec<Span> = keys
        .iter()
        .flat_map(|(key, desc)| {
            vec![
                Span::styled(
                    *key,
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!(" {} ", desc), Style::default().fg(Color::DarkGray)),
            ]
        })
        .collect();

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
