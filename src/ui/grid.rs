use crate::app::{App, Focus, InputMode};
use crate::controls::{ALL_LABEL, ControlBar};
use crate::filter;
use crate::render::{self, Card};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use super::truncate_str;

/// Height of one card cell, borders included.
pub const CARD_HEIGHT: u16 = 5;

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();
    let latest_height = match (app.latest_visible(), app.latest_open) {
        (false, _) => 0,
        (true, false) => 1,
        (true, true) => CARD_HEIGHT + 2,
    };

    // Layout: header(3) + search(3) + genres(3) + latest(?) + grid(min) + pages(3) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(latest_height),
            Constraint::Min(CARD_HEIGHT),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(app, frame, chunks[0]);
    render_search(app, frame, chunks[1]);
    render_genres(app, frame, chunks[2]);
    if app.latest_visible() {
        render_latest(app, frame, chunks[3]);
    }
    render_grid(app, frame, chunks[4]);
    render_pages(app, frame, chunks[5]);
    render_status(app, frame, chunks[6]);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " Catalog Explorer",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("   [{} shown]   ", app.pager.total_items()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Movies: {}", app.counters.movies),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw("  "),
        Span::styled(
            format!("Webseries: {}", app.counters.series),
            Style::default().fg(Color::Magenta),
        ),
    ]))
    .alignment(Alignment::Left)
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(header, area);
}

fn render_search(app: &App, frame: &mut Frame, area: Rect) {
    let (label, value, title) = match app.input_mode {
        InputMode::Search => (
            " 🔍 Search (Enter to apply, Esc to cancel): ",
            app.query.as_str(),
            " Search ",
        ),
        InputMode::Import => (
            " 📂 Item JSON file (Enter to add, Esc to cancel): ",
            app.import_buffer.as_str(),
            " Import ",
        ),
        InputMode::Normal => (" 🔍 Search (/): ", app.query.as_str(), " Search "),
    };
    let style = match app.input_mode {
        InputMode::Normal => Style::default().fg(Color::DarkGray),
        _ => Style::default().fg(Color::Yellow),
    };

    let bar = Paragraph::new(format!("{}{}", label, value))
        .style(style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(style)
                .title(title),
        );
    frame.render_widget(bar, area);

    if app.input_mode != InputMode::Normal {
        let cursor_x = area.x + 1 + (label.width() + value.width()) as u16;
        frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

/// One line of bracketed controls, scrolled so that `focus` stays in view.
fn control_line<A: Clone>(
    bar: &ControlBar<A>,
    focus: usize,
    show_cursor: bool,
    special: impl Fn(&str) -> bool,
    width: u16,
) -> (Line<'static>, u16) {
    let mut spans = Vec::new();
    let mut offset = 0usize;
    let mut focus_end = 0usize;

    for (i, control) in bar.controls().iter().enumerate() {
        let text = format!(" {} ", control.label);
        let mut style = if control.active {
            Style::default().bg(Color::Cyan).fg(Color::Black).add_modifier(Modifier::BOLD)
        } else if special(&control.label) {
            Style::default().fg(Color::Magenta)
        } else {
            Style::default().fg(Color::White)
        };
        if show_cursor && i == focus {
            style = style.add_modifier(Modifier::UNDERLINED | Modifier::REVERSED);
        }
        offset += text.width();
        if i == focus {
            focus_end = offset;
        }
        spans.push(Span::styled(text, style));
        spans.push(Span::raw(" "));
        offset += 1;
    }

    let scroll = focus_end.saturating_sub(width as usize) as u16;
    (Line::from(spans), scroll)
}

fn render_genres(app: &App, frame: &mut Frame, area: Rect) {
    let focused = app.focus == Focus::Genres && app.input_mode == InputMode::Normal;
    let (line, scroll) = control_line(
        &app.genre_bar,
        app.genre_bar.cursor(),
        focused,
        filter::is_year_tag,
        area.width.saturating_sub(2),
    );
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    let genres = Paragraph::new(line).scroll((0, scroll)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(format!(" Genres: {} ", app.genre_bar.active_label().unwrap_or(ALL_LABEL))),
    );
    frame.render_widget(genres, area);
}

fn render_card(frame: &mut Frame, area: Rect, card: &Card, selected: bool) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let border = if selected {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let lines = vec![
        Line::from(Span::styled(
            truncate_str(&card.title, inner_width),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            truncate_str(&card.meta, inner_width),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(Span::styled(
            truncate_str(&card.poster, inner_width),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border),
    );
    frame.render_widget(widget, area);
}

/// Draw `indices` as one row of `columns` equal cells.
fn render_card_row(
    app: &App,
    frame: &mut Frame,
    area: Rect,
    indices: &[usize],
    columns: usize,
    selected: Option<usize>,
) {
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
        .split(area);
    for (cell, (pos, &index)) in cells.iter().zip(indices.iter().enumerate()) {
        if let Some(item) = app.catalog.get(index) {
            render_card(frame, *cell, &render::card(item), selected == Some(pos));
        }
    }
}

fn message(text: &str, color: Color) -> Paragraph<'_> {
    Paragraph::new(Line::from(Span::styled(text, Style::default().fg(color))))
}

fn render_latest(app: &App, frame: &mut Frame, area: Rect) {
    let focused = app.focus == Focus::Latest;
    let marker = if app.latest_open { "▾" } else { "▸" };
    let title = format!(" {} Latest {} (L) ", marker, app.year);

    if !app.latest_open {
        let header = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(title);
        frame.render_widget(header, area);
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { Color::Cyan } else { Color::DarkGray }))
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // The catalog region carries the load error.
    if app.load_error.is_some() {
        return;
    }
    if app.latest.is_empty() {
        frame.render_widget(message(render::NO_RESULTS, Color::DarkGray), inner);
        return;
    }

    let columns = app.grid_columns.max(1);
    let first = app.latest_selected.saturating_sub(columns - 1);
    let end = (first + columns).min(app.latest.len());
    let selected = focused.then(|| app.latest_selected - first);
    render_card_row(app, frame, inner, &app.latest[first..end], columns, selected);
}

fn render_grid(app: &App, frame: &mut Frame, area: Rect) {
    let focused = app.focus == Focus::Grid;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { Color::Cyan } else { Color::DarkGray }))
        .title(" Catalog ")
        .title_bottom(Line::from(app.pager.range_label()).alignment(Alignment::Right));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(ref err) = app.load_error {
        frame.render_widget(message(err, Color::Red), inner);
        return;
    }
    let page = app.page_items();
    if page.is_empty() {
        frame.render_widget(message(render::NO_RESULTS, Color::DarkGray), inner);
        return;
    }

    let columns = app.grid_columns.max(1);
    let visible_rows = (inner.height / CARD_HEIGHT).max(1) as usize;
    let selected_row = app.grid_selected / columns;
    let first_row = selected_row.saturating_sub(visible_rows - 1);

    for (slot, row) in page.chunks(columns).skip(first_row).take(visible_rows).enumerate() {
        let y = inner.y + slot as u16 * CARD_HEIGHT;
        if y + CARD_HEIGHT > inner.bottom() {
            break;
        }
        let row_area = Rect::new(inner.x, y, inner.width, CARD_HEIGHT);
        let row_start = (first_row + slot) * columns;
        let selected = if focused && (row_start..row_start + row.len()).contains(&app.grid_selected) {
            Some(app.grid_selected - row_start)
        } else {
            None
        };
        render_card_row(app, frame, row_area, row, columns, selected);
    }
}

fn render_pages(app: &App, frame: &mut Frame, area: Rect) {
    let focused = app.focus == Focus::Pages && app.input_mode == InputMode::Normal;
    let focus = if focused {
        app.page_bar.cursor()
    } else {
        app.page_bar.active_index().unwrap_or(0)
    };
    let (line, scroll) = control_line(
        &app.page_bar,
        focus,
        focused,
        |_| false,
        area.width.saturating_sub(2),
    );
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    let pages = Paragraph::new(line).scroll((0, scroll)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(format!(" Page {}/{} ", app.pager.page(), app.pager.total_pages())),
    );
    frame.render_widget(pages, area);
}

fn render_status(app: &App, frame: &mut Frame, area: Rect) {
    let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let status_line = Line::from(vec![
        Span::styled(" Tab", key),
        Span::raw(" Focus  "),
        Span::styled("/", key),
        Span::raw(" Search  "),
        Span::styled("Enter", key),
        Span::raw(" Open  "),
        Span::styled("n/p", key),
        Span::raw(" Page  "),
        Span::styled("i", key),
        Span::raw(" Import  "),
        Span::styled("?", key),
        Span::raw(" Help  "),
        Span::styled("q", key),
        Span::raw(" Quit  "),
        Span::styled(&app.status_msg, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(status_line), area);
}
