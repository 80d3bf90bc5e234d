use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub fn render(frame: &mut Frame) {
    let area = centered_rect(70, 70, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let section = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let key = Style::default().fg(Color::Yellow);
    let entry = |k: &'static str, text: &'static str| {
        Line::from(vec![Span::styled(k, key), Span::raw(text)])
    };

    let help_text = vec![
        Line::from(""),
        Line::from(Span::styled("  Global", section)),
        entry("    ?         ", "Toggle this help"),
        entry("    q         ", "Quit (close modal when one is open)"),
        entry("    Ctrl+C    ", "Quit immediately"),
        Line::from(""),
        Line::from(Span::styled("  Catalog", section)),
        entry("    Tab/S-Tab ", "Cycle focus: genres, latest, grid, pages"),
        entry("    ←↓↑→/hjkl ", "Move within the focused region"),
        entry("    Enter     ", "Apply genre / open item detail / press page button"),
        entry("    /         ", "Search titles, descriptions and genres"),
        entry("    Esc       ", "Clear the search"),
        entry("    n/p       ", "Next/previous page (also PgDn/PgUp)"),
        entry("    g/G       ", "First/last page"),
        entry("    1-9       ", "Go to page number"),
        entry("    L         ", "Collapse or expand the Latest panel"),
        entry("    i         ", "Import an item from a JSON file"),
        Line::from(""),
        Line::from(Span::styled("  Detail", section)),
        entry("    Enter     ", "View episodes (series) / open Telegram link"),
        entry("    w         ", "Open watch-online link (movies)"),
        entry("    y         ", "Copy link to clipboard"),
        entry("    Esc       ", "Close"),
        Line::from(""),
        Line::from(Span::styled("  Episodes", section)),
        entry("    ↑/↓       ", "Select episode"),
        entry("    Enter     ", "Open episode link"),
        entry("    y         ", "Copy episode link"),
        entry("    Esc       ", "Back to detail"),
        Line::from(""),
    ];

    let help = Paragraph::new(help_text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help — Keybindings ")
                .title_bottom(Line::from(" Press ? or Esc to close ").style(Style::default().fg(Color::DarkGray))),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(help, area);
}

/// Create a centered rectangle using percentage of parent area.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
