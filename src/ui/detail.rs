use crate::app::App;
use crate::render::PrimaryAction;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::centered_rect;

pub fn render(app: &App, frame: &mut Frame) {
    let detail = match app.detail() {
        Some(d) => d,
        None => return,
    };

    let area = centered_rect(75, 80, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", detail.title))
        .title_bottom(Line::from(" Esc to close ").style(Style::default().fg(Color::DarkGray)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Layout: metadata(5) + description(min) + actions(3)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(inner);

    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::White);

    // ── Metadata ──
    let meta_lines = vec![
        Line::from(vec![
            Span::styled(" Rating: ", label),
            Span::styled(
                detail.rating.as_str(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
            Span::styled("Released: ", label),
            Span::styled(detail.release.as_str(), value),
            Span::raw("   "),
            Span::styled("Length: ", label),
            Span::styled(detail.length.as_str(), value),
        ]),
        Line::from(vec![
            Span::styled(" Genres: ", label),
            Span::styled(detail.genres.as_str(), Style::default().fg(Color::Magenta)),
        ]),
        Line::from(vec![
            Span::styled(" Language: ", label),
            Span::styled(detail.language.as_str(), value),
        ]),
        Line::from(vec![
            Span::styled(" Poster: ", label),
            Span::styled(detail.poster.as_str(), Style::default().fg(Color::Blue)),
        ]),
    ];
    frame.render_widget(Paragraph::new(meta_lines), chunks[0]);

    // ── Description ──
    let description = Paragraph::new(detail.description.as_str())
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Description "),
        );
    frame.render_widget(description, chunks[1]);

    // ── Actions ──
    let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let link = Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED);
    let mut actions = vec![Span::styled(" Enter ", key), Span::raw(detail.primary.label().to_string())];
    if let PrimaryAction::Open(ref primary) = detail.primary {
        actions.push(Span::raw("  "));
        actions.push(Span::styled(primary.url.clone(), link));
        actions.push(Span::raw("   "));
        actions.push(Span::styled("y", key));
        actions.push(Span::raw(" Copy"));
    }
    let mut lines = vec![Line::from(actions)];
    if let Some(ref watch) = detail.watch_online {
        lines.push(Line::from(vec![
            Span::styled(" w ", key),
            Span::raw(watch.label.clone()),
            Span::raw("  "),
            Span::styled(watch.url.clone(), link),
        ]));
    }
    let actions = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(actions, chunks[2]);
}
