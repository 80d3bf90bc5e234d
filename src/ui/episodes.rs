use crate::app::App;
use crate::render;
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use super::centered_rect;

pub fn render(app: &App, frame: &mut Frame) {
    let Some(item) = app.detail_item() else {
        return;
    };

    let area = centered_rect(60, 60, frame.area());
    frame.render_widget(Clear, area);

    let rows = render::episodes(item);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(format!(" Episodes: {} ", render::series_heading(item)))
        .title_bottom(
            Line::from(format!(" {} episodes  Enter open  y copy  Esc back ", rows.len()))
                .alignment(Alignment::Right),
        );

    if rows.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No episodes listed.",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = rows
        .into_iter()
        .map(|row| {
            let url_style = if row.url == render::INERT_LINK {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<12}", row.label), Style::default().fg(Color::White)),
                Span::styled(row.url, url_style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    let mut state = ListState::default();
    state.select(Some(app.episode_selected));
    frame.render_stateful_widget(list, area, &mut state);
}
