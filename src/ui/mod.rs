mod detail;
mod episodes;
mod grid;
mod help;

use crate::app::{App, View};
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use help::centered_rect;

/// Top-level render dispatch. Modals draw over the grid.
pub fn render(app: &App, frame: &mut Frame) {
    grid::render(app, frame);

    match app.view {
        View::Grid => {}
        View::Detail => detail::render(app, frame),
        View::Episodes => {
            detail::render(app, frame);
            episodes::render(app, frame);
        }
    }

    // Render help overlay on top if active
    if app.show_help {
        help::render(frame);
    }
}

/// Truncate a string to `max_width` display columns, adding "…" if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        result.push(c);
        used += w;
    }
    result.push('…');
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Item;
    use crate::render::DEFAULT_WATCH_FALLBACK;
    use ratatui::{Terminal, backend::TestBackend};

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 48)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn sample_app() -> App {
        let mut app = App::new(DEFAULT_WATCH_FALLBACK.to_string());
        app.update_grid_columns(120);
        app.finish_load(Ok(vec![
            Item {
                title: Some("Sacred Games".to_string()),
                kind: Some("series".to_string()),
                episode_links: vec![Some("https://t.me/ep1".to_string())],
                ..Default::default()
            },
            Item {
                title: Some("Andhadhun".to_string()),
                release_date: Some("2018-10-05".to_string()),
                rating: Some("8.2".to_string()),
                genres: vec!["Thriller".to_string()],
                ..Default::default()
            },
        ]));
        app
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("abcdefghij", 5), "abcd…");
        assert_eq!(truncate_str("日本語タイトル", 5), "日本…");
    }

    #[test]
    fn test_grid_screen_renders_cards_and_counters() {
        let app = sample_app();
        let text = screen_text(&app);
        assert!(text.contains("Movies: 1"));
        assert!(text.contains("Webseries: 1"));
        assert!(text.contains("Andhadhun"));
        assert!(text.contains("2018-10-05 • 8.2"));
        assert!(text.contains("Thriller"));
    }

    #[test]
    fn test_empty_result_message() {
        let mut app = sample_app();
        app.set_query("nothing matches this");
        assert!(screen_text(&app).contains("No movies found."));
    }

    #[test]
    fn test_load_error_message() {
        let mut app = App::new(DEFAULT_WATCH_FALLBACK.to_string());
        let err = crate::catalog::parse_catalog(b"{}").unwrap_err();
        app.finish_load(Err(err));
        let text = screen_text(&app);
        assert_eq!(text.matches("Failed to load movie list.").count(), 1);
    }

    #[test]
    fn test_latest_panel_collapses_to_title() {
        let mut app = sample_app();
        app.year = "2018".to_string();
        app.refresh();
        let text = screen_text(&app);
        assert!(text.contains("▾ Latest 2018"));
        assert_eq!(text.matches("Andhadhun").count(), 2);

        app.toggle_latest();
        let text = screen_text(&app);
        assert!(text.contains("▸ Latest 2018"));
        assert_eq!(text.matches("Andhadhun").count(), 1);
    }

    #[test]
    fn test_episodes_modal_renders_rows() {
        let mut app = sample_app();
        app.open_detail(0);
        assert!(screen_text(&app).contains("View Episodes"));
        app.primary_action();
        let text = screen_text(&app);
        assert!(text.contains("Episode 1"));
        assert!(text.contains("https://t.me/ep1"));
    }
}
