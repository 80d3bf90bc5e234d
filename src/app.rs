use std::path::Path;

use crate::catalog::{self, CatalogError, CatalogStore, Item};
use crate::controls::{self, ControlBar, PageAction};
use crate::filter;
use crate::pager::Pager;
use crate::render::{self, Counters, Detail, EpisodeRow, Link, PrimaryAction};

/// Which view is currently active. Detail and Episodes are modals over the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Grid,
    Detail,
    Episodes,
}

/// Input mode for the text prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Import,
}

/// Grid-screen region that receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Genres,
    Latest,
    Grid,
    Pages,
}

/// Width of one card cell in the grid, borders included.
pub const CARD_WIDTH: u16 = 30;

/// Main application state.
pub struct App {
    pub catalog: CatalogStore,
    pub should_quit: bool,
    pub view: View,
    pub show_help: bool,

    // Selection state
    pub query: String,
    pub selector: String,
    pub pager: Pager,

    // Derived views, refreshed on every change
    pub filtered: Vec<usize>,
    pub latest: Vec<usize>,
    pub counters: Counters,
    pub genre_bar: ControlBar<String>,
    pub page_bar: ControlBar<PageAction>,

    // Grid screen state
    pub focus: Focus,
    pub grid_selected: usize,
    pub latest_selected: usize,
    pub latest_open: bool,
    pub grid_columns: usize,

    pub input_mode: InputMode,
    pub import_buffer: String,

    // Modal state
    pub detail_index: Option<usize>,
    pub episode_selected: usize,

    pub load_error: Option<String>,
    pub watch_fallback: String,
    pub year: String,

    pub status_msg: String,
}

impl App {
    pub fn new(watch_fallback: String) -> Self {
        let year = filter::current_year();
        Self {
            catalog: CatalogStore::new(),
            should_quit: false,
            view: View::Grid,
            show_help: false,

            query: String::new(),
            selector: String::new(),
            pager: Pager::new(0),

            filtered: Vec::new(),
            latest: Vec::new(),
            counters: Counters::default(),
            genre_bar: controls::genre_bar(std::iter::empty(), &year),
            page_bar: controls::page_bar(&Pager::new(0)),

            focus: Focus::Grid,
            grid_selected: 0,
            latest_selected: 0,
            latest_open: true,
            grid_columns: 1,

            input_mode: InputMode::Normal,
            import_buffer: String::new(),

            detail_index: None,
            episode_selected: 0,

            load_error: None,
            watch_fallback,
            year,

            status_msg: "Loading catalog...".to_string(),
        }
    }

    /// Apply the outcome of the startup load.
    pub fn finish_load(&mut self, result: Result<Vec<Item>, CatalogError>) {
        match result {
            Ok(items) => {
                self.catalog.load(items);
                if self.catalog.is_empty() {
                    tracing::warn!("catalog loaded with no items");
                }
                self.load_error = None;
                self.reset_view();
                self.status_msg = format!("{} items loaded", self.catalog.len());
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load catalog");
                self.load_error = Some(render::LOAD_FAILED.to_string());
                self.status_msg = e.user_message();
            }
        }
    }

    /// Back to "All", page 1, empty query, with the genre bar rebuilt.
    fn reset_view(&mut self) {
        self.query.clear();
        self.selector.clear();
        self.pager = Pager::new(0);
        self.genre_bar = controls::genre_bar(self.catalog.genres(), &self.year);
        self.refresh();
    }

    /// Recompute every derived view from the catalog and selection state.
    pub fn refresh(&mut self) {
        let items = self.catalog.items();
        self.filtered = filter::filter_items(items, &self.query, &self.selector);
        self.latest = filter::latest(items, &self.year);
        self.counters = render::counters(items);
        self.pager.resize(self.filtered.len());
        self.page_bar = controls::page_bar(&self.pager);
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        self.grid_selected = self.grid_selected.min(self.page_items().len().saturating_sub(1));
        self.latest_selected = self.latest_selected.min(self.latest.len().saturating_sub(1));
        if self.focus == Focus::Latest && !self.latest_expanded() {
            self.focus = Focus::Grid;
        }
    }

    fn filters_changed(&mut self) {
        self.pager = Pager::new(self.filtered.len());
        self.grid_selected = 0;
        self.refresh();
        self.status_msg = format!(
            "{} items found for \"{}\"",
            self.filtered.len(),
            if self.query.is_empty() { "all" } else { self.query.as_str() }
        );
    }

    // ── Search ──

    pub fn set_query(&mut self, value: &str) {
        self.query = value.to_string();
        self.filters_changed();
    }

    pub fn push_query_char(&mut self, c: char) {
        self.query.push(c);
        self.filters_changed();
    }

    pub fn pop_query_char(&mut self) {
        if self.query.pop().is_some() {
            self.filters_changed();
        }
    }

    // ── Genre bar ──

    pub fn activate_genre(&mut self, index: usize) {
        if let Some(selector) = self.genre_bar.activate(index) {
            self.selector = selector;
            self.filters_changed();
        }
    }

    pub fn activate_focused_genre(&mut self) {
        if let Some(selector) = self.genre_bar.activate_cursor() {
            self.selector = selector;
            self.filters_changed();
        }
    }

    // ── Paging ──

    pub fn page_action(&mut self, action: PageAction) {
        let moved = match action {
            PageAction::Prev => self.pager.prev(),
            PageAction::Next => self.pager.next(),
            PageAction::Goto(n) => self.pager.goto(n),
        };
        self.page_moved(moved);
    }

    pub fn first_page(&mut self) {
        let moved = self.pager.first();
        self.page_moved(moved);
    }

    pub fn last_page(&mut self) {
        let moved = self.pager.last();
        self.page_moved(moved);
    }

    /// Press the page-bar button under the cursor.
    pub fn activate_focused_page(&mut self) {
        if let Some(action) = self.page_bar.activate_cursor() {
            self.page_action(action);
        }
    }

    fn page_moved(&mut self, moved: bool) {
        if !moved {
            return;
        }
        // Rebuilding the bar moves its cursor onto the new page; keep it
        // where the user left it while the bar has focus.
        let cursor = self.page_bar.cursor();
        self.grid_selected = 0;
        self.page_bar = controls::page_bar(&self.pager);
        if self.focus == Focus::Pages {
            self.page_bar.set_cursor(cursor);
        }
        self.clamp_selection();
    }

    /// Catalog indices shown on the current page.
    pub fn page_items(&self) -> &[usize] {
        self.pager.slice(&self.filtered)
    }

    /// The latest panel only appears on the first page.
    pub fn latest_visible(&self) -> bool {
        self.pager.page() == 1
    }

    /// Visible and not collapsed to its title row.
    pub fn latest_expanded(&self) -> bool {
        self.latest_visible() && self.latest_open
    }

    pub fn toggle_latest(&mut self) {
        self.latest_open = !self.latest_open;
        self.clamp_selection();
    }

    // ── Navigation ──

    pub fn update_grid_columns(&mut self, terminal_width: u16) {
        self.grid_columns = (terminal_width / CARD_WIDTH).max(1) as usize;
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            Focus::Genres if self.latest_expanded() => Focus::Latest,
            Focus::Genres | Focus::Latest => Focus::Grid,
            Focus::Grid => Focus::Pages,
            Focus::Pages => Focus::Genres,
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            Focus::Genres => Focus::Pages,
            Focus::Latest => Focus::Genres,
            Focus::Grid if self.latest_expanded() => Focus::Latest,
            Focus::Grid => Focus::Genres,
            Focus::Pages => Focus::Grid,
        };
    }

    pub fn move_left(&mut self) {
        match self.focus {
            Focus::Genres => self.genre_bar.cursor_left(),
            Focus::Latest => self.latest_selected = self.latest_selected.saturating_sub(1),
            Focus::Grid => self.grid_selected = self.grid_selected.saturating_sub(1),
            Focus::Pages => self.page_bar.cursor_left(),
        }
    }

    pub fn move_right(&mut self) {
        match self.focus {
            Focus::Genres => self.genre_bar.cursor_right(),
            Focus::Pages => self.page_bar.cursor_right(),
            Focus::Latest => {
                if self.latest_selected + 1 < self.latest.len() {
                    self.latest_selected += 1;
                }
            }
            Focus::Grid => {
                if self.grid_selected + 1 < self.page_items().len() {
                    self.grid_selected += 1;
                }
            }
        }
    }

    pub fn move_up(&mut self) {
        match self.focus {
            Focus::Grid if self.grid_selected >= self.grid_columns => {
                self.grid_selected -= self.grid_columns;
            }
            Focus::Grid | Focus::Latest | Focus::Pages => self.focus_prev(),
            Focus::Genres => {}
        }
    }

    pub fn move_down(&mut self) {
        match self.focus {
            Focus::Grid => {
                let target = self.grid_selected + self.grid_columns;
                if target < self.page_items().len() {
                    self.grid_selected = target;
                }
            }
            Focus::Genres | Focus::Latest => self.focus_next(),
            Focus::Pages => {}
        }
    }

    /// Catalog index under the cursor of the focused card region.
    pub fn focused_item(&self) -> Option<usize> {
        match self.focus {
            Focus::Grid => self.page_items().get(self.grid_selected).copied(),
            Focus::Latest => self.latest.get(self.latest_selected).copied(),
            Focus::Genres | Focus::Pages => None,
        }
    }

    /// Enter on the grid screen.
    pub fn activate_focused(&mut self) {
        match self.focus {
            Focus::Genres => self.activate_focused_genre(),
            Focus::Pages => self.activate_focused_page(),
            Focus::Latest | Focus::Grid => {
                if let Some(index) = self.focused_item() {
                    self.open_detail(index);
                }
            }
        }
    }

    // ── Modals ──

    pub fn open_detail(&mut self, index: usize) {
        if self.catalog.get(index).is_some() {
            self.detail_index = Some(index);
            self.view = View::Detail;
        }
    }

    pub fn detail_item(&self) -> Option<&Item> {
        self.detail_index.and_then(|i| self.catalog.get(i))
    }

    pub fn detail(&self) -> Option<Detail> {
        self.detail_item()
            .map(|item| render::detail(item, &self.watch_fallback))
    }

    /// Run the primary detail action. Series open the episodes panel; movies
    /// hand back the link for the caller to open.
    pub fn primary_action(&mut self) -> Option<Link> {
        match self.detail()?.primary {
            PrimaryAction::ViewEpisodes => {
                self.open_episodes();
                None
            }
            PrimaryAction::Open(link) => Some(link),
        }
    }

    pub fn watch_online_link(&self) -> Option<Link> {
        self.detail()?.watch_online
    }

    pub fn open_episodes(&mut self) {
        if self.detail_item().is_some_and(Item::is_series) {
            self.episode_selected = 0;
            self.view = View::Episodes;
        }
    }

    pub fn episodes(&self) -> Vec<EpisodeRow> {
        self.detail_item().map(render::episodes).unwrap_or_default()
    }

    pub fn selected_episode(&self) -> Option<EpisodeRow> {
        self.episodes().into_iter().nth(self.episode_selected)
    }

    pub fn episode_next(&mut self) {
        if self.episode_selected + 1 < self.episodes().len() {
            self.episode_selected += 1;
        }
    }

    pub fn episode_prev(&mut self) {
        self.episode_selected = self.episode_selected.saturating_sub(1);
    }

    /// Close the topmost modal.
    pub fn close_modal(&mut self) {
        match self.view {
            View::Episodes => self.view = View::Detail,
            View::Detail => {
                self.view = View::Grid;
                self.detail_index = None;
            }
            View::Grid => {}
        }
    }

    // ── Runtime additions ──

    /// Append one item to the live catalog and redraw from a clean view.
    pub fn append_item(&mut self, item: Item) {
        let title = item.title().to_string();
        self.catalog.append(item);
        self.load_error = None;
        self.focus = Focus::Grid;
        self.grid_selected = 0;
        self.reset_view();
        tracing::info!(title = %title, total = self.catalog.len(), "item appended");
        self.status_msg = format!("Added \"{}\" ({} items)", title, self.catalog.len());
    }

    /// Read the file named in the import prompt and append it.
    pub fn import_from_buffer(&mut self) {
        let path = std::mem::take(&mut self.import_buffer);
        let path = path.trim();
        if path.is_empty() {
            return;
        }
        match catalog::read_item(Path::new(path)) {
            Ok(item) => self.append_item(item),
            Err(e) => {
                tracing::warn!(path, error = %e, "import failed");
                self.status_msg = format!("Import failed: {}", e.user_message());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pager::PAGE_SIZE;
    use crate::render::DEFAULT_WATCH_FALLBACK;
    use std::io::Write;

    fn item(title: &str, genres: &[&str], release: Option<&str>) -> Item {
        Item {
            title: Some(title.to_string()),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            release_date: release.map(str::to_string),
            ..Default::default()
        }
    }

    fn scenario_app() -> App {
        let mut app = App::new(DEFAULT_WATCH_FALLBACK.to_string());
        app.year = "2024".to_string();
        app.finish_load(Ok(vec![
            Item {
                kind: Some("series".to_string()),
                episode_links: vec![Some("u1".to_string()), Some("u2".to_string())],
                ..item("A", &["2024"], None)
            },
            item("B", &["Action"], Some("2023-01-01")),
        ]));
        app
    }

    fn big_app(n: usize) -> App {
        let mut app = App::new(DEFAULT_WATCH_FALLBACK.to_string());
        app.year = "2024".to_string();
        let items = (0..n)
            .map(|i| {
                let genre = if i % 2 == 0 { "Even" } else { "Odd" };
                item(&format!("Title {i}"), &[genre], Some("2024-01-01"))
            })
            .collect();
        app.finish_load(Ok(items));
        app
    }

    #[test]
    fn test_initial_state() {
        let app = scenario_app();
        assert_eq!(app.query, "");
        assert_eq!(app.selector, "");
        assert_eq!(app.pager.page(), 1);
        assert_eq!(app.genre_bar.active_label(), Some("All"));
        assert_eq!(app.filtered, vec![0, 1]);
        assert_eq!(app.latest, vec![0]);
        assert_eq!(app.counters, Counters { movies: 1, series: 1 });
        assert!(app.load_error.is_none());
    }

    #[test]
    fn test_genre_bar_contents() {
        let app = scenario_app();
        let labels: Vec<&str> = app.genre_bar.controls().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["All", "2024", "Action", "2024"]);
    }

    #[test]
    fn test_genre_click_filters_and_marks_active() {
        let mut app = scenario_app();
        app.activate_genre(2);
        assert_eq!(app.selector, "Action");
        assert_eq!(app.filtered, vec![1]);
        assert_eq!(app.genre_bar.active_label(), Some("Action"));

        app.activate_genre(0);
        assert_eq!(app.selector, "");
        assert_eq!(app.filtered, vec![0, 1]);
    }

    #[test]
    fn test_search_uses_active_selector() {
        let mut app = scenario_app();
        app.activate_genre(2);
        app.set_query("a");
        assert_eq!(app.filtered, vec![1]);
        app.set_query("zzz");
        assert!(app.filtered.is_empty());
        assert_eq!(app.selector, "Action");
    }

    #[test]
    fn test_typing_query_char_by_char() {
        let mut app = scenario_app();
        app.push_query_char('b');
        assert_eq!(app.filtered, vec![1]);
        app.pop_query_char();
        assert_eq!(app.filtered, vec![0, 1]);
        assert_eq!(app.query, "");
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut app = big_app(70);
        app.page_action(PageAction::Next);
        app.page_action(PageAction::Next);
        assert_eq!(app.pager.page(), 3);
        app.set_query("title");
        assert_eq!(app.pager.page(), 1);
        app.page_action(PageAction::Goto(2));
        app.activate_genre(1);
        assert_eq!(app.pager.page(), 1);
    }

    #[test]
    fn test_paging_moves_only_grid() {
        let mut app = big_app(45);
        assert_eq!(app.page_items().len(), PAGE_SIZE);
        assert!(app.latest_visible());
        app.page_action(PageAction::Next);
        assert_eq!(app.pager.page(), 2);
        assert!(!app.latest_visible());
        assert_eq!(app.page_items()[0], 20);
        app.last_page();
        assert_eq!(app.page_items().len(), 5);
        app.page_action(PageAction::Next);
        assert_eq!(app.pager.page(), 3);
        app.page_action(PageAction::Goto(9));
        assert_eq!(app.pager.page(), 3);
        assert_eq!(app.page_bar.active_label(), Some("3"));
        app.first_page();
        assert_eq!(app.pager.page(), 1);
        assert_eq!(app.query, "");
    }

    #[test]
    fn test_latest_focus_leaves_when_hidden() {
        let mut app = big_app(45);
        app.focus = Focus::Latest;
        app.page_action(PageAction::Next);
        assert_eq!(app.focus, Focus::Grid);
        app.focus_prev();
        assert_eq!(app.focus, Focus::Genres);
    }

    #[test]
    fn test_page_bar_reaches_pages_past_nine() {
        let mut app = big_app(PAGE_SIZE * 15);
        assert_eq!(app.pager.total_pages(), 15);
        app.focus = Focus::Grid;
        app.focus_next();
        assert_eq!(app.focus, Focus::Pages);
        assert_eq!(app.page_bar.cursor(), 1);
        for _ in 0..11 {
            app.move_right();
        }
        assert_eq!(app.page_bar.cursor(), 12);
        app.activate_focused();
        assert_eq!(app.pager.page(), 12);
        assert_eq!(app.page_bar.active_label(), Some("12"));
        assert_eq!(app.page_items()[0], PAGE_SIZE * 11);

        // "Next" keeps the cursor on the button that was pressed
        for _ in 0..5 {
            app.move_right();
        }
        assert_eq!(app.page_bar.cursor(), 16);
        app.activate_focused();
        assert_eq!(app.pager.page(), 13);
        assert_eq!(app.page_bar.cursor(), 16);
        assert_eq!(app.page_bar.active_label(), Some("13"));

        app.focus_next();
        assert_eq!(app.focus, Focus::Genres);
    }

    #[test]
    fn test_latest_panel_collapses() {
        let mut app = scenario_app();
        assert!(app.latest_expanded());
        app.focus = Focus::Latest;
        app.toggle_latest();
        assert!(!app.latest_open);
        assert!(app.latest_visible());
        assert!(!app.latest_expanded());
        assert_eq!(app.focus, Focus::Grid);
        app.focus_prev();
        assert_eq!(app.focus, Focus::Genres);
        app.focus_next();
        assert_eq!(app.focus, Focus::Grid);

        app.toggle_latest();
        assert!(app.latest_expanded());
        app.focus_prev();
        assert_eq!(app.focus, Focus::Latest);
    }

    #[test]
    fn test_grid_navigation_respects_columns() {
        let mut app = big_app(45);
        app.update_grid_columns(CARD_WIDTH * 4 + 3);
        assert_eq!(app.grid_columns, 4);
        app.focus = Focus::Grid;
        app.move_down();
        assert_eq!(app.grid_selected, 4);
        app.move_right();
        assert_eq!(app.grid_selected, 5);
        app.move_up();
        assert_eq!(app.grid_selected, 1);
        app.move_up();
        assert_eq!(app.focus, Focus::Latest);
        for _ in 0..30 {
            app.focus = Focus::Grid;
            app.move_down();
        }
        assert!(app.grid_selected < PAGE_SIZE);
    }

    #[test]
    fn test_open_detail_for_movie() {
        let mut app = scenario_app();
        app.focus = Focus::Grid;
        app.grid_selected = 1;
        app.activate_focused();
        assert_eq!(app.view, View::Detail);
        let detail = app.detail().unwrap();
        assert_eq!(detail.primary.label(), "Open on Telegram");
        assert!(app.watch_online_link().is_some());
        let link = app.primary_action().unwrap();
        assert!(link.is_inert());
        assert_eq!(app.view, View::Detail);
    }

    #[test]
    fn test_series_detail_opens_episodes() {
        let mut app = scenario_app();
        app.open_detail(0);
        assert_eq!(app.detail().unwrap().primary.label(), "View Episodes");
        assert!(app.watch_online_link().is_none());
        assert!(app.primary_action().is_none());
        assert_eq!(app.view, View::Episodes);

        assert_eq!(app.selected_episode().unwrap().url, "u1");
        app.episode_next();
        app.episode_next();
        assert_eq!(app.selected_episode().unwrap().label, "Episode 2");
        app.episode_prev();
        assert_eq!(app.selected_episode().unwrap().url, "u1");

        app.close_modal();
        assert_eq!(app.view, View::Detail);
        app.close_modal();
        assert_eq!(app.view, View::Grid);
        assert!(app.detail_index.is_none());
    }

    #[test]
    fn test_movies_never_open_episodes() {
        let mut app = scenario_app();
        app.open_detail(1);
        app.open_episodes();
        assert_eq!(app.view, View::Detail);
    }

    #[test]
    fn test_latest_panel_opens_detail() {
        let mut app = scenario_app();
        app.focus = Focus::Latest;
        app.activate_focused();
        assert_eq!(app.detail_index, Some(0));
    }

    #[test]
    fn test_append_resets_view_and_adds_genre() {
        let mut app = scenario_app();
        app.activate_genre(2);
        app.set_query("b");
        app.append_item(item("C", &["Thriller"], Some("2024-09-09")));
        assert_eq!(app.query, "");
        assert_eq!(app.selector, "");
        assert_eq!(app.pager.page(), 1);
        assert_eq!(app.genre_bar.active_label(), Some("All"));
        assert!(app.genre_bar.controls().iter().any(|c| c.label == "Thriller"));
        assert_eq!(app.filtered, vec![0, 1, 2]);
        assert_eq!(app.latest, vec![0, 2]);
        assert_eq!(app.counters, Counters { movies: 2, series: 1 });
    }

    #[test]
    fn test_load_failure_keeps_catalog_empty() {
        let mut app = App::new(DEFAULT_WATCH_FALLBACK.to_string());
        let err = catalog::parse_catalog(b"not json").unwrap_err();
        app.finish_load(Err(err));
        assert!(app.catalog.is_empty());
        assert_eq!(app.load_error.as_deref(), Some(render::LOAD_FAILED));
        assert!(app.status_msg.contains("Data format error"));
    }

    #[test]
    fn test_import_from_buffer() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"title": "Imported", "type": "Series"}}"#).unwrap();
        let mut app = scenario_app();
        app.import_buffer = file.path().to_string_lossy().to_string();
        app.import_from_buffer();
        assert_eq!(app.catalog.len(), 3);
        assert_eq!(app.counters.series, 2);
        assert!(app.import_buffer.is_empty());
        assert!(app.status_msg.contains("Imported"));
    }

    #[test]
    fn test_import_failure_reports_status() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = scenario_app();
        app.import_buffer = dir.path().join("missing.json").to_string_lossy().to_string();
        app.import_from_buffer();
        assert_eq!(app.catalog.len(), 2);
        assert!(app.status_msg.starts_with("Import failed"));
    }
}
