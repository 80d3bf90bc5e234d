mod app;
mod catalog;
mod config;
mod controls;
mod filter;
mod links;
mod pager;
mod render;
mod ui;

use app::{App, InputMode, View};
use clap::{Parser, Subcommand};
use controls::PageAction;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;

/// TUI browser for a static JSON catalog of movies and series
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Catalog JSON path or http(s) URL (overrides the config file)
    #[arg(short, long, global = true)]
    source: Option<String>,

    /// Config file to use instead of the default lookup
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the TUI browser (default)
    Run,
    /// Print one page of the filtered catalog without starting the TUI
    List {
        /// Free-text search over title, description and genres
        #[arg(short, long, default_value = "")]
        query: String,
        /// Genre or year selector ("All" for everything)
        #[arg(short, long, default_value = "")]
        genre: String,
        /// Page number, clamped into range
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        page: i64,
    },
}

/// Daily rolling log file under the platform data dir. The TUI owns the
/// terminal, so nothing is logged to stdout/stderr.
fn init_logging(filter: &str) -> Option<WorkerGuard> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let logs_dir = config::project_dirs()?.data_dir().join("logs");
    std::fs::create_dir_all(&logs_dir).ok()?;

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "catalog-explorer.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    Some(guard)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let settings = config::load_config(cli.config.as_deref()).resolve(cli.source);
    let _log_guard = init_logging(&settings.log_filter);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), source = %settings.source, "starting");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::List { query, genre, page } => {
            let items = match catalog::fetch_catalog(&settings.source).await {
                Ok(items) => items,
                Err(e) => {
                    tracing::error!(error = %e, "failed to load catalog");
                    eprintln!("{}", render::LOAD_FAILED);
                    eprintln!("Error: {}", e.user_message());
                    std::process::exit(1);
                }
            };
            print_page(items, &query, &controls::selector_for_label(&genre), page);
        }
        Commands::Run => {
            let mut app = App::new(settings.watch_fallback_url);
            app.finish_load(catalog::fetch_catalog(&settings.source).await);

            // Init terminal
            let mut terminal = ratatui::init();

            if let Ok(size) = terminal.size() {
                app.update_grid_columns(size.width);
            }

            // Main loop
            let result = run_app(&mut terminal, &mut app);

            // Restore terminal
            ratatui::restore();

            if let Err(e) = result {
                tracing::error!(error = %e, "terminal loop failed");
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Headless rendering of one filtered page.
fn print_page(items: Vec<catalog::Item>, query: &str, selector: &str, page: i64) {
    let year = filter::current_year();
    let mut store = catalog::CatalogStore::new();
    store.load(items);

    let visible = filter::filter_items(store.items(), query, selector);
    let pager = pager::Pager::with_requested(visible.len(), page);

    if pager.page() == 1 {
        println!("Latest {}:", year);
        let latest = filter::latest(store.items(), &year);
        if latest.is_empty() {
            println!("  {}", render::NO_RESULTS);
        }
        for &i in &latest {
            let card = render::card(&store.items()[i]);
            println!("  {}  ({})", card.title, card.meta);
        }
        println!();
    }

    let page_items = pager.slice(&visible);
    if page_items.is_empty() {
        println!("{}", render::NO_RESULTS);
    }
    for &i in page_items {
        let card = render::card(&store.items()[i]);
        println!("{}", card.title);
        println!("    {}", card.meta);
        println!("    {}", card.poster);
    }

    let counters = render::counters(store.items());
    println!();
    println!(
        "Page {}/{} ({})",
        pager.page(),
        pager.total_pages(),
        pager.range_label().trim()
    );
    println!("Movies: {}  Webseries: {}", counters.movies, counters.series);
}

fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // Poll for events with a 250ms timeout
        if event::poll(std::time::Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    handle_key(app, key);
                }
                Event::Resize(width, _) => {
                    app.update_grid_columns(width);
                }
                _ => {}
            }
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // Help toggle (global)
    if key.code == KeyCode::Char('?') && app.input_mode == InputMode::Normal {
        app.show_help = !app.show_help;
        return;
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match app.input_mode {
        InputMode::Search => return handle_search_input(app, key),
        InputMode::Import => return handle_import_input(app, key),
        InputMode::Normal => {}
    }

    match app.view {
        View::Grid => handle_grid_key(app, key),
        View::Detail => handle_detail_key(app, key),
        View::Episodes => handle_episodes_key(app, key),
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => app.pop_query_char(),
        KeyCode::Char(c) => app.push_query_char(c),
        _ => {}
    }
}

fn handle_import_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
            app.import_from_buffer();
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.import_buffer.clear();
            app.status_msg.clear();
        }
        KeyCode::Backspace => {
            app.import_buffer.pop();
        }
        KeyCode::Char(c) => app.import_buffer.push(c),
        _ => {}
    }
}

fn handle_grid_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Search;
        }
        KeyCode::Char('i') => {
            app.input_mode = InputMode::Import;
            app.status_msg = "Path to a JSON file holding one item".to_string();
        }
        KeyCode::Tab => app.focus_next(),
        KeyCode::BackTab => app.focus_prev(),
        KeyCode::Left | KeyCode::Char('h') => app.move_left(),
        KeyCode::Right | KeyCode::Char('l') => app.move_right(),
        KeyCode::Up | KeyCode::Char('k') => app.move_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_down(),
        KeyCode::Enter => app.activate_focused(),
        KeyCode::PageDown | KeyCode::Char('n') => app.page_action(PageAction::Next),
        KeyCode::PageUp | KeyCode::Char('p') => app.page_action(PageAction::Prev),
        KeyCode::Char('g') => app.first_page(),
        KeyCode::Char('G') => app.last_page(),
        KeyCode::Char('L') => app.toggle_latest(),
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(n) = c.to_digit(10) {
                app.page_action(PageAction::Goto(n as usize));
            }
        }
        KeyCode::Esc => {
            // Clear search
            if !app.query.is_empty() {
                app.set_query("");
            }
        }
        _ => {}
    }
}

fn handle_detail_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_modal(),
        KeyCode::Enter => {
            if let Some(link) = app.primary_action() {
                app.status_msg = links::open_link(&link);
            }
        }
        KeyCode::Char('w') => {
            if let Some(link) = app.watch_online_link() {
                app.status_msg = links::open_link(&link);
            }
        }
        KeyCode::Char('y') => {
            if let Some(render::PrimaryAction::Open(link)) = app.detail().map(|d| d.primary) {
                app.status_msg = links::copy_link(&link);
            }
        }
        _ => {}
    }
}

fn handle_episodes_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_modal(),
        KeyCode::Down | KeyCode::Char('j') => app.episode_next(),
        KeyCode::Up | KeyCode::Char('k') => app.episode_prev(),
        KeyCode::Enter | KeyCode::Char('o') => {
            if let Some(row) = app.selected_episode() {
                app.status_msg = links::open_link(&render::Link {
                    label: row.label,
                    url: row.url,
                });
            }
        }
        KeyCode::Char('y') => {
            if let Some(row) = app.selected_episode() {
                app.status_msg = links::copy_link(&render::Link {
                    label: row.label,
                    url: row.url,
                });
            }
        }
        _ => {}
    }
}
