//! Display descriptors with every fallback already applied.
//!
//! The terminal widgets in `ui` only ever draw these values, never raw items.

use crate::catalog::{Item, Language};

pub const POSTER_PLACEHOLDER: &str = "placeholder.jpg";
pub const UNTITLED: &str = "Untitled";
pub const UNTITLED_SERIES: &str = "Untitled Series";
pub const NO_DESCRIPTION: &str = "No description available.";
pub const MISSING: &str = "—";
pub const INERT_LINK: &str = "#";
pub const DEFAULT_WATCH_FALLBACK: &str = "https://filmm.me/PedI59LB";

pub const NO_RESULTS: &str = "No movies found.";
pub const LOAD_FAILED: &str = "Failed to load movie list.";

/// A grid card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub poster: String,
    pub title: String,
    pub meta: String,
}

/// An outbound link with its button label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub label: String,
    pub url: String,
}

impl Link {
    /// Placeholder targets lead nowhere and must not be opened.
    pub fn is_inert(&self) -> bool {
        self.url.is_empty() || self.url == INERT_LINK
    }
}

/// What the primary button of the detail panel does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimaryAction {
    ViewEpisodes,
    Open(Link),
}

impl PrimaryAction {
    pub fn label(&self) -> &str {
        match self {
            PrimaryAction::ViewEpisodes => "View Episodes",
            PrimaryAction::Open(link) => &link.label,
        }
    }
}

/// The detail panel for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detail {
    pub poster: String,
    pub title: String,
    pub description: String,
    pub rating: String,
    pub genres: String,
    pub release: String,
    pub language: String,
    pub length: String,
    pub primary: PrimaryAction,
    /// Hidden (None) for series.
    pub watch_online: Option<Link>,
}

/// One row of the episodes panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeRow {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub movies: usize,
    pub series: usize,
}

fn or_fallback(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}

pub fn card(item: &Item) -> Card {
    Card {
        poster: or_fallback(item.poster.as_deref(), POSTER_PLACEHOLDER),
        title: item.title().to_string(),
        meta: format!(
            "{} • {}",
            item.release_date.as_deref().unwrap_or(""),
            or_fallback(item.rating.as_deref(), MISSING)
        ),
    }
}

fn language_text(language: Option<&Language>) -> String {
    let text = match language {
        Some(Language::One(l)) => l.clone(),
        Some(Language::Many(ls)) => ls.join(", "),
        None => String::new(),
    };
    or_fallback(Some(&text), MISSING)
}

pub fn detail(item: &Item, watch_fallback: &str) -> Detail {
    let (primary, watch_online) = if item.is_series() {
        (PrimaryAction::ViewEpisodes, None)
    } else {
        (
            PrimaryAction::Open(Link {
                label: "Open on Telegram".to_string(),
                url: or_fallback(item.telegram_link.as_deref(), INERT_LINK),
            }),
            Some(Link {
                label: "Watch Online".to_string(),
                url: or_fallback(item.watch_link.as_deref(), watch_fallback),
            }),
        )
    };

    Detail {
        poster: or_fallback(item.poster.as_deref(), POSTER_PLACEHOLDER),
        title: or_fallback(item.title.as_deref(), UNTITLED),
        description: or_fallback(item.description.as_deref(), NO_DESCRIPTION),
        rating: or_fallback(item.rating.as_deref(), MISSING),
        genres: or_fallback(Some(&item.genres.join(", ")), MISSING),
        release: or_fallback(item.release_date.as_deref(), MISSING),
        language: language_text(item.language.as_ref()),
        length: or_fallback(item.length.as_deref(), MISSING),
        primary,
        watch_online,
    }
}

pub fn episodes(item: &Item) -> Vec<EpisodeRow> {
    item.episode_links
        .iter()
        .enumerate()
        .map(|(i, link)| EpisodeRow {
            label: format!("Episode {}", i + 1),
            url: or_fallback(link.as_deref(), INERT_LINK),
        })
        .collect()
}

pub fn series_heading(item: &Item) -> String {
    or_fallback(item.title.as_deref(), UNTITLED_SERIES)
}

pub fn counters(items: &[Item]) -> Counters {
    let series = items.iter().filter(|item| item.is_series()).count();
    Counters {
        movies: items.len() - series,
        series,
    }
}
