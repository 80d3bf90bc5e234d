use std::collections::BTreeSet;
use std::path::Path;

use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

/// Language of an item: either a single label or a list of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Language {
    One(String),
    Many(Vec<String>),
}

/// A single movie or series record from the catalog JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub poster: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub rating: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub genres: Vec<String>,
    #[serde(default, deserialize_with = "lenient_language")]
    pub language: Option<Language>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub length: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub telegram_link: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub watch_link: Option<String>,
    #[serde(default, deserialize_with = "lenient_links")]
    pub episode_links: Vec<Option<String>>,
}

impl Item {
    /// Title as stored, empty when the record has none.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// `type` equal to "series" in any casing marks a series; everything else is a movie.
    pub fn is_series(&self) -> bool {
        self.kind
            .as_deref()
            .is_some_and(|k| k.to_lowercase() == "series")
    }
}

// ── Lenient field decoding ──

fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let v = Option::<Value>::deserialize(d)?;
    Ok(v.as_ref().and_then(scalar_text))
}

fn lenient_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let v = Option::<Value>::deserialize(d)?;
    Ok(match v {
        Some(Value::Array(values)) => values.iter().filter_map(scalar_text).collect(),
        Some(other) => scalar_text(&other).into_iter().collect(),
        None => Vec::new(),
    })
}

fn lenient_language<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Language>, D::Error> {
    let v = Option::<Value>::deserialize(d)?;
    Ok(match v {
        Some(Value::Array(values)) => Some(Language::Many(
            values.iter().filter_map(scalar_text).collect(),
        )),
        Some(other) => scalar_text(&other).map(Language::One),
        None => None,
    })
}

fn lenient_links<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Option<String>>, D::Error> {
    let v = Option::<Value>::deserialize(d)?;
    Ok(match v {
        Some(Value::Array(values)) => values.iter().map(scalar_text).collect(),
        Some(Value::String(s)) => vec![Some(s)],
        _ => Vec::new(),
    })
}

/// Errors raised while loading catalog data.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} while fetching {url}")]
    Status { status: u16, url: String },

    #[error("Invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog root is not a JSON array")]
    NotAnArray,
}

impl CatalogError {
    /// Short message for the status line.
    pub fn user_message(&self) -> String {
        match self {
            CatalogError::Io(e) => format!("File system error: {}", e),
            CatalogError::Http(e) => format!("Network error: {}", e),
            CatalogError::Status { status, .. } => format!("Server answered HTTP {}", status),
            CatalogError::Parse(e) => format!("Data format error: {}", e),
            CatalogError::NotAnArray => "Data format error: expected a list of items".to_string(),
        }
    }
}

/// Owns the loaded item list and the genre set derived from it.
#[derive(Debug, Default)]
pub struct CatalogStore {
    items: Vec<Item>,
    genres: Vec<String>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole list.
    pub fn load(&mut self, items: Vec<Item>) {
        self.items = items;
        self.recompute_genres();
    }

    /// Add one item at the end of the list.
    pub fn append(&mut self, item: Item) {
        self.items.push(item);
        self.recompute_genres();
    }

    fn recompute_genres(&mut self) {
        let unique: BTreeSet<&str> = self
            .items
            .iter()
            .flat_map(|item| item.genres.iter().map(String::as_str))
            .collect();
        let mut genres: Vec<String> = unique.into_iter().map(str::to_string).collect();
        // UTF-16 code unit order, which differs from byte order above the BMP
        genres.sort_by(|a, b| a.encode_utf16().cmp(b.encode_utf16()));
        self.genres = genres;
    }

    /// Unique genre values in ascending order.
    pub fn genres(&self) -> impl Iterator<Item = &str> {
        self.genres.iter().map(String::as_str)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Parse a catalog document: a JSON array of items. Entries that are not
/// item objects still load, with every field absent.
pub fn parse_catalog(bytes: &[u8]) -> Result<Vec<Item>, CatalogError> {
    let Value::Array(values) = serde_json::from_slice::<Value>(bytes)? else {
        return Err(CatalogError::NotAnArray);
    };
    Ok(values
        .into_iter()
        .map(|value| {
            Item::deserialize(value).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "catalog entry is not an item object");
                Item::default()
            })
        })
        .collect())
}

/// Read a JSON file holding a single item object.
pub fn read_item(path: &Path) -> Result<Item, CatalogError> {
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Load the catalog from a local path or an http(s) URL.
pub async fn fetch_catalog(source: &str) -> Result<Vec<Item>, CatalogError> {
    let bytes = if is_remote(source) {
        download(source).await?
    } else {
        tokio::fs::read(source).await?
    };
    let items = parse_catalog(&bytes)?;
    tracing::info!(source, items = items.len(), "catalog loaded");
    Ok(items)
}

async fn download(url: &str) -> Result<Vec<u8>, CatalogError> {
    let response = reqwest::get(url).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let pb = match response.content_length() {
        Some(total) => {
            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            pb
        }
        None => ProgressBar::new_spinner(),
    };

    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        body.extend_from_slice(&chunk);
        pb.set_position(body.len() as u64);
    }

    pb.finish_and_clear();
    Ok(body)
}
