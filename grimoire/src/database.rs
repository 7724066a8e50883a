use crate::{card::Card, text_utils::title_case, AGENT};
use anyhow::{bail, ensure, Context, Result};
use compact_str::CompactString;
use itertools::Itertools;
use nucleo_matcher::{
    pattern::{CaseMatching, Normalization, Pattern},
    Config, Matcher,
};
use serde::Deserialize;
use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

// MTGJSON v5. The atomic file has one entry per card name, not per printing.
const DATABASE_URL: &str = "https://mtgjson.com/api/v5/AtomicCards.json";
const DATABASE_FILE: &str = "AtomicCards.json";

// The payload is on the order of 100 MB.
const BODY_LIMIT: u64 = 512 * 1024 * 1024;

#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseMeta {
    pub version: String,
    pub date: chrono::NaiveDate,
}

#[derive(Deserialize)]
struct DatabaseData {
    meta: DatabaseMeta,
    // Each name maps to its faces. Split and adventure cards have several.
    data: HashMap<CompactString, Vec<Card>>,
}

#[derive(Debug, Deserialize)]
#[serde(from = "DatabaseData")]
pub struct CardDatabase {
    meta: DatabaseMeta,
    cards: HashMap<CompactString, Card>,
}

impl From<DatabaseData> for CardDatabase {
    fn from(d: DatabaseData) -> Self {
        let cards = d
            .data
            .into_iter()
            .filter_map(|(name, faces)| {
                let mut card = faces.into_iter().next()?;
                // The map key carries the full name. Faces only carry their half.
                card.name = name.clone();
                Some((name, card))
            })
            .collect();

        Self { meta: d.meta, cards }
    }
}

pub struct SearchOptions {
    search_term: String,
    with_text: bool,
}

impl SearchOptions {
    #[must_use]
    pub fn search_for(search_term: String) -> Self {
        Self { search_term, with_text: false }
    }
    #[must_use]
    pub fn with_text(self, with_text: bool) -> Self {
        Self { with_text, ..self }
    }
}

impl CardDatabase {
    #[must_use]
    pub fn meta(&self) -> &DatabaseMeta {
        &self.meta
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Case-insensitive substring search over card names, and over rules
    /// text as well when the options ask for it. Prefix matches sort first.
    pub fn search(&self, opts: &SearchOptions) -> Result<impl Iterator<Item = &Card> + '_> {
        let term = opts.search_term.to_lowercase();

        let mut cards = self
            .cards
            .values()
            .filter(|c| {
                c.name.to_lowercase().contains(&term)
                    || (opts.with_text && c.text.to_lowercase().contains(&term))
            })
            .sorted_by_key(|c| (!c.name.to_lowercase().starts_with(&term), c.name.clone()))
            .peekable();

        ensure!(cards.peek().is_some(), "no results found");

        Ok(cards)
    }

    /// Exact lookup of the title-cased input. Title-casing alone misses
    /// names like "Akroma, Angel of Wrath", so a miss falls back to a
    /// case-insensitive scan.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Card> {
        let titled = title_case(name);

        self.cards.get(titled.as_str()).or_else(|| {
            let wanted = titled.to_lowercase();
            self.cards.values().find(|c| c.name.to_lowercase() == wanted)
        })
    }

    /// Best fuzzy match over card names, for "did you mean" hints.
    #[must_use]
    pub fn suggest(&self, search_term: &str) -> Option<CompactString> {
        let mut matcher = Matcher::new(Config::DEFAULT);
        let results = Pattern::parse(search_term, CaseMatching::Ignore, Normalization::Smart)
            .match_list(self.cards.keys().cloned(), &mut matcher);

        results.first().map(|r| r.0.clone())
    }
}

pub fn default_data_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "grimoire")
        .context("couldn't determine the platform cache directory")?;

    Ok(dirs.cache_dir().to_path_buf())
}

#[must_use]
pub fn database_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DATABASE_FILE)
}

/// Fetch the database and stream it to the cache file, then parse it.
pub fn download(data_dir: &Path) -> Result<CardDatabase> {
    fs::create_dir_all(data_dir)
        .with_context(|| format!("couldn't create {}", data_dir.display()))?;

    let path = database_path(data_dir);

    tracing::info!("fetching {DATABASE_URL}");
    let mut res = AGENT.get(DATABASE_URL).call()?;
    let mut body = res.body_mut().with_config().limit(BODY_LIMIT).reader();

    let mut file =
        fs::File::create(&path).with_context(|| format!("couldn't create {}", path.display()))?;
    let written = io::copy(&mut body, &mut file)
        .with_context(|| format!("couldn't write {}", path.display()))?;

    tracing::info!("wrote {written} bytes to {}", path.display());

    load(data_dir)
}

/// Parse the cached database file. A missing file gets its own message
/// because it is the expected state before the first download.
pub fn load(data_dir: &Path) -> Result<CardDatabase> {
    let path = database_path(data_dir);

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => bail!("no cards found, run download"),
        Err(e) => {
            return Err(e).with_context(|| format!("couldn't read {}", path.display()));
        }
    };

    serde_json::from_str(&content).with_context(|| format!("couldn't parse {}", path.display()))
}
