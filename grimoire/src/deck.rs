use crate::{
    card::{type_line_is_basic_land, Card},
    text_utils::title_case,
};
use anyhow::{bail, Context, Result};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt::{self, Display, Formatter},
    fs,
    path::Path,
};

const MAX_COPIES: usize = 4;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeckEntry {
    pub count: usize,
    #[serde(rename = "type")]
    pub type_line: CompactString,
}

/// The deck is its persisted form: a name-to-entry map, serialized as
/// `{ "<Card Name>": { "count": N, "type": "..." } }`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deck {
    cards: BTreeMap<CompactString, DeckEntry>,
}

impl Deck {
    /// Add one copy, returning the new count. Four copies is the ceiling
    /// unless the stored type line marks a basic land.
    pub fn add(&mut self, card: &Card) -> Result<usize> {
        match self.cards.get_mut(card.name.as_str()) {
            Some(entry) => {
                if entry.count >= MAX_COPIES && !type_line_is_basic_land(&entry.type_line) {
                    bail!("you can only have 4 of a non-basic-land card");
                }
                entry.count += 1;
                Ok(entry.count)
            }
            None => {
                let entry = DeckEntry { count: 1, type_line: card.type_line.clone() };
                self.cards.insert(card.name.clone(), entry);
                Ok(1)
            }
        }
    }

    /// Remove one copy, returning the entry's name and new count. A count
    /// of zero means the entry is gone.
    pub fn remove(&mut self, name: &str) -> Result<(CompactString, usize)> {
        let Some(name) = self.resolve(name) else {
            bail!("no card in deck by that name");
        };

        match self.cards.get_mut(&name) {
            Some(entry) if entry.count > 1 => {
                entry.count -= 1;
                let count = entry.count;
                Ok((name, count))
            }
            _ => {
                self.cards.remove(&name);
                Ok((name, 0))
            }
        }
    }

    /// Title-cased exact match against the deck's keys, with the same
    /// case-insensitive fallback the database lookup uses.
    fn resolve(&self, name: &str) -> Option<CompactString> {
        let titled = title_case(name);
        if self.cards.contains_key(titled.as_str()) {
            return Some(titled.into());
        }

        let wanted = titled.to_lowercase();
        self.cards.keys().find(|k| k.to_lowercase() == wanted).cloned()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("couldn't write {}", path.display()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("couldn't read {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("couldn't parse {}", path.display()))
    }

    /// Total number of cards, counting copies.
    #[must_use]
    pub fn size(&self) -> usize {
        self.cards.values().map(|e| e.count).sum()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = (&CompactString, &DeckEntry)> {
        self.cards.iter()
    }
}

impl Display for Deck {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (name, entry) in &self.cards {
            writeln!(f, "{name} x {}", entry.count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(name: &str, type_line: &str) -> Card {
        serde_json::from_str(&format!(r#"{{ "name": "{name}", "type": "{type_line}" }}"#))
            .unwrap()
    }

    #[test]
    fn fifth_copy_of_a_nonland_is_rejected() {
        let mut deck = Deck::default();
        let bolt = card("Lightning Bolt", "Instant");

        for expected in 1..=4 {
            assert_eq!(deck.add(&bolt).unwrap(), expected);
        }

        let err = deck.add(&bolt).unwrap_err();
        assert_eq!(err.to_string(), "you can only have 4 of a non-basic-land card");
        assert_eq!(deck.size(), 4);
    }

    #[test]
    fn basic_lands_are_exempt_from_the_limit() {
        let mut deck = Deck::default();
        let island = card("Island", "Basic Land — Island");
        let snow = card("Snow-Covered Forest", "Basic Snow Land — Forest");

        for _ in 0..20 {
            deck.add(&island).unwrap();
        }
        for _ in 0..8 {
            deck.add(&snow).unwrap();
        }

        assert_eq!(deck.size(), 28);
    }

    #[test]
    fn nonbasic_lands_still_hit_the_limit() {
        let mut deck = Deck::default();
        let gate = card("Azorius Guildgate", "Land — Gate");

        for _ in 0..4 {
            deck.add(&gate).unwrap();
        }
        assert!(deck.add(&gate).is_err());
    }

    #[test]
    fn remove_decrements_then_deletes() {
        let mut deck = Deck::default();
        let bolt = card("Lightning Bolt", "Instant");
        deck.add(&bolt).unwrap();
        deck.add(&bolt).unwrap();

        assert_eq!(deck.remove("lightning bolt").unwrap(), ("Lightning Bolt".into(), 1));
        assert_eq!(deck.remove("LIGHTNING BOLT").unwrap(), ("Lightning Bolt".into(), 0));

        let err = deck.remove("lightning bolt").unwrap_err();
        assert_eq!(err.to_string(), "no card in deck by that name");
        assert!(deck.is_empty());
    }

    #[test]
    fn remove_resolves_names_title_casing_misses() {
        let mut deck = Deck::default();
        let akroma = card("Akroma, Angel of Wrath", "Legendary Creature — Angel");
        deck.add(&akroma).unwrap();

        let (name, count) = deck.remove("akroma, angel of wrath").unwrap();
        assert_eq!(name, "Akroma, Angel of Wrath");
        assert_eq!(count, 0);
    }

    #[test]
    fn persisted_shape_matches_the_deck_file_format() {
        let mut deck = Deck::default();
        deck.add(&card("Lightning Bolt", "Instant")).unwrap();
        deck.add(&card("Lightning Bolt", "Instant")).unwrap();

        let json = serde_json::to_string_pretty(&deck).unwrap();
        let expected = "{\n  \"Lightning Bolt\": {\n    \"count\": 2,\n    \"type\": \"Instant\"\n  }\n}";
        assert_eq!(json, expected);
    }

    #[test]
    fn save_and_load_round_trip() {
        let mut deck = Deck::default();
        deck.add(&card("Island", "Basic Land — Island")).unwrap();
        deck.add(&card("Island", "Basic Land — Island")).unwrap();
        deck.add(&card("Counterspell", "Instant")).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.json");

        deck.save(&path).unwrap();
        let loaded = Deck::load(&path).unwrap();

        assert_eq!(loaded.size(), 3);
        assert_eq!(loaded.to_string(), "Counterspell x 1\nIsland x 2\n");
    }

    #[test]
    fn load_surfaces_missing_and_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.json");

        let err = Deck::load(&path).unwrap_err();
        assert!(err.to_string().contains("deck.json"));

        fs::write(&path, "[1, 2, 3]").unwrap();
        let err = Deck::load(&path).unwrap_err();
        assert!(err.to_string().contains("deck.json"));
    }
}
