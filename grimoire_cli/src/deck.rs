use crate::Session;
use anyhow::{anyhow, Result};
use clap::Args;
use grimoire::deck::Deck;
use std::path::PathBuf;

#[derive(Args)]
pub(crate) struct NameArgs {
    /// Card name. All words are joined, so quotation marks are not needed.
    #[arg(required = true)]
    name: Vec<String>,
}

impl NameArgs {
    fn joined(&self) -> String {
        self.name.join(" ")
    }
}

#[derive(Args)]
pub(crate) struct PathArgs {
    /// Deck file. Defaults to deck.json in your home directory.
    path: Option<PathBuf>,
}

impl PathArgs {
    fn resolve(self) -> Result<PathBuf> {
        match self.path {
            Some(path) => Ok(path),
            None => {
                let dirs = directories::UserDirs::new()
                    .ok_or_else(|| anyhow!("couldn't get user directories"))?;
                Ok(dirs.home_dir().join("deck.json"))
            }
        }
    }
}

pub(crate) fn add(args: NameArgs, session: &mut Session) -> Result<()> {
    let name = args.joined();

    let card = {
        let db = session.database()?;
        match db.find(&name) {
            Some(card) => card.clone(),
            None => {
                return Err(match db.suggest(&name) {
                    Some(s) => anyhow!("no card by that name exists, did you mean \"{s}\"?"),
                    None => anyhow!("no card by that name exists"),
                });
            }
        }
    };

    let count = session.deck.add(&card)?;
    println!("{} x {count}", card.name);

    Ok(())
}

pub(crate) fn remove(args: NameArgs, deck: &mut Deck) -> Result<()> {
    let (name, count) = deck.remove(&args.joined())?;

    if count == 0 {
        println!("{name} removed from deck");
    } else {
        println!("{name} x {count}");
    }

    Ok(())
}

pub(crate) fn print(deck: &Deck) {
    if deck.is_empty() {
        println!("you have no cards in deck, run add");
        return;
    }

    print!("{deck}");
    println!("-----");
    println!("{} cards", deck.size());
}

pub(crate) fn save(args: PathArgs, deck: &Deck) -> Result<()> {
    let path = args.resolve()?;
    deck.save(&path)?;
    println!("deck saved to {}", path.display());

    Ok(())
}

pub(crate) fn load(args: PathArgs, deck: &mut Deck) -> Result<()> {
    let path = args.resolve()?;
    *deck = Deck::load(&path)?;
    println!("deck loaded");

    Ok(())
}
