use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use grimoire::{database, database::CardDatabase, deck::Deck};
use std::{
    io::{BufRead, Write},
    ops::ControlFlow,
    path::PathBuf,
};

mod deck;
mod download;
mod search;

#[derive(Parser)]
#[command(author, version)]
struct Cli {
    /// Where the card database cache lives
    #[arg(long, env = "GRIMOIRE_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

/// One line of the session, parsed as if it were its own command line.
#[derive(Parser)]
#[command(multicall = true)]
struct Repl {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download an up-to-date list of mtg cards
    Download,

    /// Search for a card
    ///
    /// All terms are joined into one search phrase, so quotation marks are not needed.
    Search(search::SearchArgs),

    /// Add a card to your deck
    Add(deck::NameArgs),

    /// Remove a card from your deck
    Remove(deck::NameArgs),

    /// Print your deck
    Print,

    /// Save your deck
    Save(deck::PathArgs),

    /// Load a deck
    Load(deck::PathArgs),

    /// Exit deck building app
    Exit,
}

struct Session {
    data_dir: PathBuf,
    database: Option<CardDatabase>,
    deck: Deck,
}

impl Session {
    /// The card database, loaded from the cache file on first use.
    fn database(&mut self) -> Result<&CardDatabase> {
        if self.database.is_none() {
            self.database = Some(database::load(&self.data_dir)?);
        }
        Ok(self.database.as_ref().expect("just loaded"))
    }
}

fn dispatch(command: Commands, session: &mut Session) -> Result<ControlFlow<()>> {
    match command {
        Commands::Download => download::run(session)?,
        Commands::Search(args) => search::run(args, session)?,
        Commands::Add(args) => deck::add(args, session)?,
        Commands::Remove(args) => deck::remove(args, &mut session.deck)?,
        Commands::Print => deck::print(&session.deck),
        Commands::Save(args) => deck::save(args, &session.deck)?,
        Commands::Load(args) => deck::load(args, &mut session.deck)?,
        Commands::Exit => {
            println!("goodbye 👋");
            return Ok(ControlFlow::Break(()));
        }
    }

    Ok(ControlFlow::Continue(()))
}

fn run() -> Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let data_dir = match args.data_dir {
        Some(dir) => dir,
        None => database::default_data_dir()?,
    };

    let mut session = Session { data_dir, database: None, deck: Deck::default() };

    println!(
        "{} {} The Gathering {}\n",
        "welcome to the".blue(),
        "Magic".yellow(),
        "deck building app".blue()
    );
    println!("run \"{}\" to get started", "help".green());

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!("goodbye 👋");
            break;
        }

        if line.split_whitespace().next().is_none() {
            continue;
        }

        let repl = match Repl::try_parse_from(line.split_whitespace()) {
            Ok(repl) => repl,
            Err(e) => {
                e.print()?;
                continue;
            }
        };

        match dispatch(repl.command, &mut session) {
            Ok(ControlFlow::Continue(())) => println!(),
            Ok(ControlFlow::Break(())) => break,
            Err(e) => eprintln!("{e:#}\n"),
        }
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Encountered error: {e}");
        std::process::exit(1)
    }
}
