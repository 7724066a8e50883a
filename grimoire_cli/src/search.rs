use crate::Session;
use anyhow::Result;
use clap::Args;
use grimoire::database::SearchOptions;

#[derive(Args)]
pub(crate) struct SearchArgs {
    /// Text to search for
    #[arg(required = true)]
    terms: Vec<String>,

    /// Include text inside text boxes
    #[arg(short, long)]
    text: bool,
}

pub(crate) fn run(args: SearchArgs, session: &mut Session) -> Result<()> {
    let opts = SearchOptions::search_for(args.terms.join(" ")).with_text(args.text);

    for card in session.database()?.search(&opts)? {
        println!("{card:#}");
        println!("-------");
    }

    Ok(())
}
