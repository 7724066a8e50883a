use crate::Session;
use anyhow::Result;
use grimoire::database;

pub(crate) fn run(session: &mut Session) -> Result<()> {
    let path = database::database_path(&session.data_dir);
    println!("downloading card db to {}\n", path.display());

    let db = database::download(&session.data_dir)?;
    println!(
        "download complete: {} cards, MTGJSON v{} ({})",
        db.len(),
        db.meta().version,
        db.meta().date,
    );

    session.database = Some(db);

    Ok(())
}
