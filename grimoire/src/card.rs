use crate::text_utils::SymbolText;
use colored::Colorize;
use compact_str::CompactString;
use serde::Deserialize;
use std::fmt::{self, Display, Formatter};
use unicode_width::UnicodeWidthStr;

/// One card from the database, reduced to the fields the deck builder
/// cares about. The rest of the MTGJSON record is dropped at parse time.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub name: CompactString,

    pub mana_cost: Option<CompactString>,

    /// The printed type line, e.g. `"Basic Land — Forest"` or `"Instant"`.
    #[serde(rename = "type")]
    pub type_line: CompactString,

    #[serde(default)]
    pub text: String,
}

impl Card {
    #[must_use]
    pub fn is_basic_land(&self) -> bool {
        type_line_is_basic_land(&self.type_line)
    }
}

/// The supertype segment of the type line must carry both words, so
/// `"Basic Snow Land — Island"` counts while `"Land — Gate"` does not.
pub(crate) fn type_line_is_basic_land(type_line: &str) -> bool {
    let supertypes = type_line.split('—').next().unwrap_or(type_line);
    let has = |word| supertypes.split_whitespace().any(|t| t == word);

    has("Basic") && has("Land")
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let padding = 30_usize.saturating_sub(self.name.as_str().width());

        let name = self.name.bold();
        let mana =
            self.mana_cost.as_deref().map_or_else(String::new, |m| format!("{} ", m.to_console()));

        write!(f, "{name}{:padding$} {mana}{}", "", self.type_line)?;

        if f.alternate() && !self.text.is_empty() {
            let text = self.text.to_console();
            let text = textwrap::fill(
                &text,
                textwrap::Options::new(textwrap::termwidth() - 10)
                    .initial_indent("\t")
                    .subsequent_indent("\t"),
            );

            write!(f, "\n{text}")?;
        }

        Ok(())
    }
}
