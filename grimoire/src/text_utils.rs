use colored::{ColoredString, Colorize};
use itertools::Itertools;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_till1},
    combinator::{all_consuming, map},
    multi::many0,
    IResult,
};
use nom::sequence::delimited;
use std::fmt::Write;

/// Lowercases each whitespace-separated word and capitalizes its first
/// character, leaving punctuation in place: `"lim-dûl's vault"` becomes
/// `"Lim-dûl's Vault"`.
#[must_use]
pub fn title_case(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .join(" ")
}

pub trait SymbolText {
    fn to_console(&self) -> String;
}

impl SymbolText for str {
    /// Renders `{W}`-style symbol braces in color. Input that does not
    /// parse is returned unchanged.
    fn to_console(&self) -> String {
        let Ok(pieces) = to_pieces(self) else {
            return self.into();
        };

        let mut buffer = String::new();

        for piece in pieces {
            let Ok(()) = (match piece {
                Piece::Text(text) => write!(buffer, "{text}"),
                Piece::Symbol(symbol) => write!(buffer, "{}", colorize_symbol(symbol)),
            }) else {
                return self.into();
            };
        }

        buffer
    }
}

fn colorize_symbol(symbol: &str) -> ColoredString {
    let braced = format!("{{{symbol}}}");
    match symbol {
        "W" => braced.bright_yellow(),
        "U" => braced.bright_blue(),
        // black mana would be invisible on dark terminals
        "B" => braced.bright_magenta(),
        "R" => braced.bright_red(),
        "G" => braced.green(),
        "C" | "S" => braced.bright_white(),
        "T" | "Q" => braced.cyan(),
        // numerals, {X}, hybrid and Phyrexian costs
        _ => braced.normal(),
    }
}

// ====================
// Parser from symbol braces to text pieces
// ====================

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum Piece<'s> {
    Text(&'s str),
    Symbol(&'s str),
}

fn parse_symbol(i: &str) -> IResult<&str, Piece<'_>> {
    let braces = delimited(tag("{"), take_till1(|c| c == '}'), tag("}"));
    map(braces, Piece::Symbol)(i)
}

fn parse_text(i: &str) -> IResult<&str, Piece<'_>> {
    map(take_till1(|c| c == '{'), Piece::Text)(i)
}

fn parse_body(i: &str) -> IResult<&str, Vec<Piece<'_>>> {
    many0(alt((parse_symbol, parse_text)))(i)
}

fn to_pieces(i: &str) -> Result<Vec<Piece<'_>>, &str> {
    all_consuming(parse_body)(i).map(|(_, pieces)| pieces).map_err(|_| i)
}

#[cfg(test)]
mod symbol_tests {
    use super::*;
    use Piece as P;

    #[test]
    fn test_tap_for_green() -> Result<(), String> {
        let input = "({T}: Add {G}.)";
        let case = to_pieces(input)?;
        let expected = vec![
            P::Text("("),
            P::Symbol("T"),
            P::Text(": Add "),
            P::Symbol("G"),
            P::Text(".)"),
        ];

        assert_eq!(case, expected);
        Ok(())
    }

    #[test]
    fn test_hybrid_and_numeric_costs() -> Result<(), String> {
        let input = "{2}{W/U}{X}";
        let case = to_pieces(input)?;
        let expected = vec![P::Symbol("2"), P::Symbol("W/U"), P::Symbol("X")];

        assert_eq!(case, expected);
        Ok(())
    }

    #[test]
    fn test_unterminated_brace_is_left_alone() {
        let input = "costs {2} more to cast {";
        assert!(to_pieces(input).is_err());
        assert_eq!(input.to_console(), input);
    }

    #[test]
    fn test_plain_text_passes_through() -> Result<(), String> {
        let input = "Flying, vigilance";
        let case = to_pieces(input)?;

        assert_eq!(case, vec![P::Text("Flying, vigilance")]);
        Ok(())
    }
}

#[cfg(test)]
mod title_case_tests {
    use super::title_case;

    #[test]
    fn capitalizes_each_word() {
        assert_eq!(title_case("lightning bolt"), "Lightning Bolt");
        assert_eq!(title_case("LIGHTNING BOLT"), "Lightning Bolt");
        assert_eq!(title_case("akroma, angel of wrath"), "Akroma, Angel Of Wrath");
    }

    #[test]
    fn preserves_punctuation() {
        assert_eq!(title_case("lim-dûl's vault"), "Lim-dûl's Vault");
        assert_eq!(title_case("fire // ice"), "Fire // Ice");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(title_case("  black   lotus "), "Black Lotus");
        assert_eq!(title_case(""), "");
    }
}
