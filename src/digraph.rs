//! Digraph lookup for `<C-K>{char1}{char2}`.

use std::cell::OnceCell;
use std::collections::HashMap;

use crate::error::InputError;
use crate::input::KeySource;

/// Digraph table, built from the host's listing on first use.
///
/// The listing has the shape of Vim's `:digraphs` output, e.g.
/// `"a: ä 228  o: ö 246"`. Owners keep one of these for their lifetime
/// and hand it out by reference; the listing is never fetched twice.
#[derive(Debug, Default)]
pub struct Digraphs {
    table: OnceCell<HashMap<(char, char), char>>,
}

impl Digraphs {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table that is already loaded from `listing`.
    pub fn from_listing(listing: &str) -> Self {
        let digraphs = Self::new();
        digraphs.table(|| listing.to_owned());
        digraphs
    }

    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }

    /// Look up `c1 c2`, then `c2 c1`, and fall back to `c2`.
    pub fn find(&self, load: impl FnOnce() -> String, c1: char, c2: char) -> char {
        let table = self.table(load);
        table
            .get(&(c1, c2))
            .or_else(|| table.get(&(c2, c1)))
            .copied()
            .unwrap_or(c2)
    }

    /// Read two keys from `source` and return the digraph they form.
    ///
    /// A key that is not a plain character returns its notation right away,
    /// leaving anything after it unread.
    pub fn retrieve<S>(&self, source: &mut S, load: impl FnOnce() -> String) -> Result<String, InputError>
    where
        S: KeySource + ?Sized,
    {
        let first = source.read_key()?;
        let Some(c1) = first.as_char() else {
            return Ok(first.to_string());
        };
        let second = source.read_key()?;
        let Some(c2) = second.as_char() else {
            return Ok(second.to_string());
        };
        Ok(self.find(load, c1, c2).to_string())
    }

    fn table(&self, load: impl FnOnce() -> String) -> &HashMap<(char, char), char> {
        self.table.get_or_init(|| parse_listing(&load()))
    }
}

/// Parse `XY c N` triples out of a digraph listing, skipping anything else.
pub fn parse_listing(listing: &str) -> HashMap<(char, char), char> {
    let tokens: Vec<&str> = listing.split_whitespace().collect();
    let mut table = HashMap::new();
    let mut i = 0;
    while i + 2 < tokens.len() {
        let mut pair = tokens[i].chars();
        let mut glyph = tokens[i + 1].chars();
        let is_code = tokens[i + 2].bytes().all(|b| b.is_ascii_digit());
        match (pair.next(), pair.next(), pair.next(), glyph.next(), glyph.next()) {
            (Some(a), Some(b), None, Some(c), None) if is_code => {
                table.insert((a, b), c);
                i += 3;
            }
            _ => i += 1,
        }
    }
    tracing::debug!(target: "vim_prompt::digraph", entries = table.len(), "digraph table loaded");
    table
}
