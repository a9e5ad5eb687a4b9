use std::collections::BTreeSet;

use itertools::Itertools;

use crate::Show;

/// A symbol is a non-empty string, which may consist of more than one character.
pub type Symbol = String;

/// The reserved symbol that labels epsilon transitions. It may never be part of an [`Alphabet`].
pub const EPSILON: &str = "ε";

/// Returns `true` if `label` denotes an epsilon transition. Besides [`EPSILON`], the empty string
/// is understood as epsilon, as that is what JSON descriptions of automata commonly use.
pub fn is_epsilon(label: &str) -> bool {
    label.is_empty() || label == EPSILON
}

/// Represents an alphabet, i.e. a finite set of [`Symbol`]s.
///
/// # Example
/// Assume the alphabet consists of the symbols `"a"`, `"ab"` and `"b"`. Reading the word `"abab"` then
/// happens symbol by symbol, where at every position the shortest symbol that matches wins. So the word
/// is split into `"a"`, `"b"`, `"a"` and `"b"` and the symbol `"ab"` is never read. This
/// differs from a longest-match tokenizer on ambiguous alphabets.
/// ```
/// use automata_sim::prelude::*;
///
/// let alphabet = Alphabet::new(["a", "ab", "b"]);
/// let tokens: Vec<_> = alphabet.tokenize("abab").collect();
/// assert_eq!(tokens, vec![Ok("a"), Ok("b"), Ok("a"), Ok("b")]);
/// ```
#[derive(Clone, Hash, PartialEq, Eq, Debug, Default)]
pub struct Alphabet {
    symbols: BTreeSet<Symbol>,
    longest: usize,
}

impl Alphabet {
    /// Creates a new [`Alphabet`] from the given symbols, duplicates are removed.
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        symbols.into_iter().map(Into::into).collect()
    }

    /// Returns the number of symbols.
    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` if there are no symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Returns `true` if `symbol` is a symbol of the alphabet.
    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains(symbol)
    }

    /// Iterates over all symbols in lexicographic order.
    pub fn universe(&self) -> impl Iterator<Item = &Symbol> + '_ {
        self.symbols.iter()
    }

    /// The length (counted in characters) of the longest symbol.
    pub fn longest_symbol(&self) -> usize {
        self.longest
    }

    /// Finds the shortest symbol that `input` starts with at byte offset `position`. Candidates are
    /// tried with increasing length, so the first one that is contained in the alphabet is returned,
    /// even if a longer candidate would match as well. Returns `None` if no symbol matches or
    /// `position` is not a character boundary of `input`.
    pub fn match_at<'w>(&self, input: &'w str, position: usize) -> Option<&'w str> {
        let rest = input.get(position..)?;
        rest.char_indices()
            .map(|(offset, chr)| offset + chr.len_utf8())
            .take(self.longest)
            .map(|end| &rest[..end])
            .find(|candidate| self.symbols.contains(*candidate))
    }

    /// Splits `input` into symbols using [`Alphabet::match_at`]. The iterator yields `Err(position)` for
    /// the first byte offset at which no symbol matches and stops afterwards.
    pub fn tokenize<'a, 'w>(&'a self, input: &'w str) -> Tokens<'a, 'w> {
        Tokens {
            alphabet: self,
            input,
            position: 0,
            stuck: false,
        }
    }
}

impl<S: Into<Symbol>> FromIterator<S> for Alphabet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let symbols: BTreeSet<Symbol> = iter.into_iter().map(Into::into).collect();
        let longest = symbols
            .iter()
            .map(|sym| sym.chars().count())
            .max()
            .unwrap_or(0);
        Self { symbols, longest }
    }
}

impl Show for Alphabet {
    fn show(&self) -> String {
        format!("{{{}}}", self.symbols.iter().join(", "))
    }
}

/// Iterator over the symbols of a word, see [`Alphabet::tokenize`].
#[derive(Debug, Clone)]
pub struct Tokens<'a, 'w> {
    alphabet: &'a Alphabet,
    input: &'w str,
    position: usize,
    stuck: bool,
}

impl<'a, 'w> Iterator for Tokens<'a, 'w> {
    type Item = Result<&'w str, usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.stuck || self.position >= self.input.len() {
            return None;
        }
        match self.alphabet.match_at(self.input, self.position) {
            Some(symbol) => {
                self.position += symbol.len();
                Some(Ok(symbol))
            }
            None => {
                self.stuck = true;
                Some(Err(self.position))
            }
        }
    }
}

impl std::iter::FusedIterator for Tokens<'_, '_> {}
