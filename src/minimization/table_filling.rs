use std::collections::BTreeSet;

use bit_set::BitSet;
use itertools::Itertools;
use owo_colors::OwoColorize;
use tracing::trace;

use crate::{
    automaton::StateId,
    math::{Bijection, Partition},
    Show, DFA,
};

/// The distinguishability table of the table-filling algorithm. States are numbered in lexicographic
/// order, an additional sink state receives the number after the last state and stands in for missing
/// transitions: it is not final and loops on every symbol.
///
/// Only the lower triangle is stored, a pair `(p, q)` with `p > q` is marked if the two states are known
/// to be distinguishable. Unmarked pairs are assumed equivalent until [`TableFilling::refine`] has
/// reached its fixed point.
#[derive(Debug, Clone)]
pub struct TableFilling {
    indices: Bijection<StateId, usize>,
    successors: Vec<Vec<usize>>,
    sink: usize,
    distinguished: BitSet,
}

/// Position of the unordered pair `{p, q}` with `p != q` in the lower triangle.
fn pair(p: usize, q: usize) -> usize {
    let (hi, lo) = if p > q { (p, q) } else { (q, p) };
    hi * (hi - 1) / 2 + lo
}

impl TableFilling {
    /// Sets up the table for the given states of `dfa`, which should be closed under transitions. Pairs
    /// where exactly one of the states is final are marked right away.
    pub fn new(dfa: &DFA, states: &BTreeSet<StateId>) -> Self {
        let indices: Bijection<StateId, usize> = states.iter().cloned().zip(0..).collect();
        let sink = indices.len();
        let symbols = dfa.alphabet().universe().collect_vec();

        let mut successors = states
            .iter()
            .map(|q| {
                symbols
                    .iter()
                    .map(|sym| {
                        dfa.successor(q, sym)
                            .and_then(|p| indices.get_by_left(p))
                            .copied()
                            .unwrap_or(sink)
                    })
                    .collect_vec()
            })
            .collect_vec();
        successors.push(vec![sink; symbols.len()]);

        let accepting = |i: usize| {
            indices
                .get_by_right(&i)
                .is_some_and(|q| dfa.is_final(q))
        };
        let mut distinguished = BitSet::with_capacity(pair(sink + 1, 0));
        for hi in 1..=sink {
            for lo in 0..hi {
                if accepting(hi) != accepting(lo) {
                    distinguished.insert(pair(hi, lo));
                }
            }
        }

        Self {
            indices,
            successors,
            sink,
            distinguished,
        }
    }

    fn is_distinguished(&self, p: usize, q: usize) -> bool {
        p != q && self.distinguished.contains(pair(p, q))
    }

    /// Marks pairs until a fixed point is reached: an unmarked pair is marked as soon as one symbol
    /// leads the two states to a marked pair. Returns the number of passes over the table.
    pub fn refine(&mut self) -> usize {
        let mut passes = 0;
        loop {
            passes += 1;
            let mut changed = false;
            for hi in 1..=self.sink {
                for lo in 0..hi {
                    if self.is_distinguished(hi, lo) {
                        continue;
                    }
                    let separated = self.successors[hi]
                        .iter()
                        .zip(&self.successors[lo])
                        .any(|(&p, &q)| self.is_distinguished(p, q));
                    if separated {
                        self.distinguished.insert(pair(hi, lo));
                        changed = true;
                    }
                }
            }
            trace!("table filling pass {passes}, changed: {changed}");
            if !changed {
                return passes;
            }
        }
    }

    /// Returns `true` if `p` and `q` are not (yet) known to be distinguishable. States that are not part
    /// of the table are never equivalent to anything.
    pub fn equivalent(&self, p: &str, q: &str) -> bool {
        match (self.index(p), self.index(q)) {
            (Some(i), Some(j)) => !self.is_distinguished(i, j),
            _ => false,
        }
    }

    fn index(&self, state: &str) -> Option<usize> {
        self.indices.get_by_left(state).copied()
    }

    /// Groups the states into classes of mutually equivalent states. The sink never appears in a class.
    pub fn partition(&self) -> Partition<StateId> {
        let mut assigned = BitSet::with_capacity(self.sink);
        let mut classes = vec![];
        for i in 0..self.sink {
            if !assigned.insert(i) {
                continue;
            }
            let mut class = vec![i];
            for j in (i + 1)..self.sink {
                if !self.is_distinguished(i, j) && assigned.insert(j) {
                    class.push(j);
                }
            }
            classes.push(
                class
                    .into_iter()
                    .filter_map(|k| self.indices.get_by_right(&k).cloned())
                    .collect_vec(),
            );
        }
        Partition::new(classes)
    }
}

impl Show for TableFilling {
    /// Renders the lower triangle, `=` marks pairs that are still equivalent and `x` marks pairs
    /// that are distinguishable.
    fn show(&self) -> String {
        let mut b = tabled::builder::Builder::default();
        b.push_record(
            std::iter::once(String::new()).chain(
                (0..self.sink.saturating_sub(1))
                    .filter_map(|j| self.indices.get_by_right(&j).cloned()),
            ),
        );
        for i in 1..self.sink {
            let mut row = vec![self
                .indices
                .get_by_right(&i)
                .cloned()
                .unwrap_or_default()
                .bold()
                .to_string()];
            for j in 0..(self.sink - 1) {
                row.push(if j >= i {
                    String::new()
                } else if self.is_distinguished(i, j) {
                    "x".red().to_string()
                } else {
                    "=".green().to_string()
                });
            }
            b.push_record(row);
        }
        b.build().with(tabled::settings::Style::ascii()).to_string()
    }
}
