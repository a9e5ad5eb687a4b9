use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;

use crate::{automaton::StateId, Show};

/// A sequence of states that an automaton passes through while reading a word. The first state is the initial
/// state, each further state is reached by reading one more symbol.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct RunPath(Vec<StateId>);

impl RunPath {
    /// The visited states in order.
    pub fn states(&self) -> &[StateId] {
        &self.0
    }

    /// Iterates over consecutive pairs of states, i.e. over the steps of the run.
    pub fn steps(&self) -> impl Iterator<Item = (&StateId, &StateId)> + '_ {
        self.0.iter().tuple_windows()
    }

    /// Consumes `self` and returns the visited states.
    pub fn into_states(self) -> Vec<StateId> {
        self.0
    }
}

impl std::ops::Deref for RunPath {
    type Target = [StateId];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<StateId>> for RunPath {
    fn from(value: Vec<StateId>) -> Self {
        Self(value)
    }
}

impl<S: Into<StateId>> FromIterator<S> for RunPath {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a RunPath {
    type Item = &'a StateId;
    type IntoIter = std::slice::Iter<'a, StateId>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Show for RunPath {
    fn show(&self) -> String {
        self.0.iter().join(" -> ")
    }
}

/// The outcome of running an automaton on some word: whether the word is accepted and, if one could be
/// determined, a path of visited states.
///
/// The path of a rejected word is a diagnostic trace, it does not witness anything. For deterministic automata
/// it contains the states up to the point where reading stopped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Run {
    accepted: bool,
    path: Option<RunPath>,
}

impl Run {
    /// Creates a new run.
    pub fn new(accepted: bool, path: Option<RunPath>) -> Self {
        Self { accepted, path }
    }

    /// A rejecting run with the given diagnostic path.
    pub fn rejected(path: Option<RunPath>) -> Self {
        Self::new(false, path)
    }

    /// Whether the word is accepted.
    pub fn accepted(&self) -> bool {
        self.accepted
    }

    /// The reconstructed path, if there is one.
    pub fn path(&self) -> Option<&RunPath> {
        self.path.as_ref()
    }

    /// The states of the path, which is empty if there is no path.
    pub fn states(&self) -> &[StateId] {
        self.path.as_ref().map(RunPath::states).unwrap_or_default()
    }

    /// Splits `self` into the verdict and the path.
    pub fn into_parts(self) -> (bool, Option<RunPath>) {
        (self.accepted, self.path)
    }
}

/// Records, for one step of a nondeterministic run, which states each of the states that were active before
/// the step leads to.
pub type Frontier = BTreeMap<StateId, BTreeSet<StateId>>;

/// The frontiers of all steps of a nondeterministic run, from which a concrete [`RunPath`] can be recovered.
/// A history belongs to exactly one simulation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunHistory(Vec<Frontier>);

impl RunHistory {
    /// Appends the frontier of the next step.
    pub fn push(&mut self, frontier: Frontier) {
        self.0.push(frontier);
    }

    /// The number of recorded steps.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no step was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All recorded frontiers in order.
    pub fn frontiers(&self) -> &[Frontier] {
        &self.0
    }

    /// Reconstructs one path through the recorded steps, going backwards from the last one.
    ///
    /// In the last frontier, the first target (in the order of the frontier) that is final is picked, if no
    /// target is final the first target is picked. Then every earlier frontier contributes the first
    /// state whose targets contain the state picked after it. The result is reversed, and if it does not
    /// start in `initial` (which happens when the first state was reached through epsilon transitions),
    /// `initial` is put in front.
    ///
    /// An empty history gives the path consisting only of `initial`. Returns `None` if the last
    /// frontier has no targets at all or the frontiers do not connect.
    pub fn reconstruct(
        &self,
        initial: &StateId,
        final_states: &BTreeSet<StateId>,
    ) -> Option<RunPath> {
        let Some(last) = self.0.last() else {
            return Some(RunPath(vec![initial.clone()]));
        };

        let targets = || last.values().flatten();
        let mut current = targets()
            .find(|q| final_states.contains(*q))
            .or_else(|| targets().next())?;

        let mut backwards = vec![current.clone()];
        for frontier in self.0.iter().rev() {
            current = frontier
                .iter()
                .find(|(_, targets)| targets.contains(current))
                .map(|(origin, _)| origin)?;
            backwards.push(current.clone());
        }

        if backwards.last() != Some(initial) {
            backwards.push(initial.clone());
        }
        backwards.reverse();
        Some(RunPath(backwards))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frontier<const N: usize>(entries: [(&str, Vec<&str>); N]) -> Frontier {
        entries
            .into_iter()
            .map(|(q, ps)| (q.to_string(), ps.into_iter().map(String::from).collect()))
            .collect()
    }

    fn finals<const N: usize>(states: [&str; N]) -> BTreeSet<StateId> {
        states.into_iter().map(String::from).collect()
    }

    #[test]
    fn empty_history_is_initial_state() {
        let path = RunHistory::default().reconstruct(&"q0".to_string(), &finals([]));
        assert_eq!(path, Some(RunPath::from_iter(["q0"])));
    }

    #[test]
    fn prefers_final_targets() {
        let mut history = RunHistory::default();
        history.push(frontier([("q0", vec!["q0", "q1"])]));
        history.push(frontier([("q0", vec!["q0", "q1"]), ("q1", vec!["q2"])]));
        let path = history
            .reconstruct(&"q0".to_string(), &finals(["q2"]))
            .unwrap();
        assert_eq!(path.states(), ["q0", "q1", "q2"]);
        assert_eq!(path.show(), "q0 -> q1 -> q2");
        assert_eq!(path.steps().count(), 2);
    }

    #[test]
    fn falls_back_to_first_target() {
        let mut history = RunHistory::default();
        history.push(frontier([("q0", vec!["q0", "q1"])]));
        history.push(frontier([("q0", vec![]), ("q1", vec!["q1", "q3"])]));
        let path = history
            .reconstruct(&"q0".to_string(), &finals(["q2"]))
            .unwrap();
        assert_eq!(path.states(), ["q0", "q1", "q1"]);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn epsilon_reached_start_is_prefixed_with_initial() {
        let mut history = RunHistory::default();
        history.push(frontier([("q0", vec![]), ("q1", vec!["q2"])]));
        let path = history
            .reconstruct(&"q0".to_string(), &finals(["q2"]))
            .unwrap();
        assert_eq!(path.states(), ["q0", "q1", "q2"]);
    }

    #[test]
    fn dead_frontier_has_no_path() {
        let mut history = RunHistory::default();
        history.push(frontier([("q0", vec![])]));
        assert_eq!(history.reconstruct(&"q0".to_string(), &finals([])), None);
    }

    #[test]
    fn run_accessors() {
        let run = Run::rejected(None);
        assert!(!run.accepted());
        assert!(run.states().is_empty());
        let (accepted, path) = Run::new(true, Some(RunPath::from_iter(["a"]))).into_parts();
        assert!(accepted);
        assert_eq!(path.unwrap().into_states(), vec!["a".to_string()]);
    }
}
