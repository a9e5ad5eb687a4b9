use std::collections::BTreeMap;

use tracing::debug;

use crate::{
    alphabet::Symbol,
    automaton::{Automaton, AutomatonBuilder, AutomatonError, AutomatonKind, MalformedAutomaton, StateId},
};

/// The targets of a transition in a [`RawAutomaton`], either a single state or a list of states.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum RawTargets {
    /// A single target state.
    One(StateId),
    /// Any number of target states.
    Many(Vec<StateId>),
}

impl RawTargets {
    fn into_vec(self) -> Vec<StateId> {
        match self {
            RawTargets::One(q) => vec![q],
            RawTargets::Many(qs) => qs,
        }
    }
}

/// A structural description of an automaton as it arrives from outside, e.g. in a JSON payload:
/// ```json
/// {
///   "type": "NFA",
///   "states": ["q0", "q1"],
///   "alphabet": ["0", "1"],
///   "transitions": { "q0": { "0": ["q0", "q1"], "1": "q0" } },
///   "start_state": "q0",
///   "accepting_states": ["q1"]
/// }
/// ```
/// The fields may also be called `kind`, `initial_state` and `final_states`. Nothing is checked until
/// [`RawAutomaton::build`] is called.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawAutomaton {
    /// Which kind of automaton is described.
    #[cfg_attr(feature = "serde", serde(alias = "type"))]
    pub kind: AutomatonKind,
    /// The declared states.
    pub states: Vec<StateId>,
    /// The declared symbols.
    pub alphabet: Vec<Symbol>,
    /// For every state and symbol, the targets. The empty string and `ε` denote epsilon transitions.
    #[cfg_attr(feature = "serde", serde(default))]
    pub transitions: BTreeMap<StateId, BTreeMap<Symbol, RawTargets>>,
    /// The initial state.
    #[cfg_attr(feature = "serde", serde(alias = "start_state"))]
    pub initial_state: StateId,
    /// The final states.
    #[cfg_attr(feature = "serde", serde(alias = "accepting_states", default))]
    pub final_states: Vec<StateId>,
}

impl RawAutomaton {
    /// Checks the description and builds the [`Automaton`] of the described kind. An empty list of targets
    /// means that there is no transition. For a DFA, a list with more than one target makes the description
    /// malformed.
    pub fn build(self) -> Result<Automaton, AutomatonError> {
        let kind = self.kind;
        let mut builder = AutomatonBuilder::default()
            .with_states(self.states)
            .with_alphabet(self.alphabet)
            .with_final_states(self.final_states);

        for (origin, row) in self.transitions {
            for (symbol, targets) in row {
                let targets = targets.into_vec();
                if kind == AutomatonKind::Dfa && targets.len() > 1 {
                    return Err(MalformedAutomaton::NonDeterministicTransition { origin, symbol }.into());
                }
                for target in targets {
                    builder.add_edge(origin.clone(), symbol.clone(), target);
                }
            }
        }

        let automaton = builder.into_automaton(kind, self.initial_state)?;
        debug!("validated {kind} description with {} states", automaton.size());
        Ok(automaton)
    }
}

impl TryFrom<RawAutomaton> for Automaton {
    type Error = AutomatonError;

    fn try_from(value: RawAutomaton) -> Result<Self, Self::Error> {
        value.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    fn raw(kind: AutomatonKind) -> RawAutomaton {
        RawAutomaton {
            kind,
            states: vec!["q0".into(), "q1".into()],
            alphabet: vec!["0".into(), "1".into()],
            transitions: BTreeMap::from([(
                "q0".to_string(),
                BTreeMap::from([
                    ("0".to_string(), RawTargets::Many(vec!["q1".into()])),
                    ("1".to_string(), RawTargets::One("q0".into())),
                ]),
            )]),
            initial_state: "q0".into(),
            final_states: vec!["q1".into()],
        }
    }

    #[test]
    fn builds_every_kind() {
        for kind in [AutomatonKind::Dfa, AutomatonKind::Nfa, AutomatonKind::Enfa] {
            let automaton = crate::validate_and_build(raw(kind)).unwrap();
            assert_eq!(automaton.kind(), kind);
            assert!(automaton.simulate("10").unwrap().accepted());
        }
    }

    #[test]
    fn dfa_with_several_targets_is_malformed() {
        let mut description = raw(AutomatonKind::Dfa);
        description
            .transitions
            .get_mut("q0")
            .unwrap()
            .insert("1".into(), RawTargets::Many(vec!["q0".into(), "q1".into()]));
        assert_eq!(
            Automaton::try_from(description.clone()),
            Err(MalformedAutomaton::NonDeterministicTransition {
                origin: "q0".into(),
                symbol: "1".into()
            }
            .into())
        );

        description.kind = AutomatonKind::Nfa;
        assert!(description.build().is_ok());
    }

    #[test]
    fn empty_target_lists_are_no_transitions() {
        let mut description = raw(AutomatonKind::Dfa);
        description.transitions.insert(
            "q1".into(),
            BTreeMap::from([("0".to_string(), RawTargets::Many(vec![]))]),
        );
        let dfa = description.build().unwrap();
        assert!(!dfa.simulate("00").unwrap().accepted());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn parses_payloads_with_type_and_start_state_fields() {
        let payload = r#"{
            "type": "ENFA",
            "states": ["q0", "q1", "q2"],
            "alphabet": ["0", "1"],
            "transitions": {
                "q0": {"": ["q1", "q2"], "0": ["q1"], "1": ["q0"]},
                "q1": {"1": ["q2"]},
                "q2": {"0": [], "1": []}
            },
            "start_state": "q0",
            "accepting_states": ["q2"]
        }"#;
        let description: RawAutomaton = serde_json::from_str(payload).unwrap();
        assert_eq!(description.kind, AutomatonKind::Enfa);
        let enfa = crate::validate_and_build(description).unwrap();
        assert_eq!(enfa, Automaton::from(crate::tests::scenario_c_enfa()));
        assert!(!enfa.simulate("110").unwrap().accepted());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn parses_payloads_with_descriptive_field_names() {
        let payload = r#"{
            "kind": "DFA",
            "states": ["q0", "q1"],
            "alphabet": ["0", "1"],
            "transitions": {
                "q0": {"0": "q0", "1": "q1"},
                "q1": {"0": "q0", "1": "q1"}
            },
            "initial_state": "q0",
            "final_states": ["q1"]
        }"#;
        let description: RawAutomaton = serde_json::from_str(payload).unwrap();
        let dfa = description.build().unwrap();
        assert_eq!(dfa, Automaton::from(crate::tests::scenario_a_dfa()));
        assert!(!dfa.simulate("000201").unwrap().accepted());

        let unknown_kind = payload.replace("\"DFA\"", "\"PDA\"");
        assert!(serde_json::from_str::<RawAutomaton>(&unknown_kind).is_err());
    }
}
