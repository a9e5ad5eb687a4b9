use std::fmt::Display;

use itertools::Itertools;
use tracing::trace;

use crate::{
    alphabet::Symbol,
    automaton::{on_kind, Automaton, FiniteAutomaton, Semantics, StateId},
    run::RunPath,
};

/// Turns a state label into a DOT identifier. Labels are arbitrary strings, so they are always quoted.
fn quote_dot_ident(name: &str) -> String {
    format!("\"{}\"", escape(name))
}

fn escape(text: &str) -> String {
    text.chars()
        .flat_map(|chr| match chr {
            '"' | '\\' => vec!['\\', chr],
            '\n' => vec!['\\', 'n'],
            c => vec![c],
        })
        .collect()
}

/// Node that points to the initial state.
const START_NODE: &str = "__start";

/// Implementors can be written in the graphviz DOT format, for more information on the format
/// see the [graphviz documentation](https://graphviz.org/doc/info/lang.html). Only the text is
/// produced, rendering it is left to the caller.
pub trait Dottable {
    /// The name of the digraph.
    fn dot_name(&self) -> String;

    /// Statements that are placed before all nodes and edges.
    fn dot_header_statements(&self) -> Vec<String> {
        vec!["rankdir=LR".to_string()]
    }

    /// Every node together with its attributes.
    fn dot_states(&self) -> Vec<(StateId, Vec<DotStateAttribute>)>;

    /// The state the invisible start node points to.
    fn dot_initial(&self) -> &StateId;

    /// Every edge `(origin, symbol, target)`.
    fn dot_edges(&self) -> Vec<(&StateId, &Symbol, &StateId)>;

    /// Compute the DOT representation.
    fn dot_representation(&self) -> String {
        self.render_dot(None)
    }

    /// Compute the DOT representation, where every step of `path` is drawn as an additional green
    /// edge labelled with the number of the step.
    fn dot_with_path(&self, path: &RunPath) -> String {
        self.render_dot(Some(path))
    }

    /// Assembles the digraph, see [`Dottable::dot_representation`] and [`Dottable::dot_with_path`].
    fn render_dot(&self, path: Option<&RunPath>) -> String {
        let header = std::iter::once(format!("digraph {} {{", quote_dot_ident(&self.dot_name())))
            .chain(self.dot_header_statements());

        let start = [
            format!(
                "{START_NODE} [{}]",
                [
                    DotStateAttribute::Shape("none".into()),
                    DotStateAttribute::Label(String::new())
                ]
                .iter()
                .join(", ")
            ),
            format!(
                "{START_NODE} -> {} [{}]",
                quote_dot_ident(self.dot_initial()),
                DotTransitionAttribute::Label("start".into())
            ),
        ];

        let states = self.dot_states().into_iter().map(|(q, attributes)| {
            format!("{} [{}]", quote_dot_ident(&q), attributes.iter().join(", "))
        });

        let transitions = self.dot_edges().into_iter().map(|(p, a, q)| {
            format!(
                "{} -> {} [{}]",
                quote_dot_ident(p),
                quote_dot_ident(q),
                DotTransitionAttribute::Label(escape(a))
            )
        });

        let highlighted = path
            .into_iter()
            .flat_map(|path| path.steps().enumerate())
            .map(|(i, (p, q))| {
                format!(
                    "{} -> {} [{}]",
                    quote_dot_ident(p),
                    quote_dot_ident(q),
                    [
                        DotTransitionAttribute::Label(format!("[{}]", i + 1)),
                        DotTransitionAttribute::Color("green".into()),
                        DotTransitionAttribute::FontColor("blue".into()),
                    ]
                    .iter()
                    .join(", ")
                )
            });

        let dot = header
            .chain(start)
            .chain(states)
            .chain(transitions)
            .chain(highlighted)
            .chain(std::iter::once("}".to_string()))
            .join("\n");
        trace!("computed dot representation\n{dot}");
        dot
    }
}

impl<S: Semantics> Dottable for FiniteAutomaton<S> {
    fn dot_name(&self) -> String {
        S::KIND.to_string()
    }

    fn dot_states(&self) -> Vec<(StateId, Vec<DotStateAttribute>)> {
        self.states()
            .iter()
            .map(|q| {
                let shape = if self.is_final(q) {
                    "doublecircle"
                } else {
                    "circle"
                };
                (
                    q.clone(),
                    vec![
                        DotStateAttribute::Shape(shape.into()),
                        DotStateAttribute::Label(escape(q)),
                    ],
                )
            })
            .collect()
    }

    fn dot_initial(&self) -> &StateId {
        self.initial_state()
    }

    fn dot_edges(&self) -> Vec<(&StateId, &Symbol, &StateId)> {
        self.edges().collect()
    }
}

impl Dottable for Automaton {
    fn dot_name(&self) -> String {
        on_kind!(self, a => a.dot_name())
    }

    fn dot_states(&self) -> Vec<(StateId, Vec<DotStateAttribute>)> {
        on_kind!(self, a => a.dot_states())
    }

    fn dot_initial(&self) -> &StateId {
        self.initial_state()
    }

    fn dot_edges(&self) -> Vec<(&StateId, &Symbol, &StateId)> {
        self.edges()
    }
}

/// Enum that abstracts attributes of nodes in the DOT format.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DotStateAttribute {
    /// The label of a node
    Label(String),
    /// The shape of a node
    Shape(String),
    /// The color of a node
    Color(String),
}

impl Display for DotStateAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DotStateAttribute::Label(s) => write!(f, "label=\"{s}\""),
            DotStateAttribute::Shape(s) => write!(f, "shape=\"{s}\""),
            DotStateAttribute::Color(c) => write!(f, "color=\"{c}\""),
        }
    }
}

/// Enum that abstracts attributes of edges in the DOT format.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DotTransitionAttribute {
    /// The label of an edge
    Label(String),
    /// The color of an edge
    Color(String),
    /// The color of the label of an edge
    FontColor(String),
}

impl Display for DotTransitionAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DotTransitionAttribute::Label(lbl) => write!(f, "label=\"{lbl}\""),
            DotTransitionAttribute::Color(c) => write!(f, "color=\"{c}\""),
            DotTransitionAttribute::FontColor(c) => write!(f, "fontcolor=\"{c}\""),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{prelude::*, tests::*};

    #[test]
    fn dfa_dot_marks_final_and_initial_states() {
        let dot = scenario_a_dfa().dot_representation();
        assert!(dot.starts_with("digraph \"DFA\" {"));
        assert!(dot.ends_with('}'));
        assert!(dot.contains("\"q1\" [shape=\"doublecircle\", label=\"q1\"]"));
        assert!(dot.contains("\"q0\" [shape=\"circle\", label=\"q0\"]"));
        assert!(dot.contains("__start -> \"q0\" [label=\"start\"]"));
        assert!(dot.contains("\"q0\" -> \"q1\" [label=\"1\"]"));
        assert!(!dot.contains("green"));
    }

    #[test]
    fn enfa_dot_labels_epsilon_edges() {
        let dot = Automaton::from(scenario_c_enfa()).dot_representation();
        assert!(dot.starts_with("digraph \"ENFA\" {"));
        assert!(dot.contains(&format!("\"q0\" -> \"q1\" [label=\"{EPSILON}\"]")));
        assert!(dot.contains(&format!("\"q0\" -> \"q2\" [label=\"{EPSILON}\"]")));
    }

    #[test]
    fn path_steps_are_highlighted() {
        let nfa = scenario_b_nfa();
        let run = nfa.simulate("1100").unwrap();
        let dot = nfa.dot_with_path(run.path().unwrap());
        assert!(dot.contains(
            "\"q1\" -> \"q2\" [label=\"[4]\", color=\"green\", fontcolor=\"blue\"]"
        ));
        assert_eq!(dot.matches("color=\"green\"").count(), 4);
    }

    #[test]
    fn labels_are_escaped() {
        let dfa = DFA::builder()
            .with_states(["say \"hi\""])
            .with_alphabet(["a"])
            .into_dfa("say \"hi\"")
            .unwrap();
        assert!(dfa
            .dot_representation()
            .contains("\"say \\\"hi\\\"\" [shape=\"circle\", label=\"say \\\"hi\\\"\"]"));
    }
}
