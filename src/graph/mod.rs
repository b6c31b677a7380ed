//! Automaton graph model
//!
//! The graph is produced by an external regex compiler and arrives as a JSON
//! document: a start state, a set of accept states, and byte-range transitions
//! carrying capture-group annotations. It is consumed strictly read-only; one
//! loaded [`Automaton`] can back any number of concurrent matches.
//!
//! State id 0 is reserved as the uniform "inactive / padding" sentinel used by
//! the fixed-width encoder, so validation rejects any graph that uses 0 as a
//! real state.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod lookup;

pub use lookup::TransitionTable;

/// Automaton state identifier
pub type StateId = u32;

/// Graph loading and validation errors
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("failed to read automaton graph from {}: {source}", .path.display())]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse automaton graph: {0}")]
    Json(#[from] serde_json::Error),

    #[error("graph has no accept states")]
    NoAcceptStates,

    #[error("state 0 is reserved as the padding sentinel but appears as {0}")]
    ReservedStateZero(String),

    #[error("empty byte range [{lo}, {hi}] on transition from state {from}")]
    EmptyByteRange { from: StateId, lo: u8, hi: u8 },

    #[error("nondeterministic graph: byte {byte} is claimed by two transitions out of state {state}")]
    Nondeterministic { state: StateId, byte: u8 },

    #[error(
        "transition from state {from} references capture group {group}, \
         but the graph declares {declared} group(s)"
    )]
    InvalidCaptureGroup {
        from: StateId,
        group: u32,
        declared: usize,
    },
}

/// Capture-group annotation on a transition: `(group id, start-of-span flag)`
///
/// Group ids are 1-based; `is_start` marks the first transition of the span.
/// Serialized as a two-element array, e.g. `[1, true]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRef(pub u32, pub bool);

impl CaptureRef {
    pub fn group(&self) -> u32 {
        self.0
    }

    pub fn is_start(&self) -> bool {
        self.1
    }
}

/// A labeled edge: consume any byte in `ranges` to move `from` -> `to`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: StateId,
    pub to: StateId,
    /// Inclusive `[lo, hi]` byte ranges; the transition fires for any of them
    pub ranges: Vec<(u8, u8)>,
    /// Capture groups whose span contains this transition
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub captures: Vec<CaptureRef>,
}

impl Transition {
    /// Whether this transition lies inside `group`'s span
    pub fn in_group(&self, group: u32) -> bool {
        self.captures.iter().any(|c| c.group() == group)
    }

    /// Whether this transition starts `group`'s span
    pub fn starts_group(&self, group: u32) -> bool {
        self.captures.iter().any(|c| c.group() == group && c.is_start())
    }
}

/// Raw automaton graph as serialized by the external regex compiler
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomatonGraph {
    /// Source pattern, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    pub start_state: StateId,
    pub accept_states: BTreeSet<StateId>,
    pub num_capture_groups: usize,
    pub transitions: Vec<Transition>,
}

impl AutomatonGraph {
    /// Structural validation: accept set non-empty, sentinel 0 unused,
    /// capture group ids within the declared count
    pub fn validate(&self) -> Result<(), GraphError> {
        if self.accept_states.is_empty() {
            return Err(GraphError::NoAcceptStates);
        }
        if self.start_state == 0 {
            return Err(GraphError::ReservedStateZero("the start state".to_string()));
        }
        if self.accept_states.contains(&0) {
            return Err(GraphError::ReservedStateZero("an accept state".to_string()));
        }
        for transition in &self.transitions {
            if transition.from == 0 || transition.to == 0 {
                return Err(GraphError::ReservedStateZero(format!(
                    "a transition endpoint ({} -> {})",
                    transition.from, transition.to
                )));
            }
            for capture in &transition.captures {
                let group = capture.group();
                if group == 0 || group as usize > self.num_capture_groups {
                    return Err(GraphError::InvalidCaptureGroup {
                        from: transition.from,
                        group,
                        declared: self.num_capture_groups,
                    });
                }
            }
        }
        Ok(())
    }
}

/// A validated graph plus its transition lookup table
///
/// This is the form the matcher consumes. Construction validates the graph and
/// builds the `(state, byte)` lookup once; afterwards the automaton is
/// immutable and shareable.
#[derive(Clone, Debug)]
pub struct Automaton {
    graph: AutomatonGraph,
    table: TransitionTable,
}

impl Automaton {
    /// Validate a graph and build its lookup table
    pub fn from_graph(graph: AutomatonGraph) -> Result<Self, GraphError> {
        graph.validate()?;
        let table = TransitionTable::build(&graph)?;
        Ok(Self { graph, table })
    }

    /// Parse and validate a graph from its JSON serialization
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let graph: AutomatonGraph = serde_json::from_str(json)?;
        Self::from_graph(graph)
    }

    /// Load a graph file written by the external regex compiler
    pub fn load(path: &Path) -> Result<Self, GraphError> {
        let json = fs::read_to_string(path).map_err(|source| GraphError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// The transition consuming `byte` in `state`, if the graph has one
    pub fn next_transition(&self, state: StateId, byte: u8) -> Option<&Transition> {
        self.table
            .lookup(state, byte)
            .map(|idx| &self.graph.transitions[idx])
    }

    pub fn is_accept(&self, state: StateId) -> bool {
        self.graph.accept_states.contains(&state)
    }

    pub fn start_state(&self) -> StateId {
        self.graph.start_state
    }

    pub fn num_capture_groups(&self) -> usize {
        self.graph.num_capture_groups
    }

    pub fn pattern(&self) -> Option<&str> {
        self.graph.pattern.as_deref()
    }

    /// The underlying serialized form
    pub fn graph(&self) -> &AutomatonGraph {
        &self.graph
    }
}
