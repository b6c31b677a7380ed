//! Deterministic transition lookup
//!
//! Flattens the byte-range transition list into a `(state, byte)` -> transition
//! index map, so the matcher pays a single hash lookup per consumed byte.
//! Building the table also proves the graph deterministic: any byte claimed by
//! two transitions out of the same state is rejected.

use std::collections::HashMap;

use super::{AutomatonGraph, GraphError, StateId};

/// Dense lookup over a graph's transitions, built once at load time
#[derive(Clone, Debug, Default)]
pub struct TransitionTable {
    map: HashMap<(StateId, u8), usize>,
}

impl TransitionTable {
    /// Flatten a graph's byte ranges into the lookup map
    pub fn build(graph: &AutomatonGraph) -> Result<Self, GraphError> {
        let mut map = HashMap::new();
        for (idx, transition) in graph.transitions.iter().enumerate() {
            for &(lo, hi) in &transition.ranges {
                if lo > hi {
                    return Err(GraphError::EmptyByteRange {
                        from: transition.from,
                        lo,
                        hi,
                    });
                }
                for byte in lo..=hi {
                    if map.insert((transition.from, byte), idx).is_some() {
                        return Err(GraphError::Nondeterministic {
                            state: transition.from,
                            byte,
                        });
                    }
                }
            }
        }
        Ok(Self { map })
    }

    /// Index of the transition consuming `byte` in `state`, if one exists
    pub fn lookup(&self, state: StateId, byte: u8) -> Option<usize> {
        self.map.get(&(state, byte)).copied()
    }

    /// Number of `(state, byte)` pairs with an outgoing transition
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
