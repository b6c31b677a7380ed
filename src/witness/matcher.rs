//! Deterministic automaton matcher
//!
//! Runs the automaton over the haystack and records the full state trajectory
//! of the accepting window, one `(curr, next)` step per consumed byte, plus the
//! capture bookkeeping carried by the transitions consumed.
//!
//! Window selection is leftmost-longest: candidate start offsets are scanned in
//! ascending order, and for a given start the automaton runs until it exits,
//! keeping the furthest step that landed on an accept state. The first start
//! with any accepting run wins; for that start, the longest run wins. A missing
//! transition mid-run is not an error — the consumed prefix is simply not part
//! of a match from that start.

use thiserror::Error;
use tracing::debug;

use crate::graph::Automaton;
use crate::types::CircuitProfile;

use super::trace::{TraceStep, WitnessTrace};

/// Witness construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WitnessError {
    #[error("haystack is {len} bytes but the circuit accepts at most {max} (max_haystack_len)")]
    InputTooLong { len: usize, max: usize },

    #[error("matched window is {len} bytes but the circuit accepts at most {max} (max_match_len)")]
    MatchTooLong { len: usize, max: usize },

    #[error("the automaton never reaches an accept state on this haystack")]
    NoMatch,
}

/// Run the automaton over `haystack` and build the witness trace
///
/// Pure function of `(automaton, haystack, profile)`: identical inputs yield a
/// byte-identical trace. A match must consume at least one byte.
pub fn match_haystack(
    automaton: &Automaton,
    haystack: &[u8],
    profile: &CircuitProfile,
) -> Result<WitnessTrace, WitnessError> {
    if haystack.len() > profile.max_haystack_len {
        return Err(WitnessError::InputTooLong {
            len: haystack.len(),
            max: profile.max_haystack_len,
        });
    }

    for start in 0..haystack.len() {
        if let Some(steps) = accepting_run(automaton, &haystack[start..]) {
            debug!(start, length = steps.len(), "accepting window selected");
            return Ok(finish_trace(automaton, haystack, start, steps));
        }
    }

    Err(WitnessError::NoMatch)
}

/// Longest accepting run from one start offset, as recorded steps
///
/// Returns `None` if no prefix of `bytes` ends in an accept state. The run is
/// recorded as it is consumed and truncated back to the furthest accept.
fn accepting_run(automaton: &Automaton, bytes: &[u8]) -> Option<Vec<TraceStep>> {
    let mut steps = Vec::new();
    let mut state = automaton.start_state();
    let mut accepted_len = 0usize;

    for &byte in bytes {
        let Some(transition) = automaton.next_transition(state, byte) else {
            // Exited to the implicit sink; the run ends here.
            break;
        };
        steps.push(TraceStep {
            curr: state,
            next: transition.to,
            capture_ids: transition.captures.iter().map(|c| c.group()).collect(),
            capture_starts: transition
                .captures
                .iter()
                .filter(|c| c.is_start())
                .map(|c| c.group())
                .collect(),
        });
        state = transition.to;
        if automaton.is_accept(state) {
            accepted_len = steps.len();
        }
    }

    if accepted_len == 0 {
        return None;
    }
    steps.truncate(accepted_len);
    Some(steps)
}

fn finish_trace(
    automaton: &Automaton,
    haystack: &[u8],
    start: usize,
    steps: Vec<TraceStep>,
) -> WitnessTrace {
    let mut capture_start_indices = vec![None; automaton.num_capture_groups()];
    for (i, step) in steps.iter().enumerate() {
        for &group in &step.capture_starts {
            let slot = &mut capture_start_indices[(group - 1) as usize];
            if slot.is_none() {
                *slot = Some(start + i);
            }
        }
    }

    WitnessTrace {
        haystack: haystack.to_vec(),
        match_start: start,
        match_length: steps.len(),
        steps,
        capture_start_indices,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use crate::graph::{AutomatonGraph, CaptureRef, Transition};

    use super::*;

    /// `a+b` with the `a+` run captured as group 1
    fn aplusb() -> Automaton {
        let graph = AutomatonGraph {
            pattern: Some("(a+)b".to_string()),
            start_state: 1,
            accept_states: BTreeSet::from([3]),
            num_capture_groups: 1,
            transitions: vec![
                Transition {
                    from: 1,
                    to: 2,
                    ranges: vec![(b'a', b'a')],
                    captures: vec![CaptureRef(1, true)],
                },
                Transition {
                    from: 2,
                    to: 2,
                    ranges: vec![(b'a', b'a')],
                    captures: vec![CaptureRef(1, false)],
                },
                Transition {
                    from: 2,
                    to: 3,
                    ranges: vec![(b'b', b'b')],
                    captures: vec![],
                },
            ],
        };
        Automaton::from_graph(graph).unwrap()
    }

    fn profile() -> CircuitProfile {
        CircuitProfile::new(64, 16).unwrap()
    }

    #[test]
    fn finds_leftmost_match() {
        let automaton = aplusb();
        let trace = match_haystack(&automaton, b"xxaab..ab", &profile()).unwrap();
        assert_eq!(trace.match_start, 2);
        assert_eq!(trace.match_length, 3);
        assert_eq!(trace.matched_bytes(), b"aab");
    }

    #[test]
    fn records_one_step_per_matched_byte() {
        let automaton = aplusb();
        let trace = match_haystack(&automaton, b"aaab", &profile()).unwrap();
        assert_eq!(trace.steps.len(), trace.match_length);
        assert_eq!(trace.steps[0].curr, 1);
        assert_eq!(trace.steps[0].next, 2);
        assert_eq!(trace.steps[3].next, 3);
        // Chain: each step's next is the following step's curr.
        for pair in trace.steps.windows(2) {
            assert_eq!(pair[0].next, pair[1].curr);
        }
    }

    #[test]
    fn tracks_capture_span_and_start() {
        let automaton = aplusb();
        let trace = match_haystack(&automaton, b"..aaab.", &profile()).unwrap();
        assert_eq!(trace.capture_start_indices, vec![Some(2)]);
        assert_eq!(trace.captured_bytes(1).unwrap(), b"aaa");
        assert!(trace.steps[0].starts_group(1));
        assert!(trace.steps[1].in_group(1));
        assert!(!trace.steps[3].in_group(1));
    }

    #[test]
    fn dead_end_prefix_is_not_an_error() {
        // "aa" from start 0 consumes transitions but never accepts; the match
        // is found at a later start.
        let automaton = aplusb();
        let trace = match_haystack(&automaton, b"aa.ab", &profile()).unwrap();
        assert_eq!(trace.match_start, 3);
        assert_eq!(trace.matched_bytes(), b"ab");
    }

    #[test]
    fn no_match_is_a_hard_failure() {
        let automaton = aplusb();
        assert_eq!(
            match_haystack(&automaton, b"bbbb", &profile()),
            Err(WitnessError::NoMatch)
        );
        assert_eq!(
            match_haystack(&automaton, b"", &profile()),
            Err(WitnessError::NoMatch)
        );
    }

    #[test]
    fn oversized_haystack_is_rejected_before_matching() {
        let automaton = aplusb();
        let haystack = vec![b'a'; 65];
        assert_eq!(
            match_haystack(&automaton, &haystack, &profile()),
            Err(WitnessError::InputTooLong { len: 65, max: 64 })
        );
    }

    #[test]
    fn identical_inputs_yield_identical_traces() {
        let automaton = aplusb();
        let first = match_haystack(&automaton, b"x aaab y", &profile()).unwrap();
        let second = match_haystack(&automaton, b"x aaab y", &profile()).unwrap();
        assert_eq!(first, second);
    }
}
