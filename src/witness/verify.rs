//! Witness consistency checking
//!
//! Replays the circuit's constraints in-process against the automaton graph:
//! array shapes, window bounds, state chaining, transition membership, accept
//! state, capture consistency, clean padding. The pipeline runs this before
//! handing inputs to a backend so a witness-construction bug surfaces as a
//! precise local error instead of an opaque unsatisfied-constraint failure,
//! and the mock backend uses it as its execution step.

use thiserror::Error;

use crate::graph::{Automaton, StateId};
use crate::types::CircuitProfile;

use super::encode::CircuitInputs;

/// Constraint violations found in encoded circuit inputs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    #[error("{field} has {len} entries, expected {expected}")]
    BadShape {
        field: &'static str,
        len: usize,
        expected: usize,
    },

    #[error("{field}[{index}] = {value:?} is not a valid field element")]
    BadFieldElement {
        field: &'static str,
        index: usize,
        value: String,
    },

    #[error("in_haystack[{index}] = {value} is not a byte")]
    ByteOutOfRange { index: usize, value: u64 },

    #[error("haystack_len {len} exceeds max_haystack_len {max}")]
    HaystackLenOutOfRange { len: u64, max: usize },

    #[error("match_length {len} exceeds max_match_len {max}")]
    MatchLenOutOfRange { len: u64, max: usize },

    #[error("match window [{start}, {start}+{length}) does not fit in haystack of length {haystack_len}")]
    WindowOutOfBounds {
        start: u64,
        length: u64,
        haystack_len: u64,
    },

    #[error("match window is empty")]
    EmptyWindow,

    #[error("run starts in state {got}, expected the start state {expected}")]
    BadStart { got: u64, expected: StateId },

    #[error("state chain broken at step {step}: curr_states[{step}] = {got} does not continue the previous step's next state {expected}")]
    BrokenChain { step: usize, expected: u64, got: u64 },

    #[error("no transition {curr} -> {next} on byte {byte} at step {step}")]
    NoSuchTransition {
        step: usize,
        curr: u64,
        next: u64,
        byte: u8,
    },

    #[error("final state {state} is not an accept state")]
    NotAccepting { state: u64 },

    #[error("capture group {group} at step {step}: expected {expected}, got {got} in {field}")]
    CaptureMismatch {
        group: u32,
        step: usize,
        field: &'static str,
        expected: u64,
        got: u64,
    },

    #[error("capture group {group} start index is {got}, expected {expected}")]
    StartIndexMismatch { group: u32, expected: u64, got: u64 },

    #[error("padding violated: {field}[{index}] = {value} beyond the live window")]
    DirtyPadding {
        field: &'static str,
        index: usize,
        value: u64,
    },
}

/// Check encoded inputs against the graph and profile
pub fn check_circuit_inputs(
    automaton: &Automaton,
    profile: &CircuitProfile,
    inputs: &CircuitInputs,
) -> Result<(), CheckError> {
    let groups = automaton.num_capture_groups();
    check_shapes(inputs, profile, groups)?;

    let haystack_len = parse("haystack_len", 0, &inputs.haystack_len)?;
    let match_start = parse("match_start", 0, &inputs.match_start)?;
    let match_length = parse("match_length", 0, &inputs.match_length)?;

    if haystack_len > profile.max_haystack_len as u64 {
        return Err(CheckError::HaystackLenOutOfRange {
            len: haystack_len,
            max: profile.max_haystack_len,
        });
    }
    if match_length > profile.max_match_len as u64 {
        return Err(CheckError::MatchLenOutOfRange {
            len: match_length,
            max: profile.max_match_len,
        });
    }
    if match_length == 0 {
        return Err(CheckError::EmptyWindow);
    }
    if match_start + match_length > haystack_len {
        return Err(CheckError::WindowOutOfBounds {
            start: match_start,
            length: match_length,
            haystack_len,
        });
    }

    let len = match_length as usize;
    let mut final_state = 0u64;

    for step in 0..len {
        let curr = parse("curr_states", step, &inputs.curr_states[step])?;
        let next = parse("next_states", step, &inputs.next_states[step])?;

        if step == 0 {
            if curr != u64::from(automaton.start_state()) {
                return Err(CheckError::BadStart {
                    got: curr,
                    expected: automaton.start_state(),
                });
            }
        } else {
            let prev_next = parse("next_states", step - 1, &inputs.next_states[step - 1])?;
            if curr != prev_next {
                return Err(CheckError::BrokenChain {
                    step,
                    expected: prev_next,
                    got: curr,
                });
            }
        }

        let haystack_index = (match_start as usize) + step;
        let byte_value = parse("in_haystack", haystack_index, &inputs.in_haystack[haystack_index])?;
        let byte = u8::try_from(byte_value).map_err(|_| CheckError::ByteOutOfRange {
            index: haystack_index,
            value: byte_value,
        })?;

        let transition = StateId::try_from(curr)
            .ok()
            .and_then(|state| automaton.next_transition(state, byte))
            .filter(|t| u64::from(t.to) == next)
            .ok_or(CheckError::NoSuchTransition {
                step,
                curr,
                next,
                byte,
            })?;

        for group in 1..=groups as u32 {
            let g = (group - 1) as usize;
            let id = parse("capture_group_ids", step, &inputs.capture_group_ids[g][step])?;
            let expected_id = if transition.in_group(group) { u64::from(group) } else { 0 };
            if id != expected_id {
                return Err(CheckError::CaptureMismatch {
                    group,
                    step,
                    field: "capture_group_ids",
                    expected: expected_id,
                    got: id,
                });
            }

            let start_flag = parse(
                "capture_group_starts",
                step,
                &inputs.capture_group_starts[g][step],
            )?;
            let expected_flag = u64::from(transition.starts_group(group));
            if start_flag != expected_flag {
                return Err(CheckError::CaptureMismatch {
                    group,
                    step,
                    field: "capture_group_starts",
                    expected: expected_flag,
                    got: start_flag,
                });
            }
        }

        final_state = next;
    }

    if !matches!(
        StateId::try_from(final_state),
        Ok(state) if automaton.is_accept(state)
    ) {
        return Err(CheckError::NotAccepting { state: final_state });
    }

    check_start_indices(inputs, match_start, len, groups)?;
    check_padding(inputs, profile, haystack_len as usize, len, groups)?;

    Ok(())
}

fn check_shapes(
    inputs: &CircuitInputs,
    profile: &CircuitProfile,
    groups: usize,
) -> Result<(), CheckError> {
    let expect = |field: &'static str, len: usize, expected: usize| {
        if len != expected {
            return Err(CheckError::BadShape {
                field,
                len,
                expected,
            });
        }
        Ok(())
    };

    expect("in_haystack", inputs.in_haystack.len(), profile.max_haystack_len)?;
    expect("curr_states", inputs.curr_states.len(), profile.max_match_len)?;
    expect("next_states", inputs.next_states.len(), profile.max_match_len)?;
    expect("capture_group_ids", inputs.capture_group_ids.len(), groups)?;
    expect("capture_group_starts", inputs.capture_group_starts.len(), groups)?;
    expect(
        "capture_group_start_indices",
        inputs.capture_group_start_indices.len(),
        groups,
    )?;
    for ids in &inputs.capture_group_ids {
        expect("capture_group_ids", ids.len(), profile.max_match_len)?;
    }
    for starts in &inputs.capture_group_starts {
        expect("capture_group_starts", starts.len(), profile.max_match_len)?;
    }
    Ok(())
}

/// The declared absolute start offsets must agree with the start-flag arrays
fn check_start_indices(
    inputs: &CircuitInputs,
    match_start: u64,
    len: usize,
    groups: usize,
) -> Result<(), CheckError> {
    for group in 1..=groups as u32 {
        let g = (group - 1) as usize;
        let mut expected = 0u64;
        for step in 0..len {
            let flag = parse(
                "capture_group_starts",
                step,
                &inputs.capture_group_starts[g][step],
            )?;
            if flag != 0 {
                expected = match_start + step as u64;
                break;
            }
        }
        let got = parse(
            "capture_group_start_indices",
            g,
            &inputs.capture_group_start_indices[g],
        )?;
        if got != expected {
            return Err(CheckError::StartIndexMismatch {
                group,
                expected,
                got,
            });
        }
    }
    Ok(())
}

fn check_padding(
    inputs: &CircuitInputs,
    profile: &CircuitProfile,
    haystack_len: usize,
    match_len: usize,
    groups: usize,
) -> Result<(), CheckError> {
    for index in haystack_len..profile.max_haystack_len {
        let value = parse("in_haystack", index, &inputs.in_haystack[index])?;
        if value != 0 {
            return Err(CheckError::DirtyPadding {
                field: "in_haystack",
                index,
                value,
            });
        }
    }

    for index in match_len..profile.max_match_len {
        for (field, column) in [
            ("curr_states", &inputs.curr_states),
            ("next_states", &inputs.next_states),
        ] {
            let value = parse(field, index, &column[index])?;
            if value != 0 {
                return Err(CheckError::DirtyPadding {
                    field,
                    index,
                    value,
                });
            }
        }
        for g in 0..groups {
            for (field, column) in [
                ("capture_group_ids", &inputs.capture_group_ids[g]),
                ("capture_group_starts", &inputs.capture_group_starts[g]),
            ] {
                let value = parse(field, index, &column[index])?;
                if value != 0 {
                    return Err(CheckError::DirtyPadding {
                        field,
                        index,
                        value,
                    });
                }
            }
        }
    }
    Ok(())
}

fn parse(field: &'static str, index: usize, value: &str) -> Result<u64, CheckError> {
    value.parse().map_err(|_| CheckError::BadFieldElement {
        field,
        index,
        value: value.to_string(),
    })
}
