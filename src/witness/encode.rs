//! Fixed-width circuit input encoding
//!
//! Converts a variable-length [`WitnessTrace`] into the exact named arrays the
//! circuit expects. State and capture arrays are bounded by `max_match_len`
//! (the circuit verifies only the matched window), the raw haystack buffer by
//! `max_haystack_len`. Padding is the uniform sentinel 0, and every value is a
//! decimal-string field element so the encoding survives any native integer
//! width on the other side.

use serde::{Deserialize, Serialize};

use crate::types::CircuitProfile;

use super::matcher::WitnessError;
use super::trace::WitnessTrace;

/// Named fixed-width circuit inputs
///
/// Shape depends only on `{max_haystack_len, max_match_len, num_capture_groups}`,
/// never on haystack content: two inputs built from different haystacks under
/// the same profile are structurally identical.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitInputs {
    /// Raw haystack bytes, 0-padded to `max_haystack_len`
    pub in_haystack: Vec<String>,
    /// Actual haystack length in bytes
    pub haystack_len: String,
    pub match_start: String,
    pub match_length: String,
    /// State before each matched byte, 0-padded to `max_match_len`
    pub curr_states: Vec<String>,
    /// State after each matched byte, 0-padded to `max_match_len`
    pub next_states: Vec<String>,
    /// Per group: the group id while inside its span, else 0
    pub capture_group_ids: Vec<Vec<String>>,
    /// Per group: 1 at the span's first step, else 0
    pub capture_group_starts: Vec<Vec<String>>,
    /// Absolute haystack offset where each group's span begins (0 = never)
    pub capture_group_start_indices: Vec<String>,
}

impl CircuitInputs {
    pub fn num_capture_groups(&self) -> usize {
        self.capture_group_start_indices.len()
    }
}

/// Encode a witness trace into fixed-width circuit inputs
///
/// Fails with [`WitnessError::MatchTooLong`] or [`WitnessError::InputTooLong`]
/// before any circuit is touched; an oversized window can never reach the
/// backend.
pub fn encode_witness(
    trace: &WitnessTrace,
    num_capture_groups: usize,
    profile: &CircuitProfile,
) -> Result<CircuitInputs, WitnessError> {
    if trace.match_length > profile.max_match_len {
        return Err(WitnessError::MatchTooLong {
            len: trace.match_length,
            max: profile.max_match_len,
        });
    }
    if trace.haystack.len() > profile.max_haystack_len {
        return Err(WitnessError::InputTooLong {
            len: trace.haystack.len(),
            max: profile.max_haystack_len,
        });
    }

    let in_haystack = padded(
        trace.haystack.iter().map(|&b| u64::from(b)),
        profile.max_haystack_len,
    );
    let curr_states = padded(
        trace.steps.iter().map(|s| u64::from(s.curr)),
        profile.max_match_len,
    );
    let next_states = padded(
        trace.steps.iter().map(|s| u64::from(s.next)),
        profile.max_match_len,
    );

    let mut capture_group_ids = Vec::with_capacity(num_capture_groups);
    let mut capture_group_starts = Vec::with_capacity(num_capture_groups);
    for group in 1..=num_capture_groups as u32 {
        capture_group_ids.push(padded(
            trace
                .steps
                .iter()
                .map(|s| if s.in_group(group) { u64::from(group) } else { 0 }),
            profile.max_match_len,
        ));
        capture_group_starts.push(padded(
            trace
                .steps
                .iter()
                .map(|s| if s.starts_group(group) { 1 } else { 0 }),
            profile.max_match_len,
        ));
    }

    let capture_group_start_indices = trace
        .capture_start_indices
        .iter()
        .map(|idx| field(idx.unwrap_or(0) as u64))
        .collect();

    Ok(CircuitInputs {
        in_haystack,
        haystack_len: field(trace.haystack.len() as u64),
        match_start: field(trace.match_start as u64),
        match_length: field(trace.match_length as u64),
        curr_states,
        next_states,
        capture_group_ids,
        capture_group_starts,
        capture_group_start_indices,
    })
}

fn field(value: u64) -> String {
    value.to_string()
}

fn padded(values: impl Iterator<Item = u64>, width: usize) -> Vec<String> {
    let mut out: Vec<String> = values.map(field).collect();
    debug_assert!(out.len() <= width);
    out.resize_with(width, || field(0));
    out
}

#[cfg(test)]
mod tests {
    use super::super::trace::TraceStep;
    use super::*;

    fn tiny_trace() -> WitnessTrace {
        WitnessTrace {
            haystack: b"zab".to_vec(),
            match_start: 1,
            match_length: 2,
            steps: vec![
                TraceStep {
                    curr: 1,
                    next: 2,
                    capture_ids: vec![1],
                    capture_starts: vec![1],
                },
                TraceStep {
                    curr: 2,
                    next: 3,
                    capture_ids: vec![],
                    capture_starts: vec![],
                },
            ],
            capture_start_indices: vec![Some(1)],
        }
    }

    fn profile() -> CircuitProfile {
        CircuitProfile::new(8, 4).unwrap()
    }

    #[test]
    fn pads_to_profile_widths() {
        let inputs = encode_witness(&tiny_trace(), 1, &profile()).unwrap();
        assert_eq!(inputs.in_haystack.len(), 8);
        assert_eq!(inputs.curr_states.len(), 4);
        assert_eq!(inputs.next_states.len(), 4);
        assert_eq!(inputs.capture_group_ids[0].len(), 4);
        assert_eq!(inputs.capture_group_starts[0].len(), 4);
        assert_eq!(inputs.capture_group_start_indices.len(), 1);
    }

    #[test]
    fn encodes_decimal_strings_with_zero_padding() {
        let inputs = encode_witness(&tiny_trace(), 1, &profile()).unwrap();
        assert_eq!(inputs.in_haystack[..3], ["122", "97", "98"]);
        assert_eq!(inputs.in_haystack[3..], ["0", "0", "0", "0", "0"]);
        assert_eq!(inputs.haystack_len, "3");
        assert_eq!(inputs.match_start, "1");
        assert_eq!(inputs.match_length, "2");
        assert_eq!(inputs.curr_states, ["1", "2", "0", "0"]);
        assert_eq!(inputs.next_states, ["2", "3", "0", "0"]);
        assert_eq!(inputs.capture_group_ids[0], ["1", "0", "0", "0"]);
        assert_eq!(inputs.capture_group_starts[0], ["1", "0", "0", "0"]);
        assert_eq!(inputs.capture_group_start_indices[0], "1");
    }

    #[test]
    fn oversized_match_fails_before_encoding() {
        let mut trace = tiny_trace();
        trace.match_length = 5;
        assert_eq!(
            encode_witness(&trace, 1, &profile()),
            Err(WitnessError::MatchTooLong { len: 5, max: 4 })
        );
    }

    #[test]
    fn never_started_group_encodes_the_sentinel() {
        let mut trace = tiny_trace();
        trace.capture_start_indices = vec![None];
        let inputs = encode_witness(&trace, 1, &profile()).unwrap();
        assert_eq!(inputs.capture_group_start_indices[0], "0");
    }
}
