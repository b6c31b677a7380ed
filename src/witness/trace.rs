//! Witness trace data structures
//!
//! A [`WitnessTrace`] is the raw, variable-length record of one automaton run:
//! the selected match window, one step per consumed byte, and the capture
//! bookkeeping the circuit checks. The fixed-width encoder turns it into the
//! padded arrays the circuit actually receives.

use serde::{Deserialize, Serialize};

use crate::graph::StateId;

/// One automaton step: the transition consumed for a single haystack byte
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStep {
    /// State before consuming the byte
    pub curr: StateId,
    /// State after consuming the byte
    pub next: StateId,
    /// Capture groups (1-based ids) whose span contains this step
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capture_ids: Vec<u32>,
    /// Capture groups whose span starts at this step
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capture_starts: Vec<u32>,
}

impl TraceStep {
    pub fn in_group(&self, group: u32) -> bool {
        self.capture_ids.contains(&group)
    }

    pub fn starts_group(&self, group: u32) -> bool {
        self.capture_starts.contains(&group)
    }
}

/// Full witness for one `(graph, haystack)` run
///
/// `steps` covers exactly the matched window, in haystack order:
/// `steps.len() == match_length`. Offsets in `capture_start_indices` are
/// absolute haystack offsets; `None` means the group's span never began.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WitnessTrace {
    pub haystack: Vec<u8>,
    /// Byte offset of the accepting window
    pub match_start: usize,
    /// Length of the accepting window in bytes
    pub match_length: usize,
    pub steps: Vec<TraceStep>,
    pub capture_start_indices: Vec<Option<usize>>,
}

impl WitnessTrace {
    /// One past the last matched byte
    pub fn match_end(&self) -> usize {
        self.match_start + self.match_length
    }

    /// The matched window of the haystack
    pub fn matched_bytes(&self) -> &[u8] {
        &self.haystack[self.match_start..self.match_end()]
    }

    /// The bytes captured by `group` (1-based), if its span is non-empty
    ///
    /// Spans produced by the matcher are contiguous, so the slice runs from the
    /// first to the last step inside the group.
    pub fn captured_bytes(&self, group: u32) -> Option<&[u8]> {
        let first = self.steps.iter().position(|s| s.in_group(group))?;
        let last = self.steps.iter().rposition(|s| s.in_group(group))?;
        Some(&self.haystack[self.match_start + first..=self.match_start + last])
    }
}
