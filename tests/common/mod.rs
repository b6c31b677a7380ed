//! Shared test fixtures
//!
//! The email graph mirrors what the external compiler emits for the pattern
//! `from: [^<]*<([a-z0-9._%+-]+@gmail.com)>`: a literal prefix, a display-name
//! loop, and a captured address ending at the closing angle bracket.

#![allow(dead_code)]

use std::collections::BTreeSet;

use zkregex_prover::{
    Automaton, AutomatonGraph, CaptureRef, CircuitAbi, CircuitProfile, CompiledCircuit,
    Transition,
};

/// Sample header accepted by the email graph
pub const SAMPLE_HEADER: &[u8] = b"from: Alice <alice@gmail.com>";

fn t(from: u32, to: u32, ranges: &[(u8, u8)]) -> Transition {
    Transition {
        from,
        to,
        ranges: ranges.to_vec(),
        captures: vec![],
    }
}

fn tc(from: u32, to: u32, ranges: &[(u8, u8)], start: bool) -> Transition {
    Transition {
        from,
        to,
        ranges: ranges.to_vec(),
        captures: vec![CaptureRef(1, start)],
    }
}

/// Byte classes for the captured address local part: `[a-z0-9._%+-]`
const LOCAL_PART: &[(u8, u8)] = &[
    (b'%', b'%'),
    (b'+', b'+'),
    (b'-', b'.'),
    (b'0', b'9'),
    (b'_', b'_'),
    (b'a', b'z'),
];

/// Display-name loop: any byte except `<`
const NOT_LT: &[(u8, u8)] = &[(0, b'<' - 1), (b'<' + 1, 255)];

pub fn email_graph() -> AutomatonGraph {
    let mut transitions = Vec::new();

    // Literal "from: "
    for (i, byte) in b"from: ".iter().enumerate() {
        let from = 1 + i as u32;
        transitions.push(t(from, from + 1, &[(*byte, *byte)]));
    }

    // Display name up to '<'
    transitions.push(t(7, 7, NOT_LT));
    transitions.push(t(7, 8, &[(b'<', b'<')]));

    // Captured address: local part, '@', the gmail.com literal
    transitions.push(tc(8, 9, LOCAL_PART, true));
    transitions.push(tc(9, 9, LOCAL_PART, false));
    transitions.push(tc(9, 10, &[(b'@', b'@')], false));
    for (i, byte) in b"gmail.com".iter().enumerate() {
        let from = 10 + i as u32;
        transitions.push(tc(from, from + 1, &[(*byte, *byte)], false));
    }

    // Closing '>' ends the match outside the capture
    transitions.push(t(19, 20, &[(b'>', b'>')]));

    AutomatonGraph {
        pattern: Some("from: [^<]*<([a-z0-9._%+-]+@gmail.com)>".to_string()),
        start_state: 1,
        accept_states: BTreeSet::from([20]),
        num_capture_groups: 1,
        transitions,
    }
}

pub fn email_automaton() -> Automaton {
    Automaton::from_graph(email_graph()).unwrap()
}

/// The shipped email circuit's bounds
pub fn email_profile() -> CircuitProfile {
    CircuitProfile::new(1088, 36).unwrap()
}

/// `a+`: accepts any non-empty run of `a`s, no capture groups
pub fn aplus_automaton() -> Automaton {
    Automaton::from_graph(AutomatonGraph {
        pattern: Some("a+".to_string()),
        start_state: 1,
        accept_states: BTreeSet::from([2]),
        num_capture_groups: 0,
        transitions: vec![t(1, 2, &[(b'a', b'a')]), t(2, 2, &[(b'a', b'a')])],
    })
    .unwrap()
}

pub fn test_circuit(abi: Option<CircuitAbi>) -> CompiledCircuit {
    CompiledCircuit {
        bytecode: "H4sIAAAAAAAA".to_string(),
        noir_version: "1.0.0-beta.6".to_string(),
        abi,
    }
}
