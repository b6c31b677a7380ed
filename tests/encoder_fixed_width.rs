//! Fixed-width encoding invariants
//!
//! The encoder's output shape depends only on the profile and the number of
//! capture groups — never on haystack content — and every oversized input is
//! rejected before a circuit could see it.

mod common;

use std::collections::BTreeSet;

use common::{aplus_automaton, email_automaton, email_profile, SAMPLE_HEADER};
use zkregex_prover::{
    encode_witness, match_haystack, Automaton, AutomatonGraph, CaptureRef, CircuitProfile,
    Transition, WitnessError,
};

#[test]
fn shapes_match_the_profile() {
    let automaton = email_automaton();
    let profile = email_profile();
    let trace = match_haystack(&automaton, SAMPLE_HEADER, &profile).unwrap();
    let inputs = encode_witness(&trace, automaton.num_capture_groups(), &profile).unwrap();

    assert_eq!(inputs.in_haystack.len(), 1088);
    assert_eq!(inputs.curr_states.len(), 36);
    assert_eq!(inputs.next_states.len(), 36);
    assert_eq!(inputs.capture_group_ids.len(), 1);
    assert_eq!(inputs.capture_group_ids[0].len(), 36);
    assert_eq!(inputs.capture_group_starts[0].len(), 36);
    assert_eq!(inputs.capture_group_start_indices.len(), 1);
}

#[test]
fn shape_is_independent_of_haystack_content() {
    let automaton = email_automaton();
    let profile = email_profile();

    let short = match_haystack(&automaton, b"from: <x@gmail.com>", &profile).unwrap();
    let longer = match_haystack(
        &automaton,
        b"some unrelated prefix\r\nfrom: Alice <alice@gmail.com> trailing",
        &profile,
    )
    .unwrap();

    let a = encode_witness(&short, 1, &profile).unwrap();
    let b = encode_witness(&longer, 1, &profile).unwrap();

    assert_eq!(a.in_haystack.len(), b.in_haystack.len());
    assert_eq!(a.curr_states.len(), b.curr_states.len());
    assert_eq!(a.capture_group_ids[0].len(), b.capture_group_ids[0].len());
    assert_ne!(a.in_haystack, b.in_haystack);
}

#[test]
fn sample_header_values() {
    let automaton = email_automaton();
    let profile = email_profile();
    let trace = match_haystack(&automaton, SAMPLE_HEADER, &profile).unwrap();
    let inputs = encode_witness(&trace, 1, &profile).unwrap();

    assert_eq!(inputs.match_start, "0");
    assert_eq!(inputs.match_length, "29");
    assert_eq!(inputs.haystack_len, "29");
    // 'f' = 102, and the padding tail is all zero.
    assert_eq!(inputs.in_haystack[0], "102");
    assert!(inputs.in_haystack[29..].iter().all(|v| v == "0"));
    // Live state entries never collide with the padding sentinel.
    assert!(inputs.curr_states[..29].iter().all(|v| v != "0"));
    assert!(inputs.curr_states[29..].iter().all(|v| v == "0"));
    assert!(inputs.next_states[29..].iter().all(|v| v == "0"));
    // Capture group 1 spans "alice@gmail.com": steps 13..=27.
    let ids = &inputs.capture_group_ids[0];
    assert!(ids[..13].iter().all(|v| v == "0"));
    assert!(ids[13..28].iter().all(|v| v == "1"));
    assert!(ids[28..].iter().all(|v| v == "0"));
    let starts = &inputs.capture_group_starts[0];
    assert_eq!(starts[13], "1");
    assert_eq!(starts.iter().filter(|v| *v == "1").count(), 1);
    assert_eq!(inputs.capture_group_start_indices[0], "13");
}

#[test]
fn match_length_boundary() {
    let automaton = aplus_automaton();
    let profile = CircuitProfile::new(64, 36).unwrap();

    // Exactly max_match_len encodes.
    let trace = match_haystack(&automaton, &vec![b'a'; 36], &profile).unwrap();
    assert_eq!(trace.match_length, 36);
    let inputs = encode_witness(&trace, 0, &profile).unwrap();
    assert!(inputs.curr_states.iter().all(|v| v != "0"));

    // A 37-byte window fails before any circuit call.
    let trace = match_haystack(&automaton, &vec![b'a'; 37], &profile).unwrap();
    assert_eq!(trace.match_length, 37);
    assert_eq!(
        encode_witness(&trace, 0, &profile),
        Err(WitnessError::MatchTooLong { len: 37, max: 36 })
    );
}

#[test]
fn second_capture_group_is_tagged_with_its_own_id() {
    // `No:(\d+);(a+).` reduced to two captured runs around a separator.
    let mut transitions = Vec::new();
    for (i, byte) in b"No:".iter().enumerate() {
        let from = 1 + i as u32;
        transitions.push(Transition {
            from,
            to: from + 1,
            ranges: vec![(*byte, *byte)],
            captures: vec![],
        });
    }
    transitions.push(Transition {
        from: 4,
        to: 5,
        ranges: vec![(b'0', b'9')],
        captures: vec![CaptureRef(1, true)],
    });
    transitions.push(Transition {
        from: 5,
        to: 5,
        ranges: vec![(b'0', b'9')],
        captures: vec![CaptureRef(1, false)],
    });
    transitions.push(Transition {
        from: 5,
        to: 6,
        ranges: vec![(b';', b';')],
        captures: vec![],
    });
    transitions.push(Transition {
        from: 6,
        to: 7,
        ranges: vec![(b'a', b'a')],
        captures: vec![CaptureRef(2, true)],
    });
    transitions.push(Transition {
        from: 7,
        to: 7,
        ranges: vec![(b'a', b'a')],
        captures: vec![CaptureRef(2, false)],
    });
    transitions.push(Transition {
        from: 7,
        to: 8,
        ranges: vec![(b'.', b'.')],
        captures: vec![],
    });
    let automaton = Automaton::from_graph(AutomatonGraph {
        pattern: Some("No:([0-9]+);(a+).".to_string()),
        start_state: 1,
        accept_states: BTreeSet::from([8]),
        num_capture_groups: 2,
        transitions,
    })
    .unwrap();

    let profile = CircuitProfile::new(32, 16).unwrap();
    let trace = match_haystack(&automaton, b"No:12;aa.", &profile).unwrap();
    assert_eq!(trace.captured_bytes(1).unwrap(), b"12");
    assert_eq!(trace.captured_bytes(2).unwrap(), b"aa");

    let inputs = encode_witness(&trace, 2, &profile).unwrap();
    assert_eq!(inputs.capture_group_ids.len(), 2);
    // Group 2's id array carries 2s, not 1s.
    assert_eq!(inputs.capture_group_ids[0][3..5], ["1", "1"]);
    assert_eq!(inputs.capture_group_ids[1][6..8], ["2", "2"]);
    assert_eq!(inputs.capture_group_starts[1][6], "1");
    assert_eq!(inputs.capture_group_start_indices, ["3", "6"]);
}

#[test]
fn encoding_is_deterministic() {
    let automaton = email_automaton();
    let profile = email_profile();
    let trace = match_haystack(&automaton, SAMPLE_HEADER, &profile).unwrap();

    let a = encode_witness(&trace, 1, &profile).unwrap();
    let b = encode_witness(&trace, 1, &profile).unwrap();
    assert_eq!(a, b);
}
