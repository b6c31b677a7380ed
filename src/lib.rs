//! zkregex-prover
//!
//! Witness generation and proof orchestration for zk-regex circuits.
//!
//! # Architecture
//!
//! An external compiler turns a regex pattern into a deterministic automaton
//! graph; an external toolchain compiles and proves the circuit. This crate
//! owns everything in between:
//!
//! - `graph`: load and validate the automaton graph, build the transition
//!   lookup table
//! - `witness`: run the automaton over a haystack, select the
//!   leftmost-longest accepting window, and encode the fixed-width witness
//!   the circuit checks
//! - `backend`: the proving-toolchain boundary (execute / prove / verify /
//!   export), with a process-spawning UltraHonk implementation and an
//!   in-process mock
//! - `pipeline`: one-invocation orchestration from haystack to persisted
//!   proof artifacts
//!
//! # Example
//!
//! ```ignore
//! use zkregex_prover::{Automaton, CircuitProfile, CompiledCircuit, MockBackend, RegexProver};
//!
//! let automaton = Automaton::load("src/zkregex_graph.json".as_ref())?;
//! let profile = CircuitProfile::default();
//! let circuit = CompiledCircuit::load("target/zkregex.json".as_ref())?;
//!
//! let backend = MockBackend::new(automaton.clone(), profile);
//! let prover = RegexProver::new(automaton, profile, circuit, backend)?;
//!
//! let bundle = prover.prove_haystack(b"from: Alice <alice@gmail.com>")?;
//! bundle.save("target".as_ref())?;
//! ```

pub mod backend;
pub mod graph;
pub mod pipeline;
pub mod types;
pub mod witness;

pub use backend::{
    BarretenbergBackend, CircuitAbi, CompiledCircuit, ExecutionOutput, MockBackend, Proof,
    ProofBundle, ProofError, ProofMetadata, ProofResult, ProvingBackend,
};
pub use graph::{Automaton, AutomatonGraph, CaptureRef, GraphError, StateId, Transition};
pub use pipeline::{PipelineError, RegexProver};
pub use types::{
    CircuitProfile, ProfileError, DEFAULT_MAX_HAYSTACK_LEN, DEFAULT_MAX_MATCH_LEN,
};
pub use witness::{
    check_circuit_inputs, encode_witness, match_haystack, CheckError, CircuitInputs, TraceStep,
    WitnessError, WitnessTrace,
};
