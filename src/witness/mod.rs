//! Witness generation
//!
//! Turns a compiled automaton graph plus a concrete haystack into the
//! fixed-shape numeric witness a zk-regex circuit checks:
//!
//! - [`matcher`]: run the automaton, select the leftmost-longest accepting
//!   window, record the state trajectory and capture bookkeeping
//! - [`encode`]: pad everything to the circuit's fixed widths as
//!   decimal-string field elements
//! - [`verify`]: replay the circuit's constraints in-process to catch
//!   witness-construction bugs before a backend does

pub mod encode;
pub mod matcher;
pub mod trace;
pub mod verify;

pub use encode::{encode_witness, CircuitInputs};
pub use matcher::{match_haystack, WitnessError};
pub use trace::{TraceStep, WitnessTrace};
pub use verify::{check_circuit_inputs, CheckError};
