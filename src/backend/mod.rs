//! Proving backend boundary
//!
//! Everything past witness encoding is an external collaborator reached
//! through the [`ProvingBackend`] trait: circuit execution, proof generation,
//! verification, and verifier export. Two implementations ship here — the
//! process-spawning [`BarretenbergBackend`] for the native toolchain and the
//! in-process [`MockBackend`] for tests and development.

pub mod barretenberg;
pub mod circuit;
pub mod mock;
pub mod proof;
pub mod r#trait;

pub use barretenberg::BarretenbergBackend;
pub use circuit::{default_circuit_path, CircuitAbi, CompiledCircuit};
pub use mock::MockBackend;
pub use proof::{
    Proof, ProofBundle, ProofMetadata, METADATA_FILE, PROOF_FILE, PUBLIC_INPUTS_FILE,
    VERIFIER_FILE,
};
pub use r#trait::{ExecutionOutput, ProofError, ProofResult, ProvingBackend};
