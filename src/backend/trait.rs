//! Proving backend trait definition
//!
//! This module defines the [`ProvingBackend`] trait, a clean abstraction over
//! the external proving toolchain. The pipeline only relies on the observable
//! contract: `execute` is deterministic given deterministic inputs and fails
//! when the witness does not satisfy the circuit's constraints; `prove` may be
//! nondeterministic in timing but deterministic in validity; `verify` accepts
//! exactly the proofs `prove` emits for satisfying witnesses.

use std::path::PathBuf;

use thiserror::Error;

use crate::witness::CircuitInputs;

use super::circuit::CompiledCircuit;
use super::proof::Proof;

/// Result type for proof operations
pub type ProofResult<T> = Result<T, ProofError>;

/// Errors crossing the proving backend boundary
#[derive(Debug, Error)]
pub enum ProofError {
    /// A required artifact (compiled circuit, persisted proof) is absent
    #[error("required artifact not found at {}", .path.display())]
    MissingArtifact { path: PathBuf },

    /// Circuit execution rejected the inputs: the witness does not satisfy
    /// the constraints, which signals a witness/graph mismatch bug
    #[error("circuit execution failed: {0}")]
    ExecutionFailed(String),

    /// Proof generation failed
    #[error("proof generation failed: {0}")]
    ProofFailed(String),

    /// Verification failed (the proof is invalid)
    #[error("proof verification failed: {0}")]
    VerificationFailed(String),

    /// Backend-specific error (missing binary, malformed output, ...)
    #[error("backend error: {0}")]
    Backend(String),

    #[error("artifact io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("artifact serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result of executing the circuit on encoded inputs
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionOutput {
    /// Solved witness in the backend's native format, consumed by `prove`
    pub witness: Vec<u8>,
    /// The circuit's return value, if it has one (here: the captured bytes)
    pub return_value: Option<Vec<u8>>,
}

/// Proving backend abstraction
///
/// Implementations hold whatever native resources proving needs and must
/// release them on drop, success or failure alike.
pub trait ProvingBackend {
    /// Execute the circuit on encoded inputs, solving the witness
    ///
    /// Fails with [`ProofError::ExecutionFailed`] when the inputs do not
    /// satisfy the circuit's constraints. This is the build-time detectable
    /// signal for a corrupted or mismatched witness; it must never be papered
    /// over into a "proof" of the wrong statement.
    fn execute(
        &self,
        circuit: &CompiledCircuit,
        inputs: &CircuitInputs,
    ) -> ProofResult<ExecutionOutput>;

    /// Generate a proof from a solved witness
    fn prove(&self, circuit: &CompiledCircuit, witness: &[u8]) -> ProofResult<Proof>;

    /// Verify a proof against the circuit
    ///
    /// Returns `Ok(())` only for valid proofs; an invalid proof is
    /// [`ProofError::VerificationFailed`], fatal to the invocation.
    fn verify(&self, circuit: &CompiledCircuit, proof: &Proof) -> ProofResult<()>;

    /// Produce on-chain verifier source for the circuit
    ///
    /// Independent of any haystack or witness.
    fn export_verifier(&self, circuit: &CompiledCircuit) -> ProofResult<String>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

impl ProvingBackend for Box<dyn ProvingBackend> {
    fn execute(
        &self,
        circuit: &CompiledCircuit,
        inputs: &CircuitInputs,
    ) -> ProofResult<ExecutionOutput> {
        (**self).execute(circuit, inputs)
    }

    fn prove(&self, circuit: &CompiledCircuit, witness: &[u8]) -> ProofResult<Proof> {
        (**self).prove(circuit, witness)
    }

    fn verify(&self, circuit: &CompiledCircuit, proof: &Proof) -> ProofResult<()> {
        (**self).verify(circuit, proof)
    }

    fn export_verifier(&self, circuit: &CompiledCircuit) -> ProofResult<String> {
        (**self).export_verifier(circuit)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
