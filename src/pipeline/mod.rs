//! End-to-end proving pipeline
//!
//! [`RegexProver`] ties the pieces together for one invocation:
//! match -> encode -> self-check -> execute -> prove -> verify. The pipeline
//! is fully sequential; independent haystacks can be proved in parallel by
//! independent prover instances because matching and encoding are pure and
//! the automaton is read-only.

use std::time::Instant;

use thiserror::Error;
use tracing::info;

use crate::backend::{CompiledCircuit, ProofBundle, ProofError, ProofMetadata, ProvingBackend};
use crate::graph::Automaton;
use crate::types::{CircuitProfile, ProfileError};
use crate::witness::{
    check_circuit_inputs, encode_witness, match_haystack, CheckError, WitnessError,
};

/// Pipeline failures, each fatal to the invocation
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Witness(#[from] WitnessError),

    /// The generated witness failed its own consistency check before any
    /// backend was touched — a witness/graph mismatch bug, not bad input
    #[error("generated witness failed the consistency check: {0}")]
    Check(#[from] CheckError),

    #[error(transparent)]
    Proof(#[from] ProofError),
}

/// One circuit profile's prover: automaton + compiled circuit + backend
#[derive(Debug)]
pub struct RegexProver<B: ProvingBackend> {
    automaton: Automaton,
    profile: CircuitProfile,
    circuit: CompiledCircuit,
    backend: B,
}

impl<B: ProvingBackend> RegexProver<B> {
    /// Assemble a prover, rejecting a circuit whose declared bounds disagree
    /// with the profile
    pub fn new(
        automaton: Automaton,
        profile: CircuitProfile,
        circuit: CompiledCircuit,
        backend: B,
    ) -> Result<Self, PipelineError> {
        circuit.check_profile(&profile)?;
        Ok(Self {
            automaton,
            profile,
            circuit,
            backend,
        })
    }

    /// Run the full pipeline for one haystack
    pub fn prove_haystack(&self, haystack: &[u8]) -> Result<ProofBundle, PipelineError> {
        let trace = match_haystack(&self.automaton, haystack, &self.profile)?;
        info!(
            match_start = trace.match_start,
            match_length = trace.match_length,
            "match found"
        );

        let inputs = encode_witness(&trace, self.automaton.num_capture_groups(), &self.profile)?;
        check_circuit_inputs(&self.automaton, &self.profile, &inputs)?;

        let started = Instant::now();
        let execution = self.backend.execute(&self.circuit, &inputs)?;
        info!(elapsed = ?started.elapsed(), "circuit executed");

        let started = Instant::now();
        let proof = self.backend.prove(&self.circuit, &execution.witness)?;
        info!(
            elapsed = ?started.elapsed(),
            proof_bytes = proof.size_bytes(),
            "proof generated"
        );

        let started = Instant::now();
        self.backend.verify(&self.circuit, &proof)?;
        info!(elapsed = ?started.elapsed(), "proof verified");

        let metadata = ProofMetadata {
            backend_name: self.backend.name().to_string(),
            circuit_fingerprint: self.circuit.fingerprint(),
            haystack_len: haystack.len(),
            match_start: trace.match_start,
            match_length: trace.match_length,
            num_capture_groups: self.automaton.num_capture_groups(),
            proof_size: proof.size_bytes(),
        };
        Ok(ProofBundle { proof, metadata })
    }

    /// Verify a previously generated (possibly reloaded) bundle
    pub fn verify(&self, bundle: &ProofBundle) -> Result<(), PipelineError> {
        self.backend.verify(&self.circuit, &bundle.proof)?;
        Ok(())
    }

    /// Export on-chain verifier source; independent of any haystack
    pub fn export_verifier(&self) -> Result<String, PipelineError> {
        Ok(self.backend.export_verifier(&self.circuit)?)
    }

    pub fn profile(&self) -> &CircuitProfile {
        &self.profile
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }
}
