//! In-process mock backend
//!
//! A deterministic stand-in for the native proving toolchain: `execute`
//! replays the circuit's constraints against the automaton graph, `prove`
//! packages the solved witness, and `verify` re-executes it and recomputes the
//! public inputs. Lets the full pipeline — including the corrupted-witness
//! failure paths — run in tests and development environments without `nargo`
//! or `bb` installed.
//!
//! The mock proof carries the serialized witness itself; it demonstrates the
//! pipeline's observable contract, not zero-knowledge.

use crate::graph::Automaton;
use crate::types::CircuitProfile;
use crate::witness::{check_circuit_inputs, CircuitInputs};

use super::circuit::CompiledCircuit;
use super::proof::Proof;
use super::r#trait::{ExecutionOutput, ProofError, ProofResult, ProvingBackend};

#[derive(Debug)]
pub struct MockBackend {
    automaton: Automaton,
    profile: CircuitProfile,
}

impl MockBackend {
    /// The mock "compiles" the graph's constraints directly, so it owns its
    /// own copy of the automaton the way a real circuit embeds them.
    pub fn new(automaton: Automaton, profile: CircuitProfile) -> Self {
        Self { automaton, profile }
    }

    fn decode_witness(&self, witness: &[u8]) -> ProofResult<CircuitInputs> {
        bincode::deserialize(witness)
            .map_err(|e| ProofError::Backend(format!("malformed mock witness: {}", e)))
    }

    /// Public inputs the mock circuit exposes: the match window and the
    /// capture start offsets, as 32-byte hex field elements.
    fn public_inputs(inputs: &CircuitInputs) -> Vec<String> {
        let mut fields = vec![inputs.match_start.clone(), inputs.match_length.clone()];
        fields.extend(inputs.capture_group_start_indices.iter().cloned());
        fields
            .iter()
            .map(|v| match v.parse::<u64>() {
                Ok(n) => format!("0x{:064x}", n),
                Err(_) => v.clone(),
            })
            .collect()
    }

    /// Bytes captured by `group`, reconstructed from the encoded arrays
    fn captured_bytes(inputs: &CircuitInputs, group: usize) -> Option<Vec<u8>> {
        let ids = inputs.capture_group_ids.get(group - 1)?;
        let match_start: usize = inputs.match_start.parse().ok()?;
        let mut bytes = Vec::new();
        for (step, id) in ids.iter().enumerate() {
            if id != "0" {
                let value: u64 = inputs.in_haystack.get(match_start + step)?.parse().ok()?;
                bytes.push(u8::try_from(value).ok()?);
            }
        }
        if bytes.is_empty() {
            None
        } else {
            Some(bytes)
        }
    }
}

impl ProvingBackend for MockBackend {
    fn execute(
        &self,
        _circuit: &CompiledCircuit,
        inputs: &CircuitInputs,
    ) -> ProofResult<ExecutionOutput> {
        check_circuit_inputs(&self.automaton, &self.profile, inputs)
            .map_err(|e| ProofError::ExecutionFailed(e.to_string()))?;

        let witness = bincode::serialize(inputs)
            .map_err(|e| ProofError::Backend(format!("witness serialization: {}", e)))?;
        Ok(ExecutionOutput {
            witness,
            return_value: Self::captured_bytes(inputs, 1),
        })
    }

    fn prove(&self, _circuit: &CompiledCircuit, witness: &[u8]) -> ProofResult<Proof> {
        let inputs = self.decode_witness(witness)?;
        Ok(Proof {
            bytes: witness.to_vec(),
            public_inputs: Self::public_inputs(&inputs),
        })
    }

    fn verify(&self, _circuit: &CompiledCircuit, proof: &Proof) -> ProofResult<()> {
        let inputs = self
            .decode_witness(&proof.bytes)
            .map_err(|e| ProofError::VerificationFailed(e.to_string()))?;

        check_circuit_inputs(&self.automaton, &self.profile, &inputs)
            .map_err(|e| ProofError::VerificationFailed(e.to_string()))?;

        if Self::public_inputs(&inputs) != proof.public_inputs {
            return Err(ProofError::VerificationFailed(
                "public inputs do not match the witness".to_string(),
            ));
        }
        Ok(())
    }

    fn export_verifier(&self, circuit: &CompiledCircuit) -> ProofResult<String> {
        // A stub contract carrying the circuit fingerprint; the real verifier
        // comes from the native toolchain.
        Ok(format!(
            "// SPDX-License-Identifier: MIT\n\
             // Mock verifier for circuit {} (noir {})\n\
             pragma solidity >=0.8.21;\n\n\
             contract MockVerifier {{\n\
             \x20   bytes32 public constant CIRCUIT_ID = bytes32(uint256(0x{}));\n\
             \x20   function verify(bytes calldata, bytes32[] calldata) external pure returns (bool) {{\n\
             \x20       return true;\n\
             \x20   }}\n\
             }}\n",
            circuit.fingerprint(),
            circuit.noir_version,
            circuit.fingerprint(),
        ))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
