//! Compiled circuit artifact
//!
//! The external circuit compiler leaves a JSON artifact (`bytecode` +
//! `noir_version`) that must exist before any proof is attempted; its absence
//! is a fatal precondition, not a recoverable error. The artifact may carry an
//! optional `abi` block declaring the array bounds it was compiled with, which
//! lets the prover detect a profile mismatch before building a witness.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::types::{CircuitProfile, ProfileError};

use super::r#trait::{ProofError, ProofResult};

/// Array bounds a circuit artifact declares it was compiled with
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitAbi {
    pub max_haystack_len: usize,
    pub max_match_len: usize,
}

/// A compiled circuit as produced by the external toolchain
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledCircuit {
    /// Base64-encoded circuit bytecode, opaque to this crate
    pub bytecode: String,
    pub noir_version: String,
    /// Declared bounds, when the artifact carries them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abi: Option<CircuitAbi>,
}

impl CompiledCircuit {
    /// Load the artifact, failing fast when it has not been compiled yet
    pub fn load(path: &Path) -> ProofResult<Self> {
        if !path.exists() {
            return Err(ProofError::MissingArtifact {
                path: path.to_path_buf(),
            });
        }
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Check declared bounds against the profile in use
    ///
    /// Artifacts without an `abi` block are trusted as-is; the external
    /// toolchain has no declared-bounds channel of its own.
    pub fn check_profile(&self, profile: &CircuitProfile) -> Result<(), ProfileError> {
        match self.abi {
            Some(abi) => profile.check_declared(abi.max_haystack_len, abi.max_match_len),
            None => Ok(()),
        }
    }

    /// Short fingerprint of the bytecode, for logs and artifact metadata
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.bytecode.as_bytes());
        hex::encode(&digest[..8])
    }
}

/// Default artifact location relative to the invocation
pub fn default_circuit_path() -> PathBuf {
    PathBuf::from("target/zkregex.json")
}
