//! Proof artifacts and persistence
//!
//! A [`ProofBundle`] is what one successful invocation leaves behind: raw
//! proof bytes, the ordered public-input field elements, and metadata about
//! the run. Persisted as `proof.bin` (raw bytes), `public_inputs.json`
//! (ordered list), and `proof_metadata.json` in the output directory.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::r#trait::{ProofError, ProofResult};

/// Raw proof bytes file
pub const PROOF_FILE: &str = "proof.bin";
/// Ordered public-input field elements
pub const PUBLIC_INPUTS_FILE: &str = "public_inputs.json";
/// Run metadata
pub const METADATA_FILE: &str = "proof_metadata.json";
/// Generated on-chain verifier source
pub const VERIFIER_FILE: &str = "UltraHonkVerifier.sol";

/// A proof plus its public inputs, as returned by a backend
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proof {
    pub bytes: Vec<u8>,
    /// Hex-encoded field elements, in circuit order
    pub public_inputs: Vec<String>,
}

impl Proof {
    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

/// Metadata recorded alongside a persisted proof
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofMetadata {
    /// Backend that generated this proof
    pub backend_name: String,
    /// Fingerprint of the circuit bytecode the proof was generated for
    pub circuit_fingerprint: String,
    pub haystack_len: usize,
    pub match_start: usize,
    pub match_length: usize,
    pub num_capture_groups: usize,
    pub proof_size: usize,
}

/// Everything one proving run persists
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProofBundle {
    pub proof: Proof,
    pub metadata: ProofMetadata,
}

impl ProofBundle {
    /// Write `proof.bin`, `public_inputs.json`, and metadata into `dir`
    pub fn save(&self, dir: &Path) -> ProofResult<()> {
        fs::create_dir_all(dir)?;
        fs::write(dir.join(PROOF_FILE), &self.proof.bytes)?;
        fs::write(
            dir.join(PUBLIC_INPUTS_FILE),
            serde_json::to_string_pretty(&self.proof.public_inputs)?,
        )?;
        fs::write(
            dir.join(METADATA_FILE),
            serde_json::to_string_pretty(&self.metadata)?,
        )?;
        Ok(())
    }

    /// Load a bundle persisted by [`ProofBundle::save`]
    pub fn load(dir: &Path) -> ProofResult<Self> {
        let proof_path = dir.join(PROOF_FILE);
        if !proof_path.exists() {
            return Err(ProofError::MissingArtifact { path: proof_path });
        }
        let bytes = fs::read(&proof_path)?;

        let inputs_path = dir.join(PUBLIC_INPUTS_FILE);
        if !inputs_path.exists() {
            return Err(ProofError::MissingArtifact { path: inputs_path });
        }
        let public_inputs: Vec<String> = serde_json::from_str(&fs::read_to_string(&inputs_path)?)?;

        let metadata_path = dir.join(METADATA_FILE);
        if !metadata_path.exists() {
            return Err(ProofError::MissingArtifact {
                path: metadata_path,
            });
        }
        let metadata: ProofMetadata =
            serde_json::from_str(&fs::read_to_string(&metadata_path)?)?;

        Ok(Self {
            proof: Proof {
                bytes,
                public_inputs,
            },
            metadata,
        })
    }
}
