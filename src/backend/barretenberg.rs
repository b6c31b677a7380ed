//! UltraHonk backend driven through the external `nargo` and `bb` binaries
//!
//! The native toolchain is reached over process boundaries: `nargo execute`
//! solves the witness from the compiled circuit and an inputs file, `bb`
//! generates and verifies the proof and emits the Solidity verifier. Every
//! invocation works inside a scoped scratch directory that is torn down when
//! the session drops, whether the run succeeded or failed.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use tracing::{debug, info};

use crate::witness::CircuitInputs;

use super::circuit::CompiledCircuit;
use super::proof::Proof;
use super::r#trait::{ExecutionOutput, ProofError, ProofResult, ProvingBackend};

/// Field element size on the bb side
const FIELD_BYTES: usize = 32;

pub struct BarretenbergBackend {
    /// Noir package root containing `Nargo.toml`; `nargo execute` runs here
    package_dir: PathBuf,
    nargo_bin: PathBuf,
    bb_bin: PathBuf,
}

impl BarretenbergBackend {
    pub fn new(package_dir: impl Into<PathBuf>) -> Self {
        Self {
            package_dir: package_dir.into(),
            nargo_bin: PathBuf::from("nargo"),
            bb_bin: PathBuf::from("bb"),
        }
    }

    /// Override the toolchain binaries (e.g. pinned versions in CI)
    pub fn with_binaries(
        mut self,
        nargo_bin: impl Into<PathBuf>,
        bb_bin: impl Into<PathBuf>,
    ) -> Self {
        self.nargo_bin = nargo_bin.into();
        self.bb_bin = bb_bin.into();
        self
    }

    fn scratch(&self) -> ProofResult<TempDir> {
        tempfile::Builder::new()
            .prefix("zkregex-bb-")
            .tempdir()
            .map_err(ProofError::Io)
    }

    /// Re-serialize the circuit artifact into the scratch dir so bb always
    /// sees exactly the artifact the pipeline validated.
    fn write_circuit(&self, scratch: &Path, circuit: &CompiledCircuit) -> ProofResult<PathBuf> {
        let path = scratch.join("circuit.json");
        fs::write(&path, serde_json::to_string(circuit)?)?;
        Ok(path)
    }

    fn write_vk(&self, scratch: &Path, circuit_path: &Path) -> ProofResult<PathBuf> {
        let vk_path = scratch.join("vk");
        self.run(
            &self.bb_bin,
            &[
                "write_vk".as_ref(),
                "-b".as_ref(),
                circuit_path.as_os_str(),
                "-o".as_ref(),
                vk_path.as_os_str(),
            ],
        )
        .map_err(ProofError::Backend)?;
        Ok(vk_path)
    }

    fn run(&self, program: &Path, args: &[&std::ffi::OsStr]) -> Result<Vec<u8>, String> {
        debug!(program = %program.display(), ?args, "spawning toolchain binary");
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| format!("failed to launch {}: {}", program.display(), e))?;
        if !output.status.success() {
            return Err(format!(
                "{} exited with {}: {}",
                program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }
        Ok(output.stdout)
    }
}

impl ProvingBackend for BarretenbergBackend {
    fn execute(
        &self,
        _circuit: &CompiledCircuit,
        inputs: &CircuitInputs,
    ) -> ProofResult<ExecutionOutput> {
        // nargo reads the inputs file from the package dir; give it a scratch
        // name and remove it when the session ends.
        let prover_name = format!("Prover-{}", std::process::id());
        let prover_file = ProverFileGuard::write(
            &self.package_dir.join(format!("{}.toml", prover_name)),
            inputs,
        )?;

        let witness_name = format!("witness-{}", std::process::id());
        self.run(
            &self.nargo_bin,
            &[
                "execute".as_ref(),
                witness_name.as_str().as_ref(),
                "--prover-name".as_ref(),
                prover_name.as_str().as_ref(),
                "--program-dir".as_ref(),
                self.package_dir.as_os_str(),
            ],
        )
        .map_err(ProofError::ExecutionFailed)?;
        drop(prover_file);

        let witness_path = self
            .package_dir
            .join("target")
            .join(format!("{}.gz", witness_name));
        let witness = fs::read(&witness_path)?;
        let _ = fs::remove_file(&witness_path);

        info!(bytes = witness.len(), "witness solved");
        Ok(ExecutionOutput {
            witness,
            return_value: None,
        })
    }

    fn prove(&self, circuit: &CompiledCircuit, witness: &[u8]) -> ProofResult<Proof> {
        let scratch = self.scratch()?;
        let circuit_path = self.write_circuit(scratch.path(), circuit)?;

        let witness_path = scratch.path().join("witness.gz");
        fs::write(&witness_path, witness)?;

        let out_dir = scratch.path().join("out");
        fs::create_dir_all(&out_dir)?;
        self.run(
            &self.bb_bin,
            &[
                "prove".as_ref(),
                "-b".as_ref(),
                circuit_path.as_os_str(),
                "-w".as_ref(),
                witness_path.as_os_str(),
                "-o".as_ref(),
                out_dir.as_os_str(),
            ],
        )
        .map_err(ProofError::ProofFailed)?;

        let bytes = fs::read(out_dir.join("proof"))?;
        let public_inputs = read_public_inputs(&out_dir.join("public_inputs"))?;
        info!(
            proof_bytes = bytes.len(),
            public_inputs = public_inputs.len(),
            "proof generated"
        );
        Ok(Proof {
            bytes,
            public_inputs,
        })
    }

    fn verify(&self, circuit: &CompiledCircuit, proof: &Proof) -> ProofResult<()> {
        let scratch = self.scratch()?;
        let circuit_path = self.write_circuit(scratch.path(), circuit)?;
        let vk_path = self.write_vk(scratch.path(), &circuit_path)?;

        let proof_path = scratch.path().join("proof");
        fs::write(&proof_path, &proof.bytes)?;
        let inputs_path = scratch.path().join("public_inputs");
        fs::write(&inputs_path, encode_public_inputs(&proof.public_inputs)?)?;

        self.run(
            &self.bb_bin,
            &[
                "verify".as_ref(),
                "-k".as_ref(),
                vk_path.as_os_str(),
                "-p".as_ref(),
                proof_path.as_os_str(),
                "-i".as_ref(),
                inputs_path.as_os_str(),
            ],
        )
        .map_err(ProofError::VerificationFailed)?;
        Ok(())
    }

    fn export_verifier(&self, circuit: &CompiledCircuit) -> ProofResult<String> {
        let scratch = self.scratch()?;
        let circuit_path = self.write_circuit(scratch.path(), circuit)?;
        let vk_path = self.write_vk(scratch.path(), &circuit_path)?;

        let sol_path = scratch.path().join(super::proof::VERIFIER_FILE);
        self.run(
            &self.bb_bin,
            &[
                "write_solidity_verifier".as_ref(),
                "-k".as_ref(),
                vk_path.as_os_str(),
                "-o".as_ref(),
                sol_path.as_os_str(),
            ],
        )
        .map_err(ProofError::Backend)?;

        Ok(fs::read_to_string(&sol_path)?)
    }

    fn name(&self) -> &str {
        "barretenberg"
    }
}

/// Inputs file in the package dir, removed when the guard drops
struct ProverFileGuard {
    path: PathBuf,
}

impl ProverFileGuard {
    fn write(path: &Path, inputs: &CircuitInputs) -> ProofResult<Self> {
        fs::write(path, prover_toml(inputs))?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

impl Drop for ProverFileGuard {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

/// Render the inputs file nargo expects
///
/// The shape is fixed by the circuit's input schema, so the file is templated
/// directly rather than going through a TOML serializer.
fn prover_toml(inputs: &CircuitInputs) -> String {
    let mut out = String::new();
    push_array(&mut out, "in_haystack", &inputs.in_haystack);
    push_scalar(&mut out, "haystack_len", &inputs.haystack_len);
    push_scalar(&mut out, "match_start", &inputs.match_start);
    push_scalar(&mut out, "match_length", &inputs.match_length);
    push_array(&mut out, "curr_states", &inputs.curr_states);
    push_array(&mut out, "next_states", &inputs.next_states);
    push_nested(&mut out, "capture_group_ids", &inputs.capture_group_ids);
    push_nested(&mut out, "capture_group_starts", &inputs.capture_group_starts);
    push_array(
        &mut out,
        "capture_group_start_indices",
        &inputs.capture_group_start_indices,
    );
    out
}

fn quoted(values: &[String]) -> String {
    let items: Vec<String> = values.iter().map(|v| format!("\"{}\"", v)).collect();
    format!("[{}]", items.join(", "))
}

fn push_scalar(out: &mut String, name: &str, value: &str) {
    out.push_str(&format!("{} = \"{}\"\n", name, value));
}

fn push_array(out: &mut String, name: &str, values: &[String]) {
    out.push_str(&format!("{} = {}\n", name, quoted(values)));
}

fn push_nested(out: &mut String, name: &str, groups: &[Vec<String>]) {
    let inner: Vec<String> = groups.iter().map(|g| quoted(g)).collect();
    out.push_str(&format!("{} = [{}]\n", name, inner.join(", ")));
}

/// bb writes public inputs as concatenated 32-byte big-endian field elements
fn read_public_inputs(path: &Path) -> ProofResult<Vec<String>> {
    let raw = fs::read(path)?;
    if raw.len() % FIELD_BYTES != 0 {
        return Err(ProofError::Backend(format!(
            "public inputs file is {} bytes, not a multiple of {}",
            raw.len(),
            FIELD_BYTES
        )));
    }
    Ok(raw
        .chunks(FIELD_BYTES)
        .map(|chunk| format!("0x{}", hex::encode(chunk)))
        .collect())
}

fn encode_public_inputs(fields: &[String]) -> ProofResult<Vec<u8>> {
    let mut out = Vec::with_capacity(fields.len() * FIELD_BYTES);
    for field in fields {
        let stripped = field.strip_prefix("0x").unwrap_or(field);
        let bytes = hex::decode(stripped)
            .map_err(|e| ProofError::Backend(format!("bad public input {:?}: {}", field, e)))?;
        if bytes.len() > FIELD_BYTES {
            return Err(ProofError::Backend(format!(
                "public input {:?} exceeds {} bytes",
                field, FIELD_BYTES
            )));
        }
        out.resize(out.len() + FIELD_BYTES - bytes.len(), 0);
        out.extend_from_slice(&bytes);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prover_toml_shape() {
        let inputs = CircuitInputs {
            in_haystack: vec!["97".to_string(), "0".to_string()],
            haystack_len: "1".to_string(),
            match_start: "0".to_string(),
            match_length: "1".to_string(),
            curr_states: vec!["1".to_string()],
            next_states: vec!["2".to_string()],
            capture_group_ids: vec![vec!["0".to_string()]],
            capture_group_starts: vec![vec!["0".to_string()]],
            capture_group_start_indices: vec!["0".to_string()],
        };
        let toml = prover_toml(&inputs);
        assert!(toml.contains("in_haystack = [\"97\", \"0\"]"));
        assert!(toml.contains("match_start = \"0\""));
        assert!(toml.contains("capture_group_ids = [[\"0\"]]"));
    }

    #[test]
    fn public_inputs_round_trip() {
        let fields = vec![format!("0x{:064x}", 13u64), format!("0x{:064x}", 29u64)];
        let raw = encode_public_inputs(&fields).unwrap();
        assert_eq!(raw.len(), 64);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("public_inputs");
        fs::write(&path, &raw).unwrap();
        assert_eq!(read_public_inputs(&path).unwrap(), fields);
    }

    #[test]
    fn odd_sized_public_inputs_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("public_inputs");
        fs::write(&path, [0u8; 33]).unwrap();
        assert!(read_public_inputs(&path).is_err());
    }
}
