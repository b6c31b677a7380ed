//! zk-regex prover CLI

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use zkregex_prover::{
    match_haystack, Automaton, BarretenbergBackend, CircuitProfile, CompiledCircuit, MockBackend,
    ProofBundle, ProvingBackend, RegexProver, DEFAULT_MAX_HAYSTACK_LEN, DEFAULT_MAX_MATCH_LEN,
};

/// Built-in sample haystack, provable against the shipped email circuit
const SAMPLE_HAYSTACK: &str = "from: Alice <alice@gmail.com>";

#[derive(Parser)]
#[command(name = "zkregex-prover")]
#[command(about = "Generate and verify zk-regex match proofs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args)]
struct ProverArgs {
    /// Path to the automaton graph JSON
    #[arg(long, default_value = "src/zkregex_graph.json")]
    graph: PathBuf,

    /// Path to the compiled circuit artifact
    #[arg(long, default_value = "target/zkregex.json")]
    circuit: PathBuf,

    /// Noir package directory (for the native toolchain)
    #[arg(long, default_value = ".")]
    package_dir: PathBuf,

    /// Maximum haystack length the circuit was compiled with
    #[arg(long, default_value_t = DEFAULT_MAX_HAYSTACK_LEN)]
    max_haystack_len: usize,

    /// Maximum match length the circuit was compiled with
    #[arg(long, default_value_t = DEFAULT_MAX_MATCH_LEN)]
    max_match_len: usize,

    /// Use the in-process mock backend instead of nargo/bb
    #[arg(long)]
    mock: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate, verify, and persist a proof for a haystack
    #[command(visible_alias = "generate-proof")]
    Prove {
        /// Haystack to match; defaults to a built-in sample
        haystack: Option<String>,

        /// Output directory for proof.bin and public_inputs.json
        #[arg(short, long, default_value = "target")]
        output_dir: PathBuf,

        #[command(flatten)]
        prover: ProverArgs,
    },

    /// Re-verify persisted proof artifacts
    Verify {
        /// Directory holding proof.bin and public_inputs.json
        #[arg(short, long, default_value = "target")]
        proof_dir: PathBuf,

        #[command(flatten)]
        prover: ProverArgs,
    },

    /// Generate on-chain verifier source from the compiled circuit
    ExportVerifier {
        /// Output path for the verifier contract
        #[arg(short, long, default_value = "UltraHonkVerifier.sol")]
        output: PathBuf,

        #[command(flatten)]
        prover: ProverArgs,
    },

    /// Show information about persisted proof artifacts
    Info {
        /// Directory holding the artifacts
        #[arg(short, long, default_value = "target")]
        proof_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Prove {
            haystack,
            output_dir,
            prover,
        } => cmd_prove(haystack, output_dir, prover)?,
        Commands::Verify { proof_dir, prover } => cmd_verify(proof_dir, prover)?,
        Commands::ExportVerifier { output, prover } => cmd_export_verifier(output, prover)?,
        Commands::Info { proof_dir } => cmd_info(proof_dir)?,
    }

    Ok(())
}

fn build_prover(args: &ProverArgs) -> Result<RegexProver<Box<dyn ProvingBackend>>> {
    let profile = CircuitProfile::new(args.max_haystack_len, args.max_match_len)?;

    let automaton = Automaton::load(&args.graph)
        .with_context(|| format!("loading automaton graph {:?}", args.graph))?;
    info!(
        pattern = automaton.pattern().unwrap_or("<unknown>"),
        capture_groups = automaton.num_capture_groups(),
        "automaton loaded"
    );

    let circuit = CompiledCircuit::load(&args.circuit)
        .context("circuit not compiled — run `nargo compile` first")?;
    info!(
        noir_version = %circuit.noir_version,
        fingerprint = %circuit.fingerprint(),
        "circuit loaded"
    );

    let backend: Box<dyn ProvingBackend> = if args.mock {
        Box::new(MockBackend::new(automaton.clone(), profile))
    } else {
        Box::new(BarretenbergBackend::new(&args.package_dir))
    };

    Ok(RegexProver::new(automaton, profile, circuit, backend)?)
}

fn cmd_prove(haystack: Option<String>, output_dir: PathBuf, args: ProverArgs) -> Result<()> {
    let haystack = haystack.unwrap_or_else(|| SAMPLE_HAYSTACK.to_string());
    info!(haystack = %haystack, len = haystack.len(), "preparing inputs");

    let prover = build_prover(&args)?;
    let bundle = prover.prove_haystack(haystack.as_bytes())?;

    println!(
        "Match: [{}, {}) ({} bytes)",
        bundle.metadata.match_start,
        bundle.metadata.match_start + bundle.metadata.match_length,
        bundle.metadata.match_length
    );

    // Show what each capture group grabbed; the witness is cheap to rebuild.
    let trace = match_haystack(prover.automaton(), haystack.as_bytes(), prover.profile())?;
    for group in 1..=prover.automaton().num_capture_groups() as u32 {
        if let Some(bytes) = trace.captured_bytes(group) {
            println!(
                "Capture group {}: \"{}\"",
                group,
                String::from_utf8_lossy(bytes)
            );
        }
    }

    bundle.save(&output_dir)?;
    println!(
        "Saved proof ({} bytes) and {} public inputs to {:?}",
        bundle.metadata.proof_size,
        bundle.proof.public_inputs.len(),
        output_dir
    );

    Ok(())
}

fn cmd_verify(proof_dir: PathBuf, args: ProverArgs) -> Result<()> {
    info!("loading proof artifacts from {:?}", proof_dir);
    let bundle = ProofBundle::load(&proof_dir)?;
    let prover = build_prover(&args)?;

    match prover.verify(&bundle) {
        Ok(()) => {
            println!("Verification: PASSED");
        }
        Err(e) => {
            println!("Verification: FAILED - {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn cmd_export_verifier(output: PathBuf, args: ProverArgs) -> Result<()> {
    let prover = build_prover(&args)?;
    let contract = prover.export_verifier()?;
    std::fs::write(&output, &contract)?;
    println!(
        "Verifier contract written to {:?} ({:.2} KB)",
        output,
        contract.len() as f64 / 1024.0
    );
    Ok(())
}

fn cmd_info(proof_dir: PathBuf) -> Result<()> {
    let bundle = ProofBundle::load(&proof_dir)?;

    println!("Proof Information");
    println!("=================");
    println!("Backend: {}", bundle.metadata.backend_name);
    println!("Circuit: {}", bundle.metadata.circuit_fingerprint);
    println!("Proof size: {} bytes", bundle.metadata.proof_size);
    println!(
        "Match window: [{}, {}) in a {}-byte haystack",
        bundle.metadata.match_start,
        bundle.metadata.match_start + bundle.metadata.match_length,
        bundle.metadata.haystack_len
    );
    println!("Capture groups: {}", bundle.metadata.num_capture_groups);
    println!();
    println!("Public inputs:");
    for (i, field) in bundle.proof.public_inputs.iter().enumerate() {
        println!("  [{}] {}", i, field);
    }

    Ok(())
}
