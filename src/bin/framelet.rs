//! Authoring CLI: compile worklet sources to wire envelopes and evaluate
//! them against ad-hoc bindings.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use framelet::{
    DeliveryAck, Envelope, EnvelopePacker, EnvelopeSink, FrameBinding, FrameletResult, Interpreter,
    Value, WorkletId, WorkletSource, compile, validate,
};

#[derive(Parser, Debug)]
#[command(name = "framelet", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile and validate a worklet source, writing the wire envelope.
    Compile(CompileArgs),
    /// Compile and validate a worklet source, reporting success or failure.
    Validate(ValidateArgs),
    /// Evaluate a wire envelope against a one-off binding.
    Eval(EvalArgs),
}

#[derive(Parser, Debug)]
struct CompileArgs {
    /// Input worklet source JSON (params, returnKind, body).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Worklet id recorded in the envelope.
    #[arg(long, default_value = "worklet")]
    id: String,

    /// Config map JSON merged into every frame binding.
    #[arg(long)]
    config: Option<String>,

    /// Output envelope JSON path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input worklet source JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct EvalArgs {
    /// Input envelope JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Binding map JSON, e.g. '{"time": 2.0}'.
    #[arg(long, default_value = "{}")]
    bind: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Compile(args) => cmd_compile(args),
        Command::Validate(args) => cmd_validate(args),
        Command::Eval(args) => cmd_eval(args),
    }
}

/// Captures the packed envelope instead of crossing a real boundary.
#[derive(Default)]
struct CaptureSink {
    envelope: Option<Envelope>,
}

impl EnvelopeSink for CaptureSink {
    fn deliver(&mut self, envelope: &Envelope) -> FrameletResult<DeliveryAck> {
        self.envelope = Some(envelope.clone());
        Ok(DeliveryAck::new(envelope.id.clone()))
    }
}

fn cmd_compile(args: CompileArgs) -> anyhow::Result<()> {
    let source = read_source(&args.in_path)?;
    let program = compile(&source)?;

    let config: BTreeMap<String, Value> = match &args.config {
        Some(json) => serde_json::from_str(json).context("parse --config JSON")?,
        None => BTreeMap::new(),
    };

    let mut packer = EnvelopePacker::new();
    let mut sink = CaptureSink::default();
    packer.pack_and_deliver(WorkletId::new(&args.id), &program, &config, &mut sink)?;
    let envelope = sink
        .envelope
        .context("packer produced no envelope")?;

    let json = envelope.to_wire_json()?;
    match &args.out {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("write envelope '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let source = read_source(&args.in_path)?;
    let program = compile(&source)?;
    validate(&program)?;
    eprintln!("ok: {} parameter(s), returns {}", program.params.len(), program.return_kind);
    Ok(())
}

fn cmd_eval(args: EvalArgs) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read envelope '{}'", args.in_path.display()))?;
    let envelope = Envelope::from_wire_json(&json)?;

    let bind: BTreeMap<String, Value> =
        serde_json::from_str(&args.bind).context("parse --bind JSON")?;

    let mut binding = FrameBinding::new();
    for (name, value) in &envelope.config {
        binding.set(name.clone(), value.clone());
    }
    for (name, value) in bind {
        binding.set(name, value);
    }

    let result = Interpreter::evaluate(&envelope.program, &binding)?;
    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}

fn read_source(path: &PathBuf) -> anyhow::Result<WorkletSource> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read worklet source '{}'", path.display()))?;
    serde_json::from_str(&json).context("parse worklet source JSON")
}
