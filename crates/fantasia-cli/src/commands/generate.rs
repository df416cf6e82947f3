use clap::Args;
use fantasia_core::{generate, GenerationRequest};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// FASTA file to annotate with SeqVec.
    #[arg(short, long)]
    seqvec: Option<PathBuf>,

    /// FASTA file to annotate with ProtT5.
    #[arg(short, long)]
    prott5: Option<PathBuf>,

    /// Where goPredSim output will be created. Defaults to the current directory.
    #[arg(short, long)]
    outpath: Option<PathBuf>,

    /// Prefix for every generated file and output folder.
    #[arg(short = 'n', long)]
    name: String,

    /// Installation root of the embedding and goPredSim tools.
    #[arg(short, long)]
    gopredsim: PathBuf,

    /// Configuration files root (receives `embeddings/` and `gopredsim/`).
    #[arg(short, long)]
    config: PathBuf,

    /// cpu or gpu
    #[arg(short, long)]
    mode: String,
}

pub fn execute(args: GenerateArgs) -> anyhow::Result<()> {
    let request = GenerationRequest::builder()
        .maybe_seqvec(args.seqvec)
        .maybe_prott5(args.prott5)
        .maybe_outpath(args.outpath)
        .prefix(args.name)
        .mode(args.mode)
        .tool_root(args.gopredsim)
        .config_root(args.config)
        .build();

    for artifact in generate(request)? {
        println!("{}", artifact.path.display());
    }
    Ok(())
}
