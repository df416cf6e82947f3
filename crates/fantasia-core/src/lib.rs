//! fantasia-core
//!
//! Prepares protein sequence files for embedding-based GO annotation and writes the
//! configuration documents read by the two downstream tools:
//!
//! - an embedding-extraction tool running either SeqVec or ProtT5,
//! - an annotation-transfer tool (goPredSim) working on those embeddings.
//!
//! The [`pipeline::Orchestrator`] cleans the raw input through a fixed chain of external
//! stages and the [`generator`] renders one pair of documents per selected model.
//!
//! ```no_run
//! use fantasia_core::RunConfig;
//! let params = RunConfig::from_path("config.yml")?.resolve()?;
//! let written = fantasia_core::run(&params)?;
//! # Ok::<(), fantasia_core::FantasiaError>(())
//! ```
pub mod config;
pub mod errors;
pub mod generator;
pub mod model;
pub mod pipeline;
pub mod templates;

pub use config::{RunConfig, RunParameters};
pub use errors::{FantasiaError, Result};
pub use generator::{generate, DirectoryLayout, GeneratedArtifact, GenerationRequest};
pub use model::{Mode, Model, ModelSelection};
pub use pipeline::{Orchestrator, PreparedInputs};

/// Preprocess `params.infile` and generate the documents for the prepared files.
pub fn run(params: &RunParameters) -> Result<Vec<GeneratedArtifact>> {
    let prepared = Orchestrator::new(params).run()?;
    let request = GenerationRequest::builder()
        .maybe_seqvec(prepared.seqvec)
        .maybe_prott5(prepared.prott5)
        .prefix(params.prefix.as_str())
        .mode(params.mode.to_string())
        .tool_root(params.tool_root.as_path())
        .config_root(params.config_root())
        .outpath(params.outpath.as_path())
        .build();
    generate(request)
}
