//! Preprocessing Orchestrator
//!
//! Runs the fixed chain of filtering stages over the raw sequence file:
//!
//! 1. `dedup` - external redundancy reduction, `in.fasta` -> `in_cdhit100.fasta`
//! 2. `length-filter` - external, only when ProtT5 is selected, `-> in_cdhit100_5k_removed.fasta`
//! 3. `strip-stop-symbols` - removes `*` in place from every file of the dedup family
//!
//! and then creates the configuration directory layout. Stages run one after the other;
//! the first failure aborts the run and earlier outputs are left as they are.
use crate::config::RunParameters;
use crate::errors::{FantasiaError, ProcessStatus, Result};
use crate::generator::DirectoryLayout;
use crate::model::Model;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

const DEDUP_TAG: &str = "_cdhit100";
const LENGTH_FILTER_TAG: &str = "_5k_removed";
const STOP_SYMBOL: u8 = b'*';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Dedup,
    LengthFilter,
    StripStopSymbols,
}

impl PipelineStage {
    pub fn name(&self) -> &'static str {
        match self {
            PipelineStage::Dedup => "dedup",
            PipelineStage::LengthFilter => "length-filter",
            PipelineStage::StripStopSymbols => "strip-stop-symbols",
        }
    }

    /// Suffix inserted before the extension of the file a stage writes. Stripping edits
    /// files in place and has none.
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            PipelineStage::Dedup => Some(DEDUP_TAG),
            PipelineStage::LengthFilter => Some(LENGTH_FILTER_TAG),
            PipelineStage::StripStopSymbols => None,
        }
    }
}

/// `dir/{stem}{tag}.{ext}`; the extension is kept as is.
pub fn derived_path(input: &Path, tag: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let name = match input.extension() {
        Some(ext) => format!("{stem}{tag}.{}", ext.to_string_lossy()),
        None => format!("{stem}{tag}"),
    };
    input.with_file_name(name)
}

pub fn dedup_output(infile: &Path) -> PathBuf {
    derived_path(infile, DEDUP_TAG)
}

pub fn length_filter_output(dedup_output: &Path) -> PathBuf {
    derived_path(dedup_output, LENGTH_FILTER_TAG)
}

/// One planned stage with its declared input and output.
#[derive(Debug, Clone, PartialEq)]
pub struct StageInvocation {
    pub stage: PipelineStage,
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Sequence files ready for embedding extraction, one per selected model.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PreparedInputs {
    pub seqvec: Option<PathBuf>,
    pub prott5: Option<PathBuf>,
}

pub struct Orchestrator<'a> {
    params: &'a RunParameters,
}

impl<'a> Orchestrator<'a> {
    pub fn new(params: &'a RunParameters) -> Self {
        Self { params }
    }

    /// The stages this run will execute, in order.
    pub fn plan(&self) -> Vec<StageInvocation> {
        let dedup = dedup_output(&self.params.infile);
        let mut plan = vec![StageInvocation {
            stage: PipelineStage::Dedup,
            input: self.params.infile.clone(),
            output: dedup.clone(),
        }];
        if self.params.models.uses(Model::Prott5) {
            plan.push(StageInvocation {
                stage: PipelineStage::LengthFilter,
                input: dedup.clone(),
                output: length_filter_output(&dedup),
            });
        }
        plan.push(StageInvocation {
            stage: PipelineStage::StripStopSymbols,
            input: dedup.clone(),
            output: dedup,
        });
        plan
    }

    fn script_for(&self, stage: PipelineStage) -> Option<&Path> {
        match stage {
            PipelineStage::Dedup => Some(self.params.dedup_script.as_path()),
            PipelineStage::LengthFilter => Some(self.params.length_filter_script.as_path()),
            PipelineStage::StripStopSymbols => None,
        }
    }

    pub fn run(&self) -> Result<PreparedInputs> {
        let params = self.params;
        if !params.infile.is_file() {
            return Err(FantasiaError::InputNotFound {
                what: "input file",
                path: params.infile.clone(),
            });
        }
        let plan = self.plan();
        for invocation in &plan {
            if let Some(script) = self.script_for(invocation.stage) {
                if !script.is_file() {
                    return Err(FantasiaError::InputNotFound {
                        what: "stage script",
                        path: script.to_path_buf(),
                    });
                }
            }
        }
        fs::create_dir_all(&params.outpath).map_err(FantasiaError::io(&params.outpath))?;

        for invocation in &plan {
            info!(
                stage = invocation.stage.name(),
                "{} -> {}",
                invocation.input.display(),
                invocation.output.display()
            );
            match self.script_for(invocation.stage) {
                Some(script) => self.run_external(invocation, script)?,
                None => {
                    let stripped = strip_stop_symbols(&invocation.output)?;
                    debug!("stripped stop symbols from {} file(s)", stripped.len());
                }
            }
            info!(stage = invocation.stage.name(), "finished");
        }

        DirectoryLayout::new(params.config_root()).create()?;

        let mut prepared = PreparedInputs::default();
        for invocation in &plan {
            match invocation.stage {
                PipelineStage::Dedup if params.models.uses(Model::Seqvec) => {
                    prepared.seqvec = Some(canonical(&invocation.output)?);
                }
                PipelineStage::LengthFilter => {
                    prepared.prott5 = Some(canonical(&invocation.output)?);
                }
                _ => {}
            }
        }
        Ok(prepared)
    }

    fn run_external(&self, invocation: &StageInvocation, script: &Path) -> Result<()> {
        let mut command = Command::new(&self.params.interpreter);
        command
            .arg(script)
            .arg(&invocation.input)
            .arg(&invocation.output);
        let rendered = render_command(&command);
        debug!(stage = invocation.stage.name(), "{rendered}");

        let status = command
            .status()
            .map_err(|err| FantasiaError::ExternalProcess {
                stage: invocation.stage.name(),
                command: rendered.clone(),
                status: ProcessStatus::SpawnFailed(err.to_string()),
            })?;
        if !status.success() {
            return Err(FantasiaError::ExternalProcess {
                stage: invocation.stage.name(),
                command: rendered,
                status: ProcessStatus::Exited(status),
            });
        }
        Ok(())
    }
}

fn render_command(command: &Command) -> String {
    std::iter::once(command.get_program())
        .chain(command.get_args())
        .map(OsStr::to_string_lossy)
        .collect::<Vec<_>>()
        .join(" ")
}

fn canonical(path: &Path) -> Result<PathBuf> {
    path.canonicalize().map_err(FantasiaError::io(path))
}

/// Remove every `*` from the files sharing `anchor`'s stem, rewriting them in place.
///
/// A file belongs to the family when its name is the stem followed by `.` or `_` (or
/// nothing), so `in_cdhit100.fasta`, `in_cdhit100.fasta.clstr` and
/// `in_cdhit100_5k_removed.fasta` are all covered. Returns the files that changed.
pub fn strip_stop_symbols(anchor: &Path) -> Result<Vec<PathBuf>> {
    let dir = match anchor.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let stem = anchor.file_stem().unwrap_or_default().to_string_lossy();

    let mut changed = Vec::new();
    for entry in fs::read_dir(dir).map_err(FantasiaError::io(dir))? {
        let entry = entry.map_err(FantasiaError::io(dir))?;
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();
        let in_family = name
            .strip_prefix(stem.as_ref())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(['.', '_']));
        if !in_family || !path.is_file() {
            continue;
        }

        let bytes = fs::read(&path).map_err(FantasiaError::io(&path))?;
        if !bytes.contains(&STOP_SYMBOL) {
            continue;
        }
        let cleaned: Vec<u8> = bytes.into_iter().filter(|b| *b != STOP_SYMBOL).collect();
        fs::write(&path, cleaned).map_err(FantasiaError::io(&path))?;
        changed.push(path);
    }
    changed.sort();
    Ok(changed)
}
