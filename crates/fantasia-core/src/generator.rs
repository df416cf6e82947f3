//! Configuration Generator
//!
//! Validates a [`GenerationRequest`], renders every document for the selected models in
//! memory, and only then writes them under the [`DirectoryLayout`].
use crate::errors::{FantasiaError, Result};
use crate::model::{check_prefix, Mode, Model, ModelSelection};
use crate::templates::{annotation_document, document_path, embedding_document, TemplateParams};
use bon::Builder;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The two fixed subdirectories of the configuration root.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryLayout {
    root: PathBuf,
}

impl DirectoryLayout {
    pub const EMBEDDINGS: &'static str = "embeddings";
    pub const GOPREDSIM: &'static str = "gopredsim";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
    pub fn root(&self) -> &Path {
        &self.root
    }
    pub fn embeddings_dir(&self) -> PathBuf {
        self.root.join(Self::EMBEDDINGS)
    }
    pub fn gopredsim_dir(&self) -> PathBuf {
        self.root.join(Self::GOPREDSIM)
    }
    /// Create both subdirectories. Existing directories are left untouched.
    pub fn create(&self) -> Result<()> {
        for dir in [self.embeddings_dir(), self.gopredsim_dir()] {
            fs::create_dir_all(&dir).map_err(FantasiaError::io(&dir))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Read by the embedding-extraction tool.
    Embeddings,
    /// Read by the annotation-transfer tool.
    Annotation,
}

/// One rendered document and where it goes.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedArtifact {
    pub model: Model,
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub content: String,
}

/// Everything the Generator needs, as supplied by a caller. Nothing is checked until
/// [`GenerationRequest::validate`].
#[derive(Debug, Clone, Builder)]
pub struct GenerationRequest {
    #[builder(into)]
    seqvec: Option<PathBuf>,
    #[builder(into)]
    prott5: Option<PathBuf>,
    #[builder(into)]
    prefix: String,
    #[builder(into)]
    mode: String,
    #[builder(into)]
    tool_root: PathBuf,
    #[builder(into)]
    config_root: PathBuf,
    /// Defaults to the working directory of the process.
    #[builder(into)]
    outpath: Option<PathBuf>,
}

impl GenerationRequest {
    pub fn validate(self) -> Result<ValidatedRequest> {
        let selection = ModelSelection::from_flags(self.seqvec.is_some(), self.prott5.is_some())?;

        check_prefix(&self.prefix)?;
        if self.tool_root.as_os_str().is_empty() {
            return Err(FantasiaError::missing(
                "tool_root",
                "path to the tool installation not provided",
            ));
        }
        if self.config_root.as_os_str().is_empty() {
            return Err(FantasiaError::missing(
                "config_root",
                "path to configuration files not provided",
            ));
        }
        let mode = Mode::parse(&self.mode)?;

        for path in [&self.seqvec, &self.prott5].into_iter().flatten() {
            if !path.exists() {
                return Err(FantasiaError::InputNotFound {
                    what: "sequence file",
                    path: path.clone(),
                });
            }
        }

        let outpath = match self.outpath {
            Some(path) if !path.as_os_str().is_empty() => path,
            _ => {
                let cwd = std::env::current_dir().map_err(FantasiaError::io("."))?;
                debug!("no outpath given, using {}", cwd.display());
                cwd
            }
        };

        Ok(ValidatedRequest {
            selection,
            seqvec: self.seqvec,
            prott5: self.prott5,
            prefix: self.prefix,
            mode,
            tool_root: self.tool_root,
            layout: DirectoryLayout::new(self.config_root),
            outpath,
        })
    }
}

/// A request whose preconditions all hold.
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    selection: ModelSelection,
    seqvec: Option<PathBuf>,
    prott5: Option<PathBuf>,
    prefix: String,
    mode: Mode,
    tool_root: PathBuf,
    layout: DirectoryLayout,
    outpath: PathBuf,
}

impl ValidatedRequest {
    pub fn selection(&self) -> ModelSelection {
        self.selection
    }
    pub fn mode(&self) -> Mode {
        self.mode
    }
    pub fn layout(&self) -> &DirectoryLayout {
        &self.layout
    }
    pub fn outpath(&self) -> &Path {
        &self.outpath
    }

    fn sequences_file(&self, model: Model) -> Result<&Path> {
        let path = match model {
            Model::Seqvec => self.seqvec.as_deref(),
            Model::Prott5 => self.prott5.as_deref(),
        };
        path.ok_or_else(|| {
            FantasiaError::missing("models", format!("no sequence file given for {model}"))
        })
    }

    fn template_params(&self, sequences_file: &Path) -> TemplateParams {
        TemplateParams::new(
            sequences_file,
            self.prefix.as_str(),
            self.tool_root.as_path(),
            self.outpath.as_path(),
        )
    }

    /// Render both documents for every selected model. Nothing touches the disk.
    pub fn render(&self) -> Result<Vec<GeneratedArtifact>> {
        let models = self.selection.models();
        let mut artifacts = Vec::with_capacity(models.len() * 2);
        for &model in models {
            let params = self.template_params(self.sequences_file(model)?);
            let model_prefix = model.run_prefix(&self.prefix);

            let path = document_path(&self.layout.embeddings_dir(), &model_prefix);
            let content = embedding_document(model, self.mode, &params)
                .to_yaml()
                .map_err(|source| FantasiaError::Yaml {
                    path: path.clone(),
                    source,
                })?;
            artifacts.push(GeneratedArtifact {
                model,
                kind: ArtifactKind::Embeddings,
                path,
                content,
            });

            let path = document_path(&self.layout.gopredsim_dir(), &model_prefix);
            let content = annotation_document(model, &params)
                .to_yaml()
                .map_err(|source| FantasiaError::Yaml {
                    path: path.clone(),
                    source,
                })?;
            artifacts.push(GeneratedArtifact {
                model,
                kind: ArtifactKind::Annotation,
                path,
                content,
            });
        }
        Ok(artifacts)
    }
}

/// Create the layout and write every artifact, overwriting earlier runs.
pub fn write_artifacts(layout: &DirectoryLayout, artifacts: &[GeneratedArtifact]) -> Result<()> {
    layout.create()?;
    for artifact in artifacts {
        fs::write(&artifact.path, &artifact.content).map_err(FantasiaError::io(&artifact.path))?;
        info!(
            "wrote {:?} config for {}: {}",
            artifact.kind,
            artifact.model,
            artifact.path.display()
        );
    }
    Ok(())
}

/// Validate, render, write.
pub fn generate(request: GenerationRequest) -> Result<Vec<GeneratedArtifact>> {
    let request = request.validate()?;
    let artifacts = request.render()?;
    write_artifacts(request.layout(), &artifacts)?;
    Ok(artifacts)
}
