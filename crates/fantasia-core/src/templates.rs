//! Configuration documents for the embedding-extraction and annotation-transfer tools.
//!
//! Each document is built as a plain serde value from [`TemplateParams`] and only turned
//! into text at the very end, so a document is either rendered completely or not at all.
//!
//! ```ignore
//! let params = TemplateParams::new("/data/in_cdhit100.fasta", "run1", "/opt/tools", "/results");
//! let yaml = embedding_document(Model::Seqvec, Mode::Cpu, &params).to_yaml()?;
//! ```
use crate::model::{Model, Mode};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Extension of every generated document.
pub const DOCUMENT_EXTENSION: &str = "yml";

// Reference data shipped with the annotation-transfer tool, relative to the tool root.
const GO_ONTOLOGY: &str = "goPredSim/data/GO/go_2022.obo";
const GO_ANNOTATIONS: &str = "goPredSim/data/goa_annotations/goa_annotations_2022.txt";
const SEQVEC_LOOKUP_SET: &str = "goPredSim/data/seqvec_fixed_lookup.h5";
const PROTT5_LOOKUP_SET: &str = "goPredSim/data/prott5_goa_2022.h5";

const SEQVEC_WEIGHTS: &str = "models/weights.hdf5";
const SEQVEC_OPTIONS: &str = "models/options.json";
const PROTT5_MODEL_DIR: &str = "models/prottrans_t5_xl_u50";

/// File the extraction tool writes per-protein embeddings to.
pub const REDUCED_EMBEDDINGS_FILE: &str = "reduced_embeddings_file.h5";

const SIMILARITY_THRESHOLD: u32 = 1;
const SELECTION_MODE: &str = "num";
const ONTOLOGY_SCOPE: &str = "all";

/// Inputs shared by every template.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateParams {
    /// Sequence file handed to the extraction tool.
    pub sequences_file: PathBuf,
    /// Run-wide prefix; each model namespaces it as `{prefix}_{model}`.
    pub prefix: String,
    /// Installation root of the downstream tools (models and reference data).
    pub tool_root: PathBuf,
    /// Root under which the downstream tools write their results.
    pub outpath: PathBuf,
}

impl TemplateParams {
    pub fn new(
        sequences_file: impl Into<PathBuf>,
        prefix: impl Into<String>,
        tool_root: impl Into<PathBuf>,
        outpath: impl Into<PathBuf>,
    ) -> Self {
        Self {
            sequences_file: sequences_file.into(),
            prefix: prefix.into(),
            tool_root: tool_root.into(),
            outpath: outpath.into(),
        }
    }

    fn tool_path(&self, relative: &str) -> PathBuf {
        self.tool_root.join(relative)
    }

    /// `{outpath}/{prefix}_{model}`
    fn model_output_dir(&self, model: Model) -> PathBuf {
        self.outpath.join(model.run_prefix(&self.prefix))
    }
}

/// Where the extraction tool will put the reduced embeddings for `model`.
///
/// Only referenced by the generated documents; nothing creates it here.
pub fn reduced_embeddings_path(model: Model, params: &TemplateParams) -> PathBuf {
    params
        .model_output_dir(model)
        .join(embedding_section_name(model, &params.prefix))
        .join(REDUCED_EMBEDDINGS_FILE)
}

fn embedding_section_name(model: Model, prefix: &str) -> String {
    format!("{}_embeddings", model.run_prefix(prefix))
}

// Embedding Extraction --------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddingDocument {
    pub global: GlobalSection,
    #[serde(flatten)]
    pub stages: BTreeMap<String, EmbedStage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalSection {
    pub sequences_file: PathBuf,
    pub prefix: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedStage {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub protocol: &'static str,
    #[serde(flatten)]
    pub weights: ModelWeights,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub half_precision_model: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<&'static str>,
    pub reduce: bool,
    pub discard_per_amino_acid_embeddings: bool,
}

/// Model-artifact location; the two protocols name it differently.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ModelWeights {
    Seqvec {
        weights_file: PathBuf,
        options_file: PathBuf,
    },
    Prott5 {
        model_directory: PathBuf,
    },
}

/// Extraction document for `(model, mode)`.
pub fn embedding_document(model: Model, mode: Mode, params: &TemplateParams) -> EmbeddingDocument {
    let (protocol, weights) = match model {
        Model::Seqvec => (
            "seqvec",
            ModelWeights::Seqvec {
                weights_file: params.tool_path(SEQVEC_WEIGHTS),
                options_file: params.tool_path(SEQVEC_OPTIONS),
            },
        ),
        Model::Prott5 => (
            "prottrans_t5_xl_u50",
            ModelWeights::Prott5 {
                model_directory: params.tool_path(PROTT5_MODEL_DIR),
            },
        ),
    };
    let (half_precision_model, device) = match (model, mode) {
        (_, Mode::Cpu) => (None, None),
        (Model::Seqvec, Mode::Gpu) => (None, Some("cuda")),
        (Model::Prott5, Mode::Gpu) => (Some(true), Some("cuda")),
    };

    let stage = EmbedStage {
        kind: "embed",
        protocol,
        weights,
        half_precision_model,
        device,
        reduce: true,
        discard_per_amino_acid_embeddings: true,
    };

    EmbeddingDocument {
        global: GlobalSection {
            sequences_file: params.sequences_file.clone(),
            prefix: model.run_prefix(&params.prefix),
        },
        stages: BTreeMap::from([(embedding_section_name(model, &params.prefix), stage)]),
    }
}

// Annotation Transfer ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationDocument {
    pub go: PathBuf,
    pub lookup_set: PathBuf,
    pub annotations: PathBuf,
    pub targets: PathBuf,
    pub onto: &'static str,
    pub thresh: u32,
    pub modus: &'static str,
    pub output: PathBuf,
}

/// Annotation-transfer document for `model`. Mode does not matter here.
pub fn annotation_document(model: Model, params: &TemplateParams) -> AnnotationDocument {
    let lookup_set = match model {
        Model::Seqvec => SEQVEC_LOOKUP_SET,
        Model::Prott5 => PROTT5_LOOKUP_SET,
    };
    AnnotationDocument {
        go: params.tool_path(GO_ONTOLOGY),
        lookup_set: params.tool_path(lookup_set),
        annotations: params.tool_path(GO_ANNOTATIONS),
        targets: reduced_embeddings_path(model, params),
        onto: ONTOLOGY_SCOPE,
        thresh: SIMILARITY_THRESHOLD,
        modus: SELECTION_MODE,
        output: params
            .model_output_dir(model)
            .join(format!("gopredsim_{}", model.run_prefix(&params.prefix))),
    }
}

/// Serialize any document to YAML text.
pub fn to_yaml<T: Serialize>(document: &T) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(document)
}

impl EmbeddingDocument {
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        to_yaml(self)
    }
}

impl AnnotationDocument {
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        to_yaml(self)
    }
}

/// `{dir}/{model_prefix}.yml`
pub fn document_path(dir: &Path, model_prefix: &str) -> PathBuf {
    dir.join(format!("{model_prefix}.{DOCUMENT_EXTENSION}"))
}
