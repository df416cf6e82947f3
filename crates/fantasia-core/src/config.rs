//! Run configuration
//!
//! The YAML document handed to `fantasia run`, and the immutable [`RunParameters`] it
//! resolves into. Relative directories are joined onto `project_root`.
//!
//! ```yaml
//! base_directories:
//!   project_root: /home/user/fantasia
//!   scripts: scripts
//!   data: data
//!   results: results
//!   config: config
//! parameters:
//!   infile: data/proteome.pep
//!   outpath: results/proteome
//!   prefix: proteome
//!   mode: gpu
//!   models:
//!     seqvec: true
//!     prott5: true
//! ```
use crate::errors::{FantasiaError, Result};
use crate::model::{check_prefix, Mode, ModelSelection};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Generated documents live in this subdirectory of the `config` base directory.
pub const CONFIG_FILES_DIR: &str = "config_files";

#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    pub base_directories: BaseDirectories,
    pub parameters: Parameters,
    #[serde(default)]
    pub tools: ToolConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BaseDirectories {
    pub project_root: PathBuf,
    pub scripts: PathBuf,
    pub data: PathBuf,
    pub results: PathBuf,
    pub config: PathBuf,
    /// Installation root of the embedding and annotation tools. Defaults to `project_root`.
    #[serde(default)]
    pub tool_root: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Parameters {
    pub infile: PathBuf,
    pub outpath: PathBuf,
    pub prefix: String,
    pub mode: String,
    pub models: ModelFlags,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ModelFlags {
    pub seqvec: bool,
    pub prott5: bool,
}

/// External helpers used by the preprocessing stages.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub interpreter: String,
    /// Relative to the scripts directory.
    pub dedup_script: PathBuf,
    /// Relative to the scripts directory.
    pub length_filter_script: PathBuf,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            interpreter: "bash".to_string(),
            dedup_script: PathBuf::from("cd_hit_100.sh"),
            length_filter_script: PathBuf::from("remove_larger5k_prots.sh"),
        }
    }
}

impl RunConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(FantasiaError::InputNotFound {
                what: "configuration file",
                path: path.to_path_buf(),
            });
        }
        let text = fs::read_to_string(path).map_err(FantasiaError::io(path))?;
        Self::from_yaml(&text).map_err(|err| match err {
            FantasiaError::ConfigSchema { message, .. } => FantasiaError::ConfigSchema {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|err| FantasiaError::ConfigSchema {
            path: PathBuf::from("<inline>"),
            message: err.to_string(),
        })
    }

    /// Check every parameter and resolve all paths against `project_root`.
    pub fn resolve(self) -> Result<RunParameters> {
        let base = self.base_directories;
        let params = self.parameters;

        if base.project_root.as_os_str().is_empty() {
            return Err(FantasiaError::missing(
                "project_root",
                "base directory must not be empty",
            ));
        }
        check_prefix(&params.prefix)?;
        if params.outpath.as_os_str().is_empty() {
            return Err(FantasiaError::missing(
                "outpath",
                "output path has not been specified",
            ));
        }
        let mode = Mode::parse(&params.mode)?;
        let models = ModelSelection::from_flags(params.models.seqvec, params.models.prott5)?;

        let root = base.project_root;
        let scripts_dir = root.join(base.scripts);
        let tool_root = base.tool_root.map_or_else(|| root.clone(), |t| root.join(t));

        Ok(RunParameters {
            dedup_script: scripts_dir.join(&self.tools.dedup_script),
            length_filter_script: scripts_dir.join(&self.tools.length_filter_script),
            interpreter: self.tools.interpreter,
            data_dir: root.join(base.data),
            results_dir: root.join(base.results),
            config_dir: root.join(base.config),
            infile: root.join(params.infile),
            outpath: root.join(params.outpath),
            prefix: params.prefix,
            scripts_dir,
            tool_root,
            project_root: root,
            mode,
            models,
        })
    }
}

/// Fully resolved inputs for one run. Built once, then only read.
#[derive(Debug, Clone, PartialEq)]
pub struct RunParameters {
    pub project_root: PathBuf,
    pub scripts_dir: PathBuf,
    pub data_dir: PathBuf,
    pub results_dir: PathBuf,
    pub config_dir: PathBuf,
    pub tool_root: PathBuf,
    pub infile: PathBuf,
    pub outpath: PathBuf,
    pub prefix: String,
    pub mode: Mode,
    pub models: ModelSelection,
    pub interpreter: String,
    pub dedup_script: PathBuf,
    pub length_filter_script: PathBuf,
}

impl RunParameters {
    /// Root of the generated documents: `{config}/config_files`.
    pub fn config_root(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILES_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;

    const CONFIG: &str = r#"
base_directories:
  project_root: /srv/fantasia
  scripts: scripts
  data: data
  results: results
  config: config
parameters:
  infile: data/in.fasta
  outpath: results/run1
  prefix: run1
  mode: CPU
  models:
    seqvec: true
    prott5: false
"#;

    #[test]
    fn test_resolve_joins_relative_paths() {
        let params = RunConfig::from_yaml(CONFIG).unwrap().resolve().unwrap();
        assert_eq!(params.scripts_dir, PathBuf::from("/srv/fantasia/scripts"));
        assert_eq!(params.data_dir, PathBuf::from("/srv/fantasia/data"));
        assert_eq!(params.results_dir, PathBuf::from("/srv/fantasia/results"));
        assert_eq!(params.infile, PathBuf::from("/srv/fantasia/data/in.fasta"));
        assert_eq!(params.outpath, PathBuf::from("/srv/fantasia/results/run1"));
        assert_eq!(
            params.config_root(),
            PathBuf::from("/srv/fantasia/config/config_files")
        );
        assert_eq!(params.tool_root, PathBuf::from("/srv/fantasia"));
        assert_eq!(params.mode, Mode::Cpu);
        assert_eq!(params.models, ModelSelection::SeqvecOnly);
        assert!(!params.models.uses(Model::Prott5));
        assert_eq!(
            params.dedup_script,
            PathBuf::from("/srv/fantasia/scripts/cd_hit_100.sh")
        );
        assert_eq!(
            params.length_filter_script,
            PathBuf::from("/srv/fantasia/scripts/remove_larger5k_prots.sh")
        );
        assert_eq!(params.interpreter, "bash");
    }

    #[test]
    fn test_optional_tool_overrides() {
        let text = CONFIG.replace(
            "  config: config\n",
            "  config: config\n  tool_root: vendor/goPredSim\n",
        ) + "tools:\n  interpreter: sh\n  dedup_script: dedup.sh\n";
        let params = RunConfig::from_yaml(&text).unwrap().resolve().unwrap();
        assert_eq!(params.tool_root, PathBuf::from("/srv/fantasia/vendor/goPredSim"));
        assert_eq!(params.interpreter, "sh");
        assert_eq!(
            params.dedup_script,
            PathBuf::from("/srv/fantasia/scripts/dedup.sh")
        );
        assert_eq!(
            params.length_filter_script,
            PathBuf::from("/srv/fantasia/scripts/remove_larger5k_prots.sh")
        );
    }

    #[test]
    fn test_missing_key_is_schema_error() {
        let text = CONFIG.replace("  prefix: run1\n", "");
        match RunConfig::from_yaml(&text) {
            Err(FantasiaError::ConfigSchema { message, .. }) => {
                assert!(message.contains("prefix"), "{message}")
            }
            other => panic!("expected ConfigSchema, got {other:?}"),
        }

        let text = CONFIG.replace("    prott5: false\n", "");
        assert!(matches!(
            RunConfig::from_yaml(&text),
            Err(FantasiaError::ConfigSchema { .. })
        ));
    }

    #[test]
    fn test_extra_keys_are_ignored() {
        let text = CONFIG.replace("  prefix: run1\n", "  prefix: run1\n  note: draft run\n")
            + "comment: kept for the lab notebook\n";
        let params = RunConfig::from_yaml(&text).unwrap().resolve().unwrap();
        assert_eq!(params.prefix, "run1");
    }

    #[test]
    fn test_prefix_is_used_verbatim_or_rejected() {
        for prefix in ["\" run1\"", "../../escaped", "nested/run1", "\"..\""] {
            let text = CONFIG.replace("prefix: run1", &format!("prefix: {prefix}"));
            assert!(
                matches!(
                    RunConfig::from_yaml(&text).unwrap().resolve(),
                    Err(FantasiaError::MissingParameter { name: "prefix", .. })
                ),
                "{prefix} should be rejected"
            );
        }
    }

    #[test]
    fn test_no_models_selected() {
        let text = CONFIG.replace("seqvec: true", "seqvec: false");
        let err = RunConfig::from_yaml(&text).unwrap().resolve().unwrap_err();
        assert!(matches!(
            err,
            FantasiaError::MissingParameter { name: "models", .. }
        ));
    }

    #[test]
    fn test_bad_mode_and_empty_prefix() {
        let text = CONFIG.replace("mode: CPU", "mode: tpu");
        assert!(matches!(
            RunConfig::from_yaml(&text).unwrap().resolve(),
            Err(FantasiaError::InvalidMode(_))
        ));

        let text = CONFIG.replace("prefix: run1", "prefix: \"\"");
        assert!(matches!(
            RunConfig::from_yaml(&text).unwrap().resolve(),
            Err(FantasiaError::MissingParameter { name: "prefix", .. })
        ));
    }

    #[test]
    fn test_from_path_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yml");
        assert!(matches!(
            RunConfig::from_path(&path),
            Err(FantasiaError::InputNotFound { .. })
        ));

        std::fs::write(&path, "parameters: {}\n").unwrap();
        match RunConfig::from_path(&path) {
            Err(FantasiaError::ConfigSchema { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected ConfigSchema, got {other:?}"),
        }
    }
}
