//! Protein language models, compute modes, and the set of models selected for a run.
use crate::errors::{FantasiaError, Result};
use std::path::{Component, Path};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString};

/// Embedding protocol understood by the extraction tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Model {
    Seqvec,
    Prott5,
}

impl Model {
    /// Namespace shared by every artifact generated for this model: `{prefix}_{model}`.
    pub fn run_prefix(&self, prefix: &str) -> String {
        format!("{prefix}_{self}")
    }
}

/// A prefix names files and directories directly, so it must be a single plain path
/// component: non-empty, no surrounding whitespace, no separators, not `.` or `..`.
pub fn check_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty() {
        return Err(FantasiaError::missing(
            "prefix",
            "prefix name has not been specified",
        ));
    }
    if prefix.trim() != prefix {
        return Err(FantasiaError::missing(
            "prefix",
            format!("'{prefix}' has leading or trailing whitespace"),
        ));
    }
    let mut components = Path::new(prefix).components();
    let single_component = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single_component || prefix.contains(['/', '\\']) {
        return Err(FantasiaError::missing(
            "prefix",
            format!("'{prefix}' must be a plain name without path separators"),
        ));
    }
    Ok(())
}

/// Compute device label. Only affects which template variant is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Mode {
    Cpu,
    Gpu,
}

impl Mode {
    pub fn parse(text: &str) -> Result<Self> {
        Mode::from_str(text).map_err(|_| FantasiaError::InvalidMode(text.to_string()))
    }
}

/// The models requested for a run, resolved once from the two boolean flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSelection {
    SeqvecOnly,
    Prott5Only,
    Both,
}

impl ModelSelection {
    pub fn from_flags(seqvec: bool, prott5: bool) -> Result<Self> {
        match (seqvec, prott5) {
            (true, false) => Ok(Self::SeqvecOnly),
            (false, true) => Ok(Self::Prott5Only),
            (true, true) => Ok(Self::Both),
            (false, false) => Err(FantasiaError::missing(
                "models",
                "at least one of seqvec or prott5 must be selected",
            )),
        }
    }

    /// Selected models, seqvec first.
    pub fn models(&self) -> &'static [Model] {
        match self {
            Self::SeqvecOnly => &[Model::Seqvec],
            Self::Prott5Only => &[Model::Prott5],
            Self::Both => &[Model::Seqvec, Model::Prott5],
        }
    }

    pub fn uses(&self, model: Model) -> bool {
        self.models().contains(&model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_is_case_insensitive() {
        for text in ["GPU", "gpu", "Gpu"] {
            assert_eq!(Mode::parse(text).unwrap(), Mode::Gpu);
        }
        assert_eq!(Mode::parse("Cpu").unwrap(), Mode::Cpu);
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        for text in ["tpu", "", "cuda"] {
            match Mode::parse(text) {
                Err(FantasiaError::InvalidMode(m)) => assert_eq!(m, text),
                other => panic!("expected InvalidMode, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_mode_rejects_surrounding_whitespace() {
        for text in [" gpu ", "cpu\n", " CPU"] {
            assert!(matches!(Mode::parse(text), Err(FantasiaError::InvalidMode(_))));
        }
    }

    #[test]
    fn test_check_prefix() {
        for good in ["run1", "my.run", "run_1-b"] {
            check_prefix(good).unwrap();
        }
        for bad in [
            "",
            " run1",
            "run1 ",
            ".",
            "..",
            "../../escaped",
            "a/b",
            "/abs",
            "a\\b",
            "run1/",
        ] {
            assert!(
                matches!(
                    check_prefix(bad),
                    Err(FantasiaError::MissingParameter { name: "prefix", .. })
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_model_names() {
        assert_eq!(Model::Seqvec.to_string(), "seqvec");
        assert_eq!(Model::Prott5.run_prefix("run1"), "run1_prott5");
    }

    #[test]
    fn test_selection_from_flags() {
        assert_eq!(
            ModelSelection::from_flags(true, true).unwrap().models(),
            &[Model::Seqvec, Model::Prott5]
        );
        let only = ModelSelection::from_flags(false, true).unwrap();
        assert!(only.uses(Model::Prott5));
        assert!(!only.uses(Model::Seqvec));
        assert!(matches!(
            ModelSelection::from_flags(false, false),
            Err(FantasiaError::MissingParameter { name: "models", .. })
        ));
    }
}
