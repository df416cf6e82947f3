//! fantasia-test-data
//!
//! A module to provide test files embedded in the crate for use in testing.
//! Example sequence files and stand-in stage scripts are included in the crate distribution.
//!
//! The test files are represented as `TestFile` objects which package the raw binary data
//! and create temporary files (or files in a chosen directory) for programs to operate on.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};

#[derive(Debug)]
/// Test File
///
/// Example usage:
///
/// ```ignore
/// // returns (filepath, _tempfile_handle).
/// // _handle ensures the tempfile remains in scope
/// use fantasia_test_data::TestFile;
/// let (fasta_file, _temp) = TestFile::proteins_01().create_temp().unwrap();
///
/// // or place it with a fixed name inside a directory you own
/// let infile = TestFile::proteins_01().write_to(dir.path(), "in.fasta").unwrap();
/// ```
pub struct TestFile {
    filebinary: &'static [u8],
    suffix: &'static str,
}

impl TestFile {
    /// Three globin sequences, each terminated by a `*` stop symbol.
    pub fn proteins_01() -> Self {
        Self {
            filebinary: include_bytes!("../data/sequences/proteins_01.fasta"),
            suffix: "fasta",
        }
    }
    /// Two identical sequences under different headers.
    pub fn proteins_02() -> Self {
        Self {
            filebinary: include_bytes!("../data/sequences/proteins_02.fasta"),
            suffix: "fasta",
        }
    }
    /// Shell script copying `$1` to `$2`; stands in for the dedup and length-filter tools.
    pub fn copy_stage_script() -> Self {
        Self {
            filebinary: include_bytes!("../data/scripts/copy_stage.sh"),
            suffix: "sh",
        }
    }
    /// Shell script that always exits with status 3.
    pub fn failing_stage_script() -> Self {
        Self {
            filebinary: include_bytes!("../data/scripts/failing_stage.sh"),
            suffix: "sh",
        }
    }

    pub fn contents(&self) -> &'static [u8] {
        self.filebinary
    }

    pub fn create_temp(&self) -> io::Result<(String, NamedTempFile)> {
        let temp = Builder::new()
            .suffix(&format!(".{}", self.suffix))
            .tempfile()?;

        fs::write(&temp, self.filebinary)?;
        let path = temp.path().to_string_lossy().into_owned();

        Ok((path, temp))
    }

    /// Write the file as `dir/name`, creating `dir` if needed.
    pub fn write_to(&self, dir: impl AsRef<Path>, name: &str) -> io::Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(name);
        fs::write(&path, self.filebinary)?;
        Ok(path)
    }
}
