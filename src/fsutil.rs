use std::fmt::Display;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// Error that occurs when an operation on a kernel control file fails.
///
/// Carries the operation and the offending path so that failures deep inside a
/// stat or limit-write pass remain diagnosable.
#[derive(Debug, thiserror::Error)]
#[error("failed to {op} `{path}`: {source}")]
pub struct FileError {
    pub op: &'static str,
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl FileError {
    pub(crate) fn new(op: &'static str, path: &Path, source: io::Error) -> Self {
        Self {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Opens the file at `path` for reading.
///
/// # Errors
///
/// Returns a [`FileError`] if the file cannot be opened.
pub fn open_file(path: impl AsRef<Path>) -> Result<File, FileError> {
    let path = path.as_ref();
    File::open(path).map_err(|source| FileError::new("open", path, source))
}

/// Reads the full contents of the file at `path` into a string.
pub fn read_to_string(path: impl AsRef<Path>) -> Result<String, FileError> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|source| FileError::new("read", path, source))
}

/// Reads a single decimal integer occupying the whole file at `path`.
///
/// Kernel limit and counter files hold one decimal value followed by a
/// newline; surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns a [`FileError`] if the file cannot be read or does not contain a
/// decimal integer.
pub fn read_uint(path: impl AsRef<Path>) -> Result<u64, FileError> {
    let path = path.as_ref();
    let raw = read_to_string(path)?;
    raw.trim().parse::<u64>().map_err(|source| {
        FileError::new(
            "parse",
            path,
            io::Error::new(io::ErrorKind::InvalidData, source),
        )
    })
}

/// Writes `value`, formatted as text, as the full contents of the file at
/// `path`.
pub fn write_value(path: impl AsRef<Path>, value: impl Display) -> Result<(), FileError> {
    let path = path.as_ref();
    std::fs::write(path, value.to_string()).map_err(|source| FileError::new("write", path, source))
}

/// Creates the directory at `path` together with any missing parents.
pub fn create_dir_all(path: impl AsRef<Path>) -> Result<(), FileError> {
    let path = path.as_ref();
    std::fs::create_dir_all(path).map_err(|source| FileError::new("create", path, source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_uint_roundtrip() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("memory.limit_in_bytes");
        write_value(&path, 100_000_000u64).expect("should write limit");
        assert_eq!(read_uint(&path).unwrap(), 100_000_000);
    }

    #[test]
    fn test_read_uint_trims_newline() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("failcnt");
        std::fs::write(&path, "42\n").unwrap();
        assert_eq!(read_uint(&path).unwrap(), 42);
    }

    #[test]
    fn test_read_uint_invalid_data() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("bogus");
        std::fs::write(&path, "not-a-number\n").unwrap();
        let err = read_uint(&path).unwrap_err();
        assert_eq!(err.op, "parse");
        assert_eq!(err.source.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_missing_file_keeps_path_context() {
        let err = read_uint("/definitely/does/not/exist").unwrap_err();
        assert_eq!(err.path, PathBuf::from("/definitely/does/not/exist"));
        assert_eq!(err.source.kind(), io::ErrorKind::NotFound);
    }
}
