use std::fs;
use std::path::Path;

use crate::error::CmlError;

/// Read a file as text, mapping a missing path to
/// [`CmlError::FileNotFound`].
pub fn read_file(path: &Path) -> Result<String, CmlError> {
    if !path.exists() {
        return Err(CmlError::FileNotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(CmlError::Io)
}

/// Write text to a file, creating parent directories if they don't
/// exist.
pub fn write_file(path: &Path, content: &str) -> Result<(), CmlError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(CmlError::Io)?;
    }
    fs::write(path, content).map_err(CmlError::Io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_read_missing_file_is_file_not_found() {
        let err = read_file(&PathBuf::from("/no/such/file.cml")).unwrap_err();
        assert_eq!(err.to_string(), "File not found: /no/such/file.cml");
    }

    #[test]
    fn test_write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/output.cml");

        write_file(&path, "[[cc.out.a]]1[[/cc.out.a]]").unwrap();
        assert_eq!(read_file(&path).unwrap(), "[[cc.out.a]]1[[/cc.out.a]]");
    }
}
