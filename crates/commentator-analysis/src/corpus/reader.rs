//! Source decoding: UTF-8, falling back to Latin-1.

use std::fs;
use std::path::Path;

use commentator_core::errors::ScanError;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

pub fn read_source(path: &Path) -> Result<String, ScanError> {
    let bytes = fs::read(path).map_err(|e| ScanError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    decode_source(bytes, path)
}

/// Decode raw bytes. NUL bytes mean binary (or UTF-16) input.
pub fn decode_source(mut bytes: Vec<u8>, path: &Path) -> Result<String, ScanError> {
    if bytes.contains(&0) {
        return Err(ScanError::NotText {
            path: path.to_path_buf(),
        });
    }
    if bytes.starts_with(UTF8_BOM) {
        bytes.drain(..UTF8_BOM.len());
    }
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            tracing::debug!(path = %path.display(), "not UTF-8, decoding as Latin-1");
            Ok(e.into_bytes().iter().map(|&b| char::from(b)).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_passes_through() {
        let text = decode_source("int größe = 1;".as_bytes().to_vec(), Path::new("a.cpp")).unwrap();
        assert_eq!(text, "int größe = 1;");
    }

    #[test]
    fn bom_is_stripped() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"int a;");
        assert_eq!(decode_source(bytes, Path::new("a.cpp")).unwrap(), "int a;");
    }

    #[test]
    fn latin1_fallback() {
        let bytes = vec![b'/', b'/', b' ', 0xE9, b't', 0xE9];
        assert_eq!(decode_source(bytes, Path::new("a.cpp")).unwrap(), "// été");
    }

    #[test]
    fn nul_bytes_are_not_text() {
        let err = decode_source(vec![b'a', 0, b'b'], Path::new("a.bin")).unwrap_err();
        assert!(matches!(err, ScanError::NotText { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_source(&dir.path().join("gone.cpp")).unwrap_err();
        assert!(matches!(err, ScanError::IoError { .. }));
    }
}
