//! Upload format detection.

use std::fmt;
use std::path::Path;

use crate::error::{IngestError, Result};

/// Accepted upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadFormat {
    Csv,
    Xlsx,
    Xls,
}

impl UploadFormat {
    /// Resolves a format from a file extension, case-insensitively.
    pub fn from_extension(extension: &str) -> Result<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            "xls" => Ok(Self::Xls),
            other => Err(IngestError::UnsupportedFormat {
                extension: other.to_string(),
            }),
        }
    }

    /// Resolves a format from the extension of a file name or path.
    ///
    /// A name without an extension is unsupported.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        Self::from_extension(extension)
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Xls => "xls",
        }
    }

    pub fn is_spreadsheet(self) -> bool {
        matches!(self, Self::Xlsx | Self::Xls)
    }
}

impl fmt::Display for UploadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_known_extensions() {
        assert_eq!(
            UploadFormat::from_path(Path::new("data.CSV")).unwrap(),
            UploadFormat::Csv
        );
        assert_eq!(
            UploadFormat::from_path(Path::new("KRS - 3201 Bogor Th. 2024.xlsx")).unwrap(),
            UploadFormat::Xlsx
        );
        assert_eq!(
            UploadFormat::from_path(Path::new("lama.xls")).unwrap(),
            UploadFormat::Xls
        );
    }

    #[test]
    fn test_rejects_other_extensions() {
        let err = UploadFormat::from_path(Path::new("data.json")).unwrap_err();
        assert!(matches!(
            err,
            IngestError::UnsupportedFormat { ref extension } if extension == "json"
        ));
        assert!(UploadFormat::from_path(Path::new("README")).is_err());
    }
}
