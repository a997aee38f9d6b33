//! ErrorCode trait for diagnostics at the process boundary.

/// Every error enum implements this to provide a structured code string
/// that the CLI prints alongside the human-readable message.
pub trait ErrorCode {
    /// Returns the error code string (e.g., "SCAN_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted diagnostic: `[ERROR_CODE] message`.
    fn diagnostic(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const SCAN_ERROR: &str = "SCAN_ERROR";
pub const SOURCE_ROOT_MISSING: &str = "SOURCE_ROOT_MISSING";
pub const NOT_TEXT: &str = "NOT_TEXT";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const MODEL_IO: &str = "MODEL_IO";
pub const MODEL_CORRUPT: &str = "MODEL_CORRUPT";
pub const DICTIONARY_IO: &str = "DICTIONARY_IO";
pub const DICTIONARY_CORRUPT: &str = "DICTIONARY_CORRUPT";
pub const REPORT_WRITE: &str = "REPORT_WRITE";
pub const REPORT_RENDER: &str = "REPORT_RENDER";

/// All codes, for uniqueness checks.
pub const ALL_CODES: &[&str] = &[
    SCAN_ERROR,
    SOURCE_ROOT_MISSING,
    NOT_TEXT,
    CONFIG_ERROR,
    MODEL_IO,
    MODEL_CORRUPT,
    DICTIONARY_IO,
    DICTIONARY_CORRUPT,
    REPORT_WRITE,
    REPORT_RENDER,
];
