use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("invalid file, format is not PDF: {}", .0.display())]
    InvalidExtension(PathBuf),

    #[error("file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("PDF parsing failed, looks like an invalid PDF: {0}")]
    PdfLoad(#[from] lopdf::Error),

    #[error("no pages available after applying selection")]
    NoPagesSelected,

    #[error("table on page {page} has {found} columns, expected {expected}")]
    ColumnMismatch {
        page: u32,
        found: usize,
        expected: usize,
    },

    #[error("excel file generation failed for {}: {source}", .path.display())]
    XlsxExport {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    #[error("excel file generation failed for in-memory workbook: {0}")]
    XlsxBuffer(#[source] rust_xlsxwriter::XlsxError),

    #[error("JSON file generation failed for {}: {source}", .path.display())]
    JsonExport {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON generation failed for in-memory output: {0}")]
    JsonSerialize(#[source] serde_json::Error),

    #[error("invalid option: {0}")]
    InvalidOption(String),
}
