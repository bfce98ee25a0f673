mod amounts;
mod dataset;
mod error;
mod json_out;
mod model;
mod options;
mod pdf_reader;
mod reconstruct;
mod schema;
mod table_detect;
mod warning;
mod xlsx_out;

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::dataset::build_dataset;
use crate::json_out::{write_json, write_json_to_string};
use crate::model::{PageFragments, RawTable};
use crate::pdf_reader::{read_pdf_pages, read_pdf_pages_from_bytes};
use crate::table_detect::detect_table;
use crate::xlsx_out::{write_xlsx, write_xlsx_to_buffer};

pub use amounts::{DEFAULT_CURRENCY_SYMBOL, normalize_amount};
pub use dataset::assemble_dataset;
pub use error::ConvertError;
pub use options::{
    ConvertOptions, DEFAULT_FOOTER_ROWS, DEFAULT_HEADER_ROWS, DEFAULT_JSON_ROOT_KEY,
    PageSelection, SchemaMode, TableOrder,
};
pub use reconstruct::{BOOKING_NUMBER_LEN, data_rows, is_booking_number, reconstruct};
pub use schema::{BookingRecord, COLUMN_COUNT, Column, OUTPUT_COLUMNS, RawRow};
pub use warning::{ConvertWarning, WarningCode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDataset {
    pub records: Vec<BookingRecord>,
    pub table_count: usize,
    pub warnings: Vec<ConvertWarning>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub xlsx: PathBuf,
    pub json: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    pub record_count: usize,
    pub table_count: usize,
    /// `None` when the spreadsheet could not be written.
    pub xlsx_path: Option<PathBuf>,
    pub json_path: PathBuf,
    pub warnings: Vec<ConvertWarning>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryOutput {
    pub xlsx: Option<Vec<u8>>,
    pub json: String,
    pub record_count: usize,
    pub table_count: usize,
    pub warnings: Vec<ConvertWarning>,
}

/// Checks the input path before anything is read: the extension first, then
/// existence.
pub fn validate_input(input_pdf: &Path) -> Result<(), ConvertError> {
    let is_pdf = input_pdf
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        return Err(ConvertError::InvalidExtension(input_pdf.to_path_buf()));
    }
    if !input_pdf.is_file() {
        return Err(ConvertError::InputNotFound(input_pdf.to_path_buf()));
    }
    Ok(())
}

fn validate_options(options: &ConvertOptions) -> Result<(), ConvertError> {
    if options.json_root_key.is_empty() {
        return Err(ConvertError::InvalidOption(
            "json root key must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// `<stem>.xlsx` and `<stem>.json`, next to the input unless an output
/// directory is configured.
#[must_use]
pub fn output_paths(input_pdf: &Path, options: &ConvertOptions) -> OutputPaths {
    let stem = input_pdf.file_stem().unwrap_or(input_pdf.as_os_str());
    let dir = options
        .output_dir
        .clone()
        .or_else(|| input_pdf.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    let with_extension = |extension: &str| {
        let mut name = stem.to_os_string();
        name.push(".");
        name.push(extension);
        dir.join(name)
    };

    OutputPaths {
        xlsx: with_extension("xlsx"),
        json: with_extension("json"),
    }
}

fn dataset_from_pages(
    pages: &[PageFragments],
    options: &ConvertOptions,
) -> Result<ExtractedDataset, ConvertError> {
    let tables = pages.iter().filter_map(detect_table).collect::<Vec<RawTable>>();
    let mut warnings = Vec::new();
    let records = build_dataset(&tables, options, &mut warnings)?;

    Ok(ExtractedDataset {
        records,
        table_count: tables.len(),
        warnings,
    })
}

pub fn extract_dataset(
    input_pdf: &Path,
    options: &ConvertOptions,
) -> Result<ExtractedDataset, ConvertError> {
    validate_options(options)?;
    let pages = read_pdf_pages(input_pdf, options.pages.as_ref())?;
    dataset_from_pages(&pages, options)
}

pub fn extract_dataset_from_bytes(
    input_pdf: &[u8],
    options: &ConvertOptions,
) -> Result<ExtractedDataset, ConvertError> {
    validate_options(options)?;
    let pages = read_pdf_pages_from_bytes(input_pdf, options.pages.as_ref())?;
    dataset_from_pages(&pages, options)
}

fn spreadsheet_failure(export_error: &ConvertError) -> ConvertWarning {
    error!(error = %export_error, "spreadsheet export failed; continuing with JSON");
    ConvertWarning::new(WarningCode::SpreadsheetExportFailed, export_error.to_string())
}

/// Converts a booking report into `<stem>.xlsx` and `<stem>.json`.
///
/// A failed spreadsheet export is logged and reported as a warning; every
/// other failure aborts the conversion.
pub fn convert_pdf(
    input_pdf: &Path,
    options: &ConvertOptions,
) -> Result<ConversionReport, ConvertError> {
    validate_input(input_pdf)?;
    let mut dataset = extract_dataset(input_pdf, options)?;
    let paths = output_paths(input_pdf, options);

    let xlsx_path = match write_xlsx(&paths.xlsx, &dataset.records) {
        Ok(()) => {
            info!(path = %paths.xlsx.display(), "wrote spreadsheet");
            Some(paths.xlsx)
        }
        Err(export_error) => {
            dataset.warnings.push(spreadsheet_failure(&export_error));
            None
        }
    };

    if dataset.records.is_empty() {
        warn!(path = %input_pdf.display(), "no booking records found");
    }
    write_json(&paths.json, &dataset.records, &options.json_root_key)?;
    info!(path = %paths.json.display(), "wrote JSON");

    Ok(ConversionReport {
        record_count: dataset.records.len(),
        table_count: dataset.table_count,
        xlsx_path,
        json_path: paths.json,
        warnings: dataset.warnings,
    })
}

pub fn convert_pdf_bytes(
    input_pdf: &[u8],
    options: &ConvertOptions,
) -> Result<InMemoryOutput, ConvertError> {
    let mut dataset = extract_dataset_from_bytes(input_pdf, options)?;

    let xlsx = match write_xlsx_to_buffer(&dataset.records) {
        Ok(bytes) => Some(bytes),
        Err(source) => {
            let export_error = ConvertError::XlsxBuffer(source);
            dataset.warnings.push(spreadsheet_failure(&export_error));
            None
        }
    };

    let json = write_json_to_string(&dataset.records, &options.json_root_key)
        .map_err(ConvertError::JsonSerialize)?;

    Ok(InMemoryOutput {
        xlsx,
        json,
        record_count: dataset.records.len(),
        table_count: dataset.table_count,
        warnings: dataset.warnings,
    })
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::{
        ConvertError, ConvertOptions, WarningCode, output_paths, spreadsheet_failure,
        validate_input,
    };

    #[test]
    fn output_paths_follow_input_stem() {
        let paths = output_paths(Path::new("reports/may.2024.pdf"), &ConvertOptions::default());
        assert_eq!(paths.xlsx, PathBuf::from("reports/may.2024.xlsx"));
        assert_eq!(paths.json, PathBuf::from("reports/may.2024.json"));
    }

    #[test]
    fn output_dir_overrides_input_directory() {
        let options = ConvertOptions {
            output_dir: Some(PathBuf::from("out")),
            ..ConvertOptions::default()
        };
        let paths = output_paths(Path::new("/data/rides.PDF"), &options);
        assert_eq!(paths.json, PathBuf::from("out/rides.json"));
    }

    #[test]
    fn rejects_non_pdf_before_checking_existence() {
        let err = validate_input(Path::new("missing.csv")).expect_err("csv is rejected");
        assert!(matches!(err, ConvertError::InvalidExtension(_)));

        let err = validate_input(Path::new("definitely-missing.pdf")).expect_err("missing file");
        assert!(matches!(err, ConvertError::InputNotFound(_)));
    }

    #[test]
    fn spreadsheet_failures_share_one_message_shape() {
        let on_disk = spreadsheet_failure(&ConvertError::XlsxExport {
            path: PathBuf::from("out/may.xlsx"),
            source: rust_xlsxwriter::XlsxError::ParameterError("bad".to_string()),
        });
        let in_memory = spreadsheet_failure(&ConvertError::XlsxBuffer(
            rust_xlsxwriter::XlsxError::ParameterError("bad".to_string()),
        ));

        assert_eq!(on_disk.code, WarningCode::SpreadsheetExportFailed);
        assert_eq!(in_memory.code, WarningCode::SpreadsheetExportFailed);
        assert!(on_disk.message.starts_with("excel file generation failed for out/may.xlsx"));
        assert!(
            in_memory
                .message
                .starts_with("excel file generation failed for in-memory workbook")
        );
    }

    #[test]
    fn in_memory_json_error_names_no_path() {
        let source = serde_json::from_str::<serde_json::Value>("{").expect_err("truncated JSON");
        let message = ConvertError::JsonSerialize(source).to_string();
        assert!(message.starts_with("JSON generation failed for in-memory output: "));
        assert!(!message.contains("for :"));
    }
}
