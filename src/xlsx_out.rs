use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::error::ConvertError;
use crate::schema::{BookingRecord, OUTPUT_COLUMNS};

fn build_workbook(records: &[BookingRecord]) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();

    for (col, name) in (0_u16..).zip(OUTPUT_COLUMNS) {
        worksheet.write_string_with_format(0, col, name, &header_format)?;
    }
    for (row, record) in (1_u32..).zip(records) {
        for (col, value) in (0_u16..).zip(record.values()) {
            worksheet.write_string(row, col, value)?;
        }
    }

    Ok(workbook)
}

pub(crate) fn write_xlsx(path: &Path, records: &[BookingRecord]) -> Result<(), ConvertError> {
    build_workbook(records)
        .and_then(|mut workbook| workbook.save(path))
        .map_err(|source| ConvertError::XlsxExport {
            path: path.to_path_buf(),
            source,
        })
}

pub(crate) fn write_xlsx_to_buffer(records: &[BookingRecord]) -> Result<Vec<u8>, XlsxError> {
    build_workbook(records)?.save_to_buffer()
}
