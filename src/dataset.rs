use tracing::{info, warn};

use crate::amounts::normalize_record_amounts;
use crate::error::ConvertError;
use crate::model::RawTable;
use crate::options::{ConvertOptions, SchemaMode, TableOrder};
use crate::reconstruct::{data_rows, is_booking_number, reconstruct};
use crate::schema::{BookingRecord, COLUMN_COUNT, Column, RawRow};
use crate::warning::{ConvertWarning, WarningCode};

/// Turns one raw page grid into booking records.
pub(crate) fn records_from_table(
    table: &RawTable,
    options: &ConvertOptions,
    warnings: &mut Vec<ConvertWarning>,
) -> Result<Vec<BookingRecord>, ConvertError> {
    let found = table.column_count();
    if found != COLUMN_COUNT {
        match options.schema_mode {
            SchemaMode::Strict => {
                return Err(ConvertError::ColumnMismatch {
                    page: table.page,
                    found,
                    expected: COLUMN_COUNT,
                });
            }
            SchemaMode::SkipMismatched => {
                warn!(page = table.page, found, "skipping table with unexpected column count");
                warnings.push(
                    ConvertWarning::new(
                        WarningCode::SchemaMismatch,
                        format!("table has {found} columns, expected {COLUMN_COUNT}; skipped"),
                    )
                    .with_page(table.page),
                );
                return Ok(Vec::new());
            }
        }
    }

    let rows = data_rows(&table.rows, options.header_rows, options.footer_rows);
    if rows.is_empty() {
        warnings.push(
            ConvertWarning::new(
                WarningCode::TooFewRows,
                "table has no rows between header and footer",
            )
            .with_page(table.page),
        );
        return Ok(Vec::new());
    }

    let rows = rows
        .iter()
        .map(|cells| {
            RawRow::try_from(cells.clone()).map_err(|found| ConvertError::ColumnMismatch {
                page: table.page,
                found,
                expected: COLUMN_COUNT,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if !is_booking_number(rows[0].get(Column::BookingNumber)) {
        warnings.push(
            ConvertWarning::new(
                WarningCode::MissingBookingNumber,
                "first data row has no 9-character booking number",
            )
            .with_page(table.page),
        );
    }

    Ok(reconstruct(&rows))
}

/// Concatenates per-table results in the requested order.
#[must_use]
pub fn assemble_dataset(tables: Vec<Vec<BookingRecord>>, order: TableOrder) -> Vec<BookingRecord> {
    match order {
        TableOrder::Document => tables.into_iter().flatten().collect(),
        TableOrder::Reversed => tables.into_iter().rev().flatten().collect(),
    }
}

pub(crate) fn build_dataset(
    tables: &[RawTable],
    options: &ConvertOptions,
    warnings: &mut Vec<ConvertWarning>,
) -> Result<Vec<BookingRecord>, ConvertError> {
    if tables.is_empty() {
        warnings.push(ConvertWarning::new(
            WarningCode::NoTablesDetected,
            "no table text was found in the selected pages",
        ));
    }

    let per_table = tables
        .iter()
        .enumerate()
        .map(|(index, table)| {
            info!(table = index + 1, page = table.page, "processing table");
            records_from_table(table, options, warnings)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut records = assemble_dataset(per_table, options.table_order);
    for record in &mut records {
        normalize_record_amounts(record, &options.currency_symbol);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{assemble_dataset, build_dataset, records_from_table};
    use crate::error::ConvertError;
    use crate::model::RawTable;
    use crate::options::{ConvertOptions, SchemaMode, TableOrder};
    use crate::schema::{BookingRecord, COLUMN_COUNT, Column};
    use crate::warning::WarningCode;

    fn record(number: &str) -> BookingRecord {
        BookingRecord {
            booking_number: number.to_string(),
            ..BookingRecord::default()
        }
    }

    fn data_row(serial: &str, booking: &str, amount: &str) -> Vec<String> {
        let mut row = vec![String::new(); COLUMN_COUNT];
        row[Column::SerialNumber.index()] = serial.to_string();
        row[Column::BookingNumber.index()] = booking.to_string();
        row[Column::NetAmount.index()] = amount.to_string();
        row
    }

    fn table(page: u32, data: Vec<Vec<String>>) -> RawTable {
        let mut rows = vec![vec!["header".to_string(); COLUMN_COUNT]; 6];
        rows.extend(data);
        rows.push(vec!["footer".to_string(); COLUMN_COUNT]);
        RawTable { page, rows }
    }

    #[test]
    fn reversed_order_puts_last_table_first() {
        let tables = vec![vec![record("a"), record("b")], vec![record("c")]];
        let numbers = |records: Vec<BookingRecord>| {
            records
                .into_iter()
                .map(|record| record.booking_number)
                .collect::<Vec<_>>()
        };

        assert_eq!(
            numbers(assemble_dataset(tables.clone(), TableOrder::Document)),
            vec!["a", "b", "c"]
        );
        assert_eq!(
            numbers(assemble_dataset(tables, TableOrder::Reversed)),
            vec!["c", "a", "b"]
        );
    }

    #[test]
    fn strict_mode_rejects_narrow_tables() {
        let narrow = RawTable {
            page: 2,
            rows: vec![vec![String::new(); 16]; 8],
        };
        let mut warnings = Vec::new();
        let err = records_from_table(&narrow, &ConvertOptions::default(), &mut warnings)
            .expect_err("16 columns should fail");
        assert!(matches!(
            err,
            ConvertError::ColumnMismatch {
                page: 2,
                found: 16,
                expected: 17
            }
        ));
    }

    #[test]
    fn skip_mode_warns_and_continues() {
        let narrow = RawTable {
            page: 2,
            rows: vec![vec![String::new(); 16]; 8],
        };
        let options = ConvertOptions {
            schema_mode: SchemaMode::SkipMismatched,
            ..ConvertOptions::default()
        };
        let mut warnings = Vec::new();
        let records =
            records_from_table(&narrow, &options, &mut warnings).expect("skip mode succeeds");
        assert!(records.is_empty());
        assert_eq!(warnings[0].code, WarningCode::SchemaMismatch);
        assert_eq!(warnings[0].page, Some(2));
    }

    #[test]
    fn header_only_table_yields_warning() {
        let mut warnings = Vec::new();
        let records =
            records_from_table(&table(1, Vec::new()), &ConvertOptions::default(), &mut warnings)
                .expect("empty table is not an error");
        assert!(records.is_empty());
        assert_eq!(warnings[0].code, WarningCode::TooFewRows);
    }

    #[test]
    fn builds_normalized_dataset_across_tables() {
        let tables = vec![
            table(1, vec![data_row("1", "111111111", "10.00 €"), data_row("", "", "")]),
            table(2, vec![data_row("2", "222222222", "7.5")]),
        ];
        let mut warnings = Vec::new();
        let records = build_dataset(&tables, &ConvertOptions::default(), &mut warnings)
            .expect("dataset builds");

        assert!(warnings.is_empty());
        let amounts = records
            .iter()
            .map(|record| (record.booking_number.as_str(), record.net_amount.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(amounts, vec![("111111111", "10,00"), ("222222222", "7,5")]);
    }

    #[test]
    fn no_tables_is_reported() {
        let mut warnings = Vec::new();
        let records =
            build_dataset(&[], &ConvertOptions::default(), &mut warnings).expect("empty input");
        assert!(records.is_empty());
        assert_eq!(warnings[0].code, WarningCode::NoTablesDetected);
    }

    #[test]
    fn invalid_first_booking_number_is_flagged() {
        let mut warnings = Vec::new();
        let records = records_from_table(
            &table(4, vec![data_row("1", "n/a", "1.00")]),
            &ConvertOptions::default(),
            &mut warnings,
        )
        .expect("table converts");
        assert_eq!(records.len(), 1);
        assert_eq!(warnings[0].code, WarningCode::MissingBookingNumber);
        assert_eq!(warnings[0].page, Some(4));
    }
}
