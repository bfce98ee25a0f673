use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::ConvertError;
use crate::schema::BookingRecord;

/// `{"<root_key>": [record, ...]}` with record keys in output column order.
struct JsonDocument<'a> {
    root_key: &'a str,
    records: &'a [BookingRecord],
}

impl Serialize for JsonDocument<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.root_key, self.records)?;
        map.end()
    }
}

pub(crate) fn write_json(
    path: &Path,
    records: &[BookingRecord],
    root_key: &str,
) -> Result<(), ConvertError> {
    let json_error = |source| ConvertError::JsonExport {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(|error| json_error(serde_json::Error::io(error)))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &JsonDocument { root_key, records }).map_err(json_error)?;
    writer
        .flush()
        .map_err(|error| json_error(serde_json::Error::io(error)))
}

pub(crate) fn write_json_to_string(
    records: &[BookingRecord],
    root_key: &str,
) -> Result<String, serde_json::Error> {
    serde_json::to_string(&JsonDocument { root_key, records })
}

#[cfg(test)]
mod tests {
    use super::write_json_to_string;
    use crate::schema::{BookingRecord, OUTPUT_COLUMNS};

    #[test]
    fn wraps_records_under_root_key_in_column_order() {
        let records = vec![BookingRecord {
            booking_number: "123456789".to_string(),
            vat_sales_tax: "2,00".to_string(),
            ..BookingRecord::default()
        }];

        let json = write_json_to_string(&records, "rider").expect("records serialize");
        assert!(json.starts_with(r#"{"rider":[{"booking_number":"123456789","accept_date":"#));

        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        let items = value["rider"].as_array().expect("array under root key");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["VAT_sales_tax"], "2,00");
        assert_eq!(items[0].as_object().map(serde_json::Map::len), Some(OUTPUT_COLUMNS.len()));
    }

    #[test]
    fn empty_dataset_is_an_empty_array() {
        let json = write_json_to_string(&[], "rides").expect("serializes");
        assert_eq!(json, r#"{"rides":[]}"#);
    }
}
