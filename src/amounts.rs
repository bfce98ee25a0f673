use crate::schema::BookingRecord;

pub const DEFAULT_CURRENCY_SYMBOL: &str = "€";

/// Reformats a monetary cell for comma-decimal locales. The value stays
/// text; nothing is parsed.
#[must_use]
pub fn normalize_amount(value: &str, currency_symbol: &str) -> String {
    let stripped = if currency_symbol.is_empty() {
        value.to_string()
    } else {
        value.replace(currency_symbol, "")
    };
    stripped.replace('.', ",").trim().to_string()
}

pub fn normalize_record_amounts(record: &mut BookingRecord, currency_symbol: &str) {
    for amount in record.amounts_mut() {
        *amount = normalize_amount(amount, currency_symbol);
    }
}
