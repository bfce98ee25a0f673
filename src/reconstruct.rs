use std::collections::HashMap;

use crate::schema::{BookingRecord, Column, RawRow};

pub const BOOKING_NUMBER_LEN: usize = 9;

/// A booking number is recognised purely by its length.
#[must_use]
pub fn is_booking_number(value: &str) -> bool {
    value.chars().count() == BOOKING_NUMBER_LEN
}

/// Slices the data rows out of a raw page grid, skipping the report header
/// and footer lines.
#[must_use]
pub fn data_rows(grid: &[Vec<String>], header_rows: usize, footer_rows: usize) -> &[Vec<String>] {
    let end = grid.len().saturating_sub(footer_rows);
    let start = header_rows.min(end);
    &grid[start..end]
}

/// Reassembles booking rows that the report wrapped over several lines.
///
/// Rows that follow a row with a valid booking number inherit it, the
/// wrapped text fields of each booking are joined onto its first row, and
/// only rows carrying a serial number survive.
#[must_use]
pub fn reconstruct(rows: &[RawRow]) -> Vec<BookingRecord> {
    let mut rows = rows.to_vec();
    propagate_booking_numbers(&mut rows);
    merge_text_fields(&mut rows);

    rows.into_iter()
        .filter(|row| !row.get(Column::SerialNumber).is_empty())
        .map(BookingRecord::from_primary_row)
        .collect()
}

// The first row always seeds the key, even when its own number is invalid.
fn propagate_booking_numbers(rows: &mut [RawRow]) {
    let mut current: Option<String> = None;
    for row in rows {
        let cell = row.get_mut(Column::BookingNumber);
        if current.is_none() || is_booking_number(cell) {
            current = Some(cell.clone());
        } else if let Some(number) = &current {
            cell.clone_from(number);
        }
    }
}

fn merge_text_fields(rows: &mut [RawRow]) {
    let mut group_of: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        let number = row.get(Column::BookingNumber);
        if let Some(&group) = group_of.get(number) {
            groups[group].push(index);
        } else {
            group_of.insert(number.to_string(), groups.len());
            groups.push(vec![index]);
        }
    }

    for group in groups.iter().filter(|group| group.len() > 1) {
        let first = group[0];
        for column in Column::TEXT {
            let joined = group
                .iter()
                .map(|&index| rows[index].get(column))
                .collect::<Vec<_>>()
                .join(" ");
            *rows[first].get_mut(column) = joined;
        }
    }
}
