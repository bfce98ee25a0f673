use crate::model::{PageFragments, RawTable, TextFragment};

/// Baselines closer than this belong to the same row.
const ROW_TOLERANCE: f32 = 2.0;
/// Spans closer than this are merged into one column band.
const COLUMN_GAP_TOLERANCE: f32 = 1.0;

fn cluster_rows(fragments: &[TextFragment]) -> Vec<Vec<&TextFragment>> {
    let mut sorted = fragments.iter().collect::<Vec<_>>();
    sorted.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut rows: Vec<Vec<&TextFragment>> = Vec::new();
    for fragment in sorted {
        match rows.last_mut() {
            Some(row) if (row[0].y - fragment.y).abs() <= ROW_TOLERANCE => row.push(fragment),
            _ => rows.push(vec![fragment]),
        }
    }

    for row in &mut rows {
        row.sort_by(|a, b| a.x.total_cmp(&b.x));
    }
    rows
}

/// Horizontal extents of the columns, derived from the rows that carry at
/// least half as many fragments as the densest row. Titles and wrapped
/// continuation lines do not shape the columns.
fn column_bands(rows: &[Vec<&TextFragment>]) -> Vec<(f32, f32)> {
    let densest = rows.iter().map(Vec::len).max().unwrap_or(0);
    let threshold = densest.div_ceil(2);

    let mut spans = rows
        .iter()
        .filter(|row| row.len() >= threshold)
        .flatten()
        .map(|fragment| (fragment.x, fragment.right()))
        .collect::<Vec<_>>();
    spans.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut bands: Vec<(f32, f32)> = Vec::new();
    for (start, end) in spans {
        match bands.last_mut() {
            Some(last) if start <= last.1 + COLUMN_GAP_TOLERANCE => last.1 = last.1.max(end),
            _ => bands.push((start, end)),
        }
    }
    bands
}

fn column_index(bands: &[(f32, f32)], x: f32) -> usize {
    bands
        .iter()
        .rposition(|(start, _)| *start <= x + COLUMN_GAP_TOLERANCE)
        .unwrap_or(0)
}

/// Lays a page's text out as a rectangular grid: one row per baseline, one
/// column per band. A page without text has no table.
pub(crate) fn detect_table(page: &PageFragments) -> Option<RawTable> {
    let rows = cluster_rows(&page.fragments);
    let bands = column_bands(&rows);
    if bands.is_empty() {
        return None;
    }

    let grid = rows
        .iter()
        .map(|row| {
            let mut cells = vec![String::new(); bands.len()];
            for fragment in row {
                let cell = &mut cells[column_index(&bands, fragment.x)];
                if !cell.is_empty() {
                    cell.push(' ');
                }
                cell.push_str(&fragment.text);
            }
            cells
        })
        .collect();

    Some(RawTable {
        page: page.page_number,
        rows: grid,
    })
}
