#![allow(dead_code)]

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

const FONT_SIZE: i64 = 6;
const COLUMN_PITCH: i64 = 48;
const LEFT_MARGIN: i64 = 20;
const TOP: i64 = 800;
const LINE_PITCH: i64 = 12;

pub const HEADER_LABELS: [&str; 17] = [
    "Nr", "Buchung", "Annahme", "Fahrt", "Fahrer", "Kennz", "Abholung", "Ziel", "Bonus", "Netto",
    "Warte", "Zusatz", "b1", "Summe", "b2", "MwSt", "Brutto",
];

/// Report preamble: five title lines and the column label line.
pub fn report_header() -> Vec<Vec<&'static str>> {
    let mut rows = vec![
        vec!["Fahrtenbericht"],
        vec!["Partner ACME"],
        vec!["Zeitraum 05/2024"],
        vec!["Seite 1"],
        vec!["Betraege in EUR"],
    ];
    rows.push(HEADER_LABELS.to_vec());
    rows
}

/// Writes a PDF where every line is a row of cells placed on a fixed column
/// grid. Empty cells are not drawn.
pub fn create_report_pdf(
    path: &Path,
    pages: &[Vec<Vec<&str>>],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut page_ids = Vec::new();
    for lines in pages {
        let mut operations = Vec::new();
        for (line_index, cells) in (0_i64..).zip(lines) {
            let y = TOP - line_index * LINE_PITCH;
            for (column, text) in (0_i64..).zip(cells) {
                if text.is_empty() {
                    continue;
                }
                operations.extend([
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]),
                    Operation::new(
                        "Td",
                        vec![(LEFT_MARGIN + column * COLUMN_PITCH).into(), y.into()],
                    ),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ]);
            }
        }

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        page_ids.push(page_id);
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| (*id).into()).collect::<Vec<_>>(),
            "Count" => i64::try_from(page_ids.len())?,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 842.into(), 842.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    doc.save(path)?;
    Ok(())
}
