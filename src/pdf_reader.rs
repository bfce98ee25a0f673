use std::collections::BTreeMap;
use std::path::Path;

use encoding_rs::{UTF_16BE, WINDOWS_1252};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId};
use tracing::{debug, warn};

use crate::error::ConvertError;
use crate::model::{PageFragments, TextFragment};
use crate::options::PageSelection;

/// Average glyph advance as a fraction of the font size. Fonts are not
/// measured, so fragment widths are estimates.
const GLYPH_WIDTH: f32 = 0.5;

/// TJ adjustments beyond this many thousandths of an em read as a space.
const SPACE_ADJUSTMENT: f32 = -100.0;

fn is_two_byte_encoding(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.contains("utf16")
        || lower.contains("ucs2")
        || lower.contains("identity-h")
        || lower.contains("unicode")
}

fn decode_pdf_bytes(encoding: Option<&str>, bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let (text, had_errors) = UTF_16BE.decode_without_bom_handling(rest);
        if !had_errors {
            return text.into_owned();
        }
    }

    match encoding {
        Some(name) if name.contains("WinAnsi") => {
            WINDOWS_1252.decode_without_bom_handling(bytes).0.into_owned()
        }
        Some(name) if is_two_byte_encoding(name) => {
            let (text, had_errors) = UTF_16BE.decode_without_bom_handling(bytes);
            if had_errors {
                String::from_utf8_lossy(bytes).into_owned()
            } else {
                text.into_owned()
            }
        }
        _ => Document::decode_text(encoding, bytes),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn translate(self, tx: f32, ty: f32) -> Self {
        Self {
            e: tx * self.a + ty * self.c + self.e,
            f: tx * self.b + ty * self.d + self.f,
            ..self
        }
    }
}

fn number(object: &Object) -> Option<f32> {
    object.as_float().ok()
}

/// The subset of the PDF text state needed to place strings on the page.
/// Graphics-state transforms (`cm`) are ignored.
struct TextState<'a> {
    encodings: BTreeMap<Vec<u8>, &'a str>,
    encoding: Option<&'a str>,
    font_size: f32,
    leading: f32,
    line: Matrix,
    text: Matrix,
    fragments: Vec<TextFragment>,
}

impl<'a> TextState<'a> {
    fn new(encodings: BTreeMap<Vec<u8>, &'a str>) -> Self {
        Self {
            encodings,
            encoding: None,
            font_size: 1.0,
            leading: 0.0,
            line: Matrix::IDENTITY,
            text: Matrix::IDENTITY,
            fragments: Vec::new(),
        }
    }

    fn set_font(&mut self, operands: &[Object]) {
        if let Some(name) = operands.first().and_then(|operand| operand.as_name().ok()) {
            self.encoding = self.encodings.get(name).copied();
        }
        if let Some(size) = operands.get(1).and_then(number) {
            self.font_size = size;
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line = self.line.translate(tx, ty);
        self.text = self.line;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    fn collect(&self, operand: &Object, text: &mut String, advance: &mut f32) {
        match operand {
            Object::String(bytes, _) => text.push_str(&decode_pdf_bytes(self.encoding, bytes)),
            Object::Array(items) => {
                for item in items {
                    self.collect(item, text, advance);
                }
            }
            Object::Integer(_) | Object::Real(_) => {
                let adjustment = number(operand).unwrap_or(0.0);
                *advance -= adjustment / 1000.0 * self.font_size;
                if adjustment < SPACE_ADJUSTMENT {
                    text.push(' ');
                }
            }
            _ => {}
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn show(&mut self, operands: &[Object]) {
        let mut text = String::new();
        let mut advance = 0.0_f32;
        for operand in operands {
            self.collect(operand, &mut text, &mut advance);
        }
        advance += text.chars().count() as f32 * self.font_size * GLYPH_WIDTH;

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            self.fragments.push(TextFragment {
                x: self.text.e,
                y: self.text.f,
                width: advance * self.text.a,
                text: trimmed.to_string(),
            });
        }
        self.text = self.text.translate(advance, 0.0);
    }

    fn apply(&mut self, operation: &Operation) {
        let operands = operation.operands.as_slice();
        match operation.operator.as_str() {
            "BT" => {
                self.line = Matrix::IDENTITY;
                self.text = Matrix::IDENTITY;
            }
            "Tf" => self.set_font(operands),
            "TL" => {
                if let Some(leading) = operands.first().and_then(number) {
                    self.leading = leading;
                }
            }
            "Td" | "TD" => {
                if let [tx, ty] = operands
                    && let (Some(tx), Some(ty)) = (number(tx), number(ty))
                {
                    if operation.operator == "TD" {
                        self.leading = -ty;
                    }
                    self.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let [a, b, c, d, e, f] = operands
                    && let [Some(a), Some(b), Some(c), Some(d), Some(e), Some(f)] =
                        [a, b, c, d, e, f].map(number)
                {
                    self.line = Matrix { a, b, c, d, e, f };
                    self.text = self.line;
                }
            }
            "T*" => self.next_line(),
            "Tj" | "TJ" => self.show(operands),
            "'" => {
                self.next_line();
                self.show(operands);
            }
            "\"" => {
                self.next_line();
                self.show(operands.get(2..).unwrap_or_default());
            }
            _ => {}
        }
    }
}

fn interpret(operations: &[Operation], encodings: BTreeMap<Vec<u8>, &str>) -> Vec<TextFragment> {
    let mut state = TextState::new(encodings);
    for operation in operations {
        state.apply(operation);
    }
    state.fragments
}

fn page_fragments(document: &Document, page_id: ObjectId) -> Vec<TextFragment> {
    let content = match document
        .get_page_content(page_id)
        .and_then(|raw| Content::decode(&raw))
    {
        Ok(content) => content,
        Err(error) => {
            warn!(%error, "skipping page with unreadable content stream");
            return Vec::new();
        }
    };

    let encodings = document
        .get_page_fonts(page_id)
        .into_iter()
        .map(|(name, font)| (name, font.get_font_encoding()))
        .collect::<BTreeMap<Vec<u8>, &str>>();

    interpret(&content.operations, encodings)
}

fn pages_from_document(
    document: &Document,
    page_selection: Option<&PageSelection>,
) -> Result<Vec<PageFragments>, ConvertError> {
    if let Some(selection) = page_selection {
        debug!(selected = selection.len(), "applying page selection");
    }

    let mut pages = Vec::new();
    for (page_number, page_id) in document.get_pages() {
        if page_selection.is_some_and(|selection| !selection.contains(page_number)) {
            continue;
        }

        let fragments = page_fragments(document, page_id);
        debug!(page = page_number, fragments = fragments.len(), "read page text");
        pages.push(PageFragments {
            page_number,
            fragments,
        });
    }

    if pages.is_empty() {
        return Err(ConvertError::NoPagesSelected);
    }

    Ok(pages)
}

pub(crate) fn read_pdf_pages(
    input_pdf: &Path,
    page_selection: Option<&PageSelection>,
) -> Result<Vec<PageFragments>, ConvertError> {
    let document = Document::load(input_pdf)?;
    pages_from_document(&document, page_selection)
}

pub(crate) fn read_pdf_pages_from_bytes(
    input_pdf: &[u8],
    page_selection: Option<&PageSelection>,
) -> Result<Vec<PageFragments>, ConvertError> {
    let document = Document::load_mem(input_pdf)?;
    pages_from_document(&document, page_selection)
}
