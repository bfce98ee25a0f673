/// A run of text placed on the page by one text-showing operator.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub text: String,
}

impl TextFragment {
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageFragments {
    pub page_number: u32,
    pub fragments: Vec<TextFragment>,
}

/// Rectangular grid of cell text for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub page: u32,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }
}
