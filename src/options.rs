use std::collections::BTreeSet;
use std::path::PathBuf;
use std::str::FromStr;

use crate::amounts::DEFAULT_CURRENCY_SYMBOL;

pub const DEFAULT_HEADER_ROWS: usize = 6;
pub const DEFAULT_FOOTER_ROWS: usize = 1;
pub const DEFAULT_JSON_ROOT_KEY: &str = "rider";

/// Order in which per-table results are concatenated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableOrder {
    /// Page order.
    #[default]
    Document,
    /// Last table first.
    Reversed,
}

impl FromStr for TableOrder {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "document" => Ok(Self::Document),
            "reversed" => Ok(Self::Reversed),
            other => Err(format!(
                "unknown table order '{other}', expected document or reversed"
            )),
        }
    }
}

/// What to do with a table whose grid is not 17 columns wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaMode {
    #[default]
    Strict,
    SkipMismatched,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection {
    pages: BTreeSet<u32>,
}

impl PageSelection {
    #[must_use]
    pub fn contains(&self, page: u32) -> bool {
        self.pages.contains(&page)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

fn parse_page_number(token: &str) -> Result<u32, String> {
    let page = token
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid page number: '{}'", token.trim()))?;
    if page == 0 {
        return Err("pages are 1-based".to_string());
    }
    Ok(page)
}

impl FromStr for PageSelection {
    type Err = String;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let mut pages = BTreeSet::new();
        for token in spec.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match token.split_once('-') {
                Some((start, end)) => {
                    let (start, end) = (parse_page_number(start)?, parse_page_number(end)?);
                    if end < start {
                        return Err(format!("invalid range '{token}': end is before start"));
                    }
                    pages.extend(start..=end);
                }
                None => {
                    pages.insert(parse_page_number(token)?);
                }
            }
        }

        if pages.is_empty() {
            return Err("page selection cannot be empty".to_string());
        }
        Ok(Self { pages })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    pub pages: Option<PageSelection>,
    pub header_rows: usize,
    pub footer_rows: usize,
    pub table_order: TableOrder,
    pub schema_mode: SchemaMode,
    pub currency_symbol: String,
    pub json_root_key: String,
    /// Defaults to the input file's directory.
    pub output_dir: Option<PathBuf>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            pages: None,
            header_rows: DEFAULT_HEADER_ROWS,
            footer_rows: DEFAULT_FOOTER_ROWS,
            table_order: TableOrder::Document,
            schema_mode: SchemaMode::Strict,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            json_root_key: DEFAULT_JSON_ROOT_KEY.to_string(),
            output_dir: None,
        }
    }
}
