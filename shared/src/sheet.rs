//! Spreadsheet format detection and row extraction
//!
//! The store exports two spreadsheet layouts with no fixed header
//! position: a stock count ("Produto" / "Quantidade" columns, optional
//! code and annotation columns) and a sales report (grouped rows with
//! sold/stock quantity columns). This module locates the header, maps
//! semantic roles onto literal columns by keyword, and extracts
//! reconciled records row by row.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::annotation::parse_annotation;
use crate::category::{classify_product, normalize_group, OTHER_CATEGORY};
use crate::models::{SalesRecord, StockRecord, ZeroedProduct};

/// Rows inspected when deciding between layouts
const FORMAT_SCAN_ROWS: usize = 10;
/// Rows inspected when locating the header row
const HEADER_SCAN_ROWS: usize = 15;
/// Data rows sampled when sniffing a free-text column
const NOTE_SAMPLE_ROWS: usize = 20;
/// Length of the cleaned-name portion of a synthetic code
const SYNTHETIC_CODE_LEN: usize = 20;
const SYNTHETIC_CODE_PREFIX: &str = "AUTO_";

/// Product cells that mark totals, repeated headers or rollup rows
const PRODUCT_SENTINELS: &[&str] = &["NAN", "NONE", "TOTAL", "PRODUTO", "ROLLUP"];

static RE_ONLY_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+([.,]\d+)?$").unwrap());
static RE_CODE_PRODUCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\s*-\s*(.+)$").unwrap());
static RE_ALPHA: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-zA-Z]").unwrap());

/// Recognized spreadsheet layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetFormat {
    Stock,
    Sales,
    Unknown,
}

impl std::fmt::Display for SheetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetFormat::Stock => write!(f, "stock"),
            SheetFormat::Sales => write!(f, "sales"),
            SheetFormat::Unknown => write!(f, "unknown"),
        }
    }
}

/// Extraction failures, all recoverable; the display string is written to
/// be shown to the end user as-is
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SheetError {
    #[error("header row not found: expected 'Produto' and 'Quantidade' columns")]
    HeaderNotFound,

    #[error("required product/quantity columns missing; sheet has: {}", columns.join(", "))]
    RequiredColumnMissing { columns: Vec<String> },

    #[error("no valid rows left after filtering the {format} sheet")]
    NoValidRows { format: SheetFormat },

    #[error("sheet format not recognized as a stock count or sales report")]
    UnrecognizedFormat,
}

/// One raw spreadsheet cell as handed over by the loader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Empty,
}

impl CellValue {
    /// Trimmed text form; integral numbers render without the decimal
    /// point so numeric code cells round-trip as "123", not "123.0"
    pub fn text(&self) -> String {
        match self {
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(n) if n.is_finite() && n.fract() == 0.0 => {
                format!("{}", *n as i64)
            }
            CellValue::Number(n) => n.to_string(),
            CellValue::Empty => String::new(),
        }
    }

    /// Quantity coercion through a float-then-int cast, so "15.0"-style
    /// spreadsheet cells come back as 15
    pub fn as_qty(&self) -> Option<i64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            CellValue::Text(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty) || self.text().is_empty()
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

/// Output of a parsed sales sheet: reconciled rows plus the stock-out
/// side list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesSheet {
    pub records: Vec<SalesRecord>,
    pub zeroed: Vec<ZeroedProduct>,
}

/// Result of the format-dispatching entry point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum ParsedSheet {
    Stock { records: Vec<StockRecord> },
    Sales { records: Vec<SalesRecord>, zeroed: Vec<ZeroedProduct> },
}

const EMPTY_CELL: CellValue = CellValue::Empty;

fn cell_at<'a>(row: &'a [CellValue], idx: usize) -> &'a CellValue {
    row.get(idx).unwrap_or(&EMPTY_CELL)
}

fn row_texts(row: &[CellValue]) -> Vec<String> {
    row.iter().map(|c| c.text().to_uppercase()).collect()
}

fn is_null_token(s: &str) -> bool {
    s.is_empty() || s.eq_ignore_ascii_case("nan") || s.eq_ignore_ascii_case("none")
}

fn stock_header(vals: &[String]) -> bool {
    vals.iter().any(|v| v == "PRODUTO")
        && vals.iter().any(|v| v.contains("QUANTIDADE") || v == "QTD")
}

fn sales_header(vals: &[String]) -> bool {
    let joined = vals.join(" ");
    vals.iter().any(|v| v == "PRODUTO") && (joined.contains("QTDD") || joined.contains("VENDIDA"))
}

/// Decide which layout a raw grid is, scanning the first few rows for
/// marker phrases; the first matching row wins
pub fn detect_format(grid: &[Vec<CellValue>]) -> SheetFormat {
    for row in grid.iter().take(FORMAT_SCAN_ROWS) {
        let vals = row_texts(row);
        let row_text = vals.join(" ");
        if ["QTDD - VENDIDA", "QTDD ESTOQUE", "GRUPO DE PRODUTO"]
            .iter()
            .any(|marker| row_text.contains(marker))
        {
            return SheetFormat::Sales;
        }
        if stock_header(&vals) {
            return SheetFormat::Stock;
        }
    }
    SheetFormat::Unknown
}

/// Locate the header row within the scan window
pub fn find_header<F>(grid: &[Vec<CellValue>], matches: F) -> Option<usize>
where
    F: Fn(&[String]) -> bool,
{
    grid.iter()
        .take(HEADER_SCAN_ROWS)
        .position(|row| matches(&row_texts(row)))
}

/// Deterministic fallback code for rows without an explicit product code.
/// Two distinct products with identical cleaned names collide on purpose;
/// they are treated as the same SKU.
pub fn synthetic_code(product: &str) -> String {
    let cleaned: String = product
        .to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(SYNTHETIC_CODE_LEN)
        .collect();
    format!("{SYNTHETIC_CODE_PREFIX}{cleaned}")
}

/// Column names as shown in diagnostics, "col_N" for blank header cells
fn column_names(header: &[CellValue]) -> Vec<String> {
    header
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let name = c.text();
            if name.is_empty() {
                format!("col_{i}")
            } else {
                name
            }
        })
        .collect()
}

/// Extract reconciled stock records from a raw stock-count grid
pub fn parse_stock_sheet(grid: &[Vec<CellValue>]) -> Result<Vec<StockRecord>, SheetError> {
    let header_idx = find_header(grid, stock_header).ok_or(SheetError::HeaderNotFound)?;
    let columns = column_names(&grid[header_idx]);

    let mut product_col = None;
    let mut qty_col = None;
    let mut code_col = None;
    let mut note_col = None;

    for (i, name) in columns.iter().enumerate() {
        let upper = name.to_uppercase();
        if upper == "PRODUTO" && product_col.is_none() {
            product_col = Some(i);
        } else if (upper.contains("QUANTIDADE") || upper == "QTD") && qty_col.is_none() {
            qty_col = Some(i);
        } else if matches!(upper.as_str(), "CÓDIGO" | "CODIGO" | "COD") && code_col.is_none() {
            code_col = Some(i);
        } else if (upper.contains("OBS")
            || upper.contains("NOTA")
            || upper.contains("DIFEREN")
            || upper.contains("ANOTA"))
            && note_col.is_none()
        {
            note_col = Some(i);
        }
    }

    let (Some(product_col), Some(qty_col)) = (product_col, qty_col) else {
        return Err(SheetError::RequiredColumnMissing { columns });
    };

    let rows = &grid[header_idx + 1..];

    // No header claimed the note role; sniff for a free-text column among
    // the unclaimed ones
    if note_col.is_none() {
        let claimed = [Some(product_col), Some(qty_col), code_col];
        for i in 0..columns.len() {
            if claimed.contains(&Some(i)) {
                continue;
            }
            let has_text = rows
                .iter()
                .take(NOTE_SAMPLE_ROWS)
                .map(|row| cell_at(row, i).text())
                .any(|v| !is_null_token(&v) && RE_ALPHA.is_match(&v));
            if has_text {
                note_col = Some(i);
                break;
            }
        }
    }

    let mut records = Vec::new();
    for row in rows {
        let product = cell_at(row, product_col).text();
        if product.is_empty() || PRODUCT_SENTINELS.contains(&product.to_uppercase().as_str()) {
            continue;
        }

        let Some(qty_system) = cell_at(row, qty_col).as_qty() else {
            continue;
        };
        if qty_system <= 0 {
            continue;
        }

        let mut code = code_col
            .map(|i| cell_at(row, i).text())
            .unwrap_or_default();
        if is_null_token(&code) {
            code = synthetic_code(&product);
        }

        let mut note = note_col
            .map(|i| cell_at(row, i).text())
            .unwrap_or_default();
        if is_null_token(&note) || RE_ONLY_NUMBER.is_match(&note) {
            note.clear();
        }

        let category = classify_product(&product).to_string();
        let annotation = parse_annotation(&note, qty_system);
        records.push(StockRecord::from_count(
            code, product, category, qty_system, annotation,
        ));
    }

    if records.is_empty() {
        return Err(SheetError::NoValidRows {
            format: SheetFormat::Stock,
        });
    }
    Ok(records)
}

/// Extract reconciled sales records from a raw sales-report grid
pub fn parse_sales_sheet(grid: &[Vec<CellValue>]) -> Result<SalesSheet, SheetError> {
    let header_idx = find_header(grid, sales_header).ok_or(SheetError::HeaderNotFound)?;
    let columns = column_names(&grid[header_idx]);

    let mut group_col = None;
    let mut product_col = None;
    let mut sold_col = None;
    let mut stock_col = None;
    let mut note_col = None;

    for (i, name) in columns.iter().enumerate() {
        let upper = name.to_uppercase();
        if upper.contains("GRUPO") && group_col.is_none() {
            group_col = Some(i);
        } else if upper == "PRODUTO" && product_col.is_none() {
            product_col = Some(i);
        } else if upper.contains("VENDIDA") && sold_col.is_none() {
            sold_col = Some(i);
        } else if upper.contains("ESTOQUE") && stock_col.is_none() {
            stock_col = Some(i);
        } else if (upper.contains("OBS") || upper.contains("NOTA") || upper.contains("ANOTA"))
            && note_col.is_none()
        {
            note_col = Some(i);
        }
    }

    // Some exports annotate counts in the cost column
    if note_col.is_none() {
        note_col = columns
            .iter()
            .position(|name| name.to_uppercase().contains("CUSTO"));
    }

    let Some(product_col) = product_col else {
        return Err(SheetError::RequiredColumnMissing { columns });
    };
    if sold_col.is_none() && stock_col.is_none() {
        return Err(SheetError::RequiredColumnMissing { columns });
    }

    let mut records = Vec::new();
    let mut zeroed = Vec::new();
    let mut current_group = OTHER_CATEGORY.to_string();

    for row in &grid[header_idx + 1..] {
        // Group labels appear once and apply to the rows beneath them
        if let Some(i) = group_col {
            let g = cell_at(row, i).text();
            if !is_null_token(&g) {
                current_group = g;
            }
        }

        let raw_product = cell_at(row, product_col).text();
        if raw_product.is_empty()
            || ["NAN", "NONE", "ROLLUP"].contains(&raw_product.to_uppercase().as_str())
        {
            continue;
        }

        let (code, product) = match RE_CODE_PRODUCT.captures(&raw_product) {
            Some(caps) => (caps[1].trim().to_string(), caps[2].trim().to_string()),
            None => (synthetic_code(&raw_product), raw_product.clone()),
        };

        let qty_system = stock_col
            .and_then(|i| cell_at(row, i).as_qty())
            .unwrap_or(0);
        let qty_sold = sold_col
            .and_then(|i| cell_at(row, i).as_qty())
            .unwrap_or(0);

        if qty_system <= 0 {
            // A stock-out is not a bad row: keep it for the restock queue
            if qty_sold > 0 {
                zeroed.push(ZeroedProduct {
                    code,
                    product,
                    group: normalize_group(&current_group),
                    qty_sold,
                });
            }
            continue;
        }

        let mut note = note_col
            .map(|i| cell_at(row, i).text())
            .unwrap_or_default();
        if is_null_token(&note) || RE_ONLY_NUMBER.is_match(&note) {
            note.clear();
        }

        let mut category = normalize_group(&current_group);
        if category.is_empty() || category == OTHER_CATEGORY {
            category = classify_product(&product).to_string();
        }

        let annotation = parse_annotation(&note, qty_system);
        records.push(SalesRecord {
            code,
            product,
            category,
            qty_system,
            qty_physical: annotation.qty_physical,
            difference: annotation.difference,
            note: annotation.note,
            status: annotation.status,
            qty_sold,
        });
    }

    if records.is_empty() {
        return Err(SheetError::NoValidRows {
            format: SheetFormat::Sales,
        });
    }
    Ok(SalesSheet { records, zeroed })
}

/// Detect the layout and extract records, trying the stock parser first
/// and the sales parser second when detection is inconclusive
pub fn parse_grid(grid: &[Vec<CellValue>]) -> Result<ParsedSheet, SheetError> {
    match detect_format(grid) {
        SheetFormat::Stock => parse_stock_sheet(grid).map(|records| ParsedSheet::Stock { records }),
        SheetFormat::Sales => parse_sales_sheet(grid).map(|sheet| ParsedSheet::Sales {
            records: sheet.records,
            zeroed: sheet.zeroed,
        }),
        SheetFormat::Unknown => {
            if let Ok(records) = parse_stock_sheet(grid) {
                return Ok(ParsedSheet::Stock { records });
            }
            if let Ok(sheet) = parse_sales_sheet(grid) {
                return Ok(ParsedSheet::Sales {
                    records: sheet.records,
                    zeroed: sheet.zeroed,
                });
            }
            Err(SheetError::UnrecognizedFormat)
        }
    }
}
