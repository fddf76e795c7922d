//! Spreadsheet ingestion service
//!
//! Turns an uploaded workbook into dashboard state. Master uploads replace
//! the whole stock snapshot; partial uploads merge into it, drop products
//! the sheet reports as sold out and feed the restock queue from the
//! sheet's sales figures.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::Utc;
use serde::Serialize;
use shared::category::is_restock_excluded;
use shared::sheet::{parse_grid, CellValue, ParsedSheet, SheetFormat};

use crate::error::{AppError, AppResult};
use crate::models::{SalesRecord, StockRecord, ZeroedProduct};
use crate::services::store::{
    RepositionItem, SharedStore, StockEntry, StockStore, UploadHistoryEntry, UploadKind,
};

/// Ingestion service for stock and sales spreadsheets
#[derive(Clone)]
pub struct IngestService {
    store: SharedStore,
}

/// Outcome of an upload, with a user-facing summary line
#[derive(Debug, Clone, Serialize)]
pub struct UploadSummary {
    pub kind: UploadKind,
    pub format: SheetFormat,
    pub total: usize,
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    pub divergent: usize,
    pub restock_queued: usize,
    pub message: String,
}

impl IngestService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Replace the whole stock snapshot with the uploaded sheet. No
    /// reposition detection happens here; the queue only reacts to
    /// partial uploads.
    pub async fn master_upload(&self, filename: &str, bytes: &[u8]) -> AppResult<UploadSummary> {
        let grid = grid_from_workbook(bytes)?;
        let parsed = parse_grid(&grid)?;

        let mut store = self.store.write().await;
        let mut summary = apply_master(&mut store, parsed);

        let id = store.next_upload_id();
        store.uploads.push(UploadHistoryEntry {
            id,
            kind: UploadKind::Master,
            filename: filename.to_string(),
            rows: summary.total,
            uploaded_at: Utc::now(),
        });

        tracing::info!(
            filename,
            total = summary.total,
            divergent = summary.divergent,
            "master upload replaced stock"
        );

        let mut parts = vec![format!("{} produtos carregados", summary.total)];
        if summary.divergent > 0 {
            parts.push(format!("{} divergências", summary.divergent));
        }
        summary.message = parts.join(" · ");
        Ok(summary)
    }

    /// Merge the uploaded sheet into the current snapshot
    pub async fn partial_upload(&self, filename: &str, bytes: &[u8]) -> AppResult<UploadSummary> {
        let grid = grid_from_workbook(bytes)?;
        let parsed = parse_grid(&grid)?;

        let mut store = self.store.write().await;
        let mut summary = apply_partial(&mut store, parsed);

        let id = store.next_upload_id();
        store.uploads.push(UploadHistoryEntry {
            id,
            kind: UploadKind::Partial,
            filename: filename.to_string(),
            rows: summary.total,
            uploaded_at: Utc::now(),
        });

        tracing::info!(
            filename,
            total = summary.total,
            added = summary.added,
            updated = summary.updated,
            removed = summary.removed,
            restock_queued = summary.restock_queued,
            "partial upload merged"
        );

        let mut parts = vec![format!("{} linhas processadas", summary.total)];
        if summary.added > 0 {
            parts.push(format!("{} novos", summary.added));
        }
        if summary.updated > 0 {
            parts.push(format!("{} atualizados", summary.updated));
        }
        if summary.removed > 0 {
            parts.push(format!("{} zerados removidos", summary.removed));
        }
        if summary.divergent > 0 {
            parts.push(format!("{} divergências", summary.divergent));
        }
        if summary.restock_queued > 0 {
            parts.push(format!("{} para repor na loja", summary.restock_queued));
        }
        summary.message = parts.join(" · ");
        Ok(summary)
    }
}

/// Replace the stock map with the parsed sheet
fn apply_master(store: &mut StockStore, parsed: ParsedSheet) -> UploadSummary {
    let (entries, _zeroed, format) = entries_from_sheet(parsed);
    let total = entries.len();
    let divergent = entries.iter().filter(|e| e.status.is_divergent()).count();

    store.stock.clear();
    for entry in entries {
        store.stock.insert(entry.code.clone(), entry);
    }

    UploadSummary {
        kind: UploadKind::Master,
        format,
        total,
        added: total,
        updated: 0,
        removed: 0,
        divergent,
        restock_queued: 0,
        message: String::new(),
    }
}

/// Merge the parsed sheet into the stock map, feeding the restock queue
fn apply_partial(store: &mut StockStore, parsed: ParsedSheet) -> UploadSummary {
    let (entries, zeroed, format) = entries_from_sheet(parsed);
    let total = entries.len();
    let divergent = entries.iter().filter(|e| e.status.is_divergent()).count();

    let mut added = 0;
    let mut updated = 0;
    let mut restock_queued = 0;
    for entry in entries {
        // Anything that sold since the last upload needs shelf restocking,
        // whether or not warehouse stock remains
        if entry.qty_sold > 0
            && queue_restock(store, &entry.code, &entry.product, &entry.category, entry.qty_sold)
        {
            restock_queued += 1;
        }
        if store.stock.insert(entry.code.clone(), entry).is_some() {
            updated += 1;
        } else {
            added += 1;
        }
    }

    // Sold-out products leave the snapshot and also enter the queue
    let mut removed = 0;
    for z in &zeroed {
        if store.stock.remove(&z.code).is_some() {
            removed += 1;
        }
        if queue_restock(store, &z.code, &z.product, &z.group, z.qty_sold) {
            restock_queued += 1;
        }
    }

    UploadSummary {
        kind: UploadKind::Partial,
        format,
        total,
        added,
        updated,
        removed,
        divergent,
        restock_queued,
        message: String::new(),
    }
}

/// Queue a sold product unless its category is blacklisted or it is
/// already waiting; returns whether an item was queued
fn queue_restock(
    store: &mut StockStore,
    code: &str,
    product: &str,
    group: &str,
    qty_sold: i64,
) -> bool {
    if is_restock_excluded(group) || store.is_queued_for_restock(code) {
        return false;
    }
    let id = store.next_reposition_id();
    store.reposition.push(RepositionItem {
        id,
        code: code.to_string(),
        product: product.to_string(),
        group: group.to_string(),
        qty_sold,
        queued_at: Utc::now(),
        restocked: false,
        restocked_at: None,
    });
    true
}

fn entries_from_sheet(
    parsed: ParsedSheet,
) -> (Vec<StockEntry>, Vec<ZeroedProduct>, SheetFormat) {
    match parsed {
        ParsedSheet::Stock { records } => (
            records.into_iter().map(stock_entry).collect(),
            Vec::new(),
            SheetFormat::Stock,
        ),
        ParsedSheet::Sales { records, zeroed } => (
            records.into_iter().map(sales_entry).collect(),
            zeroed,
            SheetFormat::Sales,
        ),
    }
}

fn stock_entry(r: StockRecord) -> StockEntry {
    StockEntry {
        code: r.code,
        product: r.product,
        category: r.category,
        qty_system: r.qty_system,
        qty_physical: r.qty_physical,
        difference: r.difference,
        note: r.note,
        status: r.status,
        qty_sold: 0,
        updated_at: Utc::now(),
    }
}

fn sales_entry(r: SalesRecord) -> StockEntry {
    StockEntry {
        code: r.code,
        product: r.product,
        category: r.category,
        qty_system: r.qty_system,
        qty_physical: r.qty_physical,
        difference: r.difference,
        note: r.note,
        status: r.status,
        qty_sold: r.qty_sold,
        updated_at: Utc::now(),
    }
}

/// Read the first worksheet of an uploaded workbook into a raw cell grid
fn grid_from_workbook(bytes: &[u8]) -> Result<Vec<Vec<CellValue>>, AppError> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook = open_workbook_auto_from_rs(cursor)
        .map_err(|e| AppError::InvalidUpload(format!("could not open workbook: {e}")))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::InvalidUpload("workbook has no sheets".to_string()))?
        .map_err(|e| AppError::InvalidUpload(format!("could not read first sheet: {e}")))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_value).collect())
        .collect())
}

fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) => CellValue::Empty,
    }
}
