//! HTTP handlers for spreadsheet uploads

use axum::{
    extract::{Multipart, State},
    Json,
};

use shared::sheet::{parse_grid, CellValue, ParsedSheet};

use crate::error::{AppError, AppResult};
use crate::services::ingest::{IngestService, UploadSummary};
use crate::services::store::UploadHistoryEntry;
use crate::AppState;

/// Pull the first file field out of a multipart body
async fn read_upload(multipart: &mut Multipart) -> AppResult<(String, Vec<u8>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidUpload(e.to_string()))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidUpload(e.to_string()))?;
        if bytes.is_empty() {
            return Err(AppError::InvalidUpload("uploaded file is empty".to_string()));
        }
        return Ok((filename, bytes.to_vec()));
    }
    Err(AppError::InvalidUpload(
        "no file field in multipart body".to_string(),
    ))
}

/// Upload a master sheet, replacing the whole stock snapshot
pub async fn upload_master(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadSummary>> {
    let (filename, bytes) = read_upload(&mut multipart).await?;
    let service = IngestService::new(state.store);
    let summary = service.master_upload(&filename, &bytes).await?;
    Ok(Json(summary))
}

/// Upload a partial sheet, merging it into the snapshot
pub async fn upload_partial(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadSummary>> {
    let (filename, bytes) = read_upload(&mut multipart).await?;
    let service = IngestService::new(state.store);
    let summary = service.partial_upload(&filename, &bytes).await?;
    Ok(Json(summary))
}

/// Parse a raw cell grid without touching the stored snapshot, so the
/// frontend can show what an upload would extract
pub async fn preview_grid(
    Json(grid): Json<Vec<Vec<CellValue>>>,
) -> AppResult<Json<ParsedSheet>> {
    Ok(Json(parse_grid(&grid)?))
}

/// Upload audit trail, newest first
pub async fn list_uploads(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UploadHistoryEntry>>> {
    let store = state.store.read().await;
    let mut uploads = store.uploads.clone();
    uploads.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
    Ok(Json(uploads))
}
