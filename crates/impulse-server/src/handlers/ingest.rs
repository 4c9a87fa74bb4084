//! CSV ingestion handler

use axum::{extract::Multipart, Json};
use tracing::{info, warn};

use crate::{AppError, MAX_UPLOAD_SIZE};
use impulse_core::{import::parse_csv_bytes, Transaction};

/// POST /api/ingest - Parse an uploaded CSV into transactions
///
/// Expects a multipart form with a `file` field. Nothing is analyzed or
/// stored; the parsed records are returned for a later analysis call.
pub async fn ingest(mut multipart: Multipart) -> Result<Json<Vec<Transaction>>, AppError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut total_size: usize = 0;

    // Extract fields from multipart form
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(&format!("Failed to read form field: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|_| AppError::bad_request("Failed to read file data"))?;
        total_size += bytes.len();

        // Check file size limit
        if total_size > MAX_UPLOAD_SIZE {
            return Err(AppError::bad_request(&format!(
                "File too large. Maximum size is {} MB",
                MAX_UPLOAD_SIZE / 1024 / 1024
            )));
        }

        file_data = Some(bytes.to_vec());
    }

    let data = file_data.ok_or_else(|| AppError::bad_request("No file provided"))?;
    if data.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::bad_request("Uploaded file is empty"));
    }

    let transactions = parse_csv_bytes(&data).map_err(|e| {
        warn!(error = %e, "Rejected CSV upload");
        AppError::bad_request(&format!("Failed to parse CSV: {}", e))
    })?;

    info!(
        bytes = data.len(),
        transactions = transactions.len(),
        "Ingested CSV upload"
    );
    Ok(Json(transactions))
}
