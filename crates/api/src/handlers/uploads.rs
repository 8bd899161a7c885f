//! Media upload handler.
//!
//! Files are written under `ServerConfig::upload_dir` in dated folders and
//! served back read-only under `/media`.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use soundstage_core::error::CoreError;
use soundstage_core::media::{self, MediaKind};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireEditor;
use crate::response::DataResponse;
use crate::state::AppState;

/// URL prefix the upload directory is mounted under.
pub const MEDIA_URL_PREFIX: &str = "/media";

/// Where an upload ended up.
#[derive(Debug, Serialize)]
pub struct StoredMedia {
    /// Path relative to the upload root: `yyyy/mm/{uuid}.{ext}`.
    pub path: String,
    pub url: String,
    pub kind: MediaKind,
    pub size_bytes: usize,
}

/// POST /api/uploads
///
/// Accepts a multipart body with a single `file` field. Other fields are
/// ignored. The type is decided by extension, the size by the bytes read.
pub async fn upload(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<StoredMedia>>)> {
    let max_bytes = state.config.upload_max_bytes;
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();

        let mut data = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            data.extend_from_slice(&chunk);
            // Stop reading as soon as the ceiling is crossed.
            if data.len() > max_bytes {
                media::validate_size(data.len(), max_bytes)?;
            }
        }
        upload = Some((filename, data));
        break;
    }

    let (filename, data) =
        upload.ok_or_else(|| AppError::BadRequest("Missing multipart field 'file'".into()))?;
    let ext = media::extension_of(&filename).ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "Uploaded file has no extension".into(),
        ))
    })?;
    let kind = media::classify(&ext)?;
    media::validate_size(data.len(), max_bytes)?;

    let relative = media::dated_path(Utc::now(), Uuid::new_v4(), &ext);
    let target = state.config.upload_dir.join(&relative);
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;
    }
    tokio::fs::write(&target, &data)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    tracing::info!(
        path = %relative,
        kind = ?kind,
        size_bytes = data.len(),
        user_id = user.user_id,
        "Media uploaded"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(StoredMedia {
            url: format!("{MEDIA_URL_PREFIX}/{relative}"),
            path: relative,
            kind,
            size_bytes: data.len(),
        })),
    ))
}
