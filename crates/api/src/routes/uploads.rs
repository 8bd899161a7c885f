//! Route definitions for `/uploads`.

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::handlers::uploads;
use crate::state::AppState;

/// Multipart framing allowance on top of the file size limit.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Routes mounted at `/uploads`.
///
/// ```text
/// POST /   -> upload (editor, multipart field `file`)
/// ```
///
/// The default 2 MiB body limit is lifted to the configured upload size so
/// the handler can return its own 400 for oversized files.
pub fn router(upload_max_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", post(uploads::upload))
        .layer(DefaultBodyLimit::max(
            upload_max_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES),
        ))
}
