use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::collection::name::CollectionName;
use crate::collection::ordering::arrange;
use crate::collection::submission::{Submission, SubmissionAccepted};
use crate::errors::AppError;
use crate::layout::engine::{layout, Placement};
use crate::layout::geometry::{DirectionMode, PageOrientation};
use crate::render::{render_document, render_preview};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    pub mode: Option<String>,
    pub orientation: Option<String>,
    pub shuffle_seed: Option<u64>,
}

impl ViewQuery {
    fn mode(&self) -> Result<DirectionMode, AppError> {
        match &self.mode {
            Some(raw) => raw.parse().map_err(AppError::Validation),
            None => Ok(DirectionMode::default()),
        }
    }

    fn orientation(&self) -> Result<Option<PageOrientation>, AppError> {
        self.orientation
            .as_deref()
            .map(|raw| raw.parse().map_err(AppError::Validation))
            .transpose()
    }
}

#[derive(Debug, Serialize)]
pub struct EntriesResponse {
    pub collection: CollectionName,
    pub entries: Vec<String>,
    pub empty: bool,
}

#[derive(Debug, Serialize)]
pub struct LayoutResponse {
    pub collection: CollectionName,
    pub mode: DirectionMode,
    pub page_count: usize,
    pub placements: Vec<Placement>,
}

/// GET /api/v1/collections
pub async fn handle_list_collections(
    State(state): State<AppState>,
) -> Result<Json<Vec<CollectionName>>, AppError> {
    let store = state.store.clone();
    let names = blocking(move || store.list_collections()).await??;
    Ok(Json(names))
}

/// POST /api/v1/collections/:name/entries
pub async fn handle_submit(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<Submission>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmissionAccepted>), AppError> {
    let Path(raw_name) = path?;
    let Json(req) = payload?;
    let collection = CollectionName::parse(&raw_name)?;
    let entry = req.to_entry()?;

    let store = state.store.clone();
    let target = collection.clone();
    let stored = blocking(move || store.append(&target, &entry)).await??;

    info!(collection = %collection, "Poem submitted");
    Ok((
        StatusCode::CREATED,
        Json(SubmissionAccepted {
            collection: collection.to_string(),
            entry: stored,
        }),
    ))
}

/// GET /api/v1/collections/:name/entries
pub async fn handle_list_entries(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<ViewQuery>, QueryRejection>,
) -> Result<Json<EntriesResponse>, AppError> {
    let Path(raw_name) = path?;
    let Query(query) = query?;
    let collection = CollectionName::parse(&raw_name)?;
    let entries = load_entries(&state, &collection, query.shuffle_seed).await?;
    Ok(Json(EntriesResponse {
        collection,
        empty: entries.is_empty(),
        entries,
    }))
}

/// GET /api/v1/collections/:name/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<ViewQuery>, QueryRejection>,
) -> Result<Html<String>, AppError> {
    let Path(raw_name) = path?;
    let Query(query) = query?;
    let collection = CollectionName::parse(&raw_name)?;
    let mode = query.mode()?;
    let entries = load_entries(&state, &collection, query.shuffle_seed).await?;
    Ok(Html(render_preview(&entries, mode)))
}

/// GET /api/v1/collections/:name/layout
pub async fn handle_layout(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<ViewQuery>, QueryRejection>,
) -> Result<Json<LayoutResponse>, AppError> {
    let Path(raw_name) = path?;
    let Query(query) = query?;
    let collection = CollectionName::parse(&raw_name)?;
    let mode = query.mode()?;
    let orientation = query.orientation()?;
    let entries = load_entries(&state, &collection, query.shuffle_seed).await?;

    let params = state.layout_params;
    let computed = blocking(move || {
        let geometry = params.geometry_for(mode, orientation);
        layout(&entries, &geometry, mode, &params)
    })
    .await?
    .map_err(crate::render::RenderError::from)?;

    Ok(Json(LayoutResponse {
        collection,
        mode,
        page_count: computed.page_count,
        placements: computed.placements,
    }))
}

/// GET /api/v1/collections/:name/pdf
pub async fn handle_pdf(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<ViewQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Path(raw_name) = path?;
    let Query(query) = query?;
    let collection = CollectionName::parse(&raw_name)?;
    let mode = query.mode()?;
    let orientation = query.orientation()?;
    let entries = load_entries(&state, &collection, query.shuffle_seed).await?;
    let entry_count = entries.len();

    let params = state.layout_params;
    let font = state.font;
    let title = collection.to_string();
    let bytes = blocking(move || {
        render_document(&entries, mode, orientation, &params, font, Some(title))
    })
    .await??;

    info!(
        collection = %collection,
        %mode,
        entries = entry_count,
        bytes = bytes.len(),
        "PDF generated"
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(&collection),
            ),
        ],
        bytes,
    )
        .into_response())
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Snapshot of the collection, arranged for display.
async fn load_entries(
    state: &AppState,
    collection: &CollectionName,
    shuffle_seed: Option<u64>,
) -> Result<Vec<String>, AppError> {
    let store = state.store.clone();
    let target = collection.clone();
    let entries = blocking(move || store.read_all(&target)).await??;
    Ok(arrange(entries, shuffle_seed))
}

/// Runs file I/O and CPU-bound rendering off the async executor.
async fn blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed: {e}")))
}

/// `attachment` disposition named after the collection.
///
/// Non-ASCII names get an RFC 5987 `filename*` next to an ASCII fallback.
fn content_disposition(collection: &CollectionName) -> String {
    let file_name = format!("{}.pdf", collection.as_str());
    let fallback: String = file_name
        .chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '_' })
        .map(|c| if c == '"' || c == '\\' { '_' } else { c })
        .collect();

    if fallback == file_name {
        return format!("attachment; filename=\"{file_name}\"");
    }

    let mut encoded = String::with_capacity(file_name.len() * 3);
    for byte in file_name.bytes() {
        if byte.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&byte) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_ascii() {
        let name = CollectionName::parse("spring").unwrap();
        assert_eq!(
            content_disposition(&name),
            "attachment; filename=\"spring.pdf\""
        );
    }

    #[test]
    fn test_content_disposition_non_ascii() {
        let name = CollectionName::parse("春").unwrap();
        assert_eq!(
            content_disposition(&name),
            "attachment; filename=\"_.pdf\"; filename*=UTF-8''%E6%98%A5.pdf"
        );
    }

    #[test]
    fn test_view_query_defaults_and_validation() {
        let query = ViewQuery::default();
        assert_eq!(query.mode().unwrap(), DirectionMode::Vertical);
        assert_eq!(query.orientation().unwrap(), None);

        let bad = ViewQuery {
            mode: Some("sideways".to_string()),
            ..ViewQuery::default()
        };
        assert!(matches!(bad.mode(), Err(AppError::Validation(_))));
    }
}
