//! Document listing endpoint: GET /docs?page=&limit=
//!
//! Returns a JSON array of stored documents, oldest first. See
//! [`tsvwatch_core::Page`] for how `page` and `limit` are interpreted.

use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;
use tracing::{error, info};
use tsvwatch_core::{Document, Page, bounded};

use crate::AppState;
use crate::error::{AppError, Result};

/// Raw query parameters. Kept as strings so that a malformed value falls
/// back to its default instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct DocsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl DocsQuery {
    #[must_use]
    pub fn page(&self) -> Page {
        Page::from_params(self.page.as_deref(), self.limit.as_deref())
    }
}

/// GET /docs - One page of documents
pub async fn list_docs(
    State(state): State<AppState>,
    Query(query): Query<DocsQuery>,
) -> Result<Json<Vec<Document>>> {
    let page = query.page();
    if page.is_empty() {
        info!(path = "/docs", status = 200, documents = 0, "Response sent");
        return Ok(Json(Vec::new()));
    }

    match bounded(
        state.query_timeout,
        state.store.list_documents(page.skip(), page.limit()),
    )
    .await
    {
        Ok(documents) => {
            info!(
                path = "/docs",
                status = 200,
                page = page.number(),
                documents = documents.len(),
                "Response sent"
            );
            Ok(Json(documents))
        }
        Err(e) => {
            let e = AppError::from(e);
            error!(path = "/docs", status = e.status_code().as_u16(), error = %e, "Request failed");
            Err(e)
        }
    }
}
