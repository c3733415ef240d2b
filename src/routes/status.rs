//! Handlers for the status page.
//!
//! `GET /` mounts a new page, which issues the one backend call. The handler
//! gives the call `ui.render_wait_ms` to settle and then renders whatever state
//! the page is in. A page still loading refreshes into `GET /page/{id}`, which
//! re-renders the same mounted page and never calls the backend again.

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Extension,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppErrorResponse, ResultExt};
use crate::middleware::RequestId;
use crate::page::StatusPage;
use crate::state::AppState;
use crate::templates::render_status;

/// Mount a fresh status page and render it.
#[instrument(name = "status::index", skip(state, request_id))]
pub async fn index(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Result<Html<String>, AppErrorResponse> {
    let page = state.pages.mount().await;

    let wait = state.config.ui.render_wait();
    if tokio::time::timeout(wait, page.settled()).await.is_err() {
        tracing::debug!(
            page_id = %page.id(),
            wait_ms = wait.as_millis() as u64,
            "Backend call still outstanding, rendering loading state"
        );
    }

    render(&state, &page, &request_id)
}

/// Re-render an already mounted page.
///
/// Unknown or expired pages redirect to `/`, which mounts a new one.
#[instrument(name = "status::view", skip(state, request_id), fields(page_id = %page_id))]
pub async fn view(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(page_id): Path<String>,
) -> Result<Response, AppErrorResponse> {
    let page = match Uuid::parse_str(&page_id) {
        Ok(id) => state.pages.get(&id).await,
        Err(_) => None,
    };

    match page {
        Some(page) => Ok(render(&state, &page, &request_id)?.into_response()),
        None => {
            tracing::debug!("Page not mounted, remounting");
            Ok(Redirect::to("/").into_response())
        }
    }
}

fn render(
    state: &AppState,
    page: &StatusPage,
    request_id: &RequestId,
) -> Result<Html<String>, AppErrorResponse> {
    let view = page.view();
    let html = render_status(&state.tera, &state.config.ui, &view).with_request_id(request_id)?;
    Ok(Html(html))
}
