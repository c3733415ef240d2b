//! The status page component.
//!
//! A `StatusPage` is mounted once per visit. Mounting spawns a single fetch
//! task that calls the backend hello endpoint exactly once; when the call
//! settles the page moves from `Loading` to either `Ready` or `Failed` and
//! stays there. Rendering only ever reads the current state.
//!
//! Each page owns a cancellation token. Unmounting (explicitly, on drop, or
//! when the registry expires the page) cancels the token, and a fetch that
//! settles afterwards is discarded instead of being applied.

mod registry;

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::backend::BackendClient;
use crate::config::{FAILURE_MESSAGE, LOADING_MESSAGE};

pub use registry::MountedPages;

/// Display state of a mounted page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState {
    /// Backend call outstanding
    Loading,
    /// Backend answered with a well-formed greeting
    Ready { message: String },
    /// Backend call failed for any reason
    Failed { error: String },
}

impl PageState {
    /// Text shown in the message line.
    pub fn message(&self) -> &str {
        match self {
            PageState::Loading => LOADING_MESSAGE,
            PageState::Ready { message } => message,
            PageState::Failed { .. } => FAILURE_MESSAGE,
        }
    }

    /// Failure description, present only once the call has failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            PageState::Failed { error } => Some(error),
            _ => None,
        }
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self, PageState::Loading)
    }

    pub fn phase(&self) -> Phase {
        match self {
            PageState::Loading => Phase::Loading,
            PageState::Ready { .. } => Phase::Ready,
            PageState::Failed { .. } => Phase::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Loading,
    Ready,
    Failed,
}

/// Render model handed to the `status.html` template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusView {
    pub page_id: String,
    pub phase: Phase,
    pub message: String,
    pub error: Option<String>,
}

impl StatusView {
    pub fn new(page_id: Uuid, state: &PageState) -> Self {
        Self {
            page_id: page_id.to_string(),
            phase: state.phase(),
            message: state.message().to_string(),
            error: state.error().map(str::to_string),
        }
    }
}

/// One mounted instance of the status page.
#[derive(Debug)]
pub struct StatusPage {
    id: Uuid,
    state: watch::Receiver<PageState>,
    cancel: CancellationToken,
}

impl StatusPage {
    /// Mount a page and start its one backend call.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn mount(client: Arc<dyn BackendClient>) -> Self {
        let id = Uuid::new_v4();
        let (tx, rx) = watch::channel(PageState::Loading);
        let cancel = CancellationToken::new();

        tracing::info!(page_id = %id, "Status page mounting");
        tokio::spawn(fetch_once(id, client, tx, cancel.clone()));

        Self {
            id,
            state: rx,
            cancel,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> PageState {
        self.state.borrow().clone()
    }

    /// Receiver observing every state change of this page.
    pub fn subscribe(&self) -> watch::Receiver<PageState> {
        self.state.clone()
    }

    /// Wait until the backend call has settled.
    ///
    /// If the page is unmounted before that, returns the last state seen.
    pub async fn settled(&self) -> PageState {
        let mut rx = self.state.clone();
        let result = rx.wait_for(PageState::is_settled).await.map(|s| (*s).clone());
        match result {
            Ok(state) => state,
            Err(_) => self.state(),
        }
    }

    pub fn view(&self) -> StatusView {
        StatusView::new(self.id, &self.state.borrow())
    }

    /// Tear the page down. Any response arriving later is discarded.
    pub fn unmount(&self) {
        if !self.cancel.is_cancelled() {
            tracing::debug!(page_id = %self.id, "Status page unmounted");
            self.cancel.cancel();
        }
    }

    pub fn is_mounted(&self) -> bool {
        !self.cancel.is_cancelled()
    }
}

impl Drop for StatusPage {
    fn drop(&mut self) {
        self.unmount();
    }
}

async fn fetch_once(
    id: Uuid,
    client: Arc<dyn BackendClient>,
    tx: watch::Sender<PageState>,
    cancel: CancellationToken,
) {
    let outcome = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::debug!(page_id = %id, "Page unmounted before backend call settled");
            return;
        }
        outcome = client.hello() => outcome,
    };

    // The page may have been torn down while the response was being decoded
    if cancel.is_cancelled() {
        tracing::debug!(page_id = %id, "Discarding backend result for unmounted page");
        return;
    }

    let next = match outcome {
        Ok(response) => {
            tracing::info!(page_id = %id, payload = %response.payload(), "Backend response");
            PageState::Ready {
                message: response.message,
            }
        }
        Err(e) => {
            tracing::error!(page_id = %id, error = %e, "Backend error");
            PageState::Failed {
                error: e.to_string(),
            }
        }
    };

    // Receivers may all be gone already; nothing left to update then
    let _ = tx.send(next);
}
