//! Registry of mounted status pages.
//!
//! Pages are kept in a moka cache keyed by page id so that a page still loading
//! can be re-rendered on refresh without issuing another backend call. Idle
//! pages expire after `pages.idle_ttl_seconds` and expiry unmounts them.
//!
//! Capacity pressure only drops the registry's reference. The cache uses LRU
//! so a fresh mount is always admitted, and a page pushed out while a request
//! still holds it keeps fetching until that request drops it.

use std::sync::Arc;

use moka::future::Cache;
use moka::notification::RemovalCause;
use moka::policy::EvictionPolicy;
use uuid::Uuid;

use crate::backend::BackendClient;
use crate::config::PageConfig;

use super::StatusPage;

/// Mounted pages plus the client new pages are mounted with.
#[derive(Clone)]
pub struct MountedPages {
    pages: Cache<Uuid, Arc<StatusPage>>,
    client: Arc<dyn BackendClient>,
}

impl MountedPages {
    pub fn new(client: Arc<dyn BackendClient>, config: &PageConfig) -> Self {
        let pages = Cache::builder()
            .max_capacity(config.max_mounted)
            .time_to_idle(config.idle_ttl())
            .eviction_policy(EvictionPolicy::lru())
            .eviction_listener(|id: Arc<Uuid>, page: Arc<StatusPage>, cause: RemovalCause| {
                tracing::debug!(page_id = %id, cause = ?cause, "Evicting mounted page");
                match cause {
                    RemovalCause::Expired | RemovalCause::Explicit => page.unmount(),
                    // Dropping the last reference unmounts via Drop
                    _ => {}
                }
            })
            .build();

        Self { pages, client }
    }

    /// Mount a fresh page and register it.
    pub async fn mount(&self) -> Arc<StatusPage> {
        let page = Arc::new(StatusPage::mount(Arc::clone(&self.client)));
        self.pages.insert(page.id(), Arc::clone(&page)).await;
        page
    }

    /// Look up a mounted page. Never triggers a backend call.
    pub async fn get(&self, id: &Uuid) -> Option<Arc<StatusPage>> {
        self.pages.get(id).await
    }

    /// Remove a page and tear it down.
    pub async fn unmount(&self, id: &Uuid) {
        if let Some(page) = self.pages.remove(id).await {
            page.unmount();
        }
    }

    /// Approximate number of mounted pages.
    pub fn mounted_count(&self) -> u64 {
        self.pages.entry_count()
    }
}
