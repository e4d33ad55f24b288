// Location catalog — local mirror of the server's location list.
//
// A refresh replaces the mirror by diff inside one transaction. A failed
// refresh leaves the previous mirror in place so the UI can keep showing it.
// last_access is local-only state used for the recent locations list.

mod countries;

pub use countries::{to_countries, Country};

use serde::Serialize;
use std::sync::Arc;

use crate::api::VpnApi;
use crate::errors::Result;
use crate::store::{Location, Store};

/// What a location list screen needs: the best available catalog and, if
/// the last refresh failed, why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationState {
    pub locations: Vec<Location>,
    pub fetch_error: Option<String>,
}

impl LocationState {
    /// Only worth showing an error when there is nothing else to show.
    pub fn should_show_error(&self) -> bool {
        self.fetch_error.is_some() && self.locations.is_empty()
    }
}

pub struct CatalogSync {
    store: Store,
    api: Arc<dyn VpnApi>,
}

impl CatalogSync {
    pub fn new(store: Store, api: Arc<dyn VpnApi>) -> Self {
        Self { store, api }
    }

    /// Fetch the catalog and mirror it locally.
    ///
    /// Returns the fetched list as received (last_access is 0 on every
    /// entry); it is not re-read from the store.
    pub async fn refresh_catalog(&self) -> Result<Vec<Location>> {
        let records = match self.api.get_locations().await {
            Ok(records) => records,
            Err(e) => {
                tracing::info!("Failed to get locations from API: {}", e);
                return Err(e.into());
            }
        };
        tracing::info!("Received {} locations from API", records.len());

        let fresh: Vec<Location> = records.into_iter().map(Location::from).collect();
        self.store.replace_catalog(&fresh).await?;
        Ok(fresh)
    }

    /// Refresh, falling back to the cached catalog when the fetch fails.
    pub async fn load_locations(&self) -> Result<LocationState> {
        match self.refresh_catalog().await {
            Ok(locations) => Ok(LocationState {
                locations,
                fetch_error: None,
            }),
            Err(e) if matches!(e, crate::errors::VpnError::Api(_)) => {
                let cached = self.store.all_locations().await?;
                tracing::info!("Serving {} cached locations", cached.len());
                Ok(LocationState {
                    locations: cached,
                    fetch_error: Some(e.user_message()),
                })
            }
            Err(e) => Err(e),
        }
    }

    pub async fn cached_locations(&self) -> Result<Vec<Location>> {
        Ok(self.store.all_locations().await?)
    }

    /// Up to `limit` previously selected locations, oldest selection first.
    pub async fn recent_locations(&self, limit: usize) -> Result<Vec<Location>> {
        Ok(self.store.recent_locations(limit).await?)
    }

    /// Record that `code` was just selected. Unknown codes are ignored;
    /// the return value says whether anything was recorded.
    pub async fn mark_recently_used(&self, code: &str) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();
        let recorded = self.store.update_last_access(code, now).await?;
        if !recorded {
            tracing::debug!("Location {} not in catalog; last access not recorded", code);
        }
        Ok(recorded)
    }
}
