// VPN repository — the one entry point for UI and CLI code.
//
// Wires the device identity, session flows and catalog sync to a shared
// store and API. Flows that write the same rows are serialized:
//   "session": register, sign_out
//   "catalog": refresh_catalog, load_locations

mod single_flight;

pub use single_flight::SingleFlight;

use std::sync::Arc;

use crate::api::{ApiClient, UserCredentials, UserCredentialsWithCode, VpnApi};
use crate::catalog::{to_countries, CatalogSync, Country, LocationState};
use crate::config::Config;
use crate::device::{DeviceIdentity, DeviceProfile};
use crate::errors::Result;
use crate::session::SessionManager;
use crate::store::{Device, Location, Session, Store};

const SESSION_FLIGHT: &str = "session";
const CATALOG_FLIGHT: &str = "catalog";

pub struct VpnRepository {
    identity: DeviceIdentity,
    session: SessionManager,
    catalog: CatalogSync,
    flights: SingleFlight,
}

impl VpnRepository {
    pub fn new(store: Store, api: Arc<dyn VpnApi>, profile: DeviceProfile) -> Self {
        let identity = DeviceIdentity::new(store.clone(), profile);
        Self {
            session: SessionManager::new(store.clone(), api.clone(), identity.clone()),
            catalog: CatalogSync::new(store, api),
            identity,
            flights: SingleFlight::new(),
        }
    }

    /// Open the database and build the HTTP client described by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = Store::open(&config.db_path)?;
        let api = ApiClient::new(config)?;
        tracing::debug!("Repository using API at {}", config.api_url);
        Ok(Self::new(store, Arc::new(api), DeviceProfile::detect()))
    }

    pub async fn ensure_device_exists(&self) -> Result<Device> {
        self.identity.ensure_device_exists().await
    }

    pub async fn is_signed_in(&self) -> Result<Option<String>> {
        self.session.is_signed_in().await
    }

    pub async fn current_session(&self) -> Result<Option<Session>> {
        self.session.current_session().await
    }

    pub async fn register(&self, credentials: &UserCredentials) -> Result<String> {
        let _flight = self.flights.acquire(SESSION_FLIGHT).await;
        self.session.register(credentials).await
    }

    pub async fn sign_out(&self) -> Result<()> {
        let _flight = self.flights.acquire(SESSION_FLIGHT).await;
        self.session.sign_out().await
    }

    pub async fn request_code(&self, email: &str) -> Result<()> {
        self.session.request_code(email).await
    }

    pub async fn sign_up(&self, request: &UserCredentialsWithCode) -> Result<()> {
        self.session.sign_up(request).await
    }

    pub async fn refresh_catalog(&self) -> Result<Vec<Location>> {
        let _flight = self.flights.acquire(CATALOG_FLIGHT).await;
        self.catalog.refresh_catalog().await
    }

    pub async fn load_locations(&self) -> Result<LocationState> {
        let _flight = self.flights.acquire(CATALOG_FLIGHT).await;
        self.catalog.load_locations().await
    }

    pub async fn cached_locations(&self) -> Result<Vec<Location>> {
        self.catalog.cached_locations().await
    }

    pub async fn recent_locations(&self, limit: usize) -> Result<Vec<Location>> {
        self.catalog.recent_locations(limit).await
    }

    pub async fn mark_recently_used(&self, code: &str) -> Result<bool> {
        self.catalog.mark_recently_used(code).await
    }

    /// Cached catalog grouped by country.
    pub async fn countries(&self) -> Result<Vec<Country>> {
        Ok(to_countries(&self.catalog.cached_locations().await?))
    }
}
