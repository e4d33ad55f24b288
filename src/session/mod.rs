// Session flows — registration, sign-out and account requests.
//
// Three rules hold for every flow here:
//   - the network call happens before any local write, so a failed or
//     cancelled call leaves the store untouched
//   - multi-row writes go through one store transaction
//   - retrying a flow never creates a second device identity

use std::sync::Arc;

use crate::api::{AddDeviceRequest, OnlyEmail, UserCredentials, UserCredentialsWithCode, VpnApi};
use crate::device::DeviceIdentity;
use crate::errors::{ApiError, Result, VpnError};
use crate::store::{Device, Session, Store};

pub struct SessionManager {
    store: Store,
    api: Arc<dyn VpnApi>,
    identity: DeviceIdentity,
}

impl SessionManager {
    pub fn new(store: Store, api: Arc<dyn VpnApi>, identity: DeviceIdentity) -> Self {
        Self {
            store,
            api,
            identity,
        }
    }

    /// Email of the signed-in user, if any.
    pub async fn is_signed_in(&self) -> Result<Option<String>> {
        Ok(self.store.get_session().await?.map(|s| s.email))
    }

    pub async fn current_session(&self) -> Result<Option<Session>> {
        Ok(self.store.get_session().await?)
    }

    /// Add this device to the user's account and store the session.
    ///
    /// Returns the session token.
    pub async fn register(&self, credentials: &UserCredentials) -> Result<String> {
        // Covers the signed-out-then-signed-in case: sign-out deleted the row
        self.identity.ensure_device_exists().await?;

        let device = match self.store.get_device().await? {
            Some(device) => device,
            None => {
                tracing::error!("Device row missing right after ensure_device_exists");
                return Err(VpnError::Invariant(
                    "device row missing after ensure_device_exists",
                ));
            }
        };

        let request = AddDeviceRequest {
            user_credentials: credentials.clone(),
            device_info: device.device_info()?,
        };

        let response = match self.api.add_device(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Add device failed for {}: {}", credentials.email, e);
                return Err(e.into());
            }
        };

        let updated = Device {
            ipv4_address: Some(response.device_addresses.ipv4_address.to_string()),
            ..device
        };
        let session = Session {
            email: credentials.email.clone(),
            token: response.token.clone(),
        };
        self.store.save_registration(&session, &updated).await?;

        tracing::info!(
            email = %session.email,
            ipv4 = %response.device_addresses.ipv4_address,
            "Device registered"
        );
        Ok(response.token)
    }

    /// Revoke the session remotely, then clear local identity and session.
    ///
    /// An `Unauthorized` answer means the server already dropped the session,
    /// which ends in the same place as a successful revoke.
    pub async fn sign_out(&self) -> Result<()> {
        let token = self.store.get_session().await?.map(|s| s.token);

        match self.api.sign_out(token.as_deref()).await {
            Ok(()) => tracing::info!("Signed out"),
            Err(ApiError::Unauthorized) => {
                tracing::info!("Session already invalid on server; clearing local state")
            }
            Err(e) => {
                tracing::warn!("Sign out failed, keeping local state: {}", e);
                return Err(e.into());
            }
        }

        self.store.clear_identity().await?;
        Ok(())
    }

    /// Ask the server to email a sign-up code.
    pub async fn request_code(&self, email: &str) -> Result<()> {
        let request = OnlyEmail {
            email: email.to_string(),
        };
        self.api.request_code(&request).await.map_err(|e| {
            tracing::warn!("Request code failed for {}: {}", email, e);
            e.into()
        })
    }

    pub async fn sign_up(&self, request: &UserCredentialsWithCode) -> Result<()> {
        self.api.sign_up(request).await.map_err(|e| {
            tracing::warn!("Sign up failed for {}: {}", request.email, e);
            e.into()
        })
    }
}
