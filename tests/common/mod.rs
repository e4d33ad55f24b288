// Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::net::Ipv4Addr;
use std::sync::Mutex;

use upvpn_core::api::{
    AddDeviceRequest, AddDeviceResponse, DeviceAddresses, LocationRecord, OnlyEmail,
    UserCredentials, UserCredentialsWithCode, VpnApi,
};
use upvpn_core::device::DeviceProfile;
use upvpn_core::ApiError;

/// Scripted `VpnApi`. Each call pops the next queued result, or falls back
/// to a successful default when the queue is empty.
#[derive(Default)]
pub struct FakeApi {
    pub add_device_results: Mutex<VecDeque<Result<AddDeviceResponse, ApiError>>>,
    pub sign_out_results: Mutex<VecDeque<Result<(), ApiError>>>,
    pub location_results: Mutex<VecDeque<Result<Vec<LocationRecord>, ApiError>>>,

    pub add_device_requests: Mutex<Vec<AddDeviceRequest>>,
    pub sign_out_tokens: Mutex<Vec<Option<String>>>,
    pub requested_codes: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_add_device(&self, result: Result<AddDeviceResponse, ApiError>) {
        self.add_device_results.lock().unwrap().push_back(result);
    }

    pub fn push_sign_out(&self, result: Result<(), ApiError>) {
        self.sign_out_results.lock().unwrap().push_back(result);
    }

    pub fn push_locations(&self, result: Result<Vec<LocationRecord>, ApiError>) {
        self.location_results.lock().unwrap().push_back(result);
    }
}

#[async_trait]
impl VpnApi for FakeApi {
    async fn add_device(&self, request: &AddDeviceRequest) -> Result<AddDeviceResponse, ApiError> {
        self.add_device_requests.lock().unwrap().push(request.clone());
        self.add_device_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(add_device_ok("tok-default", Ipv4Addr::new(10, 8, 0, 2))))
    }

    async fn sign_out(&self, token: Option<&str>) -> Result<(), ApiError> {
        self.sign_out_tokens
            .lock()
            .unwrap()
            .push(token.map(str::to_string));
        self.sign_out_results.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }

    async fn request_code(&self, request: &OnlyEmail) -> Result<(), ApiError> {
        self.requested_codes.lock().unwrap().push(request.email.clone());
        Ok(())
    }

    async fn sign_up(&self, _request: &UserCredentialsWithCode) -> Result<(), ApiError> {
        Ok(())
    }

    async fn get_locations(&self) -> Result<Vec<LocationRecord>, ApiError> {
        self.location_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

pub fn add_device_ok(token: &str, ip: Ipv4Addr) -> AddDeviceResponse {
    AddDeviceResponse {
        token: token.to_string(),
        device_addresses: DeviceAddresses { ipv4_address: ip },
    }
}

pub fn record(code: &str, country: &str, city: &str) -> LocationRecord {
    LocationRecord {
        code: code.to_string(),
        country: country.to_string(),
        country_code: code[..2].to_uppercase(),
        city: city.to_string(),
        city_code: code.to_string(),
        state: None,
    }
}

pub fn credentials(email: &str) -> UserCredentials {
    UserCredentials {
        email: email.to_string(),
        password: "correct horse".to_string(),
    }
}

pub fn profile() -> DeviceProfile {
    DeviceProfile {
        name: "Linux ci-runner".to_string(),
        version: "6.6".to_string(),
        arch: "x86_64".to_string(),
    }
}
