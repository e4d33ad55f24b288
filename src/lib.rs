// upvpn-core - Device identity, session and location catalog sync
// Library exports

pub mod api;
pub mod catalog;
pub mod config;
pub mod device;
pub mod errors;
pub mod logging;
pub mod repository;
pub mod session;
pub mod store;

pub use errors::{ApiError, Result, VpnError};
pub use repository::VpnRepository;
