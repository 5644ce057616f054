//! LinkAuth - license key authentication service
//!
//! Issues opaque license keys, validates them against expiry, status and an
//! optional hardware binding, and records every validation attempt. The HTTP
//! layer in [`handlers`] is a thin wrapper over [`licensing`] and [`reporting`].

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod id;
pub mod keygen;
pub mod licensing;
pub mod models;
pub mod pagination;
pub mod rate_limit;
pub mod reporting;
pub mod util;
