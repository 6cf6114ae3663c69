// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Client library for the Datera storage management REST API
//!
//! The client keeps a fixed pool of authenticated connections. Each
//! connection logs in once, attaches its session key to every call and,
//! when the key expires, logs in again and repeats the call exactly once.
//!
//! Resources are reached through a path-based navigation model: an
//! [`Endpoint`] is a collection and an [`Entity`] is one resource snapshot
//! whose attributes can be read untyped or decoded into the schemas in
//! [`types`].
//!
//! # Example
//!
//! ```ignore
//! use datera_client::{ListParams, Sdk, SdkConfig};
//!
//! let sdk = Sdk::new(&SdkConfig::load()?).await?;
//! for ai in sdk.app_instances().list(&ListParams::default()).await? {
//!     println!("{} {:?}", ai.path(), ai.get("admin_state"));
//!     for si in ai.get_en("storage_instances").await? {
//!         let volumes = si.get_en("volumes").await?;
//!         println!("  {} has {} volumes", si.path(), volumes.len());
//!     }
//! }
//! ```

pub mod auth;
pub mod clean;
pub mod config;
pub mod connection;
pub mod entity;
pub mod error;
pub mod logging;
pub mod path;
pub mod pool;
pub mod sdk;
pub mod user_data;

pub use auth::AuthToken;
pub use clean::{CleanOptions, CleanReport};
pub use config::{MAX_POOL_CONN, SdkConfig};
pub use connection::{ApiConnection, RequestOptions, make_base_url};
pub use entity::{Endpoint, Entity};
pub use error::{Error, Result};
pub use logging::init_tracing;
pub use path::{join_path, parse_kv};
pub use pool::{ConnectionPool, PooledConnection};
pub use sdk::Sdk;
pub use user_data::UserDatas;

/// Re-export of the wire and schema types
pub use datera_api as types;
pub use datera_api::{ErrorResponse, ListParams};

/// Marker written to logs in place of secrets
pub const REDACTED: &str = "********";

/// Random v4 UUID, e.g. for unique resource names
pub fn new_uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}
