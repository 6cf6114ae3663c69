// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Client entry point
//!
//! [`Sdk`] binds a connection pool and hands out endpoints that share it.
//! It is cheap to clone; clones use the same pool.

use std::sync::Arc;

use crate::config::SdkConfig;
use crate::entity::Endpoint;
use crate::error::Result;
use crate::pool::ConnectionPool;
use crate::user_data::UserDatas;

/// Top-level collections
pub const APP_INSTANCES: &str = "app_instances";
pub const APP_TEMPLATES: &str = "app_templates";
pub const INITIATORS: &str = "initiators";
pub const INITIATOR_GROUPS: &str = "initiator_groups";
pub const STORAGE_NODES: &str = "storage_nodes";
pub const TENANTS: &str = "tenants";

/// Handle on one management service
#[derive(Debug, Clone)]
pub struct Sdk {
    pool: Arc<ConnectionPool>,
}

impl Sdk {
    /// Build the pool described by `config` and log every connection in.
    pub async fn new(config: &SdkConfig) -> Result<Self> {
        let pool = ConnectionPool::connect(config).await?;
        Ok(Self { pool })
    }

    /// Use an existing pool.
    pub fn from_pool(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Arc<ConnectionPool> {
        &self.pool
    }

    /// Endpoint for any path below the versioned base URL
    pub fn get_ep(&self, path: &str) -> Endpoint {
        Endpoint::new(Arc::clone(&self.pool), path)
    }

    pub fn app_instances(&self) -> Endpoint {
        self.get_ep(APP_INSTANCES)
    }

    pub fn app_templates(&self) -> Endpoint {
        self.get_ep(APP_TEMPLATES)
    }

    pub fn initiators(&self) -> Endpoint {
        self.get_ep(INITIATORS)
    }

    pub fn initiator_groups(&self) -> Endpoint {
        self.get_ep(INITIATOR_GROUPS)
    }

    pub fn storage_nodes(&self) -> Endpoint {
        self.get_ep(STORAGE_NODES)
    }

    pub fn tenants(&self) -> Endpoint {
        self.get_ep(TENANTS)
    }

    pub fn user_datas(&self) -> UserDatas {
        UserDatas::new(Arc::clone(&self.pool))
    }

    /// API versions the server supports. Does not need a session.
    pub async fn api_versions(&self) -> Result<Vec<String>> {
        let conn = self.pool.checkout().await?;
        conn.api_versions().await
    }
}
