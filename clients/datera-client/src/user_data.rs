// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! JSON user data records attached to app instances

use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;

use datera_api::{ApiListOuter, ApiOuter, Attributes, ListParams, UserData, UserDataUpdateRequest};

use crate::connection::RequestOptions;
use crate::error::{Error, Result};
use crate::path::join_path;
use crate::pool::ConnectionPool;

const APP_INSTANCES: &str = "app_instances";
const USER_DATA: &str = "user_data";
const USER_DATA_LIST: &str = "app_instance_user_data";

/// Access to the user data of every app instance in the tenant
#[derive(Debug, Clone)]
pub struct UserDatas {
    pool: Arc<ConnectionPool>,
}

impl UserDatas {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Replace the user data of one app instance.
    pub async fn update(&self, app_instance_id: &str, data: Attributes) -> Result<UserData> {
        let body = serde_json::to_value(UserDataUpdateRequest { data })
            .map_err(|e| Error::decode("user data update", e))?;
        let path = record_path(app_instance_id);

        let mut conn = self.pool.checkout().await?;
        let outer = conn.put(&path, &RequestOptions::json(body)).await?;
        drop(conn);

        tracing::debug!(app_instance = %app_instance_id, "Updated user data");
        into_user_data(app_instance_id, outer)
    }

    /// User data of one app instance
    pub async fn get(&self, app_instance_id: &str) -> Result<UserData> {
        let path = record_path(app_instance_id);
        let mut conn = self.pool.checkout().await?;
        let outer = conn.get(&path, &RequestOptions::new()).await?;
        drop(conn);
        into_user_data(app_instance_id, outer)
    }

    /// User data of every app instance. `params.sort` is not supported by
    /// the server and is dropped.
    pub async fn list(&self, params: &ListParams) -> Result<Vec<UserData>> {
        let params = ListParams {
            sort: None,
            ..params.clone()
        };
        let mut conn = self.pool.checkout().await?;
        let outer: ApiListOuter = conn
            .get_list(USER_DATA_LIST, &RequestOptions::query(params.to_query()))
            .await?;
        drop(conn);

        outer
            .data
            .into_iter()
            .map(|item| {
                serde_json::from_value::<UserData>(item)
                    .map_err(|e| Error::decode("user data list item", e))
            })
            .collect()
    }
}

fn record_path(app_instance_id: &str) -> String {
    join_path([APP_INSTANCES, app_instance_id, USER_DATA])
}

fn into_user_data(app_instance_id: &str, outer: ApiOuter) -> Result<UserData> {
    let mut record: UserData = serde_json::from_value(Value::Object(outer.data))
        .map_err(|e| Error::decode("user data", e))?;
    if record.path.is_none() {
        record.path = Some(join_path([APP_INSTANCES, app_instance_id]));
    }
    Ok(record)
}
