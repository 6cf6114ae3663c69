// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Response envelopes shared by every resource

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Untyped JSON object, the dynamic view of a resource
pub type Attributes = Map<String, Value>;

/// Envelope around a single object response
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ApiOuter {
    #[serde(default)]
    pub data: Attributes,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub metadata: Attributes,
    #[serde(default)]
    pub request_time: i64,
    #[serde(default)]
    pub tenant: String,
    #[serde(default)]
    pub path: String,
}

/// Envelope around a list response
///
/// Only the first page is carried; `metadata` holds the server's paging
/// counters untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ApiListOuter {
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub metadata: Attributes,
    #[serde(default)]
    pub request_time: i64,
    #[serde(default)]
    pub tenant: String,
    #[serde(default)]
    pub path: String,
}

/// Login response
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ApiLogin {
    /// Session key, sent back as the `Auth-Token` header
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub request_time: i64,
}

/// Login request body
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

/// Response of the unauthenticated `api_versions` discovery call
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ApiVersions {
    #[serde(default)]
    pub api_versions: Vec<String>,
}

/// Echo of the request that produced an [`ErrorResponse`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ApiRequestEcho {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub op: String,
    #[serde(default)]
    pub tenant: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub params: HashMap<String, Value>,
    #[serde(default, rename = "connInfo")]
    pub conn_info: HashMap<String, Value>,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_type: String,
    #[serde(default, rename = "api_req_id")]
    pub id: Value,
    #[serde(default)]
    pub tenancy_class: String,
}

/// Failure payload reported by the server for any non-2xx response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ErrorResponse {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: i64,
    /// HTTP status as reported in the body
    #[serde(default)]
    pub http: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub ts: String,
    #[serde(default)]
    pub api_req: ApiRequestEcho,
}

impl ErrorResponse {
    /// Build a payload for a body that could not be decoded.
    pub fn from_raw(status: u16, body: &str) -> Self {
        Self {
            http: status,
            message: body.to_string(),
            ..Default::default()
        }
    }
}
