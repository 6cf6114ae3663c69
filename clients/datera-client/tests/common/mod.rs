// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Shared fixtures: a mock management service and configs pointing at it

#![allow(dead_code)]

use datera_client::SdkConfig;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "password";
pub const SESSION_KEY: &str = "k1";

/// Versioned path on the mock server
pub fn api(resource: &str) -> String {
    format!("/v2.2/{}", resource)
}

/// Plain-HTTP config for a pool of `pool_size` connections against `server`
pub fn config_for(server: &MockServer, pool_size: usize) -> SdkConfig {
    let mut config = SdkConfig::new("127.0.0.1", USERNAME, PASSWORD);
    config.secure = false;
    config.port = Some(server.address().port());
    config.pool_size = pool_size;
    config
}

pub fn login_response(key: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "key": key,
        "version": "v2.2",
        "request_time": 1_700_000_000
    }))
}

pub fn object_response(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "data": data,
        "version": "v2.2",
        "metadata": {},
        "request_time": 1_700_000_000,
        "tenant": "/root",
        "path": ""
    }))
}

pub fn list_response(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "data": data,
        "version": "v2.2",
        "metadata": {"total_count": data.as_array().map_or(0, Vec::len)},
        "request_time": 1_700_000_000,
        "tenant": "/root",
        "path": ""
    }))
}

pub fn error_response(status: u16, name: &str, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "name": name,
        "code": status,
        "http": status,
        "message": message,
        "ts": "2026-10-16T00:00:00Z",
        "api_req": {
            "version": "v2.2",
            "op": "GET",
            "tenant": "/root",
            "path": "",
            "params": {},
            "connInfo": {},
            "client_id": "",
            "client_type": "",
            "api_req_id": 1,
            "tenancy_class": ""
        }
    }))
}

/// Start a mock service that accepts every login with [`SESSION_KEY`].
pub async fn server_with_login() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(api("login")))
        .respond_with(login_response(SESSION_KEY))
        .mount(&server)
        .await;
    server
}
