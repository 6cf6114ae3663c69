// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

// Allow expect/unwrap in tests - they provide clear panic messages on failure
#![allow(clippy::expect_used, clippy::unwrap_used)]

//! Endpoint and entity operations against a mock service.

mod common;

use datera_client::types::{AclPolicy, AdminState, AppInstance, PathRef, Volume};
use datera_client::{ListParams, Sdk};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::Mock;

use common::*;

async fn sdk_for(server: &wiremock::MockServer) -> Sdk {
    Sdk::new(&config_for(server, 1)).await.unwrap()
}

#[tokio::test]
async fn test_list_builds_member_paths() {
    let server = server_with_login().await;
    Mock::given(method("GET"))
        .and(path(api("app_instances")))
        .respond_with(list_response(json!([{"name": "a1", "admin_state": "online"}])))
        .expect(1)
        .mount(&server)
        .await;

    let sdk = sdk_for(&server).await;
    let entities = sdk
        .get_ep("app_instances")
        .list(&ListParams::default())
        .await
        .unwrap();

    assert_eq!(entities.len(), 1);
    let a1 = &entities[0];
    assert_eq!(a1.path(), "app_instances/a1");
    assert_eq!(a1.get("name"), Some(&json!("a1")));

    let typed: AppInstance = a1.decode().unwrap();
    assert_eq!(a1.get_str("name"), typed.name.as_deref());
    assert_eq!(typed.admin_state, Some(AdminState::Online));
}

#[tokio::test]
async fn test_list_passes_filter_params() {
    let server = server_with_login().await;
    Mock::given(method("GET"))
        .and(path(api("app_instances")))
        .and(query_param("filter", "match(name,test-*)"))
        .and(query_param("limit", "2"))
        .respond_with(list_response(json!([
            {"id": "u-1", "name": "test-1"},
            {"id": "u-2", "name": "test-2"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let sdk = sdk_for(&server).await;
    let params = ListParams {
        limit: Some(2),
        ..ListParams::filter("match(name,test-*)")
    };
    let paths: Vec<String> = sdk
        .app_instances()
        .list(&params)
        .await
        .unwrap()
        .iter()
        .map(|en| en.path().to_string())
        .collect();
    assert_eq!(paths, vec!["app_instances/u-1", "app_instances/u-2"]);
}

#[tokio::test]
async fn test_create_from_kv_and_typed_payloads() {
    let server = server_with_login().await;
    Mock::given(method("POST"))
        .and(path(api("app_instances")))
        .and(body_json(json!({"name": "my-app", "descr": "a=b"})))
        .respond_with(object_response(json!({"id": "u-1", "name": "my-app", "descr": "a=b"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api("app_instances")))
        .and(body_json(json!({"name": "typed-app", "admin_state": "offline"})))
        .respond_with(object_response(json!({"id": "u-2", "name": "typed-app"})))
        .expect(1)
        .mount(&server)
        .await;

    let sdk = sdk_for(&server).await;
    let ep = sdk.app_instances();

    let created = ep.create_kv(&["name=my-app", "descr=a=b"]).await.unwrap();
    assert_eq!(created.path(), "app_instances/u-1");
    assert_eq!(created.get_str("descr"), Some("a=b"));

    let request = AppInstance {
        name: Some("typed-app".to_string()),
        admin_state: Some(AdminState::Offline),
        ..Default::default()
    };
    let created = ep.create(&request).await.unwrap();
    assert_eq!(created.path(), "app_instances/u-2");
}

#[tokio::test]
async fn test_set_then_reload_observes_server_state() {
    let server = server_with_login().await;
    Mock::given(method("GET"))
        .and(path(api("app_instances")))
        .respond_with(list_response(json!([{"name": "a1", "descr": "old"}])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(api("app_instances/a1")))
        .and(body_json(json!({"descr": "x"})))
        .respond_with(object_response(json!({"name": "a1", "descr": "x"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api("app_instances/a1")))
        .respond_with(object_response(json!({"name": "a1", "descr": "x"})))
        .expect(1)
        .mount(&server)
        .await;

    let sdk = sdk_for(&server).await;
    let mut a1 = sdk
        .app_instances()
        .list(&ListParams::default())
        .await
        .unwrap()
        .remove(0);
    let stale = a1.clone();

    a1.set(&json!({"descr": "x"})).await.unwrap();
    assert_eq!(a1.get_str("descr"), Some("x"));
    assert_eq!(stale.get_str("descr"), Some("old"));

    let reloaded = stale.reload().await.unwrap();
    assert_eq!(reloaded.path(), "app_instances/a1");
    assert_eq!(reloaded.get_str("descr"), Some("x"));
    assert_eq!(stale.get_str("descr"), Some("old"));
}

#[tokio::test]
async fn test_delete_sends_kv_as_query() {
    let server = server_with_login().await;
    Mock::given(method("GET"))
        .and(path(api("app_instances/a1")))
        .respond_with(object_response(json!({"name": "a1"})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(api("app_instances/a1")))
        .and(query_param("force", "true"))
        .respond_with(object_response(json!({"name": "a1"})))
        .expect(1)
        .mount(&server)
        .await;

    let sdk = sdk_for(&server).await;
    let a1 = sdk.app_instances().fetch("a1").await.unwrap();
    a1.delete(&["force=true"]).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let delete = requests
        .iter()
        .find(|r| r.method.as_str() == "DELETE")
        .unwrap();
    assert!(delete.body.is_empty());
}

#[tokio::test]
async fn test_nested_navigation() {
    let server = server_with_login().await;
    Mock::given(method("GET"))
        .and(path(api("app_instances/a1")))
        .respond_with(object_response(json!({"name": "a1"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api("app_instances/a1/storage_instances")))
        .respond_with(list_response(json!([{"name": "si1"}])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api("app_instances/a1/storage_instances/si1/volumes")))
        .respond_with(list_response(json!([{"name": "v1", "size": 10, "replica_count": 3}])))
        .expect(1)
        .mount(&server)
        .await;

    let sdk = sdk_for(&server).await;
    let a1 = sdk.app_instances().fetch("a1").await.unwrap();
    let sis = a1.get_en("storage_instances").await.unwrap();
    assert_eq!(sis[0].path(), "app_instances/a1/storage_instances/si1");

    let vols = sis[0].get_en("volumes").await.unwrap();
    assert_eq!(vols[0].path(), "app_instances/a1/storage_instances/si1/volumes/v1");
    let vol: Volume = vols[0].decode().unwrap();
    assert_eq!(vol.size, Some(10));
}

#[tokio::test]
async fn test_singleton_get_and_set() {
    let server = server_with_login().await;
    let acl_path = api("app_instances/a1/storage_instances/si1/acl_policy");
    Mock::given(method("GET"))
        .and(path(acl_path.as_str()))
        .respond_with(object_response(json!({
            "path": "/app_instances/a1/storage_instances/si1/acl_policy",
            "initiators": [],
            "initiator_groups": []
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(acl_path.as_str()))
        .and(body_json(json!({"initiators": [{"path": "/initiators/init1"}]})))
        .respond_with(object_response(json!({
            "initiators": [{"path": "/initiators/init1"}],
            "initiator_groups": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sdk = sdk_for(&server).await;
    let acl_ep = sdk.get_ep("app_instances/a1/storage_instances/si1/acl_policy");

    let acl = acl_ep.get().await.unwrap();
    assert_eq!(acl.path(), "app_instances/a1/storage_instances/si1/acl_policy");

    let update = AclPolicy {
        initiators: Some(vec![PathRef::new("/initiators/init1")]),
        ..Default::default()
    };
    let updated = acl_ep.set(&update).await.unwrap();
    let policy: AclPolicy = updated.decode().unwrap();
    assert_eq!(policy.initiators.unwrap()[0].path, "/initiators/init1");
}
