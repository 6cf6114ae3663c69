// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! App instance, storage instance and volume schemas
//!
//! Every field is optional so that the same record can be used both to
//! decode a full server response and to send a partial update.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::initiator::AclPolicy;

/// Administrative state of an app or storage instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AdminState {
    Online,
    Offline,
}

/// App instance (`app_instances/{id}`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AppInstance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_state: Option<AdminState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_template: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_instances: Option<Vec<StorageInstance>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_policies: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}

/// Storage instance (`app_instances/{id}/storage_instances/{name}`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StorageInstance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_state: Option<AdminState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op_state: Option<String>,
    /// Target connection info, shape varies by access protocol
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_control_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acl_policy: Option<AclPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_pool: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volumes: Option<Vec<Volume>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}

/// Volume (`.../storage_instances/{name}/volumes/{name}`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Volume {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Size in GiB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replica_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_update_serializes_only_set_fields() {
        let update = AppInstance {
            descr: Some("golden ticket".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"descr": "golden ticket"}));
    }

    #[test]
    fn test_nested_storage_instances_decode() {
        let body = serde_json::json!({
            "path": "/app_instances/8a1c",
            "id": "8a1c",
            "name": "my-ai",
            "admin_state": "offline",
            "storage_instances": [{
                "name": "my-si",
                "volumes": [{"name": "my-vol", "size": 5, "replica_count": 1}]
            }]
        });
        let ai: AppInstance = serde_json::from_value(body).unwrap();
        assert_eq!(ai.admin_state, Some(AdminState::Offline));
        let si = &ai.storage_instances.unwrap()[0];
        assert_eq!(si.name.as_deref(), Some("my-si"));
        assert_eq!(si.volumes.as_ref().unwrap()[0].size, Some(5));
    }
}
