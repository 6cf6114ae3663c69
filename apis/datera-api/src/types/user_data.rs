// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! User data records attached to app instances

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::common::Attributes;

/// Free-form JSON record stored alongside an app instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UserData {
    /// Path of the owning app instance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub data: Attributes,
}

/// Body of a user data update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UserDataUpdateRequest {
    pub data: Attributes,
}
