// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Query parameters accepted by list calls

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Query parameters for a single-page list request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ListParams {
    /// Glob filter, e.g. `match(name,my-app*)`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

impl ListParams {
    /// Filter-only parameters
    pub fn filter(filter: impl Into<String>) -> Self {
        Self {
            filter: Some(filter.into()),
            ..Default::default()
        }
    }

    /// Render as query-string pairs, omitting unset fields.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(filter) = &self.filter {
            query.push(("filter".to_string(), filter.clone()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            query.push(("offset".to_string(), offset.to_string()));
        }
        if let Some(sort) = &self.sort {
            query.push(("sort".to_string(), sort.clone()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_query_skips_unset_fields() {
        let params = ListParams {
            limit: Some(10),
            ..ListParams::filter("match(name,a*)")
        };
        assert_eq!(
            params.to_query(),
            vec![
                ("filter".to_string(), "match(name,a*)".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
        assert!(ListParams::default().to_query().is_empty());
    }
}
