// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Generic navigation over the REST resource tree
//!
//! An [`Endpoint`] is a collection path (`app_instances`,
//! `app_instances/a1/storage_instances`, ...). Listing it or creating in it
//! yields [`Entity`] snapshots, each holding its own path and the raw JSON
//! attributes the server returned. Nested collections are reached by
//! joining paths with [`Entity::get_ep`]; nothing here knows which children
//! a resource has.
//!
//! Attributes can be read dynamically with [`Entity::get`] or decoded into
//! any typed schema with [`Entity::decode`]. Both views come from the same
//! snapshot, which is only ever replaced as a whole.
//!
//! Neither type holds a connection. Every call checks one out of the shared
//! pool and returns it when the call completes.

use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use datera_api::{ApiListOuter, ApiOuter, Attributes, ListParams};

use crate::connection::RequestOptions;
use crate::error::{Error, Result};
use crate::path::{join_path, parse_kv, parse_query};
use crate::pool::ConnectionPool;

/// Issue one authenticated call on a pooled connection.
async fn call<T: DeserializeOwned>(
    pool: &Arc<ConnectionPool>,
    method: Method,
    path: &str,
    opts: &RequestOptions,
) -> Result<T> {
    let mut conn = pool.checkout().await?;
    conn.execute_with_auth(method, path, opts).await
}

fn to_body<B: Serialize + ?Sized>(body: &B) -> Result<Value> {
    serde_json::to_value(body).map_err(|e| Error::decode("request body", e))
}

fn kv_body<S: AsRef<str>>(args: &[S]) -> Result<Value> {
    Ok(Value::Object(parse_kv(args)?))
}

/// Identifier of a resource inside its collection: `id`, else `name`.
fn identifier(attrs: &Attributes) -> Option<String> {
    ["id", "name"].iter().find_map(|key| match attrs.get(*key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Path of a resource returned from a collection. Payloads without an
/// identifier keep the collection path.
fn member_path(collection: &str, attrs: &Attributes) -> String {
    match identifier(attrs) {
        Some(id) => join_path([collection, id.as_str()]),
        None => join_path([collection]),
    }
}

/// Addressable collection of resources
#[derive(Debug, Clone)]
pub struct Endpoint {
    pool: Arc<ConnectionPool>,
    path: String,
}

impl Endpoint {
    pub fn new(pool: Arc<ConnectionPool>, path: &str) -> Self {
        Self {
            pool,
            path: join_path([path]),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Endpoint for a path below this one
    pub fn get_ep(&self, sub_path: &str) -> Endpoint {
        Endpoint::new(Arc::clone(&self.pool), &join_path([self.path.as_str(), sub_path]))
    }

    /// List the first page of the collection.
    pub async fn list(&self, params: &ListParams) -> Result<Vec<Entity>> {
        let opts = RequestOptions::query(params.to_query());
        let outer: ApiListOuter = call(&self.pool, Method::GET, &self.path, &opts).await?;

        outer
            .data
            .into_iter()
            .map(|item| -> Result<Entity> {
                let attrs: Attributes = serde_json::from_value(item)
                    .map_err(|e| Error::decode(format!("list item of {}", self.path), e))?;
                Ok(Entity::new(
                    Arc::clone(&self.pool),
                    member_path(&self.path, &attrs),
                    attrs,
                ))
            })
            .collect()
    }

    /// Fetch one member by its identifier.
    pub async fn fetch(&self, id: &str) -> Result<Entity> {
        let path = join_path([self.path.as_str(), id]);
        let outer: ApiOuter =
            call(&self.pool, Method::GET, &path, &RequestOptions::new()).await?;
        Ok(Entity::new(Arc::clone(&self.pool), path, outer.data))
    }

    /// Create a member from a map or typed payload.
    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> Result<Entity> {
        self.create_body(to_body(body)?).await
    }

    /// Create a member from `key=value` strings.
    pub async fn create_kv<S: AsRef<str>>(&self, args: &[S]) -> Result<Entity> {
        self.create_body(kv_body(args)?).await
    }

    async fn create_body(&self, body: Value) -> Result<Entity> {
        let outer: ApiOuter =
            call(&self.pool, Method::POST, &self.path, &RequestOptions::json(body)).await?;
        tracing::debug!(path = %self.path, "Created resource");
        Ok(Entity::new(
            Arc::clone(&self.pool),
            member_path(&self.path, &outer.data),
            outer.data,
        ))
    }

    /// Read the endpoint itself as a single object, for singleton
    /// resources such as `acl_policy`.
    pub async fn get(&self) -> Result<Entity> {
        let outer: ApiOuter =
            call(&self.pool, Method::GET, &self.path, &RequestOptions::new()).await?;
        Ok(Entity::new(Arc::clone(&self.pool), self.path.clone(), outer.data))
    }

    /// Update a singleton resource in place.
    pub async fn set<B: Serialize + ?Sized>(&self, body: &B) -> Result<Entity> {
        let opts = RequestOptions::json(to_body(body)?);
        let outer: ApiOuter = call(&self.pool, Method::PUT, &self.path, &opts).await?;
        Ok(Entity::new(Arc::clone(&self.pool), self.path.clone(), outer.data))
    }

    /// Update a singleton resource from `key=value` strings.
    pub async fn set_kv<S: AsRef<str>>(&self, args: &[S]) -> Result<Entity> {
        let opts = RequestOptions::json(kv_body(args)?);
        let outer: ApiOuter = call(&self.pool, Method::PUT, &self.path, &opts).await?;
        Ok(Entity::new(Arc::clone(&self.pool), self.path.clone(), outer.data))
    }
}

/// Snapshot of one resource
#[derive(Debug, Clone)]
pub struct Entity {
    pool: Arc<ConnectionPool>,
    path: String,
    attributes: Attributes,
}

impl Entity {
    pub fn new(pool: Arc<ConnectionPool>, path: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            pool,
            path: path.into(),
            attributes,
        }
    }

    /// Path used for every later call on this resource
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Raw attribute value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Attribute value when it is a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Decode the attributes into a typed schema.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.attributes.clone()))
            .map_err(|e| Error::decode(format!("attributes of {}", self.path), e))
    }

    /// JSON encoding of the attributes
    pub fn raw_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(&self.attributes)
            .map_err(|e| Error::decode(format!("attributes of {}", self.path), e))
    }

    /// Update the resource and take the server's answer as the new
    /// snapshot.
    pub async fn set<B: Serialize + ?Sized>(&mut self, body: &B) -> Result<()> {
        self.set_body(to_body(body)?).await
    }

    /// Update the resource from `key=value` strings.
    pub async fn set_kv<S: AsRef<str>>(&mut self, args: &[S]) -> Result<()> {
        self.set_body(kv_body(args)?).await
    }

    async fn set_body(&mut self, body: Value) -> Result<()> {
        let opts = RequestOptions::json(body);
        let outer: ApiOuter = call(&self.pool, Method::PUT, &self.path, &opts).await?;
        self.attributes = outer.data;
        Ok(())
    }

    /// Delete the resource. `args` become query parameters, e.g.
    /// `force=true`.
    pub async fn delete<S: AsRef<str>>(&self, args: &[S]) -> Result<()> {
        let opts = RequestOptions::query(parse_query(args)?);
        let _: ApiOuter = call(&self.pool, Method::DELETE, &self.path, &opts).await?;
        tracing::debug!(path = %self.path, "Deleted resource");
        Ok(())
    }

    /// Fetch a fresh snapshot. `self` is left untouched.
    pub async fn reload(&self) -> Result<Entity> {
        let outer: ApiOuter =
            call(&self.pool, Method::GET, &self.path, &RequestOptions::new()).await?;
        Ok(Entity::new(Arc::clone(&self.pool), self.path.clone(), outer.data))
    }

    /// Endpoint for a collection below this resource
    pub fn get_ep(&self, sub_path: &str) -> Endpoint {
        Endpoint::new(Arc::clone(&self.pool), &join_path([self.path.as_str(), sub_path]))
    }

    /// List a child collection directly.
    pub async fn get_en(&self, sub_path: &str) -> Result<Vec<Entity>> {
        self.get_ep(sub_path).list(&ListParams::default()).await
    }
}
