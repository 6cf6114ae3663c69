// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Bulk removal of every resource in the tenant
//!
//! Collections are cleaned in dependency order: app instances (taken
//! offline first), app templates, initiators, initiator groups. Inside a
//! collection every entity is removed by its own task, and no more tasks
//! run at once than the pool has connections.

use std::sync::Arc;
use std::time::Duration;

use datera_api::ListParams;
use tokio::sync::Semaphore;

use crate::entity::Entity;
use crate::error::Error;
use crate::sdk::{APP_INSTANCES, APP_TEMPLATES, INITIATOR_GROUPS, INITIATORS, Sdk};

const CLEAN_ORDER: [&str; 4] = [APP_INSTANCES, APP_TEMPLATES, INITIATORS, INITIATOR_GROUPS];

/// Server error text for resources that can never be deleted
const READ_ONLY_MARKER: &str = "read-only";

/// Tuning for [`Sdk::force_clean_with`]
#[derive(Debug, Clone)]
pub struct CleanOptions {
    /// Attempts at deleting one app template before giving up
    pub template_attempts: usize,
    /// Pause between template delete attempts
    pub template_retry_delay: Duration,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            template_attempts: 5,
            template_retry_delay: Duration::from_secs(2),
        }
    }
}

/// What a clean run did
#[derive(Debug, Default)]
pub struct CleanReport {
    /// Paths that were deleted or were already gone
    pub removed: Vec<String>,
    /// Read-only resources left in place
    pub skipped: Vec<String>,
    /// Paths (or collections that could not be listed) and why they failed
    pub failed: Vec<(String, Error)>,
}

impl CleanReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

enum Outcome {
    Removed,
    Skipped,
    Failed(Error),
}

impl Sdk {
    /// Remove every app instance, app template, initiator and initiator
    /// group in the tenant.
    pub async fn force_clean(&self) -> CleanReport {
        self.force_clean_with(&CleanOptions::default()).await
    }

    pub async fn force_clean_with(&self, options: &CleanOptions) -> CleanReport {
        let mut report = CleanReport::default();
        let semaphore = Arc::new(Semaphore::new(self.pool().capacity().max(1)));

        for collection in CLEAN_ORDER {
            let entities = match self.get_ep(collection).list(&ListParams::default()).await {
                Ok(entities) => entities,
                Err(e) => {
                    tracing::error!(collection, error = %e, "Failed to list collection");
                    report.failed.push((collection.to_string(), e));
                    continue;
                }
            };

            tracing::info!(collection, count = entities.len(), "Cleaning collection");

            let mut handles = Vec::with_capacity(entities.len());
            for entity in entities {
                let semaphore = Arc::clone(&semaphore);
                let options = options.clone();
                let path = entity.path().to_string();
                let handle = tokio::spawn(async move {
                    let Ok(_permit) = semaphore.acquire_owned().await else {
                        return Outcome::Failed(Error::ConnectionRetrievalFailure);
                    };
                    remove(collection, entity, &options).await
                });
                handles.push((path, handle));
            }

            for (path, handle) in handles {
                match handle.await {
                    Ok(Outcome::Removed) => report.removed.push(path),
                    Ok(Outcome::Skipped) => report.skipped.push(path),
                    Ok(Outcome::Failed(e)) => {
                        tracing::warn!(path = %path, error = %e, "Failed to remove resource");
                        report.failed.push((path, e));
                    }
                    Err(e) => {
                        tracing::error!(path = %path, error = %e, "Clean task join error");
                        report.failed.push((path, Error::TaskJoin(e)));
                    }
                }
            }
        }

        tracing::info!(
            removed = report.removed.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Force clean complete"
        );
        report
    }
}

async fn remove(collection: &str, mut entity: Entity, options: &CleanOptions) -> Outcome {
    match collection {
        APP_INSTANCES => {
            if let Err(e) = entity.set_kv(&["admin_state=offline", "force=true"]).await {
                tracing::warn!(
                    path = %entity.path(),
                    error = %e,
                    "Failed to take app instance offline"
                );
            }
            delete(&entity).await
        }
        APP_TEMPLATES => delete_template(&entity, options).await,
        _ => delete(&entity).await,
    }
}

async fn delete(entity: &Entity) -> Outcome {
    match entity.delete(&["force=true"]).await {
        Ok(()) => Outcome::Removed,
        Err(e) if e.is_not_found() => Outcome::Removed,
        Err(e) => Outcome::Failed(e),
    }
}

/// Templates still referenced by a disappearing app instance refuse
/// deletion for a while; retry until they go or turn out read-only.
async fn delete_template(entity: &Entity, options: &CleanOptions) -> Outcome {
    let attempts = options.template_attempts.max(1);
    let mut attempt = 1;
    loop {
        match delete(entity).await {
            Outcome::Failed(e) if is_read_only(&e) => {
                tracing::debug!(path = %entity.path(), "Leaving read-only app template");
                return Outcome::Skipped;
            }
            Outcome::Failed(e) if attempt >= attempts => {
                tracing::debug!(path = %entity.path(), attempts, "Giving up on app template");
                return Outcome::Failed(e);
            }
            Outcome::Failed(e) => {
                tracing::debug!(
                    path = %entity.path(),
                    attempt,
                    error = %e,
                    "Retrying app template delete"
                );
                tokio::time::sleep(options.template_retry_delay).await;
                attempt += 1;
            }
            done => return done,
        }
    }
}

fn is_read_only(error: &Error) -> bool {
    error
        .response()
        .is_some_and(|resp| resp.message.contains(READ_ONLY_MARKER))
        || error.to_string().contains(READ_ONLY_MARKER)
}
