// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Fixed-size pool of authenticated connections
//!
//! The pool is created with all of its connections already logged in and
//! never grows or shrinks. [`ConnectionPool::checkout`] waits (FIFO) until
//! a connection is free and hands it out exclusively as a
//! [`PooledConnection`]; dropping the guard puts the connection back, so
//! release happens exactly once on every exit path.
//!
//! There is no health check on checkout. A connection whose session has
//! expired is repaired lazily by its own 401 handling, and one whose login
//! failed holds an empty key and logs in again on its next use.

use std::collections::VecDeque;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::config::SdkConfig;
use crate::connection::ApiConnection;
use crate::error::{Error, Result};

/// Bounded set of connections shared by concurrent tasks
pub struct ConnectionPool<C = ApiConnection> {
    idle: Mutex<VecDeque<C>>,
    permits: Arc<Semaphore>,
    capacity: usize,
}

impl<C> std::fmt::Debug for ConnectionPool<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionPool")
            .field("capacity", &self.capacity)
            .field("available", &self.available())
            .finish()
    }
}

impl ConnectionPool<ApiConnection> {
    /// Create `config.pool_size` connections and log each one in.
    ///
    /// Any login failure aborts construction.
    pub async fn connect(config: &SdkConfig) -> Result<Arc<Self>> {
        config.validate()?;

        let mut connections = Vec::with_capacity(config.pool_size);
        for _ in 0..config.pool_size {
            let mut conn = ApiConnection::new(config)?;
            conn.login().await?;
            connections.push(conn);
        }

        tracing::info!(
            host = %config.hostname,
            tenant = %config.tenant,
            size = config.pool_size,
            "Connection pool ready"
        );
        Ok(Arc::new(Self::from_connections(connections)))
    }
}

impl<C> ConnectionPool<C> {
    /// Wrap already prepared connections. Capacity is their count.
    pub fn from_connections(connections: Vec<C>) -> Self {
        let capacity = connections.len();
        Self {
            idle: Mutex::new(connections.into()),
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Connections currently idle in the pool
    pub fn available(&self) -> usize {
        self.lock_idle().len()
    }

    /// Connections currently held by callers
    pub fn outstanding(&self) -> usize {
        self.capacity - self.available()
    }

    /// Wait for a free connection and take it.
    ///
    /// There is no internal deadline; wrap the call in
    /// `tokio::time::timeout` if one is needed.
    pub async fn checkout(self: &Arc<Self>) -> Result<PooledConnection<C>> {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| Error::ConnectionRetrievalFailure)?;
        self.take(permit)
    }

    /// Take a connection only if one is free right now.
    pub fn try_checkout(self: &Arc<Self>) -> Option<PooledConnection<C>> {
        let permit = Arc::clone(&self.permits).try_acquire_owned().ok()?;
        self.take(permit).ok()
    }

    /// Return a connection to the pool. Equivalent to dropping the guard.
    pub fn release(&self, conn: PooledConnection<C>) {
        drop(conn);
    }

    fn take(self: &Arc<Self>, permit: OwnedSemaphorePermit) -> Result<PooledConnection<C>> {
        // Connections are queued before their permit is returned, so a
        // permit always finds one.
        let conn = self
            .lock_idle()
            .pop_front()
            .ok_or(Error::ConnectionRetrievalFailure)?;
        Ok(PooledConnection {
            conn: Some(conn),
            pool: Arc::clone(self),
            _permit: permit,
        })
    }

    fn lock_idle(&self) -> MutexGuard<'_, VecDeque<C>> {
        self.idle.lock().unwrap_or_else(|poisoned| {
            tracing::error!("Connection pool mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

/// Exclusive handle on a pooled connection
///
/// The connection goes back to the pool when the guard is dropped. `Drop`
/// queues it before the permit field is released, so a woken waiter
/// always finds it.
pub struct PooledConnection<C = ApiConnection> {
    conn: Option<C>,
    pool: Arc<ConnectionPool<C>>,
    _permit: OwnedSemaphorePermit,
}

impl<C> Deref for PooledConnection<C> {
    type Target = C;

    fn deref(&self) -> &C {
        match &self.conn {
            Some(conn) => conn,
            // Only emptied by `drop`.
            None => unreachable!(),
        }
    }
}

impl<C> DerefMut for PooledConnection<C> {
    fn deref_mut(&mut self) -> &mut C {
        match &mut self.conn {
            Some(conn) => conn,
            None => unreachable!(),
        }
    }
}

impl<C> Drop for PooledConnection<C> {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.pool.lock_idle().push_back(conn);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::time::Duration;

    fn pool(n: usize) -> Arc<ConnectionPool<usize>> {
        Arc::new(ConnectionPool::from_connections((0..n).collect()))
    }

    #[tokio::test]
    async fn test_checkout_blocks_when_exhausted() {
        let pool = pool(2);
        let a = pool.checkout().await.unwrap();
        let b = pool.checkout().await.unwrap();
        assert_ne!(*a, *b);
        assert_eq!(pool.outstanding(), 2);
        assert_eq!(pool.available(), 0);

        let blocked = tokio::time::timeout(Duration::from_millis(50), pool.checkout()).await;
        assert!(blocked.is_err(), "checkout should block on an exhausted pool");
        assert!(pool.try_checkout().is_none());

        pool.release(a);
        assert_eq!(pool.outstanding() + pool.available(), pool.capacity());
        let c = tokio::time::timeout(Duration::from_millis(50), pool.checkout())
            .await
            .expect("release should unblock checkout")
            .unwrap();
        drop(b);
        drop(c);
        assert_eq!(pool.available(), 2);
    }

    #[tokio::test]
    async fn test_release_wakes_exactly_one_waiter() {
        let pool = pool(1);
        let held = pool.checkout().await.unwrap();

        let mut waiters = Vec::new();
        for _ in 0..2 {
            let pool = Arc::clone(&pool);
            waiters.push(tokio::spawn(async move {
                let conn = pool.checkout().await.unwrap();
                tokio::time::sleep(Duration::from_millis(200)).await;
                drop(conn);
            }));
        }
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(held);
        tokio::time::sleep(Duration::from_millis(50)).await;
        // One waiter holds the connection, the other is still queued.
        assert_eq!(pool.outstanding(), 1);
        assert!(!waiters.iter().any(|w| w.is_finished()));

        for waiter in waiters {
            waiter.await.unwrap();
        }
        assert_eq!(pool.available(), 1);
    }

    #[tokio::test]
    async fn test_guard_returns_connection_on_error_path() {
        let pool = pool(1);
        let result: Result<()> = async {
            let _conn = pool.checkout().await?;
            Err(Error::InvalidArgument("boom".to_string()))
        }
        .await;
        assert!(result.is_err());
        assert_eq!(pool.available(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_capacity_survives_concurrent_release() {
        let pool = pool(4);
        let held = Arc::new(Mutex::new(HashSet::new()));

        let mut handles = Vec::new();
        for _ in 0..64 {
            let pool = Arc::clone(&pool);
            let held = Arc::clone(&held);
            handles.push(tokio::spawn(async move {
                for _ in 0..2_000 {
                    let conn = pool.checkout().await.unwrap();
                    assert!(held.lock().unwrap().insert(*conn), "connection handed out twice");
                    tokio::task::yield_now().await;
                    assert!(held.lock().unwrap().remove(&*conn));
                    drop(conn);
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(pool.available(), pool.capacity());
        assert_eq!(pool.outstanding(), 0);
    }
}
