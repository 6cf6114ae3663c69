// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Subscriber setup for binaries and tests embedding the client
//!
//! The library itself only emits `tracing` events. Request traces are at
//! `debug`, so `RUST_LOG=datera_client=debug` shows every call.

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "datera_client=info";

/// Install a `fmt` subscriber filtered by `RUST_LOG`, or by
/// `default_filter` when it is unset.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing(default_filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string()),
        ))
        .try_init()
        .is_ok()
}
