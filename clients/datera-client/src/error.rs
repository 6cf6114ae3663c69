// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Error types for datera-client

use datera_api::ErrorResponse;
use thiserror::Error;

/// Errors returned by connection, pool and entity operations
///
/// Session expiry is handled inside [`crate::ApiConnection`] and never
/// shows up here: a caller only sees [`Error::PermissionDenied`] once the
/// single re-login and retry have been spent.
#[derive(Error, Debug)]
pub enum Error {
    /// Network, DNS, TLS or timeout failure talking to the service
    #[error("Transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server rejected the request (HTTP 400)
    #[error("Invalid request: {}", .0.message)]
    InvalidRequest(Box<ErrorResponse>),

    /// Authentication was refused and no retry remains (HTTP 401)
    #[error("Permission denied: {}", .0.message)]
    PermissionDenied(Box<ErrorResponse>),

    /// Any other non-2xx response
    #[error("Server error (HTTP {status}): {}", .response.message)]
    Server {
        status: u16,
        response: Box<ErrorResponse>,
    },

    /// The response body did not match the expected shape
    #[error("Failed to decode {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The login call failed. `cause` holds the 401 that forced the
    /// re-login, when there was one.
    #[error("Login failed: {source}")]
    Login {
        #[source]
        source: Box<Error>,
        cause: Option<Box<Error>>,
    },

    /// Login answered 2xx but carried no session key
    #[error("Login response carried no session key")]
    MissingSessionKey,

    /// No connection could be taken from the pool
    #[error("Unable to retrieve a connection from the pool")]
    ConnectionRetrievalFailure,

    /// A spawned task panicked or was cancelled
    #[error("Task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    /// Caller supplied an argument the client cannot use
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The base URL could not be built
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Server-reported payload, when the failure carried one.
    pub fn response(&self) -> Option<&ErrorResponse> {
        match self {
            Error::InvalidRequest(resp) | Error::PermissionDenied(resp) => Some(resp),
            Error::Server { response, .. } => Some(response),
            Error::Login { source, .. } => source.response(),
            _ => None,
        }
    }

    /// HTTP status of the failure, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::InvalidRequest(_) => Some(400),
            Error::PermissionDenied(_) => Some(401),
            Error::Server { status, .. } => Some(*status),
            Error::Transport(e) => e.status().map(|s| s.as_u16()),
            Error::Login { source, .. } => source.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub(crate) fn decode(context: impl Into<String>, source: serde_json::Error) -> Self {
        Error::Decode {
            context: context.into(),
            source,
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
