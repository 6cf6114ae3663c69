// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Authenticated API connection
//!
//! An [`ApiConnection`] owns one HTTP client bound to one versioned base
//! URL (`https://{host}:7718/v{version}` or `http://{host}:7717/v{version}`)
//! and one session key. Every authenticated call goes through
//! [`ApiConnection::execute_with_auth`], which logs in when no key is
//! held yet and absorbs a single session expiry:
//!
//! ```text
//! FirstAttempt --401--> login() --ok--> RetriedAfterLogin --401--> PermissionDenied
//!      |                   |                   |
//!     2xx               failure               2xx
//!      v                   v                   v
//!    result          Error::Login            result
//! ```
//!
//! Each request is traced at `debug` level with a fresh trace id before it
//! is sent and again, with its latency, once the response arrives.

use std::collections::BTreeMap;
use std::sync::Once;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use datera_api::{ApiListOuter, ApiLogin, ApiOuter, ApiVersions, ErrorResponse, LoginRequest};

use crate::REDACTED;
use crate::auth::AuthToken;
use crate::config::SdkConfig;
use crate::error::{Error, Result};
use crate::path::join_path;

/// Path of the login call, relative to the versioned base URL
const LOGIN_PATH: &str = "login";

/// Path of the unauthenticated version discovery call, relative to the host
const API_VERSIONS_PATH: &str = "api_versions";

const TENANT_HEADER: &str = "tenant";
const AUTH_TOKEN_HEADER: &str = "Auth-Token";

static NEXT_CONNECTION_ID: AtomicUsize = AtomicUsize::new(0);
static CRYPTO_PROVIDER: Once = Once::new();

/// reqwest is built without a rustls provider; install ring once per process.
fn install_crypto_provider() {
    CRYPTO_PROVIDER.call_once(|| {
        // Err means another component already installed one, which is fine.
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// Body, query string and headers for one request
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub body: Option<Value>,
    pub query: Vec<(String, String)>,
    pub headers: BTreeMap<String, String>,
    /// Replace the body with a redaction marker in traces
    pub sensitive: bool,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn json(body: Value) -> Self {
        Self {
            body: Some(body),
            ..Default::default()
        }
    }

    pub fn query(query: Vec<(String, String)>) -> Self {
        Self {
            query,
            ..Default::default()
        }
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }
}

/// Position of one logical call in the re-login protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RetryState {
    FirstAttempt,
    RetriedAfterLogin,
}

impl RetryState {
    /// A 401 only triggers a re-login on the first attempt.
    fn retry_eligible(self) -> bool {
        self == RetryState::FirstAttempt
    }
}

/// Outcome of a single HTTP exchange
#[derive(Debug)]
enum Classified<T> {
    Done(T),
    /// 401 while a retry is still allowed; carries the server payload so a
    /// failed re-login can report what triggered it.
    SessionExpired(ErrorResponse),
}

/// Build `scheme://host:port/v{version}`.
pub fn make_base_url(host: &str, port: u16, api_version: &str, secure: bool) -> Result<Url> {
    let host = host.trim_matches('/');
    let scheme = if secure { "https" } else { "http" };
    let version = api_version.trim_start_matches('v');
    Ok(Url::parse(&format!("{}://{}:{}/v{}", scheme, host, port, version))?)
}

/// One authenticated session against the management service
///
/// A connection is used by one task at a time; the pool hands it out
/// exclusively, and every mutating call takes `&mut self`.
pub struct ApiConnection {
    id: usize,
    client: reqwest::Client,
    base_url: Url,
    username: String,
    password: SecretString,
    tenant: String,
    headers: BTreeMap<String, String>,
    token: AuthToken,
}

impl std::fmt::Debug for ApiConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConnection")
            .field("id", &self.id)
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.username)
            .field("tenant", &self.tenant)
            .field("token", &self.token)
            .finish()
    }
}

impl ApiConnection {
    /// Create a connection. This does not log in.
    pub fn new(config: &SdkConfig) -> Result<Self> {
        install_crypto_provider();

        let base_url = make_base_url(
            &config.hostname,
            config.effective_port(),
            &config.api_version,
            config.secure,
        )?;

        if !config.verify_tls {
            tracing::warn!(url = %base_url, "TLS certificate verification is disabled");
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("datera-client/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()?;

        Ok(Self {
            id: NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed),
            client,
            base_url,
            username: config.username.clone(),
            password: SecretString::from(config.password.expose_secret().to_string()),
            tenant: config.tenant.clone(),
            headers: config.headers.clone(),
            token: AuthToken::new(),
        })
    }

    /// Process-unique connection id, used for log correlation
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    pub fn auth_token(&self) -> &AuthToken {
        &self.token
    }

    pub fn auth_token_mut(&mut self) -> &mut AuthToken {
        &mut self.token
    }

    /// Absolute URL for a path relative to the versioned base URL
    pub fn url_for(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&format!("/{}", join_path([self.base_url.path(), path])));
        url
    }

    /// Log in and store the returned session key.
    ///
    /// On failure the key is left empty so that the next authenticated call
    /// tries again.
    pub async fn login(&mut self) -> Result<()> {
        let body = LoginRequest {
            name: self.username.clone(),
            password: self.password.expose_secret().to_string(),
        };
        let body = serde_json::to_value(&body)
            .map_err(|e| Error::InvalidArgument(format!("login body: {}", e)))?;
        let opts = RequestOptions::json(body).sensitive();

        self.token.clear();
        let result = self
            .execute::<ApiLogin>(Method::PUT, LOGIN_PATH, &opts)
            .await
            .and_then(|login| {
                if login.key.is_empty() {
                    Err(Error::MissingSessionKey)
                } else {
                    Ok(login)
                }
            });

        match result {
            Ok(login) => {
                self.token.set(login.key);
                tracing::info!(
                    connection_id = self.id,
                    url = %self.base_url,
                    tenant = %self.tenant,
                    "Logged in"
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    connection_id = self.id,
                    url = %self.base_url,
                    error = %e,
                    "Login failed"
                );
                Err(Error::Login {
                    source: Box::new(e),
                    cause: None,
                })
            }
        }
    }

    /// Issue one unauthenticated request. A 401 is returned as
    /// [`Error::PermissionDenied`]; nothing is retried.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        opts: &RequestOptions,
    ) -> Result<T> {
        let url = self.url_for(path);
        match self.send(method, url, opts, false).await? {
            Classified::Done(value) => Ok(value),
            Classified::SessionExpired(resp) => Err(Error::PermissionDenied(Box::new(resp))),
        }
    }

    /// Issue an authenticated request, logging in first if needed and
    /// retrying exactly once after a re-login when the session has expired.
    pub async fn execute_with_auth<T: DeserializeOwned>(
        &mut self,
        method: Method,
        path: &str,
        opts: &RequestOptions,
    ) -> Result<T> {
        if self.token.is_empty() {
            self.login().await?;
        }

        let url = self.url_for(path);
        let mut state = RetryState::FirstAttempt;
        loop {
            let authed = self.with_auth_headers(opts);
            match self
                .send(method.clone(), url.clone(), &authed, state.retry_eligible())
                .await?
            {
                Classified::Done(value) => return Ok(value),
                Classified::SessionExpired(resp) => {
                    tracing::warn!(
                        connection_id = self.id,
                        method = %method,
                        url = %url,
                        "Session expired, logging in again"
                    );
                    if let Err(e) = self.login().await {
                        let cause = Error::PermissionDenied(Box::new(resp));
                        tracing::error!(
                            connection_id = self.id,
                            cause = %cause,
                            error = %e,
                            "Re-login after session expiry failed"
                        );
                        return Err(match e {
                            Error::Login { source, .. } => Error::Login {
                                source,
                                cause: Some(Box::new(cause)),
                            },
                            other => Error::Login {
                                source: Box::new(other),
                                cause: Some(Box::new(cause)),
                            },
                        });
                    }
                    state = RetryState::RetriedAfterLogin;
                }
            }
        }
    }

    pub async fn get(&mut self, path: &str, opts: &RequestOptions) -> Result<ApiOuter> {
        self.execute_with_auth(Method::GET, path, opts).await
    }

    /// Fetch one page of a collection
    pub async fn get_list(&mut self, path: &str, opts: &RequestOptions) -> Result<ApiListOuter> {
        self.execute_with_auth(Method::GET, path, opts).await
    }

    pub async fn put(&mut self, path: &str, opts: &RequestOptions) -> Result<ApiOuter> {
        self.execute_with_auth(Method::PUT, path, opts).await
    }

    pub async fn post(&mut self, path: &str, opts: &RequestOptions) -> Result<ApiOuter> {
        self.execute_with_auth(Method::POST, path, opts).await
    }

    pub async fn delete(&mut self, path: &str, opts: &RequestOptions) -> Result<ApiOuter> {
        self.execute_with_auth(Method::DELETE, path, opts).await
    }

    /// Unauthenticated discovery of the API versions the server speaks.
    pub async fn api_versions(&self) -> Result<Vec<String>> {
        let mut url = self.base_url.clone();
        url.set_path(API_VERSIONS_PATH);
        match self
            .send::<ApiVersions>(Method::GET, url, &RequestOptions::new(), false)
            .await?
        {
            Classified::Done(versions) => Ok(versions.api_versions),
            Classified::SessionExpired(resp) => Err(Error::PermissionDenied(Box::new(resp))),
        }
    }

    /// Copy of `opts` with the default, tenant and session headers attached.
    fn with_auth_headers(&self, opts: &RequestOptions) -> RequestOptions {
        let mut authed = opts.clone();
        let mut headers = self.headers.clone();
        headers.extend(opts.headers.clone());
        headers.insert(TENANT_HEADER.to_string(), self.tenant.clone());
        if let Some(key) = self.token.get() {
            headers.insert(AUTH_TOKEN_HEADER.to_string(), key.to_string());
        }
        authed.headers = headers;
        authed
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        opts: &RequestOptions,
        retry_eligible: bool,
    ) -> Result<Classified<T>> {
        let trace_id = Uuid::new_v4().to_string();

        let mut url = url;
        if !opts.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&opts.query);
        }

        let payload = if opts.sensitive {
            REDACTED.to_string()
        } else {
            opts.body
                .as_ref()
                .map(|b| b.to_string())
                .unwrap_or_default()
        };
        tracing::debug!(
            trace_id = %trace_id,
            connection_id = self.id,
            method = %method,
            url = %url,
            payload = %payload,
            headers = %trace_headers(&opts.headers),
            "Datera request"
        );

        let mut request = self.client.request(method.clone(), url.clone());
        for (name, value) in &opts.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &opts.body {
            request = request.json(body);
        }

        let started = Instant::now();
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    trace_id = %trace_id,
                    latency_ms = started.elapsed().as_millis() as u64,
                    method = %method,
                    url = %url,
                    error = %e,
                    "Datera request failed"
                );
                return Err(Error::Transport(e));
            }
        };
        let status = response.status();
        let body = response.text().await?;
        let latency = started.elapsed();

        let response_payload = if opts.sensitive { REDACTED } else { body.as_str() };
        tracing::debug!(
            trace_id = %trace_id,
            latency_ms = latency.as_millis() as u64,
            status = status.as_u16(),
            url = %url,
            payload = %response_payload,
            "Datera response"
        );

        let classified = classify(status, &body, retry_eligible, url.path());
        if let Err(e) = &classified {
            tracing::error!(
                trace_id = %trace_id,
                method = %method,
                url = %url,
                error = %e,
                "Datera request returned an error"
            );
        }
        classified
    }
}

/// Render headers for a trace record with the session key masked.
fn trace_headers(headers: &BTreeMap<String, String>) -> String {
    let masked: BTreeMap<&str, &str> = headers
        .iter()
        .map(|(k, v)| {
            if k.eq_ignore_ascii_case(AUTH_TOKEN_HEADER) {
                (k.as_str(), REDACTED)
            } else {
                (k.as_str(), v.as_str())
            }
        })
        .collect();
    serde_json::to_string(&masked).unwrap_or_default()
}

fn decode_error(status: StatusCode, body: &str) -> ErrorResponse {
    serde_json::from_str(body).unwrap_or_else(|_| ErrorResponse::from_raw(status.as_u16(), body))
}

/// Map an HTTP response onto the error model.
fn classify<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
    retry_eligible: bool,
    context: &str,
) -> Result<Classified<T>> {
    if status.is_success() {
        let body = if body.trim().is_empty() { "{}" } else { body };
        return serde_json::from_str(body)
            .map(Classified::Done)
            .map_err(|e| Error::decode(format!("response from {}", context), e));
    }

    let resp = decode_error(status, body);
    match status {
        StatusCode::UNAUTHORIZED if retry_eligible => Ok(Classified::SessionExpired(resp)),
        StatusCode::BAD_REQUEST => Err(Error::InvalidRequest(Box::new(resp))),
        StatusCode::UNAUTHORIZED => Err(Error::PermissionDenied(Box::new(resp))),
        _ => Err(Error::Server {
            status: status.as_u16(),
            response: Box::new(resp),
        }),
    }
}
