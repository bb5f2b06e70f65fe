// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! JSON-over-HTTP client for the accounting API.
//!
//! Every response is a `{ success, data, message }` envelope. Requests carry
//! the stored bearer token; a 401 triggers one refresh-token rotation and a
//! single retry. If the refresh is rejected the local session is torn down
//! and the caller gets [`LedgerError::Auth`].

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::models::User;
use crate::session::{Session, SessionStore};

const UA: &str = concat!(
    "cashbook/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/cashbook)"
);

/// Credential endpoints answer 401 for bad input; never rotate on those.
const NO_REFRESH: &[&str] = &["/auth/login", "/auth/register", "/auth/refresh", "/auth/logout"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub bearer: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// The wire. Swapped for a scripted fake in tests.
pub trait Transport {
    fn send(&self, req: &ApiRequest) -> LedgerResult<ApiResponse>;
}

pub struct HttpTransport {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout_secs: u64) -> LedgerResult<Self> {
        reqwest::Url::parse(base_url).map_err(|e| {
            LedgerError::validation(format!("Invalid api_url '{}': {}", base_url, e))
        })?;
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(UA)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }
}

impl Transport for HttpTransport {
    fn send(&self, req: &ApiRequest) -> LedgerResult<ApiResponse> {
        let url = format!("{}/{}", self.base_url, req.path.trim_start_matches('/'));
        let method = match req.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self.http.request(method, &url).query(&req.query);
        if let Some(token) = &req.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &req.body {
            builder = builder.json(body);
        }
        debug!(method = ?req.method, %url, "api request");
        let resp = builder.send()?;
        let status = resp.status().as_u16();
        let body = resp.text()?;
        debug!(status, "api response");
        Ok(ApiResponse { status, body })
    }
}

#[derive(Debug, Default, Deserialize)]
struct Envelope {
    success: Option<bool>,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default, alias = "error")]
    message: Option<String>,
}

/// Unwrap an envelope into `T`, or map the failure onto the error taxonomy.
pub fn decode<T: DeserializeOwned>(resp: &ApiResponse) -> LedgerResult<T> {
    let env: Envelope = if resp.body.trim().is_empty() {
        Envelope::default()
    } else {
        match serde_json::from_str(&resp.body) {
            Ok(env) => env,
            Err(_) if !(200..300).contains(&resp.status) => Envelope {
                message: Some(resp.body.trim().chars().take(200).collect()),
                ..Default::default()
            },
            Err(e) => return Err(e.into()),
        }
    };

    let ok = (200..300).contains(&resp.status) && env.success != Some(false);
    if ok {
        return Ok(serde_json::from_value(env.data.unwrap_or(Value::Null))?);
    }

    let msg = env
        .message
        .unwrap_or_else(|| format!("request failed with status {}", resp.status));
    Err(match resp.status {
        401 => LedgerError::Auth(msg),
        404 => LedgerError::NotFound(msg),
        400 | 409 | 422 => LedgerError::Validation(msg),
        408 | 502 | 503 | 504 => LedgerError::Network(msg),
        _ => LedgerError::Remote(msg),
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenPair {
    #[serde(alias = "token")]
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthPayload {
    user: User,
    #[serde(flatten)]
    tokens: TokenPair,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MePayload {
    Wrapped { user: User },
    Bare(User),
}

pub struct ApiClient<'s, T: Transport> {
    transport: T,
    store: &'s dyn SessionStore,
}

impl<'s, T: Transport> ApiClient<'s, T> {
    pub fn new(transport: T, store: &'s dyn SessionStore) -> Self {
        Self { transport, store }
    }

    pub fn session(&self) -> LedgerResult<Session> {
        self.store.load()
    }

    pub fn get<R: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> LedgerResult<R> {
        self.call(Method::Get, path, query, None)
    }

    pub fn post<R: DeserializeOwned>(&self, path: &str, body: Value) -> LedgerResult<R> {
        self.call(Method::Post, path, Vec::new(), Some(body))
    }

    pub fn put<R: DeserializeOwned>(&self, path: &str, body: Value) -> LedgerResult<R> {
        self.call(Method::Put, path, Vec::new(), Some(body))
    }

    pub fn delete(&self, path: &str) -> LedgerResult<()> {
        let _: Value = self.call(Method::Delete, path, Vec::new(), None)?;
        Ok(())
    }

    fn call<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<Value>,
    ) -> LedgerResult<R> {
        let mut req = ApiRequest {
            method,
            path: path.to_string(),
            query,
            body,
            bearer: self.store.load()?.access_token,
        };
        let resp = self.transport.send(&req)?;
        if resp.status != 401 || NO_REFRESH.contains(&path) {
            return decode(&resp);
        }

        debug!(path, "access token rejected, rotating");
        self.refresh()?;
        req.bearer = self.store.load()?.access_token;
        let retry = self.transport.send(&req)?;
        if retry.status == 401 {
            self.teardown();
            return Err(LedgerError::Auth(
                "Session expired, please log in again".into(),
            ));
        }
        decode(&retry)
    }

    /// Exchange the refresh token for a new pair. A rejected refresh clears
    /// the session; a network failure leaves it alone.
    pub fn refresh(&self) -> LedgerResult<()> {
        let mut session = self.store.load()?;
        let Some(refresh_token) = session.refresh_token.clone() else {
            self.teardown();
            return Err(LedgerError::Auth("Not logged in".into()));
        };
        let resp = self.transport.send(&ApiRequest {
            method: Method::Post,
            path: "/auth/refresh".into(),
            query: Vec::new(),
            body: Some(json!({ "refreshToken": refresh_token })),
            bearer: None,
        })?;
        match decode::<TokenPair>(&resp) {
            Ok(pair) => {
                session.access_token = Some(pair.access_token);
                if pair.refresh_token.is_some() {
                    session.refresh_token = pair.refresh_token;
                }
                self.store.save(&session)
            }
            Err(LedgerError::Network(msg)) => Err(LedgerError::Network(msg)),
            Err(err) => {
                warn!(%err, "token refresh rejected");
                self.teardown();
                Err(LedgerError::Auth(
                    "Session expired, please log in again".into(),
                ))
            }
        }
    }

    fn teardown(&self) {
        if let Err(err) = self.store.clear() {
            warn!(%err, "failed to clear local session");
        }
    }

    fn start_session(&self, payload: AuthPayload) -> LedgerResult<User> {
        let session = Session {
            access_token: Some(payload.tokens.access_token),
            refresh_token: payload.tokens.refresh_token,
            user: Some(payload.user.clone()),
        };
        self.store.save(&session)?;
        Ok(payload.user)
    }

    pub fn login(&self, email: &str, password: &str) -> LedgerResult<User> {
        let payload: AuthPayload =
            self.post("/auth/login", json!({ "email": email, "password": password }))?;
        self.start_session(payload)
    }

    pub fn register(&self, name: &str, email: &str, password: &str) -> LedgerResult<User> {
        let payload: AuthPayload = self.post(
            "/auth/register",
            json!({ "name": name, "email": email, "password": password }),
        )?;
        self.start_session(payload)
    }

    /// Server-side logout is best effort; local credentials are always cleared.
    pub fn logout(&self) -> LedgerResult<()> {
        let session = self.store.load()?;
        if session.is_authenticated() {
            let body = json!({ "refreshToken": session.refresh_token });
            if let Err(err) = self.post::<Value>("/auth/logout", body) {
                warn!(%err, "server logout failed");
            }
        }
        self.store.clear()
    }

    pub fn me(&self) -> LedgerResult<User> {
        let user = match self.get::<MePayload>("/auth/me", Vec::new())? {
            MePayload::Wrapped { user } | MePayload::Bare(user) => user,
        };
        let mut session = self.store.load()?;
        session.user = Some(user.clone());
        self.store.save(&session)?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_success_envelope() {
        let resp = ApiResponse::new(200, r#"{"success":true,"data":{"n":3},"message":"ok"}"#);
        let v: Value = decode(&resp).unwrap();
        assert_eq!(v["n"], 3);
    }

    #[test]
    fn decode_maps_status_to_taxonomy() {
        let cases = [
            (401, "auth"),
            (404, "not_found"),
            (409, "validation"),
            (503, "network"),
            (500, "remote"),
        ];
        for (status, kind) in cases {
            let resp = ApiResponse::new(status, r#"{"success":false,"message":"nope"}"#);
            let err = decode::<Value>(&resp).unwrap_err();
            let got = match err {
                LedgerError::Auth(_) => "auth",
                LedgerError::NotFound(_) => "not_found",
                LedgerError::Validation(_) => "validation",
                LedgerError::Network(_) => "network",
                LedgerError::Remote(_) => "remote",
                _ => "other",
            };
            assert_eq!(got, kind, "status {}", status);
        }
    }

    #[test]
    fn success_false_with_200_is_an_error() {
        let resp = ApiResponse::new(200, r#"{"success":false,"message":"Account name taken"}"#);
        let err = decode::<Value>(&resp).unwrap_err();
        assert_eq!(err.to_string(), "Server error: Account name taken");
    }

    #[test]
    fn non_json_error_body_becomes_message() {
        let resp = ApiResponse::new(502, "Bad Gateway");
        let err = decode::<Value>(&resp).unwrap_err();
        assert!(matches!(err, LedgerError::Network(m) if m == "Bad Gateway"));
    }
}
