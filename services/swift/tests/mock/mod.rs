//! In-memory Swift account used by the integration tests.
//!
//! Supports TempAuth, `/info`, account metadata, containers, objects and
//! temporary urls checked with [`Verifier`] against the shared clock.

use std::collections::{BTreeMap, HashMap};
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use http::{Method, StatusCode};
use percent_encoding::percent_decode_str;
use swiftsign_core::{Clock, HttpSend, ManualClock, Result};
use swiftsign_swift::{TempUrlKey, Verifier};

pub const BASE_PATH: &str = "/v1/AUTH_test";
pub const STORAGE_URL: &str = "http://127.0.0.1:8080/v1/AUTH_test";
pub const AUTH_URL: &str = "http://127.0.0.1:8080/auth/v1.0";
pub const USER: &str = "test:tester";
pub const PASSWORD: &str = "testing";
pub const TOKEN: &str = "AUTH_tk_mock";

#[derive(Default)]
struct State {
    metadata: HashMap<String, String>,
    containers: BTreeMap<String, BTreeMap<String, Bytes>>,
    temp_url_gets: usize,
}

/// A Swift account behind an [`HttpSend`].
#[derive(Clone)]
pub struct MockSwift {
    clock: ManualClock,
    tempurl: bool,
    state: Arc<Mutex<State>>,
}

impl Debug for MockSwift {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSwift").finish_non_exhaustive()
    }
}

impl MockSwift {
    pub fn new(clock: ManualClock) -> Self {
        Self {
            clock,
            tempurl: true,
            state: Arc::default(),
        }
    }

    /// Pretend the tempurl middleware is not installed.
    pub fn without_tempurl(mut self) -> Self {
        self.tempurl = false;
        self
    }

    pub fn metadata(&self) -> HashMap<String, String> {
        self.state.lock().unwrap().metadata.clone()
    }

    pub fn containers(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .containers
            .keys()
            .cloned()
            .collect()
    }

    pub fn object(&self, container: &str, object: &str) -> Option<Bytes> {
        self.state
            .lock()
            .unwrap()
            .containers
            .get(container)?
            .get(object)
            .cloned()
    }

    /// Number of GET requests that carried a temporary url.
    pub fn temp_url_gets(&self) -> usize {
        self.state.lock().unwrap().temp_url_gets
    }

    fn handle(&self, req: &http::Request<Bytes>) -> http::Response<Bytes> {
        let path = percent_decode_str(req.uri().path())
            .decode_utf8_lossy()
            .to_string();

        if path == "/info" {
            return self.info();
        }
        if path == "/auth/v1.0" {
            return self.auth(req);
        }
        let Some(rest) = path.strip_prefix(BASE_PATH) else {
            return status(StatusCode::NOT_FOUND);
        };

        let is_temp_url = req
            .uri()
            .query()
            .is_some_and(|q| q.contains("temp_url_sig="));
        if is_temp_url {
            return self.temp_url(req, rest);
        }
        if req.headers().get("x-auth-token").map(|v| v.as_bytes()) != Some(TOKEN.as_bytes()) {
            return status(StatusCode::UNAUTHORIZED);
        }

        let rest = rest.trim_start_matches('/');
        match rest.split_once('/') {
            _ if rest.is_empty() => self.account(req),
            None => self.container(req, rest),
            Some((container, object)) => self.object_call(req, container, object),
        }
    }

    fn info(&self) -> http::Response<Bytes> {
        let body = if self.tempurl {
            r#"{"swift":{"version":"mock"},"tempurl":{"methods":["GET","HEAD","PUT","POST","DELETE"]}}"#
        } else {
            r#"{"swift":{"version":"mock"}}"#
        };
        json(body.to_string())
    }

    fn auth(&self, req: &http::Request<Bytes>) -> http::Response<Bytes> {
        let header = |name: &str| req.headers().get(name).and_then(|v| v.to_str().ok());
        if header("x-auth-user") != Some(USER) || header("x-auth-key") != Some(PASSWORD) {
            return status(StatusCode::UNAUTHORIZED);
        }

        http::Response::builder()
            .status(StatusCode::OK)
            .header("X-Storage-Url", STORAGE_URL)
            .header("X-Auth-Token", TOKEN)
            .header("X-Auth-Token-Expires", "86400")
            .body(Bytes::new())
            .unwrap()
    }

    fn temp_url(&self, req: &http::Request<Bytes>, rest: &str) -> http::Response<Bytes> {
        if !self.tempurl {
            return status(StatusCode::UNAUTHORIZED);
        }

        let mut state = self.state.lock().unwrap();
        state.temp_url_gets += 1;
        let Some(key) = state.metadata.get("x-account-meta-temp-url-key") else {
            return status(StatusCode::UNAUTHORIZED);
        };
        let mut key = TempUrlKey::new(key);
        if let Some(key_2) = state.metadata.get("x-account-meta-temp-url-key-2") {
            key = key.with_key_2(key_2);
        }

        if let Err(e) = Verifier::new(key).verify(req.method(), req.uri(), self.clock.now()) {
            log::debug!("mock swift denied temporary url: {e}");
            return status(StatusCode::UNAUTHORIZED);
        }

        let Some((container, object)) = rest.trim_start_matches('/').split_once('/') else {
            return status(StatusCode::UNAUTHORIZED);
        };
        match state.containers.get(container).and_then(|c| c.get(object)) {
            Some(content) if req.method() == Method::HEAD => http::Response::builder()
                .status(StatusCode::OK)
                .header(http::header::CONTENT_LENGTH, content.len())
                .body(Bytes::new())
                .unwrap(),
            Some(content) => http::Response::builder()
                .status(StatusCode::OK)
                .body(content.clone())
                .unwrap(),
            None => status(StatusCode::NOT_FOUND),
        }
    }

    fn account(&self, req: &http::Request<Bytes>) -> http::Response<Bytes> {
        let mut state = self.state.lock().unwrap();
        match *req.method() {
            Method::POST => {
                for (name, value) in req.headers() {
                    let name = name.as_str();
                    if let Some(meta) = name.strip_prefix("x-remove-account-meta-") {
                        state.metadata.remove(&format!("x-account-meta-{meta}"));
                    } else if name.starts_with("x-account-meta-") {
                        let value = value.to_str().unwrap_or_default().to_string();
                        if value.is_empty() {
                            state.metadata.remove(name);
                        } else {
                            state.metadata.insert(name.to_string(), value);
                        }
                    }
                }
                status(StatusCode::NO_CONTENT)
            }
            Method::HEAD | Method::GET => {
                let mut builder = http::Response::builder()
                    .status(StatusCode::NO_CONTENT)
                    .header("x-account-container-count", state.containers.len());
                for (name, value) in &state.metadata {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.body(Bytes::new()).unwrap()
            }
            _ => status(StatusCode::METHOD_NOT_ALLOWED),
        }
    }

    fn container(&self, req: &http::Request<Bytes>, container: &str) -> http::Response<Bytes> {
        let mut state = self.state.lock().unwrap();
        match *req.method() {
            Method::PUT => {
                if state.containers.contains_key(container) {
                    return status(StatusCode::ACCEPTED);
                }
                state
                    .containers
                    .insert(container.to_string(), BTreeMap::new());
                status(StatusCode::CREATED)
            }
            Method::DELETE => match state.containers.get(container) {
                None => status(StatusCode::NOT_FOUND),
                Some(objects) if !objects.is_empty() => status(StatusCode::CONFLICT),
                Some(_) => {
                    state.containers.remove(container);
                    status(StatusCode::NO_CONTENT)
                }
            },
            Method::GET => match state.containers.get(container) {
                None => status(StatusCode::NOT_FOUND),
                Some(objects) => {
                    let listing: Vec<_> = objects
                        .iter()
                        .map(|(name, content)| {
                            serde_json::json!({"name": name, "bytes": content.len()})
                        })
                        .collect();
                    json(serde_json::Value::from(listing).to_string())
                }
            },
            _ => status(StatusCode::METHOD_NOT_ALLOWED),
        }
    }

    fn object_call(
        &self,
        req: &http::Request<Bytes>,
        container: &str,
        object: &str,
    ) -> http::Response<Bytes> {
        let mut state = self.state.lock().unwrap();
        let Some(objects) = state.containers.get_mut(container) else {
            return status(StatusCode::NOT_FOUND);
        };
        match *req.method() {
            Method::PUT => {
                objects.insert(object.to_string(), req.body().clone());
                status(StatusCode::CREATED)
            }
            Method::GET => match objects.get(object) {
                Some(content) => http::Response::builder()
                    .status(StatusCode::OK)
                    .body(content.clone())
                    .unwrap(),
                None => status(StatusCode::NOT_FOUND),
            },
            Method::DELETE => match objects.remove(object) {
                Some(_) => status(StatusCode::NO_CONTENT),
                None => status(StatusCode::NOT_FOUND),
            },
            _ => status(StatusCode::METHOD_NOT_ALLOWED),
        }
    }
}

#[async_trait::async_trait]
impl HttpSend for MockSwift {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        Ok(self.handle(&req))
    }
}

fn status(code: StatusCode) -> http::Response<Bytes> {
    http::Response::builder()
        .status(code)
        .body(Bytes::new())
        .unwrap()
}

fn json(body: String) -> http::Response<Bytes> {
    http::Response::builder()
        .status(StatusCode::OK)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Bytes::from(body))
        .unwrap()
}
