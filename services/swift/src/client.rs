use std::collections::HashMap;

use bytes::Bytes;
use http::{Method, StatusCode};
use log::debug;
use percent_encoding::utf8_percent_encode;
use serde::Deserialize;
use swiftsign_core::utils::join_url;
use swiftsign_core::{Context, Error, Result};

use crate::constants::*;
use crate::Credential;

/// SwiftClient performs the account, container and object calls needed
/// around temporary urls.
///
/// Every call except [`SwiftClient::get`] and [`SwiftClient::capabilities`]
/// carries `X-Auth-Token`.
#[derive(Debug, Clone)]
pub struct SwiftClient {
    ctx: Context,
    credential: Credential,
}

#[derive(Debug, Deserialize)]
struct ObjectEntry {
    name: String,
}

impl SwiftClient {
    /// Create a client for the account behind `credential`.
    pub fn new(ctx: Context, credential: Credential) -> Self {
        Self { ctx, credential }
    }

    /// The context requests are sent through.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// The account credential in use.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Set account metadata, names are given without the `X-Account-Meta-` prefix.
    pub async fn update_account_metadata(&self, metadata: &[(&str, &str)]) -> Result<()> {
        let mut req = self.request(Method::POST, "");
        for (name, value) in metadata {
            req = req.header(format!("{X_ACCOUNT_META_PREFIX}{name}"), *value);
        }
        self.send(req.body(Bytes::new())?, "update account metadata")
            .await?;
        Ok(())
    }

    /// Remove account metadata, names are given without the `X-Account-Meta-` prefix.
    pub async fn delete_account_metadata(&self, names: &[&str]) -> Result<()> {
        let mut req = self.request(Method::POST, "");
        for name in names {
            req = req.header(format!("{X_REMOVE_ACCOUNT_META_PREFIX}{name}"), "x");
        }
        self.send(req.body(Bytes::new())?, "delete account metadata")
            .await?;
        Ok(())
    }

    /// List account metadata keyed by lowercase header name, for example
    /// `x-account-meta-temp-url-key`.
    pub async fn list_account_metadata(&self) -> Result<HashMap<String, String>> {
        let req = self.request(Method::HEAD, "").body(Bytes::new())?;
        let resp = self.send(req, "list account metadata").await?;

        let mut metadata = HashMap::new();
        for (name, value) in resp.headers() {
            if !name.as_str().starts_with(X_ACCOUNT_META_PREFIX) {
                continue;
            }
            metadata.insert(name.as_str().to_string(), value.to_str()?.to_string());
        }
        Ok(metadata)
    }

    /// Create a container, succeeding if it already exists.
    pub async fn create_container(&self, container: &str) -> Result<()> {
        let req = self
            .request(Method::PUT, &encode(container))
            .body(Bytes::new())?;
        self.send(req, "create container").await?;
        Ok(())
    }

    /// Delete an empty container.
    pub async fn delete_container(&self, container: &str) -> Result<()> {
        let req = self
            .request(Method::DELETE, &encode(container))
            .body(Bytes::new())?;
        self.send(req, "delete container").await?;
        Ok(())
    }

    /// Upload an object.
    pub async fn create_object(
        &self,
        container: &str,
        object: &str,
        content: impl Into<Bytes>,
    ) -> Result<()> {
        let content = content.into();
        let req = self
            .request(
                Method::PUT,
                &format!("{}/{}", encode(container), encode(object)),
            )
            .header(http::header::CONTENT_LENGTH, content.len())
            .body(content)?;
        self.send(req, "create object").await?;
        Ok(())
    }

    /// Delete an object.
    pub async fn delete_object(&self, container: &str, object: &str) -> Result<()> {
        let req = self
            .request(
                Method::DELETE,
                &format!("{}/{}", encode(container), encode(object)),
            )
            .body(Bytes::new())?;
        self.send(req, "delete object").await?;
        Ok(())
    }

    /// List object names in a container.
    pub async fn list_objects(&self, container: &str) -> Result<Vec<String>> {
        let req = self
            .request(Method::GET, &format!("{}?format=json", encode(container)))
            .body(Bytes::new())?;
        let resp = self.send(req, "list objects").await?;

        // An empty container may answer 204 without a body.
        if resp.body().is_empty() {
            return Ok(Vec::new());
        }
        let entries: Vec<ObjectEntry> = serde_json::from_slice(resp.body())
            .map_err(|e| Error::unexpected("failed to parse object listing").with_source(e))?;
        Ok(entries.into_iter().map(|v| v.name).collect())
    }

    /// GET a url relative to the storage url without authentication.
    ///
    /// This is how temporary urls are consumed.
    pub async fn get(&self, relative_url: &str) -> Result<Bytes> {
        let url = join_url(&self.credential.storage_url, relative_url);
        let req = http::Request::get(url).body(Bytes::new())?;
        let resp = self.send(req, "get").await?;
        Ok(resp.into_body())
    }

    /// Fetch the cluster capabilities from `/info` at the endpoint root.
    pub async fn capabilities(&self) -> Result<serde_json::Value> {
        let uri: http::Uri = self.credential.storage_url.parse()?;
        let (Some(scheme), Some(authority)) = (uri.scheme_str(), uri.authority()) else {
            return Err(Error::config_invalid("storage url must be absolute")
                .with_context(format!("storage_url: {}", self.credential.storage_url)));
        };
        let req = http::Request::get(format!("{scheme}://{authority}/info")).body(Bytes::new())?;
        let resp = self.send(req, "capabilities").await?;

        serde_json::from_slice(resp.body())
            .map_err(|e| Error::unexpected("failed to parse capabilities").with_source(e))
    }

    fn request(&self, method: Method, path: &str) -> http::request::Builder {
        let url = if path.is_empty() {
            self.credential.storage_url.clone()
        } else {
            join_url(&self.credential.storage_url, path)
        };

        http::Request::builder()
            .method(method)
            .uri(url)
            .header(X_AUTH_TOKEN, &self.credential.auth_token)
    }

    async fn send(&self, req: http::Request<Bytes>, op: &str) -> Result<http::Response<Bytes>> {
        let method = req.method().clone();
        let uri = req.uri().to_string();
        debug!("swift {op}: {method} {uri}");

        let resp = self.ctx.http_send(req).await?;
        check_status(resp).map_err(|e| {
            e.with_context(format!("operation: {op}"))
                .with_context(format!("request: {method} {uri}"))
        })
    }
}

fn encode(name: &str) -> String {
    utf8_percent_encode(name, &PATH_ENCODE_SET).to_string()
}

/// Map the response status onto an error kind.
pub(crate) fn check_status(resp: http::Response<Bytes>) -> Result<http::Response<Bytes>> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = String::from_utf8_lossy(resp.body()).to_string();
    let err = match status {
        StatusCode::UNAUTHORIZED => Error::credential_denied("request is unauthorized"),
        StatusCode::FORBIDDEN => Error::permission_denied("request is forbidden"),
        StatusCode::NOT_FOUND => Error::not_found("resource not found"),
        _ => Error::unexpected(format!("unexpected status {status}")),
    };
    Err(err
        .with_context(format!("status: {}", status.as_u16()))
        .with_context(format!("body: {body}")))
}
