// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Swift temporary url signer.
use std::fmt::Write;
use std::time::Duration;

use log::debug;
use percent_encoding::utf8_percent_encode;
use swiftsign_core::time::{format_iso8601, from_timestamp, DateTime};
use swiftsign_core::{Context, Error, Result, SignRequest, SigningRequest};

use crate::constants::*;
use crate::{Digest, TempUrlKey};

/// Options that change what a temporary url signs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TempUrlOptions {
    /// Digest used for the HMAC.
    pub digest: Digest,
    /// Sign `prefix:{path}` so that every object under the prefix is covered.
    pub prefix: bool,
    /// Restrict the url to clients in this address or CIDR range.
    pub ip_range: Option<String>,
}

/// Compute the expiry timestamp `now + offset_seconds`.
///
/// Returns [`ErrorKind::RequestInvalid`](swiftsign_core::ErrorKind::RequestInvalid)
/// when the sum does not fit in an `i64`.
///
/// ```
/// assert_eq!(swiftsign_swift::compute_expiry(1700000000, 1).unwrap(), 1700000001);
/// ```
pub fn compute_expiry(now: i64, offset_seconds: i64) -> Result<i64> {
    now.checked_add(offset_seconds).ok_or_else(|| {
        Error::request_invalid("temporary url expiry overflows")
            .with_context(format!("now: {now}"))
            .with_context(format!("offset: {offset_seconds}"))
    })
}

/// Construct string to sign
///
/// ## Format
///
/// ```text
/// ["ip=" + IpRange + "\n"] +
/// Method + "\n" +
/// Expires + "\n" +
/// ["prefix:"] + Path
/// ```
pub fn string_to_sign(method: &str, expires: i64, path: &str, opts: &TempUrlOptions) -> String {
    let mut s = String::with_capacity(method.len() + path.len() + 32);
    if let Some(ip_range) = &opts.ip_range {
        let _ = writeln!(&mut s, "ip={ip_range}");
    }
    let _ = writeln!(&mut s, "{method}");
    let _ = writeln!(&mut s, "{expires}");
    if opts.prefix {
        s.push_str("prefix:");
    }
    s.push_str(path);

    s
}

/// Compute the temporary url of an object.
///
/// The signature is the lowercase hex HMAC-SHA256 of
/// `{method}\n{expires}\n{base_path}/{container}/{object_name}` keyed by `key`.
/// The returned url is relative to the storage url:
///
/// ```text
/// {container}/{object_name}?temp_url_sig={signature}&temp_url_expires={expires}
/// ```
///
/// Container and object names are percent encoded in the url but signed as
/// given.
///
/// ```
/// let url = swiftsign_swift::compute_signed_url(
///     "GET", "cont", "obj", 1700000000, "Meta", "/v1/AUTH_test",
/// )
/// .unwrap();
/// assert_eq!(
///     url,
///     "cont/obj?temp_url_sig=a46a696c60367c6645ffdd0c18aa6562982842399efe8e919a71d91dcbdf068d&temp_url_expires=1700000000"
/// );
/// ```
pub fn compute_signed_url(
    method: &str,
    container: &str,
    object_name: &str,
    expires: i64,
    key: &str,
    base_path: &str,
) -> Result<String> {
    for (name, value) in [
        ("method", method),
        ("container", container),
        ("object_name", object_name),
        ("key", key),
    ] {
        if value.is_empty() {
            return Err(Error::request_invalid(format!(
                "{name} must not be empty for temporary url"
            )));
        }
    }
    if expires < 0 {
        return Err(Error::request_invalid(format!(
            "expires must not be negative, got {expires}"
        )));
    }

    let path = format!(
        "{}/{container}/{object_name}",
        base_path.trim_end_matches('/')
    );
    let string_to_sign = string_to_sign(method, expires, &path, &TempUrlOptions::default());
    debug!("string to sign: {string_to_sign:?}");
    let signature = Digest::Sha256.signature(key.as_bytes(), string_to_sign.as_bytes());

    Ok(format!(
        "{}/{}?{TEMP_URL_SIG}={signature}&{TEMP_URL_EXPIRES}={expires}",
        utf8_percent_encode(container, &PATH_ENCODE_SET),
        utf8_percent_encode(object_name, &PATH_ENCODE_SET),
    ))
}

/// Split a decoded object path into `(base_path, container, object)`.
///
/// The base path ends at the account segment that follows the API version,
/// so mount points in front of `/v1` are kept:
///
/// ```text
/// /object/v1/AUTH_test/cont/dir/obj => ("/object/v1/AUTH_test", "cont", "dir/obj")
/// ```
pub fn split_object_path(path: &str) -> Option<(&str, &str, &str)> {
    let segments: Vec<(usize, &str)> = path
        .match_indices('/')
        .map(|(idx, _)| (idx, &path[idx + 1..]))
        .collect();

    let version = segments.iter().position(|(_, rest)| {
        let seg = rest.split('/').next().unwrap_or_default();
        seg.len() > 1
            && seg.starts_with('v')
            && seg[1..].chars().all(|c| c.is_ascii_digit() || c == '.')
    })?;

    // version, account, container, then the object.
    let (container_idx, _) = *segments.get(version + 2)?;
    let (object_idx, _) = *segments.get(version + 3)?;

    let base = &path[..container_idx];
    let container = &path[container_idx + 1..object_idx];
    let object = &path[object_idx + 1..];
    if container.is_empty() || object.is_empty() {
        return None;
    }

    Some((base, container, object))
}

/// RequestSigner that presigns requests as Swift temporary urls.
///
/// - [Temporary URL middleware](https://docs.openstack.org/swift/latest/api/temporary_url_middleware.html)
#[derive(Debug, Default)]
pub struct RequestSigner {
    digest: Digest,
    prefix: Option<String>,
    ip_range: Option<String>,
    inline: bool,
    filename: Option<String>,
    iso8601: bool,
    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a signer using HMAC-SHA256.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use another digest.
    pub fn with_digest(mut self, digest: Digest) -> Self {
        self.digest = digest;
        self
    }

    /// Sign every object whose name starts with `prefix` instead of one object.
    ///
    /// The request path must point at an object under the prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Only accept requests from this address or CIDR range.
    pub fn with_ip_range(mut self, ip_range: impl Into<String>) -> Self {
        self.ip_range = Some(ip_range.into());
        self
    }

    /// Ask the service to serve the object with `Content-Disposition: inline`.
    pub fn with_inline(mut self) -> Self {
        self.inline = true;
        self
    }

    /// Ask the service to use this file name in `Content-Disposition`.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Write `temp_url_expires` as ISO 8601 instead of epoch seconds.
    ///
    /// The signature still covers the epoch seconds.
    pub fn with_iso8601(mut self) -> Self {
        self.iso8601 = true;
        self
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// The context clock is used by default.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    fn options(&self) -> TempUrlOptions {
        TempUrlOptions {
            digest: self.digest,
            prefix: self.prefix.is_some(),
            ip_range: self.ip_range.clone(),
        }
    }
}

#[async_trait::async_trait]
impl SignRequest for RequestSigner {
    type Credential = TempUrlKey;

    async fn sign_request(
        &self,
        ctx: &Context,
        parts: &mut http::request::Parts,
        credential: Option<&Self::Credential>,
        expires_in: Option<Duration>,
    ) -> Result<()> {
        let key = credential.ok_or_else(|| Error::credential_invalid("missing temp url key"))?;
        if key.key.is_empty() {
            return Err(Error::credential_invalid("temp url key is empty"));
        }
        let expires_in = expires_in
            .ok_or_else(|| Error::request_invalid("temporary url requires expires_in"))?;
        let offset = i64::try_from(expires_in.as_secs())
            .map_err(|e| Error::request_invalid("expires_in is too large").with_source(e))?;

        let now = self.time.unwrap_or_else(|| ctx.now());
        let expires = compute_expiry(now.timestamp(), offset)?;

        let mut req = SigningRequest::build(parts)?;
        let path = req.path_percent_decoded().to_string();
        let signed_path = match &self.prefix {
            None => path,
            Some(prefix) => {
                let (base, container, object) = split_object_path(&path).ok_or_else(|| {
                    Error::request_invalid("prefix temporary url requires an object path")
                        .with_context(format!("path: {path}"))
                })?;
                if !object.starts_with(prefix.as_str()) {
                    return Err(Error::request_invalid(format!(
                        "object {object} is not under prefix {prefix}"
                    )));
                }
                format!("{base}/{container}/{prefix}")
            }
        };

        let string_to_sign =
            string_to_sign(req.method.as_str(), expires, &signed_path, &self.options());
        debug!("string to sign: {string_to_sign:?}");
        let signature = self
            .digest
            .signature(key.key.as_bytes(), string_to_sign.as_bytes());

        for name in [
            TEMP_URL_SIG,
            TEMP_URL_EXPIRES,
            TEMP_URL_PREFIX,
            TEMP_URL_IP_RANGE,
        ] {
            req.query_remove(name);
        }
        req.query_push(
            TEMP_URL_SIG,
            utf8_percent_encode(&signature, &QUERY_ENCODE_SET).to_string(),
        );
        req.query_push(
            TEMP_URL_EXPIRES,
            if self.iso8601 {
                format_iso8601(from_timestamp(expires)?)
            } else {
                expires.to_string()
            },
        );
        if let Some(prefix) = &self.prefix {
            req.query_push(
                TEMP_URL_PREFIX,
                utf8_percent_encode(prefix, &QUERY_ENCODE_SET).to_string(),
            );
        }
        if let Some(ip_range) = &self.ip_range {
            req.query_push(
                TEMP_URL_IP_RANGE,
                utf8_percent_encode(ip_range, &QUERY_ENCODE_SET).to_string(),
            );
        }
        if self.inline {
            req.query_push(INLINE, "");
        }
        if let Some(filename) = &self.filename {
            req.query_push(
                FILENAME,
                utf8_percent_encode(filename, &QUERY_ENCODE_SET).to_string(),
            );
        }

        req.apply(parts)
    }
}
