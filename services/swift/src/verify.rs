//! Validation side of temporary urls.
//!
//! This mirrors what the storage service checks before it serves a temporary
//! url, so signers can be exercised without a live cluster.

use std::net::IpAddr;

use http::{Method, Uri};
use log::debug;
use swiftsign_core::hash::{base64_decode, hex_decode};
use swiftsign_core::time::{parse_iso8601, DateTime};
use swiftsign_core::{Error, Result};

use crate::constants::*;
use crate::sign_request::{split_object_path, string_to_sign, TempUrlOptions};
use crate::{Digest, TempUrlKey};

/// Verifier checks temporary urls against the account keys.
#[derive(Debug, Clone)]
pub struct Verifier {
    key: TempUrlKey,
    digests: Vec<Digest>,
    client_ip: Option<IpAddr>,
}

impl Verifier {
    /// Create a verifier accepting every digest.
    pub fn new(key: TempUrlKey) -> Self {
        Self {
            key,
            digests: Digest::ALL.to_vec(),
            client_ip: None,
        }
    }

    /// Only accept signatures made with these digests.
    pub fn with_allowed_digests(mut self, digests: impl IntoIterator<Item = Digest>) -> Self {
        self.digests = digests.into_iter().collect();
        self
    }

    /// Address of the client, checked against `temp_url_ip_range`.
    pub fn with_client_ip(mut self, ip: IpAddr) -> Self {
        self.client_ip = Some(ip);
        self
    }

    /// Verify a request against the temporary url carried in its query.
    ///
    /// Expiry is checked before the signature, so an expired url is rejected
    /// with [`swiftsign_core::ErrorKind::CredentialExpired`] even if its
    /// signature is valid. The url stays valid while `now <= expires`.
    /// Every other failure is [`swiftsign_core::ErrorKind::CredentialDenied`].
    pub fn verify(&self, method: &Method, uri: &Uri, now: DateTime) -> Result<()> {
        let info = TempUrlInfo::parse(uri.query().unwrap_or_default())?;

        if now.timestamp() > info.expires {
            return Err(Error::credential_expired("temporary url expired")
                .with_context(format!("expires: {}", info.expires))
                .with_context(format!("now: {}", now.timestamp())));
        }

        let (digest, signature) = self.decode_signature(&info.sig)?;

        if let Some(ip_range) = &info.ip_range {
            let allowed = self
                .client_ip
                .is_some_and(|ip| ip_in_range(ip, ip_range));
            if !allowed {
                return Err(Error::credential_denied("client address not in temp_url_ip_range")
                    .with_context(format!("ip_range: {ip_range}")));
            }
        }

        let path = percent_encoding::percent_decode_str(uri.path())
            .decode_utf8_lossy()
            .to_string();
        let signed_path = match &info.prefix {
            None => path,
            Some(prefix) => {
                let (base, container, object) = split_object_path(&path)
                    .ok_or_else(|| Error::credential_denied("prefix url without object path"))?;
                if !object.starts_with(prefix.as_str()) {
                    return Err(Error::credential_denied("object is not under temp_url_prefix"));
                }
                format!("{base}/{container}/{prefix}")
            }
        };

        let opts = TempUrlOptions {
            digest,
            prefix: info.prefix.is_some(),
            ip_range: info.ip_range.clone(),
        };
        for method in signed_methods(method) {
            let string_to_sign = string_to_sign(method.as_str(), info.expires, &signed_path, &opts);
            for key in self.key.keys() {
                if digest.verify(key.as_bytes(), string_to_sign.as_bytes(), &signature) {
                    debug!("temporary url accepted for {method} {signed_path}");
                    return Ok(());
                }
            }
        }

        Err(Error::credential_denied("temporary url signature mismatch")
            .with_context(format!("path: {signed_path}")))
    }

    fn decode_signature(&self, sig: &str) -> Result<(Digest, Vec<u8>)> {
        let (digest, bytes) = match sig.split_once(':') {
            Some((name, encoded)) => {
                let digest: Digest = name
                    .parse()
                    .map_err(|e| Error::credential_denied("unknown signature digest").with_source(e))?;
                let bytes = base64_decode(encoded)
                    .map_err(|e| Error::credential_denied("malformed signature").with_source(e))?;
                (digest, bytes)
            }
            None => {
                let digest = Digest::from_hex_len(sig.len()).ok_or_else(|| {
                    Error::credential_denied(format!("unexpected signature length {}", sig.len()))
                })?;
                let bytes = hex_decode(sig)
                    .map_err(|e| Error::credential_denied("malformed signature").with_source(e))?;
                (digest, bytes)
            }
        };

        if !self.digests.contains(&digest) {
            return Err(Error::credential_denied(format!(
                "digest {digest} is not allowed"
            )));
        }

        Ok((digest, bytes))
    }
}

/// Verify `path?query` with every digest allowed and no client address.
///
/// Shorthand for [`Verifier::verify`].
pub fn verify(method: &Method, path: &str, query: &str, key: &TempUrlKey, now: DateTime) -> Result<()> {
    let uri: Uri = if query.is_empty() {
        path.parse()?
    } else {
        format!("{path}?{query}").parse()?
    };
    Verifier::new(key.clone()).verify(method, &uri, now)
}

/// HEAD is allowed with any url signed for GET, PUT or POST.
fn signed_methods(method: &Method) -> Vec<Method> {
    if method == Method::HEAD {
        vec![Method::HEAD, Method::GET, Method::PUT, Method::POST]
    } else {
        vec![method.clone()]
    }
}

#[derive(Debug)]
struct TempUrlInfo {
    sig: String,
    expires: i64,
    prefix: Option<String>,
    ip_range: Option<String>,
}

impl TempUrlInfo {
    fn parse(query: &str) -> Result<Self> {
        let mut sig = None;
        let mut expires = None;
        let mut prefix = None;
        let mut ip_range = None;
        for (k, v) in form_urlencoded::parse(query.as_bytes()) {
            match k.as_ref() {
                TEMP_URL_SIG => sig = Some(v.into_owned()),
                TEMP_URL_EXPIRES => expires = Some(v.into_owned()),
                TEMP_URL_PREFIX => prefix = Some(v.into_owned()),
                TEMP_URL_IP_RANGE => ip_range = Some(v.into_owned()),
                _ => {}
            }
        }

        let sig = sig.ok_or_else(|| Error::credential_denied("missing temp_url_sig"))?;
        let expires = expires.ok_or_else(|| Error::credential_denied("missing temp_url_expires"))?;
        let expires = parse_expires(&expires)?;

        Ok(Self {
            sig,
            expires,
            prefix,
            ip_range,
        })
    }
}

fn parse_expires(v: &str) -> Result<i64> {
    if let Ok(ts) = v.parse::<i64>() {
        return Ok(ts);
    }

    parse_iso8601(v)
        .map(|t| t.timestamp())
        .map_err(|e| Error::credential_denied("invalid temp_url_expires").with_source(e))
}

/// Check `ip` against a single address or a CIDR range.
fn ip_in_range(ip: IpAddr, range: &str) -> bool {
    let (addr, prefix_len) = match range.split_once('/') {
        Some((addr, len)) => match len.parse::<u32>() {
            Ok(len) => (addr, Some(len)),
            Err(_) => return false,
        },
        None => (range, None),
    };
    let Ok(network) = addr.parse::<IpAddr>() else {
        return false;
    };

    match (ip, network) {
        (IpAddr::V4(ip), IpAddr::V4(net)) => {
            let len = prefix_len.unwrap_or(32);
            if len > 32 {
                return false;
            }
            let mask = u32::MAX.checked_shl(32 - len).unwrap_or(0);
            u32::from(ip) & mask == u32::from(net) & mask
        }
        (IpAddr::V6(ip), IpAddr::V6(net)) => {
            let len = prefix_len.unwrap_or(128);
            if len > 128 {
                return false;
            }
            let mask = u128::MAX.checked_shl(128 - len).unwrap_or(0);
            u128::from(ip) & mask == u128::from(net) & mask
        }
        _ => false,
    }
}
