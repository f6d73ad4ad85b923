use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, warn};
use swiftsign_core::{Context, Error, ProvideCredential, Result};

use crate::client::check_status;
use crate::constants::*;
use crate::{Config, Credential};

/// TempAuthCredentialProvider authenticates against a v1 auth endpoint.
///
/// It sends `X-Auth-User` and `X-Auth-Key` to `auth_url` and reads
/// `X-Storage-Url`, `X-Auth-Token` and `X-Auth-Token-Expires` from the
/// response. Unset config fields are filled from the environment at load
/// time; when `auth_url`, `user` or `key` is still missing the provider
/// returns `None`.
///
/// - [TempAuth](https://docs.openstack.org/swift/latest/overview_auth.html#tempauth)
#[derive(Debug, Clone)]
pub struct TempAuthCredentialProvider {
    config: Arc<Config>,
}

impl Default for TempAuthCredentialProvider {
    fn default() -> Self {
        Self::new(Arc::new(Config::default()))
    }
}

impl TempAuthCredentialProvider {
    /// Create a new `TempAuthCredentialProvider` instance.
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ProvideCredential for TempAuthCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let config = self.config.as_ref().clone().from_env(ctx);
        let (Some(auth_url), Some(user), Some(key)) = (config.auth_url, config.user, config.key)
        else {
            return Ok(None);
        };

        let req = http::Request::get(&auth_url)
            .header(X_AUTH_USER, user.as_str())
            .header(X_AUTH_KEY, key.as_str())
            .body(Bytes::new())?;
        let resp = check_status(ctx.http_send(req).await?)
            .map_err(|e| e.with_context(format!("auth_url: {auth_url}")))?;

        let header = |name: &str| -> Result<Option<String>> {
            match resp.headers().get(name) {
                Some(v) => Ok(Some(v.to_str()?.to_string())),
                None => Ok(None),
            }
        };
        let storage_url = header(X_STORAGE_URL)?
            .ok_or_else(|| Error::unexpected("auth response has no X-Storage-Url"))?;
        let auth_token = header(X_AUTH_TOKEN)?
            .ok_or_else(|| Error::unexpected("auth response has no X-Auth-Token"))?;

        let mut cred = Credential::new(storage_url, auth_token);
        if let Some(v) = header(X_AUTH_TOKEN_EXPIRES)? {
            match v.parse::<u32>() {
                Ok(secs) => {
                    cred = cred.with_expires_in(
                        ctx.now() + chrono::TimeDelta::seconds(i64::from(secs)),
                    )
                }
                Err(e) => warn!("ignoring invalid {X_AUTH_TOKEN_EXPIRES} {v:?}: {e}"),
            }
        }

        debug!("loaded swift credential for {user} from {auth_url}");
        Ok(Some(cred))
    }
}
