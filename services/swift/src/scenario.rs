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

use std::time::Duration;

use log::{debug, info, warn};
use swiftsign_core::{Error, ErrorKind, Result};

use crate::constants::*;
use crate::data::{arbitrary_string, rand_name};
use crate::sign_request::{compute_expiry, compute_signed_url};
use crate::SwiftClient;

/// Knobs of [`ExpiredTempUrlScenario`].
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    /// Value written to `Temp-URL-Key` and used for signing, `Meta` by default.
    pub key: String,
    /// Lifetime of the signed url, 1s by default.
    pub expires_in: Duration,
    /// How long to wait before using the url, 2s by default.
    pub wait: Duration,
    /// Prefix of the random container name.
    pub container_prefix: String,
    /// Prefix of the random object name.
    pub object_prefix: String,
    /// Check that `/info` advertises `tempurl` before doing anything.
    pub require_capability: bool,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            key: "Meta".to_string(),
            expires_in: Duration::from_secs(1),
            wait: Duration::from_secs(2),
            container_prefix: "TempUrlContainer".to_string(),
            object_prefix: "ObjectTemp".to_string(),
            require_capability: true,
        }
    }
}

impl ScenarioConfig {
    /// Set the signing key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Set the url lifetime.
    pub fn with_expires_in(mut self, expires_in: Duration) -> Self {
        self.expires_in = expires_in;
        self
    }

    /// Set the wait before the url is used.
    pub fn with_wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }

    /// Skip or require the `tempurl` capability check.
    pub fn with_require_capability(mut self, require: bool) -> Self {
        self.require_capability = require;
        self
    }
}

/// ExpiredTempUrlScenario checks that the service refuses an expired temporary url.
///
/// - `setup` writes the key to the account, creates a container and an object.
/// - `run` signs a GET url that expires soon, waits past the expiry on the
///   context clock and requires the GET to fail with 401 Unauthorized. Any
///   other status, 403 Forbidden included, fails the run.
/// - `cleanup` removes whatever `setup` created, logging failures.
#[derive(Debug)]
pub struct ExpiredTempUrlScenario {
    client: SwiftClient,
    config: ScenarioConfig,
    container: String,
    container_created: bool,
    metadata_set: bool,
    object: Option<String>,
}

impl ExpiredTempUrlScenario {
    /// Create a scenario with a random container name.
    pub fn new(client: SwiftClient, config: ScenarioConfig) -> Self {
        let container = rand_name(&config.container_prefix);
        Self {
            client,
            config,
            container,
            container_created: false,
            metadata_set: false,
            object: None,
        }
    }

    /// Name of the container used by this scenario.
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Name of the object created by `setup`.
    pub fn object(&self) -> Option<&str> {
        self.object.as_deref()
    }

    /// Prepare the account, container and object.
    pub async fn setup(&mut self) -> Result<()> {
        if self.config.require_capability {
            let caps = self.client.capabilities().await?;
            if caps.get("tempurl").is_none() {
                return Err(Error::config_invalid(
                    "cluster does not advertise the tempurl capability",
                ));
            }
        }

        self.client.create_container(&self.container).await?;
        self.container_created = true;

        self.client
            .update_account_metadata(&[(TEMP_URL_KEY, self.config.key.as_str())])
            .await?;
        self.metadata_set = true;

        let metadata = self.client.list_account_metadata().await?;
        let header = format!("{X_ACCOUNT_META_PREFIX}{}", TEMP_URL_KEY.to_lowercase());
        match metadata.get(&header) {
            Some(v) if *v == self.config.key => {}
            Some(_) => {
                return Err(Error::unexpected("account temp url key does not match")
                    .with_context(format!("header: {header}")))
            }
            None => {
                return Err(Error::unexpected("account temp url key is not set")
                    .with_context(format!("header: {header}")))
            }
        }

        let object = rand_name(&self.config.object_prefix);
        let content = arbitrary_string(object.len(), &object);
        self.client
            .create_object(&self.container, &object, content)
            .await?;
        debug!("created object {}/{object}", self.container);
        self.object = Some(object);

        Ok(())
    }

    /// Sign a url, wait past its expiry and require the service to answer 401.
    pub async fn run(&self) -> Result<()> {
        let object = self
            .object
            .as_deref()
            .ok_or_else(|| Error::unexpected("scenario has no object, run setup first"))?;
        let ctx = self.client.context();

        let expires = i64::try_from(self.config.expires_in.as_secs())
            .map_err(|e| Error::config_invalid("expires_in is too large").with_source(e))
            .and_then(|offset| {
                compute_expiry(ctx.now().timestamp(), offset).map_err(|e| {
                    Error::config_invalid("expires_in is too large").with_source(e)
                })
            })?;
        let base_path = self.client.credential().base_path()?;
        let url = compute_signed_url(
            "GET",
            &self.container,
            object,
            expires,
            &self.config.key,
            &base_path,
        )?;

        debug!("temporary url expires at {expires}, waiting {:?}", self.config.wait);
        ctx.sleep(self.config.wait).await?;

        match self.client.get(&url).await {
            Err(err) if err.kind() == ErrorKind::CredentialDenied => {
                info!("expired temporary url denied as expected");
                Ok(())
            }
            Err(err) => Err(Error::unexpected(
                "expired temporary url failed with an unexpected error",
            )
            .with_source(err)),
            Ok(_) => Err(Error::unexpected("expired temporary url was served")
                .with_context(format!("url: {url}"))
                .with_context(format!("expires: {expires}"))),
        }
    }

    /// Remove the metadata, object and container; failures are only logged.
    pub async fn cleanup(&mut self) {
        if self.metadata_set {
            match self.client.delete_account_metadata(&[TEMP_URL_KEY]).await {
                Ok(()) => self.metadata_set = false,
                Err(e) => warn!("failed to remove {TEMP_URL_KEY} from account: {e}"),
            }
        }

        if let Some(object) = self.object.take() {
            if let Err(e) = self.client.delete_object(&self.container, &object).await {
                warn!("failed to delete object {}/{object}: {e}", self.container);
            }
        }

        if self.container_created {
            match self.client.delete_container(&self.container).await {
                Ok(()) => self.container_created = false,
                Err(e) => warn!("failed to delete container {}: {e}", self.container),
            }
        }
    }

    /// Setup, run and cleanup in order, returning the first error.
    pub async fn execute(mut self) -> Result<()> {
        let result = match self.setup().await {
            Ok(()) => self.run().await,
            Err(e) => Err(e),
        };
        self.cleanup().await;
        result
    }
}
