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

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use swiftsign_core::{Context, ProvideCredential, Result};

use crate::constants::*;
use crate::{Credential, DefaultCredentialProvider, SwiftClient, TempUrlKey};

/// AccountMetadataKeyProvider reads the temp url key from the account itself.
///
/// It loads an account credential first, then issues a `HEAD` on the storage
/// url and picks up `X-Account-Meta-Temp-URL-Key` and
/// `X-Account-Meta-Temp-URL-Key-2`. Returns `None` when no credential is
/// available or the account has no key set.
#[derive(Debug, Clone)]
pub struct AccountMetadataKeyProvider {
    credential: Arc<dyn ProvideCredential<Credential = Credential>>,
}

impl Default for AccountMetadataKeyProvider {
    fn default() -> Self {
        Self::new(DefaultCredentialProvider::new())
    }
}

impl AccountMetadataKeyProvider {
    /// Create a new provider that authenticates with `credential`.
    pub fn new(credential: impl ProvideCredential<Credential = Credential>) -> Self {
        Self {
            credential: Arc::new(credential),
        }
    }
}

#[async_trait]
impl ProvideCredential for AccountMetadataKeyProvider {
    type Credential = TempUrlKey;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let Some(cred) = self.credential.provide_credential(ctx).await? else {
            debug!("no account credential, skip loading temp url key from metadata");
            return Ok(None);
        };

        let metadata = SwiftClient::new(ctx.clone(), cred)
            .list_account_metadata()
            .await?;
        let header = |name: &str| {
            metadata
                .get(&format!("{X_ACCOUNT_META_PREFIX}{}", name.to_lowercase()))
                .filter(|v| !v.is_empty())
                .cloned()
        };

        Ok(header(TEMP_URL_KEY).map(|key| TempUrlKey {
            key,
            key_2: header(TEMP_URL_KEY_2),
        }))
    }
}
