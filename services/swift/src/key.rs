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

use std::fmt::{Debug, Formatter};

use swiftsign_core::utils::Redact;
use swiftsign_core::SigningCredential;

/// Secret shared between the client and the account's `Temp-URL-Key` metadata.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TempUrlKey {
    /// Value of `Temp-URL-Key`, used for signing.
    pub key: String,
    /// Value of `Temp-URL-Key-2`, accepted during key rotation.
    pub key_2: Option<String>,
}

impl TempUrlKey {
    /// Create a new key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            key_2: None,
        }
    }

    /// Set the secondary key.
    pub fn with_key_2(mut self, key_2: impl Into<String>) -> Self {
        self.key_2 = Some(key_2.into());
        self
    }

    /// All non-empty keys, primary first.
    pub fn keys(&self) -> Vec<&str> {
        std::iter::once(self.key.as_str())
            .chain(self.key_2.as_deref())
            .filter(|k| !k.is_empty())
            .collect()
    }
}

impl Debug for TempUrlKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TempUrlKey")
            .field("key", &Redact::from(&self.key))
            .field("key_2", &Redact::from(&self.key_2))
            .finish()
    }
}

impl SigningCredential for TempUrlKey {
    fn is_valid(&self) -> bool {
        !self.key.is_empty()
    }
}
