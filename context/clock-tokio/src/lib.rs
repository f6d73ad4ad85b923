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

//! Tokio-based clock implementation for swiftsign.
//!
//! This crate provides `TokioClock`, a wall clock that implements the `Clock`
//! trait from `swiftsign_core` and waits with `tokio::time::sleep`.
//!
//! ## Example
//!
//! ```no_run
//! use std::time::Duration;
//! use swiftsign_core::Context;
//! use swiftsign_clock_tokio::TokioClock;
//!
//! #[tokio::main]
//! async fn main() {
//!     let ctx = Context::new().with_clock(TokioClock);
//!
//!     let before = ctx.now();
//!     ctx.sleep(Duration::from_secs(2)).await.unwrap();
//!     assert!(ctx.now() > before);
//! }
//! ```

use async_trait::async_trait;
use std::time::Duration;
use swiftsign_core::time::{now, DateTime};
use swiftsign_core::{Clock, Result};

/// Tokio-based implementation of the `Clock` trait.
///
/// Time is read from the system clock while waits go through the tokio timer,
/// so a paused tokio runtime does not move `now`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> DateTime {
        now()
    }

    async fn sleep(&self, dur: Duration) -> Result<()> {
        tokio::time::sleep(dur).await;
        Ok(())
    }
}
