//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Cancellation and write-permit scope shared by a session and its reads

use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::trace;

// Roughly 30 years; stands in for "never" when a timeout overflows.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// `start + timeout`, saturating to a far-future instant instead of
/// overflowing.
pub(crate) fn deadline_after(start: Instant, timeout: Duration) -> Instant {
    start
        .checked_add(timeout)
        .or_else(|| start.checked_add(FAR_FUTURE))
        .unwrap_or(start)
}

/// Cancellation signal plus a single write permit
///
/// Cloning shares the same signal and permit. A session owns one scope and
/// lends it to every read it performs.
#[derive(Clone, Debug)]
pub struct SessionScope {
    cancel: CancellationToken,
    permit: Arc<Semaphore>,
}

impl SessionScope {
    /// A scope whose signal is a child of `parent`
    ///
    /// Cancelling `parent` cancels the scope; cancelling the scope leaves
    /// `parent` alone.
    pub fn new(parent: &CancellationToken) -> Self {
        Self {
            cancel: parent.child_token(),
            permit: Arc::new(Semaphore::new(1)),
        }
    }

    /// A scope with no parent
    pub fn detached() -> Self {
        Self::new(&CancellationToken::new())
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// The scope's signal, for callers that want to select on it
    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Wait for the write permit
    ///
    /// Returns `None` if the scope is cancelled before or while waiting, or
    /// once the scope has been released. Dropping the permit hands it to the
    /// next writer.
    pub async fn acquire_write(&self) -> Option<OwnedSemaphorePermit> {
        let permit = select! {
            biased;
            _ = self.cancel.cancelled() => return None,
            permit = self.permit.clone().acquire_owned() => permit.ok()?,
        };
        if self.cancel.is_cancelled() {
            return None;
        }
        Some(permit)
    }

    /// Sleep for `quantum` unless cancelled first
    ///
    /// Returns `false` when the sleep was cut short by cancellation.
    pub async fn pause(&self, quantum: Duration) -> bool {
        select! {
            biased;
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(quantum) => true,
        }
    }

    /// Cancel the scope and close the write permit
    ///
    /// Safe to call more than once.
    pub fn release(&self) {
        if !self.cancel.is_cancelled() {
            self.cancel.cancel();
        }
        if !self.permit.is_closed() {
            trace!("Closing write permit");
            self.permit.close();
        }
    }
}
