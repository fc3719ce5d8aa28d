// Copyright 2024 Vincent Chan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//	http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::future::Future;
use std::time::Duration;
use tokio::select;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use crate::{Error, Result};

/// Carries the cancellation signal and the optional deadline of a single call.
///
/// Every operation of [`Storage`](crate::Storage) runs under a `CallContext`.
/// The operation resolves to [`Error::Cancelled`] as soon as the token is
/// cancelled, and to [`Error::DeadlineExceeded`] once the deadline passes,
/// whichever comes first. The in-flight driver future is dropped in both cases.
#[derive(Debug, Clone)]
pub struct CallContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {

    /// A context that is never cancelled and has no deadline.
    pub fn background() -> CallContext {
        CallContext {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    pub fn with_token(token: CancellationToken) -> CallContext {
        CallContext {
            token,
            deadline: None,
        }
    }

    pub fn with_timeout(timeout: Duration) -> CallContext {
        CallContext::background().timeout(timeout)
    }

    /// Set the deadline to `timeout` from now. An earlier deadline is kept.
    pub fn timeout(self, timeout: Duration) -> CallContext {
        self.deadline_at(Instant::now() + timeout)
    }

    pub fn deadline_at(mut self, deadline: Instant) -> CallContext {
        self.deadline = match self.deadline {
            Some(prev) if prev < deadline => Some(prev),
            _ => Some(deadline),
        };
        self
    }

    /// A context cancelled together with this one, but which can also be cancelled on its own.
    pub fn child(&self) -> CallContext {
        CallContext {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub(crate) async fn run<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let guarded = async {
            select! {
                biased;

                _ = self.token.cancelled() => Err(Error::Cancelled),
                result = fut => result,
            }
        };

        match self.deadline {
            Some(deadline) => {
                match tokio::time::timeout_at(deadline, guarded).await {
                    Ok(result) => result,
                    Err(_) => Err(Error::DeadlineExceeded),
                }
            }
            None => guarded.await,
        }
    }

}

impl Default for CallContext {

    fn default() -> Self {
        CallContext::background()
    }

}
