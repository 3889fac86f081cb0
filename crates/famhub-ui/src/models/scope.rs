//! Lifetime guard for page loads.
//!
//! A page owns one `ViewScope`. Every fetch races the scope's token, and a
//! result that arrives after the page went away is dropped instead of being
//! written into stale state.

use std::future::Future;

use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub struct ViewScope {
    token: CancellationToken,
}

impl ViewScope {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Scope cancelled together with `parent` (application shutdown).
    pub fn child_of(parent: &CancellationToken) -> Self {
        Self {
            token: parent.child_token(),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Drive `fut` unless the scope is cancelled first.
    ///
    /// Returns `None` when the scope was cancelled before or while waiting.
    pub async fn run<F>(&self, fut: F) -> Option<F::Output>
    where
        F: Future,
    {
        if self.token.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;
            _ = self.token.cancelled() => {
                tracing::debug!("View scope cancelled, discarding result");
                None
            }
            out = fut => Some(out),
        }
    }
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn run_returns_output_while_active() {
        let scope = ViewScope::new();
        assert_eq!(scope.run(async { 7 }).await, Some(7));
    }

    #[tokio::test]
    async fn cancelled_scope_skips_future() {
        let scope = ViewScope::new();
        scope.cancel();
        assert_eq!(scope.run(async { 7 }).await, None);
    }

    #[tokio::test]
    async fn cancel_during_wait_discards_result() {
        let scope = ViewScope::new();
        let token = scope.token();
        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            token.cancel();
        });
        let out = scope
            .run(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                1
            })
            .await;
        assert_eq!(out, None);
        canceller.await.ok();
    }

    #[test]
    fn drop_cancels_token() {
        let scope = ViewScope::new();
        let token = scope.token();
        drop(scope);
        assert!(token.is_cancelled());
    }

    #[test]
    fn child_follows_parent() {
        let root = CancellationToken::new();
        let scope = ViewScope::child_of(&root);
        root.cancel();
        assert!(scope.is_cancelled());
    }
}
