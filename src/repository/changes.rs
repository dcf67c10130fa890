//! Change watcher
//!
//! The remote store's change stream, reduced to a payload-less callback:
//! a background task polls the collection watermark and fires `on_change`
//! whenever it moves. Consumers treat the callback as "something changed,
//! re-fetch", never as a delta.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::traits::{ChangeToken, RemoteStore};

/// Handle for a live change watch
///
/// `unsubscribe` tears the watch down; dropping the handle does the same.
/// An inert handle (watching disabled or never established) is safe to
/// hold and release like any other.
pub struct Subscription {
    handle: Option<JoinHandle<()>>,
}

impl Subscription {
    pub(crate) fn noop() -> Subscription {
        Subscription { handle: None }
    }

    /// True when a live watch task is attached
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Tear the watch down
    pub fn unsubscribe(mut self) {
        self.abort();
    }

    fn abort(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.abort();
    }
}

/// Spawn the watch loop onto the current runtime
///
/// A zero interval disables watching and yields an inert handle. The first
/// poll only records the baseline watermark; callbacks start with the first
/// observed difference. Poll failures are logged and skipped, so an outage
/// never fires a change and never kills the watch.
pub(crate) fn watch(
    remote: Arc<dyn RemoteStore>,
    interval: Duration,
    on_change: impl Fn() + Send + Sync + 'static,
) -> Subscription {
    if interval.is_zero() {
        debug!("change watching disabled");
        return Subscription::noop();
    }

    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last: Option<ChangeToken> = None;

        loop {
            ticker.tick().await;
            match remote.change_token().await {
                Ok(token) => {
                    if let Some(prev) = &last {
                        if *prev != token {
                            debug!(count = token.count, "collection changed, notifying");
                            on_change();
                        }
                    }
                    last = Some(token);
                }
                Err(e) => debug!(error = %e, "watch poll failed"),
            }
        }
    });

    Subscription {
        handle: Some(handle),
    }
}
