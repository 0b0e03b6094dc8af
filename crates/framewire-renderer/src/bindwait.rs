use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use tokio::sync::watch;

/// Tracks "tell me when object X becomes callable" waiters.
///
/// Each name gets at most one watch channel, created lazily by whichever
/// of [`wait_for_bind`](Self::wait_for_bind) and
/// [`signal_bound`](Self::signal_bound) runs first, so a bind racing ahead
/// of its waiter is never lost. The value is only ever set to `true`;
/// signaling again is a no-op as far as waiters can observe.
#[derive(Default)]
pub struct BindWaitTable {
    waiters: Mutex<HashMap<String, watch::Sender<bool>>>,
}

impl BindWaitTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Future resolving to `true` once `name` has been materialized at
    /// least once. Concurrent callers for the same name share one waiter;
    /// awaiting before or after the signal yields the same result.
    pub fn wait_for_bind(&self, name: &str) -> impl Future<Output = bool> + Send + 'static {
        let mut rx = {
            let mut waiters = self.waiters.lock().unwrap();
            waiters
                .entry(name.to_string())
                .or_insert_with(|| watch::channel(false).0)
                .subscribe()
        };
        async move { rx.wait_for(|bound| *bound).await.is_ok() }
    }

    /// Marks `name` as bound, waking every current and future waiter.
    pub fn signal_bound(&self, name: &str) {
        let mut waiters = self.waiters.lock().unwrap();
        waiters
            .entry(name.to_string())
            .or_insert_with(|| watch::channel(false).0)
            .send_replace(true);
    }
}
