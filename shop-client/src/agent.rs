//! Background reconciliation between the live event path and the server
//!
//! While the live event transport is up, `OrderCache::apply` keeps the
//! cache fresh and the agent does nothing. When connectivity is reported
//! lost, the agent spawns a poll loop that fetches the order listing on a
//! fixed interval and replaces the cached snapshot wholesale whenever it
//! drifts; reporting connectivity restored cancels the loop again. Event
//! application is idempotent and never regresses, so a brief overlap
//! between a final poll and the first live events is harmless.

use crate::cache::OrderCache;
use crate::directory::OrderDirectory;
use crate::error::ClientResult;
use shared::models::OrderFilter;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Orders fetched per reconciliation poll
const POLL_PAGE_LIMIT: usize = 200;

/// Supervises the poll fallback for one dashboard cache
pub struct SyncAgent {
    directory: Arc<dyn OrderDirectory>,
    cache: Arc<OrderCache>,
    filter: OrderFilter,
    poll_interval: Duration,
    connectivity: watch::Sender<bool>,
    shutdown: CancellationToken,
}

impl SyncAgent {
    /// Create an agent over a listing source and a cache
    ///
    /// Connectivity starts out reported as up; the poll fallback only
    /// runs after `set_connected(false)`.
    pub fn new(directory: Arc<dyn OrderDirectory>, cache: Arc<OrderCache>) -> Self {
        let (connectivity, _) = watch::channel(true);
        Self {
            directory,
            cache,
            filter: OrderFilter::default(),
            poll_interval: Duration::from_secs(5),
            connectivity,
            shutdown: CancellationToken::new(),
        }
    }

    /// Restrict reconciliation to orders matching a filter
    pub fn with_filter(mut self, filter: OrderFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Set the poll interval (default 5 seconds)
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// The cache this agent reconciles
    pub fn cache(&self) -> &Arc<OrderCache> {
        &self.cache
    }

    /// Report live transport connectivity
    pub fn set_connected(&self, connected: bool) {
        self.connectivity.send_replace(connected);
    }

    pub fn is_connected(&self) -> bool {
        *self.connectivity.borrow()
    }

    /// Fetch one snapshot and reconcile the cache against it
    ///
    /// Returns whether the cache changed.
    pub async fn reconcile_once(&self) -> ClientResult<bool> {
        poll_once(&*self.directory, &self.cache, &self.filter).await
    }

    /// Start the supervisor task
    ///
    /// The poll loop is spawned when connectivity flips false and
    /// cancelled when it flips back; starting and stopping repeatedly
    /// leaks no timers.
    pub fn start(&self) -> JoinHandle<()> {
        let directory = self.directory.clone();
        let cache = self.cache.clone();
        let filter = self.filter.clone();
        let poll_interval = self.poll_interval;
        let mut connectivity = self.connectivity.subscribe();
        let shutdown = self.shutdown.clone();

        tokio::spawn(async move {
            let mut poll_task: Option<CancellationToken> = None;
            loop {
                let connected = *connectivity.borrow_and_update();
                if !connected && poll_task.is_none() {
                    tracing::debug!(target: "sync", "Connectivity lost, starting poll fallback");
                    let token = shutdown.child_token();
                    tokio::spawn(poll_loop(
                        directory.clone(),
                        cache.clone(),
                        filter.clone(),
                        poll_interval,
                        token.clone(),
                    ));
                    poll_task = Some(token);
                } else if connected && let Some(token) = poll_task.take() {
                    tracing::debug!(target: "sync", "Connectivity restored, stopping poll fallback");
                    token.cancel();
                }

                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    changed = connectivity.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
            }
            if let Some(token) = poll_task.take() {
                token.cancel();
            }
        })
    }

    /// Stop the supervisor and any running poll task
    pub fn stop(&self) {
        self.shutdown.cancel();
    }
}

async fn poll_loop(
    directory: Arc<dyn OrderDirectory>,
    cache: Arc<OrderCache>,
    filter: OrderFilter,
    poll_interval: Duration,
    token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                match poll_once(&*directory, &cache, &filter).await {
                    Ok(true) => {
                        tracing::debug!(target: "sync", "Cache replaced from poll snapshot");
                    }
                    Ok(false) => {}
                    Err(err) => {
                        // Keep the cached snapshot; the next tick retries
                        tracing::warn!(target: "sync", error = %err, "Order poll failed");
                    }
                }
            }
        }
    }
}

async fn poll_once(
    directory: &dyn OrderDirectory,
    cache: &OrderCache,
    filter: &OrderFilter,
) -> ClientResult<bool> {
    let page = directory.list_orders(filter, POLL_PAGE_LIMIT, 0).await?;
    Ok(cache.replace_if_changed(page.items))
}
