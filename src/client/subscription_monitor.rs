use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, oneshot, watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::api::{ClientError, ProposalApiClient};
use super::session::SessionEvent;
use crate::domain::subscription::{Plan, SubscriptionStatusResponse};

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Where the monitor reads the subscription from
#[async_trait]
pub trait SubscriptionSource: Send + Sync + 'static {
    async fn fetch_subscription(
        &self,
        access_token: &str,
    ) -> Result<SubscriptionStatusResponse, ClientError>;
}

#[async_trait]
impl SubscriptionSource for ProposalApiClient {
    async fn fetch_subscription(
        &self,
        access_token: &str,
    ) -> Result<SubscriptionStatusResponse, ClientError> {
        ProposalApiClient::fetch_subscription(self, access_token).await
    }
}

/// Last known subscription state as seen by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionSnapshot {
    pub plan: Plan,
    pub subscribed: bool,
    pub loading: bool,
    pub signed_in: bool,
}

impl SubscriptionSnapshot {
    fn signed_out() -> Self {
        Self {
            plan: Plan::Free,
            subscribed: false,
            loading: false,
            signed_in: false,
        }
    }
}

/// Keeps the current user's subscription up to date in the background.
///
/// One task polls on a fixed interval and whenever the session changes.
/// Readers get the latest state through a `watch` channel. Dropping the
/// monitor aborts the task; `shutdown` waits for it to finish.
pub struct SubscriptionMonitor {
    state: watch::Receiver<SubscriptionSnapshot>,
    refresh: Arc<Notify>,
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl SubscriptionMonitor {
    /// Start polling. Must be called from within a tokio runtime.
    pub fn spawn(
        source: Arc<dyn SubscriptionSource>,
        session_events: broadcast::Receiver<SessionEvent>,
        initial_token: Option<String>,
        interval: Duration,
    ) -> Self {
        let initial = SubscriptionSnapshot {
            loading: initial_token.is_some(),
            signed_in: initial_token.is_some(),
            ..SubscriptionSnapshot::signed_out()
        };
        let (state_tx, state) = watch::channel(initial);
        let refresh = Arc::new(Notify::new());
        let (stop, stop_rx) = oneshot::channel();

        let worker = Worker {
            source,
            events: Some(session_events),
            token: initial_token,
            state: state_tx,
            refresh: refresh.clone(),
        };
        let task = tokio::spawn(worker.run(interval, stop_rx));

        Self {
            state,
            refresh,
            stop: Some(stop),
            task: Some(task),
        }
    }

    pub fn snapshot(&self) -> SubscriptionSnapshot {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SubscriptionSnapshot> {
        self.state.clone()
    }

    /// Re-check now instead of waiting for the next tick
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }

    /// Stop the polling task and wait until it has exited
    pub async fn shutdown(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Subscription monitor task ended abnormally");
            }
        }
    }
}

impl Drop for SubscriptionMonitor {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

struct Worker {
    source: Arc<dyn SubscriptionSource>,
    events: Option<broadcast::Receiver<SessionEvent>>,
    token: Option<String>,
    state: watch::Sender<SubscriptionSnapshot>,
    refresh: Arc<Notify>,
}

impl Worker {
    async fn run(mut self, interval: Duration, mut stop: oneshot::Receiver<()>) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut stop => break,
                _ = ticker.tick() => {}
                _ = self.refresh.notified() => {}
                event = next_event(&mut self.events) => {
                    if !self.apply(event) {
                        continue;
                    }
                }
            }

            self.check().await;
        }

        tracing::debug!("Subscription monitor stopped");
    }

    /// Returns whether the subscription should be re-checked
    fn apply(&mut self, event: Result<SessionEvent, broadcast::error::RecvError>) -> bool {
        match event {
            Ok(SessionEvent::SignedIn { access_token })
            | Ok(SessionEvent::TokenRefreshed { access_token }) => {
                self.token = Some(access_token);
                true
            }
            Ok(SessionEvent::SignedOut) => {
                self.token = None;
                self.state.send_replace(SubscriptionSnapshot::signed_out());
                false
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Subscription monitor missed session events");
                true
            }
            Err(broadcast::error::RecvError::Closed) => {
                tracing::debug!("Session event stream closed");
                self.events = None;
                false
            }
        }
    }

    async fn check(&self) {
        let Some(token) = self.token.as_deref() else {
            self.state.send_replace(SubscriptionSnapshot::signed_out());
            return;
        };

        self.state.send_modify(|s| {
            s.loading = true;
            s.signed_in = true;
        });

        match self.source.fetch_subscription(token).await {
            Ok(status) => {
                self.state.send_replace(SubscriptionSnapshot {
                    plan: status.plan,
                    subscribed: status.subscribed,
                    loading: false,
                    signed_in: true,
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to check subscription, keeping last state");
                self.state.send_modify(|s| s.loading = false);
            }
        }
    }
}

async fn next_event(
    events: &mut Option<broadcast::Receiver<SessionEvent>>,
) -> Result<SessionEvent, broadcast::error::RecvError> {
    match events {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
