//! OrderStatusPoller - watches an order until the backend marks it paid.
//!
//! After an STK push is accepted the buyer approves the payment on their
//! phone, and the backend learns about it through the M-Pesa callback. The
//! client only observes the result by re-fetching the order.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `poll_interval` | 5s | Delay before the first fetch and between fetches |
//! | `timeout` | 120s | Give up (ambiguously) once this much time has passed |
//!
//! ## Termination
//!
//! A poll ends on the first of: order seen as PAID, timeout, a failed fetch,
//! or cancellation. Nothing is retried. Dropping the [`PollHandle`] cancels
//! the poll, so no timer outlives its owner.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::domain::foundation::OrderId;
use crate::domain::order::Order;
use crate::ports::{ApiGateway, HttpMethod, Notice, Notifier};

use super::order_service::order_path;
use super::wire::decode;
use super::{ClientError, OrderBook, RefreshSignal, SessionStore};

/// Configuration for the poller.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(5_000),
            timeout: Duration::from_millis(120_000),
        }
    }
}

impl PollerConfig {
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// How a poll ended.
#[derive(Debug)]
pub enum PollOutcome {
    /// The backend reports the order as paid.
    Paid(Order),
    /// No confirmation within the timeout. The payment may still succeed.
    TimedOut,
    /// A fetch failed; polling stopped at once.
    Failed(ClientError),
    /// Stopped by its owner.
    Cancelled,
}

impl PollOutcome {
    pub fn is_paid(&self) -> bool {
        matches!(self, PollOutcome::Paid(_))
    }
}

/// Handle to a running poll.
pub struct PollHandle {
    order_id: OrderId,
    cancel: watch::Sender<bool>,
    task: JoinHandle<PollOutcome>,
}

impl PollHandle {
    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    /// Request cancellation. The task stops before its next fetch, or
    /// abandons a fetch already in flight.
    pub fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the poll to end.
    pub async fn outcome(self) -> PollOutcome {
        let PollHandle {
            order_id,
            cancel,
            task,
        } = self;
        let result = task.await;
        drop(cancel);
        result.unwrap_or_else(|e| {
            tracing::error!(%order_id, error = %e, "Poll task aborted");
            PollOutcome::Cancelled
        })
    }
}

/// Spawns poll tasks. Cheap to clone.
#[derive(Clone)]
pub struct OrderStatusPoller {
    session: Arc<SessionStore>,
    gateway: Arc<dyn ApiGateway>,
    notifier: Arc<dyn Notifier>,
    refresh: RefreshSignal,
    book: Arc<OrderBook>,
    config: PollerConfig,
}

impl OrderStatusPoller {
    pub fn new(
        session: Arc<SessionStore>,
        gateway: Arc<dyn ApiGateway>,
        notifier: Arc<dyn Notifier>,
        refresh: RefreshSignal,
        book: Arc<OrderBook>,
        config: PollerConfig,
    ) -> Self {
        Self {
            session,
            gateway,
            notifier,
            refresh,
            book,
            config,
        }
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Start watching `order_id` on the current runtime.
    pub fn start_polling(&self, order_id: OrderId) -> PollHandle {
        let (cancel, cancelled) = watch::channel(false);
        let poller = self.clone();
        let task = tokio::spawn(async move { poller.run(order_id, cancelled).await });
        tracing::debug!(%order_id, interval_ms = self.config.poll_interval.as_millis() as u64, "Polling started");
        PollHandle {
            order_id,
            cancel,
            task,
        }
    }

    async fn run(self, order_id: OrderId, mut cancelled: watch::Receiver<bool>) -> PollOutcome {
        let started = Instant::now();
        let period = self.config.poll_interval;
        let mut ticker = time::interval_at(started + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let deadline = time::sleep_until(started + self.config.timeout);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                biased;
                _ = wait_cancelled(&mut cancelled) => return self.cancelled(order_id),
                _ = &mut deadline => return self.timed_out(order_id),
                _ = ticker.tick() => {}
            }

            let fetched = tokio::select! {
                biased;
                _ = wait_cancelled(&mut cancelled) => return self.cancelled(order_id),
                _ = &mut deadline => return self.timed_out(order_id),
                fetched = self.fetch(order_id) => fetched,
            };

            match fetched {
                Ok(order) if order.status.is_paid() => return self.paid(order),
                Ok(order) => {
                    tracing::debug!(%order_id, status = %order.status, "Order not paid yet");
                }
                Err(e) => {
                    tracing::error!(%order_id, error = %e, "Payment status check failed");
                    self.notifier.notify(Notice::error(format!(
                        "Could not check the payment status: {}",
                        e.user_message()
                    )));
                    return PollOutcome::Failed(e);
                }
            }
        }
    }

    async fn fetch(&self, order_id: OrderId) -> Result<Order, ClientError> {
        let token = self.session.require_token()?;
        let path = order_path(order_id);
        let response = self
            .gateway
            .request(HttpMethod::Get, &path, None, Some(&token))
            .await?;
        decode(&path, response)
    }

    fn paid(&self, order: Order) -> PollOutcome {
        tracing::info!(order_id = %order.id, "Payment confirmed");
        self.refresh.trigger();
        self.book.upsert(order.clone());
        self.notifier.notify(Notice::success(format!(
            "Payment confirmed for order #{}.",
            order.id
        )));
        PollOutcome::Paid(order)
    }

    fn timed_out(&self, order_id: OrderId) -> PollOutcome {
        tracing::info!(%order_id, "Payment not confirmed before timeout");
        self.notifier.notify(Notice::pending(
            "We couldn't confirm your payment in time. It may still go through, so check your orders again shortly.",
        ));
        PollOutcome::TimedOut
    }

    fn cancelled(&self, order_id: OrderId) -> PollOutcome {
        tracing::debug!(%order_id, "Polling cancelled");
        PollOutcome::Cancelled
    }
}

/// Resolves once cancellation was requested or the handle is gone.
async fn wait_cancelled(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            return;
        }
    }
}

/// Owns at most one active poll.
///
/// Starting a watch for another order cancels the current one. Dropping the
/// watcher cancels whatever is running.
pub struct PaymentWatcher {
    poller: OrderStatusPoller,
    active: Mutex<Option<PollHandle>>,
}

impl PaymentWatcher {
    pub fn new(poller: OrderStatusPoller) -> Self {
        Self {
            poller,
            active: Mutex::new(None),
        }
    }

    /// Watch `order_id`, replacing any other poll.
    ///
    /// Returns false when that order is already being watched.
    pub fn watch(&self, order_id: OrderId) -> bool {
        let mut active = self.slot();
        if let Some(current) = active.as_ref() {
            if current.order_id() == order_id && !current.is_finished() {
                return false;
            }
            current.cancel();
        }
        *active = Some(self.poller.start_polling(order_id));
        true
    }

    /// Cancel the active poll, if any.
    pub fn stop(&self) {
        if let Some(handle) = self.slot().take() {
            handle.cancel();
        }
    }

    /// Order of the poll still running.
    pub fn active_order(&self) -> Option<OrderId> {
        self.slot()
            .as_ref()
            .filter(|h| !h.is_finished())
            .map(PollHandle::order_id)
    }

    /// Hand the active poll to the caller, e.g. to await its outcome.
    pub fn take(&self) -> Option<PollHandle> {
        self.slot().take()
    }

    fn slot(&self) -> MutexGuard<'_, Option<PollHandle>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for PaymentWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}
