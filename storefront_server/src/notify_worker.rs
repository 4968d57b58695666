//! New-order notification worker.
//!
//! Polls the orders backend, diffs each fetch against the previous snapshot by order id,
//! and pushes one notification per newly appeared order. Notification state lives in
//! process memory only: a restart re-baselines against whatever is currently visible, so
//! pre-existing orders never generate a backlog of alerts.

use std::{collections::HashSet, time::Duration};

use accfb_tools::{
    helpers::{diff_new_orders, filter_visible, id_set},
    Order,
    OrderId,
    OrdersApi,
    OrdersGateway,
};
use log::*;
use tokio::task::JoinHandle;

use crate::{
    helpers::build_order_notification,
    integrations::line::{build_messages, LineApi},
};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// The outbound half of the worker. Best-effort: implementations report success as a
/// bool and never propagate provider failures into the polling loop.
#[allow(async_fn_in_trait)]
pub trait NewOrderNotifier {
    async fn notify_new_order(&self, order: &Order) -> bool;
}

/// Production notifier: builds the order alert text (plus the slip image when the order
/// carries one) and pushes it to the configured LINE admin recipients.
#[derive(Clone)]
pub struct LineNotifier {
    line: LineApi,
}

impl LineNotifier {
    pub fn new(line: LineApi) -> Self {
        Self { line }
    }
}

impl NewOrderNotifier for LineNotifier {
    async fn notify_new_order(&self, order: &Order) -> bool {
        let text = build_order_notification(order);
        let messages = build_messages(Some(&text), order.slip_url.as_deref());
        match self.line.push(false, None, messages).await {
            Ok(outcome) if outcome.ok => true,
            Ok(outcome) => {
                warn!("🛎️ LINE rejected the notification for order {}: {} {}", order.id, outcome.status, outcome.body);
                false
            },
            Err(e) => {
                warn!("🛎️ Could not push notification for order {}: {e}", order.id);
                false
            },
        }
    }
}

//--------------------------------------  NotificationLoop  -----------------------------------------------------------
/// One polling session. Owns the snapshot id set and the notified set; both die with
/// the loop.
pub struct NotificationLoop<G, N> {
    gateway: G,
    notifier: N,
    snapshot_ids: HashSet<OrderId>,
    notified: HashSet<OrderId>,
    baselined: bool,
}

impl<G, N> NotificationLoop<G, N>
where
    G: OrdersGateway,
    N: NewOrderNotifier,
{
    pub fn new(gateway: G, notifier: N) -> Self {
        Self { gateway, notifier, snapshot_ids: HashSet::new(), notified: HashSet::new(), baselined: false }
    }

    /// Fetch and process one poll. Gateway failures are logged and swallowed; the timer
    /// is never stopped by a bad tick. Until a fetch succeeds the loop stays
    /// un-baselined, so the first good fetch only seeds the snapshot.
    pub async fn run_once(&mut self) {
        let orders = match self.gateway.fetch_all().await {
            Ok(orders) => orders,
            Err(e) => {
                warn!("🛎️ Polling error: {e}");
                return;
            },
        };
        let visible = filter_visible(orders);
        if self.baselined {
            self.tick_with(visible).await;
        } else {
            self.baseline_with(visible);
        }
    }

    /// Seed the snapshot and mark every currently visible order as already notified.
    /// Guarantees zero notifications for orders that predate this session.
    pub fn baseline_with(&mut self, visible: Vec<Order>) {
        self.snapshot_ids = id_set(&visible);
        self.notified.extend(self.snapshot_ids.iter().copied());
        self.baselined = true;
        info!("🛎️ Baseline snapshot holds {} visible orders; none will be re-notified", self.snapshot_ids.len());
    }

    /// Diff one poll result against the snapshot and notify each new order, in the
    /// backend's ordering, sequentially. The snapshot is replaced before any
    /// notification fires, so a failing relay never stalls the snapshot. Every id is
    /// marked notified as soon as its notification is attempted: at most one attempt
    /// per order id per session.
    pub async fn tick_with(&mut self, visible: Vec<Order>) -> Vec<OrderId> {
        let newly = diff_new_orders(&self.snapshot_ids, &visible);
        self.snapshot_ids = id_set(&visible);
        let mut batch = Vec::with_capacity(newly.len());
        for order in &newly {
            if self.notified.contains(&order.id) {
                continue;
            }
            debug!("🛎️ New order {} detected, sending notification", order.id);
            let sent = self.notifier.notify_new_order(order).await;
            self.notified.insert(order.id);
            batch.push(order.id);
            if sent {
                info!("🛎️ Notification sent for order {}", order.id);
            }
        }
        batch
    }

    pub fn is_baselined(&self) -> bool {
        self.baselined
    }
}

/// Starts the notification worker. Do not await the returned JoinHandle, as it will run
/// until aborted; abort it to tear the polling session down.
pub fn start_notify_worker(gateway: OrdersApi, notifier: LineNotifier, poll_interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(poll_interval);
        // A slow fetch must not cause a burst of catch-up ticks afterwards. Each tick is
        // awaited inline, so polls never overlap.
        timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let mut poll = NotificationLoop::new(gateway, notifier);
        info!("🛎️ New-order notification worker started (every {}s)", poll_interval.as_secs());
        loop {
            timer.tick().await;
            poll.run_once().await;
        }
    })
}
