use dashmap::DashMap;
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use crate::events::DispatchEvent;
use crate::models::assignment::Assignment;
use crate::models::buddy::Buddy;
use crate::models::order::Order;
use crate::observability::metrics::Metrics;

pub struct AppState {
    pub buddies: DashMap<Uuid, Buddy>,
    pub orders: DashMap<Uuid, Order>,
    pub assignments: DashMap<Uuid, Assignment>,
    pub order_tx: mpsc::Sender<Order>,
    pub events_tx: broadcast::Sender<DispatchEvent>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(
        order_queue_size: usize,
        event_buffer_size: usize,
    ) -> (Self, mpsc::Receiver<Order>) {
        let (order_tx, order_rx) = mpsc::channel(order_queue_size);
        let (events_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        (
            Self {
                buddies: DashMap::new(),
                orders: DashMap::new(),
                assignments: DashMap::new(),
                order_tx,
                events_tx,
                metrics: Metrics::new(),
            },
            order_rx,
        )
    }
}
