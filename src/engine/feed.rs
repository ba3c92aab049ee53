//! Generates mock orders on a timer so the driver app has traffic to work
//! with before a real storefront exists.

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use tokio::time::{Duration, interval};
use tracing::{error, info};
use uuid::Uuid;

use crate::engine::queue::enqueue_order;
use crate::events::DispatchEvent;
use crate::models::order::{FulfillmentStatus, LineItem, Order, RouteLocation};
use crate::state::AppState;

const DELIVERY_ADDRESS: &str = "2110 Lawnwood Cir, Baltimore, MD 21207";
const DELIVERY_LAT: f64 = 39.3476;
const DELIVERY_LNG: f64 = -76.7379;

struct MockDispensary {
    name: &'static str,
    lat: f64,
    lng: f64,
}

const MOCK_DISPENSARIES: &[MockDispensary] = &[
    MockDispensary {
        name: "StoreHouse Dispensary",
        lat: 39.3476,
        lng: -76.7379,
    },
    MockDispensary {
        name: "GreenLeaf Wellness",
        lat: 39.3176,
        lng: -76.6159,
    },
];

struct MockProduct {
    name: &'static str,
    price: f64,
}

const MOCK_PRODUCTS: &[MockProduct] = &[
    MockProduct {
        name: "Blue Dream",
        price: 50.0,
    },
    MockProduct {
        name: "GSC",
        price: 60.0,
    },
    MockProduct {
        name: "Purple Punch",
        price: 55.0,
    },
];

pub async fn run_mock_order_feed(state: Arc<AppState>, period: Duration) {
    info!(period_secs = period.as_secs(), "mock order feed started");

    let mut ticker = interval(period);
    // The first tick completes immediately; skip it so orders start one full
    // period after startup.
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let order = generate_mock_order();
        info!(order_id = %order.id, dispensary = %order.pickup.address, "mock order generated");

        state.orders.insert(order.id, order.clone());
        let _ = state
            .events_tx
            .send(DispatchEvent::OrderAvailable(order.clone()));

        if let Err(err) = enqueue_order(&state, order).await {
            error!(error = %err, "failed to enqueue mock order");
        }
    }
}

pub fn generate_mock_order() -> Order {
    let mut rng = rand::thread_rng();
    let dispensary = &MOCK_DISPENSARIES[rng.gen_range(0..MOCK_DISPENSARIES.len())];
    let product = &MOCK_PRODUCTS[rng.gen_range(0..MOCK_PRODUCTS.len())];
    let quantity = rng.gen_range(1..=2);

    Order {
        id: Uuid::new_v4(),
        items: vec![LineItem {
            name: product.name.to_string(),
            quantity,
            unit_price: product.price,
            kind: None,
            thc: None,
        }],
        pickup: RouteLocation {
            address: dispensary.name.to_string(),
            lat: dispensary.lat,
            lng: dispensary.lng,
        },
        delivery: RouteLocation {
            address: DELIVERY_ADDRESS.to_string(),
            lat: DELIVERY_LAT,
            lng: DELIVERY_LNG,
        },
        subtotal: 100.0,
        delivery_fee: 15.0,
        tip: 10.0,
        total: 125.0,
        status: FulfillmentStatus::Preparing,
        assigned_buddy: None,
        is_mock: true,
        created_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use crate::models::order::FulfillmentStatus;

    use super::generate_mock_order;

    #[test]
    fn mock_orders_start_in_preparing() {
        let order = generate_mock_order();

        assert_eq!(order.status, FulfillmentStatus::Preparing);
        assert!(order.is_mock);
        assert!(order.assigned_buddy.is_none());
        assert_eq!(order.items.len(), 1);
        assert!((1..=2).contains(&order.items[0].quantity));
        assert!((order.total - 125.0).abs() < 1e-9);
    }
}
