use std::time::Duration;

use time::OffsetDateTime;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::dto::{Order, OrderItem, OrderStatus};
use crate::cart::CartLine;
use crate::storage::DurableStore;

/// Hydration progress of the orders collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Uninitialized,
    Loading,
    Ready,
    Failed(String),
}

/// Placed orders, most recent first. Append-only apart from status toggles.
pub struct OrdersStore {
    store: DurableStore,
    key: String,
    orders: Vec<Order>,
    state: LoadState,
    retry_delay: Duration,
}

impl OrdersStore {
    pub fn new(store: DurableStore, key: impl Into<String>, retry_delay: Duration) -> Self {
        Self {
            store,
            key: key.into(),
            orders: Vec::new(),
            state: LoadState::Uninitialized,
            retry_delay,
        }
    }

    /// Loads orders from storage once. A corrupt or unreadable value leaves the
    /// store in [`LoadState::Failed`] until [`OrdersStore::retry`] succeeds.
    pub fn initialize(&mut self) -> &LoadState {
        if self.state == LoadState::Uninitialized {
            self.load();
        }
        &self.state
    }

    /// Waits the retry delay, then reloads from storage.
    pub async fn retry(&mut self) -> &LoadState {
        debug!(delay = ?self.retry_delay, "orders reload scheduled");
        tokio::time::sleep(self.retry_delay).await;
        self.load();
        &self.state
    }

    pub fn dispose(self) {
        if self.state == LoadState::Ready {
            self.commit();
        }
        debug!(key = %self.key, "orders store disposed");
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed(reason) => Some(reason.as_str()),
            _ => None,
        }
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Records a purchase and returns it. Line prices are copied, so later
    /// catalog edits do not touch the order.
    pub fn add_order(&mut self, address: &str, lines: &[CartLine], total: f64) -> Order {
        let now = OffsetDateTime::now_utc();
        let order = Order {
            id: Uuid::new_v4(),
            address: address.to_string(),
            total,
            items: lines.iter().map(OrderItem::from).collect(),
            timestamp: now - time::Duration::nanoseconds(i64::from(now.nanosecond() % 1_000_000)),
            status: OrderStatus::Pending,
        };
        info!(order_id = %order.id, items = order.items.len(), total, "order placed");
        self.orders.insert(0, order.clone());
        self.commit();
        order
    }

    pub fn get_order(&self, id: Uuid) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    /// Flips pending/completed. Returns the new status, or `None` for an
    /// unknown id.
    pub fn toggle_order_status(&mut self, id: Uuid) -> Option<OrderStatus> {
        let Some(order) = self.orders.iter_mut().find(|o| o.id == id) else {
            debug!(order_id = %id, "toggle on unknown order ignored");
            return None;
        };
        order.status = order.status.toggled();
        let status = order.status;
        info!(order_id = %id, ?status, "order status toggled");
        self.commit();
        Some(status)
    }

    fn load(&mut self) {
        self.state = LoadState::Loading;
        match self.store.try_read::<Vec<Order>>(&self.key) {
            Ok(stored) => {
                let stored = stored.unwrap_or_default();
                info!(count = stored.len(), key = %self.key, "orders hydrated from storage");
                // orders placed while storage was failing are newer than anything stored
                let mut unsaved: Vec<Order> = std::mem::take(&mut self.orders)
                    .into_iter()
                    .filter(|o| stored.iter().all(|s| s.id != o.id))
                    .collect();
                let pending_writes = unsaved.len();
                unsaved.extend(stored);
                self.orders = unsaved;
                self.state = LoadState::Ready;
                if pending_writes > 0 {
                    warn!(count = pending_writes, key = %self.key, "persisting orders placed while storage was failing");
                    self.commit();
                }
            }
            Err(e) => {
                error!(error = %e, key = %self.key, "failed to load orders");
                self.state = LoadState::Failed(e.to_string());
            }
        }
    }

    fn commit(&self) {
        if matches!(self.state, LoadState::Uninitialized | LoadState::Loading) {
            // writing before hydration would clobber orders we have not read
            warn!(key = %self.key, "orders not persisted: store not hydrated yet");
            return;
        }
        self.store.write(&self.key, &self.orders);
    }
}

#[cfg(test)]
mod orders_tests {
    use std::sync::Arc;

    use super::*;
    use crate::cart::CartStore;
    use crate::menu::{default_catalog, FoodSize};
    use time::macros::datetime;
    use crate::storage::{MemoryStorage, StorageBackend, UnavailableStorage};
    use std::sync::atomic::{AtomicBool, Ordering};

    const KEY: &str = "food-app-orders";
    const DELAY: Duration = Duration::from_millis(5);

    /// Memory storage that can be switched off.
    #[derive(Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        down: AtomicBool,
    }

    impl FlakyStorage {
        fn check(&self) -> anyhow::Result<()> {
            anyhow::ensure!(!self.down.load(Ordering::SeqCst), "storage offline");
            Ok(())
        }
    }

    impl StorageBackend for FlakyStorage {
        fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
            self.check()?;
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
            self.check()?;
            self.inner.set_item(key, value)
        }

        fn remove_item(&self, key: &str) -> anyhow::Result<()> {
            self.check()?;
            self.inner.remove_item(key)
        }
    }

    fn ready_store() -> (DurableStore, OrdersStore) {
        let durable = DurableStore::new(Arc::new(MemoryStorage::new()));
        let mut orders = OrdersStore::new(durable.clone(), KEY, DELAY);
        assert_eq!(orders.initialize(), &LoadState::Ready);
        (durable, orders)
    }

    fn sample_lines() -> Vec<CartLine> {
        let catalog = default_catalog();
        let mut cart = CartStore::new(&catalog);
        cart.add_to_cart(&catalog[0], FoodSize::Medium).unwrap();
        cart.add_to_cart(&catalog[0], FoodSize::Medium).unwrap();
        cart.add_to_cart(&catalog[1], FoodSize::Large).unwrap();
        cart.lines().to_vec()
    }

    #[test]
    fn add_order_freezes_lines_and_prepends() {
        let (durable, mut orders) = ready_store();
        let mut lines = sample_lines();
        let first = orders.add_order("0xabc", &lines, 33.97);
        assert_eq!(first.status, OrderStatus::Pending);
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.items[0].price, 8.99);
        assert_eq!(first.items[0].quantity, 2);
        assert_eq!(first.items[1].size, FoodSize::Large);

        lines[0].item.price.medium = 100.0;
        assert_eq!(orders.get_order(first.id).unwrap().items[0].price, 8.99);

        let second = orders.add_order("0xdef", &lines[1..], 15.99);
        assert_eq!(orders.orders()[0].id, second.id);
        assert_eq!(orders.orders()[1].id, first.id);

        let stored: Vec<Order> = durable.read(KEY).unwrap();
        assert_eq!(stored, orders.orders());
    }

    #[test]
    fn get_order_misses_quietly() {
        let (_, orders) = ready_store();
        assert!(orders.get_order(Uuid::new_v4()).is_none());
    }

    #[test]
    fn toggle_flips_back_and_forth() {
        let (durable, mut orders) = ready_store();
        let order = orders.add_order("0xabc", &sample_lines(), 33.97);
        assert_eq!(orders.toggle_order_status(order.id), Some(OrderStatus::Completed));
        let stored: Vec<Order> = durable.read(KEY).unwrap();
        assert_eq!(stored[0].status, OrderStatus::Completed);

        assert_eq!(orders.toggle_order_status(order.id), Some(OrderStatus::Pending));
        assert_eq!(orders.get_order(order.id).unwrap().status, OrderStatus::Pending);
        assert_eq!(orders.toggle_order_status(Uuid::new_v4()), None);
    }

    #[test]
    fn round_trip_through_a_fresh_store() {
        let (durable, mut orders) = ready_store();
        let order = orders.add_order("0xabc", &sample_lines(), 33.97);
        orders.toggle_order_status(order.id);
        orders.add_order("0xdef", &sample_lines(), 33.97);
        let expected = orders.orders().to_vec();
        orders.dispose();

        let mut fresh = OrdersStore::new(durable, KEY, DELAY);
        fresh.initialize();
        assert_eq!(fresh.orders(), expected.as_slice());
    }

    #[test]
    fn hydrates_records_without_status_and_with_numeric_timestamps() {
        let raw = r#"[{"id":"6f1c1a1e-2f9b-4a57-9d1e-3c8f6a0b7d21","address":"0xabc","total":8.99,
            "items":[{"id":"1","name":"Classic Burger","size":"medium","quantity":1,"price":8.99}],
            "timestamp":1714564800000}]"#;
        let durable = DurableStore::new(Arc::new(MemoryStorage::new().with_item(KEY, raw)));
        let mut orders = OrdersStore::new(durable, KEY, DELAY);
        assert_eq!(orders.initialize(), &LoadState::Ready);
        assert_eq!(orders.orders()[0].status, OrderStatus::Pending);
        assert_eq!(orders.orders()[0].timestamp, datetime!(2024-05-01 12:00 UTC));
    }

    #[test]
    fn timestamps_are_stored_as_epoch_millis() {
        let (durable, mut orders) = ready_store();
        let order = orders.add_order("0xabc", &sample_lines(), 33.97);
        let raw: serde_json::Value = durable.read(KEY).unwrap();
        let millis = raw[0]["timestamp"].as_i64().unwrap();
        assert_eq!(i128::from(millis) * 1_000_000, order.timestamp.unix_timestamp_nanos());
    }

    #[tokio::test]
    async fn malformed_storage_fails_until_retry_succeeds() {
        let durable = DurableStore::new(Arc::new(MemoryStorage::new().with_item(KEY, "not json")));
        let mut orders = OrdersStore::new(durable.clone(), KEY, DELAY);
        assert!(matches!(orders.initialize(), LoadState::Failed(reason) if !reason.is_empty()));
        assert!(orders.orders().is_empty());
        assert!(orders.error().is_some());

        assert!(matches!(orders.retry().await, LoadState::Failed(_)));
        assert!(orders.orders().is_empty());

        let (_, mut healthy) = ready_store();
        healthy.add_order("0xabc", &sample_lines(), 33.97);
        durable.write(KEY, healthy.orders());

        assert_eq!(orders.retry().await, &LoadState::Ready);
        assert_eq!(orders.orders(), healthy.orders());
        assert_eq!(orders.error(), None);
    }

    #[tokio::test]
    async fn unavailable_storage_surfaces_failure() {
        let mut orders = OrdersStore::new(DurableStore::new(Arc::new(UnavailableStorage)), KEY, DELAY);
        assert!(matches!(orders.initialize(), LoadState::Failed(reason) if reason.contains("unavailable")));
        let order = orders.add_order("0xabc", &sample_lines(), 33.97);
        assert_eq!(orders.get_order(order.id).map(|o| o.id), Some(order.id));
    }

    #[tokio::test]
    async fn orders_placed_during_an_outage_survive_the_reload() {
        let backend = Arc::new(FlakyStorage::default());
        backend.down.store(true, Ordering::SeqCst);
        let durable = DurableStore::new(backend.clone());
        let mut orders = OrdersStore::new(durable.clone(), KEY, DELAY);
        assert!(matches!(orders.initialize(), LoadState::Failed(_)));
        let offline = orders.add_order("0xabc", &sample_lines(), 33.97);

        backend.down.store(false, Ordering::SeqCst);
        let (_, mut elsewhere) = ready_store();
        let stored = elsewhere.add_order("0xdef", &sample_lines(), 33.97);
        durable.write(KEY, elsewhere.orders());

        assert_eq!(orders.retry().await, &LoadState::Ready);
        let ids: Vec<Uuid> = orders.orders().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![offline.id, stored.id]);

        let persisted: Vec<Order> = durable.read(KEY).unwrap();
        assert_eq!(persisted, orders.orders());
    }

    #[test]
    fn reload_does_not_duplicate_stored_orders() {
        let (durable, mut orders) = ready_store();
        orders.add_order("0xabc", &sample_lines(), 33.97);
        orders.load();
        assert_eq!(orders.orders().len(), 1);
        let persisted: Vec<Order> = durable.read(KEY).unwrap();
        assert_eq!(persisted.len(), 1);
    }

    #[test]
    fn initialize_runs_once() {
        let (durable, mut orders) = ready_store();
        durable.write(KEY, "garbage");
        assert_eq!(orders.initialize(), &LoadState::Ready);
    }
}
