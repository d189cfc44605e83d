use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::cart::CartStore;
use crate::config::AppConfig;
use crate::menu::MenuStore;
use crate::orders::{LoadState, OrdersStore};
use crate::storage::{DurableStore, FileStorage, MemoryStorage, StorageBackend};

/// Every store of one storefront session, sharing a durable backend.
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub menu: MenuStore,
    pub cart: CartStore,
    pub orders: OrdersStore,
}

impl AppState {
    pub fn init(config: AppConfig) -> Self {
        let files = FileStorage::new(&config.storage.data_dir);
        info!(data_dir = %files.dir().display(), "using file storage");
        Self::from_parts(Arc::new(config), Arc::new(files))
    }

    /// Builds the stores over `backend` and hydrates them.
    pub fn from_parts(config: Arc<AppConfig>, backend: Arc<dyn StorageBackend>) -> Self {
        let storage = DurableStore::new(backend);

        let mut menu = MenuStore::new(storage.clone(), config.storage.menu_key.clone());
        menu.initialize();
        let cart = CartStore::new(menu.items());
        let mut orders = OrdersStore::new(
            storage,
            config.storage.orders_key.clone(),
            config.orders_retry_delay,
        );
        if let LoadState::Failed(reason) = orders.initialize() {
            tracing::warn!(%reason, "orders unavailable until retried");
        }

        Self {
            config,
            menu,
            cart,
            orders,
        }
    }

    /// In-memory session for tests. The data dir is never touched.
    pub fn fake() -> Self {
        Self::from_parts(
            Arc::new(AppConfig::for_tests(PathBuf::new())),
            Arc::new(MemoryStorage::new()) as Arc<dyn StorageBackend>,
        )
    }

    /// Pushes catalog edits into the cart's availability view.
    pub fn sync_cart(&mut self) {
        self.cart.sync_catalog(self.menu.items());
    }

    pub fn dispose(self) {
        self.cart.dispose();
        self.menu.dispose();
        self.orders.dispose();
    }
}
