use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub menu_key: String,
    pub orders_key: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub orders_retry_delay: Duration,
    pub payment_delay: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let storage = StorageConfig {
            data_dir: std::env::var("FOODCART_DATA_DIR")
                .unwrap_or_else(|_| "./data".into())
                .into(),
            menu_key: std::env::var("FOODCART_MENU_KEY").unwrap_or_else(|_| "food-app-menu".into()),
            orders_key: std::env::var("FOODCART_ORDERS_KEY")
                .unwrap_or_else(|_| "food-app-orders".into()),
        };
        anyhow::ensure!(
            storage.menu_key != storage.orders_key,
            "menu and orders must use distinct storage keys"
        );
        Ok(Self {
            storage,
            orders_retry_delay: Duration::from_millis(millis_from_env("FOODCART_RETRY_DELAY_MS", 1000)),
            payment_delay: Duration::from_millis(millis_from_env("FOODCART_PAYMENT_DELAY_MS", 0)),
        })
    }

    pub fn for_tests(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage: StorageConfig {
                data_dir: data_dir.into(),
                menu_key: "food-app-menu".into(),
                orders_key: "food-app-orders".into(),
            },
            orders_retry_delay: Duration::from_millis(5),
            payment_delay: Duration::ZERO,
        }
    }
}

fn millis_from_env(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}
