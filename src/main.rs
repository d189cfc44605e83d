use tracing::{info, warn, Instrument};

use foodcart::checkout::{pay, MockWallet};
use foodcart::config::AppConfig;
use foodcart::menu::FoodSize;
use foodcart::orders::LoadState;
use foodcart::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "foodcart=debug".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    let mut state = AppState::init(config);

    if let LoadState::Failed(reason) = state.orders.state().clone() {
        warn!(%reason, "retrying orders load");
        if let LoadState::Failed(reason) = state.orders.retry().await {
            warn!(%reason, "orders still unavailable; continuing with an empty list");
        }
    }

    for item in state.cart.available_items() {
        info!(
            id = %item.id,
            name = %item.name,
            medium = item.available.medium,
            large = item.available.large,
            "on the menu"
        );
    }

    // shopper: fill the cart and pay with the mock wallet
    let shopping = async {
        let picks: Vec<_> = state.menu.items().iter().take(2).cloned().collect();
        for item in &picks {
            if let Err(e) = state.cart.add_to_cart(item, FoodSize::Medium) {
                warn!(error = %e, "could not add to cart");
            }
        }
        info!(items = state.cart.item_count(), total = state.cart.total(), "cart ready");

        let wallet = MockWallet::new(state.config.payment_delay);
        let AppState { menu, cart, orders, .. } = &mut state;
        pay(menu, cart, orders, &wallet, "0x52908400098527886E0F7030069857D2E4169EE7").await
    }
    .instrument(tracing::info_span!("shopper"));

    match shopping.await {
        Ok(order) => {
            info!(order_id = %order.id, total = order.total, "order placed");
            // admin: mark it fulfilled
            if let Some(status) = state.orders.toggle_order_status(order.id) {
                info!(order_id = %order.id, ?status, "order status updated");
            }
        }
        Err(e) => warn!(error = %e, "checkout failed"),
    }

    info!(orders = state.orders.orders().len(), "session finished");
    state.dispose();
    Ok(())
}
