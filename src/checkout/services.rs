use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::cart::{round_cents, CartLine, CartStore};
use crate::error::CheckoutError;
use crate::menu::MenuStore;
use crate::orders::{Order, OrdersStore};

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReceipt {
    pub reference: String,
    pub amount: f64,
}

/// Settles a purchase for the payer at `address`.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn confirm_payment(&self, address: &str, lines: &[CartLine]) -> anyhow::Result<PaymentReceipt>;
}

/// Placeholder wallet: approves every payment after an optional delay.
#[derive(Debug, Clone, Default)]
pub struct MockWallet {
    delay: Duration,
    decline: bool,
}

impl MockWallet {
    pub fn new(delay: Duration) -> Self {
        Self { delay, decline: false }
    }

    pub fn declining() -> Self {
        Self {
            delay: Duration::ZERO,
            decline: true,
        }
    }
}

#[async_trait]
impl PaymentGateway for MockWallet {
    async fn confirm_payment(&self, address: &str, lines: &[CartLine]) -> anyhow::Result<PaymentReceipt> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        anyhow::ensure!(!self.decline, "wallet {address} declined the payment");
        Ok(PaymentReceipt {
            reference: format!("mock-{}", Uuid::new_v4().simple()),
            amount: round_cents(lines.iter().map(CartLine::line_total).sum()),
        })
    }
}

/// Pays for the cart and records the order.
///
/// On success the sold quantities leave the catalog for good and the cart is
/// emptied without giving stock back. On failure nothing changes.
#[instrument(skip_all, fields(%address))]
pub async fn pay(
    menu: &mut MenuStore,
    cart: &mut CartStore,
    orders: &mut OrdersStore,
    gateway: &dyn PaymentGateway,
    address: &str,
) -> Result<Order, CheckoutError> {
    let address = address.trim();
    if address.is_empty() {
        return Err(CheckoutError::MissingAddress);
    }
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let total = cart.total();
    let receipt = gateway
        .confirm_payment(address, cart.lines())
        .await
        .map_err(|e| {
            warn!(error = %e, "payment declined");
            CheckoutError::Payment(e)
        })?;
    info!(reference = %receipt.reference, amount = receipt.amount, "payment confirmed");

    let order = orders.add_order(address, cart.lines(), total);
    let sold = cart.take_lines();
    menu.consume_stock(&sold);
    Ok(order)
}
