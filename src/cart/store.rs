use tracing::{debug, info, warn};

use super::dto::{round_cents, CartLine};
use crate::error::CartError;
use crate::menu::{FoodItem, FoodSize};

/// The shopper's cart plus a live availability view of the catalog.
///
/// Quantity reserved in the cart is exactly the quantity missing from the
/// view: for every item and size,
/// `available + reserved == catalog available`.
pub struct CartStore {
    lines: Vec<CartLine>,
    available: Vec<FoodItem>,
}

impl CartStore {
    pub fn new(catalog: &[FoodItem]) -> Self {
        Self {
            lines: Vec::new(),
            available: catalog.to_vec(),
        }
    }

    /// Starts an empty cart over `catalog`.
    pub fn initialize(&mut self, catalog: &[FoodItem]) {
        self.lines.clear();
        self.available = catalog.to_vec();
        debug!(items = catalog.len(), "cart initialized");
    }

    /// Releases every reservation.
    pub fn dispose(mut self) {
        self.clear_cart();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The catalog as the shopper sees it, with reservations subtracted.
    pub fn available_items(&self) -> &[FoodItem] {
        &self.available
    }

    pub fn available(&self, id: &str, size: FoodSize) -> Option<u32> {
        self.available
            .iter()
            .find(|i| i.id == id)
            .map(|i| i.available[size])
    }

    pub fn quantity(&self, id: &str, size: FoodSize) -> u32 {
        self.lines
            .iter()
            .find(|l| l.matches(id, size))
            .map_or(0, |l| l.quantity)
    }

    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn total(&self) -> f64 {
        round_cents(self.lines.iter().map(CartLine::line_total).sum())
    }

    /// Reserves one unit. Returns the line's new quantity.
    pub fn add_to_cart(&mut self, item: &FoodItem, size: FoodSize) -> Result<u32, CartError> {
        let entry = self
            .available
            .iter_mut()
            .find(|i| i.id == item.id)
            .ok_or_else(|| CartError::UnknownItem(item.id.clone()))?;
        if entry.available[size] == 0 {
            debug!(id = %item.id, %size, "add to cart refused: out of stock");
            return Err(CartError::OutOfStock {
                id: item.id.clone(),
                size,
            });
        }
        entry.available[size] -= 1;

        let quantity = match self.lines.iter_mut().find(|l| l.matches(&item.id, size)) {
            Some(line) => {
                line.quantity += 1;
                line.quantity
            }
            None => {
                self.lines.push(CartLine {
                    item: item.clone(),
                    size,
                    quantity: 1,
                });
                1
            }
        };
        info!(id = %item.id, %size, quantity, "added to cart");
        Ok(quantity)
    }

    pub fn remove_from_cart(&mut self, id: &str, size: FoodSize) -> Option<CartLine> {
        let pos = self.lines.iter().position(|l| l.matches(id, size))?;
        let line = self.lines.remove(pos);
        self.release(id, size, line.quantity);
        info!(%id, %size, quantity = line.quantity, "removed from cart");
        Some(line)
    }

    /// Sets a line's quantity; zero removes the line. Increases are capped by
    /// what is still available. Returns the resulting quantity, or `None` when
    /// there is no such line.
    pub fn update_quantity(&mut self, id: &str, size: FoodSize, new_quantity: u32) -> Option<u32> {
        if new_quantity == 0 {
            return self.remove_from_cart(id, size).map(|_| 0);
        }
        let line = self.lines.iter_mut().find(|l| l.matches(id, size))?;
        let old = line.quantity;
        let slot = self
            .available
            .iter_mut()
            .find(|i| i.id == id)
            .map(|i| &mut i.available[size]);

        match slot {
            Some(left) if new_quantity > old => {
                let granted = (new_quantity - old).min(*left);
                *left -= granted;
                line.quantity = old + granted;
            }
            Some(left) => {
                *left += old - new_quantity;
                line.quantity = new_quantity;
            }
            // item left the catalog: only shrinking makes sense
            None => line.quantity = new_quantity.min(old),
        }
        debug!(%id, %size, old, new = line.quantity, "cart quantity updated");
        Some(line.quantity)
    }

    /// Empties the cart and gives every reservation back.
    pub fn clear_cart(&mut self) {
        let lines = std::mem::take(&mut self.lines);
        for line in &lines {
            self.release(&line.item.id, line.size, line.quantity);
        }
        if !lines.is_empty() {
            info!(lines = lines.len(), "cart cleared");
        }
    }

    /// Empties the cart without restoring availability, for lines that were
    /// sold.
    pub fn take_lines(&mut self) -> Vec<CartLine> {
        std::mem::take(&mut self.lines)
    }

    /// Rebuilds the availability view from an edited catalog. Lines are
    /// refreshed to the current item data and trimmed to the new stock; lines
    /// for deleted items are dropped.
    pub fn sync_catalog(&mut self, catalog: &[FoodItem]) {
        self.available = catalog.to_vec();
        let available = &mut self.available;
        self.lines.retain_mut(|line| {
            let Some(entry) = available.iter_mut().find(|i| i.id == line.item.id) else {
                warn!(id = %line.item.id, "cart line dropped: item removed from menu");
                return false;
            };
            line.item = entry.clone();
            let left = &mut entry.available[line.size];
            let granted = line.quantity.min(*left);
            *left -= granted;
            if granted < line.quantity {
                warn!(id = %line.item.id, size = %line.size, from = line.quantity, to = granted, "cart line trimmed to stock");
            }
            line.quantity = granted;
            granted > 0
        });
    }

    fn release(&mut self, id: &str, size: FoodSize, quantity: u32) {
        if let Some(entry) = self.available.iter_mut().find(|i| i.id == id) {
            entry.available[size] += quantity;
        }
    }
}
