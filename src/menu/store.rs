use bytes::Bytes;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::defaults::default_catalog;
use super::dto::{FoodItem, FoodSize};
use super::image::{data_url_from_bytes, is_valid_image_ref};
use crate::cart::CartLine;
use crate::error::MenuError;
use crate::storage::DurableStore;

/// Owns the catalog. Every mutation is written through to durable storage.
pub struct MenuStore {
    store: DurableStore,
    key: String,
    items: Vec<FoodItem>,
    initialized: bool,
}

impl MenuStore {
    pub fn new(store: DurableStore, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            items: default_catalog(),
            initialized: false,
        }
    }

    /// One-time hydration. Later calls are no-ops so storage never overwrites
    /// memory after the first load.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        match self.store.read::<Vec<FoodItem>>(&self.key) {
            Some(items) => {
                info!(count = items.len(), key = %self.key, "menu hydrated from storage");
                self.items = items;
            }
            None => {
                info!(key = %self.key, "no stored menu; seeding default catalog");
                self.items = default_catalog();
            }
        }
        self.initialized = true;
    }

    pub fn dispose(self) {
        self.commit();
        debug!(key = %self.key, "menu store disposed");
    }

    pub fn items(&self) -> &[FoodItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&FoodItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Appends an item and returns the id it was stored under. A blank or
    /// already-used id is replaced with a fresh one.
    pub fn add(&mut self, mut item: FoodItem) -> Result<String, MenuError> {
        validate(&item)?;
        if item.id.trim().is_empty() || self.get(&item.id).is_some() {
            item.id = self.fresh_id();
        }
        let id = item.id.clone();
        info!(%id, name = %item.name, "menu item added");
        self.items.push(item);
        self.commit();
        Ok(id)
    }

    /// Replaces the item with `id`, keeping `id`. Returns `Ok(false)` when no
    /// such item exists.
    pub fn update(&mut self, id: &str, mut item: FoodItem) -> Result<bool, MenuError> {
        validate(&item)?;
        let Some(slot) = self.items.iter_mut().find(|i| i.id == id) else {
            debug!(%id, "update on unknown menu item ignored");
            return Ok(false);
        };
        item.id = id.to_string();
        *slot = item;
        info!(%id, "menu item updated");
        self.commit();
        Ok(true)
    }

    pub fn remove(&mut self, id: &str) -> Option<FoodItem> {
        let pos = self.items.iter().position(|i| i.id == id)?;
        let removed = self.items.remove(pos);
        info!(%id, "menu item removed");
        self.commit();
        Some(removed)
    }

    /// Stores an uploaded image on the item as a data URL.
    pub fn attach_image(&mut self, id: &str, body: Bytes, content_type: &str) -> anyhow::Result<bool> {
        let url = data_url_from_bytes(body, content_type)?;
        let Some(item) = self.items.iter_mut().find(|i| i.id == id) else {
            return Ok(false);
        };
        item.image = url;
        self.commit();
        Ok(true)
    }

    /// Removes sold quantities from catalog availability.
    pub fn consume_stock(&mut self, lines: &[CartLine]) {
        for line in lines {
            match self.items.iter_mut().find(|i| i.id == line.item.id) {
                Some(item) => {
                    let left = &mut item.available[line.size];
                    *left = left.saturating_sub(line.quantity);
                }
                None => warn!(id = %line.item.id, "sold item no longer on the menu"),
            }
        }
        self.commit();
    }

    pub fn available(&self, id: &str, size: FoodSize) -> Option<u32> {
        self.get(id).map(|i| i.available[size])
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().simple().to_string();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn commit(&self) {
        self.store.write(&self.key, &self.items);
    }
}

fn validate(item: &FoodItem) -> Result<(), MenuError> {
    if item.name.trim().is_empty() {
        return Err(MenuError::Invalid("name is required".into()));
    }
    if item.description.trim().is_empty() {
        return Err(MenuError::Invalid("description is required".into()));
    }
    for size in FoodSize::ALL {
        if item.weight[size].trim().is_empty() {
            return Err(MenuError::Invalid(format!("{size} weight is required")));
        }
        let price = item.price[size];
        if !price.is_finite() || price < 0.0 {
            return Err(MenuError::Invalid(format!("{size} price must be a non-negative amount")));
        }
    }
    if !is_valid_image_ref(&item.image) {
        return Err(MenuError::Invalid("image must be an http(s) or data:image URL".into()));
    }
    Ok(())
}
