//! In-memory inventory store

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::input::{CreateItemRequest, ItemPatch, NewItem, UpdateItemRequest, ValidationError};

/// A single inventory record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: u64,
    pub name: String,
    pub quantity: i64,
    pub category: String,
    pub status: String,
}

impl InventoryItem {
    fn from_new(id: u64, new: NewItem) -> Self {
        Self {
            id,
            name: new.name,
            quantity: new.quantity,
            category: new.category,
            status: new.status,
        }
    }

    fn apply(&mut self, patch: ItemPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

/// Items present at every process start
pub fn seed_items() -> Vec<InventoryItem> {
    let seed = |id, name: &str, quantity, category: &str| InventoryItem {
        id,
        name: name.to_string(),
        quantity,
        category: category.to_string(),
        status: "Available".to_string(),
    };

    vec![
        seed(1, "Arduino Kit", 5, "Hardware"),
        seed(2, "Figma License", 20, "Software"),
        seed(3, "Wireless Mouse", 25, "Electronics"),
    ]
}

/// Items plus the id counter; always guarded together
#[derive(Debug)]
struct Inventory {
    items: Vec<InventoryItem>,
    next_id: u64,
}

impl Inventory {
    fn position(&self, id: u64) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }
}

/// Inventory store operations
#[derive(Clone)]
pub struct InventoryStore {
    inner: Arc<Mutex<Inventory>>,
}

impl InventoryStore {
    /// Store holding `items`; ids continue after the largest one present
    pub fn new(items: Vec<InventoryItem>) -> Self {
        let next_id = items.iter().map(|item| item.id).max().unwrap_or(0) + 1;
        Self {
            inner: Arc::new(Mutex::new(Inventory { items, next_id })),
        }
    }

    /// Store initialized with the seed items (next id 4)
    pub fn seeded() -> Self {
        Self::new(seed_items())
    }

    /// All items in insertion order
    pub fn list(&self) -> Vec<InventoryItem> {
        self.inner.lock().items.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: u64) -> bool {
        self.inner.lock().position(id).is_some()
    }

    /// Id the next successful create will receive
    pub fn next_id(&self) -> u64 {
        self.inner.lock().next_id
    }

    /// Validate and append a new item
    pub fn create(&self, request: CreateItemRequest) -> Result<InventoryItem, InventoryError> {
        let new = request.validate()?;

        let mut inventory = self.inner.lock();
        let id = inventory.next_id;
        inventory.next_id += 1;

        let item = InventoryItem::from_new(id, new);
        inventory.items.push(item.clone());
        debug!(id, name = %item.name, "Inventory item created");

        Ok(item)
    }

    /// Overwrite the provided fields of the item with `id`
    pub fn update(
        &self,
        id: u64,
        request: UpdateItemRequest,
    ) -> Result<InventoryItem, InventoryError> {
        let mut inventory = self.inner.lock();
        let index = inventory.position(id).ok_or(InventoryError::NotFound(id))?;
        let patch = request.validate()?;

        let item = &mut inventory.items[index];
        item.apply(patch);
        debug!(id, "Inventory item updated");

        Ok(item.clone())
    }

    /// Remove the item with `id`, keeping the order of the rest
    pub fn delete(&self, id: u64) -> Result<InventoryItem, InventoryError> {
        let mut inventory = self.inner.lock();
        let index = inventory.position(id).ok_or(InventoryError::NotFound(id))?;

        let item = inventory.items.remove(index);
        debug!(id, "Inventory item deleted");

        Ok(item)
    }
}

impl Default for InventoryStore {
    fn default() -> Self {
        Self::seeded()
    }
}

/// Inventory operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Item not found.")]
    NotFound(u64),
}
