//! Inventory data store

pub mod input;
pub mod inventory;

pub use input::{CreateItemRequest, QuantityInput, UpdateItemRequest, ValidationError};
pub use inventory::{InventoryError, InventoryItem, InventoryStore};
