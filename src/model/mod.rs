//! Domain entities shared by the API, the store, and the frontend layer

pub mod item;
pub mod supplier;
pub mod user;

pub use item::{InventoryItem, ItemInput};
pub use supplier::{Supplier, SupplierInput};
pub use user::{PublicUser, User, DEFAULT_ROLE};
