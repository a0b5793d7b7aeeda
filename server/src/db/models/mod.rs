//! Database Models

// Serde helpers
pub mod serde_helpers;

// Auth
pub mod user;

// Catalog
pub mod food;
pub mod menu;

// Location
pub mod dining_table;

// Orders
pub mod invoice;
pub mod order;
pub mod order_item;

// Re-exports
pub use dining_table::{DiningTable, DiningTableCreate, DiningTableId, DiningTableUpdate};
pub use food::{Food, FoodCreate, FoodId, FoodUpdate};
pub use invoice::{Invoice, InvoiceCreate, InvoiceId, InvoiceUpdate, PaymentStatus};
pub use menu::{Menu, MenuCreate, MenuId, MenuUpdate};
pub use order::{Order, OrderCreate, OrderId, OrderUpdate};
pub use order_item::{OrderItem, OrderItemId, OrderItemLine, OrderItemPack, OrderItemUpdate};
pub use user::{User, UserId, UserLogin, UserSignup};
