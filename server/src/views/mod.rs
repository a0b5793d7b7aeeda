//! Derived read views
//!
//! Views are assembled fresh per request from the store and never persisted.

pub mod order_view;

pub use order_view::{OrderViewComposer, OrderViewGroup, OrderViewRow};
