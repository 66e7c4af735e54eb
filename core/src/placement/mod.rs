// storefront/core/src/placement/mod.rs

//! The order-placement workflow.

pub mod context;
pub mod error;
pub mod request;
pub mod service;
pub mod steps;

pub use context::{Placement, PlacementStores, ProductSource};
pub use error::PlacementError;
pub use request::{PlaceOrderRequest, RawQuantity, ValidatedOrder};
pub use service::{ListingSource, OrderListing, OrderPlacementService, ReconcileReport};
