// storefront/core/src/lib.rs

//! Storefront: the order-placement workflow of a small e-commerce backend.
//!
//! The crate provides:
//!  - A named-step async pipeline (`Pipeline<TData, Err>`) with before/on/after
//!    hooks and early stopping, plus a type-keyed registry of pipelines (`Workflows`).
//!  - The catalog, identity and order records.
//!  - Store capabilities (`CatalogStore`, `IdentityStore`, `OrderLedger`), an
//!    in-memory adapter, and the bounded process-local `FallbackStore`.
//!  - `OrderPlacementService`, which validates an order, reserves stock with an
//!    atomic conditional decrement, and records the order durably or, when the
//!    ledger is down, in the fallback store.
/*
    Placement flow:
    validate_order_request -> resolve_buyer -> resolve_product -> check_stock
      -> price_order -> reserve_stock -> record_order
    Each step short-circuits the run with a PlacementError.
*/

pub mod core;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod placement;
pub mod registry;
pub mod store;

pub use crate::core::context::Handler;
pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::step::StepDef;

pub use crate::pipeline::definition::Pipeline;
pub use crate::registry::Workflows;

pub use crate::error::PipelineError;

pub use crate::placement::{
  ListingSource, OrderListing, OrderPlacementService, PlaceOrderRequest, Placement, PlacementError, ReconcileReport,
};
pub use crate::store::{
  CatalogStore, FallbackError, FallbackStore, IdentityStore, MemoryStore, OrderLedger, StockDecrement, StoreError,
  StoreResult,
};
