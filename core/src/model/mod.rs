// storefront/core/src/model/mod.rs

//! Catalog, identity and order records shared by the stores and the
//! placement workflow.

pub mod ids;
pub mod order;
pub mod product;
pub mod user;

pub use ids::{parse_id, OrderId};
pub use order::{Expanded, NewOrder, Order, OrderStatus, OrderView};
pub use product::{Product, ProductFilter, ProductSort, ProductStatus, ProductSummary};
pub use user::{NewUser, Role, User, UserSummary};
