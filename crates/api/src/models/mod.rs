//! Domain models for the API.
//!
//! Serializable views of the rows the repositories manage. Input payloads
//! for create/update operations live next to the entity they target.

pub mod account;
pub mod cart;
pub mod category;
pub mod order;
pub mod product;
pub mod session;

pub use account::Account;
pub use cart::{Cart, CartItem, CartLineView, CartView, ProductSummary};
pub use category::Category;
pub use order::{AdminOrderView, Order, OrderItem, OrderLineView, OrderWithAccount};
pub use product::{CreateProductInput, Product, UpdateProductInput};
pub use session::CurrentUser;
