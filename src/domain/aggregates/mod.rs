//! Aggregates module
pub mod order;
pub mod cart;

pub use order::{CustomerInfo, Order, OrderStatus, PricedItem};
pub use cart::{Cart, CartItem, DrinkItem, PizzaCustomization, PizzaItem};
