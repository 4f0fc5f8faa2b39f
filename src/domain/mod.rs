//! Pizza storefront domain: menu values, pricing, payment rules and aggregates
pub mod aggregates;
pub mod events;
pub mod payment;
pub mod pricing;
pub mod toppings;
pub mod value_objects;
