//! Pizzeria ordering backend
//!
//! Menu, customizable pizza carts, pricing and order placement behind a
//! mock payment authorizer. State lives in process memory.
//!
//! ## Features
//! - Menu and price table
//! - Carts of pizzas and drinks addressed by position
//! - Subtotal, tax and total at cent precision
//! - Mock card, cash and gift card authorization
//! - Order ledger with frozen, re-priced line items

pub mod api;
pub mod config;
pub mod domain;
pub mod service;
pub mod store;

use serde::Serialize;
use thiserror::Error;

pub use config::Config;
pub use domain::value_objects::Money;
pub use service::Storefront;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum PizzeriaError {
    #[error("Cart not found: {0}")]
    CartNotFound(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Invalid index {index} for cart with {len} items")]
    InvalidIndex { index: usize, len: usize },

    #[error("Invalid topping: {0}")]
    InvalidTopping(String),

    #[error("Drink cannot be 'none' as an item")]
    InvalidDrinkSelection,

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Missing card fields: {}", .0.join(", "))]
    MissingPaymentFields(Vec<String>),

    #[error("Missing gift card code")]
    MissingGiftCardCode,

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Price table error: {0}")]
    PriceTable(String),
}

/// Stable, machine-readable error categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NotFound,
    InvalidIndex,
    InvalidTopping,
    InvalidDrinkSelection,
    EmptyCart,
    MissingPaymentFields,
    MissingGiftCardCode,
    ValidationFailed,
    Configuration,
}

impl PizzeriaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CartNotFound(_) | Self::OrderNotFound(_) => ErrorKind::NotFound,
            Self::InvalidIndex { .. } => ErrorKind::InvalidIndex,
            Self::InvalidTopping(_) => ErrorKind::InvalidTopping,
            Self::InvalidDrinkSelection => ErrorKind::InvalidDrinkSelection,
            Self::EmptyCart => ErrorKind::EmptyCart,
            Self::MissingPaymentFields(_) => ErrorKind::MissingPaymentFields,
            Self::MissingGiftCardCode => ErrorKind::MissingGiftCardCode,
            Self::ValidationFailed(_) => ErrorKind::ValidationFailed,
            Self::PriceTable(_) => ErrorKind::Configuration,
        }
    }
}

impl From<validator::ValidationErrors> for PizzeriaError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::ValidationFailed(errors.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PizzeriaError>;
