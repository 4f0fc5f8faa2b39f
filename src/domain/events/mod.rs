//! Domain events
use crate::domain::value_objects::Money;

#[derive(Clone, Debug, PartialEq)]
pub enum DomainEvent {
    Cart(CartEvent),
    Order(OrderEvent),
}

#[derive(Clone, Debug, PartialEq)]
pub enum CartEvent {
    Created { cart_id: String },
    ItemAdded { cart_id: String, index: usize },
    QuantityUpdated { cart_id: String, index: usize, qty: u32 },
    ItemRemoved { cart_id: String, index: usize },
    Cleared { cart_id: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum OrderEvent {
    Placed { order_id: String, cart_id: String, total: Money },
    PaymentDeclined { cart_id: String, reason: String },
}

impl DomainEvent {
    /// Emits the event on the `pizzeria::events` tracing target.
    pub fn log(&self) {
        match self {
            DomainEvent::Cart(e) => tracing::debug!(target: "pizzeria::events", event = ?e, "cart event"),
            DomainEvent::Order(OrderEvent::Placed { order_id, cart_id, total }) => {
                tracing::info!(target: "pizzeria::events", %order_id, %cart_id, %total, "order placed")
            }
            DomainEvent::Order(OrderEvent::PaymentDeclined { cart_id, reason }) => {
                tracing::warn!(target: "pizzeria::events", %cart_id, %reason, "payment declined")
            }
        }
    }
}
