//! Order Aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::aggregates::cart::CartItem;
use crate::domain::events::{DomainEvent, OrderEvent};
use crate::domain::payment::Authorization;
use crate::domain::pricing::{LinePrice, Totals};
use crate::domain::value_objects::{prefixed_id, Money};
use crate::Result;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
pub struct CustomerInfo {
    #[validate(length(min = 2, max = 80))]
    pub full_name: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 7, max = 30))]
    pub phone: String,
    #[validate(length(min = 3, max = 120))]
    pub address_line1: String,
    #[serde(default)]
    #[validate(length(max = 120))]
    pub address_line2: String,
    #[validate(length(min = 2, max = 60))]
    pub city: String,
    #[validate(length(min = 2, max = 30))]
    pub state: String,
    #[validate(length(min = 3, max = 15))]
    pub postal_code: String,
}

impl CustomerInfo {
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        Ok(())
    }
}

/// A cart line with the price it carried when it was rendered or ordered.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PricedItem {
    #[serde(flatten)]
    pub item: CartItem,
    pub unit_price: Money,
    pub line_total: Money,
}

impl PricedItem {
    pub fn new(item: CartItem, price: LinePrice) -> Self {
        Self { item, unit_price: price.unit_price, line_total: price.line_total }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus { #[default] Placed }

/// Frozen record of a paid cart. Never mutated after creation.
#[derive(Clone, Debug, Serialize)]
pub struct Order {
    #[serde(rename = "order_id")]
    id: String,
    #[serde(rename = "created_at_utc")]
    created_at: DateTime<Utc>,
    customer: CustomerInfo,
    items: Vec<PricedItem>,
    totals: Totals,
    payment: Authorization,
    status: OrderStatus,
}

impl Order {
    /// Builds the order and the `Placed` event announcing it.
    pub fn place(
        cart_id: &str,
        customer: CustomerInfo,
        items: Vec<PricedItem>,
        totals: Totals,
        payment: Authorization,
    ) -> (Self, DomainEvent) {
        let order = Self {
            id: prefixed_id("order", 12),
            created_at: Utc::now(),
            customer, items, totals, payment,
            status: OrderStatus::Placed,
        };
        let event = DomainEvent::Order(OrderEvent::Placed {
            order_id: order.id.clone(),
            cart_id: cart_id.to_string(),
            total: order.totals.total,
        });
        (order, event)
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn customer(&self) -> &CustomerInfo { &self.customer }
    pub fn items(&self) -> &[PricedItem] { &self.items }
    pub fn totals(&self) -> &Totals { &self.totals }
    pub fn payment(&self) -> &Authorization { &self.payment }
    pub fn status(&self) -> OrderStatus { self.status }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::aggregates::cart::DrinkItem;
    use crate::domain::value_objects::DrinkType;
    use crate::PizzeriaError;
    use rust_decimal_macros::dec;

    pub(crate) fn customer() -> CustomerInfo {
        CustomerInfo {
            full_name: "Dana Rivera".into(),
            email: Some("dana@example.com".into()),
            phone: "512-555-0199".into(),
            address_line1: "100 Congress Ave".into(),
            address_line2: String::new(),
            city: "Austin".into(),
            state: "TX".into(),
            postal_code: "78701".into(),
        }
    }

    #[test]
    fn test_customer_validation() {
        assert!(customer().check().is_ok());
        let mut bad = customer();
        bad.email = Some("not-an-email".into());
        assert!(matches!(bad.check(), Err(PizzeriaError::ValidationFailed(_))));
        let mut short = customer();
        short.phone = "555".into();
        assert!(short.check().is_err());
        let mut anonymous = customer();
        anonymous.email = None;
        assert!(anonymous.check().is_ok());
    }

    #[test]
    fn test_place_builds_frozen_order() {
        let price = LinePrice { unit_price: Money::new(dec!(1.50)), line_total: Money::new(dec!(3.00)) };
        let items = vec![PricedItem::new(CartItem::Drink(DrinkItem::new(DrinkType::Water, 2)), price)];
        let totals = Totals { subtotal: Money::new(dec!(3.00)), tax: Money::new(dec!(0.25)), total: Money::new(dec!(3.25)) };
        let auth = Authorization::Approved { auth_id: "cash".into(), amount: totals.total, card_last4: None };
        let (order, event) = Order::place("cart_abc", customer(), items, totals, auth);

        assert!(order.id().starts_with("order_"));
        assert_eq!(order.status(), OrderStatus::Placed);
        assert_eq!(order.items()[0].line_total.amount(), dec!(3.00));
        assert!(matches!(event, DomainEvent::Order(OrderEvent::Placed { ref cart_id, .. }) if cart_id == "cart_abc"));

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["status"], "placed");
        assert_eq!(json["items"][0]["kind"], "drink");
        assert_eq!(json["items"][0]["unit_price"], 1.5);
        assert!(json["order_id"].as_str().unwrap().starts_with("order_"));
        assert!(json.get("created_at_utc").is_some());
    }
}
