//! Storefront service: the operations the HTTP shell exposes.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::domain::aggregates::{Cart, CartItem, CustomerInfo, DrinkItem, Order, PizzaItem, PricedItem};
use crate::domain::events::{DomainEvent, OrderEvent};
use crate::domain::payment::{self, Authorization, PaymentInfo};
use crate::domain::pricing::{PriceTable, Totals};
use crate::domain::toppings::{self, TOPPINGS};
use crate::domain::value_objects::DrinkType;
use crate::store::{flush_events, CartStore, OrderLedger};
use crate::{PizzeriaError, Result};

#[derive(Clone, Debug, Serialize)]
pub struct Menu {
    pub toppings: Vec<&'static str>,
    pub drinks: Vec<DrinkType>,
    pub prices: PriceTable,
}

#[derive(Clone, Debug, Serialize)]
pub struct CartView {
    pub cart_id: String,
    pub items: Vec<PricedItem>,
}

#[derive(Clone, Debug, Serialize)]
pub struct CartWithTotals {
    pub cart: CartView,
    pub totals: Totals,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct UpdateQtyRequest {
    pub index: usize,
    #[validate(range(min = 1, max = 20))]
    pub qty: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RemoveItemRequest {
    pub index: usize,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub cart_id: String,
    pub customer: CustomerInfo,
    pub payment: PaymentInfo,
}

/// What the customer sees after a decline; the cart stays as it was.
#[derive(Clone, Debug, Serialize)]
pub struct DeclinedSummary {
    pub cart: CartView,
    pub totals: Totals,
    pub customer: CustomerInfo,
}

#[derive(Clone, Debug)]
pub enum PlaceOrderOutcome {
    Placed(Order),
    Declined { payment: Authorization, summary: DeclinedSummary },
}

#[derive(Clone)]
pub struct Storefront {
    prices: Arc<PriceTable>,
    carts: Arc<CartStore>,
    orders: Arc<OrderLedger>,
}

impl Storefront {
    pub fn new(prices: PriceTable) -> Self {
        Self { prices: Arc::new(prices), carts: Arc::new(CartStore::new()), orders: Arc::new(OrderLedger::new()) }
    }

    pub fn menu(&self) -> Menu {
        Menu { toppings: TOPPINGS.to_vec(), drinks: DrinkType::ALL.to_vec(), prices: (*self.prices).clone() }
    }

    fn view(&self, cart: &Cart) -> Result<CartView> {
        let items = cart.items()
            .iter()
            .map(|item| Ok(PricedItem::new(item.clone(), self.prices.price_line(item)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(CartView { cart_id: cart.id().to_string(), items })
    }

    fn render(&self, cart: &Cart) -> Result<CartWithTotals> {
        Ok(CartWithTotals { cart: self.view(cart)?, totals: self.prices.compute_totals(cart)? })
    }

    pub async fn create_cart(&self) -> Result<CartView> {
        let cart = self.carts.create().await;
        tracing::info!(cart_id = %cart.id(), "cart created");
        self.view(&cart)
    }

    pub async fn get_cart(&self, cart_id: &str) -> Result<CartWithTotals> {
        self.render(&self.carts.get(cart_id).await?)
    }

    pub async fn add_pizza(&self, cart_id: &str, item: PizzaItem) -> Result<CartWithTotals> {
        item.check()?;
        self.render(&self.carts.add_pizza(cart_id, item).await?)
    }

    pub async fn add_drink(&self, cart_id: &str, item: DrinkItem) -> Result<CartWithTotals> {
        item.check()?;
        self.render(&self.carts.add_drink(cart_id, item).await?)
    }

    pub async fn update_quantity(&self, cart_id: &str, req: UpdateQtyRequest) -> Result<CartWithTotals> {
        req.validate()?;
        self.render(&self.carts.update_quantity(cart_id, req.index, req.qty).await?)
    }

    pub async fn remove_item(&self, cart_id: &str, req: RemoveItemRequest) -> Result<CartWithTotals> {
        self.render(&self.carts.remove_item(cart_id, req.index).await?)
    }

    pub async fn clear_cart(&self, cart_id: &str) -> Result<CartWithTotals> {
        self.render(&self.carts.clear(cart_id).await?)
    }

    /// Re-validates and re-prices every line into the list an order keeps.
    fn snapshot_items(&self, cart: &Cart) -> Result<Vec<PricedItem>> {
        cart.items()
            .iter()
            .map(|item| {
                let mut item = item.clone();
                if let CartItem::Pizza(pizza) = &mut item {
                    pizza.customization.toppings = toppings::validate(&pizza.customization.toppings)?;
                }
                let price = self.prices.price_line(&item)?;
                Ok(PricedItem::new(item, price))
            })
            .collect()
    }

    /// Holds the cart's lock for the whole placement, so one cart is never
    /// charged twice by concurrent calls.
    pub async fn place_order(&self, req: PlaceOrderRequest) -> Result<PlaceOrderOutcome> {
        req.customer.check()?;
        let mut cart = self.carts.lock(&req.cart_id).await?;
        if cart.is_empty() {
            return Err(PizzeriaError::EmptyCart);
        }

        let totals = self.prices.compute_totals(&cart)?;
        tracing::debug!(cart_id = %req.cart_id, method = ?req.payment.method(), total = %totals.total, "authorizing payment");
        let authorization = payment::authorize(&req.payment, totals.total)?;

        if let Authorization::Declined { reason } = &authorization {
            DomainEvent::Order(OrderEvent::PaymentDeclined { cart_id: req.cart_id.clone(), reason: reason.clone() }).log();
            let summary = DeclinedSummary { cart: self.view(&cart)?, totals, customer: req.customer };
            return Ok(PlaceOrderOutcome::Declined { payment: authorization, summary });
        }

        let items = self.snapshot_items(&cart)?;
        let (order, event) = Order::place(&req.cart_id, req.customer, items, totals, authorization);
        self.orders.record(order.clone()).await;
        event.log();

        cart.clear();
        flush_events(&mut cart);
        Ok(PlaceOrderOutcome::Placed(order))
    }

    pub async fn get_order(&self, order_id: &str) -> Result<Order> {
        self.orders.get(order_id).await
    }
}
