//! In-memory cart store and order ledger
//!
//! Each cart sits behind its own async mutex, so every read-modify-write on a
//! cart (and a whole order placement) runs with exclusive access to it.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::domain::aggregates::{Cart, DrinkItem, Order, PizzaItem};
use crate::{PizzeriaError, Result};

pub(crate) fn flush_events(cart: &mut Cart) {
    for event in cart.take_events() {
        event.log();
    }
}

#[derive(Default)]
pub struct CartStore {
    carts: RwLock<HashMap<String, Arc<Mutex<Cart>>>>,
}

impl CartStore {
    pub fn new() -> Self { Self::default() }

    pub async fn create(&self) -> Cart {
        let mut cart = Cart::new();
        flush_events(&mut cart);
        self.carts.write().await.insert(cart.id().to_string(), Arc::new(Mutex::new(cart.clone())));
        cart
    }

    /// Exclusive access to one cart, held until the guard drops.
    pub async fn lock(&self, cart_id: &str) -> Result<OwnedMutexGuard<Cart>> {
        let handle = self.carts.read().await.get(cart_id).cloned()
            .ok_or_else(|| PizzeriaError::CartNotFound(cart_id.to_string()))?;
        Ok(handle.lock_owned().await)
    }

    pub async fn get(&self, cart_id: &str) -> Result<Cart> {
        Ok(self.lock(cart_id).await?.clone())
    }

    /// Runs `f` under the cart's lock and returns the cart as it stands afterwards.
    async fn mutate<F>(&self, cart_id: &str, f: F) -> Result<Cart>
    where F: FnOnce(&mut Cart) -> Result<()> {
        let mut cart = self.lock(cart_id).await?;
        f(&mut *cart)?;
        flush_events(&mut *cart);
        Ok(cart.clone())
    }

    pub async fn add_pizza(&self, cart_id: &str, item: PizzaItem) -> Result<Cart> {
        self.mutate(cart_id, |cart| cart.add_pizza(item)).await
    }

    pub async fn add_drink(&self, cart_id: &str, item: DrinkItem) -> Result<Cart> {
        self.mutate(cart_id, |cart| cart.add_drink(item)).await
    }

    pub async fn update_quantity(&self, cart_id: &str, index: usize, qty: u32) -> Result<Cart> {
        self.mutate(cart_id, |cart| cart.update_quantity(index, qty)).await
    }

    pub async fn remove_item(&self, cart_id: &str, index: usize) -> Result<Cart> {
        self.mutate(cart_id, |cart| cart.remove_item(index).map(|_| ())).await
    }

    pub async fn clear(&self, cart_id: &str) -> Result<Cart> {
        self.mutate(cart_id, |cart| { cart.clear(); Ok(()) }).await
    }

    pub async fn len(&self) -> usize { self.carts.read().await.len() }
}

#[derive(Default)]
pub struct OrderLedger {
    orders: RwLock<HashMap<String, Order>>,
}

impl OrderLedger {
    pub fn new() -> Self { Self::default() }

    pub async fn record(&self, order: Order) {
        self.orders.write().await.insert(order.id().to_string(), order);
    }

    pub async fn get(&self, order_id: &str) -> Result<Order> {
        self.orders.read().await.get(order_id).cloned()
            .ok_or_else(|| PizzeriaError::OrderNotFound(order_id.to_string()))
    }

    pub async fn len(&self) -> usize { self.orders.read().await.len() }
}
