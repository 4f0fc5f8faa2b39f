//! Cart Aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::events::{CartEvent, DomainEvent};
use crate::domain::toppings;
use crate::domain::value_objects::{
    prefixed_id, BakeLevel, CheeseLevel, CrustFlavor, CrustType, CutStyle, DrinkType, Drizzle, PizzaSize, SauceType,
};
use crate::{PizzeriaError, Result};

fn default_qty() -> u32 { 1 }
fn default_pizza_name() -> String { "Custom Pizza".to_string() }

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
pub struct PizzaCustomization {
    pub size: PizzaSize,
    pub crust: CrustType,
    pub sauce: SauceType,
    pub cheese: CheeseLevel,
    #[serde(default)]
    pub bake: BakeLevel,
    #[serde(default)]
    pub cut: CutStyle,
    #[serde(default)]
    pub crust_flavor: CrustFlavor,
    #[serde(default)]
    pub drizzle: Drizzle,
    #[serde(default)]
    pub toppings: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub instructions: String,
}

impl PizzaCustomization {
    pub fn new(size: PizzaSize, crust: CrustType, sauce: SauceType, cheese: CheeseLevel) -> Self {
        Self {
            size, crust, sauce, cheese,
            bake: BakeLevel::default(), cut: CutStyle::default(),
            crust_flavor: CrustFlavor::default(), drizzle: Drizzle::default(),
            toppings: vec![], instructions: String::new(),
        }
    }

    pub fn with_toppings<I, S>(mut self, toppings: I) -> Self
    where I: IntoIterator<Item = S>, S: Into<String> {
        self.toppings = toppings.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
pub struct PizzaItem {
    #[serde(default = "default_pizza_name")]
    #[validate(length(min = 1, max = 80))]
    pub name: String,
    pub customization: PizzaCustomization,
    #[serde(default = "default_qty")]
    #[validate(range(min = 1, max = 20))]
    pub qty: u32,
}

impl PizzaItem {
    pub fn new(customization: PizzaCustomization, qty: u32) -> Self {
        Self { name: default_pizza_name(), customization, qty }
    }

    pub fn check(&self) -> Result<()> {
        self.validate()?;
        self.customization.validate()?;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
pub struct DrinkItem {
    pub drink: DrinkType,
    #[serde(default = "default_qty")]
    #[validate(range(min = 1, max = 20))]
    pub qty: u32,
}

impl DrinkItem {
    pub fn new(drink: DrinkType, qty: u32) -> Self { Self { drink, qty } }

    pub fn check(&self) -> Result<()> {
        self.validate()?;
        Ok(())
    }
}

/// One cart line. Lines are never merged, even when identical.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CartItem {
    Pizza(PizzaItem),
    Drink(DrinkItem),
}

impl CartItem {
    pub fn qty(&self) -> u32 {
        match self {
            CartItem::Pizza(p) => p.qty,
            CartItem::Drink(d) => d.qty,
        }
    }

    fn set_qty(&mut self, qty: u32) {
        match self {
            CartItem::Pizza(p) => p.qty = qty,
            CartItem::Drink(d) => d.qty = qty,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Cart {
    id: String,
    items: Vec<CartItem>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    events: Vec<DomainEvent>,
}

impl Cart {
    pub fn new() -> Self {
        let id = prefixed_id("cart", 12);
        let now = Utc::now();
        let mut cart = Self { id: id.clone(), items: vec![], created_at: now, updated_at: now, events: vec![] };
        cart.raise_event(DomainEvent::Cart(CartEvent::Created { cart_id: id }));
        cart
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn items(&self) -> &[CartItem] { &self.items }
    pub fn item_count(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }

    /// Toppings are validated and deduplicated on the item before it is appended.
    pub fn add_pizza(&mut self, mut item: PizzaItem) -> Result<()> {
        item.customization.toppings = toppings::validate(&item.customization.toppings)?;
        self.push(CartItem::Pizza(item));
        Ok(())
    }

    pub fn add_drink(&mut self, item: DrinkItem) -> Result<()> {
        if item.drink.is_sentinel() { return Err(PizzeriaError::InvalidDrinkSelection); }
        self.push(CartItem::Drink(item));
        Ok(())
    }

    pub fn update_quantity(&mut self, index: usize, qty: u32) -> Result<()> {
        let len = self.items.len();
        let item = self.items.get_mut(index).ok_or(PizzeriaError::InvalidIndex { index, len })?;
        item.set_qty(qty);
        self.touch();
        self.raise_event(DomainEvent::Cart(CartEvent::QuantityUpdated { cart_id: self.id.clone(), index, qty }));
        Ok(())
    }

    /// Later items shift down by one position.
    pub fn remove_item(&mut self, index: usize) -> Result<CartItem> {
        if index >= self.items.len() {
            return Err(PizzeriaError::InvalidIndex { index, len: self.items.len() });
        }
        let removed = self.items.remove(index);
        self.touch();
        self.raise_event(DomainEvent::Cart(CartEvent::ItemRemoved { cart_id: self.id.clone(), index }));
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.touch();
        self.raise_event(DomainEvent::Cart(CartEvent::Cleared { cart_id: self.id.clone() }));
    }

    fn push(&mut self, item: CartItem) {
        self.items.push(item);
        self.touch();
        let index = self.items.len() - 1;
        self.raise_event(DomainEvent::Cart(CartEvent::ItemAdded { cart_id: self.id.clone(), index }));
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
    fn touch(&mut self) { self.updated_at = Utc::now(); }
}

impl Default for Cart {
    fn default() -> Self { Self::new() }
}
