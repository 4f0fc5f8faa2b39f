//! Pricing engine
//!
//! Every amount is rounded to cents where it is computed: unit prices, line
//! totals, subtotal, tax and total each round on their own.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::domain::aggregates::cart::{Cart, CartItem, PizzaCustomization};
use crate::domain::toppings;
use crate::domain::value_objects::{CheeseLevel, CrustFlavor, CrustType, DrinkType, Drizzle, Money, PizzaSize};
use crate::{PizzeriaError, Result};

/// Largest surcharge or base price a table may carry. Keeps every line total
/// and tax computation far inside `Decimal` range.
pub const MAX_TABLE_AMOUNT: Decimal = dec!(10000);

/// Process-wide price configuration. Loaded once at startup, never mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    pub size: BTreeMap<PizzaSize, Money>,
    pub crust: BTreeMap<CrustType, Money>,
    pub cheese: BTreeMap<CheeseLevel, Money>,
    pub crust_flavor: BTreeMap<CrustFlavor, Money>,
    pub drizzle: BTreeMap<Drizzle, Money>,
    pub topping_each: Money,
    pub drink: BTreeMap<DrinkType, Money>,
    pub tax_rate: Decimal,
}

impl Default for PriceTable {
    fn default() -> Self {
        let m = |d: Decimal| Money::new(d);
        Self {
            size: BTreeMap::from([
                (PizzaSize::Small, m(dec!(10.00))),
                (PizzaSize::Medium, m(dec!(13.00))),
                (PizzaSize::Large, m(dec!(16.00))),
            ]),
            crust: BTreeMap::from([
                (CrustType::Thin, m(dec!(0.00))),
                (CrustType::HandTossed, m(dec!(0.00))),
                (CrustType::DeepDish, m(dec!(2.00))),
                (CrustType::GlutenFree, m(dec!(3.00))),
            ]),
            cheese: BTreeMap::from([
                (CheeseLevel::Light, m(dec!(-0.50))),
                (CheeseLevel::Normal, m(dec!(0.00))),
                (CheeseLevel::Extra, m(dec!(1.50))),
            ]),
            crust_flavor: BTreeMap::from([
                (CrustFlavor::None, m(dec!(0.00))),
                (CrustFlavor::GarlicButter, m(dec!(0.75))),
                (CrustFlavor::Sesame, m(dec!(0.50))),
            ]),
            drizzle: BTreeMap::from([
                (Drizzle::None, m(dec!(0.00))),
                (Drizzle::Ranch, m(dec!(0.75))),
                (Drizzle::HotHoney, m(dec!(0.95))),
            ]),
            topping_each: m(dec!(1.25)),
            drink: BTreeMap::from([
                (DrinkType::None, m(dec!(0.00))),
                (DrinkType::Coke, m(dec!(2.25))),
                (DrinkType::DietCoke, m(dec!(2.25))),
                (DrinkType::Sprite, m(dec!(2.25))),
                (DrinkType::Water, m(dec!(1.50))),
                (DrinkType::RootBeer, m(dec!(2.25))),
            ]),
            tax_rate: dec!(0.0825),
        }
    }
}

/// Subtotal, tax and grand total of a cart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

/// Price of a single line, as displayed next to the item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinePrice {
    pub unit_price: Money,
    pub line_total: Money,
}

fn lookup<K: Ord>(table: &BTreeMap<K, Money>, key: &K) -> Money {
    table.get(key).copied().unwrap_or(Money::ZERO)
}

impl PriceTable {
    /// Reads a table from a JSON file shaped like the menu's `prices` object.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| PizzeriaError::PriceTable(format!("{}: {}", path.display(), e)))?;
        let table: PriceTable = serde_json::from_str(&raw)
            .map_err(|e| PizzeriaError::PriceTable(format!("{}: {}", path.display(), e)))?;
        table.check_complete()?;
        Ok(table)
    }

    pub fn with_tax_rate(mut self, tax_rate: Decimal) -> Self {
        self.tax_rate = tax_rate;
        self
    }

    /// Every menu option must be priced; a gap would silently price at zero.
    pub fn check_complete(&self) -> Result<()> {
        let missing = |table: &str| Err(PizzeriaError::PriceTable(format!("incomplete '{}' table", table)));
        if self.size.len() != 3 { return missing("size"); }
        if self.crust.len() != 4 { return missing("crust"); }
        if self.cheese.len() != 3 { return missing("cheese"); }
        if self.crust_flavor.len() != 3 { return missing("crust_flavor"); }
        if self.drizzle.len() != 3 { return missing("drizzle"); }
        if self.drink.len() != DrinkType::ALL.len() { return missing("drink"); }
        if self.tax_rate.is_sign_negative() {
            return Err(PizzeriaError::PriceTable("tax_rate must not be negative".into()));
        }
        if self.tax_rate > Decimal::ONE {
            return Err(PizzeriaError::PriceTable(format!("tax_rate {} is above 1", self.tax_rate)));
        }
        let mut amounts = self.size.values()
            .chain(self.crust.values())
            .chain(self.cheese.values())
            .chain(self.crust_flavor.values())
            .chain(self.drizzle.values())
            .chain(self.drink.values())
            .chain(std::iter::once(&self.topping_each));
        if let Some(bad) = amounts.find(|m| m.amount().abs() > MAX_TABLE_AMOUNT) {
            return Err(PizzeriaError::PriceTable(format!("amount {} exceeds {}", bad, MAX_TABLE_AMOUNT)));
        }
        Ok(())
    }

    pub fn price_of_pizza(&self, custom: &PizzaCustomization) -> Result<Money> {
        let toppings = toppings::validate(&custom.toppings)?;
        let amount = lookup(&self.size, &custom.size).amount()
            + lookup(&self.crust, &custom.crust).amount()
            + lookup(&self.cheese, &custom.cheese).amount()
            + lookup(&self.crust_flavor, &custom.crust_flavor).amount()
            + lookup(&self.drizzle, &custom.drizzle).amount()
            + self.topping_each.amount() * Decimal::from(toppings.len());
        Ok(Money::new(amount))
    }

    pub fn price_of_drink(&self, drink: DrinkType) -> Money { lookup(&self.drink, &drink) }

    pub fn unit_price(&self, item: &CartItem) -> Result<Money> {
        match item {
            CartItem::Pizza(pizza) => self.price_of_pizza(&pizza.customization),
            CartItem::Drink(drink) => Ok(self.price_of_drink(drink.drink)),
        }
    }

    pub fn price_line(&self, item: &CartItem) -> Result<LinePrice> {
        let unit_price = self.unit_price(item)?;
        Ok(LinePrice { unit_price, line_total: unit_price.multiply(item.qty()) })
    }

    pub fn cart_subtotal(&self, cart: &Cart) -> Result<Money> {
        cart.items()
            .iter()
            .map(|item| self.price_line(item).map(|p| p.line_total))
            .sum::<Result<Money>>()
    }

    pub fn totals_for_subtotal(&self, subtotal: Money) -> Totals {
        let tax = subtotal.apply_rate(self.tax_rate);
        Totals { subtotal, tax, total: subtotal.add(tax) }
    }

    pub fn compute_totals(&self, cart: &Cart) -> Result<Totals> {
        Ok(self.totals_for_subtotal(self.cart_subtotal(cart)?))
    }
}
