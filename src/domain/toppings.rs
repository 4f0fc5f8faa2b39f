//! Topping catalog and validation

use crate::{PizzeriaError, Result};

/// The closed set of toppings a pizza may carry, in menu order.
pub const TOPPINGS: [&str; 12] = [
    "pepperoni", "sausage", "bacon", "ham",
    "mushrooms", "onions", "green_peppers", "jalapenos",
    "black_olives", "pineapple", "spinach", "tomatoes",
];

pub fn is_known(topping: &str) -> bool { TOPPINGS.contains(&topping) }

/// Rejects the first topping outside the catalog, then drops repeats while
/// keeping each topping's first position.
pub fn validate<S: AsRef<str>>(toppings: &[S]) -> Result<Vec<String>> {
    if let Some(bad) = toppings.iter().map(AsRef::as_ref).find(|t| !is_known(t)) {
        return Err(PizzeriaError::InvalidTopping(bad.to_string()));
    }
    let mut clean: Vec<String> = Vec::with_capacity(toppings.len());
    for topping in toppings.iter().map(AsRef::as_ref) {
        if !clean.iter().any(|seen| seen == topping) {
            clean.push(topping.to_string());
        }
    }
    Ok(clean)
}
