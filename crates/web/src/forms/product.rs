//! Product create/edit form.

use std::str::FromStr;

use minishop_core::Amount;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::api::{Product, ProductInput};

use super::FieldErrors;

/// Raw product form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    pub stock: String,
}

impl ProductForm {
    /// Pre-fill the edit form from a fetched product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price.input_value(),
            stock: product.stock.to_string(),
        }
    }

    /// Check required fields and parse price and stock.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when a field is missing or not a valid number.
    pub fn validate(&self) -> Result<ProductInput, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = errors.require("name", &self.name);

        let raw_price = errors.require("price", &self.price);
        let price = if raw_price.is_empty() {
            None
        } else {
            match parse_price(raw_price) {
                Ok(price) => Some(price),
                Err(message) => {
                    errors.add("price", message);
                    None
                }
            }
        };

        let raw_stock = errors.require("stock", &self.stock);
        let stock = if raw_stock.is_empty() {
            None
        } else {
            match raw_stock.parse::<u32>() {
                Ok(stock) => Some(stock),
                Err(_) => {
                    errors.add("stock", "Le stock doit être un nombre entier positif.");
                    None
                }
            }
        };

        match (price, stock) {
            (Some(price), Some(stock)) if errors.is_empty() => Ok(ProductInput {
                name: name.to_string(),
                price,
                stock,
            }),
            _ => Err(errors),
        }
    }
}

/// Parse a price typed as `12500`, `12 500`, `19.9` or `19,9`.
fn parse_price(raw: &str) -> Result<Amount, &'static str> {
    let normalized: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    let value = Decimal::from_str(&normalized).map_err(|_| "Le prix doit être un nombre.")?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err("Le prix ne peut pas être négatif.");
    }
    Ok(Amount::new(value))
}
