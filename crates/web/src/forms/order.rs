//! New-order form with a variable number of lines.
//!
//! The page posts every line as repeated `product_id` / `quantity` fields, in
//! document order, plus the `action` of the button that was pressed. Adding
//! or removing a line re-renders the form without calling the API.

use minishop_core::{ProductId, UserId};

use crate::api::{OrderInput, OrderLineInput};

use super::{FieldErrors, REQUIRED, line_key};

/// Quantity pre-filled on new lines.
pub const DEFAULT_QUANTITY: &str = "1";

/// Button pressed on the order form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    /// Validate and place the order.
    Submit,
    /// Append an empty line.
    AddLine,
    /// Remove the line at this index.
    RemoveLine(usize),
}

impl OrderAction {
    fn parse(raw: &str) -> Self {
        match raw {
            "add_line" => Self::AddLine,
            other => other
                .strip_prefix("remove_line:")
                .and_then(|index| index.parse().ok())
                .map_or(Self::Submit, Self::RemoveLine),
        }
    }
}

/// One raw order line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLineForm {
    pub product_id: String,
    pub quantity: String,
}

impl Default for OrderLineForm {
    fn default() -> Self {
        Self {
            product_id: String::new(),
            quantity: DEFAULT_QUANTITY.to_string(),
        }
    }
}

/// Raw order form state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderForm {
    pub seller_id: String,
    pub lines: Vec<OrderLineForm>,
}

impl Default for OrderForm {
    /// No seller and a single line with quantity 1.
    fn default() -> Self {
        Self {
            seller_id: String::new(),
            lines: vec![OrderLineForm::default()],
        }
    }
}

impl OrderForm {
    /// Rebuild the form from posted pairs and return the pressed button.
    #[must_use]
    pub fn from_pairs(pairs: &[(String, String)]) -> (Self, OrderAction) {
        let mut seller_id = String::new();
        let mut products = Vec::new();
        let mut quantities = Vec::new();
        let mut action = OrderAction::Submit;

        for (key, value) in pairs {
            match key.as_str() {
                "seller_id" => seller_id.clone_from(value),
                "product_id" => products.push(value.clone()),
                "quantity" => quantities.push(value.clone()),
                "action" => action = OrderAction::parse(value),
                _ => {}
            }
        }

        let count = products.len().max(quantities.len());
        let mut products = products.into_iter();
        let mut quantities = quantities.into_iter();
        let mut lines: Vec<OrderLineForm> = (0..count)
            .map(|_| OrderLineForm {
                product_id: products.next().unwrap_or_default(),
                quantity: quantities.next().unwrap_or_default(),
            })
            .collect();
        if lines.is_empty() {
            lines.push(OrderLineForm::default());
        }

        (Self { seller_id, lines }, action)
    }

    /// Append an empty line.
    pub fn add_line(&mut self) {
        self.lines.push(OrderLineForm::default());
    }

    /// Remove the line at `index`. The last remaining line is never removed.
    pub fn remove_line(&mut self, index: usize) {
        if self.lines.len() > 1 && index < self.lines.len() {
            self.lines.remove(index);
        }
    }

    /// Whether a line can be removed.
    #[must_use]
    pub fn can_remove_lines(&self) -> bool {
        self.lines.len() > 1
    }

    /// Check the seller and every line.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages, keyed `seller_id` and
    /// `lines.<index>.<field>`.
    pub fn validate(&self) -> Result<OrderInput, FieldErrors> {
        let mut errors = FieldErrors::new();

        let seller_id = parse_choice::<UserId>(
            &mut errors,
            "seller_id",
            &self.seller_id,
            "Choisissez un vendeur.",
        );

        if self.lines.is_empty() {
            errors.add("lines", "Ajoutez au moins un produit.");
        }

        let mut lines = Vec::with_capacity(self.lines.len());
        for (index, line) in self.lines.iter().enumerate() {
            let product_id = parse_choice::<ProductId>(
                &mut errors,
                &line_key(index, "product_id"),
                &line.product_id,
                "Choisissez un produit.",
            );

            let quantity_key = line_key(index, "quantity");
            let quantity = match line.quantity.trim() {
                "" => {
                    errors.add(quantity_key, REQUIRED);
                    None
                }
                raw => match raw.parse::<u32>() {
                    Ok(quantity) if quantity >= 1 => Some(quantity),
                    _ => {
                        errors.add(
                            quantity_key,
                            "La quantité doit être un nombre entier supérieur ou égal à 1.",
                        );
                        None
                    }
                },
            };

            if let (Some(product_id), Some(quantity)) = (product_id, quantity) {
                lines.push(OrderLineInput {
                    product_id,
                    quantity,
                });
            }
        }

        match seller_id {
            Some(seller_id) if errors.is_empty() => Ok(OrderInput { seller_id, lines }),
            _ => Err(errors),
        }
    }
}

/// Parse a `<select>` value holding an id; blank or malformed means "nothing chosen".
fn parse_choice<T>(errors: &mut FieldErrors, key: &str, raw: &str, message: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    let parsed = raw.trim().parse::<T>().ok();
    if parsed.is_none() {
        errors.add(key, message);
    }
    parsed
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_default_has_one_line() {
        let form = OrderForm::default();
        assert_eq!(form.lines.len(), 1);
        assert_eq!(form.lines[0].quantity, "1");
        assert!(!form.can_remove_lines());
    }

    #[test]
    fn test_from_pairs_pairs_lines_in_order() {
        let (form, action) = OrderForm::from_pairs(&pairs(&[
            ("seller_id", "2"),
            ("product_id", "5"),
            ("quantity", "3"),
            ("product_id", "9"),
            ("quantity", "1"),
            ("action", "submit"),
        ]));
        assert_eq!(action, OrderAction::Submit);
        assert_eq!(form.seller_id, "2");
        assert_eq!(form.lines.len(), 2);
        assert_eq!(form.lines[1].product_id, "9");

        let input = form.validate().unwrap();
        assert_eq!(input.seller_id, UserId::new(2));
        assert_eq!(
            input.lines,
            vec![
                OrderLineInput {
                    product_id: ProductId::new(5),
                    quantity: 3
                },
                OrderLineInput {
                    product_id: ProductId::new(9),
                    quantity: 1
                },
            ]
        );
    }

    #[test]
    fn test_actions() {
        assert_eq!(OrderAction::parse("add_line"), OrderAction::AddLine);
        assert_eq!(OrderAction::parse("remove_line:1"), OrderAction::RemoveLine(1));
        assert_eq!(OrderAction::parse("remove_line:x"), OrderAction::Submit);
        assert_eq!(OrderAction::parse("submit"), OrderAction::Submit);
    }

    #[test]
    fn test_add_and_remove_lines() {
        let mut form = OrderForm::default();
        form.add_line();
        form.add_line();
        assert_eq!(form.lines.len(), 3);
        form.lines[0].product_id = "1".to_string();
        form.remove_line(0);
        assert_eq!(form.lines.len(), 2);
        assert_eq!(form.lines[0].product_id, "");
        form.remove_line(7);
        assert_eq!(form.lines.len(), 2);
        form.remove_line(0);
        form.remove_line(0);
        assert_eq!(form.lines.len(), 1);
    }

    #[test]
    fn test_validation_errors() {
        let form = OrderForm {
            seller_id: String::new(),
            lines: vec![
                OrderLineForm {
                    product_id: String::new(),
                    quantity: "0".to_string(),
                },
                OrderLineForm {
                    product_id: "4".to_string(),
                    quantity: "2.5".to_string(),
                },
            ],
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("seller_id"), Some("Choisissez un vendeur."));
        assert_eq!(errors.line(0, "product_id"), Some("Choisissez un produit."));
        assert!(errors.line(0, "quantity").is_some());
        assert_eq!(errors.line(1, "product_id"), None);
        assert!(errors.line(1, "quantity").is_some());
    }

    #[test]
    fn test_empty_post_keeps_one_line() {
        let (form, _) = OrderForm::from_pairs(&[]);
        assert_eq!(form.lines.len(), 1);
    }
}
