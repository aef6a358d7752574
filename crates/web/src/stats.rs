//! Figures shown on the dashboard and statistics pages.
//!
//! The dashboard is computed locally from the order history; the statistics
//! page shows the API's own aggregates. Both present their top products
//! with the share of each within the top list.

use minishop_core::Amount;

use crate::api::{MonthlySale, Order, ProductQuantity};

/// Number of products listed in a top list.
pub const TOP_PRODUCTS: usize = 5;

/// Dashboard figures computed from `allCommandes`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardSummary {
    pub order_count: usize,
    pub sales_total: Amount,
    pub top_products: Vec<ProductShare>,
}

/// A product with its ordered quantity and its share of the top list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductShare {
    pub name: String,
    pub quantity: u64,
    /// Rounded percentage of the top-list total.
    pub percent: u64,
}

/// Count orders, sum their totals and rank products by ordered quantity.
///
/// Products are grouped by name. Ties keep the order in which the products
/// first appear in the history.
#[must_use]
pub fn summarize_orders(orders: &[Order]) -> DashboardSummary {
    let mut quantities: Vec<(String, u64)> = Vec::new();
    for line in orders.iter().flat_map(|o| &o.lines) {
        let quantity = u64::from(line.quantity);
        match quantities
            .iter_mut()
            .find(|(name, _)| *name == line.product.name)
        {
            Some((_, total)) => *total += quantity,
            None => quantities.push((line.product.name.clone(), quantity)),
        }
    }
    quantities.sort_by(|a, b| b.1.cmp(&a.1));
    quantities.truncate(TOP_PRODUCTS);

    DashboardSummary {
        order_count: orders.len(),
        sales_total: orders.iter().map(|o| o.total).sum(),
        top_products: with_shares(quantities),
    }
}

/// Attach shares to the API's top products (negative quantities count as zero).
#[must_use]
pub fn server_top_products(items: &[ProductQuantity]) -> Vec<ProductShare> {
    with_shares(
        items
            .iter()
            .take(TOP_PRODUCTS)
            .map(|p| (p.name.clone(), u64::try_from(p.quantity).unwrap_or(0)))
            .collect(),
    )
}

fn with_shares(items: Vec<(String, u64)>) -> Vec<ProductShare> {
    let total: u64 = items.iter().map(|(_, q)| q).sum();
    items
        .into_iter()
        .map(|(name, quantity)| ProductShare {
            percent: percent(quantity, total),
            name,
            quantity,
        })
        .collect()
}

/// `part / total` as a percentage rounded half up.
fn percent(part: u64, total: u64) -> u64 {
    if total == 0 {
        0
    } else {
        (part * 200 + total) / (total * 2)
    }
}

/// Quantities per product (rows) and month (columns).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthlyTable {
    /// Month labels in the order the API returned them.
    pub months: Vec<String>,
    pub rows: Vec<MonthlyRow>,
}

/// One product row of a [`MonthlyTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyRow {
    pub product: String,
    /// One cell per month; `0` when nothing was sold.
    pub quantities: Vec<i64>,
}

/// Pivot `produitsVendusParMois` into a table.
#[must_use]
pub fn monthly_table(sales: &[MonthlySale]) -> MonthlyTable {
    let mut months: Vec<String> = Vec::new();
    for sale in sales {
        let label = month_label(&sale.month);
        if !months.contains(&label) {
            months.push(label);
        }
    }

    let mut rows: Vec<MonthlyRow> = Vec::new();
    for sale in sales {
        let label = month_label(&sale.month);
        let Some(column) = months.iter().position(|m| *m == label) else {
            continue;
        };
        if !rows.iter().any(|r| r.product == sale.product) {
            rows.push(MonthlyRow {
                product: sale.product.clone(),
                quantities: vec![0; months.len()],
            });
        }
        let Some(row) = rows.iter_mut().find(|r| r.product == sale.product) else {
            continue;
        };
        if let Some(cell) = row.quantities.get_mut(column) {
            *cell += sale.quantity;
        }
    }

    MonthlyTable { months, rows }
}

/// French label for an English month name; unknown names pass through.
#[must_use]
pub fn month_label(month: &str) -> String {
    const MONTHS: [(&str, &str); 12] = [
        ("january", "Janvier"),
        ("february", "Février"),
        ("march", "Mars"),
        ("april", "Avril"),
        ("may", "Mai"),
        ("june", "Juin"),
        ("july", "Juillet"),
        ("august", "Août"),
        ("september", "Septembre"),
        ("october", "Octobre"),
        ("november", "Novembre"),
        ("december", "Décembre"),
    ];

    let key = month.trim().to_lowercase();
    MONTHS
        .iter()
        .find(|(english, _)| *english == key)
        .map_or_else(|| month.to_string(), |(_, french)| (*french).to_string())
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use minishop_core::{OrderId, OrderLineId, ProductId, UserId};
    use rust_decimal::Decimal;

    use super::*;
    use crate::api::{OrderLine, ProductRef, UserRef};

    fn order(id: i64, total: i64, lines: &[(&str, u32)]) -> Order {
        Order {
            id: OrderId::new(id),
            date: "2025-06-01T10:00:00+00:00".to_string(),
            total: Amount::new(Decimal::from(total)),
            seller: UserRef {
                id: UserId::new(1),
                username: "vendeur".to_string(),
            },
            lines: lines
                .iter()
                .enumerate()
                .map(|(i, (name, quantity))| OrderLine {
                    id: OrderLineId::new(i64::try_from(i).unwrap_or_default()),
                    product: ProductRef {
                        id: ProductId::new(1),
                        name: (*name).to_string(),
                        price: Amount::ZERO,
                    },
                    quantity: *quantity,
                })
                .collect(),
        }
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(summarize_orders(&[]), DashboardSummary::default());
    }

    #[test]
    fn test_summary() {
        let orders = vec![
            order(1, 10_000, &[("Riz", 2), ("Vanille", 1)]),
            order(2, 5_500, &[("Vanille", 3)]),
        ];
        let summary = summarize_orders(&orders);
        assert_eq!(summary.order_count, 2);
        assert_eq!(summary.sales_total, Amount::new(Decimal::from(15_500)));
        assert_eq!(summary.top_products.len(), 2);
        assert_eq!(summary.top_products[0].name, "Vanille");
        assert_eq!(summary.top_products[0].quantity, 4);
        assert_eq!(summary.top_products[0].percent, 67);
        assert_eq!(summary.top_products[1].percent, 33);
    }

    #[test]
    fn test_top_five_keeps_first_seen_on_ties() {
        let orders = vec![order(
            1,
            0,
            &[("A", 1), ("B", 1), ("C", 1), ("D", 1), ("E", 1), ("F", 1), ("G", 9)],
        )];
        let names: Vec<String> = summarize_orders(&orders)
            .top_products
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["G", "A", "B", "C", "D"]);
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(0, 0), 0);
    }

    #[test]
    fn test_server_top_products() {
        let shares = server_top_products(&[
            ProductQuantity {
                name: "Riz".to_string(),
                quantity: 3,
            },
            ProductQuantity {
                name: "Sel".to_string(),
                quantity: -1,
            },
        ]);
        assert_eq!(shares[0].percent, 100);
        assert_eq!(shares[1].quantity, 0);
    }

    #[test]
    fn test_monthly_table() {
        let sale = |product: &str, month: &str, quantity| MonthlySale {
            product: product.to_string(),
            month: month.to_string(),
            quantity,
        };
        let table = monthly_table(&[
            sale("Riz", "May", 4),
            sale("Vanille", "May", 1),
            sale("Riz", "June", 2),
        ]);
        assert_eq!(table.months, ["Mai", "Juin"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].quantities, [4, 2]);
        assert_eq!(table.rows[1].quantities, [1, 0]);
    }

    #[test]
    fn test_monthly_table_adds_repeated_cells() {
        let sale = |product: &str, month: &str, quantity| MonthlySale {
            product: product.to_string(),
            month: month.to_string(),
            quantity,
        };
        let table = monthly_table(&[
            sale("Riz", "June", 2),
            sale("Sel", "July", 1),
            sale("Riz", "June", 3),
        ]);
        assert_eq!(table.months, ["Juin", "Juillet"]);
        let rows: Vec<(&str, &[i64])> = table
            .rows
            .iter()
            .map(|r| (r.product.as_str(), r.quantities.as_slice()))
            .collect();
        assert_eq!(rows, [("Riz", &[5, 0][..]), ("Sel", &[0, 1][..])]);
    }

    #[test]
    fn test_month_label_passthrough() {
        assert_eq!(month_label("August"), "Août");
        assert_eq!(month_label("Brumaire"), "Brumaire");
    }
}
