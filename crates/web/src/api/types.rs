//! Domain records mirrored from the shop API, and mutation inputs.
//!
//! Records are transient: they are fetched per request (or served from the
//! query cache) and never written locally.

use minishop_core::{Amount, ClientId, Email, OrderId, OrderLineId, ProductId, Role, UserId};
use secrecy::SecretString;

/// Records that can be filtered by name in list views.
pub trait Named {
    /// The display name matched by the search box.
    fn name(&self) -> &str;
}

// =============================================================================
// Records
// =============================================================================

/// A shop customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// A product offered by a seller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Amount,
    pub stock: u32,
    pub seller: UserRef,
}

/// Short reference to a user embedded in another record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    pub id: UserId,
    pub username: String,
}

/// An application user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    /// `None` when the API returns an empty or unknown role.
    pub role: Option<Role>,
}

impl User {
    /// Whether the user can be chosen as the seller of an order.
    #[must_use]
    pub fn is_seller(&self) -> bool {
        self.role == Some(Role::Seller)
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    /// ISO 8601 timestamp as sent by the API.
    pub date: String,
    pub total: Amount,
    pub seller: UserRef,
    pub lines: Vec<OrderLine>,
}

/// One product line of an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub id: OrderLineId,
    pub product: ProductRef,
    pub quantity: u32,
}

/// Product as embedded in an order line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRef {
    pub id: ProductId,
    pub name: String,
    pub price: Amount,
}

/// Aggregates computed by the API (`dashboardStats`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerStats {
    pub total_orders: i64,
    pub total_sales: Amount,
    pub total_clients: i64,
    pub best_seller: Option<String>,
    /// ISO 8601 timestamp of the most recent order.
    pub last_order: Option<String>,
    pub top_products: Vec<ProductQuantity>,
}

/// A product name with a sold quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuantity {
    pub name: String,
    pub quantity: i64,
}

/// Quantity of one product sold during one month (`produitsVendusParMois`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlySale {
    pub product: String,
    /// English month name, as returned by the API.
    pub month: String,
    pub quantity: i64,
}

impl Named for Client {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Product {
    fn name(&self) -> &str {
        &self.name
    }
}

// =============================================================================
// Mutation Inputs
// =============================================================================

/// Client fields sent by `createClient` and `updateClient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInput {
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub address: String,
}

/// Product fields sent by `createProduit` and `updateProduit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInput {
    pub name: String,
    pub price: Amount,
    pub stock: u32,
}

/// Order sent by `createCommande`. The API computes the total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderInput {
    pub seller_id: UserId,
    pub lines: Vec<OrderLineInput>,
}

/// One line of an [`OrderInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLineInput {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Account creation sent by `registerUser`.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub password: SecretString,
    pub email: Option<Email>,
    pub role: Role,
}
