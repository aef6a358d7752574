//! Cache types for shop API query responses.

use super::types::{Client, MonthlySale, Order, Product, ServerStats, User};

/// Cache key, one per cached query.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Clients,
    Products,
    Orders,
    Users,
    DashboardStats,
    MonthlySales,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Clients(Vec<Client>),
    Products(Vec<Product>),
    Orders(Vec<Order>),
    Users(Vec<User>),
    DashboardStats(Box<ServerStats>),
    MonthlySales(Vec<MonthlySale>),
}
