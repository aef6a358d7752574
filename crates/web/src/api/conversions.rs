//! Conversions from generated GraphQL response types to domain records.
//!
//! Lists come back as `[T]` with nullable items; null items are skipped.
//! Identifiers, amounts and quantities that do not fit the domain types are
//! reported as [`ApiError::Decode`].

use std::str::FromStr;

use minishop_core::{Amount, IdParseError, Role};

use super::ApiError;
use super::queries::{
    all_clients, all_commandes, all_produits, all_utilisateurs, dashboard_stats,
    produits_vendus_par_mois,
};
use super::types::{
    Client, MonthlySale, Order, OrderLine, Product, ProductQuantity, ProductRef, ServerStats,
    User, UserRef,
};

fn parse_id<T>(raw: &str) -> Result<T, ApiError>
where
    T: FromStr<Err = IdParseError>,
{
    raw.parse::<T>().map_err(|e| ApiError::Decode(e.to_string()))
}

fn parse_amount(value: f64, field: &str) -> Result<Amount, ApiError> {
    Amount::from_f64(value)
        .ok_or_else(|| ApiError::Decode(format!("{field} is not a finite number: {value}")))
}

fn parse_count(value: i64, field: &str) -> Result<u32, ApiError> {
    u32::try_from(value).map_err(|_| ApiError::Decode(format!("{field} out of range: {value}")))
}

fn non_null<T>(items: Option<Vec<Option<T>>>) -> impl Iterator<Item = T> {
    items.into_iter().flatten().flatten()
}

// =============================================================================
// Clients
// =============================================================================

pub fn convert_client(c: all_clients::AllClientsAllClients) -> Result<Client, ApiError> {
    Ok(Client {
        id: parse_id(&c.id)?,
        name: c.nom,
        email: c.email,
        phone: c.telephone,
        address: c.adresse,
    })
}

pub fn convert_clients(
    items: Option<Vec<Option<all_clients::AllClientsAllClients>>>,
) -> Result<Vec<Client>, ApiError> {
    non_null(items).map(convert_client).collect()
}

// =============================================================================
// Products
// =============================================================================

pub fn convert_product(p: all_produits::AllProduitsAllProduits) -> Result<Product, ApiError> {
    Ok(Product {
        id: parse_id(&p.id)?,
        name: p.nom,
        price: parse_amount(p.prix, "prix")?,
        stock: parse_count(p.stock, "stock")?,
        seller: UserRef {
            id: parse_id(&p.vendeur.id)?,
            username: p.vendeur.username,
        },
    })
}

pub fn convert_products(
    items: Option<Vec<Option<all_produits::AllProduitsAllProduits>>>,
) -> Result<Vec<Product>, ApiError> {
    non_null(items).map(convert_product).collect()
}

// =============================================================================
// Orders
// =============================================================================

fn convert_order_line(
    l: all_commandes::AllCommandesAllCommandesLignes,
) -> Result<OrderLine, ApiError> {
    Ok(OrderLine {
        id: parse_id(&l.id)?,
        product: ProductRef {
            id: parse_id(&l.produit.id)?,
            name: l.produit.nom,
            price: parse_amount(l.produit.prix, "prix")?,
        },
        quantity: parse_count(l.quantite, "quantite")?,
    })
}

pub fn convert_order(o: all_commandes::AllCommandesAllCommandes) -> Result<Order, ApiError> {
    Ok(Order {
        id: parse_id(&o.id)?,
        date: o.date,
        total: parse_amount(o.total, "total")?,
        seller: UserRef {
            id: parse_id(&o.vendeur.id)?,
            username: o.vendeur.username,
        },
        lines: non_null(o.lignes)
            .map(convert_order_line)
            .collect::<Result<_, _>>()?,
    })
}

pub fn convert_orders(
    items: Option<Vec<Option<all_commandes::AllCommandesAllCommandes>>>,
) -> Result<Vec<Order>, ApiError> {
    non_null(items).map(convert_order).collect()
}

// =============================================================================
// Users
// =============================================================================

pub fn convert_user(u: all_utilisateurs::AllUtilisateursAllUtilisateurs) -> Result<User, ApiError> {
    Ok(User {
        id: parse_id(&u.id)?,
        username: u.username,
        email: u.email,
        role: u.role.as_deref().and_then(|r| Role::parse(r).ok()),
    })
}

pub fn convert_users(
    items: Option<Vec<Option<all_utilisateurs::AllUtilisateursAllUtilisateurs>>>,
) -> Result<Vec<User>, ApiError> {
    non_null(items).map(convert_user).collect()
}

// =============================================================================
// Statistics
// =============================================================================

pub fn convert_dashboard_stats(
    s: Option<dashboard_stats::DashboardStatsDashboardStats>,
) -> Result<ServerStats, ApiError> {
    let Some(s) = s else {
        return Ok(ServerStats::default());
    };

    Ok(ServerStats {
        total_orders: s.total_commandes.unwrap_or_default(),
        total_sales: s
            .total_ventes
            .map(|v| parse_amount(v, "totalVentes"))
            .transpose()?
            .unwrap_or_default(),
        total_clients: s.total_clients.unwrap_or_default(),
        best_seller: s.produit_le_plus_vendu,
        last_order: s.derniere_commande,
        top_products: non_null(s.top_produits)
            .map(|t| ProductQuantity {
                name: t.nom.unwrap_or_default(),
                quantity: t.quantite.unwrap_or_default(),
            })
            .collect(),
    })
}

pub fn convert_monthly_sales(
    items: Option<Vec<Option<produits_vendus_par_mois::ProduitsVendusParMoisProduitsVendusParMois>>>,
) -> Vec<MonthlySale> {
    non_null(items)
        .map(|m| MonthlySale {
            product: m.produit.unwrap_or_default(),
            month: m.mois.unwrap_or_default(),
            quantity: m.quantite.unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use minishop_core::{ClientId, UserId};

    use super::*;

    fn raw_client(id: &str) -> all_clients::AllClientsAllClients {
        all_clients::AllClientsAllClients {
            id: id.to_string(),
            nom: "Rakoto".to_string(),
            email: "rakoto@example.mg".to_string(),
            telephone: "034 00 000 00".to_string(),
            adresse: "Antananarivo".to_string(),
        }
    }

    #[test]
    fn test_convert_clients_skips_null_items() {
        let clients = convert_clients(Some(vec![Some(raw_client("1")), None])).unwrap();
        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].id, ClientId::new(1));
        assert_eq!(clients[0].name, "Rakoto");
    }

    #[test]
    fn test_convert_clients_null_list() {
        assert!(convert_clients(None).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_id_is_decode_error() {
        let err = convert_clients(Some(vec![Some(raw_client("Q2xpZW50OjE="))])).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn test_negative_stock_is_decode_error() {
        let raw = all_produits::AllProduitsAllProduits {
            id: "3".to_string(),
            nom: "Riz".to_string(),
            prix: 2500.0,
            stock: -1,
            vendeur: all_produits::AllProduitsAllProduitsVendeur {
                id: "1".to_string(),
                username: "vendeur1".to_string(),
            },
        };
        assert!(matches!(convert_product(raw), Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_convert_user_role() {
        let user = convert_user(all_utilisateurs::AllUtilisateursAllUtilisateurs {
            id: "7".to_string(),
            username: "soa".to_string(),
            email: String::new(),
            role: Some("VENDEUR".to_string()),
        })
        .unwrap();
        assert_eq!(user.id, UserId::new(7));
        assert!(user.is_seller());

        let user = convert_user(all_utilisateurs::AllUtilisateursAllUtilisateurs {
            id: "8".to_string(),
            username: "root".to_string(),
            email: String::new(),
            role: None,
        })
        .unwrap();
        assert_eq!(user.role, None);
    }

    #[test]
    fn test_convert_dashboard_stats_defaults() {
        assert_eq!(convert_dashboard_stats(None).unwrap(), ServerStats::default());
    }
}
