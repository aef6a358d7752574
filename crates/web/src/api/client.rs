//! Shop API client implementation.
//!
//! Uses `graphql_client` for type-safe queries with `reqwest` 0.13 for HTTP.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use graphql_client::{GraphQLQuery, Response};
use minishop_core::{ClientId, ProductId, UserId};
use moka::future::Cache;
use reqwest::header::AUTHORIZATION;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};
use url::Url;

use crate::config::ApiConfig;

use super::cache::{CacheKey, CacheValue};
use super::conversions::{
    convert_clients, convert_dashboard_stats, convert_monthly_sales, convert_orders,
    convert_products, convert_users,
};
use super::queries::{
    AllClients, AllCommandes, AllProduits, AllUtilisateurs, ChangePassword, CreateClient,
    CreateCommande, CreateProduit, DashboardStats, DeleteClient, DeleteProduit,
    ProduitsVendusParMois, RegisterUser, TokenAuth, UpdateClient, UpdateProduit, all_clients,
    all_commandes, all_produits, all_utilisateurs, change_password, create_client,
    create_commande, create_produit, dashboard_stats, delete_client, delete_produit,
    produits_vendus_par_mois, register_user, token_auth, update_client, update_produit,
};
use super::types::{
    Client, ClientInput, MonthlySale, Order, OrderInput, Product, ProductInput, Registration,
    ServerStats, User,
};
use super::{ApiError, GraphQLError, GraphQLErrorLocation};

/// Maximum number of cached query results.
const CACHE_CAPACITY: u64 = 64;

/// Body excerpt length kept in logs and error messages.
const BODY_EXCERPT_CHARS: usize = 200;

/// Client for the shop GraphQL API.
///
/// Cheap to clone. List and aggregate queries are cached for the configured
/// TTL; every successful mutation clears the cache. A result fetched before
/// a mutation finished is never stored after it.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    endpoint: Url,
    /// `None` when the cache TTL is zero.
    cache: Option<Cache<CacheKey, CacheValue>>,
    /// Bumped by every invalidation.
    generation: AtomicU64,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let cache = (!config.cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(config.cache_ttl)
                .build()
        });

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                endpoint: config.url.clone(),
                cache,
                generation: AtomicU64::new(0),
            }),
        })
    }

    /// The GraphQL endpoint this client talks to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Execute a GraphQL operation.
    async fn execute<Q: GraphQLQuery>(
        &self,
        token: Option<&SecretString>,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ApiError>
    where
        Q::Variables: serde::Serialize,
    {
        let request_body = Q::build_query(variables);

        let mut request = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .header("Content-Type", "application/json")
            .json(&request_body);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("JWT {}", token.expose_secret()));
        }

        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                operation = request_body.operation_name,
                body = %excerpt(&response_text),
                "Shop API returned non-success status"
            );
            return Err(ApiError::single(format!(
                "HTTP {status}: {}",
                excerpt(&response_text)
            )));
        }

        let response: Response<Q::ResponseData> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    operation = request_body.operation_name,
                    body = %excerpt(&response_text),
                    "Failed to parse shop API response"
                );
                return Err(ApiError::Parse(e));
            }
        };

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            debug!(errors = ?errors, "GraphQL errors in response");

            return Err(ApiError::GraphQL(
                errors
                    .into_iter()
                    .map(|e| GraphQLError {
                        message: e.message,
                        locations: e.locations.map_or_else(Vec::new, |locs| {
                            locs.into_iter()
                                .map(|l| GraphQLErrorLocation {
                                    line: i64::from(l.line),
                                    column: i64::from(l.column),
                                })
                                .collect()
                        }),
                        path: e.path.map_or_else(Vec::new, |p| {
                            p.into_iter()
                                .map(|fragment| match fragment {
                                    graphql_client::PathFragment::Key(s) => {
                                        serde_json::Value::String(s)
                                    }
                                    graphql_client::PathFragment::Index(i) => {
                                        serde_json::Value::Number(i.into())
                                    }
                                })
                                .collect()
                        }),
                    })
                    .collect(),
            ));
        }

        response.data.ok_or_else(|| {
            tracing::error!(
                operation = request_body.operation_name,
                body = %excerpt(&response_text),
                "Shop API response has no data and no errors"
            );
            ApiError::single("No data in response")
        })
    }

    async fn cached(&self, key: CacheKey) -> Option<CacheValue> {
        let value = self.inner.cache.as_ref()?.get(&key).await;
        if value.is_some() {
            debug!(?key, "Cache hit");
        }
        value
    }

    /// Snapshot of the invalidation counter, taken before a fetch.
    fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::Acquire)
    }

    /// Cache `value` unless the cache was invalidated since `generation`.
    async fn store(&self, generation: u64, key: CacheKey, value: CacheValue) {
        let Some(cache) = &self.inner.cache else {
            return;
        };
        if self.generation() != generation {
            debug!(?key, "Skipping cache store, invalidated during fetch");
            return;
        }
        cache.insert(key, value).await;
        // An invalidation between the check and the insert must still win
        if self.generation() != generation {
            cache.invalidate(&key).await;
        }
    }

    /// Drop every cached query result.
    ///
    /// Called after each successful mutation so the follow-up list fetch
    /// sees the new state. Fetches still in flight will not store their
    /// (older) results.
    pub fn invalidate(&self) {
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
        if let Some(cache) = &self.inner.cache {
            cache.invalidate_all();
            debug!("Query cache invalidated");
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Exchange credentials for an API token (`tokenAuth`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the credentials are rejected.
    #[instrument(skip(self, password))]
    pub async fn token_auth(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<SecretString, ApiError> {
        let variables = token_auth::Variables {
            username: username.to_string(),
            password: password.expose_secret().to_string(),
        };

        let response = self.execute::<TokenAuth>(None, variables).await?;

        response
            .token_auth
            .map(|t| SecretString::from(t.token))
            .ok_or_else(|| ApiError::single("No token in response"))
    }

    /// Create an account (`registerUser`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the account.
    #[instrument(skip(self, registration), fields(username = %registration.username))]
    pub async fn register_user(&self, registration: &Registration) -> Result<(), ApiError> {
        let variables = register_user::Variables {
            username: registration.username.clone(),
            password: registration.password.expose_secret().to_string(),
            email: registration.email.as_ref().map(|e| e.as_str().to_string()),
            role: registration.role.code().to_string(),
        };

        let response = self.execute::<RegisterUser>(None, variables).await?;
        self.invalidate();

        if let Some(user) = response.register_user.and_then(|r| r.utilisateur) {
            tracing::info!(user_id = %user.id, "User registered");
        }
        Ok(())
    }

    /// Change the password of the token's user (`changePassword`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the old password is wrong,
    /// or the API does not confirm the change.
    #[instrument(skip_all)]
    pub async fn change_password(
        &self,
        token: &SecretString,
        old_password: &SecretString,
        new_password: &SecretString,
    ) -> Result<(), ApiError> {
        let variables = change_password::Variables {
            old_password: old_password.expose_secret().to_string(),
            new_password: new_password.expose_secret().to_string(),
        };

        let response = self.execute::<ChangePassword>(Some(token), variables).await?;

        match response.change_password.and_then(|r| r.success) {
            Some(true) => Ok(()),
            _ => Err(ApiError::single("Le mot de passe n'a pas été modifié.")),
        }
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// All users (`allUtilisateurs`).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip_all)]
    pub async fn users(&self, token: &SecretString) -> Result<Vec<User>, ApiError> {
        if let Some(CacheValue::Users(users)) = self.cached(CacheKey::Users).await {
            return Ok(users);
        }
        let generation = self.generation();

        let response = self
            .execute::<AllUtilisateurs>(Some(token), all_utilisateurs::Variables)
            .await?;
        let users = convert_users(response.all_utilisateurs)?;

        self.store(
            generation,
            CacheKey::Users,
            CacheValue::Users(users.clone()),
        )
        .await;
        Ok(users)
    }

    // =========================================================================
    // Clients
    // =========================================================================

    /// All clients (`allClients`).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip_all)]
    pub async fn clients(&self, token: &SecretString) -> Result<Vec<Client>, ApiError> {
        if let Some(CacheValue::Clients(clients)) = self.cached(CacheKey::Clients).await {
            return Ok(clients);
        }
        let generation = self.generation();

        let response = self
            .execute::<AllClients>(Some(token), all_clients::Variables)
            .await?;
        let clients = convert_clients(response.all_clients)?;

        self.store(
            generation,
            CacheKey::Clients,
            CacheValue::Clients(clients.clone()),
        )
        .await;
        Ok(clients)
    }

    /// Create a client (`createClient`). Blank phone and address are sent as `null`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or rejects the client.
    #[instrument(skip(self, token, input), fields(name = %input.name))]
    pub async fn create_client(
        &self,
        token: &SecretString,
        input: &ClientInput,
    ) -> Result<(), ApiError> {
        let variables = create_client::Variables {
            nom: input.name.clone(),
            email: input.email.as_str().to_string(),
            telephone: non_blank(&input.phone),
            adresse: non_blank(&input.address),
        };

        let response = self.execute::<CreateClient>(Some(token), variables).await?;
        self.invalidate();

        if let Some(client) = response.create_client.and_then(|r| r.client) {
            tracing::info!(client_id = %client.id, "Client created");
        }
        Ok(())
    }

    /// Update a client (`updateClient`). Every field is sent as given.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or rejects the update.
    #[instrument(skip(self, token, input), fields(client_id = %id))]
    pub async fn update_client(
        &self,
        token: &SecretString,
        id: ClientId,
        input: &ClientInput,
    ) -> Result<(), ApiError> {
        let variables = update_client::Variables {
            id: id.to_string(),
            nom: Some(input.name.clone()),
            email: Some(input.email.as_str().to_string()),
            telephone: Some(input.phone.clone()),
            adresse: Some(input.address.clone()),
        };

        self.execute::<UpdateClient>(Some(token), variables).await?;
        self.invalidate();
        tracing::info!("Client updated");
        Ok(())
    }

    /// Delete a client (`deleteClient`).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or does not confirm the deletion.
    #[instrument(skip(self, token), fields(client_id = %id))]
    pub async fn delete_client(&self, token: &SecretString, id: ClientId) -> Result<(), ApiError> {
        let variables = delete_client::Variables { id: id.to_string() };

        let response = self.execute::<DeleteClient>(Some(token), variables).await?;
        self.invalidate();

        confirm_deleted(response.delete_client.and_then(|r| r.ok))
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// All products (`allProduits`).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip_all)]
    pub async fn products(&self, token: &SecretString) -> Result<Vec<Product>, ApiError> {
        if let Some(CacheValue::Products(products)) = self.cached(CacheKey::Products).await {
            return Ok(products);
        }
        let generation = self.generation();

        let response = self
            .execute::<AllProduits>(Some(token), all_produits::Variables)
            .await?;
        let products = convert_products(response.all_produits)?;

        self.store(
            generation,
            CacheKey::Products,
            CacheValue::Products(products.clone()),
        )
        .await;
        Ok(products)
    }

    /// Create a product owned by `seller_id` (`createProduit`).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or rejects the product.
    #[instrument(skip(self, token, input), fields(name = %input.name, seller_id = %seller_id))]
    pub async fn create_product(
        &self,
        token: &SecretString,
        seller_id: UserId,
        input: &ProductInput,
    ) -> Result<(), ApiError> {
        let variables = create_produit::Variables {
            nom: input.name.clone(),
            prix: input.price.to_f64(),
            stock: i64::from(input.stock),
            vendeur_id: seller_id.as_i64(),
        };

        let response = self.execute::<CreateProduit>(Some(token), variables).await?;
        self.invalidate();

        if let Some(product) = response.create_produit.and_then(|r| r.produit) {
            tracing::info!(product_id = %product.id, "Product created");
        }
        Ok(())
    }

    /// Update a product (`updateProduit`).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or rejects the update.
    #[instrument(skip(self, token, input), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        token: &SecretString,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<(), ApiError> {
        let variables = update_produit::Variables {
            id: id.to_string(),
            nom: Some(input.name.clone()),
            prix: Some(input.price.to_f64()),
            stock: Some(i64::from(input.stock)),
        };

        self.execute::<UpdateProduit>(Some(token), variables).await?;
        self.invalidate();
        tracing::info!("Product updated");
        Ok(())
    }

    /// Delete a product (`deleteProduit`).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or does not confirm the deletion.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn delete_product(
        &self,
        token: &SecretString,
        id: ProductId,
    ) -> Result<(), ApiError> {
        let variables = delete_produit::Variables { id: id.to_string() };

        let response = self.execute::<DeleteProduit>(Some(token), variables).await?;
        self.invalidate();

        confirm_deleted(response.delete_produit.and_then(|r| r.ok))
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Order history (`allCommandes`).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip_all)]
    pub async fn orders(&self, token: &SecretString) -> Result<Vec<Order>, ApiError> {
        if let Some(CacheValue::Orders(orders)) = self.cached(CacheKey::Orders).await {
            return Ok(orders);
        }
        let generation = self.generation();

        let response = self
            .execute::<AllCommandes>(Some(token), all_commandes::Variables)
            .await?;
        let orders = convert_orders(response.all_commandes)?;

        self.store(
            generation,
            CacheKey::Orders,
            CacheValue::Orders(orders.clone()),
        )
        .await;
        Ok(orders)
    }

    /// Place an order (`createCommande`). The API computes the total.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or rejects the order.
    #[instrument(skip(self, token, input), fields(seller_id = %input.seller_id, lines = input.lines.len()))]
    pub async fn create_order(
        &self,
        token: &SecretString,
        input: &OrderInput,
    ) -> Result<(), ApiError> {
        let variables = create_commande::Variables {
            vendeur_id: input.seller_id.to_string(),
            lignes: input
                .lines
                .iter()
                .map(|line| {
                    Some(create_commande::LigneCommandeInput {
                        produit_id: line.product_id.to_string(),
                        quantite: i64::from(line.quantity),
                    })
                })
                .collect(),
        };

        let response = self.execute::<CreateCommande>(Some(token), variables).await?;
        self.invalidate();

        if let Some(order) = response.create_commande.and_then(|r| r.commande) {
            tracing::info!(order_id = %order.id, total = order.total, "Order created");
        }
        Ok(())
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Server-side aggregates (`dashboardStats`).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip_all)]
    pub async fn dashboard_stats(&self, token: &SecretString) -> Result<ServerStats, ApiError> {
        if let Some(CacheValue::DashboardStats(stats)) = self.cached(CacheKey::DashboardStats).await
        {
            return Ok(*stats);
        }
        let generation = self.generation();

        let response = self
            .execute::<DashboardStats>(Some(token), dashboard_stats::Variables)
            .await?;
        let stats = convert_dashboard_stats(response.dashboard_stats)?;

        self.store(
            generation,
            CacheKey::DashboardStats,
            CacheValue::DashboardStats(Box::new(stats.clone())),
        )
        .await;
        Ok(stats)
    }

    /// Quantities sold per product and month (`produitsVendusParMois`).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip_all)]
    pub async fn monthly_sales(&self, token: &SecretString) -> Result<Vec<MonthlySale>, ApiError> {
        if let Some(CacheValue::MonthlySales(sales)) = self.cached(CacheKey::MonthlySales).await {
            return Ok(sales);
        }
        let generation = self.generation();

        let response = self
            .execute::<ProduitsVendusParMois>(Some(token), produits_vendus_par_mois::Variables)
            .await?;
        let sales = convert_monthly_sales(response.produits_vendus_par_mois);

        self.store(
            generation,
            CacheKey::MonthlySales,
            CacheValue::MonthlySales(sales.clone()),
        )
        .await;
        Ok(sales)
    }
}

/// Blank strings become `null` on the wire.
fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn confirm_deleted(ok: Option<bool>) -> Result<(), ApiError> {
    if ok == Some(true) {
        tracing::info!("Record deleted");
        Ok(())
    } else {
        Err(ApiError::single("La suppression n'a pas été confirmée."))
    }
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(""), None);
        assert_eq!(non_blank("   "), None);
        assert_eq!(non_blank(" 034 "), Some("034".to_string()));
    }

    #[test]
    fn test_confirm_deleted() {
        assert!(confirm_deleted(Some(true)).is_ok());
        assert!(confirm_deleted(Some(false)).is_err());
        assert!(confirm_deleted(None).is_err());
    }

    #[test]
    fn test_excerpt_truncates_on_char_boundary() {
        let body = "é".repeat(BODY_EXCERPT_CHARS + 10);
        assert_eq!(excerpt(&body).chars().count(), BODY_EXCERPT_CHARS);
    }

    fn cached_client() -> ApiClient {
        let config = ApiConfig {
            url: Url::parse("http://127.0.0.1:9/graphql/").unwrap(),
            timeout: std::time::Duration::from_secs(1),
            cache_ttl: std::time::Duration::from_secs(60),
        };
        ApiClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_store_keeps_result_without_invalidation() {
        let client = cached_client();

        let generation = client.generation();
        client
            .store(generation, CacheKey::Clients, CacheValue::Clients(vec![]))
            .await;

        assert!(client.cached(CacheKey::Clients).await.is_some());
    }

    #[tokio::test]
    async fn test_fetch_overlapping_mutation_is_not_cached() {
        let client = cached_client();

        // Fetch starts, a mutation invalidates, then the older result lands
        let generation = client.generation();
        client.invalidate();
        client
            .store(generation, CacheKey::Clients, CacheValue::Clients(vec![]))
            .await;

        assert!(client.cached(CacheKey::Clients).await.is_none());

        // The next fetch starts after the mutation and may be cached
        let generation = client.generation();
        client
            .store(generation, CacheKey::Clients, CacheValue::Clients(vec![]))
            .await;
        assert!(client.cached(CacheKey::Clients).await.is_some());
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let config = ApiConfig {
            url: Url::parse("http://127.0.0.1:9/graphql/").unwrap(),
            timeout: std::time::Duration::from_secs(1),
            cache_ttl: std::time::Duration::ZERO,
        };
        let client = ApiClient::new(&config).unwrap();
        assert!(client.inner.cache.is_none());
        assert_eq!(client.endpoint().path(), "/graphql/");
    }
}
