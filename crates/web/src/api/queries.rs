//! GraphQL operation definitions for the shop API.

use graphql_client::GraphQLQuery;

// Scalar types must be declared in the module where the derives expand.
// Names match the schema scalars exactly.
type DateTime = String;
#[allow(dead_code)]
type GenericScalar = serde_json::Value;

// Clients
#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/schema.graphql",
    query_path = "graphql/queries/clients.graphql",
    response_derives = "Debug, Clone"
)]
pub struct AllClients;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/schema.graphql",
    query_path = "graphql/queries/clients.graphql",
    response_derives = "Debug, Clone"
)]
pub struct CreateClient;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/schema.graphql",
    query_path = "graphql/queries/clients.graphql",
    response_derives = "Debug, Clone"
)]
pub struct UpdateClient;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/schema.graphql",
    query_path = "graphql/queries/clients.graphql",
    response_derives = "Debug, Clone"
)]
pub struct DeleteClient;

// Products
#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/schema.graphql",
    query_path = "graphql/queries/products.graphql",
    response_derives = "Debug, Clone"
)]
pub struct AllProduits;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/schema.graphql",
    query_path = "graphql/queries/products.graphql",
    response_derives = "Debug, Clone"
)]
pub struct CreateProduit;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/schema.graphql",
    query_path = "graphql/queries/products.graphql",
    response_derives = "Debug, Clone"
)]
pub struct UpdateProduit;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/schema.graphql",
    query_path = "graphql/queries/products.graphql",
    response_derives = "Debug, Clone"
)]
pub struct DeleteProduit;

// Orders
#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/schema.graphql",
    query_path = "graphql/queries/orders.graphql",
    response_derives = "Debug, Clone"
)]
pub struct AllCommandes;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/schema.graphql",
    query_path = "graphql/queries/orders.graphql",
    response_derives = "Debug, Clone"
)]
pub struct CreateCommande;

// Users
#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/schema.graphql",
    query_path = "graphql/queries/users.graphql",
    response_derives = "Debug, Clone"
)]
pub struct AllUtilisateurs;

// Statistics
#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/schema.graphql",
    query_path = "graphql/queries/stats.graphql",
    response_derives = "Debug, Clone"
)]
pub struct DashboardStats;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/schema.graphql",
    query_path = "graphql/queries/stats.graphql",
    response_derives = "Debug, Clone"
)]
pub struct ProduitsVendusParMois;

// Authentication
#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/schema.graphql",
    query_path = "graphql/queries/auth.graphql",
    response_derives = "Debug, Clone"
)]
pub struct TokenAuth;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/schema.graphql",
    query_path = "graphql/queries/auth.graphql",
    response_derives = "Debug, Clone"
)]
pub struct RegisterUser;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/schema.graphql",
    query_path = "graphql/queries/auth.graphql",
    response_derives = "Debug, Clone"
)]
pub struct ChangePassword;
