//! Integration test harness for the MiniShop console.
//!
//! [`FakeApi`] is a small axum server that answers the console's GraphQL
//! operations from in-memory data and records every operation it receives.
//! [`TestApp`] starts the real console router against it on an ephemeral
//! port and drives it with a cookie-keeping HTTP client that does not follow
//! redirects, so tests can assert on `Location` headers.
//!
//! Seed accounts:
//!
//! | username | password   | role    |
//! |----------|------------|---------|
//! | `admin`  | `admin123` | admin   |
//! | `soa`    | `secret`   | vendeur |
//! | `bema`   | `bema`     | vendeur |

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::{Json, Router, extract::State, http::HeaderMap, routing::post};
use minishop_web::config::MiniShopConfig;
use minishop_web::state::AppState;
use reqwest::{Client, Response, header::LOCATION, redirect::Policy};
use serde_json::{Value, json};

/// Timestamp given to orders created through the fake API.
pub const NEW_ORDER_DATE: &str = "2025-06-02T09:30:00+00:00";

#[derive(Debug, Clone)]
struct FakeUser {
    id: i64,
    username: String,
    password: String,
    email: String,
    role: String,
}

#[derive(Debug, Clone)]
struct FakeClient {
    id: i64,
    nom: String,
    email: String,
    telephone: String,
    adresse: String,
}

#[derive(Debug, Clone)]
struct FakeProduct {
    id: i64,
    nom: String,
    prix: f64,
    stock: i64,
    vendeur_id: i64,
}

#[derive(Debug, Clone)]
struct FakeOrder {
    id: i64,
    date: String,
    vendeur_id: i64,
    lines: Vec<(i64, i64)>,
}

/// One operation received by the fake API.
#[derive(Debug, Clone)]
pub struct RecordedOperation {
    pub name: String,
    pub variables: Value,
    pub authorization: Option<String>,
}

#[derive(Debug, Default)]
struct FakeData {
    users: Vec<FakeUser>,
    clients: Vec<FakeClient>,
    products: Vec<FakeProduct>,
    orders: Vec<FakeOrder>,
    next_id: i64,
    log: Vec<RecordedOperation>,
    /// Operations answered with a GraphQL error instead of data.
    failing: Vec<String>,
    /// One-shot delays: the answer is computed on arrival, sent after the delay.
    delays: Vec<(String, Duration)>,
}

impl FakeData {
    fn seeded() -> Self {
        let user = |id, username: &str, password: &str, role: &str| FakeUser {
            id,
            username: username.to_string(),
            password: password.to_string(),
            email: format!("{username}@minishop.test"),
            role: role.to_string(),
        };
        let client = |id, nom: &str, telephone: &str| FakeClient {
            id,
            nom: nom.to_string(),
            email: format!("{}@exemple.mg", nom.to_lowercase().replace(' ', ".")),
            telephone: telephone.to_string(),
            adresse: "Antananarivo".to_string(),
        };

        Self {
            users: vec![
                user(1, "admin", "admin123", "admin"),
                user(2, "soa", "secret", "vendeur"),
                user(3, "bema", "bema", "vendeur"),
            ],
            clients: vec![
                client(1, "Rakoto Jean", "034 00 000 01"),
                client(2, "Rasoa Marie", "034 00 000 02"),
                client(3, "Bema Paul", ""),
            ],
            products: vec![
                FakeProduct {
                    id: 1,
                    nom: "Riz".to_string(),
                    prix: 2500.0,
                    stock: 100,
                    vendeur_id: 2,
                },
                FakeProduct {
                    id: 2,
                    nom: "Vanille".to_string(),
                    prix: 15000.0,
                    stock: 20,
                    vendeur_id: 2,
                },
            ],
            orders: vec![FakeOrder {
                id: 1,
                date: "2025-06-01T10:00:00+00:00".to_string(),
                vendeur_id: 2,
                lines: vec![(1, 4), (2, 1)],
            }],
            next_id: 100,
            ..Self::default()
        }
    }

    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn user_json(&self, id: i64) -> Value {
        self.users.iter().find(|u| u.id == id).map_or(Value::Null, |u| {
            json!({ "id": u.id.to_string(), "username": u.username, "email": u.email, "role": u.role })
        })
    }

    fn product(&self, id: i64) -> Option<&FakeProduct> {
        self.products.iter().find(|p| p.id == id)
    }

    fn product_json(&self, p: &FakeProduct) -> Value {
        json!({
            "id": p.id.to_string(),
            "nom": p.nom,
            "prix": p.prix,
            "stock": p.stock,
            "vendeur": self.user_json(p.vendeur_id),
        })
    }

    fn order_total(&self, order: &FakeOrder) -> f64 {
        order
            .lines
            .iter()
            .filter_map(|(product_id, quantity)| {
                self.product(*product_id)
                    .map(|p| p.prix * f64::from(u32::try_from(*quantity).unwrap_or(0)))
            })
            .sum()
    }

    fn order_json(&self, order: &FakeOrder) -> Value {
        let lines: Vec<Value> = order
            .lines
            .iter()
            .enumerate()
            .map(|(i, (product_id, quantity))| {
                let product = self.product(*product_id).map_or(Value::Null, |p| {
                    json!({ "id": p.id.to_string(), "nom": p.nom, "prix": p.prix })
                });
                json!({ "id": format!("{}{i}", order.id), "quantite": quantity, "produit": product })
            })
            .collect();

        json!({
            "id": order.id.to_string(),
            "date": order.date,
            "total": self.order_total(order),
            "vendeur": self.user_json(order.vendeur_id),
            "lignes": lines,
        })
    }

    fn quantities_by_product(&self) -> Vec<(String, i64)> {
        let mut totals: Vec<(String, i64)> = Vec::new();
        for (product_id, quantity) in self.orders.iter().flat_map(|o| &o.lines) {
            let Some(product) = self.product(*product_id) else {
                continue;
            };
            match totals.iter_mut().find(|(name, _)| *name == product.nom) {
                Some((_, total)) => *total += quantity,
                None => totals.push((product.nom.clone(), *quantity)),
            }
        }
        totals.sort_by(|a, b| b.1.cmp(&a.1));
        totals
    }

    fn authenticated_user(&self, authorization: Option<&str>) -> Option<&FakeUser> {
        let username = authorization?.strip_prefix("JWT token-")?;
        self.users.iter().find(|u| u.username == username)
    }

    /// Answer one operation: `Ok(data)` or `Err(message)`.
    fn answer(&mut self, name: &str, vars: &Value, authorization: Option<&str>) -> Result<Value, String> {
        if self.failing.iter().any(|op| op == name) {
            return Err(format!("{name} a échoué"));
        }

        let public = matches!(name, "TokenAuth" | "RegisterUser");
        if !public && self.authenticated_user(authorization).is_none() {
            return Err("You do not have permission to perform this action".to_string());
        }

        let text = |key: &str| vars.get(key).and_then(Value::as_str).unwrap_or_default().to_string();
        let id = |key: &str| {
            vars.get(key)
                .and_then(|v| v.as_str().map(str::to_string).or_else(|| v.as_i64().map(|n| n.to_string())))
                .and_then(|s| s.parse::<i64>().ok())
                .unwrap_or_default()
        };

        match name {
            "TokenAuth" => {
                let (username, password) = (text("username"), text("password"));
                self.users
                    .iter()
                    .find(|u| u.username == username && u.password == password)
                    .map(|u| json!({ "tokenAuth": { "token": format!("token-{}", u.username) } }))
                    .ok_or_else(|| "Please enter valid credentials".to_string())
            }
            "RegisterUser" => {
                let username = text("username");
                if self.users.iter().any(|u| u.username == username) {
                    return Err("Ce nom d'utilisateur existe déjà".to_string());
                }
                let id = self.next_id();
                self.users.push(FakeUser {
                    id,
                    username: username.clone(),
                    password: text("password"),
                    email: text("email"),
                    role: text("role"),
                });
                Ok(json!({ "registerUser": { "utilisateur": { "id": id.to_string(), "username": username, "role": text("role") } } }))
            }
            "ChangePassword" => {
                let username = self
                    .authenticated_user(authorization)
                    .map(|u| u.username.clone())
                    .unwrap_or_default();
                let (old, new) = (text("oldPassword"), text("newPassword"));
                let user = self
                    .users
                    .iter_mut()
                    .find(|u| u.username == username)
                    .ok_or_else(|| "Utilisateur introuvable".to_string())?;
                if user.password != old {
                    return Err("Ancien mot de passe incorrect".to_string());
                }
                user.password = new;
                Ok(json!({ "changePassword": { "success": true } }))
            }
            "AllUtilisateurs" => {
                let users: Vec<Value> = self.users.iter().map(|u| self.user_json(u.id)).collect();
                Ok(json!({ "allUtilisateurs": users }))
            }
            "AllClients" => {
                let clients: Vec<Value> = self
                    .clients
                    .iter()
                    .map(|c| json!({ "id": c.id.to_string(), "nom": c.nom, "email": c.email, "telephone": c.telephone, "adresse": c.adresse }))
                    .collect();
                Ok(json!({ "allClients": clients }))
            }
            "CreateClient" => {
                let id = self.next_id();
                let client = FakeClient {
                    id,
                    nom: text("nom"),
                    email: text("email"),
                    telephone: text("telephone"),
                    adresse: text("adresse"),
                };
                let nom = client.nom.clone();
                self.clients.push(client);
                Ok(json!({ "createClient": { "client": { "id": id.to_string(), "nom": nom } } }))
            }
            "UpdateClient" => {
                let id = id("id");
                let client = self
                    .clients
                    .iter_mut()
                    .find(|c| c.id == id)
                    .ok_or_else(|| "Client introuvable".to_string())?;
                client.nom = text("nom");
                client.email = text("email");
                client.telephone = text("telephone");
                client.adresse = text("adresse");
                Ok(json!({ "updateClient": { "client": { "id": id.to_string(), "nom": client.nom } } }))
            }
            "DeleteClient" => {
                let id = id("id");
                if !self.clients.iter().any(|c| c.id == id) {
                    return Err("No Client matches the given query.".to_string());
                }
                self.clients.retain(|c| c.id != id);
                Ok(json!({ "deleteClient": { "ok": true } }))
            }
            "AllProduits" => {
                let products: Vec<Value> = self.products.iter().map(|p| self.product_json(p)).collect();
                Ok(json!({ "allProduits": products }))
            }
            "CreateProduit" => {
                let id = self.next_id();
                let product = FakeProduct {
                    id,
                    nom: text("nom"),
                    prix: vars.get("prix").and_then(Value::as_f64).unwrap_or_default(),
                    stock: vars.get("stock").and_then(Value::as_i64).unwrap_or_default(),
                    vendeur_id: vars.get("vendeurId").and_then(Value::as_i64).unwrap_or_default(),
                };
                let nom = product.nom.clone();
                self.products.push(product);
                Ok(json!({ "createProduit": { "produit": { "id": id.to_string(), "nom": nom } } }))
            }
            "UpdateProduit" => {
                let id = id("id");
                let product = self
                    .products
                    .iter_mut()
                    .find(|p| p.id == id)
                    .ok_or_else(|| "Produit introuvable".to_string())?;
                product.nom = text("nom");
                if let Some(prix) = vars.get("prix").and_then(Value::as_f64) {
                    product.prix = prix;
                }
                if let Some(stock) = vars.get("stock").and_then(Value::as_i64) {
                    product.stock = stock;
                }
                Ok(json!({ "updateProduit": { "produit": { "id": id.to_string(), "nom": product.nom } } }))
            }
            "DeleteProduit" => {
                let id = id("id");
                if !self.products.iter().any(|p| p.id == id) {
                    return Err("No Produit matches the given query.".to_string());
                }
                self.products.retain(|p| p.id != id);
                Ok(json!({ "deleteProduit": { "ok": true } }))
            }
            "AllCommandes" => {
                let orders: Vec<Value> = self.orders.iter().map(|o| self.order_json(o)).collect();
                Ok(json!({ "allCommandes": orders }))
            }
            "CreateCommande" => {
                let lines: Vec<(i64, i64)> = vars
                    .get("lignes")
                    .and_then(Value::as_array)
                    .map(|lines| {
                        lines
                            .iter()
                            .map(|l| {
                                let product_id = l
                                    .get("produitId")
                                    .and_then(Value::as_str)
                                    .and_then(|s| s.parse().ok())
                                    .unwrap_or_default();
                                let quantity = l.get("quantite").and_then(Value::as_i64).unwrap_or_default();
                                (product_id, quantity)
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                if lines.iter().any(|(product_id, _)| self.product(*product_id).is_none()) {
                    return Err("Produit introuvable".to_string());
                }
                let order = FakeOrder {
                    id: self.next_id(),
                    date: NEW_ORDER_DATE.to_string(),
                    vendeur_id: id("vendeurId"),
                    lines,
                };
                let total = self.order_total(&order);
                let order_id = order.id;
                self.orders.push(order);
                Ok(json!({ "createCommande": { "commande": { "id": order_id.to_string(), "total": total } } }))
            }
            "DashboardStats" => {
                let top = self.quantities_by_product();
                let total_sales: f64 = self.orders.iter().map(|o| self.order_total(o)).sum();
                Ok(json!({
                    "dashboardStats": {
                        "totalCommandes": self.orders.len(),
                        "totalVentes": total_sales,
                        "totalClients": self.clients.len(),
                        "produitLePlusVendu": top.first().map(|(name, _)| name.clone()),
                        "derniereCommande": self.orders.last().map(|o| o.date.clone()),
                        "topProduits": top
                            .iter()
                            .take(5)
                            .map(|(name, quantity)| json!({ "nom": name, "quantite": quantity }))
                            .collect::<Vec<_>>(),
                    }
                }))
            }
            "ProduitsVendusParMois" => {
                let rows: Vec<Value> = self
                    .quantities_by_product()
                    .into_iter()
                    .map(|(name, quantity)| json!({ "produit": name, "mois": "June", "quantite": quantity }))
                    .collect();
                Ok(json!({ "produitsVendusParMois": rows }))
            }
            other => Err(format!("Unknown operation {other}")),
        }
    }
}

/// In-memory stand-in for the shop GraphQL API.
#[derive(Clone)]
pub struct FakeApi {
    data: Arc<Mutex<FakeData>>,
    addr: SocketAddr,
}

impl FakeApi {
    /// Start the fake API on an ephemeral port.
    pub async fn spawn() -> Self {
        let data = Arc::new(Mutex::new(FakeData::seeded()));

        let router = Router::new()
            .route("/graphql", post(graphql))
            .with_state(Arc::clone(&data));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake API");
        let addr = listener.local_addr().expect("Fake API has no address");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Fake API failed");
        });

        Self { data, addr }
    }

    /// GraphQL endpoint URL.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}/graphql", self.addr)
    }

    fn data(&self) -> MutexGuard<'_, FakeData> {
        self.data.lock().expect("Fake API state poisoned")
    }

    /// Every operation received so far, oldest first.
    #[must_use]
    pub fn operations(&self) -> Vec<RecordedOperation> {
        self.data().log.clone()
    }

    /// How many times `name` was received.
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.data().log.iter().filter(|op| op.name == name).count()
    }

    /// The most recent `name` operation.
    #[must_use]
    pub fn last(&self, name: &str) -> Option<RecordedOperation> {
        self.data().log.iter().rev().find(|op| op.name == name).cloned()
    }

    /// Answer `name` with a GraphQL error from now on.
    pub fn fail(&self, name: &str) {
        self.data().failing.push(name.to_string());
    }

    /// Hold back the next answer to `name` for `delay`.
    ///
    /// The answer reflects the data at the time the request arrived.
    pub fn delay_next(&self, name: &str, delay: Duration) {
        self.data().delays.push((name.to_string(), delay));
    }

    /// Current client names, in storage order.
    #[must_use]
    pub fn client_names(&self) -> Vec<String> {
        self.data().clients.iter().map(|c| c.nom.clone()).collect()
    }

    /// Current product names, in storage order.
    #[must_use]
    pub fn product_names(&self) -> Vec<String> {
        self.data().products.iter().map(|p| p.nom.clone()).collect()
    }

    /// Number of stored orders.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.data().orders.len()
    }
}

async fn graphql(
    State(data): State<Arc<Mutex<FakeData>>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let name = body
        .get("operationName")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let variables = body.get("variables").cloned().unwrap_or(Value::Null);
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let (answer, delay) = {
        let mut data = data.lock().expect("Fake API state poisoned");
        data.log.push(RecordedOperation {
            name: name.clone(),
            variables: variables.clone(),
            authorization: authorization.clone(),
        });
        let delay = data
            .delays
            .iter()
            .position(|(op, _)| *op == name)
            .map(|i| data.delays.remove(i).1);
        (data.answer(&name, &variables, authorization.as_deref()), delay)
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    match answer {
        Ok(payload) => Json(json!({ "data": payload })),
        Err(message) => Json(json!({ "data": null, "errors": [{ "message": message }] })),
    }
}

/// The console running against a [`FakeApi`].
pub struct TestApp {
    pub api: FakeApi,
    pub client: Client,
    addr: SocketAddr,
}

impl TestApp {
    /// Start a fake API and the console in front of it.
    pub async fn spawn() -> Self {
        let api = FakeApi::spawn().await;

        let mut env = HashMap::new();
        env.insert("MINISHOP_API_URL", api.url());
        env.insert("MINISHOP_BASE_URL", "http://127.0.0.1".to_string());
        env.insert("MINISHOP_CACHE_TTL_SECS", "300".to_string());
        env.insert(
            "MINISHOP_STATIC_DIR",
            concat!(env!("CARGO_MANIFEST_DIR"), "/../web/static").to_string(),
        );
        let config = MiniShopConfig::from_lookup(|key| env.get(key).cloned())
            .expect("Invalid test configuration");

        let state = AppState::new(config).expect("Failed to create application state");
        let app = minishop_web::app(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind console");
        let addr = listener.local_addr().expect("Console has no address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Console failed");
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self { api, client, addr }
    }

    /// Absolute URL for a console path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// GET a console path.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// POST a form to a console path.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// GET a path and return the body, asserting a 200.
    pub async fn page(&self, path: &str) -> String {
        let resp = self.get(path).await;
        assert_eq!(resp.status(), 200, "GET {path}");
        resp.text().await.expect("Failed to read body")
    }

    /// Log in and assert the redirect to the dashboard.
    pub async fn login(&self, username: &str, password: &str) {
        let resp = self
            .post_form("/login", &[("username", username), ("password", password)])
            .await;
        assert_eq!(location(&resp).as_deref(), Some("/dashboard"), "login as {username}");
    }
}

/// The `Location` header of a redirect.
#[must_use]
pub fn location(resp: &Response) -> Option<String> {
    resp.headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
